//! Per-list index statistics.
//!
//! Counts collected while assembling an index, reported after each refresh
//! and posted to the stats channel. Field names follow the sub-list
//! shorthand used in refresh logs (SDNs, SSI, DPL, ...).

use serde::{Deserialize, Serialize};

/// Counts per sub-list for one assembled index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    /// OFAC Specially Designated Nationals
    #[serde(rename = "SDNs")]
    pub sdns: u64,
    /// Alternate identities joined onto SDN records
    pub alt_names: u64,
    /// Addresses joined onto SDN records
    pub addresses: u64,
    /// Sectoral Sanctions Identifications
    #[serde(rename = "SSI")]
    pub sectoral_sanctions: u64,
    /// BIS Denied Persons List
    #[serde(rename = "DPL")]
    pub denied_persons: u64,
    /// BIS Entity List
    #[serde(rename = "BISEntities")]
    pub bis_entities: u64,
    /// BIS Unverified List
    #[serde(rename = "UVL")]
    pub unverified: u64,
    /// Nonproliferation Sanctions
    #[serde(rename = "ISN")]
    pub nonproliferation: u64,
    /// Foreign Sanctions Evaders
    #[serde(rename = "FSE")]
    pub foreign_sanctions_evaders: u64,
    /// Palestinian Legislative Council
    #[serde(rename = "PLC")]
    pub palestinian_legislative_council: u64,
    /// CAPTA list
    #[serde(rename = "CAPTA")]
    pub capta: u64,
    /// ITAR Debarred
    #[serde(rename = "ITARDebarred")]
    pub itar_debarred: u64,
    /// Chinese Military-Industrial Complex Companies
    #[serde(rename = "CMIC")]
    pub cmic: u64,
    /// Non-SDN Menu-Based Sanctions
    #[serde(rename = "NSMBS")]
    pub ns_mbs: u64,
    /// EU Consolidated Sanctions List
    #[serde(rename = "EUCSL")]
    pub eu_csl: u64,
    /// UK Consolidated Sanctions List
    #[serde(rename = "UKCSL")]
    pub uk_csl: u64,
    /// UK Sanctions List
    #[serde(rename = "UKSanctionsList")]
    pub uk_sanctions_list: u64,
}

impl IndexStats {
    /// Total entities across all sub-lists (alt names and addresses are
    /// joined onto their parents, not counted as entities).
    pub fn total_entities(&self) -> u64 {
        self.sdns
            + self.sectoral_sanctions
            + self.denied_persons
            + self.bis_entities
            + self.unverified
            + self.nonproliferation
            + self.foreign_sanctions_evaders
            + self.palestinian_legislative_council
            + self.capta
            + self.itar_debarred
            + self.cmic
            + self.ns_mbs
            + self.eu_csl
            + self.uk_csl
            + self.uk_sanctions_list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_excludes_joined_rows() {
        let stats = IndexStats {
            sdns: 10,
            alt_names: 25,
            addresses: 40,
            eu_csl: 5,
            ..IndexStats::default()
        };
        assert_eq!(stats.total_entities(), 15);
    }

    #[test]
    fn test_serde_field_names() {
        let stats = IndexStats {
            sdns: 2,
            sectoral_sanctions: 1,
            ..IndexStats::default()
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["SDNs"], 2);
        assert_eq!(json["SSI"], 1);
        assert_eq!(json["DPL"], 0);
    }
}
