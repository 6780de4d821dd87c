//! Raw record shapes yielded by the external list parsers.
//!
//! OFAC ships its SDN data as four row types joined on `entity_id`; the
//! consolidated screening lists (and the EU/UK lists) each flatten to one
//! row per subject, which [`ListRecord`] captures uniformly. The fields
//! mirror what the upstream files carry, already split into lists by the
//! parser (addresses and alternate names arrive pre-expanded).

use serde::{Deserialize, Serialize};

/// One OFAC SDN row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdnRecord {
    pub entity_id: String,
    pub name: String,
    /// "individual", "vessel", "aircraft", or "-0-" for businesses.
    #[serde(default)]
    pub sdn_type: String,
    #[serde(default)]
    pub programs: Vec<String>,
    #[serde(default)]
    pub remarks: String,
    /// Digital currency addresses as `CURRENCY:ADDRESS`, pre-extracted
    /// from the remarks by the parser.
    #[serde(default)]
    pub crypto_addresses: Vec<String>,
}

/// One OFAC address row, joined to its SDN by `entity_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    pub entity_id: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city_state_province_postal: String,
    #[serde(default)]
    pub country: String,
}

/// One OFAC alternate identity row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AltNameRecord {
    pub entity_id: String,
    #[serde(default)]
    pub alt_type: String,
    pub alt_name: String,
}

/// One OFAC comment row (remark continuation).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub entity_id: String,
    pub remarks: String,
}

/// One flattened row from a consolidated list (SSI, EL, DPL, EU CSL, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRecord {
    #[serde(default)]
    pub entity_id: String,
    /// "Individual", "Entity", "Vessel", "Aircraft", or absent.
    #[serde(default)]
    pub entity_type: Option<String>,
    pub name: String,
    #[serde(default)]
    pub alt_names: Vec<String>,
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub programs: Vec<String>,
    #[serde(default)]
    pub ids_on_record: Vec<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    /// Digital currency addresses as `CURRENCY:ADDRESS`.
    #[serde(default)]
    pub crypto_addresses: Vec<String>,
}

/// Everything one refresh fetched, already split per list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLists {
    // OFAC SDN and its joined rows
    #[serde(default)]
    pub sdns: Vec<SdnRecord>,
    #[serde(default)]
    pub sdn_addresses: Vec<AddressRecord>,
    #[serde(default)]
    pub sdn_alt_names: Vec<AltNameRecord>,
    #[serde(default)]
    pub sdn_comments: Vec<CommentRecord>,

    // US consolidated screening lists
    #[serde(default)]
    pub sectoral_sanctions: Vec<ListRecord>,
    #[serde(default)]
    pub bis_entities: Vec<ListRecord>,
    #[serde(default)]
    pub denied_persons: Vec<ListRecord>,
    #[serde(default)]
    pub unverified: Vec<ListRecord>,
    #[serde(default)]
    pub nonproliferation: Vec<ListRecord>,
    #[serde(default)]
    pub foreign_sanctions_evaders: Vec<ListRecord>,
    #[serde(default)]
    pub palestinian_legislative_council: Vec<ListRecord>,
    #[serde(default)]
    pub capta: Vec<ListRecord>,
    #[serde(default)]
    pub itar_debarred: Vec<ListRecord>,
    #[serde(default)]
    pub cmic: Vec<ListRecord>,
    #[serde(default)]
    pub ns_mbs: Vec<ListRecord>,

    // EU and UK lists
    #[serde(default)]
    pub eu_csl: Vec<ListRecord>,
    #[serde(default)]
    pub uk_csl: Vec<ListRecord>,
    #[serde(default)]
    pub uk_sanctions: Vec<ListRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_record_defaults() {
        let json = r#"{"entityId":"17254","name":"AK TRANSNEFT OAO"}"#;
        let record: ListRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "AK TRANSNEFT OAO");
        assert!(record.alt_names.is_empty());
        assert!(record.entity_type.is_none());
    }

    #[test]
    fn test_raw_lists_partial_payload() {
        let json = r#"{"sdns":[{"entityId":"1","name":"X"}]}"#;
        let raw: RawLists = serde_json::from_str(json).unwrap();
        assert_eq!(raw.sdns.len(), 1);
        assert!(raw.eu_csl.is_empty());
    }
}
