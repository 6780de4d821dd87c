//! Source list tags.
//!
//! Every entity carries the list it was drawn from. The tag doubles as the
//! stats key during refresh and as the first component of the deterministic
//! tie-break when merging equal-score results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The government list (and sub-list) an entity originates from.
///
/// `ApiRequest` marks query entities built from inbound search requests;
/// it never appears in an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceList {
    /// OFAC Specially Designated Nationals
    UsOfacSdn,
    /// OFAC Sectoral Sanctions Identifications
    UsOfacSsi,
    /// BIS Entity List
    UsBisEntityList,
    /// BIS Denied Persons List
    UsDeniedPersons,
    /// BIS Unverified List
    UsUnverifiedList,
    /// State Dept Nonproliferation Sanctions
    UsNonproliferation,
    /// OFAC Foreign Sanctions Evaders
    UsForeignSanctionsEvaders,
    /// OFAC Palestinian Legislative Council
    UsPalestinianLegislativeCouncil,
    /// OFAC CAPTA list
    UsCapta,
    /// State Dept ITAR Debarred
    UsItarDebarred,
    /// OFAC Chinese Military-Industrial Complex Companies
    UsCmic,
    /// OFAC Non-SDN Menu-Based Sanctions
    UsNsMbs,
    /// EU Consolidated Sanctions List
    EuConsolidated,
    /// UK Consolidated Sanctions List
    UkConsolidated,
    /// UK Sanctions List (OFSI)
    UkSanctionsList,
    /// Entity assembled from an inbound API request
    ApiRequest,
}

impl Default for SourceList {
    fn default() -> Self {
        SourceList::ApiRequest
    }
}

impl SourceList {
    /// Stable string form, used for tie-breaks, logging, and config matching.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceList::UsOfacSdn => "us_ofac_sdn",
            SourceList::UsOfacSsi => "us_ofac_ssi",
            SourceList::UsBisEntityList => "us_bis_entity_list",
            SourceList::UsDeniedPersons => "us_dpl",
            SourceList::UsUnverifiedList => "us_uvl",
            SourceList::UsNonproliferation => "us_isn",
            SourceList::UsForeignSanctionsEvaders => "us_fse",
            SourceList::UsPalestinianLegislativeCouncil => "us_plc",
            SourceList::UsCapta => "us_capta",
            SourceList::UsItarDebarred => "us_itar_debarred",
            SourceList::UsCmic => "us_cmic",
            SourceList::UsNsMbs => "us_ns_mbs",
            SourceList::EuConsolidated => "eu_csl",
            SourceList::UkConsolidated => "uk_csl",
            SourceList::UkSanctionsList => "uk_sanctions_list",
            SourceList::ApiRequest => "api_request",
        }
    }
}

impl fmt::Display for SourceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
