//! The entity data model.
//!
//! [`Entity`] is the central record: one logical subject drawn from a
//! sanctions list (or assembled from an inbound search request). The
//! type-specific payload is a tagged union: exactly one variant is
//! populated, and it must agree with the `entity_type` tag. Records that
//! violate that invariant are dropped during ingest, never at query time.

use serde::{Deserialize, Serialize};

use crate::address::{Address, CryptoAddress};
use crate::date::EntityDate;
use crate::source::SourceList;

/// Entity classification tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Business,
    Organization,
    Aircraft,
    Vessel,
    #[default]
    Unknown,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "person",
            EntityType::Business => "business",
            EntityType::Organization => "organization",
            EntityType::Aircraft => "aircraft",
            EntityType::Vessel => "vessel",
            EntityType::Unknown => "unknown",
        }
    }

    /// Parse a type tag, case-insensitive. Empty or unrecognized input is
    /// `None`; an unset query type means "search all types".
    pub fn parse(input: &str) -> Option<EntityType> {
        match input.trim().to_lowercase().as_str() {
            "person" | "individual" => Some(EntityType::Person),
            "business" => Some(EntityType::Business),
            "organization" => Some(EntityType::Organization),
            "aircraft" => Some(EntityType::Aircraft),
            "vessel" => Some(EntityType::Vessel),
            _ => None,
        }
    }
}

/// Gender as carried on person records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    pub fn parse(input: &str) -> Gender {
        match input.trim().to_lowercase().as_str() {
            "male" | "m" => Gender::Male,
            "female" | "f" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

/// A government-issued identifier (passport, tax ID, registration number).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernmentId {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country: String,
    pub identifier: String,
}

/// A named relationship to another entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affiliation {
    pub entity_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

/// Sanctions program metadata carried alongside a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanctionsInfo {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub programs: Vec<String>,
    #[serde(default)]
    pub secondary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A dated historical fact (former name, former flag, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalInfo {
    pub kind: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<EntityDate>,
}

/// Person payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<EntityDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<EntityDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub titles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub government_ids: Vec<GovernmentId>,
}

/// Business payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<EntityDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dissolved: Option<EntityDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<GovernmentId>,
}

/// Organization payload. Structurally identical to [`Business`] but kept
/// distinct so the type tag stays meaningful in gating and responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<EntityDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dissolved: Option<EntityDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<GovernmentId>,
}

/// Aircraft payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aircraft {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub aircraft_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub flag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub built: Option<EntityDate>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icao_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub serial_number: String,
}

/// Vessel payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vessel {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub imo_number: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vessel_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub flag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub built: Option<EntityDate>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mmsi: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub call_sign: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tonnage: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_registered_tonnage: Option<i64>,
}

/// Type-specific payload: exactly one variant, matching the type tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityDetails {
    Person(Person),
    Business(Business),
    Organization(Organization),
    Aircraft(Aircraft),
    Vessel(Vessel),
    #[default]
    Unknown,
}

impl EntityDetails {
    /// The type tag this payload belongs with.
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityDetails::Person(_) => EntityType::Person,
            EntityDetails::Business(_) => EntityType::Business,
            EntityDetails::Organization(_) => EntityType::Organization,
            EntityDetails::Aircraft(_) => EntityType::Aircraft,
            EntityDetails::Vessel(_) => EntityType::Vessel,
            EntityDetails::Unknown => EntityType::Unknown,
        }
    }

    pub fn as_person(&self) -> Option<&Person> {
        match self {
            EntityDetails::Person(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_business(&self) -> Option<&Business> {
        match self {
            EntityDetails::Business(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_organization(&self) -> Option<&Organization> {
        match self {
            EntityDetails::Organization(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_aircraft(&self) -> Option<&Aircraft> {
        match self {
            EntityDetails::Aircraft(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_vessel(&self) -> Option<&Vessel> {
        match self {
            EntityDetails::Vessel(v) => Some(v),
            _ => None,
        }
    }
}

/// One logical subject from a watchlist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alt_names: Vec<String>,
    pub source: SourceList,
    #[serde(rename = "sourceID", default, skip_serializing_if = "String::is_empty")]
    pub source_id: String,
    #[serde(default, skip_serializing_if = "details_is_unknown")]
    pub details: EntityDetails,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<Address>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub crypto_addresses: Vec<CryptoAddress>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affiliations: Vec<Affiliation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanctions_info: Option<SanctionsInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub historical_info: Vec<HistoricalInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub government_ids: Vec<GovernmentId>,
}

fn details_is_unknown(details: &EntityDetails) -> bool {
    matches!(details, EntityDetails::Unknown)
}

impl Entity {
    /// Create an entity with the given tag, display name, and provenance.
    pub fn new(
        entity_type: EntityType,
        name: impl Into<String>,
        source: SourceList,
        source_id: impl Into<String>,
    ) -> Self {
        Entity {
            entity_type,
            name: name.into(),
            source,
            source_id: source_id.into(),
            ..Entity::default()
        }
    }

    /// Attach the type-specific payload.
    pub fn with_details(mut self, details: EntityDetails) -> Self {
        self.details = details;
        self
    }

    /// Attach alternate names.
    pub fn with_alt_names(mut self, alt_names: Vec<String>) -> Self {
        self.alt_names = alt_names;
        self
    }

    /// Attach addresses.
    pub fn with_addresses(mut self, addresses: Vec<Address>) -> Self {
        self.addresses = addresses;
        self
    }

    /// Whether the payload variant agrees with the type tag.
    ///
    /// An `Unknown`-typed entity may carry an `Unknown` payload; every
    /// other tag requires its matching variant. Ingest drops entities
    /// where this returns false.
    pub fn details_consistent(&self) -> bool {
        self.details.entity_type() == self.entity_type
    }
}
