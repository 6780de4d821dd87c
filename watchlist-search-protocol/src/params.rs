//! Query-parameter parsing for `GET /v2/search`.
//!
//! The HTTP adapter decodes the query string into `(key, value)` pairs
//! (repeated keys allowed) and hands them here; parsing builds the query
//! [`Entity`] and the clamped [`SearchOpts`].
//!
//! Dates accept `YYYY-MM-DD`, `YYYY-MM`, then `YYYY`; empty or
//! unparseable date input yields no date rather than an error. Numeric
//! vessel fields are strict: a malformed tonnage is a 400.

use watchlist_core::{
    Address, Aircraft, Business, CryptoAddress, Entity, EntityDate, EntityDetails, EntityType,
    Gender, Organization, Person, SourceList, Vessel,
};

use crate::error::ParamError;

/// Soft result limit applied when the caller does not specify one.
pub const DEFAULT_LIMIT: usize = 10;
/// Hard ceiling on the result limit.
pub const HARD_LIMIT: usize = 100;

/// Per-query search options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOpts {
    /// Maximum results to return, in `[1, HARD_LIMIT]`.
    pub limit: usize,
    /// Score floor; candidates strictly below are suppressed.
    pub min_match: f64,
}

impl Default for SearchOpts {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            min_match: 0.0,
        }
    }
}

/// Parse decoded query pairs into a query entity and options.
pub fn parse_search_query(
    pairs: &[(String, String)],
) -> Result<(Entity, SearchOpts), ParamError> {
    let params = Params(pairs);

    let name = params.get("name").to_string();
    let entity_type = EntityType::parse(params.get("type")).unwrap_or(EntityType::Unknown);

    let mut entity = Entity::new(
        entity_type,
        name,
        SourceList::ApiRequest,
        params.get("requestID"),
    );

    entity.details = match entity_type {
        EntityType::Person => {
            entity.alt_names = params.all("altNames");
            EntityDetails::Person(Person {
                gender: Gender::parse(params.get("gender")),
                birth_date: EntityDate::parse(params.get("birthDate")),
                death_date: EntityDate::parse(params.get("deathDate")),
                titles: params.all("titles"),
                government_ids: Vec::new(),
            })
        }
        EntityType::Business => EntityDetails::Business(Business {
            created: EntityDate::parse(params.get("created")),
            dissolved: EntityDate::parse(params.get("dissolved")),
            identifiers: Vec::new(),
        }),
        EntityType::Organization => EntityDetails::Organization(Organization {
            created: EntityDate::parse(params.get("created")),
            dissolved: EntityDate::parse(params.get("dissolved")),
            identifiers: Vec::new(),
        }),
        EntityType::Aircraft => EntityDetails::Aircraft(Aircraft {
            aircraft_type: params.get("aircraftType").to_string(),
            flag: params.get("flag").to_string(),
            built: None,
            icao_code: params.get("icaoCode").to_string(),
            model: params.get("model").to_string(),
            serial_number: params.get("serialNumber").to_string(),
        }),
        EntityType::Vessel => EntityDetails::Vessel(Vessel {
            imo_number: params.get("imoNumber").to_string(),
            vessel_type: params.get("vesselType").to_string(),
            flag: params.get("flag").to_string(),
            built: None,
            model: params.get("model").to_string(),
            mmsi: params.get("mmsi").to_string(),
            call_sign: params.get("callSign").to_string(),
            owner: params.get("owner").to_string(),
            tonnage: read_int(params.get("tonnage")).map_err(ParamError::VesselTonnage)?,
            gross_registered_tonnage: read_int(params.get("grossRegisteredTonnage"))
                .map_err(ParamError::VesselGrossRegisteredTonnage)?,
        }),
        EntityType::Unknown => EntityDetails::Unknown,
    };

    entity.crypto_addresses = read_crypto_addresses(&params.all("cryptoAddress"));
    entity.addresses = params
        .all("address")
        .iter()
        .map(|a| Address::parse(a))
        .filter(|a| !a.is_empty())
        .collect();

    Ok((entity, read_opts(&params)))
}

struct Params<'a>(&'a [(String, String)]);

impl Params<'_> {
    /// First value for a key, trimmed; empty string when absent.
    fn get(&self, key: &str) -> &str {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .unwrap_or("")
    }

    /// All non-empty values for a repeated key, trimmed.
    fn all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    }
}

fn read_opts(params: &Params<'_>) -> SearchOpts {
    let mut limit = DEFAULT_LIMIT;
    if let Ok(n) = params.get("limit").parse::<i64>() {
        if n > 0 {
            limit = n as usize;
        }
    }
    limit = limit.min(HARD_LIMIT);

    let min_match = params
        .get("minMatch")
        .parse::<f64>()
        .unwrap_or(0.0)
        .clamp(0.0, 1.0);

    SearchOpts { limit, min_match }
}

fn read_int(input: &str) -> Result<Option<i64>, std::num::ParseIntError> {
    if input.is_empty() {
        return Ok(None);
    }
    input.parse::<i64>().map(Some)
}

/// Query params look like `cryptoAddress=XBT:x123456`; malformed values
/// are skipped.
fn read_crypto_addresses(inputs: &[String]) -> Vec<CryptoAddress> {
    inputs
        .iter()
        .filter_map(|input| {
            let (currency, address) = input.split_once(':')?;
            if currency.is_empty() || address.is_empty() || address.contains(':') {
                return None;
            }
            Some(CryptoAddress::new(currency, address))
        })
        .collect()
}
