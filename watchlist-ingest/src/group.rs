//! Normalization of raw rows into entities.
//!
//! OFAC ships one logical subject across several rows (SDN + addresses +
//! alternate identities + comments); the consolidated lists are already
//! one row per subject. Grouping joins everything into one
//! [`Entity`] per subject and counts per-list stats as it goes.

use std::collections::HashMap;

use watchlist_core::{
    Address, Aircraft, Business, CryptoAddress, Entity, EntityDate, EntityDetails, EntityType,
    GovernmentId, IndexStats, Organization, Person, SanctionsInfo, SourceList, Vessel,
};

use crate::records::{ListRecord, RawLists};

/// Join raw rows into entities, one per logical subject.
///
/// Rows with an empty name are skipped; payload/tag consistency and
/// canonical-name gating happen downstream at index assembly.
pub fn group_entities(raw: &RawLists) -> (Vec<Entity>, IndexStats) {
    let mut entities = Vec::new();
    let mut stats = IndexStats::default();

    group_sdns(raw, &mut entities, &mut stats);

    let consolidated: [(&[ListRecord], SourceList, &mut u64); 14] = [
        (
            raw.sectoral_sanctions.as_slice(),
            SourceList::UsOfacSsi,
            &mut stats.sectoral_sanctions,
        ),
        (
            raw.bis_entities.as_slice(),
            SourceList::UsBisEntityList,
            &mut stats.bis_entities,
        ),
        (
            raw.denied_persons.as_slice(),
            SourceList::UsDeniedPersons,
            &mut stats.denied_persons,
        ),
        (
            raw.unverified.as_slice(),
            SourceList::UsUnverifiedList,
            &mut stats.unverified,
        ),
        (
            raw.nonproliferation.as_slice(),
            SourceList::UsNonproliferation,
            &mut stats.nonproliferation,
        ),
        (
            raw.foreign_sanctions_evaders.as_slice(),
            SourceList::UsForeignSanctionsEvaders,
            &mut stats.foreign_sanctions_evaders,
        ),
        (
            raw.palestinian_legislative_council.as_slice(),
            SourceList::UsPalestinianLegislativeCouncil,
            &mut stats.palestinian_legislative_council,
        ),
        (raw.capta.as_slice(), SourceList::UsCapta, &mut stats.capta),
        (
            raw.itar_debarred.as_slice(),
            SourceList::UsItarDebarred,
            &mut stats.itar_debarred,
        ),
        (raw.cmic.as_slice(), SourceList::UsCmic, &mut stats.cmic),
        (raw.ns_mbs.as_slice(), SourceList::UsNsMbs, &mut stats.ns_mbs),
        (raw.eu_csl.as_slice(), SourceList::EuConsolidated, &mut stats.eu_csl),
        (raw.uk_csl.as_slice(), SourceList::UkConsolidated, &mut stats.uk_csl),
        (
            raw.uk_sanctions.as_slice(),
            SourceList::UkSanctionsList,
            &mut stats.uk_sanctions_list,
        ),
    ];

    for (records, source, counter) in consolidated {
        for record in records {
            if record.name.trim().is_empty() {
                continue;
            }
            entities.push(list_record_entity(record, source));
            *counter += 1;
        }
    }

    (entities, stats)
}

fn group_sdns(raw: &RawLists, entities: &mut Vec<Entity>, stats: &mut IndexStats) {
    let mut addresses: HashMap<&str, Vec<Address>> = HashMap::new();
    for addr in &raw.sdn_addresses {
        let parsed = Address::parse(&join_segments(&[
            &addr.address,
            &addr.city_state_province_postal,
            &addr.country,
        ]));
        if !parsed.is_empty() {
            addresses.entry(&addr.entity_id).or_default().push(parsed);
            stats.addresses += 1;
        }
    }

    let mut alt_names: HashMap<&str, Vec<String>> = HashMap::new();
    for alt in &raw.sdn_alt_names {
        if alt.alt_name.trim().is_empty() {
            continue;
        }
        alt_names
            .entry(&alt.entity_id)
            .or_default()
            .push(alt.alt_name.clone());
        stats.alt_names += 1;
    }

    let mut comments: HashMap<&str, Vec<&str>> = HashMap::new();
    for comment in &raw.sdn_comments {
        comments
            .entry(&comment.entity_id)
            .or_default()
            .push(&comment.remarks);
    }

    for sdn in &raw.sdns {
        if sdn.name.trim().is_empty() {
            continue;
        }

        let entity_type = sdn_entity_type(&sdn.sdn_type);
        let mut remarks = sdn.remarks.clone();
        for extra in comments.get(sdn.entity_id.as_str()).into_iter().flatten() {
            if !remarks.is_empty() {
                remarks.push(' ');
            }
            remarks.push_str(extra);
        }

        let mut entity = Entity::new(entity_type, &sdn.name, SourceList::UsOfacSdn, &sdn.entity_id)
            .with_details(default_details(entity_type))
            .with_alt_names(
                alt_names
                    .get(sdn.entity_id.as_str())
                    .cloned()
                    .unwrap_or_default(),
            )
            .with_addresses(
                addresses
                    .get(sdn.entity_id.as_str())
                    .cloned()
                    .unwrap_or_default(),
            );
        entity.sanctions_info = sanctions_info(&sdn.programs, &remarks);
        entity.crypto_addresses = crypto_addresses(&sdn.crypto_addresses);

        entities.push(entity);
        stats.sdns += 1;
    }
}

fn list_record_entity(record: &ListRecord, source: SourceList) -> Entity {
    let entity_type = record
        .entity_type
        .as_deref()
        .and_then(list_entity_type)
        .unwrap_or(EntityType::Unknown);

    let mut details = default_details(entity_type);
    if let EntityDetails::Person(person) = &mut details {
        person.birth_date = record.birth_date.as_deref().and_then(EntityDate::parse);
    }

    let mut entity = Entity::new(entity_type, &record.name, source, &record.entity_id)
        .with_details(details)
        .with_alt_names(record.alt_names.clone())
        .with_addresses(
            record
                .addresses
                .iter()
                .map(|a| Address::parse(a))
                .filter(|a| !a.is_empty())
                .collect(),
        );
    entity.government_ids = record
        .ids_on_record
        .iter()
        .filter_map(|raw| government_id(raw))
        .collect();
    entity.sanctions_info =
        sanctions_info(&record.programs, record.remarks.as_deref().unwrap_or(""));
    entity.crypto_addresses = crypto_addresses(&record.crypto_addresses);
    entity
}

/// Digital currency addresses arrive as `CURRENCY:ADDRESS`; malformed
/// values are dropped.
fn crypto_addresses(raw: &[String]) -> Vec<CryptoAddress> {
    raw.iter()
        .filter_map(|value| {
            let (currency, address) = value.split_once(':')?;
            if currency.is_empty() || address.is_empty() {
                return None;
            }
            Some(CryptoAddress::new(currency, address))
        })
        .collect()
}

/// SDN type column values: "individual", "vessel", "aircraft"; businesses
/// ship as "-0-" or blank.
fn sdn_entity_type(sdn_type: &str) -> EntityType {
    match sdn_type.trim().to_lowercase().as_str() {
        "individual" => EntityType::Person,
        "vessel" => EntityType::Vessel,
        "aircraft" => EntityType::Aircraft,
        _ => EntityType::Business,
    }
}

fn list_entity_type(value: &str) -> Option<EntityType> {
    match value.trim().to_lowercase().as_str() {
        "individual" => Some(EntityType::Person),
        "entity" => Some(EntityType::Business),
        "vessel" => Some(EntityType::Vessel),
        "aircraft" => Some(EntityType::Aircraft),
        _ => None,
    }
}

fn default_details(entity_type: EntityType) -> EntityDetails {
    match entity_type {
        EntityType::Person => EntityDetails::Person(Person::default()),
        EntityType::Business => EntityDetails::Business(Business::default()),
        EntityType::Organization => EntityDetails::Organization(Organization::default()),
        EntityType::Aircraft => EntityDetails::Aircraft(Aircraft::default()),
        EntityType::Vessel => EntityDetails::Vessel(Vessel::default()),
        EntityType::Unknown => EntityDetails::Unknown,
    }
}

fn sanctions_info(programs: &[String], remarks: &str) -> Option<SanctionsInfo> {
    if programs.is_empty() && remarks.trim().is_empty() {
        return None;
    }
    Some(SanctionsInfo {
        programs: programs.to_vec(),
        secondary: false,
        description: if remarks.trim().is_empty() {
            None
        } else {
            Some(remarks.trim().to_string())
        },
    })
}

/// IDs arrive as `"1027700049486, Registration ID"`.
fn government_id(raw: &str) -> Option<GovernmentId> {
    let (identifier, id_type) = match raw.split_once(',') {
        Some((identifier, id_type)) => (identifier.trim(), id_type.trim()),
        None => (raw.trim(), ""),
    };
    if identifier.is_empty() {
        return None;
    }
    Some(GovernmentId {
        id_type: id_type.to_string(),
        country: String::new(),
        identifier: identifier.to_string(),
    })
}

fn join_segments(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
