//! Joins a raw collection record with the reference catalog.

use std::collections::BTreeMap;

use armory_analytics_models::{EnrichedCollection, EnrichedWeapon};
use armory_collection_models::RawCollection;
use serde_json::Value;

use crate::catalog::Catalog;
use crate::payload::{coerce_count, parse_date, parse_person, parse_value, saturating_sum};

/// Builds the enriched row for one collection.
///
/// Only weapons present in the catalog get a line in `weapons`, and
/// `weapon_sum` is the sum of those lines. Counts stored under a weapon ID
/// the catalog no longer knows are therefore left out of `weapon_sum`,
/// while [`crate::stats`] still counts them in its `total_weapons`.
#[must_use]
pub fn enrich_collection(collection: &RawCollection, catalog: &Catalog) -> EnrichedCollection {
    let weapons_raw = parse_value(&collection.weapons, "weapons", &collection.id)
        .map_or(Value::Null, std::borrow::Cow::into_owned);

    let weapons: BTreeMap<String, EnrichedWeapon> = match &weapons_raw {
        Value::Object(counts) => counts
            .iter()
            .filter_map(|(weapon_id, count)| {
                let Some(weapon) = catalog.weapons.get(weapon_id) else {
                    log::debug!(
                        "Collection {}: weapon {weapon_id} not in catalog",
                        collection.id
                    );
                    return None;
                };
                let line = EnrichedWeapon {
                    id: weapon.id.clone(),
                    name: weapon.name.clone(),
                    category_id: weapon.category_id.clone(),
                    category_name: catalog
                        .weapon_categories
                        .get(&weapon.category_id)
                        .map(|c| c.name.clone()),
                    count: coerce_count(count),
                };
                Some((weapon_id.clone(), line))
            })
            .collect(),
        Value::Null => BTreeMap::new(),
        _ => {
            log::debug!(
                "Collection {}: weapons document is not an object",
                collection.id
            );
            BTreeMap::new()
        }
    };

    let weapon_sum = saturating_sum(weapons.values().map(|w| w.count));

    let areal_category_name = collection
        .areal_category_id
        .as_deref()
        .and_then(|id| catalog.areal_categories.get(id))
        .map(|c| c.name.clone());
    let areal_name = collection
        .areal_id
        .as_deref()
        .and_then(|id| catalog.areals.get(id))
        .map(|a| a.name.clone());

    EnrichedCollection {
        id: collection.id.clone(),
        created_at: collection.created_at,
        areal_category_id: collection.areal_category_id.clone(),
        areal_id: collection.areal_id.clone(),
        areal_category_name,
        areal_name,
        user_type: collection.user_type.clone(),
        pin: collection.pin.clone(),
        weapons_raw,
        weapons,
        weapon_sum,
        person_data: parse_person(collection),
        date_data: parse_date(collection),
    }
}

#[cfg(test)]
mod tests {
    use armory_collection_models::Payload;
    use chrono::{TimeZone as _, Utc};
    use serde_json::json;

    use super::*;
    use crate::catalog::tests::{areal_category, category, weapon};

    fn catalog() -> Catalog {
        Catalog::from_parts(
            vec![weapon("w1", "C1"), weapon("w3", "gone")],
            vec![category("C1", "Rifles")],
            vec![areal_category("ac1", &["a1"])],
        )
    }

    fn collection(weapons: Payload) -> RawCollection {
        RawCollection {
            id: "A".to_string(),
            tenant_id: "T1".to_string(),
            areal_id: Some("a1".to_string()),
            areal_category_id: Some("ac1".to_string()),
            user_type: Some("M".to_string()),
            pin: None,
            weapons,
            person: Payload::Raw(r#"{"responsible":"Marko"}"#.to_string()),
            date: Payload::Raw("not-json".to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn resolves_weapons_and_names() {
        let row = enrich_collection(
            &collection(Payload::Raw(r#"{"w1":2,"w2":"x"}"#.to_string())),
            &catalog(),
        );

        assert_eq!(row.weapon_sum, 2);
        assert_eq!(row.weapons.len(), 1);
        let w1 = &row.weapons["w1"];
        assert_eq!(w1.count, 2);
        assert_eq!(w1.category_name.as_deref(), Some("Rifles"));
        assert_eq!(row.areal_name.as_deref(), Some("Areal a1"));
        assert_eq!(row.areal_category_name.as_deref(), Some("Areal category ac1"));
        assert_eq!(row.weapons_raw, json!({"w1": 2, "w2": "x"}));
        assert_eq!(
            row.person_data.and_then(|p| p.responsible).as_deref(),
            Some("Marko")
        );
        assert!(row.date_data.is_none());
    }

    #[test]
    fn unknown_weapons_do_not_count_toward_weapon_sum() {
        let row = enrich_collection(
            &collection(Payload::Parsed(json!({"w1": "4", "deleted": 10}))),
            &catalog(),
        );
        assert_eq!(row.weapon_sum, 4);
        assert!(!row.weapons.contains_key("deleted"));
    }

    #[test]
    fn weapon_with_unknown_category_keeps_id() {
        let row = enrich_collection(
            &collection(Payload::Raw(r#"{"w3":1}"#.to_string())),
            &catalog(),
        );
        let w3 = &row.weapons["w3"];
        assert_eq!(w3.category_id, "gone");
        assert!(w3.category_name.is_none());
    }

    #[test]
    fn malformed_weapons_yield_empty_row() {
        let row = enrich_collection(
            &collection(Payload::Raw("{oops".to_string())),
            &catalog(),
        );
        assert!(row.weapons.is_empty());
        assert_eq!(row.weapon_sum, 0);
        assert_eq!(row.weapons_raw, Value::Null);
    }

    #[test]
    fn huge_counts_saturate_weapon_sum() {
        let catalog = Catalog::from_parts(
            vec![weapon("w1", "C1"), weapon("w2", "C1")],
            vec![category("C1", "Rifles")],
            vec![],
        );
        let row = enrich_collection(
            &collection(Payload::Raw(
                r#"{"w1":9223372036854775807,"w2":1}"#.to_string(),
            )),
            &catalog,
        );
        assert_eq!(row.weapons["w1"].count, i64::MAX);
        assert_eq!(row.weapon_sum, i64::MAX);
    }

    #[test]
    fn missing_areal_references_are_left_empty() {
        let mut c = collection(Payload::Invalid);
        c.areal_id = Some("nowhere".to_string());
        c.areal_category_id = None;
        let row = enrich_collection(&c, &catalog());
        assert!(row.areal_name.is_none());
        assert!(row.areal_category_name.is_none());
    }
}
