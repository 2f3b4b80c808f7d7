//! Evaluation of [`CollectionFilter`] against stored collection records.
//!
//! Exact-match filters compare the top-level record columns. Person
//! filters look inside the `person` document; a record whose document
//! cannot be decoded never matches a person filter.

use armory_collection_models::{CollectionFilter, PersonData, RawCollection};
use chrono::Datelike as _;

/// Returns `true` if `collection` satisfies every filter that is set.
#[must_use]
pub fn matches(filter: &CollectionFilter, collection: &RawCollection) -> bool {
    if !eq_opt(filter.pin.as_deref(), collection.pin.as_deref())
        || !eq_opt(filter.areal_id.as_deref(), collection.areal_id.as_deref())
        || !eq_opt(
            filter.areal_category_id.as_deref(),
            collection.areal_category_id.as_deref(),
        )
        || !eq_opt(filter.user_type.as_deref(), collection.user_type.as_deref())
    {
        return false;
    }

    let created = collection.created_at.date_naive();

    if let Some(year) = filter.year
        && created.year() != year
    {
        return false;
    }
    if let Some(from) = filter.date_from
        && created < from
    {
        return false;
    }
    if let Some(to) = filter.date_to
        && created > to
    {
        return false;
    }

    if filter.filters_person() {
        let Ok(person) = collection.person.decode::<PersonData>() else {
            log::debug!(
                "Collection {} has an unreadable person document, excluded by person filter",
                collection.id
            );
            return false;
        };
        return person_matches(filter, &person);
    }

    true
}

fn person_matches(filter: &CollectionFilter, person: &PersonData) -> bool {
    if let Some(needle) = filter.person.as_deref() {
        let full_name = [person.name.as_deref(), person.surname.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if !contains_ci(&full_name, needle) {
            return false;
        }
    }
    if let Some(needle) = filter.responsible.as_deref()
        && !person
            .responsible
            .as_deref()
            .is_some_and(|r| contains_ci(r, needle))
    {
        return false;
    }
    if let Some(needle) = filter.unit.as_deref()
        && !person.unit.as_deref().is_some_and(|u| contains_ci(u, needle))
    {
        return false;
    }
    true
}

fn eq_opt(wanted: Option<&str>, actual: Option<&str>) -> bool {
    wanted.is_none_or(|w| actual == Some(w))
}

/// Case-insensitive substring check.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
