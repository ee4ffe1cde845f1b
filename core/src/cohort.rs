//! Cohort partitioning.
//!
//! A cohort is the set of active items sharing the exact same values on
//! the variant's grouping fields. Key values are taken verbatim; a missing
//! value is its own key, not a wildcard.

use crate::item::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A categorical column an item can be grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupField {
    Department,
    ItemType,
}

impl GroupField {
    pub fn value_of<'a>(&self, item: &'a Item) -> Option<&'a str> {
        match self {
            GroupField::Department => item.department.as_deref(),
            GroupField::ItemType => item.item_type.as_deref(),
        }
    }
}

/// Tag text for a missing key value.
pub const NULL_TAG: &str = "(null)";

/// Cohort identity: the raw key tuple, in grouping-field order.
/// `None` orders before any value, which keeps iteration deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CohortKey(pub Vec<Option<String>>);

impl CohortKey {
    pub fn for_item(item: &Item, fields: &[GroupField]) -> Self {
        CohortKey(
            fields
                .iter()
                .map(|f| f.value_of(item).map(str::to_string))
                .collect(),
        )
    }

    /// Display tag, e.g. "Kaffe/Bønner". Only for output rows. A missing
    /// value renders as `NULL_TAG` so it stays distinct from an empty one.
    pub fn tag(&self) -> String {
        self.0
            .iter()
            .map(|v| v.as_deref().unwrap_or(NULL_TAG))
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Partition items into cohorts. Every item lands in exactly one cohort
/// and no cohort is empty.
pub fn partition<'a, I>(items: I, fields: &[GroupField]) -> BTreeMap<CohortKey, Vec<&'a Item>>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut cohorts: BTreeMap<CohortKey, Vec<&'a Item>> = BTreeMap::new();
    for item in items {
        cohorts
            .entry(CohortKey::for_item(item, fields))
            .or_default()
            .push(item);
    }
    cohorts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, dept: Option<&str>, kind: Option<&str>) -> Item {
        Item {
            item_id: id.into(),
            status: "Aktiv".into(),
            department: dept.map(Into::into),
            item_type: kind.map(Into::into),
            volume: 1.0,
            monetary_value: 1.0,
            activity_count: 1,
            age_days: 10.0,
        }
    }

    #[test]
    fn missing_key_forms_its_own_cohort() {
        let items = vec![
            item("1", Some("Kaffe"), Some("Bønner")),
            item("2", Some("Kaffe"), None),
            item("3", Some("Kaffe"), Some("Bønner")),
        ];
        let cohorts = partition(&items, &[GroupField::Department, GroupField::ItemType]);
        assert_eq!(cohorts.len(), 2);

        let null_key = CohortKey(vec![Some("Kaffe".into()), None]);
        assert_eq!(cohorts[&null_key].len(), 1);
        assert_eq!(null_key.tag(), "Kaffe/(null)");
    }

    #[test]
    fn null_and_empty_keys_render_differently() {
        let items = vec![
            item("1", Some("Kaffe"), None),
            item("2", Some("Kaffe"), Some("")),
        ];
        let cohorts = partition(&items, &[GroupField::Department, GroupField::ItemType]);
        let tags: Vec<String> = cohorts.keys().map(CohortKey::tag).collect();
        assert_eq!(tags, ["Kaffe/(null)", "Kaffe/"]);
    }

    #[test]
    fn single_field_ignores_the_other() {
        let items = vec![
            item("1", Some("Kaffe"), Some("Bønner")),
            item("2", Some("Kaffe"), Some("Formalet")),
        ];
        let cohorts = partition(&items, &[GroupField::Department]);
        assert_eq!(cohorts.len(), 1);
        assert_eq!(cohorts.keys().next().map(CohortKey::tag).as_deref(), Some("Kaffe"));
    }
}
