#![allow(clippy::must_use_candidate)]

use scout_core::{FilterCategory, FilterValue, RawFilterMapping, RawFilterValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One entry of a category's value list after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterSlot {
    /// The category was not requested; the form default stays in place.
    Unconstrained,
    /// A concrete value to select.
    Value(FilterValue),
}

impl FilterSlot {
    pub fn value(&self) -> Option<&FilterValue> {
        match self {
            FilterSlot::Unconstrained => None,
            FilterSlot::Value(value) => Some(value),
        }
    }

    fn from_text(text: String) -> Option<Self> {
        FilterValue::new(text).ok().map(FilterSlot::Value)
    }
}

impl fmt::Display for FilterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSlot::Unconstrained => f.write_str("*"),
            FilterSlot::Value(value) => write!(f, "{value}"),
        }
    }
}

/// Every known category mapped to a non-empty, ordered list of slots.
pub type NormalizedFilters = BTreeMap<FilterCategory, Vec<FilterSlot>>;

/// Coerce a raw extractor mapping into one slot list per category.
///
/// Absent categories, blank values and empty lists become a single
/// [`FilterSlot::Unconstrained`]. List order is kept; blank list entries are
/// dropped.
pub fn normalize(raw: &RawFilterMapping) -> NormalizedFilters {
    FilterCategory::ALL
        .iter()
        .map(|&category| {
            let slots: Vec<FilterSlot> = match raw.get(&category) {
                None => Vec::new(),
                Some(RawFilterValue::One(text)) => {
                    FilterSlot::from_text(text.clone()).into_iter().collect()
                }
                Some(RawFilterValue::Many(items)) => items
                    .iter()
                    .cloned()
                    .filter_map(FilterSlot::from_text)
                    .collect(),
            };

            if slots.is_empty() {
                (category, vec![FilterSlot::Unconstrained])
            } else {
                (category, slots)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(v: &str) -> FilterSlot {
        FilterSlot::Value(FilterValue::new(v).unwrap())
    }

    #[test]
    fn test_every_category_present() {
        let normalized = normalize(&RawFilterMapping::new());
        assert_eq!(normalized.len(), FilterCategory::ALL.len());
        for slots in normalized.values() {
            assert_eq!(slots, &vec![FilterSlot::Unconstrained]);
        }
    }

    #[test]
    fn test_scalar_and_list() {
        let mut raw = RawFilterMapping::new();
        raw.insert(
            FilterCategory::Location,
            RawFilterValue::Many(vec!["Texas".to_string(), "Kansas".to_string()]),
        );
        raw.insert(
            FilterCategory::BreedType,
            RawFilterValue::One(" Red ".to_string()),
        );

        let normalized = normalize(&raw);
        assert_eq!(
            normalized[&FilterCategory::Location],
            vec![value("Texas"), value("Kansas")]
        );
        assert_eq!(normalized[&FilterCategory::Member], vec![FilterSlot::Unconstrained]);
        assert_eq!(normalized[&FilterCategory::BreedType], vec![value("Red")]);
    }

    #[test]
    fn test_blank_values_are_unconstrained() {
        let mut raw = RawFilterMapping::new();
        raw.insert(FilterCategory::Location, RawFilterValue::One("   ".to_string()));
        raw.insert(FilterCategory::Member, RawFilterValue::Many(vec![]));
        raw.insert(
            FilterCategory::BreedType,
            RawFilterValue::Many(vec![String::new(), "Boer".to_string()]),
        );

        let normalized = normalize(&raw);
        assert_eq!(normalized[&FilterCategory::Location], vec![FilterSlot::Unconstrained]);
        assert_eq!(normalized[&FilterCategory::Member], vec![FilterSlot::Unconstrained]);
        assert_eq!(normalized[&FilterCategory::BreedType], vec![value("Boer")]);
    }

    #[test]
    fn test_duplicates_kept_in_order() {
        let mut raw = RawFilterMapping::new();
        raw.insert(
            FilterCategory::Member,
            RawFilterValue::Many(vec!["B".to_string(), "A".to_string(), "B".to_string()]),
        );
        let normalized = normalize(&raw);
        assert_eq!(
            normalized[&FilterCategory::Member],
            vec![value("B"), value("A"), value("B")]
        );
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(FilterSlot::Unconstrained.to_string(), "*");
        assert_eq!(value("Kansas").to_string(), "Kansas");
    }
}
