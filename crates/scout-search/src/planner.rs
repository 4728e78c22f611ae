//! Combination planning.
//!
//! Expands normalized per-category value lists into the Cartesian product of
//! concrete filter sets. Category order drives iteration order, with the
//! first category varying slowest, so identical input always yields the same
//! plan.

use crate::filter::{normalize, FilterSlot, NormalizedFilters};
use scout_core::{FilterCategory, FilterSet, RawFilterMapping};

/// Build the full plan from normalized filters.
///
/// Emits exactly the product of the slot-list lengths. Unconstrained slots
/// contribute no key, so the all-unconstrained tuple becomes the single empty
/// filter set. Duplicate values are not collapsed here.
#[must_use]
pub fn plan(filters: &NormalizedFilters) -> Vec<FilterSet> {
    let unconstrained = [FilterSlot::Unconstrained];
    let mut combinations = vec![FilterSet::new()];

    for category in FilterCategory::ALL {
        let slots = filters
            .get(&category)
            .filter(|slots| !slots.is_empty())
            .map_or(&unconstrained[..], Vec::as_slice);

        combinations = combinations
            .into_iter()
            .flat_map(|partial| {
                slots.iter().map(move |slot| match slot.value() {
                    Some(value) => partial.clone().with(category, value.clone()),
                    None => partial.clone(),
                })
            })
            .collect();
    }

    combinations
}

/// Normalize a raw extractor mapping and plan it.
#[must_use]
pub fn plan_from_raw(raw: &RawFilterMapping) -> Vec<FilterSet> {
    plan(&normalize(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::{FilterValue, RawFilterValue};

    fn v(s: &str) -> FilterValue {
        FilterValue::new(s).unwrap()
    }

    fn many(values: &[&str]) -> RawFilterValue {
        RawFilterValue::Many(values.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn test_two_locations_in_order() {
        let mut raw = RawFilterMapping::new();
        raw.insert(FilterCategory::Location, many(&["Texas", "Kansas"]));

        let plan = plan_from_raw(&raw);
        assert_eq!(
            plan,
            vec![
                FilterSet::new().with(FilterCategory::Location, v("Texas")),
                FilterSet::new().with(FilterCategory::Location, v("Kansas")),
            ]
        );
    }

    #[test]
    fn test_empty_mapping_yields_single_unconstrained_search() {
        let plan = plan_from_raw(&RawFilterMapping::new());
        assert_eq!(plan, vec![FilterSet::new()]);
    }

    #[test]
    fn test_product_size_and_order() {
        let mut raw = RawFilterMapping::new();
        raw.insert(FilterCategory::Location, many(&["Texas", "Kansas"]));
        raw.insert(FilterCategory::Member, many(&["A", "B", "C"]));
        raw.insert(FilterCategory::BreedType, many(&["Red", "Boer"]));

        let plan = plan_from_raw(&raw);
        assert_eq!(plan.len(), 12);

        // First category varies slowest, last fastest
        assert_eq!(
            plan[0],
            FilterSet::new()
                .with(FilterCategory::Location, v("Texas"))
                .with(FilterCategory::Member, v("A"))
                .with(FilterCategory::BreedType, v("Red"))
        );
        assert_eq!(plan[1].get(FilterCategory::BreedType), Some(&v("Boer")));
        assert_eq!(plan[2].get(FilterCategory::Member), Some(&v("B")));
        assert_eq!(plan[6].get(FilterCategory::Location), Some(&v("Kansas")));
        assert!(plan.iter().all(|set| set.len() == 3));
    }

    #[test]
    fn test_partial_constraints_omit_keys() {
        let mut raw = RawFilterMapping::new();
        raw.insert(FilterCategory::Member, many(&["A", "B"]));

        let plan = plan_from_raw(&raw);
        assert_eq!(plan.len(), 2);
        for set in &plan {
            assert_eq!(set.len(), 1);
            assert!(set.get(FilterCategory::Location).is_none());
            assert!(set.get(FilterCategory::BreedType).is_none());
        }
    }

    #[test]
    fn test_duplicate_values_not_collapsed() {
        let mut raw = RawFilterMapping::new();
        raw.insert(FilterCategory::Location, many(&["Texas", "Texas"]));
        assert_eq!(plan_from_raw(&raw).len(), 2);
    }

    #[test]
    fn test_missing_category_in_normalized_input() {
        let mut filters = NormalizedFilters::new();
        filters.insert(
            FilterCategory::BreedType,
            vec![FilterSlot::Value(v("Red")), FilterSlot::Unconstrained],
        );

        let plan = plan(&filters);
        assert_eq!(
            plan,
            vec![
                FilterSet::new().with(FilterCategory::BreedType, v("Red")),
                FilterSet::new(),
            ]
        );
    }

    #[test]
    fn test_plan_is_deterministic() {
        let mut raw = RawFilterMapping::new();
        raw.insert(FilterCategory::Location, many(&["Kansas", "Texas", "Oklahoma"]));
        raw.insert(FilterCategory::BreedType, many(&["Red", "Boer"]));

        let first = plan_from_raw(&raw);
        for _ in 0..5 {
            assert_eq!(plan_from_raw(&raw), first);
        }
    }
}
