//! Shared types used across herdscout.
//!
//! This module defines the search dimensions of the directory form, the
//! concrete filter sets submitted to it, and the rows it returns.

use crate::error::ScoutError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A search dimension of the directory form.
///
/// Declaration order is the category order used everywhere a deterministic
/// ordering is needed: combination planning, filter application, display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCategory {
    /// State or region the member is located in
    Location,
    /// Registry member name
    Member,
    /// Breed label, e.g. `(AR) - American Red`
    BreedType,
}

impl FilterCategory {
    /// Every category, in application order.
    pub const ALL: [FilterCategory; 3] = [Self::Location, Self::Member, Self::BreedType];

    /// Stable snake-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Member => "member",
            Self::BreedType => "breed_type",
        }
    }

    /// Resolve a key produced by the filter extractor.
    ///
    /// Accepts the extractor's own vocabulary (`state`, `breed`) as well as
    /// the category names.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "state" | "location" => Some(Self::Location),
            "member" => Some(Self::Member),
            "breed" | "breed_type" | "breed-type" => Some(Self::BreedType),
            _ => None,
        }
    }

    /// How a requested value is matched against the dropdown's option labels.
    ///
    /// Breed labels are compound (code plus name), so they match by substring.
    #[must_use]
    pub fn match_mode(self) -> MatchMode {
        match self {
            Self::Location | Self::Member => MatchMode::Exact,
            Self::BreedType => MatchMode::Contains,
        }
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Option matching strategy for a dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Whole label equal, ignoring case and surrounding whitespace
    Exact,
    /// Label contains the wanted text, ignoring case
    Contains,
}

impl MatchMode {
    /// Whether `option` satisfies `wanted` under this mode.
    #[must_use]
    pub fn matches(self, wanted: &str, option: &str) -> bool {
        let wanted = wanted.trim().to_lowercase();
        let option = option.trim().to_lowercase();
        match self {
            Self::Exact => option == wanted,
            Self::Contains => option.contains(&wanted),
        }
    }

    /// First option label in document order that satisfies `wanted`.
    #[must_use]
    pub fn find<'a>(self, wanted: &str, options: &'a [String]) -> Option<&'a str> {
        options
            .iter()
            .map(String::as_str)
            .find(|option| self.matches(wanted, option))
    }
}

/// A requested value within one category.
///
/// Always non-empty and trimmed; comparison against option labels is
/// case-insensitive (see [`MatchMode`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterValue(String);

impl FilterValue {
    /// Create a new `FilterValue`.
    ///
    /// # Errors
    /// Returns error if the value is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ScoutError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ScoutError::Validation(
                "filter value must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A category's value as produced by the filter extractor.
///
/// The extractor emits a list when several values were mentioned for a
/// category and a single string otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawFilterValue {
    /// A single value
    One(String),
    /// Several values, in the order they were mentioned
    Many(Vec<String>),
}

/// Extractor output: categories may be absent.
pub type RawFilterMapping = BTreeMap<FilterCategory, RawFilterValue>;

/// One concrete search: at most one value per category.
///
/// A missing category means the form's default ("any") is left in place.
/// The empty set is the unconstrained search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(BTreeMap<FilterCategory, FilterValue>);

impl FilterSet {
    /// Create the unconstrained filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, category: FilterCategory, value: FilterValue) -> Self {
        self.insert(category, value);
        self
    }

    /// Set the value for a category, replacing any previous one.
    pub fn insert(&mut self, category: FilterCategory, value: FilterValue) {
        self.0.insert(category, value);
    }

    /// Value requested for a category, if any.
    #[must_use]
    pub fn get(&self, category: FilterCategory) -> Option<&FilterValue> {
        self.0.get(&category)
    }

    /// Constrained categories in category order.
    pub fn iter(&self) -> impl Iterator<Item = (FilterCategory, &FilterValue)> {
        self.0.iter().map(|(category, value)| (*category, value))
    }

    /// Number of constrained categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the unconstrained search.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("{no filters}");
        }
        f.write_str("{")?;
        for (i, (category, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{category}: {value}")?;
        }
        f.write_str("}")
    }
}

/// One row of the directory results table.
///
/// Serialized field names are the directory's own column labels, which is
/// also the header of the exported CSV.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Action column (usually a "view" link label)
    #[serde(rename = "Action")]
    pub action: String,
    /// State / location
    #[serde(rename = "State")]
    pub location: String,
    /// Member name
    #[serde(rename = "Name")]
    pub name: String,
    /// Farm or organization
    #[serde(rename = "Farm")]
    pub organization: String,
    /// Phone number as displayed
    #[serde(rename = "Phone")]
    pub phone: String,
    /// Website link target, empty when the row has none
    #[serde(rename = "Website")]
    pub website_url: String,
}
