//! Cross-combination merge of retrieved records.

use scout_core::ResultRecord;
use std::collections::HashSet;

/// Concatenate per-combination record sequences and drop exact duplicates.
///
/// The first occurrence of a record wins; relative order of the remaining
/// records follows the input order.
#[must_use]
pub fn aggregate<'a, I>(sequences: I) -> Vec<ResultRecord>
where
    I: IntoIterator<Item = &'a [ResultRecord]>,
{
    let mut seen = HashSet::new();
    let mut dataset = Vec::new();

    for record in sequences.into_iter().flatten() {
        if seen.insert(record) {
            dataset.push(record.clone());
        }
    }

    dataset
}
