//! Frequency helpers shared by the reporters.
//!
//! Ties are resolved towards the smallest value so repeated runs over the
//! same rows always pick the same winner, whatever the row order.

use std::collections::BTreeMap;

use serde::Serialize;

/// A value and how many rows carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount<T> {
    pub value: T,
    pub count: usize,
}

impl<T> ValueCount<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValueCount<U> {
        ValueCount {
            value: f(self.value),
            count: self.count,
        }
    }
}

/// Most frequent value, or `None` when `values` is empty.
///
/// On equal counts the smallest value wins.
pub fn mode<T, I>(values: I) -> Option<ValueCount<T>>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut best: Option<ValueCount<T>> = None;
    for (value, count) in tally(values) {
        // Ascending key order: only a strictly higher count replaces.
        if best.as_ref().map_or(true, |b| count > b.count) {
            best = Some(ValueCount { value, count });
        }
    }
    best
}

/// Count every distinct value, most frequent first; equal counts keep
/// ascending value order.
pub fn value_counts<T, I>(values: I) -> Vec<ValueCount<T>>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut counts: Vec<ValueCount<T>> = tally(values)
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

fn tally<T, I>(values: I) -> BTreeMap<T, usize>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut map = BTreeMap::new();
    for value in values {
        *map.entry(value).or_insert(0) += 1;
    }
    map
}

// ── Tests ─────────────────────────────────────────────────────────────────────
