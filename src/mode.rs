//! Order-preserving frequency counting.
//!
//! Ties are always broken by first occurrence in iteration order, so the
//! same table yields the same answer on every run regardless of hashing.

use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// A distinct value together with how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counted<T> {
    pub value: T,
    pub count: usize,
}

/// Counts distinct values, keeping them in first-seen order.
fn tally<T, I>(values: I) -> Vec<Counted<T>>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut slots: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<Counted<T>> = Vec::new();

    for value in values {
        match slots.get(&value) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                slots.insert(value.clone(), counts.len());
                counts.push(Counted { value, count: 1 });
            }
        }
    }

    counts
}

/// The most frequent value, or `None` for empty input.
pub fn mode<T, I>(values: I) -> Option<Counted<T>>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    // a later value only wins when strictly more frequent
    tally(values).into_iter().fold(None, |best, c| match best {
        Some(b) if b.count >= c.count => Some(b),
        _ => Some(c),
    })
}

/// All distinct values by descending count; equal counts stay in first-seen order.
pub fn value_counts<T, I>(values: I) -> Vec<Counted<T>>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts = tally(values);
    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
