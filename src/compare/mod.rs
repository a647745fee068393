pub mod natural;

pub use natural::{compare, NaturalKey};

use std::cmp::Ordering;

/// Natural-order comparator used for tree children and list sorting
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrderComparator;

impl NaturalOrderComparator {
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        natural::compare(a, b)
    }

    /// Sort any slice by a string projection
    pub fn sort_by_key<T, F>(&self, items: &mut [T], key: F)
    where
        F: Fn(&T) -> &str,
    {
        items.sort_by_cached_key(|item| NaturalKey::new(key(item)));
    }
}
