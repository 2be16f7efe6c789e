use std::cmp::Ordering;

use indexmap::map::{IntoIter, Iter, Keys};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{FxBuildHasher, Pronunciation, Symbol, Weight};

/// Insertion-ordered collection of weighted pronunciations for one word.
///
/// Keys are unique. [`add`](Self::add) sums weights when a key is already
/// present, which is how every transformation keeps the total weight of a word
/// intact when two pronunciations collapse into one.
///
/// Equality is order-sensitive: the same entries in a different order compare
/// unequal. Sorting relies on this to report whether anything moved.
///
/// Serialized as an ordered list of `[pronunciation, weight]` pairs; repeated
/// pronunciations in the input are merged on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(
    from = "Vec<(Pronunciation, Weight)>",
    into = "Vec<(Pronunciation, Weight)>"
)]
pub struct Pronunciations {
    entries: IndexMap<Pronunciation, Weight, FxBuildHasher>,
}

impl Pronunciations {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collection with room for `capacity` pronunciations.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity_and_hasher(capacity, FxBuildHasher::default()),
        }
    }

    /// Create a collection holding exactly one pronunciation.
    pub fn single(pronunciation: Pronunciation, weight: Weight) -> Self {
        let mut result = Self::with_capacity(1);
        result.entries.insert(pronunciation, weight);
        result
    }

    /// Add `weight` to `pronunciation`, inserting it at the end if new.
    pub fn add(&mut self, pronunciation: Pronunciation, weight: Weight) {
        match self.entries.get_mut(&pronunciation) {
            Some(existing) => *existing += weight,
            None => {
                self.entries.insert(pronunciation, weight);
            }
        }
    }

    /// Set the weight of `pronunciation`, returning the previous weight.
    ///
    /// An existing key keeps its position.
    pub fn insert(&mut self, pronunciation: Pronunciation, weight: Weight) -> Option<Weight> {
        self.entries.insert(pronunciation, weight)
    }

    /// Weight of `pronunciation`, if present.
    pub fn get(&self, pronunciation: &[Symbol]) -> Option<Weight> {
        self.entries.get(pronunciation).copied()
    }

    /// Whether `pronunciation` is present.
    pub fn contains(&self, pronunciation: &[Symbol]) -> bool {
        self.entries.contains_key(pronunciation)
    }

    /// Number of pronunciations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection holds no pronunciation.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(pronunciation, weight)` pairs in insertion order.
    pub fn iter(&self) -> Iter<'_, Pronunciation, Weight> {
        self.entries.iter()
    }

    /// Iterate pronunciations in insertion order.
    pub fn pronunciations(&self) -> Keys<'_, Pronunciation, Weight> {
        self.entries.keys()
    }

    /// Iterate every symbol of every pronunciation.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.entries.keys().flatten()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> Weight {
        self.entries.values().sum()
    }

    /// First pronunciation in insertion order.
    pub fn first(&self) -> Option<(&Pronunciation, Weight)> {
        self.entries.first().map(|(p, w)| (p, *w))
    }

    /// Last pronunciation in insertion order.
    pub fn last(&self) -> Option<(&Pronunciation, Weight)> {
        self.entries.last().map(|(p, w)| (p, *w))
    }

    /// Pronunciation at position `index` in insertion order.
    pub fn get_index(&self, index: usize) -> Option<(&Pronunciation, Weight)> {
        self.entries.get_index(index).map(|(p, w)| (p, *w))
    }

    /// Stable sort of the entries with a comparator over `(pronunciation, weight)`.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut((&Pronunciation, Weight), (&Pronunciation, Weight)) -> Ordering,
    {
        self.entries
            .sort_by(|p1, w1, p2, w2| compare((p1, *w1), (p2, *w2)));
    }
}

impl PartialEq for Pronunciations {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().eq(other.entries.iter())
    }
}

impl FromIterator<(Pronunciation, Weight)> for Pronunciations {
    fn from_iter<I: IntoIterator<Item = (Pronunciation, Weight)>>(iter: I) -> Self {
        let mut result = Self::new();
        result.extend(iter);
        result
    }
}

impl Extend<(Pronunciation, Weight)> for Pronunciations {
    fn extend<I: IntoIterator<Item = (Pronunciation, Weight)>>(&mut self, iter: I) {
        for (pronunciation, weight) in iter {
            self.add(pronunciation, weight);
        }
    }
}

impl From<Vec<(Pronunciation, Weight)>> for Pronunciations {
    fn from(entries: Vec<(Pronunciation, Weight)>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<Pronunciations> for Vec<(Pronunciation, Weight)> {
    fn from(pronunciations: Pronunciations) -> Self {
        pronunciations.entries.into_iter().collect()
    }
}

impl IntoIterator for Pronunciations {
    type Item = (Pronunciation, Weight);
    type IntoIter = IntoIter<Pronunciation, Weight>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Pronunciations {
    type Item = (&'a Pronunciation, &'a Weight);
    type IntoIter = Iter<'a, Pronunciation, Weight>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::pronunciation;

    #[test]
    fn test_add_sums_weights_on_collision() {
        let mut p = Pronunciations::new();
        p.add(pronunciation(["a"]), 2.0);
        p.add(pronunciation(["b"]), 3.0);
        p.add(pronunciation(["a"]), 4.0);

        assert_eq!(p.len(), 2);
        assert_eq!(p.get(&pronunciation(["a"])), Some(6.0));
        assert_eq!(p.first(), Some((&pronunciation(["a"]), 6.0)));
        assert_eq!(p.last(), Some((&pronunciation(["b"]), 3.0)));
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut p: Pronunciations = vec![
            (pronunciation(["a"]), 1.0),
            (pronunciation(["b"]), 1.0),
        ]
        .into();
        assert_eq!(p.insert(pronunciation(["a"]), 5.0), Some(1.0));
        assert_eq!(p.get_index(0), Some((&pronunciation(["a"]), 5.0)));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let p1: Pronunciations = vec![
            (pronunciation(["a"]), 1.0),
            (pronunciation(["b"]), 2.0),
        ]
        .into();
        let p2: Pronunciations = vec![
            (pronunciation(["b"]), 2.0),
            (pronunciation(["a"]), 1.0),
        ]
        .into();
        assert_ne!(p1, p2);
        assert_eq!(p1, p1.clone());
    }

    #[test]
    fn test_from_vec_merges_duplicates() {
        let p: Pronunciations = vec![
            (pronunciation(["x", "y"]), 1.0),
            (pronunciation(["x", "y"]), 1.5),
        ]
        .into();
        assert_eq!(p.len(), 1);
        assert_eq!(p.total_weight(), 2.5);
    }

    #[test]
    fn test_symbols_flattens_in_order() {
        let p: Pronunciations = vec![
            (pronunciation(["a", "b"]), 1.0),
            (pronunciation(["c"]), 1.0),
        ]
        .into();
        let symbols: Vec<&str> = p.symbols().map(String::as_str).collect();
        assert_eq!(symbols, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_json_roundtrip_keeps_order() {
        let p: Pronunciations = vec![
            (pronunciation(["b"]), 2.0),
            (pronunciation(["a"]), 1.0),
        ]
        .into();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"[[["b"],2.0],[["a"],1.0]]"#);
        let loaded: Pronunciations = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, p);
    }
}
