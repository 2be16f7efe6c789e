//! Pronunciation dictionary entity model.
//!
//! A [`PronunciationDict`] maps orthographic words to weighted sets of
//! pronunciations. Both levels are insertion-ordered: the order in which words
//! and pronunciations were first seen is part of the data (it decides which
//! pronunciation is "first", and it is what gets written back to disk).
//!
//! # Invariants
//!
//! - A word attached to the dictionary never has an empty [`Pronunciations`]
//!   collection. Operations that can empty a word resolve it through an
//!   [`EmptyPolicy`](crate::batch::EmptyPolicy) before committing.
//! - When two pronunciations become identical their weights are summed
//!   ([`Pronunciations::add`]), never overwritten.
//!
//! # Example
//!
//! ```rust
//! use pronunciation_dict_utils::dictionary::{PronunciationDict, Pronunciations};
//!
//! let mut pronunciations = Pronunciations::new();
//! pronunciations.add(vec!["T".into(), "EH1".into(), "S".into(), "T".into()], 1.0);
//! pronunciations.add(vec!["T".into(), "EH1".into(), "S".into(), "T".into()], 2.0);
//! assert_eq!(pronunciations.len(), 1);
//! assert_eq!(pronunciations.total_weight(), 3.0);
//!
//! let mut dictionary = PronunciationDict::new();
//! dictionary.insert("test".to_string(), pronunciations);
//! assert!(dictionary.contains_word("test"));
//! ```

mod pronunciation_dict;
mod pronunciations;

use std::hash::BuildHasherDefault;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHasher;

pub use pronunciation_dict::PronunciationDict;
pub use pronunciations::Pronunciations;

/// Orthographic dictionary key.
pub type Word = String;

/// One phoneme or character unit.
pub type Symbol = String;

/// Ordered sequence of symbols describing one way to pronounce a word.
///
/// Compared and hashed by content, so it can serve as a map key.
pub type Pronunciation = Vec<Symbol>;

/// Importance of a pronunciation: an integer count or a probability.
pub type Weight = f64;

/// Fx hashing for the ordered containers; keys are short strings.
pub type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// Insertion-ordered set of symbols.
///
/// Order matters for partial mapping, where each substring is replaced in
/// turn.
pub type SymbolSet = IndexSet<Symbol, FxBuildHasher>;

/// Insertion-ordered set of words.
pub type WordSet = IndexSet<Word, FxBuildHasher>;

/// Insertion-ordered symbol → replacement table (e.g. ARPAbet → IPA).
pub type MappingTable = IndexMap<Symbol, String, FxBuildHasher>;

/// Build a [`SymbolSet`] from anything yielding string-like items.
///
/// Duplicates are dropped; first occurrence wins.
pub fn symbol_set<I, S>(symbols: I) -> SymbolSet
where
    I: IntoIterator<Item = S>,
    S: Into<Symbol>,
{
    symbols.into_iter().map(Into::into).collect()
}

/// Build a [`Pronunciation`] from string-like items.
pub fn pronunciation<I, S>(symbols: I) -> Pronunciation
where
    I: IntoIterator<Item = S>,
    S: Into<Symbol>,
{
    symbols.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_set_keeps_first_seen_order() {
        let set = symbol_set(["e", "y", "e", "a"]);
        let order: Vec<&str> = set.iter().map(String::as_str).collect();
        assert_eq!(order, vec!["e", "y", "a"]);
    }

    #[test]
    fn test_pronunciation_builder() {
        assert_eq!(
            pronunciation(["AO2", "R"]),
            vec!["AO2".to_string(), "R".to_string()]
        );
    }
}
