//! # pronunciation-dict-utils
//!
//! Bulk transformations for pronunciation dictionaries.
//!
//! A pronunciation dictionary maps words to one or more weighted
//! pronunciations, each a sequence of phoneme symbols (ARPAbet, IPA, ...).
//! This crate rewrites such dictionaries in place: translating symbol
//! inventories through mapping tables, rewriting symbol sequences with
//! regular expressions, stripping symbols, merging and normalizing weights,
//! and sorting. Dictionary-wide operations run on a rayon worker pool and
//! produce the same result whatever the pool shape.
//!
//! ## Example
//!
//! ```rust
//! use pronunciation_dict_utils::prelude::*;
//!
//! let mut dictionary = PronunciationDict::new();
//! dictionary.insert(
//!     "test".to_string(),
//!     Pronunciations::single(pronunciation(["T", "EH1", "S", "T"]), 1.0),
//! );
//!
//! let changed = map_symbols(
//!     &mut dictionary,
//!     &symbol_set(["EH1"]),
//!     &Replacement::Full(pronunciation(["ˈɛ"])),
//!     &MultiprocessingOptions::default(),
//! )
//! .unwrap();
//!
//! assert!(changed.contains("test"));
//! assert_eq!(
//!     dictionary.get("test").unwrap().first().unwrap().0,
//!     &pronunciation(["T", "ˈɛ", "S", "T"])
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod dictionary;
pub mod error;
pub mod mapping;
pub mod transform;

#[cfg(feature = "serialization")]
pub mod serialization;

/// CLI interface and utilities
#[cfg(feature = "cli")]
pub mod cli;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::batch::{BatchOutcome, EmptyPolicy, MultiprocessingOptions};
    pub use crate::dictionary::{
        pronunciation, symbol_set, MappingTable, Pronunciation, PronunciationDict,
        Pronunciations, Symbol, SymbolSet, Weight, Word, WordSet,
    };
    pub use crate::error::DictError;
    pub use crate::mapping::{resolve_mapping_table, MappingReport};
    pub use crate::transform::{
        change_word_casing, extract_subset, map_symbols, merge_dictionaries,
        merge_pronunciations, normalize_weights, remove_symbols_from_pronunciations,
        remove_symbols_from_vocabulary, remove_symbols_from_words,
        replace_symbols_in_pronunciations, select_single_pronunciation, sort_pronunciations,
        sort_words, CasingMode, CharSet, MergeMode, RemovalMode, Replacement, SelectionMode,
    };

    #[cfg(feature = "serialization")]
    pub use crate::serialization::{
        BincodeSerializer, DictionaryFormat, DictionarySerializer, JsonSerializer,
        PlainTextSerializer,
    };
}
