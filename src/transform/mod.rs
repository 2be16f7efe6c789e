//! Dictionary transformations.
//!
//! Each submodule exposes a pure per-word function (usable on a single
//! [`Pronunciations`](crate::dictionary::Pronunciations) value) and a
//! dictionary-wide entry point that runs it through the
//! [`batch`](crate::batch) orchestrator.
//!
//! | Module | Operation |
//! |--------|-----------|
//! | [`map_symbols`] | full-token and substring symbol mapping |
//! | [`pattern`] | regex rewriting over joined pronunciations |
//! | [`remove_symbols`] | positional symbol removal |
//! | [`weights`] | weight merging and normalization |
//! | [`sorting`] | pronunciation and word ordering |
//! | [`selection`] | single-pronunciation selection |
//! | [`casing`] | word casing unification |
//! | [`merging`] | dictionary merging |
//! | [`words`] | character removal from words, subset extraction |

pub mod casing;
pub mod map_symbols;
pub mod merging;
pub mod pattern;
pub mod remove_symbols;
pub mod selection;
pub mod sorting;
pub mod weights;
pub mod words;

pub use casing::{change_word_casing, CasingMode, CasingOutcome};
pub use map_symbols::{
    map_pronunciations, map_pronunciations_full, map_pronunciations_partial, map_symbols,
    replace_str, Replacement,
};
pub use merging::{merge_dictionaries, MergeMode};
pub use pattern::{
    compile_pattern, replace_in_pronunciation, replace_in_pronunciations,
    replace_symbols_in_pronunciations,
};
pub use remove_symbols::{
    remove_symbols_from_pronunciations, remove_symbols_from_pronunciations_entry, RemovalMode,
};
pub use selection::{select_pronunciation, select_single_pronunciation, SelectionMode};
pub use sorting::{sort_pronunciations, sort_words, sorted_pronunciations};
pub use weights::{merge_pronunciations, normalize_pronunciation_weights, normalize_weights};
pub use words::{
    extract_subset, remove_symbols_from_vocabulary, remove_symbols_from_words, strip_word,
    CharSet, WordRemovalOutcome,
};
