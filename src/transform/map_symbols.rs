//! Whole-symbol and in-symbol substitution.

use crate::batch::{self, EmptyPolicy, MultiprocessingOptions};
use crate::dictionary::{PronunciationDict, Pronunciations, Symbol, SymbolSet, WordSet};
use crate::error::{DictError, Result};

/// What a matched symbol is replaced with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// A symbol equal to one of the source symbols becomes this list of
    /// symbols. More than one entry expands the symbol (e.g. a diphthong into
    /// two phonemes).
    Full(Vec<Symbol>),
    /// Every occurrence of a source symbol inside a symbol's text is replaced
    /// by this string. `AO` → `ɔ` turns `AO1` into `ɔ1`.
    Partial(String),
}

impl Replacement {
    /// Full replacement from the whitespace-separated symbols of `text`.
    ///
    /// `"ˌe ɪ"` expands to two symbols. Empty tokens are dropped.
    pub fn full_from_text(text: &str) -> Self {
        Self::Full(text.split_whitespace().map(str::to_string).collect())
    }

    /// Reject empty replacements.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Full(symbols) if symbols.is_empty() => Err(DictError::invalid(
                "map_to",
                "At least one symbol needs to be passed!",
            )),
            Self::Full(symbols) if symbols.iter().any(String::is_empty) => Err(
                DictError::invalid("map_to", "Symbols must not be empty!"),
            ),
            Self::Partial(text) if text.is_empty() => {
                Err(DictError::invalid("map_to", "Value must not be empty!"))
            }
            _ => Ok(()),
        }
    }

    /// Whether this replacement rewrites text inside symbols.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial(_))
    }
}

pub(crate) fn validate_source_symbols(symbols: &SymbolSet) -> Result<()> {
    if symbols.is_empty() {
        return Err(DictError::invalid(
            "symbols",
            "At least one symbol needs to be passed!",
        ));
    }
    if symbols.iter().any(String::is_empty) {
        return Err(DictError::invalid("symbols", "Symbols must not be empty!"));
    }
    Ok(())
}

/// Replace each source substring of `symbol` in set order.
///
/// Later substrings see the output of earlier ones.
pub fn replace_str(symbol: &str, from: &SymbolSet, to: &str) -> String {
    let mut result = symbol.to_string();
    for needle in from {
        if result.contains(needle.as_str()) {
            result = result.replace(needle.as_str(), to);
        }
    }
    result
}

/// Full-mode mapping of one pronunciation collection.
///
/// Colliding results have their weights summed. Keys are never dropped, even
/// if a pronunciation ends up empty.
pub fn map_pronunciations_full(
    pronunciations: &Pronunciations,
    from: &SymbolSet,
    to: &[Symbol],
) -> Pronunciations {
    pronunciations
        .iter()
        .map(|(pronunciation, weight)| {
            let mut mapped = Vec::with_capacity(pronunciation.len());
            for symbol in pronunciation {
                if from.contains(symbol) {
                    mapped.extend(to.iter().cloned());
                } else {
                    mapped.push(symbol.clone());
                }
            }
            (mapped, *weight)
        })
        .collect()
}

/// Partial-mode mapping of one pronunciation collection.
pub fn map_pronunciations_partial(
    pronunciations: &Pronunciations,
    from: &SymbolSet,
    to: &str,
) -> Pronunciations {
    pronunciations
        .iter()
        .map(|(pronunciation, weight)| {
            let mapped = pronunciation
                .iter()
                .map(|symbol| replace_str(symbol, from, to))
                .collect();
            (mapped, *weight)
        })
        .collect()
}

/// Map one pronunciation collection according to `replacement`.
pub fn map_pronunciations(
    pronunciations: &Pronunciations,
    from: &SymbolSet,
    replacement: &Replacement,
) -> Pronunciations {
    match replacement {
        Replacement::Full(to) => map_pronunciations_full(pronunciations, from, to),
        Replacement::Partial(to) => map_pronunciations_partial(pronunciations, from, to),
    }
}

/// Map `from` symbols to `replacement` in every pronunciation of `dictionary`.
///
/// Returns the words whose pronunciations changed.
///
/// # Example
///
/// ```rust
/// use pronunciation_dict_utils::prelude::*;
///
/// let mut dictionary = PronunciationDict::new();
/// dictionary.insert(
///     "sun".to_string(),
///     Pronunciations::single(pronunciation(["S", "AH1", "N"]), 1.0),
/// );
///
/// let changed = map_symbols(
///     &mut dictionary,
///     &symbol_set(["AH0", "AH1"]),
///     &Replacement::Full(pronunciation(["ʌ"])),
///     &MultiprocessingOptions::single_threaded(),
/// )
/// .unwrap();
///
/// assert_eq!(changed.len(), 1);
/// assert_eq!(
///     dictionary.get("sun").unwrap().first().unwrap().0,
///     &pronunciation(["S", "ʌ", "N"])
/// );
/// ```
pub fn map_symbols(
    dictionary: &mut PronunciationDict,
    from: &SymbolSet,
    replacement: &Replacement,
    options: &MultiprocessingOptions,
) -> Result<WordSet> {
    validate_source_symbols(from)?;
    replacement.validate()?;

    let outcome = batch::run_batch(dictionary, options, &EmptyPolicy::Remove, |_, pronunciations| {
        let mapped = map_pronunciations(pronunciations, from, replacement);
        Ok(batch::changed_or_none(pronunciations, mapped))
    })?;
    Ok(outcome.changed)
}
