//! Word casing unification.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::batch::{self, MultiprocessingOptions};
use crate::dictionary::{PronunciationDict, Word, WordSet};
use crate::error::{DictError, Result};

use super::weights::merge_pronunciations;

/// Target casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CasingMode {
    /// Lowercase every word.
    Lower,
    /// Uppercase every word.
    Upper,
}

impl CasingMode {
    /// `word` in this casing.
    pub fn apply(self, word: &str) -> String {
        match self {
            Self::Lower => word.to_lowercase(),
            Self::Upper => word.to_uppercase(),
        }
    }
}

impl fmt::Display for CasingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lower => "lower",
            Self::Upper => "upper",
        })
    }
}

impl FromStr for CasingMode {
    type Err = DictError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lower" => Ok(Self::Lower),
            "upper" => Ok(Self::Upper),
            _ => Err(DictError::invalid("mode", "Value needs to be 'lower' or 'upper'!")),
        }
    }
}

/// Words renamed or created by [`change_word_casing`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CasingOutcome {
    /// Original spellings that were taken out of the dictionary.
    pub removed: WordSet,
    /// New spellings that did not exist before.
    pub created: WordSet,
}

/// Rewrite every word in `mode` casing.
///
/// A word whose spelling changes is detached. If the new spelling is already
/// present, the pronunciations are merged into it with summed weights;
/// otherwise the new spelling is appended at the end of the dictionary.
pub fn change_word_casing(
    dictionary: &mut PronunciationDict,
    mode: CasingMode,
    options: &MultiprocessingOptions,
) -> Result<CasingOutcome> {
    let words: Vec<&Word> = dictionary.words().collect();
    let renames: Vec<(Word, Word)> = batch::collect_changes(&words, options, |word| {
        let cased = mode.apply(word);
        Ok((cased != **word).then(|| ((*word).clone(), cased)))
    })?;
    debug!(renames = renames.len(), %mode, "changing word casing");

    let mut outcome = CasingOutcome::default();
    for (word, cased) in renames {
        let Some(pronunciations) = dictionary.remove(&word) else {
            continue;
        };
        match dictionary.get_mut(&cased) {
            Some(existing) => {
                merge_pronunciations(existing, &pronunciations)?;
            }
            None => {
                dictionary.insert(cased.clone(), pronunciations);
                outcome.created.insert(cased);
            }
        }
        outcome.removed.insert(word);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{pronunciation, Pronunciations};

    #[test]
    fn test_lowercase_merges_into_existing() {
        let mut dict = PronunciationDict::new();
        dict.insert("Test".into(), Pronunciations::single(pronunciation(["t"]), 1.0));
        dict.insert("test".into(), Pronunciations::single(pronunciation(["t"]), 2.0));
        dict.insert("ABC".into(), Pronunciations::single(pronunciation(["a"]), 1.0));

        let outcome = change_word_casing(
            &mut dict,
            CasingMode::Lower,
            &MultiprocessingOptions::single_threaded(),
        )
        .unwrap();

        assert_eq!(outcome.removed.iter().collect::<Vec<_>>(), vec!["Test", "ABC"]);
        assert_eq!(outcome.created.iter().collect::<Vec<_>>(), vec!["abc"]);
        assert_eq!(dict.words().collect::<Vec<_>>(), vec!["test", "abc"]);
        assert_eq!(
            dict.get("test"),
            Some(&Pronunciations::single(pronunciation(["t"]), 3.0))
        );
    }

    #[test]
    fn test_lowercase_into_equal_pronunciations_keeps_weights() {
        let mut dict = PronunciationDict::new();
        dict.insert("Test".into(), Pronunciations::single(pronunciation(["t"]), 1.0));
        dict.insert("test".into(), Pronunciations::single(pronunciation(["t"]), 1.0));

        let outcome = change_word_casing(
            &mut dict,
            CasingMode::Lower,
            &MultiprocessingOptions::single_threaded(),
        )
        .unwrap();

        assert_eq!(outcome.removed.iter().collect::<Vec<_>>(), vec!["Test"]);
        assert!(outcome.created.is_empty());
        assert_eq!(
            dict.get("test"),
            Some(&Pronunciations::single(pronunciation(["t"]), 1.0))
        );
    }

    #[test]
    fn test_chained_renames() {
        // "Ab" and "aB" both lower to "ab", which does not exist yet.
        let mut dict = PronunciationDict::new();
        dict.insert("Ab".into(), Pronunciations::single(pronunciation(["x"]), 1.0));
        dict.insert("aB".into(), Pronunciations::single(pronunciation(["y"]), 1.0));
        let outcome = change_word_casing(
            &mut dict,
            CasingMode::Lower,
            &MultiprocessingOptions::single_threaded(),
        )
        .unwrap();
        assert_eq!(outcome.created.len(), 1);
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("ab").map(Pronunciations::len), Some(2));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("upper".parse::<CasingMode>().unwrap(), CasingMode::Upper);
        assert!("title".parse::<CasingMode>().is_err());
        assert_eq!(CasingMode::Upper.apply("straße"), "STRASSE");
    }
}
