//! Combining two dictionaries.

use std::fmt;
use std::str::FromStr;

use crate::dictionary::PronunciationDict;
use crate::error::{DictError, Result};

use super::weights::merge_pronunciations;

/// How words present in both dictionaries are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MergeMode {
    /// Only add words that are missing; existing words are untouched.
    #[default]
    Add,
    /// Overwrite existing words' pronunciations and add missing words.
    Replace,
    /// Merge pronunciations of shared words with summed weights and add
    /// missing words.
    Extend,
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Replace => "replace",
            Self::Extend => "extend",
        })
    }
}

impl FromStr for MergeMode {
    type Err = DictError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add" => Ok(Self::Add),
            "replace" => Ok(Self::Replace),
            "extend" => Ok(Self::Extend),
            _ => Err(DictError::invalid("mode", "Invalid value!")),
        }
    }
}

/// Merge `other` into `dictionary`. Returns whether anything changed.
///
/// Missing words are appended in `other`'s order.
pub fn merge_dictionaries(
    dictionary: &mut PronunciationDict,
    other: &PronunciationDict,
    mode: MergeMode,
) -> Result<bool> {
    let mut changed = false;
    for (word, pronunciations) in other {
        match dictionary.get_mut(word) {
            None => {
                dictionary.insert(word.clone(), pronunciations.clone());
                changed = true;
            }
            Some(existing) => match mode {
                MergeMode::Add => {}
                MergeMode::Replace => {
                    if existing != pronunciations {
                        *existing = pronunciations.clone();
                        changed = true;
                    }
                }
                MergeMode::Extend => {
                    changed |= merge_pronunciations(existing, pronunciations)?;
                }
            },
        }
    }
    Ok(changed)
}
