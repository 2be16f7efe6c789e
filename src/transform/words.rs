//! Operations on the words themselves rather than their pronunciations.

use indexmap::IndexSet;

use crate::batch::{self, MultiprocessingOptions};
use crate::dictionary::{FxBuildHasher, PronunciationDict, Word, WordSet};
use crate::error::{DictError, Result};

use super::remove_symbols::RemovalMode;
use super::weights::merge_pronunciations;

/// Set of characters to strip from words.
pub type CharSet = IndexSet<char, FxBuildHasher>;

/// `word` with the characters of `chars` stripped according to `mode`.
pub fn strip_word(word: &str, chars: &CharSet, mode: RemovalMode) -> String {
    mode.apply(word.chars(), |c| chars.contains(c)).collect()
}

fn validate_chars(chars: &CharSet) -> Result<()> {
    if chars.is_empty() {
        return Err(DictError::invalid(
            "symbols",
            "At least one symbol needs to be passed!",
        ));
    }
    Ok(())
}

fn renamed_words<'a>(
    words: &[&'a Word],
    chars: &CharSet,
    mode: RemovalMode,
    options: &MultiprocessingOptions,
) -> Result<Vec<(&'a Word, Word)>> {
    batch::collect_changes(words, options, |&word| {
        let stripped = strip_word(word, chars, mode);
        Ok((stripped != *word).then_some((word, stripped)))
    })
}

/// Words affected by [`remove_symbols_from_words`] or
/// [`remove_symbols_from_vocabulary`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordRemovalOutcome {
    /// Words that lost all their characters and were dropped.
    pub removed_entirely: WordSet,
    /// Every word whose spelling changed, dropped words included.
    pub changed: WordSet,
}

/// Strip `chars` from the words of `dictionary`.
///
/// A word that becomes empty is removed. A renamed word is appended at the
/// end, or merged with summed weights into an existing word of the same
/// spelling.
pub fn remove_symbols_from_words(
    dictionary: &mut PronunciationDict,
    chars: &CharSet,
    mode: RemovalMode,
    options: &MultiprocessingOptions,
) -> Result<WordRemovalOutcome> {
    validate_chars(chars)?;
    let words: Vec<&Word> = dictionary.words().collect();
    let renames: Vec<(Word, Word)> = renamed_words(&words, chars, mode, options)?
        .into_iter()
        .map(|(word, stripped)| (word.clone(), stripped))
        .collect();

    let mut outcome = WordRemovalOutcome::default();
    for (word, stripped) in renames {
        let Some(pronunciations) = dictionary.remove(&word) else {
            continue;
        };
        if stripped.is_empty() {
            outcome.removed_entirely.insert(word.clone());
        } else if let Some(existing) = dictionary.get_mut(&stripped) {
            merge_pronunciations(existing, &pronunciations)?;
        } else {
            dictionary.insert(stripped, pronunciations);
        }
        outcome.changed.insert(word);
    }
    Ok(outcome)
}

/// Strip `chars` from every word of `vocabulary`.
///
/// The vocabulary is rebuilt in its original order with each word replaced
/// by its stripped form; empty results are dropped and duplicates collapse.
pub fn remove_symbols_from_vocabulary(
    vocabulary: &mut WordSet,
    chars: &CharSet,
    mode: RemovalMode,
    options: &MultiprocessingOptions,
) -> Result<WordRemovalOutcome> {
    validate_chars(chars)?;
    let words: Vec<&Word> = vocabulary.iter().collect();
    let renames: Vec<(Word, Word)> = renamed_words(&words, chars, mode, options)?
        .into_iter()
        .map(|(word, stripped)| (word.clone(), stripped))
        .collect();
    if renames.is_empty() {
        return Ok(WordRemovalOutcome::default());
    }

    let mut outcome = WordRemovalOutcome::default();
    let mut renames = renames.into_iter().peekable();
    let mut rebuilt = WordSet::with_capacity_and_hasher(vocabulary.len(), FxBuildHasher::default());
    for word in vocabulary.drain(..) {
        match renames.next_if(|(renamed, _)| *renamed == word) {
            Some((_, stripped)) => {
                if stripped.is_empty() {
                    outcome.removed_entirely.insert(word.clone());
                } else {
                    rebuilt.insert(stripped);
                }
                outcome.changed.insert(word);
            }
            None => {
                rebuilt.insert(word);
            }
        }
    }
    *vocabulary = rebuilt;
    Ok(outcome)
}

/// Keep only the words of `dictionary` that appear in `vocabulary`.
///
/// Dictionary order is kept. Returns the number of words removed.
pub fn extract_subset(dictionary: &mut PronunciationDict, vocabulary: &WordSet) -> usize {
    let before = dictionary.len();
    dictionary.retain(|word, _| vocabulary.contains(word));
    before - dictionary.len()
}
