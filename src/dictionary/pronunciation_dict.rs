use std::cmp::Ordering;

use indexmap::map::{IntoIter, Iter, IterMut, Keys};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{FxBuildHasher, Pronunciations, SymbolSet, Word, WordSet};
use crate::error::{DictError, Result};

/// Insertion-ordered mapping from words to their pronunciations.
///
/// Word order survives every operation except the explicit word sort, so a
/// dictionary read from disk and written back keeps its layout. Removing a
/// word shifts the remaining ones down instead of swapping in the last entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PronunciationDict {
    words: IndexMap<Word, Pronunciations, FxBuildHasher>,
}

impl PronunciationDict {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dictionary with room for `capacity` words.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: IndexMap::with_capacity_and_hasher(capacity, FxBuildHasher::default()),
        }
    }

    /// Attach `pronunciations` to `word`, replacing any previous value.
    ///
    /// A new word is appended; an existing word keeps its position.
    pub fn insert(&mut self, word: Word, pronunciations: Pronunciations) -> Option<Pronunciations> {
        self.words.insert(word, pronunciations)
    }

    /// Pronunciations of `word`.
    pub fn get(&self, word: &str) -> Option<&Pronunciations> {
        self.words.get(word)
    }

    /// Mutable pronunciations of `word`.
    pub fn get_mut(&mut self, word: &str) -> Option<&mut Pronunciations> {
        self.words.get_mut(word)
    }

    /// Pronunciations of `word`, inserting an empty collection if absent.
    ///
    /// Callers must fill the collection before handing the dictionary on.
    pub fn entry_or_default(&mut self, word: Word) -> &mut Pronunciations {
        self.words.entry(word).or_default()
    }

    /// Detach `word`, keeping the order of the remaining words.
    pub fn remove(&mut self, word: &str) -> Option<Pronunciations> {
        self.words.shift_remove(word)
    }

    /// Keep only the words for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Word, &Pronunciations) -> bool,
    {
        self.words.retain(|word, pronunciations| keep(word, pronunciations));
    }

    /// Whether `word` is present.
    pub fn contains_word(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the dictionary holds no word.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate words in dictionary order.
    pub fn words(&self) -> Keys<'_, Word, Pronunciations> {
        self.words.keys()
    }

    /// Iterate `(word, pronunciations)` in dictionary order.
    pub fn iter(&self) -> Iter<'_, Word, Pronunciations> {
        self.words.iter()
    }

    /// Iterate `(word, pronunciations)` mutably in dictionary order.
    pub fn iter_mut(&mut self) -> IterMut<'_, Word, Pronunciations> {
        self.words.iter_mut()
    }

    /// Total number of pronunciations over all words.
    pub fn pronunciation_count(&self) -> usize {
        self.words.values().map(Pronunciations::len).sum()
    }

    /// Distinct symbols used anywhere in the dictionary, in first-seen order.
    pub fn phoneme_set(&self) -> SymbolSet {
        self.words
            .values()
            .flat_map(Pronunciations::symbols)
            .cloned()
            .collect()
    }

    /// Words in dictionary order.
    pub fn vocabulary(&self) -> WordSet {
        self.words.keys().cloned().collect()
    }

    /// Check every word against the rules the text parser enforces.
    ///
    /// A word needs at least one pronunciation, every pronunciation at least
    /// one non-empty symbol, and every weight must be finite and not negative.
    pub fn validate(&self) -> Result<()> {
        for (word, pronunciations) in &self.words {
            if pronunciations.is_empty() {
                return Err(DictError::EmptyPronunciations(word.clone()));
            }
            for (pronunciation, &weight) in pronunciations {
                if pronunciation.is_empty() || pronunciation.iter().any(|symbol| symbol.is_empty()) {
                    return Err(DictError::EmptyPronunciation(word.clone()));
                }
                if !weight.is_finite() || weight < 0.0 {
                    return Err(DictError::InvalidWeight {
                        word: word.clone(),
                        weight,
                    });
                }
            }
        }
        Ok(())
    }

    /// Stable sort of the words with a comparator over the word text.
    pub fn sort_words_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&Word, &Word) -> Ordering,
    {
        self.words.sort_by(|w1, _, w2, _| compare(w1, w2));
    }
}

impl PartialEq for PronunciationDict {
    fn eq(&self, other: &Self) -> bool {
        self.words.len() == other.words.len() && self.words.iter().eq(other.words.iter())
    }
}

impl FromIterator<(Word, Pronunciations)> for PronunciationDict {
    /// Later entries for a repeated word replace earlier ones.
    fn from_iter<I: IntoIterator<Item = (Word, Pronunciations)>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PronunciationDict {
    type Item = (Word, Pronunciations);
    type IntoIter = IntoIter<Word, Pronunciations>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.into_iter()
    }
}

impl<'a> IntoIterator for &'a PronunciationDict {
    type Item = (&'a Word, &'a Pronunciations);
    type IntoIter = Iter<'a, Word, Pronunciations>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}
