//! Ordering of pronunciations and words.

use std::cmp::Ordering;

use crate::batch::{self, EmptyPolicy, MultiprocessingOptions};
use crate::dictionary::{Pronunciation, PronunciationDict, Pronunciations, Weight, Word, WordSet};
use crate::error::Result;

fn compare_pronunciations(
    (p1, w1): (&Pronunciation, Weight),
    (p2, w2): (&Pronunciation, Weight),
    ignore_weight: bool,
) -> Ordering {
    if ignore_weight {
        p1.cmp(p2)
    } else {
        w2.total_cmp(&w1).then_with(|| p1.cmp(p2))
    }
}

/// Sorted copy of `pronunciations`.
///
/// The default order is by pronunciation when `ignore_weight`, otherwise by
/// highest weight first with ties broken by pronunciation. `descending`
/// reverses that whole order: lowest weight first, and ties in reverse
/// pronunciation order.
pub fn sorted_pronunciations(
    pronunciations: &Pronunciations,
    descending: bool,
    ignore_weight: bool,
) -> Pronunciations {
    let mut sorted = pronunciations.clone();
    sorted.sort_by(|a, b| {
        let ordering = compare_pronunciations(a, b, ignore_weight);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    sorted
}

/// Sort the pronunciations of every word.
///
/// Returns the words whose pronunciation order changed.
pub fn sort_pronunciations(
    dictionary: &mut PronunciationDict,
    descending: bool,
    ignore_weight: bool,
    options: &MultiprocessingOptions,
) -> Result<WordSet> {
    let outcome = batch::run_batch(dictionary, options, &EmptyPolicy::Remove, |_, pronunciations| {
        let sorted = sorted_pronunciations(pronunciations, descending, ignore_weight);
        Ok(batch::changed_or_none(pronunciations, sorted))
    })?;
    Ok(outcome.changed)
}

fn word_key(word: &Word, consider_case: bool) -> (String, &Word) {
    if consider_case {
        (String::new(), word)
    } else {
        (word.to_lowercase(), word)
    }
}

/// Sort the words of `dictionary`.
///
/// Case-insensitive unless `consider_case`; words equal after lowercasing
/// keep a stable order by their original spelling. Returns whether the order
/// changed.
pub fn sort_words(dictionary: &mut PronunciationDict, descending: bool, consider_case: bool) -> bool {
    let before: Vec<Word> = dictionary.words().cloned().collect();
    dictionary.sort_words_by(|w1, w2| {
        let ordering = word_key(w1, consider_case).cmp(&word_key(w2, consider_case));
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    !dictionary.words().eq(before.iter())
}
