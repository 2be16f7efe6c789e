//! Batch orchestration of per-word transformations.
//!
//! Every dictionary-wide operation follows the same two phases:
//!
//! 1. **Compute.** A rayon pool runs a per-word function over a read-only
//!    borrow of the dictionary. Workers never mutate anything; each returns
//!    `Some(new_pronunciations)` for a changed word or `None` otherwise.
//! 2. **Apply.** Results are collected in dictionary order and written back
//!    sequentially. Empty results go through an [`EmptyPolicy`].
//!
//! A word's update never depends on another word's pronunciations, so the
//! final dictionary does not depend on scheduling. The first error raised by
//! any worker aborts the batch before anything is applied.

mod options;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::dictionary::{PronunciationDict, Pronunciations, Symbol, Weight, Word, WordSet};
use crate::error::{DictError, Result};

pub use options::{MultiprocessingOptions, DEFAULT_CHUNKSIZE};

/// Weight given to the placeholder pronunciation of an emptied word.
pub const DEFAULT_EMPTY_WEIGHT: Weight = 1.0;

/// What happens to a word whose pronunciations all vanished.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EmptyPolicy {
    /// Detach the word from the dictionary.
    #[default]
    Remove,
    /// Keep the word with the single pronunciation `(symbol)` weighted
    /// [`DEFAULT_EMPTY_WEIGHT`].
    KeepWith(Symbol),
}

impl EmptyPolicy {
    /// Build the policy from the CLI-style `keep_empty` flag and symbol.
    pub fn from_flag(keep_empty: bool, empty_symbol: Option<Symbol>) -> Result<Self> {
        let policy = match (keep_empty, empty_symbol) {
            (false, _) => Self::Remove,
            (true, Some(symbol)) => Self::KeepWith(symbol),
            (true, None) => {
                return Err(DictError::invalid(
                    "empty_symbol",
                    "A symbol is required when keeping empty words!",
                ))
            }
        };
        policy.validate()?;
        Ok(policy)
    }

    /// The placeholder symbol must be non-empty and free of whitespace.
    pub fn validate(&self) -> Result<()> {
        if let Self::KeepWith(symbol) = self {
            if symbol.is_empty() || symbol.chars().any(char::is_whitespace) {
                return Err(DictError::invalid(
                    "empty_symbol",
                    "Value needs to be a non-empty symbol without whitespace!",
                ));
            }
        }
        Ok(())
    }
}

/// Words touched by a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Every word whose entry changed, removed words included.
    pub changed: WordSet,
    /// Words detached from the dictionary.
    pub removed: WordSet,
}

impl BatchOutcome {
    /// Number of changed words.
    pub fn changed_count(&self) -> usize {
        self.changed.len()
    }

    /// Whether nothing changed.
    pub fn is_unchanged(&self) -> bool {
        self.changed.is_empty()
    }
}

fn build_pool(options: &MultiprocessingOptions) -> Result<ThreadPool> {
    Ok(ThreadPoolBuilder::new()
        .num_threads(options.n_jobs)
        .thread_name(|index| format!("dict-worker-{}", index))
        .build()?)
}

/// Run `process` over `items` on worker pools and keep the `Some` results.
///
/// Results come back in input order. With `maxtasksperchild` set the items
/// are split into generations, each run on a freshly built pool. The first
/// error stops the run.
pub fn collect_changes<T, U, F>(
    items: &[T],
    options: &MultiprocessingOptions,
    process: F,
) -> Result<Vec<U>>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> Result<Option<U>> + Sync,
{
    options.validate()?;
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let generation_len = options.generation_len().unwrap_or(items.len());

    let mut changes = Vec::new();
    for (generation, slice) in items.chunks(generation_len).enumerate() {
        let pool = build_pool(options)?;
        debug!(
            generation,
            items = slice.len(),
            n_jobs = options.n_jobs,
            chunksize = options.chunksize,
            "processing batch"
        );

        let chunks: Vec<Vec<U>> = pool.install(|| {
            slice
                .par_chunks(options.chunksize)
                .map(|chunk| -> Result<Vec<U>> {
                    let mut changed = Vec::new();
                    for item in chunk {
                        if let Some(result) = process(item)? {
                            changed.push(result);
                        }
                    }
                    Ok(changed)
                })
                .collect::<Result<_>>()
        })?;

        changes.extend(chunks.into_iter().flatten());
    }

    debug!(changes = changes.len(), "collected changes");
    Ok(changes)
}

/// Run `transform` over every word of `dictionary` and collect the changes.
///
/// `transform` receives a word and its current pronunciations and returns
/// `Ok(None)` when the word is unchanged. Results come back in dictionary
/// order.
pub fn compute_updates<F>(
    dictionary: &PronunciationDict,
    options: &MultiprocessingOptions,
    transform: F,
) -> Result<Vec<(Word, Pronunciations)>>
where
    F: Fn(&Word, &Pronunciations) -> Result<Option<Pronunciations>> + Sync,
{
    let entries: Vec<(&Word, &Pronunciations)> = dictionary.iter().collect();
    collect_changes(&entries, options, |&(word, pronunciations)| {
        Ok(transform(word, pronunciations)?.map(|updated| (word.clone(), updated)))
    })
}

/// Write collected updates back into `dictionary`.
///
/// Non-empty results replace the word's pronunciations in place. Empty
/// results are resolved by `empty_policy`.
pub fn apply_updates(
    dictionary: &mut PronunciationDict,
    updates: Vec<(Word, Pronunciations)>,
    empty_policy: &EmptyPolicy,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (word, pronunciations) in updates {
        if pronunciations.is_empty() {
            match empty_policy {
                EmptyPolicy::Remove => {
                    dictionary.remove(&word);
                    outcome.removed.insert(word.clone());
                }
                EmptyPolicy::KeepWith(symbol) => {
                    dictionary.insert(
                        word.clone(),
                        Pronunciations::single(vec![symbol.clone()], DEFAULT_EMPTY_WEIGHT),
                    );
                }
            }
        } else {
            dictionary.insert(word.clone(), pronunciations);
        }
        outcome.changed.insert(word);
    }

    outcome
}

/// [`compute_updates`] followed by [`apply_updates`].
pub fn run_batch<F>(
    dictionary: &mut PronunciationDict,
    options: &MultiprocessingOptions,
    empty_policy: &EmptyPolicy,
    transform: F,
) -> Result<BatchOutcome>
where
    F: Fn(&Word, &Pronunciations) -> Result<Option<Pronunciations>> + Sync,
{
    empty_policy.validate()?;
    let updates = compute_updates(dictionary, options, transform)?;
    Ok(apply_updates(dictionary, updates, empty_policy))
}

/// Return `new` only if it differs from `old`.
///
/// Comparison is order-sensitive, so a reordering counts as a change.
pub(crate) fn changed_or_none(old: &Pronunciations, new: Pronunciations) -> Option<Pronunciations> {
    if &new == old {
        None
    } else {
        Some(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::pronunciation;

    fn dictionary(words: usize) -> PronunciationDict {
        (0..words)
            .map(|i| {
                (
                    format!("w{}", i),
                    Pronunciations::single(pronunciation(["a", "b"]), (i + 1) as Weight),
                )
            })
            .collect()
    }

    fn drop_b(_: &Word, p: &Pronunciations) -> Result<Option<Pronunciations>> {
        let new: Pronunciations = p
            .iter()
            .map(|(pron, w)| {
                let kept: Vec<Symbol> = pron.iter().filter(|s| *s != "b").cloned().collect();
                (kept, *w)
            })
            .collect();
        Ok(changed_or_none(p, new))
    }

    #[test]
    fn test_updates_follow_dictionary_order() {
        let dict = dictionary(25);
        let options = MultiprocessingOptions::new(4, 3, Some(1)).unwrap();
        let updates = compute_updates(&dict, &options, drop_b).unwrap();
        let words: Vec<&str> = updates.iter().map(|(w, _)| w.as_str()).collect();
        let expected: Vec<String> = (0..25).map(|i| format!("w{}", i)).collect();
        assert_eq!(words, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_result_independent_of_pool_shape() {
        let mut single = dictionary(40);
        let mut parallel = single.clone();
        run_batch(
            &mut single,
            &MultiprocessingOptions::new(1, 100, None).unwrap(),
            &EmptyPolicy::Remove,
            drop_b,
        )
        .unwrap();
        run_batch(
            &mut parallel,
            &MultiprocessingOptions::new(8, 1, Some(2)).unwrap(),
            &EmptyPolicy::Remove,
            drop_b,
        )
        .unwrap();
        assert_eq!(single, parallel);
    }

    #[test]
    fn test_error_aborts_without_applying() {
        let mut dict = dictionary(10);
        let before = dict.clone();
        let result = run_batch(
            &mut dict,
            &MultiprocessingOptions::new(2, 1, None).unwrap(),
            &EmptyPolicy::Remove,
            |word, _| {
                if word == "w7" {
                    Err(DictError::invalid("word", "boom"))
                } else {
                    Ok(Some(Pronunciations::single(pronunciation(["x"]), 1.0)))
                }
            },
        );
        assert!(result.is_err());
        assert_eq!(dict, before);
    }

    #[test]
    fn test_empty_policy_remove_and_keep() {
        let empty = |_: &Word, _: &Pronunciations| -> Result<Option<Pronunciations>> {
            Ok(Some(Pronunciations::new()))
        };

        let mut dict = dictionary(3);
        let outcome = run_batch(
            &mut dict,
            &MultiprocessingOptions::single_threaded(),
            &EmptyPolicy::Remove,
            empty,
        )
        .unwrap();
        assert!(dict.is_empty());
        assert_eq!(outcome.removed.len(), 3);
        assert_eq!(outcome.changed_count(), 3);

        let mut dict = dictionary(3);
        let outcome = run_batch(
            &mut dict,
            &MultiprocessingOptions::single_threaded(),
            &EmptyPolicy::KeepWith("?".into()),
            empty,
        )
        .unwrap();
        assert!(outcome.removed.is_empty());
        assert_eq!(dict.len(), 3);
        assert_eq!(
            dict.get("w1"),
            Some(&Pronunciations::single(pronunciation(["?"]), DEFAULT_EMPTY_WEIGHT))
        );
    }

    #[test]
    fn test_empty_policy_validation() {
        assert!(EmptyPolicy::from_flag(true, None).is_err());
        assert!(EmptyPolicy::from_flag(true, Some(String::new())).is_err());
        assert!(EmptyPolicy::from_flag(true, Some("a b".into())).is_err());
        assert_eq!(
            EmptyPolicy::from_flag(false, Some("x".into())).unwrap(),
            EmptyPolicy::Remove
        );
    }

    #[test]
    fn test_empty_dictionary_is_noop() {
        let mut dict = PronunciationDict::new();
        let outcome = run_batch(
            &mut dict,
            &MultiprocessingOptions::default(),
            &EmptyPolicy::Remove,
            drop_b,
        )
        .unwrap();
        assert!(outcome.is_unchanged());
    }
}
