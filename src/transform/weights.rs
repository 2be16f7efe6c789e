//! Weight merging and normalization.

use crate::batch::{self, EmptyPolicy, MultiprocessingOptions};
use crate::dictionary::{PronunciationDict, Pronunciations, WordSet};
use crate::error::{DictError, Result};

/// Merge `other` into `target`, summing weights of shared pronunciations.
///
/// Pronunciations only in `other` are appended in their order. Returns
/// whether `target` changed; adding a zero weight to an existing entry is
/// not a change, and neither is merging a collection holding exactly the
/// entries of `target`.
/// Both collections must be non-empty.
pub fn merge_pronunciations(target: &mut Pronunciations, other: &Pronunciations) -> Result<bool> {
    if target.is_empty() {
        return Err(DictError::invalid(
            "pronunciations1",
            "At least one pronunciation is required!",
        ));
    }
    if other.is_empty() {
        return Err(DictError::invalid(
            "pronunciations2",
            "At least one pronunciation is required!",
        ));
    }

    if same_entries(target, other) {
        return Ok(false);
    }

    let mut changed = false;
    for (pronunciation, &weight) in other {
        match target.get(pronunciation) {
            Some(existing) => {
                let merged = existing + weight;
                if merged != existing {
                    target.insert(pronunciation.clone(), merged);
                    changed = true;
                }
            }
            None => {
                target.insert(pronunciation.clone(), weight);
                changed = true;
            }
        }
    }
    Ok(changed)
}

/// Same pronunciations with the same weights, in any order.
fn same_entries(p1: &Pronunciations, p2: &Pronunciations) -> bool {
    p1.len() == p2.len() && p2.iter().all(|(pronunciation, &weight)| p1.get(pronunciation) == Some(weight))
}

/// Divide every weight by the sum of all weights.
///
/// A zero sum leaves the collection as it is.
pub fn normalize_pronunciation_weights(pronunciations: &Pronunciations) -> Pronunciations {
    let total = pronunciations.total_weight();
    if total == 0.0 {
        return pronunciations.clone();
    }
    pronunciations
        .iter()
        .map(|(pronunciation, weight)| (pronunciation.clone(), weight / total))
        .collect()
}

/// Turn the weights of every word into probabilities.
///
/// Returns the words whose weights changed.
pub fn normalize_weights(
    dictionary: &mut PronunciationDict,
    options: &MultiprocessingOptions,
) -> Result<WordSet> {
    let outcome = batch::run_batch(dictionary, options, &EmptyPolicy::Remove, |_, pronunciations| {
        let normalized = normalize_pronunciation_weights(pronunciations);
        Ok(batch::changed_or_none(pronunciations, normalized))
    })?;
    Ok(outcome.changed)
}
