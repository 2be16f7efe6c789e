//! Regex rewriting over space-joined pronunciations.
//!
//! Each pronunciation is joined with single spaces, rewritten with
//! [`Regex::replace_all`], and split on spaces again. The pattern can
//! therefore span symbol boundaries; a replacement may merge symbols (by
//! removing the space) or split them (by inserting one). Capture groups use
//! the `regex` template syntax: `$1`, `${1}` or `$name`. Backslash
//! references such as `\1` are not expanded and stay in the output as typed.

use regex::Regex;

use crate::batch::{self, BatchOutcome, EmptyPolicy, MultiprocessingOptions};
use crate::dictionary::{Pronunciation, PronunciationDict, Pronunciations, Symbol};
use crate::error::{DictError, Result};

/// Compile a rewrite pattern, rejecting the empty pattern.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    if pattern.is_empty() {
        return Err(DictError::invalid("pattern", "Value must not be empty!"));
    }
    Ok(Regex::new(pattern)?)
}

/// Rewrite a single pronunciation. Empty tokens are dropped.
pub fn replace_in_pronunciation(
    pronunciation: &[Symbol],
    pattern: &Regex,
    replace_with: &str,
) -> Pronunciation {
    let joined = pronunciation.join(" ");
    pattern
        .replace_all(&joined, replace_with)
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rewrite every pronunciation of one word.
///
/// Pronunciations that end up empty are left out; the result is empty when
/// all of them vanished.
pub fn replace_in_pronunciations(
    pronunciations: &Pronunciations,
    pattern: &Regex,
    replace_with: &str,
) -> Pronunciations {
    pronunciations
        .iter()
        .map(|(pronunciation, weight)| {
            (
                replace_in_pronunciation(pronunciation, pattern, replace_with),
                *weight,
            )
        })
        .filter(|(pronunciation, _)| !pronunciation.is_empty())
        .collect()
}

/// Apply `pattern` → `replace_with` to every pronunciation of `dictionary`.
///
/// The pattern is compiled before anything is touched. Words left without
/// pronunciations are handled by `empty_policy`.
pub fn replace_symbols_in_pronunciations(
    dictionary: &mut PronunciationDict,
    pattern: &str,
    replace_with: &str,
    empty_policy: &EmptyPolicy,
    options: &MultiprocessingOptions,
) -> Result<BatchOutcome> {
    let pattern = compile_pattern(pattern)?;

    batch::run_batch(dictionary, options, empty_policy, |_, pronunciations| {
        let rewritten = replace_in_pronunciations(pronunciations, &pattern, replace_with);
        Ok(batch::changed_or_none(pronunciations, rewritten))
    })
}
