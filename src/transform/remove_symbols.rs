//! Positional symbol removal.

use std::fmt;
use std::str::FromStr;

use crate::batch::{self, BatchOutcome, EmptyPolicy, MultiprocessingOptions};
use crate::dictionary::{PronunciationDict, Pronunciations, SymbolSet};
use crate::error::{DictError, Result};

/// Where symbols are stripped from a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RemovalMode {
    /// Every occurrence.
    All,
    /// The leading run only.
    Start,
    /// The trailing run only.
    End,
    /// Leading run, then trailing run.
    #[default]
    Both,
}

impl RemovalMode {
    /// Strip matching items from `items` according to this mode.
    ///
    /// `All` and `Start` are lazy; `End` and `Both` have to buffer the
    /// sequence to find where the trailing run begins.
    pub fn apply<'a, I, P>(self, items: I, is_removed: P) -> Box<dyn Iterator<Item = I::Item> + 'a>
    where
        I: IntoIterator + 'a,
        I::IntoIter: 'a,
        I::Item: 'a,
        P: Fn(&I::Item) -> bool + 'a,
    {
        match self {
            Self::All => Box::new(remove_all(items, is_removed)),
            Self::Start => Box::new(remove_start(items, is_removed)),
            Self::End => Box::new(remove_end(items, is_removed)),
            Self::Both => Box::new(remove_both(items, is_removed)),
        }
    }

    /// Mode name as used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Start => "start",
            Self::End => "end",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for RemovalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemovalMode {
    type Err = DictError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(Self::All),
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            "both" => Ok(Self::Both),
            _ => Err(DictError::invalid(
                "mode",
                "Value needs to be 'all', 'start', 'end' or 'both'!",
            )),
        }
    }
}

/// Drop every matching item.
pub fn remove_all<I, P>(items: I, is_removed: P) -> impl Iterator<Item = I::Item>
where
    I: IntoIterator,
    P: Fn(&I::Item) -> bool,
{
    items.into_iter().filter(move |item| !is_removed(item))
}

/// Drop the leading run of matching items.
pub fn remove_start<I, P>(items: I, is_removed: P) -> impl Iterator<Item = I::Item>
where
    I: IntoIterator,
    P: Fn(&I::Item) -> bool,
{
    items.into_iter().skip_while(move |item| is_removed(item))
}

/// Drop the trailing run of matching items.
pub fn remove_end<I, P>(items: I, is_removed: P) -> impl Iterator<Item = I::Item>
where
    I: IntoIterator,
    P: Fn(&I::Item) -> bool,
{
    let mut buffered: Vec<I::Item> = items.into_iter().collect();
    let keep = buffered
        .iter()
        .rposition(|item| !is_removed(item))
        .map_or(0, |last| last + 1);
    buffered.truncate(keep);
    buffered.into_iter()
}

/// Drop the leading run, then the trailing run of what is left.
pub fn remove_both<I, P>(items: I, is_removed: P) -> impl Iterator<Item = I::Item>
where
    I: IntoIterator,
    P: Fn(&I::Item) -> bool,
{
    let mut buffered: Vec<I::Item> = items
        .into_iter()
        .skip_while(|item| is_removed(item))
        .collect();
    let keep = buffered
        .iter()
        .rposition(|item| !is_removed(item))
        .map_or(0, |last| last + 1);
    buffered.truncate(keep);
    buffered.into_iter()
}

/// Remove `symbols` from every pronunciation of one word.
///
/// Pronunciations that end up empty are left out.
pub fn remove_symbols_from_pronunciations_entry(
    pronunciations: &Pronunciations,
    symbols: &SymbolSet,
    mode: RemovalMode,
) -> Pronunciations {
    pronunciations
        .iter()
        .map(|(pronunciation, weight)| {
            let kept = mode
                .apply(pronunciation.iter(), |symbol| symbols.contains(*symbol))
                .cloned()
                .collect::<Vec<_>>();
            (kept, *weight)
        })
        .filter(|(pronunciation, _)| !pronunciation.is_empty())
        .collect()
}

/// Remove `symbols` from every pronunciation of `dictionary`.
///
/// Words left without pronunciations are handled by `empty_policy`.
pub fn remove_symbols_from_pronunciations(
    dictionary: &mut PronunciationDict,
    symbols: &SymbolSet,
    mode: RemovalMode,
    empty_policy: &EmptyPolicy,
    options: &MultiprocessingOptions,
) -> Result<BatchOutcome> {
    super::map_symbols::validate_source_symbols(symbols)?;

    batch::run_batch(dictionary, options, empty_policy, |_, pronunciations| {
        let stripped = remove_symbols_from_pronunciations_entry(pronunciations, symbols, mode);
        Ok(batch::changed_or_none(pronunciations, stripped))
    })
}
