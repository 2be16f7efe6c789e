//! Reduce every word to a single pronunciation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHasher;

use crate::batch::{self, EmptyPolicy, MultiprocessingOptions};
use crate::dictionary::{Pronunciation, PronunciationDict, Pronunciations, Weight, WordSet};
use crate::error::{DictError, Result};

/// Which pronunciation survives.
///
/// Ties always go to the pronunciation seen first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionMode {
    /// First in insertion order.
    #[default]
    First,
    /// Last in insertion order.
    Last,
    /// Highest weight.
    HighestWeight,
    /// Lowest weight.
    LowestWeight,
    /// Fewest symbols.
    Shortest,
    /// Most symbols.
    Longest,
    /// Uniformly random.
    Random,
    /// Random with probability proportional to weight.
    Weighted,
}

const MODE_NAMES: [(&str, SelectionMode); 8] = [
    ("first", SelectionMode::First),
    ("last", SelectionMode::Last),
    ("highest-weight", SelectionMode::HighestWeight),
    ("lowest-weight", SelectionMode::LowestWeight),
    ("shortest", SelectionMode::Shortest),
    ("longest", SelectionMode::Longest),
    ("random", SelectionMode::Random),
    ("weighted", SelectionMode::Weighted),
];

impl SelectionMode {
    /// Whether the mode draws from a random generator.
    pub fn is_random(self) -> bool {
        matches!(self, Self::Random | Self::Weighted)
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = MODE_NAMES
            .iter()
            .find(|(_, mode)| mode == self)
            .map_or("first", |(name, _)| *name);
        f.write_str(name)
    }
}

impl FromStr for SelectionMode {
    type Err = DictError;

    fn from_str(s: &str) -> Result<Self> {
        MODE_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, mode)| *mode)
            .ok_or_else(|| DictError::invalid("mode", format!("Unknown selection mode '{}'!", s)))
    }
}

type Entry<'a> = (&'a Pronunciation, Weight);

/// First entry for which no later entry is strictly `better`.
fn first_best<'a, I, F>(entries: I, better: F) -> Option<Entry<'a>>
where
    I: Iterator<Item = Entry<'a>>,
    F: Fn(&Entry<'a>, &Entry<'a>) -> bool,
{
    entries.reduce(|best, candidate| if better(&candidate, &best) { candidate } else { best })
}

/// Pick one pronunciation of `pronunciations` according to `mode`.
///
/// `rng` is only drawn from for the random modes. Weighted selection falls
/// back to a uniform draw when the weights cannot form a distribution (all
/// zero, for instance).
pub fn select_pronunciation<'a, R: Rng>(
    pronunciations: &'a Pronunciations,
    mode: SelectionMode,
    rng: &mut R,
) -> Option<Entry<'a>> {
    let entries = pronunciations.iter().map(|(p, w)| (p, *w));
    match mode {
        SelectionMode::First => pronunciations.first(),
        SelectionMode::Last => pronunciations.last(),
        SelectionMode::HighestWeight => first_best(entries, |c, b| c.1 > b.1),
        SelectionMode::LowestWeight => first_best(entries, |c, b| c.1 < b.1),
        SelectionMode::Shortest => first_best(entries, |c, b| c.0.len() < b.0.len()),
        SelectionMode::Longest => first_best(entries, |c, b| c.0.len() > b.0.len()),
        SelectionMode::Random => {
            if pronunciations.is_empty() {
                return None;
            }
            pronunciations.get_index(rng.gen_range(0..pronunciations.len()))
        }
        SelectionMode::Weighted => {
            if pronunciations.is_empty() {
                return None;
            }
            let index = match WeightedIndex::new(pronunciations.iter().map(|(_, w)| *w)) {
                Ok(distribution) => distribution.sample(rng),
                Err(_) => rng.gen_range(0..pronunciations.len()),
            };
            pronunciations.get_index(index)
        }
    }
}

/// Generator for one word, derived from the run seed and the word itself so
/// the draw does not depend on which worker handles the word.
fn word_rng(seed: u64, word: &str) -> StdRng {
    let mut hasher = FxHasher::default();
    seed.hash(&mut hasher);
    word.hash(&mut hasher);
    StdRng::seed_from_u64(hasher.finish())
}

/// Keep one pronunciation per word.
///
/// The kept pronunciation retains its weight. Words with a single
/// pronunciation are left alone. Without a `seed` the random modes draw a
/// fresh one. Returns the changed words.
pub fn select_single_pronunciation(
    dictionary: &mut PronunciationDict,
    mode: SelectionMode,
    seed: Option<u64>,
    options: &MultiprocessingOptions,
) -> Result<WordSet> {
    let seed = seed.unwrap_or_else(rand::random);

    let outcome = batch::run_batch(dictionary, options, &EmptyPolicy::Remove, |word, pronunciations| {
        if pronunciations.len() <= 1 {
            return Ok(None);
        }
        let mut rng = word_rng(seed, word);
        Ok(select_pronunciation(pronunciations, mode, &mut rng)
            .map(|(pronunciation, weight)| Pronunciations::single(pronunciation.clone(), weight)))
    })?;
    Ok(outcome.changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::pronunciation;

    fn sample() -> Pronunciations {
        vec![
            (pronunciation(["a", "b"]), 2.0),
            (pronunciation(["c"]), 5.0),
            (pronunciation(["d", "e", "f"]), 1.0),
            (pronunciation(["g"]), 5.0),
            (pronunciation(["h", "i", "j"]), 1.0),
        ]
        .into()
    }

    fn pick(mode: SelectionMode) -> String {
        let p = sample();
        let mut rng = StdRng::seed_from_u64(0);
        select_pronunciation(&p, mode, &mut rng).unwrap().0.concat()
    }

    #[test]
    fn test_deterministic_modes_prefer_first_seen() {
        assert_eq!(pick(SelectionMode::First), "ab");
        assert_eq!(pick(SelectionMode::Last), "hij");
        assert_eq!(pick(SelectionMode::HighestWeight), "c");
        assert_eq!(pick(SelectionMode::LowestWeight), "def");
        assert_eq!(pick(SelectionMode::Shortest), "c");
        assert_eq!(pick(SelectionMode::Longest), "def");
    }

    #[test]
    fn test_weighted_skips_zero_weights() {
        let p: Pronunciations = vec![
            (pronunciation(["a"]), 0.0),
            (pronunciation(["b"]), 1.0),
        ]
        .into();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let picked = select_pronunciation(&p, SelectionMode::Weighted, &mut rng).unwrap();
            assert_eq!(picked.0, &pronunciation(["b"]));
        }
    }

    #[test]
    fn test_weighted_all_zero_falls_back_to_uniform() {
        let p: Pronunciations = vec![
            (pronunciation(["a"]), 0.0),
            (pronunciation(["b"]), 0.0),
        ]
        .into();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(select_pronunciation(&p, SelectionMode::Weighted, &mut rng).is_some());
    }

    #[test]
    fn test_seeded_selection_is_reproducible_across_pools() {
        let mut dict = PronunciationDict::new();
        for i in 0..50 {
            dict.insert(format!("w{}", i), sample());
        }
        let mut other = dict.clone();

        select_single_pronunciation(
            &mut dict,
            SelectionMode::Random,
            Some(42),
            &MultiprocessingOptions::new(1, 100, None).unwrap(),
        )
        .unwrap();
        select_single_pronunciation(
            &mut other,
            SelectionMode::Random,
            Some(42),
            &MultiprocessingOptions::new(4, 3, Some(1)).unwrap(),
        )
        .unwrap();

        assert_eq!(dict, other);
        assert!(dict.iter().all(|(_, p)| p.len() == 1));
    }

    #[test]
    fn test_keeps_weight_and_skips_single() {
        let mut dict = PronunciationDict::new();
        dict.insert("many".into(), sample());
        dict.insert("one".into(), Pronunciations::single(pronunciation(["x"]), 3.0));
        let changed = select_single_pronunciation(
            &mut dict,
            SelectionMode::HighestWeight,
            None,
            &MultiprocessingOptions::single_threaded(),
        )
        .unwrap();
        assert_eq!(changed.iter().collect::<Vec<_>>(), vec!["many"]);
        assert_eq!(
            dict.get("many"),
            Some(&Pronunciations::single(pronunciation(["c"]), 5.0))
        );
    }

    #[test]
    fn test_mode_names() {
        for (name, mode) in MODE_NAMES {
            assert_eq!(name.parse::<SelectionMode>().unwrap(), mode);
            assert_eq!(mode.to_string(), name);
        }
        assert!("middle".parse::<SelectionMode>().is_err());
    }
}
