//! Mapping-table resolution.
//!
//! A mapping table translates one symbol inventory into another (ARPAbet to
//! IPA, for instance). Only table keys that actually occur in the dictionary
//! are applied, one at a time, **longest symbol first**. With partial mapping
//! this order is what keeps `AO2 → ˌɔ` from being preempted by `AO → ɔ`,
//! which would leave `ɔ2` behind.
//!
//! # Example
//!
//! ```rust
//! use pronunciation_dict_utils::prelude::*;
//!
//! let mut dictionary = PronunciationDict::new();
//! dictionary.insert(
//!     "or".to_string(),
//!     Pronunciations::single(pronunciation(["AO2", "R"]), 1.0),
//! );
//!
//! let mut table = MappingTable::default();
//! table.insert("AO".to_string(), "ɔ".to_string());
//! table.insert("AO2".to_string(), "ˌɔ".to_string());
//!
//! let report = resolve_mapping_table(
//!     &mut dictionary,
//!     &table,
//!     true,
//!     &MultiprocessingOptions::single_threaded(),
//! )
//! .unwrap();
//!
//! assert_eq!(report.changed.len(), 1);
//! assert_eq!(
//!     dictionary.get("or").unwrap().first().unwrap().0,
//!     &pronunciation(["ˌɔ", "R"])
//! );
//! ```

use std::cmp::Reverse;

use tracing::{debug, info};

use crate::batch::MultiprocessingOptions;
use crate::dictionary::{MappingTable, PronunciationDict, Symbol, SymbolSet, WordSet};
use crate::error::{DictError, Result};
use crate::transform::map_symbols::{map_symbols, Replacement};

/// Symbols of `inventory` that have an entry in `table`, in inventory order.
pub fn mappable_symbols(inventory: &SymbolSet, table: &MappingTable) -> SymbolSet {
    inventory
        .iter()
        .filter(|symbol| table.contains_key(*symbol))
        .cloned()
        .collect()
}

/// Symbols of `inventory` without an entry in `table`, in inventory order.
pub fn unmappable_symbols(inventory: &SymbolSet, table: &MappingTable) -> SymbolSet {
    inventory
        .iter()
        .filter(|symbol| !table.contains_key(*symbol))
        .cloned()
        .collect()
}

/// Order in which symbols are applied: longest first (in characters), ties
/// broken lexicographically.
pub fn application_order(symbols: &SymbolSet) -> Vec<Symbol> {
    let mut ordered: Vec<Symbol> = symbols.iter().cloned().collect();
    ordered.sort_by(|a, b| {
        Reverse(a.chars().count())
            .cmp(&Reverse(b.chars().count()))
            .then_with(|| a.cmp(b))
    });
    ordered
}

/// Outcome of a mapping-table run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingReport {
    /// Applied symbols, in application order.
    pub mappable: Vec<Symbol>,
    /// Dictionary symbols the table does not cover.
    pub unmappable: SymbolSet,
    /// Union of the words changed by every applied symbol.
    pub changed: WordSet,
}

/// Replacement for `symbol`, rejecting values that would empty it.
fn replacement_for(symbol: &str, value: &str, partial: bool) -> Result<Replacement> {
    let replacement = if partial {
        Replacement::Partial(value.to_string())
    } else {
        Replacement::full_from_text(value)
    };
    replacement.validate().map_err(|_| {
        DictError::invalid(
            "mappings",
            format!("Mapping for symbol '{}' is empty!", symbol),
        )
    })?;
    Ok(replacement)
}

/// Apply `table` to `dictionary`, longest symbol first.
///
/// In full mode a value is split on whitespace, so `"ˌe ɪ"` expands one
/// symbol into two. In partial mode a value containing a space stops the run
/// with [`DictError::MappingAborted`]; symbols applied before that are not
/// rolled back.
///
/// Empty values are rejected before the dictionary is touched.
pub fn resolve_mapping_table(
    dictionary: &mut PronunciationDict,
    table: &MappingTable,
    partial: bool,
    options: &MultiprocessingOptions,
) -> Result<MappingReport> {
    options.validate()?;

    let inventory = dictionary.phoneme_set();
    let mappable = mappable_symbols(&inventory, table);
    let unmappable = unmappable_symbols(&inventory, table);
    let order = application_order(&mappable);

    info!("Found {} applicable phoneme mappings.", order.len());
    info!("Mapped phonemes in dictionary: {}", sorted_joined(&mappable));
    info!("Unmapped phonemes in dictionary: {}", sorted_joined(&unmappable));

    let replacements = order
        .iter()
        .map(|symbol| {
            let value = table.get(symbol).map(String::as_str).unwrap_or_default();
            replacement_for(symbol, value, partial)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut changed = WordSet::default();
    for (symbol, replacement) in order.iter().zip(&replacements) {
        let applied = apply_symbol(dictionary, symbol, replacement, options).map_err(|source| {
            DictError::MappingAborted {
                symbol: symbol.clone(),
                changed_words: changed.len(),
                source: Box::new(source),
            }
        })?;
        debug!(%symbol, words = applied.len(), "applied mapping");
        changed.extend(applied);
    }

    Ok(MappingReport {
        mappable: order,
        unmappable,
        changed,
    })
}

fn apply_symbol(
    dictionary: &mut PronunciationDict,
    symbol: &Symbol,
    replacement: &Replacement,
    options: &MultiprocessingOptions,
) -> Result<WordSet> {
    if let Replacement::Partial(value) = replacement {
        if value.contains(' ') {
            return Err(DictError::WhitespaceInPartialMapping {
                symbol: symbol.clone(),
                replacement: value.clone(),
            });
        }
    }
    let from: SymbolSet = std::iter::once(symbol.clone()).collect();
    map_symbols(dictionary, &from, replacement, options)
}

fn sorted_joined(symbols: &SymbolSet) -> String {
    let mut sorted: Vec<&str> = symbols.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.join(" ")
}
