//! Reading and writing dictionaries, mapping tables and vocabularies.
//!
//! Dictionaries can be stored in three formats:
//!
//! - **text**: one pronunciation per line, `WORD[(N)]  [WEIGHT  ]SYM SYM ...`
//! - **JSON**: a word-ordered object of `[pronunciation, weight]` lists
//! - **bincode**: compact binary
//!
//! # Example
//!
//! ```rust
//! use pronunciation_dict_utils::prelude::*;
//! use pronunciation_dict_utils::serialization::{
//!     DeserializationOptions, DictionarySerializer, PlainTextSerializer,
//! };
//!
//! let serializer = PlainTextSerializer::new(
//!     DeserializationOptions {
//!         consider_weights: true,
//!         ..Default::default()
//!     },
//!     Default::default(),
//! );
//! let dictionary = serializer
//!     .deserialize("test  0.5  T EH1 S T\ntest  0.5  T EH1 S\n".as_bytes())
//!     .unwrap();
//! assert_eq!(dictionary.pronunciation_count(), 2);
//!
//! let mut out = Vec::new();
//! serializer.serialize(&dictionary, &mut out).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "test  0.5  T EH1 S T\ntest  0.5  T EH1 S\n"
//! );
//! ```

use std::fmt;
use std::io::{BufRead, BufReader, Read, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dictionary::{FxBuildHasher, MappingTable, PronunciationDict, WordSet};
use crate::error::DictError;

mod bincode_impl;
mod json_impl;
mod plaintext_impl;

pub use self::bincode_impl::BincodeSerializer;
pub use self::json_impl::JsonSerializer;
pub use self::plaintext_impl::PlainTextSerializer;

/// Default separator between word, weight and pronunciation in text files.
pub const DEFAULT_PARTS_SEP: &str = "  ";

/// Trait for serializing and deserializing pronunciation dictionaries.
pub trait DictionarySerializer {
    /// Serialize `dict` to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    fn serialize<W: Write>(
        &self,
        dict: &PronunciationDict,
        writer: W,
    ) -> Result<(), SerializationError>;

    /// Deserialize a dictionary from `reader`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the content is malformed.
    fn deserialize<R: Read>(&self, reader: R) -> Result<PronunciationDict, SerializationError>;
}

/// Errors that can occur during serialization/deserialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// Error during bincode serialization
    #[error("Bincode error: {0}")]
    Bincode(#[from] bincode::Error),
    /// Error during JSON serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed line in a text dictionary
    #[error("Line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What is wrong with the line.
        message: String,
    },
    /// Mapping table that is not a JSON object of strings
    #[error("Invalid mapping table: {0}")]
    InvalidMapping(String),
    /// Structured dictionary whose content breaks the dictionary rules
    #[error("Invalid dictionary: {0}")]
    InvalidDictionary(#[from] DictError),
}

/// How text dictionaries are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeserializationOptions {
    /// Skip lines starting with `;;;`.
    pub consider_comments: bool,
    /// Strip `(N)` suffixes from words.
    pub consider_numbers: bool,
    /// Strip `# ...` comments after the pronunciation.
    pub consider_pronunciation_comments: bool,
    /// Read the first field after the word as the weight.
    pub consider_weights: bool,
}

/// How text dictionaries are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializationOptions {
    /// Separator between word, weight and pronunciation.
    pub parts_sep: String,
    /// Append `(N)` to the second and later pronunciations of a word.
    pub include_numbers: bool,
    /// Write the weight column.
    pub include_weights: bool,
}

impl Default for SerializationOptions {
    fn default() -> Self {
        Self {
            parts_sep: DEFAULT_PARTS_SEP.to_string(),
            include_numbers: false,
            include_weights: true,
        }
    }
}

/// On-disk dictionary format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DictionaryFormat {
    /// Line-based text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// Binary bincode encoding.
    Bincode,
}

impl DictionaryFormat {
    /// Conventional file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "dict",
            Self::Json => "json",
            Self::Bincode => "bin",
        }
    }
}

impl fmt::Display for DictionaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Bincode => "bincode",
        })
    }
}

impl FromStr for DictionaryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "dict" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "bincode" | "bin" => Ok(Self::Bincode),
            other => Err(format!("Unknown dictionary format: {}", other)),
        }
    }
}

/// Read a dictionary in `format`. The text options only apply to
/// [`DictionaryFormat::Text`].
///
/// JSON and bincode input is checked with [`PronunciationDict::validate`]
/// after decoding; the text parser enforces the same rules per line.
pub fn read_dictionary<R: Read>(
    reader: R,
    format: DictionaryFormat,
    options: DeserializationOptions,
) -> Result<PronunciationDict, SerializationError> {
    let dict = match format {
        DictionaryFormat::Text => {
            return PlainTextSerializer::new(options, SerializationOptions::default())
                .deserialize(reader)
        }
        DictionaryFormat::Json => JsonSerializer.deserialize(reader)?,
        DictionaryFormat::Bincode => BincodeSerializer.deserialize(reader)?,
    };
    dict.validate()?;
    Ok(dict)
}

/// Write `dict` in `format`. The text options only apply to
/// [`DictionaryFormat::Text`].
pub fn write_dictionary<W: Write>(
    dict: &PronunciationDict,
    writer: W,
    format: DictionaryFormat,
    options: &SerializationOptions,
) -> Result<(), SerializationError> {
    match format {
        DictionaryFormat::Text => {
            PlainTextSerializer::new(DeserializationOptions::default(), options.clone())
                .serialize(dict, writer)
        }
        DictionaryFormat::Json => JsonSerializer.serialize(dict, writer),
        DictionaryFormat::Bincode => BincodeSerializer.serialize(dict, writer),
    }
}

/// Load a mapping table from a JSON object of `symbol: replacement` pairs.
///
/// The key order of the file is kept.
pub fn read_mapping_table<R: Read>(reader: R) -> Result<MappingTable, SerializationError> {
    let raw: indexmap::IndexMap<String, serde_json::Value, FxBuildHasher> =
        serde_json::from_reader(reader).map_err(|err| {
            if err.is_data() {
                SerializationError::InvalidMapping(err.to_string())
            } else {
                SerializationError::Json(err)
            }
        })?;

    let mut table = MappingTable::with_capacity_and_hasher(raw.len(), FxBuildHasher::default());
    for (symbol, value) in raw {
        match value {
            serde_json::Value::String(replacement) => {
                table.insert(symbol, replacement);
            }
            other => {
                return Err(SerializationError::InvalidMapping(format!(
                    "value for '{}' is not a string: {}",
                    symbol, other
                )));
            }
        }
    }
    Ok(table)
}

/// Read a vocabulary: one word per line, surrounding whitespace trimmed,
/// blank lines skipped and duplicates dropped.
pub fn read_vocabulary<R: Read>(reader: R) -> Result<WordSet, SerializationError> {
    let mut vocabulary = WordSet::default();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            vocabulary.insert(word.to_string());
        }
    }
    Ok(vocabulary)
}

/// Write one item per line.
pub fn write_lines<W, I, S>(mut writer: W, items: I) -> Result<(), SerializationError>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for item in items {
        writeln!(writer, "{}", item.as_ref())?;
    }
    writer.flush()?;
    Ok(())
}
