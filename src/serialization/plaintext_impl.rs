//! Line-based text dictionaries.
//!
//! Each line holds one pronunciation of one word:
//!
//! ```text
//! ;;; comment line
//! read        1    R IY1 D
//! read(2)     0.5  R EH1 D   # past tense
//! ```
//!
//! Which of these optional parts are recognised is controlled by
//! [`DeserializationOptions`]. Repeated words accumulate pronunciations, and
//! a pronunciation repeated under the same word has its weights summed.

use std::io::{BufRead, BufReader, Read, Write};

use super::{DeserializationOptions, DictionarySerializer, SerializationError, SerializationOptions};
use crate::dictionary::{Pronunciation, PronunciationDict, Weight, Word};

const COMMENT_PREFIX: &str = ";;;";
const PRONUNCIATION_COMMENT: char = '#';

/// Text serializer with configurable line layout.
#[derive(Debug, Clone, Default)]
pub struct PlainTextSerializer {
    /// Options used when reading.
    pub deserialization: DeserializationOptions,
    /// Options used when writing.
    pub serialization: SerializationOptions,
}

impl PlainTextSerializer {
    /// Create a serializer with the given read and write options.
    pub fn new(deserialization: DeserializationOptions, serialization: SerializationOptions) -> Self {
        Self {
            deserialization,
            serialization,
        }
    }

    /// Parse a single line. Returns `Ok(None)` for blank and comment lines.
    pub fn parse_line(&self, line: &str) -> Result<Option<(Word, Pronunciation, Weight)>, String> {
        let options = &self.deserialization;
        let line = line.trim();
        if line.is_empty() || (options.consider_comments && line.starts_with(COMMENT_PREFIX)) {
            return Ok(None);
        }

        let mut tokens = line.split_whitespace();
        let Some(word) = tokens.next() else {
            return Ok(None);
        };
        let word = if options.consider_numbers {
            strip_number(word)
        } else {
            word
        };

        let mut tokens = tokens.peekable();
        let weight = if options.consider_weights {
            let field = tokens
                .next()
                .ok_or_else(|| format!("Word '{}' has no weight!", word))?;
            parse_weight(field)?
        } else {
            1.0
        };

        let pronunciation: Pronunciation = tokens
            .take_while(|token| {
                !(options.consider_pronunciation_comments
                    && token.starts_with(PRONUNCIATION_COMMENT))
            })
            .map(String::from)
            .collect();
        if pronunciation.is_empty() {
            return Err(format!("Word '{}' has no pronunciation!", word));
        }

        Ok(Some((word.to_string(), pronunciation, weight)))
    }
}

/// `word` without a trailing `(N)` suffix.
fn strip_number(word: &str) -> &str {
    if let Some(stripped) = word.strip_suffix(')') {
        if let Some(open) = stripped.rfind('(') {
            let digits = &stripped[open + 1..];
            if open > 0 && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                return &word[..open];
            }
        }
    }
    word
}

fn parse_weight(field: &str) -> Result<Weight, String> {
    match field.parse::<Weight>() {
        Ok(weight) if weight.is_finite() && weight >= 0.0 => Ok(weight),
        _ => Err(format!("Weight '{}' is invalid!", field)),
    }
}

impl DictionarySerializer for PlainTextSerializer {
    fn serialize<W: Write>(
        &self,
        dict: &PronunciationDict,
        mut writer: W,
    ) -> Result<(), SerializationError> {
        let options = &self.serialization;
        for (word, pronunciations) in dict {
            for (index, (pronunciation, weight)) in pronunciations.iter().enumerate() {
                write!(writer, "{}", word)?;
                if options.include_numbers && index > 0 {
                    write!(writer, "({})", index + 1)?;
                }
                write!(writer, "{}", options.parts_sep)?;
                if options.include_weights {
                    write!(writer, "{}{}", weight, options.parts_sep)?;
                }
                writeln!(writer, "{}", pronunciation.join(" "))?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    fn deserialize<R: Read>(&self, reader: R) -> Result<PronunciationDict, SerializationError> {
        let mut dict = PronunciationDict::new();
        for (index, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let parsed = self
                .parse_line(&line)
                .map_err(|message| SerializationError::Parse {
                    line: index + 1,
                    message,
                })?;
            if let Some((word, pronunciation, weight)) = parsed {
                dict.entry_or_default(word).add(pronunciation, weight);
            }
        }
        Ok(dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{pronunciation, Pronunciations};

    fn all_options() -> DeserializationOptions {
        DeserializationOptions {
            consider_comments: true,
            consider_numbers: true,
            consider_pronunciation_comments: true,
            consider_weights: true,
        }
    }

    #[test]
    fn test_parse_full_line() {
        let serializer = PlainTextSerializer::new(all_options(), Default::default());
        assert_eq!(
            serializer.parse_line("read(2)  0.5  R EH1 D  # past").unwrap(),
            Some(("read".to_string(), pronunciation(["R", "EH1", "D"]), 0.5))
        );
        assert_eq!(serializer.parse_line(";;; header").unwrap(), None);
        assert_eq!(serializer.parse_line("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_plain_line_keeps_markers() {
        let serializer = PlainTextSerializer::default();
        assert_eq!(
            serializer.parse_line("read(2)  R EH1 D # x").unwrap(),
            Some((
                "read(2)".to_string(),
                pronunciation(["R", "EH1", "D", "#", "x"]),
                1.0
            ))
        );
    }

    #[test]
    fn test_strip_number() {
        assert_eq!(strip_number("read(2)"), "read");
        assert_eq!(strip_number("(2)"), "(2)");
        assert_eq!(strip_number("read()"), "read()");
        assert_eq!(strip_number("read(x)"), "read(x)");
    }

    #[test]
    fn test_parse_errors_carry_line_number() {
        let serializer = PlainTextSerializer::new(all_options(), Default::default());
        let err = serializer
            .deserialize("a  1  A\nb  -1  B\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, SerializationError::Parse { line: 2, .. }));

        let err = serializer.deserialize("a  1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SerializationError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_repeated_words_accumulate() {
        let serializer = PlainTextSerializer::new(all_options(), Default::default());
        let dict = serializer
            .deserialize("a  1  A\nb  1  B\na(2)  2  A2\na  0.5  A\n".as_bytes())
            .unwrap();
        assert_eq!(dict.words().collect::<Vec<_>>(), vec!["a", "b"]);
        let expected: Pronunciations =
            vec![(pronunciation(["A"]), 1.5), (pronunciation(["A2"]), 2.0)].into();
        assert_eq!(dict.get("a"), Some(&expected));
    }

    #[test]
    fn test_serialize_layout() {
        let mut dict = PronunciationDict::new();
        dict.insert(
            "read".into(),
            vec![(pronunciation(["R", "IY1", "D"]), 1.0), (pronunciation(["R", "EH1", "D"]), 0.5)]
                .into(),
        );

        let serializer = PlainTextSerializer::new(
            Default::default(),
            SerializationOptions {
                parts_sep: "\t".to_string(),
                include_numbers: true,
                include_weights: true,
            },
        );
        let mut out = Vec::new();
        serializer.serialize(&dict, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "read\t1\tR IY1 D\nread(2)\t0.5\tR EH1 D\n"
        );

        let serializer = PlainTextSerializer::new(
            Default::default(),
            SerializationOptions {
                include_weights: false,
                ..Default::default()
            },
        );
        let mut out = Vec::new();
        serializer.serialize(&dict, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "read  R IY1 D\nread  R EH1 D\n"
        );
    }
}
