//! JSON serializer for human-readable format.

use std::io::{BufReader, BufWriter, Read, Write};

use super::{DictionarySerializer, SerializationError};
use crate::dictionary::PronunciationDict;

/// JSON serializer for human-readable format.
///
/// Words become object keys in dictionary order; each value is the list of
/// `[pronunciation, weight]` pairs. Useful for inspection and for handing
/// dictionaries to other tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl DictionarySerializer for JsonSerializer {
    fn serialize<W: Write>(
        &self,
        dict: &PronunciationDict,
        writer: W,
    ) -> Result<(), SerializationError> {
        let mut writer = BufWriter::new(writer);
        serde_json::to_writer_pretty(&mut writer, dict)?;
        writer.flush()?;
        Ok(())
    }

    fn deserialize<R: Read>(&self, reader: R) -> Result<PronunciationDict, SerializationError> {
        Ok(serde_json::from_reader(BufReader::new(reader))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{pronunciation, Pronunciations};

    #[test]
    fn test_layout() {
        let mut dict = PronunciationDict::new();
        dict.insert("b".into(), Pronunciations::single(pronunciation(["B"]), 1.0));
        dict.insert("a".into(), Pronunciations::single(pronunciation(["AH0"]), 0.5));

        let mut out = Vec::new();
        JsonSerializer.serialize(&dict, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value, serde_json::json!({"b": [[["B"], 1.0]], "a": [[["AH0"], 0.5]]}));

        let text = String::from_utf8(out).unwrap();
        assert!(text.find("\"b\"").unwrap() < text.find("\"a\"").unwrap());
    }

    #[test]
    fn test_duplicate_pronunciations_merge_on_load() {
        let dict = JsonSerializer
            .deserialize(r#"{"a": [[["A"], 1.0], [["A"], 2.0]]}"#.as_bytes())
            .unwrap();
        assert_eq!(
            dict.get("a"),
            Some(&Pronunciations::single(pronunciation(["A"]), 3.0))
        );
    }
}
