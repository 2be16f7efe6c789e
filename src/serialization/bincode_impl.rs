//! Bincode serializer for compact binary format.

use std::io::{BufReader, BufWriter, Read, Write};

use super::{DictionarySerializer, SerializationError};
use crate::dictionary::PronunciationDict;

/// Bincode serializer for compact binary format.
///
/// Fastest to load, so it is the format to cache large dictionaries in
/// between runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeSerializer;

impl DictionarySerializer for BincodeSerializer {
    fn serialize<W: Write>(
        &self,
        dict: &PronunciationDict,
        writer: W,
    ) -> Result<(), SerializationError> {
        let mut writer = BufWriter::new(writer);
        bincode::serialize_into(&mut writer, dict)?;
        writer.flush()?;
        Ok(())
    }

    fn deserialize<R: Read>(&self, reader: R) -> Result<PronunciationDict, SerializationError> {
        Ok(bincode::deserialize_from(BufReader::new(reader))?)
    }
}
