//! Dictionary format auto-detection

use super::args::SerializationFormat;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Detected format with confidence level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDetection {
    /// Detected format
    pub format: SerializationFormat,
    /// Detection method used
    pub method: DetectionMethod,
}

/// Method used to detect dictionary format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    /// Heuristic detection via file extension
    Extension,
    /// Heuristic detection via file content analysis
    Content,
    /// User explicitly specified
    UserSpecified,
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extension => write!(f, "heuristic (file extension)"),
            Self::Content => write!(f, "heuristic (content analysis)"),
            Self::UserSpecified => write!(f, "user specified"),
        }
    }
}

/// Detect dictionary format of an existing file
pub fn detect_format(
    path: &Path,
    user_format: Option<SerializationFormat>,
) -> Result<FormatDetection> {
    if let Some(format) = user_format {
        return Ok(FormatDetection {
            format,
            method: DetectionMethod::UserSpecified,
        });
    }

    if let Some(format) = detect_by_extension(path) {
        return Ok(FormatDetection {
            format,
            method: DetectionMethod::Extension,
        });
    }

    detect_by_content(path)
}

/// Detect format by file extension
fn detect_by_extension(path: &Path) -> Option<SerializationFormat> {
    let ext = path.extension().and_then(|s| s.to_str())?;
    match ext.to_lowercase().as_str() {
        "json" => Some(SerializationFormat::Json),
        "bin" | "bincode" => Some(SerializationFormat::Bincode),
        "dict" | "txt" | "text" => Some(SerializationFormat::Text),
        _ => None,
    }
}

/// Detect format by analyzing the first kilobyte of the file
fn detect_by_content(path: &Path) -> Result<FormatDetection> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let mut buffer = Vec::with_capacity(1024);
    file.take(1024)
        .read_to_end(&mut buffer)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    Ok(FormatDetection {
        format: format_of_content(&buffer),
        method: DetectionMethod::Content,
    })
}

fn format_of_content(head: &[u8]) -> SerializationFormat {
    if head.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'{') {
        return SerializationFormat::Json;
    }
    if head
        .iter()
        .any(|&b| b.is_ascii_control() && !matches!(b, b'\t' | b'\n' | b'\r'))
    {
        return SerializationFormat::Bincode;
    }
    match std::str::from_utf8(head) {
        Ok(_) => SerializationFormat::Text,
        // The read may have cut a multi-byte character in half.
        Err(err) if err.error_len().is_none() => SerializationFormat::Text,
        Err(_) => SerializationFormat::Bincode,
    }
}
