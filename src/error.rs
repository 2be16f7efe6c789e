//! Error types for dictionary transformations.

use thiserror::Error;

/// Errors that can occur while transforming a pronunciation dictionary.
///
/// Validation failures are raised before the dictionary is touched. The
/// remaining variants can surface part-way through an operation.
#[derive(Debug, Error)]
pub enum DictError {
    /// A parameter failed validation.
    ///
    /// Raised before any mutation happens. `parameter` names the offending
    /// argument as the caller passed it.
    #[error("Parameter '{parameter}': {message}")]
    InvalidParameter {
        /// Name of the rejected parameter
        parameter: &'static str,
        /// Human-readable reason
        message: String,
    },

    /// The rewrite pattern could not be compiled.
    #[error("Parameter 'pattern': {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A partial mapping was asked to substitute text containing a space.
    ///
    /// Partial replacements edit the text of a single symbol, so a space would
    /// silently turn one symbol into two once the dictionary is written out.
    #[error("Whitespaces in mappings aren't supported with partial mapping (symbol '{symbol}' -> '{replacement}')")]
    WhitespaceInPartialMapping {
        /// Symbol whose mapping was rejected
        symbol: String,
        /// Replacement value containing the space
        replacement: String,
    },

    /// A mapping-table run stopped part-way.
    ///
    /// Symbols processed before `symbol` were already applied to the
    /// dictionary and are not rolled back.
    #[error("Mapping aborted at symbol '{symbol}'; {changed_words} word(s) were already changed and some changes may have been applied: {source}")]
    MappingAborted {
        /// Symbol that was being applied when the error occurred
        symbol: String,
        /// Number of words changed by the symbols applied before the failure
        changed_words: usize,
        /// Underlying failure
        #[source]
        source: Box<DictError>,
    },

    /// A word is attached to an empty pronunciation collection.
    #[error("Word '{0}' has no pronunciations")]
    EmptyPronunciations(String),

    /// A word carries a pronunciation without symbols, or with an empty symbol.
    #[error("Word '{0}' has an empty pronunciation or symbol")]
    EmptyPronunciation(String),

    /// A word carries a negative or non-finite weight.
    #[error("Word '{word}' has invalid weight {weight}")]
    InvalidWeight {
        /// Word owning the weight
        word: String,
        /// The rejected weight
        weight: f64,
    },

    /// The worker pool could not be started.
    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl DictError {
    /// Shorthand for [`DictError::InvalidParameter`].
    pub fn invalid(parameter: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            message: message.into(),
        }
    }
}

/// A specialized `Result` type for dictionary transformations.
pub type Result<T> = std::result::Result<T, DictError>;
