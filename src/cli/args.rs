//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::serialization::DictionaryFormat;
use crate::transform::{CasingMode, MergeMode, RemovalMode, SelectionMode};

#[derive(Parser)]
#[command(name = "pronunciation-dict")]
#[command(about = "Modify pronunciation dictionaries: map, remove, merge, sort and normalize")]
#[command(version)]
pub struct Cli {
    /// Custom configuration file path
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Include debugging information in the log
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Multiprocessing arguments shared by every dictionary command.
#[derive(Args, Debug, Clone, Default)]
#[command(next_help_heading = "Multiprocessing")]
pub struct MpArgs {
    /// Number of worker threads [default: available parallelism]
    #[arg(short = 'j', long)]
    pub n_jobs: Option<usize>,

    /// Number of words handed to a worker at once [default: 10000]
    #[arg(long)]
    pub chunksize: Option<usize>,

    /// Chunks a worker processes before the pool is rebuilt
    #[arg(long)]
    pub maxtasksperchild: Option<usize>,
}

/// Dictionary reading arguments.
#[derive(Args, Debug, Clone, Default)]
#[command(next_help_heading = "Input")]
pub struct InputArgs {
    /// Dictionary format (auto-detected if not specified)
    #[arg(short = 'f', long)]
    pub format: Option<SerializationFormat>,

    /// Treat lines starting with ';;;' as comments
    #[arg(long)]
    pub consider_comments: bool,

    /// Read ';;;' lines as entries even if settings enable comments
    #[arg(long, conflicts_with = "consider_comments")]
    pub no_consider_comments: bool,

    /// Strip '(N)' numbering from words
    #[arg(long)]
    pub consider_numbers: bool,

    /// Keep '(N)' numbering even if settings enable it
    #[arg(long, conflicts_with = "consider_numbers")]
    pub no_consider_numbers: bool,

    /// Strip '#' comments after pronunciations
    #[arg(long)]
    pub consider_pronunciation_comments: bool,

    /// Keep '#' comments even if settings enable stripping them
    #[arg(long, conflicts_with = "consider_pronunciation_comments")]
    pub no_consider_pronunciation_comments: bool,

    /// Read the column after the word as weight
    #[arg(long)]
    pub consider_weights: bool,

    /// Read no weight column even if settings enable it
    #[arg(long, conflicts_with = "consider_weights")]
    pub no_consider_weights: bool,
}

/// Dictionary reading and writing arguments. Written dictionaries keep the
/// numbering and weight columns exactly when they were considered on input.
#[derive(Args, Debug, Clone, Default)]
pub struct IoArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Separator between word, weight and pronunciation [default: two spaces]
    #[arg(long)]
    pub parts_sep: Option<String>,
}

/// Arguments of the commands that may empty pronunciations.
#[derive(Args, Debug, Clone, Default)]
pub struct EmptyArgs {
    /// Keep words whose pronunciations all became empty
    #[arg(short = 'k', long, requires = "empty_symbol")]
    pub keep_empty: bool,

    /// Symbol of the placeholder pronunciation of kept empty words
    #[arg(long)]
    pub empty_symbol: Option<String>,

    /// Write removed words to this file
    #[arg(long, value_name = "PATH")]
    pub removed_out: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export vocabulary from dictionaries
    ExportVocabulary {
        /// Dictionary files
        #[arg(required = true, num_args = 1..)]
        dictionaries: Vec<PathBuf>,

        /// Output vocabulary file
        #[arg(short, long)]
        output: PathBuf,

        /// Do not sort the words in the output
        #[arg(short, long)]
        unsorted: bool,

        #[command(flatten)]
        input: InputArgs,
    },

    /// Export phoneme set from dictionaries
    ExportPhonemes {
        /// Dictionary files
        #[arg(required = true, num_args = 1..)]
        dictionaries: Vec<PathBuf>,

        /// Output phoneme set file
        #[arg(short, long)]
        output: PathBuf,

        /// Do not sort the phonemes in the output
        #[arg(short, long)]
        unsorted: bool,

        #[command(flatten)]
        input: InputArgs,
    },

    /// Merge dictionaries together
    Merge {
        /// Dictionary that receives the merge
        dictionary: PathBuf,

        /// Dictionaries merged into DICTIONARY, in order
        #[arg(required = true, num_args = 1..)]
        dictionaries: Vec<PathBuf>,

        /// How words present in both dictionaries are handled
        #[arg(long, value_enum, default_value = "extend")]
        duplicate_handling: MergeModeArg,

        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        mp: MpArgs,
    },

    /// Extract the subset of a dictionary covering a vocabulary
    Extract {
        /// Dictionary file
        dictionary: PathBuf,

        /// Vocabulary file, one word per line
        vocabulary: PathBuf,

        #[command(flatten)]
        io: IoArgs,
    },

    /// Map symbols in pronunciations to another symbol, e.g. ARPAbet to IPA
    MapSymbols {
        /// Dictionary file
        dictionary: PathBuf,

        /// Symbols that are replaced
        #[arg(required = true, num_args = 1..)]
        from_symbols: Vec<String>,

        /// Replacement; split on spaces into several symbols unless partial
        to_symbol: String,

        /// Replace occurrences inside symbols instead of whole symbols
        #[arg(short, long)]
        partial_mapping: bool,

        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        mp: MpArgs,
    },

    /// Map symbols in pronunciations through a JSON mapping table
    MapSymbolsJson {
        /// Dictionary file
        dictionary: PathBuf,

        /// JSON object of symbol to replacement
        mapping: PathBuf,

        /// Replace occurrences inside symbols instead of whole symbols
        #[arg(short, long)]
        partial_mapping: bool,

        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        mp: MpArgs,
    },

    /// Remove symbols from pronunciations
    RemoveSymbolsFromPronunciations {
        /// Dictionary file
        dictionary: PathBuf,

        /// Symbols to remove
        #[arg(required = true, num_args = 1..)]
        symbols: Vec<String>,

        /// Where symbols are removed
        #[arg(short, long, value_enum, default_value = "both")]
        mode: RemovalModeArg,

        #[command(flatten)]
        empty: EmptyArgs,

        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        mp: MpArgs,
    },

    /// Rewrite pronunciations with a regular expression
    ReplaceInPronunciations {
        /// Dictionary file
        dictionary: PathBuf,

        /// Pattern matched against the space-joined pronunciation
        pattern: String,

        /// Replacement text; '$1' or '${name}' refer to groups. A backslash
        /// reference such as '\1' is taken literally
        replace_with: String,

        #[command(flatten)]
        empty: EmptyArgs,

        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        mp: MpArgs,
    },

    /// Remove characters from words; words that become empty are dropped
    RemoveSymbolsFromWords {
        /// Dictionary file
        dictionary: PathBuf,

        /// Characters to remove
        #[arg(required = true, num_args = 1..)]
        symbols: Vec<String>,

        /// Where characters are removed
        #[arg(short, long, value_enum, default_value = "both")]
        mode: RemovalModeArg,

        /// Write words removed entirely to this file
        #[arg(long, value_name = "PATH")]
        removed_out: Option<PathBuf>,

        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        mp: MpArgs,
    },

    /// Remove characters from the words of a vocabulary file
    RemoveSymbolsFromVocabulary {
        /// Vocabulary file, one word per line
        vocabulary: PathBuf,

        /// Characters to remove
        #[arg(required = true, num_args = 1..)]
        symbols: Vec<String>,

        /// Where characters are removed
        #[arg(short, long, value_enum, default_value = "both")]
        mode: RemovalModeArg,

        /// Write words removed entirely to this file
        #[arg(long, value_name = "PATH")]
        removed_out: Option<PathBuf>,

        #[command(flatten)]
        mp: MpArgs,
    },

    /// Change the formatting of dictionaries
    ChangeFormatting {
        /// Dictionary files
        #[arg(required = true, num_args = 1..)]
        dictionaries: Vec<PathBuf>,

        #[command(flatten)]
        input: InputArgs,

        /// Format to write (defaults to the input format)
        #[arg(long)]
        to_format: Option<SerializationFormat>,

        /// Separator between word, weight and pronunciation [default: two spaces]
        #[arg(long)]
        parts_sep: Option<String>,

        /// Number repeated words as 'WORD(2)', 'WORD(3)', ...
        #[arg(long)]
        include_numbers: bool,

        /// Write the weight column
        #[arg(long)]
        include_weights: bool,
    },

    /// Keep a single pronunciation per word
    SelectSinglePronunciation {
        /// Dictionary file
        dictionary: PathBuf,

        /// Which pronunciation is kept
        #[arg(short, long, value_enum, default_value = "first")]
        mode: SelectionModeArg,

        /// Seed for the random modes
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        mp: MpArgs,
    },

    /// Transform all words to lower- or uppercase
    ChangeWordCasing {
        /// Dictionary file
        dictionary: PathBuf,

        /// Target casing
        #[arg(value_enum)]
        mode: CasingModeArg,

        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        mp: MpArgs,
    },

    /// Sort dictionary words
    SortWords {
        /// Dictionary file
        dictionary: PathBuf,

        /// Sort descending
        #[arg(short, long)]
        descending: bool,

        /// Consider casing when comparing words
        #[arg(long)]
        consider_case: bool,

        #[command(flatten)]
        io: IoArgs,
    },

    /// Sort the pronunciations of every word
    SortPronunciations {
        /// Dictionary file
        dictionary: PathBuf,

        /// Sort descending
        #[arg(short, long)]
        descending: bool,

        /// Sort by pronunciation only, ignoring weights
        #[arg(long)]
        ignore_weight: bool,

        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        mp: MpArgs,
    },

    /// Normalize pronunciation weights of every word to sum to one
    NormalizeWeights {
        /// Dictionary file
        dictionary: PathBuf,

        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        mp: MpArgs,
    },

    /// Show or update stored defaults
    Settings {
        /// Set default number of worker threads
        #[arg(long)]
        set_n_jobs: Option<usize>,

        /// Set default chunk size
        #[arg(long)]
        set_chunksize: Option<usize>,

        /// Set default chunks per worker before the pool is rebuilt
        #[arg(long)]
        set_maxtasksperchild: Option<usize>,

        /// Set default dictionary format
        #[arg(long)]
        set_format: Option<SerializationFormat>,

        /// Set default parts separator
        #[arg(long)]
        set_parts_sep: Option<String>,

        /// Set whether comments are considered by default
        #[arg(long)]
        set_consider_comments: Option<bool>,

        /// Set whether word numbers are considered by default
        #[arg(long)]
        set_consider_numbers: Option<bool>,

        /// Set whether pronunciation comments are considered by default
        #[arg(long)]
        set_consider_pronunciation_comments: Option<bool>,

        /// Set whether weights are considered by default
        #[arg(long)]
        set_consider_weights: Option<bool>,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize)]
pub enum SerializationFormat {
    /// Text, one pronunciation per line
    Text,
    /// JSON format
    Json,
    /// Bincode binary format
    Bincode,
}

impl std::fmt::Display for SerializationFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", DictionaryFormat::from(*self))
    }
}

impl From<SerializationFormat> for DictionaryFormat {
    fn from(format: SerializationFormat) -> Self {
        match format {
            SerializationFormat::Text => Self::Text,
            SerializationFormat::Json => Self::Json,
            SerializationFormat::Bincode => Self::Bincode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RemovalModeArg {
    /// At every position
    All,
    /// Only from the start
    Start,
    /// Only from the end
    End,
    /// From the start, then from the end
    Both,
}

impl From<RemovalModeArg> for RemovalMode {
    fn from(mode: RemovalModeArg) -> Self {
        match mode {
            RemovalModeArg::All => Self::All,
            RemovalModeArg::Start => Self::Start,
            RemovalModeArg::End => Self::End,
            RemovalModeArg::Both => Self::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MergeModeArg {
    /// Only add missing words
    Add,
    /// Add missing words and merge the pronunciations of existing ones
    Extend,
    /// Add missing words and replace the pronunciations of existing ones
    Replace,
}

impl From<MergeModeArg> for MergeMode {
    fn from(mode: MergeModeArg) -> Self {
        match mode {
            MergeModeArg::Add => Self::Add,
            MergeModeArg::Extend => Self::Extend,
            MergeModeArg::Replace => Self::Replace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SelectionModeArg {
    /// The first pronunciation
    First,
    /// The last pronunciation
    Last,
    /// The first pronunciation with the highest weight
    HighestWeight,
    /// The first pronunciation with the lowest weight
    LowestWeight,
    /// The first pronunciation with the fewest symbols
    Shortest,
    /// The first pronunciation with the most symbols
    Longest,
    /// A random pronunciation
    Random,
    /// A random pronunciation, higher weights being more likely
    Weighted,
}

impl From<SelectionModeArg> for SelectionMode {
    fn from(mode: SelectionModeArg) -> Self {
        match mode {
            SelectionModeArg::First => Self::First,
            SelectionModeArg::Last => Self::Last,
            SelectionModeArg::HighestWeight => Self::HighestWeight,
            SelectionModeArg::LowestWeight => Self::LowestWeight,
            SelectionModeArg::Shortest => Self::Shortest,
            SelectionModeArg::Longest => Self::Longest,
            SelectionModeArg::Random => Self::Random,
            SelectionModeArg::Weighted => Self::Weighted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CasingModeArg {
    /// Lowercase
    Lower,
    /// Uppercase
    Upper,
}

impl From<CasingModeArg> for CasingMode {
    fn from(mode: CasingModeArg) -> Self {
        match mode {
            CasingModeArg::Lower => Self::Lower,
            CasingModeArg::Upper => Self::Upper,
        }
    }
}
