//! Configuration directory and persistent defaults

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::args::{InputArgs, IoArgs, MpArgs, SerializationFormat};
use crate::batch::MultiprocessingOptions;
use crate::serialization::{DeserializationOptions, SerializationOptions, DEFAULT_PARTS_SEP};

/// Get the configuration directory for pronunciation-dict-utils
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::data_local_dir().context("Could not determine local data directory")?;
    Ok(base.join("pronunciation-dict-utils"))
}

/// Get the default config file path
fn default_config_path() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    Ok(dir.join("config.json"))
}

/// Get the config file path with optional override
pub fn config_file_path_with_override(custom_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = custom_path {
        validate_config_path(path)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(path.to_path_buf())
    } else {
        default_config_path()
    }
}

/// Validate that a config file path has .json extension
pub fn validate_config_path(path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => Ok(()),
        Some(ext) => Err(anyhow::anyhow!(
            "Config file must have .json extension, got .{}. Please use a .json file.",
            ext
        )),
        None => Err(anyhow::anyhow!(
            "Config file must have .json extension. Please add .json to the filename."
        )),
    }
}

/// Stored defaults, overridden by command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PersistentConfig {
    /// Default number of worker threads
    pub n_jobs: Option<usize>,
    /// Default chunk size
    pub chunksize: Option<usize>,
    /// Default chunks per worker before the pool is rebuilt
    pub maxtasksperchild: Option<usize>,
    /// Default dictionary format (auto-detected when unset)
    pub format: Option<SerializationFormat>,
    /// Default separator between word, weight and pronunciation
    pub parts_sep: Option<String>,
    /// Treat ';;;' lines as comments
    pub consider_comments: Option<bool>,
    /// Strip '(N)' numbering from words
    pub consider_numbers: Option<bool>,
    /// Strip '#' comments after pronunciations
    pub consider_pronunciation_comments: Option<bool>,
    /// Read the weight column
    pub consider_weights: Option<bool>,
}

impl PersistentConfig {
    /// Load configuration from the default or a custom path.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(custom_path: Option<&Path>) -> Result<Self> {
        let path = config_file_path_with_override(custom_path)?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to the default or a custom path.
    pub fn save_to(&self, custom_path: Option<&Path>) -> Result<PathBuf> {
        let path = config_file_path_with_override(custom_path)?;
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(path)
    }

    /// Merge with command-line options (CLI options take precedence)
    pub fn merge_with_cli(&self, mp: &MpArgs, input: &InputArgs, parts_sep: Option<&str>) -> Self {
        Self {
            n_jobs: mp.n_jobs.or(self.n_jobs),
            chunksize: mp.chunksize.or(self.chunksize),
            maxtasksperchild: mp.maxtasksperchild.or(self.maxtasksperchild),
            format: input.format.or(self.format),
            parts_sep: parts_sep
                .map(str::to_string)
                .or_else(|| self.parts_sep.clone()),
            consider_comments: flag_or(
                input.consider_comments,
                input.no_consider_comments,
                self.consider_comments,
            ),
            consider_numbers: flag_or(
                input.consider_numbers,
                input.no_consider_numbers,
                self.consider_numbers,
            ),
            consider_pronunciation_comments: flag_or(
                input.consider_pronunciation_comments,
                input.no_consider_pronunciation_comments,
                self.consider_pronunciation_comments,
            ),
            consider_weights: flag_or(
                input.consider_weights,
                input.no_consider_weights,
                self.consider_weights,
            ),
        }
    }

    /// Merge with the I/O and multiprocessing argument groups.
    pub fn merge_with_io(&self, mp: &MpArgs, io: &IoArgs) -> Self {
        self.merge_with_cli(mp, &io.input, io.parts_sep.as_deref())
    }

    /// Validated multiprocessing options.
    pub fn multiprocessing_options(&self) -> Result<MultiprocessingOptions> {
        let defaults = MultiprocessingOptions::default();
        let options = MultiprocessingOptions::new(
            self.n_jobs.unwrap_or(defaults.n_jobs),
            self.chunksize.unwrap_or(defaults.chunksize),
            self.maxtasksperchild,
        )?;
        Ok(options)
    }

    /// Options for reading text dictionaries.
    pub fn deserialization_options(&self) -> DeserializationOptions {
        DeserializationOptions {
            consider_comments: self.consider_comments.unwrap_or(false),
            consider_numbers: self.consider_numbers.unwrap_or(false),
            consider_pronunciation_comments: self.consider_pronunciation_comments.unwrap_or(false),
            consider_weights: self.consider_weights.unwrap_or(false),
        }
    }

    /// Options for writing text dictionaries back: numbering and weights are
    /// written exactly when they were considered on input.
    pub fn serialization_options(&self) -> SerializationOptions {
        let input = self.deserialization_options();
        SerializationOptions {
            parts_sep: self.parts_sep(),
            include_numbers: input.consider_numbers,
            include_weights: input.consider_weights,
        }
    }

    /// Configured parts separator.
    pub fn parts_sep(&self) -> String {
        self.parts_sep
            .clone()
            .unwrap_or_else(|| DEFAULT_PARTS_SEP.to_string())
    }
}

/// A set `--X` or `--no-X` switch wins; otherwise the stored value applies.
fn flag_or(on: bool, off: bool, stored: Option<bool>) -> Option<bool> {
    if on {
        Some(true)
    } else if off {
        Some(false)
    } else {
        stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_stored_values() {
        let stored = PersistentConfig {
            n_jobs: Some(2),
            chunksize: Some(50),
            consider_weights: Some(true),
            parts_sep: Some("\t".to_string()),
            ..Default::default()
        };
        let mp = MpArgs {
            n_jobs: Some(8),
            ..Default::default()
        };
        let input = InputArgs {
            consider_comments: true,
            ..Default::default()
        };

        let merged = stored.merge_with_cli(&mp, &input, None);
        assert_eq!(merged.n_jobs, Some(8));
        assert_eq!(merged.chunksize, Some(50));
        assert_eq!(merged.consider_comments, Some(true));
        assert_eq!(merged.consider_weights, Some(true));
        assert_eq!(merged.parts_sep(), "\t");

        let options = merged.multiprocessing_options().unwrap();
        assert_eq!((options.n_jobs, options.chunksize), (8, 50));

        let ser = merged.serialization_options();
        assert!(ser.include_weights);
        assert!(!ser.include_numbers);
    }

    #[test]
    fn test_off_switch_overrides_stored_setting() {
        let stored = PersistentConfig {
            consider_weights: Some(true),
            consider_numbers: Some(true),
            ..Default::default()
        };
        let input = InputArgs {
            no_consider_weights: true,
            ..Default::default()
        };

        let merged = stored.merge_with_cli(&MpArgs::default(), &input, None);
        assert_eq!(merged.consider_weights, Some(false));
        assert_eq!(merged.consider_numbers, Some(true));
        assert_eq!(merged.consider_comments, None);
        assert!(!merged.deserialization_options().consider_weights);
    }

    #[test]
    fn test_invalid_stored_values_are_reported() {
        let stored = PersistentConfig {
            chunksize: Some(0),
            ..Default::default()
        };
        assert!(stored.multiprocessing_options().is_err());
    }

    #[test]
    fn test_config_round_trip_through_custom_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        assert_eq!(
            PersistentConfig::load_from(Some(&path)).unwrap(),
            PersistentConfig::default()
        );

        let config = PersistentConfig {
            format: Some(SerializationFormat::Json),
            maxtasksperchild: Some(3),
            ..Default::default()
        };
        config.save_to(Some(&path)).unwrap();
        assert_eq!(PersistentConfig::load_from(Some(&path)).unwrap(), config);

        assert!(PersistentConfig::load_from(Some(&dir.path().join("config.toml"))).is_err());
    }
}
