//! CLI command implementations

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::batch::{BatchOutcome, EmptyPolicy};
use crate::dictionary::{symbol_set, PronunciationDict, WordSet};
use crate::mapping::resolve_mapping_table;
use crate::serialization::{
    read_dictionary, read_mapping_table, read_vocabulary, write_dictionary, write_lines,
    DictionaryFormat, SerializationOptions,
};
use crate::transform::{
    change_word_casing, extract_subset, map_symbols, merge_dictionaries, normalize_weights,
    remove_symbols_from_pronunciations, remove_symbols_from_vocabulary, remove_symbols_from_words,
    replace_symbols_in_pronunciations, select_single_pronunciation, sort_pronunciations,
    sort_words, CharSet, Replacement,
};

use super::args::{Cli, Commands, EmptyArgs, InputArgs, IoArgs, MpArgs, SerializationFormat};
use super::detect::detect_format;
use super::paths::{config_file_path_with_override, PersistentConfig};

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let config = PersistentConfig::load_from(config_path)?;

    match cli.command {
        Commands::ExportVocabulary {
            dictionaries,
            output,
            unsorted,
            input,
        } => {
            let settings = config.merge_with_cli(&MpArgs::default(), &input, None);
            cmd_export_vocabulary(&dictionaries, &output, unsorted, &settings)
        }
        Commands::ExportPhonemes {
            dictionaries,
            output,
            unsorted,
            input,
        } => {
            let settings = config.merge_with_cli(&MpArgs::default(), &input, None);
            cmd_export_phonemes(&dictionaries, &output, unsorted, &settings)
        }
        Commands::Merge {
            dictionary,
            dictionaries,
            duplicate_handling,
            io,
            mp,
        } => cmd_merge(
            &dictionary,
            &dictionaries,
            duplicate_handling.into(),
            &config.merge_with_io(&mp, &io),
        ),
        Commands::Extract {
            dictionary,
            vocabulary,
            io,
        } => cmd_extract(
            &dictionary,
            &vocabulary,
            &config.merge_with_io(&MpArgs::default(), &io),
        ),
        Commands::MapSymbols {
            dictionary,
            from_symbols,
            to_symbol,
            partial_mapping,
            io,
            mp,
        } => cmd_map_symbols(
            &dictionary,
            &from_symbols,
            &to_symbol,
            partial_mapping,
            &config.merge_with_io(&mp, &io),
        ),
        Commands::MapSymbolsJson {
            dictionary,
            mapping,
            partial_mapping,
            io,
            mp,
        } => cmd_map_symbols_json(
            &dictionary,
            &mapping,
            partial_mapping,
            &config.merge_with_io(&mp, &io),
        ),
        Commands::RemoveSymbolsFromPronunciations {
            dictionary,
            symbols,
            mode,
            empty,
            io,
            mp,
        } => {
            let settings = config.merge_with_io(&mp, &io);
            let policy = empty_policy(&empty)?;
            let mut file = DictionaryFile::load(&dictionary, &settings)?;
            let outcome = remove_symbols_from_pronunciations(
                &mut file.dictionary,
                &symbol_set(&symbols),
                mode.into(),
                &policy,
                &settings.multiprocessing_options()?,
            )?;
            finish_batch(&file, &outcome, empty.removed_out.as_deref(), &settings)
        }
        Commands::ReplaceInPronunciations {
            dictionary,
            pattern,
            replace_with,
            empty,
            io,
            mp,
        } => {
            let settings = config.merge_with_io(&mp, &io);
            let policy = empty_policy(&empty)?;
            let mut file = DictionaryFile::load(&dictionary, &settings)?;
            let outcome = replace_symbols_in_pronunciations(
                &mut file.dictionary,
                &pattern,
                &replace_with,
                &policy,
                &settings.multiprocessing_options()?,
            )?;
            finish_batch(&file, &outcome, empty.removed_out.as_deref(), &settings)
        }
        Commands::RemoveSymbolsFromWords {
            dictionary,
            symbols,
            mode,
            removed_out,
            io,
            mp,
        } => {
            let settings = config.merge_with_io(&mp, &io);
            let mut file = DictionaryFile::load(&dictionary, &settings)?;
            let outcome = remove_symbols_from_words(
                &mut file.dictionary,
                &chars_of(&symbols),
                mode.into(),
                &settings.multiprocessing_options()?,
            )?;
            if outcome.changed.is_empty() {
                info!("Didn't change anything.");
                return Ok(());
            }
            info!("Renamed {} word(s).", outcome.changed.len());
            file.save(&settings.serialization_options())?;
            report_removed_words(&outcome.removed_entirely, removed_out.as_deref())
        }
        Commands::RemoveSymbolsFromVocabulary {
            vocabulary,
            symbols,
            mode,
            removed_out,
            mp,
        } => {
            let settings = config.merge_with_cli(&mp, &InputArgs::default(), None);
            cmd_remove_symbols_from_vocabulary(
                &vocabulary,
                &chars_of(&symbols),
                mode.into(),
                removed_out.as_deref(),
                &settings,
            )
        }
        Commands::ChangeFormatting {
            dictionaries,
            input,
            to_format,
            parts_sep,
            include_numbers,
            include_weights,
        } => {
            let settings = config.merge_with_cli(&MpArgs::default(), &input, parts_sep.as_deref());
            let options = SerializationOptions {
                parts_sep: settings.parts_sep(),
                include_numbers,
                include_weights,
            };
            cmd_change_formatting(&dictionaries, to_format, &options, &settings)
        }
        Commands::SelectSinglePronunciation {
            dictionary,
            mode,
            seed,
            io,
            mp,
        } => {
            let settings = config.merge_with_io(&mp, &io);
            let mut file = DictionaryFile::load(&dictionary, &settings)?;
            let changed = select_single_pronunciation(
                &mut file.dictionary,
                mode.into(),
                seed,
                &settings.multiprocessing_options()?,
            )?;
            if !changed.is_empty() {
                info!("Changed pronunciations of {} word(s).", changed.len());
            }
            file.save_if_changed(!changed.is_empty(), &settings)
        }
        Commands::ChangeWordCasing {
            dictionary,
            mode,
            io,
            mp,
        } => {
            let settings = config.merge_with_io(&mp, &io);
            let mut file = DictionaryFile::load(&dictionary, &settings)?;
            let outcome = change_word_casing(
                &mut file.dictionary,
                mode.into(),
                &settings.multiprocessing_options()?,
            )?;
            if !outcome.removed.is_empty() {
                info!(
                    "Changed casing of {} word(s); {} word(s) were created.",
                    outcome.removed.len(),
                    outcome.created.len()
                );
            }
            file.save_if_changed(!outcome.removed.is_empty(), &settings)
        }
        Commands::SortWords {
            dictionary,
            descending,
            consider_case,
            io,
        } => {
            let settings = config.merge_with_io(&MpArgs::default(), &io);
            let mut file = DictionaryFile::load(&dictionary, &settings)?;
            let changed = sort_words(&mut file.dictionary, descending, consider_case);
            file.save_if_changed(changed, &settings)
        }
        Commands::SortPronunciations {
            dictionary,
            descending,
            ignore_weight,
            io,
            mp,
        } => {
            let settings = config.merge_with_io(&mp, &io);
            let mut file = DictionaryFile::load(&dictionary, &settings)?;
            let changed = sort_pronunciations(
                &mut file.dictionary,
                descending,
                ignore_weight,
                &settings.multiprocessing_options()?,
            )?;
            if !changed.is_empty() {
                info!("Sorted pronunciations of {} word(s).", changed.len());
            }
            file.save_if_changed(!changed.is_empty(), &settings)
        }
        Commands::NormalizeWeights { dictionary, io, mp } => {
            let settings = config.merge_with_io(&mp, &io);
            let mut file = DictionaryFile::load(&dictionary, &settings)?;
            let changed =
                normalize_weights(&mut file.dictionary, &settings.multiprocessing_options()?)?;
            if !changed.is_empty() {
                info!("Normalized weights of {} word(s).", changed.len());
            }
            file.save_if_changed(!changed.is_empty(), &settings)
        }
        Commands::Settings {
            set_n_jobs,
            set_chunksize,
            set_maxtasksperchild,
            set_format,
            set_parts_sep,
            set_consider_comments,
            set_consider_numbers,
            set_consider_pronunciation_comments,
            set_consider_weights,
            reset,
        } => {
            let updates = PersistentConfig {
                n_jobs: set_n_jobs,
                chunksize: set_chunksize,
                maxtasksperchild: set_maxtasksperchild,
                format: set_format,
                parts_sep: set_parts_sep,
                consider_comments: set_consider_comments,
                consider_numbers: set_consider_numbers,
                consider_pronunciation_comments: set_consider_pronunciation_comments,
                consider_weights: set_consider_weights,
            };
            cmd_settings(config, updates, reset, config_path)
        }
    }
}

/// A dictionary together with the file and format it was read from.
struct DictionaryFile {
    path: PathBuf,
    format: DictionaryFormat,
    dictionary: PronunciationDict,
}

impl DictionaryFile {
    fn load(path: &Path, settings: &PersistentConfig) -> Result<Self> {
        let detection = detect_format(path, settings.format)?;
        debug!(
            path = %path.display(),
            format = %detection.format,
            method = %detection.method,
            "detected dictionary format"
        );
        let format = DictionaryFormat::from(detection.format);
        let dictionary = load_dictionary(path, format, settings)?;
        Ok(Self {
            path: path.to_path_buf(),
            format,
            dictionary,
        })
    }

    fn save(&self, options: &SerializationOptions) -> Result<()> {
        save_dictionary(&self.dictionary, &self.path, self.format, options)
    }

    fn save_if_changed(&self, changed: bool, settings: &PersistentConfig) -> Result<()> {
        if !changed {
            info!("Didn't change anything.");
            return Ok(());
        }
        self.save(&settings.serialization_options())
    }
}

/// Load a dictionary in the given format
pub fn load_dictionary(
    path: &Path,
    format: DictionaryFormat,
    settings: &PersistentConfig,
) -> Result<PronunciationDict> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let dictionary = read_dictionary(
        BufReader::new(file),
        format,
        settings.deserialization_options(),
    )
    .with_context(|| format!("Failed to load dictionary: {}", path.display()))?;
    info!(
        "Loaded {} word(s) with {} pronunciation(s) from \"{}\".",
        dictionary.len(),
        dictionary.pronunciation_count(),
        path.display()
    );
    Ok(dictionary)
}

/// Save a dictionary in the given format
pub fn save_dictionary(
    dictionary: &PronunciationDict,
    path: &Path,
    format: DictionaryFormat,
    options: &SerializationOptions,
) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    write_dictionary(dictionary, BufWriter::new(file), format, options)
        .with_context(|| format!("Failed to save dictionary: {}", path.display()))?;
    info!("Written dictionary to: \"{}\".", path.display());
    Ok(())
}

/// Write one item per line, creating parent directories as needed
fn save_lines<I, S>(path: &Path, items: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    write_lines(BufWriter::new(file), items)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(())
}

fn empty_policy(args: &EmptyArgs) -> Result<EmptyPolicy> {
    Ok(EmptyPolicy::from_flag(
        args.keep_empty,
        args.empty_symbol.clone(),
    )?)
}

fn chars_of(symbols: &[String]) -> CharSet {
    symbols.iter().flat_map(|symbol| symbol.chars()).collect()
}

fn sorted_words(words: WordSet, unsorted: bool) -> Vec<String> {
    let mut words: Vec<String> = words.into_iter().collect();
    if !unsorted {
        words.sort();
    }
    words
}

fn finish_batch(
    file: &DictionaryFile,
    outcome: &BatchOutcome,
    removed_out: Option<&Path>,
    settings: &PersistentConfig,
) -> Result<()> {
    if outcome.is_unchanged() {
        info!("Didn't change anything.");
        return Ok(());
    }
    info!("Changed pronunciations of {} word(s).", outcome.changed_count());
    file.save(&settings.serialization_options())?;
    report_removed_words(&outcome.removed, removed_out)
}

fn report_removed_words(removed: &WordSet, removed_out: Option<&Path>) -> Result<()> {
    if removed.is_empty() {
        info!("No words were removed.");
        return Ok(());
    }
    warn!("{} word(s) were removed entirely.", removed.len());
    if let Some(path) = removed_out {
        save_lines(path, removed)?;
        info!("Written removed words to: \"{}\".", path.display());
    }
    Ok(())
}

/// Export vocabulary command
fn cmd_export_vocabulary(
    dictionaries: &[PathBuf],
    output: &Path,
    unsorted: bool,
    settings: &PersistentConfig,
) -> Result<()> {
    let mut vocabulary = WordSet::default();
    for path in dictionaries {
        let file = DictionaryFile::load(path, settings)?;
        vocabulary.extend(file.dictionary.vocabulary());
    }
    let words = sorted_words(vocabulary, unsorted);
    save_lines(output, &words)?;
    info!(
        "Written vocabulary containing {} word(s) to: \"{}\".",
        words.len(),
        output.display()
    );
    Ok(())
}

/// Export phonemes command
fn cmd_export_phonemes(
    dictionaries: &[PathBuf],
    output: &Path,
    unsorted: bool,
    settings: &PersistentConfig,
) -> Result<()> {
    let mut phonemes = WordSet::default();
    for path in dictionaries {
        let file = DictionaryFile::load(path, settings)?;
        phonemes.extend(file.dictionary.phoneme_set());
    }
    let phonemes = sorted_words(phonemes, unsorted);
    save_lines(output, &phonemes)?;
    info!(
        "Written phoneme set containing {} phoneme(s) to: \"{}\".",
        phonemes.len(),
        output.display()
    );
    Ok(())
}

/// Merge command
fn cmd_merge(
    dictionary: &Path,
    others: &[PathBuf],
    mode: crate::transform::MergeMode,
    settings: &PersistentConfig,
) -> Result<()> {
    let mut file = DictionaryFile::load(dictionary, settings)?;
    let mut changed = false;
    for path in others {
        let other = DictionaryFile::load(path, settings)?;
        changed |= merge_dictionaries(&mut file.dictionary, &other.dictionary, mode)?;
    }
    file.save_if_changed(changed, settings)
}

/// Extract command
fn cmd_extract(dictionary: &Path, vocabulary: &Path, settings: &PersistentConfig) -> Result<()> {
    let words = File::open(vocabulary)
        .with_context(|| format!("Failed to open file: {}", vocabulary.display()))?;
    let words = read_vocabulary(BufReader::new(words))
        .with_context(|| format!("Failed to read vocabulary: {}", vocabulary.display()))?;

    let mut file = DictionaryFile::load(dictionary, settings)?;
    let removed = extract_subset(&mut file.dictionary, &words);
    if removed > 0 {
        info!(
            "Removed {} word(s); {} word(s) remain.",
            removed,
            file.dictionary.len()
        );
    }
    file.save_if_changed(removed > 0, settings)
}

/// Map symbols command
fn cmd_map_symbols(
    dictionary: &Path,
    from_symbols: &[String],
    to_symbol: &str,
    partial: bool,
    settings: &PersistentConfig,
) -> Result<()> {
    let replacement = if partial {
        Replacement::Partial(to_symbol.to_string())
    } else {
        Replacement::full_from_text(to_symbol)
    };
    let mut file = DictionaryFile::load(dictionary, settings)?;
    let changed = map_symbols(
        &mut file.dictionary,
        &symbol_set(from_symbols),
        &replacement,
        &settings.multiprocessing_options()?,
    )?;
    if !changed.is_empty() {
        info!("Changed pronunciations of {} word(s).", changed.len());
    }
    file.save_if_changed(!changed.is_empty(), settings)
}

/// Map symbols through a JSON mapping table command
fn cmd_map_symbols_json(
    dictionary: &Path,
    mapping: &Path,
    partial: bool,
    settings: &PersistentConfig,
) -> Result<()> {
    let table = File::open(mapping)
        .with_context(|| format!("Failed to open file: {}", mapping.display()))?;
    let table = read_mapping_table(BufReader::new(table))
        .with_context(|| format!("Failed to read mapping: {}", mapping.display()))?;

    let mut file = DictionaryFile::load(dictionary, settings)?;
    let report = resolve_mapping_table(
        &mut file.dictionary,
        &table,
        partial,
        &settings.multiprocessing_options()?,
    )
    .context("Mapping was aborted; the dictionary was not written")?;
    if !report.changed.is_empty() {
        info!("Changed pronunciations of {} word(s).", report.changed.len());
    }
    file.save_if_changed(!report.changed.is_empty(), settings)
}

/// Remove symbols from vocabulary command
fn cmd_remove_symbols_from_vocabulary(
    path: &Path,
    chars: &CharSet,
    mode: crate::transform::RemovalMode,
    removed_out: Option<&Path>,
    settings: &PersistentConfig,
) -> Result<()> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let mut vocabulary = read_vocabulary(BufReader::new(file))
        .with_context(|| format!("Failed to read vocabulary: {}", path.display()))?;

    let outcome = remove_symbols_from_vocabulary(
        &mut vocabulary,
        chars,
        mode,
        &settings.multiprocessing_options()?,
    )?;
    if outcome.changed.is_empty() {
        info!("Didn't change anything.");
        return Ok(());
    }
    info!("Changed {} word(s).", outcome.changed.len());
    save_lines(path, &vocabulary)?;
    info!("Written vocabulary to: \"{}\".", path.display());
    report_removed_words(&outcome.removed_entirely, removed_out)
}

/// Change formatting command
fn cmd_change_formatting(
    dictionaries: &[PathBuf],
    to_format: Option<SerializationFormat>,
    options: &SerializationOptions,
    settings: &PersistentConfig,
) -> Result<()> {
    for path in dictionaries {
        let mut file = DictionaryFile::load(path, settings)?;
        if let Some(format) = to_format {
            file.format = format.into();
        }
        file.save(options)?;
    }
    Ok(())
}

/// Settings command
fn cmd_settings(
    config: PersistentConfig,
    updates: PersistentConfig,
    reset: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    if reset {
        let config = PersistentConfig::default();
        config.save_to(config_path)?;
        println!("{}", "Configuration reset to defaults".green().bold());
        println!();
        print_config(&config, config_path);
        return Ok(());
    }

    let mut config = config;
    let mut changed = false;

    if let Some(n_jobs) = updates.n_jobs {
        config.n_jobs = Some(n_jobs);
        println!("  Set default worker threads: {}", n_jobs.to_string().green());
        changed = true;
    }
    if let Some(chunksize) = updates.chunksize {
        config.chunksize = Some(chunksize);
        println!("  Set default chunk size: {}", chunksize.to_string().green());
        changed = true;
    }
    if let Some(maxtasks) = updates.maxtasksperchild {
        config.maxtasksperchild = Some(maxtasks);
        println!(
            "  Set default tasks per worker: {}",
            maxtasks.to_string().green()
        );
        changed = true;
    }
    if let Some(format) = updates.format {
        config.format = Some(format);
        println!("  Set default format: {}", format.to_string().green());
        changed = true;
    }
    if let Some(parts_sep) = updates.parts_sep {
        println!("  Set default parts separator: {:?}", parts_sep);
        config.parts_sep = Some(parts_sep);
        changed = true;
    }
    for (name, update, slot) in [
        ("comments", updates.consider_comments, &mut config.consider_comments),
        ("numbers", updates.consider_numbers, &mut config.consider_numbers),
        (
            "pronunciation comments",
            updates.consider_pronunciation_comments,
            &mut config.consider_pronunciation_comments,
        ),
        ("weights", updates.consider_weights, &mut config.consider_weights),
    ] {
        if let Some(value) = update {
            *slot = Some(value);
            println!("  Set consider {}: {}", name, enabled(value));
            changed = true;
        }
    }

    // Catch values the commands would reject before storing them.
    config.multiprocessing_options()?;

    if changed {
        config.save_to(config_path)?;
        println!();
        println!("{}", "Configuration saved".green().bold());
    }

    println!();
    print_config(&config, config_path);

    Ok(())
}

fn enabled(value: bool) -> colored::ColoredString {
    if value {
        "enabled".green()
    } else {
        "disabled".red()
    }
}

/// Print current configuration
fn print_config(config: &PersistentConfig, config_path: Option<&Path>) {
    println!("{}", "Current Configuration:".bold().underline());
    println!();

    let auto = || "(auto)".to_string();
    println!(
        "  Worker Threads:  {}",
        config.n_jobs.map_or_else(auto, |n| n.to_string()).yellow()
    );
    println!(
        "  Chunk Size:      {}",
        config.chunksize.map_or_else(auto, |n| n.to_string()).yellow()
    );
    println!(
        "  Tasks/Worker:    {}",
        config
            .maxtasksperchild
            .map_or_else(|| "unlimited".to_string(), |n| n.to_string())
            .yellow()
    );
    println!(
        "  Format:          {}",
        config.format.map_or_else(auto, |f| f.to_string()).yellow()
    );
    println!("  Parts Separator: {:?}", config.parts_sep());
    let options = config.deserialization_options();
    println!("  Comments:        {}", enabled(options.consider_comments));
    println!("  Numbers:         {}", enabled(options.consider_numbers));
    println!(
        "  Pron. Comments:  {}",
        enabled(options.consider_pronunciation_comments)
    );
    println!("  Weights:         {}", enabled(options.consider_weights));

    println!();
    let path = config_file_path_with_override(config_path)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "(unavailable)".to_string());
    println!("  Config file: {}", path.cyan());
}
