//! Integration tests for CLI functionality

#[cfg(feature = "cli")]
mod cli_integration_tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use tempfile::TempDir;

    use pronunciation_dict_utils::cli::args::SerializationFormat;
    use pronunciation_dict_utils::cli::{execute, Cli, PersistentConfig};

    const DICTIONARY: &str = "\
test  1  T EH1 S T
test(2)  0.5  T EH1 S
read  1  R IY1 D .
";

    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn write(&self, name: &str, contents: &str) -> PathBuf {
            let path = self.path(name);
            fs::write(&path, contents).unwrap();
            path
        }

        fn config(&self) -> PathBuf {
            self.path("config.json")
        }

        /// Run the command line with a private config file
        fn run(&self, args: &[&str]) -> anyhow::Result<()> {
            let config = self.config();
            let mut argv = vec![
                "pronunciation-dict".to_string(),
                "-c".to_string(),
                config.display().to_string(),
            ];
            argv.extend(args.iter().map(|arg| arg.to_string()));
            let cli = Cli::try_parse_from(argv)?;
            execute(cli)
        }
    }

    fn arg(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    #[test]
    fn test_map_symbols_rewrites_the_file() {
        let ws = Workspace::new();
        let dict = ws.write("dict.txt", DICTIONARY);

        ws.run(&[
            "map-symbols",
            arg(&dict),
            "EH1",
            "ˈɛ",
            "--consider-numbers",
            "--consider-weights",
        ])
        .unwrap();

        assert_eq!(
            fs::read_to_string(&dict).unwrap(),
            "test  1  T ˈɛ S T\ntest(2)  0.5  T ˈɛ S\nread  1  R IY1 D .\n"
        );
    }

    #[test]
    fn test_map_symbols_splits_replacement() {
        let ws = Workspace::new();
        let dict = ws.write("dict.txt", "bay  B EY1\n");

        ws.run(&["map-symbols", arg(&dict), "EY1", "ˈe ɪ"]).unwrap();

        assert_eq!(fs::read_to_string(&dict).unwrap(), "bay  B ˈe ɪ\n");
    }

    #[test]
    fn test_unchanged_dictionary_is_not_written() {
        let ws = Workspace::new();
        // Unusual spacing would be normalized by a write
        let dict = ws.write("dict.txt", "bay   B   EY1\n");

        ws.run(&["map-symbols", arg(&dict), "XX", "Y"]).unwrap();
        ws.run(&["sort-words", arg(&dict)]).unwrap();

        assert_eq!(fs::read_to_string(&dict).unwrap(), "bay   B   EY1\n");
    }

    #[test]
    fn test_remove_symbols_writes_removed_words() {
        let ws = Workspace::new();
        let dict = ws.write("dict.txt", "period  .\nread  R IY1 D .\n");
        let removed = ws.path("out/removed.txt");

        ws.run(&[
            "remove-symbols-from-pronunciations",
            arg(&dict),
            ".",
            "--mode",
            "end",
            "--removed-out",
            arg(&removed),
        ])
        .unwrap();

        assert_eq!(fs::read_to_string(&dict).unwrap(), "read  R IY1 D\n");
        assert_eq!(fs::read_to_string(&removed).unwrap(), "period\n");
    }

    #[test]
    fn test_keep_empty_requires_symbol() {
        let ws = Workspace::new();
        let dict = ws.write("dict.txt", "period  .\n");
        assert!(ws
            .run(&["remove-symbols-from-pronunciations", arg(&dict), ".", "-k"])
            .is_err());

        ws.run(&[
            "remove-symbols-from-pronunciations",
            arg(&dict),
            ".",
            "-k",
            "--empty-symbol",
            "sil",
        ])
        .unwrap();
        assert_eq!(fs::read_to_string(&dict).unwrap(), "period  sil\n");
    }

    #[test]
    fn test_map_symbols_json() {
        let ws = Workspace::new();
        let dict = ws.write("dict.txt", "bay  B EY2\nbought  B AO1 T\n");
        let mapping = ws.write("mapping.json", r#"{"EY2": "ˌe ɪ", "AO1": "ˈɔ"}"#);

        ws.run(&["map-symbols-json", arg(&dict), arg(&mapping)]).unwrap();

        assert_eq!(
            fs::read_to_string(&dict).unwrap(),
            "bay  B ˌe ɪ\nbought  B ˈɔ T\n"
        );
    }

    #[test]
    fn test_partial_mapping_with_whitespace_is_rejected() {
        let ws = Workspace::new();
        let dict = ws.write("dict.txt", "bay  B EY2\n");
        let mapping = ws.write("mapping.json", r#"{"EY2": "ˌe ɪ"}"#);

        let err = ws
            .run(&["map-symbols-json", arg(&dict), arg(&mapping), "-p"])
            .unwrap_err();

        assert!(format!("{:#}", err).contains("not written"), "{:#}", err);
        assert_eq!(fs::read_to_string(&dict).unwrap(), "bay  B EY2\n");
    }

    #[test]
    fn test_export_phonemes_and_vocabulary() {
        let ws = Workspace::new();
        let dict = ws.write("dict.txt", "zed  Z EH1 D\nabbey  AE1 B IY0\n");
        let phonemes = ws.path("phonemes.txt");
        let vocabulary = ws.path("vocabulary.txt");

        ws.run(&["export-phonemes", arg(&dict), "-o", arg(&phonemes)])
            .unwrap();
        ws.run(&["export-vocabulary", arg(&dict), "-o", arg(&vocabulary), "-u"])
            .unwrap();

        assert_eq!(
            fs::read_to_string(&phonemes).unwrap(),
            "AE1\nB\nD\nEH1\nIY0\nZ\n"
        );
        assert_eq!(fs::read_to_string(&vocabulary).unwrap(), "zed\nabbey\n");
    }

    #[test]
    fn test_merge_extends_duplicates() {
        let ws = Workspace::new();
        let dict = ws.write("dict.txt", "a  1  A\n");
        let other = ws.write("other.txt", "a  2  A\nb  1  B\n");

        ws.run(&["merge", arg(&dict), arg(&other), "--consider-weights"])
            .unwrap();

        assert_eq!(fs::read_to_string(&dict).unwrap(), "a  3  A\nb  1  B\n");
    }

    #[test]
    fn test_change_formatting_to_json() {
        let ws = Workspace::new();
        let dict = ws.write("dict.txt", "a  A\n");

        ws.run(&["change-formatting", arg(&dict), "--to-format", "json"])
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&dict).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({"a": [[["A"], 1.0]]}));

        // The .txt extension now lies, so the format has to be given
        ws.run(&[
            "change-formatting",
            arg(&dict),
            "-f",
            "json",
            "--to-format",
            "text",
            "--include-weights",
            "--parts-sep",
            "\t",
        ])
        .unwrap();
        assert_eq!(fs::read_to_string(&dict).unwrap(), "a\t1\tA\n");
    }

    #[test]
    fn test_settings_are_stored_and_applied() {
        let ws = Workspace::new();
        ws.run(&[
            "settings",
            "--set-n-jobs",
            "2",
            "--set-consider-weights",
            "true",
            "--set-format",
            "text",
        ])
        .unwrap();

        let stored = PersistentConfig::load_from(Some(&ws.config())).unwrap();
        assert_eq!(stored.n_jobs, Some(2));
        assert_eq!(stored.consider_weights, Some(true));
        assert_eq!(stored.format, Some(SerializationFormat::Text));

        // Weights are now read and written without passing the flag
        let dict = ws.write("dict", "b  2  B\na  1  A\n");
        ws.run(&["sort-words", arg(&dict)]).unwrap();
        assert_eq!(fs::read_to_string(&dict).unwrap(), "a  1  A\nb  2  B\n");

        assert!(ws.run(&["settings", "--set-chunksize", "0"]).is_err());

        ws.run(&["settings", "--reset"]).unwrap();
        assert_eq!(
            PersistentConfig::load_from(Some(&ws.config())).unwrap(),
            PersistentConfig::default()
        );
    }

    #[test]
    fn test_config_must_be_json() {
        let ws = Workspace::new();
        let dict = ws.write("dict.txt", "a  A\n");
        let cli = Cli::try_parse_from([
            "pronunciation-dict",
            "-c",
            arg(&ws.path("config.toml")),
            "sort-words",
            arg(&dict),
        ])
        .unwrap();
        assert!(execute(cli).is_err());
    }
}
