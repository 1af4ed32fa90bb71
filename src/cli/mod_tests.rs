//! Tests for CLI argument parsing.

use std::path::PathBuf;

use super::*;

mod parsing {
    use super::*;

    #[test]
    fn show_with_defaults() {
        let cli = Cli::parse_from_iter(["dropconf", "show", "foo"]);

        let Command::Show { target, json } = &cli.command else {
            panic!("expected show");
        };
        assert!(!json);
        assert_eq!(target.name.as_deref(), Some("foo"));
        assert_eq!(target.suffix, ".conf");
        assert_eq!(target.delimiters, "=");
        assert_eq!(target.comments, "#");
        assert!(target.dirs.is_empty());
        assert!(!cli.verbose);
    }

    #[test]
    fn files_without_name() {
        let cli = Cli::parse_from_iter(["dropconf", "files", "--dir", "/a", "--dir", "/b"]);

        assert!(matches!(cli.command, Command::Files { json: false, .. }));
        assert_eq!(cli.target().name, None);
        assert_eq!(
            cli.target().dirs,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }

    #[test]
    fn all_target_options() {
        let cli = Cli::parse_from_iter([
            "dropconf",
            "show",
            "app",
            "--suffix",
            "ini",
            "--project",
            "proj",
            "--vendor-dir",
            "/usr/lib",
            "--delimiters",
            ":",
            "--comments",
            ";",
            "--options",
            "PYTHON_STYLE=1",
            "--json",
            "-v",
        ]);

        let target = cli.target();
        assert_eq!(target.suffix, "ini");
        assert_eq!(target.project.as_deref(), Some("proj"));
        assert_eq!(target.vendor_dir, Some(PathBuf::from("/usr/lib")));
        assert_eq!(target.delimiters, ":");
        assert_eq!(target.comments, ";");
        assert_eq!(target.options.as_deref(), Some("PYTHON_STYLE=1"));
        assert!(matches!(cli.command, Command::Show { json: true, .. }));
        assert!(cli.verbose);
    }
}

mod target {
    use super::*;

    #[test]
    fn loader_applies_option_string() {
        let cli = Cli::parse_from_iter(["dropconf", "show", "x", "-o", "JOIN_SAME_ENTRIES=1"]);
        let loader = cli.target().loader().unwrap();
        assert!(loader.options().join_same_entries);
    }

    #[test]
    fn bad_option_string() {
        let cli = Cli::parse_from_iter(["dropconf", "show", "x", "-o", "BOGUS=1"]);
        assert_eq!(
            cli.target().loader().unwrap_err(),
            crate::ErrorKind::OptionNotFound
        );
    }

    #[test]
    fn explicit_dirs_replace_standard_tiers() {
        let cli = Cli::parse_from_iter(["dropconf", "files", "x", "--dir", "/only"]);
        let loader = cli.target().loader().unwrap();
        assert_eq!(cli.target().dirs(&loader), vec![PathBuf::from("/only")]);
    }

    #[test]
    fn standard_tiers_use_project_and_vendor() {
        let cli = Cli::parse_from_iter(["dropconf", "files", "x", "-p", "proj"]);
        let loader = cli.target().loader().unwrap();
        assert_eq!(
            cli.target().dirs(&loader),
            vec![
                PathBuf::from("/usr/etc/proj"),
                PathBuf::from("/run/proj"),
                PathBuf::from("/etc/proj"),
            ]
        );
    }
}
