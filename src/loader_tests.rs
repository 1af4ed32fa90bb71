//! Tests for reading files and folding tiers.

use tempfile::TempDir;

use super::*;

fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn tiers(root: &Path) -> Vec<PathBuf> {
    ["vendor", "run", "etc"].iter().map(|t| root.join(t)).collect()
}

mod single_file {
    use super::*;

    #[test]
    fn records_absolute_path() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "a.conf", "[g]\nk = v\n");

        let file = Loader::new().read_file(&path).unwrap();
        assert_eq!(file.path(), Some(path.as_path()));
        assert!(file.path().unwrap().is_absolute());
        assert_eq!(file.get_string(Some("g"), "k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn missing_file() {
        let dir = TempDir::new().unwrap();
        let error = Loader::new()
            .read_file(dir.path().join("absent.conf"))
            .unwrap_err();
        assert_eq!(error, ErrorKind::NotFound);
    }

    #[test]
    fn syntax_error_carries_path_and_line() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "bad.conf", "a = 1\n\n[broken\n");

        let error = Loader::new().read_file(&path).unwrap_err();
        assert_eq!(error, ErrorKind::MissingBracket);
        assert_eq!(error.line(), Some(3));
        assert_eq!(error.path(), Some(path.as_path()));
    }

    #[test]
    fn custom_syntax() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "a.ini", "[Section]\nkey : value ; note\n");

        let file = Loader::new()
            .with_delimiters(":")
            .with_comments(";")
            .read_file(&path)
            .unwrap();
        let entry = file.find(Some("Section"), "key").unwrap();
        assert_eq!(entry.value(), Some("value"));
        assert_eq!(entry.comment_after.as_deref(), Some(" note"));
        assert_eq!(file.delimiter(), ':');
    }

    #[test]
    fn options_reach_the_parser() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "a.conf", "k=a\nk=b\n");

        let options: Options = "JOIN_SAME_ENTRIES=1".parse().unwrap();
        let file = Loader::new().with_options(options).read_file(&path).unwrap();
        assert_eq!(file.len(), 1);
        assert_eq!(file.get_string(None, "k").unwrap().as_deref(), Some("a\nb"));
    }
}

mod admission {
    use super::*;

    #[test]
    fn check_can_veto() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "a.conf", "k=v\n");

        let loader = Loader::new().with_check(|_: &Path| false);
        assert_eq!(
            loader.read_file(&path).unwrap_err(),
            ErrorKind::ParsingCallbackFailed
        );

        let loader = Loader::new().with_check(|p: &Path| p.ends_with("a.conf"));
        assert!(loader.read_file(&path).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn policy_runs_before_check() {
        use std::os::unix::fs::symlink;
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let dir = TempDir::new().unwrap();
        let target = write(dir.path(), "a.conf", "k=v\n");
        let link = dir.path().join("link.conf");
        symlink(&target, &link).unwrap();

        let called = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&called);
        let loader = Loader::new()
            .with_policy(SecurityPolicy {
                follow_symlinks: false,
                ..SecurityPolicy::default()
            })
            .with_check(move |_: &Path| {
                seen.store(true, Ordering::SeqCst);
                true
            });

        assert_eq!(loader.read_file(&link).unwrap_err(), ErrorKind::FileIsSymlink);
        assert!(!called.load(Ordering::SeqCst));
    }
}

mod tiers_fold {
    use super::*;

    #[test]
    fn admin_overrides_vendor_and_drop_ins_apply_on_top() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "vendor/foo.conf", "[main]\na = vendor\nb = vendor\n");
        write(root, "etc/foo.conf", "[main]\na = admin\n");
        write(root, "vendor/foo.conf.d/10-x.conf", "[main]\nb = dropin\nc = 1\n");
        write(root, "run/foo.conf.d/20-y.conf", "[extra]\nd = 2\n");

        let file = Loader::new()
            .read_dirs(Some("foo"), "conf", &tiers(root))
            .unwrap();

        assert_eq!(file.get_string(Some("main"), "a").unwrap().as_deref(), Some("admin"));
        // The vendor main file is masked by the admin one.
        assert_eq!(file.get_string(Some("main"), "b").unwrap().as_deref(), Some("dropin"));
        assert_eq!(file.get_int(Some("main"), "c").unwrap(), 1);
        assert_eq!(file.get_int(Some("extra"), "d").unwrap(), 2);
        assert_eq!(file.path(), None);
    }

    #[test]
    fn single_candidate_keeps_its_path() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "etc/foo.conf", "k=v\n");

        let file = Loader::new()
            .read_dirs(Some("foo"), ".conf", &tiers(dir.path()))
            .unwrap();
        assert_eq!(file.path(), Some(path.as_path()));
    }

    #[test]
    fn nothing_to_read() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            Loader::new()
                .read_dirs(Some("foo"), "conf", &tiers(dir.path()))
                .unwrap_err(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn shadowed_drop_in_is_never_opened() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "vendor/foo.conf.d/10.conf", "[oops\n");
        write(root, "etc/foo.conf.d/10.conf", "k = admin\n");

        let file = Loader::new()
            .read_dirs(Some("foo"), "conf", &tiers(root))
            .unwrap();
        assert_eq!(file.get_string(None, "k").unwrap().as_deref(), Some("admin"));
    }

    #[test]
    fn masked_main_file_is_never_opened() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "vendor/foo.conf", "[oops\n");
        let admin = write(root, "etc/foo.conf", "");

        let file = Loader::new()
            .read_dirs(Some("foo"), "conf", &tiers(root))
            .unwrap();
        assert!(file.is_empty());
        assert_eq!(file.path(), Some(admin.as_path()));
    }

    #[test]
    fn check_only_sees_surviving_candidates() {
        use std::sync::{Arc, Mutex};

        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "vendor/foo.conf", "a = vendor\n");
        let admin = write(root, "etc/foo.conf", "a = admin\n");
        write(root, "vendor/foo.conf.d/10.conf", "b = vendor\n");
        let drop_in = write(root, "etc/foo.conf.d/10.conf", "b = admin\n");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = Arc::clone(&seen);
        let file = Loader::new()
            .with_check(move |p: &Path| {
                record.lock().unwrap().push(p.to_path_buf());
                true
            })
            .read_dirs(Some("foo"), "conf", &tiers(root))
            .unwrap();

        assert_eq!(file.get_string(None, "b").unwrap().as_deref(), Some("admin"));
        assert_eq!(*seen.lock().unwrap(), vec![admin, drop_in]);
    }

    #[test]
    fn broken_drop_in_aborts() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "etc/foo.conf", "k=v\n");
        let bad = write(root, "etc/foo.conf.d/bad.conf", "[oops\n");

        let error = Loader::new()
            .read_dirs(Some("foo"), "conf", &tiers(root))
            .unwrap_err();
        assert_eq!(error, ErrorKind::MissingBracket);
        assert_eq!(error.path(), Some(bad.as_path()));
    }

    #[test]
    fn parsing_dirs_and_root_prefix_options() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "lib/app/app.conf", "k = lib\n");
        write(root, "cfg/app/app.conf.d/x.conf", "k = cfg\n");

        let options: Options = format!(
            "PARSING_DIRS=/lib/app:/cfg/app;ROOT_PREFIX={}",
            root.display()
        )
        .parse()
        .unwrap();
        let loader = Loader::new().with_options(options);

        let file = loader.read_config(Some("ignored"), None, Some("app"), "conf").unwrap();
        assert_eq!(file.get_string(None, "k").unwrap().as_deref(), Some("cfg"));

        let dirs = loader.config_dirs(None, None);
        assert_eq!(dirs, vec![PathBuf::from("/lib/app"), PathBuf::from("/cfg/app")]);
    }

    #[test]
    fn standard_tiers_without_parsing_dirs() {
        let loader = Loader::new();
        assert_eq!(
            loader.config_dirs(Some("proj"), Some(Path::new("/usr/lib"))),
            vec![
                PathBuf::from("/usr/lib/proj"),
                PathBuf::from("/run/proj"),
                PathBuf::from("/etc/proj"),
            ]
        );
    }
}
