//! Tests for the admission policy.

use std::path::PathBuf;

use tempfile::TempDir;

use super::*;

fn write_file(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, "k = v\n").unwrap();
    path
}

mod basics {
    use super::*;

    #[test]
    fn default_policy_is_permissive() {
        let policy = SecurityPolicy::default();
        assert!(policy.is_permissive());
        assert!(policy.follow_symlinks);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let error = SecurityPolicy::default()
            .check(&dir.path().join("absent.conf"))
            .unwrap_err();
        assert_eq!(error, ErrorKind::NotFound);
        assert!(error.path().is_some());
    }

    #[test]
    fn existing_file_passes_default_policy() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "a.conf");
        assert!(SecurityPolicy::default().check(&path).is_ok());
    }

    #[test]
    fn closures_are_file_checks() {
        let check = |path: &Path| path.extension().is_some_and(|e| e == "conf");
        assert!(check.allow(Path::new("x.conf")));
        assert!(!check.allow(Path::new("x.txt")));
    }
}

#[cfg(unix)]
mod unix {
    use std::os::unix::fs::{MetadataExt, PermissionsExt, symlink};

    use super::*;

    fn with_mode(path: &Path, mode: u32) {
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }

    #[test]
    fn symlink_rejected_when_not_following() {
        let dir = TempDir::new().unwrap();
        let target = write_file(&dir, "target.conf");
        let link = dir.path().join("link.conf");
        symlink(&target, &link).unwrap();

        let strict = SecurityPolicy {
            follow_symlinks: false,
            ..SecurityPolicy::default()
        };
        assert_eq!(strict.check(&link).unwrap_err(), ErrorKind::FileIsSymlink);
        assert!(strict.check(&target).is_ok());
        assert!(SecurityPolicy::default().check(&link).is_ok());
    }

    #[test]
    fn dangling_symlink_is_not_found() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("dangling.conf");
        symlink(dir.path().join("nowhere"), &link).unwrap();

        assert_eq!(
            SecurityPolicy::default().check(&link).unwrap_err(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn owner_and_group() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "a.conf");
        let meta = fs::metadata(&path).unwrap();

        let matching = SecurityPolicy {
            owner: Some(meta.uid()),
            group: Some(meta.gid()),
            ..SecurityPolicy::default()
        };
        assert!(matching.check(&path).is_ok());

        let wrong_owner = SecurityPolicy {
            owner: Some(meta.uid().wrapping_add(1)),
            ..SecurityPolicy::default()
        };
        assert_eq!(wrong_owner.check(&path).unwrap_err(), ErrorKind::WrongOwner);

        let wrong_group = SecurityPolicy {
            group: Some(meta.gid().wrapping_add(1)),
            ..SecurityPolicy::default()
        };
        assert_eq!(wrong_group.check(&path).unwrap_err(), ErrorKind::WrongGroup);
    }

    #[test]
    fn owner_is_checked_before_permissions() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "a.conf");
        with_mode(&path, 0o644);
        let uid = fs::metadata(&path).unwrap().uid();

        let policy = SecurityPolicy {
            owner: Some(uid.wrapping_add(1)),
            file_mode: Some(0o001),
            ..SecurityPolicy::default()
        };
        assert_eq!(policy.check(&path).unwrap_err(), ErrorKind::WrongOwner);
    }

    #[test]
    fn file_permission_bits_must_all_be_set() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "a.conf");
        with_mode(&path, 0o644);

        let readable = SecurityPolicy {
            file_mode: Some(0o444),
            ..SecurityPolicy::default()
        };
        assert!(readable.check(&path).is_ok());

        let executable = SecurityPolicy {
            file_mode: Some(0o001),
            ..SecurityPolicy::default()
        };
        assert_eq!(
            executable.check(&path).unwrap_err(),
            ErrorKind::WrongFilePermission
        );
    }

    #[test]
    fn directory_permission_bits() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("conf");
        fs::create_dir(&sub).unwrap();
        with_mode(&sub, 0o755);
        let path = sub.join("a.conf");
        fs::write(&path, "k = v\n").unwrap();
        with_mode(&path, 0o644);

        let policy = SecurityPolicy {
            file_mode: Some(0o004),
            dir_mode: Some(0o002),
            ..SecurityPolicy::default()
        };
        assert_eq!(policy.check(&path).unwrap_err(), ErrorKind::WrongDirPermission);

        let policy = SecurityPolicy {
            dir_mode: Some(0o005),
            ..SecurityPolicy::default()
        };
        assert!(policy.check(&path).is_ok());
    }
}
