//! Per-file admission checks run before a candidate is opened.
//!
//! # Design
//!
//! - **Policy**: [`SecurityPolicy`] holds the static requirements (owner,
//!   group, permission bits, symlink handling).
//! - **Pre-check**: [`FileCheck`] is the caller's own veto, evaluated after
//!   the policy passed. Plain closures implement it.

use std::fs;
use std::path::Path;

use crate::error::{Error, ErrorKind, Result};

/// Caller-supplied veto on a file about to be parsed.
///
/// Must be `Send + Sync` so a [`Loader`](crate::Loader) can be shared.
pub trait FileCheck: Send + Sync {
    /// Returns `true` to allow parsing `path`.
    fn allow(&self, path: &Path) -> bool;
}

impl<F> FileCheck for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn allow(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Ownership and permission requirements for configuration files.
///
/// Unset fields are not checked. Owner, group and permission checks only
/// apply on Unix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityPolicy {
    /// Required owner uid.
    pub owner: Option<u32>,
    /// Required group gid.
    pub group: Option<u32>,
    /// Permission bits that must all be set on the file.
    pub file_mode: Option<u32>,
    /// Permission bits that must all be set on the containing directory.
    pub dir_mode: Option<u32>,
    /// Whether symlinks are followed; when `false` they are rejected.
    pub follow_symlinks: bool,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            owner: None,
            group: None,
            file_mode: None,
            dir_mode: None,
            follow_symlinks: true,
        }
    }
}

impl SecurityPolicy {
    /// Returns `true` if no requirement is configured.
    #[must_use]
    pub const fn is_permissive(&self) -> bool {
        self.owner.is_none()
            && self.group.is_none()
            && self.file_mode.is_none()
            && self.dir_mode.is_none()
            && self.follow_symlinks
    }

    /// Checks `path` against the policy.
    ///
    /// Order: existence, symlink, owner, group, file permissions,
    /// directory permissions.
    ///
    /// # Errors
    ///
    /// Returns a file-scoped error of the first failed requirement.
    pub fn check(&self, path: &Path) -> Result<()> {
        let link = fs::symlink_metadata(path).map_err(|e| Error::io(ErrorKind::NotFound, path, e))?;
        if link.file_type().is_symlink() && !self.follow_symlinks {
            return Err(Error::file(ErrorKind::FileIsSymlink, path));
        }

        let metadata = fs::metadata(path).map_err(|e| Error::io(ErrorKind::NotFound, path, e))?;
        self.check_ownership(path, &metadata)?;

        if self.dir_mode.is_some() {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let dir_metadata = fs::metadata(dir).map_err(|e| Error::io(ErrorKind::NotFound, dir, e))?;
            if !has_bits(&dir_metadata, self.dir_mode) {
                return Err(Error::file(ErrorKind::WrongDirPermission, path));
            }
        }
        Ok(())
    }

    fn check_ownership(&self, path: &Path, metadata: &fs::Metadata) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;

            if self.owner.is_some_and(|uid| uid != metadata.uid()) {
                return Err(Error::file(ErrorKind::WrongOwner, path));
            }
            if self.group.is_some_and(|gid| gid != metadata.gid()) {
                return Err(Error::file(ErrorKind::WrongGroup, path));
            }
        }
        if !has_bits(metadata, self.file_mode) {
            return Err(Error::file(ErrorKind::WrongFilePermission, path));
        }
        Ok(())
    }
}

#[cfg(unix)]
fn has_bits(metadata: &fs::Metadata, required: Option<u32>) -> bool {
    use std::os::unix::fs::PermissionsExt;

    required.is_none_or(|bits| metadata.permissions().mode() & bits == bits)
}

#[cfg(not(unix))]
fn has_bits(_metadata: &fs::Metadata, _required: Option<u32>) -> bool {
    true
}

#[cfg(test)]
#[path = "security_tests.rs"]
mod tests;
