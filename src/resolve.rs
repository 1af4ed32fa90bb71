//! Drop-in aware resolution of a logical configuration name.
//!
//! A logical configuration `<name><suffix>` lives in a list of base
//! directories ordered from lowest to highest precedence. Each directory
//! may hold a main file and one or more drop-in directories:
//!
//! ```text
//! /usr/etc/foo.conf          main file (vendor)
//! /usr/etc/foo.conf.d/10.conf
//! /etc/foo.conf              main file (admin, wins over vendor)
//! /etc/foo.conf.d/10.conf    shadows the vendor 10.conf
//! ```
//!
//! Only the highest tier's main file is used. Drop-ins of every tier are
//! collected; when a file name appears in several tiers only the highest
//! one is kept.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::defaults;
use crate::error::{Error, ErrorKind, Result};

/// Role of a resolved file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    /// `<dir>/<name><suffix>`.
    Main,
    /// A snippet from a drop-in directory.
    DropIn,
}

/// One file to fold, in fold order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// File to parse.
    pub path: PathBuf,
    /// Index of the base directory it came from; higher wins.
    pub tier: usize,
    /// Main file or drop-in.
    pub kind: CandidateKind,
}

/// Resolution request for one logical configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    name: Option<String>,
    suffix: String,
    base_dirs: Vec<PathBuf>,
    patterns: Vec<String>,
}

impl Resolver {
    /// Creates a resolver.
    ///
    /// Without a `name` every base directory is scanned as a drop-in
    /// directory. `base_dirs` are ordered lowest precedence first.
    #[must_use]
    pub fn new<I, P>(name: Option<&str>, suffix: &str, base_dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            name: name.filter(|n| !n.is_empty()).map(str::to_string),
            suffix: normalize_suffix(suffix),
            base_dirs: base_dirs.into_iter().map(Into::into).collect(),
            patterns: Vec::new(),
        }
    }

    /// Replaces the drop-in directory patterns (e.g. `.conf.d`).
    ///
    /// An empty list restores the default `<suffix>.d`.
    #[must_use]
    pub fn with_patterns(mut self, patterns: Vec<String>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Prepends `root` to every base directory.
    #[must_use]
    pub fn with_root_prefix(mut self, root: Option<&Path>) -> Self {
        if let Some(root) = root {
            self.base_dirs = self
                .base_dirs
                .iter()
                .map(|dir| root.join(dir.strip_prefix("/").unwrap_or(dir)))
                .collect();
        }
        self
    }

    /// Normalized suffix, always starting with `.` unless empty.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Base directories after prefixing.
    #[must_use]
    pub fn base_dirs(&self) -> &[PathBuf] {
        &self.base_dirs
    }

    /// Produces the ordered candidate list.
    ///
    /// Every directory is scanned before anything is returned, so nothing
    /// is opened during resolution.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotFound`] if no candidate exists anywhere.
    pub fn candidates(&self) -> Result<Vec<Candidate>> {
        let mut found = Vec::new();
        match &self.name {
            Some(name) => {
                found.extend(self.main_file(name));
                for (tier, dir) in self.base_dirs.iter().enumerate() {
                    for pattern in self.patterns() {
                        let drop_in_dir = dir.join(format!("{name}{pattern}"));
                        found.extend(self.scan(tier, &drop_in_dir));
                    }
                }
            }
            None => {
                for (tier, dir) in self.base_dirs.iter().enumerate() {
                    found.extend(self.scan(tier, dir));
                }
            }
        }

        let found = shadow_drop_ins(found);
        if found.is_empty() {
            return Err(self.not_found());
        }
        tracing::debug!(count = found.len(), "resolved configuration files");
        Ok(found)
    }

    fn patterns(&self) -> Vec<String> {
        if self.patterns.is_empty() {
            vec![defaults::drop_in_pattern(&self.suffix)]
        } else {
            self.patterns.clone()
        }
    }

    /// Main file of the highest tier that has one; an empty file counts.
    fn main_file(&self, name: &str) -> Option<Candidate> {
        let file_name = format!("{name}{}", self.suffix);
        self.base_dirs
            .iter()
            .enumerate()
            .rev()
            .map(|(tier, dir)| (tier, dir.join(&file_name)))
            .find(|(_, path)| fs::symlink_metadata(path).is_ok_and(|m| !m.is_dir()))
            .map(|(tier, path)| {
                tracing::debug!(path = %path.display(), tier, "selected main file");
                Candidate {
                    path,
                    tier,
                    kind: CandidateKind::Main,
                }
            })
    }

    /// Files of one drop-in directory, sorted by file name.
    fn scan(&self, tier: usize, dir: &Path) -> Vec<Candidate> {
        if !dir.is_dir() {
            return Vec::new();
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }
            let matches = {
                let name = entry.file_name().to_string_lossy();
                name.len() > self.suffix.len() && name.ends_with(self.suffix.as_str())
            };
            if matches {
                files.push(Candidate {
                    path: entry.into_path(),
                    tier,
                    kind: CandidateKind::DropIn,
                });
            }
        }
        files
    }

    fn not_found(&self) -> Error {
        let Some(dir) = self.base_dirs.last() else {
            return ErrorKind::NotFound.into();
        };
        let path = self
            .name
            .as_ref()
            .map_or_else(|| dir.clone(), |name| dir.join(format!("{name}{}", self.suffix)));
        Error::file(ErrorKind::NotFound, path)
    }
}

/// Keeps only the last occurrence of each drop-in file name.
fn shadow_drop_ins(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen: HashSet<OsString> = HashSet::new();
    let mut kept: Vec<Candidate> = candidates
        .into_iter()
        .rev()
        .filter(|c| {
            if c.kind == CandidateKind::Main {
                return true;
            }
            let name = c.path.file_name().map(ToOwned::to_owned).unwrap_or_default();
            let first = seen.insert(name);
            if !first {
                tracing::trace!(path = %c.path.display(), "drop-in shadowed by a higher tier");
            }
            first
        })
        .collect();
    kept.reverse();
    kept
}

/// Adds the leading `.` to a non-empty suffix.
#[must_use]
pub fn normalize_suffix(suffix: &str) -> String {
    if suffix.is_empty() || suffix.starts_with('.') {
        suffix.to_string()
    } else {
        format!(".{suffix}")
    }
}

/// Standard tiers for a project: `<vendor>/<project>`, `/run/<project>`,
/// `/etc/<project>`.
#[must_use]
pub fn standard_dirs(vendor: Option<&Path>, project: Option<&str>) -> Vec<PathBuf> {
    let vendor = vendor.unwrap_or_else(|| Path::new(defaults::VENDOR_DIR));
    [vendor, Path::new(defaults::RUNTIME_DIR), Path::new(defaults::ADMIN_DIR)]
        .into_iter()
        .map(|dir| match project.filter(|p| !p.is_empty()) {
            Some(project) => dir.join(project),
            None => dir.to_path_buf(),
        })
        .collect()
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
