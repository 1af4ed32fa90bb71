//! Reading configuration from disk.
//!
//! [`Loader`] is the explicit context every read goes through: it carries
//! the [`Options`], the [`SecurityPolicy`] and an optional [`FileCheck`],
//! so differently configured loaders can be used side by side.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::defaults;
use crate::error::{Error, ErrorKind, Result};
use crate::merge::merge;
use crate::options::Options;
use crate::parser::{Syntax, parse_bytes};
use crate::resolve::{Candidate, Resolver, standard_dirs};
use crate::security::{FileCheck, SecurityPolicy};
use crate::store::ConfigFile;

/// Reads and folds configuration files.
pub struct Loader {
    options: Options,
    policy: SecurityPolicy,
    check: Option<Box<dyn FileCheck>>,
    delimiters: String,
    comments: String,
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("options", &self.options)
            .field("policy", &self.policy)
            .field("check", &self.check.is_some())
            .field("delimiters", &self.delimiters)
            .field("comments", &self.comments)
            .finish()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    /// Creates a loader with `=` delimiters, `#` comments and no policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: Options::default(),
            policy: SecurityPolicy::default(),
            check: None,
            delimiters: defaults::DELIMITERS.to_string(),
            comments: defaults::COMMENTS.to_string(),
        }
    }

    /// Sets the options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Sets the security policy.
    #[must_use]
    pub fn with_policy(mut self, policy: SecurityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Installs a pre-check run on every file after the policy passed.
    #[must_use]
    pub fn with_check(mut self, check: impl FileCheck + 'static) -> Self {
        self.check = Some(Box::new(check));
        self
    }

    /// Sets the delimiter characters; empty means whole-line keys.
    #[must_use]
    pub fn with_delimiters(mut self, delimiters: impl Into<String>) -> Self {
        self.delimiters = delimiters.into();
        self
    }

    /// Sets the comment characters.
    #[must_use]
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    /// Current options.
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Current security policy.
    #[must_use]
    pub const fn policy(&self) -> &SecurityPolicy {
        &self.policy
    }

    /// Tokenizer settings derived from the options.
    #[must_use]
    pub fn syntax(&self) -> Syntax {
        self.options.syntax(&self.delimiters, &self.comments)
    }

    /// Runs the policy and the pre-check on `path`.
    ///
    /// # Errors
    ///
    /// The first failed policy requirement, or
    /// [`ErrorKind::ParsingCallbackFailed`] if the pre-check vetoes.
    pub fn admit(&self, path: &Path) -> Result<()> {
        self.policy.check(path)?;
        match &self.check {
            Some(check) if !check.allow(path) => Err(Error::file(ErrorKind::ParsingCallbackFailed, path)),
            _ => Ok(()),
        }
    }

    /// Parses a single file.
    ///
    /// # Errors
    ///
    /// Admission errors, [`ErrorKind::NotFound`] if the file cannot be
    /// read, or a syntax error carrying the path and line.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<ConfigFile> {
        let path = path.as_ref();
        self.admit(path)?;

        let path = std::path::absolute(path).map_err(|e| Error::io(ErrorKind::NotFound, path, e))?;
        let bytes = fs::read(&path).map_err(|e| Error::io(ErrorKind::NotFound, &path, e))?;
        let mut file = parse_bytes(&bytes, &self.syntax()).map_err(|e| e.with_path(&path))?;

        tracing::debug!(path = %path.display(), entries = file.len(), "parsed configuration file");
        file.path = Some(path);
        Ok(file)
    }

    /// Resolution plan for `<name><suffix>` over `dirs` (lowest first).
    ///
    /// # Errors
    ///
    /// [`ErrorKind::NotFound`] if nothing exists.
    pub fn candidates(&self, name: Option<&str>, suffix: &str, dirs: &[PathBuf]) -> Result<Vec<Candidate>> {
        Resolver::new(name, suffix, dirs)
            .with_patterns(self.options.drop_in_patterns.clone())
            .with_root_prefix(self.options.root_prefix.as_deref())
            .candidates()
    }

    /// Reads and folds `<name><suffix>` and its drop-ins over `dirs`.
    ///
    /// Files are parsed one at a time and folded immediately.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::NotFound`] if nothing exists; otherwise the first error
    /// of any candidate aborts.
    pub fn read_dirs(&self, name: Option<&str>, suffix: &str, dirs: &[PathBuf]) -> Result<ConfigFile> {
        let candidates = self.candidates(name, suffix, dirs)?;

        let mut merged: Option<ConfigFile> = None;
        for candidate in &candidates {
            let file = self.read_file(&candidate.path)?;
            merged = Some(match merged {
                Some(acc) => merge(&acc, &file),
                None => file,
            });
        }
        merged.ok_or_else(|| ErrorKind::NotFound.into())
    }

    /// Base directories used by [`read_config`](Self::read_config).
    ///
    /// `PARSING_DIRS` wins; otherwise the standard tiers for `project`.
    #[must_use]
    pub fn config_dirs(&self, project: Option<&str>, vendor_dir: Option<&Path>) -> Vec<PathBuf> {
        if self.options.parsing_dirs.is_empty() {
            standard_dirs(vendor_dir, project)
        } else {
            self.options.parsing_dirs.clone()
        }
    }

    /// Reads `<name><suffix>` from the standard tiers of `project`.
    ///
    /// # Errors
    ///
    /// See [`read_dirs`](Self::read_dirs).
    pub fn read_config(
        &self,
        project: Option<&str>,
        vendor_dir: Option<&Path>,
        name: Option<&str>,
        suffix: &str,
    ) -> Result<ConfigFile> {
        let dirs = self.config_dirs(project, vendor_dir);
        self.read_dirs(name, suffix, &dirs)
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
