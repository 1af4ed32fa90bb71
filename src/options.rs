//! Loader options and their `TAG=value;TAG=value` string form.
//!
//! | Tag                 | Value                                  |
//! |---------------------|----------------------------------------|
//! | `JOIN_SAME_ENTRIES` | `0` or `1`                             |
//! | `PYTHON_STYLE`      | `0` or `1`                             |
//! | `CONFIG_DIRS`       | `:`-separated drop-in patterns         |
//! | `PARSING_DIRS`      | `:`-separated base directories, low→high |
//! | `ROOT_PREFIX`       | path prepended to every base directory |

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};
use crate::parser::Syntax;

/// Option tag names.
pub mod tag {
    /// Coalesce repeated keys.
    pub const JOIN_SAME_ENTRIES: &str = "JOIN_SAME_ENTRIES";
    /// Indentation-based continuation.
    pub const PYTHON_STYLE: &str = "PYTHON_STYLE";
    /// Drop-in directory patterns.
    pub const CONFIG_DIRS: &str = "CONFIG_DIRS";
    /// Base directories.
    pub const PARSING_DIRS: &str = "PARSING_DIRS";
    /// Root prefix.
    pub const ROOT_PREFIX: &str = "ROOT_PREFIX";
}

/// Settings that shape parsing and resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Coalesce repeated `(group, key)` pairs within one file.
    pub join_same_entries: bool,
    /// Indentation-based continuation, no inline comments.
    pub python_style: bool,
    /// Drop-in directory patterns appended to `<dir>/<name>`; empty means
    /// the default `<suffix>.d`.
    pub drop_in_patterns: Vec<String>,
    /// Base directories, lowest precedence first; empty means the standard
    /// tiers.
    pub parsing_dirs: Vec<PathBuf>,
    /// Prefix prepended to every base directory.
    pub root_prefix: Option<PathBuf>,
}

impl Options {
    /// Applies an option string on top of the current values.
    ///
    /// Empty segments are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::OptionNotFound`] for an unknown tag, a segment
    /// without `=`, or a malformed flag.
    pub fn apply(&mut self, text: &str) -> Result<()> {
        for segment in text.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (name, value) = segment
                .split_once('=')
                .map(|(n, v)| (n.trim(), v.trim()))
                .ok_or(ErrorKind::OptionNotFound)?;

            match name {
                tag::JOIN_SAME_ENTRIES => self.join_same_entries = parse_flag(value)?,
                tag::PYTHON_STYLE => self.python_style = parse_flag(value)?,
                tag::CONFIG_DIRS => self.drop_in_patterns = split_list(value).map(str::to_string).collect(),
                tag::PARSING_DIRS => self.parsing_dirs = split_list(value).map(PathBuf::from).collect(),
                tag::ROOT_PREFIX => {
                    self.root_prefix = (!value.is_empty()).then(|| PathBuf::from(value));
                }
                _ => {
                    tracing::debug!(tag = name, "unknown option");
                    return Err(ErrorKind::OptionNotFound.into());
                }
            }
        }
        Ok(())
    }

    /// Builds the tokenizer settings for these options.
    #[must_use]
    pub fn syntax(&self, delimiters: &str, comments: &str) -> Syntax {
        Syntax::new(delimiters, comments)
            .with_join_same_entries(self.join_same_entries)
            .with_python_style(self.python_style)
    }
}

impl FromStr for Options {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut options = Self::default();
        options.apply(s)?;
        Ok(options)
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value {
        "1" => Ok(true),
        "0" => Ok(false),
        _ => Err(ErrorKind::OptionNotFound.into()),
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(':').filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
