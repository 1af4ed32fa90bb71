//! CLI argument parsing using clap.
//!
//! The binary is a read-only inspector: `show` prints the merged
//! configuration of a logical name, `files` prints the files that would be
//! folded, in fold order.

mod report;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use report::{EntryView, FileView, GroupView, execute};

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::defaults;
use crate::error::Result;
use crate::loader::Loader;
use crate::options::Options;

/// dropconf: layered configuration inspector
///
/// Resolves a configuration name across vendor, runtime and administrator
/// directories, applies drop-in snippets and prints the result.
#[derive(Debug, Parser)]
#[command(name = "dropconf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for dropconf
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the merged configuration
    Show {
        /// What to resolve
        #[command(flatten)]
        target: Target,

        /// Print JSON instead of configuration text
        #[arg(long)]
        json: bool,
    },

    /// List the files that would be merged, lowest precedence first
    Files {
        /// What to resolve
        #[command(flatten)]
        target: Target,

        /// Print JSON instead of one path per line
        #[arg(long)]
        json: bool,
    },
}

/// Resolution arguments shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct Target {
    /// Configuration name without suffix; omit to read drop-in directories only
    pub name: Option<String>,

    /// File suffix
    #[arg(long, short, default_value = ".conf")]
    pub suffix: String,

    /// Project subdirectory inside each standard tier
    #[arg(long, short)]
    pub project: Option<String>,

    /// Vendor tier (defaults to /usr/etc)
    #[arg(long = "vendor-dir", value_name = "DIR")]
    pub vendor_dir: Option<PathBuf>,

    /// Base directory, lowest precedence first (can be specified multiple times; replaces the standard tiers)
    #[arg(long = "dir", value_name = "DIR")]
    pub dirs: Vec<PathBuf>,

    /// Characters separating key from value
    #[arg(long, default_value = defaults::DELIMITERS)]
    pub delimiters: String,

    /// Characters starting a comment
    #[arg(long, default_value = defaults::COMMENTS)]
    pub comments: String,

    /// Option string, e.g. "JOIN_SAME_ENTRIES=1;PYTHON_STYLE=1"
    #[arg(long, short, value_name = "TAG=VALUE;...")]
    pub options: Option<String>,
}

impl Target {
    /// Builds the loader described by these arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::OptionNotFound`](crate::ErrorKind::OptionNotFound)
    /// for a malformed option string.
    pub fn loader(&self) -> Result<Loader> {
        let options = match &self.options {
            Some(text) => text.parse::<Options>()?,
            None => Options::default(),
        };
        Ok(Loader::new()
            .with_options(options)
            .with_delimiters(self.delimiters.as_str())
            .with_comments(self.comments.as_str()))
    }

    /// Base directories: `--dir` values if given, otherwise the loader's.
    #[must_use]
    pub fn dirs(&self, loader: &Loader) -> Vec<PathBuf> {
        if self.dirs.is_empty() {
            loader.config_dirs(self.project.as_deref(), self.vendor_dir.as_deref())
        } else {
            self.dirs.clone()
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Resolution arguments of the selected subcommand.
    #[must_use]
    pub const fn target(&self) -> &Target {
        match &self.command {
            Command::Show { target, .. } | Command::Files { target, .. } => target,
        }
    }
}
