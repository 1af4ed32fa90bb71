//! Serializing a [`ConfigFile`] back to text.
//!
//! Output layout:
//!
//! ```text
//! top=1
//!
//! [group]
//! # leading comment
//! key=value # trailing comment
//! list=first # first line
//!     second # second line   (python style indents continuation lines)
//! ```
//!
//! Values or comments containing the active comment, quote or delimiter
//! characters in ambiguous positions do not survive a round-trip.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, ErrorKind, Result};
use crate::store::{ConfigFile, Entry, GroupId};

const PYTHON_INDENT: &str = "    ";

/// Renders `file` as configuration text.
#[must_use]
pub fn render(file: &ConfigFile) -> String {
    let mut out = String::new();
    let mut current: Option<GroupId> = None;

    for entry in file.entries() {
        // A bare key right below another entry would read back as a
        // continuation line.
        if current == Some(entry.group) && entry.value.is_none() && !file.python_style() {
            out.push('\n');
        }
        if current != Some(entry.group) {
            if current.is_some() {
                out.push('\n');
            }
            if !entry.group.is_none() {
                let _ = writeln!(out, "[{}]", file.group_name(entry.group));
            }
            current = Some(entry.group);
        }
        render_entry(&mut out, file, entry);
    }
    out
}

fn render_entry(out: &mut String, file: &ConfigFile, entry: &Entry) {
    let comment = file.comment();

    if let Some(before) = &entry.comment_before {
        for segment in before.split('\n') {
            let _ = writeln!(out, "{comment}{segment}");
        }
    }

    let text = match (&entry.value, entry.quoted) {
        (None, _) => entry.key.clone(),
        (Some(value), true) => format!("{}{}\"{value}\"", entry.key, file.delimiter()),
        (Some(value), false) => format!("{}{}{value}", entry.key, file.delimiter()),
    };
    let lines: Vec<&str> = text.split('\n').collect();
    let segments: Vec<&str> = entry
        .comment_after
        .as_deref()
        .map_or_else(Vec::new, |c| c.split('\n').collect());

    for (i, line) in lines.iter().enumerate() {
        if i > 0 && file.python_style() {
            out.push_str(PYTHON_INDENT);
        }
        out.push_str(line);

        let own = if i + 1 == lines.len() {
            segments.get(i..)
        } else {
            segments.get(i..=i)
        };
        for segment in own.unwrap_or_default() {
            // Padding segments only exist to keep alignment.
            if segments.len() == 1 || !segment.is_empty() {
                let _ = write!(out, " {comment}{segment}");
            }
        }
        out.push('\n');
    }
}

/// Writes `file` to `<dir>/<file_name>` and returns the written path.
///
/// The text is written to `<path>.tmp` first and then renamed over the
/// target.
///
/// # Errors
///
/// [`ErrorKind::NotFound`] if `dir` is not a directory,
/// [`ErrorKind::WriteError`] if writing fails.
pub fn write_to_dir(file: &ConfigFile, dir: &Path, file_name: &str) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(Error::file(ErrorKind::NotFound, dir));
    }

    let path = dir.join(file_name);
    let temp_path = PathBuf::from(format!("{}.tmp", path.display()));
    let write_error = |path: &Path, source| Error::File {
        kind: ErrorKind::WriteError,
        path: path.to_path_buf(),
        source: Some(source),
    };

    fs::write(&temp_path, render(file)).map_err(|e| write_error(&temp_path, e))?;
    if let Err(e) = fs::rename(&temp_path, &path) {
        let _ = fs::remove_file(&temp_path);
        return Err(write_error(&path, e));
    }

    tracing::debug!(path = %path.display(), entries = file.len(), "wrote configuration file");
    Ok(path)
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
