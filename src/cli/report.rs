//! Output of the inspector subcommands.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;

use super::{Cli, Command, Target};
use crate::error::{ErrorKind, Result};
use crate::resolve::{Candidate, CandidateKind};
use crate::store::ConfigFile;
use crate::writer::render;

/// JSON view of a merged configuration.
#[derive(Debug, Serialize)]
pub struct FileView<'a> {
    /// Origin file; absent for merged results.
    pub path: Option<&'a Path>,
    /// Groups in store order; the no-group block has no name.
    pub groups: Vec<GroupView<'a>>,
}

/// JSON view of one group.
#[derive(Debug, Serialize)]
pub struct GroupView<'a> {
    /// Group name, `None` for the no-group block.
    pub name: Option<&'a str>,
    /// Entries of the group.
    pub entries: Vec<EntryView<'a>>,
}

/// JSON view of one entry.
#[derive(Debug, Serialize)]
pub struct EntryView<'a> {
    /// Key text.
    pub key: &'a str,
    /// Value text, `null` for a key without value.
    pub value: Option<&'a str>,
    /// Line in the file that last defined the key.
    pub line: u64,
    /// Value was written in double quotes.
    pub quoted: bool,
    /// Leading comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_before: Option<&'a str>,
    /// Trailing comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_after: Option<&'a str>,
}

impl<'a> FileView<'a> {
    /// Builds the view of `file`.
    #[must_use]
    pub fn new(file: &'a ConfigFile) -> Self {
        let mut groups: Vec<GroupView<'a>> = Vec::new();
        for entry in file.entries() {
            let name = (!entry.group.is_none()).then(|| file.group_name(entry.group));
            let view = EntryView {
                key: &entry.key,
                value: entry.value(),
                line: entry.line,
                quoted: entry.quoted,
                comment_before: entry.comment_before.as_deref(),
                comment_after: entry.comment_after.as_deref(),
            };
            match groups.last_mut() {
                Some(group) if group.name == name => group.entries.push(view),
                _ => groups.push(GroupView {
                    name,
                    entries: vec![view],
                }),
            }
        }
        Self {
            path: file.path(),
            groups,
        }
    }
}

#[derive(Debug, Serialize)]
struct CandidateView<'a> {
    path: &'a Path,
    tier: usize,
    kind: &'static str,
}

const fn kind_label(kind: CandidateKind) -> &'static str {
    match kind {
        CandidateKind::Main => "main",
        CandidateKind::DropIn => "drop-in",
    }
}

/// Runs the selected subcommand and returns what should be printed.
///
/// # Errors
///
/// Any resolution, admission or parse error.
pub fn execute(cli: &Cli) -> Result<String> {
    match &cli.command {
        Command::Show { target, json } => show(target, *json),
        Command::Files { target, json } => files(target, *json),
    }
}

fn show(target: &Target, json: bool) -> Result<String> {
    let loader = target.loader()?;
    let dirs = target.dirs(&loader);
    let file = loader.read_dirs(target.name.as_deref(), &target.suffix, &dirs)?;

    if json {
        to_json(&FileView::new(&file))
    } else {
        Ok(render(&file))
    }
}

fn files(target: &Target, json: bool) -> Result<String> {
    let loader = target.loader()?;
    let dirs = target.dirs(&loader);
    let candidates = loader.candidates(target.name.as_deref(), &target.suffix, &dirs)?;

    if json {
        let views: Vec<CandidateView<'_>> = candidates
            .iter()
            .map(|c| CandidateView {
                path: &c.path,
                tier: c.tier,
                kind: kind_label(c.kind),
            })
            .collect();
        return to_json(&views);
    }
    Ok(list(&candidates))
}

fn list(candidates: &[Candidate]) -> String {
    let mut out = String::new();
    for candidate in candidates {
        let _ = writeln!(
            out,
            "{:<8}{}",
            kind_label(candidate.kind),
            candidate.path.display()
        );
    }
    out
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value).map_err(|e| {
        tracing::debug!(error = %e, "JSON serialization failed");
        ErrorKind::Unknown
    })?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
