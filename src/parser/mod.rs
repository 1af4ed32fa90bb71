//! Text to [`ConfigFile`] tokenizer.
//!
//! The parser is line oriented: every physical line is either blank, a
//! whole-line comment, a group header, a continuation of the previous value,
//! or a `key<delimiter>value` statement.
//!
//! # Syntax knobs
//!
//! - **Delimiters**: any character of the set separates key from value.
//!   An empty set makes every line a bare key.
//! - **Comments**: any character of the set starts a comment outside double
//!   quotes. Whole-line comments attach to the next entry.
//! - **Python style**: indented lines continue the previous value and inline
//!   comments are not recognized.
//! - **Join same entries**: repeated keys of one group are coalesced.

mod line;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use line::DelimiterClass;

use crate::defaults;
use crate::error::{Error, ErrorKind, Location, Result};
use crate::store::{ConfigFile, Entry, GroupId, GroupRegistry};

use line::{append_aligned, append_line, group_name, split_key_value, split_trailing_comment, unquote};

/// Tokenizer settings for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    /// Characters separating key from value.
    pub delimiters: String,
    /// Characters starting a comment.
    pub comments: String,
    /// Coalesce repeated `(group, key)` pairs after parsing.
    pub join_same_entries: bool,
    /// Indentation-based continuation, no inline comments.
    pub python_style: bool,
}

impl Default for Syntax {
    fn default() -> Self {
        Self::new(defaults::DELIMITERS, defaults::COMMENTS)
    }
}

impl Syntax {
    /// Creates a syntax with both flags off.
    #[must_use]
    pub fn new(delimiters: impl Into<String>, comments: impl Into<String>) -> Self {
        Self {
            delimiters: delimiters.into(),
            comments: comments.into(),
            join_same_entries: false,
            python_style: false,
        }
    }

    /// Sets the join-same-entries flag.
    #[must_use]
    pub const fn with_join_same_entries(mut self, enabled: bool) -> Self {
        self.join_same_entries = enabled;
        self
    }

    /// Sets the python-style flag.
    #[must_use]
    pub const fn with_python_style(mut self, enabled: bool) -> Self {
        self.python_style = enabled;
        self
    }

    /// Delimiter written back by the serializer.
    #[must_use]
    pub fn delimiter_char(&self) -> char {
        self.delimiters
            .chars()
            .next()
            .unwrap_or(defaults::WHOLE_LINE_DELIMITER)
    }

    /// Comment character written back by the serializer.
    #[must_use]
    pub fn comment_char(&self) -> char {
        self.comments.chars().next().unwrap_or(defaults::COMMENT_CHAR)
    }

    fn is_comment(&self, c: char) -> bool {
        self.comments.contains(c)
    }
}

/// Parses raw bytes, decoding invalid UTF-8 lossily.
///
/// # Errors
///
/// See [`parse_str`].
pub fn parse_bytes(bytes: &[u8], syntax: &Syntax) -> Result<ConfigFile> {
    parse_str(&String::from_utf8_lossy(bytes), syntax)
}

/// Parses configuration text.
///
/// The returned store has no path; syntax errors carry the 1-based line.
///
/// # Errors
///
/// Returns [`Error::Syntax`] with one of the structural kinds.
pub fn parse_str(text: &str, syntax: &Syntax) -> Result<ConfigFile> {
    let mut parser = LineParser::new(syntax);
    for (line, raw) in (1_u64..).zip(text.split('\n')) {
        parser.line(line, raw).map_err(|kind| Error::Syntax {
            kind,
            location: Location { path: None, line },
        })?;
    }
    Ok(parser.finish())
}

struct LineParser<'s> {
    syntax: &'s Syntax,
    class: DelimiterClass,
    entries: Vec<Entry>,
    groups: GroupRegistry,
    group: GroupId,
    pending_comment: Option<String>,
    /// Last physical line consumed by the most recent entry.
    last_line: u64,
}

impl<'s> LineParser<'s> {
    fn new(syntax: &'s Syntax) -> Self {
        Self {
            syntax,
            class: DelimiterClass::of(&syntax.delimiters),
            entries: Vec::new(),
            groups: GroupRegistry::new(),
            group: GroupId::NONE,
            pending_comment: None,
            last_line: 0,
        }
    }

    fn line(&mut self, n: u64, raw: &str) -> Result<(), ErrorKind> {
        let trimmed = raw.trim();
        let Some(first) = trimmed.chars().next() else {
            return Ok(());
        };

        if self.syntax.is_comment(first) {
            let text = &trimmed[first.len_utf8()..];
            self.pending_comment = Some(append_line(self.pending_comment.take(), text));
            return Ok(());
        }

        if self.syntax.python_style {
            if raw.starts_with(char::is_whitespace) && self.continues(n) {
                self.continue_value(n, trimmed, None);
                return Ok(());
            }
            return self.statement(n, trimmed, None);
        }

        let (content, comment) = split_trailing_comment(trimmed, &self.syntax.comments);
        self.statement(n, content, comment)
    }

    fn statement(&mut self, n: u64, content: &str, comment: Option<&str>) -> Result<(), ErrorKind> {
        if content.starts_with('[') {
            self.group = self.groups.intern(Some(group_name(content)?));
            return Ok(());
        }

        if !self.syntax.python_style
            && self.class.allows_continuation()
            && !content.contains(|c: char| self.syntax.delimiters.contains(c))
            && self.continues(n)
        {
            self.continue_value(n, content, comment);
            return Ok(());
        }

        // A bare trailing comment with nothing before it.
        if content.is_empty() {
            if let Some(comment) = comment {
                self.pending_comment = Some(append_line(self.pending_comment.take(), comment));
            }
            return Ok(());
        }

        let Some((key, value)) = split_key_value(content, &self.syntax.delimiters, self.class)? else {
            tracing::trace!(line = n, "skipping line without key");
            return Ok(());
        };

        let (value, quoted) = match value.map(unquote) {
            Some((text, quoted)) => (Some(text.to_string()), quoted),
            None => (None, false),
        };

        self.entries.push(Entry {
            group: self.group,
            key: key.to_string(),
            value,
            line: n,
            comment_before: self.pending_comment.take(),
            comment_after: comment.map(str::to_string),
            quoted,
        });
        self.last_line = n;
        Ok(())
    }

    fn continues(&self, n: u64) -> bool {
        self.entries
            .last()
            .is_some_and(|last| last.group == self.group && n == self.last_line + 1)
    }

    fn continue_value(&mut self, n: u64, text: &str, comment: Option<&str>) {
        let Some(entry) = self.entries.last_mut() else {
            return;
        };
        let value = append_line(Some(entry.value.take().unwrap_or_default()), text);
        let index = value.matches('\n').count();
        entry.value = Some(value);
        if let Some(comment) = comment {
            entry.comment_after = Some(append_aligned(entry.comment_after.take(), index, comment));
        }
        self.last_line = n;
        tracing::trace!(line = n, key = %entry.key, "continued value");
    }

    fn finish(self) -> ConfigFile {
        let mut entries = if self.syntax.join_same_entries {
            join_same_entries(self.entries)
        } else {
            self.entries
        };
        entries.sort_by_key(|e| e.group);

        ConfigFile {
            entries,
            groups: self.groups,
            delimiter: self.syntax.delimiter_char(),
            comment: self.syntax.comment_char(),
            path: None,
            join_same_entries: self.syntax.join_same_entries,
            python_style: self.syntax.python_style,
        }
    }
}

/// Folds later duplicates of `(group, key)` into the first occurrence.
fn join_same_entries(entries: Vec<Entry>) -> Vec<Entry> {
    let mut joined: Vec<Entry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match joined.iter_mut().find(|e| e.matches(entry.group, &entry.key)) {
            Some(first) => absorb(first, entry),
            None => joined.push(entry),
        }
    }
    joined
}

fn absorb(first: &mut Entry, later: Entry) {
    match later.value.as_deref() {
        Some(text) if !text.is_empty() => {
            let acc = first.value.take().filter(|acc| !acc.is_empty());
            first.value = Some(append_line(acc, text));
        }
        _ => {
            first.value = Some(String::new());
            first.comment_after = None;
        }
    }
    first.comment_before = join_comments(first.comment_before.take(), later.comment_before);
    first.comment_after = join_comments(first.comment_after.take(), later.comment_after);
}

fn join_comments(acc: Option<String>, next: Option<String>) -> Option<String> {
    match (acc, next) {
        (acc, Some(next)) => Some(append_line(acc, &next)),
        (acc, None) => acc,
    }
}
