//! Tokenizing helpers for a single physical line.

use crate::error::ErrorKind;

/// Shape of the delimiter set, which decides how a key is split from its
/// value and whether continuation lines are possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterClass {
    /// No delimiters: the whole line is a key.
    WholeLine,
    /// Only blank characters.
    Blank,
    /// Only non-blank characters.
    NonBlank,
    /// Both: blanks pad exactly one non-blank delimiter.
    Mixed,
}

impl DelimiterClass {
    /// Classifies a delimiter set.
    #[must_use]
    pub fn of(delimiters: &str) -> Self {
        let blank = delimiters.chars().filter(|c| c.is_whitespace()).count();
        match (blank, delimiters.chars().count()) {
            (_, 0) => Self::WholeLine,
            (b, n) if b == n => Self::Blank,
            (0, _) => Self::NonBlank,
            _ => Self::Mixed,
        }
    }

    /// Delimiter sets that allow unindented continuation lines.
    #[must_use]
    pub const fn allows_continuation(self) -> bool {
        matches!(self, Self::Blank | Self::NonBlank)
    }
}

/// Splits a trimmed line at the first comment character outside double
/// quotes. The comment text excludes the comment character.
#[must_use]
pub fn split_trailing_comment<'a>(line: &'a str, comments: &str) -> (&'a str, Option<&'a str>) {
    let mut in_quotes = false;
    for (i, c) in line.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if !in_quotes && comments.contains(c) {
            let rest = &line[i + c.len_utf8()..];
            return (line[..i].trim_end(), Some(rest.trim_end()));
        }
    }
    (line, None)
}

/// A key with its optional value, borrowed from the line.
pub type KeyValue<'a> = (&'a str, Option<&'a str>);

/// Splits trimmed content into key and value.
///
/// Returns `Ok(None)` for a line that starts with a delimiter and therefore
/// has no key.
///
/// # Errors
///
/// Returns [`ErrorKind::MissingDelimiter`] when a non-blank delimiter set
/// finds text after the key but no delimiter.
pub fn split_key_value<'a>(
    content: &'a str,
    delimiters: &str,
    class: DelimiterClass,
) -> Result<Option<KeyValue<'a>>, ErrorKind> {
    if class == DelimiterClass::WholeLine {
        return Ok(Some((content, None)));
    }
    let is_delimiter = |c: char| delimiters.contains(c);

    if content.starts_with(|c: char| is_delimiter(c) && !c.is_whitespace()) {
        return Ok(None);
    }

    let key_end = content
        .find(|c: char| is_delimiter(c) || c.is_whitespace())
        .unwrap_or(content.len());
    let (key, rest) = content.split_at(key_end);
    let rest = rest.trim_start();
    if rest.is_empty() {
        return Ok(Some((key, None)));
    }

    let leading_delimiter = rest
        .chars()
        .next()
        .filter(|&c| is_delimiter(c))
        .map(|c| rest[c.len_utf8()..].trim_start());

    let value = match class {
        DelimiterClass::NonBlank => leading_delimiter.ok_or(ErrorKind::MissingDelimiter)?,
        DelimiterClass::Mixed => leading_delimiter.unwrap_or(rest),
        DelimiterClass::Blank | DelimiterClass::WholeLine => rest,
    };
    Ok(Some((key, Some(value))))
}

/// Strips one pair of enclosing double quotes.
///
/// Returns the inner text and `true` only when both quotes are present.
#[must_use]
pub fn unquote(value: &str) -> (&str, bool) {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        (&value[1..value.len() - 1], true)
    } else {
        (value, false)
    }
}

/// Parses a group header line.
///
/// # Errors
///
/// Returns [`ErrorKind::MissingBracket`], [`ErrorKind::TextAfterSection`]
/// or [`ErrorKind::EmptySectionName`].
pub fn group_name(content: &str) -> Result<&str, ErrorKind> {
    let inner = content.strip_prefix('[').unwrap_or(content);
    let close = inner.find(']').ok_or(ErrorKind::MissingBracket)?;
    if !inner[close + 1..].trim().is_empty() {
        return Err(ErrorKind::TextAfterSection);
    }
    let name = inner[..close].trim();
    if name.is_empty() {
        return Err(ErrorKind::EmptySectionName);
    }
    Ok(name)
}

/// Appends `line` to a newline-joined accumulator.
#[must_use]
pub fn append_line(acc: Option<String>, line: &str) -> String {
    match acc {
        Some(mut acc) => {
            acc.push('\n');
            acc.push_str(line);
            acc
        }
        None => line.to_string(),
    }
}

/// Adds `comment` as segment `index` of a trailing comment, padding with
/// empty segments so segment *i* lines up with value line *i*.
#[must_use]
pub fn append_aligned(acc: Option<String>, index: usize, comment: &str) -> String {
    let mut segments: Vec<&str> = acc.as_deref().map_or_else(Vec::new, |c| c.split('\n').collect());
    while segments.len() < index {
        segments.push("");
    }
    segments.push(comment);
    segments.join("\n")
}

#[cfg(test)]
#[path = "line_tests.rs"]
mod tests;
