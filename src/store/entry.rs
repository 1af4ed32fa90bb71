//! A single key/value record.

use super::groups::GroupId;

/// One key/value record of a [`ConfigFile`](super::ConfigFile).
///
/// A value of `None` is a key without value, which is distinct from an
/// empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Group the entry belongs to.
    pub group: GroupId,
    /// Key text, never empty for parsed entries.
    pub key: String,
    /// Value text; multi-line values are newline-joined.
    pub value: Option<String>,
    /// 1-based physical line of the key, 0 for entries created in code.
    pub line: u64,
    /// Whole-line comments preceding the entry, newline-joined.
    pub comment_before: Option<String>,
    /// Trailing comment; segment *i* belongs to value line *i*.
    pub comment_after: Option<String>,
    /// Value was wrapped in balanced double quotes.
    pub quoted: bool,
}

impl Entry {
    /// Creates an entry without value, comments or line.
    #[must_use]
    pub fn new(group: GroupId, key: impl Into<String>) -> Self {
        Self {
            group,
            key: key.into(),
            value: None,
            line: 0,
            comment_before: None,
            comment_after: None,
            quoted: false,
        }
    }

    /// Sets the value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the physical line.
    #[must_use]
    pub const fn with_line(mut self, line: u64) -> Self {
        self.line = line;
        self
    }

    /// Returns `true` if this entry is `(group, key)`.
    #[must_use]
    pub fn matches(&self, group: GroupId, key: &str) -> bool {
        self.group == group && self.key == key
    }

    /// Returns the value, `None` for a key without value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}
