//! In-memory configuration model.
//!
//! A [`ConfigFile`] holds ordered entries, the registry of their group
//! names and the per-file metadata needed to write them back. Entries of
//! one group are always contiguous and the no-group block always leads.

mod entry;
mod groups;
mod value;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use entry::Entry;
pub use groups::{GroupId, GroupRegistry};
pub use value::{FromValue, Value, parse_bool, parse_integer};

use std::path::{Path, PathBuf};

use crate::defaults;
use crate::error::{Error, ErrorKind, Result};

/// Outcome of a default-valued get.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The key exists and converted cleanly.
    Found(T),
    /// The key does not exist; carries the caller's fallback.
    Default(T),
}

impl<T> Lookup<T> {
    /// Returns the carried value regardless of origin.
    #[must_use]
    pub fn into_inner(self) -> T {
        match self {
            Self::Found(v) | Self::Default(v) => v,
        }
    }

    /// Returns `true` if the fallback was used.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self, Self::Default(_))
    }
}

/// Everything known about one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtValue {
    /// Value lines, trimmed; a quoted value is a single element.
    pub values: Vec<String>,
    /// Line of the key in its file.
    pub line: u64,
    /// File the store was parsed from.
    pub path: Option<PathBuf>,
    /// Whole-line comments preceding the entry.
    pub comment_before: Option<String>,
    /// Trailing comment.
    pub comment_after: Option<String>,
}

/// Parsed or merged configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub(crate) entries: Vec<Entry>,
    pub(crate) groups: GroupRegistry,
    pub(crate) delimiter: char,
    pub(crate) comment: char,
    pub(crate) path: Option<PathBuf>,
    pub(crate) join_same_entries: bool,
    pub(crate) python_style: bool,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_ini()
    }
}

impl ConfigFile {
    /// Creates an empty store.
    #[must_use]
    pub fn new(delimiter: char, comment: char) -> Self {
        Self {
            entries: Vec::new(),
            groups: GroupRegistry::new(),
            delimiter,
            comment,
            path: None,
            join_same_entries: false,
            python_style: false,
        }
    }

    /// Creates an empty store with `=` and `#`.
    #[must_use]
    pub fn new_ini() -> Self {
        Self::new('=', defaults::COMMENT_CHAR)
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// File the store was parsed from; `None` when built in code or merged.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Delimiter used when writing.
    #[must_use]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Comment character used when writing.
    #[must_use]
    pub const fn comment(&self) -> char {
        self.comment
    }

    /// Repeated keys were coalesced while parsing.
    #[must_use]
    pub const fn join_same_entries(&self) -> bool {
        self.join_same_entries
    }

    /// Indentation continues values and inline comments are not recognized.
    #[must_use]
    pub const fn python_style(&self) -> bool {
        self.python_style
    }

    /// Entries in store order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Registry of group names.
    #[must_use]
    pub const fn registry(&self) -> &GroupRegistry {
        &self.groups
    }

    /// Name of the group an entry belongs to.
    #[must_use]
    pub fn group_name(&self, id: GroupId) -> &str {
        self.groups.name(id)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ========================================================================
    // Entry slots
    // ========================================================================

    /// Appends an entry slot for `(group, key)` at the end of its group.
    ///
    /// A new group is placed at the end of the store, except the no-group
    /// block which always goes first.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::EmptyKey`] if `key` is empty.
    pub fn push_entry(&mut self, group: Option<&str>, key: &str) -> Result<&mut Entry> {
        if key.is_empty() {
            return Err(ErrorKind::EmptyKey.into());
        }
        let id = self.groups.intern(group);
        let at = match self.entries.iter().rposition(|e| e.group == id) {
            Some(last) => last + 1,
            None if id.is_none() => 0,
            None => self.entries.len(),
        };
        self.entries.insert(at, Entry::new(id, key));
        Ok(&mut self.entries[at])
    }

    /// First entry matching `(group, key)`.
    #[must_use]
    pub fn find(&self, group: Option<&str>, key: &str) -> Option<&Entry> {
        let id = self.groups.lookup(group)?;
        self.entries.iter().find(|e| e.matches(id, key))
    }

    /// Mutable access to the first entry matching `(group, key)`.
    pub fn find_mut(&mut self, group: Option<&str>, key: &str) -> Option<&mut Entry> {
        let id = self.groups.lookup(group)?;
        self.entries.iter_mut().find(|e| e.matches(id, key))
    }

    fn require(&self, group: Option<&str>, key: &str) -> Result<&Entry> {
        if key.is_empty() {
            return Err(ErrorKind::EmptyKey.into());
        }
        self.find(group, key)
            .ok_or_else(|| ErrorKind::KeyNotFound.into())
    }

    // ========================================================================
    // Typed access
    // ========================================================================

    /// Reads `(group, key)` as `T`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::KeyNotFound`] if the key does not exist, otherwise the
    /// conversion error of `T`.
    pub fn get<T: FromValue>(&self, group: Option<&str>, key: &str) -> Result<T> {
        let entry = self.require(group, key)?;
        T::from_value(entry.value()).map_err(Error::from)
    }

    /// Reads `(group, key)` as `T`, falling back to `default` only when the
    /// key does not exist.
    ///
    /// # Errors
    ///
    /// Every error of [`get`](Self::get) except key-not-found.
    pub fn get_or<T: FromValue>(&self, group: Option<&str>, key: &str, default: T) -> Result<Lookup<T>> {
        match self.get(group, key) {
            Ok(v) => Ok(Lookup::Found(v)),
            Err(e) if e == ErrorKind::KeyNotFound => Ok(Lookup::Default(default)),
            Err(e) => Err(e),
        }
    }

    /// Reads a 32-bit signed integer.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub fn get_int(&self, group: Option<&str>, key: &str) -> Result<i32> {
        self.get(group, key)
    }

    /// Reads a 64-bit signed integer.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub fn get_int64(&self, group: Option<&str>, key: &str) -> Result<i64> {
        self.get(group, key)
    }

    /// Reads a 32-bit unsigned integer.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub fn get_uint(&self, group: Option<&str>, key: &str) -> Result<u32> {
        self.get(group, key)
    }

    /// Reads a 64-bit unsigned integer.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub fn get_uint64(&self, group: Option<&str>, key: &str) -> Result<u64> {
        self.get(group, key)
    }

    /// Reads a single precision float.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub fn get_float(&self, group: Option<&str>, key: &str) -> Result<f32> {
        self.get(group, key)
    }

    /// Reads a double precision float.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub fn get_double(&self, group: Option<&str>, key: &str) -> Result<f64> {
        self.get(group, key)
    }

    /// Reads the raw value; `None` for a key without value.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::KeyNotFound`] if the key does not exist.
    pub fn get_string(&self, group: Option<&str>, key: &str) -> Result<Option<String>> {
        self.get(group, key)
    }

    /// Reads a boolean.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub fn get_bool(&self, group: Option<&str>, key: &str) -> Result<bool> {
        self.get(group, key)
    }

    /// Reads the value split into lines together with its comments and
    /// origin.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::KeyNotFound`] if the key does not exist.
    pub fn get_ext(&self, group: Option<&str>, key: &str) -> Result<ExtValue> {
        let entry = self.require(group, key)?;
        let values = entry.value().map_or_else(Vec::new, |raw| {
            let trimmed = raw.trim();
            if entry.quoted || trimmed.starts_with('"') {
                vec![trimmed.to_string()]
            } else {
                trimmed.split('\n').map(|l| l.trim().to_string()).collect()
            }
        });

        Ok(ExtValue {
            values,
            line: entry.line,
            path: self.path.clone(),
            comment_before: entry.comment_before.clone(),
            comment_after: entry.comment_after.clone(),
        })
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Sets `(group, key)` to `value`, creating the entry when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::EmptyKey`] if `key` is empty.
    pub fn set(&mut self, group: Option<&str>, key: &str, value: impl Into<Value>) -> Result<()> {
        if key.is_empty() {
            return Err(ErrorKind::EmptyKey.into());
        }
        let text = value.into().into_text();
        let existing = self
            .groups
            .lookup(group)
            .and_then(|id| self.entries.iter().position(|e| e.matches(id, key)));
        let entry = match existing {
            Some(at) => &mut self.entries[at],
            None => self.push_entry(group, key)?,
        };
        entry.value = text;
        entry.quoted = false;
        Ok(())
    }

    /// Sets a boolean from free-form text, normalized to `true`/`false`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::WrongBooleanValue`] for text outside the boolean table,
    /// [`ErrorKind::EmptyKey`] for an empty key.
    pub fn set_bool_text(&mut self, group: Option<&str>, key: &str, text: Option<&str>) -> Result<()> {
        let value = Value::bool_text(text)?;
        self.set(group, key, value)
    }

    // ========================================================================
    // Enumeration
    // ========================================================================

    /// Group names in first-appearance order, without the no-group section.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::GroupNotFound`] if there are no named groups.
    pub fn groups(&self) -> Result<Vec<&str>> {
        let mut seen: Vec<GroupId> = Vec::new();
        for entry in &self.entries {
            if !entry.group.is_none() && !seen.contains(&entry.group) {
                seen.push(entry.group);
            }
        }
        if seen.is_empty() {
            return Err(ErrorKind::GroupNotFound.into());
        }
        Ok(seen.into_iter().map(|id| self.groups.name(id)).collect())
    }

    /// Unique keys of `group` in store order.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::KeyNotFound`] if the group has no entries.
    pub fn keys(&self, group: Option<&str>) -> Result<Vec<&str>> {
        let id = self.groups.lookup(group).ok_or(ErrorKind::KeyNotFound)?;
        let mut keys: Vec<&str> = Vec::new();
        for entry in self.entries.iter().filter(|e| e.group == id) {
            if !keys.contains(&entry.key.as_str()) {
                keys.push(&entry.key);
            }
        }
        if keys.is_empty() {
            return Err(ErrorKind::KeyNotFound.into());
        }
        Ok(keys)
    }

    /// Merges `higher` over `self`; see [`crate::merge`].
    #[must_use]
    pub fn merge(&self, higher: &Self) -> Self {
        crate::merge::merge(self, higher)
    }
}
