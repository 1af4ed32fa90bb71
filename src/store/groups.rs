//! Interned group names.

use crate::defaults;

/// Handle to a group name interned in a [`GroupRegistry`].
///
/// Handles are only meaningful for the registry that issued them. Their
/// ordering follows registration order, which the parser relies on to keep
/// groups in first-appearance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(usize);

impl GroupId {
    /// The implicit section holding entries before any `[section]` header.
    pub const NONE: Self = Self(0);

    /// Returns `true` for the no-group sentinel.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }

    /// Returns the registry index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Set of unique group names referenced by one store.
///
/// The no-group sentinel is always registered first, so [`GroupId::NONE`]
/// is valid for every registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRegistry {
    names: Vec<String>,
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupRegistry {
    /// Creates a registry holding only the no-group sentinel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            names: vec![defaults::NO_GROUP.to_string()],
        }
    }

    /// Returns the handle for `name`, registering it when unseen.
    ///
    /// `None`, `""` and `"[]"` all map to [`GroupId::NONE`].
    pub fn intern(&mut self, name: Option<&str>) -> GroupId {
        let name = normalize(name);
        if let Some(id) = self.position(name) {
            return id;
        }
        self.names.push(name.to_string());
        GroupId(self.names.len() - 1)
    }

    /// Looks up `name` without registering it.
    #[must_use]
    pub fn lookup(&self, name: Option<&str>) -> Option<GroupId> {
        self.position(normalize(name))
    }

    /// Returns the canonical name behind `id`.
    ///
    /// The no-group sentinel has an empty name.
    #[must_use]
    pub fn name(&self, id: GroupId) -> &str {
        self.names.get(id.0).map_or(defaults::NO_GROUP, String::as_str)
    }

    /// Number of registered names, sentinel included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` when only the sentinel is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.len() == 1
    }

    fn position(&self, name: &str) -> Option<GroupId> {
        self.names.iter().position(|n| n == name).map(GroupId)
    }
}

/// Strips surrounding brackets so `"[main]"` and `"main"` address one group.
fn normalize(name: Option<&str>) -> &str {
    let name = name.unwrap_or(defaults::NO_GROUP);
    name.strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_preregistered() {
        let registry = GroupRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.name(GroupId::NONE), "");
        assert!(GroupId::NONE.is_none());
    }

    #[test]
    fn empty_and_absent_names_map_to_sentinel() {
        let mut registry = GroupRegistry::new();
        assert_eq!(registry.intern(None), GroupId::NONE);
        assert_eq!(registry.intern(Some("")), GroupId::NONE);
        assert_eq!(registry.intern(Some("[]")), GroupId::NONE);
        assert!(registry.is_empty());
    }

    #[test]
    fn interning_deduplicates() {
        let mut registry = GroupRegistry::new();
        let first = registry.intern(Some("main"));
        let second = registry.intern(Some("main"));
        let other = registry.intern(Some("other"));

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(registry.len(), 3);
        assert!(first < other);
    }

    #[test]
    fn brackets_are_ignored() {
        let mut registry = GroupRegistry::new();
        let plain = registry.intern(Some("group2"));
        assert_eq!(registry.intern(Some("[group2]")), plain);
        assert_eq!(registry.lookup(Some("[group2]")), Some(plain));
        assert_eq!(registry.name(plain), "group2");
    }

    #[test]
    fn lookup_does_not_register() {
        let registry = GroupRegistry::new();
        assert_eq!(registry.lookup(Some("missing")), None);
        assert_eq!(registry.lookup(None), Some(GroupId::NONE));
        assert_eq!(registry.len(), 1);
    }
}
