//! Layered merge of configuration stores.
//!
//! Merging folds a *higher* precedence store over a *lower* one:
//!
//! - The no-group block always leads the result.
//! - Groups keep the lower side's order. Within a group every higher entry
//!   replaces the value of the first lower entry with the same key, or is
//!   appended to the group's block.
//! - A block that is empty on the lower side is taken verbatim from the
//!   higher side; groups only the higher side has follow the lower groups
//!   in the higher side's order.
//!
//! Delimiter, comment character and option flags come from the lower store.
//! The merged store has no path.

use crate::error::{ErrorKind, Result};
use crate::store::{ConfigFile, Entry, GroupId, GroupRegistry};

/// Merges `higher` over `lower` into a new store.
#[must_use]
pub fn merge(lower: &ConfigFile, higher: &ConfigFile) -> ConfigFile {
    let mut merged = ConfigFile {
        entries: Vec::with_capacity(lower.len() + higher.len()),
        groups: GroupRegistry::new(),
        delimiter: lower.delimiter,
        comment: lower.comment,
        path: None,
        join_same_entries: lower.join_same_entries,
        python_style: lower.python_style,
    };

    for name in group_order(lower, higher) {
        let id = merged.groups.intern(Some(name));
        let mut block: Vec<Entry> = entries_of(lower, name).map(|e| rebase(e, id)).collect();

        if block.is_empty() {
            block.extend(entries_of(higher, name).map(|e| rebase(e, id)));
        } else {
            for entry in entries_of(higher, name) {
                apply(&mut block, entry, id);
            }
        }
        merged.entries.append(&mut block);
    }

    tracing::trace!(
        lower = lower.len(),
        higher = higher.len(),
        merged = merged.len(),
        "merged stores"
    );
    merged
}

/// Folds `files`, ordered lowest precedence first, into one store.
///
/// Each store is released as soon as it has been merged. A single store is
/// returned untouched.
///
/// # Errors
///
/// Returns [`ErrorKind::FileListIsNull`] when `files` is empty.
pub fn merge_all<I>(files: I) -> Result<ConfigFile>
where
    I: IntoIterator<Item = ConfigFile>,
{
    let mut files = files.into_iter();
    let first = files.next().ok_or(ErrorKind::FileListIsNull)?;

    Ok(files.fold(first, |acc, next| {
        tracing::debug!(path = ?next.path(), "folding configuration");
        merge(&acc, &next)
    }))
}

/// Group names in output order: no-group first, then the lower side's
/// groups, then groups only the higher side has.
fn group_order<'a>(lower: &'a ConfigFile, higher: &'a ConfigFile) -> Vec<&'a str> {
    let mut names = vec![lower.group_name(GroupId::NONE)];
    for file in [lower, higher] {
        for entry in file.entries() {
            let name = file.group_name(entry.group);
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

fn entries_of<'a>(file: &'a ConfigFile, name: &str) -> impl Iterator<Item = &'a Entry> {
    let id = file.registry().lookup(Some(name));
    file.entries()
        .iter()
        .filter(move |e| Some(e.group) == id)
}

fn rebase(entry: &Entry, group: GroupId) -> Entry {
    Entry {
        group,
        ..entry.clone()
    }
}

fn apply(block: &mut Vec<Entry>, entry: &Entry, group: GroupId) {
    match block.iter_mut().find(|e| e.key == entry.key) {
        Some(existing) => {
            existing.value.clone_from(&entry.value);
            existing.quoted = entry.quoted;
        }
        None => block.push(rebase(entry, group)),
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
