//! Default values for parsing and resolution.
//!
//! Centralized constants to avoid magic values scattered across the codebase.

/// Default delimiter set.
pub const DELIMITERS: &str = "=";

/// Default comment character set.
pub const COMMENTS: &str = "#";

/// Comment character used when the caller supplies none.
pub const COMMENT_CHAR: char = '#';

/// Character used by the serializer when a store was parsed in whole-line mode.
pub const WHOLE_LINE_DELIMITER: char = ' ';

/// Suffix appended to `<name><suffix>` to form the default drop-in directory.
pub const DROP_IN_SUFFIX: &str = ".d";

/// Vendor tier used when the caller does not name one.
pub const VENDOR_DIR: &str = "/usr/etc";

/// Runtime tier.
pub const RUNTIME_DIR: &str = "/run";

/// Administrator tier.
pub const ADMIN_DIR: &str = "/etc";

/// Name under which the implicit no-group section is registered.
pub const NO_GROUP: &str = "";

/// Returns the default drop-in pattern for `suffix` (e.g. `.conf.d`).
#[must_use]
pub fn drop_in_pattern(suffix: &str) -> String {
    format!("{suffix}{DROP_IN_SUFFIX}")
}
