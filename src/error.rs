//! Error types shared by every layer of the crate.
//!
//! [`ErrorKind`] is the closed, stable code enumeration; [`Error`] carries a
//! kind plus whatever context the failing call had (file path, line).

use std::borrow::Cow;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Stable error codes.
///
/// The discriminants are part of the public contract and never change;
/// new kinds are only ever appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[repr(u8)]
pub enum ErrorKind {
    /// Catch-all failure.
    #[error("Unknown error")]
    Unknown = 1,
    /// Allocation failure.
    #[error("Out of memory")]
    OutOfMemory = 2,
    /// File or directory does not exist.
    #[error("Configuration file not found")]
    NotFound = 3,
    /// No group matched.
    #[error("Group not found")]
    GroupNotFound = 4,
    /// No key matched.
    #[error("Key not found")]
    KeyNotFound = 5,
    /// Key is missing or empty.
    #[error("Key is NULL or has empty value")]
    EmptyKey = 6,
    /// Creating or writing a file failed.
    #[error("Error creating or writing to a file")]
    WriteError = 7,
    /// Generic parse failure.
    #[error("Parse error")]
    Parse = 8,
    /// Group header without closing `]`.
    #[error("Missing bracket")]
    MissingBracket = 9,
    /// Key followed by text but no delimiter.
    #[error("Missing delimiter")]
    MissingDelimiter = 10,
    /// Group header with nothing between the brackets.
    #[error("Empty section name")]
    EmptySectionName = 11,
    /// Text after the closing `]` of a group header.
    #[error("Text after section")]
    TextAfterSection = 12,
    /// A fold was asked to merge an empty list of files.
    #[error("Conf file list is NULL")]
    FileListIsNull = 13,
    /// Text given to the boolean setter is not a boolean.
    #[error("Wrong boolean value (1/0 true/false yes/no)")]
    WrongBooleanValue = 14,
    /// Typed access to a key that carries no value.
    #[error("Given key has NULL value")]
    KeyHasNullValue = 15,
    /// File owner differs from the required one.
    #[error("File has wrong owner")]
    WrongOwner = 16,
    /// File group differs from the required one.
    #[error("File has wrong group")]
    WrongGroup = 17,
    /// File lacks the required permission bits.
    #[error("File has wrong file permissions")]
    WrongFilePermission = 18,
    /// Containing directory lacks the required permission bits.
    #[error("File has wrong dir permissions")]
    WrongDirPermission = 19,
    /// File is a symlink and following symlinks is disabled.
    #[error("File is a sym link which is not permitted")]
    FileIsSymlink = 20,
    /// The caller's pre-check predicate rejected the file.
    #[error("User defined parsing callback has failed")]
    ParsingCallbackFailed = 21,
    /// A required argument was absent.
    #[error("Given argument is NULL")]
    ArgumentIsNull = 22,
    /// Unknown option tag or malformed option value.
    #[error("Given option not found")]
    OptionNotFound = 23,
    /// Value text cannot be converted to the requested type.
    #[error("Value cannot be converted")]
    ValueConversion = 24,
}

impl ErrorKind {
    /// Every kind, in code order.
    pub const ALL: [Self; 24] = [
        Self::Unknown,
        Self::OutOfMemory,
        Self::NotFound,
        Self::GroupNotFound,
        Self::KeyNotFound,
        Self::EmptyKey,
        Self::WriteError,
        Self::Parse,
        Self::MissingBracket,
        Self::MissingDelimiter,
        Self::EmptySectionName,
        Self::TextAfterSection,
        Self::FileListIsNull,
        Self::WrongBooleanValue,
        Self::KeyHasNullValue,
        Self::WrongOwner,
        Self::WrongGroup,
        Self::WrongFilePermission,
        Self::WrongDirPermission,
        Self::FileIsSymlink,
        Self::ParsingCallbackFailed,
        Self::ArgumentIsNull,
        Self::OptionNotFound,
        Self::ValueConversion,
    ];

    /// Returns the stable numeric code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Looks up a kind by its numeric code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Renders any code as a message, including success and codes this
    /// version does not know about.
    ///
    /// ```
    /// use dropconf::ErrorKind;
    ///
    /// assert_eq!(ErrorKind::describe(0), "Success");
    /// assert_eq!(ErrorKind::describe(9), "Missing bracket");
    /// assert_eq!(ErrorKind::describe(999), "Unknown error 999");
    /// ```
    #[must_use]
    pub fn describe(code: i32) -> Cow<'static, str> {
        if code == 0 {
            return Cow::Borrowed("Success");
        }
        Self::from_code(code).map_or_else(
            || Cow::Owned(format!("Unknown error {code}")),
            |kind| Cow::Owned(kind.to_string()),
        )
    }

    /// Returns `true` for the structural parse kinds.
    #[must_use]
    pub const fn is_syntax(self) -> bool {
        matches!(
            self,
            Self::Parse
                | Self::MissingBracket
                | Self::MissingDelimiter
                | Self::EmptySectionName
                | Self::TextAfterSection
        )
    }

    /// Returns `true` for the security-policy kinds.
    #[must_use]
    pub const fn is_policy(self) -> bool {
        matches!(
            self,
            Self::WrongOwner
                | Self::WrongGroup
                | Self::WrongFilePermission
                | Self::WrongDirPermission
                | Self::FileIsSymlink
                | Self::ParsingCallbackFailed
        )
    }
}

/// Position of a syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// File being parsed, if the text came from a file.
    pub path: Option<PathBuf>,
    /// 1-based physical line number.
    pub line: u64,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}:{}", path.display(), self.line),
            None => write!(f, "line {}", self.line),
        }
    }
}

/// Error returned by every fallible operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure without file context (value accessors, usage errors).
    #[error("{0}")]
    Kind(ErrorKind),

    /// Failure tied to one file or directory.
    #[error("{kind}: '{}'", path.display())]
    File {
        /// What went wrong
        kind: ErrorKind,
        /// File or directory involved
        path: PathBuf,
        /// Underlying I/O error, when there was one
        #[source]
        source: Option<io::Error>,
    },

    /// Structural parse failure at a known position.
    #[error("{kind} at {location}")]
    Syntax {
        /// Which structural rule was violated
        kind: ErrorKind,
        /// Where it was violated
        location: Location,
    },
}

impl Error {
    /// Creates a file-scoped error without an I/O source.
    #[must_use]
    pub fn file(kind: ErrorKind, path: impl Into<PathBuf>) -> Self {
        Self::File {
            kind,
            path: path.into(),
            source: None,
        }
    }

    /// Maps an I/O error on `path` to not-found or the given fallback kind.
    #[must_use]
    pub fn io(fallback: ErrorKind, path: &Path, source: io::Error) -> Self {
        let kind = if source.kind() == io::ErrorKind::NotFound {
            ErrorKind::NotFound
        } else {
            fallback
        };
        Self::File {
            kind,
            path: path.to_path_buf(),
            source: Some(source),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Kind(kind) | Self::File { kind, .. } | Self::Syntax { kind, .. } => *kind,
        }
    }

    /// Returns the stable numeric code of the kind.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.kind().code()
    }

    /// Returns the file involved, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Kind(_) => None,
            Self::File { path, .. } => Some(path),
            Self::Syntax { location, .. } => location.path.as_deref(),
        }
    }

    /// Returns the line of a syntax error.
    #[must_use]
    pub const fn line(&self) -> Option<u64> {
        match self {
            Self::Syntax { location, .. } => Some(location.line),
            _ => None,
        }
    }

    /// Attaches `path` to a syntax error produced from in-memory text.
    #[must_use]
    pub(crate) fn with_path(self, path: &Path) -> Self {
        match self {
            Self::Syntax { kind, location } => Self::Syntax {
                kind,
                location: Location {
                    path: Some(path.to_path_buf()),
                    line: location.line,
                },
            },
            other => other,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::Kind(kind)
    }
}

impl PartialEq<ErrorKind> for Error {
    fn eq(&self, other: &ErrorKind) -> bool {
        self.kind() == *other
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
