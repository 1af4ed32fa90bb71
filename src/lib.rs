//! dropconf: layered configuration files with drop-in directories
//!
//! A library for reading key/value configuration that is spread over
//! vendor, runtime and administrator directories, with `<name>.d` snippet
//! directories layered on top, and merging it into one model.
//!
//! ```no_run
//! use dropconf::Loader;
//!
//! let config = Loader::new()
//!     .read_config(Some("myproject"), None, Some("example"), ".conf")?;
//! let port: Option<i32> = config.get(Some("server"), "port").ok();
//! # Ok::<(), dropconf::Error>(())
//! ```

pub mod cli;
pub mod defaults;
pub mod error;
pub mod loader;
pub mod merge;
pub mod options;
pub mod parser;
pub mod resolve;
pub mod security;
pub mod store;
pub mod writer;

pub use error::{Error, ErrorKind, Location, Result};
pub use loader::Loader;
pub use merge::merge_all;
pub use options::Options;
pub use parser::{Syntax, parse_str};
pub use resolve::{Candidate, CandidateKind, Resolver};
pub use security::{FileCheck, SecurityPolicy};
pub use store::{ConfigFile, Entry, ExtValue, FromValue, GroupId, Lookup, Value};
pub use writer::{render, write_to_dir};
