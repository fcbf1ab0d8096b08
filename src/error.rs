//! Error kinds and the accumulating error log.
//!
//! Almost every failure during a load or save pass is *recoverable*: it is
//! recorded as a [`ConfigError`] in the manager's [`ErrorLog`] and the pass
//! carries on with the next field or section. The only exception is
//! [`DocumentError`], which is returned directly because there is no document
//! structure left to continue against.

use std::{io, path::PathBuf, sync::Arc};

use miette::Diagnostic;
use thiserror::Error;

use crate::manager::Mode;


/// Why a single field strategy could not load or save its value.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("no such key in the current table")]
    Missing,

    #[error("expected a {expected} value, found a {found} value")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("value {value} does not fit into {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("\"{value}\" is not a timestamp of the form YYYY-MM-DDTHH:MM:SSZ")]
    InvalidTimestamp { value: String },

    #[error("path is not valid UTF-8: {}", .path.display())]
    NonUtf8Path { path: PathBuf },
}


/// A recoverable failure, recorded in the [`ErrorLog`].
#[derive(Error, Diagnostic, Debug, Clone)]
pub enum ConfigError {
    #[error("section {name} already exists")]
    #[diagnostic(code(konfig::registry::duplicate_section))]
    DuplicateSection { name: String },

    #[error("section {name} does not exist")]
    #[diagnostic(code(konfig::registry::missing_section))]
    MissingSection { name: String },

    #[error("scope name cannot be empty")]
    #[diagnostic(code(konfig::scope::empty_name))]
    EmptyScopeName,

    #[error("scope {name} already exists")]
    #[diagnostic(
        code(konfig::scope::duplicate),
        help("every scope name must be unique among its siblings")
    )]
    DuplicateScope { name: String },

    #[error("no active scope to end")]
    #[diagnostic(code(konfig::scope::unbalanced))]
    UnbalancedScope,

    #[error("scope {scope} can only be closed by whoever opened it")]
    #[diagnostic(
        code(konfig::scope::closed_early),
        help("a section body or a Pass::scope body must not end its own scope")
    )]
    ScopeClosedEarly { scope: String },

    #[error("scope {scope} was closed with {count} nested scope(s) still open")]
    #[diagnostic(
        code(konfig::scope::left_open),
        help("pair every begin_scope with an end_scope, or use Pass::scope")
    )]
    ScopeLeftOpen { scope: String, count: usize },

    #[error("no valid table for field {field}")]
    #[diagnostic(code(konfig::field::no_table))]
    NoTable { field: String },

    #[error("field {field} missing or type mismatch")]
    #[diagnostic(code(konfig::field::load))]
    FieldLoad {
        field: String,
        #[source]
        source: FieldError,
    },

    #[error("failed to save field {field}")]
    #[diagnostic(code(konfig::field::save))]
    FieldSave {
        field: String,
        #[source]
        source: FieldError,
    },

    #[error("error {} section {name}", .mode.verb())]
    #[diagnostic(code(konfig::section::failed))]
    SectionFailed { name: String, mode: Mode },

    #[error("failed to create config file {}", .path.display())]
    #[diagnostic(code(konfig::file::create))]
    FileCreate { path: PathBuf },

    #[error("failed to open file {} for reading", .path.display())]
    #[diagnostic(code(konfig::file::read))]
    FileRead {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("failed to open file {} for writing", .path.display())]
    #[diagnostic(code(konfig::file::write))]
    FileWrite {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },
}


/// A failure that aborts the current call outright.
#[derive(Error, Diagnostic, Debug)]
pub enum DocumentError {
    #[error("configuration document could not be parsed")]
    #[diagnostic(code(konfig::document::parse))]
    Parse(#[from] toml::de::Error),

    #[error("configuration document could not be serialized")]
    #[diagnostic(code(konfig::document::serialize))]
    Serialize(#[from] toml::ser::Error),
}



/// Two views over the same stream of recorded failures:
/// the full chronological history and a last-in-first-out inspection queue.
#[derive(Debug, Default, Clone)]
pub struct ErrorLog {
    history: Vec<ConfigError>,
    pending: Vec<ConfigError>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `error` to both the history and the pending queue.
    pub fn record(&mut self, error: ConfigError) {
        tracing::warn!("{error}");

        self.pending.push(error.clone());
        self.history.push(error);
    }

    /// Pops the most recently recorded error that has not been popped yet.
    pub fn pop(&mut self) -> Option<ConfigError> {
        self.pending.pop()
    }

    /// Every error ever recorded, oldest first.
    pub fn history(&self) -> &[ConfigError] {
        &self.history
    }

    /// Errors recorded after the history had length `mark`
    /// (use [`ErrorLog::len`] to obtain a mark before a call).
    pub fn errors_since(&self, mark: usize) -> &[ConfigError] {
        self.history.get(mark..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
