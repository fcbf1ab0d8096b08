//! The configuration manager and its load/save traversal.
//!
//! A [`Manager`] owns an ordered set of [`Section`]s. Every load or save walks
//! those sections in registration order, opens one top-level scope per section
//! and runs the section body against a fresh [`Pass`]. Bodies call
//! [`Pass::field`] for each of their variables; the pass decides whether that
//! reads from or writes into the document.

use std::{
    fmt::{self, Display, Formatter},
    fs,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use toml::Table;
use tracing::{debug, info};

use crate::error::{ConfigError, DocumentError, ErrorLog};

mod pass;
mod section;

pub use self::pass::Pass;
pub use self::section::{FallibleBody, PureBody, Section, SectionRegistry};


/// How many times `load` may create a missing file before giving up.
const MAX_BOOTSTRAP_ATTEMPTS: usize = 1;


/// Direction of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Load,
    Save,
}

impl Mode {
    pub(crate) fn verb(&self) -> &'static str {
        match self {
            Mode::Load => "unmarshaling",
            Mode::Save => "marshaling",
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Load => f.write_str("load"),
            Mode::Save => f.write_str("save"),
        }
    }
}



/// Maps the fields of `S` onto one TOML file through registered sections.
///
/// `S` is the application state the section bodies read from and write into.
/// The manager never stores it; it is lent to every `load`/`save` call.
///
/// # Error reporting
/// Recoverable failures never abort a pass. They are recorded in the error log
/// and can be inspected with [`Manager::get_err`] (newest first, consuming) or
/// [`Manager::get_all_errors`] (full history). The history is never cleared,
/// so `load` and `save` report `false` once *any* error has been recorded
/// during this manager's lifetime; use [`Manager::error_count`] as a mark and
/// [`ErrorLog::errors_since`] to look at a single call.
pub struct Manager<S> {
    file: PathBuf,
    sections: SectionRegistry<S>,
    errors: ErrorLog,
    mode: Mode,
}

impl<S> Manager<S> {
    pub fn new<P: Into<PathBuf>>(file: P) -> Self {
        Self {
            file: file.into(),
            sections: SectionRegistry::new(),
            errors: ErrorLog::new(),
            mode: Mode::Load,
        }
    }

    /// Path of the backing document.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Direction of the most recent pass (`Load` before any pass).
    pub fn mode(&self) -> Mode {
        self.mode
    }


    /*
     * Section registry
     */

    /// Registers `section` under `name`. Fails if the name is already taken,
    /// in which case the existing section stays in place.
    pub fn register_section<N: Into<String>>(&mut self, name: N, section: Section<S>) -> bool {
        match self.sections.register(name.into(), section) {
            Ok(()) => true,
            Err(error) => {
                self.errors.record(error);
                false
            }
        }
    }

    /// Registers a section body that cannot fail.
    pub fn section<N, F>(&mut self, name: N, body: F) -> bool
    where
        N: Into<String>,
        F: FnMut(&mut Pass<'_>, &mut S) + 'static,
    {
        self.register_section(name, Section::pure(body))
    }

    /// Registers a section body whose `false` result is recorded as a section error.
    pub fn fallible_section<N, F>(&mut self, name: N, body: F) -> bool
    where
        N: Into<String>,
        F: FnMut(&mut Pass<'_>, &mut S) -> bool + 'static,
    {
        self.register_section(name, Section::fallible(body))
    }

    pub fn remove_section(&mut self, name: &str) -> bool {
        match self.sections.remove(name) {
            Ok(_) => true,
            Err(error) => {
                self.errors.record(error);
                false
            }
        }
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains(name)
    }

    /// Section names in traversal order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.names()
    }


    /*
     * Errors
     */

    /// Pops the most recent error that has not been popped yet.
    pub fn get_err(&mut self) -> Option<ConfigError> {
        self.errors.pop()
    }

    /// Every error recorded so far, oldest first.
    pub fn get_all_errors(&self) -> &[ConfigError] {
        self.errors.history()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }


    /*
     * Passes
     */

    /// Loads every section from the backing file.
    ///
    /// A missing file is first created from the current state of `state`
    /// through [`Manager::save`] and then loaded. If that save reports
    /// failure (including because of errors recorded earlier), `FileCreate`
    /// is recorded and nothing is loaded.
    ///
    /// Returns `Ok(true)` if the error history is empty afterwards. Only a
    /// document that fails to parse or serialize is returned as `Err`.
    pub fn load(&mut self, state: &mut S) -> Result<bool, DocumentError> {
        self.mode = Mode::Load;

        let mut bootstrap_attempts = 0;
        while !self.file.exists() {
            if bootstrap_attempts == MAX_BOOTSTRAP_ATTEMPTS || !self.save(state)? {
                self.errors.record(ConfigError::FileCreate {
                    path: self.file.clone(),
                });
                return Ok(false);
            }

            bootstrap_attempts += 1;
            info!(
                file = %self.file.display(),
                "Configuration file was missing, created it from defaults."
            );
        }

        let contents = match fs::read_to_string(&self.file) {
            Ok(contents) => contents,
            Err(error) => {
                self.record_io(error, |path, source| ConfigError::FileRead { path, source });
                return Ok(false);
            }
        };

        self.unmarshal(&contents, state)?;
        Ok(self.errors.is_empty())
    }

    /// Saves every section into the backing file, replacing its contents.
    ///
    /// Returns `Ok(false)` if the file could not be written or if the error
    /// history is not empty.
    pub fn save(&mut self, state: &mut S) -> Result<bool, DocumentError> {
        let written = self.write_document(state)?;
        Ok(written && self.errors.is_empty())
    }

    /// Runs every section in save mode against an empty document and
    /// returns its text form.
    pub fn marshal(&mut self, state: &mut S) -> Result<String, DocumentError> {
        let tree = self.traverse(Mode::Save, Table::new(), state);
        Ok(toml::to_string(&tree)?)
    }

    /// Parses `input` and runs every section in load mode against it.
    ///
    /// Parse failures are returned before any section runs.
    pub fn unmarshal(&mut self, input: &str, state: &mut S) -> Result<(), DocumentError> {
        let tree = input.parse::<Table>()?;
        self.traverse(Mode::Load, tree, state);
        Ok(())
    }

    /// Marshals `state` into the backing file. Returns whether the file was written.
    fn write_document(&mut self, state: &mut S) -> Result<bool, DocumentError> {
        let document = self.marshal(state)?;

        match fs::write(&self.file, document) {
            Ok(()) => Ok(true),
            Err(error) => {
                self.record_io(error, |path, source| ConfigError::FileWrite { path, source });
                Ok(false)
            }
        }
    }

    fn record_io<F>(&mut self, error: io::Error, kind: F)
    where
        F: FnOnce(PathBuf, Arc<io::Error>) -> ConfigError,
    {
        self.errors.record(kind(self.file.clone(), Arc::new(error)));
    }

    /// Visits every section in registration order, one top-level scope each.
    fn traverse(&mut self, mode: Mode, tree: Table, state: &mut S) -> Table {
        self.mode = mode;
        debug!(
            %mode,
            sections = self.sections.len(),
            errors_so_far = self.errors.len(),
            "Starting configuration pass."
        );

        let mut pass = Pass::new(mode, tree, &mut self.errors);

        for (name, section) in self.sections.iter_mut() {
            if !pass.enter_section(name) {
                continue;
            }

            if !section.run(&mut pass, state) {
                pass.record(ConfigError::SectionFailed {
                    name: name.clone(),
                    mode,
                });
            }

            pass.leave_section();
            debug!(section = %name, %mode, "Section processed.");
        }

        pass.into_tree()
    }
}

impl<S> fmt::Debug for Manager<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("file", &self.file)
            .field("sections", &self.sections.names().collect::<Vec<_>>())
            .field("errors", &self.errors.len())
            .field("mode", &self.mode)
            .finish()
    }
}
