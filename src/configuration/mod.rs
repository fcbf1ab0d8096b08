//! This module contains the demo's configuration structure and the
//! sections that map it onto the configuration file.
//!
//! Your starting point should probably be [`configuration_manager`].
//!
//! # Internals
//! Every table of the configuration file is owned by one structure
//! (e.g. [`ServerConfiguration`] for `[server]`), which exposes a `fields`
//! method. The same method is used as the section body for both loading and
//! saving, so the layout of each table is written down exactly once.

mod structure;
mod utilities;

pub use self::structure::*;
pub use self::utilities::{ensure_parent_directory_exists, get_default_configuration_file_path};
