//! Hierarchical TOML configuration driven by registered sections.
//!
//! A [`Manager`] maps strongly-typed program variables onto named, nested
//! tables of one TOML file. Instead of describing the layout twice (once for
//! reading, once for writing), each top-level table is declared once as a
//! [`Section`] whose body calls [`Pass::field`] for every variable it owns.
//! The same body then runs in both directions:
//!
//! - [`Manager::load`] parses the file and *assigns* every field from it,
//! - [`Manager::save`] *writes* every field into a fresh document.
//!
//! ```no_run
//! use konfig::Manager;
//!
//! struct Settings {
//!     port: i64,
//!     host: String,
//! }
//!
//! let mut settings = Settings {
//!     port: 8080,
//!     host: "localhost".to_string(),
//! };
//!
//! let mut manager = Manager::<Settings>::new("settings.toml");
//! manager.section("server", |pass, state| {
//!     pass.field("port", &mut state.port);
//!     pass.field_or("host", &mut state.host, "localhost".to_string());
//! });
//!
//! // Creates `settings.toml` from the values above if it does not exist yet.
//! if !manager.load(&mut settings).expect("document should parse") {
//!     while let Some(error) = manager.get_err() {
//!         eprintln!("{error}");
//!     }
//! }
//! ```
//!
//! # Internals
//! Sections are visited in registration order, which is also the order their
//! tables appear in the saved document. Each section gets its own top-level
//! scope; bodies may open nested scopes with [`Pass::scope`]. Field failures
//! are collected in an [`ErrorLog`] instead of aborting the pass, so a single
//! load reports every broken field at once. Supporting a new field type means
//! implementing [`Field`] for it.

mod macros;

pub mod error;
pub mod field;
pub mod manager;

pub use error::{ConfigError, DocumentError, ErrorLog, FieldError};
pub use field::Field;
pub use manager::{Manager, Mode, Pass, Section};
