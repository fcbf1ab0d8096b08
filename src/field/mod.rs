//! Per-type load/save strategies for single fields.
//!
//! Every type that can be passed to [`Pass::field`][crate::Pass::field]
//! implements [`Field`]. The manager only ever talks to the trait, so
//! supporting a new type means writing one more `impl Field` block;
//! a type without an implementation is rejected at compile time.
//!
//! Built-in strategies:
//! - every primitive integer (stored as a TOML integer, range-checked both ways),
//! - `f32` and `f64` (stored as a TOML float),
//! - `bool`, `String`,
//! - [`chrono::DateTime<Utc>`][chrono::DateTime] (stored as a `YYYY-MM-DDTHH:MM:SSZ` string),
//! - [`PathBuf`][std::path::PathBuf] (stored as its string form).

use toml::{Table, Value};

use crate::error::FieldError;

mod path;
mod scalar;
mod time;

pub use self::time::TIMESTAMP_FORMAT;


/// A load/save strategy operating on one named child of a table.
pub trait Field: Sized {
    /// Decode the value stored under `name` in `table`.
    fn load(table: &Table, name: &str) -> Result<Self, FieldError>;

    /// Encode `self` into `table` under `name`, replacing whatever was there.
    fn save(&self, table: &mut Table, name: &str) -> Result<(), FieldError>;
}


/// Looks `name` up in `table`, mapping absence to [`FieldError::Missing`].
pub fn lookup<'t>(table: &'t Table, name: &str) -> Result<&'t Value, FieldError> {
    table.get(name).ok_or(FieldError::Missing)
}

/// Builds the error for a stored value of the wrong kind.
pub fn mismatch(expected: &'static str, found: &Value) -> FieldError {
    FieldError::TypeMismatch {
        expected,
        found: found.type_str(),
    }
}
