use std::path::PathBuf;

use toml::{Table, Value};

use super::{lookup, mismatch, Field};
use crate::error::FieldError;


impl Field for PathBuf {
    fn load(table: &Table, name: &str) -> Result<Self, FieldError> {
        match lookup(table, name)? {
            Value::String(raw) => Ok(PathBuf::from(raw)),
            other => Err(mismatch("string", other)),
        }
    }

    fn save(&self, table: &mut Table, name: &str) -> Result<(), FieldError> {
        let Some(as_str) = self.to_str() else {
            return Err(FieldError::NonUtf8Path { path: self.clone() });
        };

        table.insert(name.to_string(), Value::String(as_str.to_string()));
        Ok(())
    }
}
