use chrono::{DateTime, NaiveDateTime, Utc};
use toml::{Table, Value};

use super::{lookup, mismatch, Field};
use crate::error::FieldError;


/// Timestamps are persisted as ISO-8601 UTC strings with second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";


impl Field for DateTime<Utc> {
    fn load(table: &Table, name: &str) -> Result<Self, FieldError> {
        let raw = match lookup(table, name)? {
            Value::String(raw) => raw,
            other => return Err(mismatch("string", other)),
        };

        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|_| FieldError::InvalidTimestamp { value: raw.clone() })
    }

    fn save(&self, table: &mut Table, name: &str) -> Result<(), FieldError> {
        let formatted = self.format(TIMESTAMP_FORMAT).to_string();

        table.insert(name.to_string(), Value::String(formatted));
        Ok(())
    }
}
