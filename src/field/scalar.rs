use toml::{Table, Value};

use super::{lookup, mismatch, Field};
use crate::error::FieldError;


macro_rules! integer_field {
    ($($integer:ty),* $(,)?) => {
        $(
            impl Field for $integer {
                fn load(table: &Table, name: &str) -> Result<Self, FieldError> {
                    match lookup(table, name)? {
                        Value::Integer(raw) => <$integer>::try_from(*raw).map_err(|_| {
                            FieldError::OutOfRange {
                                value: raw.to_string(),
                                target: stringify!($integer),
                            }
                        }),
                        other => Err(mismatch("integer", other)),
                    }
                }

                #[allow(clippy::useless_conversion)]
                fn save(&self, table: &mut Table, name: &str) -> Result<(), FieldError> {
                    let raw = i64::try_from(*self).map_err(|_| FieldError::OutOfRange {
                        value: self.to_string(),
                        target: "i64",
                    })?;

                    table.insert(name.to_string(), Value::Integer(raw));
                    Ok(())
                }
            }
        )*
    };
}

integer_field!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);


impl Field for f64 {
    fn load(table: &Table, name: &str) -> Result<Self, FieldError> {
        match lookup(table, name)? {
            Value::Float(raw) => Ok(*raw),
            other => Err(mismatch("float", other)),
        }
    }

    fn save(&self, table: &mut Table, name: &str) -> Result<(), FieldError> {
        table.insert(name.to_string(), Value::Float(*self));
        Ok(())
    }
}

impl Field for f32 {
    fn load(table: &Table, name: &str) -> Result<Self, FieldError> {
        let raw = f64::load(table, name)?;
        let narrowed = raw as f32;

        // Infinities and NaN are stored as such; finite values must stay finite.
        if raw.is_finite() && !narrowed.is_finite() {
            return Err(FieldError::OutOfRange {
                value: raw.to_string(),
                target: "f32",
            });
        }

        Ok(narrowed)
    }

    fn save(&self, table: &mut Table, name: &str) -> Result<(), FieldError> {
        f64::from(*self).save(table, name)
    }
}


impl Field for bool {
    fn load(table: &Table, name: &str) -> Result<Self, FieldError> {
        match lookup(table, name)? {
            Value::Boolean(raw) => Ok(*raw),
            other => Err(mismatch("boolean", other)),
        }
    }

    fn save(&self, table: &mut Table, name: &str) -> Result<(), FieldError> {
        table.insert(name.to_string(), Value::Boolean(*self));
        Ok(())
    }
}


impl Field for String {
    fn load(table: &Table, name: &str) -> Result<Self, FieldError> {
        match lookup(table, name)? {
            Value::String(raw) => Ok(raw.clone()),
            other => Err(mismatch("string", other)),
        }
    }

    fn save(&self, table: &mut Table, name: &str) -> Result<(), FieldError> {
        table.insert(name.to_string(), Value::String(self.clone()));
        Ok(())
    }
}
