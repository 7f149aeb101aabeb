//! Default value transfer used by the bundled row sources.
//!
//! Self-scanning handles get the raw value, discard handles drop it, and
//! address handles are written when the field has one of the supported
//! types. Everything else is a transfer error.

use std::any::Any;

use rowbind_core::error::BoxError;
use rowbind_core::handle::Handle;
use rowbind_core::value::Value;

use crate::error::{IoError, Result};

/// Write `value` through `handle`.
///
/// Errors from a self-scanning field are returned unchanged.
pub fn assign(handle: &mut Handle<'_>, value: Value) -> std::result::Result<(), BoxError> {
    match handle {
        Handle::Discard => Ok(()),
        Handle::Scanner(scanner) => scanner.scan(value),
        Handle::Field(field) => assign_field(&mut **field, value).map_err(Into::into),
    }
}

/// Types a bundled source can write into directly.
pub trait FromValue: Sized {
    const NAME: &'static str;

    fn from_value(value: Value) -> Result<Self>;
}

fn convert_err<T: FromValue>(value: &Value) -> IoError {
    IoError::Convert {
        from: value.kind(),
        to: T::NAME,
    }
}

fn parse<T>(input: String) -> Result<T>
where
    T: FromValue + std::str::FromStr,
{
    match input.trim().parse::<T>() {
        Ok(v) => Ok(v),
        Err(_) => Err(IoError::Parse { input, to: T::NAME }),
    }
}

impl FromValue for Value {
    const NAME: &'static str = "Value";

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for String {
    const NAME: &'static str = "String";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Str(s) => Ok(s),
            Value::Bin(b) => String::from_utf8(b).map_err(|e| IoError::Parse {
                input: String::from_utf8_lossy(e.as_bytes()).into_owned(),
                to: Self::NAME,
            }),
            Value::Bool(v) => Ok(v.to_string()),
            Value::I32(v) => Ok(v.to_string()),
            Value::I64(v) => Ok(v.to_string()),
            Value::F32(v) => Ok(v.to_string()),
            Value::F64(v) => Ok(v.to_string()),
            other @ Value::Null => Err(convert_err::<Self>(&other)),
        }
    }
}

impl FromValue for i64 {
    const NAME: &'static str = "i64";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::I64(v) => Ok(v),
            Value::I32(v) => Ok(v.into()),
            Value::Str(s) => parse(s),
            other => Err(convert_err::<Self>(&other)),
        }
    }
}

impl FromValue for i32 {
    const NAME: &'static str = "i32";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::I32(v) => Ok(v),
            Value::I64(v) => i32::try_from(v).map_err(|_| IoError::Parse {
                input: v.to_string(),
                to: Self::NAME,
            }),
            Value::Str(s) => parse(s),
            other => Err(convert_err::<Self>(&other)),
        }
    }
}

impl FromValue for f64 {
    const NAME: &'static str = "f64";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::F64(v) => Ok(v),
            Value::F32(v) => Ok(v.into()),
            Value::I32(v) => Ok(v.into()),
            Value::I64(v) => Ok(v as f64),
            Value::Str(s) => parse(s),
            other => Err(convert_err::<Self>(&other)),
        }
    }
}

impl FromValue for f32 {
    const NAME: &'static str = "f32";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::F32(v) => Ok(v),
            Value::F64(v) => Ok(v as f32),
            Value::Str(s) => parse(s),
            other => Err(convert_err::<Self>(&other)),
        }
    }
}

impl FromValue for bool {
    const NAME: &'static str = "bool";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            Value::I64(v) => Ok(v != 0),
            Value::I32(v) => Ok(v != 0),
            Value::Str(s) => match s.trim() {
                "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
                "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
                _ => Err(IoError::Parse {
                    input: s,
                    to: Self::NAME,
                }),
            },
            other => Err(convert_err::<Self>(&other)),
        }
    }
}

impl FromValue for Vec<u8> {
    const NAME: &'static str = "Vec<u8>";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bin(b) => Ok(b),
            Value::Str(s) => Ok(s.into_bytes()),
            other => Err(convert_err::<Self>(&other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const NAME: &'static str = "Option";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

fn write<T: FromValue + 'static>(field: &mut dyn Any, value: Value) -> Result<()> {
    match field.downcast_mut::<T>() {
        Some(slot) => {
            *slot = T::from_value(value)?;
            Ok(())
        }
        None => Err(IoError::Unsupported { from: value.kind() }),
    }
}

macro_rules! try_write {
    ($field:expr, $value:expr; $($ty:ty),* $(,)?) => {
        $(
            if $field.is::<$ty>() {
                return write::<$ty>($field, $value);
            }
        )*
    };
}

/// Write `value` into a plain field of a supported type.
pub fn assign_field(field: &mut dyn Any, value: Value) -> Result<()> {
    try_write!(field, value;
        Value, String, i64, i32, f64, f32, bool, Vec<u8>,
        Option<Value>, Option<String>, Option<i64>, Option<i32>,
        Option<f64>, Option<f32>, Option<bool>, Option<Vec<u8>>,
    );
    Err(IoError::Unsupported { from: value.kind() })
}
