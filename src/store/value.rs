//! Typed values and their text conversions.
//!
//! Values are stored as text. [`Value`] is the tagged input to the single
//! setter; [`FromValue`] is the conversion contract used by the getters.

use crate::error::ErrorKind;

/// A typed value handed to [`ConfigFile::set`](super::ConfigFile::set).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 32-bit unsigned integer.
    UInt(u32),
    /// 64-bit unsigned integer.
    UInt64(u64),
    /// Single precision float.
    Float(f32),
    /// Double precision float.
    Double(f64),
    /// Text; `None` stores a key without value.
    String(Option<String>),
    /// Boolean, stored as `true`/`false`.
    Bool(bool),
}

impl Value {
    /// Builds a boolean value from free-form text.
    ///
    /// Accepts the boolean table (`1/yes/true`, `0/no/false`, any case).
    /// Absent or empty text yields a key without value.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::WrongBooleanValue`] for any other text.
    pub fn bool_text(text: Option<&str>) -> Result<Self, ErrorKind> {
        match text {
            None | Some("") => Ok(Self::String(None)),
            Some(text) => match text.to_ascii_lowercase().as_str() {
                "1" | "yes" | "true" => Ok(Self::Bool(true)),
                "0" | "no" | "false" => Ok(Self::Bool(false)),
                _ => Err(ErrorKind::WrongBooleanValue),
            },
        }
    }

    /// Renders the value as stored text.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Int(v) => Some(v.to_string()),
            Self::Int64(v) => Some(v.to_string()),
            Self::UInt(v) => Some(v.to_string()),
            Self::UInt64(v) => Some(v.to_string()),
            Self::Float(v) => Some(v.to_string()),
            Self::Double(v) => Some(v.to_string()),
            Self::String(v) => v,
            Self::Bool(v) => Some(v.to_string()),
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_value!(
    i32 => Int,
    i64 => Int64,
    u32 => UInt,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    bool => Bool,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(Some(v.to_string()))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(Some(v))
    }
}

impl From<Option<&str>> for Value {
    fn from(v: Option<&str>) -> Self {
        Self::String(v.map(str::to_string))
    }
}

/// Conversion from stored text to a typed value.
pub trait FromValue: Sized {
    /// Converts the stored text of one entry.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::KeyHasNullValue`] when a value is required but
    /// absent, and [`ErrorKind::ValueConversion`] when the text does not
    /// parse.
    fn from_value(text: Option<&str>) -> Result<Self, ErrorKind>;
}

macro_rules! impl_from_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(text: Option<&str>) -> Result<Self, ErrorKind> {
                    let n = parse_integer(required(text)?)?;
                    Self::try_from(n).map_err(|_| ErrorKind::ValueConversion)
                }
            }
        )*
    };
}

impl_from_value_int!(i32, i64, u32, u64);

impl FromValue for f32 {
    fn from_value(text: Option<&str>) -> Result<Self, ErrorKind> {
        required(text)?
            .trim()
            .parse()
            .map_err(|_| ErrorKind::ValueConversion)
    }
}

impl FromValue for f64 {
    fn from_value(text: Option<&str>) -> Result<Self, ErrorKind> {
        required(text)?
            .trim()
            .parse()
            .map_err(|_| ErrorKind::ValueConversion)
    }
}

impl FromValue for bool {
    fn from_value(text: Option<&str>) -> Result<Self, ErrorKind> {
        parse_bool(required(text)?)
    }
}

impl FromValue for String {
    fn from_value(text: Option<&str>) -> Result<Self, ErrorKind> {
        required(text).map(str::to_string)
    }
}

impl FromValue for Option<String> {
    fn from_value(text: Option<&str>) -> Result<Self, ErrorKind> {
        Ok(text.map(str::to_string))
    }
}

const fn required(text: Option<&str>) -> Result<&str, ErrorKind> {
    match text {
        Some(text) => Ok(text),
        None => Err(ErrorKind::KeyHasNullValue),
    }
}

/// Parses a boolean with the fixed table; the empty string is `false`.
///
/// # Errors
///
/// Returns [`ErrorKind::ValueConversion`] for text outside the table.
pub fn parse_bool(text: &str) -> Result<bool, ErrorKind> {
    match text.to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" => Ok(true),
        "0" | "no" | "false" | "" => Ok(false),
        _ => Err(ErrorKind::ValueConversion),
    }
}

/// Parses an integer with C-style base detection.
///
/// `0x`/`0X` selects hex, a leading `0` octal, anything else decimal.
/// Surrounding blanks and one sign are accepted; the range is checked by
/// the caller.
///
/// # Errors
///
/// Returns [`ErrorKind::ValueConversion`] on empty input, stray characters,
/// or overflow of the intermediate representation.
pub fn parse_integer(text: &str) -> Result<i128, ErrorKind> {
    let trimmed = text.trim();
    let (negative, body) = if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else {
        (false, trimmed.strip_prefix('+').unwrap_or(trimmed))
    };

    let (radix, digits) = if let Some(hex) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        (16, hex)
    } else if body.len() > 1 && body.starts_with('0') {
        (8, &body[1..])
    } else {
        (10, body)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ErrorKind::ValueConversion);
    }

    let magnitude = i128::from_str_radix(digits, radix).map_err(|_| ErrorKind::ValueConversion)?;
    Ok(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
