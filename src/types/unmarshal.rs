//! Conversion of a single textual field into a typed destination.
//!
//! Each destination type knows how to read itself from ClickHouse's
//! TabSeparated text representation through [`FromField`]. Row scanning works
//! with heterogeneous destinations, so it goes through the object-safe
//! [`ScanTarget`] capability, which every `FromField` type gets for free.

use crate::error::ConversionError;
use crate::types::tsv::{unescape, NULL_FIELD};
use chrono::{NaiveDate, NaiveDateTime};

/// Format of the `Date` column type.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of the `DateTime` and `DateTime64` column types (fraction optional).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// NULL element inside an array literal.
const ARRAY_NULL: &str = "NULL";

/// A value that can be read from one TabSeparated field.
pub trait FromField: Sized {
    /// Parse the raw (still escaped) field text.
    fn from_field(field: &str) -> Result<Self, ConversionError>;

    /// Parse one element of an array literal.
    ///
    /// `item` has already lost the field-level escaping but keeps the quotes
    /// and escapes of the literal itself.
    fn from_array_item(item: &str) -> Result<Self, ConversionError> {
        Self::from_field(strip_quotes(item))
    }
}

/// A destination variable that a row scan can write into.
pub trait ScanTarget {
    /// Overwrite the destination with the value parsed from `field`.
    fn scan_field(&mut self, field: &str) -> Result<(), ConversionError>;
}

impl<T: FromField> ScanTarget for T {
    fn scan_field(&mut self, field: &str) -> Result<(), ConversionError> {
        *self = T::from_field(field)?;
        Ok(())
    }
}

/// Unmarshal `field` into `dest`.
///
/// On failure `dest` keeps its previous value.
pub fn unmarshal(dest: &mut dyn ScanTarget, field: &str) -> Result<(), ConversionError> {
    dest.scan_field(field)
}

impl FromField for String {
    fn from_field(field: &str) -> Result<Self, ConversionError> {
        Ok(unescape(field))
    }

    fn from_array_item(item: &str) -> Result<Self, ConversionError> {
        let unquoted = strip_quotes(item);
        if unquoted.len() == item.len() {
            return Ok(item.to_string());
        }
        Ok(unescape(unquoted))
    }
}

impl FromField for bool {
    fn from_field(field: &str) -> Result<Self, ConversionError> {
        match field {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            _ => Err(ConversionError::invalid(
                "bool",
                field,
                "expected 0, 1, true or false",
            )),
        }
    }
}

macro_rules! impl_from_field_via_parse {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromField for $ty {
                fn from_field(field: &str) -> Result<Self, ConversionError> {
                    field
                        .parse::<$ty>()
                        .map_err(|e| ConversionError::invalid(stringify!($ty), field, e))
                }
            }
        )*
    };
}

impl_from_field_via_parse!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl FromField for NaiveDate {
    fn from_field(field: &str) -> Result<Self, ConversionError> {
        NaiveDate::parse_from_str(field, DATE_FORMAT)
            .map_err(|e| ConversionError::invalid("Date", field, e))
    }
}

impl FromField for NaiveDateTime {
    fn from_field(field: &str) -> Result<Self, ConversionError> {
        NaiveDateTime::parse_from_str(field, DATETIME_FORMAT)
            .map_err(|e| ConversionError::invalid("DateTime", field, e))
    }
}

impl<T: FromField> FromField for Option<T> {
    fn from_field(field: &str) -> Result<Self, ConversionError> {
        if field == NULL_FIELD {
            Ok(None)
        } else {
            T::from_field(field).map(Some)
        }
    }

    fn from_array_item(item: &str) -> Result<Self, ConversionError> {
        if item == ARRAY_NULL {
            Ok(None)
        } else {
            T::from_array_item(item).map(Some)
        }
    }
}

// The server writes the quoted literal first and then escapes the whole text
// for TabSeparated, so the field is unescaped once before splitting and each
// element is read in literal form only.
impl<T: FromField> FromField for Vec<T> {
    fn from_field(field: &str) -> Result<Self, ConversionError> {
        Self::from_array_item(&unescape(field))
    }

    fn from_array_item(item: &str) -> Result<Self, ConversionError> {
        let inner = item
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| ConversionError::MalformedArray(item.to_string()))?;

        split_array_items(inner)
            .ok_or_else(|| ConversionError::MalformedArray(item.to_string()))?
            .into_iter()
            .map(T::from_array_item)
            .collect()
    }
}

/// Split the inside of an array literal on top-level commas.
///
/// Returns `None` when quotes or brackets are unbalanced.
fn split_array_items(inner: &str) -> Option<Vec<&str>> {
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut escaped = false;
    let mut start = 0;

    for (idx, c) in inner.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '\'' => in_quote = !in_quote,
            '[' if !in_quote => depth += 1,
            ']' if !in_quote => depth = depth.checked_sub(1)?,
            ',' if !in_quote && depth == 0 => {
                items.push(inner[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }

    if in_quote || depth != 0 {
        return None;
    }
    items.push(inner[start..].trim());
    Some(items)
}

fn strip_quotes(item: &str) -> &str {
    if item.len() >= 2 && item.starts_with('\'') && item.ends_with('\'') {
        &item[1..item.len() - 1]
    } else {
        item
    }
}
