//! Field-level conversions for TabSeparated results.

pub mod tsv;
pub mod unmarshal;

pub use tsv::{encode_row, escape, unescape, NULL_FIELD};
pub use unmarshal::{unmarshal, FromField, ScanTarget};
