//! Dataset model and workbook codec for sheetlens
//!
//! Turns an uploaded workbook into a [`Dataset`]: an ordered header list plus
//! one [`Record`] per data row, every record keyed by every header. The same
//! dataset can be written back out as a single-sheet xlsx workbook.
//!
//! # Examples
//!
//! ```
//! use sheetlens_sheet::{decode, encode, CellValue, Dataset};
//!
//! let dataset = Dataset::from_rows(
//!     "people.xlsx",
//!     vec!["Name".to_string(), "Sexe".to_string()],
//!     vec![
//!         vec![CellValue::from("Alice"), CellValue::from("F")],
//!         vec![CellValue::from("Bob"), CellValue::Empty],
//!     ],
//! );
//!
//! let bytes = encode(&dataset).unwrap();
//! let loaded = decode(&bytes, "people.xlsx").unwrap();
//!
//! assert_eq!(loaded.len(), 2);
//! assert_eq!(loaded.get(1, "Sexe"), Some(&CellValue::Empty));
//! ```
//!
//! # Number round-trip
//!
//! Numbers stay numbers. Excel keeps every number as a float, so on decode a
//! whole-valued float inside the exact-integer range becomes
//! [`CellValue::Int`] and anything else stays [`CellValue::Float`]. Text that
//! happens to look numeric is never converted.

mod cell;
mod dataset;
mod error;
mod normalize;
mod xlsx;

/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export dataset types.
pub use dataset::{Dataset, Record};
/// Re-export codec error types.
pub use error::{DecodeError, EncodeError, Result};
/// Re-export the row normalizer.
pub use normalize::{conform_record, is_blank_row, normalize_row};
/// Re-export the workbook codec.
pub use xlsx::{
    decode, encode, encode_with_options, ExportOptions, DEFAULT_COLUMN_WIDTH,
    DEFAULT_EXPORT_FILE_NAME, DEFAULT_SHEET_NAME,
};
