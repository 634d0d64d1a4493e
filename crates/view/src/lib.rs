//! Table view pipeline for sheetlens
//!
//! Given a loaded [`Dataset`](sheetlens_sheet::Dataset), produces the page of
//! rows a viewer shows: free-text filter, single-column stable sort, then
//! pagination. Also derives per-category counts and tracks upload state.
//!
//! # Examples
//!
//! ```
//! use sheetlens_sheet::{CellValue, Dataset};
//! use sheetlens_view::{compute_stats, filter_sort_paginate, CategoryRule, SortDirective, ViewQuery};
//!
//! let dataset = Dataset::from_rows(
//!     "people.xlsx",
//!     vec!["Name".to_string(), "Sexe".to_string()],
//!     vec![
//!         vec![CellValue::from("A"), CellValue::from("F")],
//!         vec![CellValue::from("B"), CellValue::from("M")],
//!         vec![CellValue::from("C"), CellValue::from("F")],
//!     ],
//! );
//!
//! let query = ViewQuery::new().with_sort(SortDirective::descending("Name"));
//! let view = filter_sort_paginate(&dataset, &query, 10);
//! assert_eq!(view.rows[0]["Name"], CellValue::from("C"));
//!
//! let stats = compute_stats(&dataset, &CategoryRule::default());
//! assert_eq!((stats.female(), stats.male(), stats.total), (2, 1, 3));
//! ```

mod config;
mod engine;
mod query;
mod session;
mod stats;

/// Re-export configuration types.
pub use config::{ConfigError, ViewerConfig, DEFAULT_PAGE_SIZE};
/// Re-export the filter/sort/paginate engine.
pub use engine::{
    compare_values, filter_sort_paginate, filtered_sorted, matches_filter, paginate,
    sort_records, to_comparable, to_searchable_string, total_pages, Comparable, View,
};
/// Re-export view state types.
pub use query::{PageRequest, SortDirection, SortDirective, ViewQuery};
/// Re-export the session state machine.
pub use session::{LoadedSheet, Session, UploadOutcome, UploadTicket};
/// Re-export derived stats.
pub use stats::{compute_stats, resolve_category, CategoryRule, CategoryStats, FEMALE, MALE};
