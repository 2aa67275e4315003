#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report assembly for households, floods, and impact summaries.
//!
//! Every report goes through one row-building step ([`table`]) that
//! produces a [`ReportTable`]; [`render`] turns that same table into CSV
//! for export or HTML for printing. None of these functions check export
//! authorization; callers gate access before invoking them.

pub mod format;
pub mod render;
pub mod sort;
pub mod table;

pub use format::{ExportEntity, camel_case_to_title_case, district_label, export_file_name};
pub use render::{to_csv, to_csv_string, to_html};
pub use sort::{SortDirection, SortKey, Sortable, sort_records};
pub use table::{
    ReportTable, district_summary_table, flood_table, household_table, impact_table, summary_table,
};

/// Errors that can occur while rendering a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the CSV buffer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output was not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
