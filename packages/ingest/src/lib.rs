#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Household and flood record ingestion.
//!
//! Raw documents exported from the document store are deserialized into
//! the loose shapes in [`document`], resolved into model records by
//! [`normalize`], and served to the impact pipeline through the
//! [`flood_map_impact::DisasterRepository`] implementations in
//! [`repository`].

pub mod document;
pub mod normalize;
pub mod repository;

pub use document::{FloodDocument, HouseholdDocument, MemberDocument};
pub use normalize::{normalize_flood, normalize_floods, normalize_household, normalize_households};
pub use repository::{JsonFileRepository, MemoryRepository};

/// Errors that can occur while ingesting records.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// I/O error reading an export file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A document could not be turned into a record.
    #[error("Normalization error: {message}")]
    Normalization {
        /// Description of what went wrong.
        message: String,
    },
}
