//! [`DisasterRepository`] implementations.

use std::convert::Infallible;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use flood_map_flood_models::FloodRecord;
use flood_map_household_models::HouseholdRecord;
use flood_map_impact::DisasterRepository;
use flood_map_impact_models::RecordFilter;
use serde::de::DeserializeOwned;

use crate::IngestError;
use crate::document::{FloodDocument, HouseholdDocument};
use crate::normalize::{normalize_floods, normalize_households};

/// Repository over records already held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    households: Vec<HouseholdRecord>,
    floods: Vec<FloodRecord>,
}

impl MemoryRepository {
    /// Creates a repository over the given records.
    #[must_use]
    pub const fn new(households: Vec<HouseholdRecord>, floods: Vec<FloodRecord>) -> Self {
        Self { households, floods }
    }

    /// All stored households, archived ones included.
    #[must_use]
    pub fn households(&self) -> &[HouseholdRecord] {
        &self.households
    }

    /// All stored floods.
    #[must_use]
    pub fn floods(&self) -> &[FloodRecord] {
        &self.floods
    }
}

#[async_trait]
impl DisasterRepository for MemoryRepository {
    type Error = Infallible;

    async fn fetch_households(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<HouseholdRecord>, Infallible> {
        Ok(filter_households(self.households.iter().cloned(), filter))
    }

    async fn fetch_floods(&self, filter: &RecordFilter) -> Result<Vec<FloodRecord>, Infallible> {
        Ok(filter_floods(self.floods.iter().cloned(), filter))
    }
}

/// Repository reading document-store JSON exports from disk.
///
/// Each file holds either an array of documents or an object keyed by
/// document id. Files are re-read on every fetch so a run always sees the
/// current export.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    households_path: PathBuf,
    floods_path: PathBuf,
}

impl JsonFileRepository {
    /// Creates a repository over the two export files.
    #[must_use]
    pub fn new(households_path: impl Into<PathBuf>, floods_path: impl Into<PathBuf>) -> Self {
        Self {
            households_path: households_path.into(),
            floods_path: floods_path.into(),
        }
    }

    /// Path of the household export.
    #[must_use]
    pub fn households_path(&self) -> &Path {
        &self.households_path
    }

    /// Path of the flood export.
    #[must_use]
    pub fn floods_path(&self) -> &Path {
        &self.floods_path
    }
}

#[async_trait]
impl DisasterRepository for JsonFileRepository {
    type Error = IngestError;

    async fn fetch_households(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<HouseholdRecord>, IngestError> {
        let documents: Vec<HouseholdDocument> =
            read_documents(&self.households_path, |doc: &mut HouseholdDocument, key| {
                doc.id.get_or_insert(key);
            })
            .await?;
        let total = documents.len();
        let records = normalize_households(documents);

        log::debug!(
            "Loaded {}/{total} household document(s) from {}",
            records.len(),
            self.households_path.display()
        );

        Ok(filter_households(records, filter))
    }

    async fn fetch_floods(&self, filter: &RecordFilter) -> Result<Vec<FloodRecord>, IngestError> {
        let documents: Vec<FloodDocument> =
            read_documents(&self.floods_path, |doc: &mut FloodDocument, key| {
                doc.id.get_or_insert(key);
            })
            .await?;
        let total = documents.len();
        let records = normalize_floods(documents);

        log::debug!(
            "Loaded {}/{total} flood document(s) from {}",
            records.len(),
            self.floods_path.display()
        );

        Ok(filter_floods(records, filter))
    }
}

/// Reads an export file as either an array or an id-keyed object.
///
/// Items that don't deserialize are skipped with a warning; only a file
/// that isn't JSON, or isn't a collection, fails the read.
async fn read_documents<T: DeserializeOwned>(
    path: &Path,
    set_id: impl Fn(&mut T, String),
) -> Result<Vec<T>, IngestError> {
    let bytes = tokio::fs::read(path).await?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)?;

    match value {
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| decode_document(item, path, &format!("#{index}")))
            .collect()),
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .filter_map(|(key, item)| {
                let mut doc: T = decode_document(item, path, &key)?;
                set_id(&mut doc, key);
                Some(doc)
            })
            .collect()),
        other => Err(IngestError::Normalization {
            message: format!(
                "{} must hold an array or object of documents, found {}",
                path.display(),
                json_kind(&other)
            ),
        }),
    }
}

fn decode_document<T: DeserializeOwned>(
    item: serde_json::Value,
    path: &Path,
    label: &str,
) -> Option<T> {
    match serde_json::from_value(item) {
        Ok(doc) => Some(doc),
        Err(e) => {
            log::warn!("Skipping document {label} in {}: {e}", path.display());
            None
        }
    }
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn filter_households(
    records: impl IntoIterator<Item = HouseholdRecord>,
    filter: &RecordFilter,
) -> Vec<HouseholdRecord> {
    records
        .into_iter()
        .filter(|h| filter.matches_district(&h.district))
        .collect()
}

fn filter_floods(
    records: impl IntoIterator<Item = FloodRecord>,
    filter: &RecordFilter,
) -> Vec<FloodRecord> {
    records
        .into_iter()
        .filter(|f| filter.matches_district(&f.district) && filter.matches_date(f.date))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use flood_map_flood_models::FloodExtent;
    use flood_map_geography_models::GeoPoint;
    use flood_map_household_models::Person;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn marker() -> FloodExtent {
        FloodExtent::Point(GeoPoint::new(0.0, 0.0))
    }

    fn memory() -> MemoryRepository {
        MemoryRepository::new(
            vec![
                HouseholdRecord::new("h1", GeoPoint::new(0.5, 0.5), "tubili", Person::named("A")),
                HouseholdRecord::new(
                    "h2",
                    GeoPoint::new(0.5, 0.5),
                    "bagongSilangPob",
                    Person::named("B"),
                ),
            ],
            vec![
                FloodRecord::new("f1", day(1), "tubili", marker()),
                FloodRecord::new("f2", day(20), "tubili", marker()),
            ],
        )
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "flood_map_ingest_{}_{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn memory_repository_pushes_down_district() {
        let filter = RecordFilter {
            district: Some("tubili".to_string()),
            ..RecordFilter::default()
        };
        let households = memory().fetch_households(&filter).await.unwrap();
        assert_eq!(households.len(), 1);
        assert_eq!(households[0].id, "h1");
    }

    #[tokio::test]
    async fn memory_repository_pushes_down_date_range() {
        let filter = RecordFilter {
            date_from: Some(day(10)),
            date_to: Some(day(20)),
            ..RecordFilter::default()
        };
        let floods = memory().fetch_floods(&filter).await.unwrap();
        assert_eq!(floods.len(), 1);
        assert_eq!(floods[0].id, "f2");
    }

    #[tokio::test]
    async fn json_repository_reads_keyed_and_array_exports() {
        let households = temp_file(
            "households_keyed",
            r#"{
                "abc": { "location": { "lat": 0.5, "lng": 0.5 }, "barangay": "tubili", "member": [{ "name": "Kid", "age": "7", "gender": "f" }] },
                "bad": { "barangay": "tubili" }
            }"#,
        );
        let floods = temp_file(
            "floods_array",
            r#"[
                { "id": "f1", "date": "2024-07-24", "barangay": "tubili", "waterLevel": 0.7,
                  "polygon": [{ "lat": 0, "lng": 0 }, { "lat": 0, "lng": 1 }, { "lat": 1, "lng": 1 }, { "lat": 1, "lng": 0 }] }
            ]"#,
        );

        let repo = JsonFileRepository::new(&households, &floods);
        let filter = RecordFilter::default();
        let report = flood_map_impact::run_analysis(&repo, &filter).await.unwrap();

        assert_eq!(report.affected_household_ids, vec!["abc"]);
        assert_eq!(report.summary.total_persons, 2);
        assert_eq!(report.summary.unbucketed, 1);

        std::fs::remove_file(households).unwrap();
        std::fs::remove_file(floods).unwrap();
    }

    #[tokio::test]
    async fn json_repository_skips_mistyped_documents() {
        let households = temp_file(
            "households_drift",
            r#"[
                { "id": "good", "location": { "lat": 0.5, "lng": 0.5 }, "contact": 9171234567 },
                { "id": "bad-flag", "location": { "lat": 0.5, "lng": 0.5 }, "isPWD": "yes" },
                { "id": "bad-location", "location": { "lat": 0.5 } }
            ]"#,
        );
        let repo = JsonFileRepository::new(&households, "unused.json");

        let records = repo
            .fetch_households(&RecordFilter::default())
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "good");
        assert_eq!(records[0].head.contact.as_deref(), Some("9171234567"));

        std::fs::remove_file(households).unwrap();
    }

    #[tokio::test]
    async fn json_repository_skips_mistyped_keyed_documents() {
        let floods = temp_file(
            "floods_keyed_drift",
            r#"{
                "f1": { "date": "2024-07-24", "location": { "lat": 0.5, "lng": 0.5 } },
                "f2": { "date": 20240724, "location": { "lat": 0.5, "lng": 0.5 } }
            }"#,
        );
        let repo = JsonFileRepository::new("unused.json", &floods);

        let records = repo.fetch_floods(&RecordFilter::default()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "f1");

        std::fs::remove_file(floods).unwrap();
    }

    #[tokio::test]
    async fn json_repository_rejects_invalid_json() {
        let households = temp_file("households_truncated", "[{ \"id\": ");
        let repo = JsonFileRepository::new(&households, "unused.json");

        let result = repo.fetch_households(&RecordFilter::default()).await;
        assert!(matches!(result, Err(IngestError::Json(_))));

        std::fs::remove_file(households).unwrap();
    }

    #[tokio::test]
    async fn json_repository_rejects_scalar_exports() {
        let households = temp_file("households_scalar", "42");
        let repo = JsonFileRepository::new(&households, "unused.json");

        let result = repo.fetch_households(&RecordFilter::default()).await;
        assert!(matches!(result, Err(IngestError::Normalization { .. })));

        std::fs::remove_file(households).unwrap();
    }

    #[tokio::test]
    async fn json_repository_reports_missing_files() {
        let repo =
            JsonFileRepository::new("/nonexistent/households.json", "/nonexistent/floods.json");
        let result = repo.fetch_floods(&RecordFilter::default()).await;
        assert!(matches!(result, Err(IngestError::Io(_))));
    }
}
