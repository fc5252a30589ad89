//! System activity (ingestion job) status

use serde::{Deserialize, Deserializer, Serialize};

/// Snapshot of an ingestion job as reported by the platform.
///
/// `status` is service-defined and kept opaque; callers decide what a final
/// value means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStatus {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub status_info: Option<String>,
    #[serde(default)]
    pub result: Option<IngestionResult>,
    #[serde(default)]
    pub context: Option<ActivityContext>,
}

impl ActivityStatus {
    /// Upload identifier the job was created for, when reported.
    #[must_use]
    pub fn file_upload_id(&self) -> Option<&str> {
        self.context.as_ref().and_then(|context| context.file_upload_id.as_deref())
    }
}

/// Ingestion counters of an enrichment integration run.
///
/// Counters of a job that is still running may be reported as `null`; they
/// decode as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IngestionResult {
    #[serde(deserialize_with = "null_as_default")]
    pub data_sources: IngestionStats,
    #[serde(deserialize_with = "null_as_default")]
    pub findings: IngestionStats,
    #[serde(deserialize_with = "null_as_default")]
    pub events: IngestionStats,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: IngestionStats,
    #[serde(deserialize_with = "null_as_default")]
    pub unresolved_assets: UnresolvedAssets,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionStats {
    #[serde(deserialize_with = "null_as_default")]
    pub incoming: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub handled: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnresolvedAssets {
    #[serde(deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub ids: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityContext {
    pub file_upload_id: Option<String>,
}
