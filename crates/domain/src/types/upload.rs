//! Upload slot and the final ingestion report

use serde::{Deserialize, Serialize};

use super::activity::ActivityStatus;

/// Pre-signed upload target handed out by the platform.
///
/// Consumed by the upload step and then by the poller; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSlot {
    pub id: String,
    pub url: String,
    /// Identifier of the ingestion job created for this upload.
    pub system_activity_id: String,
}

/// Outcome of a complete upload-and-poll run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionReport {
    pub slot: UploadSlot,
    pub activity: ActivityStatus,
}
