//! Port interfaces for the ingestion flow
//!
//! These traits define the boundaries between core protocol logic
//! and infrastructure implementations.

use std::path::Path;

use async_trait::async_trait;
use scanbridge_domain::{ActivityStatus, QueryError, UploadError, UploadSlot};

/// Hands out pre-signed upload targets.
#[async_trait]
pub trait UploadSlotProvider: Send + Sync {
    /// Request an upload slot for `filename`.
    async fn request_upload_slot(&self, filename: &str) -> Result<UploadSlot, QueryError>;
}

/// Reports the state of an ingestion job.
#[async_trait]
pub trait ActivityStatusSource: Send + Sync {
    /// Fetch the current status of the system activity `activity_id`.
    async fn system_activity(&self, activity_id: &str) -> Result<ActivityStatus, QueryError>;
}

/// Transfers a local file to a pre-signed URL.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, url: &str, path: &Path) -> Result<(), UploadError>;
}
