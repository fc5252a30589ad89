//! Upload orchestration and the end-to-end ingestion workflow

use std::path::Path;
use std::sync::Arc;

use scanbridge_domain::{
    IngestionReport, QueryError, Result, ScanBridgeError, UploadError, UploadSlot,
};
use tracing::info;

use super::poller::ActivityPoller;
use super::ports::{ObjectStorage, UploadSlotProvider};

/// Requests an upload slot and transfers the scan file to it.
pub struct UploadOrchestrator {
    slots: Arc<dyn UploadSlotProvider>,
    storage: Arc<dyn ObjectStorage>,
}

impl UploadOrchestrator {
    pub fn new(slots: Arc<dyn UploadSlotProvider>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { slots, storage }
    }

    /// Ask the platform for an upload target for `filename`.
    pub async fn request_upload_slot(&self, filename: &str) -> std::result::Result<UploadSlot, QueryError> {
        let slot = self.slots.request_upload_slot(filename).await?;
        info!(
            upload_id = %slot.id,
            system_activity_id = %slot.system_activity_id,
            "upload slot granted"
        );
        Ok(slot)
    }

    /// Request a slot named after the file and upload the file to it.
    ///
    /// The slot is returned only once the transfer completed.
    ///
    /// # Errors
    /// Returns the query error of the slot request or the upload error of the
    /// transfer, whichever happens first.
    pub async fn stage(&self, path: &Path) -> Result<UploadSlot> {
        let filename = upload_filename(path)?;
        let slot = self.request_upload_slot(&filename).await?;

        self.storage.upload(&slot.url, path).await?;
        info!(upload_id = %slot.id, file = %path.display(), "scan results uploaded");

        Ok(slot)
    }
}

fn upload_filename(path: &Path) -> std::result::Result<String, UploadError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| UploadError::Io {
            path: path.display().to_string(),
            message: "path does not name a file".into(),
        })
}

/// Upload a scan file and wait for the platform to pick it up.
pub struct IngestionWorkflow {
    orchestrator: UploadOrchestrator,
    poller: ActivityPoller,
}

impl IngestionWorkflow {
    pub fn new(orchestrator: UploadOrchestrator, poller: ActivityPoller) -> Self {
        Self { orchestrator, poller }
    }

    /// Run slot request, upload and polling strictly in sequence.
    ///
    /// Nothing is polled when the upload fails.
    pub async fn run(&self, path: &Path) -> Result<IngestionReport> {
        let slot = self.orchestrator.stage(path).await?;
        let activity = self
            .poller
            .poll_until_terminal(&slot.system_activity_id)
            .await
            .map_err(ScanBridgeError::from)?;

        Ok(IngestionReport { slot, activity })
    }
}
