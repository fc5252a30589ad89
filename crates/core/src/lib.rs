//! # ScanBridge Core
//!
//! Protocol logic with no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the platform API and object storage
//! - The activity poller that absorbs the job visibility race
//! - The upload orchestrator and the end-to-end ingestion workflow
//!
//! ## Architecture Principles
//! - Only depends on `scanbridge-domain`
//! - No HTTP or filesystem code
//! - All external dependencies via traits

pub mod ingestion;

// Re-export specific items to avoid ambiguity
pub use ingestion::poller::{ActivityPoller, PollPolicy, PollState};
pub use ingestion::ports::{ActivityStatusSource, ObjectStorage, UploadSlotProvider};
pub use ingestion::workflow::{IngestionWorkflow, UploadOrchestrator};
