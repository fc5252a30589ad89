//! Upload-and-poll ingestion flow
//!
//! [`workflow::UploadOrchestrator`] obtains an upload slot and hands the
//! bytes to storage; [`poller::ActivityPoller`] then waits for the ingestion
//! job to become visible. [`workflow::IngestionWorkflow`] chains the two.

pub mod poller;
pub mod ports;
pub mod workflow;
