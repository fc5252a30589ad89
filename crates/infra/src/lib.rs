//! # ScanBridge Infrastructure
//!
//! Infrastructure implementations of core ingestion ports.
//!
//! This crate contains:
//! - The retrying HTTP transport
//! - The security platform API client (authentication, GraphQL executor,
//!   upload-slot, system-activity and resource-search operations)
//! - Pre-signed URL object storage
//! - Configuration loading from environment variables and files
//!
//! ## Architecture
//! - Implements traits defined in `scanbridge-core`
//! - Depends on `scanbridge-domain` and `scanbridge-core`
//! - Contains all "impure" code (network and file I/O)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod storage;

// Re-export commonly used items
pub use api::{Authenticator, GraphQlClient, Session};
pub use http::{HttpClient, HttpClientBuilder, RetryPolicy};
pub use storage::PresignedUploader;
