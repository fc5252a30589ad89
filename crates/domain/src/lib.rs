//! # ScanBridge Domain
//!
//! Business domain types for ScanBridge.
//!
//! This crate contains:
//! - Data types exchanged with the security platform (upload slots, system
//!   activity status, resource search results)
//! - The error taxonomy shared by every layer
//! - Configuration structures and their validation
//! - Protocol constants (retry budgets, poll budgets, retryable statuses)
//!
//! ## Architecture
//! - No dependencies on other ScanBridge crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
