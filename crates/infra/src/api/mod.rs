//! Security platform API
//!
//! - [`auth`]: client-credentials token exchange
//! - [`client`]: session and GraphQL query executor
//! - [`operations`]: upload slot, system activity and resource search
//! - [`queries`]: GraphQL documents

pub mod auth;
pub mod client;
pub mod operations;
pub mod queries;

pub use auth::Authenticator;
pub use client::{GraphQlClient, Session};
