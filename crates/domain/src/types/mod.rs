//! Domain types and models
//!
//! Wire-compatible shapes for everything exchanged with the security
//! platform. Field names follow the platform's camelCase JSON.

pub mod activity;
pub mod auth;
pub mod graphql;
pub mod search;
pub mod upload;

pub use activity::{ActivityContext, ActivityStatus, IngestionResult, IngestionStats, UnresolvedAssets};
pub use auth::{AccessToken, Credentials};
pub use graphql::{GraphQlErrorEntry, GraphQlRequest, GraphQlResponse, Variables};
pub use search::{GraphEntity, GraphSearchNode, GraphSearchQuery, GraphSearchResult, PageInfo, Technology};
pub use upload::{IngestionReport, UploadSlot};
