//! Platform operations built on [`GraphQlClient::execute`]
//!
//! The upload-slot and system-activity queries back the ingestion ports of
//! `scanbridge-core`; the resource search is used to verify the scanned host
//! before uploading.

use async_trait::async_trait;
use scanbridge_core::{ActivityStatusSource, UploadSlotProvider};
use scanbridge_domain::{
    ActivityStatus, GraphQlRequest, GraphSearchQuery, GraphSearchResult, QueryError, UploadSlot,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::client::GraphQlClient;
use super::queries::{GRAPH_SEARCH, REQUEST_SECURITY_SCAN_UPLOAD, SYSTEM_ACTIVITY};

/// Entity type the resource search is restricted to.
const VIRTUAL_MACHINE: &str = "VIRTUAL_MACHINE";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestSecurityScanUploadData {
    request_security_scan_upload: UploadEnvelope,
}

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    upload: UploadSlot,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SystemActivityData {
    system_activity: Option<ActivityStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphSearchData {
    graph_search: GraphSearchResult,
}

pub(crate) fn upload_slot_request(filename: &str) -> GraphQlRequest {
    GraphQlRequest::with_json(REQUEST_SECURITY_SCAN_UPLOAD, json!({ "filename": filename }))
}

pub(crate) fn system_activity_request(activity_id: &str) -> GraphQlRequest {
    GraphQlRequest::with_json(SYSTEM_ACTIVITY, json!({ "id": activity_id }))
}

pub(crate) fn graph_search_request(query: &GraphSearchQuery) -> GraphQlRequest {
    GraphQlRequest::with_json(
        GRAPH_SEARCH,
        json!({
            "quick": true,
            "first": query.first,
            "query": {
                "type": [VIRTUAL_MACHINE],
                "select": true,
                "where": {
                    "cloudPlatform": { "EQUALS": [query.cloud_platform] },
                    "externalId": { "EQUALS": [query.external_id] },
                },
            },
            "projectId": "*",
            "fetchTotalCount": true,
        }),
    )
}

impl GraphQlClient {
    /// Search the resource graph for the virtual machine described by
    /// `query`.
    ///
    /// # Errors
    /// Any [`QueryError`] of the underlying execution.
    #[instrument(skip_all, fields(cloud_platform = %query.cloud_platform, external_id = %query.external_id))]
    pub async fn graph_search(&self, query: &GraphSearchQuery) -> Result<GraphSearchResult, QueryError> {
        let data: GraphSearchData = self.execute(&graph_search_request(query)).await?;
        debug!(total_count = data.graph_search.total_count, "graph search completed");
        Ok(data.graph_search)
    }
}

#[async_trait]
impl UploadSlotProvider for GraphQlClient {
    #[instrument(skip(self))]
    async fn request_upload_slot(&self, filename: &str) -> Result<UploadSlot, QueryError> {
        let data: RequestSecurityScanUploadData = self.execute(&upload_slot_request(filename)).await?;
        Ok(data.request_security_scan_upload.upload)
    }
}

#[async_trait]
impl ActivityStatusSource for GraphQlClient {
    #[instrument(skip(self))]
    async fn system_activity(&self, activity_id: &str) -> Result<ActivityStatus, QueryError> {
        let data: SystemActivityData = self.execute(&system_activity_request(activity_id)).await?;
        data.system_activity
            .ok_or_else(|| QueryError::Decode(format!("system activity {activity_id} missing from response")))
    }
}
