//! GraphQL documents of the security platform operations.

/// Requests a pre-signed upload URL for a scan result file.
pub const REQUEST_SECURITY_SCAN_UPLOAD: &str = r#"
query RequestSecurityScanUpload($filename: String!) {
  requestSecurityScanUpload(filename: $filename) {
    upload {
      id
      url
      systemActivityId
    }
  }
}
"#;

/// Reads the status of the ingestion job created for an upload.
pub const SYSTEM_ACTIVITY: &str = r#"
query SystemActivity($id: ID!) {
  systemActivity(id: $id) {
    id
    status
    statusInfo
    result {
      ... on SystemActivityEnrichmentIntegrationResult {
        dataSources {
          ...IngestionStatsDetails
        }
        findings {
          ...IngestionStatsDetails
        }
        events {
          ...IngestionStatsDetails
        }
        tags {
          ...IngestionStatsDetails
        }
        unresolvedAssets {
          ...UnresolvedAssetsDetails
        }
      }
    }
    context {
      ... on SystemActivityEnrichmentIntegrationContext {
        fileUploadId
      }
    }
  }
}

fragment IngestionStatsDetails on EnrichmentIntegrationStats {
  incoming
  handled
}

fragment UnresolvedAssetsDetails on EnrichmentIntegrationUnresolvedAssets {
  count
  ids
}
"#;

/// Looks up entities in the resource graph.
pub const GRAPH_SEARCH: &str = r#"
query GraphSearch(
  $query: GraphEntityQueryInput
  $controlId: ID
  $projectId: String!
  $first: Int
  $after: String
  $fetchTotalCount: Boolean!
  $quick: Boolean = true
  $fetchIssueAnalytics: Boolean = false
) {
  graphSearch(
    query: $query
    controlId: $controlId
    projectId: $projectId
    first: $first
    after: $after
    quick: $quick
  ) {
    totalCount @include(if: $fetchTotalCount)
    maxCountReached @include(if: $fetchTotalCount)
    pageInfo {
      endCursor
      hasNextPage
    }
    nodes {
      entities {
        ...PathGraphEntityFragment
        userMetadata {
          isInWatchlist
          isIgnored
          note
        }
        technologies {
          id
          icon
        }
      }
      aggregateCount
    }
  }
}

fragment PathGraphEntityFragment on GraphEntity {
  id
  name
  type
  properties
  issueAnalytics: issues(filterBy: { status: [IN_PROGRESS, OPEN] }) @include(if: $fetchIssueAnalytics) {
    highSeverityCount
    criticalSeverityCount
  }
}
"#;
