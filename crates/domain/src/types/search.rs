//! Resource graph search

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters of a virtual-machine lookup in the resource graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSearchQuery {
    /// Cloud platform name as the platform spells it (e.g. `AWS`, `Azure`).
    pub cloud_platform: String,
    /// Provider-side identifier of the machine.
    pub external_id: String,
    /// Page size.
    pub first: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphSearchResult {
    pub total_count: u64,
    pub max_count_reached: bool,
    pub page_info: PageInfo,
    pub nodes: Vec<GraphSearchNode>,
}

impl GraphSearchResult {
    /// All entities across the returned nodes.
    pub fn entities(&self) -> impl Iterator<Item = &GraphEntity> {
        self.nodes.iter().flat_map(|node| node.entities.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphSearchNode {
    pub entities: Vec<GraphEntity>,
    pub aggregate_count: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphEntity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub properties: Map<String, Value>,
    pub technologies: Vec<Technology>,
    pub user_metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Technology {
    pub id: String,
    pub icon: Option<String>,
}
