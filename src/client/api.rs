//! Liongard API capability trait and request types.
//!
//! `LiongardApi` is the seam between the domain handlers and the remote
//! platform: one async method per remote operation, implemented by the
//! HTTP client in `http.rs` and by stub backends in tests.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::error::ClientResult;

// ============================================================================
// Request Types
// ============================================================================

/// Pagination parameters for list operations.
///
/// Absent values are passed through untouched so the platform applies its
/// own defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    #[serde(rename = "page", skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    #[serde(rename = "pageSize", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl PageQuery {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self { page, page_size }
    }
}

/// Fields for creating an environment. Only `Name` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewEnvironment {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(rename = "Visible", skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,

    #[serde(rename = "Tier", skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

/// Fields for creating a launchpoint (configured inspection instance).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewLaunchpoint {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "InspectorID")]
    pub inspector_id: u64,

    #[serde(rename = "EnvironmentID")]
    pub environment_id: u64,

    #[serde(rename = "AgentID", skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<u64>,

    #[serde(rename = "Schedule", skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

/// Explicit pagination block for metric evaluation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvaluationPage {
    #[serde(rename = "Page")]
    pub page: u32,

    #[serde(rename = "PageSize")]
    pub page_size: u32,
}

/// Request body for metric evaluation operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricEvaluation {
    #[serde(rename = "MetricIDs", skip_serializing_if = "Option::is_none")]
    pub metric_ids: Option<Vec<u64>>,

    #[serde(rename = "EnvironmentIDs", skip_serializing_if = "Option::is_none")]
    pub environment_ids: Option<Vec<u64>>,

    #[serde(rename = "Pagination")]
    pub pagination: EvaluationPage,
}

// ============================================================================
// Capability Trait
// ============================================================================

/// One method per Liongard REST operation used by the tool surface.
///
/// Responses are raw JSON values; handlers serialize them into result
/// envelopes without reshaping.
#[async_trait]
pub trait LiongardApi: Send + Sync {
    // Environments
    async fn list_environments(&self, page: PageQuery) -> ClientResult<Value>;
    async fn get_environment(&self, id: u64) -> ClientResult<Value>;
    async fn create_environment(&self, fields: NewEnvironment) -> ClientResult<Value>;
    async fn count_environments(&self) -> ClientResult<u64>;
    async fn get_environment_related(&self, id: u64) -> ClientResult<Value>;

    // Agents
    async fn list_agents(&self, page: PageQuery) -> ClientResult<Value>;
    async fn delete_agents(&self, ids: &[u64]) -> ClientResult<()>;
    async fn generate_agent_installer(&self) -> ClientResult<Value>;

    // Inspections
    async fn list_inspectors(&self, page: PageQuery) -> ClientResult<Value>;
    async fn list_launchpoints(&self, page: PageQuery) -> ClientResult<Value>;
    async fn create_launchpoint(&self, fields: NewLaunchpoint) -> ClientResult<Value>;
    async fn run_launchpoint(&self, id: u64) -> ClientResult<()>;

    // Systems
    async fn list_systems(&self, page: PageQuery) -> ClientResult<Value>;
    async fn get_system(&self, id: u64) -> ClientResult<Value>;

    // Detections
    async fn list_detections(&self, page: PageQuery, filters: Option<Value>)
    -> ClientResult<Value>;

    // Alerts
    async fn list_alerts(&self, page: PageQuery) -> ClientResult<Value>;
    async fn get_alert(&self, id: u64) -> ClientResult<Value>;

    // Metrics
    async fn list_metrics(&self) -> ClientResult<Value>;
    async fn evaluate_metrics(&self, request: MetricEvaluation) -> ClientResult<Value>;
    async fn evaluate_metrics_by_system(&self, request: MetricEvaluation) -> ClientResult<Value>;

    // Timeline
    async fn list_timeline(&self, page: PageQuery, filters: Option<Value>) -> ClientResult<Value>;

    // Inventory
    async fn list_identities(&self, page: PageQuery, filters: Option<Value>)
    -> ClientResult<Value>;
    async fn get_identity(&self, id: u64) -> ClientResult<Value>;
    async fn list_devices(&self, page: PageQuery, filters: Option<Value>) -> ClientResult<Value>;
    async fn get_device(&self, id: u64) -> ClientResult<Value>;
}
