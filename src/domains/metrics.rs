//! Metrics domain tools.
//!
//! Metrics provide quantitative measurements and evaluations across
//! environments and systems in Liongard.

use rmcp::model::{CallToolResult, JsonObject, Tool};
use schemars::JsonSchema;
use serde::Deserialize;

use super::common::{NoParams, error_result, json_result, parse_params, tool};
use crate::client::{EvaluationPage, LiongardApi, MetricEvaluation};

/// Page defaults applied to evaluation requests when absent.
const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PAGE_SIZE: u32 = 50;

/// Parameters for the two metric evaluation tools.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct EvaluateMetricsParams {
    /// Optional array of metric IDs to evaluate
    #[serde(rename = "MetricIDs")]
    pub metric_ids: Option<Vec<u64>>,

    /// Optional array of environment IDs to filter by
    #[serde(rename = "EnvironmentIDs")]
    pub environment_ids: Option<Vec<u64>>,

    /// Page number (1-indexed, default: 1)
    pub page: Option<u32>,

    /// Number of items per page (default: 50)
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
}

impl EvaluateMetricsParams {
    /// Build the evaluation request with an explicit pagination block.
    ///
    /// Unlike the list tools, evaluation always sends `Page`/`PageSize`,
    /// defaulting to 1/50 when absent.
    fn evaluation(self) -> MetricEvaluation {
        MetricEvaluation {
            metric_ids: self.metric_ids,
            environment_ids: self.environment_ids,
            pagination: EvaluationPage {
                page: self.page.unwrap_or(DEFAULT_PAGE),
                page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            },
        }
    }
}

/// Metric domain catalog and handler.
pub struct MetricTools;

impl MetricTools {
    pub const LIST: &'static str = "liongard_metrics_list";
    pub const EVALUATE: &'static str = "liongard_metrics_evaluate";
    pub const EVALUATE_SYSTEMS: &'static str = "liongard_metrics_evaluate_systems";

    /// Tool descriptors for this domain.
    pub fn tools() -> Vec<Tool> {
        vec![
            tool::<NoParams>(
                Self::LIST,
                "List all available metrics in Liongard. Returns metric definitions including \
                 name, type, and status.",
            ),
            tool::<EvaluateMetricsParams>(
                Self::EVALUATE,
                "Evaluate metrics across all systems. Optionally filter by specific metric IDs \
                 and environment IDs.",
            ),
            tool::<EvaluateMetricsParams>(
                Self::EVALUATE_SYSTEMS,
                "Evaluate metrics grouped per system. Optionally filter by specific metric IDs \
                 and environment IDs.",
            ),
        ]
    }

    /// Handle a metric domain tool call.
    pub async fn handle(
        client: &dyn LiongardApi,
        name: &str,
        args: JsonObject,
    ) -> crate::Result<CallToolResult> {
        match name {
            Self::LIST => {
                let _: NoParams = parse_params(name, args)?;
                let metrics = client.list_metrics().await?;
                json_result(&metrics)
            }
            Self::EVALUATE => {
                let params: EvaluateMetricsParams = parse_params(name, args)?;
                let response = client.evaluate_metrics(params.evaluation()).await?;
                json_result(&response)
            }
            Self::EVALUATE_SYSTEMS => {
                let params: EvaluateMetricsParams = parse_params(name, args)?;
                let response = client.evaluate_metrics_by_system(params.evaluation()).await?;
                json_result(&response)
            }
            _ => Ok(error_result(format!("Unknown metric tool: {name}"))),
        }
    }
}
