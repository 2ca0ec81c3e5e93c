//! Detections domain tools.
//!
//! Detections are configuration changes and anomalies identified by
//! Liongard's inspection analysis engine.

use rmcp::model::{CallToolResult, JsonObject, Tool};

use super::common::{FilteredPageParams, error_result, json_result, parse_params, tool};
use crate::client::LiongardApi;

/// Detection domain catalog and handler.
pub struct DetectionTools;

impl DetectionTools {
    pub const LIST: &'static str = "liongard_detections_list";

    /// Tool descriptors for this domain.
    pub fn tools() -> Vec<Tool> {
        vec![tool::<FilteredPageParams>(
            Self::LIST,
            "List detections in Liongard with pagination and optional filters. Detections \
             represent configuration changes and anomalies identified through inspections.",
        )]
    }

    /// Handle a detection domain tool call.
    pub async fn handle(
        client: &dyn LiongardApi,
        name: &str,
        args: JsonObject,
    ) -> crate::Result<CallToolResult> {
        match name {
            Self::LIST => {
                let params: FilteredPageParams = parse_params(name, args)?;
                let query = params.query();
                let response = client.list_detections(query, params.filters).await?;
                json_result(&response)
            }
            _ => Ok(error_result(format!("Unknown detection tool: {name}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::StubApi;
    use serde_json::{Value, json};

    fn args(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_list_passes_filters_verbatim() {
        let stub = StubApi::new();
        DetectionTools::handle(
            &stub,
            DetectionTools::LIST,
            args(json!({"filters": {"severity": "critical"}})),
        )
        .await
        .unwrap();

        let filters = stub.last_filters.lock().unwrap().clone();
        assert_eq!(filters, Some(json!({"severity": "critical"})));
    }

    #[tokio::test]
    async fn test_list_omits_absent_filters() {
        let stub = StubApi::new();
        DetectionTools::handle(&stub, DetectionTools::LIST, args(json!({})))
            .await
            .unwrap();

        assert_eq!(*stub.last_filters.lock().unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_domain_scoped_error() {
        let stub = StubApi::new();
        let result = DetectionTools::handle(&stub, "liongard_detections_unknown", args(json!({})))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
    }
}
