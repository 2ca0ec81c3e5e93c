//! Alerts domain tools.
//!
//! Alerts are notifications generated when detections match configured alert
//! rules in Liongard.

use rmcp::model::{CallToolResult, JsonObject, Tool};

use super::common::{IdParams, PageParams, error_result, json_result, parse_params, tool};
use crate::client::LiongardApi;

/// Alert domain catalog and handler.
pub struct AlertTools;

impl AlertTools {
    pub const LIST: &'static str = "liongard_alerts_list";
    pub const GET: &'static str = "liongard_alerts_get";

    /// Tool descriptors for this domain.
    pub fn tools() -> Vec<Tool> {
        vec![
            tool::<PageParams>(
                Self::LIST,
                "List alerts in Liongard with pagination. Alerts are generated when detections \
                 match configured alert rules.",
            ),
            tool::<IdParams>(
                Self::GET,
                "Get detailed information about a specific alert by its ID. Returns full alert \
                 details including source detection and severity.",
            ),
        ]
    }

    /// Handle an alert domain tool call.
    pub async fn handle(
        client: &dyn LiongardApi,
        name: &str,
        args: JsonObject,
    ) -> crate::Result<CallToolResult> {
        match name {
            Self::LIST => {
                let params: PageParams = parse_params(name, args)?;
                let response = client.list_alerts(params.query()).await?;
                json_result(&response)
            }
            Self::GET => {
                let params: IdParams = parse_params(name, args)?;
                let alert = client.get_alert(params.id).await?;
                json_result(&alert)
            }
            _ => Ok(error_result(format!("Unknown alert tool: {name}"))),
        }
    }
}
