//! Systems domain tools.
//!
//! Systems represent the infrastructure components discovered and tracked by
//! Liongard inspections.

use rmcp::model::{CallToolResult, JsonObject, Tool};

use super::common::{IdParams, PageParams, error_result, json_result, parse_params, tool};
use crate::client::LiongardApi;

/// System domain catalog and handler.
pub struct SystemTools;

impl SystemTools {
    pub const LIST: &'static str = "liongard_systems_list";
    pub const GET: &'static str = "liongard_systems_get";

    /// Tool descriptors for this domain.
    pub fn tools() -> Vec<Tool> {
        vec![
            tool::<PageParams>(
                Self::LIST,
                "List systems in Liongard with pagination. Systems are infrastructure \
                 components discovered through inspections.",
            ),
            tool::<IdParams>(
                Self::GET,
                "Get detailed information about a specific system by its ID. Returns full \
                 system profile.",
            ),
        ]
    }

    /// Handle a system domain tool call.
    pub async fn handle(
        client: &dyn LiongardApi,
        name: &str,
        args: JsonObject,
    ) -> crate::Result<CallToolResult> {
        match name {
            Self::LIST => {
                let params: PageParams = parse_params(name, args)?;
                let response = client.list_systems(params.query()).await?;
                json_result(&response)
            }
            Self::GET => {
                let params: IdParams = parse_params(name, args)?;
                let system = client.get_system(params.id).await?;
                json_result(&system)
            }
            _ => Ok(error_result(format!("Unknown system tool: {name}"))),
        }
    }
}
