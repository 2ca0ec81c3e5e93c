//! Timeline domain tools.
//!
//! Timeline provides a chronological view of inspection events, changes, and
//! activities across the Liongard platform.

use rmcp::model::{CallToolResult, JsonObject, Tool};

use super::common::{FilteredPageParams, error_result, json_result, parse_params, tool};
use crate::client::LiongardApi;

/// Timeline domain catalog and handler.
pub struct TimelineTools;

impl TimelineTools {
    pub const LIST: &'static str = "liongard_timeline_list";

    /// Tool descriptors for this domain.
    pub fn tools() -> Vec<Tool> {
        vec![tool::<FilteredPageParams>(
            Self::LIST,
            "List timeline entries in Liongard with pagination and optional filters. Timeline \
             provides a chronological view of inspection events and configuration changes.",
        )]
    }

    /// Handle a timeline domain tool call.
    pub async fn handle(
        client: &dyn LiongardApi,
        name: &str,
        args: JsonObject,
    ) -> crate::Result<CallToolResult> {
        match name {
            Self::LIST => {
                let params: FilteredPageParams = parse_params(name, args)?;
                let query = params.query();
                let response = client.list_timeline(query, params.filters).await?;
                json_result(&response)
            }
            _ => Ok(error_result(format!("Unknown timeline tool: {name}"))),
        }
    }
}
