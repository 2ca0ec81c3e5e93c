//! Agents domain tools.
//!
//! Agents are the software components installed on-premise that facilitate
//! inspections and data collection in Liongard.

use rmcp::model::{CallToolResult, JsonObject, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use super::common::{NoParams, PageParams, error_result, json_result, parse_params, text_result, tool};
use crate::client::LiongardApi;

/// Parameters for the bulk-delete tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteAgentsParams {
    /// Array of agent IDs to delete
    #[serde(rename = "agentIds")]
    pub agent_ids: Vec<u64>,
}

/// Agent domain catalog and handler.
pub struct AgentTools;

impl AgentTools {
    pub const LIST: &'static str = "liongard_agents_list";
    pub const DELETE: &'static str = "liongard_agents_delete";
    pub const INSTALLER: &'static str = "liongard_agents_installer";

    /// Tool descriptors for this domain.
    pub fn tools() -> Vec<Tool> {
        vec![
            tool::<PageParams>(
                Self::LIST,
                "List agents in Liongard with pagination. Agents are installed on-premise to \
                 facilitate inspections and data collection.",
            ),
            tool::<DeleteAgentsParams>(
                Self::DELETE,
                "Bulk delete agents by their IDs. Use with caution - this permanently removes \
                 agents from Liongard.",
            ),
            tool::<NoParams>(
                Self::INSTALLER,
                "Generate a dynamic agent installer. Returns installer download information for \
                 deploying a new Liongard agent.",
            ),
        ]
    }

    /// Handle an agent domain tool call.
    pub async fn handle(
        client: &dyn LiongardApi,
        name: &str,
        args: JsonObject,
    ) -> crate::Result<CallToolResult> {
        match name {
            Self::LIST => {
                let params: PageParams = parse_params(name, args)?;
                let response = client.list_agents(params.query()).await?;
                json_result(&response)
            }
            Self::DELETE => {
                let params: DeleteAgentsParams = parse_params(name, args)?;
                info!("Deleting {} agent(s)", params.agent_ids.len());
                client.delete_agents(&params.agent_ids).await?;
                Ok(text_result(format!(
                    "Successfully deleted {} agent(s).",
                    params.agent_ids.len()
                )))
            }
            Self::INSTALLER => {
                let _: NoParams = parse_params(name, args)?;
                let installer = client.generate_agent_installer().await?;
                json_result(&installer)
            }
            _ => Ok(error_result(format!("Unknown agent tool: {name}"))),
        }
    }
}
