//! Inspections domain tools.
//!
//! Inspections cover inspectors (inspection types) and launchpoints
//! (configured inspection instances) in Liongard.

use rmcp::model::{CallToolResult, JsonObject, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use super::common::{PageParams, error_result, json_result, parse_params, text_result, tool};
use crate::client::{LiongardApi, NewLaunchpoint};

/// Fields for creating a launchpoint.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateLaunchpointParams {
    /// Name for the launchpoint
    #[serde(rename = "Name")]
    pub name: String,

    /// The inspector type ID
    #[serde(rename = "InspectorID")]
    pub inspector_id: u64,

    /// The environment ID to associate with
    #[serde(rename = "EnvironmentID")]
    pub environment_id: u64,

    /// Optional agent ID to run the inspection on
    #[serde(rename = "AgentID")]
    pub agent_id: Option<u64>,

    /// Optional schedule expression
    #[serde(rename = "Schedule")]
    pub schedule: Option<String>,
}

impl From<CreateLaunchpointParams> for NewLaunchpoint {
    fn from(params: CreateLaunchpointParams) -> Self {
        Self {
            name: params.name,
            inspector_id: params.inspector_id,
            environment_id: params.environment_id,
            agent_id: params.agent_id,
            schedule: params.schedule,
        }
    }
}

/// Parameters for triggering an inspection run.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
pub struct RunInspectionParams {
    /// The launchpoint ID to run
    #[serde(rename = "launchpointId")]
    pub launchpoint_id: u64,
}

/// Inspection domain catalog and handler.
pub struct InspectionTools;

impl InspectionTools {
    pub const INSPECTORS: &'static str = "liongard_inspections_inspectors";
    pub const LAUNCHPOINTS: &'static str = "liongard_inspections_launchpoints";
    pub const CREATE_LAUNCHPOINT: &'static str = "liongard_inspections_create_launchpoint";
    pub const RUN: &'static str = "liongard_inspections_run";

    /// Tool descriptors for this domain.
    pub fn tools() -> Vec<Tool> {
        vec![
            tool::<PageParams>(
                Self::INSPECTORS,
                "List available inspectors (inspection types) in Liongard with pagination. \
                 Inspectors define what data is collected.",
            ),
            tool::<PageParams>(
                Self::LAUNCHPOINTS,
                "List launchpoints (configured inspection instances) in Liongard with \
                 pagination. Launchpoints are configured instances of inspectors tied to \
                 environments.",
            ),
            tool::<CreateLaunchpointParams>(
                Self::CREATE_LAUNCHPOINT,
                "Create a new launchpoint (configured inspection instance). Requires an \
                 inspector ID, environment ID, and a name.",
            ),
            tool::<RunInspectionParams>(
                Self::RUN,
                "Trigger an immediate inspection run for a specific launchpoint. The inspection \
                 will execute as soon as possible.",
            ),
        ]
    }

    /// Handle an inspection domain tool call.
    pub async fn handle(
        client: &dyn LiongardApi,
        name: &str,
        args: JsonObject,
    ) -> crate::Result<CallToolResult> {
        match name {
            Self::INSPECTORS => {
                let params: PageParams = parse_params(name, args)?;
                let response = client.list_inspectors(params.query()).await?;
                json_result(&response)
            }
            Self::LAUNCHPOINTS => {
                let params: PageParams = parse_params(name, args)?;
                let response = client.list_launchpoints(params.query()).await?;
                json_result(&response)
            }
            Self::CREATE_LAUNCHPOINT => {
                let params: CreateLaunchpointParams = parse_params(name, args)?;
                let launchpoint = client.create_launchpoint(params.into()).await?;
                json_result(&launchpoint)
            }
            Self::RUN => {
                let params: RunInspectionParams = parse_params(name, args)?;
                info!("Triggering inspection run for launchpoint {}", params.launchpoint_id);
                client.run_launchpoint(params.launchpoint_id).await?;
                Ok(text_result(format!(
                    "Inspection run triggered for launchpoint {}.",
                    params.launchpoint_id
                )))
            }
            _ => Ok(error_result(format!("Unknown inspection tool: {name}"))),
        }
    }
}
