//! Environments domain tools.
//!
//! Environments represent customer/company entities in Liongard.

use rmcp::model::{CallToolResult, JsonObject, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::common::{IdParams, NoParams, PageParams, error_result, json_result, parse_params, tool};
use crate::client::{LiongardApi, NewEnvironment};

/// Fields for creating an environment. Only `Name` is required.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateEnvironmentParams {
    /// The environment name (required)
    #[serde(rename = "Name")]
    pub name: String,

    /// Environment description
    #[serde(rename = "Description")]
    pub description: Option<String>,

    /// Environment status
    #[serde(rename = "Status")]
    pub status: Option<String>,

    /// Whether the environment is visible
    #[serde(rename = "Visible")]
    pub visible: Option<bool>,

    /// Environment tier classification
    #[serde(rename = "Tier")]
    pub tier: Option<String>,
}

impl From<CreateEnvironmentParams> for NewEnvironment {
    fn from(params: CreateEnvironmentParams) -> Self {
        Self {
            name: params.name,
            description: params.description,
            status: params.status,
            visible: params.visible,
            tier: params.tier,
        }
    }
}

/// Environment domain catalog and handler.
pub struct EnvironmentTools;

impl EnvironmentTools {
    pub const LIST: &'static str = "liongard_environments_list";
    pub const GET: &'static str = "liongard_environments_get";
    pub const CREATE: &'static str = "liongard_environments_create";
    pub const COUNT: &'static str = "liongard_environments_count";
    pub const RELATED: &'static str = "liongard_environments_related";

    /// Tool descriptors for this domain.
    pub fn tools() -> Vec<Tool> {
        vec![
            tool::<PageParams>(
                Self::LIST,
                "List environments (customers/companies) in Liongard with pagination. Returns \
                 environment details including name, status, and tier.",
            ),
            tool::<IdParams>(
                Self::GET,
                "Get detailed information about a specific environment by its ID. Returns full \
                 environment profile including status, visibility, and tier.",
            ),
            tool::<CreateEnvironmentParams>(
                Self::CREATE,
                "Create a new environment in Liongard. Only Name is required, all other fields \
                 are optional.",
            ),
            tool::<NoParams>(
                Self::COUNT,
                "Get the total count of environments in Liongard. Useful for understanding the \
                 size of your environment inventory.",
            ),
            tool::<IdParams>(
                Self::RELATED,
                "Get related entities for a specific environment. Returns associated \
                 launchpoints, agents, integration mappings, and child environments.",
            ),
        ]
    }

    /// Handle an environment domain tool call.
    pub async fn handle(
        client: &dyn LiongardApi,
        name: &str,
        args: JsonObject,
    ) -> crate::Result<CallToolResult> {
        match name {
            Self::LIST => {
                let params: PageParams = parse_params(name, args)?;
                let response = client.list_environments(params.query()).await?;
                json_result(&response)
            }
            Self::GET => {
                let params: IdParams = parse_params(name, args)?;
                let environment = client.get_environment(params.id).await?;
                json_result(&environment)
            }
            Self::CREATE => {
                let params: CreateEnvironmentParams = parse_params(name, args)?;
                info!("Creating environment '{}'", params.name);
                let environment = client.create_environment(params.into()).await?;
                json_result(&environment)
            }
            Self::COUNT => {
                let _: NoParams = parse_params(name, args)?;
                let count = client.count_environments().await?;
                json_result(&json!({ "count": count }))
            }
            Self::RELATED => {
                let params: IdParams = parse_params(name, args)?;
                let related = client.get_environment_related(params.id).await?;
                json_result(&related)
            }
            _ => Ok(error_result(format!("Unknown environment tool: {name}"))),
        }
    }
}
