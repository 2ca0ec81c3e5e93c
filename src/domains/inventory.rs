//! Inventory domain tools.
//!
//! Inventory covers asset identities (users, accounts) and device profiles
//! tracked by Liongard's inspection data.

use rmcp::model::{CallToolResult, JsonObject, Tool};

use super::common::{
    FilteredPageParams, IdParams, error_result, json_result, parse_params, tool,
};
use crate::client::LiongardApi;

/// Inventory domain catalog and handler.
pub struct InventoryTools;

impl InventoryTools {
    pub const IDENTITIES: &'static str = "liongard_inventory_identities";
    pub const IDENTITY_GET: &'static str = "liongard_inventory_identity_get";
    pub const DEVICES: &'static str = "liongard_inventory_devices";
    pub const DEVICE_GET: &'static str = "liongard_inventory_device_get";

    /// Tool descriptors for this domain.
    pub fn tools() -> Vec<Tool> {
        vec![
            tool::<FilteredPageParams>(
                Self::IDENTITIES,
                "List asset identities in Liongard with pagination and optional filters. \
                 Identities represent users, accounts, and other identity entities discovered \
                 through inspections.",
            ),
            tool::<IdParams>(
                Self::IDENTITY_GET,
                "Get detailed information about a specific identity by its ID. Returns full \
                 identity profile.",
            ),
            tool::<FilteredPageParams>(
                Self::DEVICES,
                "List device profiles in Liongard with pagination and optional filters. Device \
                 profiles represent hardware and software assets discovered through \
                 inspections.",
            ),
            tool::<IdParams>(
                Self::DEVICE_GET,
                "Get detailed information about a specific device profile by its ID. Returns \
                 full device profile details.",
            ),
        ]
    }

    /// Handle an inventory domain tool call.
    pub async fn handle(
        client: &dyn LiongardApi,
        name: &str,
        args: JsonObject,
    ) -> crate::Result<CallToolResult> {
        match name {
            Self::IDENTITIES => {
                let params: FilteredPageParams = parse_params(name, args)?;
                let query = params.query();
                let response = client.list_identities(query, params.filters).await?;
                json_result(&response)
            }
            Self::IDENTITY_GET => {
                let params: IdParams = parse_params(name, args)?;
                let identity = client.get_identity(params.id).await?;
                json_result(&identity)
            }
            Self::DEVICES => {
                let params: FilteredPageParams = parse_params(name, args)?;
                let query = params.query();
                let response = client.list_devices(query, params.filters).await?;
                json_result(&response)
            }
            Self::DEVICE_GET => {
                let params: IdParams = parse_params(name, args)?;
                let device = client.get_device(params.id).await?;
                json_result(&device)
            }
            _ => Ok(error_result(format!("Unknown inventory tool: {name}"))),
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

    #[test]
    fn test_catalog_has_four_tools() {
        assert_eq!(InventoryTools::tools().len(), 4);
    }

    #[tokio::test]
    async fn test_identities_list_passes_filters() {
        let stub = StubApi::new();
        InventoryTools::handle(
            &stub,
            InventoryTools::IDENTITIES,
            args(json!({"filters": {"environmentId": 8}})),
        )
        .await
        .unwrap();

        assert_eq!(stub.calls(), vec!["list_identities"]);
        assert_eq!(
            *stub.last_filters.lock().unwrap(),
            Some(json!({"environmentId": 8}))
        );
    }

    #[tokio::test]
    async fn test_device_get_forwards_id() {
        let stub = StubApi::new();
        let result = InventoryTools::handle(
            &stub,
            InventoryTools::DEVICE_GET,
            args(json!({"id": 77})),
        )
        .await
        .unwrap();

        assert_ne!(result.is_error, Some(true));
        assert_eq!(stub.calls(), vec!["get_device"]);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_domain_scoped_error() {
        let stub = StubApi::new();
        let result = InventoryTools::handle(&stub, "liongard_inventory_unknown", args(json!({})))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
    }
}
