//! Tool router - navigation handling and domain dispatch.
//!
//! The router is the single recovery boundary for tool calls: navigation
//! meta-tools mutate the session state, fully-qualified domain tools are
//! resolved by name prefix to a closed set of handlers, and every fault is
//! converted into an error envelope. Nothing escapes a tool call as an
//! unhandled error.
//!
//! Prefix routing is deliberately independent of the navigation state: the
//! state controls which tools are *advertised*, not which are callable.

use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject, Tool};
use tracing::{info, instrument};

use super::agents::AgentTools;
use super::alerts::AlertTools;
use super::common::{error_result, parse_params, text_result};
use super::detections::DetectionTools;
use super::environments::EnvironmentTools;
use super::inspections::InspectionTools;
use super::inventory::InventoryTools;
use super::metrics::MetricTools;
use super::navigation::{
    BACK_TOOL, Domain, NAVIGATE_TOOL, NavigateParams, SessionState, back_tool, navigate_tool,
};
use super::systems::SystemTools;
use super::timeline::TimelineTools;
use crate::client::{ClientAccessor, LiongardApi};

/// Routes tool calls to navigation handling or the owning domain handler.
pub struct ToolRouter {
    accessor: Arc<ClientAccessor>,
}

impl ToolRouter {
    /// Create a router over the given client accessor.
    pub fn new(accessor: Arc<ClientAccessor>) -> Self {
        Self { accessor }
    }

    /// The tool catalog owned by a domain.
    pub fn domain_tools(domain: Domain) -> Vec<Tool> {
        match domain {
            Domain::Environments => EnvironmentTools::tools(),
            Domain::Agents => AgentTools::tools(),
            Domain::Inspections => InspectionTools::tools(),
            Domain::Systems => SystemTools::tools(),
            Domain::Detections => DetectionTools::tools(),
            Domain::Alerts => AlertTools::tools(),
            Domain::Metrics => MetricTools::tools(),
            Domain::Timeline => TimelineTools::tools(),
            Domain::Inventory => InventoryTools::tools(),
        }
    }

    /// The tool set advertised for the session's current state.
    ///
    /// A pure function of the state, recomputed on every listing: the state
    /// can change between listings, so the result is never cached.
    pub fn visible_tools(&self, session: &SessionState) -> Vec<Tool> {
        match session.current_domain() {
            None => vec![navigate_tool()],
            Some(domain) => {
                let mut tools = vec![back_tool()];
                tools.extend(Self::domain_tools(domain));
                tools
            }
        }
    }

    /// Dispatch a tool call, converting every fault into an error envelope.
    #[instrument(skip(self, session, args), fields(tool = %name))]
    pub async fn dispatch(
        &self,
        session: &SessionState,
        name: &str,
        args: JsonObject,
    ) -> CallToolResult {
        match self.try_dispatch(session, name, args).await {
            Ok(result) => result,
            Err(e) => error_result(format!("Error: {e}")),
        }
    }

    async fn try_dispatch(
        &self,
        session: &SessionState,
        name: &str,
        args: JsonObject,
    ) -> crate::Result<CallToolResult> {
        if name == NAVIGATE_TOOL {
            let params: NavigateParams = parse_params(name, args)?;
            session.enter(params.domain);
            info!("Navigated to {} domain", params.domain);

            let tool_names = Self::domain_tools(params.domain)
                .iter()
                .map(|t| t.name.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Ok(text_result(format!(
                "Navigated to {} domain. Available tools: {}",
                params.domain, tool_names
            )));
        }

        if name == BACK_TOOL {
            session.leave();
            return Ok(text_result(format!(
                "Returned to domain selection. Use liongard_navigate to select a domain: {}",
                Domain::menu()
            )));
        }

        let Some(domain) = Domain::from_tool_name(name) else {
            return Ok(error_result(format!(
                "Unknown tool: {name}. Use liongard_navigate to select a domain first."
            )));
        };

        let client = self.client_for(session)?;
        let client = client.as_ref();
        match domain {
            Domain::Environments => EnvironmentTools::handle(client, name, args).await,
            Domain::Agents => AgentTools::handle(client, name, args).await,
            Domain::Inspections => InspectionTools::handle(client, name, args).await,
            Domain::Systems => SystemTools::handle(client, name, args).await,
            Domain::Detections => DetectionTools::handle(client, name, args).await,
            Domain::Alerts => AlertTools::handle(client, name, args).await,
            Domain::Metrics => MetricTools::handle(client, name, args).await,
            Domain::Timeline => TimelineTools::handle(client, name, args).await,
            Domain::Inventory => InventoryTools::handle(client, name, args).await,
        }
    }

    /// Resolve the backend client for this session.
    ///
    /// Session-bound credentials (gateway mode) take precedence over the
    /// process-level configuration.
    fn client_for(&self, session: &SessionState) -> crate::Result<Arc<dyn LiongardApi>> {
        let client = match session.credentials() {
            Some(credentials) => self.accessor.acquire_with(&credentials)?,
            None => self.accessor.acquire()?,
        };
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::StubApi;
    use crate::client::Credentials;
    use crate::core::config::CredentialsConfig;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn configured() -> CredentialsConfig {
        CredentialsConfig {
            api_key: Some("test-api-key".to_string()),
            instance: Some("test-instance".to_string()),
        }
    }

    fn stub_router(stub: Arc<StubApi>) -> ToolRouter {
        let accessor = ClientAccessor::with_builder(configured(), move |_| {
            Ok(stub.clone() as Arc<dyn LiongardApi>)
        });
        ToolRouter::new(Arc::new(accessor))
    }

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap_or_default()
    }

    fn first_text(result: &CallToolResult) -> String {
        match &result.content[0].raw {
            rmcp::model::RawContent::Text(text) => text.text.clone(),
            other => panic!("expected text content, got {other:?}"),
        }
    }

    /// Syntactically valid minimal arguments for every tool in the surface.
    fn minimal_args(name: &str) -> JsonObject {
        let value = match name {
            "liongard_environments_get"
            | "liongard_environments_related"
            | "liongard_systems_get"
            | "liongard_alerts_get"
            | "liongard_inventory_identity_get"
            | "liongard_inventory_device_get" => json!({"id": 1}),
            "liongard_environments_create" => json!({"Name": "Acme"}),
            "liongard_agents_delete" => json!({"agentIds": [1]}),
            "liongard_inspections_create_launchpoint" => {
                json!({"Name": "lp", "InspectorID": 1, "EnvironmentID": 2})
            }
            "liongard_inspections_run" => json!({"launchpointId": 1}),
            _ => json!({}),
        };
        args(value)
    }

    #[test]
    fn test_root_advertises_only_navigate() {
        let router = stub_router(Arc::new(StubApi::new()));
        let session = SessionState::new();

        let tools = router.visible_tools(&session);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, NAVIGATE_TOOL);
    }

    #[test]
    fn test_in_domain_advertises_back_plus_catalog() {
        let router = stub_router(Arc::new(StubApi::new()));
        let session = SessionState::new();
        session.enter(Domain::Environments);

        let tools = router.visible_tools(&session);
        assert_eq!(tools.len(), 6);
        assert_eq!(tools[0].name, BACK_TOOL);
        assert!(
            tools[1..]
                .iter()
                .all(|t| t.name.starts_with("liongard_environments_"))
        );
    }

    #[test]
    fn test_visible_tools_rederived_after_state_change() {
        let router = stub_router(Arc::new(StubApi::new()));
        let session = SessionState::new();

        session.enter(Domain::Agents);
        assert_eq!(router.visible_tools(&session).len(), 4);

        session.leave();
        let tools = router.visible_tools(&session);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, NAVIGATE_TOOL);
    }

    #[test]
    fn test_tool_names_globally_unique() {
        let mut names = HashSet::new();
        names.insert(NAVIGATE_TOOL.to_string());
        names.insert(BACK_TOOL.to_string());

        let mut total = 2;
        for domain in Domain::ALL {
            for descriptor in ToolRouter::domain_tools(domain) {
                assert!(descriptor.name.starts_with(domain.tool_prefix()));
                names.insert(descriptor.name.to_string());
                total += 1;
            }
        }
        assert_eq!(names.len(), total);
        assert_eq!(total, 27);
    }

    #[tokio::test]
    async fn test_navigate_sets_state_and_lists_tools() {
        let router = stub_router(Arc::new(StubApi::new()));
        let session = SessionState::new();

        let result = router
            .dispatch(&session, NAVIGATE_TOOL, args(json!({"domain": "environments"})))
            .await;

        assert_ne!(result.is_error, Some(true));
        let text = first_text(&result);
        assert!(text.contains("Navigated to environments domain"));
        assert!(text.contains("liongard_environments_list"));
        assert_eq!(session.current_domain(), Some(Domain::Environments));
    }

    #[tokio::test]
    async fn test_navigate_back_round_trip_for_every_domain() {
        let router = stub_router(Arc::new(StubApi::new()));
        let session = SessionState::new();

        for domain in Domain::ALL {
            let result = router
                .dispatch(
                    &session,
                    NAVIGATE_TOOL,
                    args(json!({"domain": domain.as_str()})),
                )
                .await;
            assert_ne!(result.is_error, Some(true));
            assert_eq!(session.current_domain(), Some(domain));

            router.dispatch(&session, BACK_TOOL, args(json!({}))).await;
            assert_eq!(session.current_domain(), None);
        }
    }

    #[tokio::test]
    async fn test_navigate_switches_domains_directly() {
        let router = stub_router(Arc::new(StubApi::new()));
        let session = SessionState::new();

        router
            .dispatch(&session, NAVIGATE_TOOL, args(json!({"domain": "agents"})))
            .await;
        router
            .dispatch(&session, NAVIGATE_TOOL, args(json!({"domain": "metrics"})))
            .await;

        assert_eq!(session.current_domain(), Some(Domain::Metrics));
    }

    #[tokio::test]
    async fn test_navigate_rejects_unknown_domain() {
        let router = stub_router(Arc::new(StubApi::new()));
        let session = SessionState::new();

        let result = router
            .dispatch(&session, NAVIGATE_TOOL, args(json!({"domain": "bogus"})))
            .await;

        assert_eq!(result.is_error, Some(true));
        assert!(first_text(&result).starts_with("Error: "));
        assert_eq!(session.current_domain(), None);
    }

    #[tokio::test]
    async fn test_back_returns_to_root_and_lists_domains() {
        let router = stub_router(Arc::new(StubApi::new()));
        let session = SessionState::new();
        session.enter(Domain::Timeline);

        let result = router.dispatch(&session, BACK_TOOL, args(json!({}))).await;

        assert_eq!(session.current_domain(), None);
        let text = first_text(&result);
        assert!(text.contains("Returned to domain selection"));
        for domain in Domain::ALL {
            assert!(text.contains(domain.as_str()));
        }
    }

    #[tokio::test]
    async fn test_back_at_root_is_not_an_error() {
        let router = stub_router(Arc::new(StubApi::new()));
        let session = SessionState::new();

        let result = router.dispatch(&session, BACK_TOOL, args(json!({}))).await;

        assert_ne!(result.is_error, Some(true));
        assert_eq!(session.current_domain(), None);
    }

    #[tokio::test]
    async fn test_unknown_tool_at_root() {
        let router = stub_router(Arc::new(StubApi::new()));
        let session = SessionState::new();

        let result = router
            .dispatch(&session, "totally_unknown_tool", args(json!({})))
            .await;

        assert_eq!(result.is_error, Some(true));
        let text = first_text(&result);
        assert!(text.contains("Unknown tool: totally_unknown_tool"));
        assert!(text.contains("liongard_navigate"));
    }

    #[tokio::test]
    async fn test_unknown_domain_tool_is_domain_scoped() {
        let router = stub_router(Arc::new(StubApi::new()));
        let session = SessionState::new();

        let result = router
            .dispatch(&session, "liongard_environments_unknown", args(json!({})))
            .await;

        assert_eq!(result.is_error, Some(true));
        assert!(first_text(&result).contains("Unknown environment tool"));
    }

    #[tokio::test]
    async fn test_qualified_tools_route_without_navigation() {
        // State gates advertisement, not callability.
        let stub = Arc::new(StubApi::new());
        let router = stub_router(stub.clone());
        let session = SessionState::new();

        let result = router
            .dispatch(&session, "liongard_systems_list", args(json!({})))
            .await;

        assert_ne!(result.is_error, Some(true));
        assert_eq!(stub.calls(), vec!["list_systems"]);
        assert_eq!(session.current_domain(), None);
    }

    #[tokio::test]
    async fn test_backend_fault_becomes_error_envelope() {
        let stub = Arc::new(StubApi::failing("backend exploded"));
        let router = stub_router(stub);
        let session = SessionState::new();

        let result = router
            .dispatch(&session, "liongard_alerts_list", args(json!({})))
            .await;

        assert_eq!(result.is_error, Some(true));
        let text = first_text(&result);
        assert!(text.starts_with("Error: "));
        assert!(text.contains("backend exploded"));
    }

    #[tokio::test]
    async fn test_missing_credentials_become_error_envelope() {
        let accessor = ClientAccessor::new(CredentialsConfig::default());
        let router = ToolRouter::new(Arc::new(accessor));
        let session = SessionState::new();

        let result = router
            .dispatch(&session, "liongard_agents_list", args(json!({})))
            .await;

        assert_eq!(result.is_error, Some(true));
        let text = first_text(&result);
        assert!(text.contains("LIONGARD_API_KEY"));
        assert!(text.contains("LIONGARD_INSTANCE"));
    }

    #[tokio::test]
    async fn test_session_credentials_select_the_client() {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let recorded = seen.clone();
        let accessor = ClientAccessor::with_builder(configured(), move |credentials| {
            recorded.lock().unwrap().push(credentials.instance.clone());
            Ok(Arc::new(StubApi::new()) as Arc<dyn LiongardApi>)
        });
        let router = ToolRouter::new(Arc::new(accessor));

        let session = SessionState::new();
        session.set_credentials(Credentials::new("tenant-key", "tenant-a"));
        router
            .dispatch(&session, "liongard_metrics_list", args(json!({})))
            .await;

        assert_eq!(*seen.lock().unwrap(), vec!["tenant-a".to_string()]);
    }

    #[tokio::test]
    async fn test_every_catalog_tool_handles_minimal_args() {
        let stub = Arc::new(StubApi::new());
        let router = stub_router(stub);
        let session = SessionState::new();

        for domain in Domain::ALL {
            for descriptor in ToolRouter::domain_tools(domain) {
                let name = descriptor.name.to_string();
                let result = router
                    .dispatch(&session, &name, minimal_args(&name))
                    .await;

                assert_ne!(result.is_error, Some(true), "tool {name} errored");
                assert!(!result.content.is_empty(), "tool {name} returned no content");
            }
        }
    }
}
