//! Decision-tree navigation for the tool surface.
//!
//! The server exposes its tools through a two-level decision tree: at the
//! root only the navigate tool is visible; after navigating into a domain,
//! that domain's catalog plus the back tool are visible. Which tools are
//! *advertised* is a pure function of the session's navigation state.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::tool;
use crate::client::Credentials;

/// Name of the navigation meta-tool.
pub const NAVIGATE_TOOL: &str = "liongard_navigate";

/// Name of the back-navigation meta-tool.
pub const BACK_TOOL: &str = "liongard_back";

// ============================================================================
// Domains
// ============================================================================

/// The fixed set of Liongard functional areas.
///
/// Each domain owns exactly one tool catalog and one handler; the mapping is
/// closed and checked exhaustively in the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Environments,
    Agents,
    Inspections,
    Systems,
    Detections,
    Alerts,
    Metrics,
    Timeline,
    Inventory,
}

impl Domain {
    /// All domains, in navigation-menu order.
    pub const ALL: [Domain; 9] = [
        Domain::Environments,
        Domain::Agents,
        Domain::Inspections,
        Domain::Systems,
        Domain::Detections,
        Domain::Alerts,
        Domain::Metrics,
        Domain::Timeline,
        Domain::Inventory,
    ];

    /// The lowercase tag used in tool names and the navigate enum.
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Environments => "environments",
            Domain::Agents => "agents",
            Domain::Inspections => "inspections",
            Domain::Systems => "systems",
            Domain::Detections => "detections",
            Domain::Alerts => "alerts",
            Domain::Metrics => "metrics",
            Domain::Timeline => "timeline",
            Domain::Inventory => "inventory",
        }
    }

    /// Reserved tool-name prefix owned by this domain.
    pub fn tool_prefix(self) -> &'static str {
        match self {
            Domain::Environments => "liongard_environments_",
            Domain::Agents => "liongard_agents_",
            Domain::Inspections => "liongard_inspections_",
            Domain::Systems => "liongard_systems_",
            Domain::Detections => "liongard_detections_",
            Domain::Alerts => "liongard_alerts_",
            Domain::Metrics => "liongard_metrics_",
            Domain::Timeline => "liongard_timeline_",
            Domain::Inventory => "liongard_inventory_",
        }
    }

    /// Human-readable summary shown in the navigation menu.
    pub fn description(self) -> &'static str {
        match self {
            Domain::Environments => {
                "Environment/company management - list, get, create environments, count, and view related entities"
            }
            Domain::Agents => {
                "Agent management - list agents, bulk delete, and generate installers for on-premise data collection"
            }
            Domain::Inspections => {
                "Inspection management - list inspectors and launchpoints, create launchpoints, and trigger inspection runs"
            }
            Domain::Systems => {
                "System management - list and get infrastructure components discovered through inspections"
            }
            Domain::Detections => {
                "Detection monitoring - list configuration changes and anomalies identified by inspections"
            }
            Domain::Alerts => "Alert management - list and get alerts generated from detection rules",
            Domain::Metrics => {
                "Metrics evaluation - list metrics, evaluate across systems, and evaluate per system"
            }
            Domain::Timeline => {
                "Timeline view - chronological list of inspection events and configuration changes"
            }
            Domain::Inventory => {
                "Asset inventory - manage identities (users/accounts) and device profiles discovered through inspections"
            }
        }
    }

    /// Resolve a fully-qualified tool name to the domain owning its prefix.
    pub fn from_tool_name(name: &str) -> Option<Domain> {
        Self::ALL
            .into_iter()
            .find(|domain| name.starts_with(domain.tool_prefix()))
    }

    /// Comma-joined list of all domain tags.
    pub fn menu() -> String {
        Self::ALL
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Meta-Tool Parameters
// ============================================================================

/// Parameters for the navigate tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NavigateParams {
    /// The domain to navigate to:
    /// - environments: Environment/company management - list, get, create environments, count, and view related entities
    /// - agents: Agent management - list agents, bulk delete, and generate installers for on-premise data collection
    /// - inspections: Inspection management - list inspectors and launchpoints, create launchpoints, and trigger inspection runs
    /// - systems: System management - list and get infrastructure components discovered through inspections
    /// - detections: Detection monitoring - list configuration changes and anomalies identified by inspections
    /// - alerts: Alert management - list and get alerts generated from detection rules
    /// - metrics: Metrics evaluation - list metrics, evaluate across systems, and evaluate per system
    /// - timeline: Timeline view - chronological list of inspection events and configuration changes
    /// - inventory: Asset inventory - manage identities (users/accounts) and device profiles discovered through inspections
    pub domain: Domain,
}

/// Parameters for the back tool (none).
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct BackParams {}

/// Descriptor for the navigation meta-tool.
pub fn navigate_tool() -> Tool {
    tool::<NavigateParams>(
        NAVIGATE_TOOL,
        "Navigate to a specific domain in Liongard. Call this first to select which area you \
         want to work with. After navigation, domain-specific tools will be available.",
    )
}

/// Descriptor for the back-navigation meta-tool.
pub fn back_tool() -> Tool {
    tool::<BackParams>(
        BACK_TOOL,
        "Return to domain selection. Use this to switch to a different area of Liongard.",
    )
}

// ============================================================================
// Session State
// ============================================================================

/// Session-scoped state: the current domain and, in gateway mode, the
/// credentials bound to this session's requests.
///
/// One `SessionState` exists per connection/session and is passed into the
/// router on every call; nothing is process-global.
#[derive(Clone, Default)]
pub struct SessionState {
    inner: Arc<SessionInner>,
}

#[derive(Default)]
struct SessionInner {
    current_domain: RwLock<Option<Domain>>,
    credentials: RwLock<Option<Credentials>>,
}

impl SessionState {
    /// A fresh session at the root of the decision tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The domain this session has navigated into, if any.
    pub fn current_domain(&self) -> Option<Domain> {
        *self
            .inner
            .current_domain
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Enter a domain. Switching directly between domains is permitted.
    pub fn enter(&self, domain: Domain) {
        *self
            .inner
            .current_domain
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(domain);
    }

    /// Return to the root. A no-op when already there.
    pub fn leave(&self) {
        *self
            .inner
            .current_domain
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Credentials bound to this session, if any (gateway mode).
    pub fn credentials(&self) -> Option<Credentials> {
        self.inner
            .credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Bind credentials to this session for subsequent tool calls.
    pub fn set_credentials(&self, credentials: Credentials) {
        *self
            .inner
            .credentials
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(credentials);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_starts_at_root() {
        let session = SessionState::new();
        assert_eq!(session.current_domain(), None);
    }

    #[test]
    fn test_navigate_then_back_round_trip_for_every_domain() {
        let session = SessionState::new();
        for domain in Domain::ALL {
            session.enter(domain);
            assert_eq!(session.current_domain(), Some(domain));
            session.leave();
            assert_eq!(session.current_domain(), None);
        }
    }

    #[test]
    fn test_direct_domain_switch_needs_no_back() {
        let session = SessionState::new();
        session.enter(Domain::Environments);
        session.enter(Domain::Inspections);
        assert_eq!(session.current_domain(), Some(Domain::Inspections));
    }

    #[test]
    fn test_back_at_root_is_idempotent() {
        let session = SessionState::new();
        session.leave();
        session.leave();
        assert_eq!(session.current_domain(), None);
    }

    #[test]
    fn test_domain_lowercase_serde_round_trip() {
        for domain in Domain::ALL {
            let encoded = serde_json::to_value(domain).unwrap();
            assert_eq!(encoded, serde_json::json!(domain.as_str()));
            let decoded: Domain = serde_json::from_value(encoded).unwrap();
            assert_eq!(decoded, domain);
        }
    }

    #[test]
    fn test_unknown_domain_rejected() {
        let result: Result<Domain, _> = serde_json::from_value(serde_json::json!("nonsense"));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_tool_name_resolves_each_prefix() {
        assert_eq!(
            Domain::from_tool_name("liongard_environments_list"),
            Some(Domain::Environments)
        );
        assert_eq!(
            Domain::from_tool_name("liongard_inventory_devices"),
            Some(Domain::Inventory)
        );
        assert_eq!(Domain::from_tool_name("liongard_navigate"), None);
        assert_eq!(Domain::from_tool_name("totally_unknown_tool"), None);
    }

    #[test]
    fn test_tool_prefixes_are_distinct() {
        for (i, a) in Domain::ALL.iter().enumerate() {
            for b in &Domain::ALL[i + 1..] {
                assert!(!a.tool_prefix().starts_with(b.tool_prefix()));
                assert!(!b.tool_prefix().starts_with(a.tool_prefix()));
            }
        }
    }

    #[test]
    fn test_menu_lists_all_nine_domains() {
        let menu = Domain::menu();
        assert_eq!(menu.split(", ").count(), 9);
        assert!(menu.starts_with("environments"));
        assert!(menu.ends_with("inventory"));
    }

    #[test]
    fn test_navigate_tool_schema_requires_domain() {
        let descriptor = navigate_tool();
        let schema = descriptor.input_schema.as_ref();
        let required = schema
            .get("required")
            .and_then(serde_json::Value::as_array)
            .cloned()
            .unwrap_or_default();
        assert!(required.contains(&serde_json::json!("domain")));
    }
}
