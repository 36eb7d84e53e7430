//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler. It owns the session store,
//! the backend clients and the dispatcher, and exposes them to both
//! transports: the HTTP transport calls [`McpServer::dispatch`] with protocol
//! envelopes, the STDIO transport goes through the rmcp [`ToolRouter`] built
//! from the same dispatcher.
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! **Adding a new tool does NOT require modifying this file!**

use chrono::Utc;
use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use super::config::Config;
use crate::domains::backends::Backends;
use crate::domains::prompts::SYSTEM_PROMPT;
use crate::domains::session::{SessionStore, ThreadId};
use crate::domains::tools::{
    Dispatcher, ToolCallRequest, ToolCallResponse, ToolRegistry, build_tool_router,
};

/// The main MCP server handler.
///
/// Cloning is cheap; clones share sessions and backends.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Dispatcher shared by every transport.
    dispatcher: Arc<Dispatcher>,

    /// Tool router for handling MCP tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server talking to the configured backends.
    pub fn new(config: Config) -> super::Result<Self> {
        let backends = Backends::from_config(&config.backends)?;
        Ok(Self::with_backends(config, backends))
    }

    /// Create a server around already constructed backend clients.
    pub fn with_backends(config: Config, backends: Backends) -> Self {
        let config = Arc::new(config);
        let sessions = Arc::new(SessionStore::new(config.session.idle_timeout()));
        let dispatcher = Arc::new(Dispatcher::new(ToolRegistry::new(), sessions, backends));

        // MCP clients rarely send a thread id; they share this process's session.
        let default_thread = ThreadId::generate();
        debug!(thread_id = %default_thread, "Default MCP thread identifier");

        Self {
            tool_router: build_tool_router::<Self>(dispatcher.clone(), default_thread),
            config,
            dispatcher,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Answer one protocol envelope (HTTP transport).
    pub async fn dispatch(&self, request: ToolCallRequest) -> ToolCallResponse {
        self.dispatcher.dispatch(request).await
    }

    /// List all available tools with their input declarations.
    pub fn list_tools(&self) -> Vec<Value> {
        let registry = self.dispatcher.registry();
        ToolRegistry::get_all_tools()
            .into_iter()
            .map(|tool| {
                let fields = registry
                    .spec(tool.name.as_ref())
                    .map(|spec| spec.fields)
                    .unwrap_or_default();
                let required: Vec<_> = fields
                    .iter()
                    .filter(|field| field.required)
                    .map(|field| field.name)
                    .collect();
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "inputSchema": tool.input_schema,
                    "requiredFields": required,
                })
            })
            .collect()
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.dispatcher.sessions().len().await
    }

    /// Periodically purge idle sessions for as long as the runtime lives.
    pub fn spawn_session_sweeper(&self) -> JoinHandle<()> {
        let sessions = self.dispatcher.sessions().clone();
        let period = self.config.session.sweep_interval();

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            info!("Session sweeper started ({:?} interval)", period);

            loop {
                ticker.tick().await;
                let purged = sessions.purge_idle(Utc::now()).await;
                debug!("Sweep finished, {} session(s) purged", purged);
            }
        })
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SYSTEM_PROMPT.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::backends::QueryResult;
    use crate::domains::backends::stub::StubBackends;
    use std::time::Duration;

    fn server(stubs: &StubBackends) -> McpServer {
        McpServer::with_backends(Config::default(), stubs.backends())
    }

    #[test]
    fn test_server_creation_from_config() {
        let server = McpServer::new(Config::default()).unwrap();
        assert_eq!(server.name(), "sparql-mcp-server");
        assert!(!server.version().is_empty());
    }

    #[tokio::test]
    async fn test_list_tools_reports_required_fields() {
        let stubs = StubBackends::answering("Q", QueryResult::default());
        let tools = server(&stubs).list_tools();
        assert_eq!(tools.len(), 6);

        let select = tools
            .iter()
            .find(|t| t["name"] == "select_locations")
            .unwrap();
        assert_eq!(select["requiredFields"], json!(["locationIds"]));
        assert!(select["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn test_dispatch_counts_sessions() {
        let stubs = StubBackends::answering("Q", QueryResult::default());
        let server = server(&stubs);
        assert_eq!(server.session_count().await, 0);

        let response = server
            .dispatch(ToolCallRequest {
                tool: "get_system_prompt".into(),
                input: json!({}),
                thread_id: Some("abc".into()),
            })
            .await;
        assert!(!response.is_error());
        assert_eq!(server.session_count().await, 1);
    }

    #[test]
    fn test_info_carries_system_prompt() {
        let stubs = StubBackends::answering("Q", QueryResult::default());
        let info = server(&stubs).get_info();
        assert_eq!(info.instructions.as_deref(), Some(SYSTEM_PROMPT));
        assert!(info.capabilities.tools.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_idle_sessions() {
        let stubs = StubBackends::answering("Q", QueryResult::default());
        let mut config = Config::default();
        config.session.idle_timeout_secs = 10;
        config.session.sweep_interval_secs = 1;
        let server = McpServer::with_backends(config, stubs.backends());

        let sessions = server.dispatcher().sessions();
        sessions.get(&ThreadId::parse("fresh").unwrap()).await;
        {
            let mut old = sessions.lock(&ThreadId::parse("old").unwrap()).await;
            old.last_used_at = Utc::now() - chrono::Duration::seconds(60);
        }

        let sweeper = server.spawn_session_sweeper();
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(server.session_count().await, 1);
        assert!(sessions.contains(&ThreadId::parse("fresh").unwrap()).await);
        sweeper.abort();
    }
}
