//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Every registered tool becomes one dynamic route that forwards to the
//! [`Dispatcher`], so the MCP transport shares validation, session handling
//! and error mapping with the HTTP envelope. Each tool's schema gains an
//! optional `threadId` argument selecting the session.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, Content, JsonObject, Tool},
};
use serde_json::{Value, json};
use std::sync::Arc;

use super::dispatcher::{Dispatcher, ToolCallRequest, ToolCallResponse};
use super::registry::ToolRegistry;
use crate::domains::session::ThreadId;

/// Argument naming the session on MCP tool calls.
pub const THREAD_ID_ARG: &str = "threadId";

/// Build the tool router with all registered tools.
///
/// Calls that omit `threadId` share `default_thread`.
pub fn build_tool_router<S>(dispatcher: Arc<Dispatcher>, default_thread: ThreadId) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRegistry::get_all_tools()
        .into_iter()
        .fold(ToolRouter::new(), |router, tool| {
            router.with_route(create_route(tool, dispatcher.clone(), default_thread.clone()))
        })
}

fn create_route<S>(tool: Tool, dispatcher: Arc<Dispatcher>, default_thread: ThreadId) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    let name = tool.name.to_string();
    ToolRoute::new_dyn(with_thread_argument(tool), move |ctx: ToolCallContext<'_, S>| {
        let mut args = ctx.arguments.clone().unwrap_or_default();
        let dispatcher = dispatcher.clone();
        let name = name.clone();
        let default_thread = default_thread.clone();
        async move {
            let thread_id = match args.remove(THREAD_ID_ARG) {
                Some(Value::String(raw)) => Some(raw),
                Some(Value::Null) | None => Some(default_thread.to_string()),
                Some(other) => {
                    return Err(McpError::invalid_params(
                        format!("'{}' must be a string, got {}", THREAD_ID_ARG, other),
                        None,
                    ));
                }
            };

            let response = dispatcher
                .dispatch(ToolCallRequest {
                    tool: name,
                    input: Value::Object(args),
                    thread_id,
                })
                .await;
            Ok(to_call_result(response))
        }
        .boxed()
    })
}

/// Declare the optional `threadId` argument on a tool's input schema.
fn with_thread_argument(mut tool: Tool) -> Tool {
    let mut schema: JsonObject = (*tool.input_schema).clone();
    let properties = schema
        .entry("properties")
        .or_insert_with(|| Value::Object(JsonObject::new()));
    if let Value::Object(properties) = properties {
        properties.insert(
            THREAD_ID_ARG.to_string(),
            json!({
                "type": "string",
                "description": "Conversation identifier selecting the session; defaults to this connection's session"
            }),
        );
    }
    tool.input_schema = Arc::new(schema);
    tool
}

fn to_call_result(response: ToolCallResponse) -> CallToolResult {
    let is_error = response.is_error();
    let structured = match (response.result, response.error) {
        (Some(result), _) => result,
        (None, Some(error)) => json!({ "error": error }),
        (None, None) => Value::Null,
    };
    let mut structured = match structured {
        Value::Object(map) => map,
        other => {
            let mut map = JsonObject::new();
            map.insert("value".to_string(), other);
            map
        }
    };
    if let Some(thread_id) = response.thread_id {
        structured.insert(THREAD_ID_ARG.to_string(), Value::String(thread_id));
    }
    let structured = Value::Object(structured);

    CallToolResult {
        content: vec![Content::text(structured.to_string())],
        structured_content: Some(structured),
        is_error: Some(is_error),
        meta: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::backends::QueryResult;
    use crate::domains::backends::stub::StubBackends;
    use crate::domains::session::SessionStore;
    use crate::domains::tools::dispatcher::ErrorBody;
    use std::time::Duration;

    struct TestServer {}

    fn dispatcher() -> Arc<Dispatcher> {
        let stubs = StubBackends::answering("Q", QueryResult::default());
        Arc::new(Dispatcher::new(
            ToolRegistry::new(),
            Arc::new(SessionStore::new(Duration::from_secs(60))),
            stubs.backends(),
        ))
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> =
            build_tool_router(dispatcher(), ThreadId::generate());
        let tools = router.list_all();
        assert_eq!(tools.len(), 6);

        for tool in &tools {
            let properties = tool.input_schema.get("properties").unwrap();
            assert!(properties.get(THREAD_ID_ARG).is_some(), "{}", tool.name);
        }
    }

    #[test]
    fn test_registry_matches_router() {
        let registry = ToolRegistry::new();
        let router: ToolRouter<TestServer> =
            build_tool_router(dispatcher(), ThreadId::generate());
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry.tool_names().len(), router_names.len());
        for name in registry.tool_names() {
            assert!(router_names.contains(&name));
        }
    }

    #[test]
    fn test_error_response_is_flagged() {
        let response = ToolCallResponse {
            result: None,
            error: Some(ErrorBody {
                kind: "UnknownToolError".into(),
                message: "Unknown tool: x".into(),
                service: None,
                backend_kind: None,
                field: None,
            }),
            thread_id: Some("t".into()),
        };
        let result = to_call_result(response);
        assert_eq!(result.is_error, Some(true));
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["error"]["kind"], json!("UnknownToolError"));
        assert_eq!(structured["threadId"], json!("t"));
    }

    #[test]
    fn test_success_response_carries_result() {
        let result = to_call_result(ToolCallResponse::success(json!({ "count": 2 }), None));
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.structured_content.unwrap(), json!({ "count": 2 }));
    }
}
