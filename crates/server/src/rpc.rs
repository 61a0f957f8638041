//! JSON-RPC 2.0 over stdio. One request per line on stdin, one response
//! per line on stdout; logs go to stderr so the stream stays clean.

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::tools::{contracts, ToolError, ToolHandler};

const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

pub async fn serve(handler: ToolHandler) -> eyre::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    info!("listening on stdio");
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(response) = handle_message(&handler, &line) {
            let mut payload = serde_json::to_vec(&response)?;
            payload.push(b'\n');
            stdout.write_all(&payload).await?;
            stdout.flush().await?;
        }
    }
    info!("stdin closed, shutting down");
    Ok(())
}

/// Handles one raw JSON-RPC message. Returns `None` for notifications,
/// which must not be answered.
pub fn handle_message(handler: &ToolHandler, raw: &str) -> Option<Value> {
    let message: Value = match serde_json::from_str(raw) {
        Ok(message) => message,
        Err(e) => {
            error!(%e, "unparseable request");
            return Some(error_response(Value::Null, PARSE_ERROR, "parse error"));
        }
    };

    let id = message.get("id").cloned().filter(|id| !id.is_null());
    let method = message.get("method").and_then(Value::as_str).unwrap_or("");
    debug!(method, "request");

    let id = match id {
        Some(id) => id,
        // Notifications (initialized etc.) get no response.
        None => return None,
    };

    match method {
        "initialize" => Some(result_response(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": {}},
                "serverInfo": {
                    "name": "trackside-server",
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        )),
        "ping" => Some(result_response(id, json!({}))),
        "tools/list" => Some(result_response(
            id,
            json!({"tools": contracts::tool_definitions()}),
        )),
        "tools/call" => Some(handle_tool_call(handler, id, &message)),
        other => Some(error_response(
            id,
            METHOD_NOT_FOUND,
            &format!("method not found: {other}"),
        )),
    }
}

fn handle_tool_call(handler: &ToolHandler, id: Value, message: &Value) -> Value {
    let params = message.get("params").cloned().unwrap_or_else(|| json!({}));
    let name = params.get("name").and_then(Value::as_str).unwrap_or("");
    let empty = json!({});
    let args = params.get("arguments").unwrap_or(&empty);

    match handler.dispatch(name, args) {
        Ok(value) => result_response(
            id,
            json!({
                "content": [{"type": "text", "text": value.to_string()}],
            }),
        ),
        Err(ToolError::UnknownTool(name)) => {
            error_response(id, INVALID_PARAMS, &format!("unknown tool: {name}"))
        }
        // Tool-level failures are reported inside the result so agents
        // can read them as text, per the tools/call contract.
        Err(e) => result_response(
            id,
            json!({
                "content": [{"type": "text", "text": e.to_string()}],
                "isError": true,
            }),
        ),
    }
}

fn result_response(id: Value, result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "result": result})
}

fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {"code": code, "message": message},
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Arc;
    use trackside::cache::SystemClock;
    use trackside::models::{Category, InfraRecord, RecordGeometry};
    use trackside::provider::static_provider::StaticDatasetProvider;
    use trackside::query::{QueryEngine, DEFAULT_CACHE_TTL_HOURS};

    use crate::config::CoordinateRange;

    fn handler() -> ToolHandler {
        let provider = StaticDatasetProvider::from_records(vec![InfraRecord::new(
            Category::Track,
            "182",
        )
        .with_geometry(RecordGeometry::line(vec![[18.07, 59.33], [17.85, 59.50]]))]);
        let engine = QueryEngine::new(
            Arc::new(provider),
            Arc::new(SystemClock),
            Duration::hours(DEFAULT_CACHE_TTL_HOURS),
        );
        ToolHandler::new(engine, CoordinateRange::SWEDEN)
    }

    #[test]
    fn test_initialize_handshake() {
        let response = handle_message(
            &handler(),
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        )
        .unwrap();

        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(response["result"]["serverInfo"]["name"], "trackside-server");
    }

    #[test]
    fn test_tools_list_exposes_every_tool() {
        let response = handle_message(
            &handler(),
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        )
        .unwrap();

        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), Category::ALL.len() + 3);
    }

    #[test]
    fn test_tool_call_success() {
        let response = handle_message(
            &handler(),
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"get_track_context","arguments":{"trackId":"182"}}}"#,
        )
        .unwrap();

        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        let body: Value = serde_json::from_str(text).unwrap();
        assert!(body["track"]["geometry"].is_object());
        assert!(response["result"].get("isError").is_none());
    }

    #[test]
    fn test_tool_call_failure_is_in_band() {
        let response = handle_message(
            &handler(),
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"find_stations_in_area","arguments":{"bbox":"garbage"}}}"#,
        )
        .unwrap();

        assert_eq!(response["result"]["isError"], true);
        assert!(response.get("error").is_none());
    }

    #[test]
    fn test_unknown_tool_is_protocol_error() {
        let response = handle_message(
            &handler(),
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"nope","arguments":{}}}"#,
        )
        .unwrap();
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_unknown_method() {
        let response = handle_message(
            &handler(),
            r#"{"jsonrpc":"2.0","id":6,"method":"resources/list"}"#,
        )
        .unwrap();
        assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);
    }

    #[test]
    fn test_notifications_are_silent() {
        let handler = handler();
        assert!(handle_message(
            &handler,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#
        )
        .is_none());
    }

    #[test]
    fn test_parse_error() {
        let response = handle_message(&handler(), "{not json").unwrap();
        assert_eq!(response["error"]["code"], PARSE_ERROR);
        assert_eq!(response["id"], Value::Null);
    }
}
