use std::io::BufRead;

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use super::protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION,
    METHOD_NOT_FOUND, PARSE_ERROR,
};
use super::tools;
use crate::application::todo_service::TodoService;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Tool-protocol front end over a shared [`TodoService`].
#[derive(Clone)]
pub struct McpServer<S: TodoService> {
    service: S,
}

impl<S: TodoService> McpServer<S> {
    pub fn new(service: S) -> Self { Self { service } }

    /// Serves newline-delimited JSON-RPC until the reader hits EOF.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            self.respond(&line, &mut writer).await?;
        }
        tracing::info!("input closed, tool server stopping");
        Ok(())
    }

    /// Serves stdin/stdout until stdin closes.
    ///
    /// Stdin is read on a detached OS thread. A read pending on tokio's
    /// blocking pool would hold up runtime shutdown after Ctrl-C.
    pub async fn serve_stdio(&self) -> Result<()> {
        tracing::info!(protocol = PROTOCOL_VERSION, "tool server listening on stdio");
        let (tx, mut rx) = mpsc::channel::<std::io::Result<String>>(16);
        std::thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                for line in std::io::stdin().lock().lines() {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
            })?;

        let mut stdout = tokio::io::stdout();
        while let Some(line) = rx.recv().await {
            self.respond(&line?, &mut stdout).await?;
        }
        tracing::info!("stdin closed, tool server stopping");
        Ok(())
    }

    async fn respond<W: AsyncWrite + Unpin>(&self, line: &str, writer: &mut W) -> Result<()> {
        if let Some(response) = self.handle_line(line).await {
            writer.write_all(response.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok(())
    }

    /// Handles one raw line. `None` for blank lines and notifications.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let response = match serde_json::from_str::<Value>(line) {
            Err(e) => Some(JsonRpcResponse::failure(Value::Null, JsonRpcError::new(PARSE_ERROR, e.to_string()))),
            Ok(value) => self.handle_value(value).await,
        }?;
        match serde_json::to_string(&response) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::error!(error = %e, "failed to encode response");
                let fallback = JsonRpcResponse::failure(response.id, JsonRpcError::new(INTERNAL_ERROR, e.to_string()));
                serde_json::to_string(&fallback).ok()
            }
        }
    }

    async fn handle_value(&self, value: Value) -> Option<JsonRpcResponse> {
        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => return Some(JsonRpcResponse::failure(id, JsonRpcError::new(INVALID_REQUEST, e.to_string()))),
        };
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(id, JsonRpcError::new(INVALID_REQUEST, "jsonrpc must be \"2.0\"")));
        }
        if request.is_notification() {
            tracing::debug!(method = %request.method, "notification");
            return None;
        }
        let outcome = self.dispatch(&request.method, request.params.unwrap_or(Value::Null)).await;
        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => {
                tracing::warn!(method = %request.method, code = error.code, message = %error.message, "request failed");
                JsonRpcResponse::failure(id, error)
            }
        })
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, JsonRpcError> {
        match method {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": { "listChanged": false } },
                "serverInfo": { "name": env!("CARGO_PKG_NAME"), "version": env!("CARGO_PKG_VERSION") }
            })),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(tools::definitions()),
            "tools/call" => {
                let call: CallParams = serde_json::from_value(params)
                    .map_err(|e| JsonRpcError::new(INVALID_PARAMS, e.to_string()))?;
                tracing::debug!(tool = %call.name, "tool call");
                let result = tools::call(&self.service, &call.name, call.arguments)
                    .await
                    .map_err(|e| JsonRpcError::new(INVALID_PARAMS, e.to_string()))?;
                serde_json::to_value(result).map_err(|e| JsonRpcError::new(INTERNAL_ERROR, e.to_string()))
            }
            other => Err(JsonRpcError::new(METHOD_NOT_FOUND, format!("Method not found: {other}"))),
        }
    }
}
