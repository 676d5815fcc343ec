//! Tool server for svgconv.
//!
//! This crate exposes SVG conversion as two tools, `svg-to-png` and
//! `svg-to-jpg`, over newline-delimited JSON-RPC 2.0 on stdin/stdout:
//!
//! - [`Dispatcher`] validates a tool call, authorizes the output path and runs
//!   the conversion
//! - [`Server`] reads requests, handles each one on its own task and writes
//!   responses through a single writer
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use svgconv_server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         allowed_dirs: vec![PathBuf::from("/srv/renders")],
//!         ..ServerConfig::default()
//!     };
//!
//!     let server = Server::new(config).unwrap();
//!     server.run_stdio().await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! stdin ──lines──► reader loop ──spawn──► request task ──spawn_blocking──► Dispatcher
//!                                              │                              │
//!                                              │                              ├─► PathAuthorizer
//!                                              │                              └─► RasterService
//!                                              ▼
//!                                        mpsc channel ──► writer task ──► stdout
//! ```

mod dispatcher;
mod error;
mod protocol;
mod tools;

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Value, json};
use svgconv_raster::{RasterService, ResvgRasterizer};
use svgconv_sandbox::{AllowedRoots, PathAuthorizer};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

pub use dispatcher::Dispatcher;
pub use error::{ServerError, ToolError};
pub use protocol::{Content, ToolResult};
pub use tools::{ConversionRequest, ToolDefinition, ToolKind};

use protocol::{CallParams, DEFAULT_PROTOCOL_VERSION, Request, Response, RpcError, codes};

/// Name the server reports in `initialize`.
pub const SERVER_NAME: &str = "svg-converter";

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Directories output may be written to. Must be non-empty.
    pub allowed_dirs: Vec<PathBuf>,
    /// Base directory for the path rebasing heuristic.
    pub rebase_base: PathBuf,
    /// Load system fonts for `<text>` rendering.
    pub system_fonts: bool,
    /// Version reported to clients.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_dirs: Vec::new(),
            rebase_base: PathBuf::from(svgconv_config::DEFAULT_REBASE_BASE),
            system_fonts: true,
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

/// Create server configuration from svgconv config.
#[must_use]
pub fn server_config_from_config(config: &svgconv_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        allowed_dirs: config.sandbox_resolved.allowed_dirs.clone(),
        rebase_base: config.sandbox_resolved.rebase_base.clone(),
        system_fonts: config.render.system_fonts,
        version,
    }
}

/// A configured server, ready to serve.
#[derive(Debug, Clone)]
pub struct Server {
    dispatcher: Arc<Dispatcher>,
    version: String,
}

impl Server {
    /// Validate the allowed directories and build the conversion pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Roots`] if no directories are given or any of
    /// them is missing or not a directory.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let roots = Arc::new(AllowedRoots::new(config.allowed_dirs)?);
        let authorizer = PathAuthorizer::new(roots).rebase_base(config.rebase_base);

        let rasterizer = if config.system_fonts {
            ResvgRasterizer::new()
        } else {
            ResvgRasterizer::without_system_fonts()
        };
        let service = RasterService::new(Arc::new(rasterizer));

        Ok(Self::with_dispatcher(
            Dispatcher::new(authorizer, service),
            config.version,
        ))
    }

    /// Wrap an existing dispatcher.
    #[must_use]
    pub fn with_dispatcher(dispatcher: Dispatcher, version: String) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            version,
        }
    }

    /// The dispatcher handling tool calls.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Serve on the process's stdin and stdout until stdin closes.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if stdin cannot be read or stdout written.
    pub async fn run_stdio(&self) -> Result<(), ServerError> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        self.serve(stdin, tokio::io::stdout()).await?;
        Ok(())
    }

    /// Serve requests read from `reader`, writing responses to `writer`.
    ///
    /// Returns the writer once input is exhausted and every in-flight request
    /// has been answered.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading or writing fails.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> std::io::Result<W>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        let writer_task = tokio::spawn(write_responses(rx, writer));

        tracing::info!(version = %self.version, "Server listening on stdio");

        let mut requests = JoinSet::new();
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let handler = self.clone();
            let tx = tx.clone();
            requests.spawn(async move {
                if let Some(response) = handler.handle_line(&line).await {
                    send_response(&tx, &response);
                }
            });
            reap_finished(&mut requests);
        }

        tracing::info!("Input closed, finishing in-flight requests");
        while let Some(joined) = requests.join_next().await {
            report_join(joined);
        }
        drop(tx);

        writer_task.await.map_err(std::io::Error::other)?
    }

    /// Handle one raw input line. Returns `None` for notifications.
    async fn handle_line(&self, line: &str) -> Option<Response> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable request");
                return Some(Response::failure(
                    Value::Null,
                    RpcError::new(codes::PARSE_ERROR, format!("Parse error: {e}")),
                ));
            }
        };

        let request: Request = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(Response::failure(
                    Value::Null,
                    RpcError::new(codes::INVALID_REQUEST, format!("Invalid request: {e}")),
                ));
            }
        };

        let Some(id) = request.id else {
            tracing::debug!(method = %request.method, "Notification received");
            return None;
        };

        tracing::debug!(method = %request.method, "Request received");
        let response = match self.dispatch(&request.method, request.params).await {
            Ok(result) => Response::success(id, result),
            Err(error) => Response::failure(id, error),
        };
        Some(response)
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(self.initialize_result(&params)),
            "ping" => Ok(json!({})),
            "tools/list" => {
                let tools: Vec<ToolDefinition> =
                    ToolKind::ALL.into_iter().map(ToolKind::definition).collect();
                Ok(json!({ "tools": tools }))
            }
            "tools/call" => self.call_tool(params).await,
            other => Err(RpcError::new(
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        }
    }

    fn initialize_result(&self, params: &Value) -> Value {
        let protocol_version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);
        json!({
            "protocolVersion": protocol_version,
            "capabilities": { "tools": {} },
            "serverInfo": { "name": SERVER_NAME, "version": self.version },
        })
    }

    async fn call_tool(&self, params: Value) -> Result<Value, RpcError> {
        let params: CallParams = serde_json::from_value(params)
            .map_err(|e| RpcError::new(codes::INVALID_PARAMS, format!("Invalid params: {e}")))?;
        let kind = ToolKind::from_name(&params.name).ok_or_else(|| {
            RpcError::new(
                codes::INVALID_PARAMS,
                format!("Unknown tool: {}", params.name),
            )
        })?;
        let arguments = params.arguments.unwrap_or_else(|| json!({}));

        let dispatcher = Arc::clone(&self.dispatcher);
        let result = tokio::task::spawn_blocking(move || dispatcher.call(kind, arguments))
            .await
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Conversion task failed");
                ToolResult::error(format!("Error converting SVG to {}: {e}", kind.label()))
            });

        serde_json::to_value(result)
            .map_err(|e| RpcError::new(codes::INTERNAL_ERROR, e.to_string()))
    }
}

/// Queue a response for the writer task. Returns `false` if it was dropped.
fn send_response(tx: &mpsc::UnboundedSender<String>, response: &Response) -> bool {
    let json = match serde_json::to_string(response) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response");
            return false;
        }
    };
    if tx.send(json).is_err() {
        tracing::debug!("Writer task has stopped, response dropped");
        return false;
    }
    true
}

/// Join request tasks that have already completed. Returns how many were released.
fn reap_finished(requests: &mut JoinSet<()>) -> usize {
    let mut reaped = 0;
    while let Some(joined) = requests.try_join_next() {
        report_join(joined);
        reaped += 1;
    }
    reaped
}

fn report_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        tracing::error!(error = %e, "Request task failed");
    }
}

/// Drain serialized responses to `writer`, one per line.
async fn write_responses<W>(mut rx: mpsc::UnboundedReceiver<String>, mut writer: W) -> std::io::Result<W>
where
    W: AsyncWrite + Unpin,
{
    while let Some(json) = rx.recv().await {
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(writer)
}
