//! Generic MCP transport helpers (stdio, SSE, streamable HTTP) decoupled from tool logic.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rmcp::handler::server::router::Router;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::serve_server;
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use rmcp::transport::streamable_http_server::tower::{StreamableHttpServerConfig, StreamableHttpService};
use tokio_util::sync::CancellationToken;

pub use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
pub use rmcp::ServerHandler;

/// Base path of the event-stream transport: `GET` opens the stream.
pub const SSE_PATH: &str = "/sse";
/// Where SSE clients `POST` their messages (`?sessionId=...`).
pub const SSE_MESSAGE_PATH: &str = "/sse/message";
/// Base path of the request/response (streamable HTTP) transport.
pub const STREAMABLE_PATH: &str = "/mcp";

const SSE_KEEP_ALIVE: Duration = Duration::from_secs(15);

pub async fn serve_stdio<H>(
    factory: impl FnOnce() -> (H, ToolRouter<H>),
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    H: ServerHandler,
{
    let (handler, tools) = factory();
    let service = Router::new(handler).with_tools(tools);
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let running = serve_server(service, (stdin, stdout)).await?;
    running.waiting().await?;
    Ok(())
}

pub fn make_streamable_http_service<H>(
    factory: impl Fn() -> (H, ToolRouter<H>) + Send + Sync + Clone + 'static,
    session_mgr: Arc<LocalSessionManager>,
) -> StreamableHttpService<Router<H>, LocalSessionManager>
where
    H: ServerHandler,
{
    let cfg = StreamableHttpServerConfig::default();
    tracing::debug!(stateful_mode = %cfg.stateful_mode, keep_alive = ?cfg.sse_keep_alive, "StreamableHttpServerConfig");
    let service_factory = move || {
        let (handler, tools) = factory();
        let service = Router::new(handler).with_tools(tools);
        Ok(service)
    };
    StreamableHttpService::new(service_factory, session_mgr, cfg)
}

/// Build the SSE transport as an axum router serving `GET /sse` and
/// `POST /sse/message`. Each new SSE connection gets a fresh service from
/// `factory`. Must be called inside a tokio runtime; cancelling `ct` stops
/// all SSE sessions.
pub fn make_sse_router<H>(
    factory: impl Fn() -> (H, ToolRouter<H>) + Send + 'static,
    bind: SocketAddr,
    ct: CancellationToken,
) -> axum::Router
where
    H: ServerHandler,
{
    let config = SseServerConfig {
        bind,
        sse_path: SSE_PATH.to_string(),
        post_path: SSE_MESSAGE_PATH.to_string(),
        ct,
        sse_keep_alive: Some(SSE_KEEP_ALIVE),
    };
    let (sse_server, router) = SseServer::new(config);
    let _service_ct = sse_server.with_service(move || {
        let (handler, tools) = factory();
        Router::new(handler).with_tools(tools)
    });
    tracing::info!(sse_path = SSE_PATH, post_path = SSE_MESSAGE_PATH, "SSE transport ready");
    router
}
