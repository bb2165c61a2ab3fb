use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::any_service,
    Router,
};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use crate::infra::runtime::mcp_transport::{self, LocalSessionManager, STREAMABLE_PATH};
use crate::tools::mcp_router::{CalculatorRouter, CalculatorSvc};

/// Which MCP transport handles a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Legacy SSE: `GET /sse` stream plus `POST /sse/message`.
    EventStream,
    /// Streamable HTTP request/response at `/mcp`.
    Streamable,
}

impl Transport {
    pub fn for_path(path: &str) -> Option<Self> {
        match path {
            "/sse" | "/sse/message" => Some(Transport::EventStream),
            "/mcp" => Some(Transport::Streamable),
            _ => None,
        }
    }
}

/// Path-based dispatcher over the two transport adapters. Anything else is
/// answered with `404 Not found`.
#[derive(Clone)]
pub struct TransportRouter {
    event_stream: Router,
    streamable: Router,
}

impl TransportRouter {
    pub fn new(event_stream: Router, streamable: Router) -> Self {
        Self {
            event_stream,
            streamable,
        }
    }

    pub fn into_app(self) -> Router {
        Router::new().fallback(dispatch).with_state(self)
    }
}

async fn dispatch(State(adapters): State<TransportRouter>, req: Request) -> Response {
    let Some(transport) = Transport::for_path(req.uri().path()) else {
        tracing::debug!(method = %req.method(), path = %req.uri().path(), "no transport for path");
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };
    tracing::trace!(?transport, method = %req.method(), "dispatching to transport");
    let adapter = match transport {
        Transport::EventStream => adapters.event_stream,
        Transport::Streamable => adapters.streamable,
    };
    match adapter.oneshot(req).await {
        Ok(resp) => resp,
        Err(never) => match never {},
    }
}

/// Full app: SSE transport at `/sse` + streamable MCP at `/mcp`, 404 elsewhere.
pub fn build_app(
    factory: impl Fn() -> (CalculatorSvc, CalculatorRouter) + Clone + Send + Sync + 'static,
    bind: SocketAddr,
    ct: CancellationToken,
) -> Router {
    let session_mgr = Arc::new(LocalSessionManager::default());
    let mcp_service = mcp_transport::make_streamable_http_service(factory.clone(), session_mgr);
    let streamable = Router::new().route_service(STREAMABLE_PATH, any_service(mcp_service));
    let event_stream = mcp_transport::make_sse_router(factory, bind, ct);
    tracing::info!(%bind, "transport router built");

    TransportRouter::new(event_stream, streamable).into_app()
}
