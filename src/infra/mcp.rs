//! MCP service wiring for calc-mcp-gateway.
//!
//! - `Transcriber` is the seam between the `transcribeAudio` tool and Gemini
//! - `factory_with_transcriber` yields the `(handler, ToolRouter)` pairs both
//!   rmcp transports ask for, one per session
//! - without `GEMINI_API_KEY` the service still starts and `transcribeAudio`
//!   answers with an actionable error text

use std::{future::Future, pin::Pin, sync::Arc};

use crate::clients::gemini::GeminiClient;
use crate::core::error::GatewayError;
use crate::infra::config::TranscriptionConfig;
use crate::tools::mcp_router::{CalculatorRouter, CalculatorSvc};

#[async_trait::async_trait]
pub trait Transcriber: Send + Sync + 'static {
    async fn transcribe(&self, base64_audio: &str, mime_type: &str) -> Result<String, GatewayError>;
}

type TranscribeFuture = Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send>>;

/// Adapts an async closure `(base64_audio, mime_type)` into a `Transcriber`.
pub struct FnTranscriber {
    inner: Arc<dyn Fn(String, String) -> TranscribeFuture + Send + Sync>,
}

impl FnTranscriber {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(String, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, GatewayError>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |data, mime| Box::pin(f(data, mime))),
        }
    }
}

#[async_trait::async_trait]
impl Transcriber for FnTranscriber {
    async fn transcribe(&self, base64_audio: &str, mime_type: &str) -> Result<String, GatewayError> {
        (self.inner)(base64_audio.to_owned(), mime_type.to_owned()).await
    }
}

pub const MISSING_API_KEY: &str = "GEMINI_API_KEY not configured; set it to enable transcribeAudio";

/// Gemini when a credential is configured, otherwise a backend that always
/// reports the missing credential.
pub fn transcriber_from_config(
    cfg: &TranscriptionConfig,
) -> Result<Arc<dyn Transcriber>, GatewayError> {
    match cfg.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => {
            let client = GeminiClient::from_config(cfg)?;
            tracing::info!(model = %client.model(), "transcription backend: gemini");
            Ok(Arc::new(client))
        }
        _ => {
            tracing::warn!("GEMINI_API_KEY not set; transcribeAudio will return an error text");
            let missing = FnTranscriber::new(|_data: String, _mime: String| async move {
                Err::<String, _>(GatewayError::Message(MISSING_API_KEY.into()))
            });
            Ok(Arc::new(missing))
        }
    }
}

/// Factory required by rmcp stdio, SSE and Streamable HTTP transports.
pub fn factory_with_transcriber(
    transcriber: Arc<dyn Transcriber>,
) -> impl Fn() -> (CalculatorSvc, CalculatorRouter) + Clone + Send + Sync + 'static {
    move || {
        let handler = CalculatorSvc::new(transcriber.clone());
        let tools = CalculatorSvc::router();
        (handler, tools)
    }
}
