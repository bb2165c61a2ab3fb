use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;

use crate::core::error::GatewayError;
use crate::infra::config::TranscriptionConfig;
use crate::infra::http::headers::add_standard_headers;
use crate::infra::mcp::Transcriber;
use crate::infra::runtime::limits::make_http_client_with;

/// Finish reasons the Gemini SDKs treat as a failed generation.
const BAD_FINISH_REASONS: [&str; 3] = ["RECITATION", "SAFETY", "LANGUAGE"];

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream status {status}: {message}")]
    Upstream { status: StatusCode, message: String },
    #[error("response blocked: {0}")]
    Blocked(String),
    #[error("candidate finished with {0}")]
    BadFinish(String),
}

#[derive(Clone)]
pub struct GeminiClient {
    base: String,
    model: String,
    api_key: String,
    http: Client,
}

impl GeminiClient {
    #[cfg(test)]
    pub fn new(
        base: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, GeminiError> {
        Self::from_config(&TranscriptionConfig {
            api_key: Some(api_key.into()),
            base_url: base.into(),
            model: model.into(),
            timeout_ms: None,
        })
    }

    pub fn from_config(cfg: &TranscriptionConfig) -> Result<Self, GeminiError> {
        let http = make_http_client_with(cfg)?;
        Ok(Self {
            base: cfg.base_url.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone().unwrap_or_default(),
            http,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base.trim_end_matches('/'),
            self.model
        )
    }

    /// Single `generateContent` call with one inline-data part. Returns the
    /// joined text of the first candidate.
    pub async fn generate_from_inline_data(
        &self,
        mime_type: &str,
        data: &str,
    ) -> Result<String, GeminiError> {
        let url = self.endpoint();
        let payload = GenerateContentReq {
            contents: vec![ContentReq {
                role: "user",
                parts: vec![PartReq {
                    inline_data: InlineDataReq { mime_type, data },
                }],
            }],
        };

        let (builder, rid) = add_standard_headers(self.http.post(&url), None);
        tracing::debug!(endpoint = %url, request_id = %rid, mime_type, "gemini.generateContent request");
        let start = Instant::now();
        let res = self.send(builder, &payload).await;
        match &res {
            Ok(_) => {
                let elapsed_ms = start.elapsed().as_millis() as f64;
                crate::infra::logging::log_metric("transcribeAudio", "remote_latency_ms", elapsed_ms);
            }
            Err(e) => {
                tracing::debug!(request_id = %rid, error = %e, "gemini.generateContent failed");
                crate::infra::logging::log_metric("transcribeAudio", "remote_error_total", 1.0);
            }
        }
        res
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        payload: &GenerateContentReq<'_>,
    ) -> Result<String, GeminiError> {
        let resp = builder
            .header("x-goog-api-key", self.api_key.as_str())
            .json(payload)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GeminiError::Upstream { status, message });
        }
        resp.json::<GenerateContentResp>().await?.into_text()
    }
}

#[async_trait::async_trait]
impl Transcriber for GeminiClient {
    async fn transcribe(&self, base64_audio: &str, mime_type: &str) -> Result<String, GatewayError> {
        Ok(self.generate_from_inline_data(mime_type, base64_audio).await?)
    }
}

#[derive(Serialize)]
struct GenerateContentReq<'a> {
    contents: Vec<ContentReq<'a>>,
}

#[derive(Serialize)]
struct ContentReq<'a> {
    role: &'a str,
    parts: Vec<PartReq<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PartReq<'a> {
    inline_data: InlineDataReq<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataReq<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResp {
    #[serde(default)]
    candidates: Vec<CandidateWire>,
    prompt_feedback: Option<PromptFeedbackWire>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidateWire {
    content: Option<ContentWire>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ContentWire {
    #[serde(default)]
    parts: Vec<PartWire>,
}

#[derive(Deserialize)]
struct PartWire {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedbackWire {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateContentResp {
    fn into_text(self) -> Result<String, GeminiError> {
        let Some(first) = self.candidates.into_iter().next() else {
            // no candidates: any prompt feedback means the prompt was rejected
            return match self.prompt_feedback {
                Some(feedback) => Err(GeminiError::Blocked(
                    feedback
                        .block_reason
                        .unwrap_or_else(|| "no candidates returned".to_string()),
                )),
                None => Ok(String::new()),
            };
        };
        if let Some(reason) = first
            .finish_reason
            .filter(|r| BAD_FINISH_REASONS.contains(&r.as_str()))
        {
            return Err(GeminiError::BadFinish(reason));
        }
        Ok(first
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default())
    }
}
