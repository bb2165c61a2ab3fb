//! Argument shapes of the exposed tools. The derived JSON Schema is what
//! clients see in `tools/list`; deserialization enforces it on `tools/call`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddArgs {
    pub a: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CalculateArgs {
    /// One of `add`, `subtract`, `multiply`, `divide`.
    pub operation: Operation,
    pub a: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeArgs {
    /// Audio bytes, base64 encoded.
    pub base64_audio: String,
    /// MIME type of the audio, e.g. `audio/wav`.
    pub mime_type: String,
}
