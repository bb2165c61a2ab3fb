use crate::core::content::ToolOutput;
use crate::domain::TranscribeArgs;
use crate::infra::mcp::Transcriber;

pub const ERROR_PREFIX: &str = "Error transcribing audio: ";

/// One attempt against the backend. Any failure becomes output text
/// prefixed with [`ERROR_PREFIX`].
pub async fn transcribe_audio(backend: &dyn Transcriber, args: &TranscribeArgs) -> ToolOutput {
    tracing::debug!(
        mime_type = %args.mime_type,
        audio_len = args.base64_audio.len(),
        "transcribeAudio invoked"
    );
    match backend.transcribe(&args.base64_audio, &args.mime_type).await {
        Ok(text) => ToolOutput::text(text),
        Err(e) => {
            tracing::warn!(error = %e, mime_type = %args.mime_type, "transcribeAudio failed");
            ToolOutput::text(format!("{ERROR_PREFIX}{e}"))
        }
    }
}
