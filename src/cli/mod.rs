use base64::Engine;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::infra::config::Config;

#[derive(Parser)]
#[command(name = "calc-mcp-gateway")]
#[command(about = "Authless Calculator MCP gateway - server and admin CLI")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the MCP server (default when no command is given)
    Serve,
    /// Health check a running service by sending an MCP initialize to /mcp
    Health {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Validate configuration
    Config {
        /// Validate config without starting service
        #[arg(long)]
        validate: bool,
    },
    /// Transcribe a local audio file with the configured Gemini backend
    Transcribe {
        /// Audio file to send
        file: PathBuf,
        /// MIME type; guessed from the file extension when omitted
        #[arg(short, long)]
        mime_type: Option<String>,
    },
}

pub async fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Serve => match crate::infra::boot::run_server().await {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Server failed: {:#}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Health { url } => match health_check(&url).await {
            Ok(_) => {
                println!("✅ Service is healthy");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Config { validate: _ } => match validate_config() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Transcribe { file, mime_type } => match transcribe_file(&file, mime_type).await {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Transcription failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn health_check(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/mcp", url.trim_end_matches('/')))
        .header(reqwest::header::ACCEPT, "application/json, text/event-stream")
        .json(&serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": { "name": "calc-mcp-gateway-cli", "version": env!("CARGO_PKG_VERSION") }
            }
        }))
        .timeout(std::time::Duration::from_secs(2))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(format!("HTTP {}", response.status()).into())
    }
}

fn validate_config() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    cfg.validate()?;
    if cfg.transcription.api_key.is_none() {
        eprintln!("⚠️  GEMINI_API_KEY not set; transcribeAudio will return an error text");
    }
    Ok(())
}

async fn transcribe_file(
    file: &Path,
    mime_type: Option<String>,
) -> Result<String, Box<dyn std::error::Error>> {
    let mime_type = mime_type
        .or_else(|| guess_mime_type(file).map(str::to_owned))
        .ok_or("cannot infer MIME type from file extension; pass --mime-type")?;
    let bytes = tokio::fs::read(file).await?;

    let cfg = Config::load()?;
    let transcriber = crate::infra::mcp::transcriber_from_config(&cfg.transcription)?;
    let audio = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(transcriber.transcribe(&audio, &mime_type).await?)
}

/// Audio MIME types accepted by Gemini, keyed by file extension.
fn guess_mime_type(file: &Path) -> Option<&'static str> {
    let ext = file.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mp3",
        "aiff" | "aif" => "audio/aiff",
        "aac" => "audio/aac",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        _ => return None,
    };
    Some(mime)
}
