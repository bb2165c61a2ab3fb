use tokio_util::sync::CancellationToken;

use crate::infra::config::Config;
use crate::infra::{http_app, mcp};
use crate::infra::runtime::mcp_transport;

pub async fn run_server() -> anyhow::Result<()> {
    let cfg = Config::load()?;
    cfg.validate()?;
    tracing::info!(
        mode = %cfg.mode,
        port = cfg.port,
        model = %cfg.transcription.model,
        transcription_configured = cfg.transcription.api_key.is_some(),
        "BOOT calc-mcp-gateway"
    );

    let transcriber = mcp::transcriber_from_config(&cfg.transcription)?;
    let factory = mcp::factory_with_transcriber(transcriber);

    // Stdio mode: run MCP over stdio ONLY (no HTTP).
    if cfg.is_stdio() {
        mcp_transport::serve_stdio(factory)
            .await
            .map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }

    let addr = cfg.bind_addr();
    let ct = CancellationToken::new();
    let app = http_app::build_app(factory, addr, ct.clone());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested");
            ct.cancel();
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn invalid_mode_fails_before_binding() {
        std::env::set_var("MODE", "bogus");
        let err = run_server().await.unwrap_err();
        assert!(err.to_string().contains("Invalid MODE"));
        std::env::remove_var("MODE");
    }
}
