use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber. `RUST_LOG` selects the filter
/// (default `info`). Output goes to stderr without colour so stdio-mode
/// hosts that capture it see plain text; stdout stays reserved for JSON-RPC.
/// Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log a metric line and hand the value to the `metrics` facade. Without an
/// installed recorder the facade call is a no-op.
pub fn log_metric(tool: &str, metric: &str, value: f64) {
    tracing::info!(tool = tool, metric = metric, value = value, "metric");
    metrics::histogram!(
        "calc_mcp_gateway_tool_metric",
        "tool" => tool.to_owned(),
        "metric" => metric.to_owned()
    )
    .record(value);
}
