use std::future::Future;
use std::sync::Arc;

use rmcp::handler::server::tool::{Parameters, ToolRouter};
use rmcp::model::{CallToolResult, Implementation, ServerCapabilities, ServerInfo};

use crate::domain::{AddArgs, CalculateArgs, TranscribeArgs};
use crate::infra::mcp::Transcriber;
use crate::infra::runtime::mcp_transport::ServerHandler;
use crate::tools::{arithmetic, joke, transcribe};

pub const SERVER_NAME: &str = "Authless Calculator";
pub const SERVER_VERSION: &str = "1.0.0";

/// Names of every tool the router exposes. The set is fixed at build time.
pub const TOOL_NAMES: [&str; 4] = ["add", "calculate", "joke", "transcribeAudio"];

#[derive(Clone)]
pub struct CalculatorSvc {
    transcriber: Arc<dyn Transcriber>,
}

impl CalculatorSvc {
    pub fn new(transcriber: Arc<dyn Transcriber>) -> Self {
        Self { transcriber }
    }
}

impl ServerHandler for CalculatorSvc {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: SERVER_VERSION.into(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}

#[rmcp::tool_router]
impl CalculatorSvc {
    #[rmcp::tool(name = "add", description = "Add two numbers")]
    async fn add(
        &self,
        Parameters(args): Parameters<AddArgs>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        tracing::debug!(a = args.a, b = args.b, "add invoked");
        Ok(arithmetic::add(args.a, args.b).into())
    }

    #[rmcp::tool(
        name = "calculate",
        description = "Apply add, subtract, multiply or divide to two numbers"
    )]
    async fn calculate(
        &self,
        Parameters(args): Parameters<CalculateArgs>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        tracing::debug!(operation = ?args.operation, a = args.a, b = args.b, "calculate invoked");
        Ok(arithmetic::calculate(args.operation, args.a, args.b).into())
    }

    #[rmcp::tool(name = "joke", description = "Tell the chicken crossing the road joke")]
    async fn joke(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(joke::joke().into())
    }

    #[rmcp::tool(
        name = "transcribeAudio",
        description = "Transcribe base64-encoded audio with Gemini"
    )]
    async fn transcribe_audio(
        &self,
        Parameters(args): Parameters<TranscribeArgs>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(transcribe::transcribe_audio(self.transcriber.as_ref(), &args)
            .await
            .into())
    }
}

pub type CalculatorRouter = ToolRouter<CalculatorSvc>;

impl CalculatorSvc {
    pub fn router() -> CalculatorRouter {
        // Wrapper to expose the macro-generated private tool_router
        Self::tool_router()
    }
}
