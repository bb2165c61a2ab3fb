pub mod arithmetic;
pub mod joke;
pub mod mcp_router;
pub mod transcribe;
