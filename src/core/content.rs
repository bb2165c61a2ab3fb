//! Tool output model: an ordered list of text content items.

use rmcp::model::{CallToolResult, Content};

/// Result of a tool invocation. Every item is a `{ "type": "text" }` content
/// block; failures are carried as text too, never as protocol errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput(Vec<String>);

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        ToolOutput(vec![text.into()])
    }

    #[cfg(test)]
    pub fn items(&self) -> &[String] {
        &self.0
    }

    /// Text of the first item, or `""` for an empty output.
    pub fn first_text(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }
}

impl From<ToolOutput> for CallToolResult {
    fn from(out: ToolOutput) -> Self {
        CallToolResult::success(out.0.into_iter().map(Content::text).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_text_item() {
        let out = ToolOutput::text("5");
        assert_eq!(out.items(), ["5".to_string()]);
        assert_eq!(out.first_text(), "5");
    }

    #[test]
    fn converts_to_text_content_success_result() {
        let res: CallToolResult = ToolOutput::text("hello").into();
        let v = serde_json::to_value(&res).unwrap();
        assert_eq!(v["content"][0]["type"], "text");
        assert_eq!(v["content"][0]["text"], "hello");
        assert_ne!(v["isError"], serde_json::Value::Bool(true));
    }
}
