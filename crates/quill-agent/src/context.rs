//! Conversation assembly helpers

use quill_provider::{Message, ToolCallDef};

/// System prompt defining the agent's role and tool conventions
pub const SYSTEM_PROMPT: &str = "\
You are a helpful AI coding agent.

When a user asks a question or makes a request, make a function call plan. You can perform the following operations:

- List files and directories
- Read file contents
- Execute scripts with optional arguments
- Write or overwrite files

All paths you provide should be relative to the sandbox root. You do not need to specify the sandbox root in your function calls as it is enforced automatically for security reasons.

IMPORTANT: Whenever you produce a function call plan, also include a single short text summary (1-2 sentences) describing the chosen action/intent.";

/// Seed an empty transcript with the system message
pub fn seed(messages: &mut Vec<Message>) {
    if messages.is_empty() {
        messages.push(Message::system(SYSTEM_PROMPT));
    }
}

/// Append an assistant turn, with tool calls when the model made any
pub fn add_assistant_message(
    messages: &mut Vec<Message>,
    content: Option<&str>,
    tool_calls: Option<Vec<ToolCallDef>>,
) {
    let message = match tool_calls {
        Some(calls) => Message::assistant_tool_calls(content.map(|c| c.to_string()), calls),
        None => Message::assistant(content.unwrap_or_default()),
    };
    messages.push(message);
}

/// Append a tool result correlated back to its request
pub fn add_tool_result(messages: &mut Vec<Message>, call_id: &str, name: &str, result: &str) {
    messages.push(Message::tool(call_id, name, result));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_only_when_empty() {
        let mut messages = Vec::new();
        seed(&mut messages);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "system");

        seed(&mut messages);
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_add_assistant_with_tool_calls() {
        let mut messages = Vec::new();
        add_assistant_message(
            &mut messages,
            Some("listing files"),
            Some(vec![ToolCallDef::new(
                "call_1",
                "list_files",
                serde_json::json!({}),
            )]),
        );
        assert_eq!(messages[0].role, "assistant");
        assert!(messages[0].tool_calls.is_some());
    }

    #[test]
    fn test_add_tool_result_correlation() {
        let mut messages = Vec::new();
        add_tool_result(&mut messages, "call_9", "read_file", "contents");
        assert_eq!(messages[0].role, "tool");
        assert_eq!(messages[0].tool_call_id.as_deref(), Some("call_9"));
        assert_eq!(messages[0].content.as_deref(), Some("contents"));
    }
}
