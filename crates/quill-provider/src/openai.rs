//! OpenAI-compatible chat-completions transport
//!
//! Works against api.openai.com or any local endpoint speaking the
//! same protocol (the usual deployment is a local model server).

use crate::*;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, trace};

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    api_base: String,
    default_model: String,
}

impl OpenAiProvider {
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_base: api_base.into(),
            default_model: default_model.into(),
        }
    }

    fn build_request(&self, params: &ChatParams) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = params
            .messages
            .iter()
            .map(|m| {
                let mut obj = json!({ "role": &m.role });
                if let Some(content) = &m.content {
                    obj["content"] = json!(content);
                }
                if let Some(tool_calls) = &m.tool_calls {
                    obj["tool_calls"] = json!(tool_calls);
                }
                if let Some(tool_call_id) = &m.tool_call_id {
                    obj["tool_call_id"] = json!(tool_call_id);
                }
                if let Some(name) = &m.name {
                    obj["name"] = json!(name);
                }
                obj
            })
            .collect();

        let mut body = json!({
            "model": params.model,
            "messages": messages,
        });

        if !params.tools.is_empty() {
            body["tools"] = json!(params.tools);
            body["tool_choice"] = json!("auto");
        }

        body
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<ChatResponse> {
        let choice = json["choices"]
            .get(0)
            .ok_or(ProviderError::InvalidResponse)?;
        let message = &choice["message"];
        let content = message["content"].as_str().map(|s| s.to_string());
        let finish_reason = choice["finish_reason"]
            .as_str()
            .unwrap_or("stop")
            .to_string();

        let mut tool_calls = Vec::new();
        if let Some(calls) = message["tool_calls"].as_array() {
            for call in calls {
                let function = &call["function"];
                // Arguments arrive as a JSON-encoded string; some local
                // servers inline the object instead.
                let args = function["arguments"]
                    .as_str()
                    .and_then(|s| serde_json::from_str(s).ok())
                    .unwrap_or_else(|| function["arguments"].clone());

                tool_calls.push(ToolCall {
                    id: call["id"].as_str().unwrap_or("").to_string(),
                    name: function["name"].as_str().unwrap_or("").to_string(),
                    arguments: args,
                });
            }
        }

        Ok(ChatResponse {
            content,
            tool_calls,
            finish_reason,
        })
    }
}

#[async_trait::async_trait]
impl Provider for OpenAiProvider {
    async fn chat(&self, params: ChatParams) -> Result<ChatResponse> {
        trace!("sending chat request to {}", self.api_base);

        let url = format!("{}/chat/completions", self.api_base);
        let body = self.build_request(&params);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let json: serde_json::Value = response.json().await?;

        if !status.is_success() {
            let error = json["error"]["message"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string();
            return Err(ProviderError::Api(error));
        }

        debug!(
            "chat response: {} tool calls",
            json["choices"][0]["message"]["tool_calls"]
                .as_array()
                .map(|v| v.len())
                .unwrap_or(0)
        );

        self.parse_response(json)
    }

    fn default_model(&self) -> String {
        self.default_model.clone()
    }

    fn is_configured(&self) -> bool {
        // Local endpoints often run keyless; a base URL is enough.
        !self.api_base.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new("test-key", "http://localhost:1234/v1", "test-model")
    }

    #[test]
    fn test_build_request_basic() {
        let params = ChatParams {
            model: "test-model".to_string(),
            messages: vec![Message::system("sys"), Message::user("hi")],
            tools: Vec::new(),
        };
        let body = provider().build_request(&params);

        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["messages"][0]["role"], "system");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_build_request_with_tools() {
        let params = ChatParams {
            model: "test-model".to_string(),
            messages: vec![Message::user("hi")],
            tools: vec![Tool::new("read_file", "Read a file", json!({}))],
        };
        let body = provider().build_request(&params);

        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["tools"][0]["function"]["name"], "read_file");
    }

    #[test]
    fn test_build_request_tool_result_message() {
        let params = ChatParams {
            model: "m".to_string(),
            messages: vec![Message::tool("call_1", "list_files", "- a.txt")],
            tools: Vec::new(),
        };
        let body = provider().build_request(&params);

        assert_eq!(body["messages"][0]["role"], "tool");
        assert_eq!(body["messages"][0]["tool_call_id"], "call_1");
        assert_eq!(body["messages"][0]["name"], "list_files");
    }

    #[test]
    fn test_parse_response_text() {
        let json = json!({
            "choices": [{
                "message": { "content": "All done." },
                "finish_reason": "stop"
            }]
        });
        let response = provider().parse_response(json).unwrap();
        assert_eq!(response.content.as_deref(), Some("All done."));
        assert!(!response.has_tool_calls());
    }

    #[test]
    fn test_parse_response_tool_calls_string_arguments() {
        let json = json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "read_file",
                            "arguments": "{\"path\": \"main.py\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });
        let response = provider().parse_response(json).unwrap();
        assert!(response.has_tool_calls());
        assert_eq!(response.tool_calls[0].id, "call_1");
        assert_eq!(response.tool_calls[0].arguments["path"], "main.py");
    }

    #[test]
    fn test_parse_response_tool_calls_inline_arguments() {
        let json = json!({
            "choices": [{
                "message": {
                    "tool_calls": [{
                        "id": "call_2",
                        "type": "function",
                        "function": {
                            "name": "write_file",
                            "arguments": {"path": "out.txt", "content": "x"}
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });
        let response = provider().parse_response(json).unwrap();
        assert_eq!(response.tool_calls[0].arguments["content"], "x");
    }

    #[test]
    fn test_parse_response_no_choices() {
        let json = json!({ "choices": [] });
        let result = provider().parse_response(json);
        assert!(matches!(result, Err(ProviderError::InvalidResponse)));
    }
}
