//! Chat-completions to Anthropic Messages conversion

use serde::Serialize;
use serde_json::Value;

use super::chat::{ChatContent, ChatMessage, ChatPart, ChatRequest};

/// Anthropic requires `max_tokens`; used when the caller sets no limit
const DEFAULT_MAX_TOKENS: u32 = 4096;

// -- Wire types --

#[derive(Debug, Serialize)]
pub(crate) struct AnthropicRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<AnthropicTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<AnthropicToolChoice>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnthropicMessage {
    pub role: &'static str,
    pub content: AnthropicContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum AnthropicContent {
    Text(String),
    Blocks(Vec<AnthropicBlock>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum AnthropicBlock {
    Text {
        text: String,
    },
    Image {
        source: ImageSource,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ImageSource {
    Base64 { media_type: String, data: String },
    Url { url: String },
}

#[derive(Debug, Serialize)]
pub(crate) struct AnthropicTool {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub input_schema: Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnthropicToolChoice {
    #[serde(rename = "type")]
    pub choice_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// -- Outbound: chat request -> Anthropic request --

impl From<&ChatRequest> for AnthropicRequest {
    fn from(req: &ChatRequest) -> Self {
        let mut system_parts = Vec::new();
        let mut messages = Vec::new();

        for msg in &req.messages {
            match msg.role.as_str() {
                "system" | "developer" => system_parts.push(msg.text()),
                "assistant" => messages.push(assistant_message(msg)),
                "tool" => messages.push(AnthropicMessage {
                    role: "user",
                    content: AnthropicContent::Blocks(vec![AnthropicBlock::ToolResult {
                        tool_use_id: msg.tool_call_id.clone().unwrap_or_default(),
                        content: msg.text(),
                    }]),
                }),
                _ => messages.push(AnthropicMessage {
                    role: "user",
                    content: user_content(msg),
                }),
            }
        }

        let system = (!system_parts.is_empty()).then(|| system_parts.join("\n\n"));

        let tools = req.tools.as_ref().map(|tools| {
            tools
                .iter()
                .map(|tool| AnthropicTool {
                    name: tool.function.name.clone(),
                    description: tool.function.description.clone(),
                    input_schema: tool
                        .function
                        .parameters
                        .clone()
                        .unwrap_or_else(|| serde_json::json!({"type": "object"})),
                })
                .collect()
        });

        Self {
            model: req.model.clone(),
            max_tokens: req.token_limit().unwrap_or(DEFAULT_MAX_TOKENS),
            system,
            messages,
            temperature: req.temperature,
            top_p: req.top_p,
            stop_sequences: req.stop_sequences(),
            stream: req.stream,
            tools,
            tool_choice: req.tool_choice.as_ref().and_then(tool_choice),
        }
    }
}

fn user_content(msg: &ChatMessage) -> AnthropicContent {
    match &msg.content {
        Some(ChatContent::Parts(parts)) => AnthropicContent::Blocks(
            parts
                .iter()
                .filter_map(|part| match part {
                    ChatPart::Text { text } => Some(AnthropicBlock::Text { text: text.clone() }),
                    ChatPart::ImageUrl { image_url } => {
                        let source = match image_url.as_inline() {
                            Some((media_type, data)) => ImageSource::Base64 {
                                media_type: media_type.to_owned(),
                                data: data.to_owned(),
                            },
                            None => ImageSource::Url {
                                url: image_url.url.clone(),
                            },
                        };
                        Some(AnthropicBlock::Image { source })
                    }
                    ChatPart::Unsupported => None,
                })
                .collect(),
        ),
        _ => AnthropicContent::Text(msg.text()),
    }
}

fn assistant_message(msg: &ChatMessage) -> AnthropicMessage {
    let Some(calls) = msg.tool_calls.as_ref().filter(|calls| !calls.is_empty()) else {
        return AnthropicMessage {
            role: "assistant",
            content: AnthropicContent::Text(msg.text()),
        };
    };

    let mut blocks = Vec::with_capacity(calls.len() + 1);
    let text = msg.text();
    if !text.is_empty() {
        blocks.push(AnthropicBlock::Text { text });
    }
    for call in calls {
        blocks.push(AnthropicBlock::ToolUse {
            id: call.id.clone(),
            name: call.function.name.clone(),
            input: call.function.arguments_json(),
        });
    }

    AnthropicMessage {
        role: "assistant",
        content: AnthropicContent::Blocks(blocks),
    }
}

fn tool_choice(choice: &Value) -> Option<AnthropicToolChoice> {
    match choice {
        Value::String(mode) => match mode.as_str() {
            "auto" => Some(AnthropicToolChoice {
                choice_type: "auto",
                name: None,
            }),
            "required" => Some(AnthropicToolChoice {
                choice_type: "any",
                name: None,
            }),
            _ => None,
        },
        Value::Object(obj) => obj
            .get("function")
            .and_then(|f| f.get("name"))
            .and_then(Value::as_str)
            .map(|name| AnthropicToolChoice {
                choice_type: "tool",
                name: Some(name.to_owned()),
            }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn convert(body: Value) -> Value {
        let request: ChatRequest = serde_json::from_value(body).unwrap();
        serde_json::to_value(AnthropicRequest::from(&request)).unwrap()
    }

    #[test]
    fn system_messages_move_to_top_level() {
        let out = convert(json!({
            "model": "claude-3-haiku",
            "messages": [
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "hi"}
            ],
            "max_tokens": 100
        }));

        assert_eq!(out["system"], "be brief");
        assert_eq!(out["max_tokens"], 100);
        assert_eq!(out["messages"], json!([{"role": "user", "content": "hi"}]));
    }

    #[test]
    fn max_tokens_defaults_when_absent() {
        let out = convert(json!({"messages": [{"role": "user", "content": "hi"}]}));
        assert_eq!(out["max_tokens"], DEFAULT_MAX_TOKENS);
        assert!(out.get("model").is_none());
    }

    #[test]
    fn tool_round_trip_becomes_tool_use_and_result_blocks() {
        let out = convert(json!({
            "messages": [
                {"role": "user", "content": "weather?"},
                {"role": "assistant", "content": null, "tool_calls": [
                    {"id": "call_1", "type": "function", "function": {"name": "weather", "arguments": "{\"city\":\"Oslo\"}"}}
                ]},
                {"role": "tool", "tool_call_id": "call_1", "content": "cold"}
            ],
            "tools": [{"type": "function", "function": {"name": "weather", "parameters": {"type": "object"}}}],
            "tool_choice": "required"
        }));

        assert_eq!(
            out["messages"][1]["content"][0],
            json!({"type": "tool_use", "id": "call_1", "name": "weather", "input": {"city": "Oslo"}})
        );
        assert_eq!(
            out["messages"][2],
            json!({"role": "user", "content": [{"type": "tool_result", "tool_use_id": "call_1", "content": "cold"}]})
        );
        assert_eq!(out["tools"][0]["input_schema"], json!({"type": "object"}));
        assert_eq!(out["tool_choice"], json!({"type": "any"}));
    }

    #[test]
    fn data_url_images_become_base64_sources() {
        let out = convert(json!({
            "messages": [{"role": "user", "content": [
                {"type": "text", "text": "what is this"},
                {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}}
            ]}]
        }));

        assert_eq!(
            out["messages"][0]["content"][1],
            json!({"type": "image", "source": {"type": "base64", "media_type": "image/png", "data": "AAAA"}})
        );
    }
}
