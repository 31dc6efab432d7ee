//! Chat-completions to Google `generateContent` conversion

use serde::Serialize;
use serde_json::Value;

use super::chat::{ChatContent, ChatMessage, ChatPart, ChatRequest};

// -- Wire types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoogleRequest {
    pub contents: Vec<GoogleContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GoogleContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<GoogleTool>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GoogleContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    pub parts: Vec<GooglePart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum GooglePart {
    Text(String),
    InlineData(InlineData),
    FileData(FileData),
    FunctionCall(FunctionCall),
    FunctionResponse(FunctionResponse),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileData {
    pub file_uri: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct FunctionCall {
    pub name: String,
    pub args: Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

impl GenerationConfig {
    fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.top_p.is_none()
            && self.max_output_tokens.is_none()
            && self.stop_sequences.is_none()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoogleTool {
    pub function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FunctionDeclaration {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

// -- Outbound: chat request -> Google request --

impl From<&ChatRequest> for GoogleRequest {
    fn from(req: &ChatRequest) -> Self {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for msg in &req.messages {
            match msg.role.as_str() {
                "system" | "developer" => system_parts.push(GooglePart::Text(msg.text())),
                "assistant" => contents.push(model_content(msg)),
                "tool" => contents.push(tool_response(msg, &req.messages)),
                _ => contents.push(GoogleContent {
                    role: Some("user"),
                    parts: user_parts(msg),
                }),
            }
        }

        let system_instruction = (!system_parts.is_empty()).then_some(GoogleContent {
            role: None,
            parts: system_parts,
        });

        let generation_config = GenerationConfig {
            temperature: req.temperature,
            top_p: req.top_p,
            max_output_tokens: req.token_limit(),
            stop_sequences: req.stop_sequences(),
        };

        let tools = req.tools.as_ref().filter(|tools| !tools.is_empty()).map(|tools| {
            vec![GoogleTool {
                function_declarations: tools
                    .iter()
                    .map(|tool| FunctionDeclaration {
                        name: tool.function.name.clone(),
                        description: tool.function.description.clone(),
                        parameters: tool.function.parameters.clone(),
                    })
                    .collect(),
            }]
        });

        Self {
            contents,
            system_instruction,
            generation_config: (!generation_config.is_empty()).then_some(generation_config),
            tools,
        }
    }
}

fn user_parts(msg: &ChatMessage) -> Vec<GooglePart> {
    match &msg.content {
        Some(ChatContent::Parts(parts)) => parts
            .iter()
            .filter_map(|part| match part {
                ChatPart::Text { text } => Some(GooglePart::Text(text.clone())),
                ChatPart::ImageUrl { image_url } => Some(match image_url.as_inline() {
                    Some((mime_type, data)) => GooglePart::InlineData(InlineData {
                        mime_type: mime_type.to_owned(),
                        data: data.to_owned(),
                    }),
                    None => GooglePart::FileData(FileData {
                        file_uri: image_url.url.clone(),
                    }),
                }),
                ChatPart::Unsupported => None,
            })
            .collect(),
        _ => vec![GooglePart::Text(msg.text())],
    }
}

fn model_content(msg: &ChatMessage) -> GoogleContent {
    let mut parts = Vec::new();
    let text = msg.text();
    if !text.is_empty() {
        parts.push(GooglePart::Text(text));
    }
    for call in msg.tool_calls.iter().flatten() {
        parts.push(GooglePart::FunctionCall(FunctionCall {
            name: call.function.name.clone(),
            args: call.function.arguments_json(),
        }));
    }

    GoogleContent {
        role: Some("model"),
        parts,
    }
}

/// Tool results are keyed by function name; recover it from the call id
fn tool_response(msg: &ChatMessage, history: &[ChatMessage]) -> GoogleContent {
    let name = msg
        .name
        .clone()
        .or_else(|| {
            let id = msg.tool_call_id.as_deref()?;
            history
                .iter()
                .flat_map(|m| m.tool_calls.iter().flatten())
                .find(|call| call.id == id)
                .map(|call| call.function.name.clone())
        })
        .or_else(|| msg.tool_call_id.clone())
        .unwrap_or_default();

    let text = msg.text();
    let response = serde_json::from_str(&text).unwrap_or_else(|_| serde_json::json!({ "result": text }));

    GoogleContent {
        role: Some("function"),
        parts: vec![GooglePart::FunctionResponse(FunctionResponse { name, response })],
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn convert(body: Value) -> Value {
        let request: ChatRequest = serde_json::from_value(body).unwrap();
        serde_json::to_value(GoogleRequest::from(&request)).unwrap()
    }

    #[test]
    fn maps_messages_and_generation_config() {
        let out = convert(json!({
            "model": "gemini-1.5-pro",
            "messages": [{"role": "user", "content": "Hello"}],
            "temperature": 0.5,
            "max_tokens": 1024
        }));

        assert_eq!(out["contents"], json!([{"role": "user", "parts": [{"text": "Hello"}]}]));
        assert_eq!(out["generationConfig"], json!({"temperature": 0.5, "maxOutputTokens": 1024}));
        assert!(out.get("model").is_none());
    }

    #[test]
    fn generation_config_is_omitted_when_empty() {
        let out = convert(json!({"messages": [{"role": "user", "content": "Hi"}]}));
        assert!(out.get("generationConfig").is_none());
    }

    #[test]
    fn system_and_assistant_roles_are_mapped() {
        let out = convert(json!({
            "messages": [
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"}
            ]
        }));

        assert_eq!(out["systemInstruction"], json!({"parts": [{"text": "be brief"}]}));
        assert_eq!(out["contents"][1], json!({"role": "model", "parts": [{"text": "hello"}]}));
    }

    #[test]
    fn tool_results_recover_function_name_from_history() {
        let out = convert(json!({
            "messages": [
                {"role": "assistant", "tool_calls": [
                    {"id": "call_1", "type": "function", "function": {"name": "weather", "arguments": "{}"}}
                ]},
                {"role": "tool", "tool_call_id": "call_1", "content": "{\"temp\": -3}"}
            ],
            "tools": [{"type": "function", "function": {"name": "weather", "description": "Look up weather"}}]
        }));

        assert_eq!(
            out["contents"][1]["parts"][0],
            json!({"functionResponse": {"name": "weather", "response": {"temp": -3}}})
        );
        assert_eq!(out["tools"][0]["functionDeclarations"][0]["name"], "weather");
    }
}
