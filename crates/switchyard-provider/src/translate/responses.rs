//! Responses API to chat-completions conversion

use serde_json::{Map, Value, json};

/// Fields copied unchanged from a Responses body
const PASSTHROUGH_FIELDS: &[&str] = &["model", "temperature", "top_p", "stream", "user", "parallel_tool_calls"];

pub(crate) fn to_chat_completions(body: &Value) -> Value {
    let mut out = Map::new();

    for field in PASSTHROUGH_FIELDS {
        if let Some(value) = body.get(*field) {
            out.insert((*field).to_owned(), value.clone());
        }
    }

    if let Some(limit) = body.get("max_output_tokens") {
        out.insert("max_tokens".to_owned(), limit.clone());
    }

    let mut messages = Vec::new();
    if let Some(instructions) = body.get("instructions").and_then(Value::as_str) {
        messages.push(json!({"role": "system", "content": instructions}));
    }

    match body.get("input") {
        Some(Value::String(text)) => messages.push(json!({"role": "user", "content": text})),
        Some(Value::Array(items)) => {
            for item in items {
                push_input_item(&mut messages, item);
            }
        }
        _ => {}
    }
    out.insert("messages".to_owned(), Value::Array(messages));

    if let Some(tools) = body.get("tools").and_then(Value::as_array) {
        let converted: Vec<Value> = tools.iter().filter_map(function_tool).collect();
        if !converted.is_empty() {
            out.insert("tools".to_owned(), Value::Array(converted));
        }
    }

    if let Some(choice) = body.get("tool_choice") {
        out.insert("tool_choice".to_owned(), tool_choice(choice));
    }

    Value::Object(out)
}

fn push_input_item(messages: &mut Vec<Value>, item: &Value) {
    match item.get("type").and_then(Value::as_str) {
        Some("function_call") => {
            let call = json!({
                "id": item.get("call_id").cloned().unwrap_or(Value::Null),
                "type": "function",
                "function": {
                    "name": item.get("name").cloned().unwrap_or(Value::Null),
                    "arguments": item.get("arguments").cloned().unwrap_or_else(|| json!("{}")),
                }
            });

            // Consecutive calls belong to the same assistant turn
            if let Some(last) = messages.last_mut()
                && last["role"] == "assistant"
                && let Some(calls) = last.get_mut("tool_calls").and_then(Value::as_array_mut)
            {
                calls.push(call);
                return;
            }

            messages.push(json!({"role": "assistant", "content": null, "tool_calls": [call]}));
        }
        Some("function_call_output") => messages.push(json!({
            "role": "tool",
            "tool_call_id": item.get("call_id").cloned().unwrap_or(Value::Null),
            "content": item.get("output").cloned().unwrap_or_else(|| json!("")),
        })),
        _ => {
            let Some(role) = item.get("role").and_then(Value::as_str) else {
                return;
            };
            messages.push(json!({"role": role, "content": message_content(item.get("content"))}));
        }
    }
}

/// Flatten Responses content parts into chat content
fn message_content(content: Option<&Value>) -> Value {
    let Some(Value::Array(parts)) = content else {
        return content.cloned().unwrap_or_else(|| json!(""));
    };

    let converted: Vec<Value> = parts
        .iter()
        .filter_map(|part| match part.get("type").and_then(Value::as_str) {
            Some("input_text" | "output_text" | "text") => Some(json!({"type": "text", "text": part.get("text")?})),
            Some("input_image") => Some(json!({
                "type": "image_url",
                "image_url": {"url": part.get("image_url")?}
            })),
            _ => None,
        })
        .collect();

    if converted.iter().all(|part| part["type"] == "text") {
        let text: Vec<&str> = converted.iter().filter_map(|part| part["text"].as_str()).collect();
        return json!(text.join(""));
    }

    Value::Array(converted)
}

fn function_tool(tool: &Value) -> Option<Value> {
    if tool.get("type").and_then(Value::as_str) != Some("function") {
        return None;
    }

    let mut function = Map::new();
    function.insert("name".to_owned(), tool.get("name")?.clone());
    for field in ["description", "parameters", "strict"] {
        if let Some(value) = tool.get(field) {
            function.insert(field.to_owned(), value.clone());
        }
    }

    Some(json!({"type": "function", "function": function}))
}

fn tool_choice(choice: &Value) -> Value {
    match choice.get("name") {
        Some(name) if choice.get("type").and_then(Value::as_str) == Some("function") => {
            json!({"type": "function", "function": {"name": name}})
        }
        _ => choice.clone(),
    }
}
