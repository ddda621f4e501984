//! OpenAI-compatible Chat Completions client.
//!
//! Speaks `/chat/completions` against the configured base URL, so any
//! compatible gateway works. A forced tool becomes a `function` tool choice.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::config::LlmTimeouts;
use super::types::{ChatRequest, ChatResponse, ContentBlock, LlmError, Tool};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url })
    }

    pub async fn chat(&self, model: &str, request: ChatRequest<'_>) -> Result<ChatResponse, LlmError> {
        let messages = build_messages(request);
        let body = build_request(model, request, &messages);
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [CcMessage<'a>],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<CcToolDef<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<CcToolChoice<'a>>,
}

#[derive(Serialize)]
struct CcMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CcToolDef<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: CcFunctionDef<'a>,
}

#[derive(Serialize)]
struct CcFunctionDef<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

#[derive(Serialize)]
struct CcToolChoice<'a> {
    #[serde(rename = "type")]
    choice_type: &'static str,
    function: CcFunctionName<'a>,
}

#[derive(Serialize)]
struct CcFunctionName<'a> {
    name: &'a str,
}

impl<'a> From<&'a Tool> for CcToolDef<'a> {
    fn from(tool: &'a Tool) -> Self {
        Self {
            tool_type: "function",
            function: CcFunctionDef { name: &tool.name, description: &tool.description, parameters: &tool.input_schema },
        }
    }
}

/// System prompt first (when non-blank), then the conversation.
fn build_messages<'a>(request: ChatRequest<'a>) -> Vec<CcMessage<'a>> {
    let system = (!request.system.trim().is_empty()).then_some(CcMessage { role: "system", content: request.system });
    system
        .into_iter()
        .chain(request.messages.iter().map(|m| CcMessage { role: &m.role, content: &m.content }))
        .collect()
}

fn build_request<'a>(model: &'a str, request: ChatRequest<'a>, messages: &'a [CcMessage<'a>]) -> CcRequest<'a> {
    CcRequest {
        model,
        max_tokens: request.max_tokens,
        messages,
        tools: request.tools.iter().map(CcToolDef::from).collect(),
        tool_choice: request
            .force_tool
            .map(|name| CcToolChoice { choice_type: "function", function: CcFunctionName { name } }),
    }
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

fn parse_response(json_text: &str) -> Result<ChatResponse, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    let model = root.get("model").and_then(Value::as_str).map(str::to_owned).unwrap_or_default();
    let usage = |key: &str| root.get("usage").and_then(|u| u.get(key)).and_then(Value::as_u64).unwrap_or(0);
    let input_tokens = usage("prompt_tokens");
    let output_tokens = usage("completion_tokens");

    let Some(choice) = root.get("choices").and_then(Value::as_array).and_then(|arr| arr.first()) else {
        return Err(LlmError::ApiParse("chat_completions: missing choices[0]".to_string()));
    };
    let finish_reason = choice.get("finish_reason").and_then(Value::as_str).unwrap_or("stop");
    let message = choice.get("message");

    let mut content = Vec::new();
    if let Some(text) = message.and_then(|m| m.get("content")).and_then(Value::as_str) {
        if !text.is_empty() {
            content.push(ContentBlock::Text { text: text.to_string() });
        }
    }

    if let Some(tool_calls) = message.and_then(|m| m.get("tool_calls")).and_then(Value::as_array) {
        for call in tool_calls {
            let function = call.get("function");
            let Some(name) = function.and_then(|f| f.get("name")).and_then(Value::as_str) else {
                continue;
            };
            let Some(id) = call.get("id").and_then(Value::as_str).map(str::to_owned) else {
                return Err(LlmError::ApiParse("chat_completions: tool call missing id".to_string()));
            };
            let args = function.and_then(|f| f.get("arguments")).and_then(Value::as_str).unwrap_or("{}");
            let input = serde_json::from_str::<Value>(args)
                .map_err(|e| LlmError::ApiParse(format!("chat_completions: tool arguments: {e}")))?;
            content.push(ContentBlock::ToolUse { id, name: name.to_string(), input });
        }
    }

    let stop_reason = if content.iter().any(|block| matches!(block, ContentBlock::ToolUse { .. })) {
        "tool_use"
    } else if finish_reason == "length" {
        "max_tokens"
    } else {
        "end_turn"
    };

    Ok(ChatResponse { content, model, stop_reason: stop_reason.to_string(), input_tokens, output_tokens })
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
