//! Suggestion service — magnets in, LLM-proposed connections out.
//!
//! DESIGN
//! ======
//! The magnets are listed in the prompt and the model is forced to answer
//! through a single `record_suggestions` tool whose input schema is the
//! response schema. If a provider ignores the forced tool and answers in
//! text, the first JSON array in the text is parsed instead. Either way the
//! result goes through serde, and pairs naming ids that were not in the
//! request are dropped before anything is returned.

use std::collections::HashSet;
use std::fmt::Write;

use board::suggest::{MagnetText, SuggestConnectionsRequest, Suggestion, retain_known};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::config::SuggestLimits;
use crate::error::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::types::{ChatRequest, ChatResponse, LlmError, Message, Tool};

pub const SUGGEST_TOOL: &str = "record_suggestions";

const SYSTEM_PROMPT: &str = "You are an AI assistant helping users organize their ideas on a digital magnetic board.

You will receive a list of magnets, each with an ID and text content. Your task is to analyze the content of these magnets and suggest connections between them based on related ideas or concepts.

For each suggested connection, provide the source magnet ID, the target magnet ID, and a brief reason explaining the connection. Only use IDs from the list. Record your answer with the record_suggestions tool.";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("LLM not configured")]
    NotConfigured,
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unreadable suggestions: {0}")]
    Schema(String),
}

impl ErrorCode for SuggestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "E_LLM_NOT_CONFIGURED",
            Self::Llm(e) => e.error_code(),
            Self::InvalidInput(_) => "E_INVALID_INPUT",
            Self::Schema(_) => "E_SUGGEST_SCHEMA",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Llm(e) => e.retryable(),
            Self::Schema(_) => true,
            Self::NotConfigured | Self::InvalidInput(_) => false,
        }
    }
}

/// Tool input as the model sends it.
#[derive(Debug, Deserialize)]
struct ToolPayload {
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

// =============================================================================
// PROMPT
// =============================================================================

/// The forced output tool. Its input schema mirrors [`Suggestion`].
#[must_use]
pub fn suggest_tool() -> Tool {
    Tool {
        name: SUGGEST_TOOL.to_string(),
        description: "Record suggested connections between magnets.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "suggestions": {
                    "type": "array",
                    "description": "Suggested connections between magnets.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "sourceId": { "type": "string", "description": "The id of the source magnet." },
                            "targetId": { "type": "string", "description": "The id of the target magnet." },
                            "reason": { "type": "string", "description": "The reason for the suggested connection." }
                        },
                        "required": ["sourceId", "targetId", "reason"]
                    }
                }
            },
            "required": ["suggestions"]
        }),
    }
}

/// User message listing every magnet, one per line.
#[must_use]
pub fn build_prompt(magnets: &[MagnetText]) -> String {
    let mut prompt = String::from("Magnets:\n");
    for m in magnets {
        let text = m.text.replace('\n', " ");
        let _ = writeln!(prompt, "- ID: {}, Text: {}", m.id, text.trim());
    }
    prompt
}

// =============================================================================
// SERVICE
// =============================================================================

/// Ask the LLM for connections between the request's magnets.
///
/// # Errors
///
/// `InvalidInput` for an empty id or too many magnets, `Llm` when the call
/// fails, `Schema` when neither the tool input nor the text parses.
pub async fn suggest_connections(
    llm: &dyn LlmChat,
    request: &SuggestConnectionsRequest,
    limits: SuggestLimits,
) -> Result<Vec<Suggestion>, SuggestError> {
    validate(request, limits)?;
    if request.magnets.len() < 2 {
        return Ok(Vec::new());
    }

    let messages = [Message::user(build_prompt(&request.magnets))];
    let tools = [suggest_tool()];
    let response = llm
        .chat(ChatRequest {
            max_tokens: limits.max_tokens,
            system: SYSTEM_PROMPT,
            messages: &messages,
            tools: &tools,
            force_tool: Some(SUGGEST_TOOL),
        })
        .await?;

    info!(
        model = %response.model,
        magnets = request.magnets.len(),
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        stop_reason = %response.stop_reason,
        "suggestion call finished"
    );

    let raw = parse_suggestions(&response)?;
    let known: HashSet<&str> = request.magnets.iter().map(|m| m.id.as_str()).collect();
    let total = raw.len();
    let kept = retain_known(raw, |id| known.contains(id));
    if kept.len() < total {
        warn!(dropped = total - kept.len(), "LLM suggested unknown magnet ids");
    }
    Ok(kept)
}

fn validate(request: &SuggestConnectionsRequest, limits: SuggestLimits) -> Result<(), SuggestError> {
    if request.magnets.iter().any(|m| m.id.trim().is_empty()) {
        return Err(SuggestError::InvalidInput("magnet id must not be empty".into()));
    }
    if request.magnets.len() > limits.max_magnets {
        return Err(SuggestError::InvalidInput(format!(
            "too many magnets: {} (max {})",
            request.magnets.len(),
            limits.max_magnets
        )));
    }
    Ok(())
}

/// Read suggestions from the forced tool call, falling back to text.
fn parse_suggestions(response: &ChatResponse) -> Result<Vec<Suggestion>, SuggestError> {
    if let Some(input) = response.tool_input(SUGGEST_TOOL) {
        let payload: ToolPayload =
            serde_json::from_value(input.clone()).map_err(|e| SuggestError::Schema(e.to_string()))?;
        return Ok(payload.suggestions);
    }
    parse_text_suggestions(&response.text())
}

/// Parse the first JSON array of suggestions in a text reply.
///
/// Each `[` is tried in turn and the array is read to its own closing
/// bracket, so code fences and bracketed prose around it are ignored.
fn parse_text_suggestions(text: &str) -> Result<Vec<Suggestion>, SuggestError> {
    let mut last_error = None;
    for (start, _) in text.match_indices('[') {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Vec<Suggestion>>();
        match stream.next() {
            Some(Ok(suggestions)) => return Ok(suggestions),
            Some(Err(e)) => last_error = Some(e.to_string()),
            None => {}
        }
    }
    Err(SuggestError::Schema(last_error.unwrap_or_else(|| "no tool call and no JSON array in reply".into())))
}

#[cfg(test)]
#[path = "suggest_test.rs"]
mod tests;
