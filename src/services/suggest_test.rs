use std::sync::Arc;

use super::*;
use crate::llm::types::ContentBlock;
use crate::state::test_helpers::{MockLlm, text_reply, tool_reply};

fn magnet(id: &str, text: &str) -> MagnetText {
    MagnetText { id: id.into(), text: text.into() }
}

fn request(ids: &[&str]) -> SuggestConnectionsRequest {
    SuggestConnectionsRequest { magnets: ids.iter().map(|id| magnet(id, &format!("text for {id}"))).collect() }
}

fn pair(source: &str, target: &str) -> serde_json::Value {
    json!({ "sourceId": source, "targetId": target, "reason": "related" })
}

// =========================================================================
// build_prompt
// =========================================================================

#[test]
fn prompt_lists_every_magnet() {
    let prompt = build_prompt(&[magnet("m1", "Buy rope"), magnet("m2", "Check\nharness")]);
    assert!(prompt.starts_with("Magnets:\n"));
    assert!(prompt.contains("- ID: m1, Text: Buy rope\n"));
    assert!(prompt.contains("- ID: m2, Text: Check harness\n"));
}

#[test]
fn tool_schema_requires_all_fields() {
    let tool = suggest_tool();
    assert_eq!(tool.name, SUGGEST_TOOL);
    let required = &tool.input_schema["properties"]["suggestions"]["items"]["required"];
    assert_eq!(required, &json!(["sourceId", "targetId", "reason"]));
}

// =========================================================================
// suggest_connections
// =========================================================================

#[tokio::test]
async fn fewer_than_two_magnets_skips_llm() {
    let llm = MockLlm::new(Vec::new());
    let out = suggest_connections(&llm, &request(&["only"]), SuggestLimits::default()).await.unwrap();
    assert!(out.is_empty());
    assert_eq!(llm.call_count(), 0);

    let out = suggest_connections(&llm, &request(&[]), SuggestLimits::default()).await.unwrap();
    assert!(out.is_empty());
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn forced_tool_result_is_returned() {
    let llm = MockLlm::new(vec![Ok(tool_reply(SUGGEST_TOOL, json!({ "suggestions": [pair("a", "b")] })))]);
    let out = suggest_connections(&llm, &request(&["a", "b"]), SuggestLimits::default()).await.unwrap();
    assert_eq!(out, vec![Suggestion { source_id: "a".into(), target_id: "b".into(), reason: "related".into() }]);

    let call = llm.last_call().unwrap();
    assert_eq!(call.force_tool.as_deref(), Some(SUGGEST_TOOL));
    assert_eq!(call.tools, vec![SUGGEST_TOOL.to_string()]);
    assert_eq!(call.max_tokens, 2048);
    assert!(call.system.contains("digital magnetic board"));
    assert!(call.prompt.contains("- ID: a, Text: text for a"));
}

#[tokio::test]
async fn unknown_ids_are_dropped() {
    let llm = MockLlm::new(vec![Ok(tool_reply(
        SUGGEST_TOOL,
        json!({ "suggestions": [pair("a", "ghost"), pair("b", "c"), pair("a", "a")] }),
    ))]);
    let out = suggest_connections(&llm, &request(&["a", "b", "c"]), SuggestLimits::default()).await.unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].source_id, "b");
}

#[tokio::test]
async fn text_array_fallback() {
    let text = "Here you go:\n```json\n[{\"sourceId\":\"a\",\"targetId\":\"b\",\"reason\":\"both rope\"}]\n```";
    let llm = MockLlm::new(vec![Ok(text_reply(text))]);
    let out = suggest_connections(&llm, &request(&["a", "b"]), SuggestLimits::default()).await.unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].reason, "both rope");
}

#[tokio::test]
async fn text_fallback_ignores_brackets_in_surrounding_prose() {
    let text = "As noted [1]:\n[{\"sourceId\":\"a\",\"targetId\":\"b\",\"reason\":\"rope\"}]\nsee [2] for more.";
    let llm = MockLlm::new(vec![Ok(text_reply(text))]);
    let out = suggest_connections(&llm, &request(&["a", "b"]), SuggestLimits::default()).await.unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].target_id, "b");
}

#[tokio::test]
async fn missing_reason_defaults_empty() {
    let llm = MockLlm::new(vec![Ok(tool_reply(
        SUGGEST_TOOL,
        json!({ "suggestions": [{ "sourceId": "a", "targetId": "b" }] }),
    ))]);
    let out = suggest_connections(&llm, &request(&["a", "b"]), SuggestLimits::default()).await.unwrap();
    assert_eq!(out[0].reason, "");
}

#[tokio::test]
async fn prose_reply_is_schema_error() {
    let llm = MockLlm::new(vec![Ok(text_reply("I could not find any connections."))]);
    let err = suggest_connections(&llm, &request(&["a", "b"]), SuggestLimits::default()).await.unwrap_err();
    assert!(matches!(err, SuggestError::Schema(_)));
    assert_eq!(err.error_code(), "E_SUGGEST_SCHEMA");
}

#[tokio::test]
async fn malformed_tool_input_is_schema_error() {
    let llm = MockLlm::new(vec![Ok(tool_reply(SUGGEST_TOOL, json!({ "suggestions": [{ "sourceId": 7 }] })))]);
    let err = suggest_connections(&llm, &request(&["a", "b"]), SuggestLimits::default()).await.unwrap_err();
    assert!(matches!(err, SuggestError::Schema(_)));
}

#[tokio::test]
async fn other_tool_calls_are_ignored() {
    let llm = MockLlm::new(vec![Ok(crate::state::test_helpers::reply(vec![
        ContentBlock::ToolUse { id: "x".into(), name: "something_else".into(), input: json!({}) },
        ContentBlock::Text { text: "[]".into() },
    ]))]);
    let out = suggest_connections(&llm, &request(&["a", "b"]), SuggestLimits::default()).await.unwrap();
    assert!(out.is_empty());
}

#[tokio::test]
async fn llm_failure_propagates() {
    let llm = MockLlm::new(vec![Err(LlmError::ApiResponse { status: 529, body: "overloaded".into() })]);
    let err = suggest_connections(&llm, &request(&["a", "b"]), SuggestLimits::default()).await.unwrap_err();
    assert!(matches!(err, SuggestError::Llm(_)));
    assert!(err.retryable());
    assert_eq!(err.error_code(), "E_API_RESPONSE");
}

#[tokio::test]
async fn empty_id_is_rejected_before_llm() {
    let llm = MockLlm::new(Vec::new());
    let req = SuggestConnectionsRequest { magnets: vec![magnet("a", "x"), magnet(" ", "y")] };
    let err = suggest_connections(&llm, &req, SuggestLimits::default()).await.unwrap_err();
    assert!(matches!(err, SuggestError::InvalidInput(_)));
    assert!(!err.retryable());
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn too_many_magnets_is_rejected() {
    let llm = Arc::new(MockLlm::new(Vec::new()));
    let limits = SuggestLimits { max_tokens: 100, max_magnets: 2 };
    let err = suggest_connections(llm.as_ref(), &request(&["a", "b", "c"]), limits).await.unwrap_err();
    assert!(matches!(err, SuggestError::InvalidInput(ref msg) if msg.contains("max 2")));
}

// =========================================================================
// SuggestError
// =========================================================================

#[test]
fn error_codes() {
    assert_eq!(SuggestError::NotConfigured.error_code(), "E_LLM_NOT_CONFIGURED");
    assert_eq!(SuggestError::InvalidInput("x".into()).error_code(), "E_INVALID_INPUT");
    assert!(!SuggestError::NotConfigured.retryable());
    assert!(SuggestError::Schema("x".into()).retryable());
}
