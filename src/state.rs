//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! service keeps no board data of its own: seed boards come from the `board`
//! crate and suggestion requests carry everything they need. All that is
//! shared is the optional LLM client and the request limits.

use std::sync::Arc;

use crate::config::SuggestLimits;
use crate::llm::LlmChat;

/// Shared application state. Clone is required by Axum.
#[derive(Clone)]
pub struct AppState {
    /// Optional LLM client. `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
    pub limits: SuggestLimits,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmChat>>, limits: SuggestLimits) -> Self {
        Self { llm, limits }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
#[path = "state_helpers_test.rs"]
pub mod test_helpers;
