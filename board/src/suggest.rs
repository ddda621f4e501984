//! AI connection suggestions: wire types, filtering, and stale-response handling.
//!
//! The board sends `{id, text}` pairs for its items to the suggestion service
//! and gets back `{sourceId, targetId, reason}` triples. Nothing here performs
//! I/O. The host issues the request with the token from
//! [`SuggestionTracker::begin`] and hands the result to
//! [`SuggestionTracker::complete`].
//!
//! DESIGN
//! ======
//! Every request gets a monotonically increasing token. Only the response
//! for the most recently issued token is applied; anything older is dropped
//! on arrival. The surviving response is filtered against the store as it is
//! *at completion time*, so items deleted while the request was in flight
//! never show up in a suggestion.

#[cfg(test)]
#[path = "suggest_test.rs"]
mod suggest_test;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::doc::{BoardStore, Id};

/// Message shown to the user when a suggestion request fails.
pub const SUGGEST_FAILURE_MESSAGE: &str = "Failed to get AI suggestions.";

/// One item as the suggestion service sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagnetText {
    pub id: Id,
    pub text: String,
}

/// Body of `POST /api/suggest-connections`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SuggestConnectionsRequest {
    pub magnets: Vec<MagnetText>,
}

/// One suggested link, as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub source_id: Id,
    pub target_id: Id,
    #[serde(default)]
    pub reason: String,
}

/// A suggestion that survived filtering and is shown on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSuggestion {
    /// Always `ai-{source}-{target}`.
    pub id: Id,
    pub source_id: Id,
    pub target_id: Id,
    pub reason: String,
}

impl AiSuggestion {
    #[must_use]
    pub fn from_suggestion(s: Suggestion) -> Self {
        Self {
            id: format!("ai-{}-{}", s.source_id, s.target_id),
            source_id: s.source_id,
            target_id: s.target_id,
            reason: s.reason,
        }
    }

    /// Whether either end is `id`.
    #[must_use]
    pub fn touches(&self, id: &str) -> bool {
        self.source_id == id || self.target_id == id
    }
}

/// Build the request body from every item, in store order.
#[must_use]
pub fn request_from_store(store: &BoardStore) -> SuggestConnectionsRequest {
    SuggestConnectionsRequest {
        magnets: store
            .items()
            .iter()
            .map(|i| MagnetText { id: i.id.clone(), text: i.display_text() })
            .collect(),
    }
}

/// Keep suggestions whose ends both satisfy `known`, dropping self-links.
pub fn retain_known<F>(suggestions: Vec<Suggestion>, known: F) -> Vec<Suggestion>
where
    F: Fn(&str) -> bool,
{
    suggestions
        .into_iter()
        .filter(|s| s.source_id != s.target_id && known(&s.source_id) && known(&s.target_id))
        .collect()
}

/// Filter a response against the current store.
///
/// Drops suggestions that mention unknown items, pairs that are already
/// connected, and repeats of an earlier pair in either direction.
#[must_use]
pub fn filter_suggestions(store: &BoardStore, suggestions: Vec<Suggestion>) -> Vec<AiSuggestion> {
    let mut kept: Vec<AiSuggestion> = Vec::new();
    for s in retain_known(suggestions, |id| store.item(id).is_some()) {
        let connected = store.connections().iter().any(|c| c.joins(&s.source_id, &s.target_id));
        let repeated = kept.iter().any(|k| {
            (k.source_id == s.source_id && k.target_id == s.target_id)
                || (k.source_id == s.target_id && k.target_id == s.source_id)
        });
        if !connected && !repeated {
            kept.push(AiSuggestion::from_suggestion(s));
        }
    }
    kept
}

/// Identifies one suggestion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// What happened to a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestOutcome {
    /// The response replaced the shown suggestions; this many survived filtering.
    Applied(usize),
    /// A newer request was issued after this one; the response was dropped.
    Stale,
    /// The request failed; shown suggestions are unchanged.
    Failed(&'static str),
}

/// Tracks in-flight requests and the suggestions currently shown.
#[derive(Debug, Clone, Default)]
pub struct SuggestionTracker {
    latest: u64,
    pending: bool,
    suggestions: Vec<AiSuggestion>,
}

impl SuggestionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request. Any request still in flight becomes stale.
    pub fn begin(&mut self) -> RequestToken {
        self.latest += 1;
        self.pending = true;
        RequestToken(self.latest)
    }

    /// Whether the latest request has not completed yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Apply the result of the request identified by `token`.
    pub fn complete<E: Display>(
        &mut self,
        token: RequestToken,
        result: Result<Vec<Suggestion>, E>,
        store: &BoardStore,
    ) -> SuggestOutcome {
        if token.0 != self.latest || !self.pending {
            tracing::debug!(token = token.0, latest = self.latest, "discarding stale suggestion response");
            return SuggestOutcome::Stale;
        }
        self.pending = false;
        match result {
            Ok(raw) => {
                let received = raw.len();
                self.suggestions = filter_suggestions(store, raw);
                tracing::debug!(received, kept = self.suggestions.len(), "suggestions applied");
                SuggestOutcome::Applied(self.suggestions.len())
            }
            Err(e) => {
                tracing::warn!(error = %e, "suggestion request failed");
                SuggestOutcome::Failed(SUGGEST_FAILURE_MESSAGE)
            }
        }
    }

    /// Suggestions currently shown.
    #[must_use]
    pub fn suggestions(&self) -> &[AiSuggestion] {
        &self.suggestions
    }

    /// Remove and return a suggestion, e.g. to accept it.
    pub fn take(&mut self, id: &str) -> Option<AiSuggestion> {
        let idx = self.suggestions.iter().position(|s| s.id == id)?;
        Some(self.suggestions.remove(idx))
    }

    /// Drop a suggestion without accepting it. Returns false if absent.
    pub fn dismiss(&mut self, id: &str) -> bool {
        self.take(id).is_some()
    }

    /// Drop every suggestion that mentions `item_id`.
    pub fn forget_item(&mut self, item_id: &str) {
        self.suggestions.retain(|s| !s.touches(item_id));
    }

    /// Drop all suggestions.
    pub fn clear(&mut self) {
        self.suggestions.clear();
    }
}
