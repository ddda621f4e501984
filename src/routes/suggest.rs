//! AI connection suggestion route.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{Json, Response};
use board::suggest::{SuggestConnectionsRequest, Suggestion};

use crate::error::error_response;
use crate::services::suggest::{self, SuggestError};
use crate::state::AppState;

/// `POST /api/suggest-connections` — propose links between magnets.
pub async fn suggest_connections(
    State(state): State<AppState>,
    payload: Result<Json<SuggestConnectionsRequest>, JsonRejection>,
) -> Result<Json<Vec<Suggestion>>, Response> {
    let Json(request) = payload.map_err(|rejection| {
        let err = SuggestError::InvalidInput(rejection.body_text());
        error_response(StatusCode::BAD_REQUEST, &err)
    })?;
    let Some(llm) = state.llm.as_deref() else {
        return Err(error_response(suggest_error_to_status(&SuggestError::NotConfigured), &SuggestError::NotConfigured));
    };

    match suggest::suggest_connections(llm, &request, state.limits).await {
        Ok(suggestions) => Ok(Json(suggestions)),
        Err(e) => {
            tracing::warn!(error = %e, magnets = request.magnets.len(), "suggest-connections failed");
            Err(error_response(suggest_error_to_status(&e), &e))
        }
    }
}

pub(crate) fn suggest_error_to_status(err: &SuggestError) -> StatusCode {
    match err {
        SuggestError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        SuggestError::Llm(_) | SuggestError::Schema(_) => StatusCode::BAD_GATEWAY,
        SuggestError::InvalidInput(_) => StatusCode::BAD_REQUEST,
    }
}

#[cfg(test)]
#[path = "suggest_test.rs"]
mod tests;
