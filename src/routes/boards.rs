//! Seed board catalog routes.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::Json;
use board::doc::BoardSnapshot;
use board::seed::{self, BoardInfo};

/// `GET /api/boards` — list the boards the service can seed.
pub async fn list_boards() -> Json<&'static [BoardInfo]> {
    Json(seed::catalog())
}

/// `GET /api/boards/{id}` — initial content of one board.
pub async fn get_board(Path(board_id): Path<String>) -> Result<Json<BoardSnapshot>, StatusCode> {
    seed::seed_board(&board_id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
#[path = "boards_test.rs"]
mod tests;
