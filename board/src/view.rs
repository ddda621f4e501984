//! Per-board view preferences (zoom and pan) in host key-value storage.
//!
//! Values live under `magnetflow:view:{board_id}` as
//! `{"zoom":1.0,"pan":{"x":0.0,"y":0.0}}`. They are a convenience only: a
//! missing or malformed value just means the default view, and a failed
//! write is logged and otherwise ignored.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, Point, clamp_zoom};

/// Persisted zoom and pan for one board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub zoom: f64,
    pub pan: Point,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { zoom: 1.0, pan: Point::default() }
    }
}

impl ViewState {
    #[must_use]
    pub fn from_camera(camera: &Camera) -> Self {
        Self { zoom: camera.zoom, pan: Point::new(camera.pan_x, camera.pan_y) }
    }

    #[must_use]
    pub fn to_camera(self) -> Camera {
        Camera { pan_x: self.pan.x, pan_y: self.pan.y, zoom: clamp_zoom(self.zoom) }
    }
}

/// Errors while reading or writing view preferences.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("view storage failed: {0}")]
    Storage(String),
    #[error("view state could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Host-provided string key-value storage (browser local storage, a file, a map).
pub trait ViewStorage {
    /// Read a value. `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Storage`] when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, ViewError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Storage`] when the backend rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), ViewError>;
}

/// In-memory storage, for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ViewStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ViewError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ViewError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage key for a board's view.
#[must_use]
pub fn view_key(board_id: &str) -> String {
    format!("magnetflow:view:{board_id}")
}

/// Read a board's saved view. Missing, unreadable, malformed or non-finite
/// values all yield `None`. A stored zoom outside the allowed range is clamped.
pub fn load_view(storage: &dyn ViewStorage, board_id: &str) -> Option<ViewState> {
    let key = view_key(board_id);
    let raw = match storage.get(&key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::debug!(key = %key, error = %e, "view storage read failed");
            return None;
        }
    };
    let view: ViewState = match serde_json::from_str(&raw) {
        Ok(view) => view,
        Err(e) => {
            tracing::debug!(key = %key, error = %e, "ignoring malformed view state");
            return None;
        }
    };
    if !(view.zoom.is_finite() && view.pan.x.is_finite() && view.pan.y.is_finite()) {
        tracing::debug!(key = %key, "ignoring non-finite view state");
        return None;
    }
    Some(ViewState { zoom: clamp_zoom(view.zoom), pan: view.pan })
}

/// Write a board's view.
///
/// # Errors
///
/// Returns [`ViewError`] if encoding or the storage write fails.
pub fn save_view(storage: &mut dyn ViewStorage, board_id: &str, view: ViewState) -> Result<(), ViewError> {
    let encoded = serde_json::to_string(&view)?;
    storage.set(&view_key(board_id), &encoded)
}
