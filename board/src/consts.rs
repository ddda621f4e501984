//! Shared numeric constants for the board crate.

use crate::camera::{Point, Size};

// ── Camera ──────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.25;

/// Largest allowed zoom factor.
pub const ZOOM_MAX: f64 = 3.0;

/// Screen pixels of content that must stay inside the viewport when panning is clamped.
pub const PAN_MARGIN_PX: f64 = 80.0;

/// Zoom change per wheel pixel when zooming with ctrl/meta held.
pub const WHEEL_ZOOM_STEP: f64 = 0.002;

// ── Hit-testing ─────────────────────────────────────────────────

/// Side of the square resize grip in the bottom-right corner, in screen pixels.
pub const RESIZE_HANDLE_PX: f64 = 12.0;

// ── Dragging and resizing ───────────────────────────────────────

/// Grid pitch that container drags snap to, in board units.
pub const GRID_SIZE: f64 = 20.0;

/// Minimum size of a person or equipment card.
pub const MIN_CARD_SIZE: Size = Size { width: 200.0, height: 44.0 };

/// Minimum size of a note, idea or task magnet.
pub const MIN_MAGNET_SIZE: Size = Size { width: 150.0, height: 80.0 };

/// Minimum size of a container or toolbar; keeps header controls usable.
pub const MIN_CONTAINER_SIZE: Size = Size { width: 380.0, height: 52.0 };

// ── Layout ──────────────────────────────────────────────────────

/// Horizontal distance between container origins after a tidy.
pub const COLUMN_SPACING: f64 = 340.0;

/// Left margin of the first tidied container.
pub const COLUMN_MARGIN_X: f64 = 20.0;

/// Row that tidied containers sit on.
pub const COLUMN_ROW_Y: f64 = 120.0;

/// Where toolbars go after a tidy.
pub const TOOLBAR_POSITION: Point = Point { x: 20.0, y: 20.0 };

/// Where freshly created containers appear.
pub const NEW_CONTAINER_POSITION: Point = Point { x: 20.0, y: 500.0 };

/// Rendered width of a container without an explicit size.
pub const COLUMN_WIDTH: f64 = 320.0;

/// Height of a container's title header.
pub const COLUMN_HEADER_HEIGHT: f64 = 60.0;

/// Inner padding of a container body.
pub const COLUMN_PADDING: f64 = 8.0;

/// Minimum height of a container body, even when empty.
pub const COLUMN_BODY_MIN_HEIGHT: f64 = 200.0;

/// Vertical gap between stacked cards.
pub const CARD_GAP: f64 = 8.0;

/// Default size of a floating magnet without an explicit size.
pub const DEFAULT_MAGNET_SIZE: Size = Size { width: 200.0, height: 120.0 };

// ── Creation ────────────────────────────────────────────────────

/// Colors handed out to new items and containers.
pub const PALETTE: [&str; 8] = ["#4CAF50", "#2196F3", "#FF9800", "#9C27B0", "#F44336", "#607D8B", "#795548", "#E91E63"];
