//! Board-space geometry and the pan/zoom camera.
//!
//! Two coordinate spaces exist. *Client* space is the host viewport in CSS
//! pixels, as reported by pointer events. *Board* space is the logical space
//! that item and container positions are stored in. [`Camera::client_to_board`]
//! is the one inverse transform used for offset capture, drag moves, resize
//! deltas and drop hit-testing; [`Camera::board_to_client`] is its forward
//! counterpart used for rendering.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{PAN_MARGIN_PX, ZOOM_MAX, ZOOM_MIN};

/// A point in either client or board space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise `self - other`.
    #[must_use]
    pub fn minus(self, other: Point) -> Point {
        Point { x: self.x - other.x, y: self.y - other.y }
    }

    /// Component-wise `self + other`.
    #[must_use]
    pub fn plus(self, other: Point) -> Point {
        Point { x: self.x + other.x, y: self.y + other.y }
    }
}

/// Width and height of a rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Grow or shrink by `delta`, never going below `floor` on either axis.
    #[must_use]
    pub fn grown_by(self, delta: Point, floor: Size) -> Size {
        Size {
            width: (self.width + delta.x).max(floor.width),
            height: (self.height + delta.y).max(floor.height),
        }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { origin: Point { x, y }, size: Size { width, height } }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Half-open containment: the left/top edges are inside, right/bottom are not.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.origin.x && pt.x < self.right() && pt.y >= self.origin.y && pt.y < self.bottom()
    }

    /// Smallest rectangle covering both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.origin.x.min(other.origin.x);
        let y = self.origin.y.min(other.origin.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }
}

/// Camera state for pan/zoom on the board.
///
/// `pan_x` / `pan_y` are in CSS pixels relative to the board element.
/// `zoom` is a scale factor (1.0 = no zoom), kept within [`ZOOM_MIN`]..=[`ZOOM_MAX`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a point relative to the board element (CSS pixels) to board coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a board point to coordinates relative to the board element (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a viewport point to board space, given the board element's top-left corner.
    #[must_use]
    pub fn client_to_board(&self, client: Point, origin: Point) -> Point {
        self.screen_to_world(client.minus(origin))
    }

    /// Convert a board point to viewport coordinates, given the board element's top-left corner.
    #[must_use]
    pub fn board_to_client(&self, board: Point, origin: Point) -> Point {
        self.world_to_screen(board).plus(origin)
    }

    /// Convert a screen-space distance (pixels) to a board-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Set the zoom factor, clamped to the allowed range. Non-finite input is ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = clamp_zoom(zoom);
        }
    }

    /// Zoom to `zoom` while keeping the board point under `anchor` (board-element pixels) fixed.
    pub fn zoom_at(&mut self, anchor: Point, zoom: f64) {
        let before = self.screen_to_world(anchor);
        self.set_zoom(zoom);
        self.pan_x = anchor.x - before.x * self.zoom;
        self.pan_y = anchor.y - before.y * self.zoom;
    }

    /// Shift the pan offset by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Keep at least [`PAN_MARGIN_PX`] of `content` (board space) inside a viewport of `viewport` pixels.
    ///
    /// When the viewport is too small to satisfy both edges the pan settles midway.
    pub fn clamp_pan(&mut self, content: &Rect, viewport: Size) {
        self.pan_x = clamp_axis(
            self.pan_x,
            PAN_MARGIN_PX - content.right() * self.zoom,
            viewport.width - PAN_MARGIN_PX - content.origin.x * self.zoom,
        );
        self.pan_y = clamp_axis(
            self.pan_y,
            PAN_MARGIN_PX - content.bottom() * self.zoom,
            viewport.height - PAN_MARGIN_PX - content.origin.y * self.zoom,
        );
    }
}

/// Clamp a zoom factor into [`ZOOM_MIN`]..=[`ZOOM_MAX`].
#[must_use]
pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(ZOOM_MIN, ZOOM_MAX)
}

fn clamp_axis(value: f64, lo: f64, hi: f64) -> f64 {
    if lo > hi {
        return (lo + hi) * 0.5;
    }
    value.max(lo).min(hi)
}
