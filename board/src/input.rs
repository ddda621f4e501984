//! Input model: modifier keys, mouse buttons, press targets, and the drag
//! session state machine.
//!
//! `PressTarget` says what the pointer went down on. `DragSession` is the
//! gesture tracked between pointer-down and pointer-up, carrying everything
//! needed to compute live positions and sizes and to commit the result on
//! release. Exactly one session exists at a time, so dragging, resizing and
//! panning can never overlap.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::{Point, Size};
use crate::doc::{Id, Placement};

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether the platform zoom modifier (ctrl or meta) is held.
    #[must_use]
    pub fn zoom(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// What the pointer went down on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressTarget {
    /// The body of an item card.
    Item(Id),
    /// The header or body of a container.
    Container(Id),
    /// An item's resize grip.
    ResizeItem(Id),
    /// A container's resize grip.
    ResizeContainer(Id),
    /// Empty board.
    Board,
}

/// The element a resize gesture applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizeTarget {
    Item(Id),
    Container(Id),
}

impl ResizeTarget {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Item(id) | Self::Container(id) => id,
        }
    }
}

/// The active pointer gesture.
///
/// Armed variants are entered on pointer-down and become the matching
/// dragging variant on the first pointer-move.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragSession {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Pointer is down on an item that has been detached to a floating position.
    ItemArmed {
        id: Id,
        /// Pointer minus item origin, in board space.
        offset: Point,
        /// Placement before the detach, restored on cancel.
        original: Placement,
    },
    /// An item is following the pointer.
    ItemDragging {
        id: Id,
        /// Pointer minus item origin, in board space.
        offset: Point,
        /// Placement before the detach, restored on cancel.
        original: Placement,
    },
    /// Pointer is down on a container.
    ContainerArmed {
        id: Id,
        /// Pointer minus container origin, in board space.
        offset: Point,
        /// Position at pointer-down, restored on cancel.
        original: Point,
    },
    /// A container is following the pointer, snapped to the grid.
    ContainerDragging {
        id: Id,
        /// Pointer minus container origin, in board space.
        offset: Point,
        /// Position at pointer-down, restored on cancel.
        original: Point,
        /// Last snapped position written to the store.
        position: Point,
    },
    /// Pointer is down on a resize grip.
    ResizeArmed {
        target: ResizeTarget,
        /// Board-space pointer position at pointer-down.
        start: Point,
        /// Rendered size at pointer-down.
        initial: Size,
        /// Size floor for this target's kind.
        min: Size,
        /// Explicit size at pointer-down, restored on cancel.
        original: Option<Size>,
    },
    /// An item or container is being resized.
    Resizing {
        target: ResizeTarget,
        /// Board-space pointer position at pointer-down.
        start: Point,
        /// Rendered size at pointer-down.
        initial: Size,
        /// Size floor for this target's kind.
        min: Size,
        /// Explicit size at pointer-down, restored on cancel.
        original: Option<Size>,
    },
    /// The board is being panned.
    Panning {
        /// Client-space position of the previous pointer event.
        last_client: Point,
    },
}

impl DragSession {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Id of the item being armed or dragged, if any.
    #[must_use]
    pub fn dragged_item(&self) -> Option<&str> {
        match self {
            Self::ItemArmed { id, .. } | Self::ItemDragging { id, .. } => Some(id),
            _ => None,
        }
    }
}
