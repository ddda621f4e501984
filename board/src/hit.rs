//! Board-space layout and drop-target resolution.
//!
//! A [`HitIndex`] is an explicit list of rectangles derived from store state,
//! in render order: each container followed by the cards stacked inside it,
//! then floating items, then (optionally) the unassigned tray. Point queries
//! walk the list top-down.
//!
//! The index is rebuilt for each query that needs it. Boards hold tens of
//! items, so a linear scan is all that is needed.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Point, Rect, Size};
use crate::consts::{
    CARD_GAP, COLUMN_BODY_MIN_HEIGHT, COLUMN_HEADER_HEIGHT, COLUMN_PADDING, COLUMN_WIDTH, DEFAULT_MAGNET_SIZE,
    MIN_CARD_SIZE,
};
use crate::doc::{BoardStore, Container, ContainerRef, Id, Item};

/// What a rectangle in the index stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum HitKind {
    /// A container's full rendered rectangle.
    Container(ContainerRef),
    /// A card rendered inside a container's list.
    ContainedItem { item: Id, container: ContainerRef },
    /// A card rendered absolutely on the board.
    FloatingItem(Id),
    /// The unassigned tray overlay.
    Tray,
}

/// One rectangle in the index.
#[derive(Debug, Clone, PartialEq)]
pub struct HitEntry {
    pub rect: Rect,
    pub kind: HitKind,
}

/// Where a dropped item ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Assign to this container.
    Container(ContainerRef),
    /// Send to the unassigned tray.
    Unassign,
    /// Nothing droppable under the pointer; the engine decides by item kind.
    Empty,
}

/// Rendered size of an item card without an explicit size.
#[must_use]
pub fn default_item_size(item: &Item) -> Size {
    if item.kind.is_resource() {
        Size::new(COLUMN_WIDTH - COLUMN_PADDING * 2.0, MIN_CARD_SIZE.height)
    } else {
        DEFAULT_MAGNET_SIZE
    }
}

/// Rendered size of an item card.
#[must_use]
pub fn item_size(item: &Item) -> Size {
    item.size.unwrap_or_else(|| default_item_size(item))
}

/// Rendered size of a container holding `members`.
///
/// Without an explicit size the column is [`COLUMN_WIDTH`] wide and tall
/// enough for its stacked cards, never shorter than the minimum body height.
#[must_use]
pub fn container_size(container: &Container, members: &[&Item]) -> Size {
    if let Some(size) = container.size {
        return size;
    }
    let body = stacked_height(members).max(COLUMN_BODY_MIN_HEIGHT);
    Size::new(COLUMN_WIDTH, COLUMN_HEADER_HEIGHT + COLUMN_PADDING * 2.0 + body)
}

#[allow(clippy::cast_precision_loss)]
fn stacked_height(members: &[&Item]) -> f64 {
    let cards: f64 = members.iter().map(|m| item_size(m).height).sum();
    let gaps = members.len().saturating_sub(1) as f64 * CARD_GAP;
    cards + gaps
}

/// Render-ordered rectangles for everything that can be pointed at.
#[derive(Debug, Clone, Default)]
pub struct HitIndex {
    entries: Vec<HitEntry>,
}

impl HitIndex {
    /// Build the index from store state, leaving out the item `exclude`.
    ///
    /// Excluding the dragged item is how a drop sees through the card under
    /// the pointer. An excluded member still counts toward its container's
    /// height and keeps its slot, so the cards below it do not move up.
    #[must_use]
    pub fn build(store: &BoardStore, exclude: Option<&str>) -> Self {
        let mut entries = Vec::new();

        for container in store.containers() {
            let members = store.members(&container.id);
            let size = container_size(container, &members);
            let reference = container.reference();
            entries.push(HitEntry {
                rect: Rect { origin: container.position, size },
                kind: HitKind::Container(reference.clone()),
            });

            let x = container.position.x + COLUMN_PADDING;
            let mut y = container.position.y + COLUMN_HEADER_HEIGHT + COLUMN_PADDING;
            for member in members {
                let card = item_size(member);
                if exclude != Some(member.id.as_str()) {
                    entries.push(HitEntry {
                        rect: Rect { origin: Point::new(x, y), size: card },
                        kind: HitKind::ContainedItem { item: member.id.clone(), container: reference.clone() },
                    });
                }
                y += card.height + CARD_GAP;
            }
        }

        for item in store.floating() {
            if exclude == Some(item.id.as_str()) {
                continue;
            }
            if let Some(origin) = item.placement.position() {
                entries.push(HitEntry {
                    rect: Rect { origin, size: item_size(item) },
                    kind: HitKind::FloatingItem(item.id.clone()),
                });
            }
        }

        Self { entries }
    }

    /// Add the unassigned tray on top of everything, in board space.
    #[must_use]
    pub fn with_tray(mut self, tray: Rect) -> Self {
        self.entries.push(HitEntry { rect: tray, kind: HitKind::Tray });
        self
    }

    /// All entries, bottom-most first.
    #[must_use]
    pub fn entries(&self) -> &[HitEntry] {
        &self.entries
    }

    /// Entries containing `pt`, top-most first.
    pub fn hits_at(&self, pt: Point) -> impl Iterator<Item = &HitEntry> {
        self.entries.iter().rev().filter(move |e| e.rect.contains(pt))
    }

    /// The top-most entry under `pt`.
    #[must_use]
    pub fn top_at(&self, pt: Point) -> Option<&HitEntry> {
        self.hits_at(pt).next()
    }

    /// Decide where an item released at `pt` belongs.
    ///
    /// A card inside a container resolves to that container. Floating cards
    /// are see-through. The toolbar and the tray unassign; bare board is
    /// [`DropTarget::Empty`].
    #[must_use]
    pub fn resolve_drop(&self, pt: Point) -> DropTarget {
        for entry in self.hits_at(pt) {
            match &entry.kind {
                HitKind::FloatingItem(_) => {}
                HitKind::ContainedItem { container, .. } | HitKind::Container(container) => {
                    if container.kind.accepts_drops() {
                        return DropTarget::Container(container.clone());
                    }
                    return DropTarget::Unassign;
                }
                HitKind::Tray => return DropTarget::Unassign,
            }
        }
        DropTarget::Empty
    }

    /// Rendered rectangle of an item, whether contained or floating.
    #[must_use]
    pub fn item_rect(&self, id: &str) -> Option<Rect> {
        self.entries.iter().find_map(|e| match &e.kind {
            HitKind::ContainedItem { item, .. } | HitKind::FloatingItem(item) if item == id => Some(e.rect),
            _ => None,
        })
    }

    /// Rendered rectangle of a container.
    #[must_use]
    pub fn container_rect(&self, id: &str) -> Option<Rect> {
        self.entries.iter().find_map(|e| match &e.kind {
            HitKind::Container(r) if r.id == id => Some(e.rect),
            _ => None,
        })
    }

    /// Union of every container and item rectangle; `None` for an empty board.
    #[must_use]
    pub fn content_bounds(&self) -> Option<Rect> {
        self.entries
            .iter()
            .filter(|e| e.kind != HitKind::Tray)
            .map(|e| e.rect)
            .reduce(|acc, r| acc.union(&r))
    }
}
