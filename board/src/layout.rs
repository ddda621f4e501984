//! Tidy: deterministic re-grid of containers.
//!
//! Drop containers go on a single row, vehicles first, then teams, then
//! categories, each group in store order. Toolbars go to a fixed corner.
//! Every item loses its explicit size, and floating items return to the
//! unassigned tray so the board reads as columns again.
//!
//! Running tidy on an already tidy board changes nothing.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::camera::Point;
use crate::consts::{COLUMN_MARGIN_X, COLUMN_ROW_Y, COLUMN_SPACING, TOOLBAR_POSITION};
use crate::doc::{BoardStore, Container, ContainerKind, ContainerPatch, Id, ItemPatch, Placement};

/// Edits made by a tidy pass. Only entities that actually changed are listed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TidyChanges {
    pub containers: Vec<(Id, ContainerPatch)>,
    pub items: Vec<(Id, ItemPatch)>,
}

impl TidyChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty() && self.items.is_empty()
    }
}

const COLUMN_ORDER: [ContainerKind; 3] = [ContainerKind::Vehicle, ContainerKind::Team, ContainerKind::Category];

/// Target position of every container, in store order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn column_positions(containers: &[Container]) -> Vec<(Id, Point)> {
    let mut placed: Vec<(Id, Point)> = Vec::with_capacity(containers.len());
    let mut column = 0usize;
    for kind in COLUMN_ORDER {
        for c in containers.iter().filter(|c| c.kind == kind) {
            let x = column as f64 * COLUMN_SPACING + COLUMN_MARGIN_X;
            placed.push((c.id.clone(), Point::new(x, COLUMN_ROW_Y)));
            column += 1;
        }
    }
    for c in containers.iter().filter(|c| c.kind == ContainerKind::Toolbar) {
        placed.push((c.id.clone(), TOOLBAR_POSITION));
    }
    // Back to store order.
    containers
        .iter()
        .filter_map(|c| placed.iter().find(|(id, _)| *id == c.id).cloned())
        .collect()
}

/// Re-grid containers and reset items. Returns what changed.
pub fn tidy(store: &mut BoardStore) -> TidyChanges {
    let mut changes = TidyChanges::default();

    for (id, position) in column_positions(store.containers()) {
        let moved = store.container(&id).is_some_and(|c| c.position != position);
        if moved {
            let patch = ContainerPatch::position(position);
            store.apply_container_patch(&id, &patch);
            changes.containers.push((id, patch));
        }
    }

    let mut item_edits: Vec<(Id, ItemPatch)> = Vec::new();
    for item in store.items() {
        let mut patch = ItemPatch::default();
        if item.size.is_some() {
            patch.size = Some(None);
        }
        if item.placement.position().is_some() {
            patch.placement = Some(Placement::Unassigned);
        }
        if patch != ItemPatch::default() {
            item_edits.push((item.id.clone(), patch));
        }
    }
    for (id, patch) in item_edits {
        store.apply_item_patch(&id, &patch);
        changes.items.push((id, patch));
    }

    tracing::debug!(
        containers = changes.containers.len(),
        items = changes.items.len(),
        "tidy applied"
    );
    changes
}
