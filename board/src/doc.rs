//! Document model: items, containers, connections, and the in-memory store.
//!
//! This module defines what lives on a board (`Item`, `Container`,
//! `Connection`), the sparse-update types used for incremental edits
//! (`ItemPatch`, `ContainerPatch`), and the store that owns all live state
//! (`BoardStore`).
//!
//! DESIGN
//! ======
//! An item's relationship to the board is a single [`Placement`] value: it is
//! either inside a container, floating at a board-space point, or sitting in
//! the unassigned tray. There is no way to express "inside a container *and*
//! floating". Container membership is derived by filtering items, so a
//! container never holds a list that can drift out of sync.
//!
//! Collections are kept as ordered vectors. Store order is render order and
//! also the order used by tidy and by suggestion requests.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::camera::{Point, Size};
use crate::consts::{MIN_CARD_SIZE, MIN_CONTAINER_SIZE, MIN_MAGNET_SIZE};

/// Identifier of an item, container or connection. Always `{prefix}-{uuid}`
/// for generated ids; seed data uses short readable ids.
pub type Id = String;

/// Generate a fresh id with the given prefix.
#[must_use]
pub fn new_id(prefix: &str) -> Id {
    format!("{prefix}-{}", Uuid::new_v4())
}

// =============================================================
// Kinds
// =============================================================

/// The kind of a draggable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A rescue team member.
    Person,
    /// A piece of rescue equipment.
    Equipment,
    /// Free-form note magnet.
    Note,
    /// Idea magnet.
    Idea,
    /// Task magnet.
    Task,
}

impl ItemKind {
    /// Whether this kind is labelled with a first/last name pair.
    #[must_use]
    pub fn is_resource(self) -> bool {
        matches!(self, Self::Person | Self::Equipment)
    }

    /// Smallest size a resize may shrink this kind of item to.
    #[must_use]
    pub fn min_size(self) -> Size {
        if self.is_resource() { MIN_CARD_SIZE } else { MIN_MAGNET_SIZE }
    }

    /// Ordering used by the unassigned tray: people, then equipment, then magnets.
    #[must_use]
    pub fn tray_rank(self) -> u8 {
        match self {
            Self::Person => 0,
            Self::Equipment => 1,
            Self::Note | Self::Idea | Self::Task => 2,
        }
    }
}

/// The kind of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    Vehicle,
    Team,
    Category,
    /// Decorative header strip; never accepts drops.
    Toolbar,
}

impl ContainerKind {
    /// Whether dropping an item on this container assigns it there.
    #[must_use]
    pub fn accepts_drops(self) -> bool {
        !matches!(self, Self::Toolbar)
    }

    /// Smallest size a resize may shrink this kind of container to.
    #[must_use]
    pub fn min_size(self) -> Size {
        MIN_CONTAINER_SIZE
    }
}

// =============================================================
// Items
// =============================================================

/// Reference from an item to the container that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerRef {
    pub kind: ContainerKind,
    pub id: Id,
}

/// Where an item currently lives.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Placement {
    /// Rendered inside a container's list.
    Contained(ContainerRef),
    /// Rendered absolutely at a board-space point.
    Floating(Point),
    /// Shown in the unassigned tray.
    #[default]
    Unassigned,
}

impl Placement {
    /// The container holding the item, if any.
    #[must_use]
    pub fn container(&self) -> Option<&ContainerRef> {
        match self {
            Self::Contained(r) => Some(r),
            _ => None,
        }
    }

    /// The floating position, if any.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Floating(p) => Some(*p),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        matches!(self, Self::Unassigned)
    }
}

/// Display fields of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Label {
    /// People and equipment: a first/last name pair.
    Person { first_name: String, last_name: String },
    /// Notes, ideas and tasks: a title with optional body text.
    Text {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
}

impl Label {
    /// Single-line text shown on the card and sent to the suggestion service.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Person { first_name, last_name } => format!("{first_name} {last_name}").trim().to_string(),
            Self::Text { title, .. } => title.clone(),
        }
    }
}

/// Role of a rescue team member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    #[serde(rename = "default")]
    Member,
    Driver,
    Leader,
}

/// A draggable card on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Id,
    pub kind: ItemKind,
    pub label: Label,
    /// CSS color string.
    pub color: String,
    /// Skill ids from the board's skill catalog.
    #[serde(default)]
    pub skills: Vec<Id>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub placement: Placement,
    /// Explicit size from a resize; `None` renders at the default size.
    #[serde(default)]
    pub size: Option<Size>,
}

impl Item {
    #[must_use]
    pub fn display_text(&self) -> String {
        self.label.display_text()
    }
}

// =============================================================
// Containers and connections
// =============================================================

/// A column that items can be dropped into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: Id,
    pub kind: ContainerKind,
    pub name: String,
    pub color: String,
    /// Top-left corner in board space.
    pub position: Point,
    /// Explicit size from a resize; `None` auto-sizes to the member list.
    #[serde(default)]
    pub size: Option<Size>,
}

impl Container {
    /// Reference used by items placed into this container.
    #[must_use]
    pub fn reference(&self) -> ContainerRef {
        ContainerRef { kind: self.kind, id: self.id.clone() }
    }
}

/// A user-drawn or accepted link between two items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: Id,
    pub source_id: Id,
    pub target_id: Id,
}

impl Connection {
    /// Whether this connection joins `a` and `b` in either direction.
    #[must_use]
    pub fn joins(&self, a: &str, b: &str) -> bool {
        (self.source_id == a && self.target_id == b) || (self.source_id == b && self.target_id == a)
    }

    /// Whether either end is `id`.
    #[must_use]
    pub fn touches(&self, id: &str) -> bool {
        self.source_id == id || self.target_id == id
    }
}

// =============================================================
// Patches
// =============================================================

/// Deserialize a present field (even `null`) as `Some(..)` so that a patch can
/// distinguish "leave alone" from "clear".
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Sparse update for an item. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<Id>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    /// `Some(None)` clears an explicit size.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub size: Option<Option<Size>>,
}

impl ItemPatch {
    #[must_use]
    pub fn placement(placement: Placement) -> Self {
        Self { placement: Some(placement), ..Self::default() }
    }

    #[must_use]
    pub fn size(size: Option<Size>) -> Self {
        Self { size: Some(size), ..Self::default() }
    }
}

/// Sparse update for a container. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    /// `Some(None)` clears an explicit size.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub size: Option<Option<Size>>,
}

impl ContainerPatch {
    #[must_use]
    pub fn position(position: Point) -> Self {
        Self { position: Some(position), ..Self::default() }
    }

    #[must_use]
    pub fn size(size: Option<Size>) -> Self {
        Self { size: Some(size), ..Self::default() }
    }
}

// =============================================================
// Snapshot
// =============================================================

/// Full board content, as loaded from the seed catalog or exported by a host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// Outcome of removing a container.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerRemoval {
    pub container: Container,
    /// Ids of the items that were moved to the unassigned tray, in store order.
    pub unassigned: Vec<Id>,
}

// =============================================================
// Store
// =============================================================

/// In-memory store of board content.
#[derive(Debug, Clone, Default)]
pub struct BoardStore {
    items: Vec<Item>,
    containers: Vec<Container>,
    connections: Vec<Connection>,
}

impl BoardStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        let mut store = Self::new();
        store.load_snapshot(snapshot);
        store
    }

    /// Replace all content with a snapshot.
    ///
    /// Items that reference a container missing from the snapshot are moved
    /// to the unassigned tray, and connections with a missing end are dropped.
    pub fn load_snapshot(&mut self, snapshot: BoardSnapshot) {
        let BoardSnapshot { items, containers, connections } = snapshot;
        self.containers = containers;
        self.items = items;
        for i in 0..self.items.len() {
            let dangling = self.items[i]
                .placement
                .container()
                .is_some_and(|r| self.container(&r.id).is_none());
            if dangling {
                tracing::debug!(item = %self.items[i].id, "snapshot item references missing container; unassigning");
                self.items[i].placement = Placement::Unassigned;
            }
        }
        self.connections = connections
            .into_iter()
            .filter(|c| self.item(&c.source_id).is_some() && self.item(&c.target_id).is_some())
            .collect();
    }

    /// Export all content as a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            items: self.items.clone(),
            containers: self.containers.clone(),
            connections: self.connections.clone(),
        }
    }

    // --- Items ---

    /// Insert an item, replacing any existing item with the same id in place.
    pub fn insert_item(&mut self, item: Item) {
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => *slot = item,
            None => self.items.push(item),
        }
    }

    #[must_use]
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// All items in store order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Apply a sparse update. Returns false if the item doesn't exist.
    pub fn apply_item_patch(&mut self, id: &str, patch: &ItemPatch) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return false;
        };
        if let Some(label) = &patch.label {
            item.label = label.clone();
        }
        if let Some(color) = &patch.color {
            item.color = color.clone();
        }
        if let Some(skills) = &patch.skills {
            item.skills = skills.clone();
        }
        if let Some(role) = patch.role {
            item.role = role;
        }
        if let Some(placement) = &patch.placement {
            item.placement = placement.clone();
        }
        if let Some(size) = patch.size {
            item.size = size;
        }
        true
    }

    /// Remove an item along with every connection touching it.
    pub fn remove_item(&mut self, id: &str) -> Option<Item> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        self.connections.retain(|c| !c.touches(id));
        Some(self.items.remove(idx))
    }

    /// Items held by a container: people first, then everything else, each in store order.
    #[must_use]
    pub fn members(&self, container_id: &str) -> Vec<&Item> {
        let mut members: Vec<&Item> = self
            .items
            .iter()
            .filter(|i| i.placement.container().is_some_and(|r| r.id == container_id))
            .collect();
        members.sort_by_key(|i| u8::from(i.kind != ItemKind::Person));
        members
    }

    /// Items in the unassigned tray: people, then equipment, then magnets, each in store order.
    #[must_use]
    pub fn unassigned(&self) -> Vec<&Item> {
        let mut tray: Vec<&Item> = self.items.iter().filter(|i| i.placement.is_unassigned()).collect();
        tray.sort_by_key(|i| i.kind.tray_rank());
        tray
    }

    /// Items rendered absolutely on the board, in store order.
    #[must_use]
    pub fn floating(&self) -> Vec<&Item> {
        self.items.iter().filter(|i| i.placement.position().is_some()).collect()
    }

    // --- Containers ---

    /// Insert a container, replacing any existing container with the same id in place.
    pub fn insert_container(&mut self, container: Container) {
        match self.containers.iter_mut().find(|c| c.id == container.id) {
            Some(slot) => *slot = container,
            None => self.containers.push(container),
        }
    }

    #[must_use]
    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.id == id)
    }

    /// All containers in store order.
    #[must_use]
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    /// Apply a sparse update. Returns false if the container doesn't exist.
    pub fn apply_container_patch(&mut self, id: &str, patch: &ContainerPatch) -> bool {
        let Some(container) = self.containers.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        if let Some(name) = &patch.name {
            container.name = name.clone();
        }
        if let Some(color) = &patch.color {
            container.color = color.clone();
        }
        if let Some(position) = patch.position {
            container.position = position;
        }
        if let Some(size) = patch.size {
            container.size = size;
        }
        true
    }

    /// Remove a container. Every item it held becomes unassigned.
    pub fn remove_container(&mut self, id: &str) -> Option<ContainerRemoval> {
        let idx = self.containers.iter().position(|c| c.id == id)?;
        let container = self.containers.remove(idx);
        let mut unassigned = Vec::new();
        for item in &mut self.items {
            if item.placement.container().is_some_and(|r| r.id == id) {
                item.placement = Placement::Unassigned;
                unassigned.push(item.id.clone());
            }
        }
        Some(ContainerRemoval { container, unassigned })
    }

    // --- Connections ---

    /// All connections in store order.
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Link two items. Returns `None` for self-links, unknown items, or a pair
    /// that is already linked in either direction.
    pub fn add_connection(&mut self, source_id: &str, target_id: &str) -> Option<Connection> {
        self.add_connection_with_id(new_id("conn"), source_id, target_id)
    }

    /// Like [`BoardStore::add_connection`] with a caller-chosen id.
    pub fn add_connection_with_id(&mut self, id: Id, source_id: &str, target_id: &str) -> Option<Connection> {
        if source_id == target_id || self.item(source_id).is_none() || self.item(target_id).is_none() {
            return None;
        }
        if self.connections.iter().any(|c| c.joins(source_id, target_id)) {
            return None;
        }
        let connection = Connection { id, source_id: source_id.to_string(), target_id: target_id.to_string() };
        self.connections.push(connection.clone());
        Some(connection)
    }

    /// Remove a connection by id. Returns false if it doesn't exist.
    pub fn remove_connection(&mut self, id: &str) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c.id != id);
        self.connections.len() != before
    }

    /// Number of items currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the store holds no items and no containers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.containers.is_empty()
    }
}
