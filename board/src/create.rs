//! Creating new items and containers from a kind and a display name.

#[cfg(test)]
#[path = "create_test.rs"]
mod create_test;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{NEW_CONTAINER_POSITION, PALETTE};
use crate::doc::{Container, ContainerKind, Item, ItemKind, Label, Placement, Role, new_id};

/// Anything the "add" control can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Person,
    Equipment,
    Note,
    Idea,
    Task,
    Vehicle,
    Team,
    Category,
}

impl ResourceKind {
    /// The item kind this creates, or `None` for containers.
    #[must_use]
    pub fn item_kind(self) -> Option<ItemKind> {
        match self {
            Self::Person => Some(ItemKind::Person),
            Self::Equipment => Some(ItemKind::Equipment),
            Self::Note => Some(ItemKind::Note),
            Self::Idea => Some(ItemKind::Idea),
            Self::Task => Some(ItemKind::Task),
            Self::Vehicle | Self::Team | Self::Category => None,
        }
    }

    /// The container kind this creates, or `None` for items.
    #[must_use]
    pub fn container_kind(self) -> Option<ContainerKind> {
        match self {
            Self::Vehicle => Some(ContainerKind::Vehicle),
            Self::Team => Some(ContainerKind::Team),
            Self::Category => Some(ContainerKind::Category),
            Self::Person | Self::Equipment | Self::Note | Self::Idea | Self::Task => None,
        }
    }

    fn id_prefix(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Equipment => "equipment",
            Self::Note => "note",
            Self::Idea => "idea",
            Self::Task => "task",
            Self::Vehicle => "vehicle",
            Self::Team => "team",
            Self::Category => "category",
        }
    }
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq)]
pub enum Created {
    Item(Item),
    Container(Container),
}

/// Pick a color from the fixed palette.
pub fn palette_color<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    PALETTE[rng.random_range(0..PALETTE.len())]
}

/// Split a name on its first run of whitespace into first and last parts.
///
/// Missing parts fall back to `"New"` and `"Resource"`.
#[must_use]
pub fn split_name(name: &str) -> (String, String) {
    let name = name.trim();
    let (first, last) = match name.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (name, ""),
    };
    let first = if first.is_empty() { "New" } else { first };
    let last = if last.is_empty() { "Resource" } else { last };
    (first.to_string(), last.to_string())
}

/// Build a new item or container. Returns `None` when `name` is blank.
///
/// Items start in the unassigned tray; containers start at a fixed spot
/// below the column row.
pub fn create_resource<R: Rng + ?Sized>(kind: ResourceKind, name: &str, rng: &mut R) -> Option<Created> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let id = new_id(kind.id_prefix());
    let color = palette_color(rng).to_string();

    if let Some(container_kind) = kind.container_kind() {
        return Some(Created::Container(Container {
            id,
            kind: container_kind,
            name: name.to_string(),
            color,
            position: NEW_CONTAINER_POSITION,
            size: None,
        }));
    }

    let item_kind = kind.item_kind()?;
    let label = if item_kind.is_resource() {
        let (first_name, last_name) = split_name(name);
        Label::Person { first_name, last_name }
    } else {
        Label::Text { title: name.to_string(), content: None }
    };
    Some(Created::Item(Item {
        id,
        kind: item_kind,
        label,
        color,
        skills: Vec::new(),
        role: Role::Member,
        placement: Placement::Unassigned,
        size: None,
    }))
}
