//! Built-in boards: the catalog, the rescue roster, and starter layouts.
//!
//! Container positions come from the same column layout that tidy uses, so a
//! freshly seeded board is already tidy.

#[cfg(test)]
#[path = "seed_test.rs"]
mod seed_test;

use serde::Serialize;

use crate::camera::Point;
use crate::consts::PALETTE;
use crate::doc::{BoardSnapshot, Container, ContainerKind, ContainerRef, Item, ItemKind, Label, Placement, Role};
use crate::layout::column_positions;

/// Which board component a board renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardVariant {
    /// Mountain rescue: people and equipment assigned to vehicles and teams.
    Rescue,
    /// Notes, ideas and tasks sorted into categories.
    Generic,
}

/// Catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoardInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub variant: BoardVariant,
}

/// A rescue skill badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Skill {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
}

const CATALOG: [BoardInfo; 5] = [
    BoardInfo { id: "mrt-board", name: "Mountain Rescue Team", variant: BoardVariant::Rescue },
    BoardInfo { id: "cumbria", name: "Cumbria MRT", variant: BoardVariant::Rescue },
    BoardInfo { id: "inspiration", name: "Inspiration", variant: BoardVariant::Generic },
    BoardInfo { id: "personal", name: "Personal", variant: BoardVariant::Generic },
    BoardInfo { id: "work", name: "Work", variant: BoardVariant::Generic },
];

const SKILLS: [Skill; 4] = [
    Skill { id: "skill-1", name: "First Aid", color: "#4CAF50" },
    Skill { id: "skill-2", name: "Rope Rescue", color: "#F44336" },
    Skill { id: "skill-3", name: "Water Rescue", color: "#2196F3" },
    Skill { id: "skill-4", name: "Navigation", color: "#FFC107" },
];

const VEHICLES: [(&str, &str, &str); 4] =
    [("dm1", "DM1", "#D32F2F"), ("dm2", "DM2", "#FFC107"), ("dm3", "DM3", "#303F9F"), ("sarda", "SARDA", "#E91E63")];

struct Member {
    id: &'static str,
    first: &'static str,
    last: &'static str,
    skills: &'static [&'static str],
    vehicle: Option<&'static str>,
    role: Role,
}

const fn member(
    id: &'static str,
    first: &'static str,
    last: &'static str,
    skills: &'static [&'static str],
    vehicle: Option<&'static str>,
    role: Role,
) -> Member {
    Member { id, first, last, skills, vehicle, role }
}

const ROSTER: [Member; 17] = [
    member("mem-1", "Emma", "Seery", &["skill-1", "skill-2", "skill-3"], Some("dm1"), Role::Member),
    member("mem-2", "Peter", "Kay", &["skill-1", "skill-3"], Some("dm1"), Role::Driver),
    member("mem-3", "Paddy", "Gannon", &["skill-4", "skill-1", "skill-2"], Some("dm1"), Role::Member),
    member("mem-4", "Ellie", "Fidler", &[], Some("dm1"), Role::Member),
    member("mem-5", "Ollie", "Parsons", &["skill-1", "skill-3"], Some("dm2"), Role::Member),
    member("mem-6", "Andy", "Chapman Gibbs", &[], Some("dm2"), Role::Member),
    member("mem-7", "Dan", "King", &[], Some("dm2"), Role::Member),
    member("mem-8", "Craig", "Stangroom", &[], Some("dm2"), Role::Driver),
    member("mem-9", "Rob", "McClymont", &["skill-1", "skill-3", "skill-2"], Some("dm2"), Role::Leader),
    member("mem-10", "Kev", "Brooks", &["skill-1", "skill-2", "skill-3"], Some("dm3"), Role::Member),
    member("mem-11", "Gary", "Lingard", &["skill-1", "skill-2"], Some("dm3"), Role::Member),
    member("mem-12", "Tom", "Ferrero", &["skill-1"], Some("dm3"), Role::Leader),
    member("mem-13", "John", "Evanson", &[], Some("dm3"), Role::Member),
    member("mem-14", "Tom", "Cox", &["skill-1", "skill-2", "skill-3"], Some("sarda"), Role::Member),
    member("mem-15", "Ryan", "Richards", &[], Some("sarda"), Role::Leader),
    member("mem-16", "Michelle", "Green", &["skill-4"], None, Role::Member),
    member("mem-17", "Ben", "Higgins", &["skill-1", "skill-4"], None, Role::Driver),
];

/// Every built-in board.
#[must_use]
pub fn catalog() -> &'static [BoardInfo] {
    &CATALOG
}

/// Look up a catalog entry.
#[must_use]
pub fn board_info(id: &str) -> Option<BoardInfo> {
    CATALOG.iter().find(|b| b.id == id).copied()
}

/// The rescue skill catalog.
#[must_use]
pub fn skills() -> &'static [Skill] {
    &SKILLS
}

/// Starter content for a built-in board, or `None` for an unknown id.
#[must_use]
pub fn seed_board(id: &str) -> Option<BoardSnapshot> {
    let snapshot = match id {
        "mrt-board" => rescue_board(true),
        "cumbria" => rescue_board(false),
        "inspiration" => generic_board(&["Ideas", "Research", "Moodboard"], "Collect anything that sparks an idea"),
        "personal" => generic_board(&["To Do", "Doing", "Done"], "Plan the week"),
        "work" => generic_board(&["Backlog", "In Progress", "Review", "Done"], "Sprint goals"),
        _ => return None,
    };
    Some(snapshot)
}

fn vehicle_ref(id: &str) -> ContainerRef {
    ContainerRef { kind: ContainerKind::Vehicle, id: id.to_string() }
}

fn rescue_board(with_roster: bool) -> BoardSnapshot {
    let containers = VEHICLES
        .iter()
        .map(|(id, name, color)| Container {
            id: (*id).to_string(),
            kind: ContainerKind::Vehicle,
            name: (*name).to_string(),
            color: (*color).to_string(),
            position: Point::default(),
            size: None,
        })
        .collect();

    let items = if with_roster {
        ROSTER
            .iter()
            .map(|m| Item {
                id: m.id.to_string(),
                kind: ItemKind::Person,
                label: Label::Person { first_name: m.first.to_string(), last_name: m.last.to_string() },
                color: "#FFFFFF".to_string(),
                skills: m.skills.iter().map(|s| (*s).to_string()).collect(),
                role: m.role,
                placement: m.vehicle.map_or(Placement::Unassigned, |v| Placement::Contained(vehicle_ref(v))),
                size: None,
            })
            .collect()
    } else {
        Vec::new()
    };

    laid_out(BoardSnapshot { items, containers, connections: Vec::new() })
}

fn generic_board(categories: &[&str], welcome: &str) -> BoardSnapshot {
    let containers = categories
        .iter()
        .enumerate()
        .map(|(i, name)| Container {
            id: format!("cat-{}", i + 1),
            kind: ContainerKind::Category,
            name: (*name).to_string(),
            color: PALETTE[i % PALETTE.len()].to_string(),
            position: Point::default(),
            size: None,
        })
        .collect();
    let items = vec![Item {
        id: "note-1".to_string(),
        kind: ItemKind::Note,
        label: Label::Text { title: welcome.to_string(), content: None },
        color: PALETTE[0].to_string(),
        skills: Vec::new(),
        role: Role::Member,
        placement: Placement::Unassigned,
        size: None,
    }];
    laid_out(BoardSnapshot { items, containers, connections: Vec::new() })
}

fn laid_out(mut snapshot: BoardSnapshot) -> BoardSnapshot {
    let positions = column_positions(&snapshot.containers);
    for (container, (_, position)) in snapshot.containers.iter_mut().zip(positions) {
        container.position = position;
    }
    snapshot
}
