#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::consts::{
    COLUMN_BODY_MIN_HEIGHT, COLUMN_HEADER_HEIGHT, COLUMN_PADDING, MIN_CARD_SIZE, MIN_CONTAINER_SIZE, MIN_MAGNET_SIZE, ZOOM_MAX,
};
use crate::doc::{ContainerKind, ContainerRef, ItemKind, Label, Role};
use crate::seed::seed_board;
use crate::suggest::SUGGEST_FAILURE_MESSAGE;
use crate::view::MemoryStorage;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn vehicle(id: &str, x: f64) -> Container {
    Container {
        id: id.to_string(),
        kind: ContainerKind::Vehicle,
        name: id.to_uppercase(),
        color: "#D32F2F".into(),
        position: pt(x, 120.0),
        size: None,
    }
}

fn vehicle_ref(id: &str) -> ContainerRef {
    ContainerRef { kind: ContainerKind::Vehicle, id: id.to_string() }
}

fn person(id: &str, placement: Placement) -> Item {
    Item {
        id: id.to_string(),
        kind: ItemKind::Person,
        label: Label::Person { first_name: "Sam".into(), last_name: id.into() },
        color: "#fff".into(),
        skills: Vec::new(),
        role: Role::Member,
        placement,
        size: None,
    }
}

fn note(id: &str, placement: Placement) -> Item {
    Item {
        id: id.to_string(),
        kind: ItemKind::Note,
        label: Label::Text { title: format!("note {id}"), content: None },
        color: "#fff".into(),
        skills: Vec::new(),
        role: Role::Member,
        placement,
        size: None,
    }
}

/// dm1 at (20,120) holding `a` and `b`, dm2 at (360,120) holding `c`,
/// `u` in the tray, `n` floating at (800,500).
fn engine() -> EngineCore {
    let snapshot = BoardSnapshot {
        containers: vec![vehicle("dm1", 20.0), vehicle("dm2", 360.0)],
        items: vec![
            person("a", Placement::Contained(vehicle_ref("dm1"))),
            person("b", Placement::Contained(vehicle_ref("dm1"))),
            person("c", Placement::Contained(vehicle_ref("dm2"))),
            person("u", Placement::Unassigned),
            note("n", Placement::Floating(pt(800.0, 500.0))),
        ],
        connections: Vec::new(),
    };
    let mut core = EngineCore::with_snapshot(snapshot);
    core.set_viewport(pt(0.0, 0.0), Size::new(1200.0, 800.0));
    core
}

/// dm1 at (20,120) holding five people, taller than the minimum column body.
fn full_column() -> EngineCore {
    let items = ["p0", "p1", "p2", "p3", "p4"]
        .iter()
        .map(|id| person(id, Placement::Contained(vehicle_ref("dm1"))))
        .collect();
    let snapshot = BoardSnapshot { containers: vec![vehicle("dm1", 20.0)], items, connections: Vec::new() };
    let mut core = EngineCore::with_snapshot(snapshot);
    core.set_viewport(pt(0.0, 0.0), Size::new(1200.0, 800.0));
    core
}

/// A point just above the bottom edge of `id`'s card, clear of its grip.
fn low_on_card(core: &EngineCore, id: &str) -> Point {
    let card = core.hit_index(None).item_rect(id).unwrap();
    pt(card.origin.x + 10.0, card.bottom() - 2.0)
}

fn placement(core: &EngineCore, id: &str) -> Placement {
    core.item(id).unwrap().placement.clone()
}

/// Client point of the first card slot in dm1 at zoom 1, no pan.
fn first_slot() -> Point {
    pt(20.0 + COLUMN_PADDING + 12.0, 120.0 + COLUMN_HEADER_HEIGHT + COLUMN_PADDING + 12.0)
}

fn has_render(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::RenderNeeded))
}

// =============================================================
// Snapping
// =============================================================

#[test]
fn snap_rounds_half_up() {
    assert_eq!(snap_to_grid(pt(29.0, 30.0)), pt(20.0, 40.0));
    assert_eq!(snap_to_grid(pt(-30.0, -31.0)), pt(-20.0, -40.0));
    assert_eq!(snap_to_grid(pt(40.0, 0.0)), pt(40.0, 0.0));
}

// =============================================================
// Item drag
// =============================================================

#[test]
fn arming_contained_item_detaches_once() {
    let mut core = engine();
    let actions = core.on_pointer_down(first_slot(), PressTarget::Item("a".into()), Button::Primary);

    let slot_origin = pt(20.0 + COLUMN_PADDING, 120.0 + COLUMN_HEADER_HEIGHT + COLUMN_PADDING);
    assert_eq!(placement(&core, "a"), Placement::Floating(slot_origin));
    assert_eq!(
        actions[0],
        Action::ItemUpdated { id: "a".into(), patch: ItemPatch::placement(Placement::Floating(slot_origin)) }
    );
    assert!(matches!(core.session, DragSession::ItemArmed { ref id, offset, .. } if id == "a" && offset == pt(12.0, 12.0)));

    // Moving keeps the captured offset; no second detach.
    let moves = core.on_pointer_move(pt(500.0, 300.0));
    assert_eq!(placement(&core, "a"), Placement::Floating(pt(488.0, 288.0)));
    assert_eq!(moves.len(), 2);
    assert!(matches!(core.session, DragSession::ItemDragging { .. }));
}

#[test]
fn arming_floating_item_does_not_move_it() {
    let mut core = engine();
    let actions = core.on_pointer_down(pt(810.0, 520.0), PressTarget::Item("n".into()), Button::Primary);
    assert!(actions.is_empty());
    assert_eq!(placement(&core, "n"), Placement::Floating(pt(800.0, 500.0)));
}

#[test]
fn drag_from_dm1_to_dm2() {
    let mut core = engine();
    core.on_pointer_down(first_slot(), PressTarget::Item("a".into()), Button::Primary);
    core.on_pointer_move(pt(300.0, 250.0));
    core.on_pointer_move(pt(420.0, 260.0));
    let actions = core.on_pointer_up(pt(420.0, 260.0));

    assert_eq!(placement(&core, "a"), Placement::Contained(vehicle_ref("dm2")));
    assert!(core.session.is_idle());
    assert!(has_render(&actions));
}

#[test]
fn drop_on_dm1_under_pan_and_zoom() {
    let mut core = engine();
    core.set_viewport(pt(10.0, 20.0), Size::new(1200.0, 800.0));
    core.camera = Camera { pan_x: 100.0, pan_y: 50.0, zoom: 2.0 };

    // Board (100, 200) is inside dm1.
    let target = core.board_to_client(pt(100.0, 200.0));
    assert_eq!(target, pt(310.0, 470.0));

    core.on_pointer_down(core.board_to_client(pt(810.0, 510.0)), PressTarget::Item("n".into()), Button::Primary);
    core.on_pointer_move(target);
    core.on_pointer_up(target);
    assert_eq!(placement(&core, "n"), Placement::Contained(vehicle_ref("dm1")));
}

#[test]
fn drop_on_empty_board_unassigns() {
    let mut core = engine();
    core.on_pointer_down(first_slot(), PressTarget::Item("a".into()), Button::Primary);
    core.on_pointer_move(pt(1000.0, 50.0));
    core.on_pointer_up(pt(1000.0, 50.0));
    assert_eq!(placement(&core, "a"), Placement::Unassigned);
    assert!(core.session.is_idle());
}

#[test]
fn drop_on_contained_card_joins_its_container() {
    let mut core = engine();
    let c_slot = pt(360.0 + COLUMN_PADDING + 5.0, 120.0 + COLUMN_HEADER_HEIGHT + COLUMN_PADDING + 5.0);
    core.on_pointer_down(pt(810.0, 510.0), PressTarget::Item("n".into()), Button::Primary);
    core.on_pointer_move(c_slot);
    core.on_pointer_up(c_slot);
    assert_eq!(placement(&core, "n"), Placement::Contained(vehicle_ref("dm2")));
}

#[test]
fn drop_on_tray_unassigns_even_over_a_container() {
    let mut core = engine();
    core.set_tray(Some(Rect::new(0.0, 150.0, 400.0, 100.0)));
    core.on_pointer_down(pt(810.0, 510.0), PressTarget::Item("n".into()), Button::Primary);
    core.on_pointer_move(pt(100.0, 200.0));
    core.on_pointer_up(pt(100.0, 200.0));
    assert_eq!(placement(&core, "n"), Placement::Unassigned);
}

#[test]
fn click_without_move_keeps_item_in_its_container() {
    let mut core = engine();
    core.on_pointer_down(first_slot(), PressTarget::Item("a".into()), Button::Primary);
    core.on_pointer_up(first_slot());
    assert_eq!(placement(&core, "a"), Placement::Contained(vehicle_ref("dm1")));
    assert!(core.session.is_idle());
}

#[test]
fn click_on_bottom_card_of_full_column_keeps_it() {
    let mut core = full_column();
    let column = core.hit_index(None).container_rect("dm1").unwrap();
    assert!(column.size.height > COLUMN_HEADER_HEIGHT + COLUMN_PADDING * 2.0 + COLUMN_BODY_MIN_HEIGHT);

    let press = low_on_card(&core, "p4");
    assert_eq!(core.target_at(press), PressTarget::Item("p4".into()));
    core.on_pointer_down(press, PressTarget::Item("p4".into()), Button::Primary);
    core.on_pointer_up(press);
    assert_eq!(placement(&core, "p4"), Placement::Contained(vehicle_ref("dm1")));
}

#[test]
fn short_drag_within_bottom_slot_keeps_it() {
    let mut core = full_column();
    let press = low_on_card(&core, "p4");
    let release = pt(press.x + 6.0, press.y - 3.0);
    core.on_pointer_down(press, PressTarget::Item("p4".into()), Button::Primary);
    core.on_pointer_move(release);
    core.on_pointer_up(release);
    assert_eq!(placement(&core, "p4"), Placement::Contained(vehicle_ref("dm1")));
}

#[test]
fn click_on_last_seeded_dm2_member_keeps_column_order() {
    let mut core = EngineCore::with_snapshot(seed_board("mrt-board").unwrap());
    core.set_viewport(pt(0.0, 0.0), Size::new(1200.0, 800.0));
    let before: Vec<Id> = core.store.members("dm2").iter().map(|i| i.id.clone()).collect();
    assert_eq!(before.len(), 5);
    let last = before[4].clone();

    let press = low_on_card(&core, &last);
    core.on_pointer_down(press, PressTarget::Item(last.clone()), Button::Primary);
    core.on_pointer_up(press);

    let after: Vec<Id> = core.store.members("dm2").iter().map(|i| i.id.clone()).collect();
    assert_eq!(after, before);
}

#[test]
fn note_dropped_on_bare_board_floats_there() {
    let mut core = engine();
    core.on_pointer_down(pt(810.0, 510.0), PressTarget::Item("n".into()), Button::Primary);
    core.on_pointer_move(pt(1010.0, 610.0));
    core.on_pointer_up(pt(1010.0, 610.0));
    assert_eq!(placement(&core, "n"), Placement::Floating(pt(1000.0, 600.0)));
    assert!(core.session.is_idle());
}

#[test]
fn note_dropped_on_toolbar_unassigns() {
    let mut core = engine();
    core.store.insert_container(Container {
        id: "bar".into(),
        kind: ContainerKind::Toolbar,
        name: "Tools".into(),
        color: "#333".into(),
        position: pt(20.0, 20.0),
        size: None,
    });
    core.on_pointer_down(pt(810.0, 510.0), PressTarget::Item("n".into()), Button::Primary);
    core.on_pointer_move(pt(40.0, 40.0));
    core.on_pointer_up(pt(40.0, 40.0));
    assert_eq!(placement(&core, "n"), Placement::Unassigned);
}

#[test]
fn tray_item_detaches_under_pointer() {
    let mut core = engine();
    core.on_pointer_down(pt(900.0, 700.0), PressTarget::Item("u".into()), Button::Primary);
    assert_eq!(placement(&core, "u"), Placement::Floating(pt(900.0, 700.0)));
    core.on_pointer_move(pt(100.0, 200.0));
    core.on_pointer_up(pt(100.0, 200.0));
    assert_eq!(placement(&core, "u"), Placement::Contained(vehicle_ref("dm1")));
}

#[test]
fn person_drags_end_contained_or_unassigned() {
    let drops = [pt(100.0, 200.0), pt(400.0, 300.0), pt(1100.0, 50.0), pt(805.0, 505.0), pt(-50.0, -50.0)];
    for drop in drops {
        let mut core = engine();
        core.on_pointer_down(first_slot(), PressTarget::Item("a".into()), Button::Primary);
        core.on_pointer_move(drop);
        core.on_pointer_up(drop);
        let p = placement(&core, "a");
        assert!(p.container().is_some() || p.is_unassigned(), "{drop:?} -> {p:?}");
    }
}

#[test]
fn cancel_restores_original_placement() {
    let mut core = engine();
    core.on_pointer_down(first_slot(), PressTarget::Item("a".into()), Button::Primary);
    core.on_pointer_move(pt(700.0, 700.0));
    let actions = core.on_pointer_cancel();
    assert_eq!(placement(&core, "a"), Placement::Contained(vehicle_ref("dm1")));
    assert!(core.session.is_idle());
    assert!(has_render(&actions));
}

#[test]
fn pointer_down_during_gesture_is_ignored() {
    let mut core = engine();
    core.on_pointer_down(first_slot(), PressTarget::Item("a".into()), Button::Primary);
    let actions = core.on_pointer_down(pt(400.0, 200.0), PressTarget::Container("dm2".into()), Button::Primary);
    assert!(actions.is_empty());
    assert_eq!(core.session.dragged_item(), Some("a"));
}

#[test]
fn unknown_item_does_not_arm() {
    let mut core = engine();
    let actions = core.on_pointer_down(pt(0.0, 0.0), PressTarget::Item("ghost".into()), Button::Primary);
    assert!(actions.is_empty());
    assert!(core.session.is_idle());
}

#[test]
fn removing_dragged_item_ends_session() {
    let mut core = engine();
    core.on_pointer_down(first_slot(), PressTarget::Item("a".into()), Button::Primary);
    core.remove_item("a");
    assert!(core.session.is_idle());
    assert!(core.on_pointer_up(pt(100.0, 200.0)).is_empty());
}

#[test]
fn secondary_button_does_nothing() {
    let mut core = engine();
    assert!(core.on_pointer_down(first_slot(), PressTarget::Item("a".into()), Button::Secondary).is_empty());
    assert!(core.session.is_idle());
}

// =============================================================
// Container drag
// =============================================================

#[test]
fn container_drag_snaps_to_grid() {
    let mut core = engine();
    core.on_pointer_down(pt(30.0, 130.0), PressTarget::Container("dm1".into()), Button::Primary);
    assert!(matches!(core.session, DragSession::ContainerArmed { .. }));

    core.on_pointer_move(pt(47.0, 141.0));
    assert_eq!(core.container("dm1").unwrap().position, pt(40.0, 140.0));

    core.on_pointer_move(pt(68.0, 171.0));
    assert_eq!(core.container("dm1").unwrap().position, pt(60.0, 160.0));

    let actions = core.on_pointer_up(pt(68.0, 171.0));
    assert!(actions.is_empty());
    assert_eq!(core.container("dm1").unwrap().position, pt(60.0, 160.0));
    assert!(core.session.is_idle());
}

#[test]
fn container_drag_skips_unchanged_snaps() {
    let mut core = engine();
    core.on_pointer_down(pt(30.0, 130.0), PressTarget::Container("dm1".into()), Button::Primary);
    assert!(core.on_pointer_move(pt(32.0, 131.0)).is_empty());
    assert!(!core.on_pointer_move(pt(52.0, 131.0)).is_empty());
    assert!(core.on_pointer_move(pt(53.0, 132.0)).is_empty());
}

#[test]
fn container_members_follow_their_container() {
    let mut core = engine();
    core.on_pointer_down(pt(30.0, 130.0), PressTarget::Container("dm1".into()), Button::Primary);
    core.on_pointer_move(pt(230.0, 430.0));
    core.on_pointer_up(pt(230.0, 430.0));
    assert_eq!(placement(&core, "a"), Placement::Contained(vehicle_ref("dm1")));
    let rect = core.hit_index(None).item_rect("a").unwrap();
    assert_eq!(rect.origin, pt(220.0 + COLUMN_PADDING, 420.0 + COLUMN_HEADER_HEIGHT + COLUMN_PADDING));
}

#[test]
fn container_cancel_restores_position() {
    let mut core = engine();
    core.on_pointer_down(pt(30.0, 130.0), PressTarget::Container("dm1".into()), Button::Primary);
    core.on_pointer_move(pt(430.0, 530.0));
    core.on_pointer_cancel();
    assert_eq!(core.container("dm1").unwrap().position, pt(20.0, 120.0));
}

// =============================================================
// Resize
// =============================================================

#[test]
fn item_resize_grows_by_board_delta() {
    let mut core = engine();
    core.camera = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 2.0 };
    // Note n is 200x120 at (800,500); its corner is at client (2000,1240).
    core.on_pointer_down(pt(1990.0, 1230.0), PressTarget::ResizeItem("n".into()), Button::Primary);
    core.on_pointer_move(pt(2050.0, 1250.0));
    // 60 and 20 client pixels at zoom 2.
    assert_eq!(core.item("n").unwrap().size, Some(Size::new(230.0, 130.0)));
}

#[test]
fn item_resize_floor_holds() {
    let mut core = engine();
    core.on_pointer_down(pt(995.0, 615.0), PressTarget::ResizeItem("n".into()), Button::Primary);
    for step in 1..=5 {
        let d = f64::from(step) * 400.0;
        core.on_pointer_move(pt(995.0 - d, 615.0 - d));
        assert_eq!(core.item("n").unwrap().size, Some(MIN_MAGNET_SIZE));
    }
    core.on_pointer_up(pt(0.0, 0.0));
    assert_eq!(core.item("n").unwrap().size, Some(MIN_MAGNET_SIZE));
}

#[test]
fn person_resize_floor_is_card_minimum() {
    let mut core = engine();
    core.on_pointer_down(first_slot(), PressTarget::ResizeItem("a".into()), Button::Primary);
    core.on_pointer_move(pt(-1000.0, -1000.0));
    assert_eq!(core.item("a").unwrap().size, Some(MIN_CARD_SIZE));
    // Resizing never detaches.
    assert_eq!(placement(&core, "a"), Placement::Contained(vehicle_ref("dm1")));
}

#[test]
fn container_resize_floor_holds() {
    let mut core = engine();
    core.on_pointer_down(pt(335.0, 390.0), PressTarget::ResizeContainer("dm1".into()), Button::Primary);
    core.on_pointer_move(pt(-500.0, -500.0));
    core.on_pointer_move(pt(-900.0, -900.0));
    assert_eq!(core.container("dm1").unwrap().size, Some(MIN_CONTAINER_SIZE));
}

#[test]
fn resize_cancel_restores_size() {
    let mut core = engine();
    core.on_pointer_down(pt(995.0, 615.0), PressTarget::ResizeItem("n".into()), Button::Primary);
    core.on_pointer_move(pt(1100.0, 700.0));
    core.on_pointer_cancel();
    assert_eq!(core.item("n").unwrap().size, None);
}

// =============================================================
// Press targets
// =============================================================

#[test]
fn target_at_finds_cards_containers_and_grips() {
    let core = engine();
    assert_eq!(core.target_at(first_slot()), PressTarget::Item("a".into()));
    assert_eq!(core.target_at(pt(100.0, 130.0)), PressTarget::Container("dm1".into()));
    assert_eq!(core.target_at(pt(335.0, 390.0)), PressTarget::ResizeContainer("dm1".into()));
    assert_eq!(core.target_at(pt(995.0, 615.0)), PressTarget::ResizeItem("n".into()));
    assert_eq!(core.target_at(pt(1100.0, 20.0)), PressTarget::Board);
}

#[test]
fn target_at_treats_tray_as_board() {
    let mut core = engine();
    core.set_tray(Some(Rect::new(0.0, 150.0, 400.0, 100.0)));
    assert_eq!(core.target_at(pt(100.0, 200.0)), PressTarget::Board);
}

// =============================================================
// Camera
// =============================================================

#[test]
fn board_drag_pans() {
    let mut core = engine();
    core.on_pointer_down(pt(1000.0, 100.0), PressTarget::Board, Button::Primary);
    let actions = core.on_pointer_move(pt(1030.0, 90.0));
    assert_eq!(core.camera.pan_x, 30.0);
    assert_eq!(core.camera.pan_y, -10.0);
    assert_eq!(actions[0], Action::ViewChanged(ViewState { zoom: 1.0, pan: pt(30.0, -10.0) }));
    core.on_pointer_up(pt(1030.0, 90.0));
    assert!(core.session.is_idle());
}

#[test]
fn middle_button_pans_even_over_items() {
    let mut core = engine();
    core.on_pointer_down(first_slot(), PressTarget::Item("a".into()), Button::Middle);
    assert!(matches!(core.session, DragSession::Panning { .. }));
    assert_eq!(placement(&core, "a"), Placement::Contained(vehicle_ref("dm1")));
}

#[test]
fn pan_is_clamped_to_content() {
    let mut core = engine();
    core.on_pointer_down(pt(1000.0, 100.0), PressTarget::Board, Button::Primary);
    core.on_pointer_move(pt(-9000.0, 100.0));
    let bounds = core.hit_index(None).content_bounds().unwrap();
    assert_eq!(bounds.right() * core.camera.zoom + core.camera.pan_x, crate::consts::PAN_MARGIN_PX);
}

#[test]
fn wheel_without_modifiers_pans() {
    let mut core = engine();
    core.on_wheel(pt(500.0, 500.0), WheelDelta { dx: 10.0, dy: 20.0 }, Modifiers::default());
    assert_eq!(core.camera.pan_x, -10.0);
    assert_eq!(core.camera.pan_y, -20.0);
    assert_eq!(core.camera.zoom, 1.0);
}

#[test]
fn ctrl_wheel_zooms_around_pointer() {
    let mut core = engine();
    let anchor = pt(400.0, 300.0);
    let before = core.client_to_board(anchor);
    let ctrl = Modifiers { ctrl: true, ..Default::default() };
    let actions = core.on_wheel(anchor, WheelDelta { dx: 0.0, dy: -100.0 }, ctrl);

    assert!(core.camera.zoom > 1.0);
    let after = core.client_to_board(anchor);
    assert!((after.x - before.x).abs() < 1e-9);
    assert!((after.y - before.y).abs() < 1e-9);
    assert!(matches!(actions[0], Action::ViewChanged(_)));
}

#[test]
fn set_zoom_is_clamped() {
    let mut core = engine();
    core.set_zoom(100.0);
    assert_eq!(core.camera.zoom, ZOOM_MAX);
    core.reset_view();
    assert_eq!(core.camera, Camera::default());
}

#[test]
fn view_round_trips_through_storage() {
    let mut storage = MemoryStorage::new();
    let mut core = engine();
    core.camera = Camera { pan_x: -40.0, pan_y: 25.0, zoom: 1.5 };
    core.save_view(&mut storage, "mrt-board");

    let mut fresh = engine();
    assert!(fresh.restore_view(&storage, "mrt-board"));
    assert_eq!(fresh.camera, core.camera);
    assert!(!fresh.restore_view(&storage, "work"));
}

// =============================================================
// Commands
// =============================================================

#[test]
fn create_blank_name_is_noop() {
    let mut core = engine();
    let before = core.snapshot();
    assert!(core.create(ResourceKind::Person, "  ", &mut StdRng::seed_from_u64(1)).is_empty());
    assert_eq!(core.snapshot(), before);
}

#[test]
fn create_person_lands_in_tray() {
    let mut core = engine();
    let actions = core.create(ResourceKind::Person, "Jo Bloggs", &mut StdRng::seed_from_u64(1));
    let Action::ItemCreated(item) = &actions[0] else {
        panic!("expected ItemCreated, got {actions:?}");
    };
    assert!(core.item(&item.id).unwrap().placement.is_unassigned());
    assert!(core.store.unassigned().iter().any(|i| i.id == item.id));
}

#[test]
fn create_container_appends() {
    let mut core = engine();
    let actions = core.create(ResourceKind::Team, "Hill Party", &mut StdRng::seed_from_u64(1));
    assert!(matches!(&actions[0], Action::ContainerCreated(c) if c.name == "Hill Party"));
    assert_eq!(core.store.containers().len(), 3);
}

#[test]
fn remove_container_cascades_to_tray() {
    let mut core = engine();
    let actions = core.remove_container("dm1");
    assert_eq!(actions[0], Action::ContainerRemoved { id: "dm1".into(), unassigned: vec!["a".into(), "b".into()] });
    assert!(placement(&core, "a").is_unassigned());
    assert!(placement(&core, "b").is_unassigned());
    assert_eq!(placement(&core, "c"), Placement::Contained(vehicle_ref("dm2")));
    assert!(core.remove_container("dm1").is_empty());
}

#[test]
fn remove_container_mid_drag_ends_session() {
    let mut core = engine();
    core.on_pointer_down(pt(30.0, 130.0), PressTarget::Container("dm1".into()), Button::Primary);
    core.remove_container("dm1");
    assert!(core.session.is_idle());
}

#[test]
fn remove_item_reports_dropped_connections() {
    let mut core = engine();
    let Action::ConnectionAdded(conn) = core.connect("a", "c").remove(0) else {
        panic!("expected a connection");
    };
    let actions = core.remove_item("c");
    assert_eq!(actions[0], Action::ConnectionRemoved { id: conn.id });
    assert_eq!(actions[1], Action::ItemRemoved { id: "c".into() });
    assert!(core.store.connections().is_empty());
}

#[test]
fn connect_and_disconnect() {
    let mut core = engine();
    assert!(core.connect("a", "a").is_empty());
    let Action::ConnectionAdded(conn) = core.connect("a", "b").remove(0) else {
        panic!("expected a connection");
    };
    assert!(core.connect("b", "a").is_empty());
    assert!(!core.disconnect(&conn.id).is_empty());
    assert!(core.disconnect(&conn.id).is_empty());
}

#[test]
fn update_item_patch() {
    let mut core = engine();
    let patch = ItemPatch { role: Some(Role::Leader), ..Default::default() };
    assert!(!core.update_item("a", patch).is_empty());
    assert_eq!(core.item("a").unwrap().role, Role::Leader);
    assert!(core.update_item("ghost", ItemPatch::default()).is_empty());
}

#[test]
fn tidy_is_idempotent_through_engine() {
    let mut core = engine();
    core.update_container("dm1", ContainerPatch::position(pt(600.0, 600.0)));
    let first = core.tidy();
    assert!(first.contains(&Action::ContainerUpdated {
        id: "dm1".into(),
        patch: ContainerPatch::position(pt(20.0, 120.0)),
    }));
    assert!(placement(&core, "n").is_unassigned());
    let positions: Vec<Point> = core.store.containers().iter().map(|c| c.position).collect();

    assert!(core.tidy().is_empty());
    let again: Vec<Point> = core.store.containers().iter().map(|c| c.position).collect();
    assert_eq!(positions, again);
}

// =============================================================
// Suggestions
// =============================================================

fn suggestion(source: &str, target: &str) -> Suggestion {
    Suggestion { source_id: source.into(), target_id: target.into(), reason: "same crew".into() }
}

#[test]
fn suggestion_request_lists_all_items() {
    let mut core = engine();
    let (_, request) = core.begin_suggestions();
    let ids: Vec<&str> = request.magnets.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "u", "n"]);
    assert_eq!(request.magnets[4].text, "note n");
}

#[test]
fn suggestions_filtered_against_current_items() {
    let mut core = engine();
    let (token, _) = core.begin_suggestions();
    let outcome = core.complete_suggestions::<String>(token, Ok(vec![suggestion("a", "ghost"), suggestion("a", "b")]));
    assert_eq!(outcome, SuggestOutcome::Applied(1));
    assert_eq!(core.suggestions()[0].id, "ai-a-b");
}

#[test]
fn stale_suggestions_are_dropped() {
    let mut core = engine();
    let (old, _) = core.begin_suggestions();
    let (new, _) = core.begin_suggestions();
    assert_eq!(core.complete_suggestions::<String>(old, Ok(vec![suggestion("a", "b")])), SuggestOutcome::Stale);
    assert!(core.suggestions().is_empty());
    assert_eq!(core.complete_suggestions::<String>(new, Ok(vec![suggestion("a", "c")])), SuggestOutcome::Applied(1));
}

#[test]
fn failed_suggestions_leave_state_untouched() {
    let mut core = engine();
    let before = core.snapshot();
    let (token, _) = core.begin_suggestions();
    let outcome = core.complete_suggestions(token, Err("timeout"));
    assert_eq!(outcome, SuggestOutcome::Failed(SUGGEST_FAILURE_MESSAGE));
    assert_eq!(core.snapshot(), before);
}

#[test]
fn accepting_suggestion_creates_connection() {
    let mut core = engine();
    let (token, _) = core.begin_suggestions();
    core.complete_suggestions::<String>(token, Ok(vec![suggestion("a", "b")]));
    let actions = core.accept_suggestion("ai-a-b");
    assert!(actions.iter().any(|a| matches!(a, Action::ConnectionAdded(c) if c.id == "ai-a-b")));
    assert!(core.suggestions().is_empty());
    assert!(core.store.connections()[0].joins("a", "b"));
    assert!(core.accept_suggestion("ai-a-b").is_empty());
}

#[test]
fn removing_item_drops_its_suggestions() {
    let mut core = engine();
    let (token, _) = core.begin_suggestions();
    core.complete_suggestions::<String>(token, Ok(vec![suggestion("a", "b"), suggestion("b", "c")]));
    let actions = core.remove_item("c");
    assert!(actions.contains(&Action::SuggestionsChanged));
    let ids: Vec<&str> = core.suggestions().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["ai-a-b"]);
}

#[test]
fn dismiss_suggestion() {
    let mut core = engine();
    let (token, _) = core.begin_suggestions();
    core.complete_suggestions::<String>(token, Ok(vec![suggestion("a", "b")]));
    assert!(!core.dismiss_suggestion("ai-a-b").is_empty());
    assert!(core.dismiss_suggestion("ai-a-b").is_empty());
    assert!(core.store.connections().is_empty());
}
