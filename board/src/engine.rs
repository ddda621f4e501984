//! Board interaction controller.
//!
//! `EngineCore` owns the store, the camera, and the active drag session. The
//! host feeds it pointer and wheel events in client coordinates plus explicit
//! commands (create, remove, tidy, suggestions), and it answers with a list of
//! [`Action`]s describing what changed so the host can re-render and persist.
//!
//! DESIGN
//! ======
//! Every coordinate that enters through a pointer event goes through
//! [`Camera::client_to_board`] once, so offset capture, drag moves, resize
//! deltas and drop hit-testing all share the same inverse transform.
//!
//! Pointer-up and pointer-cancel take the session out of the engine before
//! doing anything else. Whatever happens next, the engine is back in
//! [`DragSession::Idle`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use rand::Rng;

use crate::camera::{Camera, Point, Rect, Size};
use crate::consts::{GRID_SIZE, RESIZE_HANDLE_PX, WHEEL_ZOOM_STEP};
use crate::create::{Created, ResourceKind, create_resource};
use crate::doc::{
    BoardSnapshot, BoardStore, Connection, Container, ContainerPatch, Id, Item, ItemPatch, Placement,
};
use crate::hit::{DropTarget, HitIndex, HitKind, item_size};
use crate::input::{Button, DragSession, Modifiers, PressTarget, ResizeTarget, WheelDelta};
use crate::layout;
use crate::suggest::{
    AiSuggestion, RequestToken, SuggestConnectionsRequest, SuggestOutcome, Suggestion, SuggestionTracker,
    request_from_store,
};
use crate::view::{self, ViewState, ViewStorage};

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ItemCreated(Item),
    ItemUpdated { id: Id, patch: ItemPatch },
    ItemRemoved { id: Id },
    ContainerCreated(Container),
    ContainerUpdated { id: Id, patch: ContainerPatch },
    /// A container was deleted; `unassigned` lists the items sent to the tray.
    ContainerRemoved { id: Id, unassigned: Vec<Id> },
    ConnectionAdded(Connection),
    ConnectionRemoved { id: Id },
    /// The set of shown suggestions changed.
    SuggestionsChanged,
    /// Zoom or pan changed; persist with [`EngineCore::save_view`].
    ViewChanged(ViewState),
    RenderNeeded,
}

/// Snap a board point to the container grid, rounding halves up.
#[must_use]
pub fn snap_to_grid(pt: Point) -> Point {
    let snap = |v: f64| (v / GRID_SIZE + 0.5).floor() * GRID_SIZE;
    Point::new(snap(pt.x), snap(pt.y))
}

/// Core engine state. Holds no host handles, so it runs anywhere.
#[derive(Debug, Clone)]
pub struct EngineCore {
    pub store: BoardStore,
    pub camera: Camera,
    /// Top-left corner of the board element in client space.
    pub origin: Point,
    /// Size of the board element in client pixels.
    pub viewport: Size,
    /// Unassigned tray overlay in client space, if the host shows one.
    pub tray: Option<Rect>,
    pub session: DragSession,
    pub suggestions: SuggestionTracker,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            store: BoardStore::new(),
            camera: Camera::default(),
            origin: Point::default(),
            viewport: Size::new(0.0, 0.0),
            tray: None,
            session: DragSession::Idle,
            suggestions: SuggestionTracker::new(),
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: BoardSnapshot) -> Self {
        let mut core = Self::new();
        core.load_snapshot(snapshot);
        core
    }

    // --- Data inputs ---

    /// Replace the board content. Cancels any gesture and drops suggestions.
    pub fn load_snapshot(&mut self, snapshot: BoardSnapshot) {
        self.store.load_snapshot(snapshot);
        self.session = DragSession::Idle;
        self.suggestions.clear();
    }

    /// Export the board content.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        self.store.snapshot()
    }

    /// Update where the board element sits in the viewport and how big it is.
    pub fn set_viewport(&mut self, origin: Point, size: Size) {
        self.origin = origin;
        self.viewport = size;
    }

    /// Register (or clear) the unassigned tray rectangle, in client space.
    pub fn set_tray(&mut self, tray: Option<Rect>) {
        self.tray = tray;
    }

    // --- Coordinates and hit-testing ---

    /// Convert a client point to board space under the current camera.
    #[must_use]
    pub fn client_to_board(&self, client: Point) -> Point {
        self.camera.client_to_board(client, self.origin)
    }

    /// Convert a board point to client space under the current camera.
    #[must_use]
    pub fn board_to_client(&self, board: Point) -> Point {
        self.camera.board_to_client(board, self.origin)
    }

    /// Build the hit index, leaving out `exclude` and adding the tray on top.
    #[must_use]
    pub fn hit_index(&self, exclude: Option<&str>) -> HitIndex {
        self.index_over(&self.store, exclude)
    }

    /// Hit index for dropping `id`, laid out as it was before the item was
    /// lifted. Its old container keeps the height and slot it had.
    fn drop_index(&self, id: &str, original: &Placement) -> HitIndex {
        let mut layout = self.store.clone();
        layout.apply_item_patch(id, &ItemPatch::placement(original.clone()));
        self.index_over(&layout, Some(id))
    }

    fn index_over(&self, store: &BoardStore, exclude: Option<&str>) -> HitIndex {
        let index = HitIndex::build(store, exclude);
        match self.tray {
            Some(tray) => {
                let origin = self.client_to_board(tray.origin);
                let size = Size::new(
                    self.camera.screen_dist_to_world(tray.size.width),
                    self.camera.screen_dist_to_world(tray.size.height),
                );
                index.with_tray(Rect { origin, size })
            }
            None => index,
        }
    }

    /// What a pointer-down at `client` would press: a resize grip, an item, a
    /// container, or empty board. The tray counts as empty board.
    #[must_use]
    pub fn target_at(&self, client: Point) -> PressTarget {
        let pt = self.client_to_board(client);
        let index = self.hit_index(None);
        let Some(entry) = index.top_at(pt) else {
            return PressTarget::Board;
        };
        let grip = self.camera.screen_dist_to_world(RESIZE_HANDLE_PX);
        let on_grip = pt.x >= entry.rect.right() - grip && pt.y >= entry.rect.bottom() - grip;
        match &entry.kind {
            HitKind::Container(r) if on_grip => PressTarget::ResizeContainer(r.id.clone()),
            HitKind::Container(r) => PressTarget::Container(r.id.clone()),
            HitKind::ContainedItem { item, .. } | HitKind::FloatingItem(item) if on_grip => {
                PressTarget::ResizeItem(item.clone())
            }
            HitKind::ContainedItem { item, .. } | HitKind::FloatingItem(item) => PressTarget::Item(item.clone()),
            HitKind::Tray => PressTarget::Board,
        }
    }

    // --- Pointer events ---

    /// Pointer went down on `target`. Ignored while another gesture is active.
    pub fn on_pointer_down(&mut self, client: Point, target: PressTarget, button: Button) -> Vec<Action> {
        if !self.session.is_idle() {
            return Vec::new();
        }
        if button == Button::Middle {
            self.session = DragSession::Panning { last_client: client };
            return Vec::new();
        }
        if button != Button::Primary {
            return Vec::new();
        }

        let board = self.client_to_board(client);
        match target {
            PressTarget::Item(id) => self.arm_item(id, board),
            PressTarget::Container(id) => {
                if let Some(c) = self.store.container(&id) {
                    let original = c.position;
                    self.session = DragSession::ContainerArmed { id, offset: board.minus(original), original };
                }
                Vec::new()
            }
            PressTarget::ResizeItem(id) => {
                let index = self.hit_index(None);
                if let Some(item) = self.store.item(&id) {
                    let initial = index.item_rect(&id).map_or_else(|| item_size(item), |r| r.size);
                    self.session = DragSession::ResizeArmed {
                        min: item.kind.min_size(),
                        original: item.size,
                        target: ResizeTarget::Item(id),
                        start: board,
                        initial,
                    };
                }
                Vec::new()
            }
            PressTarget::ResizeContainer(id) => {
                let index = self.hit_index(None);
                if let (Some(c), Some(rect)) = (self.store.container(&id), index.container_rect(&id)) {
                    self.session = DragSession::ResizeArmed {
                        min: c.kind.min_size(),
                        original: c.size,
                        target: ResizeTarget::Container(id),
                        start: board,
                        initial: rect.size,
                    };
                }
                Vec::new()
            }
            PressTarget::Board => {
                self.session = DragSession::Panning { last_client: client };
                Vec::new()
            }
        }
    }

    /// Arm an item drag. A contained or unassigned item is detached here,
    /// once, to a floating position at its rendered origin. The session keeps
    /// the original placement for the drop and for cancel.
    fn arm_item(&mut self, id: Id, board: Point) -> Vec<Action> {
        let Some(item) = self.store.item(&id) else {
            return Vec::new();
        };
        let original = item.placement.clone();
        let mut actions = Vec::new();

        let item_origin = match original.position() {
            Some(p) => p,
            None => {
                // Tray cards are not in the index and detach under the pointer.
                let rendered = self.hit_index(None).item_rect(&id).map_or(board, |r| r.origin);
                let patch = ItemPatch::placement(Placement::Floating(rendered));
                self.store.apply_item_patch(&id, &patch);
                actions.push(Action::ItemUpdated { id: id.clone(), patch });
                actions.push(Action::RenderNeeded);
                rendered
            }
        };

        self.session = DragSession::ItemArmed { id, offset: board.minus(item_origin), original };
        actions
    }

    /// Pointer moved. Updates the live position, size or pan of the active gesture.
    pub fn on_pointer_move(&mut self, client: Point) -> Vec<Action> {
        let board = self.client_to_board(client);
        match std::mem::take(&mut self.session) {
            DragSession::Idle => Vec::new(),
            DragSession::ItemArmed { id, offset, original } | DragSession::ItemDragging { id, offset, original } => {
                let patch = ItemPatch::placement(Placement::Floating(board.minus(offset)));
                let actions = self.commit_item(&id, patch);
                self.session = DragSession::ItemDragging { id, offset, original };
                actions
            }
            DragSession::ContainerArmed { id, offset, original } => {
                let position = snap_to_grid(board.minus(offset));
                let actions = self.move_container(&id, position, original);
                self.session = DragSession::ContainerDragging { id, offset, original, position };
                actions
            }
            DragSession::ContainerDragging { id, offset, original, position: last } => {
                let position = snap_to_grid(board.minus(offset));
                let actions = if position == last { Vec::new() } else { self.move_container(&id, position, last) };
                self.session = DragSession::ContainerDragging { id, offset, original, position };
                actions
            }
            DragSession::ResizeArmed { target, start, initial, min, original }
            | DragSession::Resizing { target, start, initial, min, original } => {
                let size = initial.grown_by(board.minus(start), min);
                let actions = self.commit_size(&target, Some(size));
                self.session = DragSession::Resizing { target, start, initial, min, original };
                actions
            }
            DragSession::Panning { last_client } => {
                self.camera.pan_by(client.x - last_client.x, client.y - last_client.y);
                self.session = DragSession::Panning { last_client: client };
                self.view_changed()
            }
        }
    }

    /// Pointer released. Items are dropped into a container, the tray, or
    /// (for note, idea and task magnets) onto bare board; containers and
    /// sizes keep what the last move wrote.
    pub fn on_pointer_up(&mut self, client: Point) -> Vec<Action> {
        let session = std::mem::take(&mut self.session);
        let board = self.client_to_board(client);
        match session {
            DragSession::ItemArmed { id, offset, original } | DragSession::ItemDragging { id, offset, original } => {
                self.drop_item(&id, board, offset, &original)
            }
            DragSession::Idle
            | DragSession::ContainerArmed { .. }
            | DragSession::ContainerDragging { .. }
            | DragSession::ResizeArmed { .. }
            | DragSession::Resizing { .. }
            | DragSession::Panning { .. } => Vec::new(),
        }
    }

    /// Pointer lost (capture released, window blurred). Reverts the gesture.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.session) {
            DragSession::ItemArmed { id, original, .. } | DragSession::ItemDragging { id, original, .. } => {
                self.commit_item(&id, ItemPatch::placement(original))
            }
            DragSession::ContainerArmed { id, original, .. } | DragSession::ContainerDragging { id, original, .. } => {
                let current = self.store.container(&id).map(|c| c.position);
                if current == Some(original) {
                    Vec::new()
                } else {
                    self.commit_container(&id, ContainerPatch::position(original))
                }
            }
            DragSession::ResizeArmed { target, original, .. } | DragSession::Resizing { target, original, .. } => {
                self.commit_size(&target, original)
            }
            DragSession::Idle | DragSession::Panning { .. } => Vec::new(),
        }
    }

    fn drop_item(&mut self, id: &str, board: Point, offset: Point, original: &Placement) -> Vec<Action> {
        let target = self.drop_index(id, original).resolve_drop(board);
        tracing::debug!(item = %id, x = board.x, y = board.y, ?target, "item dropped");
        let placement = match target {
            DropTarget::Container(r) => Placement::Contained(r),
            DropTarget::Unassign => Placement::Unassigned,
            // People and equipment always belong somewhere; magnets stay where they land.
            DropTarget::Empty => match self.store.item(id) {
                Some(item) if !item.kind.is_resource() => Placement::Floating(board.minus(offset)),
                _ => Placement::Unassigned,
            },
        };
        self.commit_item(id, ItemPatch::placement(placement))
    }

    fn move_container(&mut self, id: &str, position: Point, previous: Point) -> Vec<Action> {
        if position == previous {
            return Vec::new();
        }
        self.commit_container(id, ContainerPatch::position(position))
    }

    fn commit_size(&mut self, target: &ResizeTarget, size: Option<Size>) -> Vec<Action> {
        match target {
            ResizeTarget::Item(id) => self.commit_item(id, ItemPatch::size(size)),
            ResizeTarget::Container(id) => self.commit_container(id, ContainerPatch::size(size)),
        }
    }

    fn commit_item(&mut self, id: &str, patch: ItemPatch) -> Vec<Action> {
        if self.store.apply_item_patch(id, &patch) {
            vec![Action::ItemUpdated { id: id.to_string(), patch }, Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    fn commit_container(&mut self, id: &str, patch: ContainerPatch) -> Vec<Action> {
        if self.store.apply_container_patch(id, &patch) {
            vec![Action::ContainerUpdated { id: id.to_string(), patch }, Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Camera ---

    /// Wheel without modifiers pans; with ctrl/meta it zooms around the pointer.
    pub fn on_wheel(&mut self, client: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.zoom() {
            let factor = (-delta.dy * WHEEL_ZOOM_STEP).exp();
            self.camera.zoom_at(client.minus(self.origin), self.camera.zoom * factor);
        } else {
            self.camera.pan_by(-delta.dx, -delta.dy);
        }
        self.view_changed()
    }

    /// Set the zoom, keeping the centre of the viewport fixed.
    pub fn set_zoom(&mut self, zoom: f64) -> Vec<Action> {
        let centre = Point::new(self.viewport.width * 0.5, self.viewport.height * 0.5);
        self.camera.zoom_at(centre, zoom);
        self.view_changed()
    }

    /// Back to zoom 1 with no pan.
    pub fn reset_view(&mut self) -> Vec<Action> {
        self.camera = Camera::default();
        self.view_changed()
    }

    fn view_changed(&mut self) -> Vec<Action> {
        if let Some(bounds) = self.hit_index(None).content_bounds() {
            if self.viewport.width > 0.0 && self.viewport.height > 0.0 {
                self.camera.clamp_pan(&bounds, self.viewport);
            }
        }
        vec![Action::ViewChanged(self.view_state()), Action::RenderNeeded]
    }

    #[must_use]
    pub fn view_state(&self) -> ViewState {
        ViewState::from_camera(&self.camera)
    }

    /// Apply a saved view for `board_id`, if one exists and parses.
    pub fn restore_view(&mut self, storage: &dyn ViewStorage, board_id: &str) -> bool {
        match view::load_view(storage, board_id) {
            Some(state) => {
                self.camera = state.to_camera();
                true
            }
            None => false,
        }
    }

    /// Persist the current view for `board_id`. Failures are logged and ignored.
    pub fn save_view(&self, storage: &mut dyn ViewStorage, board_id: &str) {
        if let Err(e) = view::save_view(storage, board_id, self.view_state()) {
            tracing::warn!(board = %board_id, error = %e, "failed to save view state");
        }
    }

    // --- Commands ---

    /// Create an item or container. A blank name does nothing.
    pub fn create<R: Rng + ?Sized>(&mut self, kind: ResourceKind, name: &str, rng: &mut R) -> Vec<Action> {
        match create_resource(kind, name, rng) {
            Some(Created::Item(item)) => {
                self.store.insert_item(item.clone());
                vec![Action::ItemCreated(item), Action::RenderNeeded]
            }
            Some(Created::Container(container)) => {
                self.store.insert_container(container.clone());
                vec![Action::ContainerCreated(container), Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    /// Apply a sparse edit to an item.
    pub fn update_item(&mut self, id: &str, patch: ItemPatch) -> Vec<Action> {
        self.commit_item(id, patch)
    }

    /// Apply a sparse edit to a container.
    pub fn update_container(&mut self, id: &str, patch: ContainerPatch) -> Vec<Action> {
        self.commit_container(id, patch)
    }

    /// Delete an item, its connections, and any suggestion mentioning it.
    pub fn remove_item(&mut self, id: &str) -> Vec<Action> {
        let dropped: Vec<Id> =
            self.store.connections().iter().filter(|c| c.touches(id)).map(|c| c.id.clone()).collect();
        if self.store.remove_item(id).is_none() {
            return Vec::new();
        }
        if self.session.dragged_item() == Some(id) {
            self.session = DragSession::Idle;
        }
        let before = self.suggestions.suggestions().len();
        self.suggestions.forget_item(id);

        let mut actions: Vec<Action> = dropped.into_iter().map(|conn_id| Action::ConnectionRemoved { id: conn_id }).collect();
        actions.push(Action::ItemRemoved { id: id.to_string() });
        if self.suggestions.suggestions().len() != before {
            actions.push(Action::SuggestionsChanged);
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Delete a container; its items go to the tray.
    pub fn remove_container(&mut self, id: &str) -> Vec<Action> {
        let Some(removal) = self.store.remove_container(id) else {
            return Vec::new();
        };
        let gesture_on_it = match &self.session {
            DragSession::ContainerArmed { id: active, .. } | DragSession::ContainerDragging { id: active, .. } => {
                active == id
            }
            DragSession::ResizeArmed { target: ResizeTarget::Container(active), .. }
            | DragSession::Resizing { target: ResizeTarget::Container(active), .. } => active == id,
            _ => false,
        };
        if gesture_on_it {
            self.session = DragSession::Idle;
        }
        vec![Action::ContainerRemoved { id: removal.container.id, unassigned: removal.unassigned }, Action::RenderNeeded]
    }

    /// Link two items.
    pub fn connect(&mut self, source_id: &str, target_id: &str) -> Vec<Action> {
        match self.store.add_connection(source_id, target_id) {
            Some(conn) => vec![Action::ConnectionAdded(conn), Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    /// Remove a link.
    pub fn disconnect(&mut self, connection_id: &str) -> Vec<Action> {
        if self.store.remove_connection(connection_id) {
            vec![Action::ConnectionRemoved { id: connection_id.to_string() }, Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Re-grid containers and reset items.
    pub fn tidy(&mut self) -> Vec<Action> {
        let changes = layout::tidy(&mut self.store);
        if changes.is_empty() {
            return Vec::new();
        }
        let mut actions: Vec<Action> = changes
            .containers
            .into_iter()
            .map(|(id, patch)| Action::ContainerUpdated { id, patch })
            .collect();
        actions.extend(changes.items.into_iter().map(|(id, patch)| Action::ItemUpdated { id, patch }));
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Suggestions ---

    /// Start a suggestion request. Send the body, then hand the result to
    /// [`EngineCore::complete_suggestions`] with the token.
    pub fn begin_suggestions(&mut self) -> (RequestToken, SuggestConnectionsRequest) {
        (self.suggestions.begin(), request_from_store(&self.store))
    }

    /// Apply a finished suggestion request.
    pub fn complete_suggestions<E: std::fmt::Display>(
        &mut self,
        token: RequestToken,
        result: Result<Vec<Suggestion>, E>,
    ) -> SuggestOutcome {
        self.suggestions.complete(token, result, &self.store)
    }

    /// Suggestions currently shown.
    #[must_use]
    pub fn suggestions(&self) -> &[AiSuggestion] {
        self.suggestions.suggestions()
    }

    /// Turn a suggestion into a connection.
    pub fn accept_suggestion(&mut self, suggestion_id: &str) -> Vec<Action> {
        let Some(s) = self.suggestions.take(suggestion_id) else {
            return Vec::new();
        };
        let mut actions = vec![Action::SuggestionsChanged];
        if let Some(conn) = self.store.add_connection_with_id(s.id, &s.source_id, &s.target_id) {
            actions.push(Action::ConnectionAdded(conn));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Hide a suggestion without connecting.
    pub fn dismiss_suggestion(&mut self, suggestion_id: &str) -> Vec<Action> {
        if self.suggestions.dismiss(suggestion_id) {
            vec![Action::SuggestionsChanged, Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.store.item(id)
    }

    #[must_use]
    pub fn container(&self, id: &str) -> Option<&Container> {
        self.store.container(id)
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }
}
