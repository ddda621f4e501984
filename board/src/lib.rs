//! Interaction engine for MagnetFlow, a drag-and-drop magnet board.
//!
//! The crate holds everything a host needs to run a board without any
//! rendering of its own: the in-memory document of items, containers and
//! connections, the pan/zoom camera, hit-testing, the drag/resize/pan gesture
//! machine, tidy layout, resource creation, seeded boards, and the client side
//! of AI connection suggestions. The host feeds pointer events and commands to
//! [`engine::EngineCore`] and applies the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`] controller |
//! | [`doc`] | Board object types, sparse patches, and the in-memory store |
//! | [`camera`] | Geometry primitives, pan/zoom camera, coordinate conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Rendered rectangles, hit-testing, and drop resolution |
//! | [`layout`] | Tidy: column grid for containers, item reset |
//! | [`create`] | New items and containers from a kind and a name |
//! | [`seed`] | Board catalog and seeded board content |
//! | [`suggest`] | Suggestion request bodies, filtering, and stale-response tracking |
//! | [`view`] | Per-board zoom and pan persistence |
//! | [`consts`] | Shared numeric constants (zoom limits, grid, minimum sizes, etc.) |

pub mod camera;
pub mod consts;
pub mod create;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod layout;
pub mod seed;
pub mod suggest;
pub mod view;
