//! Scene graph and interaction engine for the whiteboard.
//!
//! This crate compiles to WebAssembly for the browser and to a native rlib for
//! the CLI and tests. It owns the element model, hit-testing, transforms,
//! bound connectors, grouping, undo/redo history and the debounced autosave
//! state machine. The host is responsible only for wiring DOM events to the
//! engine, painting the scene and persisting the resulting
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Input state machine and testable [`engine::EngineCore`] |
//! | [`wasm`] | `wasm-bindgen` shell around the engine |
//! | [`doc`] | In-memory document store: z-order, selection, grouping |
//! | [`element`] | Element, shape and patch types |
//! | [`geometry`] | Points, bounds and per-variant bounding boxes |
//! | [`connector`] | Anchor math and bound-connector rerouting |
//! | [`transform`] | Translate, resize and rotate patches |
//! | [`selection`] | Ordered, duplicate-free selection set |
//! | [`history`] | Bounded snapshot undo/redo |
//! | [`autosave`] | Debounced, revision-tracked save scheduling |
//! | [`document`] | Persisted document record and blob codec |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Input event types and the gesture state |
//! | [`hit`] | Hit-testing against elements and handles |
//! | [`error`] | Crate error type |
//! | [`clock`] | Wall-clock milliseconds on native and wasm |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod autosave;
pub mod camera;
pub mod clock;
pub mod connector;
pub mod consts;
pub mod doc;
pub mod document;
pub mod element;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod history;
pub mod hit;
pub mod input;
pub mod selection;
pub mod transform;
pub mod wasm;
