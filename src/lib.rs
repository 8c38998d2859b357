//! Host side of the whiteboard: persistence adapters, editing sessions and
//! the configuration the `whiteboard` CLI runs with.
//!
//! The `canvas` crate owns the scene graph and never performs I/O. This
//! crate moves its documents to and from a backend.

pub mod config;
pub mod script;
pub mod services;
