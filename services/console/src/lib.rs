//! Claimlens Console Library Crate
//!
//! This library contains the IO side of the claimlens client: environment
//! configuration, durable session identity, the WebSocket connection to the
//! analysis pipeline, and terminal rendering. The `main.rs` binary is a
//! thin wrapper around this library.

pub mod config;
pub mod connection;
pub mod identity;
pub mod render;
