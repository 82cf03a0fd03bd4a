//! Claimlens Core
//!
//! The session state machine for the claimlens client: wire protocol types,
//! message dispatch, the investigation transcript, per-agent result cards,
//! timeline derivation, and the follow-up question mode. Everything here is
//! pure state manipulation; the console service owns all IO (the WebSocket
//! connection, terminal rendering, durable identity storage).

pub mod cards;
pub mod controller;
pub mod followup;
pub mod markup;
pub mod protocol;
pub mod timeline;
pub mod transcript;

pub use controller::{SessionController, SessionEvent};
