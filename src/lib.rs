//! Stellar Strike: a single-screen arcade shooter.
//!
//! The library holds the whole simulation. Every state transition in
//! [`compute`] is a pure function of the previous [`entities::GameState`],
//! the held controls, and an injected RNG, so a seeded RNG replays a run
//! frame for frame. The binary adds terminal rendering and input on top.

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod levels;
pub mod movement;
pub mod records;

pub use error::{GameError, Result};
