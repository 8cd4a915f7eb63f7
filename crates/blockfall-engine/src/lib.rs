//! Rules engine for a falling-block puzzle game.
//!
//! The engine owns the authoritative board state, piece spawning, movement
//! and rotation validation, locking, line clearing, scoring, leveling, and
//! the randomized piece supply. It performs no I/O and reads no clock: a
//! host loop feeds it a fixed time quantum via [`Game::update`] and calls
//! the discrete actions in response to input, while a renderer polls the
//! read-only accessors once per frame.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
