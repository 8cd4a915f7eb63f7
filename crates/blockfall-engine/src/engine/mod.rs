//! Game logic: the state machine, the piece supply, and scoring.
//!
//! - [`Game`]: the authoritative state machine (board, falling piece,
//!   ghost, hold, gravity, game-over)
//! - [`PieceQueue`]: 7-bag randomizer feeding the upcoming-piece preview
//! - [`GameStats`]: score, lines, level, and the clear histogram
//! - [`GameSeed`]: seed for a reproducible piece sequence
//!
//! A host drives a [`Game`] from a single thread: one [`Game::update`] call
//! per fixed tick, action calls on input, accessor reads when rendering.

pub use self::{game::*, piece_queue::*, stats::*};

mod game;
mod piece_queue;
mod stats;
