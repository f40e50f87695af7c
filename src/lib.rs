/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! A rules-correct chess match engine.
//!
//! The crate keeps board state, generates legal destinations for every kind of piece, detects check and
//! checkmate, and performs castling, en passant, and promotion. Rendering and input handling are left to
//! the caller: everything here is a query or a move.
//!
//! ```
//! # use gambit::{Color, Match};
//! let mut game = Match::new();
//! for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
//!     game.realize_move(from.parse()?, to.parse()?)?;
//! }
//! assert!(game.is_finished());
//! assert_eq!(game.current_player(), Color::Black);
//! # Ok::<(), gambit::Error>(())
//! ```

/// Board representation, movement rules, and the match state machine.
mod board;

/// Errors raised by rule operations.
mod error;

pub use board::*;
pub use error::*;
