/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Boolean matrices over the board, used for legal destinations.
mod bitboard;

/// Custom match setups.
mod builder;

/// The match state machine: turns, check, checkmate, and special moves.
mod game;

/// Piece placement on the 8x8 grid.
mod grid;

/// Movement rules for every kind of piece.
mod movegen;

/// Move-tree node counting, for verifying move generation.
mod perft;

/// Colors, piece kinds, and pieces.
mod piece;

/// Board coordinates.
mod position;

pub use bitboard::*;
pub use builder::*;
pub use game::*;
pub use grid::*;
pub use movegen::*;
pub use perft::*;
pub use piece::*;
pub use position::*;
