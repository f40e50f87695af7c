/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

use crate::{Color, Position};

/// Everything that can go wrong while querying or playing a [`Match`](crate::Match).
///
/// None of these are transient. A rejected move leaves the match exactly as it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// An algebraic coordinate outside of `a-h` / `1-8`.
    #[error("Invalid coordinate: {column:?}{rank} is not within a1-h8")]
    InvalidCoordinate { column: char, rank: u8 },

    /// A [`Position`] that does not lie on the board.
    #[error("Position {0:?} is out of bounds")]
    OutOfBounds(Position),

    /// There is no piece on the chosen origin square.
    #[error("There is no piece on {0}")]
    EmptyOrigin(Position),

    /// The piece on the origin square belongs to the other player.
    #[error("The piece on {origin} is not yours, it is {to_move}'s turn")]
    NotYourPiece { origin: Position, to_move: Color },

    /// The piece on the origin square cannot move anywhere.
    #[error("The piece on {0} has no possible moves")]
    NoLegalMoves(Position),

    /// The destination is not reachable by the piece on the origin square.
    #[error("The piece on {origin} cannot move to {destination}")]
    IllegalDestination {
        origin: Position,
        destination: Position,
    },

    /// The move would leave the mover's own King in check. The move has been rolled back.
    #[error("You cannot put yourself in check")]
    SelfCheckNotAllowed,

    /// A color has no King in play.
    ///
    /// Standard play never removes a King, so this means the match state is corrupt.
    #[error("There is no {0} King on the board")]
    NoKingOnBoard(Color),

    /// The match already ended in checkmate.
    #[error("The match is over")]
    MatchFinished,
}

/// Shorthand for results of rule operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
