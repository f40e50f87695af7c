/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Bitboard, Board, Color, Piece, PieceId, PieceKind, Position};

/// `(row, column)` steps of the four orthogonal directions.
pub const ROOK_DELTAS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// `(row, column)` steps of the four diagonal directions.
pub const BISHOP_DELTAS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// All eight directions a Queen or King may step in.
pub const QUEEN_DELTAS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// The eight jumps of a Knight.
pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Column offset from the King to its kingside (short) Rook.
pub const SHORT_ROOK_OFFSET: i8 = 3;

/// Column offset from the King to its queenside (long) Rook.
pub const LONG_ROOK_OFFSET: i8 = -4;

/// Computes every square `piece` could move to on the current `board`.
///
/// This does *not* consider whether the move leaves the mover's own King in check.
/// That filter belongs to [`Match`](crate::Match), which can try the move and take it back.
///
/// `en_passant` is the Pawn that advanced two squares on the previous move, if any.
/// A piece that is not on the board has no destinations.
pub fn legal_destinations(board: &Board, piece: &Piece, en_passant: Option<PieceId>) -> Bitboard {
    let Some(from) = piece.position() else {
        return Bitboard::EMPTY_BOARD;
    };
    let color = piece.color();

    match piece.kind() {
        PieceKind::Rook => sliding_destinations(board, from, color, &ROOK_DELTAS),
        PieceKind::Bishop => sliding_destinations(board, from, color, &BISHOP_DELTAS),
        PieceKind::Queen => sliding_destinations(board, from, color, &QUEEN_DELTAS),
        PieceKind::Knight => stepping_destinations(board, from, color, &KNIGHT_DELTAS),
        PieceKind::King => {
            stepping_destinations(board, from, color, &QUEEN_DELTAS)
                | castling_destinations(board, piece, from)
        }
        PieceKind::Pawn => pawn_destinations(board, piece, from, en_passant),
    }
}

/// Walks each direction from `from` until the edge of the board or the first occupied square,
/// which is included only if it holds an enemy.
pub fn sliding_destinations(
    board: &Board,
    from: Position,
    color: Color,
    deltas: &[(i8, i8)],
) -> Bitboard {
    let mut destinations = Bitboard::EMPTY_BOARD;

    for &(dr, dc) in deltas {
        let mut to = from;
        while let Some(next) = to.offset(dr, dc) {
            match board.piece_at(next) {
                None => destinations.set(next),
                Some(occupant) => {
                    if occupant.color() != color {
                        destinations.set(next);
                    }
                    break;
                }
            }
            to = next;
        }
    }

    destinations
}

/// Every square one `delta` away from `from` that is empty or holds an enemy.
pub fn stepping_destinations(
    board: &Board,
    from: Position,
    color: Color,
    deltas: &[(i8, i8)],
) -> Bitboard {
    deltas
        .iter()
        .filter_map(|&(dr, dc)| from.offset(dr, dc))
        .filter(|&to| board.can_occupy(to, color))
        .collect()
}

/// The two-square King hops for castling.
///
/// Castling towards a side is allowed when the King has never moved, a friendly Rook that has never moved
/// stands at the expected column offset, and every square between them is empty.
/// Whether the King is in check, or crosses an attacked square, is not considered.
pub fn castling_destinations(board: &Board, king: &Piece, from: Position) -> Bitboard {
    let mut destinations = Bitboard::EMPTY_BOARD;
    if king.move_count() != 0 {
        return destinations;
    }

    for rook_offset in [SHORT_ROOK_OFFSET, LONG_ROOK_OFFSET] {
        let Some(rook_square) = from.offset(0, rook_offset) else {
            continue;
        };

        let rook_is_eligible = board.piece_at(rook_square).is_some_and(|rook| {
            rook.is(king.color(), PieceKind::Rook) && rook.move_count() == 0
        });
        if !rook_is_eligible {
            continue;
        }

        let step = rook_offset.signum();
        let path_is_clear = (1..rook_offset.abs())
            .filter_map(|n| from.offset(0, n * step))
            .all(|between| !board.has(between));

        if path_is_clear {
            if let Some(to) = from.offset(0, 2 * step) {
                destinations.set(to);
            }
        }
    }

    destinations
}

/// Pushes, diagonal captures, and en passant captures for a Pawn standing on `from`.
pub fn pawn_destinations(
    board: &Board,
    pawn: &Piece,
    from: Position,
    en_passant: Option<PieceId>,
) -> Bitboard {
    let mut destinations = Bitboard::EMPTY_BOARD;
    let color = pawn.color();
    let forward = color.forward();

    // Single push, then double push if the pawn has never moved
    if let Some(one) = from.offset(forward, 0).filter(|&to| !board.has(to)) {
        destinations.set(one);

        if pawn.move_count() == 0 {
            if let Some(two) = from.offset(2 * forward, 0).filter(|&to| !board.has(to)) {
                destinations.set(two);
            }
        }
    }

    for side in [-1, 1] {
        // Ordinary captures
        if let Some(to) = from.offset(forward, side) {
            if board.has_enemy(to, color) {
                destinations.set(to);
            }
        }

        // En passant: the vulnerable pawn stands right beside us, and we capture "through" it
        if from.row() != color.en_passant_row() {
            continue;
        }
        let Some(beside) = from.offset(0, side) else {
            continue;
        };
        let is_vulnerable = en_passant.is_some_and(|vulnerable| {
            board.id_at(beside) == Some(vulnerable)
                && board.piece(vulnerable).is(color.opponent(), PieceKind::Pawn)
        });
        if is_vulnerable {
            if let Some(to) = from.offset(forward, side) {
                destinations.set(to);
            }
        }
    }

    destinations
}
