/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Color, Piece, PieceId, PieceKind, Position};
use crate::{Error, Result};

/// Represents all pieces and their locations on a chess board.
///
/// Has no knowledge of turns, check, or move legality. If you need those, see [`Match`](crate::Match).
///
/// Every piece ever created lives in an arena owned by the board and is addressed by its [`PieceId`].
/// The grid only stores ids, so a piece that is taken off the board (captured, or replaced on promotion)
/// keeps its identity and can be inspected or put back later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    /// Every piece created on this board, indexed by [`PieceId`].
    pieces: Vec<Piece>,

    /// Occupant of every square, row-major.
    grid: [Option<PieceId>; (Position::ROWS * Position::COLUMNS) as usize],
}

impl Board {
    /// Number of rows on the board.
    pub const ROWS: i8 = Position::ROWS;

    /// Number of columns on the board.
    pub const COLUMNS: i8 = Position::COLUMNS;

    /// Creates a new, empty [`Board`] containing no pieces.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            pieces: Vec::new(),
            grid: [None; (Position::ROWS * Position::COLUMNS) as usize],
        }
    }

    /// Creates a new piece in this board's arena. The piece is not placed anywhere yet.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Color, PieceKind};
    /// let mut board = Board::new();
    /// let id = board.spawn(Color::White, PieceKind::Knight);
    /// assert_eq!(board.piece(id).position(), None);
    /// ```
    pub fn spawn(&mut self, color: Color, kind: PieceKind) -> PieceId {
        let id = PieceId(self.pieces.len() as u16);
        self.pieces.push(Piece::new(id, color, kind));
        id
    }

    /// Fetches a piece by identity, wherever it is.
    ///
    /// # Panics
    /// If `id` was not created by this board.
    #[inline(always)]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    #[inline(always)]
    pub(crate) fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pieces[id.index()]
    }

    /// Places the piece identified by `id` at `position`, updating the piece's position.
    ///
    /// If another piece occupies this square, this does *not* remove that piece.
    /// Use [`Board::remove`] first.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Color, PieceKind, Position};
    /// let mut board = Board::new();
    /// let rook = board.spawn(Color::Black, PieceKind::Rook);
    /// let d4 = Position::new(4, 3);
    /// board.place(rook, d4);
    /// assert_eq!(board.piece_at(d4).map(|p| p.id()), Some(rook));
    /// assert_eq!(board.piece(rook).position(), Some(d4));
    /// ```
    pub fn place(&mut self, id: PieceId, position: Position) {
        debug_assert!(position.is_valid(), "Cannot place a piece at {position:?}");
        debug_assert!(
            self.grid[position.index()].is_none(),
            "{position} is already occupied"
        );
        self.grid[position.index()] = Some(id);
        self.piece_mut(id).set_position(Some(position));
    }

    /// Removes and returns the occupant of `position`, if there is one, clearing its position.
    pub fn remove(&mut self, position: Position) -> Option<PieceId> {
        if !position.is_valid() {
            return None;
        }

        let id = self.grid[position.index()].take()?;
        self.piece_mut(id).set_position(None);
        Some(id)
    }

    /// Fetches the [`PieceId`] standing at `position`, if any. Positions off the board are always empty.
    #[inline(always)]
    pub fn id_at(&self, position: Position) -> Option<PieceId> {
        if position.is_valid() {
            self.grid[position.index()]
        } else {
            None
        }
    }

    /// Fetches the [`Piece`] standing at `position`, if any. Positions off the board are always empty.
    #[inline(always)]
    pub fn piece_at(&self, position: Position) -> Option<&Piece> {
        self.id_at(position).map(|id| self.piece(id))
    }

    /// Bounds-checked lookup of the occupant of `position`.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Board, Error, Position};
    /// let board = Board::new();
    /// assert_eq!(board.occupant(Position::new(0, 0)), Ok(None));
    ///
    /// let off_board = Position::new(0, 8);
    /// assert_eq!(board.occupant(off_board), Err(Error::OutOfBounds(off_board)));
    /// ```
    pub fn occupant(&self, position: Position) -> Result<Option<&Piece>> {
        if !position.is_valid() {
            return Err(Error::OutOfBounds(position));
        }
        Ok(self.piece_at(position))
    }

    /// Returns `true` if there is a piece at the given [`Position`].
    #[inline(always)]
    pub fn has(&self, position: Position) -> bool {
        self.id_at(position).is_some()
    }

    /// Returns `true` if a piece of `color` may end a move on `position`: it is empty or holds an enemy.
    #[inline(always)]
    pub fn can_occupy(&self, position: Position, color: Color) -> bool {
        self.piece_at(position)
            .map_or(true, |occupant| occupant.color() != color)
    }

    /// Returns `true` if `position` holds a piece of the opposite color to `color`.
    #[inline(always)]
    pub fn has_enemy(&self, position: Position, color: Color) -> bool {
        self.piece_at(position)
            .is_some_and(|occupant| occupant.color() != color)
    }

    /// An iterator over every piece currently on the board, in row-major order of their squares.
    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.grid.iter().flatten().map(|&id| self.piece(id))
    }
}

impl Default for Board {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_detaches_piece() {
        let mut board = Board::new();
        let pawn = board.spawn(Color::White, PieceKind::Pawn);
        let e2 = Position::new(6, 4);
        board.place(pawn, e2);

        assert_eq!(board.remove(e2), Some(pawn));
        assert_eq!(board.piece(pawn).position(), None);
        assert!(!board.has(e2));
        assert_eq!(board.remove(e2), None);
    }

    #[test]
    fn test_corners_are_in_bounds() {
        let board = Board::new();
        let h1 = Position::new(Board::ROWS - 1, Board::COLUMNS - 1);
        assert_eq!(board.occupant(h1), Ok(None));

        let past_h1 = Position::new(Board::ROWS, Board::COLUMNS - 1);
        assert_eq!(board.occupant(past_h1), Err(Error::OutOfBounds(past_h1)));
    }

    #[test]
    fn test_can_occupy() {
        let mut board = Board::new();
        let white = board.spawn(Color::White, PieceKind::Bishop);
        let black = board.spawn(Color::Black, PieceKind::Bishop);
        board.place(white, Position::new(0, 0));
        board.place(black, Position::new(1, 1));

        assert!(board.can_occupy(Position::new(2, 2), Color::White));
        assert!(board.can_occupy(Position::new(1, 1), Color::White));
        assert!(!board.can_occupy(Position::new(0, 0), Color::White));
        assert!(board.has_enemy(Position::new(0, 0), Color::Black));
        assert!(!board.has_enemy(Position::new(2, 2), Color::Black));
    }

    #[test]
    fn test_iter_only_yields_placed_pieces() {
        let mut board = Board::new();
        let a = board.spawn(Color::White, PieceKind::Rook);
        let _unplaced = board.spawn(Color::White, PieceKind::Rook);
        board.place(a, Position::new(7, 0));

        let ids: Vec<_> = board.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![a]);
    }
}
