/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::BitOr};

use super::Position;

/// A [`Bitboard`] is a boolean matrix over every square of the board, packed into 64 bits.
///
/// It is the legal-destination matrix returned by movement rules: a bit is set wherever a piece could move.
///
/// Bits are laid out row-major, so bit `0` is `a8` (row `0`, column `0`) and bit `63` is `h1`:
/// ```text
/// a8 b8 c8 ... h8    bits  0 ..  7
/// a7 b7 c7 ... h7    bits  8 .. 15
/// ...
/// a1 b1 c1 ... h1    bits 56 .. 63
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Bitboard(pub(crate) u64);

impl Bitboard {
    pub const EMPTY_BOARD: Self = Self(0x0000000000000000);
    pub const FULL_BOARD: Self = Self(0xFFFFFFFFFFFFFFFF);

    /// Constructs a new [`Bitboard`] with only the provided [`Position`] set.
    ///
    /// Positions off the board yield an empty [`Bitboard`].
    ///
    /// # Example
    /// ```
    /// # use gambit::{Bitboard, Position};
    /// let a8 = Bitboard::from_position(Position::new(0, 0));
    /// assert_eq!(a8.inner(), 1);
    ///
    /// let off_board = Bitboard::from_position(Position::new(8, 0));
    /// assert!(off_board.is_empty());
    /// ```
    #[inline(always)]
    pub const fn from_position(position: Position) -> Self {
        if position.is_valid() {
            Self(1 << position.index())
        } else {
            Self::EMPTY_BOARD
        }
    }

    /// Returns the inner `u64` of this [`Bitboard`].
    #[inline(always)]
    pub const fn inner(&self) -> u64 {
        self.0
    }

    /// Returns `true` if no squares are set.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the provided [`Position`] is set.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Bitboard, Position};
    /// let mut board = Bitboard::EMPTY_BOARD;
    /// board.set(Position::new(4, 4));
    /// assert!(board.contains(Position::new(4, 4)));
    /// assert!(!board.contains(Position::new(4, 5)));
    /// ```
    #[inline(always)]
    pub const fn contains(&self, position: Position) -> bool {
        self.0 & Self::from_position(position).0 != 0
    }

    /// Sets the provided [`Position`]. Positions off the board are ignored.
    #[inline(always)]
    pub fn set(&mut self, position: Position) {
        self.0 |= Self::from_position(position).0;
    }

    /// Clears the provided [`Position`].
    #[inline(always)]
    pub fn clear(&mut self, position: Position) {
        self.0 &= !Self::from_position(position).0;
    }

    /// Returns the number of set squares.
    ///
    /// # Example
    /// ```
    /// # use gambit::Bitboard;
    /// assert_eq!(Bitboard::FULL_BOARD.population(), 64);
    /// assert_eq!(Bitboard::EMPTY_BOARD.population(), 0);
    /// ```
    #[inline(always)]
    pub const fn population(&self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Returns the lowest set [`Position`], if any, and clears it.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<Position> {
        let index = self.0.trailing_zeros() as usize;
        let position = Position::from_index(index)?;
        self.0 &= self.0 - 1;
        Some(position)
    }

    /// An iterator over all set [`Position`]s, in row-major order.
    #[inline(always)]
    pub const fn iter(&self) -> BitboardIter {
        BitboardIter { bitboard: *self }
    }

    /// Expands this [`Bitboard`] into a `rows x columns` boolean matrix.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Bitboard, Position};
    /// let matrix = Bitboard::from_position(Position::new(7, 0)).to_matrix();
    /// assert!(matrix[7][0]);
    /// assert!(!matrix[0][7]);
    /// ```
    pub fn to_matrix(&self) -> [[bool; Position::COLUMNS as usize]; Position::ROWS as usize] {
        let mut matrix = [[false; Position::COLUMNS as usize]; Position::ROWS as usize];
        for position in self.iter() {
            matrix[position.row() as usize][position.column() as usize] = true;
        }
        matrix
    }
}

impl FromIterator<Position> for Bitboard {
    fn from_iter<T: IntoIterator<Item = Position>>(iter: T) -> Self {
        let mut board = Self::EMPTY_BOARD;
        for position in iter {
            board.set(position);
        }
        board
    }
}

impl BitOr for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Allocate just enough capacity
        let mut board = String::with_capacity(136);

        for row in 0..Position::ROWS {
            for column in 0..Position::COLUMNS {
                let occupant = if self.contains(Position::new(row, column)) {
                    'X'
                } else {
                    '.'
                };

                board.push(occupant);
                board.push(' ');
            }
            board.push('\n');
        }

        write!(f, "{board}")
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitboard({:#018X})\n{self}", self.0)
    }
}

/// An iterator over all set [`Position`]s in a [`Bitboard`].
pub struct BitboardIter {
    bitboard: Bitboard,
}

impl Iterator for BitboardIter {
    type Item = Position;
    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.bitboard.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bitboard.population() as usize;
        (size, Some(size))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Position;
    type IntoIter = BitboardIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_yields_row_major_positions() {
        let board: Bitboard = [Position::new(7, 7), Position::new(0, 1), Position::new(3, 3)]
            .into_iter()
            .collect();

        let positions: Vec<_> = board.iter().collect();
        assert_eq!(
            positions,
            vec![Position::new(0, 1), Position::new(3, 3), Position::new(7, 7)]
        );
        assert_eq!(board.iter().len(), 3);
    }

    #[test]
    fn test_set_and_clear() {
        let mut board = Bitboard::EMPTY_BOARD;
        let h1 = Position::new(7, 7);
        board.set(h1);
        assert_eq!(board.inner(), 1 << 63);
        board.clear(h1);
        assert!(board.is_empty());

        board.set(Position::new(-1, 0));
        assert!(board.is_empty());
    }
}
