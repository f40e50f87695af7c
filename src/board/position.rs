/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use crate::{Error, Result};

/// A coordinate on the board, as a `(row, column)` pair.
///
/// Row `0` is the eighth rank (Black's back rank) and row `7` is the first rank.
/// Column `0` is the a-file.
///
/// A [`Position`] may lie outside of the board (that is what [`Position::is_valid`] is for),
/// which makes offset arithmetic trivial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    row: i8,
    column: i8,
}

impl Position {
    /// Number of rows on the board.
    pub const ROWS: i8 = 8;

    /// Number of columns on the board.
    pub const COLUMNS: i8 = 8;

    /// Creates a new [`Position`] from a row and column. No bounds checks are performed.
    ///
    /// # Example
    /// ```
    /// # use gambit::Position;
    /// let e4 = Position::new(4, 4);
    /// assert_eq!(e4.to_string(), "e4");
    /// ```
    #[inline(always)]
    pub const fn new(row: i8, column: i8) -> Self {
        Self { row, column }
    }

    /// The row of this [`Position`].
    #[inline(always)]
    pub const fn row(&self) -> i8 {
        self.row
    }

    /// The column of this [`Position`].
    #[inline(always)]
    pub const fn column(&self) -> i8 {
        self.column
    }

    /// Returns `true` if this [`Position`] lies on the board.
    ///
    /// # Example
    /// ```
    /// # use gambit::Position;
    /// assert!(Position::new(0, 7).is_valid());
    /// assert!(!Position::new(8, 0).is_valid());
    /// assert!(!Position::new(3, -1).is_valid());
    /// ```
    #[inline(always)]
    pub const fn is_valid(&self) -> bool {
        0 <= self.row && self.row < Self::ROWS && 0 <= self.column && self.column < Self::COLUMNS
    }

    /// Index of this [`Position`] into a row-major array of all squares.
    ///
    /// Only meaningful if [`Position::is_valid`].
    #[inline(always)]
    pub const fn index(&self) -> usize {
        (self.row * Self::COLUMNS + self.column) as usize
    }

    /// Creates a [`Position`] from a row-major index, if that index is on the board.
    #[inline(always)]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < (Self::ROWS * Self::COLUMNS) as usize {
            let index = index as i8;
            Some(Self::new(index / Self::COLUMNS, index % Self::COLUMNS))
        } else {
            None
        }
    }

    /// Shifts this [`Position`] by the provided deltas, returning `None` if the result falls off the board.
    ///
    /// # Example
    /// ```
    /// # use gambit::Position;
    /// let a8 = Position::new(0, 0);
    /// assert_eq!(a8.offset(1, 2), Some(Position::new(1, 2)));
    /// assert_eq!(a8.offset(-1, 0), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, rows: i8, columns: i8) -> Option<Self> {
        let shifted = Self::new(self.row + rows, self.column + columns);
        if shifted.is_valid() {
            Some(shifted)
        } else {
            None
        }
    }

    /// An iterator over every [`Position`] on the board, in row-major order starting at `a8`.
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..Self::ROWS).flat_map(|row| (0..Self::COLUMNS).map(move |column| Self::new(row, column)))
    }

    /// Converts this [`Position`] to its algebraic form.
    ///
    /// # Example
    /// ```
    /// # use gambit::{AlgebraicPosition, Position};
    /// let a1 = Position::new(7, 0).to_algebraic().unwrap();
    /// assert_eq!(a1, AlgebraicPosition::new('a', 1));
    /// assert!(Position::new(9, 0).to_algebraic().is_err());
    /// ```
    pub fn to_algebraic(&self) -> Result<AlgebraicPosition> {
        if !self.is_valid() {
            return Err(Error::OutOfBounds(*self));
        }

        Ok(AlgebraicPosition::new(
            (b'a' + self.column as u8) as char,
            (Self::ROWS - self.row) as u8,
        ))
    }
}

impl FromStr for Position {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<AlgebraicPosition>()?.to_position()
    }
}

impl TryFrom<AlgebraicPosition> for Position {
    type Error = Error;
    fn try_from(value: AlgebraicPosition) -> Result<Self, Self::Error> {
        value.to_position()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_algebraic() {
            Ok(algebraic) => write!(f, "{algebraic}"),
            Err(_) => write!(f, "({}, {})", self.row, self.column),
        }
    }
}

/// A coordinate in the notation players use: a file letter `a-h` and a rank `1-8`.
///
/// Construction is unchecked; validation happens when converting to a [`Position`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AlgebraicPosition {
    column: char,
    rank: u8,
}

impl AlgebraicPosition {
    /// Creates a new [`AlgebraicPosition`] without validating it.
    #[inline(always)]
    pub const fn new(column: char, rank: u8) -> Self {
        Self { column, rank }
    }

    /// The file letter.
    #[inline(always)]
    pub const fn column(&self) -> char {
        self.column
    }

    /// The rank number.
    #[inline(always)]
    pub const fn rank(&self) -> u8 {
        self.rank
    }

    /// Converts to the internal `(row, column)` representation.
    ///
    /// `row = 8 - rank` and `column = letter - 'a'`.
    ///
    /// # Example
    /// ```
    /// # use gambit::{AlgebraicPosition, Position, Error};
    /// assert_eq!(AlgebraicPosition::new('c', 8).to_position(), Ok(Position::new(0, 2)));
    ///
    /// let err = AlgebraicPosition::new('i', 1).to_position();
    /// assert_eq!(err, Err(Error::InvalidCoordinate { column: 'i', rank: 1 }));
    /// ```
    pub fn to_position(&self) -> Result<Position> {
        if !('a'..='h').contains(&self.column) || !(1..=8).contains(&self.rank) {
            return Err(Error::InvalidCoordinate {
                column: self.column,
                rank: self.rank,
            });
        }

        Ok(Position::new(
            Position::ROWS - self.rank as i8,
            (self.column as u8 - b'a') as i8,
        ))
    }
}

impl FromStr for AlgebraicPosition {
    type Err = Error;

    /// Parses a two-character coordinate such as `"e4"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let column = chars.next().unwrap_or(' ').to_ascii_lowercase();
        let rank = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .map(|d| d as u8)
            .unwrap_or(0);

        let algebraic = Self::new(column, rank);
        if chars.next().is_some() {
            return Err(Error::InvalidCoordinate { column, rank });
        }

        // Validate eagerly so a parsed value is always convertible
        algebraic.to_position()?;
        Ok(algebraic)
    }
}

impl fmt::Display for AlgebraicPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algebraic_round_trip_over_whole_board() {
        for pos in Position::iter() {
            let algebraic = pos.to_algebraic().unwrap();
            assert_eq!(algebraic.to_position().unwrap(), pos);
            assert_eq!(algebraic.to_string().parse::<Position>().unwrap(), pos);
        }
    }

    #[test]
    fn test_corner_coordinates() {
        assert_eq!("a8".parse::<Position>().unwrap(), Position::new(0, 0));
        assert_eq!("h1".parse::<Position>().unwrap(), Position::new(7, 7));
        assert_eq!("e2".parse::<Position>().unwrap(), Position::new(6, 4));
    }

    #[test]
    fn test_invalid_coordinates() {
        for bad in ["i1", "a0", "a9", "", "e", "e44", "44"] {
            assert!(
                matches!(
                    bad.parse::<AlgebraicPosition>(),
                    Err(Error::InvalidCoordinate { .. })
                ),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_index_round_trip() {
        for (i, pos) in Position::iter().enumerate() {
            assert_eq!(pos.index(), i);
            assert_eq!(Position::from_index(i), Some(pos));
        }
        assert_eq!(Position::from_index(64), None);
    }

    #[test]
    fn test_out_of_bounds_display() {
        assert_eq!(Position::new(-1, 3).to_string(), "(-1, 3)");
    }
}
