/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Not};

use anyhow::{bail, Result};

use super::Position;

/// Represents the color of a player or piece.
///
/// White moves first, and therefore [`Color`] defaults to [`Color::White`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Returns this [`Color`]'s opposite / enemy.
    ///
    /// # Example
    /// ```
    /// # use gambit::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Returns `true` if this [`Color`] is White.
    #[inline(always)]
    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    /// Returns `true` if this [`Color`] is Black.
    #[inline(always)]
    pub const fn is_black(&self) -> bool {
        matches!(self, Self::Black)
    }

    /// The row delta of a single step "forward" for this [`Color`].
    ///
    /// Row `0` is Black's back rank, so White advances towards lower rows.
    ///
    /// # Example
    /// ```
    /// # use gambit::Color;
    /// assert_eq!(Color::White.forward(), -1);
    /// assert_eq!(Color::Black.forward(), 1);
    /// ```
    #[inline(always)]
    pub const fn forward(&self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// The row of this [`Color`]'s back rank.
    #[inline(always)]
    pub const fn back_row(&self) -> i8 {
        match self {
            Self::White => Position::ROWS - 1,
            Self::Black => 0,
        }
    }

    /// The row this [`Color`]'s Pawns start on.
    #[inline(always)]
    pub const fn pawn_row(&self) -> i8 {
        self.back_row() + self.forward()
    }

    /// The row this [`Color`]'s Pawns promote on.
    #[inline(always)]
    pub const fn promotion_row(&self) -> i8 {
        self.opponent().back_row()
    }

    /// The row a Pawn of this [`Color`] must stand on to capture en passant.
    #[inline(always)]
    pub const fn en_passant_row(&self) -> i8 {
        match self {
            Self::White => 3,
            Self::Black => 4,
        }
    }

    /// Returns this [`Color`] as a `usize`, for indexing into lists.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Fetches a human-readable name for this [`Color`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

impl Not for Color {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Represents the kind (or "role") that a chess piece can be.
///
/// These have no [`Color`] associated with them. See [`Piece`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Number of piece variants.
    pub const COUNT: usize = 6;

    /// An array of all 6 [`PieceKind`]s.
    ///
    /// In the order: `Pawn`, `Knight`, `Bishop`, `Rook`, `Queen`, `King`.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        use PieceKind::*;
        [Pawn, Knight, Bishop, Rook, Queen, King]
    }

    /// Creates a [`PieceKind`] from its (case-insensitive) letter.
    ///
    /// # Example
    /// ```
    /// # use gambit::PieceKind;
    /// assert_eq!(PieceKind::from_char('n').unwrap(), PieceKind::Knight);
    /// assert_eq!(PieceKind::from_char('Q').unwrap(), PieceKind::Queen);
    /// assert!(PieceKind::from_char('x').is_err());
    /// ```
    pub fn from_char(kind: char) -> Result<Self> {
        use PieceKind::*;
        match kind.to_ascii_lowercase() {
            'p' => Ok(Pawn),
            'n' => Ok(Knight),
            'b' => Ok(Bishop),
            'r' => Ok(Rook),
            'q' => Ok(Queen),
            'k' => Ok(King),
            _ => bail!("Invalid char for PieceKind: Must be one of [pnbrqk]. Got {kind:?}"),
        }
    }

    /// The lowercase letter of this [`PieceKind`].
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    /// Fetches a human-readable name for this [`PieceKind`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Stable identity of a piece within a [`Board`](super::Board).
///
/// Two pieces may share color, kind and move count; they never share a [`PieceId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) u16);

impl PieceId {
    /// Index of this piece in its board's piece arena.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single chess piece and its bookkeeping.
///
/// The owning [`Board`](super::Board) keeps `position` in sync with its grid:
/// it is `None` until the piece is placed and again after it is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    id: PieceId,
    color: Color,
    kind: PieceKind,
    move_count: u32,
    position: Option<Position>,
}

impl Piece {
    pub(crate) const fn new(id: PieceId, color: Color, kind: PieceKind) -> Self {
        Self {
            id,
            color,
            kind,
            move_count: 0,
            position: None,
        }
    }

    /// Identity of this piece.
    #[inline(always)]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    /// Fetches the [`Color`] of this [`Piece`].
    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Fetches the [`PieceKind`] of this [`Piece`].
    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Number of times this piece has been moved. Only consulted for castling and double pawn pushes.
    #[inline(always)]
    pub const fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Where this piece currently stands, if it is on the board.
    #[inline(always)]
    pub const fn position(&self) -> Option<Position> {
        self.position
    }

    /// Returns `true` if this piece is of the provided [`Color`] and [`PieceKind`].
    #[inline(always)]
    pub fn is(&self, color: Color, kind: PieceKind) -> bool {
        self.color == color && self.kind == kind
    }

    /// Returns `true` if this [`Piece`] is a Pawn.
    #[inline(always)]
    pub const fn is_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
    }

    /// Returns `true` if this [`Piece`] is a Rook.
    #[inline(always)]
    pub const fn is_rook(&self) -> bool {
        matches!(self.kind, PieceKind::Rook)
    }

    /// Returns `true` if this [`Piece`] is a King.
    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    /// The letter used for this piece in placement strings: uppercase for White, lowercase for Black.
    #[inline(always)]
    pub const fn char(&self) -> char {
        let c = self.kind.char();
        if self.color.is_white() {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    #[inline(always)]
    pub(crate) fn increment_move_count(&mut self) {
        self.move_count += 1;
    }

    #[inline(always)]
    pub(crate) fn decrement_move_count(&mut self) {
        debug_assert!(self.move_count > 0, "{self} was never moved");
        self.move_count = self.move_count.saturating_sub(1);
    }

    #[inline(always)]
    pub(crate) fn set_move_count(&mut self, move_count: u32) {
        self.move_count = move_count;
    }

    #[inline(always)]
    pub(crate) fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}
