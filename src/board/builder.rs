/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{anyhow, bail, Result};

use super::{Color, Match, PieceKind, Position};

/// Represents a [`Match`] setup that has *not* been validated for legality.
///
/// This is useful when you want to start from something other than the standard starting position,
/// such as a puzzle, an endgame, or a test case.
///
/// Castling eligibility comes from move counters, so every piece gets a sensible default:
/// Pawns off their starting row, and Kings or Rooks off their starting squares, count as having moved once.
/// Use [`MatchBuilder::move_count`] to override this.
///
/// ```
/// # use gambit::{Color, MatchBuilder, PieceKind};
/// let game = MatchBuilder::new()
///     .piece("e1".parse()?, Color::White, PieceKind::King)
///     .piece("h1".parse()?, Color::White, PieceKind::Rook)
///     .piece("e8".parse()?, Color::Black, PieceKind::King)
///     .build()?;
///
/// assert!(game.legal_destinations("e1".parse()?)?.contains("g1".parse()?));
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct MatchBuilder {
    pieces: Vec<(Position, Color, PieceKind)>,
    move_counts: Vec<(Position, u32)>,
    side_to_move: Color,
    turn: u32,
    en_passant: Option<Position>,
}

impl MatchBuilder {
    /// Construct a new, empty [`MatchBuilder`], with White to move on turn 1.
    pub fn new() -> Self {
        Self {
            pieces: Vec::new(),
            move_counts: Vec::new(),
            side_to_move: Color::White,
            turn: 1,
            en_passant: None,
        }
    }

    /// Adds a piece to the setup.
    pub fn piece(&mut self, position: Position, color: Color, kind: PieceKind) -> &mut Self {
        self.pieces.push((position, color, kind));
        self
    }

    /// Overrides the move counter of the piece on `position`.
    pub fn move_count(&mut self, position: Position, move_count: u32) -> &mut Self {
        self.move_counts.push((position, move_count));
        self
    }

    /// Sets the player to move.
    pub fn side_to_move(&mut self, color: Color) -> &mut Self {
        self.side_to_move = color;
        self
    }

    /// Sets the turn number.
    pub fn turn(&mut self, turn: u32) -> &mut Self {
        self.turn = turn;
        self
    }

    /// Marks the Pawn on `position` as having just advanced two squares.
    pub fn en_passant(&mut self, position: Position) -> &mut Self {
        self.en_passant = Some(position);
        self
    }

    /// Adds the pieces described by a FEN string.
    ///
    /// The piece placement field is required. The side-to-move and en passant fields are honored if present;
    /// castling rights and the move clocks are ignored.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Color, MatchBuilder};
    /// let game = MatchBuilder::new()
    ///     .placements("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")?
    ///     .build()?;
    ///
    /// assert_eq!(game.current_player(), Color::Black);
    /// assert_eq!(game.en_passant_vulnerable().unwrap().position(), Some("e4".parse()?));
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn placements(&mut self, fen: &str) -> Result<&mut Self> {
        let mut fields = fen.split_whitespace();
        let placements = fields
            .next()
            .ok_or(anyhow!("FEN string must have piece placements."))?;

        // Check if the placements string is the correct length
        if placements.matches('/').count() != Position::ROWS as usize - 1 {
            bail!("FEN must have piece placements for all 8 ranks");
        }

        // The first rank listed is the eighth rank, which is row 0
        for (row, rank) in placements.split('/').enumerate() {
            let mut column = 0;

            for piece_char in rank.chars() {
                if let Some(empty) = piece_char.to_digit(10) {
                    column += empty as i8;
                    if column > Position::COLUMNS {
                        bail!("FEN rank {rank:?} describes more than 8 columns");
                    }
                    continue;
                }

                let kind = PieceKind::from_char(piece_char).map_err(|_| {
                    anyhow!("FEN placements must contain piece chars or digits. Got {piece_char:?}")
                })?;
                let color = if piece_char.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };

                let position = Position::new(row as i8, column);
                if !position.is_valid() {
                    bail!("FEN rank {rank:?} describes more than 8 columns");
                }
                self.piece(position, color, kind);
                column += 1;
            }

            if column != Position::COLUMNS {
                bail!("FEN rank {rank:?} must describe exactly 8 columns. Got {column}");
            }
        }

        if let Some(side) = fields.next() {
            self.side_to_move = match side {
                "w" | "W" => Color::White,
                "b" | "B" => Color::Black,
                _ => bail!("Invalid side to move in FEN: Must be either `w` or `b`. Got {side:?}"),
            };
        }

        // Castling rights come from move counters
        let _castling = fields.next();

        if let Some(target) = fields.next().filter(|&ep| ep != "-") {
            let target: Position = target
                .parse()
                .map_err(|e| anyhow!("Invalid en passant square in FEN: {e}"))?;

            // The square skipped over lies behind the pawn that just moved
            let pawn_color = self.side_to_move.opponent();
            let pawn = target
                .offset(pawn_color.forward(), 0)
                .ok_or(anyhow!("En passant square {target} has no pawn in front of it"))?;
            self.en_passant = Some(pawn);
        }

        Ok(self)
    }

    /// Builds the [`Match`].
    ///
    /// Fails if two pieces share a square, if a move counter override or the en passant square
    /// does not name a suitable piece. Kings are not required, so broken positions can be built on purpose.
    ///
    /// If the side to move is already checkmated, the match is finished and the other side is the current player,
    /// just as after [`Match::realize_move`] delivers mate.
    pub fn build(&self) -> Result<Match> {
        let mut game = Match::empty();

        for &(position, color, kind) in &self.pieces {
            if !position.is_valid() {
                bail!("Cannot place a {color} {kind} at {position}: it is off the board");
            }
            if game.board.has(position) {
                bail!("Cannot place a {color} {kind} at {position}: the square is already occupied");
            }

            let id = game.add_piece(color, kind, position);
            let move_count = u32::from(!is_starting_square(position, color, kind));
            game.board.piece_mut(id).set_move_count(move_count);
        }

        for &(position, move_count) in &self.move_counts {
            let id = game
                .board
                .id_at(position)
                .ok_or(anyhow!("Cannot set the move count of {position}: it is empty"))?;
            game.board.piece_mut(id).set_move_count(move_count);
        }

        if let Some(position) = self.en_passant {
            let pawn = game
                .board
                .piece_at(position)
                .filter(|piece| piece.is_pawn())
                .ok_or(anyhow!("En passant requires a pawn on {position}"))?;
            game.en_passant = Some(pawn.id());
        }

        game.current_player = self.side_to_move;
        game.turn = self.turn;

        // Without a King there is nothing to check; the error surfaces once the match is played
        game.check = game.is_in_check(self.side_to_move).unwrap_or(false);
        game.finished = game.check && game.is_checkmate(self.side_to_move).unwrap_or(false);

        // A finished match names the winner as the current player
        if game.finished {
            game.current_player = self.side_to_move.opponent();
        }

        Ok(game)
    }
}

impl Default for MatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns `true` if a piece standing here in the standard starting position could still be unmoved.
fn is_starting_square(position: Position, color: Color, kind: PieceKind) -> bool {
    match kind {
        PieceKind::Pawn => position.row() == color.pawn_row(),
        PieceKind::King => position == Position::new(color.back_row(), 4),
        PieceKind::Rook => {
            position.row() == color.back_row()
                && (position.column() == 0 || position.column() == Position::COLUMNS - 1)
        }
        _ => position.row() == color.back_row(),
    }
}
