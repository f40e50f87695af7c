/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{collections::BTreeSet, ops::Deref};

use tracing::{debug, trace};

use super::{
    legal_destinations, perft, Bitboard, Board, Color, Piece, PieceId, PieceKind, Position,
    LONG_ROOK_OFFSET, SHORT_ROOK_OFFSET,
};
use crate::{Error, Result};

/// Back rank layout, from the a-file to the h-file.
const BACK_RANK: [PieceKind; Position::COLUMNS as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Summary of a move that was accepted by [`Match::realize_move`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveReport {
    /// The piece that moved, as it stood right after moving (before any promotion).
    pub piece: Piece,

    /// The piece that was captured, if any. For en passant this is the Pawn beside the origin.
    pub captured: Option<Piece>,

    /// The Queen that replaced the moving Pawn, if it promoted.
    pub promoted: Option<Piece>,

    /// Whether the opponent is now in check.
    pub check: bool,

    /// Whether the opponent is now checkmated, ending the match.
    pub checkmate: bool,
}

/// A game of chess between two players.
///
/// This type owns the [`Board`] and all turn state: whose turn it is, which pieces have been captured,
/// whether someone is in check, and which Pawn (if any) may be captured en passant.
///
/// The basic methods you're probably looking for are [`Match::new`], [`Match::validate_origin`],
/// [`Match::validate_destination`], and [`Match::realize_move`].
///
/// # Example
/// ```
/// # use gambit::{Color, Match};
/// let mut game = Match::new();
/// game.realize_move("e2".parse()?, "e4".parse()?)?;
/// assert_eq!(game.turn(), 2);
/// assert_eq!(game.current_player(), Color::Black);
/// # Ok::<(), gambit::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    /// Piece placement and the arena of every piece ever created.
    pub(crate) board: Board,

    /// Every piece that entered play. Promoted Pawns leave this set; captured pieces stay in it.
    pub(crate) pieces: BTreeSet<PieceId>,

    /// Every piece that has been captured.
    pub(crate) captured: BTreeSet<PieceId>,

    /// Starts at 1 and increases after every completed move.
    pub(crate) turn: u32,

    /// Whose turn it is.
    pub(crate) current_player: Color,

    /// Set once the match ended in checkmate.
    pub(crate) finished: bool,

    /// Whether the side to move is in check.
    pub(crate) check: bool,

    /// The Pawn that advanced two squares on the last move, if any.
    pub(crate) en_passant: Option<PieceId>,
}

impl Match {
    /// Creates a new [`Match`] from the standard starting position, with White to move on turn 1.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Color, Match};
    /// let game = Match::new();
    /// assert_eq!(game.pieces_in_play(Color::White).count(), 16);
    /// assert_eq!(game.pieces_in_play(Color::Black).count(), 16);
    /// assert_eq!(game.captured_pieces(Color::White).count(), 0);
    /// ```
    pub fn new() -> Self {
        let mut game = Self::empty();

        for color in Color::all() {
            for (column, kind) in BACK_RANK.into_iter().enumerate() {
                let column = column as i8;
                game.add_piece(color, kind, Position::new(color.back_row(), column));
                game.add_piece(color, PieceKind::Pawn, Position::new(color.pawn_row(), column));
            }
        }

        game
    }

    /// A [`Match`] with nothing on the board. Only for setting up custom positions.
    pub(crate) fn empty() -> Self {
        Self {
            board: Board::new(),
            pieces: BTreeSet::new(),
            captured: BTreeSet::new(),
            turn: 1,
            current_player: Color::White,
            finished: false,
            check: false,
            en_passant: None,
        }
    }

    /// Creates a new piece, puts it on the board, and registers it as in play.
    pub(crate) fn add_piece(&mut self, color: Color, kind: PieceKind, position: Position) -> PieceId {
        let id = self.board.spawn(color, kind);
        self.board.place(id, position);
        self.pieces.insert(id);
        id
    }

    /// The current [`Board`].
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Fetches a piece by identity, whether it is on the board or not.
    #[inline(always)]
    pub fn piece(&self, id: PieceId) -> &Piece {
        self.board.piece(id)
    }

    /// The current turn number. Starts at 1 and increases after every completed move.
    #[inline(always)]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// The [`Color`] of the player to move. Once the match is finished, this is the winner.
    #[inline(always)]
    pub const fn current_player(&self) -> Color {
        self.current_player
    }

    /// Returns `true` once the match has ended in checkmate.
    #[inline(always)]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns `true` if the last move put the opponent in check.
    #[inline(always)]
    pub const fn is_check(&self) -> bool {
        self.check
    }

    /// The Pawn that may currently be captured en passant, if any.
    #[inline(always)]
    pub fn en_passant_vulnerable(&self) -> Option<&Piece> {
        self.en_passant.map(|id| self.piece(id))
    }

    /// All pieces of `color` that have been captured.
    pub fn captured_pieces(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.captured
            .iter()
            .map(|&id| self.piece(id))
            .filter(move |piece| piece.color() == color)
    }

    /// All pieces of `color` still in play: they entered play and have not been captured.
    pub fn pieces_in_play(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces
            .difference(&self.captured)
            .map(|&id| self.piece(id))
            .filter(move |piece| piece.color() == color)
    }

    /// The King of `color`.
    ///
    /// A missing King means the match state is corrupt, so this is reported as [`Error::NoKingOnBoard`].
    pub fn king(&self, color: Color) -> Result<&Piece> {
        self.pieces_in_play(color)
            .find(|piece| piece.is_king() && piece.position().is_some())
            .ok_or(Error::NoKingOnBoard(color))
    }

    /// Destinations of `piece` on the current board, ignoring self-check.
    #[inline(always)]
    fn destinations_of(&self, piece: &Piece) -> Bitboard {
        legal_destinations(&self.board, piece, self.en_passant)
    }

    /// The legal-destination matrix of the piece on `position`.
    ///
    /// Like the movement rules themselves, this ignores whether the move would leave its own King in check.
    ///
    /// # Example
    /// ```
    /// # use gambit::Match;
    /// let game = Match::new();
    /// let knight = game.legal_destinations("g1".parse()?)?;
    /// assert!(knight.contains("f3".parse()?));
    /// assert!(knight.contains("h3".parse()?));
    /// assert_eq!(knight.population(), 2);
    /// # Ok::<(), gambit::Error>(())
    /// ```
    pub fn legal_destinations(&self, position: Position) -> Result<Bitboard> {
        let piece = self
            .board
            .occupant(position)?
            .ok_or(Error::EmptyOrigin(position))?;
        Ok(self.destinations_of(piece))
    }

    /// Checks that the current player may pick up the piece on `origin`.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Error, Match, Position};
    /// let game = Match::new();
    /// let e4: Position = "e4".parse()?;
    /// assert_eq!(game.validate_origin(e4), Err(Error::EmptyOrigin(e4)));
    /// assert!(game.validate_origin("e2".parse()?).is_ok());
    /// # Ok::<(), gambit::Error>(())
    /// ```
    pub fn validate_origin(&self, origin: Position) -> Result<()> {
        if self.finished {
            return Err(Error::MatchFinished);
        }

        let piece = self
            .board
            .occupant(origin)?
            .ok_or(Error::EmptyOrigin(origin))?;

        if piece.color() != self.current_player {
            return Err(Error::NotYourPiece {
                origin,
                to_move: self.current_player,
            });
        }

        if self.destinations_of(piece).is_empty() {
            return Err(Error::NoLegalMoves(origin));
        }

        Ok(())
    }

    /// Checks that the piece on `origin` can reach `destination`.
    pub fn validate_destination(&self, origin: Position, destination: Position) -> Result<()> {
        if !destination.is_valid() {
            return Err(Error::OutOfBounds(destination));
        }

        if !self.legal_destinations(origin)?.contains(destination) {
            return Err(Error::IllegalDestination {
                origin,
                destination,
            });
        }

        Ok(())
    }

    /// Returns `true` if the King of `color` is attacked by any enemy piece in play.
    ///
    /// # Example
    /// ```
    /// # use gambit::{Color, Match};
    /// let game = Match::new();
    /// assert!(!game.is_in_check(Color::White)?);
    /// assert!(!game.is_in_check(Color::Black)?);
    /// # Ok::<(), gambit::Error>(())
    /// ```
    pub fn is_in_check(&self, color: Color) -> Result<bool> {
        let king = self.king(color)?;
        let king_square = king.position().ok_or(Error::NoKingOnBoard(color))?;

        Ok(self
            .pieces_in_play(color.opponent())
            .any(|attacker| self.destinations_of(attacker).contains(king_square)))
    }

    /// Returns `true` if `color` is in check and no move of any of its pieces gets it out.
    ///
    /// Every candidate move is tried on the real board and taken back, so this needs `&mut self`.
    /// The board is always restored, including when an error is returned.
    pub fn is_checkmate(&mut self, color: Color) -> Result<bool> {
        if !self.is_in_check(color)? {
            return Ok(false);
        }

        for (from, destinations) in self.candidate_moves(color) {
            for to in destinations {
                let trial = Trial::new(self, from, to);
                if !trial.is_in_check(color)? {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }

    /// Every move available to the current player that does not leave their King in check.
    ///
    /// Moves are tried on the real board and taken back, so this needs `&mut self`.
    ///
    /// # Example
    /// ```
    /// # use gambit::Match;
    /// let mut game = Match::new();
    /// assert_eq!(game.legal_moves()?.len(), 20);
    /// # Ok::<(), gambit::Error>(())
    /// ```
    pub fn legal_moves(&mut self) -> Result<Vec<(Position, Position)>> {
        let color = self.current_player;
        let mut moves = Vec::new();

        for (from, destinations) in self.candidate_moves(color) {
            for to in destinations {
                let trial = Trial::new(self, from, to);
                if !trial.is_in_check(color)? {
                    moves.push((from, to));
                }
            }
        }

        Ok(moves)
    }

    /// Recursively realizes all legal moves until `depth` is reached, returning the number of positions reached.
    ///
    /// This is just a convenience method. See [`perft()`] for more.
    #[inline(always)]
    pub fn perft(&self, depth: usize) -> Result<u64> {
        perft(self, depth)
    }

    /// Every piece of `color` in play, with its origin square and destinations.
    fn candidate_moves(&self, color: Color) -> Vec<(Position, Bitboard)> {
        self.pieces_in_play(color)
            .filter_map(|piece| Some((piece.position()?, self.destinations_of(piece))))
            .collect()
    }

    /// Plays a move for the current player.
    ///
    /// The move is validated first (see [`Match::validate_origin`] and [`Match::validate_destination`]).
    /// A move that leaves the mover in check is taken back and rejected with [`Error::SelfCheckNotAllowed`].
    /// A rejected move leaves the match unchanged.
    ///
    /// Pawns reaching the far rank are replaced by a Queen. If the opponent is checkmated,
    /// the match finishes and the turn does not advance.
    pub fn realize_move(&mut self, origin: Position, destination: Position) -> Result<MoveReport> {
        self.validate_origin(origin)?;
        self.validate_destination(origin, destination)?;

        let color = self.current_player;
        let mover = self.board.id_at(origin).ok_or(Error::EmptyOrigin(origin))?;
        debug!(%origin, %destination, %color, turn = self.turn, "realizing move");

        let trial = Trial::new(self, origin, destination);
        if trial.is_in_check(color)? {
            drop(trial);
            trace!(%origin, %destination, "move rejected: mover would be in check");
            return Err(Error::SelfCheckNotAllowed);
        }
        let captured = trial.commit();

        let piece = *self.piece(mover);
        let promoted = if piece.is_pawn() && destination.row() == color.promotion_row() {
            Some(self.promote(mover, destination))
        } else {
            None
        };

        // A Pawn that just advanced two squares is vulnerable until the next move completes.
        // This must be known before looking for mate, since capturing it en passant may be the only escape.
        self.en_passant = (piece.is_pawn() && (destination.row() - origin.row()).abs() == 2)
            .then_some(mover);

        let opponent = color.opponent();
        self.check = self.is_in_check(opponent)?;
        let checkmate = self.is_checkmate(opponent)?;

        if checkmate {
            self.finished = true;
            debug!(winner = %color, turn = self.turn, "checkmate");
        } else {
            self.turn += 1;
            self.current_player = opponent;
            if self.check {
                debug!(king = %opponent, "check");
            }
        }

        Ok(MoveReport {
            piece,
            captured: captured.map(|id| *self.piece(id)),
            promoted,
            check: self.check,
            checkmate,
        })
    }

    /// Replaces the Pawn `pawn` standing on `position` with a new Queen of the same color.
    fn promote(&mut self, pawn: PieceId, position: Position) -> Piece {
        let color = self.piece(pawn).color();

        self.board.remove(position);
        self.pieces.remove(&pawn);
        let queen = self.add_piece(color, PieceKind::Queen, position);

        debug!(%color, %position, "pawn promoted to queen");
        *self.piece(queen)
    }

    /// Moves the piece on `from` to `to`, capturing whatever is in the way, and applies the side effects of
    /// castling and en passant.
    ///
    /// Returns the captured piece, which must be handed back to [`Match::undo_move`] to take the move back.
    /// `from` must be occupied.
    pub(crate) fn execute_move(&mut self, from: Position, to: Position) -> Option<PieceId> {
        debug_assert!(self.board.has(from), "No piece on {from} to move");
        let mover = self.board.remove(from)?;
        self.board.piece_mut(mover).increment_move_count();

        let mut captured = self.board.remove(to);
        self.board.place(mover, to);

        let piece = *self.piece(mover);

        if piece.is_king() {
            if to.column() == from.column() + 2 {
                self.shift_rook(from.offset(0, SHORT_ROOK_OFFSET), from.offset(0, 1), true);
            } else if to.column() == from.column() - 2 {
                self.shift_rook(from.offset(0, LONG_ROOK_OFFSET), from.offset(0, -1), true);
            }
        }

        // A Pawn moving diagonally onto an empty square can only be capturing en passant
        if piece.is_pawn() && from.column() != to.column() && captured.is_none() {
            let victim_square = to.offset(-piece.color().forward(), 0);
            captured = victim_square.and_then(|square| self.board.remove(square));
        }

        if let Some(victim) = captured {
            self.captured.insert(victim);
        }

        captured
    }

    /// Takes back a move made by [`Match::execute_move`], mirroring every side effect.
    pub(crate) fn undo_move(&mut self, from: Position, to: Position, captured: Option<PieceId>) {
        debug_assert!(self.board.has(to), "No piece on {to} to take back");
        let Some(mover) = self.board.remove(to) else {
            return;
        };
        self.board.piece_mut(mover).decrement_move_count();

        if let Some(victim) = captured {
            self.board.place(victim, to);
            self.captured.remove(&victim);
        }
        self.board.place(mover, from);

        let piece = *self.piece(mover);

        if piece.is_king() {
            if to.column() == from.column() + 2 {
                self.shift_rook(from.offset(0, 1), from.offset(0, SHORT_ROOK_OFFSET), false);
            } else if to.column() == from.column() - 2 {
                self.shift_rook(from.offset(0, -1), from.offset(0, LONG_ROOK_OFFSET), false);
            }
        }

        // Only the Pawn recorded as vulnerable goes back beside the origin; identity, not position, decides
        if piece.is_pawn()
            && from.column() != to.column()
            && captured.is_some()
            && captured == self.en_passant
        {
            if let Some(victim) = self.board.remove(to) {
                let original = Position::new(piece.color().en_passant_row(), to.column());
                self.board.place(victim, original);
            }
        }
    }

    /// Moves the Rook on `from` to `to` as part of castling, or back again when `forward` is `false`.
    fn shift_rook(&mut self, from: Option<Position>, to: Option<Position>, forward: bool) {
        let (Some(from), Some(to)) = (from, to) else {
            return;
        };
        let Some(rook) = self.board.remove(from) else {
            return;
        };

        let rook_piece = self.board.piece_mut(rook);
        if forward {
            rook_piece.increment_move_count();
        } else {
            rook_piece.decrement_move_count();
        }
        self.board.place(rook, to);
    }
}

impl Default for Match {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

/// A move that has been made on the board speculatively.
///
/// Dropping a [`Trial`] takes the move back, so the board is restored on every exit path,
/// including early returns through `?`. Call [`Trial::commit`] to keep the move.
struct Trial<'a> {
    game: &'a mut Match,
    from: Position,
    to: Position,
    captured: Option<PieceId>,
    committed: bool,
}

impl<'a> Trial<'a> {
    fn new(game: &'a mut Match, from: Position, to: Position) -> Self {
        let captured = game.execute_move(from, to);
        Self {
            game,
            from,
            to,
            captured,
            committed: false,
        }
    }

    /// Keeps the move on the board, returning the piece it captured.
    fn commit(mut self) -> Option<PieceId> {
        self.committed = true;
        self.captured
    }
}

impl Deref for Trial<'_> {
    type Target = Match;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.game
    }
}

impl Drop for Trial<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.game.undo_move(self.from, self.to, self.captured);
        }
    }
}
