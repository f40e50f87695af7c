/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gambit::{Color, Error, Match, MatchBuilder, PieceKind, Position};

fn sq(square: &str) -> Position {
    square.parse().unwrap()
}

fn game_from_fen(fen: &str) -> Match {
    MatchBuilder::new().placements(fen).unwrap().build().unwrap()
}

fn play(game: &mut Match, moves: &[(&str, &str)]) {
    for &(from, to) in moves {
        game.realize_move(sq(from), sq(to))
            .unwrap_or_else(|e| panic!("{from}{to} was rejected: {e}"));
    }
}

#[test]
fn test_scholars_mate() {
    let mut game = Match::new();
    play(
        &mut game,
        &[
            ("e2", "e4"),
            ("e7", "e5"),
            ("f1", "c4"),
            ("b8", "c6"),
            ("d1", "h5"),
            ("g8", "f6"),
        ],
    );
    assert_eq!(game.turn(), 7);

    let report = game.realize_move(sq("h5"), sq("f7")).unwrap();
    assert!(report.check);
    assert!(report.checkmate);
    assert_eq!(report.captured.map(|p| p.kind()), Some(PieceKind::Pawn));

    assert!(game.is_finished());
    assert!(game.is_check());
    assert_eq!(game.turn(), 7);
    assert_eq!(game.current_player(), Color::White);
    assert_eq!(game.captured_pieces(Color::Black).count(), 1);
    assert_eq!(game.pieces_in_play(Color::Black).count(), 15);
}

#[test]
fn test_no_moves_after_checkmate() {
    let mut game = Match::new();
    play(
        &mut game,
        &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")],
    );
    assert!(game.is_finished());

    let before = game.clone();
    assert_eq!(game.validate_origin(sq("e2")), Err(Error::MatchFinished));
    assert_eq!(
        game.realize_move(sq("a2"), sq("a3")),
        Err(Error::MatchFinished)
    );
    assert_eq!(game, before);
}

#[test]
fn test_en_passant_capture() {
    let mut game = Match::new();
    play(
        &mut game,
        &[
            ("a2", "a3"),
            ("d7", "d5"),
            ("a3", "a4"),
            ("d5", "d4"),
            ("e2", "e4"),
        ],
    );

    let vulnerable = game.en_passant_vulnerable().unwrap();
    assert_eq!(vulnerable.position(), Some(sq("e4")));
    let vulnerable = vulnerable.id();

    assert!(game.legal_destinations(sq("d4")).unwrap().contains(sq("e3")));

    let report = game.realize_move(sq("d4"), sq("e3")).unwrap();
    assert_eq!(report.captured.map(|p| p.id()), Some(vulnerable));
    assert!(game.board().piece_at(sq("e4")).is_none());
    assert!(game
        .board()
        .piece_at(sq("e3"))
        .is_some_and(|p| p.is(Color::Black, PieceKind::Pawn)));
    assert!(game.captured_pieces(Color::White).any(|p| p.id() == vulnerable));
    assert!(game.en_passant_vulnerable().is_none());
}

#[test]
fn test_en_passant_expires_after_one_move() {
    let mut game = Match::new();
    play(
        &mut game,
        &[
            ("a2", "a3"),
            ("d7", "d5"),
            ("a3", "a4"),
            ("d5", "d4"),
            ("e2", "e4"),
            ("h7", "h6"),
            ("h2", "h3"),
        ],
    );

    assert!(game.en_passant_vulnerable().is_none());
    assert!(!game.legal_destinations(sq("d4")).unwrap().contains(sq("e3")));
    assert_eq!(
        game.realize_move(sq("d4"), sq("e3")),
        Err(Error::IllegalDestination {
            origin: sq("d4"),
            destination: sq("e3"),
        })
    );
}

#[test]
fn test_en_passant_is_the_only_escape() {
    let mut game = game_from_fen("3B4/8/R7/7k/5p2/4N3/6P1/K7 w - - 0 1");

    let report = game.realize_move(sq("g2"), sq("g4")).unwrap();
    assert!(report.check);
    assert!(!report.checkmate);
    assert!(!game.is_finished());
    assert_eq!(game.legal_moves().unwrap(), vec![(sq("f4"), sq("g3"))]);

    let report = game.realize_move(sq("f4"), sq("g3")).unwrap();
    assert_eq!(report.captured.map(|p| p.kind()), Some(PieceKind::Pawn));
    assert!(game.board().piece_at(sq("g4")).is_none());
    assert!(!game.is_in_check(Color::Black).unwrap());
}

#[test]
fn test_promotion_replaces_pawn_with_queen() {
    let mut game = game_from_fen("8/1P6/8/7k/8/8/8/4K3 w - - 0 1");
    let pawn = game.board().piece_at(sq("b7")).unwrap().id();

    let report = game.realize_move(sq("b7"), sq("b8")).unwrap();
    let queen = report.promoted.unwrap();

    assert_eq!(queen.kind(), PieceKind::Queen);
    assert_eq!(queen.color(), Color::White);
    assert_eq!(game.board().id_at(sq("b8")), Some(queen.id()));
    assert!(game.pieces_in_play(Color::White).all(|p| p.id() != pawn));
    assert!(game.pieces_in_play(Color::White).any(|p| p.id() == queen.id()));
    assert_eq!(game.captured_pieces(Color::White).count(), 0);
}

#[test]
fn test_promotion_by_capture() {
    let mut game = game_from_fen("1r5k/P7/8/8/8/8/8/4K3 w - - 0 1");

    let report = game.realize_move(sq("a7"), sq("b8")).unwrap();
    assert_eq!(report.captured.map(|p| p.kind()), Some(PieceKind::Rook));
    assert!(report.promoted.is_some());
    assert!(report.check);
    assert!(game
        .board()
        .piece_at(sq("b8"))
        .is_some_and(|p| p.is(Color::White, PieceKind::Queen)));
}

#[test]
fn test_castling_both_sides() {
    let mut game = game_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1");

    game.realize_move(sq("e1"), sq("g1")).unwrap();
    let rook = game.board().piece_at(sq("f1")).unwrap();
    assert!(rook.is(Color::White, PieceKind::Rook));
    assert_eq!(rook.move_count(), 1);
    assert!(game.board().piece_at(sq("h1")).is_none());

    game.realize_move(sq("e8"), sq("c8")).unwrap();
    assert!(game
        .board()
        .piece_at(sq("d8"))
        .is_some_and(|p| p.is(Color::Black, PieceKind::Rook)));
    assert!(game.board().piece_at(sq("a8")).is_none());
    assert_eq!(game.turn(), 3);
}

#[test]
fn test_castling_lost_after_king_returns() {
    let mut game = game_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1");
    play(
        &mut game,
        &[("e1", "f1"), ("e8", "f8"), ("f1", "e1"), ("f8", "e8")],
    );

    let king = game.legal_destinations(sq("e1")).unwrap();
    assert!(!king.contains(sq("g1")));
    assert!(!king.contains(sq("c1")));
    assert_eq!(game.king(Color::White).unwrap().move_count(), 2);
}

#[test]
fn test_castling_lost_on_one_side_after_rook_returns() {
    let mut game = game_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1");
    play(
        &mut game,
        &[("h1", "h2"), ("a8", "a7"), ("h2", "h1"), ("a7", "a8")],
    );

    let king = game.legal_destinations(sq("e1")).unwrap();
    assert!(!king.contains(sq("g1")));
    assert!(king.contains(sq("c1")));
}

#[test]
fn test_castling_blocked_by_piece_between() {
    let game = game_from_fen("4k3/8/8/8/8/8/8/RN2K1NR w - - 0 1");
    let king = game.legal_destinations(sq("e1")).unwrap();
    assert!(!king.contains(sq("g1")));
    assert!(!king.contains(sq("c1")));
}

#[test]
fn test_castling_out_of_check_is_permitted() {
    let mut game = game_from_fen("4r2k/8/8/8/8/8/8/4K2R w - - 0 1");
    assert!(game.is_check());
    assert!(game.legal_destinations(sq("e1")).unwrap().contains(sq("g1")));

    game.realize_move(sq("e1"), sq("g1")).unwrap();
    assert!(!game.is_in_check(Color::White).unwrap());
}

#[test]
fn test_self_check_is_rejected_and_rolled_back() {
    let mut game = game_from_fen("k3r3/8/8/8/8/8/4R3/4K3 w - - 0 1");
    let before = game.clone();

    assert_eq!(
        game.realize_move(sq("e2"), sq("a2")),
        Err(Error::SelfCheckNotAllowed)
    );
    assert_eq!(game, before);

    // Staying on the file is fine
    game.realize_move(sq("e2"), sq("e8")).unwrap();
}

#[test]
fn test_validation_errors() {
    let mut game = Match::new();

    assert_eq!(game.validate_origin(sq("e4")), Err(Error::EmptyOrigin(sq("e4"))));
    assert_eq!(
        game.validate_origin(sq("e7")),
        Err(Error::NotYourPiece {
            origin: sq("e7"),
            to_move: Color::White,
        })
    );
    assert_eq!(game.validate_origin(sq("a1")), Err(Error::NoLegalMoves(sq("a1"))));
    assert_eq!(
        game.validate_origin(Position::new(8, 0)),
        Err(Error::OutOfBounds(Position::new(8, 0)))
    );
    assert_eq!(game.validate_origin(sq("e2")), Ok(()));

    assert_eq!(
        game.validate_destination(sq("e2"), sq("e5")),
        Err(Error::IllegalDestination {
            origin: sq("e2"),
            destination: sq("e5"),
        })
    );
    assert_eq!(game.validate_destination(sq("e2"), sq("e4")), Ok(()));

    let before = game.clone();
    assert!(game.realize_move(sq("e2"), sq("e5")).is_err());
    assert!(game.realize_move(sq("e7"), sq("e5")).is_err());
    assert_eq!(game, before);
}

#[test]
fn test_invalid_coordinates() {
    assert_eq!(
        "i1".parse::<Position>(),
        Err(Error::InvalidCoordinate {
            column: 'i',
            rank: 1
        })
    );
    assert_eq!(
        "a9".parse::<Position>(),
        Err(Error::InvalidCoordinate {
            column: 'a',
            rank: 9
        })
    );
    assert_eq!(sq("a8"), Position::new(0, 0));
    assert_eq!(sq("h1"), Position::new(7, 7));
}

#[test]
fn test_missing_king_is_reported() {
    let mut game = MatchBuilder::new()
        .piece(sq("e1"), Color::White, PieceKind::King)
        .piece(sq("a8"), Color::Black, PieceKind::Rook)
        .build()
        .unwrap();

    assert_eq!(
        game.realize_move(sq("e1"), sq("e2")),
        Err(Error::NoKingOnBoard(Color::Black))
    );
}

#[test]
fn test_check_detection_against_rook() {
    let rook = sq("d4");
    let black_king = sq("h8");

    for square in Position::iter().filter(|&s| s != rook && s != black_king) {
        let game = MatchBuilder::new()
            .piece(square, Color::White, PieceKind::King)
            .piece(rook, Color::Black, PieceKind::Rook)
            .piece(black_king, Color::Black, PieceKind::King)
            .build()
            .unwrap();

        let beside_king = (square.row() - black_king.row()).abs() <= 1
            && (square.column() - black_king.column()).abs() <= 1;
        let expected =
            square.row() == rook.row() || square.column() == rook.column() || beside_king;

        assert_eq!(
            game.is_in_check(Color::White).unwrap(),
            expected,
            "White King on {square}"
        );
    }
}

#[test]
fn test_legal_moves_exclude_self_check() {
    let mut game = game_from_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1");
    let moves = game.legal_moves().unwrap();

    // The Bishop is pinned, so only the King may move, and not along the file
    assert!(moves.iter().all(|&(from, _)| from == sq("e1")));
    assert!(!moves.contains(&(sq("e1"), sq("e2"))));
    assert_eq!(moves.len(), 4);
}
