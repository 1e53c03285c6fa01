use chessrules::{
    attacks, execute::execute, Board, Color, Game, GameState, Move, MoveCategory, MoveError,
    Outcome, PieceKind, Player, Position, Setup,
};
use rand::{rngs::StdRng, seq::IteratorRandom, SeedableRng};

fn sq(name: &str) -> Position {
    name.parse().expect("valid square")
}

fn game(epd: &str) -> Game {
    let setup: Setup = epd.parse().expect("valid epd");
    Game::from_setup(setup).expect("legal setup")
}

fn destinations(game: &Game, from: &str) -> Vec<(Position, MoveCategory)> {
    let mut targets: Vec<_> = game
        .legal_moves()
        .get(sq(from))
        .map(|set| set.iter().map(|t| (t.to, t.category)).collect())
        .unwrap_or_default();
    targets.sort();
    targets
}

#[test]
fn test_double_step_is_standard() {
    let mut game = Game::with_first_player(Color::White);
    assert_eq!(game.attempt_move(sq("e2"), sq("e4")), Ok(MoveCategory::Standard));
    game.play(sq("e2"), sq("e4"), None).unwrap();
    assert_eq!(game.state(), GameState::AwaitingMove(Color::Black));
    assert_eq!(game.history().len(), 1);
}

#[test]
fn test_en_passant_only_immediately() {
    let mut game = game("4k3/8/8/8/3p1p2/8/4P3/4K3 w");
    game.play(sq("e2"), sq("e4"), None).unwrap();

    assert_eq!(
        game.legal_moves().category(sq("d4"), sq("e3")),
        Some(MoveCategory::EnPassant)
    );
    assert_eq!(
        game.legal_moves().category(sq("f4"), sq("e3")),
        Some(MoveCategory::EnPassant)
    );

    // One ply later the chance is gone.
    let mut later = game.clone();
    later.play(sq("e8"), sq("d8"), None).unwrap();
    later.play(sq("e1"), sq("d1"), None).unwrap();
    assert_eq!(later.legal_moves().category(sq("d4"), sq("e3")), None);
    assert_eq!(
        later.attempt_move(sq("d4"), sq("e3")),
        Err(MoveError::IllegalDestination {
            from: sq("d4"),
            to: sq("e3")
        })
    );

    // Taking it removes the pawn that passed by.
    assert_eq!(game.play(sq("d4"), sq("e3"), None), Ok(MoveCategory::EnPassant));
    assert!(game.board().piece_at(sq("e4")).is_none());
    let captured: Vec<_> = game.captured(Color::Black).map(|p| p.kind()).collect();
    assert_eq!(captured, vec![PieceKind::Pawn]);
}

#[test]
fn test_en_passant_needs_double_step() {
    let mut game = game("4k3/8/8/8/3p4/4P3/8/4K3 w");
    game.play(sq("e3"), sq("e4"), None).unwrap();
    assert_eq!(game.legal_moves().category(sq("d4"), sq("e3")), None);
}

#[test]
fn test_en_passant_from_setup() {
    let game = game("4k3/8/8/3pP3/8/8/8/4K3 w d6");
    assert_eq!(
        game.legal_moves().category(sq("e5"), sq("d6")),
        Some(MoveCategory::EnPassant)
    );
}

#[test]
fn test_castling_offered() {
    let game = game("r3k2r/8/8/8/8/8/8/R3K2R w");
    let king = destinations(&game, "e1");
    assert!(king.contains(&(sq("g1"), MoveCategory::KingsideCastle)));
    assert!(king.contains(&(sq("c1"), MoveCategory::QueensideCastle)));
}

fn castles(epd: &str, adjust: impl FnOnce(&mut Setup)) -> (bool, bool) {
    let mut setup: Setup = epd.parse().expect("valid epd");
    adjust(&mut setup);
    let game = Game::from_setup(setup).expect("legal setup");
    let king = destinations(&game, "e1");
    (
        king.contains(&(sq("g1"), MoveCategory::KingsideCastle)),
        king.contains(&(sq("c1"), MoveCategory::QueensideCastle)),
    )
}

#[test]
fn test_castling_conditions_one_at_a_time() {
    let base = "r3k2r/8/8/8/8/8/8/R3K2R w";
    assert_eq!(castles(base, |_| ()), (true, true));

    // King moved.
    assert_eq!(
        castles(base, |s| {
            s.board.set_moved(sq("e1"), true);
        }),
        (false, false)
    );

    // Rook moved.
    assert_eq!(
        castles(base, |s| {
            s.board.set_moved(sq("h1"), true);
        }),
        (false, true)
    );
    assert_eq!(
        castles(base, |s| {
            s.board.set_moved(sq("a1"), true);
        }),
        (true, false)
    );

    // Squares in between occupied.
    assert_eq!(castles("r3k2r/8/8/8/8/8/8/RN2K2R w", |_| ()), (true, false));
    assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K1NR w", |_| ()), (false, true));

    // King in check, crossing or landing on an attacked square.
    assert_eq!(castles("r3k2r/8/8/4r3/8/8/8/R3K2R w", |_| ()), (false, false));
    assert_eq!(castles("r3k2r/8/8/5r2/8/8/8/R3K2R w", |_| ()), (false, true));
    assert_eq!(castles("r3k2r/8/8/6r1/8/8/8/R3K2R w", |_| ()), (false, true));
    assert_eq!(castles("r3k2r/8/8/3r4/8/8/8/R3K2R w", |_| ()), (true, false));
    assert_eq!(castles("r3k2r/8/8/2r5/8/8/8/R3K2R w", |_| ()), (true, false));

    // Only the king crosses, so b1 may be attacked.
    assert_eq!(castles("r3k2r/8/8/1r6/8/8/8/R3K2R w", |_| ()), (true, true));
}

#[test]
fn test_castling_moves_rook() {
    let mut game = game("r3k2r/8/8/8/8/8/8/R3K2R w");
    assert_eq!(
        game.play(sq("e1"), sq("g1"), None),
        Ok(MoveCategory::KingsideCastle)
    );
    assert_eq!(game.player(Color::White).king(), sq("g1"));
    assert_eq!(game.board().piece_at(sq("f1")).unwrap().kind(), PieceKind::Rook);

    assert_eq!(
        game.play(sq("e8"), sq("c8"), None),
        Ok(MoveCategory::QueensideCastle)
    );
    assert_eq!(game.board().piece_at(sq("d8")).unwrap().kind(), PieceKind::Rook);
    assert!(game.board().piece_at(sq("a8")).is_none());
}

#[test]
fn test_knight_interposes() {
    let game = game("k7/8/8/4r3/8/8/8/2N1K3 w");
    assert_eq!(
        destinations(&game, "c1"),
        vec![(sq("e2"), MoveCategory::Standard)]
    );

    let game = self::game("k7/8/8/4r3/8/3N4/8/4K3 w");
    assert_eq!(
        destinations(&game, "d3"),
        vec![(sq("e5"), MoveCategory::Capture)]
    );
}

#[test]
fn test_double_check_king_only() {
    let game = game("q3k3/8/3N4/8/8/8/8/4R1K1 b");
    assert_eq!(game.checkers().len(), 2);
    assert_eq!(game.legal_moves().origins().collect::<Vec<_>>(), vec![sq("e8")]);
}

#[test]
fn test_pinned_by_other_piece_while_in_check() {
    // The knight could block the rook check on b1, but is pinned by the
    // bishop.
    let game = game("4k3/8/8/b7/8/8/3N4/r3K3 w");
    assert!(game.is_check());
    assert!(game.legal_moves().get(sq("d2")).is_none());
}

#[test]
fn test_round_trip() {
    let mut board = Board::new();
    board.relocate(sq("d7"), sq("d3"));
    let before = board.clone();
    let mut white = Player::new(Color::White, sq("e1"));

    let e2e4 = Move::new(sq("e2"), sq("e4"));
    execute(&mut board, &mut white, e2e4, MoveCategory::Standard, None).unwrap();
    board.relocate(e2e4.to, e2e4.from);
    board.set_moved(e2e4.from, false);
    assert_eq!(board, before);

    let c2d3 = Move::new(sq("c2"), sq("d3"));
    execute(&mut board, &mut white, c2d3, MoveCategory::Capture, None).unwrap();
    board.relocate(c2d3.to, c2d3.from);
    board.set_moved(c2d3.from, false);
    board.restore(white.captured()[0], c2d3.to);
    assert_eq!(board, before);
}

#[test]
fn test_promotion_choice() {
    let mut game = game("1r5k/P7/8/8/8/8/8/K7 w");
    let a7a8 = Move::new(sq("a7"), sq("a8"));
    assert_eq!(game.attempt_move(a7a8.from, a7a8.to), Ok(MoveCategory::Promotion));

    for choice in [None, Some(PieceKind::Pawn), Some(PieceKind::King)] {
        assert_eq!(
            game.apply_move(a7a8, MoveCategory::Promotion, choice),
            Err(MoveError::InvalidPromotionChoice { choice })
        );
        assert_eq!(game.turn(), Some(Color::White));
        assert!(game.history().is_empty());
        assert_eq!(game.board().piece_at(sq("a7")).unwrap().kind(), PieceKind::Pawn);
    }

    let mut capture = game.clone();
    capture
        .play(sq("a7"), sq("b8"), Some(PieceKind::Queen))
        .unwrap();
    assert_eq!(capture.board().piece_at(sq("b8")).unwrap().kind(), PieceKind::Queen);
    let captured: Vec<_> = capture.captured(Color::White).map(|p| p.kind()).collect();
    assert_eq!(captured, vec![PieceKind::Rook]);
    assert!(capture.is_check());

    game.apply_move(a7a8, MoveCategory::Promotion, Some(PieceKind::Knight))
        .unwrap();
    let knight = game.board().piece_at(sq("a8")).unwrap();
    assert_eq!((knight.color(), knight.kind()), (Color::White, PieceKind::Knight));
    assert!(game.board().piece_at(sq("a7")).is_none());
}

#[test]
fn test_checkmate() {
    let mut game = game("6k1/5ppp/8/8/8/8/8/R5K1 w");
    game.play(sq("a1"), sq("a8"), None).unwrap();
    assert!(game.is_checkmate());
    assert_eq!(game.state(), GameState::Checkmate { winner: Color::White });
    assert_eq!(game.outcome(), Some(Outcome::Decisive { winner: Color::White }));
    assert!(game.legal_moves().is_empty());
    assert_eq!(game.play(sq("g8"), sq("h8"), None), Err(MoveError::GameOver));
}

#[test]
fn test_stalemate() {
    let mut game = game("k7/8/1Q6/8/8/8/8/7K w");
    game.play(sq("b6"), sq("c7"), None).unwrap();
    assert!(game.is_stalemate());
    assert!(!game.is_checkmate());
    assert!(!game.is_check());
    assert_eq!(game.state(), GameState::Stalemate(Color::Black));
    assert_eq!(game.outcome(), Some(Outcome::Draw));
    assert_eq!(game.attempt_move(sq("a8"), sq("b8")), Err(MoveError::GameOver));
}

#[test]
fn test_wrong_turn_leaves_game_untouched() {
    let mut game = Game::with_first_player(Color::Black);
    let before = game.clone();
    assert_eq!(
        game.play(sq("e7"), sq("e5"), None),
        Err(MoveError::WrongTurn { square: sq("e7") })
    );
    assert_eq!(game.board(), before.board());
    assert_eq!(game.history(), before.history());
    assert_eq!(game.state(), before.state());
}

/// Checks the invariants of a position in which the game goes on.
fn check_invariants(game: &Game) {
    let mover = game.turn().expect("game goes on");
    let board = game.board();
    let king = game.player(mover).king();
    assert_eq!(board.king_of(mover), Some(king));

    // Check detection agrees with pseudo-legal captures of the king.
    let capturable = board
        .pieces()
        .filter(|(_, piece)| piece.color() != mover)
        .any(|(_, piece)| {
            piece
                .pseudo_legal_moves(board, None)
                .iter()
                .any(|t| t.to == king)
        });
    assert_eq!(game.is_check(), capturable);

    if game.checkers().len() >= 2 {
        assert_eq!(game.legal_moves().origins().collect::<Vec<_>>(), vec![king]);
    }

    // No legal move leaves the own king in check.
    for (m, category) in game.legal_moves().moves() {
        let mut child = game.clone();
        let promotion = (category == MoveCategory::Promotion).then_some(PieceKind::Queen);
        child.apply_move(m, category, promotion).expect("legal move");
        let king = child.player(mover).king();
        assert_eq!(child.board().king_of(mover), Some(king));
        assert!(attacks::attacking_pieces(child.board(), king, mover).is_empty());
    }
}

#[test]
#[cfg_attr(miri, ignore)]
fn test_random_games() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..8 {
        let mut game = Game::with_rng(&mut rng);
        for _ in 0..40 {
            if game.is_game_over() {
                break;
            }
            check_invariants(&game);
            let (m, category) = game
                .legal_moves()
                .moves()
                .choose(&mut rng)
                .expect("legal moves");
            let promotion = (category == MoveCategory::Promotion).then_some(PieceKind::Queen);
            let mover = game.turn();
            game.apply_move(m, category, promotion).expect("legal move");
            assert_ne!(game.turn(), mover);
        }
    }
}
