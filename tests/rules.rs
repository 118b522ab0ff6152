use live_chess::{Board, Color, Game, Move, MoveError, Piece, PieceType, Position};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn at(s: &str) -> Position {
    s.parse().unwrap()
}

fn mv(from: &str, to: &str) -> Move {
    Move::new(at(from), at(to))
}

fn place(board: &mut Board, sq: &str, color: Color, piece_type: PieceType) {
    board.add_piece(at(sq), Some(Piece::new(color, piece_type)));
}

fn legal_moves(game: &Game, color: Color) -> Vec<Move> {
    game.board()
        .pieces()
        .filter(|(_, p)| p.color == color)
        .flat_map(|(pos, _)| game.valid_moves(pos).unwrap_or_default())
        .collect()
}

#[test]
fn opening_e4_is_legal_and_passes_the_turn() {
    let mut game = Game::new();
    assert!(game.valid_moves(at("e2")).unwrap().contains(&mv("e2", "e4")));
    game.make_move(mv("e2", "e4")).unwrap();
    assert_eq!(game.turn(), Color::Black);
    assert_eq!(
        game.board().get_piece(at("e4")),
        Some(Piece::new(Color::White, PieceType::Pawn))
    );
    assert_eq!(game.board().get_piece(at("e2")), None);
}

#[test]
fn lone_rook_on_open_file_mates_boxed_king() {
    let mut board = Board::new();
    place(&mut board, "e8", Color::Black, PieceType::King);
    place(&mut board, "d8", Color::Black, PieceType::Rook);
    place(&mut board, "f8", Color::Black, PieceType::Rook);
    place(&mut board, "d7", Color::Black, PieceType::Pawn);
    place(&mut board, "f7", Color::Black, PieceType::Pawn);
    place(&mut board, "e1", Color::White, PieceType::Rook);
    place(&mut board, "a1", Color::White, PieceType::King);

    let game = Game::from_board(board, Color::Black);
    assert!(game.is_in_check(Color::Black));
    assert!(game.is_in_checkmate(Color::Black));
    assert!(!game.is_in_stalemate(Color::Black));
    assert!(!game.is_in_checkmate(Color::White));
}

#[test]
fn check_that_can_be_blocked_is_not_mate() {
    let mut board = Board::new();
    place(&mut board, "e8", Color::Black, PieceType::King);
    place(&mut board, "d8", Color::Black, PieceType::Rook);
    place(&mut board, "f8", Color::Black, PieceType::Bishop);
    place(&mut board, "d7", Color::Black, PieceType::Pawn);
    place(&mut board, "f7", Color::Black, PieceType::Pawn);
    place(&mut board, "e1", Color::White, PieceType::Rook);
    place(&mut board, "a1", Color::White, PieceType::King);

    let game = Game::from_board(board, Color::Black);
    assert!(game.is_in_check(Color::Black));
    assert!(!game.is_in_checkmate(Color::Black));
    // Only the block on e7 answers the check.
    assert_eq!(legal_moves(&game, Color::Black), vec![mv("f8", "e7")]);
}

#[test]
fn cornered_king_without_moves_is_stalemate() {
    let mut board = Board::new();
    place(&mut board, "a8", Color::Black, PieceType::King);
    place(&mut board, "c7", Color::White, PieceType::Queen);
    place(&mut board, "h1", Color::White, PieceType::King);

    let game = Game::from_board(board, Color::Black);
    assert!(!game.is_in_check(Color::Black));
    assert!(game.is_in_stalemate(Color::Black));
    assert!(!game.is_in_checkmate(Color::Black));
    assert!(!game.is_in_stalemate(Color::White));
}

#[test]
fn pinned_piece_may_only_move_along_the_pin() {
    let mut board = Board::new();
    place(&mut board, "e1", Color::White, PieceType::King);
    place(&mut board, "e2", Color::White, PieceType::Rook);
    place(&mut board, "e8", Color::Black, PieceType::Rook);
    place(&mut board, "a8", Color::Black, PieceType::King);
    let game = Game::from_board(board, Color::White);

    let mut targets: Vec<String> = game
        .valid_moves(at("e2"))
        .unwrap()
        .iter()
        .map(|m| m.end_position.to_string())
        .collect();
    targets.sort();
    assert_eq!(targets, vec!["e3", "e4", "e5", "e6", "e7", "e8"]);
}

#[test]
fn pinned_knight_has_no_moves() {
    let mut board = Board::new();
    place(&mut board, "e1", Color::White, PieceType::King);
    place(&mut board, "e3", Color::White, PieceType::Knight);
    place(&mut board, "e7", Color::Black, PieceType::Queen);
    place(&mut board, "a8", Color::Black, PieceType::King);
    let game = Game::from_board(board, Color::White);

    assert_eq!(game.valid_moves(at("e3")), Some(Vec::new()));
}

#[test]
fn discovered_check_is_refused() {
    // Moving the bishop off the diagonal would expose the king to the queen.
    let mut board = Board::new();
    place(&mut board, "b1", Color::White, PieceType::King);
    place(&mut board, "c2", Color::White, PieceType::Bishop);
    place(&mut board, "f5", Color::Black, PieceType::Queen);
    place(&mut board, "h8", Color::Black, PieceType::King);
    let mut game = Game::from_board(board, Color::White);

    assert!(matches!(
        game.make_move(mv("c2", "b3")),
        Err(MoveError::NotAllowed(_))
    ));
    game.make_move(mv("c2", "f5")).unwrap();
    assert_eq!(game.turn(), Color::Black);
}

#[test]
fn king_cannot_step_into_attack() {
    let mut board = Board::new();
    place(&mut board, "e1", Color::White, PieceType::King);
    place(&mut board, "d8", Color::Black, PieceType::Rook);
    place(&mut board, "h8", Color::Black, PieceType::King);
    let game = Game::from_board(board, Color::White);

    let targets: Vec<Position> = game
        .valid_moves(at("e1"))
        .unwrap()
        .iter()
        .map(|m| m.end_position)
        .collect();
    assert!(!targets.contains(&at("d1")));
    assert!(!targets.contains(&at("d2")));
    assert!(targets.contains(&at("f2")));
}

#[test]
fn king_cannot_capture_a_defended_piece() {
    let mut board = Board::new();
    place(&mut board, "e1", Color::White, PieceType::King);
    place(&mut board, "e2", Color::Black, PieceType::Pawn);
    place(&mut board, "d3", Color::Black, PieceType::Pawn);
    place(&mut board, "h8", Color::Black, PieceType::King);
    let game = Game::from_board(board, Color::White);

    assert!(!game.valid_moves(at("e1")).unwrap().contains(&mv("e1", "e2")));
}

#[test]
fn promotion_must_match_the_far_rank() {
    let mut board = Board::new();
    place(&mut board, "a7", Color::White, PieceType::Pawn);
    place(&mut board, "e1", Color::White, PieceType::King);
    place(&mut board, "h6", Color::White, PieceType::Pawn);
    place(&mut board, "e8", Color::Black, PieceType::King);
    let mut game = Game::from_board(board, Color::White);

    assert!(matches!(
        game.make_move(mv("a7", "a8")),
        Err(MoveError::InvalidPromotion(_))
    ));
    assert!(matches!(
        game.make_move(Move::promoting(at("h6"), at("h7"), PieceType::Queen)),
        Err(MoveError::InvalidPromotion(_))
    ));
    assert!(matches!(
        game.make_move(Move::promoting(at("a7"), at("a8"), PieceType::King)),
        Err(MoveError::NotAllowed(_))
    ));
    assert_eq!(game.turn(), Color::White);

    game.make_move(Move::promoting(at("a7"), at("a8"), PieceType::Knight))
        .unwrap();
    assert_eq!(
        game.board().get_piece(at("a8")),
        Some(Piece::new(Color::White, PieceType::Knight))
    );
    assert_eq!(game.board().get_piece(at("a7")), None);
}

#[test]
fn refused_moves_change_nothing() {
    let mut game = Game::new();
    let before = game.clone();

    assert_eq!(
        game.make_move(mv("e4", "e5")),
        Err(MoveError::NoPieceAtSource(at("e4")))
    );
    assert!(matches!(
        game.make_move(mv("a1", "a2")),
        Err(MoveError::NotAllowed(_))
    ));
    assert!(matches!(
        game.make_move(mv("e2", "e5")),
        Err(MoveError::NotAllowed(_))
    ));
    assert_eq!(game, before);
}

#[test]
fn check_queries_are_repeatable() {
    let mut game = Game::new();
    for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4")] {
        game.make_move(mv(from, to)).unwrap();
    }
    game.make_move(mv("d8", "h4")).unwrap();

    let first = game.is_in_check(Color::White);
    for _ in 0..5 {
        assert_eq!(game.is_in_check(Color::White), first);
    }
    assert!(first);
    assert!(game.is_in_checkmate(Color::White));
}

#[test]
fn random_playouts_never_expose_the_mover() {
    for seed in 0..6u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::new();

        for ply in 0..60usize {
            let mover = game.turn();
            assert_eq!(mover, if ply % 2 == 0 { Color::White } else { Color::Black });

            let moves = legal_moves(&game, mover);
            for candidate in &moves {
                let mut trial = game.clone();
                trial.make_move(*candidate).unwrap();
                assert!(
                    !trial.is_in_check(mover),
                    "seed {} ply {}: {} leaves {} in check",
                    seed,
                    ply,
                    candidate,
                    mover
                );
            }

            match moves.choose(&mut rng) {
                Some(next) => game.make_move(*next).unwrap(),
                None => {
                    assert!(game.is_in_checkmate(mover) || game.is_in_stalemate(mover));
                    break;
                }
            }
        }
    }
}
