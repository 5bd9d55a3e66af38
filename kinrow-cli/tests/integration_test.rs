//! Integration tests for the KINROW engine
//!
//! Tests the full stack: board, win detection, search and the difficulty tiers

use kinrow_core::{
    find_win, is_win, search, winning_moves, AiConfig, AiPlayer, Board, Coord, Difficulty, Game,
    GameConfig, GameResult, Move, Placement, Player, SearchConfig, TieBreak,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// The 3x3 position where X can win at (0, 2) or block at (1, 2)
fn win_or_block_board() -> Board {
    Board::from_rows(&["XX.", "OO.", "..."], 3, Placement::FreeCell).unwrap()
}

/// Play up to `moves` random moves without ending the game
fn random_position(mut board: Board, moves: usize, rng: &mut ChaCha8Rng) -> (Board, Player) {
    let mut player = Player::A;
    for _ in 0..moves {
        let Some(&mv) = board.placeable_moves().choose(rng) else { break };
        let coord = board.apply_unchecked(mv, player);
        if is_win(&board, coord, player) {
            board.undo(coord);
            break;
        }
        player = player.opponent();
    }
    (board, player)
}

fn deterministic(depth: u32, pruning: bool) -> SearchConfig {
    SearchConfig {
        depth,
        pruning,
        tie_break: TieBreak::FirstInOrder,
        ..SearchConfig::default()
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_hard_opens_near_center_on_connect_four() {
    for seed in 0..4 {
        let mut board = GameConfig::connect_four().new_board();
        let mut ai = AiPlayer::new(AiConfig::hard(4).with_seed(seed));

        let mv = ai.choose_move(&mut board, Player::B).unwrap();
        match mv {
            Move::Drop(col) => assert!((2..=4).contains(&col), "seed {} chose column {}", seed, col),
            other => panic!("expected a drop, got {:?}", other),
        }
        assert!(board.is_empty());
    }
}

#[test]
fn test_win_preferred_over_block() {
    for difficulty in [Difficulty::Medium, Difficulty::Hard] {
        let mut board = win_or_block_board();
        let config = AiConfig {
            difficulty,
            ..AiConfig::default()
        };
        let mut ai = AiPlayer::new(config.with_seed(1));

        let mv = ai.choose_move(&mut board, Player::A);
        assert_eq!(mv, Some(Move::Place(Coord::new(0, 2))), "{} tier", difficulty);
    }
}

#[test]
fn test_full_board_is_draw() {
    let mut game = Game::new(GameConfig::tic_tac_toe()).unwrap();
    for (r, c) in [(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1), (2, 0), (2, 2)] {
        game.apply_move(Move::Place(Coord::new(r, c))).unwrap();
    }

    assert!(game.is_board_full());
    assert_eq!(game.result(), GameResult::Draw);
    for difficulty in Difficulty::ALL {
        let config = AiConfig {
            difficulty,
            ..AiConfig::default()
        };
        let mut ai = AiPlayer::new(config.with_seed(5));
        assert_eq!(game.choose_ai_move(&mut ai), None);
    }
}

#[test]
fn test_hard_vs_hard_tic_tac_toe_is_draw() {
    for seed in 0..40u64 {
        let mut game = Game::new(GameConfig::tic_tac_toe()).unwrap();
        let mut x = AiPlayer::new(AiConfig::hard(9).with_seed(2 * seed));
        let mut o = AiPlayer::new(AiConfig::hard(9).with_seed(2 * seed + 1));

        while !game.result().is_over() {
            let ai = if game.to_move() == Player::A { &mut x } else { &mut o };
            let mv = game.choose_ai_move(ai).unwrap();
            game.apply_move(mv).unwrap();
        }

        assert_eq!(game.result(), GameResult::Draw, "seeds {} / {}\n{}", 2 * seed, 2 * seed + 1, game.board());
        assert_eq!(game.history().len(), 9);
    }
}

// ============================================================================
// SEARCH PROPERTIES
// ============================================================================

#[test]
fn test_pruning_matches_exhaustive_on_random_positions() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut dummy = ChaCha8Rng::seed_from_u64(0);

    for game in [GameConfig::connect_four(), GameConfig::tic_tac_toe()] {
        for round in 0..12 {
            let (mut board, player) = random_position(game.new_board(), round % 8, &mut rng);
            let before = board.clone();

            let pruned = search(&mut board, player, &deterministic(4, true), &mut dummy);
            let full = search(&mut board, player, &deterministic(4, false), &mut dummy);

            assert_eq!(pruned.score, full.score, "{} round {}\n{}", game.name, round, board);
            assert_eq!(pruned.best_move, full.best_move);
            assert!(pruned.nodes <= full.nodes);
            assert_eq!(board, before);
        }
    }
}

#[test]
fn test_medium_takes_wins_and_blocks() {
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let mut ai = AiPlayer::new(AiConfig::medium().with_seed(3));
    let mut checked = 0;

    for _ in 0..200 {
        let (mut board, player) = random_position(GameConfig::connect_four().new_board(), 14, &mut rng);
        let wins = winning_moves(&mut board, player);
        let threats = winning_moves(&mut board, player.opponent());
        let Some(mv) = ai.choose_move(&mut board, player) else { continue };

        if !wins.is_empty() {
            assert!(wins.contains(&mv), "missed win {:?}, played {}\n{}", wins, mv, board);
            checked += 1;
        } else if !threats.is_empty() {
            assert!(threats.contains(&mv), "missed block {:?}, played {}\n{}", threats, mv, board);
            checked += 1;
        }
    }

    assert!(checked > 0, "no tactical positions generated");
}

// ============================================================================
// BOARD PROPERTIES
// ============================================================================

#[test]
fn test_apply_undo_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    for game in [GameConfig::connect_four(), GameConfig::tic_tac_toe()] {
        let (mut board, player) = random_position(game.new_board(), 6, &mut rng);
        let snapshot = board.clone();

        for mv in board.placeable_moves() {
            let coord = board.apply(mv, player).unwrap();
            assert_eq!(board.filled(), snapshot.filled() + 1);
            board.undo(coord);
            assert_eq!(board, snapshot);
        }
    }
}

#[test]
fn test_win_requires_exactly_k_in_line() {
    let config = GameConfig {
        name: "five-by-five".to_string(),
        rows: 5,
        cols: 5,
        win_length: 4,
        placement: Placement::FreeCell,
    };
    let mut board = config.new_board();

    let mut last = Coord::new(0, 0);
    for i in 0..3 {
        last = board.apply(Move::Place(Coord::new(i + 1, i + 1)), Player::A).unwrap();
        assert!(!is_win(&board, last, Player::A));
    }
    assert_eq!(last, Coord::new(3, 3));

    let corner = board.apply(Move::Place(Coord::new(0, 0)), Player::A).unwrap();
    let line = find_win(&board, corner, Player::A).unwrap();
    assert_eq!(line.player, Player::A);
    assert_eq!(line.cells.len(), 4);
    assert!((0..4).all(|i| line.contains(Coord::new(i, i))));

    // Same line through the other end
    assert!(is_win(&board, Coord::new(3, 3), Player::A));
    assert!(!is_win(&board, corner, Player::B));
}
