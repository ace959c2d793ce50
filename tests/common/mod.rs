// Shared helpers for integration tests: a minimal game loop standing in for a
// tournament harness, plus seeded random playouts.
#![allow(dead_code)]

use isolation_agent::{Agent, Board, Player, Square};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::time::Duration;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn sq(row: i32, col: i32) -> Square {
    Square::new(row, col)
}

/// Applies a sequence of moves from the initial position
pub fn board_after(width: i32, height: i32, moves: &[(i32, i32)]) -> Board {
    moves.iter().fold(Board::new(width, height), |board, &(r, c)| {
        board
            .forecast_move(sq(r, c))
            .expect("scripted move should be legal")
    })
}

/// Outcome of one full game
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub moves: Vec<Square>,
    pub winner: Player,
    pub final_board: Board,
}

/// Plays one game to completion. `agents[0]` plays as player one.
pub fn play_game(width: i32, height: i32, agents: [&Agent; 2], budget: Duration) -> GameRecord {
    let mut board = Board::new(width, height);
    let mut moves = Vec::new();

    loop {
        let player = board.active_player();
        match agents[player.index()].choose_move(&board, budget) {
            Some(mv) => {
                board = board
                    .forecast_move(mv)
                    .expect("agent returned an illegal move");
                moves.push(mv);
            }
            None => {
                assert!(board.is_terminal(), "agent forfeited with moves left");
                return GameRecord {
                    moves,
                    winner: player.opponent(),
                    final_board: board,
                };
            }
        }
    }
}

/// Plays uniformly random legal moves until the game ends, returning every
/// position visited including the initial and the terminal one
pub fn random_playout(width: i32, height: i32, seed: u64) -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::new(width, height);
    let mut history = vec![board.clone()];

    while let Some(&mv) = board.legal_moves(board.active_player()).choose(&mut rng) {
        board = board
            .forecast_move(mv)
            .expect("random legal move should be accepted");
        history.push(board.clone());
    }
    history
}
