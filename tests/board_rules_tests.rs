//! Board rule tests
//!
//! Properties checked over seeded random playouts: every generated move can
//! be forecast, each placed move removes exactly the vacated square, and
//! terminal detection agrees with move generation.

mod common;

use common::{board_after, random_playout, sq};
use isolation_agent::{Board, IsolationError, Player};
use serde_json::json;
use std::collections::HashSet;

const SEEDS: [u64; 6] = [1, 7, 42, 99, 1234, 31337];

#[test]
fn test_every_legal_move_can_be_forecast() {
    for &seed in SEEDS.iter() {
        for board in random_playout(5, 5, seed) {
            for mv in board.legal_moves(board.active_player()) {
                assert!(
                    board.forecast_move(mv).is_ok(),
                    "legal move {} rejected on\n{}",
                    mv,
                    board
                );
            }
        }
    }
}

#[test]
fn test_removed_set_grows_by_exactly_the_vacated_square() {
    for &seed in SEEDS.iter() {
        for board in random_playout(6, 5, seed) {
            let before: HashSet<_> = board.removed_squares().into_iter().collect();
            let mover = board.active_player();
            let origin = board.player_location(mover);

            for mv in board.legal_moves(mover) {
                let next = board.forecast_move(mv).unwrap();
                let after: HashSet<_> = next.removed_squares().into_iter().collect();

                assert!(before.is_subset(&after), "removed squares came back");
                match origin {
                    Some(from) => {
                        assert_eq!(after.len(), before.len() + 1);
                        assert!(after.contains(&from));
                    }
                    None => assert_eq!(after, before, "first move vacates nothing"),
                }
                assert_eq!(next.player_location(mover), Some(mv));
                assert_eq!(next.active_player(), mover.opponent());
            }
        }
    }
}

#[test]
fn test_terminal_iff_active_player_cannot_move() {
    for &seed in SEEDS.iter() {
        let history = random_playout(5, 5, seed);
        let last = history.last().unwrap();
        assert!(last.is_terminal());

        for board in &history {
            let stuck = board.legal_moves(board.active_player()).is_empty();
            assert_eq!(board.is_terminal(), stuck);

            if board.is_terminal() {
                let active = board.active_player();
                assert_eq!(board.utility(active), Some(f64::NEG_INFINITY));
                assert_eq!(board.utility(active.opponent()), Some(f64::INFINITY));
                assert!(board.is_loser(active));
                assert!(board.is_winner(active.opponent()));
            } else {
                assert_eq!(board.utility(Player::One), None);
                assert_eq!(board.utility(Player::Two), None);
            }
        }
    }
}

#[test]
fn test_playout_never_outlasts_the_board() {
    for &seed in SEEDS.iter() {
        let history = random_playout(4, 4, seed);
        assert!(history.len() - 1 <= 16);
        for board in &history {
            assert!(board.remaining_plies_bound() + board.move_count() as usize <= 16);
        }
    }
}

#[test]
fn test_moves_are_single_queen_steps() {
    let board = board_after(5, 5, &[(2, 2), (0, 0)]);
    let moves = board.legal_moves(Player::One);
    assert_eq!(moves.len(), 8);
    for mv in moves {
        let dr = (mv.row - 2).abs();
        let dc = (mv.col - 2).abs();
        assert!(dr <= 1 && dc <= 1, "{} is not a single step", mv);
    }
}

#[test]
fn test_corner_and_blocked_moves() {
    // Both players step inwards, removing (0,0) and (4,4)
    let board = board_after(5, 5, &[(0, 0), (4, 4), (1, 1), (3, 3)]);
    let moves = board.legal_moves(Player::One);

    assert!(!moves.contains(&sq(0, 0)), "removed square offered");
    assert_eq!(moves.len(), 7);

    let opp_moves = board.legal_moves(Player::Two);
    assert!(!opp_moves.contains(&sq(4, 4)));
    assert_eq!(opp_moves.len(), 7);
}

#[test]
fn test_forecast_rejects_non_adjacent_square() {
    let board = board_after(5, 5, &[(0, 0), (4, 4)]);
    match board.forecast_move(sq(0, 2)) {
        Err(IsolationError::InvalidMove { square, player }) => {
            assert_eq!(square, sq(0, 2));
            assert_eq!(player, Player::One);
        }
        other => panic!("expected InvalidMove, got {:?}", other),
    }
}

#[test]
fn test_stuck_player_loses() {
    // 3x1 corridor: player one steps between and walls player two in
    let board = board_after(3, 1, &[(0, 0), (0, 2), (0, 1)]);
    assert!(board.is_terminal());
    assert_eq!(board.active_player(), Player::Two);
    assert!(board.is_winner(Player::One));
    assert!(board.is_loser(Player::Two));
}

#[test]
fn test_board_snapshot_round_trips_through_json() {
    let board = board_after(5, 5, &[(0, 0), (4, 4), (1, 1)]);
    let json = serde_json::to_string(&board).expect("board should serialize");
    let restored: Board = serde_json::from_str(&json).expect("board should deserialize");
    assert_eq!(restored, board);
    assert_eq!(
        restored.legal_moves(restored.active_player()),
        board.legal_moves(board.active_player())
    );
}

#[test]
fn test_malformed_snapshots_are_rejected() {
    let cases = vec![
        // removed flags missing for a 5x5 board
        json!({
            "width": 5, "height": 5, "removed": [],
            "locations": [{"row": 0, "col": 0}, null], "active": "Two", "move_count": 1
        }),
        // zero width
        json!({
            "width": 0, "height": 5, "removed": [],
            "locations": [null, null], "active": "One", "move_count": 0
        }),
        // player off the board
        json!({
            "width": 2, "height": 1, "removed": [false, false],
            "locations": [{"row": 0, "col": 5}, null], "active": "Two", "move_count": 1
        }),
        // player standing on a removed square
        json!({
            "width": 2, "height": 1, "removed": [true, false],
            "locations": [{"row": 0, "col": 0}, null], "active": "Two", "move_count": 1
        }),
        // both players on one square
        json!({
            "width": 2, "height": 1, "removed": [false, false],
            "locations": [{"row": 0, "col": 1}, {"row": 0, "col": 1}],
            "active": "One", "move_count": 2
        }),
    ];

    for value in cases {
        let text = value.to_string();
        let result: Result<Board, _> = serde_json::from_str(&text);
        assert!(result.is_err(), "accepted malformed snapshot {}", text);
    }
}
