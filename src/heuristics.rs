// Position evaluation heuristics
//
// Every evaluator is a plain function `fn(&Board, Player) -> f64` scoring the
// position from the point of view of `player`. Evaluators are stateless and
// never mutate the board. On terminal positions they return the utility so
// they can never contradict the real outcome.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::types::Player;

/// Signature shared by all evaluators
pub type Heuristic = fn(&Board, Player) -> f64;

/// Weight applied to the opponent's mobility. Above 1.0, so denying the
/// opponent moves counts for more than keeping our own.
pub const OPPONENT_MOBILITY_WEIGHT: f64 = 1.5;

/// Selectable evaluator, as named in `Isolation.toml`
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    WeightedMobility,
    MobilityProximity,
    TwoPlyMobility,
    OpenMoves,
    Improved,
    Center,
}

impl HeuristicKind {
    pub fn all() -> [HeuristicKind; 6] {
        [
            HeuristicKind::WeightedMobility,
            HeuristicKind::MobilityProximity,
            HeuristicKind::TwoPlyMobility,
            HeuristicKind::OpenMoves,
            HeuristicKind::Improved,
            HeuristicKind::Center,
        ]
    }

    /// Returns the evaluator function for this kind
    pub fn function(self) -> Heuristic {
        match self {
            HeuristicKind::WeightedMobility => weighted_mobility,
            HeuristicKind::MobilityProximity => mobility_proximity,
            HeuristicKind::TwoPlyMobility => two_ply_mobility,
            HeuristicKind::OpenMoves => open_moves,
            HeuristicKind::Improved => improved,
            HeuristicKind::Center => center,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeuristicKind::WeightedMobility => "weighted_mobility",
            HeuristicKind::MobilityProximity => "mobility_proximity",
            HeuristicKind::TwoPlyMobility => "two_ply_mobility",
            HeuristicKind::OpenMoves => "open_moves",
            HeuristicKind::Improved => "improved",
            HeuristicKind::Center => "center",
        }
    }
}

/// `own_moves - 1.5 * opponent_moves`
pub fn weighted_mobility(board: &Board, player: Player) -> f64 {
    if let Some(value) = board.utility(player) {
        return value;
    }

    let own = board.mobility(player) as f64;
    let opp = board.mobility(player.opponent()) as f64;
    own - OPPONENT_MOBILITY_WEIGHT * opp
}

/// Weighted mobility scaled by the Manhattan distance between the players
///
/// Players never share a square, so the distance is at least 1 once both are
/// placed. Before that the distance is undefined and the factor is 1.
pub fn mobility_proximity(board: &Board, player: Player) -> f64 {
    if let Some(value) = board.utility(player) {
        return value;
    }

    let distance = match (
        board.player_location(player),
        board.player_location(player.opponent()),
    ) {
        (Some(own), Some(opp)) => own.manhattan_distance(&opp).max(1),
        _ => 1,
    };

    weighted_mobility(board, player) * distance as f64
}

/// Sum of move counts over the player's own one- and two-ply successors
///
/// The walk follows only `player`'s moves, as if the opponent stood still.
/// An unplaced player can go anywhere, so only their direct count is used.
fn lookahead_mobility(board: &Board, player: Player) -> usize {
    let mut total = board.mobility(player);
    if board.player_location(player).is_none() {
        return total;
    }

    for first in board.legal_moves(player) {
        let one_ply = board.advance(player, first);
        total += one_ply.mobility(player);
        for second in one_ply.legal_moves(player) {
            let two_ply = one_ply.advance(player, second);
            total += two_ply.mobility(player);
        }
    }
    total
}

/// Two-ply lookahead variant of weighted mobility
pub fn two_ply_mobility(board: &Board, player: Player) -> f64 {
    if let Some(value) = board.utility(player) {
        return value;
    }

    let own = lookahead_mobility(board, player) as f64;
    let opp = lookahead_mobility(board, player.opponent()) as f64;
    own - OPPONENT_MOBILITY_WEIGHT * opp
}

/// Baseline: number of own legal moves
pub fn open_moves(board: &Board, player: Player) -> f64 {
    if let Some(value) = board.utility(player) {
        return value;
    }
    board.mobility(player) as f64
}

/// Baseline: `own_moves - opponent_moves`
pub fn improved(board: &Board, player: Player) -> f64 {
    if let Some(value) = board.utility(player) {
        return value;
    }
    board.mobility(player) as f64 - board.mobility(player.opponent()) as f64
}

/// Baseline: squared distance of the player from the board centre
pub fn center(board: &Board, player: Player) -> f64 {
    if let Some(value) = board.utility(player) {
        return value;
    }

    match board.player_location(player) {
        None => 0.0,
        Some(sq) => {
            let cy = board.height() as f64 / 2.0;
            let cx = board.width() as f64 / 2.0;
            let dy = sq.row as f64 - cy;
            let dx = sq.col as f64 - cx;
            dy * dy + dx * dx
        }
    }
}
