// Minimax search with alpha-beta pruning and an iterative-deepening driver
//
// The search runs on one thread and polls a monotonic clock every
// `node_check_interval` expanded nodes. When the deadline passes, a
// `SearchTimeout` is propagated up the recursion with `?` and the driver falls
// back to the last fully completed depth.

use log::debug;
use std::time::Instant;
use thiserror::Error;

use crate::board::Board;
use crate::heuristics::Heuristic;
use crate::types::{Player, Square};

/// Raised inside the recursion when the deadline has passed
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("search deadline reached")]
pub struct SearchTimeout;

/// Counters collected during one search
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub evaluations: u64,
    pub cutoffs: u64,
}

/// Result of a driver run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    /// `None` only when the root position had no legal move
    pub best_move: Option<Square>,
    /// Score of `best_move` at `depth`; `NEG_INFINITY` if no depth completed
    pub score: f64,
    /// Deepest fully completed depth, 0 if none completed
    pub depth: u32,
    pub timed_out: bool,
    pub stats: SearchStats,
}

/// Per-call search engine. Holds the evaluator, the perspective of the
/// maximizing player and the deadline; nothing survives between calls.
pub struct Searcher {
    heuristic: Heuristic,
    player: Player,
    deadline: Option<Instant>,
    node_check_interval: u64,
    node_limit: Option<u64>,
    stats: SearchStats,
}

impl Searcher {
    /// Creates a searcher that maximizes the score of `player`
    ///
    /// # Arguments
    /// * `heuristic` - Leaf evaluator
    /// * `player` - Player whose score is maximized
    /// * `deadline` - Instant after which the search aborts, `None` for no limit
    /// * `node_check_interval` - Expanded nodes between two clock polls
    pub fn new(
        heuristic: Heuristic,
        player: Player,
        deadline: Option<Instant>,
        node_check_interval: u64,
    ) -> Self {
        Searcher {
            heuristic,
            player,
            deadline,
            node_check_interval: node_check_interval.max(1),
            node_limit: None,
            stats: SearchStats::default(),
        }
    }

    /// Aborts the search, like a passed deadline, once more than `limit`
    /// nodes have been expanded in total
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Searcher without a deadline, for fixed-depth analysis
    pub fn unbounded(heuristic: Heuristic, player: Player) -> Self {
        Self::new(heuristic, player, None, 1)
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Counts a node and polls the clock once per interval
    fn enter_node(&mut self) -> Result<(), SearchTimeout> {
        self.stats.nodes += 1;
        if let Some(limit) = self.node_limit {
            if self.stats.nodes > limit {
                return Err(SearchTimeout);
            }
        }
        if let Some(deadline) = self.deadline {
            if self.stats.nodes % self.node_check_interval == 0 && Instant::now() >= deadline {
                return Err(SearchTimeout);
            }
        }
        Ok(())
    }

    /// Leaf value: utility at terminal positions, heuristic otherwise
    fn evaluate(&mut self, board: &Board) -> f64 {
        if let Some(value) = board.utility(self.player) {
            return value;
        }
        self.stats.evaluations += 1;
        let score = (self.heuristic)(board, self.player);
        debug_assert!(
            score.is_finite(),
            "heuristic returned {} on a non-terminal board",
            score
        );
        score
    }

    /// Depth-limited minimax with alpha-beta pruning
    ///
    /// Moves are visited in enumeration order; on equal scores the first
    /// move is kept.
    ///
    /// # Returns
    /// `(score, move)` where `move` is `None` only if the position had no
    /// legal move or `depth` is 0
    pub fn alpha_beta(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
    ) -> Result<(f64, Option<Square>), SearchTimeout> {
        self.enter_node()?;

        if depth == 0 || board.is_terminal() {
            return Ok((self.evaluate(board), None));
        }

        let moves = board.legal_moves(board.active_player());
        if moves.is_empty() {
            return Ok((self.evaluate(board), None));
        }

        let mut best_move = None;
        let mut best_score = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for mv in moves {
            let next = board.advance(board.active_player(), mv);
            let (score, _) = self.alpha_beta(&next, depth - 1, alpha, beta, !maximizing)?;

            if maximizing {
                if best_move.is_none() || score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(best_score);
                if alpha >= beta {
                    self.stats.cutoffs += 1;
                    break;
                }
            } else {
                if best_move.is_none() || score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                beta = beta.min(best_score);
                if beta <= alpha {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
        }

        Ok((best_score, best_move))
    }

    /// Plain depth-limited minimax, visiting every node
    pub fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        maximizing: bool,
    ) -> Result<(f64, Option<Square>), SearchTimeout> {
        self.enter_node()?;

        if depth == 0 || board.is_terminal() {
            return Ok((self.evaluate(board), None));
        }

        let mut best_move = None;
        let mut best_score = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for mv in board.legal_moves(board.active_player()) {
            let next = board.advance(board.active_player(), mv);
            let (score, _) = self.minimax(&next, depth - 1, !maximizing)?;
            let better = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            if best_move.is_none() || better {
                best_score = score;
                best_move = Some(mv);
            }
        }

        Ok((best_score, best_move))
    }

    /// Runs one full-width search at `depth` from the root
    fn search_root(
        &mut self,
        board: &Board,
        depth: u32,
        pruning: bool,
    ) -> Result<(f64, Option<Square>), SearchTimeout> {
        if pruning {
            self.alpha_beta(board, depth, f64::NEG_INFINITY, f64::INFINITY, true)
        } else {
            self.minimax(board, depth, true)
        }
    }

    /// Searches exactly `depth` plies; on timeout returns the first legal move
    pub fn fixed_depth(&mut self, board: &Board, depth: u32, pruning: bool) -> SearchOutcome {
        let fallback = board.legal_moves(board.active_player()).first().copied();
        let mut outcome = SearchOutcome {
            best_move: fallback,
            score: f64::NEG_INFINITY,
            depth: 0,
            timed_out: false,
            stats: SearchStats::default(),
        };

        if fallback.is_some() {
            match self.search_root(board, depth.max(1), pruning) {
                Ok((score, mv)) => {
                    outcome.best_move = mv.or(fallback);
                    outcome.score = score;
                    outcome.depth = depth.max(1);
                }
                Err(SearchTimeout) => {
                    debug!("Fixed-depth search at depth {} timed out", depth);
                    outcome.timed_out = true;
                }
            }
        }

        outcome.stats = self.stats;
        outcome
    }

    /// Iterative deepening driver
    ///
    /// Searches depth 1, 2, ... until the deadline passes, `max_depth` is
    /// reached, the depth exceeds the number of plies left in the game, or
    /// (with `stop_on_proven`) a completed depth proves a win or a loss.
    /// Only fully completed depths update the result.
    pub fn iterative_deepening(
        &mut self,
        board: &Board,
        max_depth: u32,
        pruning: bool,
        stop_on_proven: bool,
    ) -> SearchOutcome {
        // Safe default before any search, in case depth 1 does not complete
        let fallback = board.legal_moves(board.active_player()).first().copied();
        let mut outcome = SearchOutcome {
            best_move: fallback,
            score: f64::NEG_INFINITY,
            depth: 0,
            timed_out: false,
            stats: SearchStats::default(),
        };

        if fallback.is_none() {
            return outcome;
        }

        let depth_limit = (board.remaining_plies_bound() as u32).min(max_depth).max(1);

        for depth in 1..=depth_limit {
            match self.search_root(board, depth, pruning) {
                Ok((score, mv)) => {
                    outcome.best_move = mv.or(fallback);
                    outcome.score = score;
                    outcome.depth = depth;
                    debug!(
                        "Completed depth {} (score: {}, move: {:?}, nodes: {})",
                        depth, score, outcome.best_move, self.stats.nodes
                    );

                    if stop_on_proven && score.is_infinite() {
                        debug!("Stopping search: result proven at depth {}", depth);
                        break;
                    }
                }
                Err(SearchTimeout) => {
                    debug!(
                        "Abandoned depth {} at deadline, keeping depth {}",
                        depth, outcome.depth
                    );
                    outcome.timed_out = true;
                    break;
                }
            }
        }

        outcome.stats = self.stats;
        outcome
    }
}
