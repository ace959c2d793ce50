// Isolation agent
//
// Binds the search engine to one evaluator and exposes the single per-turn
// entry point used by a game harness.

use log::info;
use std::time::{Duration, Instant};

use crate::board::Board;
use crate::config::{Config, SearchMode};
use crate::heuristics::Heuristic;
use crate::search::{SearchOutcome, Searcher};
use crate::types::Square;

/// Game-playing agent
/// Takes static configuration and an evaluator; keeps no state between moves,
/// so one instance can play any number of independent games
pub struct Agent {
    config: Config,
    heuristic: Heuristic,
}

impl Agent {
    /// Creates an agent using the evaluator named in the configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the agent's lifetime
    pub fn new(config: Config) -> Self {
        let heuristic = config.heuristic.kind.function();
        Agent { config, heuristic }
    }

    /// Creates an agent with an explicit evaluator, ignoring `config.heuristic`
    pub fn with_heuristic(config: Config, heuristic: Heuristic) -> Self {
        Agent { config, heuristic }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Chooses a move for the active player within `time_budget`
    ///
    /// # Returns
    /// * `Some(square)` - A legal move for the active player
    /// * `None` - Forfeit: the active player has no legal move
    pub fn choose_move(&self, board: &Board, time_budget: Duration) -> Option<Square> {
        self.search(board, time_budget).best_move
    }

    /// Runs the configured search and returns the full outcome
    pub fn search(&self, board: &Board, time_budget: Duration) -> SearchOutcome {
        let start_time = Instant::now();
        // A budget too large to represent as an instant means no deadline
        let deadline = start_time.checked_add(self.config.timing.effective_budget(time_budget));
        let player = board.active_player();

        let mut searcher = Searcher::new(
            self.heuristic,
            player,
            deadline,
            self.config.timing.node_check_interval,
        );

        let search = &self.config.search;
        let outcome = match search.mode {
            SearchMode::IterativeDeepening => searcher.iterative_deepening(
                board,
                search.max_search_depth,
                search.alpha_beta_pruning,
                search.stop_on_proven_result,
            ),
            SearchMode::FixedDepth => {
                searcher.fixed_depth(board, search.fixed_depth, search.alpha_beta_pruning)
            }
        };

        match outcome.best_move {
            Some(mv) => info!(
                "Move {}: player {} chose {} (score: {}, depth: {}, nodes: {}, time: {}ms)",
                board.move_count(),
                player,
                mv,
                outcome.score,
                outcome.depth,
                outcome.stats.nodes,
                start_time.elapsed().as_millis()
            ),
            None => info!(
                "Move {}: player {} has no legal moves, forfeiting",
                board.move_count(),
                player
            ),
        }

        outcome
    }
}
