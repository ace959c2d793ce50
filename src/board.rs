// Board state for Isolation
//
// A Board is an immutable snapshot of one position: forecasting a move never
// mutates the receiver, it returns the successor position. Squares vacated by a
// move are removed for the rest of the game.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use thiserror::Error;

use crate::types::{Direction, Player, Square};

/// Errors raised by board operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IsolationError {
    #[error("invalid move {square} for player {player}")]
    InvalidMove { square: Square, player: Player },
    #[error("square {0} is outside the board")]
    OutOfBounds(Square),
    #[error("invalid board snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Number of squares on a `width` x `height` board, `None` if either
/// dimension is not positive or the product overflows
fn cell_count(width: i32, height: i32) -> Option<usize> {
    if width <= 0 || height <= 0 {
        return None;
    }
    width.checked_mul(height).map(|n| n as usize)
}

/// Serialized form of a board, checked before it becomes a `Board`
#[derive(Deserialize)]
struct BoardSnapshot {
    width: i32,
    height: i32,
    removed: Vec<bool>,
    locations: [Option<Square>; 2],
    active: Player,
    move_count: u32,
}

impl TryFrom<BoardSnapshot> for Board {
    type Error = IsolationError;

    fn try_from(snapshot: BoardSnapshot) -> Result<Self, Self::Error> {
        let BoardSnapshot {
            width,
            height,
            removed,
            locations,
            active,
            move_count,
        } = snapshot;

        let cells = cell_count(width, height).ok_or_else(|| {
            IsolationError::InvalidSnapshot(format!("bad dimensions {}x{}", width, height))
        })?;
        if removed.len() != cells {
            return Err(IsolationError::InvalidSnapshot(format!(
                "{} removed flags for {} squares",
                removed.len(),
                cells
            )));
        }

        let board = Board {
            width,
            height,
            removed,
            locations,
            active,
            move_count,
        };

        for square in board.locations.iter().flatten() {
            if !board.in_bounds(square) {
                return Err(IsolationError::OutOfBounds(*square));
            }
            if board.removed[board.index_of(square)] {
                return Err(IsolationError::InvalidSnapshot(format!(
                    "player stands on removed square {}",
                    square
                )));
            }
        }
        if board.locations[0].is_some() && board.locations[0] == board.locations[1] {
            return Err(IsolationError::InvalidSnapshot(
                "both players on one square".to_string(),
            ));
        }

        Ok(board)
    }
}

/// Immutable Isolation position
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "BoardSnapshot")]
pub struct Board {
    width: i32,
    height: i32,
    /// Row-major flags, true once a square has been vacated
    removed: Vec<bool>,
    locations: [Option<Square>; 2],
    active: Player,
    move_count: u32,
}

impl Board {
    /// Creates the initial position: nothing removed, both players unplaced,
    /// player one to move
    ///
    /// # Panics
    /// If either dimension is not strictly positive or the square count
    /// overflows
    pub fn new(width: i32, height: i32) -> Self {
        let cells = cell_count(width, height);
        assert!(
            cells.is_some(),
            "Board dimensions must be positive and bounded, got {}x{}",
            width,
            height
        );

        Board {
            width,
            height,
            removed: vec![false; cells.unwrap_or(0)],
            locations: [None, None],
            active: Player::One,
            move_count: 0,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Player whose turn it is
    pub fn active_player(&self) -> Player {
        self.active
    }

    /// Player waiting for the active player to move
    pub fn inactive_player(&self) -> Player {
        self.active.opponent()
    }

    pub fn opponent_of(&self, player: Player) -> Player {
        player.opponent()
    }

    /// Current square of `player`, `None` before their first move
    pub fn player_location(&self, player: Player) -> Option<Square> {
        self.locations[player.index()]
    }

    /// Number of plies played so far
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn in_bounds(&self, square: &Square) -> bool {
        square.row >= 0 && square.row < self.height && square.col >= 0 && square.col < self.width
    }

    fn index_of(&self, square: &Square) -> usize {
        (square.row * self.width + square.col) as usize
    }

    /// Whether `square` has been vacated earlier in the game
    pub fn is_removed(&self, square: &Square) -> Result<bool, IsolationError> {
        if !self.in_bounds(square) {
            return Err(IsolationError::OutOfBounds(*square));
        }
        Ok(self.removed[self.index_of(square)])
    }

    /// A square is open when it is on the board, not removed and not
    /// occupied by either player
    pub fn is_open(&self, square: &Square) -> bool {
        self.in_bounds(square)
            && !self.removed[self.index_of(square)]
            && !self.locations.iter().any(|loc| *loc == Some(*square))
    }

    fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Square { row, col }))
    }

    /// All open squares in row-major order
    pub fn open_squares(&self) -> Vec<Square> {
        self.squares().filter(|sq| self.is_open(sq)).collect()
    }

    /// All removed squares in row-major order
    pub fn removed_squares(&self) -> Vec<Square> {
        self.squares()
            .filter(|sq| self.removed[self.index_of(sq)])
            .collect()
    }

    /// Upper bound on the number of plies left in the game. Every ply lands on
    /// an open square, so the game cannot outlast them.
    pub fn remaining_plies_bound(&self) -> usize {
        self.squares().filter(|sq| self.is_open(sq)).count()
    }

    /// Generates the legal moves of `player`
    ///
    /// A placed player may step once in any of the eight directions onto an
    /// open square. An unplaced player may move to any open square.
    pub fn legal_moves(&self, player: Player) -> Vec<Square> {
        match self.player_location(player) {
            None => self.open_squares(),
            Some(from) => Direction::all()
                .iter()
                .map(|dir| dir.apply(&from))
                .filter(|sq| self.is_open(sq))
                .collect(),
        }
    }

    /// Number of legal moves of `player`, without allocating for placed players
    pub fn mobility(&self, player: Player) -> usize {
        match self.player_location(player) {
            None => self.remaining_plies_bound(),
            Some(from) => Direction::all()
                .iter()
                .filter(|dir| self.is_open(&dir.apply(&from)))
                .count(),
        }
    }

    /// Whether the active player may move to `square`
    pub fn is_legal(&self, square: &Square) -> bool {
        match self.player_location(self.active) {
            None => self.is_open(square),
            Some(from) => {
                let dr = (square.row - from.row).abs();
                let dc = (square.col - from.col).abs();
                dr <= 1 && dc <= 1 && (dr, dc) != (0, 0) && self.is_open(square)
            }
        }
    }

    /// Returns the position after the active player moves to `square`
    ///
    /// # Errors
    /// `IsolationError::InvalidMove` if `square` is not a legal move for the
    /// active player
    pub fn forecast_move(&self, square: Square) -> Result<Board, IsolationError> {
        if !self.is_legal(&square) {
            return Err(IsolationError::InvalidMove {
                square,
                player: self.active,
            });
        }
        Ok(self.advance(self.active, square))
    }

    /// Moves `player` to `square` without legality checks and hands the turn
    /// to the other player. Used by lookahead heuristics that explore one
    /// player's moves regardless of whose turn it is.
    pub(crate) fn advance(&self, player: Player, square: Square) -> Board {
        let mut next = self.clone();
        if let Some(from) = self.locations[player.index()] {
            let idx = next.index_of(&from);
            next.removed[idx] = true;
        }
        next.locations[player.index()] = Some(square);
        next.active = player.opponent();
        next.move_count += 1;
        next
    }

    /// True exactly when the active player has no legal move
    pub fn is_terminal(&self) -> bool {
        self.mobility(self.active) == 0
    }

    /// Win/loss value at terminal positions, `None` otherwise
    ///
    /// The active player is the one who is stuck, so they get `-inf` and the
    /// other player `+inf`.
    pub fn utility(&self, player: Player) -> Option<f64> {
        if !self.is_terminal() {
            return None;
        }
        if player == self.active {
            Some(f64::NEG_INFINITY)
        } else {
            Some(f64::INFINITY)
        }
    }

    pub fn is_winner(&self, player: Player) -> bool {
        self.utility(player) == Some(f64::INFINITY)
    }

    pub fn is_loser(&self, player: Player) -> bool {
        self.utility(player) == Some(f64::NEG_INFINITY)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            let cells: Vec<&str> = (0..self.width)
                .map(|col| {
                    let sq = Square { row, col };
                    if self.locations[0] == Some(sq) {
                        "1"
                    } else if self.locations[1] == Some(sq) {
                        "2"
                    } else if self.removed[self.index_of(&sq)] {
                        "-"
                    } else {
                        "."
                    }
                })
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}
