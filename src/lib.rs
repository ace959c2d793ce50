// Library exports for the Isolation agent
// A game harness drives games through Board and asks Agent for moves

pub mod agent;
pub mod board;
pub mod config;
pub mod heuristics;
pub mod search;
pub mod types;

pub use agent::Agent;
pub use board::{Board, IsolationError};
pub use config::Config;
pub use types::{Player, Square};
