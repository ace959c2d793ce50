// Configuration module for reading Isolation.toml
// Tunable parameters for the search and the agent's evaluator choice

use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::heuristics::HeuristicKind;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub search: SearchConfig,
    pub heuristic: HeuristicConfig,
}

/// Timing constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    /// Margin kept free at the end of every move budget
    pub timer_threshold_ms: u64,
    /// Nodes expanded between two clock polls. Too coarse risks overrunning
    /// the budget inside a deep branch, too fine spends time reading the clock.
    pub node_check_interval: u64,
}

impl TimingConfig {
    /// Computes the usable part of a move budget
    pub fn effective_budget(&self, budget: Duration) -> Duration {
        budget.saturating_sub(Duration::from_millis(self.timer_threshold_ms))
    }
}

/// How the agent drives the search
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    IterativeDeepening,
    FixedDepth,
}

/// Search constants
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub mode: SearchMode,
    /// Depth used in fixed-depth mode
    pub fixed_depth: u32,
    /// Safety cap on iterative deepening
    pub max_search_depth: u32,
    pub alpha_beta_pruning: bool,
    /// Stop deepening once a completed depth proves a win or a loss
    pub stop_on_proven_result: bool,
}

/// Evaluator selection
#[derive(Debug, Deserialize, Clone)]
pub struct HeuristicConfig {
    pub kind: HeuristicKind,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Isolation.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Isolation.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Isolation.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Isolation.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                timer_threshold_ms: 10,
                node_check_interval: 1,
            },
            search: SearchConfig {
                mode: SearchMode::IterativeDeepening,
                fixed_depth: 3,
                max_search_depth: 64,
                alpha_beta_pruning: true,
                stop_on_proven_result: true,
            },
            heuristic: HeuristicConfig {
                kind: HeuristicKind::TwoPlyMobility,
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            warn!("Could not load Isolation.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
