//! Table configuration models.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::game::{
    GameSettings,
    constants::{
        DEFAULT_BIG_BLIND, DEFAULT_SMALL_BLIND, DEFAULT_STARTING_CHIPS, MAX_PLAYERS, MIN_PLAYERS,
    },
    entities::Chips,
};

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("cannot parse {var}={value}")]
    Malformed { var: String, value: String },
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Table configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Table name, used in logs
    pub name: String,

    /// Joins needed before the first hand (default: 2)
    pub min_players: usize,

    /// Seats at the table (default: 6)
    pub max_players: usize,

    /// Stack every player starts a game with
    pub starting_chips: Chips,

    pub small_blind: Chips,

    pub big_blind: Chips,

    /// End the game after this many rounds
    pub max_rounds: Option<u32>,

    /// Pause between ROUND_OVER and the next deal
    pub round_over_delay_ms: u64,

    /// Start a fresh game automatically after GAME_OVER
    pub auto_restart_enabled: bool,

    /// Pause between GAME_OVER and the restart
    pub auto_restart_delay_ms: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: "Table".to_string(),
            min_players: MIN_PLAYERS,
            max_players: MAX_PLAYERS,
            starting_chips: DEFAULT_STARTING_CHIPS,
            small_blind: DEFAULT_SMALL_BLIND,
            big_blind: DEFAULT_BIG_BLIND,
            max_rounds: None,
            round_over_delay_ms: 3_000,
            auto_restart_enabled: false,
            auto_restart_delay_ms: 10_000,
        }
    }
}

impl TableConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.max_players) {
            return Err(ConfigError::invalid(
                "max_players",
                format!("must be between {MIN_PLAYERS} and {MAX_PLAYERS}"),
            ));
        }
        if self.min_players < MIN_PLAYERS || self.min_players > self.max_players {
            return Err(ConfigError::invalid(
                "min_players",
                format!("must be between {MIN_PLAYERS} and max_players"),
            ));
        }
        if self.small_blind == 0 {
            return Err(ConfigError::invalid("small_blind", "must be positive"));
        }
        if self.big_blind < self.small_blind {
            return Err(ConfigError::invalid(
                "big_blind",
                "must be at least the small blind",
            ));
        }
        if self.starting_chips < self.big_blind {
            return Err(ConfigError::invalid(
                "starting_chips",
                "must cover the big blind",
            ));
        }
        // Every chip on the table has to fit in a stack.
        if self
            .starting_chips
            .checked_mul(self.max_players as Chips)
            .is_none()
        {
            return Err(ConfigError::invalid("starting_chips", "too large"));
        }
        if self.max_rounds == Some(0) {
            return Err(ConfigError::invalid("max_rounds", "must be positive"));
        }
        Ok(())
    }

    /// Game rules carried into every snapshot
    #[must_use]
    pub fn settings(&self) -> GameSettings {
        GameSettings::new(
            self.starting_chips,
            self.small_blind,
            self.big_blind,
            self.max_rounds,
            self.min_players,
            self.max_players,
        )
    }

    #[must_use]
    pub fn round_over_delay(&self) -> Duration {
        Duration::from_millis(self.round_over_delay_ms)
    }

    #[must_use]
    pub fn auto_restart_delay(&self) -> Duration {
        Duration::from_millis(self.auto_restart_delay_ms)
    }
}
