//! Runner configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use holdem_table::table::{ConfigError, TableConfig};

/// Complete runner configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Table the simulated players sit at
    pub table: TableConfig,
    /// Number of simulated players
    pub players: usize,
    /// Seed for shuffles and decisions. Fresh entropy when unset.
    pub seed: Option<u64>,
}

impl RunnerConfig {
    /// Load configuration from environment variables
    ///
    /// Command-line overrides win over `TABLE_*` / `RUNNER_*` variables,
    /// which win over [`TableConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but can't be parsed, or if the
    /// resulting configuration is invalid.
    pub fn from_env(
        players_override: Option<usize>,
        seed_override: Option<u64>,
        rounds_override: Option<u32>,
    ) -> Result<Self, ConfigError> {
        let defaults = TableConfig::default();

        let players = match players_override {
            Some(players) => players,
            None => parse_env_or("RUNNER_PLAYERS", 4)?,
        };
        let seed = match seed_override {
            Some(seed) => Some(seed),
            None => parse_env_opt("RUNNER_SEED")?,
        };
        let max_rounds = match rounds_override {
            Some(rounds) => Some(rounds),
            None => parse_env_opt("TABLE_MAX_ROUNDS")?.or(Some(DEFAULT_MAX_ROUNDS)),
        };

        let table = TableConfig {
            name: std::env::var("TABLE_NAME").unwrap_or(defaults.name),
            // Deal as soon as every simulated player is seated.
            min_players: players,
            max_players: parse_env_or("TABLE_MAX_PLAYERS", defaults.max_players)?,
            starting_chips: parse_env_or("TABLE_STARTING_CHIPS", defaults.starting_chips)?,
            small_blind: parse_env_or("TABLE_SMALL_BLIND", defaults.small_blind)?,
            big_blind: parse_env_or("TABLE_BIG_BLIND", defaults.big_blind)?,
            max_rounds,
            round_over_delay_ms: parse_env_or(
                "TABLE_ROUND_OVER_DELAY_MS",
                DEFAULT_ROUND_OVER_DELAY_MS,
            )?,
            auto_restart_enabled: false,
            auto_restart_delay_ms: defaults.auto_restart_delay_ms,
        };

        let config = Self {
            table,
            players,
            seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players > self.table.max_players {
            return Err(ConfigError::Invalid {
                field: "players".to_string(),
                reason: format!("cannot exceed max players ({})", self.table.max_players),
            });
        }
        self.table.validate()
    }
}

/// Hard stop so a run always ends even when nobody busts
const DEFAULT_MAX_ROUNDS: u32 = 500;

const DEFAULT_ROUND_OVER_DELAY_MS: u64 = 100;

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    Ok(parse_env_opt(key)?.unwrap_or(default))
}

fn parse_env_opt<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Malformed {
                var: key.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}
