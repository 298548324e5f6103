//! Simulated Texas Hold'em table.
//!
//! Seats a handful of simulated players at a single table actor and drives
//! them with a simple policy until the game is decided.

mod config;
mod logging;
mod policy;

use std::collections::HashSet;

use anyhow::Error;
use ctrlc::set_handler;
use holdem_table::{
    PlayerId, TableActor, TableEvent, TableHandle, TableState, TableStatus, random::RngSource,
};
use log::{debug, info};
use pico_args::Arguments;

use config::RunnerConfig;
use policy::Policy;

const HELP: &str = "\
Run a simulated Texas Hold'em table until the game is decided

USAGE:
  ht_runner [OPTIONS]

OPTIONS:
  --players    N           Simulated players, 2-6      [default: env RUNNER_PLAYERS or 4]
  --seed       N           Seed shuffles and decisions [default: env RUNNER_SEED or random]
  --rounds     N           Stop after this many rounds [default: env TABLE_MAX_ROUNDS or 500]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  TABLE_NAME, TABLE_MAX_PLAYERS, TABLE_STARTING_CHIPS, TABLE_SMALL_BLIND,
  TABLE_BIG_BLIND, TABLE_ROUND_OVER_DELAY_MS, RUST_LOG
  (A .env file in the working directory is loaded when present)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let players = pargs.opt_value_from_str("--players")?;
    let seed = pargs.opt_value_from_str("--seed")?;
    let rounds = pargs.opt_value_from_str("--rounds")?;
    let config = RunnerConfig::from_env(players, seed, rounds)?;

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    logging::init();
    info!(
        "Starting '{}' with {} players, blinds {}/{}",
        config.table.name, config.players, config.table.small_blind, config.table.big_blind
    );

    let (shuffler, mut policy) = match config.seed {
        Some(seed) => {
            info!("Using seed {seed}");
            (
                RngSource::from_seed(seed),
                Policy::from_seed(seed.wrapping_add(1)),
            )
        }
        None => (RngSource::from_os(), Policy::from_os()),
    };

    let handle = TableActor::spawn(config.table.clone(), Box::new(shuffler))?;
    for seat in 1..=config.players {
        let id = PlayerId::new(&format!("bot{seat}"));
        handle
            .process_event(TableEvent::join(id, &format!("Bot {seat}")))
            .await?;
    }

    play(&handle, &mut policy).await?;
    handle.close().await?;
    Ok(())
}

/// Log the settled round once, however many snapshots still carry it
fn report_round(state: &TableState, reported: &mut HashSet<u32>) {
    if let Some(result) = &state.last_round_result
        && reported.insert(result.round_number)
    {
        let winners: Vec<&str> = result.winner_ids.iter().map(PlayerId::as_str).collect();
        info!(
            "Round {} won by {} (pot {})",
            result.round_number,
            winners.join(", "),
            result.pot
        );
    }
}

/// Answer every turn until the game ends, logging each finished round
async fn play(handle: &TableHandle, policy: &mut Policy) -> Result<(), Error> {
    let mut snapshots = handle.subscribe();
    let mut reported = HashSet::new();

    loop {
        let state = snapshots.borrow_and_update().clone();
        report_round(&state, &mut reported);

        match state.table_status {
            TableStatus::GameOver => {
                match &state.winner {
                    Some(winner) => info!("Game over, {winner} wins"),
                    None => info!("Game over, no single chip leader"),
                }
                for player in &state.players {
                    info!("  {:<12} {:>6} {}", player.id.as_str(), player.chips, player.status);
                }
                return Ok(());
            }
            TableStatus::Playing => {
                if let Some(mv) = policy.decide(&state)
                    && let Some(player) = state.current_player()
                {
                    let event = TableEvent::player_move(player.id.clone(), mv);
                    match handle.process_event(event).await {
                        Ok(next) => {
                            // The result is cleared once the next round is
                            // dealt, so catch it from the reply.
                            report_round(&next, &mut reported);
                            continue;
                        }
                        // A scheduled tick may have moved the table on first.
                        Err(e) => debug!("Move from {} not applied: {e}", player.id),
                    }
                }
            }
            TableStatus::Waiting | TableStatus::RoundOver => {}
        }

        snapshots.changed().await?;
    }
}
