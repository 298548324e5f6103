//! Round and table lifecycle.
//!
//! [`process_event`] is the only way a table changes. It applies one
//! [`TableEvent`] to a clone of the current snapshot and hands back the new
//! snapshot, or an error with the original left as it was.
//!
//! ```text
//! WAITING --(min players joined)--> PLAYING
//! PLAYING: PRE_FLOP -> FLOP -> TURN -> RIVER -> SHOWDOWN
//! PLAYING --(one player left / showdown)--> ROUND_OVER
//! ROUND_OVER --(next_round)--> PLAYING | GAME_OVER
//! GAME_OVER --(restart)--> PLAYING
//! ```

use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::betting::{apply_move, betting_closed, collect_blinds};
use super::constants::HOLE_CARDS;
use super::entities::{
    Card, Chips, Deck, GameSettings, Move, PhaseState, Player, PlayerId, PlayerStatus,
    RoundState, Street, TableId, TableState, TableStatus,
};
use super::errors::{InvariantViolation, TableError};
use super::positions::{assign_positions, first_to_act, next_player};
use super::random::RandomSource;
use super::settlement::settle;

/// Everything that can happen to a table.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableEvent {
    /// Take the next open seat.
    Join { player_id: PlayerId, name: String },
    /// Act on the current street.
    Move {
        player_id: PlayerId,
        #[serde(rename = "move")]
        mv: Move,
    },
    /// Deal the next round after a round is over.
    NextRound,
    /// Start a fresh game after the game is over.
    Restart,
}

impl TableEvent {
    pub fn join(player_id: impl Into<PlayerId>, name: &str) -> Self {
        Self::Join {
            player_id: player_id.into(),
            name: name.to_string(),
        }
    }

    pub fn player_move(player_id: impl Into<PlayerId>, mv: impl Into<Move>) -> Self {
        Self::Move {
            player_id: player_id.into(),
            mv: mv.into(),
        }
    }
}

/// Applies `event` to `state`.
///
/// The event is applied to a copy. On success the copy is the new snapshot;
/// on error `state` is the only snapshot and is unchanged.
pub fn process_event(
    state: &TableState,
    event: TableEvent,
    rng: &mut dyn RandomSource,
) -> Result<TableState, TableError> {
    let mut next = state.clone();
    match event {
        TableEvent::Join { player_id, name } => join(&mut next, player_id, &name, rng)?,
        TableEvent::Move { player_id, mv } => {
            apply_move(&mut next, &player_id, mv)?;
            let idx = next.player_index(&player_id);
            progress(&mut next, idx)?;
        }
        TableEvent::NextRound => {
            if next.table_status != TableStatus::RoundOver {
                return Err(TableError::invalid_move(format!(
                    "can't start the next round while {}",
                    next.table_status
                )));
            }
            rotate_dealer(&mut next);
            start_round(&mut next, rng)?;
        }
        TableEvent::Restart => {
            if next.table_status != TableStatus::GameOver {
                return Err(TableError::invalid_move(format!(
                    "can't restart while {}",
                    next.table_status
                )));
            }
            restart(&mut next, rng)?;
        }
    }

    let checked = check_invariants(&next);
    if let Err(violation) = &checked {
        error!("table {}: {violation}", next.table_id);
    }
    debug_assert!(checked.is_ok(), "{checked:?}");
    Ok(next)
}

fn join(
    state: &mut TableState,
    player_id: PlayerId,
    name: &str,
    rng: &mut dyn RandomSource,
) -> Result<(), TableError> {
    if state.player_index(&player_id).is_some() {
        return Err(TableError::inconsistent(format!(
            "{player_id} already joined"
        )));
    }
    if state.table_status != TableStatus::Waiting {
        return Err(TableError::not_found(format!(
            "no open seat while {}",
            state.table_status
        )));
    }
    if state.players.len() >= state.config.max_players {
        return Err(TableError::not_found("no open seat, table is full"));
    }

    let seat = state.players.len();
    let player = Player::new(player_id, name, seat, state.config.starting_chips);
    info!(
        "table {}: {} ({}) took seat {seat}",
        state.table_id, player.display_name, player.id
    );
    state.players.push(player);

    if state.players.len() >= state.config.min_players {
        state.dealer_id = first_seat_with_chips(state);
        info!(
            "table {}: starting game {} with {} players",
            state.table_id,
            state.game_number,
            state.players.len()
        );
        start_round(state, rng)?;
    }
    Ok(())
}

fn first_seat_with_chips(state: &TableState) -> Option<PlayerId> {
    state
        .players
        .iter()
        .find(|p| p.has_chips())
        .map(|p| p.id.clone())
}

/// Moves the button to the next player still holding chips.
fn rotate_dealer(state: &mut TableState) {
    let len = state.players.len();
    let Some(dealer_idx) = state.dealer_index() else {
        state.dealer_id = first_seat_with_chips(state);
        return;
    };
    if let Some(idx) = (1..=len)
        .map(|offset| (dealer_idx + offset) % len)
        .find(|&idx| state.players[idx].has_chips())
    {
        state.dealer_id = Some(state.players[idx].id.clone());
    }
}

fn deal(deck: &mut Deck) -> Result<Card, TableError> {
    deck.deal_card()
        .ok_or_else(|| TableError::inconsistent("deck ran out of cards"))
}

/// Shuffles, seats the button, deals hole cards and posts blinds. The
/// dealer must already be in place.
fn start_round(state: &mut TableState, rng: &mut dyn RandomSource) -> Result<(), TableError> {
    let round_number = state.round.round_number + 1;
    for player in &mut state.players {
        if player.has_chips() {
            player.reset_for_round();
        } else {
            player.eliminate();
        }
    }
    state.round = RoundState::new(round_number);
    state.phase = PhaseState::default();
    state.community_cards.clear();
    state.last_move = None;
    state.last_round_result = None;
    state.current_player_index = None;
    state.deck = Deck::shuffled(rng);
    assign_positions(state);

    // Two passes around the table starting left of the button.
    let len = state.players.len();
    let dealer_idx = state.dealer_index().unwrap_or(0);
    let order: Vec<usize> = (1..=len)
        .map(|offset| (dealer_idx + offset) % len)
        .filter(|&idx| state.players[idx].position.is_some())
        .collect();
    for _ in 0..HOLE_CARDS {
        for &idx in &order {
            let card = deal(&mut state.deck)?;
            state.players[idx].hole_cards.push(card);
        }
    }

    collect_blinds(state);
    state.table_status = TableStatus::Playing;
    info!(
        "table {}: round {} dealt, {} on the button",
        state.table_id,
        round_number,
        state
            .dealer_id
            .as_ref()
            .map_or_else(|| "nobody".to_string(), ToString::to_string)
    );
    progress(state, None)
}

/// Moves play forward after a move, or after the deal when `last_actor` is
/// `None`. Ends the round when one player is left, otherwise finds the next
/// player to act, dealing streets for as long as nobody can bet.
fn progress(state: &mut TableState, mut last_actor: Option<usize>) -> Result<(), TableError> {
    loop {
        if state.in_hand_count() <= 1 {
            return finish_round(state);
        }
        if !betting_closed(state) {
            let next = match last_actor {
                Some(idx) => next_player(state, idx),
                None => first_to_act(state),
            };
            if next.is_some() {
                state.current_player_index = next;
                return Ok(());
            }
        }
        if state.phase.street == Street::Showdown {
            return finish_round(state);
        }
        advance_street(state)?;
        if state.phase.street == Street::Showdown {
            return finish_round(state);
        }
        last_actor = None;
    }
}

/// Deals the next street and resets per-street betting.
fn advance_street(state: &mut TableState) -> Result<(), TableError> {
    let Some(street) = state.phase.street.next() else {
        return Ok(());
    };
    for _ in 0..street.cards_to_deal() {
        let card = deal(&mut state.deck)?;
        state.community_cards.push(card);
    }
    state.phase = PhaseState {
        street,
        ..PhaseState::default()
    };
    state.round.current_bet = 0;
    state.current_player_index = None;
    for player in &mut state.players {
        player.bet.amount = 0;
        player.played_this_phase = false;
    }
    debug!(
        "table {}: {} [{}]",
        state.table_id,
        street,
        state
            .community_cards
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    );
    Ok(())
}

/// Settles the pot, knocks out broke players and decides whether the game
/// goes on.
fn finish_round(state: &mut TableState) -> Result<(), TableError> {
    state.current_player_index = None;
    let result = settle(state);
    let round_number = result.round_number;
    state.last_round_result = Some(result);
    state.table_status = TableStatus::RoundOver;

    for player in &mut state.players {
        if player.status != PlayerStatus::Eliminated && player.chips == 0 {
            info!("table {}: {} eliminated", state.table_id, player.id);
            player.eliminate();
        }
    }
    assign_positions(state);

    let survivors: Vec<&Player> = state.players.iter().filter(|p| p.has_chips()).collect();
    if let [winner] = survivors.as_slice() {
        state.winner = Some(winner.id.clone());
        state.table_status = TableStatus::GameOver;
    } else if state
        .config
        .max_rounds
        .is_some_and(|max_rounds| round_number >= max_rounds)
    {
        state.winner = chip_leader(state);
        state.table_status = TableStatus::GameOver;
    }

    if state.table_status == TableStatus::GameOver {
        info!(
            "table {}: game {} over after round {round_number}, winner {}",
            state.table_id,
            state.game_number,
            state
                .winner
                .as_ref()
                .map_or_else(|| "none (tied)".to_string(), ToString::to_string)
        );
    }
    Ok(())
}

/// The player with the most chips, unless the lead is shared.
fn chip_leader(state: &TableState) -> Option<PlayerId> {
    let top = state.players.iter().map(|p| p.chips).max()?;
    let mut leaders = state.players.iter().filter(|p| p.chips == top);
    match (leaders.next(), leaders.next()) {
        (Some(leader), None) => Some(leader.id.clone()),
        _ => None,
    }
}

/// Fresh chips for everyone seated and round 1 of the next game.
fn restart(state: &mut TableState, rng: &mut dyn RandomSource) -> Result<(), TableError> {
    let starting_chips = state.config.starting_chips;
    for player in &mut state.players {
        player.chips = starting_chips;
        player.reset_for_round();
        player.position = None;
    }
    state.winner = None;
    state.last_round_result = None;
    state.game_number += 1;
    state.round = RoundState::default();
    state.dealer_id = state.players.first().map(|p| p.id.clone());
    info!(
        "table {}: restarting as game {}",
        state.table_id, state.game_number
    );
    start_round(state, rng)
}

/// Structural checks every snapshot must pass.
pub fn check_invariants(state: &TableState) -> Result<(), InvariantViolation> {
    let expected = state.config.starting_chips * state.players.len() as Chips;
    let found = state.total_chips();
    if found != expected {
        return Err(InvariantViolation::ChipsNotConserved { expected, found });
    }

    let committed: Chips = state.players.iter().map(|p| p.bet.volume).sum();
    if committed != state.round.volume {
        return Err(InvariantViolation::PotMismatch {
            pot: state.round.volume,
            committed,
        });
    }

    let mut seen = HashSet::with_capacity(state.players.len());
    for position in state.players.iter().filter_map(|p| p.position) {
        if !seen.insert(position) {
            return Err(InvariantViolation::DuplicatePosition { position });
        }
    }

    if let Some(idx) = state.current_player_index
        && !state.players.get(idx).is_some_and(Player::can_act)
    {
        return Err(InvariantViolation::BadCurrentPlayer(idx));
    }
    Ok(())
}

/// A table that owns its snapshot and shuffle source.
pub struct Table {
    state: TableState,
    rng: Box<dyn RandomSource>,
}

impl Table {
    #[must_use]
    pub fn new(table_id: TableId, settings: GameSettings, rng: Box<dyn RandomSource>) -> Self {
        Self {
            state: TableState::new(table_id, settings),
            rng,
        }
    }

    /// Applies the event and returns the new snapshot. On error the
    /// current snapshot stays.
    pub fn process_event(&mut self, event: TableEvent) -> Result<&TableState, TableError> {
        self.state = process_event(&self.state, event, self.rng.as_mut())?;
        Ok(&self.state)
    }

    #[must_use]
    pub fn current_state(&self) -> &TableState {
        &self.state
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table").field("state", &self.state).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{Action, Position};
    use crate::game::errors::ErrorKind;
    use crate::game::random::RngSource;

    fn settings(min_players: usize) -> GameSettings {
        GameSettings {
            min_players,
            ..GameSettings::default()
        }
    }

    fn table_with(names: &[&str], min_players: usize) -> Table {
        let mut table = Table::new(
            TableId::new(),
            settings(min_players),
            Box::new(RngSource::from_seed(11)),
        );
        for name in names {
            table.process_event(TableEvent::join(*name, name)).unwrap();
        }
        table
    }

    fn current(table: &Table) -> PlayerId {
        table.current_state().current_player().unwrap().id.clone()
    }

    fn act(table: &mut Table, action: Action) -> Result<&TableState, TableError> {
        let id = current(table);
        table.process_event(TableEvent::player_move(id, action))
    }

    #[test]
    fn test_second_join_starts_heads_up() {
        let table = table_with(&["alice", "bob"], 2);
        let state = table.current_state();
        assert_eq!(state.table_status, TableStatus::Playing);
        assert_eq!(state.round.round_number, 1);
        assert_eq!(state.dealer_id, Some(PlayerId::new("alice")));
        assert_eq!(state.players[0].position, Some(Position::Sb));
        assert_eq!(state.players[1].position, Some(Position::Bb));
        assert!(state.players.iter().all(|p| p.hole_cards.len() == 2));
        assert_eq!(state.deck.remaining(), 48);
        assert_eq!(state.round.volume, 30);
        // Heads-up the dealer acts first pre-flop.
        assert_eq!(current(&table), PlayerId::new("alice"));
    }

    #[test]
    fn test_join_rejections() {
        let mut table = table_with(&["alice"], 2);
        let err = table
            .process_event(TableEvent::join("alice", "Alice"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentState);

        table.process_event(TableEvent::join("bob", "Bob")).unwrap();
        let err = table
            .process_event(TableEvent::join("carol", "Carol"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_full_table_rejects_join() {
        let mut table = table_with(&["a", "b", "c", "d", "e", "f"], 7);
        assert_eq!(table.current_state().table_status, TableStatus::Waiting);
        let err = table.process_event(TableEvent::join("g", "g")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_events_out_of_place() {
        let mut table = table_with(&["alice", "bob"], 2);
        let err = table.process_event(TableEvent::NextRound).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidMove);
        let err = table.process_event(TableEvent::Restart).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidMove);

        let waiting = table_with(&["alice"], 2);
        let state = waiting.current_state();
        let mut rng = RngSource::from_seed(1);
        let err = process_event(
            state,
            TableEvent::player_move("alice", Action::Check),
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(err, TableError::invalid_move("no hand in progress"));
    }

    #[test]
    fn test_rejected_event_leaves_state() {
        let mut table = table_with(&["alice", "bob"], 2);
        let before = table.current_state().clone();
        let err = table
            .process_event(TableEvent::player_move("bob", Action::Check))
            .unwrap_err();
        assert_eq!(err, TableError::invalid_move("not your turn"));
        assert_eq!(table.current_state(), &before);
    }

    #[test]
    fn test_fold_ends_round_and_next_round_rotates() {
        let mut table = table_with(&["alice", "bob"], 2);
        let state = act(&mut table, Action::Fold).unwrap();
        assert_eq!(state.table_status, TableStatus::RoundOver);
        assert_eq!(state.players[0].chips, 990);
        assert_eq!(state.players[1].chips, 1010);
        let result = state.last_round_result.as_ref().unwrap();
        assert_eq!(result.winner_ids, vec![PlayerId::new("bob")]);
        assert_eq!(result.pot, 30);

        let state = table.process_event(TableEvent::NextRound).unwrap();
        assert_eq!(state.round.round_number, 2);
        assert_eq!(state.last_round_result, None);
        assert_eq!(state.dealer_id, Some(PlayerId::new("bob")));
        assert_eq!(state.players[1].position, Some(Position::Sb));
        assert_eq!(state.round.volume, 30);
    }

    #[test]
    fn test_three_handed_streets() {
        let mut table = table_with(&["a", "b", "c"], 3);
        // BTN a, SB b, BB c: a opens pre-flop.
        assert_eq!(current(&table), PlayerId::new("a"));
        act(&mut table, Action::Call).unwrap();
        act(&mut table, Action::Call).unwrap();
        let state = act(&mut table, Action::Check).unwrap();
        assert_eq!(state.phase.street, Street::Flop);
        assert_eq!(state.community_cards.len(), 3);
        assert_eq!(state.phase.action_count, 0);
        // Post-flop starts at the small blind.
        assert_eq!(current(&table), PlayerId::new("b"));
    }

    #[test]
    fn test_everyone_all_in_runs_out_the_board() {
        let mut table = table_with(&["a", "b"], 2);
        act(&mut table, Action::AllIn).unwrap();
        let state = act(&mut table, Action::Call).unwrap();
        assert_eq!(state.community_cards.len(), 5);
        assert_eq!(state.phase.street, Street::Showdown);
        assert!(matches!(
            state.table_status,
            TableStatus::RoundOver | TableStatus::GameOver
        ));
        assert_eq!(state.total_chips(), 2000);
    }

    #[test]
    fn test_bust_ends_game_and_restart_resets() {
        let mut table = table_with(&["a", "b"], 2);
        // Shove every hand until somebody busts. Split pots just deal again.
        for _ in 0..200 {
            match table.current_state().table_status {
                TableStatus::GameOver => break,
                TableStatus::RoundOver => {
                    table.process_event(TableEvent::NextRound).unwrap();
                }
                _ => {
                    act(&mut table, Action::AllIn).unwrap();
                }
            }
        }
        let state = table.current_state();
        let winner = state.winner.clone().unwrap();
        assert_eq!(state.player(&winner).unwrap().chips, 2000);
        assert!(
            state
                .players
                .iter()
                .any(|p| p.status == PlayerStatus::Eliminated)
        );

        let state = table.process_event(TableEvent::Restart).unwrap();
        assert_eq!(state.game_number, 2);
        assert_eq!(state.round.round_number, 1);
        assert_eq!(state.winner, None);
        assert_eq!(state.dealer_id, Some(PlayerId::new("a")));
        assert_eq!(state.table_status, TableStatus::Playing);
        assert!(state.players.iter().all(|p| p.status != PlayerStatus::Eliminated));
    }

    #[test]
    fn test_max_rounds_ends_game_with_chip_leader() {
        let mut table = Table::new(
            TableId::new(),
            GameSettings {
                max_rounds: Some(1),
                ..GameSettings::default()
            },
            Box::new(RngSource::from_seed(3)),
        );
        table.process_event(TableEvent::join("a", "a")).unwrap();
        table.process_event(TableEvent::join("b", "b")).unwrap();
        let state = act(&mut table, Action::Fold).unwrap();
        assert_eq!(state.table_status, TableStatus::GameOver);
        assert_eq!(state.winner, Some(PlayerId::new("b")));
    }

    #[test]
    fn test_chip_leader_tie_has_no_winner() {
        let mut state = TableState::new(TableId::new(), GameSettings::default());
        state.players.push(Player::new("a".into(), "a", 0, 500));
        state.players.push(Player::new("b".into(), "b", 1, 500));
        assert_eq!(chip_leader(&state), None);
        state.players[1].chips = 501;
        assert_eq!(chip_leader(&state), Some(PlayerId::new("b")));
    }

    #[test]
    fn test_invariants_catch_leaked_chips() {
        let table = table_with(&["a", "b"], 2);
        let mut state = table.current_state().clone();
        assert!(check_invariants(&state).is_ok());
        state.players[0].chips += 1;
        assert!(matches!(
            check_invariants(&state),
            Err(InvariantViolation::ChipsNotConserved { .. })
        ));
    }
}
