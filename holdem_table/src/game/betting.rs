//! Move validation, chip commitment and the street closing rule.

use log::debug;

use super::entities::{
    Action, Chips, LastMove, Move, PlayerId, PlayerStatus, Position, TableState, TableStatus,
};
use super::errors::TableError;

/// Moves `amount` (clamped to the stack) from the player's stack into the
/// pot and returns what was actually committed.
fn commit(state: &mut TableState, idx: usize, amount: Chips) -> Chips {
    let player = &mut state.players[idx];
    let committed = player.commit(amount);
    if player.status == PlayerStatus::AllIn
        && !state.round.all_in_player_ids.contains(&player.id)
    {
        state.round.all_in_player_ids.push(player.id.clone());
    }
    state.round.volume += committed;
    state.phase.volume += committed;
    committed
}

/// Checks that `player_id` may move now, then applies the move.
///
/// Rejections leave the state untouched. Acceptance increments the street's
/// action count, marks the player as having played and records the move as
/// the table's last move.
pub fn apply_move(
    state: &mut TableState,
    player_id: &PlayerId,
    mv: Move,
) -> Result<(), TableError> {
    let idx = state
        .player_index(player_id)
        .ok_or_else(|| TableError::not_found(format!("player {player_id} is not seated")))?;
    if state.table_status != TableStatus::Playing {
        return Err(TableError::invalid_move("no hand in progress"));
    }
    let player = &state.players[idx];
    if !player.can_act() {
        return Err(TableError::inconsistent(format!(
            "{player_id} can't act while {}",
            player.status.to_string().trim_end()
        )));
    }
    if state.current_player_index != Some(idx) {
        return Err(TableError::invalid_move("not your turn"));
    }

    let owed = state.owed_by(idx);
    match mv.action {
        Action::Fold => {
            state.players[idx].status = PlayerStatus::Folded;
            state.round.folded_player_ids.push(player_id.clone());
        }
        Action::Check => {
            if owed > 0 {
                return Err(TableError::inconsistent(format!(
                    "cannot check while owing chips ({owed} to call)"
                )));
            }
        }
        Action::Call => {
            if owed > 0 {
                commit(state, idx, owed);
            }
        }
        Action::Raise(amount) => {
            let player = &state.players[idx];
            let total = player.bet.amount + amount.min(player.chips);
            if total <= state.round.current_bet {
                return Err(TableError::inconsistent(format!(
                    "raise to {total} doesn't exceed the current bet of {}",
                    state.round.current_bet
                )));
            }
            commit(state, idx, amount);
            state.round.current_bet = total;
        }
        Action::AllIn => {
            let chips = state.players[idx].chips;
            commit(state, idx, chips);
            let total = state.players[idx].bet.amount;
            if total > state.round.current_bet {
                state.round.current_bet = total;
            }
        }
    }

    debug!(
        "{player_id} {} on the {} (bet {}, pot {})",
        mv.action, state.phase.street, state.round.current_bet, state.round.volume
    );
    state.phase.action_count += 1;
    state.players[idx].played_this_phase = true;
    state.last_move = Some(LastMove {
        player_id: player_id.clone(),
        mv,
    });
    Ok(())
}

/// Small blind then big blind each post what they can. A short stack goes
/// all-in with a partial blind. Blinds don't count as having played.
pub fn collect_blinds(state: &mut TableState) {
    let blinds = [
        (Position::Sb, state.config.small_blind),
        (Position::Bb, state.config.big_blind),
    ];
    for (position, blind) in blinds {
        if let Some(idx) = state.position_index(position) {
            commit(state, idx, blind);
        }
    }
    state.round.current_bet = state
        .players
        .iter()
        .map(|p| p.bet.amount)
        .max()
        .unwrap_or(0);
}

/// Whether the current street's betting is finished.
///
/// Every player still able to bet must have matched the current bet and
/// either moved this street or be the only such player left. No such
/// players at all also closes the street.
#[must_use]
pub fn betting_closed(state: &TableState) -> bool {
    let mut actors = state
        .players
        .iter()
        .filter(|p| p.status == PlayerStatus::Playing)
        .peekable();
    if actors.peek().is_none() {
        return true;
    }
    let actors: Vec<_> = actors.collect();
    let all_matched = actors
        .iter()
        .all(|p| p.bet.amount == state.round.current_bet);
    let all_played = actors.iter().all(|p| p.played_this_phase);
    all_matched && (all_played || actors.len() == 1)
}
