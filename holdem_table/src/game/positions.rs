//! Seat roles and turn order.

use super::entities::{Position, Street, TableState};

/// Roles in the order they are handed out, starting at the dealer.
const RING_POSITIONS: [Position; 6] = [
    Position::Btn,
    Position::Sb,
    Position::Bb,
    Position::Ep,
    Position::Mp,
    Position::Co,
];
const HEADS_UP_POSITIONS: [Position; 2] = [Position::Sb, Position::Bb];

/// Seat indices walking clockwise from `start` (inclusive) around the table.
fn clockwise_from(start: usize, len: usize) -> impl Iterator<Item = usize> {
    (0..len).map(move |offset| (start + offset) % len)
}

/// Hands out positions to every player holding chips, walking clockwise
/// from the dealer. Everybody else loses their position. Heads-up the
/// dealer posts the small blind.
pub fn assign_positions(state: &mut TableState) {
    for player in &mut state.players {
        player.position = None;
    }
    let Some(dealer_idx) = state.dealer_index() else {
        return;
    };
    let active: Vec<usize> = clockwise_from(dealer_idx, state.players.len())
        .filter(|&idx| state.players[idx].has_chips())
        .collect();
    let labels: &[Position] = if active.len() == 2 {
        &HEADS_UP_POSITIONS
    } else {
        &RING_POSITIONS
    };
    for (&idx, &position) in active.iter().zip(labels) {
        state.players[idx].position = Some(position);
    }
}

fn heads_up(state: &TableState) -> bool {
    state.players.iter().filter(|p| p.position.is_some()).count() == 2
}

/// First player at or after `start` who can act.
fn first_eligible_from(state: &TableState, start: usize) -> Option<usize> {
    clockwise_from(start, state.players.len()).find(|&idx| state.players[idx].can_act())
}

/// Who opens the betting on the current street.
///
/// Pre-flop the action starts left of the big blind, which heads-up is the
/// dealer on the small blind. After the flop it starts at the small blind,
/// or heads-up at the big blind.
#[must_use]
pub fn first_to_act(state: &TableState) -> Option<usize> {
    if state.players.is_empty() {
        return None;
    }
    let len = state.players.len();
    let start = match (state.phase.street, heads_up(state)) {
        (Street::PreFlop, true) => state.position_index(Position::Sb),
        (Street::PreFlop, false) => state.position_index(Position::Bb).map(|bb| (bb + 1) % len),
        (_, true) => state.position_index(Position::Bb),
        (_, false) => state.position_index(Position::Sb),
    };
    let start = start.or_else(|| state.dealer_index().map(|d| (d + 1) % len))?;
    first_eligible_from(state, start)
}

/// Next player after `from` in seat order who can act. Folded, all-in,
/// eliminated and broke players are skipped.
#[must_use]
pub fn next_player(state: &TableState, from: usize) -> Option<usize> {
    let len = state.players.len();
    (1..=len)
        .map(|offset| (from + offset) % len)
        .find(|&idx| state.players[idx].can_act())
}
