//! Decision-making for simulated players.
//!
//! Hand strength comes from the made hand's rank plus a small kicker bonus,
//! adjusted by pot odds when there is a bet to face. The reasoning behind
//! each move travels with it as the move's decision context.

use holdem_table::{
    Action, Card, Chips, Move, TableState,
    entities::Rank,
    functional::eval,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde_json::json;

/// Strength below this folds (or checks when free)
const FOLD_THRESHOLD: f32 = 0.15;

/// Strength above this raises
const RAISE_THRESHOLD: f32 = 0.40;

/// Chance a weak hand bluffs instead of folding
const BLUFF_FREQUENCY: f64 = 0.05;

/// Base chance to call with a medium hand
const BASE_CALL_PROBABILITY: f32 = 0.45;

/// Added to hand strength when pot odds are at least this good
const POT_ODDS_BONUS_THRESHOLD: f32 = 0.75;
const POT_ODDS_BONUS_VALUE: f32 = 0.15;

/// Chance a strong hand raises instead of slow-playing
const RAISE_PROBABILITY: f64 = 0.6;

/// Raise size as a fraction of the pot
const RAISE_POT_FRACTION: f32 = 0.75;

fn rank_strength(rank: Rank) -> f32 {
    match rank {
        Rank::HighCard => 0.1,
        Rank::OnePair => 0.25,
        Rank::TwoPair => 0.40,
        Rank::ThreeOfAKind => 0.55,
        Rank::Straight => 0.70,
        Rank::Flush => 0.75,
        Rank::FullHouse => 0.85,
        Rank::FourOfAKind => 0.95,
        Rank::StraightFlush => 0.99,
    }
}

/// Estimate hand strength in `0.0..=1.0`
pub fn estimate_hand_strength(hole_cards: &[Card], board: &[Card]) -> f32 {
    let mut cards = Vec::with_capacity(hole_cards.len() + board.len());
    cards.extend_from_slice(hole_cards);
    cards.extend_from_slice(board);
    if cards.len() < 2 {
        return 0.0;
    }

    let hand = eval(&cards);
    // Normalize the top tie-break value (2-14) to a 0.0-0.1 kicker bonus
    let kicker_bonus = hand
        .values
        .first()
        .map_or(0.0, |&value| f32::from(value) / 14.0 * 0.1);
    (rank_strength(hand.rank) + kicker_bonus).min(1.0)
}

/// Pot odds as pot / (pot + call). Free calls are 1.0.
pub fn pot_odds(pot: Chips, to_call: Chips) -> f32 {
    if to_call == 0 {
        return 1.0;
    }
    pot as f32 / (pot + to_call) as f32
}

/// Seeded decision maker shared by every simulated player
pub struct Policy {
    rng: StdRng,
}

impl Policy {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Choose a move for the player whose turn it is.
    ///
    /// Returns `None` when nobody is due to act.
    pub fn decide(&mut self, state: &TableState) -> Option<Move> {
        let idx = state.current_player_index?;
        let player = state.players.get(idx)?;
        let owed = state.owed_by(idx);
        let pot = state.round.volume;
        let strength = estimate_hand_strength(&player.hole_cards, &state.community_cards);
        let odds = pot_odds(pot, owed);
        let adjusted = if owed > 0 && odds >= POT_ODDS_BONUS_THRESHOLD {
            (strength + POT_ODDS_BONUS_VALUE).min(1.0)
        } else {
            strength
        };

        let action = self.choose(adjusted, owed, pot, player.chips);
        Some(Move::new(action).with_context(json!({
            "street": state.phase.street,
            "strength": strength,
            "pot_odds": odds,
            "owed": owed,
        })))
    }

    fn choose(&mut self, strength: f32, owed: Chips, pot: Chips, chips: Chips) -> Action {
        // Short-stacked: calling would put us all in anyway.
        if chips <= owed {
            return Action::AllIn;
        }

        if strength < FOLD_THRESHOLD {
            if owed == 0 {
                return Action::Check;
            }
            if self.rng.random_bool(BLUFF_FREQUENCY) {
                return self.raise(owed, pot, chips);
            }
            return Action::Fold;
        }

        if strength < RAISE_THRESHOLD {
            if owed == 0 {
                return Action::Check;
            }
            let call_probability = (BASE_CALL_PROBABILITY + strength).min(1.0);
            if self.rng.random_bool(f64::from(call_probability)) {
                return Action::Call;
            }
            return Action::Fold;
        }

        if self.rng.random_bool(RAISE_PROBABILITY) {
            self.raise(owed, pot, chips)
        } else if owed == 0 {
            Action::Check
        } else {
            Action::Call
        }
    }

    /// Call what's owed plus a pot-sized raise with some variance
    fn raise(&mut self, owed: Chips, pot: Chips, chips: Chips) -> Action {
        let variance: f32 = self.rng.random_range(0.8..=1.2);
        let extra = ((pot.max(1) as f32) * RAISE_POT_FRACTION * variance) as Chips;
        let amount = owed + extra.max(1);
        if amount >= chips {
            Action::AllIn
        } else {
            Action::Raise(amount)
        }
    }
}
