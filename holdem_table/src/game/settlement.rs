//! Pot settlement.
//!
//! Settling a round is split in two: [`compute_settlement`] derives the
//! payout plan from the final state without touching it, and
//! [`apply_settlement`] pays it out. Computing the plan twice gives the same
//! plan.

use log::info;
use serde::{Deserialize, Serialize};

use super::entities::{Bet, Chips, PlayerId, RoundResult, SubHand, TableState};
use super::functional::{argmax, best_hand};

/// Portion of the pot contested by the players who covered its level.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PotSlice {
    /// Contribution level capping this slice.
    pub level: Chips,
    pub amount: Chips,
    /// Player indices that can win this slice, in seat order.
    pub eligible: Vec<usize>,
}

/// Splits round contributions into slices.
///
/// Takes each player's `(round volume, still in the hand)`. Every distinct
/// volume among live players is a level. The slice for level `L` above the
/// previous level `P` holds everything contributed inside `(P, L]`, folded
/// players' dead money included, and is eligible to live players who put in
/// at least `L`. Dead money above the highest live level goes to the top
/// slice.
#[must_use]
pub fn partition_pots(contributions: &[(Chips, bool)]) -> Vec<PotSlice> {
    let mut levels: Vec<Chips> = contributions
        .iter()
        .filter(|(volume, live)| *live && *volume > 0)
        .map(|(volume, _)| *volume)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let total: Chips = contributions.iter().map(|(volume, _)| volume).sum();
    let live: Vec<usize> = contributions
        .iter()
        .enumerate()
        .filter(|(_, (_, live))| *live)
        .map(|(idx, _)| idx)
        .collect();
    if levels.is_empty() {
        if total == 0 || live.is_empty() {
            return Vec::new();
        }
        return vec![PotSlice {
            level: 0,
            amount: total,
            eligible: live,
        }];
    }

    let mut slices = Vec::with_capacity(levels.len());
    let mut prev = 0;
    for &level in &levels {
        let amount: Chips = contributions
            .iter()
            .map(|(volume, _)| volume.min(&level) - volume.min(&prev))
            .sum();
        let eligible = live
            .iter()
            .copied()
            .filter(|&idx| contributions[idx].0 >= level)
            .collect();
        slices.push(PotSlice {
            level,
            amount,
            eligible,
        });
        prev = level;
    }

    let excess: Chips = contributions
        .iter()
        .map(|(volume, _)| volume.saturating_sub(prev))
        .sum();
    if let Some(top) = slices.last_mut() {
        top.amount += excess;
    }
    slices
}

/// A slice together with who took it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SlicePayout {
    pub slice: PotSlice,
    /// Player indices splitting the slice, in seat order.
    pub winners: Vec<usize>,
}

/// Payout plan for a finished round.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Settlement {
    pub slices: Vec<SlicePayout>,
    /// Chips owed to each player index. Zero payouts are left out.
    pub payouts: Vec<(usize, Chips)>,
    /// Players receiving chips, distinct and in seat order.
    pub winner_ids: Vec<PlayerId>,
    /// Total chips paid out.
    pub pot: Chips,
}

/// Splits `amount` evenly among `winners`. The chips that don't divide go to
/// the first winner in seat order.
fn split(amount: Chips, winners: &[usize], payouts: &mut [Chips]) {
    let Some(&first) = winners.first() else {
        return;
    };
    let count = winners.len() as Chips;
    let share = amount / count;
    for &idx in winners {
        payouts[idx] += share;
    }
    payouts[first] += amount % count;
}

/// Derives the payout plan from the final state of a round.
///
/// A lone survivor takes the whole round volume. Otherwise each slice goes
/// to the best hands among its eligible players.
#[must_use]
pub fn compute_settlement(state: &TableState) -> Settlement {
    let contenders: Vec<usize> = state
        .players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.in_hand())
        .map(|(idx, _)| idx)
        .collect();
    let mut payouts: Vec<Chips> = vec![0; state.players.len()];
    let mut slices = Vec::new();

    match contenders.as_slice() {
        [] => {}
        [sole] => {
            let slice = PotSlice {
                level: state.players[*sole].bet.volume,
                amount: state.round.volume,
                eligible: vec![*sole],
            };
            payouts[*sole] = slice.amount;
            slices.push(SlicePayout {
                slice,
                winners: vec![*sole],
            });
        }
        _ => {
            let hands: Vec<Option<SubHand>> = state
                .players
                .iter()
                .map(|p| {
                    p.in_hand()
                        .then(|| best_hand(&p.hole_cards, &state.community_cards))
                })
                .collect();
            let contributions: Vec<(Chips, bool)> = state
                .players
                .iter()
                .map(|p| (p.bet.volume, p.in_hand()))
                .collect();
            for slice in partition_pots(&contributions) {
                let eligible_hands: Vec<SubHand> = slice
                    .eligible
                    .iter()
                    .filter_map(|&idx| hands[idx].clone())
                    .collect();
                let winners: Vec<usize> = argmax(&eligible_hands)
                    .into_iter()
                    .map(|i| slice.eligible[i])
                    .collect();
                split(slice.amount, &winners, &mut payouts);
                slices.push(SlicePayout { slice, winners });
            }
        }
    }

    let winner_ids = payouts
        .iter()
        .enumerate()
        .filter(|(_, amount)| **amount > 0)
        .map(|(idx, _)| state.players[idx].id.clone())
        .collect();
    let pot: Chips = payouts.iter().sum();
    let payouts = payouts
        .into_iter()
        .enumerate()
        .filter(|(_, amount)| *amount > 0)
        .collect();
    Settlement {
        slices,
        payouts,
        winner_ids,
        pot,
    }
}

/// Pays out the plan and clears every bet and the round's pot.
pub fn apply_settlement(state: &mut TableState, settlement: &Settlement) -> RoundResult {
    for &(idx, amount) in &settlement.payouts {
        if let Some(player) = state.players.get_mut(idx) {
            player.chips += amount;
        }
    }
    for player in &mut state.players {
        player.bet = Bet::default();
    }
    state.round.volume = 0;
    state.round.current_bet = 0;
    state.phase.volume = 0;

    let result = RoundResult {
        round_number: state.round.round_number,
        winner_ids: settlement.winner_ids.clone(),
        pot: settlement.pot,
    };
    let winners: Vec<&str> = result.winner_ids.iter().map(PlayerId::as_str).collect();
    info!(
        "table {} round {}: {} won {}",
        state.table_id,
        result.round_number,
        winners.join(", "),
        result.pot
    );
    result
}

/// Computes and applies the settlement in one go.
pub fn settle(state: &mut TableState) -> RoundResult {
    let settlement = compute_settlement(state);
    apply_settlement(state, &settlement)
}
