//! Injectable randomness for deck shuffles.
//!
//! The state machine never touches a global RNG. Every shuffle goes through
//! a [`RandomSource`], so a seeded source replays a whole game exactly and a
//! [`StackedDeck`] lets tests script the cards.

use log::warn;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::collections::{HashSet, VecDeque};

use super::entities::Card;

pub trait RandomSource: Send {
    /// Reorders the cards in place.
    fn shuffle(&mut self, cards: &mut [Card]);
}

/// Shuffles with any `rand` generator.
#[derive(Debug)]
pub struct RngSource<R>(R);

impl<R: rand::Rng + Send> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngSource<StdRng> {
    /// Deterministic source. Equal seeds produce equal shuffles.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn from_os() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl<R: rand::Rng + Send> RandomSource for RngSource<R> {
    fn shuffle(&mut self, cards: &mut [Card]) {
        cards.shuffle(&mut self.0);
    }
}

/// Shuffles with the thread-local generator.
#[derive(Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn shuffle(&mut self, cards: &mut [Card]) {
        cards.shuffle(&mut rand::rng());
    }
}

/// Scripted deck order. Each shuffle moves the next stacked sequence to the
/// top of the deck, the rest keeps its canonical order. Once the stacks are
/// used up the deck is left unshuffled.
#[derive(Debug, Default)]
pub struct StackedDeck {
    stacks: VecDeque<Vec<Card>>,
}

impl StackedDeck {
    pub fn new(stacks: impl IntoIterator<Item = Vec<Card>>) -> Self {
        Self {
            stacks: stacks.into_iter().collect(),
        }
    }

    pub fn push(&mut self, top: Vec<Card>) {
        self.stacks.push_back(top);
    }
}

impl RandomSource for StackedDeck {
    fn shuffle(&mut self, cards: &mut [Card]) {
        let Some(top) = self.stacks.pop_front() else {
            return;
        };
        let unique: HashSet<&Card> = top.iter().collect();
        if unique.len() != top.len() || top.iter().any(|card| !cards.contains(card)) {
            warn!("stacked cards don't fit the deck, leaving it unshuffled");
            return;
        }
        let rest: Vec<Card> = cards
            .iter()
            .copied()
            .filter(|card| !top.contains(card))
            .collect();
        for (slot, card) in cards.iter_mut().zip(top.into_iter().chain(rest)) {
            *slot = card;
        }
    }
}
