//! Hand evaluation.
//!
//! Pure functions over card slices. [`eval`] picks the best five-card hand
//! from up to seven cards and returns it as a [`SubHand`] whose derived
//! ordering is the showdown ordering.

use std::cmp::Ordering;

use super::entities::{Card, Rank, SubHand, Value};

const ACE_HIGH: Value = 14;
const FIVE_CARD_HAND: usize = 5;

fn high_value(card: &Card) -> Value {
    if card.0 == 1 { ACE_HIGH } else { card.0 }
}

/// Ranks at most five cards. Straights and flushes need all five.
fn rank_cards(cards: &[Card]) -> SubHand {
    let mut values: Vec<Value> = cards.iter().map(high_value).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));

    // (count, value) pairs, biggest group first and higher value first
    // within equal group sizes.
    let mut groups: Vec<(usize, Value)> = Vec::with_capacity(values.len());
    for value in &values {
        match groups.iter_mut().find(|(_, v)| v == value) {
            Some((count, _)) => *count += 1,
            None => groups.push((1, *value)),
        }
    }
    groups.sort_unstable_by(|a, b| b.cmp(a));
    let key: Vec<Value> = groups.iter().map(|(_, v)| *v).collect();

    let complete = cards.len() == FIVE_CARD_HAND;
    let is_flush = complete && cards.iter().all(|c| c.1 == cards[0].1);
    let straight_high = if complete && groups.len() == FIVE_CARD_HAND {
        if values[0] - values[4] == 4 {
            Some(values[0])
        } else if values == [ACE_HIGH, 5, 4, 3, 2] {
            Some(5)
        } else {
            None
        }
    } else {
        None
    };

    let largest = groups.first().map_or(0, |(count, _)| *count);
    let second = groups.get(1).map_or(0, |(count, _)| *count);
    let (rank, values) = match (straight_high, is_flush, largest, second) {
        (Some(high), true, _, _) => (Rank::StraightFlush, vec![high]),
        (_, _, 4, _) => (Rank::FourOfAKind, key),
        (_, _, 3, 2) => (Rank::FullHouse, key),
        (_, true, _, _) => (Rank::Flush, key),
        (Some(high), _, _, _) => (Rank::Straight, vec![high]),
        (_, _, 3, _) => (Rank::ThreeOfAKind, key),
        (_, _, 2, 2) => (Rank::TwoPair, key),
        (_, _, 2, _) => (Rank::OnePair, key),
        _ => (Rank::HighCard, key),
    };
    SubHand { rank, values }
}

/// Best hand that can be made from the cards. Up to five cards are ranked
/// as they are; with more, every five-card combination is tried.
#[must_use]
pub fn eval(cards: &[Card]) -> SubHand {
    if cards.len() <= FIVE_CARD_HAND {
        return rank_cards(cards);
    }

    let n = cards.len();
    let mut best: Option<SubHand> = None;
    let mut combo = Vec::with_capacity(FIVE_CARD_HAND);
    for mask in 0u32..(1 << n) {
        if mask.count_ones() as usize != FIVE_CARD_HAND {
            continue;
        }
        combo.clear();
        combo.extend(
            cards
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, c)| *c),
        );
        let hand = rank_cards(&combo);
        if best.as_ref().is_none_or(|b| hand > *b) {
            best = Some(hand);
        }
    }
    best.unwrap_or_else(|| rank_cards(&[]))
}

/// Best hand for a player's hole cards together with the board.
#[must_use]
pub fn best_hand(hole_cards: &[Card], board: &[Card]) -> SubHand {
    let cards: Vec<Card> = hole_cards.iter().chain(board).copied().collect();
    eval(&cards)
}

/// Orders by category, then the tie-break values. Equal keys tie.
#[must_use]
pub fn compare_hands(a: &SubHand, b: &SubHand) -> Ordering {
    a.cmp(b)
}

/// Indices of every hand that ties for best, in input order.
#[must_use]
pub fn argmax(hands: &[SubHand]) -> Vec<usize> {
    let Some(best) = hands.iter().max() else {
        return Vec::new();
    };
    hands
        .iter()
        .enumerate()
        .filter(|(_, hand)| *hand == best)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Suit::{Club, Diamond, Heart, Spade};

    fn hand(cards: &[(Value, crate::game::entities::Suit)]) -> Vec<Card> {
        cards.iter().map(|&(v, s)| Card(v, s)).collect()
    }

    #[test]
    fn test_high_card() {
        let h = eval(&hand(&[(2, Club), (5, Heart), (9, Spade), (11, Diamond), (13, Club)]));
        assert_eq!(h.rank, Rank::HighCard);
        assert_eq!(h.values, vec![13, 11, 9, 5, 2]);
    }

    #[test]
    fn test_one_pair_keeps_kickers() {
        let h = eval(&hand(&[(8, Club), (8, Heart), (1, Spade), (4, Diamond), (6, Club)]));
        assert_eq!(h.rank, Rank::OnePair);
        assert_eq!(h.values, vec![8, 14, 6, 4]);
    }

    #[test]
    fn test_two_pair_from_seven_cards() {
        let h = eval(&hand(&[
            (3, Club),
            (3, Heart),
            (9, Spade),
            (9, Diamond),
            (5, Club),
            (5, Spade),
            (12, Heart),
        ]));
        assert_eq!(h.rank, Rank::TwoPair);
        assert_eq!(h.values, vec![9, 5, 12]);
    }

    #[test]
    fn test_full_house_beats_trips() {
        let full_house = eval(&hand(&[
            (7, Club),
            (7, Heart),
            (7, Spade),
            (2, Diamond),
            (2, Club),
            (11, Heart),
            (4, Spade),
        ]));
        assert_eq!(full_house.rank, Rank::FullHouse);
        assert_eq!(full_house.values, vec![7, 2]);

        let trips = eval(&hand(&[(13, Club), (13, Heart), (13, Spade), (2, Diamond), (9, Club)]));
        assert_eq!(trips.rank, Rank::ThreeOfAKind);
        assert_eq!(compare_hands(&full_house, &trips), Ordering::Greater);
    }

    #[test]
    fn test_two_trips_make_full_house() {
        let h = eval(&hand(&[
            (6, Club),
            (6, Heart),
            (6, Spade),
            (10, Diamond),
            (10, Club),
            (10, Heart),
            (2, Spade),
        ]));
        assert_eq!(h.rank, Rank::FullHouse);
        assert_eq!(h.values, vec![10, 6]);
    }

    #[test]
    fn test_ace_high_straight() {
        let h = eval(&hand(&[(10, Club), (11, Heart), (12, Spade), (13, Diamond), (1, Club)]));
        assert_eq!(h.rank, Rank::Straight);
        assert_eq!(h.values, vec![14]);
    }

    #[test]
    fn test_wheel_is_lowest_straight() {
        let wheel = eval(&hand(&[(1, Club), (2, Heart), (3, Spade), (4, Diamond), (5, Club)]));
        let six_high = eval(&hand(&[(2, Heart), (3, Spade), (4, Diamond), (5, Club), (6, Club)]));
        assert_eq!(wheel.rank, Rank::Straight);
        assert_eq!(wheel.values, vec![5]);
        assert!(wheel < six_high);
    }

    #[test]
    fn test_no_wraparound_straight() {
        let h = eval(&hand(&[(12, Club), (13, Heart), (1, Spade), (2, Diamond), (3, Club)]));
        assert_eq!(h.rank, Rank::HighCard);
    }

    #[test]
    fn test_flush_picks_best_five() {
        let h = eval(&hand(&[
            (2, Heart),
            (4, Heart),
            (7, Heart),
            (9, Heart),
            (12, Heart),
            (1, Heart),
            (3, Club),
        ]));
        assert_eq!(h.rank, Rank::Flush);
        assert_eq!(h.values, vec![14, 12, 9, 7, 4]);
    }

    #[test]
    fn test_straight_flush_and_quads() {
        let sf = eval(&hand(&[(5, Spade), (6, Spade), (7, Spade), (8, Spade), (9, Spade)]));
        assert_eq!(sf.rank, Rank::StraightFlush);
        let quads = eval(&hand(&[(9, Club), (9, Heart), (9, Spade), (9, Diamond), (1, Club)]));
        assert_eq!(quads.rank, Rank::FourOfAKind);
        assert_eq!(quads.values, vec![9, 14]);
        assert!(sf > quads);
    }

    #[test]
    fn test_fewer_than_five_cards() {
        assert_eq!(eval(&hand(&[(4, Club), (4, Heart)])).rank, Rank::OnePair);
        let four = eval(&hand(&[(2, Club), (3, Club), (4, Club), (5, Club)]));
        assert_eq!(four.rank, Rank::HighCard);
        assert_eq!(eval(&[]).values, Vec::<Value>::new());
    }

    #[test]
    fn test_kicker_decides() {
        let board = hand(&[(13, Club), (13, Heart), (8, Spade), (4, Diamond), (2, Club)]);
        let ace = best_hand(&hand(&[(1, Spade), (3, Heart)]), &board);
        let queen = best_hand(&hand(&[(12, Spade), (3, Diamond)]), &board);
        assert_eq!(compare_hands(&ace, &queen), Ordering::Greater);
    }

    #[test]
    fn test_argmax_returns_all_ties() {
        let board = hand(&[(10, Club), (11, Heart), (12, Spade), (13, Diamond), (1, Club)]);
        let hands = vec![
            best_hand(&hand(&[(2, Spade), (3, Heart)]), &board),
            best_hand(&hand(&[(2, Heart), (4, Heart)]), &board),
            best_hand(&hand(&[(2, Club), (2, Diamond)]), &board),
        ];
        assert_eq!(argmax(&hands), vec![0, 1, 2]);
        assert!(argmax(&[]).is_empty());
    }
}
