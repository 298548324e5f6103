//! Hand Evaluation Example
//!
//! Demonstrates how to use the hand evaluation functions to compare poker hands.

use holdem_table::entities::{Card, Suit};
use holdem_table::functional::{argmax, best_hand, compare_hands, eval};

fn show(cards: &[Card]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() {
    println!("=== Hold'em Hand Evaluation Example ===\n");

    // Example 1: Evaluate a single hand
    println!("Example 1: Best five of seven cards");
    let seven = vec![
        Card(1, Suit::Heart),
        Card(13, Suit::Heart),
        Card(12, Suit::Heart),
        Card(11, Suit::Heart),
        Card(10, Suit::Heart),
        Card(9, Suit::Spade),
        Card(2, Suit::Club),
    ];
    println!("Cards: {}", show(&seven));
    println!("Best hand: {}\n", eval(&seven));

    // Example 2: Compare two players on the same board
    println!("Example 2: Same board, different hole cards");
    let board = vec![
        Card(10, Suit::Club),
        Card(9, Suit::Diamond),
        Card(2, Suit::Spade),
        Card(7, Suit::Heart),
        Card(3, Suit::Club),
    ];
    let aces = [Card(1, Suit::Spade), Card(1, Suit::Diamond)];
    let kings = [Card(13, Suit::Spade), Card(13, Suit::Heart)];
    let hand_a = best_hand(&aces, &board);
    let hand_b = best_hand(&kings, &board);
    println!("Board: {}", show(&board));
    println!("A holds {} -> {hand_a}", show(&aces));
    println!("B holds {} -> {hand_b}", show(&kings));
    println!("A vs B: {:?}\n", compare_hands(&hand_a, &hand_b));

    // Example 3: The wheel is the lowest straight
    println!("Example 3: Wheel against six-high");
    let wheel = eval(&[
        Card(1, Suit::Club),
        Card(2, Suit::Diamond),
        Card(3, Suit::Heart),
        Card(4, Suit::Spade),
        Card(5, Suit::Club),
    ]);
    let six_high = eval(&[
        Card(2, Suit::Club),
        Card(3, Suit::Diamond),
        Card(4, Suit::Heart),
        Card(5, Suit::Spade),
        Card(6, Suit::Club),
    ]);
    println!("Wheel: {wheel}, six-high: {six_high}");
    println!("Winner index: {:?}\n", argmax(&[wheel, six_high]));

    // Example 4: Everyone plays the board
    println!("Example 4: Split pot");
    let broadway = vec![
        Card(10, Suit::Heart),
        Card(11, Suit::Diamond),
        Card(12, Suit::Club),
        Card(13, Suit::Spade),
        Card(1, Suit::Heart),
    ];
    let hands: Vec<_> = [
        [Card(2, Suit::Club), Card(3, Suit::Club)],
        [Card(4, Suit::Diamond), Card(4, Suit::Spade)],
        [Card(9, Suit::Heart), Card(8, Suit::Heart)],
    ]
    .iter()
    .map(|hole| best_hand(hole, &broadway))
    .collect();
    println!("Board: {}", show(&broadway));
    match argmax(&hands).as_slice() {
        [single] => println!("Winner: player {single}"),
        tied => println!("Tie between players {tied:?}"),
    }
}
