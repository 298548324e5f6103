use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use super::constants::{
    self, DEFAULT_BIG_BLIND, DEFAULT_SMALL_BLIND, DEFAULT_STARTING_CHIPS, MAX_PLAYERS,
    MIN_PLAYERS,
};
use super::random::RandomSource;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl Suit {
    pub const ALL: [Self; 4] = [Self::Club, Self::Spade, Self::Diamond, Self::Heart];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

/// A card is a tuple of a value (ace=1u8, two=2u8 ... king=13u8) and a
/// suit. The hand evaluator promotes aces to 14 where they play high.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            1 | 14 => "A",
            11 => "J",
            12 => "Q",
            13 => "K",
            v => &v.to_string(),
        };
        write!(f, "{value}{}", self.1)
    }
}

/// Hand categories, weakest first.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Rank {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::HighCard => "high card",
            Self::OnePair => "pair",
            Self::TwoPair => "two pair",
            Self::ThreeOfAKind => "three of a kind",
            Self::Straight => "straight",
            Self::Flush => "flush",
            Self::FullHouse => "full house",
            Self::FourOfAKind => "four of a kind",
            Self::StraightFlush => "straight flush",
        };
        write!(f, "{repr}")
    }
}

/// An evaluated hand. The derived ordering compares the category first and
/// then the tie-break values lexicographically, so two hands compare exactly
/// the way a showdown settles them.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct SubHand {
    pub rank: Rank,
    /// Tie-break key in descending significance (aces count as 14, except
    /// in the five-high straight).
    pub values: Vec<Value>,
}

impl fmt::Display for SubHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.rank, self.values)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Deck {
    cards: Vec<Card>,
    pub deck_idx: usize,
}

impl Deck {
    /// A fresh deck shuffled by the given source.
    pub fn shuffled(rng: &mut dyn RandomSource) -> Self {
        let mut deck = Self::default();
        rng.shuffle(&mut deck.cards);
        deck
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let card = self.cards.get(self.deck_idx).copied()?;
        self.deck_idx += 1;
        Some(card)
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.deck_idx
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Default for Deck {
    fn default() -> Self {
        let cards = (1u8..=13u8)
            .flat_map(|value| Suit::ALL.into_iter().map(move |suit| Card(value, suit)))
            .collect();
        Self { cards, deck_idx: 0 }
    }
}

/// Type alias for chip amounts. Stacks, bets and pots are all whole chips.
pub type Chips = u32;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct TableId(pub Uuid);

impl TableId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TableId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier a player is known by outside the table (account or agent id).
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Name shown at the table. Whitespace becomes underscores and long names
/// are truncated.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(s: &str) -> Self {
        let name = s
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .take(constants::MAX_NAME_LENGTH)
            .collect();
        Self(name)
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for DisplayName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerStatus {
    Playing,
    Folded,
    AllIn,
    Eliminated,
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Playing => "playing",
            Self::Folded => "folded",
            Self::AllIn => "all-in",
            Self::Eliminated => "eliminated",
        };
        write!(f, "{repr:10}")
    }
}

/// Seat roles relative to the dealer button.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Btn,
    Sb,
    Bb,
    Ep,
    Mp,
    Co,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Btn => "BTN",
            Self::Sb => "SB",
            Self::Bb => "BB",
            Self::Ep => "EP",
            Self::Mp => "MP",
            Self::Co => "CO",
        };
        write!(f, "{repr}")
    }
}

/// Chips a player has committed.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Bet {
    /// Committed during the current street.
    pub amount: Chips,
    /// Committed during the current round, across all streets.
    pub volume: Chips,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: DisplayName,
    /// Seat index, fixed once joined.
    pub seat: usize,
    pub status: PlayerStatus,
    pub position: Option<Position>,
    pub hole_cards: Vec<Card>,
    pub chips: Chips,
    pub bet: Bet,
    pub played_this_phase: bool,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, display_name: &str, seat: usize, chips: Chips) -> Self {
        Self {
            id,
            display_name: DisplayName::new(display_name),
            seat,
            status: PlayerStatus::Playing,
            position: None,
            hole_cards: Vec::with_capacity(constants::HOLE_CARDS),
            chips,
            bet: Bet::default(),
            played_this_phase: false,
        }
    }

    /// Still contesting the pot: neither folded nor eliminated.
    #[must_use]
    pub fn in_hand(&self) -> bool {
        matches!(self.status, PlayerStatus::Playing | PlayerStatus::AllIn)
    }

    /// Eligible to be asked for a move.
    #[must_use]
    pub fn can_act(&self) -> bool {
        self.status == PlayerStatus::Playing && self.chips > 0
    }

    /// Holds chips and will be dealt into the next round.
    #[must_use]
    pub fn has_chips(&self) -> bool {
        self.status != PlayerStatus::Eliminated && self.chips > 0
    }

    /// Puts up to `amount` chips from the stack into the current bet and
    /// returns how many were actually committed.
    pub fn commit(&mut self, amount: Chips) -> Chips {
        let committed = amount.min(self.chips);
        self.chips -= committed;
        self.bet.amount += committed;
        self.bet.volume += committed;
        if self.chips == 0 && self.status == PlayerStatus::Playing {
            self.status = PlayerStatus::AllIn;
        }
        committed
    }

    pub fn reset_for_round(&mut self) {
        self.status = PlayerStatus::Playing;
        self.hole_cards.clear();
        self.bet = Bet::default();
        self.played_this_phase = false;
    }

    pub fn eliminate(&mut self) {
        self.status = PlayerStatus::Eliminated;
        self.position = None;
        self.hole_cards.clear();
        self.played_this_phase = false;
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    AllIn,
    Call,
    Check,
    Fold,
    /// Put this many more chips in on top of the current street bet.
    Raise(Chips),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::AllIn => "goes all-in",
            Self::Call => "calls",
            Self::Check => "checks",
            Self::Fold => "folds",
            Self::Raise(amount) => &format!("raises by {amount}"),
        };
        write!(f, "{repr}")
    }
}

/// A player move. The decision context is an opaque payload attached by
/// whatever produced the move; the table stores it and never reads it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Move {
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_context: Option<serde_json::Value>,
}

impl Move {
    #[must_use]
    pub fn new(action: Action) -> Self {
        Self {
            action,
            decision_context: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.decision_context = Some(context);
        self
    }
}

impl From<Action> for Move {
    fn from(value: Action) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct LastMove {
    pub player_id: PlayerId,
    #[serde(flatten)]
    pub mv: Move,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Street {
    #[default]
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::PreFlop => Some(Self::Flop),
            Self::Flop => Some(Self::Turn),
            Self::Turn => Some(Self::River),
            Self::River => Some(Self::Showdown),
            Self::Showdown => None,
        }
    }

    /// Community cards revealed when this street begins.
    #[must_use]
    pub fn cards_to_deal(self) -> usize {
        match self {
            Self::Flop => 3,
            Self::Turn | Self::River => 1,
            Self::PreFlop | Self::Showdown => 0,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::PreFlop => "pre-flop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PhaseState {
    pub street: Street,
    /// Moves since the street began. Reset on every street change.
    pub action_count: u32,
    /// Chips committed during this street.
    pub volume: Chips,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RoundState {
    pub round_number: u32,
    /// Highest street bet any player has committed.
    pub current_bet: Chips,
    /// Total pot for the round.
    pub volume: Chips,
    pub folded_player_ids: Vec<PlayerId>,
    pub all_in_player_ids: Vec<PlayerId>,
}

impl RoundState {
    #[must_use]
    pub fn new(round_number: u32) -> Self {
        Self {
            round_number,
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    #[default]
    Waiting,
    Playing,
    RoundOver,
    GameOver,
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Waiting => "waiting",
            Self::Playing => "playing",
            Self::RoundOver => "round over",
            Self::GameOver => "game over",
        };
        write!(f, "{repr}")
    }
}

/// Outcome of the most recently finished round.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RoundResult {
    pub round_number: u32,
    /// Everyone who received chips, in seat order.
    pub winner_ids: Vec<PlayerId>,
    /// Total chips distributed.
    pub pot: Chips,
}

/// Game configuration settings carried inside every snapshot.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSettings {
    pub starting_chips: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// Game ends after this many rounds when set.
    pub max_rounds: Option<u32>,
    /// Joins needed before the first hand is dealt.
    pub min_players: usize,
    /// Seat count.
    pub max_players: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(
            DEFAULT_STARTING_CHIPS,
            DEFAULT_SMALL_BLIND,
            DEFAULT_BIG_BLIND,
            None,
            MIN_PLAYERS,
            MAX_PLAYERS,
        )
    }
}

impl GameSettings {
    #[must_use]
    pub const fn new(
        starting_chips: Chips,
        small_blind: Chips,
        big_blind: Chips,
        max_rounds: Option<u32>,
        min_players: usize,
        max_players: usize,
    ) -> Self {
        Self {
            starting_chips,
            small_blind,
            big_blind,
            max_rounds,
            min_players,
            max_players,
        }
    }
}

/// Immutable snapshot of a table. Every accepted event produces a new one.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TableState {
    pub table_id: TableId,
    pub table_status: TableStatus,
    /// Games played on this table, counting the current one.
    pub game_number: u32,
    /// Seat order, fixed once joined.
    pub players: Vec<Player>,
    pub dealer_id: Option<PlayerId>,
    /// Whose move it is. `None` when nobody can act.
    pub current_player_index: Option<usize>,
    pub deck: Deck,
    pub community_cards: Vec<Card>,
    pub phase: PhaseState,
    pub round: RoundState,
    pub last_move: Option<LastMove>,
    pub winner: Option<PlayerId>,
    pub last_round_result: Option<RoundResult>,
    pub config: GameSettings,
}

impl TableState {
    #[must_use]
    pub fn new(table_id: TableId, config: GameSettings) -> Self {
        Self {
            table_id,
            table_status: TableStatus::Waiting,
            game_number: 1,
            players: Vec::with_capacity(config.max_players),
            dealer_id: None,
            current_player_index: None,
            deck: Deck::default(),
            community_cards: Vec::with_capacity(constants::BOARD_CARDS),
            phase: PhaseState::default(),
            round: RoundState::default(),
            last_move: None,
            winner: None,
            last_round_result: None,
            config,
        }
    }

    #[must_use]
    pub fn player_index(&self, player_id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == player_id)
    }

    #[must_use]
    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == player_id)
    }

    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.current_player_index.and_then(|idx| self.players.get(idx))
    }

    #[must_use]
    pub fn dealer_index(&self) -> Option<usize> {
        self.dealer_id.as_ref().and_then(|id| self.player_index(id))
    }

    #[must_use]
    pub fn position_index(&self, position: Position) -> Option<usize> {
        self.players
            .iter()
            .position(|p| p.position == Some(position))
    }

    /// Players neither folded nor eliminated.
    #[must_use]
    pub fn in_hand_count(&self) -> usize {
        self.players.iter().filter(|p| p.in_hand()).count()
    }

    /// Players who can still be asked for a move.
    #[must_use]
    pub fn can_act_count(&self) -> usize {
        self.players.iter().filter(|p| p.can_act()).count()
    }

    /// Chips owned by the table: every stack plus everything committed this
    /// round.
    #[must_use]
    pub fn total_chips(&self) -> Chips {
        self.players.iter().map(|p| p.chips + p.bet.volume).sum()
    }

    /// Chips the player must add to match the current street bet.
    #[must_use]
    pub fn owed_by(&self, idx: usize) -> Chips {
        self.players
            .get(idx)
            .map_or(0, |p| self.round.current_bet.saturating_sub(p.bet.amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // === Card Tests ===

    #[test]
    fn test_card_display_face_cards() {
        assert_eq!(Card(1, Suit::Spade).to_string(), "A♠");
        assert_eq!(Card(13, Suit::Heart).to_string(), "K♥");
        assert_eq!(Card(12, Suit::Diamond).to_string(), "Q♦");
        assert_eq!(Card(11, Suit::Club).to_string(), "J♣");
        assert_eq!(Card(10, Suit::Club).to_string(), "10♣");
    }

    // === Deck Tests ===

    #[test]
    fn test_deck_has_52_unique_cards() {
        let deck = Deck::default();
        let unique: HashSet<_> = deck.cards().iter().collect();
        assert_eq!(deck.cards().len(), 52);
        assert_eq!(unique.len(), 52);
        assert!(deck.cards().iter().all(|c| (1..=13).contains(&c.0)));
    }

    #[test]
    fn test_deck_deals_front_to_back_until_empty() {
        let mut deck = Deck::default();
        let first = deck.deal_card();
        assert_eq!(first, Some(Card(1, Suit::Club)));
        assert_eq!(deck.remaining(), 51);
        for _ in 0..51 {
            assert!(deck.deal_card().is_some());
        }
        assert_eq!(deck.deal_card(), None);
        assert_eq!(deck.deck_idx, 52);
    }

    // === Player Tests ===

    #[test]
    fn test_player_commit_clamps_to_stack() {
        let mut player = Player::new(PlayerId::new("alice"), "Alice", 0, 15);
        assert_eq!(player.commit(20), 15);
        assert_eq!(player.chips, 0);
        assert_eq!(player.bet, Bet { amount: 15, volume: 15 });
        assert_eq!(player.status, PlayerStatus::AllIn);
    }

    #[test]
    fn test_player_commit_partial() {
        let mut player = Player::new(PlayerId::new("bob"), "Bob", 1, 100);
        assert_eq!(player.commit(30), 30);
        assert_eq!(player.chips, 70);
        assert_eq!(player.status, PlayerStatus::Playing);
    }

    #[test]
    fn test_player_eliminate_clears_hand() {
        let mut player = Player::new(PlayerId::new("carol"), "Carol", 2, 0);
        player.hole_cards = vec![Card(1, Suit::Spade), Card(13, Suit::Heart)];
        player.position = Some(Position::Bb);
        player.eliminate();
        assert_eq!(player.status, PlayerStatus::Eliminated);
        assert!(player.hole_cards.is_empty());
        assert!(player.position.is_none());
        assert!(!player.has_chips());
        assert!(!player.in_hand());
    }

    #[test]
    fn test_display_name_sanitized() {
        assert_eq!(DisplayName::new("alice bob").to_string(), "alice_bob");
        let long = "a".repeat(100);
        assert_eq!(
            DisplayName::new(&long).to_string().len(),
            constants::MAX_NAME_LENGTH
        );
    }

    // === Street Tests ===

    #[test]
    fn test_street_progression() {
        assert_eq!(Street::PreFlop.next(), Some(Street::Flop));
        assert_eq!(Street::River.next(), Some(Street::Showdown));
        assert_eq!(Street::Showdown.next(), None);
        assert_eq!(Street::Flop.cards_to_deal(), 3);
        assert_eq!(Street::Turn.cards_to_deal(), 1);
    }

    // === Rank Tests ===

    #[test]
    fn test_rank_ordering() {
        assert!(Rank::HighCard < Rank::OnePair);
        assert!(Rank::TwoPair < Rank::ThreeOfAKind);
        assert!(Rank::Straight < Rank::Flush);
        assert!(Rank::FullHouse < Rank::FourOfAKind);
        assert!(Rank::FourOfAKind < Rank::StraightFlush);
    }

    #[test]
    fn test_subhand_rank_dominates_values() {
        let two_pair = SubHand {
            rank: Rank::TwoPair,
            values: vec![5, 4, 3],
        };
        let one_pair = SubHand {
            rank: Rank::OnePair,
            values: vec![14, 13, 12, 11],
        };
        assert!(two_pair > one_pair);
    }

    // === Serialization Tests ===

    #[test]
    fn test_statuses_serialize_like_the_wire_format() {
        assert_eq!(
            serde_json::to_string(&PlayerStatus::AllIn).unwrap(),
            "\"ALL_IN\""
        );
        assert_eq!(
            serde_json::to_string(&TableStatus::RoundOver).unwrap(),
            "\"ROUND_OVER\""
        );
        assert_eq!(serde_json::to_string(&Street::PreFlop).unwrap(), "\"PRE_FLOP\"");
        assert_eq!(serde_json::to_string(&Position::Btn).unwrap(), "\"BTN\"");
    }

    #[test]
    fn test_move_context_is_carried_opaquely() {
        let mv = Move::new(Action::Raise(40))
            .with_context(serde_json::json!({"confidence": 0.8, "reason": "strong draw"}));
        let json = serde_json::to_value(&mv).unwrap();
        assert_eq!(json["action"]["raise"], 40);
        assert_eq!(json["decision_context"]["reason"], "strong draw");
    }

    #[test]
    fn test_new_table_state_is_waiting() {
        let state = TableState::new(TableId::new(), GameSettings::default());
        assert_eq!(state.table_status, TableStatus::Waiting);
        assert!(state.players.is_empty());
        assert_eq!(state.total_chips(), 0);
        assert!(state.current_player().is_none());
    }
}
