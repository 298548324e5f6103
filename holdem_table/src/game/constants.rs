use super::entities::Chips;

/// Most seats a table can have. Positions run out past six players.
pub const MAX_PLAYERS: usize = 6;

/// Fewest players that can play a hand.
pub const MIN_PLAYERS: usize = 2;

/// Hole cards dealt to every active player.
pub const HOLE_CARDS: usize = 2;

/// Community cards on a complete board.
pub const BOARD_CARDS: usize = 5;

/// Display names longer than this are truncated.
pub const MAX_NAME_LENGTH: usize = 32;

pub const DEFAULT_STARTING_CHIPS: Chips = 1000;
pub const DEFAULT_SMALL_BLIND: Chips = 10;
pub const DEFAULT_BIG_BLIND: Chips = 2 * DEFAULT_SMALL_BLIND;
