use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use holdem_table::{
    Action, Card, GameSettings, Player, PlayerId, PlayerStatus, Suit, Table, TableEvent, TableId,
    TableState, TableStatus,
    functional::{argmax, best_hand, eval},
    game::settlement::compute_settlement,
    random::RngSource,
};

/// A table with `n_players` seated and the first hand dealt
fn setup_table(n_players: usize) -> Table {
    let settings = GameSettings {
        min_players: n_players,
        ..GameSettings::default()
    };
    let mut table = Table::new(TableId::new(), settings, Box::new(RngSource::from_seed(1)));
    for i in 0..n_players {
        let id = format!("player{i}");
        table.process_event(TableEvent::join(id.as_str(), &id)).unwrap();
    }
    table
}

/// A showdown with every player all-in for a different amount
fn setup_showdown(n_players: usize) -> TableState {
    let mut state = TableState::new(TableId::new(), GameSettings::default());
    let mut deck = holdem_table::entities::Deck::shuffled(&mut RngSource::from_seed(9));
    for seat in 0..n_players {
        let mut player = Player::new(PlayerId::new(&format!("player{seat}")), "p", seat, 0);
        player.hole_cards = vec![deck.deal_card().unwrap(), deck.deal_card().unwrap()];
        player.bet.volume = 100 * (seat as u32 + 1);
        player.status = PlayerStatus::AllIn;
        state.round.volume += player.bet.volume;
        state.players.push(player);
    }
    state.community_cards = (0..5).map(|_| deck.deal_card().unwrap()).collect();
    state
}

/// Benchmark hand evaluation with 2 cards (pocket cards)
fn bench_hand_eval_2_cards(c: &mut Criterion) {
    let cards = vec![Card(1, Suit::Spade), Card(13, Suit::Spade)];

    c.bench_function("hand_eval_2_cards", |b| {
        b.iter(|| eval(&cards));
    });
}

/// Benchmark hand evaluation with 7 cards (hole cards + board)
fn bench_hand_eval_7_cards(c: &mut Criterion) {
    let cards = vec![
        Card(1, Suit::Spade),
        Card(13, Suit::Spade),
        Card(12, Suit::Spade),
        Card(11, Suit::Heart),
        Card(10, Suit::Diamond),
        Card(4, Suit::Club),
        Card(2, Suit::Spade),
    ];

    c.bench_function("hand_eval_7_cards", |b| {
        b.iter(|| eval(&cards));
    });
}

/// Benchmark picking the winners among four hands on one board
fn bench_hand_comparison(c: &mut Criterion) {
    let board = vec![
        Card(2, Suit::Club),
        Card(7, Suit::Diamond),
        Card(9, Suit::Heart),
        Card(11, Suit::Spade),
        Card(13, Suit::Club),
    ];
    let holes = [
        [Card(1, Suit::Spade), Card(1, Suit::Heart)],
        [Card(13, Suit::Spade), Card(12, Suit::Heart)],
        [Card(8, Suit::Club), Card(10, Suit::Club)],
        [Card(3, Suit::Diamond), Card(4, Suit::Diamond)],
    ];

    c.bench_function("hand_comparison_4_hands", |b| {
        b.iter(|| {
            let hands: Vec<_> = holes.iter().map(|h| best_hand(h, &board)).collect();
            argmax(&hands)
        });
    });
}

/// Benchmark side-pot settlement by player count
fn bench_settlement(c: &mut Criterion) {
    let mut group = c.benchmark_group("settlement");

    for n_players in [2, 4, 6] {
        let state = setup_showdown(n_players);
        group.bench_with_input(
            BenchmarkId::from_parameter(n_players),
            &state,
            |b, state| b.iter(|| compute_settlement(state)),
        );
    }

    group.finish();
}

/// Benchmark a full event: call, check and deal through to a settled round
fn bench_process_event(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_event");

    for n_players in [2, 6] {
        group.bench_with_input(
            BenchmarkId::from_parameter(n_players),
            &n_players,
            |b, &n| {
                b.iter_batched(
                    || setup_table(n),
                    |mut table| {
                        while table.current_state().table_status == TableStatus::Playing {
                            let state = table.current_state();
                            let Some(player) = state.current_player() else {
                                break;
                            };
                            let owed = state.round.current_bet - player.bet.amount;
                            let action = if owed == 0 { Action::Check } else { Action::Call };
                            let event = TableEvent::player_move(player.id.clone(), action);
                            table.process_event(event).unwrap();
                        }
                        table
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(
    hand_benches,
    bench_hand_eval_2_cards,
    bench_hand_eval_7_cards,
    bench_hand_comparison
);

criterion_group!(table_benches, bench_settlement, bench_process_event);

criterion_main!(hand_benches, table_benches);
