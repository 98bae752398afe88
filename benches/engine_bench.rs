use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rand::rngs::SmallRng;
use rand::SeedableRng;

use aether::board::TileKind;
use aether::card::{fallback_deck, CardId, Element};
use aether::config::GameConfig;
use aether::game::{default_roster, new_game, step, Action};
use aether::resolve::resolve_battle;
use aether::selfplay::{play_game, SelfPlayConfig};

fn bench_resolve_battle(c: &mut Criterion) {
    let deck = fallback_deck();
    let attacker = deck[0].mint(CardId(0));
    let defender = deck[2].mint(CardId(1));
    let terrain = TileKind::Land(Element::Water);
    c.bench_function("resolve_battle_counter", |b| {
        b.iter(|| resolve_battle(black_box(&attacker), black_box(&defender), terrain, 10))
    });
}

fn bench_new_game(c: &mut Criterion) {
    let defs = fallback_deck();
    let mut rng = SmallRng::seed_from_u64(1);
    c.bench_function("new_game", |b| {
        b.iter(|| {
            new_game(
                GameConfig::default(),
                &default_roster(),
                black_box(&defs),
                "Bench",
                false,
                &mut rng,
            )
        })
    });
}

fn bench_step_roll(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(2);
    let state = new_game(
        GameConfig::default(),
        &default_roster(),
        &fallback_deck(),
        "Bench",
        false,
        &mut rng,
    )
    .unwrap();
    let actor = state.current;
    c.bench_function("step_roll", |b| {
        b.iter(|| step(black_box(&state), actor, Action::Roll, &mut rng))
    });
}

fn bench_full_game(c: &mut Criterion) {
    let defs = fallback_deck();
    let config = SelfPlayConfig {
        quiet: true,
        ..SelfPlayConfig::default()
    };
    let mut seed = 0u64;
    c.bench_function("selfplay_full_game", |b| {
        b.iter(|| {
            seed += 1;
            play_game(&config, black_box(&defs), false, 0, seed)
        })
    });
}

criterion_group!(
    benches,
    bench_resolve_battle,
    bench_new_game,
    bench_step_roll,
    bench_full_game
);
criterion_main!(benches);
