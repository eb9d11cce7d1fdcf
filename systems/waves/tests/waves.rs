use lane_defence_core::{Color, Command, Event, GameConfig, WaveBalance};
use lane_defence_system_waves::{RandomColors, WaveScheduler};
use lane_defence_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn run_ticks(ticks: usize, seed: u64) -> (World, Vec<Command>) {
    let config = GameConfig::default();
    let mut scheduler = WaveScheduler::new(config.waves.clone(), config.enemies.palette.clone());
    let mut colors = RandomColors::new(ChaCha8Rng::seed_from_u64(seed));
    let mut world = World::new(config).expect("default configuration");
    let mut emitted = Vec::new();
    let mut events: Vec<Event> = Vec::new();

    for _ in 0..ticks {
        let mut commands = Vec::new();
        scheduler.handle(query::live_enemy_count(&world), &mut colors, &mut commands);
        for command in commands {
            world::apply(&mut world, command.clone(), &mut events);
            emitted.push(command);
        }
    }
    (world, emitted)
}

#[test]
fn first_wave_spawns_ten_enemies_at_fixed_cadence() {
    let (world, commands) = run_ticks(38 * 10 + 100, 7);

    let spawns = commands
        .iter()
        .filter(|command| matches!(command, Command::SpawnEnemy { wave: 1, .. }))
        .count();
    assert_eq!(spawns, 10);
    assert_eq!(query::wave(&world), 1);
    assert_eq!(query::live_enemy_count(&world), 10);
    assert_eq!(
        commands
            .iter()
            .filter(|command| **command == Command::StartWave)
            .count(),
        1
    );
}

#[test]
fn spawned_colors_come_from_palette_and_repeat_per_seed() {
    fn colors(commands: &[Command]) -> Vec<Color> {
        commands
            .iter()
            .filter_map(|command| match command {
                Command::SpawnEnemy { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    let palette = GameConfig::default().enemies.palette;

    let (_, first) = run_ticks(400, 42);
    let (_, second) = run_ticks(400, 42);
    let first = colors(&first);

    assert!(!first.is_empty());
    assert!(first.iter().all(|color| palette.contains(color)));
    assert_eq!(first, colors(&second));
}

#[test]
fn next_wave_waits_for_an_empty_board() {
    let mut scheduler = WaveScheduler::new(WaveBalance::default(), vec![Color::default()]);
    let mut colors = RandomColors::new(ChaCha8Rng::seed_from_u64(1));
    let mut commands = Vec::new();

    scheduler.handle(0, &mut colors, &mut commands);
    for _ in 0..38 * 10 {
        scheduler.handle(1, &mut colors, &mut commands);
    }
    commands.clear();

    for _ in 0..500 {
        scheduler.handle(1, &mut colors, &mut commands);
    }
    assert!(commands.is_empty());

    scheduler.handle(0, &mut colors, &mut commands);
    assert_eq!(commands, vec![Command::StartWave]);
    assert_eq!(scheduler.wave(), 2);
    assert_eq!(scheduler.remaining_to_spawn(), 12);
}

#[test]
fn spawn_delay_shrinks_across_waves() {
    let mut scheduler = WaveScheduler::new(WaveBalance::default(), vec![Color::default()]);
    let mut colors = RandomColors::new(ChaCha8Rng::seed_from_u64(3));
    let mut previous = u32::MAX;

    for _ in 0..60 {
        let mut commands = Vec::new();
        scheduler.handle(0, &mut colors, &mut commands);
        while scheduler.remaining_to_spawn() > 0 {
            scheduler.handle(1, &mut colors, &mut commands);
        }
        assert!(scheduler.spawn_delay() <= previous);
        assert!(scheduler.spawn_delay() >= 12);
        previous = scheduler.spawn_delay();
    }
    assert_eq!(previous, 12);
}
