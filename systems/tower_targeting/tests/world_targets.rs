use lane_defence_core::{Color, Command, EnemyId, Event, GameConfig, Point, TemplateIndex};
use lane_defence_system_tower_targeting::TowerTargeting;
use lane_defence_world::{self as world, query, World};

fn apply_all(world: &mut World, commands: impl IntoIterator<Item = Command>) {
    let mut events: Vec<Event> = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
}

fn spawn() -> Command {
    Command::SpawnEnemy {
        wave: 1,
        color: Color::default(),
    }
}

#[test]
fn tower_prefers_enemy_further_from_it_on_the_same_segment() {
    let mut world = World::new(GameConfig::default()).expect("default configuration");
    apply_all(
        &mut world,
        [
            Command::PlaceTower {
                template: TemplateIndex::new(0),
                position: Point::new(0.0, 300.0),
            },
            Command::StartWave,
            spawn(),
        ],
    );
    apply_all(&mut world, std::iter::repeat(Command::AdvanceEnemies).take(10));
    apply_all(&mut world, [spawn(), Command::AdvanceEnemies]);

    let mut system = TowerTargeting::new();
    let mut targets = Vec::new();
    system.handle(
        &query::tower_view(&world),
        &query::enemy_view(&world),
        &mut targets,
    );

    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].enemy, EnemyId::new(0));
    assert_eq!(targets[0].tower_position, Point::new(0.0, 300.0));
}

#[test]
fn empty_board_yields_no_targets() {
    let world = World::new(GameConfig::default()).expect("default configuration");
    let mut system = TowerTargeting::new();
    let mut targets = vec![];
    system.handle(
        &query::tower_view(&world),
        &query::enemy_view(&world),
        &mut targets,
    );
    assert!(targets.is_empty());
}
