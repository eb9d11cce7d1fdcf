#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits cooldown and attack commands from targeting data.

use lane_defence_core::{Command, TowerId, TowerTarget, TowerView};

/// Tower combat system that queues cooldown and firing commands.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::CoolTower` for every cooling tower and
    /// `Command::FireAt` for every ready tower that has a target.
    ///
    /// A cooling tower never attacks in the same tick, even when this tick
    /// brings its cooldown to zero. `tower_targets` must be ordered by tower
    /// identifier, as produced by the targeting system.
    pub fn handle(
        &mut self,
        towers: &TowerView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        self.scratch.clear();

        for tower in towers.iter() {
            if tower.cooldown_remaining > 0 {
                self.scratch.push(Command::CoolTower { tower: tower.id });
                continue;
            }

            if let Some(target) = find_target(tower_targets, tower.id) {
                self.scratch.push(Command::FireAt {
                    tower: tower.id,
                    target: target.enemy,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn find_target(targets: &[TowerTarget], tower: TowerId) -> Option<&TowerTarget> {
    targets
        .binary_search_by_key(&tower, |target| target.tower)
        .ok()
        .map(|index| &targets[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::{Color, EnemyId, Point, TemplateIndex, TowerSnapshot};

    #[test]
    fn cooling_towers_only_cool() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![snapshot(1, 3)]);
        let mut out = Vec::new();

        system.handle(&towers, &[target(1, 9)], &mut out);

        assert_eq!(
            out,
            vec![Command::CoolTower {
                tower: TowerId::new(1)
            }]
        );
    }

    #[test]
    fn ready_towers_fire_at_their_target() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![snapshot(2, 0), snapshot(5, 0)]);
        let targets = vec![target(2, 4), target(5, 1)];
        let mut out = Vec::new();

        system.handle(&towers, &targets, &mut out);

        assert_eq!(
            out,
            vec![
                Command::FireAt {
                    tower: TowerId::new(2),
                    target: EnemyId::new(4),
                },
                Command::FireAt {
                    tower: TowerId::new(5),
                    target: EnemyId::new(1),
                },
            ],
        );
    }

    #[test]
    fn ready_tower_without_target_stays_idle() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![snapshot(3, 0), snapshot(8, 2)]);
        let targets = vec![target(42, 3)];
        let mut out = Vec::new();

        system.handle(&towers, &targets, &mut out);

        assert_eq!(
            out,
            vec![Command::CoolTower {
                tower: TowerId::new(8)
            }]
        );
    }

    fn snapshot(tower: u32, cooldown_remaining: u32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(tower),
            template: TemplateIndex::new(0),
            position: Point::new(0.0, 0.0),
            range: 120,
            damage: 10,
            cooldown_remaining,
            cooldown_max: 25,
            level: 1,
            upgrade_cost: 60,
            color: Color::default(),
        }
    }

    fn target(tower: u32, enemy: u32) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            enemy: EnemyId::new(enemy),
            tower_position: Point::new(0.0, 0.0),
            enemy_position: Point::new(0.0, 0.0),
        }
    }
}
