#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use lane_defence_core::{EnemyId, EnemyView, Point, TowerTarget, TowerView};

/// Weight applied to the distance term of the priority score.
const DISTANCE_WEIGHT: f64 = 1.0 / 1000.0;

/// Tower targeting system that reuses a scratch buffer between ticks.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes one target per tower that has an enemy within range.
    ///
    /// Among the enemies whose distance is at most the tower's range, the
    /// one furthest along the path wins; the distance divided by a thousand
    /// breaks ties between enemies heading to the same waypoint, and exact
    /// ties keep the lowest identifier. The output buffer is cleared first.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        if towers.is_empty() || enemies.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);

        for tower in towers.iter() {
            let range = f64::from(tower.range);
            let mut best: Option<(f64, &EnemyCandidate)> = None;

            for candidate in &self.enemy_workspace {
                let distance = tower.position.distance(candidate.position);
                if distance > range {
                    continue;
                }

                let score = candidate.progress + distance * DISTANCE_WEIGHT;
                match best {
                    Some((best_score, _)) if score <= best_score => {}
                    _ => best = Some((score, candidate)),
                }
            }

            if let Some((_, candidate)) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: candidate.id,
                    tower_position: tower.position,
                    enemy_position: candidate.position,
                });
            }
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for snapshot in enemies.iter() {
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
                progress: snapshot.target_waypoint as f64,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Point,
    progress: f64,
}
