//! Enemy entities and the roster that owns them.

use lane_defence_core::{Color, EnemyId, EnemySnapshot, EnemyStats, PathModel, Point};

/// Mobile agent following the path.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) position: Point,
    pub(crate) target_waypoint: usize,
    speed: f64,
    max_health: i32,
    pub(crate) health: i32,
    pub(crate) reward: u32,
    color: Color,
}

/// Outcome of moving an enemy for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Advance {
    /// The enemy is still travelling.
    Moving,
    /// The enemy already stood on the final waypoint.
    Completed,
}

impl Enemy {
    fn new(id: EnemyId, start: Point, stats: EnemyStats, color: Color) -> Self {
        Self {
            id,
            position: start,
            target_waypoint: 1,
            speed: stats.speed,
            max_health: stats.max_health,
            health: stats.max_health,
            reward: stats.reward,
            color,
        }
    }

    /// Moves the enemy `speed` units towards its target waypoint.
    ///
    /// An enemy closer to the waypoint than its speed lands on it and only
    /// starts the next segment on the following tick.
    pub(crate) fn advance(&mut self, path: &PathModel) -> Advance {
        let Some(target) = path.point_at(self.target_waypoint) else {
            return Advance::Completed;
        };

        let dx = target.x - self.position.x;
        let dy = target.y - self.position.y;
        let distance = dx.hypot(dy);

        if distance < self.speed {
            self.position = target;
            self.target_waypoint += 1;
        } else {
            self.position.x += dx / distance * self.speed;
            self.position.y += dy / distance * self.speed;
        }
        Advance::Moving
    }

    /// Removes health; the result may go below zero.
    pub(crate) fn take_damage(&mut self, damage: u32) {
        self.health = self.health.saturating_sub_unsigned(damage);
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position,
            target_waypoint: self.target_waypoint,
            health: self.health,
            max_health: self.max_health,
            color: self.color,
        }
    }
}

/// Reason an enemy left the live set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Departure {
    /// Reached the end of the path.
    Escaped(EnemyId),
    /// Died to tower damage, paying the reward.
    Killed(EnemyId, u32),
}

/// Live enemy collection together with identifier allocation.
#[derive(Debug)]
pub(crate) struct EnemyRoster {
    enemies: Vec<Enemy>,
    next_enemy_id: EnemyId,
}

impl EnemyRoster {
    pub(crate) fn new() -> Self {
        Self {
            enemies: Vec::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    pub(crate) fn spawn(&mut self, start: Point, stats: EnemyStats, color: Color) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().wrapping_add(1));
        self.enemies.push(Enemy::new(id, start, stats, color));
        id
    }

    /// Advances every enemy and removes those that finished or died.
    ///
    /// Completion is checked before death, so an enemy that reaches the end
    /// of the path costs a life even when its health is exhausted.
    pub(crate) fn advance_all(&mut self, path: &PathModel, departures: &mut Vec<Departure>) {
        self.enemies.retain_mut(|enemy| match enemy.advance(path) {
            Advance::Completed => {
                departures.push(Departure::Escaped(enemy.id));
                false
            }
            Advance::Moving if enemy.is_dead() => {
                departures.push(Departure::Killed(enemy.id, enemy.reward));
                false
            }
            Advance::Moving => true,
        });
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|enemy| enemy.id == id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.enemies.len()
    }
}
