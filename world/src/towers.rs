//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use lane_defence_core::{
    config::floor_to_u32, Color, Point, TemplateIndex, TowerId, TowerSnapshot, TowerTemplate,
    UpgradeRules,
};

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    pub(crate) id: TowerId,
    template: TemplateIndex,
    pub(crate) position: Point,
    range: u32,
    pub(crate) damage: u32,
    cooldown_max: u32,
    pub(crate) cooldown_remaining: u32,
    pub(crate) level: u32,
    pub(crate) upgrade_cost: u32,
    upgrade_multiplier: f64,
    color: Color,
}

impl Tower {
    fn from_template(
        id: TowerId,
        index: TemplateIndex,
        template: &TowerTemplate,
        position: Point,
    ) -> Self {
        Self {
            id,
            template: index,
            position,
            range: template.range,
            damage: template.damage,
            cooldown_max: template.cooldown,
            cooldown_remaining: 0,
            level: 1,
            upgrade_cost: template.upgrade_cost,
            upgrade_multiplier: template.upgrade_multiplier,
            color: template.color,
        }
    }

    pub(crate) fn can_upgrade(&self, rules: &UpgradeRules) -> bool {
        self.level < rules.max_level
    }

    /// Raises the tower one level and recomputes every derived stat.
    pub(crate) fn upgrade(&mut self, rules: &UpgradeRules) {
        self.level += 1;
        self.damage = floor_to_u32(f64::from(self.damage) * self.upgrade_multiplier);
        self.range = floor_to_u32(f64::from(self.range) * rules.range_growth);
        self.cooldown_max = floor_to_u32(f64::from(self.cooldown_max) * rules.cooldown_decay)
            .max(rules.min_cooldown);
        self.upgrade_cost = floor_to_u32(f64::from(self.upgrade_cost) * rules.cost_growth);
    }

    pub(crate) fn cool(&mut self) {
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);
    }

    pub(crate) fn rearm(&mut self) {
        self.cooldown_remaining = self.cooldown_max;
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            template: self.template,
            position: self.position,
            range: self.range,
            damage: self.damage,
            cooldown_remaining: self.cooldown_remaining,
            cooldown_max: self.cooldown_max,
            level: self.level,
            upgrade_cost: self.upgrade_cost,
            color: self.color,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    pub(crate) fn insert(
        &mut self,
        index: TemplateIndex,
        template: &TowerTemplate,
        position: Point,
    ) -> TowerId {
        let mut id = self.next_tower_id;
        while self.entries.contains_key(&id) {
            id = TowerId::new(id.get().wrapping_add(1));
        }
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));

        let displaced = self
            .entries
            .insert(id, Tower::from_template(id, index, template, position));
        debug_assert!(displaced.is_none(), "tower id {} allocated twice", id.get());
        id
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<Tower> {
        self.entries.remove(&id)
    }

    pub(crate) fn contains(&self, id: TowerId) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    /// First tower, in identifier order, strictly closer than `radius`.
    pub(crate) fn within(&self, point: Point, radius: f64) -> Option<&Tower> {
        self.entries
            .values()
            .find(|tower| tower.position.distance(point) < radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::GameConfig;

    fn basic() -> TowerTemplate {
        GameConfig::default().towers[0].clone()
    }

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let registry = TowerRegistry::new();
        assert!(registry.entries.is_empty());
        assert_eq!(registry.next_tower_id.get(), 0);
    }

    #[test]
    fn wrapped_identifier_counter_skips_live_towers() {
        let mut registry = TowerRegistry::new();
        let first = registry.insert(TemplateIndex::new(0), &basic(), Point::new(5.0, 5.0));
        registry.next_tower_id = TowerId::new(u32::MAX);

        let last = registry.insert(TemplateIndex::new(0), &basic(), Point::new(90.0, 5.0));
        let wrapped = registry.insert(TemplateIndex::new(0), &basic(), Point::new(180.0, 5.0));

        assert_eq!(first.get(), 0);
        assert_eq!(last.get(), u32::MAX);
        assert_eq!(wrapped.get(), 1);
        assert_eq!(registry.iter().count(), 3);
    }

    #[test]
    fn placed_tower_uses_template_base_stats() {
        let mut registry = TowerRegistry::new();
        let id = registry.insert(TemplateIndex::new(0), &basic(), Point::new(5.0, 5.0));
        let snapshot = registry.iter().next().expect("tower").snapshot();

        assert_eq!(snapshot.id, id);
        assert_eq!(snapshot.range, 120);
        assert_eq!(snapshot.damage, 10);
        assert_eq!(snapshot.cooldown_max, 25);
        assert_eq!(snapshot.cooldown_remaining, 0);
        assert_eq!(snapshot.level, 1);
        assert_eq!(snapshot.upgrade_cost, 60);
    }

    #[test]
    fn upgrades_follow_scaling_rules() {
        let rules = UpgradeRules::default();
        let mut tower = Tower::from_template(
            TowerId::new(0),
            TemplateIndex::new(0),
            &basic(),
            Point::new(0.0, 0.0),
        );

        tower.upgrade(&rules);
        let snapshot = tower.snapshot();
        assert_eq!(snapshot.level, 2);
        assert_eq!(snapshot.damage, 15);
        assert_eq!(snapshot.range, 129);
        assert_eq!(snapshot.cooldown_max, 22);
        assert_eq!(snapshot.upgrade_cost, 84);
    }

    #[test]
    fn upgrades_strictly_improve_until_max_level() {
        let rules = UpgradeRules::default();
        for template in GameConfig::default().towers {
            let mut tower = Tower::from_template(
                TowerId::new(0),
                TemplateIndex::new(0),
                &template,
                Point::new(0.0, 0.0),
            );
            while tower.can_upgrade(&rules) {
                let before = tower.snapshot();
                tower.upgrade(&rules);
                let after = tower.snapshot();
                assert!(after.damage > before.damage);
                assert!(after.range > before.range);
                assert!(after.upgrade_cost > before.upgrade_cost);
                assert!(
                    after.cooldown_max < before.cooldown_max
                        || after.cooldown_max == rules.min_cooldown
                );
            }
            assert_eq!(tower.level, 5);
        }
    }

    #[test]
    fn cooldown_floor_holds_for_rapid_towers() {
        let rules = UpgradeRules::default();
        let rapid = GameConfig::default().towers[1].clone();
        let mut tower = Tower::from_template(
            TowerId::new(0),
            TemplateIndex::new(1),
            &rapid,
            Point::new(0.0, 0.0),
        );
        let mut cooldowns = Vec::new();
        while tower.can_upgrade(&rules) {
            tower.upgrade(&rules);
            cooldowns.push(tower.cooldown_max);
        }
        assert_eq!(cooldowns, vec![7, 6, 5, 4]);
    }

    #[test]
    fn cooling_never_goes_negative() {
        let mut tower = Tower::from_template(
            TowerId::new(0),
            TemplateIndex::new(0),
            &basic(),
            Point::new(0.0, 0.0),
        );
        tower.cool();
        assert_eq!(tower.cooldown_remaining, 0);
        tower.rearm();
        assert_eq!(tower.cooldown_remaining, 25);
    }

    #[test]
    fn lookup_uses_strict_radius() {
        let mut registry = TowerRegistry::new();
        let id = registry.insert(TemplateIndex::new(0), &basic(), Point::new(100.0, 100.0));
        assert_eq!(
            registry.within(Point::new(110.0, 100.0), 20.0).map(|t| t.id),
            Some(id)
        );
        assert!(registry.within(Point::new(120.0, 100.0), 20.0).is_none());
    }
}
