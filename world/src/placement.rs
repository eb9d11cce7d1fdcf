//! Validation of tower placement requests.

use lane_defence_core::{PathModel, PlacementError, PlacementRules, Point, TowerTemplate};

use crate::{economy::Economy, towers::TowerRegistry};

/// Checks funds, road clearance and tower separation, in that order.
pub(crate) fn validate(
    economy: &Economy,
    path: &PathModel,
    towers: &TowerRegistry,
    rules: &PlacementRules,
    template: &TowerTemplate,
    position: Point,
) -> Result<(), PlacementError> {
    if economy.currency < template.cost {
        return Err(PlacementError::InsufficientFunds {
            cost: template.cost,
            available: economy.currency,
        });
    }

    if path.is_on_road(position, rules.road_clearance) {
        return Err(PlacementError::OnRoad);
    }

    if towers.within(position, rules.tower_separation).is_some() {
        return Err(PlacementError::TooCloseToTower);
    }

    Ok(())
}
