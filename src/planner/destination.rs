//! One ranking value per region.
//!
//! The weighted proximity sum is accumulated in `f32` and truncated to an
//! integer after every ring term, then the integer contest (movement and
//! retreats) or defense (adjustment) term is added.

use crate::board::{MapGraph, RegionId};
use crate::config::PhaseWeights;

use super::contest::Contest;
use super::proximity::ProximityField;
use super::value::ValueModel;

/// Destination value of every region, indexed by `RegionId::index()`.
#[derive(Debug, Clone)]
pub struct DestinationValues {
    values: Vec<i64>,
}

fn proximity_sum(proximity: &ProximityField, weights: &PhaseWeights, region: RegionId) -> i64 {
    proximity
        .rings(region)
        .iter()
        .zip(weights.proximity.iter())
        .fold(0i64, |acc, (&ring, &w)| (acc as f32 + ring * w) as i64)
}

impl DestinationValues {
    /// Values for movement and retreat phases.
    pub fn movement(
        map: &MapGraph,
        proximity: &ProximityField,
        contest: &Contest,
        weights: &PhaseWeights,
    ) -> Self {
        let values = map
            .ids()
            .map(|r| {
                let prov = map.province(r);
                proximity_sum(proximity, weights, r) + weights.strength * contest.strength(prov) as i64
                    - weights.competition * contest.competition(prov) as i64
            })
            .collect();
        DestinationValues { values }
    }

    /// Values for adjustment phases.
    pub fn adjustment(
        map: &MapGraph,
        proximity: &ProximityField,
        model: &ValueModel,
        weights: &PhaseWeights,
    ) -> Self {
        let values = map
            .ids()
            .map(|r| {
                let defense = model.defense(map.province(r)) as f32 * weights.defense_value;
                (proximity_sum(proximity, weights, r) as f32 + defense) as i64
            })
            .collect();
        DestinationValues { values }
    }

    #[inline]
    pub fn get(&self, region: RegionId) -> i64 {
        self.values[region.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardState, Coast, Phase, Power, Province, Season, UnitType, MAP};
    use crate::config::PlannerConfig;
    use crate::planner::locate_all;

    fn army(p: Province) -> RegionId {
        MAP.find(p, UnitType::Army, Coast::None).unwrap()
    }

    #[test]
    fn movement_value_adds_strength_and_subtracts_competition() {
        let mut state = BoardState::empty(1901, Season::Fall, Phase::Movement);
        state.place_unit(Province::Bud, Power::Austria, UnitType::Army, Coast::None);
        state.place_unit(Province::Ukr, Power::Russia, UnitType::Army, Coast::None);
        state.place_unit(Province::Sev, Power::Russia, UnitType::Army, Coast::None);

        let config = PlannerConfig::default();
        let placed = locate_all(&MAP, &state).unwrap();
        let model = ValueModel::compute(Power::Austria, &state, &MAP, &placed);
        let field = ProximityField::compute(&MAP, &model, &config.fall, config.decay);
        let contest = Contest::compute(Power::Austria, &MAP, &placed);
        let values = DestinationValues::movement(&MAP, &field, &contest, &config.fall);

        // No centers are owned, so only the contest term remains.
        assert_eq!(values.get(army(Province::Rum)), 1000 - 2000);
        assert_eq!(values.get(army(Province::Tri)), 1000);
        assert_eq!(values.get(army(Province::Mos)), -2000);
    }

    #[test]
    fn adjustment_value_adds_defense() {
        let mut state = BoardState::empty(1901, Season::Fall, Phase::Build);
        state.set_sc_owner(Province::Vie, Some(Power::Austria));
        state.place_unit(Province::Boh, Power::Germany, UnitType::Army, Coast::None);

        let config = PlannerConfig::default();
        let placed = locate_all(&MAP, &state).unwrap();
        let model = ValueModel::compute(Power::Austria, &state, &MAP, &placed);
        let field = ProximityField::compute(&MAP, &model, &config.build, config.decay);
        let values = DestinationValues::adjustment(&MAP, &field, &model, &config.build);

        // defense 16 (Germany owns nothing): ring 0 = 16 * 300, weighted by 1000,
        // plus the defense term 16 * 1000, plus the outer rings.
        let vie = values.get(army(Province::Vie));
        assert!(vie >= 16 * 300 * 1000 + 16 * 1000);
        // Vienna is landlocked, so its value never reaches the fleet graph.
        let nth = MAP.find(Province::Nth, UnitType::Fleet, Coast::None).unwrap();
        assert_eq!(values.get(nth), 0);
    }

    #[test]
    fn proximity_sum_truncates_each_term() {
        let mut state = BoardState::empty(1901, Season::Spring, Phase::Movement);
        state.set_sc_owner(Province::Ven, Some(Power::Italy));
        let config = PlannerConfig::default();
        let placed = locate_all(&MAP, &state).unwrap();
        let model = ValueModel::compute(Power::Austria, &state, &MAP, &placed);
        let field = ProximityField::compute(&MAP, &model, &config.spring, config.decay);

        let r = army(Province::Boh);
        let mut expected = 0i64;
        for (ring, w) in field.rings(r).iter().zip(config.spring.proximity.iter()) {
            expected = (expected as f32 + ring * w) as i64;
        }
        assert_eq!(proximity_sum(&field, &config.spring, r), expected);
    }
}
