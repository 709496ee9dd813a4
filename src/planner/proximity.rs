//! Ring-indexed influence propagation.
//!
//! Ring 0 of a region is the weighted attack/defense value of its province.
//! Each further ring spreads the previous ring one step across the region
//! graph and divides by the decay, so ring k of a region measures how much
//! value lies about k moves away. Rings are swept synchronously: ring k is
//! finished for every region before ring k+1 starts.

use crate::board::{MapGraph, Province, RegionId};
use crate::config::{PhaseWeights, PROXIMITY_RINGS};

use super::value::ValueModel;

/// Proximity rings for every region, indexed by `RegionId::index()`.
#[derive(Debug, Clone)]
pub struct ProximityField {
    rings: Vec<[f32; PROXIMITY_RINGS]>,
}

impl ProximityField {
    pub fn compute(map: &MapGraph, values: &ValueModel, weights: &PhaseWeights, decay: f32) -> Self {
        let mut rings = vec![[0.0f32; PROXIMITY_RINGS]; map.len()];

        for r in map.ids() {
            let prov = map.province(r);
            rings[r.index()][0] =
                values.attack(prov) as f32 * weights.attack + values.defense(prov) as f32 * weights.defense;
        }

        // best value seen per split-coast province among one region's neighbors
        let mut coast_best: Vec<(Province, f32)> = Vec::with_capacity(2);
        for k in 1..PROXIMITY_RINGS {
            for r in map.ids() {
                let mut total = rings[r.index()][k - 1];
                coast_best.clear();
                for &n in map.adjacent(r) {
                    let v = rings[n.index()][k - 1];
                    let region = map.region(n);
                    if !region.is_coast_variant() {
                        total += v;
                        continue;
                    }
                    match coast_best.iter_mut().find(|(p, _)| *p == region.province) {
                        Some(best) => best.1 = best.1.max(v),
                        None => coast_best.push((region.province, v)),
                    }
                }
                total += coast_best.iter().map(|(_, v)| v).sum::<f32>();
                rings[r.index()][k] = total / decay;
            }
        }

        ProximityField { rings }
    }

    /// All rings of a region, nearest first.
    #[inline]
    pub fn rings(&self, region: RegionId) -> &[f32; PROXIMITY_RINGS] {
        &self.rings[region.index()]
    }

    #[inline]
    pub fn ring(&self, region: RegionId, k: usize) -> f32 {
        self.rings[region.index()][k]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardState, Coast, Phase, Power, Season, UnitType, MAP};
    use crate::config::PlannerConfig;
    use crate::planner::locate_all;

    fn field_for(state: &BoardState, power: Power) -> ProximityField {
        let config = PlannerConfig::default();
        let placed = locate_all(&MAP, state).unwrap();
        let values = ValueModel::compute(power, state, &MAP, &placed);
        ProximityField::compute(&MAP, &values, &config.spring, config.decay)
    }

    fn army(p: Province) -> RegionId {
        MAP.find(p, UnitType::Army, Coast::None).unwrap()
    }

    #[test]
    fn empty_board_is_all_zero() {
        let state = BoardState::empty(1901, Season::Spring, Phase::Movement);
        let field = field_for(&state, Power::Austria);
        for r in MAP.ids() {
            assert!(field.rings(r).iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn ring_zero_mixes_attack_weight() {
        let mut state = BoardState::empty(1901, Season::Spring, Phase::Movement);
        state.set_sc_owner(Province::Ven, Some(Power::Italy));
        let field = field_for(&state, Power::Austria);
        // size(1) = 21, spring attack weight 700
        assert_eq!(field.ring(army(Province::Ven), 0), 21.0 * 700.0);
        assert_eq!(field.ring(army(Province::Tyr), 0), 0.0);
    }

    #[test]
    fn ring_one_spreads_with_decay() {
        let mut state = BoardState::empty(1901, Season::Spring, Phase::Movement);
        state.set_sc_owner(Province::Ven, Some(Power::Italy));
        let field = field_for(&state, Power::Austria);
        let ven0 = 21.0 * 700.0;
        // Tyrolia borders Venice once; Venice keeps its own ring-0 value.
        assert_eq!(field.ring(army(Province::Tyr), 1), ven0 / 5.0);
        assert_eq!(field.ring(army(Province::Ven), 1), ven0 / 5.0);
        // Vienna is two steps away.
        assert_eq!(field.ring(army(Province::Vie), 1), 0.0);
        assert!(field.ring(army(Province::Vie), 2) > 0.0);
    }

    #[test]
    fn split_coast_neighbor_counts_once() {
        let mut state = BoardState::empty(1901, Season::Spring, Phase::Movement);
        state.set_sc_owner(Province::Bul, Some(Power::Turkey));
        let field = field_for(&state, Power::Russia);

        let con = MAP.find(Province::Con, UnitType::Fleet, Coast::None).unwrap();
        let bul_ec = MAP.find(Province::Bul, UnitType::Fleet, Coast::East).unwrap();
        // Con borders both Bulgarian coasts; only one of them may contribute.
        let expected = field.ring(bul_ec, 0) / 5.0;
        assert_eq!(field.ring(con, 1), expected);
    }

    #[test]
    fn far_regions_only_light_up_in_outer_rings() {
        let mut state = BoardState::empty(1901, Season::Spring, Phase::Movement);
        state.set_sc_owner(Province::Mos, Some(Power::Russia));
        let field = field_for(&state, Power::Austria);
        let war = field.rings(army(Province::War));
        assert_eq!(war[0], 0.0);
        assert!(war[1] > 0.0);
        // Mos -> Ukr -> Gal -> Vie: three steps
        let vie = field.rings(army(Province::Vie));
        assert_eq!(vie[2], 0.0);
        assert!(vie[3] > 0.0);
    }
}
