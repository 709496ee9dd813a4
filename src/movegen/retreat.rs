//! Retreat-phase candidates.

use crate::board::{BoardState, MapGraph, Province, ProvinceSet, RegionId};

/// Regions a dislodged unit in `unit` may retreat to.
///
/// A retreat must go to an adjacent region whose province is empty, is not
/// the province the attack came from, and is not in `blocked`. An empty
/// result means the unit can only disband.
pub fn retreat_regions(
    map: &MapGraph,
    state: &BoardState,
    unit: RegionId,
    attacker_from: Province,
    blocked: &ProvinceSet,
) -> Vec<RegionId> {
    map.adjacent(unit)
        .iter()
        .copied()
        .filter(|&r| {
            let prov = map.province(r);
            prov != attacker_from
                && state.units[prov as usize].is_none()
                && !blocked.contains(prov)
        })
        .collect()
}
