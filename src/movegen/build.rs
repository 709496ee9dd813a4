//! Adjustment-phase build sites.

use crate::board::{BoardState, MapGraph, Power, ProvinceSet, RegionId, ALL_PROVINCES};

/// Every region a power may build in: all regions of its home supply
/// centers that it still owns and that stand empty, minus `blocked`.
///
/// Coastal centers yield both an army and a fleet region; split-coast
/// centers yield one fleet region per coast.
pub fn build_regions(
    map: &MapGraph,
    power: Power,
    state: &BoardState,
    blocked: &ProvinceSet,
) -> Vec<RegionId> {
    ALL_PROVINCES
        .iter()
        .copied()
        .filter(|&p| {
            p.is_supply_center()
                && p.home_power() == Some(power)
                && state.sc_owner[p as usize] == Some(power)
                && state.units[p as usize].is_none()
                && !blocked.contains(p)
        })
        .flat_map(|p| map.regions_of(p).iter().copied())
        .collect()
}
