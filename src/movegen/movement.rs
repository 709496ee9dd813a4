//! Movement-phase candidates.

use crate::board::{MapGraph, ProvinceSet, RegionId};

/// Regions a unit in `unit` may target this turn: every adjacent region
/// outside `blocked`, followed by the unit's own region (the hold).
///
/// The hold is always present, even when the unit's own province is blocked.
pub fn move_regions(map: &MapGraph, unit: RegionId, blocked: &ProvinceSet) -> Vec<RegionId> {
    let adjacent = map.adjacent(unit);
    let mut out = Vec::with_capacity(adjacent.len() + 1);
    out.extend(
        adjacent
            .iter()
            .copied()
            .filter(|&r| !blocked.contains(map.province(r))),
    );
    out.push(unit);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Coast, Province, UnitType, MAP};

    fn army(p: Province) -> RegionId {
        MAP.find(p, UnitType::Army, Coast::None).unwrap()
    }

    #[test]
    fn includes_neighbors_and_hold() {
        let vie = army(Province::Vie);
        let regions = move_regions(&MAP, vie, &ProvinceSet::new());
        assert_eq!(regions.len(), 6);
        assert_eq!(*regions.last().unwrap(), vie);
    }

    #[test]
    fn blocked_provinces_are_skipped() {
        let vie = army(Province::Vie);
        let blocked: ProvinceSet = [Province::Tyr, Province::Boh].into_iter().collect();
        let provinces: Vec<Province> = move_regions(&MAP, vie, &blocked)
            .into_iter()
            .map(|r| MAP.province(r))
            .collect();
        assert!(!provinces.contains(&Province::Tyr));
        assert!(!provinces.contains(&Province::Boh));
        assert_eq!(provinces.len(), 4);
    }

    #[test]
    fn hold_survives_blocking_own_province() {
        let vie = army(Province::Vie);
        let blocked: ProvinceSet = [Province::Vie].into_iter().collect();
        assert!(move_regions(&MAP, vie, &blocked).contains(&vie));
    }

    #[test]
    fn fleet_candidates_follow_its_coast() {
        let stp_nc = MAP.find(Province::Stp, UnitType::Fleet, Coast::North).unwrap();
        let provinces: Vec<Province> = move_regions(&MAP, stp_nc, &ProvinceSet::new())
            .into_iter()
            .map(|r| MAP.province(r))
            .collect();
        assert!(provinces.contains(&Province::Bar));
        assert!(!provinces.contains(&Province::Bot));
    }
}
