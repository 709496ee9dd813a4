//! Strength and competition around each province.
//!
//! Strength counts the planning power's units that could enter the
//! province next turn; competition is the same count for the strongest
//! rival.

use crate::board::{MapGraph, Power, Province, ALL_PROVINCES, PROVINCE_COUNT};

use super::PlacedUnit;

/// Per-province unit counts bordering each province.
#[derive(Debug, Clone)]
pub struct Contest {
    strength: [u32; PROVINCE_COUNT],
    competition: [u32; PROVINCE_COUNT],
}

impl Contest {
    pub fn compute(power: Power, map: &MapGraph, placed: &[PlacedUnit]) -> Self {
        let mut strength = [0u32; PROVINCE_COUNT];
        let mut competition = [0u32; PROVINCE_COUNT];

        for &prov in ALL_PROVINCES.iter() {
            let mut counts = [0u32; 7];
            for u in placed.iter().filter(|u| map.touches(prov, u.region)) {
                counts[u.power as usize] += 1;
            }
            let idx = prov as usize;
            strength[idx] = counts[power as usize];
            competition[idx] = counts
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != power as usize)
                .map(|(_, &c)| c)
                .max()
                .unwrap_or(0);
        }

        Contest { strength, competition }
    }

    #[inline]
    pub fn strength(&self, prov: Province) -> u32 {
        self.strength[prov as usize]
    }

    #[inline]
    pub fn competition(&self, prov: Province) -> u32 {
        self.competition[prov as usize]
    }
}
