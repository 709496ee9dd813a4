//! Attack and defense values of supply centers.
//!
//! A center the planning power owns is worth defending in proportion to the
//! strongest rival that borders it. Any other center is worth attacking in
//! proportion to the strength of its owner. Provinces without a center are
//! worth nothing either way.

use crate::board::{BoardState, MapGraph, Power, Province, ALL_POWERS, ALL_PROVINCES, PROVINCE_COUNT};

use super::PlacedUnit;

/// Strength of a power owning `centers` supply centers.
///
/// Grows quadratically so a large power is much more threatening (and much
/// more tempting to attack) than two small ones.
pub fn power_size(centers: usize) -> i64 {
    let n = centers as i64;
    n * n + 4 * n + 16
}

/// Per-province attack and defense values.
#[derive(Debug, Clone)]
pub struct ValueModel {
    attack: [i64; PROVINCE_COUNT],
    defense: [i64; PROVINCE_COUNT],
}

impl ValueModel {
    pub fn compute(power: Power, state: &BoardState, map: &MapGraph, placed: &[PlacedUnit]) -> Self {
        let mut sizes = [0i64; 7];
        for p in ALL_POWERS {
            sizes[p as usize] = power_size(state.sc_count(p));
        }

        let mut attack = [0i64; PROVINCE_COUNT];
        let mut defense = [0i64; PROVINCE_COUNT];

        for &prov in ALL_PROVINCES.iter().filter(|p| p.is_supply_center()) {
            let idx = prov as usize;
            match state.sc_owner[idx] {
                Some(owner) if owner == power => {
                    defense[idx] = placed
                        .iter()
                        .filter(|u| u.power != power && map.touches(prov, u.region))
                        .map(|u| sizes[u.power as usize])
                        .max()
                        .unwrap_or(0);
                }
                Some(owner) => attack[idx] = sizes[owner as usize],
                None => {}
            }
        }

        ValueModel { attack, defense }
    }

    #[inline]
    pub fn attack(&self, prov: Province) -> i64 {
        self.attack[prov as usize]
    }

    #[inline]
    pub fn defense(&self, prov: Province) -> i64 {
        self.defense[prov as usize]
    }
}
