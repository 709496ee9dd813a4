//! Board snapshot.
//!
//! Holds everything the planner reads for one phase: unit positions,
//! supply-center ownership, dislodged units, phase, season, and year.

use super::province::{Coast, Power, Province, ALL_PROVINCES, PROVINCE_COUNT};
use super::unit::{Unit, UnitType};

/// The season of a game turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Spring,
    Fall,
}

impl Season {
    /// Parses a season from its single-character DFEN abbreviation.
    pub fn from_dfen_char(c: char) -> Option<Season> {
        match c {
            's' => Some(Season::Spring),
            'f' => Some(Season::Fall),
            _ => None,
        }
    }
}

/// The phase within a game turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Movement,
    Retreat,
    Build,
}

impl Phase {
    /// Parses a phase from its single-character DFEN abbreviation.
    pub fn from_dfen_char(c: char) -> Option<Phase> {
        match c {
            'm' => Some(Phase::Movement),
            'r' => Some(Phase::Retreat),
            'b' => Some(Phase::Build),
            _ => None,
        }
    }
}

/// A dislodged unit with information about the attacking province.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DislodgedUnit {
    pub power: Power,
    pub unit_type: UnitType,
    pub coast: Coast,
    pub attacker_from: Province,
}

/// Complete board state at a point in time.
///
/// Uses fixed-size arrays indexed by `Province as usize` for O(1) lookup.
/// This avoids heap allocation and makes the state trivially copyable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub year: u16,
    pub season: Season,
    pub phase: Phase,
    /// Unit at each province: Some((power, unit_type)) or None.
    pub units: [Option<(Power, UnitType)>; PROVINCE_COUNT],
    /// Coast for fleet units on split-coast provinces.
    pub fleet_coast: [Option<Coast>; PROVINCE_COUNT],
    /// Supply center owner: None if not an SC or if neutral.
    pub sc_owner: [Option<Power>; PROVINCE_COUNT],
    /// Dislodged units awaiting retreat orders.
    pub dislodged: [Option<DislodgedUnit>; PROVINCE_COUNT],
}

impl BoardState {
    /// Creates an empty board state with no units or ownership.
    pub fn empty(year: u16, season: Season, phase: Phase) -> Self {
        BoardState {
            year,
            season,
            phase,
            units: [None; PROVINCE_COUNT],
            fleet_coast: [None; PROVINCE_COUNT],
            sc_owner: [None; PROVINCE_COUNT],
            dislodged: [None; PROVINCE_COUNT],
        }
    }

    /// Places a unit on the board. Returns false if the province is already occupied.
    pub fn place_unit(&mut self, province: Province, power: Power, unit_type: UnitType, coast: Coast) -> bool {
        let idx = province as usize;
        if self.units[idx].is_some() {
            return false;
        }
        self.units[idx] = Some((power, unit_type));
        if coast != Coast::None {
            self.fleet_coast[idx] = Some(coast);
        }
        true
    }

    /// Sets supply center ownership for a province.
    pub fn set_sc_owner(&mut self, province: Province, owner: Option<Power>) {
        self.sc_owner[province as usize] = owner;
    }

    /// Records a dislodged unit at a province.
    pub fn set_dislodged(&mut self, province: Province, dislodged: DislodgedUnit) {
        self.dislodged[province as usize] = Some(dislodged);
    }

    /// Returns the unit standing in a province.
    pub fn unit_at(&self, province: Province) -> Option<Unit> {
        let idx = province as usize;
        self.units[idx].map(|(power, unit_type)| Unit {
            unit_type,
            power,
            province,
            coast: self.fleet_coast[idx].unwrap_or(Coast::None),
        })
    }

    /// Iterates every unit on the board in province order.
    pub fn all_units(&self) -> impl Iterator<Item = Unit> + '_ {
        ALL_PROVINCES.iter().filter_map(move |&p| self.unit_at(p))
    }

    /// Iterates the dislodged units of one power in province order.
    pub fn dislodged_of(&self, power: Power) -> impl Iterator<Item = (Province, DislodgedUnit)> + '_ {
        ALL_PROVINCES
            .iter()
            .filter_map(move |&p| self.dislodged[p as usize].map(|d| (p, d)))
            .filter(move |(_, d)| d.power == power)
    }

    /// Number of supply centers owned by `power`.
    pub fn sc_count(&self, power: Power) -> usize {
        self.sc_owner.iter().filter(|o| **o == Some(power)).count()
    }

    /// Number of units `power` has on the board.
    pub fn unit_count(&self, power: Power) -> usize {
        self.units.iter().filter(|u| matches!(u, Some((p, _)) if *p == power)).count()
    }

    /// Builds (positive) or removals (negative) owed by `power` this adjustment.
    pub fn adjustment(&self, power: Power) -> i32 {
        self.sc_count(power) as i32 - self.unit_count(power) as i32
    }
}
