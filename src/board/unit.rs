//! Unit types and placed units.

use super::province::{Coast, Power, Province};

/// The type of a military unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitType {
    Army,
    Fleet,
}

impl UnitType {
    /// Returns the uppercase DSON abbreviation used in order notation.
    pub const fn dson_char(self) -> char {
        match self {
            UnitType::Army => 'A',
            UnitType::Fleet => 'F',
        }
    }

    /// Parses a unit type from its lowercase DFEN abbreviation.
    pub fn from_dfen_char(c: char) -> Option<UnitType> {
        match c {
            'a' => Some(UnitType::Army),
            'f' => Some(UnitType::Fleet),
            _ => None,
        }
    }
}

/// A unit standing on the board, as read back from a `BoardState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Unit {
    pub unit_type: UnitType,
    pub power: Power,
    pub province: Province,
    pub coast: Coast,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_type_chars() {
        assert_eq!(UnitType::from_dfen_char('a'), Some(UnitType::Army));
        assert_eq!(UnitType::from_dfen_char('f'), Some(UnitType::Fleet));
        assert_eq!(UnitType::from_dfen_char('A'), None);
        assert_eq!(UnitType::Fleet.dson_char(), 'F');
    }
}
