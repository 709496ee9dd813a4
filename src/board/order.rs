//! Order types produced by the planner.
//!
//! Covers the orders a power issues in each phase: hold, move and the two
//! support forms during movement, retreat or disband for dislodged units,
//! build, waive and remove during adjustment. The data model maps directly to
//! DSON (Diplomacy Standard Order Notation) for formatting and for reading
//! committed orders back in.

use super::province::{Coast, Province};
use super::unit::UnitType;

/// A location on the board: a province with an optional coast specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub province: Province,
    pub coast: Coast,
}

impl Location {
    /// Creates a location without a coast.
    pub fn new(province: Province) -> Self {
        Self { province, coast: Coast::None }
    }

    /// Creates a location with a coast specifier.
    pub fn with_coast(province: Province, coast: Coast) -> Self {
        Self { province, coast }
    }
}

/// A unit reference in an order: the unit type and its current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderUnit {
    pub unit_type: UnitType,
    pub location: Location,
}

/// A Diplomacy order for any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// Hold: `A vie H`
    Hold {
        unit: OrderUnit,
    },

    /// Move: `A bud - rum` or `F nrg - stp/nc`
    Move {
        unit: OrderUnit,
        dest: Location,
    },

    /// Support hold: `A tyr S A vie H`
    SupportHold {
        unit: OrderUnit,
        supported: OrderUnit,
    },

    /// Support move: `A gal S A bud - rum`
    SupportMove {
        unit: OrderUnit,
        supported: OrderUnit,
        dest: Location,
    },

    /// Retreat: `A vie R boh`
    Retreat {
        unit: OrderUnit,
        dest: Location,
    },

    /// Disband a dislodged unit: `F tri D`
    Disband {
        unit: OrderUnit,
    },

    /// Build: `A vie B` or `F stp/sc B`
    Build {
        unit: OrderUnit,
    },

    /// Waive: `W` (voluntarily skip one build)
    Waive,

    /// Remove a unit during adjustment: `A war D`
    Remove {
        unit: OrderUnit,
    },
}

impl Order {
    /// The unit the order is issued to, if any.
    pub fn unit(&self) -> Option<OrderUnit> {
        match *self {
            Order::Hold { unit }
            | Order::Move { unit, .. }
            | Order::SupportHold { unit, .. }
            | Order::SupportMove { unit, .. }
            | Order::Retreat { unit, .. }
            | Order::Disband { unit }
            | Order::Build { unit }
            | Order::Remove { unit } => Some(unit),
            Order::Waive => None,
        }
    }

    /// The province the ordered unit stands in.
    pub fn origin(&self) -> Option<Province> {
        self.unit().map(|u| u.location.province)
    }

    /// The province a move or retreat goes to.
    pub fn destination(&self) -> Option<Province> {
        match *self {
            Order::Move { dest, .. } | Order::Retreat { dest, .. } => Some(dest.province),
            _ => None,
        }
    }

    /// True for orders that keep the unit in place without helping anyone.
    pub fn is_hold(&self) -> bool {
        matches!(self, Order::Hold { .. })
    }

    /// True for Move orders.
    pub fn is_move(&self) -> bool {
        matches!(self, Order::Move { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::province::{Coast, Province};
    use crate::board::unit::UnitType;

    fn army(p: Province) -> OrderUnit {
        OrderUnit {
            unit_type: UnitType::Army,
            location: Location::new(p),
        }
    }

    #[test]
    fn location_new_has_no_coast() {
        let loc = Location::new(Province::Vie);
        assert_eq!(loc.province, Province::Vie);
        assert_eq!(loc.coast, Coast::None);
    }

    #[test]
    fn location_with_coast() {
        let loc = Location::with_coast(Province::Stp, Coast::North);
        assert_eq!(loc.province, Province::Stp);
        assert_eq!(loc.coast, Coast::North);
    }

    #[test]
    fn disband_and_remove_are_distinct() {
        let unit = army(Province::Vie);
        assert_ne!(Order::Disband { unit }, Order::Remove { unit });
    }

    #[test]
    fn origin_and_destination() {
        let mv = Order::Move {
            unit: army(Province::Bud),
            dest: Location::new(Province::Rum),
        };
        assert_eq!(mv.origin(), Some(Province::Bud));
        assert_eq!(mv.destination(), Some(Province::Rum));
        assert!(mv.is_move());

        let sup = Order::SupportMove {
            unit: army(Province::Gal),
            supported: army(Province::Bud),
            dest: Location::new(Province::Rum),
        };
        assert_eq!(sup.origin(), Some(Province::Gal));
        assert_eq!(sup.destination(), None);
    }

    #[test]
    fn waive_has_no_unit() {
        assert_eq!(Order::Waive.unit(), None);
        assert_eq!(Order::Waive.origin(), None);
    }
}
