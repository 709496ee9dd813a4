//! Board representation.
//!
//! Provinces, units, orders and the board snapshot, plus the region graph
//! the planner propagates values over.

pub mod adjacency;
pub mod order;
pub mod province;
pub mod region;
pub mod state;
pub mod unit;

pub use adjacency::{AdjacencyEntry, ADJACENCIES, ADJACENCY_COUNT};
pub use order::{Location, Order, OrderUnit};
pub use province::{
    Coast, Power, Province, ProvinceInfo, ProvinceSet, ProvinceType, ALL_POWERS, ALL_PROVINCES, PROVINCE_COUNT,
    PROVINCE_INFO, SUPPLY_CENTER_COUNT,
};
pub use region::{MapGraph, Region, RegionId, MAP};
pub use state::{BoardState, DislodgedUnit, Phase, Season};
pub use unit::{Unit, UnitType};
