//! Text formats at the edges of the planner.
//!
//! DFEN carries board snapshots in, DSON carries orders out (and committed
//! orders in).

pub mod dfen;
pub mod dson;

pub use dfen::{parse_dfen, DfenError};
pub use dson::{format_order, format_orders, parse_order, parse_orders, DsonError};
