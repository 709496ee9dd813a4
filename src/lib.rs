//! Envoy: a single-turn order planner for Diplomacy.
//!
//! Given a DFEN board snapshot and a power, the planner produces that
//! power's orders for the current phase. Exposes the board representation,
//! candidate generation, planner and protocol modules for the binary entry
//! point, integration tests and benchmarks.

pub mod board;
pub mod config;
pub mod movegen;
pub mod planner;
pub mod protocol;

pub use config::{ConfigError, PhaseWeights, PlannerConfig};
pub use planner::{plan_all, plan_orders, Commitments, PlanError, Planner};
