//! Candidate generation.
//!
//! Enumerates the regions a planned order may target in each phase: move
//! destinations, retreat destinations and build sites. Candidates are plain
//! region lists; ranking and selection happen in the planner.

pub mod build;
pub mod movement;
pub mod retreat;

pub use build::build_regions;
pub use movement::move_regions;
pub use retreat::retreat_regions;
