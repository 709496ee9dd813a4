//! Planner tuning.
//!
//! Every constant the planner uses is gathered in `PlannerConfig`. The
//! `Default` impl carries the tuned values; a JSON file may override any
//! subset of them (missing fields fall back to the defaults).
//!
//! ```json
//! { "decay": 4.0, "fall": { "attack": 650.0, "defense": 350.0 } }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::state::{Phase, Season};

/// Number of proximity rings propagated per region.
pub const PROXIMITY_RINGS: usize = 10;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("proximity decay must be a positive finite number, got {0}")]
    InvalidDecay(f32),
}

/// Weights applied while valuing regions for one kind of phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseWeights {
    /// Ring-0 multiplier for a province's attack value.
    pub attack: f32,
    /// Ring-0 multiplier for a province's defense value.
    pub defense: f32,
    /// Multiplier per proximity ring, nearest first.
    pub proximity: [f32; PROXIMITY_RINGS],
    /// Bonus per own unit adjacent to the province.
    pub strength: i64,
    /// Penalty per unit of the strongest rival adjacent to the province.
    pub competition: i64,
    /// Adjustment phases only: multiplier for the province's defense value.
    pub defense_value: f32,
}

impl Default for PhaseWeights {
    fn default() -> Self {
        PhaseWeights {
            attack: 700.0,
            defense: 300.0,
            proximity: [1000.0, 100.0, 30.0, 10.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0],
            strength: 1000,
            competition: 1000,
            defense_value: 1000.0,
        }
    }
}

impl PhaseWeights {
    /// Spring movement and retreats: the next-door ring counts most.
    pub fn spring() -> Self {
        PhaseWeights {
            proximity: [100.0, 1000.0, 30.0, 10.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0],
            ..Default::default()
        }
    }

    /// Fall movement and retreats: centers about to change hands count most.
    pub fn fall() -> Self {
        PhaseWeights {
            attack: 600.0,
            defense: 400.0,
            ..Default::default()
        }
    }

    /// Adjustment phase with builds owed.
    pub fn build() -> Self {
        PhaseWeights::default()
    }

    /// Adjustment phase with removals owed.
    pub fn remove() -> Self {
        PhaseWeights::default()
    }
}

/// Complete planner tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub spring: PhaseWeights,
    pub fall: PhaseWeights,
    pub build: PhaseWeights,
    pub remove: PhaseWeights,
    /// Divisor applied to each proximity ring as it spreads outward.
    pub decay: f32,
    /// Percent chance of considering the next candidate at all.
    pub skip_chance: u32,
    /// Scale of the value gap that makes the next candidate unattractive.
    pub gap_scale: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            spring: PhaseWeights::spring(),
            fall: PhaseWeights::fall(),
            build: PhaseWeights::build(),
            remove: PhaseWeights::remove(),
            decay: 5.0,
            skip_chance: 50,
            gap_scale: 500.0,
        }
    }
}

impl PlannerConfig {
    /// Loads and validates a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
    }

    /// Parses and validates a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that would make propagation meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.decay.is_finite() || self.decay <= 0.0 {
            return Err(ConfigError::InvalidDecay(self.decay));
        }
        Ok(())
    }

    /// Selects the weight table for a phase.
    ///
    /// Adjustment phases pick `remove` when the power owes removals and
    /// `build` otherwise.
    pub fn weights_for(&self, season: Season, phase: Phase, adjustment: i32) -> &PhaseWeights {
        match (phase, season) {
            (Phase::Build, _) if adjustment < 0 => &self.remove,
            (Phase::Build, _) => &self.build,
            (_, Season::Spring) => &self.spring,
            (_, Season::Fall) => &self.fall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_tuned_tables() {
        let config = PlannerConfig::default();
        assert_eq!(config.spring.proximity[0], 100.0);
        assert_eq!(config.spring.proximity[1], 1000.0);
        assert_eq!(config.fall.proximity[0], 1000.0);
        assert_eq!((config.spring.attack, config.spring.defense), (700.0, 300.0));
        assert_eq!((config.fall.attack, config.fall.defense), (600.0, 400.0));
        assert_eq!((config.build.attack, config.build.defense), (700.0, 300.0));
        assert_eq!(config.remove.defense_value, 1000.0);
        assert_eq!(config.decay, 5.0);
        assert_eq!(config.skip_chance, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = PlannerConfig::from_json(r#"{ "decay": 4.0, "fall": { "attack": 650.0 } }"#).unwrap();
        assert_eq!(config.decay, 4.0);
        assert_eq!(config.fall.attack, 650.0);
        // fields missing from a nested table come from PhaseWeights::default
        assert_eq!(config.fall.defense, 300.0);
        assert_eq!(config.spring, PhaseWeights::spring());
    }

    #[test]
    fn rejects_bad_decay() {
        assert!(matches!(
            PlannerConfig::from_json(r#"{ "decay": 0.0 }"#),
            Err(ConfigError::InvalidDecay(_))
        ));
        assert!(matches!(
            PlannerConfig::from_json(r#"{ "decay": -2.5 }"#),
            Err(ConfigError::InvalidDecay(_))
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(PlannerConfig::from_json("{ decay"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            PlannerConfig::from_json(r#"{ "spring": { "proximity": [1, 2] } }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PlannerConfig::load(Path::new("/nonexistent/envoy.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn weight_selection_by_phase() {
        let config = PlannerConfig::default();
        assert_eq!(config.weights_for(Season::Spring, Phase::Movement, 0), &config.spring);
        assert_eq!(config.weights_for(Season::Fall, Phase::Retreat, 0), &config.fall);
        assert_eq!(config.weights_for(Season::Fall, Phase::Build, 2), &config.build);
        assert_eq!(config.weights_for(Season::Fall, Phase::Build, -1), &config.remove);
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let config = PlannerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(PlannerConfig::from_json(&json).unwrap(), config);
    }
}
