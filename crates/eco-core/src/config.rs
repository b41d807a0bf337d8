//! Configuration types for the simulation.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Field dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of rows
    pub depth: i32,
    /// Number of columns
    pub width: i32,
}

impl FieldConfig {
    pub const DEFAULT_DEPTH: i32 = 150;
    pub const DEFAULT_WIDTH: i32 = 150;

    /// Replace non-positive dimensions with the defaults.
    pub fn sanitized(self) -> Self {
        if self.depth <= 0 || self.width <= 0 {
            warn!(
                depth = self.depth,
                width = self.width,
                "The dimensions must be greater than zero, using default values"
            );
            return Self::default();
        }
        self
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            depth: Self::DEFAULT_DEPTH,
            width: Self::DEFAULT_WIDTH,
        }
    }
}

/// Time of day and weather cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Simulation steps per hour of simulated time
    pub steps_per_hour: u64,
    /// Weather is rerolled on hours that are a multiple of this
    pub weather_change_interval: u32,
    /// Hour the clock shows at step zero
    pub start_hour: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            steps_per_hour: 25,
            weather_change_interval: 6,
            start_hour: 0,
        }
    }
}

/// Cell fill probabilities used when populating the field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub herbivore_creation_probability: f64,
    pub berry_creation_probability: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            herbivore_creation_probability: 0.08,
            berry_creation_probability: 0.035,
        }
    }
}

/// Rabbit species constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HerbivoreConfig {
    /// Age at which a rabbit can start to breed
    pub breeding_age: u32,
    /// Age beyond which a rabbit dies
    pub max_age: u32,
    /// Likelihood of a breeding attempt succeeding
    pub breeding_probability: f64,
    /// Maximum number of births per litter
    pub max_litter_size: u32,
    /// Food level restored by eating one berry
    pub food_value: u32,
    /// Accumulated toxin a rabbit survives
    pub toxin_immunity: u32,
}

impl Default for HerbivoreConfig {
    fn default() -> Self {
        Self {
            breeding_age: 5,
            max_age: 50,
            breeding_probability: 0.28,
            max_litter_size: 5,
            food_value: 9,
            toxin_immunity: 60,
        }
    }
}

/// Berry bush constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BerryConfig {
    /// Age beyond which a bush withers
    pub max_age: u32,
    /// Chance per daylight step of seeding a neighbouring cell
    pub seeding_probability: f64,
    /// Seeding chance multiplier while it rains
    pub rain_seeding_multiplier: f64,
    /// Upper bound (inclusive) of a berry's toxin content
    pub max_toxin: u32,
}

impl Default for BerryConfig {
    fn default() -> Self {
        Self {
            max_age: 60,
            seeding_probability: 0.05,
            rain_seeding_multiplier: 2.0,
            max_toxin: 10,
        }
    }
}

/// Simulation run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Number of steps for a full run
    pub num_steps: u64,
    /// Cosmetic pause between steps (milliseconds, 0 disables)
    pub step_delay_ms: u64,
    pub field: FieldConfig,
    pub clock: ClockConfig,
    pub population: PopulationConfig,
    pub herbivore: HerbivoreConfig,
    pub berry: BerryConfig,
}

impl SimulationConfig {
    pub const LONG_RUN_STEPS: u64 = 4200;

    /// Load a (possibly partial) configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_steps: Self::LONG_RUN_STEPS,
            step_delay_ms: 0,
            field: FieldConfig::default(),
            clock: ClockConfig::default(),
            population: PopulationConfig::default(),
            herbivore: HerbivoreConfig::default(),
            berry: BerryConfig::default(),
        }
    }
}
