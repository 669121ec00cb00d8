//! Simulation configuration with documented constants
//!
//! All tuning numbers are collected here with explanations of their purpose
//! and how they interact with each other. Values can be overridden from a
//! TOML file; any key left out keeps its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Configuration for the simulation systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === GRID ===
    /// Size of one grid cell in world units (pixels)
    ///
    /// World position `(px, py)` lies in cell `(floor(px / cell), floor(py / cell))`.
    pub cell_size: f32,

    /// Grid width in cells
    ///
    /// The default covers an 800 px wide field (800 / 15 = 53 cells).
    pub grid_width: i32,

    /// Grid height in cells
    ///
    /// The default covers a 600 px tall field (600 / 15 = 40 cells).
    pub grid_height: i32,

    // === MOVEMENT ===
    /// Citizen walking speed in world units per second
    pub citizen_speed: f32,

    /// Distance at which a citizen snaps onto the next path point
    ///
    /// Below this, a normal step would only jitter around the target.
    pub arrival_epsilon: f32,

    // === WORK ===
    /// Job progress gained per second while a citizen stands on the job cell
    ///
    /// At 0.9 a job completes in a little over one second of work.
    pub work_rate: f32,

    /// Priority given to building jobs
    pub building_job_priority: u8,

    // === NEEDS ===
    /// Hunger gained per second
    ///
    /// At 0.1 a fed citizen crosses the default threshold after 5 seconds.
    pub hunger_rate: f32,

    /// Hunger above which a citizen drops its work and goes to eat
    pub hunger_threshold: f32,

    /// Energy assigned to new citizens; only citizens with energy > 0 are scheduled
    pub starting_energy: f32,

    // === SCHEDULING ===
    /// Weight of the candidate-to-current-job leg in the detour score
    ///
    /// score = d(citizen, candidate) + detour_weight * d(candidate, current)
    pub detour_weight: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cell_size: 15.0,
            grid_width: 53,
            grid_height: 40,

            citizen_speed: 200.0,
            arrival_epsilon: 1.0,

            work_rate: 0.9,
            building_job_priority: 5,

            hunger_rate: 0.1,
            hunger_threshold: 0.5,
            starting_energy: 100.0,

            detour_weight: 0.5,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    ///
    /// Grid dimensions are checked when the grid is built, so they surface
    /// as `InvalidDimensions` rather than here.
    pub fn validate(&self) -> Result<()> {
        if self.citizen_speed <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "citizen_speed ({}) must be positive",
                self.citizen_speed
            )));
        }

        if self.work_rate <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "work_rate ({}) must be positive",
                self.work_rate
            )));
        }

        if self.hunger_rate < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "hunger_rate ({}) must not be negative",
                self.hunger_rate
            )));
        }

        if self.arrival_epsilon < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "arrival_epsilon ({}) must not be negative",
                self.arrival_epsilon
            )));
        }

        Ok(())
    }
}
