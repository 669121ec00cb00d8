//! Component types attachable to entities

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;
use crate::ecs::world::Entity;

/// World-space position in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn distance(&self, other: &Position) -> f32 {
        self.as_vec2().distance(&other.as_vec2())
    }
}

impl From<Vec2> for Position {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// A simulated worker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Citizen {
    /// 0.0 = fed; grows every tick until an eating job completes
    pub hunger: f32,
    /// Scheduling gate: only citizens with energy > 0 receive jobs
    pub energy: f32,
}

impl Citizen {
    pub fn new(energy: f32) -> Self {
        Self { hunger: 0.0, energy }
    }

    pub fn can_work(&self) -> bool {
        self.energy > 0.0
    }
}

/// Kind of job, with the wire codes used by the job table
///
/// Labor, Gather and Haul are generic work with no completion effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum JobKind {
    Labor = 0,
    Gather = 1,
    Haul = 2,
    Building = 3,
    Eating = 255,
}

impl JobKind {
    pub const GENERIC: [JobKind; 3] = [JobKind::Labor, JobKind::Gather, JobKind::Haul];
}

/// Priority that puts a job ahead of everything else
pub const EATING_PRIORITY: u8 = 255;

/// A unit of work that one citizen can hold at a time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub kind: JobKind,
    pub priority: u8,
    /// 0.0 to 1.0, only ever increases while worked
    pub progress: f32,
    pub assigned_to: Option<Entity>,
}

impl Job {
    pub fn new(kind: JobKind, priority: u8) -> Self {
        Self {
            kind,
            priority,
            progress: 0.0,
            assigned_to: None,
        }
    }

    /// An eating job, created already assigned to its hungry citizen
    pub fn eating(citizen: Entity) -> Self {
        Self {
            kind: JobKind::Eating,
            priority: EATING_PRIORITY,
            progress: 0.0,
            assigned_to: Some(citizen),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    pub fn is_available_to(&self, citizen: Entity) -> bool {
        match self.assigned_to {
            None => true,
            Some(holder) => holder == citizen,
        }
    }
}

/// Type of building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingType {
    House,
    Mill,
    Warehouse,
    Food,
}

impl BuildingType {
    /// Types a player can order built
    pub const CONSTRUCTIBLE: [BuildingType; 3] =
        [BuildingType::House, BuildingType::Mill, BuildingType::Warehouse];
}

/// Current state of a building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingState {
    /// Attached to a building job that has not finished yet
    Planned,
    /// Walk-in building such as the food source; never blocks its cell
    Open,
    /// Finished structure; its cell is not walkable
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub building_type: BuildingType,
    pub state: BuildingState,
}

impl Building {
    pub fn new(building_type: BuildingType, state: BuildingState) -> Self {
        Self { building_type, state }
    }

    pub fn blocks_movement(&self) -> bool {
        self.state == BuildingState::Complete
    }
}
