//! Hunger accrual system
//!
//! Every citizen gets hungrier each tick. Only a completed eating job
//! brings hunger back to zero.

use crate::core::config::SimulationConfig;
use crate::ecs::components::Citizen;
use crate::ecs::world::{ComponentSet, World};

pub fn accrue_hunger(world: &mut World, config: &SimulationConfig, dt: f32) {
    for citizen in world.query(ComponentSet::CITIZEN) {
        world.component_mut::<Citizen>(citizen).hunger += dt * config.hunger_rate;
    }
}
