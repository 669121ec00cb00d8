//! Job completion - reports finished building jobs and turns them into buildings
//!
//! Collection is a pure query over the world. Materialization is a separate
//! step so the caller decides when finished jobs become structures.

use ahash::AHashSet;
use serde::Serialize;

use crate::ecs::components::{Building, BuildingType, Job, JobKind, Position};
use crate::ecs::world::{ComponentSet, Entity, World};

/// A building job whose progress has reached 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompletedBuilding {
    pub job: Entity,
    pub position: Position,
    pub building_type: BuildingType,
}

/// Finished building jobs, in creation order
///
/// Jobs keep being reported on every call until they are materialized.
pub fn collect_completed_buildings(world: &World) -> Vec<CompletedBuilding> {
    let mut reported = AHashSet::new();
    let mut completed = Vec::new();

    for job in world.query(ComponentSet::JOB | ComponentSet::POSITION) {
        let data = world.component::<Job>(job);
        if !data.is_complete() || !reported.insert(job) {
            continue;
        }
        if data.kind != JobKind::Building {
            continue;
        }
        let Some(building) = world.get::<Building>(job) else {
            tracing::warn!("building job {} has no planned building", job);
            continue;
        };

        completed.push(CompletedBuilding {
            job,
            position: *world.component::<Position>(job),
            building_type: building.building_type,
        });
    }

    completed
}

/// Replace each finished job with a completed building at the same spot
///
/// Returns the new building entities. Jobs that no longer exist are skipped.
pub fn materialize_buildings(world: &mut World, completed: &[CompletedBuilding]) -> Vec<Entity> {
    let mut built = Vec::with_capacity(completed.len());

    for done in completed {
        if !world.is_alive(done.job) {
            continue;
        }
        let building =
            world.spawn_completed_building(done.position.as_vec2(), done.building_type);
        world.destroy(done.job);
        tracing::info!(
            "{:?} built at ({}, {}) as {}",
            done.building_type,
            done.position.x,
            done.position.y,
            building
        );
        built.push(building);
    }

    built
}
