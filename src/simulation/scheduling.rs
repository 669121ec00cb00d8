//! Job scheduling system
//!
//! Runs once per tick over every citizen with energy, in creation order:
//! 1. Hunger override: a citizen above the hunger threshold is sent to eat
//!    at the food building, dropping whatever job it held.
//! 2. Otherwise the citizen takes the cheapest job it is allowed to take.
//!    A citizen that already holds a job only switches for a job that is
//!    closer than its current one and lies roughly on the way there.
//!
//! Reassignment always unassigns the old job before assigning the new one,
//! so at no point does a citizen hold two jobs.

use crate::core::config::SimulationConfig;
use crate::ecs::components::{
    Building, BuildingState, BuildingType, Citizen, Job, JobKind, Position,
};
use crate::ecs::world::{ComponentSet, Entity, World};

/// What one scheduling pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulingReport {
    /// Jobs handed to a citizen by normal assignment
    pub assigned: usize,
    /// Eating jobs created by the hunger override
    pub eating_jobs_created: usize,
    /// Jobs released back to the pool
    pub unassigned: usize,
}

/// The designated food source: the first open food building in creation order
///
/// Planned food buildings riding on construction jobs are not food sources.
pub fn find_food_building(world: &World) -> Option<Entity> {
    world
        .query(ComponentSet::BUILDING | ComponentSet::POSITION)
        .into_iter()
        .find(|&e| {
            let building = world.component::<Building>(e);
            building.building_type == BuildingType::Food && building.state == BuildingState::Open
        })
}

/// Score a candidate job for a citizen; lower is better
///
/// With no current job (or when the candidate is the current job) the score
/// is the plain distance. Otherwise the candidate must be closer than the
/// current job and closer to the current job than the citizen is, and
/// scores `d(citizen, candidate) + detour_weight * d(candidate, current)`.
/// A candidate failing that test scores infinity, even if it would be a
/// better choice on its own.
pub fn detour_score(
    citizen: &Position,
    candidate: &Position,
    current: Option<&Position>,
    detour_weight: f32,
) -> f32 {
    let to_candidate = citizen.distance(candidate);
    let Some(current) = current else {
        return to_candidate;
    };

    let to_current = citizen.distance(current);
    let candidate_to_current = candidate.distance(current);

    if to_candidate < to_current && candidate_to_current < to_current {
        to_candidate + candidate_to_current * detour_weight
    } else {
        f32::INFINITY
    }
}

pub fn schedule_jobs(world: &mut World, config: &SimulationConfig) -> SchedulingReport {
    let mut report = SchedulingReport::default();

    for citizen in world.query(ComponentSet::CITIZEN | ComponentSet::POSITION) {
        let state = *world.component::<Citizen>(citizen);
        if !state.can_work() {
            continue;
        }

        let current = world.job_assigned_to(citizen);

        if state.hunger > config.hunger_threshold {
            let already_eating = current
                .map(|job| world.component::<Job>(job).kind == JobKind::Eating)
                .unwrap_or(false);
            if already_eating {
                continue;
            }

            if let Some(food) = find_food_building(world) {
                let food_pos = world.component::<Position>(food).as_vec2();
                let eating = world.spawn_eating_job(food_pos, citizen);
                if let Some(job) = current {
                    world.component_mut::<Job>(job).assigned_to = None;
                    report.unassigned += 1;
                }
                report.eating_jobs_created += 1;
                tracing::debug!(
                    "{} is hungry ({:.2}); created eating job {} at ({}, {})",
                    citizen,
                    state.hunger,
                    eating,
                    food_pos.x,
                    food_pos.y
                );
                continue;
            }

            tracing::debug!(
                "{} is hungry but there is no food building; scheduling normally",
                citizen
            );
        }

        let citizen_pos = *world.component::<Position>(citizen);
        let current_pos = current.map(|job| *world.component::<Position>(job));

        let mut best_job = None;
        let mut best_score = f32::INFINITY;

        for job in world.query(ComponentSet::JOB | ComponentSet::POSITION) {
            if !world.component::<Job>(job).is_available_to(citizen) {
                continue;
            }

            let job_pos = world.component::<Position>(job);
            let detour_from = if current == Some(job) {
                None
            } else {
                current_pos.as_ref()
            };
            let score = detour_score(&citizen_pos, job_pos, detour_from, config.detour_weight);

            if score < best_score {
                best_job = Some(job);
                best_score = score;
            }
        }

        if let Some(best) = best_job {
            if Some(best) != current {
                if let Some(old) = current {
                    world.component_mut::<Job>(old).assigned_to = None;
                    report.unassigned += 1;
                }
                world.component_mut::<Job>(best).assigned_to = Some(citizen);
                report.assigned += 1;
                tracing::debug!("{} assigned to {} (score {:.1})", citizen, best, best_score);
            }
        }
    }

    report
}
