//! Movement and work progress
//!
//! Each citizen holding a job asks the pathfinder for a route to the job's
//! cell. A route of two or more cells moves the citizen toward the centre of
//! the next cell; a single-cell route means the citizen is on site and works.
//!
//! Diagonal steps may clip the corner of a blocked cell. A citizen that ends
//! up inside a blocked cell has no route, so it first steps back to the
//! nearest walkable neighbour.

use crate::core::config::SimulationConfig;
use crate::core::types::{CellCoord, Vec2};
use crate::ecs::components::{Citizen, Job, JobKind, Position};
use crate::ecs::world::{ComponentSet, World};
use crate::spatial::grid::Grid;
use crate::spatial::pathfinding::find_path;

/// What one movement pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementReport {
    pub moved: usize,
    pub working: usize,
    /// Citizens with a job but no route to it
    pub stalled: usize,
    pub meals_eaten: usize,
}

/// Step from `from` toward `to` by at most `max_step`
///
/// Each axis is clamped separately: when the step on an axis would reach or
/// pass the target on that axis, the axis snaps to the target. Within
/// `arrival_epsilon` the whole position snaps.
pub fn step_towards(from: Vec2, to: Vec2, max_step: f32, arrival_epsilon: f32) -> Vec2 {
    let delta = to - from;
    let distance = delta.length();
    if distance <= arrival_epsilon {
        return to;
    }

    let vx = delta.x / distance * max_step;
    let vy = delta.y / distance * max_step;

    let x = if vx.abs() >= delta.x.abs() { to.x } else { from.x + vx };
    let y = if vy.abs() >= delta.y.abs() { to.y } else { from.y + vy };
    Vec2::new(x, y)
}

/// The walkable neighbour of `cell` whose centre is closest to `pos`
fn nearest_walkable_neighbor(grid: &Grid, cell: CellCoord, pos: Vec2) -> Option<CellCoord> {
    grid.neighbors(cell)
        .filter(|&n| grid.is_walkable(n))
        .min_by(|&a, &b| {
            let da = grid.cell_center(a).distance(&pos);
            let db = grid.cell_center(b).distance(&pos);
            da.total_cmp(&db)
        })
}

pub fn update_movement(
    world: &mut World,
    grid: &Grid,
    config: &SimulationConfig,
    dt: f32,
) -> MovementReport {
    let mut report = MovementReport::default();

    for citizen in world.query(ComponentSet::CITIZEN | ComponentSet::POSITION) {
        let Some(job) = world.job_assigned_to(citizen) else {
            continue;
        };

        let citizen_pos = world.component::<Position>(citizen).as_vec2();
        let job_pos = world.component::<Position>(job).as_vec2();
        let start = grid.world_to_cell(citizen_pos);
        let goal = grid.world_to_cell(job_pos);

        if grid.in_bounds(start.x, start.y) && !grid.is_walkable(start) {
            if let Some(exit) = nearest_walkable_neighbor(grid, start, citizen_pos) {
                let new_pos = step_towards(
                    citizen_pos,
                    grid.cell_center(exit),
                    config.citizen_speed * dt,
                    config.arrival_epsilon,
                );
                *world.component_mut::<Position>(citizen) = Position::from(new_pos);
                report.moved += 1;
                tracing::debug!("{} stepping out of blocked cell {} to {}", citizen, start, exit);
                continue;
            }
        }

        match find_path(grid, start, goal).as_deref() {
            Some([_, next, ..]) => {
                let target = grid.cell_center(*next);
                let new_pos = step_towards(
                    citizen_pos,
                    target,
                    config.citizen_speed * dt,
                    config.arrival_epsilon,
                );
                *world.component_mut::<Position>(citizen) = Position::from(new_pos);
                report.moved += 1;
                tracing::trace!("{} moved to ({:.1}, {:.1})", citizen, new_pos.x, new_pos.y);
            }
            Some([_]) => {
                report.working += 1;
                let work = world.component_mut::<Job>(job);
                work.progress = (work.progress + dt * config.work_rate).min(1.0);

                if work.is_complete() && work.kind == JobKind::Eating {
                    world.component_mut::<Citizen>(citizen).hunger = 0.0;
                    world.destroy(job);
                    report.meals_eaten += 1;
                    tracing::debug!("{} finished eating", citizen);
                }
            }
            _ => {
                report.stalled += 1;
                tracing::debug!(
                    "no path for {} from {} to job {} at {}",
                    citizen,
                    start,
                    job,
                    goal
                );
            }
        }
    }

    report
}
