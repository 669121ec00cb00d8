//! Tick system - orchestrates simulation updates
//!
//! Each tick runs the systems in a fixed order, every system seeing the
//! effects of the ones before it:
//! grid rebuild -> movement & work -> hunger -> scheduling -> completion.
//!
//! The grid is rebuilt once at the start of the tick. Buildings that appear
//! during the tick (none of the systems create any) would only be seen on
//! the next one.

use serde::Serialize;

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{Tick, Vec2};
use crate::ecs::components::{
    Building, BuildingState, BuildingType, Citizen, Job, JobKind, Position,
};
use crate::ecs::world::{ComponentSet, Entity, World};
use crate::simulation::completion::{
    collect_completed_buildings, materialize_buildings, CompletedBuilding,
};
use crate::simulation::movement::{update_movement, MovementReport};
use crate::simulation::needs::accrue_hunger;
use crate::simulation::scheduling::{schedule_jobs, SchedulingReport};
use crate::spatial::grid::Grid;
use crate::spatial::pathfinding::find_path;

/// Counters from the most recent tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Tick,
    pub movement: MovementReport,
    pub scheduling: SchedulingReport,
    pub completed_buildings: usize,
}

/// What a citizen is doing, for status displays
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state")]
pub enum Activity {
    Idle,
    /// Heading to its job; `remaining` is the straight-line distance left
    Walking { remaining: f32 },
    /// Holds a job it has no route to, so it stands still
    Stalled,
    /// On the job's cell
    Working { progress: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CitizenSnapshot {
    pub entity: Entity,
    pub position: Position,
    pub hunger: f32,
    pub energy: f32,
    pub job: Option<Entity>,
    pub activity: Activity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JobSnapshot {
    pub entity: Entity,
    pub position: Position,
    pub kind: JobKind,
    pub priority: u8,
    pub progress: f32,
    pub assigned_to: Option<Entity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BuildingSnapshot {
    pub entity: Entity,
    pub position: Position,
    pub building_type: BuildingType,
    pub state: BuildingState,
}

/// The simulation core: store, grid and configuration
pub struct Simulation {
    world: World,
    grid: Grid,
    config: SimulationConfig,
    last_report: TickReport,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.grid_width, config.grid_height, config.cell_size)?;
        Ok(Self {
            world: World::new(),
            grid,
            config,
            last_report: TickReport::default(),
        })
    }

    /// Advance one tick of `dt` seconds
    ///
    /// Returns the finished building jobs. They stay in the world, and keep
    /// being returned, until passed to [`Simulation::materialize`].
    pub fn tick(&mut self, dt: f32) -> Vec<CompletedBuilding> {
        self.grid.rebuild_from_world(&self.world);

        let movement = update_movement(&mut self.world, &self.grid, &self.config, dt);
        accrue_hunger(&mut self.world, &self.config, dt);
        let scheduling = schedule_jobs(&mut self.world, &self.config);
        let completed = collect_completed_buildings(&self.world);

        self.world.tick();
        self.last_report = TickReport {
            tick: self.world.current_tick,
            movement,
            scheduling,
            completed_buildings: completed.len(),
        };
        tracing::trace!("tick {:?}", self.last_report);

        completed
    }

    /// Turn finished building jobs into buildings and block their cells
    pub fn materialize(&mut self, completed: &[CompletedBuilding]) -> Vec<Entity> {
        let built = materialize_buildings(&mut self.world, completed);
        for &building in &built {
            let pos = self.world.component::<Position>(building).as_vec2();
            let cell = self.grid.world_to_cell(pos);
            self.grid.set_walkable(cell.x, cell.y, false);
        }
        built
    }

    /// One full frame: tick, then materialize whatever finished
    pub fn step(&mut self, dt: f32) -> Vec<Entity> {
        let completed = self.tick(dt);
        self.materialize(&completed)
    }

    pub fn spawn_citizen(&mut self, x: f32, y: f32) -> Entity {
        self.world.spawn_citizen(Vec2::new(x, y), self.config.starting_energy)
    }

    /// Spawn a free-standing job. Building jobs go through
    /// [`Simulation::spawn_building_job`] so they carry their building.
    pub fn spawn_job(&mut self, x: f32, y: f32, kind: JobKind, priority: u8) -> Entity {
        self.world.spawn_job(Vec2::new(x, y), kind, priority)
    }

    pub fn spawn_building_job(&mut self, x: f32, y: f32, building_type: BuildingType) -> Entity {
        self.world.spawn_building_job(
            Vec2::new(x, y),
            building_type,
            self.config.building_job_priority,
        )
    }

    pub fn spawn_food_building(&mut self, x: f32, y: f32) -> Entity {
        self.world.spawn_food_building(Vec2::new(x, y))
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn current_tick(&self) -> Tick {
        self.world.current_tick
    }

    pub fn last_report(&self) -> &TickReport {
        &self.last_report
    }

    /// Pending building jobs, oldest first
    pub fn building_queue(&self) -> Vec<Entity> {
        self.world.building_queue.iter().collect()
    }

    pub fn citizens(&self) -> Vec<CitizenSnapshot> {
        self.world
            .query(ComponentSet::CITIZEN | ComponentSet::POSITION)
            .into_iter()
            .map(|entity| {
                let position = *self.world.component::<Position>(entity);
                let citizen = self.world.component::<Citizen>(entity);
                let job = self.world.job_assigned_to(entity);
                CitizenSnapshot {
                    entity,
                    position,
                    hunger: citizen.hunger,
                    energy: citizen.energy,
                    job,
                    activity: self.activity(&position, job),
                }
            })
            .collect()
    }

    fn activity(&self, position: &Position, job: Option<Entity>) -> Activity {
        let Some(job) = job else {
            return Activity::Idle;
        };
        let job_pos = self.world.component::<Position>(job);
        let here = self.grid.world_to_cell(position.as_vec2());
        let there = self.grid.world_to_cell(job_pos.as_vec2());
        if here == there {
            return Activity::Working {
                progress: self.world.component::<Job>(job).progress,
            };
        }

        // Mirrors the movement pass: a citizen inside a blocked cell first
        // steps out if any neighbour is open
        let can_move = if self.grid.is_walkable(here) {
            find_path(&self.grid, here, there).is_some()
        } else {
            self.grid.in_bounds(here.x, here.y)
                && self.grid.neighbors(here).any(|n| self.grid.is_walkable(n))
        };

        if can_move {
            Activity::Walking {
                remaining: position.distance(job_pos),
            }
        } else {
            Activity::Stalled
        }
    }

    pub fn jobs(&self) -> Vec<JobSnapshot> {
        self.world
            .query(ComponentSet::JOB | ComponentSet::POSITION)
            .into_iter()
            .map(|entity| {
                let job = self.world.component::<Job>(entity);
                JobSnapshot {
                    entity,
                    position: *self.world.component::<Position>(entity),
                    kind: job.kind,
                    priority: job.priority,
                    progress: job.progress,
                    assigned_to: job.assigned_to,
                }
            })
            .collect()
    }

    /// Standing buildings (food source and completed structures), not planned ones
    pub fn buildings(&self) -> Vec<BuildingSnapshot> {
        self.world
            .query(ComponentSet::BUILDING | ComponentSet::POSITION)
            .into_iter()
            .filter(|&entity| !self.world.has::<Job>(entity))
            .map(|entity| {
                let building = self.world.component::<Building>(entity);
                BuildingSnapshot {
                    entity,
                    position: *self.world.component::<Position>(entity),
                    building_type: building.building_type,
                    state: building.state,
                }
            })
            .collect()
    }
}
