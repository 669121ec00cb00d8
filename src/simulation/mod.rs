pub mod completion;
pub mod movement;
pub mod needs;
pub mod scheduling;
pub mod tick;

pub use completion::{collect_completed_buildings, materialize_buildings, CompletedBuilding};
pub use movement::{step_towards, update_movement, MovementReport};
pub use needs::accrue_hunger;
pub use scheduling::{detour_score, find_food_building, schedule_jobs, SchedulingReport};
pub use tick::{
    Activity, BuildingSnapshot, CitizenSnapshot, JobSnapshot, Simulation, TickReport,
};
