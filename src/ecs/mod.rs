pub mod components;
pub mod job_queue;
pub mod spawn;
pub mod world;

pub use components::{Building, BuildingState, BuildingType, Citizen, Job, JobKind, Position};
pub use job_queue::JobQueue;
pub use world::{Component, ComponentSet, Entity, World};
