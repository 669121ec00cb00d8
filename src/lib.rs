//! Colony Sim - tick-based simulation of hungry citizens, jobs and construction

pub mod core;
pub mod ecs;
pub mod simulation;
pub mod spatial;
