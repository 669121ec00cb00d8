//! Entity construction helpers

use crate::core::types::Vec2;
use crate::ecs::components::{
    Building, BuildingState, BuildingType, Citizen, Job, JobKind, Position,
};
use crate::ecs::world::{Entity, World};

impl World {
    pub fn spawn_citizen(&mut self, pos: Vec2, energy: f32) -> Entity {
        let citizen = self.create();
        self.attach(citizen, Position::from(pos));
        self.attach(citizen, Citizen::new(energy));
        citizen
    }

    pub fn spawn_job(&mut self, pos: Vec2, kind: JobKind, priority: u8) -> Entity {
        let job = self.create();
        self.attach(job, Position::from(pos));
        self.attach(job, Job::new(kind, priority));
        job
    }

    /// A building job carries the planned building and joins the building queue
    pub fn spawn_building_job(
        &mut self,
        pos: Vec2,
        building_type: BuildingType,
        priority: u8,
    ) -> Entity {
        let job = self.spawn_job(pos, JobKind::Building, priority);
        self.attach(job, Building::new(building_type, BuildingState::Planned));
        self.building_queue.push_back(job);
        job
    }

    pub fn spawn_food_building(&mut self, pos: Vec2) -> Entity {
        let building = self.create();
        self.attach(building, Position::from(pos));
        self.attach(building, Building::new(BuildingType::Food, BuildingState::Open));
        building
    }

    /// A finished structure that blocks its grid cell
    pub fn spawn_completed_building(&mut self, pos: Vec2, building_type: BuildingType) -> Entity {
        let building = self.create();
        self.attach(building, Position::from(pos));
        self.attach(building, Building::new(building_type, BuildingState::Complete));
        building
    }

    /// An eating job at `pos`, already held by `citizen`
    pub fn spawn_eating_job(&mut self, pos: Vec2, citizen: Entity) -> Entity {
        let job = self.create();
        self.attach(job, Position::from(pos));
        self.attach(job, Job::eating(citizen));
        job
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::world::ComponentSet;

    #[test]
    fn test_spawn_building_job_is_queued() {
        let mut world = World::new();
        let first = world.spawn_building_job(Vec2::new(0.0, 0.0), BuildingType::House, 5);
        let second = world.spawn_building_job(Vec2::new(15.0, 0.0), BuildingType::Mill, 5);

        assert_eq!(world.building_queue.iter().collect::<Vec<_>>(), vec![first, second]);
        assert_eq!(world.component::<Job>(first).kind, JobKind::Building);
        assert_eq!(
            world.component::<Building>(second).state,
            BuildingState::Planned
        );
    }

    #[test]
    fn test_spawned_citizen_components() {
        let mut world = World::new();
        let citizen = world.spawn_citizen(Vec2::new(200.0, 300.0), 100.0);
        assert_eq!(
            world.components_of(citizen),
            ComponentSet::CITIZEN | ComponentSet::POSITION
        );
        assert_eq!(world.component::<Citizen>(citizen).hunger, 0.0);
    }

    #[test]
    fn test_food_building_does_not_block() {
        let mut world = World::new();
        let food = world.spawn_food_building(Vec2::new(30.0, 0.0));
        assert!(!world.component::<Building>(food).blocks_movement());
        assert!(!world.has::<Job>(food));
    }
}
