//! ECS World - manages all entities and their components
//!
//! Components live in entity-indexed columns. Entity ids are handed out
//! monotonically and never reused, so ascending id order is creation order.
//!
//! Queries walk an ordered set of live ids, so their cost follows the live
//! population rather than every id ever issued. The columns themselves still
//! grow by one slot per created entity (each meal creates one); that is
//! memory only, destroyed slots are never visited.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::types::Tick;
use crate::ecs::components::{Building, Citizen, Job, Position};
use crate::ecs::job_queue::JobQueue;

/// Opaque entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u32);

impl Entity {
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Set of component kinds, used as a query filter and as the per-entity mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ComponentSet(u8);

impl ComponentSet {
    pub const EMPTY: ComponentSet = ComponentSet(0);
    pub const POSITION: ComponentSet = ComponentSet(1 << 0);
    pub const CITIZEN: ComponentSet = ComponentSet(1 << 1);
    pub const JOB: ComponentSet = ComponentSet(1 << 2);
    pub const BUILDING: ComponentSet = ComponentSet(1 << 3);

    pub const fn contains(self, other: ComponentSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn insert(&mut self, other: ComponentSet) {
        self.0 |= other.0;
    }
}

impl std::ops::BitOr for ComponentSet {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Entity-indexed storage for one component type
#[derive(Debug, Clone)]
pub struct ComponentTable<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for ComponentTable<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> ComponentTable<T> {
    fn grow_to(&mut self, len: usize) {
        if self.slots.len() < len {
            self.slots.resize_with(len, || None);
        }
    }

    fn insert(&mut self, entity: Entity, value: T) {
        self.grow_to(entity.index() + 1);
        self.slots[entity.index()] = Some(value);
    }

    fn remove(&mut self, entity: Entity) {
        if let Some(slot) = self.slots.get_mut(entity.index()) {
            *slot = None;
        }
    }

    fn get(&self, entity: Entity) -> Option<&T> {
        self.slots.get(entity.index()).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slots.get_mut(entity.index()).and_then(Option::as_mut)
    }
}

/// A component type with a column in the [`World`]
pub trait Component: Sized + 'static {
    const SET: ComponentSet;
    const NAME: &'static str;

    fn table(world: &World) -> &ComponentTable<Self>;
    fn table_mut(world: &mut World) -> &mut ComponentTable<Self>;
}

macro_rules! impl_component {
    ($ty:ty, $field:ident, $set:expr) => {
        impl Component for $ty {
            const SET: ComponentSet = $set;
            const NAME: &'static str = stringify!($ty);

            fn table(world: &World) -> &ComponentTable<Self> {
                &world.$field
            }

            fn table_mut(world: &mut World) -> &mut ComponentTable<Self> {
                &mut world.$field
            }
        }
    };
}

impl_component!(Position, positions, ComponentSet::POSITION);
impl_component!(Citizen, citizens, ComponentSet::CITIZEN);
impl_component!(Job, jobs, ComponentSet::JOB);
impl_component!(Building, buildings, ComponentSet::BUILDING);

/// The simulation store containing all entities
#[derive(Debug, Default)]
pub struct World {
    pub current_tick: Tick,
    alive: Vec<bool>,
    /// Live ids in creation order
    live: BTreeSet<Entity>,
    masks: Vec<ComponentSet>,
    positions: ComponentTable<Position>,
    citizens: ComponentTable<Citizen>,
    jobs: ComponentTable<Job>,
    buildings: ComponentTable<Building>,
    /// Building jobs in the order they were ordered
    pub building_queue: JobQueue,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> Entity {
        let entity = Entity(self.alive.len() as u32);
        self.alive.push(true);
        self.live.insert(entity);
        self.masks.push(ComponentSet::EMPTY);
        entity
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.index()).copied().unwrap_or(false)
    }

    /// Attach (or replace) a component
    ///
    /// Panics if the entity was never created or has been destroyed.
    pub fn attach<C: Component>(&mut self, entity: Entity, component: C) {
        assert!(
            self.is_alive(entity),
            "attach {} to dead {}",
            C::NAME,
            entity
        );
        C::table_mut(self).insert(entity, component);
        self.masks[entity.index()].insert(C::SET);
    }

    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.components_of(entity).contains(C::SET)
    }

    pub fn components_of(&self, entity: Entity) -> ComponentSet {
        if !self.is_alive(entity) {
            return ComponentSet::EMPTY;
        }
        self.masks[entity.index()]
    }

    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        C::table(self).get(entity)
    }

    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        C::table_mut(self).get_mut(entity)
    }

    /// Component access for entities known to carry `C`
    ///
    /// Panics when the component is missing: that is a bug in the caller.
    pub fn component<C: Component>(&self, entity: Entity) -> &C {
        match self.get::<C>(entity) {
            Some(component) => component,
            None => panic!("{} has no {} component", entity, C::NAME),
        }
    }

    pub fn component_mut<C: Component>(&mut self, entity: Entity) -> &mut C {
        match C::table_mut(self).get_mut(entity) {
            Some(component) => component,
            None => panic!("{} has no {} component", entity, C::NAME),
        }
    }

    /// Remove every component from the entity, keeping its id alive
    pub fn detach_all(&mut self, entity: Entity) {
        self.positions.remove(entity);
        self.citizens.remove(entity);
        self.jobs.remove(entity);
        self.buildings.remove(entity);
        if let Some(mask) = self.masks.get_mut(entity.index()) {
            *mask = ComponentSet::EMPTY;
        }
    }

    /// Remove the entity from every table and from the building queue
    pub fn destroy(&mut self, entity: Entity) {
        if !self.is_alive(entity) {
            return;
        }
        self.detach_all(entity);
        self.building_queue.remove(entity);
        self.alive[entity.index()] = false;
        self.live.remove(&entity);
    }

    /// Live entities carrying every component in `set`, in creation order
    pub fn query(&self, set: ComponentSet) -> Vec<Entity> {
        self.live
            .iter()
            .copied()
            .filter(|entity| self.masks[entity.index()].contains(set))
            .collect()
    }

    pub fn entity_count(&self) -> usize {
        self.live.len()
    }

    /// The job currently held by `citizen`, if any
    pub fn job_assigned_to(&self, citizen: Entity) -> Option<Entity> {
        self.query(ComponentSet::JOB)
            .into_iter()
            .find(|&job| self.component::<Job>(job).assigned_to == Some(citizen))
    }

    pub fn tick(&mut self) {
        self.current_tick += 1;
    }
}
