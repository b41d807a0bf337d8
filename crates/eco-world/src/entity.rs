//! Entity lifecycle contract and the storage shared by every species.

use crate::clock::Clock;
use crate::field::Field;
use crate::species::{Berry, Rabbit};
use eco_core::{
    BerryConfig, EntityId, Error, Gender, HerbivoreConfig, Location, Result, Species,
    SpeciesCounts,
};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

/// State every living thing carries regardless of species
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vitals {
    id: EntityId,
    alive: bool,
    location: Option<Location>,
    toxin_level: u32,
}

impl Vitals {
    /// A live, unplaced entity with no toxin
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            alive: true,
            location: None,
            toxin_level: 0,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Current location, or an error for an entity that is not on the field
    pub fn require_location(&self) -> Result<Location> {
        self.location
            .ok_or_else(|| Error::InvalidState(format!("entity {} has no location", self.id)))
    }

    pub fn toxin_level(&self) -> u32 {
        self.toxin_level
    }

    /// Accumulate toxin. The level never decreases.
    pub fn ingest_toxin(&mut self, amount: u32) {
        self.toxin_level = self.toxin_level.saturating_add(amount);
    }

    /// True iff the accumulated toxin strictly exceeds `immunity`.
    pub fn check_toxin(&self, immunity: u32) -> bool {
        self.toxin_level > immunity
    }

    /// Mark the entity dead and release its cell.
    ///
    /// Dying twice is an error and leaves the field untouched.
    pub fn set_dead(&mut self, field: &mut Field) -> Result<()> {
        if !self.alive {
            return Err(Error::InvalidState(format!("entity {} is already dead", self.id)));
        }
        self.alive = false;
        if let Some(location) = self.location.take() {
            field.release(self.id, location)?;
        }
        Ok(())
    }

    /// Move to `location`, releasing the previous cell first.
    ///
    /// The target must be in bounds and free (or already ours); otherwise
    /// nothing changes.
    pub fn set_location(&mut self, field: &mut Field, location: Location) -> Result<()> {
        if !self.alive {
            return Err(Error::InvalidState(format!(
                "cannot place dead entity {} at {}",
                self.id, location
            )));
        }
        if !field.contains(location) {
            return Err(Error::OutOfBounds {
                location,
                depth: field.depth(),
                width: field.width(),
            });
        }
        if matches!(field.get(location), Some(other) if other != self.id) {
            return Err(Error::Occupied(location));
        }

        if let Some(previous) = self.location {
            field.release(self.id, previous)?;
        }
        if let Some(displaced) = field.place(self.id, location)? {
            if displaced != self.id {
                return Err(Error::Occupied(location));
            }
        }
        self.location = Some(location);
        Ok(())
    }
}

/// Everything an entity may touch while it acts
pub struct Habitat<'a> {
    pub world: &'a mut World,
    pub clock: &'a Clock,
    pub rng: &'a mut ChaCha8Rng,
    pub herbivore: &'a HerbivoreConfig,
    pub berry: &'a BerryConfig,
}

/// Operations every species implements.
///
/// Only `act` and the species-specific accessors differ between species; the
/// alive/location bookkeeping is shared through [`Vitals`].
pub trait Lifecycle {
    fn vitals(&self) -> &Vitals;

    fn vitals_mut(&mut self) -> &mut Vitals;

    fn species(&self) -> Species;

    /// Perform one step of behaviour.
    ///
    /// Newborns are placed on the field, stored in `habitat.world` and their ids
    /// appended to `spawns`. They do not act until the next step.
    fn act(&mut self, habitat: &mut Habitat<'_>, spawns: &mut Vec<EntityId>) -> Result<()>;

    /// Breeding sex; plants have none
    fn gender(&self) -> Option<Gender> {
        None
    }

    fn id(&self) -> EntityId {
        self.vitals().id()
    }

    fn is_alive(&self) -> bool {
        self.vitals().is_alive()
    }

    fn location(&self) -> Option<Location> {
        self.vitals().location()
    }

    fn toxin_level(&self) -> u32 {
        self.vitals().toxin_level()
    }

    fn check_toxin(&self, immunity: u32) -> bool {
        self.vitals().check_toxin(immunity)
    }

    fn set_dead(&mut self, field: &mut Field) -> Result<()> {
        self.vitals_mut().set_dead(field)
    }

    fn set_location(&mut self, field: &mut Field, location: Location) -> Result<()> {
        self.vitals_mut().set_location(field, location)
    }
}

/// Closed set of species living in the field
#[derive(Debug, Clone)]
pub enum Entity {
    Rabbit(Rabbit),
    Berry(Berry),
}

impl Entity {
    pub fn as_rabbit(&self) -> Option<&Rabbit> {
        match self {
            Entity::Rabbit(rabbit) => Some(rabbit),
            _ => None,
        }
    }

    pub fn as_berry(&self) -> Option<&Berry> {
        match self {
            Entity::Berry(berry) => Some(berry),
            _ => None,
        }
    }

    pub fn as_berry_mut(&mut self) -> Option<&mut Berry> {
        match self {
            Entity::Berry(berry) => Some(berry),
            _ => None,
        }
    }
}

impl Lifecycle for Entity {
    fn vitals(&self) -> &Vitals {
        match self {
            Entity::Rabbit(rabbit) => rabbit.vitals(),
            Entity::Berry(berry) => berry.vitals(),
        }
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        match self {
            Entity::Rabbit(rabbit) => rabbit.vitals_mut(),
            Entity::Berry(berry) => berry.vitals_mut(),
        }
    }

    fn species(&self) -> Species {
        match self {
            Entity::Rabbit(rabbit) => rabbit.species(),
            Entity::Berry(berry) => berry.species(),
        }
    }

    fn act(&mut self, habitat: &mut Habitat<'_>, spawns: &mut Vec<EntityId>) -> Result<()> {
        match self {
            Entity::Rabbit(rabbit) => rabbit.act(habitat, spawns),
            Entity::Berry(berry) => berry.act(habitat, spawns),
        }
    }

    fn gender(&self) -> Option<Gender> {
        match self {
            Entity::Rabbit(rabbit) => rabbit.gender(),
            Entity::Berry(berry) => berry.gender(),
        }
    }
}

/// Owner of every entity, keyed by id
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: HashMap<EntityId, Entity>,
    next_id: u64,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, entity: Entity) {
        self.entities.insert(entity.id(), entity);
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Take an entity out for the duration of its own turn.
    pub fn take(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.next_id = 0;
    }
}

/// The field together with the entities occupying it
#[derive(Debug)]
pub struct World {
    pub field: Field,
    pub entities: EntityStore,
}

impl World {
    pub fn new(depth: i32, width: i32) -> Result<Self> {
        Ok(Self {
            field: Field::new(depth, width)?,
            entities: EntityStore::new(),
        })
    }

    /// Create an entity with a fresh id and place it at `location`.
    pub fn spawn(
        &mut self,
        location: Location,
        build: impl FnOnce(Vitals) -> Entity,
    ) -> Result<EntityId> {
        let id = self.entities.allocate_id();
        let mut entity = build(Vitals::new(id));
        entity.set_location(&mut self.field, location)?;
        self.entities.insert(entity);
        Ok(id)
    }

    /// The entity occupying `location`, if it is stored
    pub fn entity_at(&self, location: Location) -> Option<&Entity> {
        self.field.get(location).and_then(|id| self.entities.get(id))
    }

    /// Count live occupants of the field by species.
    pub fn survey(&self) -> SpeciesCounts {
        let mut counts = SpeciesCounts::new();
        for (_, id) in self.field.occupants() {
            if let Some(entity) = self.entities.get(id) {
                if entity.is_alive() {
                    counts.increment(entity.species());
                }
            }
        }
        counts
    }

    pub fn clear(&mut self) {
        self.field.clear_all();
        self.entities.clear();
    }
}
