//! Rabbits: age, get hungry, eat berries, breed and die.

use crate::entity::{Entity, Habitat, Lifecycle, Vitals, World};
use eco_core::{EntityId, Gender, HerbivoreConfig, Location, Result, Species};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

/// Initial age, food and toxin of a rabbit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RabbitState {
    pub age: u32,
    pub food_level: u32,
    pub toxin_level: u32,
}

impl RabbitState {
    /// Age zero with a full stomach
    pub fn newborn(food_value: u32) -> Self {
        Self {
            age: 0,
            food_level: food_value,
            toxin_level: 0,
        }
    }

    /// Random age and food level, used when populating the field
    pub fn random(config: &HerbivoreConfig, rng: &mut ChaCha8Rng) -> Self {
        Self {
            age: rng.gen_range(0..config.max_age.max(1)),
            food_level: rng.gen_range(0..config.food_value.max(1)),
            toxin_level: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rabbit {
    vitals: Vitals,
    gender: Gender,
    age: u32,
    food_level: u32,
}

impl Rabbit {
    pub fn from_state(mut vitals: Vitals, gender: Gender, state: RabbitState) -> Self {
        vitals.ingest_toxin(state.toxin_level);
        Self {
            vitals,
            gender,
            age: state.age,
            food_level: state.food_level,
        }
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn food_level(&self) -> u32 {
        self.food_level
    }

    fn increment_age(&mut self, habitat: &mut Habitat<'_>) -> Result<()> {
        self.age += 1;
        if self.age > habitat.herbivore.max_age {
            debug!(rabbit = %self.vitals.id(), age = self.age, "Rabbit died of old age");
            self.vitals.set_dead(&mut habitat.world.field)?;
        }
        Ok(())
    }

    fn increment_hunger(&mut self, habitat: &mut Habitat<'_>) -> Result<()> {
        self.food_level = self.food_level.saturating_sub(1);
        if self.food_level == 0 {
            debug!(rabbit = %self.vitals.id(), age = self.age, "Rabbit starved");
            self.vitals.set_dead(&mut habitat.world.field)?;
        }
        Ok(())
    }

    /// Newborns go into free cells around `here`, one cell per birth.
    fn give_birth(
        &mut self,
        here: Location,
        habitat: &mut Habitat<'_>,
        spawns: &mut Vec<EntityId>,
    ) -> Result<()> {
        let mut free = habitat.world.field.free_adjacent_locations(here, habitat.rng);
        let births = self.breed(here, habitat);
        let food_value = habitat.herbivore.food_value;

        for _ in 0..births {
            let Some(location) = free.pop_front() else {
                break;
            };
            let gender = Gender::random(habitat.rng);
            let young = habitat.world.spawn(location, |vitals| {
                Entity::Rabbit(Rabbit::from_state(vitals, gender, RabbitState::newborn(food_value)))
            })?;
            trace!(parent = %self.vitals.id(), young = %young, %location, "Rabbit born");
            spawns.push(young);
        }
        Ok(())
    }

    /// Number of births this step (may be zero).
    fn breed(&self, here: Location, habitat: &mut Habitat<'_>) -> u32 {
        let config = habitat.herbivore;
        if self.can_breed(here, habitat) && habitat.rng.gen::<f64>() <= config.breeding_probability {
            habitat.rng.gen_range(1..=config.max_litter_size.max(1))
        } else {
            0
        }
    }

    /// Old enough, with a rabbit of the opposite gender next door.
    fn can_breed(&self, here: Location, habitat: &mut Habitat<'_>) -> bool {
        if self.age < habitat.herbivore.breeding_age {
            return false;
        }
        let mate = Some(self.gender.opposite());
        habitat
            .world
            .field
            .adjacent_locations(here, habitat.rng)
            .into_iter()
            .filter_map(|location| habitat.world.entity_at(location))
            .any(|other| other.species() == Species::Rabbit && other.gender() == mate)
    }

    /// Eat the first live berry found around `here`.
    ///
    /// Returns the cell the berry occupied.
    fn find_food(&mut self, here: Location, habitat: &mut Habitat<'_>) -> Result<Option<Location>> {
        let food_value = habitat.herbivore.food_value;
        let World { field, entities } = &mut *habitat.world;

        for location in field.adjacent_locations(here, habitat.rng) {
            let Some(id) = field.get(location) else {
                continue;
            };
            let Some(berry) = entities.get_mut(id).and_then(Entity::as_berry_mut) else {
                continue;
            };
            if !berry.is_alive() {
                continue;
            }

            self.vitals.ingest_toxin(berry.toxin_level());
            berry.set_dead(field)?;
            self.food_level = food_value;
            trace!(
                rabbit = %self.vitals.id(),
                berry = %id,
                toxin_level = self.vitals.toxin_level(),
                "Rabbit ate a berry"
            );
            return Ok(Some(location));
        }
        Ok(None)
    }
}

impl Lifecycle for Rabbit {
    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn species(&self) -> Species {
        Species::Rabbit
    }

    fn gender(&self) -> Option<Gender> {
        Some(self.gender)
    }

    /// Rabbits only act in daylight: age, hunger, breeding, then feeding or
    /// wandering. A rabbit with nowhere to go dies of overcrowding.
    fn act(&mut self, habitat: &mut Habitat<'_>, spawns: &mut Vec<EntityId>) -> Result<()> {
        if !habitat.clock.is_day() {
            return Ok(());
        }

        self.increment_age(habitat)?;
        if self.is_alive() {
            self.increment_hunger(habitat)?;
        }
        if !self.is_alive() {
            return Ok(());
        }

        let here = self.vitals.require_location()?;
        self.give_birth(here, habitat, spawns)?;

        let destination = match self.find_food(here, habitat)? {
            Some(location) => Some(location),
            None => habitat.world.field.free_adjacent_location(here, habitat.rng),
        };

        match destination {
            Some(next) => {
                self.vitals.set_location(&mut habitat.world.field, next)?;
                if self.vitals.check_toxin(habitat.herbivore.toxin_immunity) {
                    debug!(
                        rabbit = %self.vitals.id(),
                        toxin_level = self.vitals.toxin_level(),
                        "Rabbit poisoned"
                    );
                    self.vitals.set_dead(&mut habitat.world.field)?;
                }
            }
            None => {
                debug!(rabbit = %self.vitals.id(), %here, "Rabbit died of overcrowding");
                self.vitals.set_dead(&mut habitat.world.field)?;
            }
        }
        Ok(())
    }
}
