//! Berry bushes: the rabbits' food, carrying a dose of toxin.

use crate::entity::{Entity, Habitat, Lifecycle, Vitals};
use eco_core::{BerryConfig, EntityId, Result, Species};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BerryState {
    pub age: u32,
    /// Toxin passed on to whoever eats the berry
    pub toxin_level: u32,
}

impl BerryState {
    pub fn seedling(config: &BerryConfig, rng: &mut ChaCha8Rng) -> Self {
        Self {
            age: 0,
            toxin_level: rng.gen_range(0..=config.max_toxin),
        }
    }

    pub fn random(config: &BerryConfig, rng: &mut ChaCha8Rng) -> Self {
        Self {
            age: rng.gen_range(0..config.max_age.max(1)),
            toxin_level: rng.gen_range(0..=config.max_toxin),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Berry {
    vitals: Vitals,
    age: u32,
}

impl Berry {
    pub fn from_state(mut vitals: Vitals, state: BerryState) -> Self {
        vitals.ingest_toxin(state.toxin_level);
        Self {
            vitals,
            age: state.age,
        }
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    fn seeding_chance(&self, habitat: &Habitat<'_>) -> f64 {
        let config = habitat.berry;
        if habitat.clock.is_raining() {
            config.seeding_probability * config.rain_seeding_multiplier
        } else {
            config.seeding_probability
        }
    }
}

impl Lifecycle for Berry {
    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn species(&self) -> Species {
        Species::Berry
    }

    /// Grow: in daylight the bush ages, withers past its max age, and may seed
    /// one free neighbouring cell (more readily in the rain).
    fn act(&mut self, habitat: &mut Habitat<'_>, spawns: &mut Vec<EntityId>) -> Result<()> {
        if !habitat.clock.is_day() {
            return Ok(());
        }

        self.age += 1;
        if self.age > habitat.berry.max_age {
            trace!(berry = %self.vitals.id(), "Berry bush withered");
            return self.vitals.set_dead(&mut habitat.world.field);
        }

        let here = self.vitals.require_location()?;
        if habitat.rng.gen::<f64>() < self.seeding_chance(habitat) {
            if let Some(location) = habitat.world.field.free_adjacent_location(here, habitat.rng) {
                let state = BerryState::seedling(habitat.berry, habitat.rng);
                let seedling = habitat
                    .world
                    .spawn(location, |vitals| Entity::Berry(Berry::from_state(vitals, state)))?;
                trace!(parent = %self.vitals.id(), seedling = %seedling, %location, "Berry seeded");
                spawns.push(seedling);
            }
        }
        Ok(())
    }
}
