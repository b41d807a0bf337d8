//! Simulation engine driving the field one step at a time.

use crate::clock::Clock;
use crate::entity::{Entity, Habitat, Lifecycle, World};
use crate::species::{Berry, BerryState, Rabbit, RabbitState};
use crate::view::{HeadlessView, SimulatorView};
use eco_core::{
    EntityId, Error, Gender, Location, Result, RunSummary, SimulationConfig, StepReport,
};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tracing::{debug, info, instrument, trace, warn};

pub struct Simulator<V: SimulatorView = HeadlessView> {
    config: SimulationConfig,
    world: World,
    /// Animals in the order they act
    animals: Vec<EntityId>,
    /// Plants in the order they grow
    plants: Vec<EntityId>,
    clock: Clock,
    rng: ChaCha8Rng,
    view: V,
}

impl Simulator<HeadlessView> {
    /// A randomly populated simulation reporting to a [`HeadlessView`].
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Self::with_view(config, HeadlessView::default())
    }

    /// An unpopulated simulation; fill it with `place_rabbit` / `place_berry`.
    pub fn empty(config: SimulationConfig) -> Result<Self> {
        Self::empty_with_view(config, HeadlessView::default())
    }
}

impl<V: SimulatorView> Simulator<V> {
    pub fn with_view(config: SimulationConfig, view: V) -> Result<Self> {
        let mut sim = Self::empty_with_view(config, view)?;
        sim.reset()?;
        Ok(sim)
    }

    pub fn empty_with_view(mut config: SimulationConfig, view: V) -> Result<Self> {
        config.field = config.field.sanitized();
        let world = World::new(config.field.depth, config.field.width)?;
        let clock = Clock::new(config.clock.clone());
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        Ok(Self {
            config,
            world,
            animals: Vec::new(),
            plants: Vec::new(),
            clock,
            rng,
            view,
        })
    }

    /// Run for the configured number of steps.
    pub fn run(&mut self) -> Result<RunSummary> {
        self.simulate(self.config.num_steps)
    }

    /// Run for a reasonably long period.
    pub fn run_long_simulation(&mut self) -> Result<RunSummary> {
        self.simulate(SimulationConfig::LONG_RUN_STEPS)
    }

    /// Run up to `num_steps` steps, stopping early once the view reports the
    /// ecosystem is no longer viable.
    #[instrument(skip(self), fields(seed = self.config.seed))]
    pub fn simulate(&mut self, num_steps: u64) -> Result<RunSummary> {
        info!("Starting simulation for {} steps", num_steps);

        let mut final_report = self.report();
        let mut steps_run = 0;
        let mut collapsed = false;

        loop {
            if !self.view.is_viable(&self.world) {
                warn!(
                    step = self.clock.step(),
                    animals = final_report.counts.animals(),
                    plants = final_report.counts.plants(),
                    "Ecosystem is no longer viable, stopping"
                );
                collapsed = true;
                break;
            }
            if steps_run == num_steps {
                break;
            }
            final_report = self.simulate_one_step()?;
            steps_run += 1;
            self.delay();
        }

        info!(
            event = "run_summary",
            steps_run = steps_run,
            final_step = final_report.step,
            collapsed = collapsed,
            animals = final_report.counts.animals(),
            plants = final_report.counts.plants(),
            "Simulation complete"
        );

        Ok(RunSummary {
            steps_run,
            collapsed,
            final_report,
        })
    }

    /// Advance the clock, let every animal act and every plant grow, then add
    /// the newborns to the populations and report to the view.
    pub fn simulate_one_step(&mut self) -> Result<StepReport> {
        let tick = self.clock.advance(&mut self.rng);
        if tick.weather_rolled {
            debug!(
                step = self.clock.step(),
                hour = self.clock.hour(),
                weather = %self.clock.weather(),
                "Weather changed"
            );
        }

        let mut newborns = Vec::new();

        let animals = std::mem::take(&mut self.animals);
        self.animals = self.run_pass(animals, &mut newborns)?;

        let plants = std::mem::take(&mut self.plants);
        self.plants = self.run_pass(plants, &mut newborns)?;

        self.merge(newborns);

        let report = self.report();
        self.view.show_status(&report, &self.world);
        Ok(report)
    }

    /// Let each entity of `population` act in order, returning the survivors in
    /// the same order.
    fn run_pass(
        &mut self,
        population: Vec<EntityId>,
        spawns: &mut Vec<EntityId>,
    ) -> Result<Vec<EntityId>> {
        let mut survivors = Vec::with_capacity(population.len());

        for id in population {
            let mut entity = self
                .world
                .entities
                .take(id)
                .ok_or_else(|| Error::NotFound(format!("entity {} is not stored", id)))?;

            if entity.is_alive() {
                let mut habitat = Habitat {
                    world: &mut self.world,
                    clock: &self.clock,
                    rng: &mut self.rng,
                    herbivore: &self.config.herbivore,
                    berry: &self.config.berry,
                };
                entity.act(&mut habitat, spawns)?;
            }

            if entity.is_alive() {
                survivors.push(id);
                self.world.entities.insert(entity);
            } else {
                trace!(entity = %id, species = %entity.species(), "Removed dead entity");
            }
        }

        Ok(survivors)
    }

    /// Add this step's newborns to the population they belong to.
    fn merge(&mut self, newborns: Vec<EntityId>) {
        for id in newborns {
            let species = self
                .world
                .entities
                .get(id)
                .filter(|entity| entity.is_alive())
                .map(|entity| entity.species());

            match species {
                Some(species) if species.is_animal() => self.animals.push(id),
                Some(_) => self.plants.push(id),
                None => {
                    self.world.entities.take(id);
                }
            }
        }
    }

    /// Back to step zero with a freshly populated field.
    ///
    /// The generator is reseeded, so a reset reproduces the initial state.
    pub fn reset(&mut self) -> Result<()> {
        self.clock.reset();
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.animals.clear();
        self.plants.clear();
        self.world.clear();
        self.populate()?;

        let report = self.report();
        self.view.show_status(&report, &self.world);
        Ok(())
    }

    /// Randomly fill the field with rabbits and berry bushes.
    fn populate(&mut self) -> Result<()> {
        let population = self.config.population.clone();

        for row in 0..self.world.field.depth() {
            for col in 0..self.world.field.width() {
                let location = Location::new(row, col);
                if self.rng.gen::<f64>() < population.herbivore_creation_probability {
                    let gender = Gender::random(&mut self.rng);
                    let state = RabbitState::random(&self.config.herbivore, &mut self.rng);
                    let id = self.world.spawn(location, |vitals| {
                        Entity::Rabbit(Rabbit::from_state(vitals, gender, state))
                    })?;
                    self.animals.push(id);
                } else if self.rng.gen::<f64>() < population.berry_creation_probability {
                    let state = BerryState::random(&self.config.berry, &mut self.rng);
                    let id = self
                        .world
                        .spawn(location, |vitals| Entity::Berry(Berry::from_state(vitals, state)))?;
                    self.plants.push(id);
                }
            }
        }

        info!(
            animals = self.animals.len(),
            plants = self.plants.len(),
            depth = self.world.field.depth(),
            width = self.world.field.width(),
            "Field populated"
        );
        Ok(())
    }

    /// Put a rabbit on a free cell. It acts from the next step on.
    pub fn place_rabbit(
        &mut self,
        location: Location,
        gender: Gender,
        state: RabbitState,
    ) -> Result<EntityId> {
        self.ensure_free(location)?;
        let id = self
            .world
            .spawn(location, |vitals| Entity::Rabbit(Rabbit::from_state(vitals, gender, state)))?;
        self.animals.push(id);
        Ok(id)
    }

    /// Put a berry bush on a free cell. It grows from the next step on.
    pub fn place_berry(&mut self, location: Location, state: BerryState) -> Result<EntityId> {
        self.ensure_free(location)?;
        let id = self
            .world
            .spawn(location, |vitals| Entity::Berry(Berry::from_state(vitals, state)))?;
        self.plants.push(id);
        Ok(id)
    }

    fn ensure_free(&self, location: Location) -> Result<()> {
        let field = &self.world.field;
        if !field.contains(location) {
            return Err(Error::OutOfBounds {
                location,
                depth: field.depth(),
                width: field.width(),
            });
        }
        if field.get(location).is_some() {
            return Err(Error::Occupied(location));
        }
        Ok(())
    }

    /// Status of the field as of the last completed step
    pub fn report(&self) -> StepReport {
        StepReport {
            step: self.clock.step(),
            hour: self.clock.hour(),
            weather: self.clock.weather(),
            counts: self.world.survey(),
        }
    }

    fn delay(&self) {
        if self.config.step_delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.config.step_delay_ms));
        }
    }

    pub fn step(&self) -> u64 {
        self.clock.step()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.world.entities.get(id)
    }

    pub fn animals(&self) -> &[EntityId] {
        &self.animals
    }

    pub fn plants(&self) -> &[EntityId] {
        &self.plants
    }

    pub fn view(&self) -> &V {
        &self.view
    }

}
