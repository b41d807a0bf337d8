//! Ecosystem simulation engine.
//!
//! This module implements the bounded 2D field where rabbits and berry bushes
//! live, feed, breed and die under a day/night and weather cycle.

pub mod field;
pub mod entity;
pub mod species;
pub mod clock;
pub mod view;
pub mod simulation;

pub use field::Field;
pub use entity::{Entity, EntityStore, Habitat, Lifecycle, Vitals, World};
pub use species::{Berry, BerryState, Rabbit, RabbitState};
pub use clock::{Clock, ClockTick};
pub use view::{HeadlessView, SimulatorView};
pub use simulation::Simulator;
