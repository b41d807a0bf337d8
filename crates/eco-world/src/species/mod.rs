//! Species rule sets built on the shared lifecycle contract.

pub mod berry;
pub mod rabbit;

pub use berry::{Berry, BerryState};
pub use rabbit::{Rabbit, RabbitState};
