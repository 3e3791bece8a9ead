//! Environment sensors sampled at the start of every tick.

pub mod ground;
pub mod step;

pub use ground::GroundSensor;
pub use step::StepSensor;
