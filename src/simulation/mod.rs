pub mod hunter_core;
pub mod knight_core;
pub mod setup;
pub mod tick;
pub mod world;

pub use setup::populate_random;
pub use tick::{run, run_simulation_step, run_with, EndReason, HideoutSummary, RunSummary, StepReport};
pub use world::World;
