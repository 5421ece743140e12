//! Agents, treasure and structures living on the grid

pub mod garrison;
pub mod hideout;
pub mod hunter;
pub mod knight;
pub mod treasure;

pub use garrison::Garrison;
pub use hideout::Hideout;
pub use hunter::{Hunter, HunterSkill, HunterState};
pub use knight::{InteractionMethod, Knight, KnightState};
pub use treasure::{Treasure, TreasureTier};
