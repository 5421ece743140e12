pub mod config;
pub mod error;
pub mod types;

pub use config::{ScenarioConfig, SimulationConfig};
pub use error::{EldoriaError, Result};
pub use types::{Direction, GarrisonId, HideoutId, HunterId, KnightId, Position, TreasureId};
