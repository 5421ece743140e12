//! Knights of Eldoria - treasure hunters and knights on a toroidal grid

pub mod core;
pub mod entity;
pub mod grid;
pub mod pathfinding;
pub mod render;
pub mod sentiment;
pub mod simulation;
