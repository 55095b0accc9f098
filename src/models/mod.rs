//! Core data models for the game catalog.

mod game;
mod game_match;
mod ids;
mod player;

pub use game::*;
pub use game_match::*;
pub use ids::*;
pub use player::*;
