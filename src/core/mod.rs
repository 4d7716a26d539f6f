//! Core engine types: entities, players, RNG, configuration, logging and
//! the [`World`] arena that owns all game state.

pub mod config;
pub mod entity;
pub mod log;
pub mod player;
pub mod rng;
pub mod world;

pub use config::{SessionExpiry, WorldConfig};
pub use entity::{CharacterRef, EntityId};
pub use log::{EngineLog, LogEntry, OutputMode, VerbosityLevel};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState, RandomProvider};
pub use world::World;
