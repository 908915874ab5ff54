//! Simulation module
//!
//! All gameplay logic lives here. Given the same seed, tuning and sequence
//! of (input, dt, timestamp) frames, a run replays identically. Nothing in
//! here touches rendering, audio or storage.

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod effects;
pub mod player;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use difficulty::next_difficulty;
pub use player::Steer;
pub use state::{
    CAR_PALETTE, CarKind, DamageFlash, Difficulty, GameEvent, GamePhase, GameState, MAX_PARTICLES,
    Particle, ParticleColor, ParticleKind, Player, Powerup, ScreenShake, SpeedLine, TrafficCar,
};
pub use tick::{FrameClock, FrameStep, TickInput, complete_lap, tick};
