//! Electric Rush - A lane-dodging arcade driving game
//!
//! Core modules:
//! - `sim`: Simulation (player motion, traffic, collisions, difficulty, effects)
//! - `tuning`: Data-driven difficulty policy
//! - `game`: Host that wires the simulation to its collaborators
//! - `input`, `audio`, `highscores`, `settings`, `ui`: Collaborator adapters
//! - `platform`: Browser/native platform abstraction

pub mod audio;
pub mod game;
pub mod highscores;
pub mod input;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::{Game, Renderer};
pub use highscores::{Leaderboard, LeaderboardStore};
pub use settings::{ParticleQuality, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Road geometry: 60% of the canvas, centered, split into lanes
    pub const NUM_LANES: u8 = 4;
    pub const ROAD_WIDTH: f32 = CANVAS_WIDTH * 0.6;
    pub const ROAD_LEFT: f32 = (CANVAS_WIDTH - ROAD_WIDTH) / 2.0;
    pub const LANE_WIDTH: f32 = ROAD_WIDTH / NUM_LANES as f32;

    /// Largest frame delta the simulation will integrate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player car
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;
    pub const PLAYER_Y: f32 = CANVAS_HEIGHT - 150.0;
    pub const START_LANE: u8 = 1;

    /// Automatic forward speed (internal units)
    pub const BASE_SPEED: f32 = 6.0;
    /// Speed ceiling used for powerup target speed
    pub const MAX_SPEED: f32 = 25.0;
    pub const MIN_SPEED: f32 = 3.0;
    /// Hard cap for the automatic speed (93 mph)
    pub const AUTO_SPEED_CEILING: f32 = 14.97;
    /// Exponential smoothing rate toward target speed (1/s)
    pub const SPEED_EASE_RATE: f32 = 5.0;
    /// Exponential smoothing rate toward target lane (1/s)
    pub const LANE_CHANGE_RATE: f32 = 22.0;
    /// Lane position snaps onto the target lane inside this distance
    pub const LANE_SNAP_EPSILON: f32 = 0.001;

    /// Jump
    pub const JUMP_DURATION: f32 = 0.45;
    pub const JUMP_HEIGHT: f32 = 80.0;
    pub const JUMP_COOLDOWN: f32 = 0.8;
    pub const JUMP_BUFFER_TIME: f32 = 0.15;
    pub const JUMP_HITSTOP_MS: f64 = 80.0;

    /// Traffic
    pub const TRAFFIC_BASE_SPEED: f32 = 2.5;
    pub const TRAFFIC_SPEED_VARIANCE: f32 = 2.0;
    pub const MIN_TRAFFIC_DISTANCE: f32 = 105.0;
    pub const TRAFFIC_WIDTH: f32 = 50.0;
    pub const TRAFFIC_HEIGHT: f32 = 80.0;
    pub const SUV_HEIGHT: f32 = 90.0;
    /// Entities spawn above the top edge and are culled below the bottom edge
    pub const SPAWN_Y: f32 = -100.0;
    pub const DESPAWN_Y: f32 = CANVAS_HEIGHT + 100.0;

    /// Powerups
    pub const POWERUP_SIZE: f32 = 30.0;
    pub const POWERUP_SPAWN_INTERVAL_MS: f64 = 5000.0;
    pub const POWERUP_INTERVAL_PER_LAP_MS: f64 = 1000.0;
    pub const POWERUP_MAX_INTERVAL_MS: f64 = 15000.0;
    pub const BOOST_DURATION_MS: f64 = 2000.0;
    pub const BOOST_SPEED_MULTIPLIER: f32 = 1.8;
    pub const POWERUP_SCORE: f64 = 500.0;

    /// Collisions: a hit stops the car dead
    pub const COLLISION_SPEED_FACTOR: f32 = 0.0;
    pub const COLLISION_SCORE_PENALTY: f64 = 250.0;
    pub const COLLISION_FLASH_MS: f64 = 1200.0;
    pub const COLLISION_HITSTOP_MS: f64 = 250.0;
    pub const COLLISION_COOLDOWN: f32 = 1.0;

    /// Near-miss
    pub const NEAR_MISS_DISTANCE: f32 = 25.0;
    pub const NEAR_MISS_SCORE: f64 = 25.0;
    pub const NEAR_MISS_COOLDOWN: f32 = 0.3;

    /// Scoring
    pub const DISTANCE_PER_SPEED: f32 = 10.0;
    pub const SCORE_PER_METER: f64 = 0.5;
    pub const SPEED_SCORE_MULTIPLIER: f64 = 0.3;

    /// Visual effects
    pub const SCREEN_SHAKE_INTENSITY: f32 = 10.0;
    pub const SCREEN_SHAKE_DURATION_MS: f64 = 250.0;
    pub const SPEED_LINES_THRESHOLD: f32 = 12.0;
    pub const CAMERA_ZOOM_MAX: f32 = 1.08;
    pub const CAMERA_ZOOM_SPEED_THRESHOLD: f32 = 18.0;
    pub const LANE_MARKER_SPEED: f32 = 10.0;
    pub const LANE_MARKER_PERIOD: f32 = 60.0;
}

/// World-space x of an entity of `width` centered on a (possibly fractional) lane
#[inline]
pub fn lane_x(lane: f32, width: f32) -> f32 {
    consts::ROAD_LEFT + lane * consts::LANE_WIDTH + consts::LANE_WIDTH / 2.0 - width / 2.0
}

/// Convert internal speed units to displayed miles per hour
///
/// Internal speed × 10 is km/h; × 0.621371 converts to mph.
#[inline]
pub fn speed_to_mph(speed: f32) -> u32 {
    (speed * 10.0 * 0.621371).floor().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_x_centers_in_lane() {
        // Road spans 160..640, lanes are 120 wide
        assert_eq!(lane_x(0.0, 50.0), 160.0 + 60.0 - 25.0);
        assert_eq!(lane_x(3.0, 30.0), 160.0 + 360.0 + 60.0 - 15.0);
    }

    #[test]
    fn test_speed_to_mph() {
        assert_eq!(speed_to_mph(0.0), 0);
        assert_eq!(speed_to_mph(6.0), 37);
        assert_eq!(speed_to_mph(consts::AUTO_SPEED_CEILING), 93);
    }
}
