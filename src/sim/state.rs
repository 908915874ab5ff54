//! Game state and core simulation types
//!
//! `GameState` is the single owned aggregate every subsystem mutates. A
//! restart replaces it wholesale; there is no partial reset path.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::lane_x;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, nothing simulates
    Menu,
    /// Active gameplay
    Playing,
    /// Timer ran out
    GameOver,
}

/// Things that happened during a tick, drained by the host each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    /// A lap finished; `lap` is the lap now being driven
    LapCompleted { lap: u32 },
    Collision,
    NearMiss,
    PowerupCollected,
    JumpStarted,
    Landed,
    GameOver { score: u64, laps_completed: u32 },
}

/// Difficulty snapshot, mutated only at lap boundaries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Added to `BASE_SPEED` for the automatic forward speed
    pub speed_bonus: f32,
    pub spawn_interval_ms: f32,
    /// Scales `MIN_TRAFFIC_DISTANCE`; shrinks every lap
    pub traffic_gap_multiplier: f32,
    /// Lap distance needed to finish the current lap
    pub finish_distance: f32,
    /// Seconds granted for the current lap
    pub lap_time_budget: f32,
    pub cars_per_spawn: u8,
}

impl Difficulty {
    pub fn initial(tuning: &Tuning) -> Self {
        Self {
            speed_bonus: 0.0,
            spawn_interval_ms: tuning.initial_spawn_interval_ms,
            traffic_gap_multiplier: 1.0,
            finish_distance: tuning.initial_finish_distance,
            lap_time_budget: tuning.initial_lap_time,
            cars_per_spawn: 1,
        }
    }
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Lane position, fractional while changing lanes
    pub current_lane: f32,
    pub target_lane: u8,
    pub speed: f32,
    pub target_speed: f32,
    pub boosted: bool,
    pub boost_end_ms: f64,

    pub is_jumping: bool,
    /// 0 → 1 over `JUMP_DURATION`
    pub jump_progress: f32,
    /// Height above the road, for rendering
    pub jump_height: f32,
    /// Seconds until the next jump is allowed
    pub jump_cooldown: f32,
    pub jump_buffered: bool,
    /// Seconds a buffered jump press stays valid
    pub jump_buffer_ttl: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            current_lane: START_LANE as f32,
            target_lane: START_LANE,
            speed: BASE_SPEED,
            target_speed: BASE_SPEED,
            boosted: false,
            boost_end_ms: 0.0,
            is_jumping: false,
            jump_progress: 0.0,
            jump_height: 0.0,
            jump_cooldown: 0.0,
            jump_buffered: false,
            jump_buffer_ttl: 0.0,
        }
    }
}

impl Player {
    /// Left edge in world space, derived from the lane position
    pub fn x(&self) -> f32 {
        lane_x(self.current_lane, PLAYER_WIDTH)
    }

    pub fn y(&self) -> f32 {
        PLAYER_Y
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x() + PLAYER_WIDTH / 2.0, PLAYER_Y + PLAYER_HEIGHT / 2.0)
    }
}

/// Traffic body styles (cosmetic apart from SUV height)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarKind {
    Sedan,
    Suv,
    Sports,
}

impl CarKind {
    pub const ALL: [CarKind; 3] = [CarKind::Sedan, CarKind::Suv, CarKind::Sports];

    pub fn height(self) -> f32 {
        match self {
            CarKind::Suv => SUV_HEIGHT,
            CarKind::Sedan | CarKind::Sports => TRAFFIC_HEIGHT,
        }
    }
}

/// Traffic paint colors as (hue, saturation %, lightness %)
pub const CAR_PALETTE: [(f32, f32, f32); 8] = [
    (0.0, 80.0, 55.0),   // Red
    (210.0, 80.0, 55.0), // Blue
    (45.0, 80.0, 55.0),  // Yellow
    (280.0, 80.0, 55.0), // Purple
    (160.0, 80.0, 55.0), // Cyan
    (30.0, 80.0, 55.0),  // Orange
    (0.0, 0.0, 20.0),    // Dark gray
    (0.0, 0.0, 95.0),    // White
];

/// An oncoming traffic car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficCar {
    pub lane: u8,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Added to the player's speed when scrolling the car
    pub speed: f32,
    pub kind: CarKind,
    /// Index into `CAR_PALETTE`
    pub paint: u8,
    /// Depth scale, recomputed from y each frame
    pub scale: f32,
    /// Already paid out a near-miss bonus
    pub near_missed: bool,
}

impl TrafficCar {
    pub fn new(lane: u8, kind: CarKind, paint: u8, speed: f32) -> Self {
        Self {
            lane,
            x: lane_x(lane as f32, TRAFFIC_WIDTH),
            y: SPAWN_Y,
            width: TRAFFIC_WIDTH,
            height: kind.height(),
            speed,
            kind,
            paint,
            scale: 1.0,
            near_missed: false,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A boost pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub lane: u8,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Spin angle (radians), presentational
    pub rotation: f32,
    /// Pulse phase, presentational
    pub pulse: f32,
}

impl Powerup {
    pub fn new(lane: u8) -> Self {
        Self {
            lane,
            x: lane_x(lane as f32, POWERUP_SIZE),
            y: SPAWN_Y,
            width: POWERUP_SIZE,
            height: POWERUP_SIZE,
            rotation: 0.0,
            pulse: 0.0,
        }
    }
}

/// What produced a particle; selects its creation recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Sparks around a boosted car
    Electric,
    /// Traffic collision burst
    Impact,
    /// Powerup pickup burst
    Collect,
    /// Takeoff burst
    Jump,
    /// Touchdown dust
    Landing,
    /// Lap completion fireworks
    Celebrate,
    /// Near-miss flash
    NearMiss,
}

/// HSL color with opacity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleColor {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub opacity: f32,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    /// Pixels per 1/60 s
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub alpha: f32,
    pub size: f32,
    pub color: ParticleColor,
}

/// A falling motion streak drawn at high speed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedLine {
    pub pos: Vec2,
    pub speed: f32,
    pub length: f32,
    pub life: f32,
    pub max_life: f32,
    pub alpha: f32,
}

/// Camera shake, randomized offset each frame while active
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScreenShake {
    pub intensity: f32,
    pub end_ms: f64,
    pub offset: Vec2,
}

/// Red overlay after a collision
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DamageFlash {
    pub active: bool,
    pub end_ms: f64,
}

/// Default live-particle cap
pub const MAX_PARTICLES: usize = 600;

/// Complete game state for one run
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed
    pub seed: u64,
    #[serde(skip)]
    pub rng: Pcg32,
    /// Difficulty policy for this run
    #[serde(skip)]
    pub tuning: Tuning,

    pub phase: GamePhase,
    pub distance_total: f32,
    /// Distance driven in the current lap
    pub lap_distance: f32,
    /// Current lap (1-based)
    pub lap: u32,
    pub score: f64,
    /// Seconds left in the current lap
    pub timer: f32,
    pub difficulty: Difficulty,

    pub player: Player,
    pub traffic: Vec<TrafficCar>,
    pub powerups: Vec<Powerup>,
    pub particles: Vec<Particle>,
    pub speed_lines: Vec<SpeedLine>,

    /// Wall-clock time of the last spawn (None = spawn on the next tick)
    pub last_traffic_spawn_ms: Option<f64>,
    pub last_powerup_spawn_ms: Option<f64>,
    /// Seconds until another traffic collision can register
    pub collision_cooldown: f32,
    /// Seconds until another near-miss can score
    pub near_miss_cooldown: f32,
    /// Freeze-frame window end (wall clock)
    pub hit_stop_until_ms: Option<f64>,

    pub screen_shake: ScreenShake,
    pub damage_flash: DamageFlash,
    pub camera_zoom: f32,
    pub background_offset: f32,
    pub lane_marker_offset: f32,

    /// Live-particle cap, oldest evicted first
    pub max_particles: usize,

    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state in the menu phase
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let difficulty = Difficulty::initial(&tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Menu,
            distance_total: 0.0,
            lap_distance: 0.0,
            lap: 1,
            score: 0.0,
            timer: difficulty.lap_time_budget,
            difficulty,
            player: Player::default(),
            traffic: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            speed_lines: Vec::new(),
            last_traffic_spawn_ms: None,
            last_powerup_spawn_ms: None,
            collision_cooldown: 0.0,
            near_miss_cooldown: 0.0,
            hit_stop_until_ms: None,
            screen_shake: ScreenShake::default(),
            damage_flash: DamageFlash::default(),
            camera_zoom: 1.0,
            background_offset: 0.0,
            lane_marker_offset: 0.0,
            max_particles: MAX_PARTICLES,
            events: Vec::new(),
        }
    }

    /// Leave the menu and start driving
    pub fn start(&mut self) {
        if self.phase == GamePhase::Menu {
            self.phase = GamePhase::Playing;
            self.events.push(GameEvent::GameStarted);
        }
    }

    /// Throw away the run and begin a fresh one with the same tuning
    pub fn restart(&mut self, seed: u64) {
        let tuning = std::mem::take(&mut self.tuning);
        let max_particles = self.max_particles;
        *self = Self::with_tuning(seed, tuning);
        self.max_particles = max_particles;
        self.start();
    }

    /// Score as shown to the player and stored on the leaderboard
    pub fn final_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    pub fn laps_completed(&self) -> u32 {
        self.lap.saturating_sub(1)
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether the freeze-frame window covers `now_ms`
    pub fn is_frozen(&self, now_ms: f64) -> bool {
        self.hit_stop_until_ms.is_some_and(|end| now_ms < end)
    }

    /// Extend the freeze-frame window to at least `now_ms + duration_ms`
    pub fn freeze_for(&mut self, now_ms: f64, duration_ms: f64) {
        let end = now_ms + duration_ms;
        self.hit_stop_until_ms = Some(self.hit_stop_until_ms.map_or(end, |e| e.max(end)));
    }

    /// Apply a flat penalty without letting the score go negative
    pub fn penalize(&mut self, amount: f64) {
        self.score = (self.score - amount).max(0.0);
    }
}
