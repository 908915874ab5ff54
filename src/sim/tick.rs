//! Frame driver and per-frame simulation tick
//!
//! The host calls [`FrameClock::advance`] once per display refresh with a
//! wall-clock timestamp. The clock clamps the frame delta, honors the
//! freeze-frame window, and runs one [`tick`] while a run is in progress.

use glam::Vec2;

use super::autopilot;
use super::collision;
use super::difficulty::next_difficulty;
use super::effects;
use super::player::{self, Steer};
use super::spawn;
use super::state::{GameEvent, GamePhase, GameState, ParticleKind};
use crate::consts::*;

/// Player intents for a single tick, already edge-filtered
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub lane_left: bool,
    pub lane_right: bool,
    pub jump: bool,
    /// Idle/demo mode - autopilot drives
    pub idle_mode: bool,
}

/// What a frame did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameStep {
    /// Inside a hit-stop window; only rendering should run
    Frozen,
    /// Not playing (menu or game over)
    Idle,
    /// One simulation tick ran with this delta
    Ticked { dt: f32 },
}

/// Turns wall-clock timestamps into clamped frame deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call, clamped to `[0, MAX_FRAME_DT]`.
    /// The first call returns 0.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, MAX_FRAME_DT as f64) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt
    }

    /// Forget the previous timestamp (e.g. after a restart)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Run one frame. The previous timestamp advances even while frozen, so
    /// the first tick after a hit-stop does not integrate the frozen time.
    pub fn advance(&mut self, state: &mut GameState, input: &TickInput, now_ms: f64) -> FrameStep {
        let dt = self.delta(now_ms);

        if state.is_frozen(now_ms) {
            return FrameStep::Frozen;
        }
        state.hit_stop_until_ms = None;

        if state.phase != GamePhase::Playing {
            return FrameStep::Idle;
        }

        tick(state, input, dt, now_ms);
        FrameStep::Ticked { dt }
    }
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, now_ms: f64) {
    if state.phase != GamePhase::Playing {
        return;
    }

    let input = if input.idle_mode {
        autopilot::drive(state)
    } else {
        input.clone()
    };

    state.timer -= dt;
    if state.timer <= 0.0 {
        state.timer = 0.0;
        end_game(state);
        return;
    }

    if state.lap_distance >= state.difficulty.finish_distance {
        complete_lap(state);
    }

    if input.lane_left {
        player::change_lane(&mut state.player, Steer::Left);
    }
    if input.lane_right {
        player::change_lane(&mut state.player, Steer::Right);
    }
    if input.jump {
        player::request_jump(state);
    }

    player::update_motion(&mut state.player, &state.difficulty, dt);
    effects::boost_sparks(state);
    player::update_jump(state, dt, now_ms);

    let gained = state.player.speed * dt * DISTANCE_PER_SPEED;
    state.distance_total += gained;
    state.lap_distance += gained;
    state.score += gained as f64 * SCORE_PER_METER
        + state.player.speed as f64 * SPEED_SCORE_MULTIPLIER * dt as f64;

    spawn::run_spawners(state, now_ms);
    collision::update_traffic(state, dt, now_ms);
    collision::update_powerups(state, dt, now_ms);
    effects::update_particles(&mut state.particles, dt);
    effects::update_speed_lines(&mut state.speed_lines, dt);

    if state.player.boosted && now_ms > state.player.boost_end_ms {
        state.player.boosted = false;
    }

    effects::update_screen_effects(state, dt, now_ms);
    effects::maybe_add_speed_line(state);
}

/// Lap finished: escalate difficulty, refill the timer, celebrate.
/// Traffic carries over into the new lap.
pub fn complete_lap(state: &mut GameState) {
    state.lap += 1;
    state.lap_distance = 0.0;
    state.difficulty = next_difficulty(&state.tuning, &state.difficulty, state.lap);
    state.timer = state.difficulty.lap_time_budget;

    for car in state.traffic.iter_mut() {
        car.near_missed = false;
    }

    effects::emit(
        state,
        ParticleKind::Celebrate,
        Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0),
        Vec2::splat(300.0),
        80,
    );

    log::debug!(
        "Lap {}: bonus {:.2}, spawn {:.0}ms x{}, gap {:.3}, finish {:.0}, time {:.1}s",
        state.lap,
        state.difficulty.speed_bonus,
        state.difficulty.spawn_interval_ms,
        state.difficulty.cars_per_spawn,
        state.difficulty.traffic_gap_multiplier,
        state.difficulty.finish_distance,
        state.difficulty.lap_time_budget,
    );
    state.events.push(GameEvent::LapCompleted { lap: state.lap });
}

fn end_game(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    let score = state.final_score();
    let laps_completed = state.laps_completed();
    log::info!("Time's up: {} laps, score {}", laps_completed, score);
    state.events.push(GameEvent::GameOver {
        score,
        laps_completed,
    });
}
