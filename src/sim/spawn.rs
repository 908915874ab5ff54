//! Traffic and powerup spawning
//!
//! Traffic spawns in cycles of `cars_per_spawn` cars, one per distinct lane.
//! A lane whose most recent car is still too close to the spawn line is
//! skipped for the cycle, so a cycle may place fewer cars than requested.

use rand::Rng;

use super::state::{CAR_PALETTE, CarKind, GameState, Powerup, TrafficCar};
use crate::consts::*;

/// True if some car in `lane` is within `min_distance` of the spawn line.
/// The distance never drops below the tallest car, so a new car cannot
/// appear on top of one that just entered.
pub fn lane_blocked(traffic: &[TrafficCar], lane: u8, min_distance: f32) -> bool {
    let min_distance = min_distance.max(SUV_HEIGHT);
    traffic
        .iter()
        .any(|car| car.lane == lane && car.y - SPAWN_Y < min_distance)
}

/// Run one traffic spawn cycle. Returns how many cars were placed.
pub fn spawn_traffic(state: &mut GameState) -> usize {
    let min_distance = MIN_TRAFFIC_DISTANCE * state.difficulty.traffic_gap_multiplier;
    let mut used_lanes: Vec<u8> = Vec::with_capacity(NUM_LANES as usize);
    let mut placed = 0;

    for _ in 0..state.difficulty.cars_per_spawn {
        let remaining: Vec<u8> = (0..NUM_LANES).filter(|l| !used_lanes.contains(l)).collect();
        if remaining.is_empty() {
            break;
        }
        let lane = remaining[state.rng.random_range(0..remaining.len())];
        used_lanes.push(lane);

        if lane_blocked(&state.traffic, lane, min_distance) {
            continue;
        }

        let kind = CarKind::ALL[state.rng.random_range(0..CarKind::ALL.len())];
        let paint = state.rng.random_range(0..CAR_PALETTE.len()) as u8;
        let speed =
            TRAFFIC_BASE_SPEED + (state.rng.random::<f32>() - 0.5) * TRAFFIC_SPEED_VARIANCE;
        state.traffic.push(TrafficCar::new(lane, kind, paint, speed));
        placed += 1;
    }

    placed
}

/// Powerups get rarer each lap, up to a cap
pub fn powerup_interval_ms(lap: u32) -> f64 {
    (POWERUP_SPAWN_INTERVAL_MS + lap as f64 * POWERUP_INTERVAL_PER_LAP_MS)
        .min(POWERUP_MAX_INTERVAL_MS)
}

/// Drop one powerup into a random lane
pub fn spawn_powerup(state: &mut GameState) {
    let lane = state.rng.random_range(0..NUM_LANES);
    state.powerups.push(Powerup::new(lane));
}

/// Fire whichever spawners are due at `now_ms`
pub fn run_spawners(state: &mut GameState, now_ms: f64) {
    let traffic_due = state
        .last_traffic_spawn_ms
        .is_none_or(|last| now_ms - last > state.difficulty.spawn_interval_ms as f64);
    if traffic_due {
        spawn_traffic(state);
        state.last_traffic_spawn_ms = Some(now_ms);
    }

    let powerup_due = state
        .last_powerup_spawn_ms
        .is_none_or(|last| now_ms - last > powerup_interval_ms(state.lap));
    if powerup_due {
        spawn_powerup(state);
        state.last_powerup_spawn_ms = Some(now_ms);
    }
}
