//! Attract-mode driver
//!
//! Reads the state and produces the same intents a player would. It only
//! steers once the car has settled into a lane, one lane at a time.

use super::state::GameState;
use super::tick::TickInput;
use crate::consts::*;

/// Clearance ahead that is considered safe to stay in
const SAFE_CLEARANCE: f32 = 260.0;

/// Free road ahead of the player in `lane`. Negative when a car overlaps the
/// player's rows right now; infinite when the lane is empty.
pub fn lane_clearance(state: &GameState, lane: u8) -> f32 {
    state
        .traffic
        .iter()
        .filter(|car| car.lane == lane && car.y < PLAYER_Y + PLAYER_HEIGHT)
        .map(|car| PLAYER_Y - (car.y + car.height))
        .fold(f32::INFINITY, f32::min)
}

fn powerup_ahead(state: &GameState, lane: u8) -> bool {
    state
        .powerups
        .iter()
        .any(|p| p.lane == lane && p.y + p.height < PLAYER_Y + PLAYER_HEIGHT)
}

/// Pick this frame's intents
pub fn drive(state: &GameState) -> TickInput {
    let player = &state.player;
    let mut input = TickInput::default();
    if player.current_lane != player.target_lane as f32 {
        return input;
    }

    let lane = player.target_lane;
    let here = lane_clearance(state, lane);
    let neighbors = [
        lane.checked_sub(1).map(|l| (l, false)),
        (lane + 1 < NUM_LANES).then_some((lane + 1, true)),
    ];

    let mut best: Option<(u8, bool, f32)> = None;
    for (candidate, right) in neighbors.into_iter().flatten() {
        let clearance = lane_clearance(state, candidate);
        if best.is_none_or(|(_, _, c)| clearance > c) {
            best = Some((candidate, right, clearance));
        }
    }

    let steer_right = match best {
        Some((_, right, clearance)) if here < SAFE_CLEARANCE && clearance > here => Some(right),
        Some((candidate, right, clearance))
            if here >= SAFE_CLEARANCE
                && clearance >= SAFE_CLEARANCE
                && powerup_ahead(state, candidate)
                && !powerup_ahead(state, lane) =>
        {
            Some(right)
        }
        _ => None,
    };

    match steer_right {
        Some(true) => input.lane_right = true,
        Some(false) => input.lane_left = true,
        None => {}
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{CarKind, Powerup, TrafficCar};

    fn car_at(lane: u8, y: f32) -> TrafficCar {
        let mut car = TrafficCar::new(lane, CarKind::Sedan, 0, 2.5);
        car.y = y;
        car
    }

    #[test]
    fn test_empty_road_holds_lane() {
        let state = GameState::new(1);
        let input = drive(&state);
        assert!(!input.lane_left && !input.lane_right);
    }

    #[test]
    fn test_dodges_car_ahead() {
        let mut state = GameState::new(1);
        state.traffic.push(car_at(START_LANE, PLAYER_Y - 200.0));
        state.traffic.push(car_at(START_LANE - 1, PLAYER_Y - 150.0));
        let input = drive(&state);
        assert!(input.lane_right);
        assert!(!input.lane_left);
    }

    #[test]
    fn test_passed_cars_ignored() {
        let mut state = GameState::new(1);
        state.traffic.push(car_at(START_LANE, PLAYER_Y + PLAYER_HEIGHT + 1.0));
        assert_eq!(lane_clearance(&state, START_LANE), f32::INFINITY);
    }

    #[test]
    fn test_goes_for_powerup_when_clear() {
        let mut state = GameState::new(1);
        let mut powerup = Powerup::new(START_LANE - 1);
        powerup.y = 100.0;
        state.powerups.push(powerup);
        let input = drive(&state);
        assert!(input.lane_left);
    }

    #[test]
    fn test_waits_while_changing_lanes() {
        let mut state = GameState::new(1);
        state.player.current_lane = 1.5;
        state.player.target_lane = 2;
        state.traffic.push(car_at(2, PLAYER_Y - 100.0));
        let input = drive(&state);
        assert!(!input.lane_left && !input.lane_right);
    }
}
