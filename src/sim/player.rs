//! Player motion: lane easing, automatic speed, and jumping
//!
//! Forward speed is never player-controlled. It follows the lap speed bonus,
//! multiplied while boosted, and eases toward its target exponentially.

use std::f32::consts::PI;

use glam::Vec2;

use super::effects;
use super::state::{Difficulty, GameEvent, GameState, ParticleKind, Player};
use crate::consts::*;

/// Lateral steering intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
}

/// Retarget one lane over from the lane the car is closest to.
///
/// Rounding first means a second press mid-transit moves one lane further
/// from where the car currently is, not from the old target.
pub fn change_lane(player: &mut Player, steer: Steer) {
    let nearest = player.current_lane.round() as i32;
    let next = match steer {
        Steer::Left => nearest - 1,
        Steer::Right => nearest + 1,
    };
    player.target_lane = next.clamp(0, NUM_LANES as i32 - 1) as u8;
}

/// Forward speed granted by the current lap
pub fn automatic_speed(difficulty: &Difficulty) -> f32 {
    (BASE_SPEED + difficulty.speed_bonus).clamp(MIN_SPEED, AUTO_SPEED_CEILING)
}

/// Speed the car is steering toward this frame
pub fn cruise_speed(player: &Player, difficulty: &Difficulty) -> f32 {
    let auto = automatic_speed(difficulty);
    if player.boosted {
        (auto * BOOST_SPEED_MULTIPLIER).min(AUTO_SPEED_CEILING)
    } else {
        auto
    }
}

/// Ease lane position and speed toward their targets
pub fn update_motion(player: &mut Player, difficulty: &Difficulty, dt: f32) {
    // Rate × dt is capped at 1 so a long frame lands on the target, never past it
    let target_lane = player.target_lane as f32;
    let lane_step = (LANE_CHANGE_RATE * dt).min(1.0);
    player.current_lane += (target_lane - player.current_lane) * lane_step;
    if (target_lane - player.current_lane).abs() < LANE_SNAP_EPSILON {
        player.current_lane = target_lane;
    }
    player.current_lane = player.current_lane.clamp(0.0, (NUM_LANES - 1) as f32);

    player.target_speed = cruise_speed(player, difficulty);
    let speed_step = (SPEED_EASE_RATE * dt).min(1.0);
    player.speed += (player.target_speed - player.speed) * speed_step;
    player.speed = player.speed.clamp(0.0, AUTO_SPEED_CEILING);
}

/// Whether a jump can start right now
pub fn can_jump(player: &Player) -> bool {
    !player.is_jumping && player.jump_cooldown <= 0.0
}

/// Handle a jump press: jump now, or remember the press briefly
pub fn request_jump(state: &mut GameState) {
    if can_jump(&state.player) {
        start_jump(state);
    } else {
        state.player.jump_buffered = true;
        state.player.jump_buffer_ttl = JUMP_BUFFER_TIME;
    }
}

fn start_jump(state: &mut GameState) {
    let player = &mut state.player;
    player.is_jumping = true;
    player.jump_progress = 0.0;
    player.jump_height = 0.0;
    player.jump_buffered = false;
    player.jump_buffer_ttl = 0.0;

    let takeoff = Vec2::new(player.center().x, PLAYER_Y + PLAYER_HEIGHT);
    effects::emit(
        state,
        ParticleKind::Jump,
        takeoff,
        Vec2::new(PLAYER_WIDTH, 0.0),
        20,
    );
    state.events.push(GameEvent::JumpStarted);
}

/// Advance the jump arc, cooldown and input buffer
pub fn update_jump(state: &mut GameState, dt: f32, now_ms: f64) {
    if state.player.is_jumping {
        let player = &mut state.player;
        player.jump_progress = (player.jump_progress + dt / JUMP_DURATION).min(1.0);
        player.jump_height = (PI * player.jump_progress).sin() * JUMP_HEIGHT;
        if player.jump_progress >= 1.0 {
            land(state, now_ms);
        }
    } else if state.player.jump_cooldown > 0.0 {
        state.player.jump_cooldown = (state.player.jump_cooldown - dt).max(0.0);
    }

    if state.player.jump_buffered {
        if can_jump(&state.player) {
            start_jump(state);
        } else {
            state.player.jump_buffer_ttl -= dt;
            if state.player.jump_buffer_ttl <= 0.0 {
                state.player.jump_buffered = false;
                state.player.jump_buffer_ttl = 0.0;
            }
        }
    }
}

fn land(state: &mut GameState, now_ms: f64) {
    let player = &mut state.player;
    player.is_jumping = false;
    player.jump_progress = 0.0;
    player.jump_height = 0.0;
    player.jump_cooldown = JUMP_COOLDOWN;

    let touchdown = Vec2::new(player.center().x, PLAYER_Y + PLAYER_HEIGHT);
    effects::emit(
        state,
        ParticleKind::Landing,
        touchdown,
        Vec2::new(PLAYER_WIDTH, 0.0),
        12,
    );
    state.freeze_for(now_ms, JUMP_HITSTOP_MS);
    state.events.push(GameEvent::Landed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_change_lane_rounds_current_lane() {
        let mut player = Player {
            current_lane: 1.5,
            target_lane: 2,
            ..Default::default()
        };
        change_lane(&mut player, Steer::Left);
        assert_eq!(player.target_lane, 1);
    }

    #[test]
    fn test_change_lane_clamps_at_edges() {
        let mut player = Player {
            current_lane: 0.0,
            target_lane: 0,
            ..Default::default()
        };
        change_lane(&mut player, Steer::Left);
        assert_eq!(player.target_lane, 0);

        player.current_lane = 3.0;
        change_lane(&mut player, Steer::Right);
        assert_eq!(player.target_lane, 3);
    }

    #[test]
    fn test_lane_settles_on_target() {
        let difficulty = Difficulty::initial(&Tuning::default());
        let mut player = Player::default();
        change_lane(&mut player, Steer::Right);
        for _ in 0..60 {
            update_motion(&mut player, &difficulty, DT);
        }
        assert_eq!(player.current_lane, 2.0);
    }

    #[test]
    fn test_long_frame_does_not_overshoot_lane() {
        let difficulty = Difficulty::initial(&Tuning::default());
        let mut player = Player::default();
        change_lane(&mut player, Steer::Right);
        update_motion(&mut player, &difficulty, MAX_FRAME_DT);
        assert_eq!(player.current_lane, 2.0);
    }

    #[test]
    fn test_automatic_speed_capped() {
        let mut difficulty = Difficulty::initial(&Tuning::default());
        assert_eq!(automatic_speed(&difficulty), BASE_SPEED);
        difficulty.speed_bonus = 50.0;
        assert_eq!(automatic_speed(&difficulty), AUTO_SPEED_CEILING);
    }

    #[test]
    fn test_boost_raises_cruise_speed() {
        let difficulty = Difficulty::initial(&Tuning::default());
        let mut player = Player::default();
        let normal = cruise_speed(&player, &difficulty);
        player.boosted = true;
        let boosted = cruise_speed(&player, &difficulty);
        assert!((boosted - (BASE_SPEED * BOOST_SPEED_MULTIPLIER).min(AUTO_SPEED_CEILING)).abs() < 1e-5);
        assert!(boosted > normal);
    }

    #[test]
    fn test_speed_recovers_from_stop() {
        let difficulty = Difficulty::initial(&Tuning::default());
        let mut player = Player {
            speed: 0.0,
            target_speed: 0.0,
            ..Default::default()
        };
        update_motion(&mut player, &difficulty, DT);
        assert_eq!(player.target_speed, BASE_SPEED);
        assert!(player.speed > 0.0 && player.speed < BASE_SPEED);
    }

    #[test]
    fn test_jump_arc_and_landing() {
        let mut state = GameState::new(3);
        request_jump(&mut state);
        assert!(state.player.is_jumping);
        assert_eq!(state.drain_events(), vec![GameEvent::JumpStarted]);

        update_jump(&mut state, JUMP_DURATION / 2.0, 0.0);
        assert!((state.player.jump_height - JUMP_HEIGHT).abs() < 1e-3);

        update_jump(&mut state, JUMP_DURATION / 2.0 + 0.01, 1000.0);
        assert!(!state.player.is_jumping);
        assert_eq!(state.player.jump_height, 0.0);
        assert_eq!(state.player.jump_cooldown, JUMP_COOLDOWN);
        assert!(state.is_frozen(1000.0 + JUMP_HITSTOP_MS / 2.0));
        assert_eq!(state.drain_events(), vec![GameEvent::Landed]);
    }

    #[test]
    fn test_early_press_is_buffered() {
        let mut state = GameState::new(3);
        state.player.jump_cooldown = 0.1;
        request_jump(&mut state);
        assert!(!state.player.is_jumping);
        assert!(state.player.jump_buffered);

        // Cooldown runs out inside the buffer window
        update_jump(&mut state, 0.06, 0.0);
        assert!(!state.player.is_jumping);
        update_jump(&mut state, 0.06, 0.0);
        assert!(state.player.is_jumping);
        assert!(!state.player.jump_buffered);
    }

    #[test]
    fn test_stale_buffer_expires() {
        let mut state = GameState::new(3);
        state.player.jump_cooldown = 0.5;
        request_jump(&mut state);
        for _ in 0..10 {
            update_jump(&mut state, 0.05, 0.0);
        }
        assert!(!state.player.is_jumping);
        assert!(!state.player.jump_buffered);
    }

    proptest! {
        #[test]
        fn prop_speed_approaches_target_without_overshoot(
            start in 0.0f32..AUTO_SPEED_CEILING,
            bonus in 0.0f32..20.0,
            dt in 0.0f32..=MAX_FRAME_DT,
            boosted in any::<bool>(),
        ) {
            let difficulty = Difficulty { speed_bonus: bonus, ..Difficulty::initial(&Tuning::default()) };
            let mut player = Player { speed: start, boosted, ..Default::default() };
            let target = cruise_speed(&player, &difficulty);
            let before = (target - player.speed).abs();
            update_motion(&mut player, &difficulty, dt);
            let after = (target - player.speed).abs();
            prop_assert!(after <= before + 1e-5);
            // Still on the same side of the target
            prop_assert!((target - start) * (target - player.speed) >= -1e-5);
            prop_assert!(player.speed >= 0.0 && player.speed <= AUTO_SPEED_CEILING);
        }

        #[test]
        fn prop_lane_stays_in_bounds(
            steers in proptest::collection::vec(any::<bool>(), 0..40),
            dt in 0.001f32..=MAX_FRAME_DT,
        ) {
            let difficulty = Difficulty::initial(&Tuning::default());
            let mut player = Player::default();
            for right in steers {
                change_lane(&mut player, if right { Steer::Right } else { Steer::Left });
                update_motion(&mut player, &difficulty, dt);
                prop_assert!(player.target_lane < NUM_LANES);
                prop_assert!(player.current_lane >= 0.0);
                prop_assert!(player.current_lane <= (NUM_LANES - 1) as f32);
            }
            for _ in 0..400 {
                update_motion(&mut player, &difficulty, dt);
            }
            prop_assert_eq!(player.current_lane, player.target_lane as f32);
        }
    }
}
