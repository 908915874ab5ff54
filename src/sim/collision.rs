//! Collision and near-miss detection
//!
//! Everything is axis-aligned boxes. Traffic collisions register whether or
//! not the player is airborne.

use glam::Vec2;

use super::effects;
use super::state::{GameEvent, GameState, ParticleKind, TrafficCar};
use crate::consts::*;

/// Axis-aligned bounding box (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    pub fn vertical_overlap(&self, other: &Aabb) -> bool {
        self.y < other.y + other.height && self.y + self.height > other.y
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// The player's hitbox this frame
pub fn player_box(state: &GameState) -> Aabb {
    Aabb::new(state.player.x(), state.player.y(), PLAYER_WIDTH, PLAYER_HEIGHT)
}

pub fn car_box(car: &TrafficCar) -> Aabb {
    Aabb::new(car.x, car.y, car.width, car.height)
}

/// Car passing alongside: rows overlap and the horizontal gap between the
/// boxes is positive but under `NEAR_MISS_DISTANCE`
pub fn is_near_miss(player: &Aabb, car: &Aabb) -> bool {
    if !player.vertical_overlap(car) {
        return false;
    }
    let center_distance = (player.center_x() - car.center_x()).abs();
    let touching = player.width / 2.0 + car.width / 2.0;
    center_distance > touching && center_distance < touching + NEAR_MISS_DISTANCE
}

/// Full stop, score penalty, freeze frame, shake and flash
pub fn handle_collision(state: &mut GameState, impact: Vec2, now_ms: f64) {
    state.freeze_for(now_ms, COLLISION_HITSTOP_MS);

    state.player.speed *= COLLISION_SPEED_FACTOR;
    state.player.target_speed *= COLLISION_SPEED_FACTOR;
    state.penalize(COLLISION_SCORE_PENALTY);

    effects::shake(
        state,
        SCREEN_SHAKE_INTENSITY * 1.5,
        now_ms,
        SCREEN_SHAKE_DURATION_MS * 1.5,
    );
    state.damage_flash.active = true;
    state.damage_flash.end_ms = now_ms + COLLISION_FLASH_MS;
    state.collision_cooldown = COLLISION_COOLDOWN;

    effects::emit(state, ParticleKind::Impact, impact, Vec2::ZERO, 25);
    state.events.push(GameEvent::Collision);
}

/// Pay out a near-miss for the car at `index`
pub fn handle_near_miss(state: &mut GameState, index: usize) {
    let car = &mut state.traffic[index];
    car.near_missed = true;
    let origin = car.center();
    let width = car.width;

    state.score += NEAR_MISS_SCORE;
    state.near_miss_cooldown = NEAR_MISS_COOLDOWN;
    effects::emit(
        state,
        ParticleKind::NearMiss,
        origin,
        Vec2::new(width, 0.0),
        5,
    );
    state.events.push(GameEvent::NearMiss);
}

/// Start a boost and pay the pickup bonus
pub fn collect_powerup(state: &mut GameState, now_ms: f64) {
    state.player.boosted = true;
    state.player.boost_end_ms = now_ms + BOOST_DURATION_MS;
    state.player.target_speed =
        (MAX_SPEED + state.difficulty.speed_bonus) * BOOST_SPEED_MULTIPLIER;
    state.score += POWERUP_SCORE;

    effects::shake(state, SCREEN_SHAKE_INTENSITY * 0.8, now_ms, 200.0);
    let center = state.player.center();
    effects::emit(state, ParticleKind::Collect, center, Vec2::ZERO, 40);
    state.events.push(GameEvent::PowerupCollected);
}

/// Move traffic, cull it, and test each car for near-miss and collision
pub fn update_traffic(state: &mut GameState, dt: f32, now_ms: f64) {
    if state.near_miss_cooldown > 0.0 {
        state.near_miss_cooldown -= dt;
    }

    let player_speed = state.player.speed;
    for car in state.traffic.iter_mut() {
        car.y += (player_speed + car.speed) * dt * 60.0;
        car.scale = (1.0 + (car.y - 200.0) / 600.0).clamp(0.7, 1.3);
    }
    // The near-miss flag leaves with the car
    state.traffic.retain(|car| car.y <= DESPAWN_Y);

    for index in 0..state.traffic.len() {
        // Player box is re-read each car; a collision never moves the player
        let player = player_box(state);
        let car = car_box(&state.traffic[index]);

        if state.near_miss_cooldown <= 0.0
            && !state.traffic[index].near_missed
            && is_near_miss(&player, &car)
        {
            handle_near_miss(state, index);
        }

        if state.collision_cooldown <= 0.0 && player.overlaps(&car) {
            let impact = state.traffic[index].center();
            handle_collision(state, impact, now_ms);
        }
    }

    if state.collision_cooldown > 0.0 {
        state.collision_cooldown -= dt;
    }
}

/// Move, animate and cull powerups; collect any the player touches
pub fn update_powerups(state: &mut GameState, dt: f32, now_ms: f64) {
    let player_speed = state.player.speed;
    for powerup in state.powerups.iter_mut() {
        powerup.y += player_speed * dt * 60.0;
        powerup.rotation += dt * 3.0;
        powerup.pulse += dt * 5.0;
    }
    state.powerups.retain(|p| p.y <= DESPAWN_Y);

    let player = player_box(state);
    let before = state.powerups.len();
    state
        .powerups
        .retain(|p| !player.overlaps(&Aabb::new(p.x, p.y, p.width, p.height)));
    for _ in state.powerups.len()..before {
        collect_powerup(state, now_ms);
    }
}
