//! Particles, speed lines and screen effects
//!
//! Purely presentational data, but it is created and aged inside the tick so
//! its lifetime follows game time (hit-stop freezes it too).

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{GameState, Particle, ParticleColor, ParticleKind, SpeedLine};
use crate::consts::*;

/// Velocity, life, size and color for a new particle of `kind`
fn recipe(kind: ParticleKind, rng: &mut Pcg32) -> (Vec2, f32, f32, ParticleColor) {
    let mut vel = Vec2::new(
        (rng.random::<f32>() - 0.5) * 5.0,
        (rng.random::<f32>() - 0.5) * 5.0,
    );
    let mut size = rng.random::<f32>() * 3.0 + 2.0;
    let hsl = |hue: f32, lightness: f32| ParticleColor {
        hue,
        saturation: 100.0,
        lightness,
        opacity: 1.0,
    };

    let (life, color) = match kind {
        ParticleKind::Electric => {
            vel.x *= 2.0;
            vel.y += 3.0;
            size = rng.random::<f32>() * 2.0 + 1.0;
            let color = hsl(
                180.0 + rng.random::<f32>() * 60.0,
                70.0 + rng.random::<f32>() * 20.0,
            );
            (0.4, color)
        }
        ParticleKind::Impact => {
            vel *= 4.0;
            size = rng.random::<f32>() * 5.0 + 3.0;
            (0.6, hsl(rng.random::<f32>() * 60.0, 50.0))
        }
        ParticleKind::Collect => {
            vel *= 3.0;
            size = rng.random::<f32>() * 4.0 + 2.0;
            (1.2, hsl(180.0 + rng.random::<f32>() * 60.0, 60.0))
        }
        ParticleKind::Jump => {
            vel.x *= 1.5;
            vel.y = -rng.random::<f32>() * 4.0 - 3.0;
            (0.5, hsl(180.0 + rng.random::<f32>() * 60.0, 70.0))
        }
        ParticleKind::Landing => {
            vel.x *= 2.0;
            vel.y = -rng.random::<f32>() * 3.0;
            size = rng.random::<f32>() * 3.0 + 2.0;
            let white = ParticleColor {
                hue: 0.0,
                saturation: 0.0,
                lightness: 100.0,
                opacity: 0.6 + rng.random::<f32>() * 0.4,
            };
            (0.3, white)
        }
        ParticleKind::Celebrate => {
            vel.x = (rng.random::<f32>() - 0.5) * 10.0;
            vel.y = -rng.random::<f32>() * 10.0 - 8.0;
            size = rng.random::<f32>() * 6.0 + 3.0;
            (2.0, hsl(rng.random::<f32>() * 360.0, 60.0))
        }
        ParticleKind::NearMiss => {
            vel *= 1.5;
            size = rng.random::<f32>() * 3.0 + 2.0;
            (0.4, hsl(60.0, 60.0 + rng.random::<f32>() * 20.0))
        }
    };

    (vel, life, size, color)
}

/// Push a particle, evicting the oldest ones once the cap is reached
pub fn push_particle(particles: &mut Vec<Particle>, cap: usize, particle: Particle) {
    if cap == 0 {
        return;
    }
    if particles.len() >= cap {
        let excess = particles.len() + 1 - cap;
        particles.drain(..excess);
    }
    particles.push(particle);
}

/// Spawn one particle of `kind` at `pos`
pub fn spawn_particle(state: &mut GameState, kind: ParticleKind, pos: Vec2) {
    let (vel, life, size, color) = recipe(kind, &mut state.rng);
    push_particle(
        &mut state.particles,
        state.max_particles,
        Particle {
            kind,
            pos,
            vel,
            life,
            max_life: life,
            alpha: 1.0,
            size,
            color,
        },
    );
}

/// Spawn `count` particles scattered uniformly in a `jitter`-sized box around `origin`
pub fn emit(state: &mut GameState, kind: ParticleKind, origin: Vec2, jitter: Vec2, count: usize) {
    for _ in 0..count {
        let offset = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * jitter.x,
            (state.rng.random::<f32>() - 0.5) * jitter.y,
        );
        spawn_particle(state, kind, origin + offset);
    }
}

/// Electric arcs crackling around a boosted car
pub fn boost_sparks(state: &mut GameState) {
    if !state.player.boosted || state.rng.random::<f32>() >= 0.9 {
        return;
    }
    let center = state.player.center();
    emit(
        state,
        ParticleKind::Electric,
        center,
        Vec2::new(PLAYER_WIDTH * 1.5, PLAYER_HEIGHT),
        4,
    );
}

/// Integrate and age particles; drop dead ones
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel * dt * 60.0;
        p.life -= dt;
        p.alpha = (p.life / p.max_life).max(0.0);
    }
    particles.retain(|p| p.life > 0.0);
}

/// Occasionally start a new speed line while driving fast
pub fn maybe_add_speed_line(state: &mut GameState) {
    if state.player.speed <= SPEED_LINES_THRESHOLD || state.rng.random::<f32>() >= 0.3 {
        return;
    }
    let rng = &mut state.rng;
    state.speed_lines.push(SpeedLine {
        pos: Vec2::new(rng.random::<f32>() * CANVAS_WIDTH, -10.0),
        speed: state.player.speed * 2.0 + rng.random::<f32>() * 5.0,
        length: 30.0 + rng.random::<f32>() * 40.0,
        life: 0.8,
        max_life: 0.8,
        alpha: 1.0,
    });
}

/// Fall and fade speed lines; drop dead or off-screen ones
pub fn update_speed_lines(lines: &mut Vec<SpeedLine>, dt: f32) {
    for line in lines.iter_mut() {
        line.pos.y += line.speed * dt * 60.0;
        line.life -= dt;
        line.alpha = (line.life / line.max_life).max(0.0);
    }
    lines.retain(|l| l.life > 0.0 && l.pos.y <= CANVAS_HEIGHT);
}

/// Start (or replace) a screen shake
pub fn shake(state: &mut GameState, intensity: f32, now_ms: f64, duration_ms: f64) {
    state.screen_shake.intensity = intensity;
    state.screen_shake.end_ms = now_ms + duration_ms;
}

/// Shake offset, damage flash, camera zoom and scroll offsets
pub fn update_screen_effects(state: &mut GameState, dt: f32, now_ms: f64) {
    if now_ms < state.screen_shake.end_ms {
        let intensity = state.screen_shake.intensity;
        state.screen_shake.offset = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * intensity,
            (state.rng.random::<f32>() - 0.5) * intensity,
        );
    } else {
        state.screen_shake.offset = Vec2::ZERO;
        state.screen_shake.intensity = 0.0;
    }

    state.damage_flash.active = now_ms < state.damage_flash.end_ms;

    let speed = state.player.speed;
    let speed_ratio = (speed - CAMERA_ZOOM_SPEED_THRESHOLD).max(0.0)
        / (MAX_SPEED - CAMERA_ZOOM_SPEED_THRESHOLD);
    let target_zoom = 1.0 + speed_ratio * (CAMERA_ZOOM_MAX - 1.0);
    state.camera_zoom += (target_zoom - state.camera_zoom) * (3.0 * dt).min(1.0);

    let scroll_multiplier = 1.0 + (speed / MAX_SPEED) * 0.5;
    state.background_offset += speed * dt * 50.0 * scroll_multiplier;
    state.lane_marker_offset += speed * LANE_MARKER_SPEED * dt;
    if state.lane_marker_offset > LANE_MARKER_PERIOD {
        state.lane_marker_offset = 0.0;
    }
}
