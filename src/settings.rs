//! Game settings and preferences
//!
//! Persisted separately from the leaderboard in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// Particle density presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ParticleQuality {
    Off,
    Low,
    #[default]
    Medium,
    High,
}

impl ParticleQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticleQuality::Off => "Off",
            ParticleQuality::Low => "Low",
            ParticleQuality::Medium => "Medium",
            ParticleQuality::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Some(ParticleQuality::Off),
            "low" => Some(ParticleQuality::Low),
            "medium" | "med" => Some(ParticleQuality::Medium),
            "high" => Some(ParticleQuality::High),
            _ => None,
        }
    }

    /// Live-particle cap for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            ParticleQuality::Off => 0,
            ParticleQuality::Low => 150,
            ParticleQuality::Medium => crate::sim::MAX_PARTICLES,
            ParticleQuality::High => 1200,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub music_muted: bool,

    // === Visual Effects ===
    pub particles: ParticleQuality,
    /// Screen shake on collisions and pickups
    pub screen_shake: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no damage flash)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 0.55,
            music_muted: false,
            particles: ParticleQuality::Medium,
            screen_shake: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective damage flash (respects reduced_motion)
    pub fn effective_damage_flash(&self) -> bool {
        !self.reduced_motion
    }

    pub fn max_particles(&self) -> usize {
        self.particles.max_particles()
    }

    /// Music volume clamped to the valid range
    pub fn effective_music_volume(&self) -> f32 {
        self.music_volume.clamp(0.0, 1.0)
    }

    /// Push simulation-relevant preferences into a run
    pub fn apply(&self, state: &mut GameState) {
        state.max_particles = self.max_particles();
        let excess = state.particles.len().saturating_sub(state.max_particles);
        state.particles.drain(..excess);
    }

    /// Strip presentation effects the player turned off. Run after each tick.
    pub fn filter_effects(&self, state: &mut GameState) {
        if !self.effective_screen_shake() {
            state.screen_shake.offset = glam::Vec2::ZERO;
        }
        if !self.effective_damage_flash() {
            state.damage_flash.active = false;
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "electric_rush_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring malformed settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to save settings");
                } else {
                    log::info!("Settings saved");
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ParticleKind, effects};

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.music_volume, 0.55);
        assert!(!settings.music_muted);
        assert_eq!(settings.max_particles(), 600);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"music_muted": true}"#).unwrap();
        assert!(settings.music_muted);
        assert_eq!(settings.music_volume, 0.55);
        assert!(settings.screen_shake);
    }

    #[test]
    fn test_reduced_motion_overrides_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_screen_shake());
        assert!(!settings.effective_damage_flash());
    }

    #[test]
    fn test_quality_parse() {
        assert_eq!(ParticleQuality::parse("HIGH"), Some(ParticleQuality::High));
        assert_eq!(ParticleQuality::parse("med"), Some(ParticleQuality::Medium));
        assert_eq!(ParticleQuality::parse("ultra"), None);
    }

    #[test]
    fn test_apply_trims_particles() {
        let mut state = GameState::new(1);
        effects::emit(
            &mut state,
            ParticleKind::Celebrate,
            glam::Vec2::ZERO,
            glam::Vec2::ZERO,
            300,
        );
        let settings = Settings {
            particles: ParticleQuality::Low,
            ..Default::default()
        };
        settings.apply(&mut state);
        assert_eq!(state.max_particles, 150);
        assert_eq!(state.particles.len(), 150);

        let off = Settings {
            particles: ParticleQuality::Off,
            ..Default::default()
        };
        off.apply(&mut state);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_filter_effects() {
        let mut state = GameState::new(1);
        state.screen_shake.offset = glam::Vec2::new(3.0, -2.0);
        state.damage_flash.active = true;

        Settings::default().filter_effects(&mut state);
        assert!(state.damage_flash.active);

        let calm = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        calm.filter_effects(&mut state);
        assert_eq!(state.screen_shake.offset, glam::Vec2::ZERO);
        assert!(!state.damage_flash.active);
    }
}
