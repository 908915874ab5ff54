//! Browser entry points
//!
//! JavaScript owns the canvas, the `requestAnimationFrame` loop and DOM
//! event listeners. It forwards keys and timestamps to [`WebGame`] and gets
//! the state back as JSON for drawing.

use wasm_bindgen::prelude::*;

use crate::audio::HtmlAudioPlayer;
use crate::game::{Game, Renderer};
use crate::highscores::LocalStorageStore;
use crate::settings::Settings;
use crate::sim::GameState;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    super::init_logging();
    log::info!("Electric Rush (web) starting...");
}

/// Hands each frame's state to a JS draw callback
pub struct JsRenderer {
    draw: js_sys::Function,
}

impl Renderer for JsRenderer {
    fn render(&mut self, state: &GameState) {
        let json = match serde_json::to_string(state) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize state: {}", e);
                return;
            }
        };
        if let Err(e) = self.draw.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
            log::warn!("Draw callback failed: {:?}", e);
        }
    }
}

#[wasm_bindgen]
pub struct WebGame {
    inner: Game<JsRenderer, Option<HtmlAudioPlayer>, LocalStorageStore>,
}

#[wasm_bindgen]
impl WebGame {
    /// `draw` receives the state JSON every frame; `music_src` is an
    /// optional URL for the background track.
    #[wasm_bindgen(constructor)]
    pub fn new(draw: js_sys::Function, music_src: Option<String>) -> WebGame {
        let music = music_src.and_then(|src| match HtmlAudioPlayer::new(&src) {
            Ok(player) => Some(player),
            Err(e) => {
                log::warn!("{} - music disabled", e);
                None
            }
        });
        let inner = Game::new(
            super::clock_seed(),
            Settings::load(),
            JsRenderer { draw },
            music,
            LocalStorageStore,
        );
        WebGame { inner }
    }

    pub fn key_down(&mut self, key: &str) {
        self.inner.key_down(key);
    }

    pub fn key_up(&mut self, key: &str) {
        self.inner.key_up(key);
    }

    /// Drop held keys when the page loses focus
    pub fn blur(&mut self) {
        self.inner.controls.clear();
    }

    pub fn start(&mut self) {
        self.inner.start(super::clock_seed());
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.inner.set_player_name(name);
    }

    /// Run one frame; returns the HUD readout as JSON
    pub fn frame(&mut self, now_ms: f64) -> String {
        let hud = self.inner.frame(now_ms);
        serde_json::to_string(&hud).unwrap_or_else(|e| {
            log::warn!("Failed to serialize HUD: {}", e);
            String::from("{}")
        })
    }

    /// HUD line as plain text
    pub fn hud_text(&self) -> String {
        crate::ui::HudReadout::from_state(&self.inner.state).to_string()
    }

    pub fn leaderboard_json(&self) -> String {
        self.inner.leaderboard().to_json().unwrap_or_else(|e| {
            log::warn!("{}", e);
            String::from("{\"entries\":[]}")
        })
    }

    /// 1-based rank of the last finished run, 0 if it did not place
    pub fn last_rank(&self) -> u32 {
        self.inner.last_rank().map_or(0, |r| r as u32)
    }
}
