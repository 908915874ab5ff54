//! Game host
//!
//! Owns the run and its collaborators. The platform feeds it key events and
//! one timestamp per display refresh; everything else happens in
//! [`Game::frame`].

use crate::audio::{BackgroundMusic, MusicPlayer};
use crate::highscores::{Leaderboard, LeaderboardStore};
use crate::input::{Control, Controls};
use crate::platform;
use crate::settings::Settings;
use crate::sim::{FrameClock, FrameStep, GameEvent, GamePhase, GameState};
use crate::tuning::Tuning;
use crate::ui::HudReadout;

/// Draws the state. Called every frame, frozen or not.
pub trait Renderer {
    fn render(&mut self, state: &GameState);
}

/// Renderer for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _state: &GameState) {}
}

/// Default name used when the player never entered one
pub const DEFAULT_PLAYER_NAME: &str = "Racer";

/// Running game with its collaborators
pub struct Game<R: Renderer, P: MusicPlayer, S: LeaderboardStore> {
    pub state: GameState,
    pub controls: Controls,
    pub settings: Settings,
    clock: FrameClock,
    music: BackgroundMusic<P>,
    store: S,
    renderer: R,
    leaderboard: Leaderboard,
    player_name: String,
    /// Rank earned by the last finished run, if it placed
    last_rank: Option<usize>,
}

impl<R: Renderer, P: MusicPlayer, S: LeaderboardStore> Game<R, P, S> {
    pub fn new(seed: u64, settings: Settings, renderer: R, player: P, mut store: S) -> Self {
        let mut state = GameState::new(seed);
        settings.apply(&mut state);
        let music = BackgroundMusic::new(
            player,
            settings.effective_music_volume(),
            settings.music_muted,
        );
        let leaderboard = store.load_or_default();
        log::info!(
            "Game initialized with seed {} ({} high scores)",
            seed,
            leaderboard.entries.len()
        );

        Self {
            state,
            controls: Controls::new(),
            settings,
            clock: FrameClock::new(),
            music,
            store,
            renderer,
            leaderboard,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            last_rank: None,
        }
    }

    /// Replace the difficulty policy. Only takes effect from the menu.
    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        if self.state.phase == GamePhase::Menu {
            self.state = GameState::with_tuning(self.state.seed, tuning);
            self.settings.apply(&mut self.state);
        } else {
            log::warn!("Ignoring tuning change mid-run");
        }
        self
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    pub fn music(&self) -> &BackgroundMusic<P> {
        &self.music
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Name recorded with future leaderboard entries
    pub fn set_player_name(&mut self, name: &str) {
        let trimmed = name.trim();
        if !trimmed.is_empty() {
            self.player_name = trimmed.to_string();
        }
    }

    /// Forward a keydown; handles one-shot controls here
    pub fn key_down(&mut self, key: &str) {
        match self.controls.key_down(key) {
            Some(Control::Start) => self.start(platform::clock_seed()),
            Some(Control::ToggleMute) => {
                self.settings.music_muted = self.music.toggle_mute();
                self.settings.save();
            }
            _ => {}
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.controls.key_up(key);
    }

    /// Start from the menu, or begin a fresh run after game over.
    /// `seed` is only used for a restart.
    pub fn start(&mut self, seed: u64) {
        match self.state.phase {
            GamePhase::Menu => self.state.start(),
            GamePhase::GameOver => {
                self.state.restart(seed);
                self.settings.apply(&mut self.state);
                self.last_rank = None;
                log::info!("Restarted with seed {}", seed);
            }
            GamePhase::Playing => return,
        }
        self.clock.reset();
        self.controls.clear();
    }

    /// Run one display frame and return the HUD for it
    pub fn frame(&mut self, now_ms: f64) -> HudReadout {
        // Presses made during a freeze wait for the first tick after it
        let input = if self.state.phase == GamePhase::Playing && !self.state.is_frozen(now_ms) {
            self.controls.take_intents()
        } else {
            self.controls.idle_input()
        };
        let step = self.clock.advance(&mut self.state, &input, now_ms);
        if step != FrameStep::Frozen {
            self.settings.filter_effects(&mut self.state);
        }

        for event in self.state.drain_events() {
            self.music.on_event(&event);
            if let GameEvent::GameOver {
                score,
                laps_completed,
            } = event
            {
                self.record_score(score, laps_completed);
            }
        }

        self.renderer.render(&self.state);
        HudReadout::from_state(&self.state)
    }

    fn record_score(&mut self, score: u64, laps_completed: u32) {
        log::info!(
            "Game over: {} scored {} over {} laps",
            self.player_name,
            score,
            laps_completed
        );
        match self.store.submit(&self.player_name, score) {
            Ok(rank) => {
                self.last_rank = rank;
                if let Some(rank) = rank {
                    log::info!("New high score, rank {}", rank);
                }
            }
            Err(e) => log::warn!("Could not record score: {}", e),
        }
        self.leaderboard = self.store.load_or_default();
    }
}
