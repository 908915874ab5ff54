//! Background music
//!
//! One looping track: starts when a run starts, stops and rewinds at game
//! over. Playback failures (autoplay blocked, missing file) are logged and
//! ignored; the game never waits on audio.

use thiserror::Error;

use crate::sim::GameEvent;

#[derive(Debug, Error)]
#[error("audio playback failed: {0}")]
pub struct AudioError(pub String);

/// A single music track the host can drive
pub trait MusicPlayer {
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self) -> Result<(), AudioError>;
    /// Seek back to the start of the track
    fn rewind(&mut self) -> Result<(), AudioError>;
    fn set_volume(&mut self, volume: f32);
    fn set_muted(&mut self, muted: bool);
}

/// Player that does nothing (headless runs, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPlayer;

impl MusicPlayer for SilentPlayer {
    fn play(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn pause(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn rewind(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn set_volume(&mut self, _volume: f32) {}

    fn set_muted(&mut self, _muted: bool) {}
}

/// A missing track plays silence
impl<P: MusicPlayer> MusicPlayer for Option<P> {
    fn play(&mut self) -> Result<(), AudioError> {
        self.as_mut().map_or(Ok(()), P::play)
    }

    fn pause(&mut self) -> Result<(), AudioError> {
        self.as_mut().map_or(Ok(()), P::pause)
    }

    fn rewind(&mut self) -> Result<(), AudioError> {
        self.as_mut().map_or(Ok(()), P::rewind)
    }

    fn set_volume(&mut self, volume: f32) {
        if let Some(player) = self {
            player.set_volume(volume);
        }
    }

    fn set_muted(&mut self, muted: bool) {
        if let Some(player) = self {
            player.set_muted(muted);
        }
    }
}

/// Ties the music track to game events
#[derive(Debug)]
pub struct BackgroundMusic<P: MusicPlayer> {
    player: P,
    muted: bool,
    playing: bool,
}

impl<P: MusicPlayer> BackgroundMusic<P> {
    pub fn new(mut player: P, volume: f32, muted: bool) -> Self {
        player.set_volume(volume.clamp(0.0, 1.0));
        player.set_muted(muted);
        Self {
            player,
            muted,
            playing: false,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    /// React to a drained game event
    pub fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::GameStarted => self.start(),
            GameEvent::GameOver { .. } => self.stop(),
            _ => {}
        }
    }

    pub fn start(&mut self) {
        match self.player.play() {
            Ok(()) => self.playing = true,
            Err(e) => log::warn!("{}", e),
        }
    }

    /// Pause and rewind so the next run starts from the top
    pub fn stop(&mut self) {
        if let Err(e) = self.player.pause() {
            log::warn!("{}", e);
        }
        if let Err(e) = self.player.rewind() {
            log::warn!("{}", e);
        }
        self.playing = false;
    }

    /// Flip mute. Returns the new state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.player.set_muted(self.muted);
        log::info!("Music {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.player.set_volume(volume.clamp(0.0, 1.0));
    }
}

/// `<audio>` element player (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct HtmlAudioPlayer {
    element: web_sys::HtmlAudioElement,
}

#[cfg(target_arch = "wasm32")]
impl HtmlAudioPlayer {
    /// Create a looping track from a URL
    pub fn new(src: &str) -> Result<Self, AudioError> {
        let element = web_sys::HtmlAudioElement::new_with_src(src)
            .map_err(|e| AudioError(format!("{:?}", e)))?;
        element.set_loop(true);
        Ok(Self { element })
    }
}

#[cfg(target_arch = "wasm32")]
impl MusicPlayer for HtmlAudioPlayer {
    fn play(&mut self) -> Result<(), AudioError> {
        // The returned promise rejects when autoplay is blocked; nothing to await.
        self.element
            .play()
            .map(|_| ())
            .map_err(|e| AudioError(format!("{:?}", e)))
    }

    fn pause(&mut self) -> Result<(), AudioError> {
        self.element
            .pause()
            .map_err(|e| AudioError(format!("{:?}", e)))
    }

    fn rewind(&mut self) -> Result<(), AudioError> {
        self.element.set_current_time(0.0);
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.element.set_volume(volume as f64);
    }

    fn set_muted(&mut self, muted: bool) {
        self.element.set_muted(muted);
    }
}
