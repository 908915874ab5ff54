//! HUD projection
//!
//! Turns the live state into the numbers shown on screen. Pure formatting,
//! no DOM access; the host writes the strings wherever it likes.

use std::fmt;

use serde::Serialize;

use crate::sim::{GamePhase, GameState};
use crate::speed_to_mph;

/// Everything the HUD shows for one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HudReadout {
    /// Whole seconds left, rounded up
    pub time_remaining: u32,
    pub lap_distance: u32,
    pub finish_distance: u32,
    pub mph: u32,
    pub lap: u32,
    pub score: u64,
    pub boosted: bool,
    pub phase: GamePhase,
}

impl HudReadout {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            time_remaining: state.timer.max(0.0).ceil() as u32,
            lap_distance: state.lap_distance.max(0.0).floor() as u32,
            finish_distance: state.difficulty.finish_distance.floor() as u32,
            mph: speed_to_mph(state.player.speed),
            lap: state.lap,
            score: state.final_score(),
            boosted: state.player.boosted,
            phase: state.phase,
        }
    }

    /// "33s"
    pub fn time_text(&self) -> String {
        format!("{}s", self.time_remaining)
    }

    /// "820/1500m"
    pub fn distance_text(&self) -> String {
        format!("{}/{}m", self.lap_distance, self.finish_distance)
    }

    pub fn speed_text(&self) -> String {
        format!("{} MPH", self.mph)
    }

    /// Fraction of the lap driven, for a progress bar
    pub fn lap_progress(&self) -> f32 {
        if self.finish_distance == 0 {
            return 1.0;
        }
        (self.lap_distance as f32 / self.finish_distance as f32).min(1.0)
    }
}

impl fmt::Display for HudReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LAP {} | {} | {} | {} | SCORE {}",
            self.lap,
            self.time_text(),
            self.distance_text(),
            self.speed_text(),
            self.score
        )?;
        if self.boosted {
            write!(f, " | BOOST")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_readout() {
        let state = GameState::new(1);
        let hud = HudReadout::from_state(&state);
        assert_eq!(hud.time_remaining, 33);
        assert_eq!(hud.distance_text(), "0/1500m");
        assert_eq!(hud.mph, 37);
        assert_eq!(hud.lap, 1);
        assert_eq!(hud.score, 0);
    }

    #[test]
    fn test_rounding() {
        let mut state = GameState::new(1);
        state.timer = 12.01;
        state.lap_distance = 820.9;
        state.score = 1999.99;
        let hud = HudReadout::from_state(&state);
        assert_eq!(hud.time_remaining, 13);
        assert_eq!(hud.lap_distance, 820);
        assert_eq!(hud.score, 1999);

        state.timer = -0.5;
        assert_eq!(HudReadout::from_state(&state).time_remaining, 0);
    }

    #[test]
    fn test_display() {
        let mut state = GameState::new(1);
        state.player.boosted = true;
        let text = HudReadout::from_state(&state).to_string();
        assert_eq!(text, "LAP 1 | 33s | 0/1500m | 37 MPH | SCORE 0 | BOOST");
    }

    #[test]
    fn test_lap_progress() {
        let mut state = GameState::new(1);
        state.lap_distance = 750.0;
        assert_eq!(HudReadout::from_state(&state).lap_progress(), 0.5);
        state.lap_distance = 2000.0;
        assert_eq!(HudReadout::from_state(&state).lap_progress(), 1.0);
    }
}
