//! Keyboard controls
//!
//! Lane changes and jumps are edge-triggered: a key produces one intent when
//! it goes down and nothing more until it is released. Auto-repeat keydown
//! events from a held key are ignored. Presses queue in order and each
//! tick consumes at most one lane change and one jump, so quick taps
//! between frames are never merged.

use std::collections::{HashSet, VecDeque};

use crate::sim::TickInput;

/// Something a key can do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    LaneLeft,
    LaneRight,
    Jump,
    /// Start from the menu / restart after game over
    Start,
    ToggleMute,
    ToggleIdle,
}

impl Control {
    /// Map a DOM `KeyboardEvent.key` value (case-insensitive)
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "a" | "arrowleft" => Some(Self::LaneLeft),
            "d" | "arrowright" => Some(Self::LaneRight),
            " " | "space" => Some(Self::Jump),
            "enter" => Some(Self::Start),
            "m" => Some(Self::ToggleMute),
            "i" => Some(Self::ToggleIdle),
            _ => None,
        }
    }
}

/// Most presses kept waiting; older ones are dropped first
pub const MAX_PENDING: usize = 8;

/// Held keys plus intents waiting for the next tick
#[derive(Debug, Clone, Default)]
pub struct Controls {
    held: HashSet<Control>,
    pending: VecDeque<Control>,
    /// Demo mode, toggled with `I`
    pub idle_mode: bool,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns the control only on a fresh press, so
    /// hosts can react to one-shot controls like start or mute.
    pub fn key_down(&mut self, key: &str) -> Option<Control> {
        let control = Control::from_key(key)?;
        if !self.held.insert(control) {
            return None;
        }

        match control {
            Control::LaneLeft | Control::LaneRight | Control::Jump => {
                if self.pending.len() >= MAX_PENDING {
                    self.pending.pop_front();
                }
                self.pending.push_back(control);
            }
            Control::ToggleIdle => {
                self.idle_mode = !self.idle_mode;
                log::info!("Idle mode: {}", self.idle_mode);
            }
            Control::Start | Control::ToggleMute => {}
        }
        Some(control)
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(control) = Control::from_key(key) {
            self.held.remove(&control);
        }
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    /// Presses still waiting for a tick
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Hand the oldest lane change and the oldest jump to a tick.
    /// Later presses stay queued for the following ticks.
    pub fn take_intents(&mut self) -> TickInput {
        let mut input = self.idle_input();

        let lane = self
            .pending
            .iter()
            .position(|c| matches!(c, Control::LaneLeft | Control::LaneRight));
        match lane.and_then(|i| self.pending.remove(i)) {
            Some(Control::LaneLeft) => input.lane_left = true,
            Some(Control::LaneRight) => input.lane_right = true,
            _ => {}
        }

        if let Some(i) = self.pending.iter().position(|c| *c == Control::Jump) {
            self.pending.remove(i);
            input.jump = true;
        }
        input
    }

    /// Input for a frame that consumes no presses
    pub fn idle_input(&self) -> TickInput {
        TickInput {
            idle_mode: self.idle_mode,
            ..Default::default()
        }
    }

    /// Drop queued intents and held keys (e.g. on focus loss)
    pub fn clear(&mut self) {
        self.held.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Control::from_key("A"), Some(Control::LaneLeft));
        assert_eq!(Control::from_key("ArrowLeft"), Some(Control::LaneLeft));
        assert_eq!(Control::from_key("d"), Some(Control::LaneRight));
        assert_eq!(Control::from_key(" "), Some(Control::Jump));
        assert_eq!(Control::from_key("Enter"), Some(Control::Start));
        assert_eq!(Control::from_key("q"), None);
    }

    #[test]
    fn test_held_key_repeat_ignored() {
        let mut controls = Controls::new();
        assert_eq!(controls.key_down("a"), Some(Control::LaneLeft));
        assert!(controls.take_intents().lane_left);

        // Auto-repeat while held
        assert_eq!(controls.key_down("a"), None);
        assert!(!controls.take_intents().lane_left);
        assert!(controls.is_held(Control::LaneLeft));

        controls.key_up("a");
        assert!(!controls.is_held(Control::LaneLeft));
        controls.key_down("a");
        assert!(controls.take_intents().lane_left);
    }

    #[test]
    fn test_arrow_and_letter_share_a_control() {
        let mut controls = Controls::new();
        controls.key_down("ArrowRight");
        assert_eq!(controls.key_down("d"), None);
        let input = controls.take_intents();
        assert!(input.lane_right);
        assert!(!input.lane_left);
    }

    #[test]
    fn test_intents_consumed_once() {
        let mut controls = Controls::new();
        controls.key_down(" ");
        assert!(controls.take_intents().jump);
        assert!(!controls.take_intents().jump);
    }

    #[test]
    fn test_taps_within_one_frame_all_count() {
        let mut controls = Controls::new();
        controls.key_down("a");
        controls.key_up("a");
        controls.key_down("a");
        controls.key_up("a");
        controls.key_down("d");

        let first = controls.take_intents();
        assert!(first.lane_left && !first.lane_right);
        let second = controls.take_intents();
        assert!(second.lane_left && !second.lane_right);
        let third = controls.take_intents();
        assert!(third.lane_right && !third.lane_left);
        assert_eq!(controls.pending(), 0);
    }

    #[test]
    fn test_jump_does_not_wait_behind_lane_change() {
        let mut controls = Controls::new();
        controls.key_down("ArrowLeft");
        controls.key_down(" ");
        let input = controls.take_intents();
        assert!(input.lane_left);
        assert!(input.jump);
        assert_eq!(controls.pending(), 0);
    }

    #[test]
    fn test_queue_bounded() {
        let mut controls = Controls::new();
        for _ in 0..(MAX_PENDING + 4) {
            controls.key_down("d");
            controls.key_up("d");
        }
        assert_eq!(controls.pending(), MAX_PENDING);
        controls.clear();
        assert_eq!(controls.pending(), 0);
    }

    #[test]
    fn test_idle_input_consumes_nothing() {
        let mut controls = Controls::new();
        controls.key_down("d");
        assert!(!controls.idle_input().lane_right);
        assert_eq!(controls.pending(), 1);
    }

    #[test]
    fn test_idle_toggle_carried_into_input() {
        let mut controls = Controls::new();
        controls.key_down("i");
        assert!(controls.take_intents().idle_mode);
        controls.key_up("i");
        controls.key_down("i");
        assert!(!controls.take_intents().idle_mode);
    }

    #[test]
    fn test_lane_left_scenario() {
        use crate::sim::{GameState, tick};

        let mut state = GameState::new(1);
        state.start();
        state.last_traffic_spawn_ms = Some(f64::MAX / 2.0);
        state.last_powerup_spawn_ms = Some(f64::MAX / 2.0);
        state.player.current_lane = 1.5;
        state.player.target_lane = 2;

        let mut controls = Controls::new();
        controls.key_down("a");
        tick(&mut state, &controls.take_intents(), 0.0, 0.0);
        assert_eq!(state.player.target_lane, 1);

        // Second press without release
        controls.key_down("a");
        state.player.current_lane = 1.0;
        tick(&mut state, &controls.take_intents(), 0.0, 0.0);
        assert_eq!(state.player.target_lane, 1);
    }
}
