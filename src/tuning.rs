//! Data-driven difficulty policy
//!
//! Every number the lap-transition difficulty curves use lives here, so the
//! balance can be adjusted (or loaded from JSON) without touching control flow.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Difficulty band a lap falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LapBand {
    /// Laps 1-8
    Gentle,
    /// Lap 9
    Moderate,
    /// Lap 10
    Aggressive,
    /// Laps 11-12
    Sustained,
    /// Lap 13 onward
    Relentless,
}

impl LapBand {
    pub fn for_lap(lap: u32) -> Self {
        match lap {
            0..=8 => LapBand::Gentle,
            9 => LapBand::Moderate,
            10 => LapBand::Aggressive,
            11 | 12 => LapBand::Sustained,
            _ => LapBand::Relentless,
        }
    }
}

/// Per-band multipliers and floors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandTuning {
    pub band: LapBand,
    /// Multiplier on `spawn_decrease_ms`
    pub spawn_factor: f32,
    /// Spawn interval never drops below this (ms)
    pub spawn_floor_ms: f32,
    /// Multiplier on `gap_reduction`
    pub gap_factor: f32,
    /// Multiplier on `lap_time_decrease` (0 holds the budget flat)
    pub time_factor: f32,
    /// Lap time budget never drops below this (s)
    pub time_floor: f32,
}

/// Difficulty policy applied at each lap transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Starting values for lap 1
    pub initial_spawn_interval_ms: f32,
    pub initial_lap_time: f32,
    pub initial_finish_distance: f32,

    /// Speed bonus: `base × multiplier^(lap-1)` added per lap
    pub speed_increase_per_lap: f32,
    pub speed_increase_multiplier: f32,
    /// Speed bonus stops growing after this lap
    pub speed_bonus_last_lap: u32,

    pub spawn_decrease_ms: f32,
    pub gap_reduction: f32,
    pub lap_time_decrease: f32,

    /// Two cars per spawn cycle from this lap on
    pub multi_spawn_lap: u32,
    pub max_cars_per_spawn: u8,

    /// Finish distance grows by `finish_distance_step` per lap up to this lap
    pub finish_distance_growth_last_lap: u32,
    pub finish_distance_step: f32,
    /// Finish distance snaps to `long_finish_distance` after this lap
    pub long_finish_after_lap: u32,
    pub long_finish_distance: f32,

    pub bands: Vec<BandTuning>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_spawn_interval_ms: 1500.0,
            initial_lap_time: 33.0,
            initial_finish_distance: 1500.0,

            speed_increase_per_lap: 1.0,
            speed_increase_multiplier: 1.12,
            speed_bonus_last_lap: 10,

            spawn_decrease_ms: 40.0,
            gap_reduction: 0.97,
            lap_time_decrease: 1.1,

            multi_spawn_lap: 6,
            max_cars_per_spawn: 2,

            finish_distance_growth_last_lap: 7,
            finish_distance_step: 200.0,
            long_finish_after_lap: 10,
            long_finish_distance: 3000.0,

            bands: vec![
                BandTuning {
                    band: LapBand::Gentle,
                    spawn_factor: 1.0,
                    spawn_floor_ms: 280.0,
                    gap_factor: 1.0,
                    time_factor: 1.0,
                    time_floor: 8.0,
                },
                BandTuning {
                    band: LapBand::Moderate,
                    spawn_factor: 1.5,
                    spawn_floor_ms: 280.0,
                    gap_factor: 0.96,
                    time_factor: 1.3,
                    time_floor: 8.0,
                },
                BandTuning {
                    band: LapBand::Aggressive,
                    spawn_factor: 3.0,
                    spawn_floor_ms: 280.0,
                    gap_factor: 0.93,
                    time_factor: 2.0,
                    time_floor: 8.0,
                },
                BandTuning {
                    band: LapBand::Sustained,
                    spawn_factor: 2.0,
                    spawn_floor_ms: 280.0,
                    gap_factor: 0.985,
                    time_factor: 0.0,
                    time_floor: 8.0,
                },
                BandTuning {
                    band: LapBand::Relentless,
                    spawn_factor: 2.5,
                    spawn_floor_ms: 200.0,
                    gap_factor: 0.97,
                    time_factor: 0.8,
                    time_floor: 6.0,
                },
            ],
        }
    }
}

/// Problems with a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no tuning entry for lap band {0:?}")]
    MissingBand(LapBand),
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
}

impl Tuning {
    /// Parse and validate a tuning document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every band has an entry and the base rates are usable
    pub fn validate(&self) -> Result<(), TuningError> {
        for band in [
            LapBand::Gentle,
            LapBand::Moderate,
            LapBand::Aggressive,
            LapBand::Sustained,
            LapBand::Relentless,
        ] {
            if !self.bands.iter().any(|b| b.band == band) {
                return Err(TuningError::MissingBand(band));
            }
        }
        for (field, value) in [
            ("initial_spawn_interval_ms", self.initial_spawn_interval_ms),
            ("initial_lap_time", self.initial_lap_time),
            ("initial_finish_distance", self.initial_finish_distance),
            ("gap_reduction", self.gap_reduction),
        ] {
            if value <= 0.0 {
                return Err(TuningError::NonPositive { field, value });
            }
        }
        Ok(())
    }

    /// Band tuning for a lap. Falls back to the last entry for a
    /// hand-edited table that skipped validation.
    pub fn band(&self, lap: u32) -> BandTuning {
        let band = LapBand::for_lap(lap);
        self.bands
            .iter()
            .find(|b| b.band == band)
            .or(self.bands.last())
            .copied()
            .unwrap_or(BandTuning {
                band,
                spawn_factor: 1.0,
                spawn_floor_ms: self.initial_spawn_interval_ms,
                gap_factor: 1.0,
                time_factor: 0.0,
                time_floor: self.initial_lap_time,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lap_bands() {
        assert_eq!(LapBand::for_lap(1), LapBand::Gentle);
        assert_eq!(LapBand::for_lap(8), LapBand::Gentle);
        assert_eq!(LapBand::for_lap(9), LapBand::Moderate);
        assert_eq!(LapBand::for_lap(10), LapBand::Aggressive);
        assert_eq!(LapBand::for_lap(11), LapBand::Sustained);
        assert_eq!(LapBand::for_lap(12), LapBand::Sustained);
        assert_eq!(LapBand::for_lap(13), LapBand::Relentless);
        assert_eq!(LapBand::for_lap(100), LapBand::Relentless);
    }

    #[test]
    fn test_default_validates() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_keeps_defaults_for_missing_fields() {
        let tuning = Tuning::from_json(r#"{ "spawn_decrease_ms": 60.0 }"#).unwrap();
        assert_eq!(tuning.spawn_decrease_ms, 60.0);
        assert_eq!(tuning.initial_lap_time, 33.0);
        assert_eq!(tuning.bands.len(), 5);
    }

    #[test]
    fn test_from_json_rejects_missing_band() {
        let json = r#"{ "bands": [] }"#;
        assert!(matches!(
            Tuning::from_json(json),
            Err(TuningError::MissingBand(LapBand::Gentle))
        ));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_relentless_band_lowers_floors() {
        let tuning = Tuning::default();
        let gentle = tuning.band(3);
        let relentless = tuning.band(14);
        assert!(relentless.spawn_floor_ms < gentle.spawn_floor_ms);
        assert!(relentless.time_floor < gentle.time_floor);
    }
}
