//! Progressive difficulty applied at lap boundaries
//!
//! Six independent curves, each driven by the lap-band table in
//! [`Tuning`]:
//! 1. Speed bonus grows exponentially, then freezes
//! 2. Spawn interval shrinks toward a band floor
//! 3. Cars per spawn cycle steps from 1 to 2
//! 4. Traffic gap multiplier decays multiplicatively, forever
//! 5. Finish distance grows, holds, then snaps to a long fixed value
//! 6. Lap time budget shrinks toward a band floor

use super::state::Difficulty;
use crate::tuning::Tuning;

/// Difficulty for `lap`, given the difficulty of the lap just completed.
///
/// Pure: depends only on its arguments.
pub fn next_difficulty(tuning: &Tuning, prev: &Difficulty, lap: u32) -> Difficulty {
    let band = tuning.band(lap);

    let speed_bonus = if lap <= tuning.speed_bonus_last_lap {
        let exponent = lap.saturating_sub(1) as i32;
        prev.speed_bonus + tuning.speed_increase_per_lap * tuning.speed_increase_multiplier.powi(exponent)
    } else {
        prev.speed_bonus
    };

    // Floors only stop a decrease; they never raise a value already below them
    let spawn_interval_ms = (prev.spawn_interval_ms - tuning.spawn_decrease_ms * band.spawn_factor)
        .max(band.spawn_floor_ms)
        .min(prev.spawn_interval_ms);

    // Capped so at least two lanes stay open every cycle
    let cars_per_spawn = if lap >= tuning.multi_spawn_lap {
        tuning.max_cars_per_spawn.clamp(1, crate::consts::NUM_LANES - 2)
    } else {
        1
    };

    let traffic_gap_multiplier =
        prev.traffic_gap_multiplier * tuning.gap_reduction * band.gap_factor;

    let finish_distance = if lap > tuning.long_finish_after_lap {
        tuning.long_finish_distance
    } else {
        let growth_laps = lap.min(tuning.finish_distance_growth_last_lap).saturating_sub(1);
        tuning.initial_finish_distance + growth_laps as f32 * tuning.finish_distance_step
    };

    let lap_time_budget = (prev.lap_time_budget - tuning.lap_time_decrease * band.time_factor)
        .max(band.time_floor)
        .min(prev.lap_time_budget);

    Difficulty {
        speed_bonus,
        spawn_interval_ms,
        traffic_gap_multiplier,
        finish_distance,
        lap_time_budget,
        cars_per_spawn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Difficulty after completing every lap up to `last_lap`
    fn curve(last_lap: u32) -> Vec<Difficulty> {
        let tuning = Tuning::default();
        let mut d = Difficulty::initial(&tuning);
        let mut out = vec![d];
        for lap in 2..=last_lap {
            d = next_difficulty(&tuning, &d, lap);
            out.push(d);
        }
        out
    }

    #[test]
    fn test_lap_two_values() {
        let tuning = Tuning::default();
        let d = next_difficulty(&tuning, &Difficulty::initial(&tuning), 2);
        assert!((d.speed_bonus - 1.12).abs() < 1e-5);
        assert_eq!(d.spawn_interval_ms, 1460.0);
        assert_eq!(d.cars_per_spawn, 1);
        assert!((d.traffic_gap_multiplier - 0.97).abs() < 1e-6);
        assert_eq!(d.finish_distance, 1700.0);
        assert!((d.lap_time_budget - 31.9).abs() < 1e-4);
    }

    #[test]
    fn test_cars_per_spawn_steps_at_lap_six() {
        let laps = curve(8);
        assert_eq!(laps[3].cars_per_spawn, 1); // lap 4
        assert_eq!(laps[4].cars_per_spawn, 1); // lap 5
        assert_eq!(laps[5].cars_per_spawn, 2); // lap 6
        assert_eq!(laps[7].cars_per_spawn, 2); // lap 8
    }

    #[test]
    fn test_speed_bonus_freezes_after_lap_ten() {
        let laps = curve(14);
        let at_ten = laps[9].speed_bonus;
        assert!(at_ten > laps[8].speed_bonus);
        assert_eq!(laps[10].speed_bonus, at_ten);
        assert_eq!(laps[13].speed_bonus, at_ten);
    }

    #[test]
    fn test_finish_distance_schedule() {
        let laps = curve(12);
        assert_eq!(laps[0].finish_distance, 1500.0);
        assert_eq!(laps[6].finish_distance, 2700.0); // lap 7
        assert_eq!(laps[7].finish_distance, 2700.0); // lap 8 holds
        assert_eq!(laps[9].finish_distance, 2700.0); // lap 10 holds
        assert_eq!(laps[10].finish_distance, 3000.0); // lap 11
        assert_eq!(laps[11].finish_distance, 3000.0);
    }

    #[test]
    fn test_lap_time_holds_in_sustained_band() {
        let laps = curve(13);
        assert_eq!(laps[10].lap_time_budget, laps[9].lap_time_budget); // lap 11
        assert_eq!(laps[11].lap_time_budget, laps[9].lap_time_budget); // lap 12
        assert!(laps[12].lap_time_budget < laps[11].lap_time_budget); // lap 13
    }

    #[test]
    fn test_aggressive_lap_ten_steps() {
        let laps = curve(10);
        let spawn_drop = laps[8].spawn_interval_ms - laps[9].spawn_interval_ms;
        assert!((spawn_drop - 120.0).abs() < 1e-3);
        let time_drop = laps[8].lap_time_budget - laps[9].lap_time_budget;
        assert!((time_drop - 2.2).abs() < 1e-4);
    }

    #[test]
    fn test_floors_hold_deep_into_a_run() {
        let laps = curve(80);
        let last = laps.last().unwrap();
        assert_eq!(last.spawn_interval_ms, 200.0);
        assert_eq!(last.lap_time_budget, 6.0);
        assert!(last.traffic_gap_multiplier > 0.0);
    }

    #[test]
    fn test_floors_in_early_bands() {
        // A budget already at the gentle floor stays there
        let tuning = Tuning::default();
        let prev = Difficulty {
            spawn_interval_ms: 290.0,
            lap_time_budget: 8.5,
            ..Difficulty::initial(&tuning)
        };
        let d = next_difficulty(&tuning, &prev, 5);
        assert_eq!(d.spawn_interval_ms, 280.0);
        assert_eq!(d.lap_time_budget, 8.0);
    }

    #[test]
    fn test_zero_factor_band_never_raises_budget() {
        let tuning = Tuning::default();
        let prev = Difficulty {
            lap_time_budget: 6.5,
            ..Difficulty::initial(&tuning)
        };
        // Lap 11 has a zero time factor and a floor of 8
        let d = next_difficulty(&tuning, &prev, 11);
        assert_eq!(d.lap_time_budget, 6.5);
    }

    proptest! {
        #[test]
        fn prop_curves_monotonic(last_lap in 2u32..40) {
            let laps = curve(last_lap);
            for pair in laps.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(b.spawn_interval_ms <= a.spawn_interval_ms);
                prop_assert!(b.traffic_gap_multiplier <= a.traffic_gap_multiplier);
                prop_assert!(b.finish_distance >= a.finish_distance);
                prop_assert!(b.lap_time_budget <= a.lap_time_budget);
                prop_assert!(b.speed_bonus >= a.speed_bonus);
                prop_assert!(b.cars_per_spawn >= a.cars_per_spawn);
                prop_assert!(b.spawn_interval_ms >= 200.0);
                prop_assert!(b.lap_time_budget >= 6.0);
                prop_assert!(b.cars_per_spawn <= 2);
            }
        }
    }
}
