//! Electric Rush entry point
//!
//! The browser build is driven from JavaScript through `platform::web`.
//! Natively there is no window: the binary plays a headless autopilot run
//! and prints the HUD once per simulated second.
//!
//! Usage: `electric-rush [seed] [scores.json] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use electric_rush::audio::SilentPlayer;
    use electric_rush::game::NullRenderer;
    use electric_rush::highscores::JsonFileStore;
    use electric_rush::platform;
    use electric_rush::sim::GamePhase;
    use electric_rush::{Game, Settings, Tuning};

    platform::init_logging();
    log::info!("Electric Rush (native) starting headless autopilot run...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(platform::clock_seed);
    let scores_path = args
        .next()
        .unwrap_or_else(|| String::from("electric_rush_scores.json"));
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning, {} unusable: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let mut game = Game::new(
        seed,
        Settings::default(),
        NullRenderer,
        SilentPlayer,
        JsonFileStore::new(scores_path),
    )
    .with_tuning(tuning);
    game.set_player_name("Autopilot");
    game.key_down("i");
    game.start(seed);

    // Simulated 60 Hz display
    let frame_ms = 1000.0 / 60.0;
    let mut frame = 0u64;
    while game.state.phase == GamePhase::Playing {
        let hud = game.frame(frame as f64 * frame_ms);
        if frame % 60 == 0 {
            println!("{}", hud);
        }
        frame += 1;
    }

    println!(
        "Final score {} after {} laps",
        game.state.final_score(),
        game.state.laps_completed()
    );
    for (i, entry) in game.leaderboard().entries.iter().enumerate() {
        println!("{}. {:<16} {}", i + 1, entry.name, entry.score);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
