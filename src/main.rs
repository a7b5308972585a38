//! Vector Balls headless runner
//!
//! Stands in for the window front end: builds the settings, drives the
//! simulation with a fixed frame delta until one ball is left, then prints
//! the stats screen.
//!
//! Usage: `vector-balls [SETTINGS_JSON] [--seed N] [--random-colors] [--json]`

#[cfg(not(target_arch = "wasm32"))]
use vector_balls::consts::FRAME_DT;
#[cfg(not(target_arch = "wasm32"))]
use vector_balls::{GameEvent, Settings, SettingsError, Simulation, Standings, ball_label};

/// Stop a session that has not finished after this many simulated seconds
#[cfg(not(target_arch = "wasm32"))]
const MAX_SESSION_SECS: f32 = 600.0;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct Args {
    settings_path: Option<String>,
    seed: Option<u64>,
    random_colors: bool,
    json: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                let seed = value
                    .parse()
                    .map_err(|_| format!("invalid seed: {value}"))?;
                args.seed = Some(seed);
            }
            "--random-colors" => args.random_colors = true,
            "--json" => args.json = true,
            other if other.starts_with("--") => return Err(format!("unknown flag: {other}")),
            path => args.settings_path = Some(path.to_string()),
        }
    }
    Ok(args)
}

#[cfg(not(target_arch = "wasm32"))]
fn load_settings(args: &Args) -> Result<Settings, SettingsError> {
    let mut settings = match &args.settings_path {
        Some(path) => Settings::load(path)?,
        None => {
            log::info!("Using default settings");
            Settings::default()
        }
    };
    if args.random_colors {
        let mut rng = rand::rng();
        settings.colors = vector_balls::palette::random_unique_colors(&mut rng, settings.num_balls);
        settings.validate()?;
    }
    Ok(settings)
}

#[cfg(not(target_arch = "wasm32"))]
fn run(args: &Args) -> Result<Standings, SettingsError> {
    let settings = load_settings(args)?;
    let mut sim = match args.seed {
        Some(seed) => Simulation::with_seed(settings, seed)?,
        None => Simulation::new(settings)?,
    };

    let mut elapsed = 0.0;
    while !sim.game_over() && elapsed < MAX_SESSION_SECS {
        sim.update(FRAME_DT);
        elapsed += FRAME_DT;

        for event in sim.drain_events() {
            if let GameEvent::Eliminated { ball } = event {
                log::info!("{:>7.2}s  ball {} is out", elapsed, ball_label(ball));
            }
        }
    }

    if !sim.game_over() {
        log::warn!(
            "Session still running after {MAX_SESSION_SECS}s with {} balls left",
            sim.alive_count()
        );
    }
    Ok(Standings::from_simulation(&sim))
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Vector Balls (headless) starting...");

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("usage: vector-balls [SETTINGS_JSON] [--seed N] [--random-colors] [--json]");
            std::process::exit(2);
        }
    };

    let standings = match run(&args) {
        Ok(standings) => standings,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&standings) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{standings}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser front end drives `Simulation` directly
}
