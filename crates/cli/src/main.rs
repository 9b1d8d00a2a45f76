#![deny(unsafe_code)]
//! Headless CLI for the particle network.
//!
//! Subcommands:
//! - `simulate` runs the animation N frames and writes the last one as PNG
//! - `profile` prints the field configuration a viewport width resolves to
//! - `list` prints both density profiles

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use glam::DVec2;
use particle_net_core::{
    AnimationDriver, FieldConfig, NetworkConfig, Profile, RecordingSurface, Srgb, Viewport,
};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "particle-net", about = "Particle network animation CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the animation for N frames and write the last frame as a PNG.
    Simulate {
        /// Viewport width in pixels.
        #[arg(short = 'W', long, default_value_t = 1280)]
        width: usize,

        /// Viewport height in pixels.
        #[arg(short = 'H', long, default_value_t = 720)]
        height: usize,

        /// Number of frames to run.
        #[arg(short, long, default_value_t = 120)]
        frames: u64,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Pointer position "x,y" relative to the canvas, held for every frame.
        #[arg(long, value_parser = parse_point)]
        pointer: Option<DVec2>,

        /// Background color painted under the frame (hex).
        #[arg(short, long, default_value = "#0a0a0f")]
        background: String,

        /// Leave the background transparent.
        #[arg(long, conflicts_with = "background")]
        transparent: bool,

        /// Output file path.
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,

        /// Configuration overrides as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Show the profile and field configuration for a viewport width.
    Profile {
        /// Viewport width in pixels.
        #[arg(short = 'W', long)]
        width: f64,

        /// Configuration overrides as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// List the density profiles.
    List,
}

fn parse_point(s: &str) -> Result<DVec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got '{s}'"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{v}': {e}"))
    };
    Ok(DVec2::new(coord(x)?, coord(y)?))
}

fn parse_config(params: &str) -> Result<NetworkConfig, CliError> {
    let params: serde_json::Value = serde_json::from_str(params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let config = NetworkConfig::from_json(&params);
    config.validate()?;
    Ok(config)
}

fn print_field(profile: Profile, field: &FieldConfig) {
    println!(
        "{profile:?}: {} particles, link distance {}, pointer radius {}",
        field.particle_count, field.max_distance, field.mouse_radius
    );
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let config = NetworkConfig::default();
            if cli.json {
                let info = serde_json::json!({
                    "mobile_breakpoint": config.mobile_breakpoint,
                    "profiles": {
                        "mobile": config.mobile,
                        "desktop": config.desktop,
                    },
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Profiles (mobile at or below {}px):", config.mobile_breakpoint);
                print_field(Profile::Mobile, &config.mobile);
                print_field(Profile::Desktop, &config.desktop);
            }
        }
        Command::Profile { width, params } => {
            let config = parse_config(&params)?;
            let (profile, field) = config.resolve(width);
            if cli.json {
                let info = serde_json::json!({
                    "width": width,
                    "profile": profile,
                    "field": field,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_field(profile, &field);
            }
        }
        Command::Simulate {
            width,
            height,
            frames,
            seed,
            pointer,
            background,
            transparent,
            output,
            params,
        } => {
            let config = parse_config(&params)?;
            let background = if transparent {
                None
            } else {
                Some(Srgb::from_hex(&background)?)
            };

            let viewport = Viewport::new(width as f64, height as f64);
            let mut driver = AnimationDriver::new(viewport, seed, config)?;
            if let Some(p) = pointer {
                driver.pointer_move(p, DVec2::ZERO);
            }

            let mut surface = RecordingSurface::default();
            let rendered = driver.run(&mut surface, frames);

            particle_net_snapshot::snapshot::write_png(
                surface.commands(),
                width,
                height,
                background,
                &output,
            )?;

            let stats = driver.last_stats();
            if cli.json {
                let info = serde_json::json!({
                    "width": width,
                    "height": height,
                    "frames": rendered,
                    "seed": seed,
                    "profile": driver.profile(),
                    "particles": driver.particles().len(),
                    "time": driver.time(),
                    "stats": stats,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "simulated {rendered} frames ({width}x{height}, {:?}, seed {seed}): {} links, {} pointer links -> {}",
                    driver.profile(),
                    stats.links,
                    stats.pointer_links,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        tracing::debug!(error = %e, code = e.exit_code(), "command failed");
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
