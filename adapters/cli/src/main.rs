#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Lane Defence session.

mod report;
mod script;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use lane_defence_core::{GameConfig, InputSource};
use lane_defence_rendering::{Frame, Renderer};
use lane_defence_simulation::Simulation;
use lane_defence_system_waves::RandomColors;
use lane_defence_world::query;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::report::LogRenderer;
use crate::script::{ScriptedClick, ScriptedInput};

/// Runs a Lane Defence session without a window, driven by scripted clicks.
#[derive(Debug, Parser)]
#[command(name = "lane-defence", author, version, about, long_about = None)]
struct Args {
    /// TOML file overriding the default balance and layout.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate before stopping.
    #[arg(short, long, default_value_t = 3600)]
    ticks: u64,

    /// Seed for the enemy color stream.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Click to replay, as `tick:x,y` or `tick:x,y:right`. Repeatable.
    #[arg(long = "click", value_name = "TICK:X,Y[:right]")]
    clicks: Vec<ScriptedClick>,

    /// Log the heads-up display every this many ticks.
    #[arg(long, default_value_t = 60)]
    report_every: u64,
}

/// Entry point for the Lane Defence command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GameConfig::default(),
    };

    let colors = RandomColors::new(ChaCha8Rng::seed_from_u64(args.seed));
    let mut simulation =
        Simulation::new(config, Box::new(colors)).context("configuration rejected")?;
    println!("{}", query::welcome_banner(simulation.world()));

    let mut input = ScriptedInput::new(args.clicks);
    let mut renderer = LogRenderer::new(args.report_every);

    for _ in 0..args.ticks {
        simulation.tick(input.sample());
        let pointer = simulation.pointer().position;
        let frame = Frame::capture(simulation.world(), simulation.events(), pointer);
        renderer.render(&frame)?;
        if query::is_game_over(simulation.world()) {
            break;
        }
    }
    simulation.halt();

    let world = simulation.world();
    info!(frames = renderer.rendered(), "session finished");
    println!(
        "wave {} | lives {} | currency {} | towers {}{}",
        query::wave(world),
        query::lives(world),
        query::currency(world),
        query::tower_view(world).len(),
        if query::is_game_over(world) { " | game over" } else { "" },
    );
    Ok(())
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse configuration {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_configuration_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/default.toml");
        let config = load_config(&path).expect("bundled configuration");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn missing_configuration_names_the_file() {
        let error = load_config(Path::new("does/not/exist.toml")).expect_err("missing file");
        assert!(format!("{error:#}").contains("does/not/exist.toml"));
    }

    #[test]
    fn arguments_accept_repeated_clicks() {
        let args = Args::try_parse_from([
            "lane-defence",
            "--ticks",
            "10",
            "--click",
            "1:350,300",
            "--click",
            "2:350,300:right",
        ])
        .expect("valid arguments");
        assert_eq!(args.ticks, 10);
        assert_eq!(args.clicks.len(), 2);
        assert!(Args::try_parse_from(["lane-defence", "--click", "oops"]).is_err());
    }
}
