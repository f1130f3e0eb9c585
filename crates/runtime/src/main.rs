#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]

mod app;
mod keys;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use embodied::{EmbodiedTeacher, EmbodiedTeacherConfig, SharedKeys};
use tracing_subscriber::EnvFilter;

/// Run the embodied teacher environment with a random learner.
#[derive(Parser, Debug)]
#[command(name = "embodied_demo", version, about, long_about = None)]
struct Cli {
    /// JSON file with an `EmbodiedTeacherConfig`; flags override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Robot model for both learner and teacher
    #[arg(long)]
    agent_type: Option<String>,

    /// Let the learner and teacher talk
    #[arg(long)]
    with_language: bool,

    /// Observe through the onboard camera
    #[arg(long)]
    image: bool,

    /// Drive the teacher from the keyboard (type keys then Enter)
    #[arg(long)]
    human: bool,

    /// Environment steps to run
    #[arg(long, default_value_t = 1000)]
    steps: usize,

    #[arg(long)]
    seed: Option<u64>,

    /// Weight of the control penalty
    #[arg(long)]
    action_cost: Option<f32>,
}

impl Cli {
    fn env_config(&self) -> Result<EmbodiedTeacherConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                EmbodiedTeacherConfig::from_json(&json)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => EmbodiedTeacherConfig::default(),
        };
        let playground = &mut config.playground;
        if let Some(agent_type) = &self.agent_type {
            playground.agent_type.clone_from(agent_type);
        }
        playground.with_language |= self.with_language;
        playground.use_image_observation |= self.image;
        if self.seed.is_some() {
            playground.seed = self.seed;
        }
        if let Some(cost) = self.action_cost {
            playground.action_cost = cost;
        }
        config.demo_by_human |= self.human;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = cli.env_config()?;

    let keys = SharedKeys::new();
    if config.demo_by_human {
        keys::spawn_stdin_listener(keys.clone())?;
        tracing::info!("type W/A/S/D to drive, E to toggle the gripper, then press Enter");
    }
    let mut env = EmbodiedTeacher::with_key_source(config, keys)?;
    let mut rng = cli.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);

    let stats = app::run(&mut env, cli.steps, &mut rng)?;
    tracing::info!(steps = stats.steps, episodes = stats.episodes, "demo finished");
    Ok(())
}
