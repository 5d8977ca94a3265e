//! ik-demo - headless driver for the ik-rig demo scenes
//!
//! Builds one scene, applies the control-panel config (from a JSON file and/or
//! flags) and steps it frame by frame, logging solver progress.
//!
//! ```bash
//! ik-demo multi-effector --frames 120 --constraint-type none
//! RUST_LOG=debug ik-demo simple --config panel.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ik_rig::ik::ConstraintKind;
use ik_rig::scenes::CylinderSizing;
use ik_rig::{DemoConfig, MultiEffectorScene, SampleBoneScene, Scene, SimpleScene};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SceneKind {
    Simple,
    MultiEffector,
    SampleBone,
}

/// Run an ik-rig demo scene without a window
#[derive(Parser)]
#[command(name = "ik-demo")]
#[command(version)]
struct Cli {
    /// Scene to run
    #[arg(value_enum, default_value = "multi-effector")]
    scene: SceneKind,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// JSON control-panel config (camelCase keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the constraint type (ball | none)
    #[arg(long)]
    constraint_type: Option<ConstraintKind>,

    /// Override the ball constraint angle in degrees
    #[arg(long)]
    constraint_angle: Option<f32>,

    /// Wiggle the sample-bone skeleton
    #[arg(long)]
    animate_bones: bool,

    /// Log a solve summary every N frames
    #[arg(long, default_value_t = 60)]
    log_every: u32,
}

fn load_config(cli: &Cli) -> Result<DemoConfig> {
    let mut config = match &cli.config {
        Some(path) => DemoConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DemoConfig::default(),
    };

    if let Some(kind) = cli.constraint_type {
        config.constraint_type = kind;
    }
    if let Some(angle) = cli.constraint_angle {
        config.constraint_angle = angle;
    }
    config.validate().context("invalid config overrides")?;
    Ok(config)
}

fn build_scene(cli: &Cli, config: &DemoConfig) -> Result<Box<dyn Scene>> {
    let mut scene: Box<dyn Scene> = match cli.scene {
        SceneKind::Simple => Box::new(SimpleScene::new()?),
        SceneKind::MultiEffector => Box::new(MultiEffectorScene::new(config)?),
        SceneKind::SampleBone => {
            let mut scene = SampleBoneScene::new(CylinderSizing::default());
            scene.set_animate_bones(cli.animate_bones);
            Box::new(scene)
        }
    };
    scene.on_config_change(config)?;
    Ok(scene)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let mut scene = build_scene(&cli, &config)?;

    log::info!(
        "running '{}' for {} frames ({} constraint, angle {})",
        scene.name(),
        cli.frames,
        config.constraint_type,
        config.constraint_angle
    );

    let log_every = cli.log_every.max(1);
    let mut converged = 0u32;
    for frame in 0..cli.frames {
        let Some(result) = scene.tick(cli.dt) else {
            continue;
        };
        if result.converged {
            converged += 1;
        }
        if frame % log_every == 0 {
            log::info!(
                "frame {}: converged={} iterations={} distance={:.4}",
                frame,
                result.converged,
                result.iterations,
                result.final_distance
            );
        }
    }

    if let Some(ik) = scene.ik() {
        log::info!(
            "done: {}/{} frames converged, {} chains, {} segments",
            converged,
            cli.frames,
            ik.rig().chain_count(),
            ik.rig().skeleton().len()
        );
    } else {
        log::info!("done: {} frames", cli.frames);
    }
    Ok(())
}
