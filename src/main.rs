mod app;
mod mesh;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

use mesh::{BoundaryPolicy, MeshSettings};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON settings file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of nodes (2-100).
    #[arg(long)]
    nodes: Option<usize>,
    /// Speed multiplier (0-20).
    #[arg(long)]
    speed: Option<f64>,
    /// Seed for a reproducible mesh.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum)]
    boundary: Option<BoundaryPolicy>,
    /// Start with the animation paused.
    #[arg(long)]
    paused: bool,
    #[arg(long)]
    fullscreen: bool,
}

impl Args {
    fn into_settings(self) -> Result<MeshSettings> {
        let mut settings = match &self.config {
            Some(path) => MeshSettings::load(path)?,
            None => MeshSettings::default(),
        };

        if let Some(nodes) = self.nodes {
            settings.nodes = nodes;
        }
        if let Some(speed) = self.speed {
            settings.speed = speed;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if let Some(boundary) = self.boundary {
            settings.boundary = boundary;
        }
        settings.paused |= self.paused;
        settings.fullscreen |= self.fullscreen;

        Ok(settings.clamped())
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let settings = Args::parse().into_settings()?;
    log::info!(
        "starting with {} nodes, speed {}, {:?} boundary",
        settings.nodes,
        settings.speed,
        settings.boundary
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([960.0, 600.0])
            .with_min_inner_size([240.0, 160.0])
            .with_fullscreen(settings.fullscreen),
        ..Default::default()
    };

    eframe::run_native(
        "AniMesh",
        options,
        Box::new(move |cc| Ok(Box::new(app::AniMeshApp::new(cc, settings)))),
    )
    .map_err(|error| anyhow!("animesh window failed: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "animesh",
            "--nodes",
            "40",
            "--speed",
            "2.5",
            "--boundary",
            "overshoot",
            "--paused",
        ]);
        let settings = args.into_settings().unwrap();

        assert_eq!(settings.nodes, 40);
        assert_eq!(settings.speed, 2.5);
        assert_eq!(settings.boundary, BoundaryPolicy::Overshoot);
        assert!(settings.paused);
        assert!(!settings.fullscreen);
    }

    #[test]
    fn test_out_of_range_flags_are_clamped() {
        let settings = Args::parse_from(["animesh", "--nodes", "1000", "--speed", "99"])
            .into_settings()
            .unwrap();

        assert_eq!(settings.nodes, 100);
        assert_eq!(settings.speed, 20.0);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let result = Args::parse_from(["animesh", "--config", "/nonexistent/animesh.json"])
            .into_settings();
        assert!(result.is_err());
    }
}
