//! Headless planet LOD simulator.
//!
//! Flies a camera from orbit down to the surface of a procedural planet,
//! stepping a `ChunkManager` every frame and logging what it does.
//!
//! Log verbosity follows `RUST_LOG` (default `info`); use
//! `RUST_LOG=planet_plugin=debug` for per-frame diffs.

mod config;
mod flight;

use anyhow::{Context, Result};
use clap::Parser;
use planet_plugin::{PlanetConfig, Projection};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use flight::FlightPath;

/// Simulated frame time handed to the manager.
const FRAME_DT: f64 = 1.0 / 60.0;

/// Frames between progress reports.
const REPORT_INTERVAL: u32 = 30;

/// Procedural planet LOD simulator.
#[derive(Parser, Debug)]
#[command(name = "planet_sim")]
#[command(about = "Flies a camera down to a procedural planet and reports LOD statistics")]
struct Args {
	/// Path to configuration TOML file (defaults apply when omitted).
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Number of frames to simulate.
	#[arg(short, long, default_value_t = 240)]
	frames: u32,

	/// Camera altitude above the base sphere on the first frame, in meters.
	#[arg(long, default_value_t = 60_000.0)]
	start_altitude: f64,

	/// Camera altitude on the last frame, in meters.
	#[arg(long, default_value_t = 5.0)]
	end_altitude: f64,

	/// Worker threads for patch builds (default: one per core).
	#[arg(short, long)]
	threads: Option<usize>,
}

fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let args = Args::parse();

	if let Some(threads) = args.threads {
		rayon::ThreadPoolBuilder::new()
			.num_threads(threads)
			.build_global()
			.context("Failed to configure build threads")?;
	}

	let config = match &args.config {
		Some(path) => {
			tracing::info!("Loading config from: {}", path.display());
			config::load(path)?
		}
		None => PlanetConfig::default(),
	};

	let mut manager = config
		.build_manager()
		.context("Failed to create chunk manager")?;

	tracing::info!(
		radius = config.planet.radius,
		resolution = config.mesh.resolution,
		water = config.mesh.water_enabled,
		threads = rayon::current_num_threads(),
		"Simulating {} frames",
		args.frames
	);

	let flight = FlightPath::new(
		config.planet.radius,
		args.start_altitude,
		args.end_altitude,
		args.frames,
	);
	let projection = Projection::default();

	let mut total_built = 0usize;
	let mut total_deferred = 0usize;
	for frame in 0..args.frames {
		let camera = flight.camera_at(frame);
		let frustum = camera.frustum(&projection);
		let out = manager.step(&camera, &frustum, FRAME_DT);

		total_built += out.ready.len();
		total_deferred += out.deferred.len();

		if frame % REPORT_INTERVAL == 0 || frame + 1 == args.frames {
			tracing::info!(
				frame,
				altitude = manager.planet().altitude(camera.position),
				resident = manager.active_nodes().len(),
				activated = out.activated.len(),
				deactivated = out.deactivated.len(),
				culled = out.stats.culled,
				pooled = manager.pooled_count(planet_plugin::PatchKind::Terrain),
				"frame"
			);
		}
	}

	let metrics = manager.metrics();
	tracing::info!(
		patches_built = total_built,
		deferred = total_deferred,
		live_patches = manager.live_patch_count(),
		deepest_level = metrics.deepest_level().unwrap_or(0),
		avg_step_us = metrics.avg_step_timing_us(),
		avg_build_us = metrics.avg_build_timing_us(),
		avg_traversal_us = metrics.avg_traversal_timing_us(),
		"Done"
	);

	manager.shutdown();
	Ok(())
}
