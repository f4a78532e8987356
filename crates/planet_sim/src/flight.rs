//! Scripted camera descent.
//!
//! The camera drops from `start_altitude` to `end_altitude` along an
//! exponential curve (equal time per decade of altitude) while orbiting
//! slowly, always looking at the planet center.

use glam::DVec3;
use planet_plugin::CameraState;

/// Lowest altitude the path will place the camera at.
const MIN_ALTITUDE: f64 = 0.5;

/// Total orbit angle swept over the flight, in radians.
const ORBIT_SWEEP: f64 = 0.6;

/// Latitude of the flight path, in radians.
const LATITUDE: f64 = 0.35;

#[derive(Debug, Clone)]
pub struct FlightPath {
	radius: f64,
	start_altitude: f64,
	end_altitude: f64,
	frames: u32,
}

impl FlightPath {
	pub fn new(radius: f64, start_altitude: f64, end_altitude: f64, frames: u32) -> Self {
		Self {
			radius,
			start_altitude: start_altitude.max(MIN_ALTITUDE),
			end_altitude: end_altitude.max(MIN_ALTITUDE),
			frames: frames.max(1),
		}
	}

	/// Progress in [0, 1] at `frame`.
	fn progress(&self, frame: u32) -> f64 {
		if self.frames <= 1 {
			return 1.0;
		}
		(frame.min(self.frames - 1) as f64) / (self.frames - 1) as f64
	}

	pub fn altitude_at(&self, frame: u32) -> f64 {
		let t = self.progress(frame);
		self.start_altitude * (self.end_altitude / self.start_altitude).powf(t)
	}

	pub fn camera_at(&self, frame: u32) -> CameraState {
		let t = self.progress(frame);
		let angle = t * ORBIT_SWEEP;
		let direction = DVec3::new(
			angle.sin() * LATITUDE.cos(),
			LATITUDE.sin(),
			angle.cos() * LATITUDE.cos(),
		);
		let position = direction * (self.radius + self.altitude_at(frame));
		CameraState::looking_at(position, DVec3::ZERO, DVec3::Y)
	}
}
