//! Tuning constants for the particle field.
//!
//! Every number that shapes the look of the field lives here so pages can
//! override it from JSON without touching the simulation:
//!
//! ```json
//! { "max_particles": 60, "link_distance": 120, "seed": 7 }
//! ```
//!
//! Missing fields keep their defaults. Values that would break the simulation
//! (non-positive areas, inverted ranges) are repaired by
//! [`FieldConfig::normalized`].

use log::warn;
use serde::Deserialize;

use super::theme::FieldStyle;

/// Numeric tuning for seeding, motion, pointer repulsion and connective lines.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
	/// Canvas area (px²) that earns one particle.
	pub density_area: f64,
	/// Hard cap on the particle count regardless of viewport size.
	pub max_particles: usize,
	/// Particle radius range, `[size_min, size_max)`.
	pub size_min: f64,
	pub size_max: f64,
	/// Initial velocity components are drawn from `[-speed_range, speed_range)`.
	pub speed_range: f64,
	/// Particle opacity range, `[alpha_min, alpha_max)`.
	pub alpha_min: f64,
	pub alpha_max: f64,
	/// Speed magnitude ceiling (px/frame) enforced after every update.
	pub max_speed: f64,
	/// Distance (px) within which the pointer pushes particles away.
	pub pointer_radius: f64,
	/// Velocity added per frame at zero distance from the pointer.
	pub pointer_strength: f64,
	/// Particles closer than this (px) are joined by a line.
	pub link_distance: f64,
	pub link_width: f64,
	pub link_alpha: f64,
	/// Fixed RNG seed for reproducible layouts. `None` seeds from entropy.
	pub seed: Option<u64>,
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self {
			density_area: 15_000.0,
			max_particles: 100,
			size_min: 0.1,
			size_max: 2.1,
			speed_range: 0.25,
			alpha_min: 0.1,
			alpha_max: 0.6,
			max_speed: 1.5,
			pointer_radius: 80.0,
			pointer_strength: 0.2,
			link_distance: 100.0,
			link_width: 0.5,
			link_alpha: 0.03,
			seed: None,
		}
	}
}

impl FieldConfig {
	/// Parse a JSON override document. Fields not present keep their defaults.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str::<FieldConfig>(text).map(FieldConfig::normalized)
	}

	/// Number of particles a `width` x `height` viewport should hold.
	///
	/// `min(floor(width * height / density_area), max_particles)`; zero for
	/// degenerate viewports.
	pub fn particle_count(&self, width: f64, height: f64) -> usize {
		let area = width * height;
		if !area.is_finite() || area <= 0.0 || width <= 0.0 {
			return 0;
		}
		let count = (area / self.density_area).floor();
		if count >= self.max_particles as f64 {
			self.max_particles
		} else {
			count as usize
		}
	}

	/// Drawing style derived from the link settings.
	pub fn style(&self) -> FieldStyle {
		FieldStyle::ambient(self.link_alpha, self.link_width)
	}

	/// Repair values the simulation cannot work with, falling back to defaults.
	pub fn normalized(mut self) -> Self {
		let defaults = FieldConfig::default();

		if !positive(self.density_area) {
			warn!(
				"ambient-field: density_area {} is not positive, using {}",
				self.density_area, defaults.density_area
			);
			self.density_area = defaults.density_area;
		}
		if !positive(self.size_min) || self.size_max.is_nan() || self.size_max < self.size_min {
			warn!(
				"ambient-field: size range [{}, {}) is invalid, using defaults",
				self.size_min, self.size_max
			);
			self.size_min = defaults.size_min;
			self.size_max = defaults.size_max;
		}
		if !non_negative(self.speed_range) {
			warn!("ambient-field: speed_range {} is negative", self.speed_range);
			self.speed_range = defaults.speed_range;
		}
		if !(0.0..=1.0).contains(&self.alpha_min)
			|| !(0.0..=1.0).contains(&self.alpha_max)
			|| self.alpha_max < self.alpha_min
		{
			warn!(
				"ambient-field: alpha range [{}, {}) is invalid, using defaults",
				self.alpha_min, self.alpha_max
			);
			self.alpha_min = defaults.alpha_min;
			self.alpha_max = defaults.alpha_max;
		}
		if !positive(self.max_speed) {
			warn!("ambient-field: max_speed {} is not positive", self.max_speed);
			self.max_speed = defaults.max_speed;
		}
		if !non_negative(self.pointer_radius) {
			warn!(
				"ambient-field: pointer_radius {} is negative",
				self.pointer_radius
			);
			self.pointer_radius = defaults.pointer_radius;
		}
		if !non_negative(self.link_distance) {
			warn!(
				"ambient-field: link_distance {} is negative",
				self.link_distance
			);
			self.link_distance = defaults.link_distance;
		}
		self.link_alpha = self.link_alpha.clamp(0.0, 1.0);

		self
	}
}

fn positive(value: f64) -> bool {
	value.is_finite() && value > 0.0
}

fn non_negative(value: f64) -> bool {
	value.is_finite() && value >= 0.0
}
