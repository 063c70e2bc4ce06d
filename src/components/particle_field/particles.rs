//! A single drifting particle.

use rand::Rng;

use super::config::FieldConfig;
use super::surface::Drawable2D;
use super::theme::Color;

/// A point-mass drifting across the canvas.
///
/// `size` and `alpha` are fixed at creation; position and velocity change
/// every frame. Velocity is in pixels per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Horizontal canvas position in pixels.
	pub x: f64,
	/// Vertical canvas position in pixels.
	pub y: f64,
	/// Horizontal velocity in pixels per frame.
	pub speed_x: f64,
	/// Vertical velocity in pixels per frame.
	pub speed_y: f64,
	size: f64,
	alpha: f64,
}

/// Uniform sample from `[lo, hi)`. Collapses to `lo` when the range is empty.
fn uniform(rng: &mut impl Rng, lo: f64, hi: f64) -> f64 {
	if hi > lo {
		rng.gen_range(lo..hi)
	} else {
		lo
	}
}

/// Repulsion strength at `distance` from the pointer: 1 at the pointer,
/// falling linearly to 0 at `radius`, and 0 beyond it.
pub fn pointer_falloff(distance: f64, radius: f64) -> f64 {
	if distance < radius {
		(radius - distance) / radius
	} else {
		0.0
	}
}

impl Particle {
	/// Place a particle uniformly inside a `width` x `height` canvas.
	pub fn create(rng: &mut impl Rng, width: f64, height: f64, config: &FieldConfig) -> Self {
		Self {
			x: uniform(rng, 0.0, width),
			y: uniform(rng, 0.0, height),
			size: uniform(rng, config.size_min, config.size_max),
			speed_x: uniform(rng, -config.speed_range, config.speed_range),
			speed_y: uniform(rng, -config.speed_range, config.speed_range),
			alpha: uniform(rng, config.alpha_min, config.alpha_max),
		}
	}

	/// Build a particle with explicit state.
	pub fn with_state(x: f64, y: f64, speed_x: f64, speed_y: f64, size: f64, alpha: f64) -> Self {
		Self {
			x,
			y,
			speed_x,
			speed_y,
			size,
			alpha,
		}
	}

	pub fn size(&self) -> f64 {
		self.size
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn speed(&self) -> f64 {
		self.speed_x.hypot(self.speed_y)
	}

	/// Advance one frame: move, bounce off the canvas edges, get pushed away
	/// from the pointer, then cap the speed.
	///
	/// Position is not clamped on a bounce, so a particle may sit up to one
	/// frame of travel outside the canvas before it heads back in.
	pub fn update(
		&mut self,
		width: f64,
		height: f64,
		pointer_x: f64,
		pointer_y: f64,
		config: &FieldConfig,
	) {
		self.x += self.speed_x;
		self.y += self.speed_y;

		if self.x < 0.0 || self.x > width {
			self.speed_x = -self.speed_x;
		}
		if self.y < 0.0 || self.y > height {
			self.speed_y = -self.speed_y;
		}

		let (dx, dy) = (self.x - pointer_x, self.y - pointer_y);
		let distance = dx.hypot(dy);
		if distance < config.pointer_radius {
			let angle = dy.atan2(dx);
			let force = pointer_falloff(distance, config.pointer_radius) * config.pointer_strength;
			self.speed_x += angle.cos() * force;
			self.speed_y += angle.sin() * force;
		}

		let speed = self.speed();
		if speed > config.max_speed {
			let scale = config.max_speed / speed;
			self.speed_x *= scale;
			self.speed_y *= scale;
		}
	}

	/// Fill a circle of the particle's size with its own opacity.
	pub fn draw(&self, surface: &impl Drawable2D, color: Color) {
		surface.fill_circle(self.x, self.y, self.size, color.with_alpha(self.alpha));
	}

	/// Euclidean distance to another particle.
	pub fn distance_to(&self, other: &Particle) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}
}
