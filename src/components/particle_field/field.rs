//! The particle collection and its per-frame orchestration.
//!
//! A [`ParticleField`] owns every particle, the viewport it was seeded for and
//! the random source used to seed it. One call to [`ParticleField::step`]
//! renders one complete frame:
//!
//! 1. clear the surface
//! 2. update then draw each particle, in collection order
//! 3. stroke a connective line for every pair `i < j` closer than the link
//!    distance
//!
//! The pairwise pass is O(n²), bounded by `max_particles`.

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::config::FieldConfig;
use super::particles::Particle;
use super::surface::Drawable2D;
use super::theme::FieldStyle;

/// Owns the particles and advances them together.
pub struct ParticleField {
	particles: Vec<Particle>,
	width: f64,
	height: f64,
	config: FieldConfig,
	style: FieldStyle,
	rng: StdRng,
}

impl ParticleField {
	/// Empty field. Uses `config.seed` when set, otherwise OS entropy.
	pub fn new(config: FieldConfig) -> Self {
		let rng = match config.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_entropy(),
		};
		Self::with_rng(config, rng)
	}

	/// Empty field with a fixed seed, for reproducible layouts.
	pub fn with_seed(config: FieldConfig, seed: u64) -> Self {
		Self::with_rng(config, StdRng::seed_from_u64(seed))
	}

	fn with_rng(config: FieldConfig, rng: StdRng) -> Self {
		let config = config.normalized();
		Self {
			particles: Vec::new(),
			width: 0.0,
			height: 0.0,
			style: config.style(),
			config,
			rng,
		}
	}

	/// Discard every particle and fill the field for a `width` x `height`
	/// viewport.
	pub fn seed(&mut self, width: f64, height: f64) {
		let count = self.config.particle_count(width, height);
		self.width = width;
		self.height = height;
		self.particles.clear();
		self.particles.reserve(count);
		for _ in 0..count {
			let particle = Particle::create(&mut self.rng, width, height, &self.config);
			self.particles.push(particle);
		}
		debug!(
			"ambient-field: seeded {} particles for {}x{}",
			count, width, height
		);
	}

	/// Render one frame onto `surface` with the pointer at `(pointer_x, pointer_y)`.
	pub fn step(&mut self, surface: &impl Drawable2D, pointer_x: f64, pointer_y: f64) {
		let (width, height) = (self.width, self.height);
		surface.clear(width, height);

		for p in &mut self.particles {
			p.update(width, height, pointer_x, pointer_y, &self.config);
			p.draw(surface, self.style.particle_color);
		}

		self.draw_links(surface);
	}

	fn draw_links(&self, surface: &impl Drawable2D) {
		let max = self.config.link_distance;
		for (i, a) in self.particles.iter().enumerate() {
			for b in &self.particles[i + 1..] {
				if a.distance_to(b) < max {
					surface.stroke_line(
						(a.x, a.y),
						(b.x, b.y),
						self.style.link_color,
						self.style.link_width,
					);
				}
			}
		}
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Mutable access for hosts that place particles explicitly.
	pub fn particles_mut(&mut self) -> &mut Vec<Particle> {
		&mut self.particles
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	/// Viewport size the field was last seeded for.
	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}
}
