//! Visual styling for the particle field.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const WHITE: Color = Color::rgb(255, 255, 255);

	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS `rgba(...)` string, always with an explicit alpha channel.
	pub fn to_css(self) -> String {
		format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
	}
}

/// Colors and stroke settings used when drawing a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldStyle {
	/// Base particle color; each particle substitutes its own alpha.
	pub particle_color: Color,
	/// Connective line color, alpha included.
	pub link_color: Color,
	/// Connective line width in pixels.
	pub link_width: f64,
}

impl FieldStyle {
	/// Faint white particles and near-invisible links, suited to dark pages.
	pub fn ambient(link_alpha: f64, link_width: f64) -> Self {
		Self {
			particle_color: Color::WHITE,
			link_color: Color::WHITE.with_alpha(link_alpha),
			link_width,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_always_carries_alpha() {
		assert_eq!(Color::WHITE.to_css(), "rgba(255,255,255,1)");
		assert_eq!(Color::WHITE.with_alpha(0.03).to_css(), "rgba(255,255,255,0.03)");
	}

	#[test]
	fn ambient_style_keeps_particles_opaque_white() {
		let style = FieldStyle::ambient(0.03, 0.5);
		assert_eq!(style.link_color, Color::rgba(255, 255, 255, 0.03));
		assert_eq!(style.link_width, 0.5);
		assert_eq!(style.particle_color, Color::WHITE);
	}
}
