//! Drawing surface abstraction.
//!
//! The simulation only ever needs three primitives, so it draws through the
//! [`Drawable2D`] capability instead of a concrete canvas. The browser build
//! implements it for `CanvasRenderingContext2d`; tests record the calls.

use std::f64::consts::PI;
use std::rc::Rc;

use web_sys::CanvasRenderingContext2d;

use super::theme::Color;

/// Minimal 2D drawing capability used by the particle field.
pub trait Drawable2D {
	/// Erase the `width` x `height` region starting at the origin.
	fn clear(&self, width: f64, height: f64);

	/// Fill a circle of `radius` centred on `(x, y)`.
	fn fill_circle(&self, x: f64, y: f64, radius: f64, color: Color);

	/// Stroke a straight line from `(x1, y1)` to `(x2, y2)`.
	fn stroke_line(&self, from: (f64, f64), to: (f64, f64), color: Color, width: f64);
}

impl<T: Drawable2D + ?Sized> Drawable2D for Rc<T> {
	fn clear(&self, width: f64, height: f64) {
		(**self).clear(width, height);
	}

	fn fill_circle(&self, x: f64, y: f64, radius: f64, color: Color) {
		(**self).fill_circle(x, y, radius, color);
	}

	fn stroke_line(&self, from: (f64, f64), to: (f64, f64), color: Color, width: f64) {
		(**self).stroke_line(from, to, color, width);
	}
}

impl Drawable2D for CanvasRenderingContext2d {
	fn clear(&self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn fill_circle(&self, x: f64, y: f64, radius: f64, color: Color) {
		self.set_fill_style_str(&color.to_css());
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, PI * 2.0);
		self.fill();
	}

	fn stroke_line(&self, from: (f64, f64), to: (f64, f64), color: Color, width: f64) {
		self.set_stroke_style_str(&color.to_css());
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
	}
}
