//! Lifecycle glue between a page and the particle field.
//!
//! [`AmbientField`] bundles the field, the pointer cell and the running
//! animation so a page only deals with `mount`, `resize`, `set_pointer` and
//! `unmount`. The drawing surface is resolved every frame through a provider
//! closure; when it yields nothing (canvas detached, context lost) the frame
//! is skipped.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{info, trace};

use super::config::FieldConfig;
use super::driver::{AnimationDriver, DriverHandle, DriverState, FrameScheduler};
use super::field::ParticleField;
use super::surface::Drawable2D;

/// Last known pointer position, written by input handlers and read by the
/// frame callback.
#[derive(Debug)]
pub struct Pointer {
	x: Cell<f64>,
	y: Cell<f64>,
}

impl Pointer {
	/// Position used while no pointer is over the page. Far enough away that
	/// no particle is ever repelled.
	pub const AWAY: (f64, f64) = (-1.0e6, -1.0e6);

	pub fn set(&self, x: f64, y: f64) {
		self.x.set(x);
		self.y.set(y);
	}

	pub fn clear(&self) {
		self.set(Self::AWAY.0, Self::AWAY.1);
	}

	pub fn get(&self) -> (f64, f64) {
		(self.x.get(), self.y.get())
	}
}

impl Default for Pointer {
	fn default() -> Self {
		Self {
			x: Cell::new(Self::AWAY.0),
			y: Cell::new(Self::AWAY.1),
		}
	}
}

/// A particle field plus the animation that drives it.
///
/// Dropping the host stops the animation.
pub struct AmbientField<S: FrameScheduler> {
	field: Rc<RefCell<ParticleField>>,
	pointer: Rc<Pointer>,
	animation: Option<DriverHandle<S>>,
}

impl<S: FrameScheduler + 'static> AmbientField<S> {
	pub fn new(config: FieldConfig) -> Self {
		Self::from_field(ParticleField::new(config))
	}

	pub fn from_field(field: ParticleField) -> Self {
		Self {
			field: Rc::new(RefCell::new(field)),
			pointer: Rc::new(Pointer::default()),
			animation: None,
		}
	}

	/// Seed for the initial viewport and start animating.
	///
	/// `surface` is asked for a drawing target once per frame. Mounting an
	/// already mounted field replaces its animation.
	pub fn mount<D, F>(&mut self, scheduler: S, width: f64, height: f64, mut surface: F)
	where
		D: Drawable2D,
		F: FnMut() -> Option<D> + 'static,
	{
		self.unmount();
		self.field.borrow_mut().seed(width, height);
		info!(
			"ambient-field: mounted {}x{} with {} particles",
			width,
			height,
			self.field.borrow().len()
		);

		let (field, pointer) = (self.field.clone(), self.pointer.clone());
		let handle = AnimationDriver::new(scheduler).start(move || {
			let Some(target) = surface() else {
				trace!("ambient-field: no surface, skipping frame");
				return;
			};
			let (px, py) = pointer.get();
			field.borrow_mut().step(&target, px, py);
		});
		self.animation = Some(handle);
	}

	/// Re-seed for a new viewport. The next frame uses the new particles.
	pub fn resize(&self, width: f64, height: f64) {
		self.field.borrow_mut().seed(width, height);
	}

	pub fn set_pointer(&self, x: f64, y: f64) {
		self.pointer.set(x, y);
	}

	/// Forget the pointer, e.g. when it leaves the window.
	pub fn clear_pointer(&self) {
		self.pointer.clear();
	}

	/// Stop animating. Safe to call when not mounted.
	pub fn unmount(&mut self) {
		if let Some(handle) = self.animation.take() {
			handle.stop();
			info!("ambient-field: unmounted");
		}
	}

	pub fn is_running(&self) -> bool {
		self.animation
			.as_ref()
			.is_some_and(|h| h.state() == DriverState::Running)
	}

	pub fn pointer(&self) -> Rc<Pointer> {
		self.pointer.clone()
	}

	pub fn field(&self) -> Rc<RefCell<ParticleField>> {
		self.field.clone()
	}
}

#[cfg(test)]
mod tests {
	use super::super::driver::ManualScheduler;
	use super::super::surface::recording::{DrawOp, RecordingSurface};
	use super::*;

	struct Harness {
		host: AmbientField<Rc<ManualScheduler>>,
		scheduler: Rc<ManualScheduler>,
		surface: Rc<RecordingSurface>,
		attached: Rc<Cell<bool>>,
	}

	fn mounted(width: f64, height: f64) -> Harness {
		let scheduler = Rc::new(ManualScheduler::new());
		let surface = Rc::new(RecordingSurface::default());
		let attached = Rc::new(Cell::new(true));
		let mut host = AmbientField::from_field(ParticleField::with_seed(FieldConfig::default(), 99));

		let (s, a) = (surface.clone(), attached.clone());
		host.mount(scheduler.clone(), width, height, move || {
			a.get().then(|| s.clone())
		});
		Harness {
			host,
			scheduler,
			surface,
			attached,
		}
	}

	#[test]
	fn mount_seeds_and_starts() {
		let h = mounted(1500.0, 1000.0);
		assert!(h.host.is_running());
		assert_eq!(h.host.field().borrow().len(), 100);
		assert_eq!(h.scheduler.pending(), 1);
		assert!(h.surface.ops().is_empty());

		h.scheduler.advance();
		assert_eq!(h.surface.clears(), 1);
		assert_eq!(h.surface.circles(), 100);
	}

	#[test]
	fn resize_reseeds_before_next_frame() {
		let h = mounted(1500.0, 1000.0);
		h.scheduler.advance();

		h.host.resize(300.0, 300.0);
		assert_eq!(h.host.field().borrow().len(), 6);

		h.surface.reset();
		h.scheduler.advance();
		assert_eq!(h.surface.circles(), 6);
		assert_eq!(h.surface.ops()[0], DrawOp::Clear {
			width: 300.0,
			height: 300.0
		});
	}

	#[test]
	fn missing_surface_skips_frame_without_touching_field() {
		let h = mounted(600.0, 500.0);
		let before = h.host.field().borrow().particles().to_vec();

		h.attached.set(false);
		h.scheduler.advance();
		assert!(h.surface.ops().is_empty());
		assert_eq!(h.host.field().borrow().particles(), &before[..]);
		// The loop keeps going and draws once the surface is back.
		assert_eq!(h.scheduler.pending(), 1);

		h.attached.set(true);
		h.scheduler.advance();
		assert_eq!(h.surface.clears(), 1);
	}

	#[test]
	fn pointer_reaches_the_simulation() {
		let h = mounted(1000.0, 1000.0);
		{
			let field = h.host.field();
			let mut field = field.borrow_mut();
			field.particles_mut().truncate(1);
			let p = &mut field.particles_mut()[0];
			(p.x, p.y, p.speed_x, p.speed_y) = (500.0, 500.0, 0.0, 0.0);
		}
		h.host.set_pointer(470.0, 500.0);
		h.scheduler.advance();
		assert!(h.host.field().borrow().particles()[0].speed_x > 0.0);

		h.host.clear_pointer();
		assert_eq!(h.host.pointer().get(), Pointer::AWAY);
	}

	#[test]
	fn unmount_freezes_the_canvas() {
		let mut h = mounted(600.0, 500.0);
		for _ in 0..3 {
			h.scheduler.advance();
		}
		let drawn = h.surface.ops();

		h.host.unmount();
		assert!(!h.host.is_running());
		for _ in 0..10 {
			h.scheduler.advance();
		}
		assert_eq!(h.surface.ops(), drawn);
		assert_eq!(h.scheduler.pending(), 0);

		// Second unmount is a no-op.
		h.host.unmount();
	}

	#[test]
	fn dropping_the_host_stops_animation() {
		let h = mounted(600.0, 500.0);
		let Harness {
			host,
			scheduler,
			surface,
			..
		} = h;
		drop(host);
		scheduler.advance();
		assert!(surface.ops().is_empty());
	}
}
