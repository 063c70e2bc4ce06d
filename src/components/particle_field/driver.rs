//! Frame scheduling for the particle animation.
//!
//! The browser's `requestAnimationFrame` re-registration idiom is made
//! explicit here: an [`AnimationDriver`] owns the "run, then ask for the next
//! frame" loop, and a [`FrameScheduler`] supplies the frames. The browser
//! scheduler maps onto `requestAnimationFrame`/`cancelAnimationFrame`;
//! [`ManualScheduler`] is a headless ticker that fires frames on demand.
//!
//! Lifecycle is `Idle -> Running -> Stopped`. [`AnimationDriver::start`]
//! consumes the idle driver, so a stopped loop can never be restarted; hosts
//! build a new driver instead.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

/// Identifies one pending frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Host mechanism that runs a callback once at the next display refresh.
pub trait FrameScheduler {
	/// Queue `tick` for the next frame. `None` means the host refused.
	fn request_frame(&self, tick: &Rc<dyn Fn()>) -> Option<FrameHandle>;

	/// Withdraw a request made by [`FrameScheduler::request_frame`].
	fn cancel_frame(&self, handle: FrameHandle);
}

/// Where a driver is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
	Idle,
	Running,
	Stopped,
}

struct DriverInner<S: FrameScheduler> {
	scheduler: S,
	state: Cell<DriverState>,
	pending: Cell<Option<FrameHandle>>,
	on_frame: RefCell<Box<dyn FnMut()>>,
	tick: RefCell<Option<Rc<dyn Fn()>>>,
}

impl<S: FrameScheduler> DriverInner<S> {
	fn schedule(&self) {
		let Some(tick) = self.tick.borrow().clone() else {
			return;
		};
		match self.scheduler.request_frame(&tick) {
			Some(handle) => self.pending.set(Some(handle)),
			None => {
				warn!("ambient-field: frame request refused, stopping animation");
				self.state.set(DriverState::Stopped);
			}
		}
	}

	fn fire(&self) {
		// A tick queued before `stop` may still arrive; it must not draw.
		if self.state.get() != DriverState::Running {
			return;
		}
		self.pending.set(None);
		// A frame callback that re-enters the driver is skipped.
		if let Ok(mut on_frame) = self.on_frame.try_borrow_mut() {
			on_frame();
		}
		if self.state.get() == DriverState::Running {
			self.schedule();
		}
	}

	fn stop(&self) {
		if let Some(handle) = self.pending.take() {
			self.scheduler.cancel_frame(handle);
		}
		self.state.set(DriverState::Stopped);
		// Break the tick -> inner reference so the closure can be freed.
		self.tick.borrow_mut().take();
	}
}

/// An animation loop that has not started yet.
pub struct AnimationDriver<S: FrameScheduler> {
	scheduler: S,
}

impl<S: FrameScheduler + 'static> AnimationDriver<S> {
	pub fn new(scheduler: S) -> Self {
		Self { scheduler }
	}

	pub fn state(&self) -> DriverState {
		DriverState::Idle
	}

	/// Begin calling `on_frame` once per frame until the returned handle is
	/// stopped.
	pub fn start(self, on_frame: impl FnMut() + 'static) -> DriverHandle<S> {
		let inner = Rc::new(DriverInner {
			scheduler: self.scheduler,
			state: Cell::new(DriverState::Running),
			pending: Cell::new(None),
			on_frame: RefCell::new(Box::new(on_frame)),
			tick: RefCell::new(None),
		});

		let weak: Weak<DriverInner<S>> = Rc::downgrade(&inner);
		let tick: Rc<dyn Fn()> = Rc::new(move || {
			if let Some(inner) = weak.upgrade() {
				inner.fire();
			}
		});
		*inner.tick.borrow_mut() = Some(tick);
		inner.schedule();

		DriverHandle { inner }
	}
}

/// Cancellation handle for a running animation loop.
pub struct DriverHandle<S: FrameScheduler> {
	inner: Rc<DriverInner<S>>,
}

impl<S: FrameScheduler> DriverHandle<S> {
	/// Cancel the pending frame and stop the loop. Safe to call repeatedly.
	pub fn stop(&self) {
		self.inner.stop();
	}

	pub fn state(&self) -> DriverState {
		self.inner.state.get()
	}

	/// Whether a frame is currently queued with the scheduler.
	pub fn has_pending_frame(&self) -> bool {
		self.inner.pending.get().is_some()
	}
}

impl<S: FrameScheduler> Drop for DriverHandle<S> {
	fn drop(&mut self) {
		self.inner.stop();
	}
}

/// `requestAnimationFrame`-backed scheduler.
///
/// The JS closure is created on the first request and reused for every frame
/// after that, so one scheduler serves exactly one driver.
pub struct BrowserScheduler {
	window: Window,
	callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl BrowserScheduler {
	pub fn new(window: Window) -> Self {
		Self {
			window,
			callback: RefCell::new(None),
		}
	}
}

impl FrameScheduler for BrowserScheduler {
	fn request_frame(&self, tick: &Rc<dyn Fn()>) -> Option<FrameHandle> {
		let mut callback = self.callback.borrow_mut();
		let cb = callback.get_or_insert_with(|| {
			let tick = tick.clone();
			Closure::new(move || tick())
		});
		self.window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.ok()
			.map(FrameHandle)
	}

	fn cancel_frame(&self, handle: FrameHandle) {
		let _ = self.window.cancel_animation_frame(handle.0);
	}
}

/// Headless scheduler: frames fire only when [`ManualScheduler::advance`] is
/// called.
#[derive(Default)]
pub struct ManualScheduler {
	queue: RefCell<VecDeque<(FrameHandle, Rc<dyn Fn()>)>>,
	next_id: Cell<i32>,
	refuse: Cell<bool>,
}

impl ManualScheduler {
	pub fn new() -> Self {
		Self::default()
	}

	/// Fire every frame queued before this call. Returns how many fired.
	pub fn advance(&self) -> usize {
		let due: Vec<_> = self.queue.borrow_mut().drain(..).collect();
		let fired = due.len();
		for (_, tick) in due {
			tick();
		}
		fired
	}

	/// Number of frames waiting to fire.
	pub fn pending(&self) -> usize {
		self.queue.borrow().len()
	}

	/// Make further `request_frame` calls fail, like a host tearing down.
	pub fn refuse_requests(&self, refuse: bool) {
		self.refuse.set(refuse);
	}
}

impl FrameScheduler for ManualScheduler {
	fn request_frame(&self, tick: &Rc<dyn Fn()>) -> Option<FrameHandle> {
		if self.refuse.get() {
			return None;
		}
		let handle = FrameHandle(self.next_id.get());
		self.next_id.set(handle.0.wrapping_add(1));
		self.queue.borrow_mut().push_back((handle, tick.clone()));
		Some(handle)
	}

	fn cancel_frame(&self, handle: FrameHandle) {
		self.queue.borrow_mut().retain(|(h, _)| *h != handle);
	}
}

impl<T: FrameScheduler + ?Sized> FrameScheduler for Rc<T> {
	fn request_frame(&self, tick: &Rc<dyn Fn()>) -> Option<FrameHandle> {
		(**self).request_frame(tick)
	}

	fn cancel_frame(&self, handle: FrameHandle) {
		(**self).cancel_frame(handle);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn counter() -> (Rc<Cell<usize>>, impl FnMut() + 'static) {
		let count = Rc::new(Cell::new(0));
		let inner = count.clone();
		(count, move || inner.set(inner.get() + 1))
	}

	#[test]
	fn idle_until_started() {
		let driver = AnimationDriver::new(ManualScheduler::new());
		assert_eq!(driver.state(), DriverState::Idle);
	}

	#[test]
	fn runs_once_per_frame_with_one_pending_request() {
		let scheduler = Rc::new(ManualScheduler::new());
		let (count, on_frame) = counter();
		let handle = AnimationDriver::new(scheduler.clone()).start(on_frame);

		assert_eq!(handle.state(), DriverState::Running);
		assert_eq!(scheduler.pending(), 1);
		assert_eq!(count.get(), 0);

		for frame in 1..=5 {
			assert_eq!(scheduler.advance(), 1);
			assert_eq!(count.get(), frame);
			assert_eq!(scheduler.pending(), 1);
			assert!(handle.has_pending_frame());
		}
	}

	#[test]
	fn stop_cancels_pending_frame() {
		let scheduler = Rc::new(ManualScheduler::new());
		let (count, on_frame) = counter();
		let handle = AnimationDriver::new(scheduler.clone()).start(on_frame);
		scheduler.advance();

		handle.stop();
		assert_eq!(handle.state(), DriverState::Stopped);
		assert_eq!(scheduler.pending(), 0);
		assert!(!handle.has_pending_frame());

		for _ in 0..10 {
			scheduler.advance();
		}
		assert_eq!(count.get(), 1);
	}

	#[test]
	fn stop_is_idempotent() {
		let scheduler = Rc::new(ManualScheduler::new());
		let (_, on_frame) = counter();
		let handle = AnimationDriver::new(scheduler.clone()).start(on_frame);
		handle.stop();
		handle.stop();
		assert_eq!(handle.state(), DriverState::Stopped);
		assert_eq!(scheduler.pending(), 0);
	}

	/// A scheduler whose cancellation arrives too late: the queued frame still
	/// fires.
	#[derive(Default)]
	struct LateCancelScheduler {
		inner: ManualScheduler,
	}

	impl FrameScheduler for LateCancelScheduler {
		fn request_frame(&self, tick: &Rc<dyn Fn()>) -> Option<FrameHandle> {
			self.inner.request_frame(tick)
		}

		fn cancel_frame(&self, _handle: FrameHandle) {}
	}

	#[test]
	fn in_flight_frame_after_stop_does_nothing() {
		let scheduler = Rc::new(LateCancelScheduler::default());
		let (count, on_frame) = counter();
		let handle = AnimationDriver::new(scheduler.clone()).start(on_frame);

		handle.stop();
		assert_eq!(scheduler.inner.pending(), 1);
		assert_eq!(scheduler.inner.advance(), 1);
		assert_eq!(count.get(), 0);
		assert_eq!(scheduler.inner.pending(), 0);
	}

	#[test]
	fn stop_from_inside_frame_ends_loop() {
		let scheduler = Rc::new(ManualScheduler::new());
		let slot: Rc<RefCell<Option<DriverHandle<Rc<ManualScheduler>>>>> =
			Rc::new(RefCell::new(None));
		let frames = Rc::new(Cell::new(0));

		let (slot_cb, frames_cb) = (slot.clone(), frames.clone());
		let handle = AnimationDriver::new(scheduler.clone()).start(move || {
			frames_cb.set(frames_cb.get() + 1);
			if frames_cb.get() == 3 {
				if let Some(ref h) = *slot_cb.borrow() {
					h.stop();
				}
			}
		});
		*slot.borrow_mut() = Some(handle);

		for _ in 0..10 {
			scheduler.advance();
		}
		assert_eq!(frames.get(), 3);
		assert_eq!(scheduler.pending(), 0);
		let state = slot.borrow().as_ref().map(DriverHandle::state);
		assert_eq!(state, Some(DriverState::Stopped));
	}

	#[test]
	fn refused_request_stops_the_loop() {
		let scheduler = Rc::new(ManualScheduler::new());
		let (count, on_frame) = counter();
		let handle = AnimationDriver::new(scheduler.clone()).start(on_frame);

		scheduler.refuse_requests(true);
		scheduler.advance();
		assert_eq!(count.get(), 1);
		assert_eq!(handle.state(), DriverState::Stopped);
		assert_eq!(scheduler.pending(), 0);
	}

	#[test]
	fn dropping_the_handle_stops_the_loop() {
		let scheduler = Rc::new(ManualScheduler::new());
		let (count, on_frame) = counter();
		drop(AnimationDriver::new(scheduler.clone()).start(on_frame));
		assert_eq!(scheduler.pending(), 0);
		scheduler.advance();
		assert_eq!(count.get(), 0);
	}
}
