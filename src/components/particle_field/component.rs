//! Leptos component mounting the particle field on a background canvas.
//!
//! The component creates a fixed, full-viewport canvas and wires window
//! `resize`, `mousemove` and `mouseleave` listeners into an [`AmbientField`].
//! Frames come from `requestAnimationFrame` through [`BrowserScheduler`].
//! Everything is torn down when the owning reactive scope is cleaned up.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::config::FieldConfig;
use super::driver::BrowserScheduler;
use super::host::AmbientField;

/// Window listeners registered for one mounted canvas.
struct Listeners {
	window: Window,
	resize: Closure<dyn FnMut()>,
	mousemove: Closure<dyn FnMut(MouseEvent)>,
	mouseleave: Closure<dyn FnMut(MouseEvent)>,
}

impl Listeners {
	fn register(&self) {
		let _ = self
			.window
			.add_event_listener_with_callback("resize", self.resize.as_ref().unchecked_ref());
		let _ = self.window.add_event_listener_with_callback(
			"mousemove",
			self.mousemove.as_ref().unchecked_ref(),
		);
		if let Some(root) = self.window.document().and_then(|d| d.document_element()) {
			let _ = root.add_event_listener_with_callback(
				"mouseleave",
				self.mouseleave.as_ref().unchecked_ref(),
			);
		}
	}

	fn unregister(&self) {
		let _ = self
			.window
			.remove_event_listener_with_callback("resize", self.resize.as_ref().unchecked_ref());
		let _ = self.window.remove_event_listener_with_callback(
			"mousemove",
			self.mousemove.as_ref().unchecked_ref(),
		);
		if let Some(root) = self.window.document().and_then(|d| d.document_element()) {
			let _ = root.remove_event_listener_with_callback(
				"mouseleave",
				self.mouseleave.as_ref().unchecked_ref(),
			);
		}
	}
}

/// Live state for one mounted background.
struct Mounted {
	host: Rc<RefCell<AmbientField<BrowserScheduler>>>,
	listeners: Listeners,
}

fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

fn mount_background(canvas: HtmlCanvasElement, config: FieldConfig) -> Option<Mounted> {
	let window = web_sys::window()?;
	let (w, h) = viewport_size(&window)?;
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);

	let host = Rc::new(RefCell::new(AmbientField::new(config)));

	// The context is looked up per frame so a detached canvas just skips.
	let surface_canvas = canvas.clone();
	host.borrow_mut().mount(
		BrowserScheduler::new(window.clone()),
		w,
		h,
		move || {
			if !surface_canvas.is_connected() {
				return None;
			}
			context_2d(&surface_canvas)
		},
	);

	let (host_resize, canvas_resize) = (host.clone(), canvas.clone());
	let resize = Closure::new(move || {
		let Some(win) = web_sys::window() else {
			return;
		};
		let Some((nw, nh)) = viewport_size(&win) else {
			return;
		};
		canvas_resize.set_width(nw as u32);
		canvas_resize.set_height(nh as u32);
		host_resize.borrow().resize(nw, nh);
	});

	let host_move = host.clone();
	let mousemove = Closure::new(move |ev: MouseEvent| {
		host_move
			.borrow()
			.set_pointer(ev.client_x() as f64, ev.client_y() as f64);
	});

	let host_leave = host.clone();
	let mouseleave = Closure::new(move |_: MouseEvent| {
		host_leave.borrow().clear_pointer();
	});

	let listeners = Listeners {
		window,
		resize,
		mousemove,
		mouseleave,
	};
	listeners.register();

	Some(Mounted { host, listeners })
}

/// Renders the ambient particle field behind page content.
///
/// The canvas is fixed to the viewport, ignores pointer events so content
/// above it stays interactive, and tracks the pointer through window
/// listeners instead.
#[component]
pub fn ParticleBackground(
	/// Tuning for density, motion and links. Defaults reproduce the stock look.
	#[prop(default = FieldConfig::default())]
	config: FieldConfig,
	/// Extra CSS class for the canvas.
	#[prop(optional, into)]
	class: Option<String>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let mounted: Rc<RefCell<Option<Mounted>>> = Rc::new(RefCell::new(None));
	let mounted_init = mounted.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if mounted_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		match mount_background(canvas, config.clone()) {
			Some(m) => *mounted_init.borrow_mut() = Some(m),
			None => warn!("ambient-field: no window or viewport, background disabled"),
		}
	});

	let mounted_cleanup = SendWrapper::new(mounted);
	on_cleanup(move || {
		if let Some(m) = mounted_cleanup.borrow_mut().take() {
			m.listeners.unregister();
			m.host.borrow_mut().unmount();
		}
	});

	let class = match class {
		Some(extra) => format!("particle-background {extra}"),
		None => "particle-background".to_string(),
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class=class
			aria-hidden="true"
			style="position: fixed; inset: 0; display: block; pointer-events: none; z-index: 0;"
		/>
	}
}
