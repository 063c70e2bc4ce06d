//! ambient-field: decorative particle background for a portfolio site.
//!
//! This crate provides a WASM canvas component that renders a drifting
//! particle field with pointer repulsion and connective lines behind the page
//! content, plus a minimal page shell to host it.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

// Only needed for its `js` feature, which lets `rand` seed from the browser.
use getrandom as _;

pub mod components;

pub use components::particle_field::{
	AmbientField, AnimationDriver, Drawable2D, FieldConfig, ParticleBackground, ParticleField,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("ambient-field: logging initialized");
}

/// Load field tuning from a script element with id="field-config".
/// Expected format: JSON object with any subset of [`FieldConfig`] fields.
fn load_field_config() -> Option<FieldConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("field-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match FieldConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"ambient-field: loaded config (max {} particles, seed {:?})",
				config.max_particles, config.seed
			);
			Some(config)
		}
		Err(e) => {
			warn!("ambient-field: failed to parse field config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads field tuning from the DOM and renders the background under a hero.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_field_config().unwrap_or_default();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Portfolio" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="page">
			<ParticleBackground config=config />
			<header class="hero">
				<h1>"Hello, I build things for the web."</h1>
				<p class="subtitle">"Move the pointer to scatter the particles."</p>
			</header>
		</div>
	}
}
