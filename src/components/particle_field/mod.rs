//! Ambient particle field rendered behind page content.
//!
//! Small white particles drift across a full-viewport canvas, bounce off its
//! edges, scatter away from the pointer and are joined by faint lines when
//! they pass close to one another.
//!
//! The simulation ([`Particle`], [`ParticleField`]) is independent of the
//! browser: it draws through [`Drawable2D`] and is driven by an
//! [`AnimationDriver`] over any [`FrameScheduler`]. [`ParticleBackground`] is
//! the Leptos component that wires it to a canvas.
//!
//! # Example
//!
//! ```ignore
//! use ambient_field::{FieldConfig, ParticleBackground};
//!
//! view! {
//!     <ParticleBackground config=FieldConfig { max_particles: 60, ..Default::default() } />
//!     <main class="content">"..."</main>
//! }
//! ```

mod component;
pub mod config;
pub mod driver;
mod field;
mod host;
mod particles;
pub mod surface;
pub mod theme;

pub use component::ParticleBackground;
pub use config::FieldConfig;
pub use driver::{AnimationDriver, BrowserScheduler, DriverHandle, DriverState, FrameScheduler, ManualScheduler};
pub use field::ParticleField;
pub use host::{AmbientField, Pointer};
pub use particles::{Particle, pointer_falloff};
pub use surface::Drawable2D;
pub use theme::{Color, FieldStyle};
