//! # Quadbook
//!
//! A keyboard-driven rendering sketch: thirteen instances of a small
//! colored-quad mesh — two hexagonal "books" plus one live quad — drawn
//! every frame while held keys nudge rotation, position, and camera angles.
//!
//! ## Quick start
//!
//! ```no_run
//! use quadbook::{run, AppConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     run(AppConfig::new().title("Quadbook").size(1280, 720))
//! }
//! ```
//!
//! ## Controls
//!
//! Hold a modifier key and tap/hold the arrow keys:
//!
//! - **A/S/D + ↑/↓** — rotate the live quad around Y/X/Z
//! - **C/X/Z + ↑/↓** — move the live quad along Y/X/Z
//! - **U/I/O + ↑/↓** — rotate the camera around X/Y/Z
//! - **Q + ↑/↓** — wireframe on/off
//! - **W + ↑/↓** — depth test on/off
//! - **P** — auto-advance the camera (↑/↓ change speed), **L** — stop
//! - **T** — reset everything, **ESC** — quit
//!
//! The per-frame command handling lives in [`ControlState::step`] behind
//! the [`KeySource`] trait, so all of it is testable without a window.

mod app;
mod camera;
mod controls;
mod gpu;
mod input;
mod mesh;
mod scene;
mod scene_pass;

pub use app::{AppConfig, run};
pub use camera::Camera;
pub use controls::{ControlState, DEFAULT_SPEED};
pub use gpu::GpuContext;
pub use input::{Input, KeySource};
pub use mesh::{Mesh, QUAD_INDICES, QUAD_VERTICES, Vertex};
pub use scene::{BASE_INSTANCES, INSTANCE_COUNT, INSTANCE_SCALE, Instance, instances};
pub use scene_pass::{MAX_INSTANCES, ScenePass};

// Re-export math and key types appearing in the public API.
pub use glam::{Mat4, Vec3};
pub use winit::keyboard::KeyCode;
