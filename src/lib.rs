//! OpenGL demo that loads a Wavefront OBJ mesh and spins it in front of
//! the camera. The scene is drawn into an off-screen framebuffer and
//! presented to the window as a textured full-screen quad.
//!
//! Matrices follow the row-vector convention: points transform as
//! `v' = v * M`, translations live in the bottom row, and uniform
//! uploads pass `transpose = true` so shaders keep the same order.

pub mod config;
pub mod engine;
pub mod program;

pub use config::Config;
pub use program::Program;
