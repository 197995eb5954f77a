pub mod geometry_batch;
pub mod mesh_arena;
pub mod offscreen;
pub mod shader;

pub use geometry_batch::GeometryBatch;
pub use mesh_arena::{GeometryError, MeshArena, MeshHandle, MeshRecord, VertexAttribute};
pub use offscreen::OffscreenTarget;
pub use shader::ShaderError;

use thiserror::Error;

use crate::engine::loaders::obj::ObjError;

/// Umbrella error for render-layer setup.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Obj(#[from] ObjError),
}
