use std::path::Path;

use glow::HasContext;
use log::{debug, error};

use super::mesh_arena::{GeometryError, MeshArena, MeshHandle, MeshRecord, VertexAttribute};
use crate::engine::loaders::obj::{self, ObjData, ObjError};

/// GL buffers backing one arena record, created at first upload.
struct MeshBuffers {
    vbo: glow::Buffer,
    ebo: Option<glow::Buffer>,
}

/// One vertex array object plus every mesh registered under it.
///
/// Registration is CPU-only. [`GeometryBatch::upload`] pushes all records to
/// the GPU in one pass; [`GeometryBatch::bind`] is the cheap per-frame call.
pub struct GeometryBatch {
    vao: glow::VertexArray,
    arena: MeshArena,
    buffers: Vec<MeshBuffers>,
}

impl GeometryBatch {
    pub fn new(gl: &glow::Context) -> Result<Self, GeometryError> {
        let vao = unsafe { gl.create_vertex_array().map_err(GeometryError::Allocation)? };
        Ok(Self {
            vao,
            arena: MeshArena::new(),
            buffers: Vec::new(),
        })
    }

    pub fn create_mesh(&mut self, vertices: Vec<f32>) -> MeshHandle {
        self.arena.create_mesh(vertices)
    }

    pub fn create_indexed_mesh(&mut self, vertices: Vec<f32>, indices: Vec<i32>) -> MeshHandle {
        self.arena.create_indexed_mesh(vertices, indices)
    }

    /// Registers the mesh from an OBJ file. An unreadable file is logged
    /// and registered as an empty mesh so the run can continue; malformed
    /// content is a hard error.
    pub fn load_obj(&mut self, path: impl AsRef<Path>) -> Result<MeshHandle, ObjError> {
        let path = path.as_ref();
        let data = match obj::load_obj(path) {
            Ok(data) => data,
            Err(err @ ObjError::Io { .. }) => {
                error!("{err}");
                ObjData::default()
            }
            Err(err) => return Err(err),
        };
        debug!(
            "registered {}: {} vertices, {} indices",
            path.display(),
            data.vertices.len() / 3,
            data.indices.len()
        );
        Ok(self.arena.create_indexed_mesh(data.vertices, data.indices))
    }

    pub fn add_attribute(
        &mut self,
        handle: MeshHandle,
        location: u32,
        count: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) -> Result<(), GeometryError> {
        self.arena.add_attribute(
            handle,
            VertexAttribute {
                location,
                count,
                data_type,
                normalized,
                stride,
                offset,
            },
        )
    }

    /// Read access to a record's CPU copy, e.g. for index counts at draw
    /// time.
    pub fn get(&self, handle: MeshHandle) -> Result<&MeshRecord, GeometryError> {
        self.arena.get(handle)
    }

    /// Uploads every registered record in one pass: binds the VAO, creates
    /// missing buffer objects, pushes vertex and index bytes and activates
    /// the attribute descriptors. Calling it again re-uploads everything,
    /// which is how records registered after the first upload reach the GPU.
    pub fn upload(&mut self, gl: &glow::Context) -> Result<(), GeometryError> {
        unsafe {
            gl.bind_vertex_array(Some(self.vao));

            for (i, record) in self.arena.iter() {
                if self.buffers.len() <= i {
                    let vbo = gl.create_buffer().map_err(GeometryError::Allocation)?;
                    let ebo = if record.indexed {
                        Some(gl.create_buffer().map_err(GeometryError::Allocation)?)
                    } else {
                        None
                    };
                    self.buffers.push(MeshBuffers { vbo, ebo });
                }
                let buffers = &self.buffers[i];

                gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffers.vbo));
                gl.buffer_data_u8_slice(
                    glow::ARRAY_BUFFER,
                    bytemuck::cast_slice(&record.vertices),
                    glow::STATIC_DRAW,
                );

                for attribute in &record.attributes {
                    gl.vertex_attrib_pointer_f32(
                        attribute.location,
                        attribute.count,
                        attribute.data_type,
                        attribute.normalized,
                        attribute.stride,
                        attribute.offset,
                    );
                    gl.enable_vertex_attrib_array(attribute.location);
                }

                if let Some(ebo) = buffers.ebo {
                    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
                    gl.buffer_data_u8_slice(
                        glow::ELEMENT_ARRAY_BUFFER,
                        bytemuck::cast_slice(&record.indices),
                        glow::STATIC_DRAW,
                    );
                }
            }

            gl.bind_vertex_array(None);
        }
        debug!("uploaded {} meshes", self.arena.len());
        Ok(())
    }

    /// Binds the VAO for drawing. Does not re-upload.
    pub fn bind(&self, gl: &glow::Context) {
        unsafe {
            gl.bind_vertex_array(Some(self.vao));
        }
    }

    /// Frees the VAO and every buffer object. Records die with the batch.
    pub fn delete(&mut self, gl: &glow::Context) {
        unsafe {
            for buffers in self.buffers.drain(..) {
                gl.delete_buffer(buffers.vbo);
                if let Some(ebo) = buffers.ebo {
                    gl.delete_buffer(ebo);
                }
            }
            gl.delete_vertex_array(self.vao);
        }
    }
}
