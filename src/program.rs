use glow::HasContext;
use log::info;

use crate::config::Config;
use crate::engine::rendering::shader;
use crate::engine::rendering::{GeometryBatch, MeshHandle, OffscreenTarget, RenderError};
use crate::engine::utils::math::{
    matrix_point_at, matrix_project, matrix_transform, matrix_view, Vec3,
};
use crate::engine::utils::random::Randomizer;

/// Owns the GL context and everything drawn with it: one shader program,
/// one geometry batch holding the loaded mesh and an off-screen target
/// the scene is rendered into before being presented.
pub struct Program {
    gl: glow::Context,
    shader_program: glow::Program,
    batch: GeometryBatch,
    mesh: MeshHandle,
    offscreen: OffscreenTarget,
    config: Config,
    /// Initial rotation phase in radians, drawn once at startup.
    phase: f32,
}

impl Program {
    pub fn new(gl: glow::Context, config: Config) -> Result<Self, RenderError> {
        let shader_program = shader::build_program(
            &gl,
            &config.vertex_shader_path,
            &config.fragment_shader_path,
        )?;

        let mut batch = GeometryBatch::new(&gl)?;
        let mesh = batch.load_obj(&config.mesh_path)?;
        batch.add_attribute(mesh, 0, 3, glow::FLOAT, false, 12, 0)?;
        batch.upload(&gl)?;

        let offscreen = OffscreenTarget::new(&gl, config.width, config.height)?;

        let mut randomizer = match config.seed {
            Some(seed) => Randomizer::from_seed(seed),
            None => Randomizer::from_entropy(),
        };
        let phase = randomizer.float_in(0.0, std::f32::consts::TAU);

        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }
        info!(
            "scene ready: {} indices from {}",
            batch.get(mesh)?.indices.len(),
            config.mesh_path.display()
        );

        Ok(Program {
            gl,
            shader_program,
            batch,
            mesh,
            offscreen,
            config,
            phase,
        })
    }

    /// Renders one frame: the spinning mesh into the off-screen target,
    /// then the target onto the window as a full-screen quad.
    pub fn render(&mut self, width: u32, height: u32, elapsed: f32) -> Result<(), RenderError> {
        self.offscreen.resize(&self.gl, width, height);
        self.offscreen.bind(&self.gl);

        unsafe {
            self.gl.clear_color(0.2, 0.3, 0.3, 1.0);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            self.gl.use_program(Some(self.shader_program));
        }

        let angle = self.phase + elapsed;
        let world = matrix_transform(0.0, 0.0, 6.0, angle * 0.5, angle, angle * 0.25);

        // GL eye space: the camera z axis points at the viewer, so a
        // camera at the origin watching +z carries the axis (0, 0, -1).
        let camera_pos = Vec3::new(0.0, 0.0, 0.0);
        let camera_axis = Vec3::new(0.0, 0.0, -1.0);
        let up = Vec3::new(0.0, 1.0, 0.0);
        let view = matrix_view(&matrix_point_at(camera_pos, camera_axis, up));

        let aspect = aspect_ratio(width, height);
        let projection = matrix_project(
            self.config.fov_degrees,
            aspect,
            self.config.near_plane,
            self.config.far_plane,
        );

        unsafe {
            let gl = &self.gl;
            if let Some(loc) = gl.get_uniform_location(self.shader_program, "world_txfm") {
                gl.uniform_matrix_4_f32_slice(Some(&loc), true, world.as_flat());
            }
            if let Some(loc) = gl.get_uniform_location(self.shader_program, "view_txfm") {
                gl.uniform_matrix_4_f32_slice(Some(&loc), true, view.as_flat());
            }
            if let Some(loc) = gl.get_uniform_location(self.shader_program, "projection_txfm") {
                gl.uniform_matrix_4_f32_slice(Some(&loc), true, projection.as_flat());
            }
            let pulse = elapsed.sin() / 2.0 + 0.5;
            if let Some(loc) = gl.get_uniform_location(self.shader_program, "tint") {
                gl.uniform_4_f32(Some(&loc), 0.0, pulse, 0.0, 1.0);
            }
        }

        let index_count = self.batch.get(self.mesh)?.indices.len() as i32;
        self.batch.bind(&self.gl);
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, index_count, glow::UNSIGNED_INT, 0);
            self.gl.bind_vertex_array(None);
        }

        self.offscreen.present(&self.gl, width, height);
        Ok(())
    }

    pub fn cleanup(&mut self) {
        unsafe {
            self.gl.delete_program(self.shader_program);
        }
        self.batch.delete(&self.gl);
        self.offscreen.delete(&self.gl);
    }
}

/// Viewport aspect ratio. A minimized window can report zero for either
/// dimension; both are clamped to 1.
fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_survives_zero_dimensions() {
        assert_eq!(aspect_ratio(0, 0), 1.0);
        assert_eq!(aspect_ratio(0, 720), 1.0 / 720.0);
        assert_eq!(aspect_ratio(1280, 0), 1280.0);
        assert_eq!(aspect_ratio(1280, 720), 1280.0 / 720.0);
    }
}
