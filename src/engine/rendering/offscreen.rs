use glow::HasContext;
use log::error;

use super::geometry_batch::GeometryBatch;
use super::mesh_arena::GeometryError;
use super::shader::{compile_shader, link_program};
use super::RenderError;

const PRESENT_VS: &str = r#"
    #version 330 core
    layout(location = 0) in vec2 position;
    layout(location = 1) in vec2 uv;
    out vec2 v_uv;
    void main() {
        v_uv = uv;
        gl_Position = vec4(position, 0.0, 1.0);
    }
"#;

const PRESENT_FS: &str = r#"
    #version 330 core
    in vec2 v_uv;
    out vec4 FragColor;
    uniform sampler2D screen_texture;
    void main() {
        FragColor = texture(screen_texture, v_uv);
    }
"#;

// x, y, u, v per corner
const QUAD_VERTICES: [f32; 16] = [
    -1.0, -1.0, 0.0, 0.0, //
    1.0, -1.0, 1.0, 0.0, //
    1.0, 1.0, 1.0, 1.0, //
    -1.0, 1.0, 0.0, 1.0,
];
const QUAD_INDICES: [i32; 6] = [0, 1, 2, 0, 2, 3];

/// Off-screen render target: a framebuffer with an RGBA color texture and a
/// depth renderbuffer, plus the full-screen quad that puts the color back
/// on the default framebuffer. The quad goes through its own
/// [`GeometryBatch`] like any other mesh.
pub struct OffscreenTarget {
    fbo: glow::Framebuffer,
    color: glow::Texture,
    depth: glow::Renderbuffer,
    width: i32,
    height: i32,
    quad: GeometryBatch,
    present_program: glow::Program,
}

impl OffscreenTarget {
    pub fn new(gl: &glow::Context, width: u32, height: u32) -> Result<Self, RenderError> {
        let fbo = unsafe { gl.create_framebuffer().map_err(GeometryError::Allocation)? };
        let color = unsafe { gl.create_texture().map_err(GeometryError::Allocation)? };
        let depth = unsafe { gl.create_renderbuffer().map_err(GeometryError::Allocation)? };

        let mut quad = GeometryBatch::new(gl)?;
        let quad_mesh = quad.create_indexed_mesh(QUAD_VERTICES.to_vec(), QUAD_INDICES.to_vec());
        quad.add_attribute(quad_mesh, 0, 2, glow::FLOAT, false, 16, 0)?;
        quad.add_attribute(quad_mesh, 1, 2, glow::FLOAT, false, 16, 8)?;
        quad.upload(gl)?;

        let vs = compile_shader(gl, glow::VERTEX_SHADER, PRESENT_VS, "present vertex")?;
        let fs = compile_shader(gl, glow::FRAGMENT_SHADER, PRESENT_FS, "present fragment")?;
        let present_program = link_program(gl, vs, fs, "present")?;

        let mut target = Self {
            fbo,
            color,
            depth,
            width: 0,
            height: 0,
            quad,
            present_program,
        };
        target.allocate(gl, width.max(1) as i32, height.max(1) as i32);
        Ok(target)
    }

    /// Reallocates the attachments when the window size changed.
    pub fn resize(&mut self, gl: &glow::Context, width: u32, height: u32) {
        let (width, height) = (width.max(1) as i32, height.max(1) as i32);
        if width != self.width || height != self.height {
            self.allocate(gl, width, height);
        }
    }

    fn allocate(&mut self, gl: &glow::Context, width: i32, height: i32) {
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(self.color));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(None),
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(self.depth));
            gl.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH_COMPONENT24, width, height);
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);

            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(self.color),
                0,
            );
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(self.depth),
            );

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            if status != glow::FRAMEBUFFER_COMPLETE {
                error!("offscreen framebuffer incomplete: 0x{status:x}");
            }
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
        self.width = width;
        self.height = height;
    }

    /// Binds the framebuffer and sets the viewport for scene drawing.
    pub fn bind(&self, gl: &glow::Context) {
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            gl.viewport(0, 0, self.width, self.height);
        }
    }

    /// Draws the color attachment as a full-screen quad on the default
    /// framebuffer.
    pub fn present(&self, gl: &glow::Context, window_width: u32, window_height: u32) {
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.viewport(0, 0, window_width as i32, window_height as i32);
            gl.disable(glow::DEPTH_TEST);

            gl.use_program(Some(self.present_program));
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.color));
            if let Some(loc) = gl.get_uniform_location(self.present_program, "screen_texture") {
                gl.uniform_1_i32(Some(&loc), 0);
            }

            self.quad.bind(gl);
            gl.draw_elements(
                glow::TRIANGLES,
                QUAD_INDICES.len() as i32,
                glow::UNSIGNED_INT,
                0,
            );
            gl.bind_vertex_array(None);

            gl.enable(glow::DEPTH_TEST);
        }
    }

    pub fn delete(&mut self, gl: &glow::Context) {
        unsafe {
            gl.delete_framebuffer(self.fbo);
            gl.delete_texture(self.color);
            gl.delete_renderbuffer(self.depth);
            gl.delete_program(self.present_program);
        }
        self.quad.delete(gl);
    }
}
