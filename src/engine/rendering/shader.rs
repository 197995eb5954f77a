use std::fs;
use std::path::Path;

use glow::HasContext;
use log::error;
use thiserror::Error;

/// Raised only when the driver refuses to allocate a shader or program
/// object. Compile and link failures are logged diagnostics, not errors;
/// execution continues with the possibly unusable object.
#[derive(Debug, Error)]
#[error("GL allocation failed: {0}")]
pub struct ShaderError(pub String);

/// Reads GLSL source from disk. A missing or unreadable file is logged and
/// yields an empty string.
pub fn read_shader_source(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            error!("could not open shader file {}: {err}", path.display());
            String::new()
        }
    }
}

/// Compiles one shader stage. A failed compile status logs the driver's
/// info log under `label` and still returns the shader object.
pub fn compile_shader(
    gl: &glow::Context,
    kind: u32,
    source: &str,
    label: &str,
) -> Result<glow::Shader, ShaderError> {
    unsafe {
        let shader = gl.create_shader(kind).map_err(ShaderError)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            error!(
                "{label}: shader compile failed: {}",
                gl.get_shader_info_log(shader)
            );
        }
        Ok(shader)
    }
}

/// Links two stages into a program and deletes the stage objects. A failed
/// link status is logged under `label`; the program object is returned
/// regardless.
pub fn link_program(
    gl: &glow::Context,
    vs: glow::Shader,
    fs: glow::Shader,
    label: &str,
) -> Result<glow::Program, ShaderError> {
    unsafe {
        let program = gl.create_program().map_err(ShaderError)?;
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            error!(
                "{label}: program link failed: {}",
                gl.get_program_info_log(program)
            );
        }
        gl.delete_shader(vs);
        gl.delete_shader(fs);
        Ok(program)
    }
}

/// Loads, compiles and links the two-file vertex/fragment pipeline.
pub fn build_program(
    gl: &glow::Context,
    vert_path: impl AsRef<Path>,
    frag_path: impl AsRef<Path>,
) -> Result<glow::Program, ShaderError> {
    let vert_path = vert_path.as_ref();
    let frag_path = frag_path.as_ref();
    let vert_src = read_shader_source(vert_path);
    let frag_src = read_shader_source(frag_path);
    let vs = compile_shader(
        gl,
        glow::VERTEX_SHADER,
        &vert_src,
        &vert_path.display().to_string(),
    )?;
    let fs = compile_shader(
        gl,
        glow::FRAGMENT_SHADER,
        &frag_src,
        &frag_path.display().to_string(),
    )?;
    let label = format!("{} + {}", vert_path.display(), frag_path.display());
    link_program(gl, vs, fs, &label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_shader_file_yields_empty_source() {
        assert_eq!(read_shader_source("does/not/exist.glsl"), "");
    }

    #[test]
    fn bundled_shaders_are_readable() {
        let src = read_shader_source("shaders/vertex.glsl");
        assert!(src.contains("gl_Position"));
    }
}
