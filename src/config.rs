use std::path::PathBuf;

/// Run configuration. Defaults describe the bundled demo scene; every
/// field can be overridden from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub mesh_path: PathBuf,
    pub vertex_shader_path: PathBuf,
    pub fragment_shader_path: PathBuf,
    pub fov_degrees: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    /// Fixed RNG seed for the initial rotation phase. None draws from
    /// OS entropy.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: String::from("objspin"),
            width: 1280,
            height: 720,
            mesh_path: PathBuf::from("assets/meshes/cube.obj"),
            vertex_shader_path: PathBuf::from("shaders/vertex.glsl"),
            fragment_shader_path: PathBuf::from("shaders/fragment.glsl"),
            fov_degrees: 90.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            seed: None,
        }
    }
}

impl Config {
    /// Parses command-line flags over the defaults.
    pub fn from_args(args: impl Iterator<Item = String>) -> Result<Config, String> {
        let mut config = Config::default();
        let mut it = args;

        while let Some(arg) = it.next() {
            match arg.as_str() {
                "--mesh" => {
                    let value = it
                        .next()
                        .ok_or_else(|| String::from("missing value for --mesh"))?;
                    config.mesh_path = PathBuf::from(value);
                }
                "--width" => {
                    let value = it
                        .next()
                        .ok_or_else(|| String::from("missing value for --width"))?;
                    config.width = value
                        .parse::<u32>()
                        .map_err(|_| String::from("invalid --width value"))?;
                    if config.width == 0 {
                        return Err(String::from("--width must be > 0"));
                    }
                }
                "--height" => {
                    let value = it
                        .next()
                        .ok_or_else(|| String::from("missing value for --height"))?;
                    config.height = value
                        .parse::<u32>()
                        .map_err(|_| String::from("invalid --height value"))?;
                    if config.height == 0 {
                        return Err(String::from("--height must be > 0"));
                    }
                }
                "--fov" => {
                    let value = it
                        .next()
                        .ok_or_else(|| String::from("missing value for --fov"))?;
                    config.fov_degrees = value
                        .parse::<f32>()
                        .map_err(|_| String::from("invalid --fov value"))?;
                    if !(1.0..180.0).contains(&config.fov_degrees) {
                        return Err(String::from("--fov must be in range [1, 180)"));
                    }
                }
                "--seed" => {
                    let value = it
                        .next()
                        .ok_or_else(|| String::from("missing value for --seed"))?;
                    let seed = value
                        .parse::<u64>()
                        .map_err(|_| String::from("invalid --seed value"))?;
                    config.seed = Some(seed);
                }
                other => {
                    return Err(format!("unknown argument: {other}"));
                }
            }
        }

        Ok(config)
    }
}
