use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use std::num::NonZeroU32;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use anyhow::{anyhow, Context as _};
use log::{error, info};

use objspin::{Config, Program};

struct App {
    config: Config,
    window: Option<Window>,
    gl_context: Option<glutin::context::PossiblyCurrentContext>,
    gl_surface: Option<glutin::surface::Surface<WindowSurface>>,
    program: Option<Program>,
    start_time: Option<Instant>,
}

impl App {
    fn new(config: Config) -> App {
        App {
            config,
            window: None,
            gl_context: None,
            gl_surface: None,
            program: None,
            start_time: None,
        }
    }

    fn init_gl(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = event_loop
            .create_window(attributes)
            .context("window creation failed")?;

        let (_, gl_config) = DisplayBuilder::new()
            .build(event_loop, ConfigTemplateBuilder::new(), |mut c| {
                c.next().expect("no usable GL config")
            })
            .map_err(|e| anyhow!("GL display setup failed: {e}"))?;

        let display = gl_config.display();
        let window_handle = window.window_handle().context("no native window handle")?;

        let ctx_attrs = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(window_handle.as_raw()));
        let not_current = unsafe {
            display
                .create_context(&gl_config, &ctx_attrs)
                .context("GL context creation failed")?
        };

        let size = window.inner_size();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            window_handle.as_raw(),
            NonZeroU32::new(size.width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(size.height).unwrap_or(NonZeroU32::MIN),
        );
        let surface = unsafe {
            display
                .create_window_surface(&gl_config, &attrs)
                .context("GL surface creation failed")?
        };
        let ctx = not_current
            .make_current(&surface)
            .context("could not make GL context current")?;

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                display.get_proc_address(&std::ffi::CString::new(s).unwrap()) as *const _
            })
        };

        let program =
            Program::new(gl, self.config.clone()).context("graphics program setup failed")?;

        window.request_redraw();

        self.start_time = Some(Instant::now());
        self.window = Some(window);
        self.gl_context = Some(ctx);
        self.gl_surface = Some(surface);
        self.program = Some(program);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init_gl(event_loop) {
            error!("startup failed: {err:#}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let (Some(surface), Some(ctx)) = (&self.gl_surface, &self.gl_context) {
                    if let (Some(w), Some(h)) =
                        (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                    {
                        surface.resize(ctx, w, h);
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                if let (Some(surface), Some(ctx), Some(prog), Some(window)) = (
                    &self.gl_surface,
                    &self.gl_context,
                    &mut self.program,
                    &self.window,
                ) {
                    let elapsed = self
                        .start_time
                        .map(|s| s.elapsed().as_secs_f32())
                        .unwrap_or(0.0);

                    let size = window.inner_size();
                    if let Err(err) = prog.render(size.width, size.height, elapsed) {
                        error!("render failed: {err}");
                    }
                    if let Err(err) = surface.swap_buffers(ctx) {
                        error!("swap failed: {err}");
                    }
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(p) = &mut self.program {
            p.cleanup();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            eprintln!(
                "usage: objspin [--mesh FILE] [--width N] [--height N] [--fov DEGREES] [--seed N]"
            );
            std::process::exit(2);
        }
    };

    info!(
        "starting {} at {}x{}",
        config.title, config.width, config.height
    );

    let event_loop = EventLoop::new().context("event loop creation failed")?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app).context("event loop failed")?;
    Ok(())
}
