mod cli;
mod framepace;
mod gpu;
mod render;

use std::sync::Arc;

use clap::Parser;
use framepace::Framepacer;
use glam::Vec2;
use gpu::GpuContext;
use log::{error, info};
use render::{FrameTarget, RenderModule};
use sphere_swarm::{
    generate_particles, FrameStatus, Icosphere, OrbitCamera, PhysicsStep, RenderLoop,
};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

/// Radians of orbit per pixel dragged.
const ORBIT_SPEED: f32 = 0.005;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // Collect Arguments
    let args = cli::Args::parse();
    let config = args.sim_config()?;

    // Generate before opening a window, a bad config never touches the GPU
    let state = generate_particles(&config)?;
    let render_loop = RenderLoop::new(state, config.min_radius, args.physics.build());

    // Setup Winit
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        tokio_rt: tokio::runtime::Runtime::new()?,
        subdivisions: args.subdivisions,
        time_scale: args.time_scale,
        framerate: args.framerate,

        render_loop,
        session: None,
        error: None,
    };

    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Everything that only exists while there's a window to draw into.
struct Session {
    window: Arc<Window>,
    gpu: GpuContext<'static>,
    render_module: RenderModule,

    camera: OrbitCamera,
    framepace: Framepacer,

    is_left_click_pressed: bool,
    mouse_position: Vec2,
}

struct App {
    tokio_rt: tokio::runtime::Runtime,
    subdivisions: u32,
    time_scale: f32,
    framerate: u32,

    render_loop: RenderLoop<Box<dyn PhysicsStep>>,
    session: Option<Session>,
    error: Option<anyhow::Error>,
}

impl App {
    fn create_session(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Session> {
        let window = Arc::new(
            event_loop.create_window(Window::default_attributes().with_title("sphere swarm"))?,
        );
        let window_size = window.inner_size();

        let gpu = self.tokio_rt.block_on(GpuContext::new(window.clone()))?;

        // instance scales are relative to this radius
        let mesh = Icosphere::new(self.render_loop.instances().base_radius(), self.subdivisions);
        info!(
            "Sphere mesh: {} vertices, {} triangles",
            mesh.vertices.len(),
            mesh.triangle_count()
        );

        let render_module = RenderModule::new(&gpu, &mesh, self.render_loop.state().len());

        let mut camera = OrbitCamera::default();
        camera.resize(window_size.width, window_size.height);

        Ok(Session {
            window,
            gpu,
            render_module,

            camera,
            framepace: Framepacer::new(),

            is_left_click_pressed: false,
            mouse_position: Vec2::ZERO,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: anyhow::Error) {
        error!("{e:#}");
        self.render_loop.stop();
        self.error = Some(e);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }

        match self.create_session(event_loop) {
            Ok(session) => {
                info!(
                    "Rendering {} spheres",
                    self.render_loop.instances().len()
                );
                self.session = Some(session);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(session) = &mut self.session else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                self.render_loop.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                session.gpu.resize(new_size.width, new_size.height);
                session
                    .render_module
                    .update_size(&session.gpu.device, new_size.width, new_size.height);
                session.camera.resize(new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => match (event.state, event.physical_key) {
                (ElementState::Pressed, PhysicalKey::Code(KeyCode::Space)) => {
                    self.render_loop.toggle_pause();
                    info!(
                        "{}",
                        if self.render_loop.is_paused() {
                            "Paused"
                        } else {
                            "Resumed"
                        }
                    );
                }
                (ElementState::Pressed, PhysicalKey::Code(KeyCode::KeyN)) => {
                    self.render_loop.request_step();
                }
                (ElementState::Pressed, PhysicalKey::Code(KeyCode::F11)) => {
                    if session.window.fullscreen().is_none() {
                        session
                            .window
                            .set_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
                    } else {
                        session.window.set_fullscreen(None);
                    }
                }
                _ => (),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * 0.1,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.002,
                };
                session.camera.zoom(delta);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                session.is_left_click_pressed = state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                if session.is_left_click_pressed {
                    let delta = position - session.mouse_position;
                    session
                        .camera
                        .orbit(-delta.x * ORBIT_SPEED, -delta.y * ORBIT_SPEED);
                }

                session.mouse_position = position;
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(session) = &mut self.session else {
            return;
        };

        let dt = session.framepace.begin_frame() * self.time_scale;
        session
            .render_module
            .update_camera(&session.gpu.queue, &session.camera);

        let mut target = FrameTarget {
            gpu: &session.gpu,
            render_module: &session.render_module,
        };
        match self.render_loop.step(&mut target, dt) {
            Ok(FrameStatus::Continue) => {}
            Ok(FrameStatus::Stopped) => {
                event_loop.exit();
                return;
            }
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("Frame submission failed"));
                return;
            }
        }

        if self.render_loop.frame() % 60 == 0 {
            session.window.set_title(&format!(
                "sphere swarm - {} spheres - {:.0} fps",
                self.render_loop.instances().len(),
                session.framepace.framerate()
            ));
        }

        let limit = if self.framerate > 0 {
            1.0 / self.framerate as f32
        } else {
            0.0
        };
        session.framepace.end_frame(limit);
    }
}
