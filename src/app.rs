//! Window, event loop, and the per-frame input → state → draw cycle.

use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::camera::Camera;
use crate::controls::ControlState;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::mesh::Mesh;
use crate::scene;
use crate::scene_pass::ScenePass;

/// Configuration for the sketch window.
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Quadbook".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Runs the sketch until the window closes or ESC is pressed.
///
/// Startup failures (event loop, window, surface, adapter, device) are
/// logged and returned; per-frame operations cannot fail.
pub fn run(config: AppConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).context("event loop error")?;

    match app.fatal_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    config: AppConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    scene_pass: Option<ScenePass>,
    mesh: Option<Mesh>,
    input: Input,
    state: ControlState,
    /// Set when startup or rendering fails; reported by [`run`] after the
    /// loop exits.
    fatal_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            window: None,
            gpu: None,
            scene_pass: None,
            mesh: None,
            input: Input::new(),
            state: ControlState::new(),
            fatal_error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = WindowAttributes::default()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width,
                self.config.height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("failed to create window")?,
        );

        let gpu = GpuContext::new(window.clone())?;
        let scene_pass = ScenePass::new(&gpu);
        let mesh = Mesh::quad(&gpu);

        window.request_redraw();

        self.gpu = Some(gpu);
        self.scene_pass = Some(scene_pass);
        self.mesh = Some(mesh);
        self.window = Some(window);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal_error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu), Some(scene_pass), Some(mesh)) = (
            self.window.as_ref(),
            self.gpu.as_ref(),
            self.scene_pass.as_mut(),
            self.mesh.as_ref(),
        ) else {
            return;
        };

        self.state.step(&self.input);
        log::trace!(
            "rote({}, {}, {}) set({}, {}, {}) cam({}, {}, {})",
            self.state.rotation_x,
            self.state.rotation_y,
            self.state.rotation_z,
            self.state.offset_x,
            self.state.offset_y,
            self.state.offset_z,
            self.state.camera_x,
            self.state.camera_y,
            self.state.camera_z,
        );

        let camera = Camera::from_angles(
            self.state.camera_x,
            self.state.camera_y,
            self.state.camera_z,
        );
        let instances = scene::instances(&self.state);

        scene_pass.ensure_depth_size(gpu);
        if let Err(err) = scene_pass.prepare(gpu, &camera, &instances) {
            log::error!("{err:#}");
            self.fatal_error = Some(err);
            event_loop.exit();
            return;
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                gpu.reconfigure();
                window.request_redraw();
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                window.request_redraw();
                return;
            }
            Err(err) => {
                let err = anyhow::Error::from(err).context("failed to acquire frame");
                log::error!("{err:#}");
                self.fatal_error = Some(err);
                event_loop.exit();
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &scene_pass.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            scene_pass.render(
                &mut render_pass,
                mesh,
                instances.len(),
                self.state.wireframe,
                self.state.depth_test,
            );
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.input.begin_frame();
        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                if self.input.key_down(KeyCode::Escape) {
                    event_loop.exit();
                    return;
                }
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}
