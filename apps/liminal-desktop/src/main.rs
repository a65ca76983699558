use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use liminal_common::Color;
use liminal_render::RenderView;
use liminal_render_wgpu::{Projection, WgpuRenderer};
use liminal_scene::{SceneInfo, SceneRegistry};
use liminal_shell::{Backdrop, Cue, CuePlayer, KEY_SCROLL_STEP, MenuModel};
use liminal_stream::{FrameClock, StreamStats, Streamer};
use liminal_tools::RuntimeConfig;
use liminal_view::{MoveKey, ResetTarget, ViewInput, ViewpointController};

/// Seconds the scene name/description stay on screen after a switch.
const FLASH_SECONDS: f32 = 3.0;

const MENU_WIDTH: f32 = 420.0;
const MENU_ROW_HEIGHT: f32 = 64.0;
const MENU_VIEWPORT: f32 = 200.0;

#[derive(Parser)]
#[command(name = "liminal-desktop", about = "Liminal space walker")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Runtime tuning file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppMode {
    Menu,
    Walk,
}

/// Application state.
struct AppState {
    registry: SceneRegistry,
    streamer: Streamer,
    controller: ViewpointController,
    menu: MenuModel,
    backdrop: Backdrop,
    cues: CuePlayer,
    projection: Projection,
    clock: FrameClock,
    stats: StreamStats,
    mode: AppMode,
    show_hud: bool,
    mouse_captured: bool,
    flash: Option<(SceneInfo, f32)>,
    cursor: Vec2,
    last_frame: Instant,
    rng: rand::rngs::ThreadRng,
}

impl AppState {
    fn new(config: RuntimeConfig) -> Self {
        let mut rng = rand::rng();
        let registry = SceneRegistry::new(&mut rng);
        let menu = MenuModel::new(registry.infos());

        Self {
            streamer: Streamer::new(config.stream),
            controller: ViewpointController::new(config.movement),
            backdrop: Backdrop::new(config.backdrop),
            cues: CuePlayer::new(config.audio_enabled),
            projection: Projection::default(),
            clock: FrameClock::new(0.1),
            stats: StreamStats::default(),
            mode: AppMode::Menu,
            show_hud: true,
            mouse_captured: false,
            flash: None,
            cursor: Vec2::ZERO,
            last_frame: Instant::now(),
            registry,
            menu,
            rng,
        }
    }

    fn update(&mut self, dt: f32) {
        self.clock.record(Duration::from_secs_f32(dt));

        match self.mode {
            AppMode::Menu => self.backdrop.tick(dt),
            AppMode::Walk => {
                self.controller.tick();
                // Streaming waits for the glide to finish; one update at the
                // entry pose fills the neighborhood.
                if !self.controller.is_resetting() {
                    self.stats = self.streamer.update(
                        self.registry.active_mut(),
                        self.controller.viewpoint().position,
                        &mut self.rng,
                    );
                }
            }
        }
        self.registry.active_mut().advance_ambience(dt, &mut self.rng);

        if let Some((_, remaining)) = &mut self.flash {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.flash = None;
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        match self.mode {
            AppMode::Walk => {
                let movement = match key {
                    KeyCode::KeyW | KeyCode::ArrowUp => Some(MoveKey::Forward),
                    KeyCode::KeyS | KeyCode::ArrowDown => Some(MoveKey::Backward),
                    KeyCode::KeyA | KeyCode::ArrowLeft => Some(MoveKey::Left),
                    KeyCode::KeyD | KeyCode::ArrowRight => Some(MoveKey::Right),
                    _ => None,
                };
                if let Some(movement) = movement {
                    self.controller.handle(ViewInput::Key {
                        key: movement,
                        pressed,
                    });
                    return;
                }
                if !pressed {
                    return;
                }
                match key {
                    KeyCode::Escape => self.open_menu(),
                    KeyCode::F1 => self.show_hud = !self.show_hud,
                    _ => {}
                }
            }
            AppMode::Menu => {
                if !pressed {
                    return;
                }
                match key {
                    KeyCode::ArrowUp => self.menu.scroll.scroll_by(-KEY_SCROLL_STEP),
                    KeyCode::ArrowDown => self.menu.scroll.scroll_by(KEY_SCROLL_STEP),
                    KeyCode::Escape if self.menu.selected().is_some() => {
                        self.mode = AppMode::Walk;
                    }
                    _ => {}
                }
            }
        }
    }

    fn open_menu(&mut self) {
        self.mode = AppMode::Menu;
        self.mouse_captured = false;
        self.controller.clear_input();
        self.cues.play(Cue::Click);
    }

    fn select_scene(&mut self, index: usize) {
        self.cues.play(Cue::Click);
        if self.menu.select(index).is_none() {
            return;
        }
        match self.registry.switch_to(index) {
            Ok(Some(info)) => {
                self.controller.begin_reset(ResetTarget::default());
                self.cues.play(Cue::Switch);
                self.flash = Some((info, FLASH_SECONDS));
            }
            // Re-entering the active scene resumes in place, no glide.
            Ok(None) => {}
            Err(err) => {
                tracing::error!(%err, "scene switch rejected");
                return;
            }
        }
        self.mode = AppMode::Walk;
        self.controller.clear_input();
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        match self.mode {
            AppMode::Menu => {
                self.draw_backdrop(ctx);
                self.draw_menu(ctx);
            }
            AppMode::Walk => {
                if self.show_hud {
                    self.draw_hud(ctx);
                }
                self.draw_flash(ctx);
            }
        }
    }

    fn draw_backdrop(&self, ctx: &EguiContext) {
        let painter = ctx.layer_painter(egui::LayerId::background());
        let half_cell = self.backdrop.config().cell_size_px * 0.4;

        for row in 0..self.backdrop.rows() {
            for col in 0..self.backdrop.cols() {
                let center = self.backdrop.cell_center(col, row);
                let deform = self.backdrop.deform_at(center);
                if deform.alpha <= 0.0 {
                    continue;
                }

                let rgb = Color::hsl(self.backdrop.hue(col, row), 0.7, 0.6).to_array();
                let fill = egui::Color32::from_rgba_unmultiplied(
                    (rgb[0] * 255.0) as u8,
                    (rgb[1] * 255.0) as u8,
                    (rgb[2] * 255.0) as u8,
                    (deform.alpha * 255.0) as u8,
                );

                let center = center + deform.offset;
                let half = half_cell * deform.scale;
                let (sin, cos) = deform.rotation_deg.to_radians().sin_cos();
                let corners = [(-half, -half), (half, -half), (half, half), (-half, half)]
                    .map(|(x, y)| {
                        egui::pos2(center.x + x * cos - y * sin, center.y + x * sin + y * cos)
                    });
                painter.add(egui::Shape::convex_polygon(
                    corners.to_vec(),
                    fill,
                    egui::Stroke::NONE,
                ));
            }
        }

        for trail in self.backdrop.trails() {
            let fade = trail.fade();
            if fade <= 0.0 {
                continue;
            }
            let center = egui::pos2(trail.position.x, trail.position.y);
            let radius = trail.size * 0.5 * fade;
            let outer = trail.outer.to_array();
            let inner = trail.inner.to_array();
            painter.circle_filled(
                center,
                radius,
                egui::Color32::from_rgba_unmultiplied(
                    (outer[0] * 255.0) as u8,
                    (outer[1] * 255.0) as u8,
                    (outer[2] * 255.0) as u8,
                    (fade * 160.0) as u8,
                ),
            );
            painter.circle_filled(
                center,
                radius * 0.55,
                egui::Color32::from_rgba_unmultiplied(
                    (inner[0] * 255.0) as u8,
                    (inner[1] * 255.0) as u8,
                    (inner[2] * 255.0) as u8,
                    (fade * 220.0) as u8,
                ),
            );
        }
    }

    fn draw_menu(&mut self, ctx: &EguiContext) {
        let mut clicked = None;

        egui::Window::new("Liminal Spaces")
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.label("Pick a space to drift through.");
                ui.separator();

                let (viewport_rect, _) = ui.allocate_exact_size(
                    egui::vec2(MENU_WIDTH, MENU_VIEWPORT),
                    egui::Sense::hover(),
                );
                let painter = ui.painter_at(viewport_rect);

                let wheel = ui.input(|i| i.raw_scroll_delta.y);
                if wheel != 0.0 {
                    // egui scroll deltas grow upward; the offset grows downward.
                    self.menu.scroll.scroll_by(-wheel);
                }
                self.menu
                    .scroll
                    .set_extents(MENU_VIEWPORT, self.menu.len() as f32 * MENU_ROW_HEIGHT);

                let offset = self.menu.scroll.offset();
                for entry in self.menu.entries() {
                    let top = viewport_rect.top() + entry.index as f32 * MENU_ROW_HEIGHT - offset;
                    let row = egui::Rect::from_min_size(
                        egui::pos2(viewport_rect.left(), top),
                        egui::vec2(MENU_WIDTH - 14.0, MENU_ROW_HEIGHT - 6.0),
                    );
                    if !row.intersects(viewport_rect) {
                        continue;
                    }

                    let response = ui.interact(
                        row.intersect(viewport_rect),
                        ui.id().with(entry.index),
                        egui::Sense::click(),
                    );
                    if response.clicked() {
                        clicked = Some(entry.index);
                    }

                    let active = self.menu.selected() == Some(entry.index);
                    let fill = if response.hovered() {
                        egui::Color32::from_rgba_unmultiplied(255, 255, 255, 28)
                    } else if active {
                        egui::Color32::from_rgba_unmultiplied(255, 255, 255, 14)
                    } else {
                        egui::Color32::from_rgba_unmultiplied(0, 0, 0, 60)
                    };
                    painter.rect_filled(row, egui::CornerRadius::same(4), fill);
                    painter.text(
                        row.left_top() + egui::vec2(12.0, 10.0),
                        egui::Align2::LEFT_TOP,
                        &entry.name,
                        egui::FontId::proportional(18.0),
                        egui::Color32::WHITE,
                    );
                    painter.text(
                        row.left_top() + egui::vec2(12.0, 34.0),
                        egui::Align2::LEFT_TOP,
                        &entry.description,
                        egui::FontId::proportional(12.0),
                        egui::Color32::GRAY,
                    );
                }

                if let Some(indicator) = self.menu.scroll.indicator() {
                    let track = egui::Rect::from_min_size(
                        egui::pos2(viewport_rect.right() - 6.0, viewport_rect.top()),
                        egui::vec2(4.0, MENU_VIEWPORT),
                    );
                    painter.rect_filled(
                        track,
                        egui::CornerRadius::same(2),
                        egui::Color32::from_rgba_unmultiplied(255, 255, 255, 20),
                    );
                    let bar = egui::Rect::from_min_size(
                        egui::pos2(
                            track.left(),
                            viewport_rect.top() + indicator.position_fraction * MENU_VIEWPORT,
                        ),
                        egui::vec2(4.0, indicator.bar_fraction * MENU_VIEWPORT),
                    );
                    painter.rect_filled(bar, egui::CornerRadius::same(2), egui::Color32::from_gray(200));
                }

                ui.separator();
                ui.small("Click a space to enter | Wheel or arrows scroll | ESC resumes");
            });

        if let Some(index) = clicked {
            self.select_scene(index);
        }
    }

    fn draw_hud(&mut self, ctx: &EguiContext) {
        let info = self.registry.active().info(self.registry.active_index());
        let position = self.controller.viewpoint().position;

        egui::Window::new("hud")
            .title_bar(false)
            .resizable(false)
            .anchor(egui::Align2::LEFT_TOP, [12.0, 12.0])
            .show(ctx, |ui| {
                ui.heading(&info.name);
                ui.label(format!(
                    "Position: ({:.1}, {:.1}, {:.1})",
                    position.x, position.y, position.z
                ));
                ui.label(format!("Frame: {:.1} fps", self.clock.fps()));
                ui.label(format!(
                    "Cells: {} loaded, +{} / -{} this frame",
                    self.stats.loaded_cells, self.stats.cells_generated, self.stats.cells_evicted
                ));
                if self.controller.is_resetting() {
                    ui.label("Gliding to entry...");
                }
                ui.separator();
                ui.small("ESC: menu | F1: HUD | RMB drag: look | WASD: move");
            });
    }

    fn draw_flash(&self, ctx: &EguiContext) {
        let Some((info, remaining)) = &self.flash else {
            return;
        };
        let strength = ((remaining / FLASH_SECONDS).clamp(0.0, 1.0) * 255.0) as u8;

        egui::Area::new(egui::Id::new("scene_flash"))
            .anchor(egui::Align2::CENTER_TOP, [0.0, 90.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&info.name)
                            .size(30.0)
                            .color(egui::Color32::from_white_alpha(strength)),
                    );
                    ui.label(
                        egui::RichText::new(&info.description)
                            .size(14.0)
                            .color(egui::Color32::from_white_alpha(strength / 2)),
                    );
                });
            });
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(config: RuntimeConfig) -> Self {
        Self {
            state: AppState::new(config),
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Liminal Walker")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("liminal_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state.projection.resize(size.width, size.height);
        self.state
            .backdrop
            .resize(size.width as f32, size.height as f32, &mut self.state.rng);

        let renderer = WgpuRenderer::new(
            &device,
            surface_format,
            size.width,
            size.height,
            self.state.streamer.config().cell_size,
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // The backdrop reacts to the cursor everywhere, including over the
        // menu window, so track it before egui filters the event.
        if let WindowEvent::CursorMoved { position, .. } = &event {
            let cursor = Vec2::new(position.x as f32, position.y as f32);
            self.state.cursor = cursor;
            if self.state.mode == AppMode::Menu {
                self.state.backdrop.move_cursor(cursor, &mut self.state.rng);
            }
        }

        if let Some(egui_winit) = &mut self.egui_winit {
            let response = egui_winit.on_window_event(self.window.as_ref().unwrap(), &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    self.state.projection.resize(config.width, config.height);
                    self.state.backdrop.resize(
                        config.width as f32,
                        config.height as f32,
                        &mut self.state.rng,
                    );
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
                if let Some(window) = &self.window {
                    window.set_cursor_visible(!self.state.mouse_captured);
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                if self.state.mode == AppMode::Walk {
                    self.state.mouse_captured = btn_state == ElementState::Pressed;
                    if let Some(window) = &self.window {
                        window.set_cursor_visible(!self.state.mouse_captured);
                    }
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                if self.state.mode == AppMode::Menu {
                    let cursor = self.state.cursor;
                    self.state.backdrop.click(cursor, &mut self.state.rng);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
                self.state.last_frame = now;
                self.state.update(dt);

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e}");
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                if let Some(renderer) = &self.renderer {
                    let viewpoint = self.state.controller.viewpoint();
                    let render_view = RenderView {
                        eye: viewpoint.position,
                        target: viewpoint.look_target,
                        ..RenderView::default()
                    };
                    renderer.render(
                        device,
                        queue,
                        &view,
                        &self.state.projection,
                        &render_view,
                        self.state.registry.active().graph(),
                    );
                }

                let raw_input = self
                    .egui_winit
                    .as_mut()
                    .unwrap()
                    .take_egui_input(self.window.as_ref().unwrap());
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    self.state.draw_ui(ctx);
                });

                self.egui_winit.as_mut().unwrap().handle_platform_output(
                    self.window.as_ref().unwrap(),
                    full_output.platform_output,
                );

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [
                        self.config.as_ref().unwrap().width,
                        self.config.as_ref().unwrap().height,
                    ],
                    pixels_per_point: full_output.pixels_per_point,
                };

                {
                    let egui_renderer = self.egui_renderer.as_mut().unwrap();
                    for (id, image_delta) in &full_output.textures_delta.set {
                        egui_renderer.update_texture(device, queue, *id, image_delta);
                    }
                    let mut encoder =
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("egui_encoder"),
                        });
                    egui_renderer.update_buffers(
                        device,
                        queue,
                        &mut encoder,
                        &paint_jobs,
                        &screen_descriptor,
                    );
                    {
                        let mut pass = encoder
                            .begin_render_pass(&wgpu::RenderPassDescriptor {
                                label: Some("egui_pass"),
                                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                    view: &view,
                                    resolve_target: None,
                                    ops: wgpu::Operations {
                                        load: wgpu::LoadOp::Load,
                                        store: wgpu::StoreOp::Store,
                                    },
                                })],
                                depth_stencil_attachment: None,
                                ..Default::default()
                            })
                            .forget_lifetime();
                        egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
                    }
                    queue.submit(std::iter::once(encoder.finish()));
                    for id in &full_output.textures_delta.free {
                        egui_renderer.free_texture(id);
                    }
                }

                output.present();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.mouse_captured && self.state.mode == AppMode::Walk {
                // Raw deltas grow rightward and downward; the controller
                // takes left/up positive.
                self.state.controller.handle(ViewInput::Look {
                    dx: -(delta.0 as f32),
                    dy: -(delta.1 as f32),
                });
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = RuntimeConfig::load_or_default(cli.config.as_deref())?;
    tracing::info!("liminal-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
