//! spin360 preview application
//!
//! Hosts one spin viewer in an eframe window, plus its full-screen view
//! when one is open.

mod init;
mod input;

pub use init::AppError;

use std::time::Instant;

use eframe::egui;
use hashbrown::HashMap;

use spin360_core::{
    Affordance, Badge, Events, HostEnv, InputEvent, Layout, Magnifier, Viewer, ViewerConfig,
    ViewerRegistry,
};
use spin360_shared::{FrameId, Placement, Size, ViewerId, contain};

use crate::adapter::EguiAdapter;
use crate::loader::{self, FrameLoader};
use input::Gesture;

const WINDOW_SIZE: [f32; 2] = [960.0, 540.0];
const CONTROL_SIZE: f32 = 36.0;
const CONTROL_GAP: f32 = 8.0;
const PROGRESS_HEIGHT: f32 = 4.0;
const LENS_SIZE: f32 = 180.0;
const BADGE_RADIUS: f32 = 36.0;
/// Shadow depth when the configured shadow names no pixel length
const SHADOW_DEPTH: f32 = 24.0;
const SHADOW_LAYERS: usize = 12;

fn log_events(id: ViewerId, events: &Events) {
    for event in events {
        tracing::debug!("{}: {:?}", id, event);
    }
}

fn to_size(v: egui::Vec2) -> Size {
    Size::new(v.x as f64, v.y as f64)
}

/// Depth in points of a CSS `box-shadow`: its largest pixel length.
fn shadow_depth(css: &str) -> f32 {
    css.split_whitespace()
        .filter_map(|token| token.strip_suffix("px")?.parse::<f32>().ok())
        .filter(|length| length.is_finite())
        .map(f32::abs)
        .reduce(f32::max)
        .unwrap_or(SHADOW_DEPTH)
}

/// Darken the edges of `rect`, fading towards its center.
fn paint_inset_shadow(painter: &egui::Painter, rect: egui::Rect, depth: f32) {
    let depth = depth.min(rect.width().min(rect.height()) / 2.0);
    if depth <= 0.0 {
        return;
    }
    let band = depth / SHADOW_LAYERS as f32;
    for layer in 0..SHADOW_LAYERS {
        let alpha = 90 * (SHADOW_LAYERS - layer) / SHADOW_LAYERS;
        painter.rect_stroke(
            rect.shrink(band * (layer as f32 + 0.5)),
            0.0,
            egui::Stroke::new(band, egui::Color32::from_black_alpha(alpha as u8)),
            egui::StrokeKind::Middle,
        );
    }
}

/// Upload the configured badge logo. Falls back to the built-in mark.
fn load_logo(ctx: &egui::Context, source: &str) -> Option<egui::TextureHandle> {
    match loader::decode(source) {
        Ok(decoded) => {
            let image =
                egui::ColorImage::from_rgba_unmultiplied([decoded.width, decoded.height], &decoded.rgba);
            Some(ctx.load_texture("badge-logo", image, egui::TextureOptions::LINEAR))
        }
        Err(e) => {
            tracing::warn!("Badge logo: {}", e);
            None
        }
    }
}

/// Screen rectangle of a frame with `image` pixels inside `rect`.
fn frame_rect(rect: egui::Rect, layout: &Layout, image: egui::Vec2) -> egui::Rect {
    let canvas = layout.canvas(to_size(image));
    let placement = if layout.full_screen {
        // Device pixels of the viewport back to points
        let ratio = layout.device_ratio();
        Placement {
            offset_x: canvas.placement.offset_x / ratio,
            offset_y: canvas.placement.offset_y / ratio,
            width: canvas.placement.width / ratio,
            height: canvas.placement.height / ratio,
        }
    } else {
        contain(to_size(rect.size()), canvas.css)
    };
    egui::Rect::from_min_size(
        rect.min + egui::vec2(placement.offset_x as f32, placement.offset_y as f32),
        egui::vec2(placement.width as f32, placement.height as f32),
    )
}

pub struct App {
    registry: ViewerRegistry<EguiAdapter>,
    base: ViewerId,
    full_screen: Option<ViewerId>,
    textures: HashMap<(ViewerId, FrameId), egui::TextureHandle>,
    loader: FrameLoader,
    /// Container size last reported to each viewer
    containers: HashMap<ViewerId, egui::Vec2>,
    lens: Option<(ViewerId, Magnifier)>,
    /// Prev/next control currently held down
    held: Option<(ViewerId, Affordance)>,
    /// Last ticker poll while something spins
    last_tick: Option<Instant>,
    failed_frames: usize,
    /// Configured badge logo, decoded once
    logo: Option<egui::TextureHandle>,
}

impl App {
    fn new(cc: &eframe::CreationContext<'_>, viewer: Viewer) -> Self {
        let logo = viewer
            .config()
            .logo_src
            .as_deref()
            .and_then(|source| load_logo(&cc.egui_ctx, source));
        let mut app = Self {
            registry: ViewerRegistry::new(),
            base: ViewerId(0),
            full_screen: None,
            textures: HashMap::new(),
            loader: FrameLoader::new().with_repaint(cc.egui_ctx.clone()),
            containers: HashMap::new(),
            lens: None,
            held: None,
            last_tick: None,
            failed_frames: 0,
            logo,
        };
        app.base = app.registry.register(viewer, EguiAdapter::default());
        app.start(app.base);
        app
    }

    /// Start loading a freshly registered viewer.
    fn start(&mut self, id: ViewerId) {
        let started = self.registry.with(id, |viewer, adapter| {
            let events = viewer.start(adapter);
            (events, viewer.take_requests())
        });
        if let Some((events, requests)) = started {
            log_events(id, &events);
            self.loader.request(id, requests);
        }
    }

    fn dispatch(&mut self, id: ViewerId, event: InputEvent) {
        if let Some(events) = self.registry.dispatch(id, event) {
            log_events(id, &events);
        }
    }

    fn receive_frames(&mut self, ctx: &egui::Context) {
        for loaded in self.loader.poll() {
            // The viewer may have been closed while its frames decoded
            if !self.registry.contains(loaded.viewer) {
                continue;
            }

            let outcome = loaded.outcome();
            match &loaded.result {
                Ok(decoded) => {
                    let image = egui::ColorImage::from_rgba_unmultiplied(
                        [decoded.width, decoded.height],
                        &decoded.rgba,
                    );
                    let texture = ctx.load_texture(
                        format!("{}-{}", loaded.viewer, loaded.frame),
                        image,
                        egui::TextureOptions::LINEAR,
                    );
                    self.textures.insert((loaded.viewer, loaded.frame), texture);
                }
                Err(_) => self.failed_frames += 1,
            }

            let next = self.registry.with(loaded.viewer, |viewer, adapter| {
                let events = viewer.frame_loaded(loaded.frame, outcome, adapter);
                (events, viewer.take_requests())
            });
            if let Some((events, requests)) = next {
                log_events(loaded.viewer, &events);
                self.loader.request(loaded.viewer, requests);
            }
        }
    }

    fn visible_viewers(&self) -> Vec<ViewerId> {
        [Some(self.base), self.full_screen].into_iter().flatten().collect()
    }

    /// Feed wall-clock time to spinning viewers.
    fn advance_spins(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let elapsed = self
            .last_tick
            .map(|last| now.duration_since(last))
            .unwrap_or_default();

        let mut spinning = false;
        for id in self.visible_viewers() {
            let result = self.registry.with(id, |viewer, adapter| {
                let events = viewer.advance_time(elapsed, adapter);
                (events, viewer.ticker().is_active())
            });
            if let Some((events, active)) = result {
                log_events(id, &events);
                spinning |= active;
            }
        }

        if spinning {
            self.last_tick = Some(now);
            ctx.request_repaint();
        } else {
            self.last_tick = None;
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let keys: Vec<(egui::Key, bool)> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key { key, pressed, .. } => Some((*key, *pressed)),
                    _ => None,
                })
                .collect()
        });

        for (key, pressed) in keys {
            if key == egui::Key::Escape
                && pressed
                && let Some(id) = self.full_screen
            {
                self.close_full_screen(ctx, id);
                continue;
            }
            let Some(key) = input::map_key(key) else {
                continue;
            };
            if let Some((id, events)) = self.registry.dispatch_key(key, pressed) {
                log_events(id, &events);
            }
        }
    }

    fn open_full_screen(&mut self, ctx: &egui::Context, id: ViewerId, fallback: egui::Vec2) {
        let viewport = ctx
            .input(|i| i.viewport().monitor_size)
            .unwrap_or(fallback);
        let first_image = self
            .textures
            .get(&(id, FrameId::FIRST))
            .map(|texture| to_size(texture.size_vec2()));

        let Some((clone, events)) =
            self.registry
                .open_full_screen(id, to_size(viewport), first_image, EguiAdapter::default())
        else {
            return;
        };
        log_events(clone, &events);
        self.full_screen = Some(clone);
        self.start(clone);
        ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(true));
    }

    fn close_full_screen(&mut self, ctx: &egui::Context, id: ViewerId) {
        if let Some(events) = self.registry.close_full_screen(id) {
            log_events(id, &events);
        }
        self.textures.retain(|(viewer, _), _| *viewer != id);
        self.containers.remove(&id);
        if self.lens.as_ref().is_some_and(|(viewer, _)| *viewer == id) {
            self.lens = None;
        }
        if self.held.is_some_and(|(viewer, _)| viewer == id) {
            self.held = None;
        }
        self.full_screen = None;
        ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(false));
    }

    /// Track press and release of a hold-to-spin control.
    fn update_hold(&mut self, id: ViewerId, affordance: Affordance, down: bool) {
        match self.held {
            None if down => {
                if let Some(events) =
                    self.registry.with(id, |viewer, adapter| viewer.press_affordance(affordance, adapter))
                {
                    log_events(id, &events);
                }
                self.held = Some((id, affordance));
            }
            Some(held) if !down && held == (id, affordance) => {
                if let Some(events) =
                    self.registry.with(id, |viewer, adapter| viewer.release_affordance(adapter))
                {
                    log_events(id, &events);
                }
                self.held = None;
            }
            _ => {}
        }
    }

    fn toggle_autoplay(&mut self, id: ViewerId) {
        let events = self.registry.with(id, |viewer, adapter| {
            if viewer.is_autoplaying() {
                viewer.stop(adapter)
            } else {
                viewer.play(adapter)
            }
        });
        if let Some(events) = events {
            log_events(id, &events);
        }
    }

    fn toggle_magnifier(&mut self, id: ViewerId) {
        if self.lens.is_some() {
            self.registry
                .with(id, |viewer, adapter| viewer.close_magnifier(adapter));
            self.lens = None;
            return;
        }
        if let Some(Some(magnifier)) = self.registry.with(id, |viewer, _| viewer.open_magnifier()) {
            tracing::info!("Magnifier x{} on {}", magnifier.zoom, magnifier.source);
            self.lens = Some((id, magnifier));
        }
    }

    fn show_viewer(&mut self, ui: &mut egui::Ui, id: ViewerId) {
        let rect = ui.max_rect();
        let ctx = ui.ctx().clone();

        if self.containers.get(&id) != Some(&rect.size()) {
            self.containers.insert(id, rect.size());
            self.dispatch(id, InputEvent::Resize(to_size(rect.size())));
        }

        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let touch = ctx.input(|i| i.any_touches());
        if response.drag_started() {
            let origin = ctx.input(|i| i.pointer.press_origin());
            if let Some(pos) = origin.or(response.interact_pointer_pos()) {
                self.dispatch(id, input::gesture_event(Gesture::Press(pos), touch));
            }
        } else if response.dragged()
            && let Some(pos) = response.interact_pointer_pos()
        {
            self.dispatch(id, input::gesture_event(Gesture::Move(pos), touch));
        }
        if response.drag_stopped() {
            self.dispatch(id, input::gesture_event(Gesture::Release, touch));
        }

        let (Some(viewer), Some(adapter)) = (self.registry.viewer(id), self.registry.adapter(id)) else {
            return;
        };
        let layout = *viewer.layout();
        let ready = adapter.ready;
        let texture = adapter
            .displayed_frame()
            .and_then(|frame| self.textures.get(&(id, frame)));
        let painter = ui.painter_at(rect);

        let mut image_rect = None;
        if let Some(texture) = texture {
            let target = frame_rect(rect, &layout, texture.size_vec2());
            painter.image(
                texture.id(),
                target,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
            image_rect = Some(target);
        }

        if response.hovered() || response.dragged() {
            ctx.set_cursor_icon(input::cursor_icon(adapter.cursor));
        }

        if !ready {
            let width = rect.width() * f32::from(adapter.progress) / 100.0;
            painter.rect_filled(
                egui::Rect::from_min_size(rect.min, egui::vec2(width, PROGRESS_HEIGHT)),
                0.0,
                egui::Color32::from_rgb(80, 160, 255),
            );
            if texture.is_none() {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    format!("{}%", adapter.progress),
                    egui::FontId::proportional(18.0),
                    egui::Color32::from_gray(200),
                );
            }
        }

        if let Some(css) = &viewer.config().box_shadow {
            paint_inset_shadow(&painter, image_rect.unwrap_or(rect), shadow_depth(css));
        }

        if let Some(badge) = &adapter.badge {
            let center = image_rect.unwrap_or(rect).center();
            painter.circle_filled(center, BADGE_RADIUS, egui::Color32::from_black_alpha(140));
            match (badge, &self.logo) {
                (Badge::Logo(Some(_)), Some(logo)) => {
                    let size = BADGE_RADIUS * std::f32::consts::SQRT_2;
                    painter.image(
                        logo.id(),
                        egui::Rect::from_center_size(center, egui::vec2(size, size)),
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
                (badge, _) => {
                    let label = match badge {
                        Badge::Progress(percent) => format!("{}%", percent),
                        Badge::Logo(_) => "360°".to_string(),
                    };
                    painter.text(
                        center,
                        egui::Align2::CENTER_CENTER,
                        label,
                        egui::FontId::proportional(18.0),
                        egui::Color32::WHITE,
                    );
                }
            }
        }

        if ready && adapter.hint_visible {
            let offset = CONTROL_SIZE + 2.0 * CONTROL_GAP + viewer.config().hint_offset as f32;
            painter.text(
                rect.center_bottom() - egui::vec2(0.0, offset),
                egui::Align2::CENTER_BOTTOM,
                "Drag to spin",
                egui::FontId::proportional(14.0),
                egui::Color32::from_white_alpha(180),
            );
        }

        // Lens over the hovered point of the frame
        if let (Some((lens_viewer, magnifier)), Some(texture), Some(image_rect)) =
            (&self.lens, texture, image_rect)
            && *lens_viewer == id
            && let Some(pos) = response.hover_pos()
            && image_rect.contains(pos)
        {
            let lens_rect = egui::Rect::from_center_size(pos, egui::vec2(LENS_SIZE, LENS_SIZE));
            let center = (pos - image_rect.min) / image_rect.size();
            let half = egui::vec2(LENS_SIZE, LENS_SIZE) / (image_rect.size() * magnifier.zoom as f32) / 2.0;
            let uv = egui::Rect::from_min_max(
                (center - half).to_pos2(),
                (center + half).to_pos2(),
            );
            painter.image(texture.id(), lens_rect, uv, egui::Color32::WHITE);
            painter.rect_stroke(
                lens_rect,
                0.0,
                egui::Stroke::new(2.0, egui::Color32::WHITE),
                egui::StrokeKind::Outside,
            );
        }

        let autoplaying = viewer.is_autoplaying();
        let magnifier = viewer.config().magnifier.is_some();
        let offers_full_screen = viewer.config().full_screen;
        let is_full_screen = viewer.is_full_screen();
        let prev_inactive = adapter.is_inactive(Affordance::Prev);
        let next_inactive = adapter.is_inactive(Affordance::Next);

        // Control bar: prev, play, next, then the optional toggles
        let slots = 3 + usize::from(magnifier) + usize::from(offers_full_screen || is_full_screen);
        let bar_width = slots as f32 * (CONTROL_SIZE + CONTROL_GAP) - CONTROL_GAP;
        let mut slot = egui::Rect::from_min_size(
            egui::pos2(
                rect.center().x - bar_width / 2.0,
                rect.bottom() - CONTROL_SIZE - CONTROL_GAP,
            ),
            egui::vec2(CONTROL_SIZE, CONTROL_SIZE),
        );
        let step = egui::vec2(CONTROL_SIZE + CONTROL_GAP, 0.0);

        let control = |label: &str, inactive: bool| {
            let color = if inactive {
                egui::Color32::from_gray(110)
            } else {
                egui::Color32::WHITE
            };
            egui::Button::new(egui::RichText::new(label).color(color).size(18.0))
        };

        let prev = ui.put(slot, control("◀", prev_inactive).sense(egui::Sense::click_and_drag()));
        slot = slot.translate(step);
        let play = ui.put(slot, control(if autoplaying { "⏸" } else { "▶" }, false));
        slot = slot.translate(step);
        let next = ui.put(slot, control("▶", next_inactive).sense(egui::Sense::click_and_drag()));
        slot = slot.translate(step);
        let zoom = magnifier.then(|| {
            let response = ui.put(slot, control("🔍", false));
            slot = slot.translate(step);
            response
        });
        let screen = (offers_full_screen || is_full_screen)
            .then(|| ui.put(slot, control(if is_full_screen { "✖" } else { "□" }, false)));

        if ready {
            self.update_hold(id, Affordance::Prev, prev.is_pointer_button_down_on());
            self.update_hold(id, Affordance::Next, next.is_pointer_button_down_on());
            if play.clicked() {
                self.toggle_autoplay(id);
            }
            if zoom.is_some_and(|response| response.clicked()) {
                self.toggle_magnifier(id);
            }
        }
        if let Some(screen) = screen
            && screen.clicked()
        {
            if is_full_screen {
                self.close_full_screen(&ctx, id);
                return;
            }
            self.open_full_screen(&ctx, id, rect.size());
        }

        if self
            .registry
            .with(id, |_, adapter| adapter.take_close_lens())
            .unwrap_or(false)
        {
            self.lens = None;
        }
        if response.dragged() || self.held.is_some() {
            ctx.request_repaint();
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.receive_frames(ctx);
        self.advance_spins(ctx);
        self.handle_keys(ctx);

        if self.failed_frames > 0 {
            egui::TopBottomPanel::top("error_panel").show(ctx, |ui| {
                ui.colored_label(
                    egui::Color32::from_rgb(255, 100, 100),
                    format!("{} frames failed to load", self.failed_frames),
                );
            });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::from_gray(24)))
            .show(ctx, |ui| {
                let id = self.full_screen.unwrap_or(self.base);
                self.show_viewer(ui, id);
            });
    }
}

/// Run the preview window for `config`.
pub fn run(config: ViewerConfig, fullscreen: bool) -> Result<(), AppError> {
    let host = HostEnv {
        container: Size::new(WINDOW_SIZE[0] as f64, WINDOW_SIZE[1] as f64),
        ..HostEnv::default()
    };
    let viewer = Viewer::from_config(&config, host)?;
    tracing::info!(
        "Spinning {} frames ({} rows)",
        viewer.config().amount(),
        viewer.config().grid.rows
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("spin360")
            .with_inner_size(WINDOW_SIZE)
            .with_fullscreen(fullscreen),
        ..Default::default()
    };

    eframe::run_native(
        "spin360",
        native_options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, viewer)))),
    )
    .map_err(|e| AppError::EventLoop(format!("eframe error: {}", e)))?;

    Ok(())
}
