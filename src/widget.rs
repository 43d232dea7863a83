use crate::driver::Driver;
use crate::state::{AppState, Viewport};
use crate::surface::PietSurface;
use crate::theme;
use druid::kurbo::Point;
use druid::text::FontFamily;
use druid::widget::prelude::*;
use druid::{
    commands,
    piet::{PietTextLayout, Text, TextLayout, TextLayoutBuilder},
    Color, RenderContext, Widget,
};
use std::time::{Duration, Instant};
use tracing::debug;

/// Delay between frames, roughly one display refresh
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Full-window widget hosting the animated background
pub struct BackgroundWidget {
    driver: Driver,
    /// Set when a frame fired and the next paint should advance the scene
    frame_due: bool,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl BackgroundWidget {
    pub fn new(driver: Driver) -> Self {
        BackgroundWidget {
            driver,
            frame_due: false,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        }
    }

    fn schedule_frame(&mut self, ctx: &mut EventCtx) {
        if self.driver.is_running() {
            let token = ctx.request_timer(FRAME_INTERVAL);
            self.driver.schedule(token);
        }
    }

    fn update_fps(&mut self) {
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }
    }

    /// Draws the version, frame counters and input state in the top-left corner
    fn paint_debug(&self, ctx: &mut PaintCtx, data: &AppState) {
        let color = if theme::is_dark(&data.theme) {
            Color::WHITE
        } else {
            Color::BLACK
        };
        let stats = self.driver.stats();
        let viewport = self.driver.viewport();
        let pointer = self.driver.pointer();

        let mut lines = vec![
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("Frames: {}  FPS: {:.2}", stats.frames, self.fps),
            format!("Theme: {} ({})", data.theme, self.driver.background()),
            format!("Pointer: ({:.0}, {:.0})", pointer.x, pointer.y),
            format!(
                "Particles: {}  Links: {}  Style: {:?}",
                stats.particles,
                stats.links,
                self.driver.scene().map(|scene| scene.field.style())
            ),
            format!("Objects: {}  Resets: {}", stats.objects, stats.resets),
        ];
        if let Some(viewport) = viewport {
            lines.push(format!(
                "Viewport: {:.0}x{:.0} @ {:.2}x",
                viewport.width, viewport.height, viewport.scale
            ));
        }

        for (row, text) in lines.into_iter().enumerate() {
            if let Some(layout) = build_label(ctx, text, 12.0, color.clone(), false) {
                ctx.draw_text(&layout, (10.0, 10.0 + 20.0 * row as f64));
            }
        }
    }
}

/// Lays out a single line of overlay text
fn build_label(
    ctx: &mut PaintCtx,
    text: String,
    size: f64,
    color: Color,
    bold: bool,
) -> Option<PietTextLayout> {
    let mut builder = ctx
        .text()
        .new_text_layout(text)
        .font(FontFamily::SYSTEM_UI, size)
        .text_color(color);
    if bold {
        builder = builder.default_attribute(druid::piet::FontWeight::BOLD);
    }
    builder.build().ok()
}

impl Widget<AppState> for BackgroundWidget {
    /// Bridges window events to the driver
    fn event(&mut self, ctx: &mut EventCtx, event: &Event, data: &mut AppState, _env: &Env) {
        match event {
            Event::WindowConnected => {
                self.driver.set_theme(&data.theme);
                self.schedule_frame(ctx);
                // Request focus to receive keyboard events
                ctx.request_focus();
            }
            Event::Timer(token) => {
                if self.driver.claim(*token) {
                    if !data.paused {
                        self.frame_due = true;
                    }
                    ctx.request_paint();
                    self.schedule_frame(ctx);
                }
            }
            Event::MouseMove(mouse_event) => {
                self.driver.on_pointer_move(mouse_event.pos);
            }
            Event::KeyDown(key_event) => {
                if let druid::keyboard_types::Key::Character(s) = &key_event.key {
                    match s.as_str() {
                        "d" | "D" => {
                            data.debug = !data.debug;
                            ctx.request_paint();
                        }
                        "p" | "P" => {
                            data.paused = !data.paused;
                            ctx.request_paint();
                        }
                        "t" | "T" => {
                            data.theme = theme::next_theme(&data.theme).to_string();
                        }
                        "q" | "Q" => {
                            self.driver.stop();
                            ctx.submit_command(commands::QUIT_APP);
                        }
                        _ => {}
                    }
                }
            }
            Event::WindowCloseRequested | Event::WindowDisconnected => {
                if self.driver.stop() {
                    debug!("window closing, animation stopped");
                }
            }
            _ => {}
        }
    }

    fn lifecycle(&mut self, ctx: &mut LifeCycleCtx, event: &LifeCycle, _data: &AppState, _env: &Env) {
        if let LifeCycle::Size(size) = event {
            let scale = ctx.window().get_scale().map(|s| s.x()).unwrap_or(1.0);
            self.driver.on_resize(Viewport::new(*size, scale));
        }
    }

    fn update(&mut self, ctx: &mut UpdateCtx, old_data: &AppState, data: &AppState, _env: &Env) {
        if old_data.theme != data.theme {
            self.driver.set_theme(&data.theme);
            ctx.request_paint();
        }
    }

    fn layout(
        &mut self,
        _layout_ctx: &mut LayoutCtx,
        bc: &BoxConstraints,
        _data: &AppState,
        _env: &Env,
    ) -> Size {
        bc.max()
    }

    /// Paint the background, then any overlays
    fn paint(&mut self, ctx: &mut PaintCtx, data: &AppState, _env: &Env) {
        self.update_fps();
        let size = ctx.size();

        {
            let mut surface = PietSurface::new(&mut *ctx.render_ctx);
            let due = std::mem::take(&mut self.frame_due);
            if !(due && self.driver.tick(&mut surface)) {
                self.driver.redraw(&mut surface);
            }
        }

        if data.debug {
            self.paint_debug(ctx, data);
        }

        // Display 'Paused' over a dimmed frame
        if data.paused {
            ctx.fill(size.to_rect(), &Color::rgba8(0, 0, 0, 150));
            if let Some(layout) = build_label(ctx, "Paused".to_string(), 36.0, Color::WHITE, true) {
                let text_size = layout.size();
                let pos = Point::new(
                    (size.width - text_size.width) / 2.0,
                    (size.height - text_size.height) / 2.0,
                );
                ctx.draw_text(&layout, pos);
            }
        }
    }
}
