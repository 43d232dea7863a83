//! Frame driver: owns the entities, the pointer and viewport state and the
//! handle of the next scheduled frame.
//!
//! The host calls [`Driver::tick`] once per frame with a surface to draw on.
//! Input arrives through [`Driver::on_pointer_move`] and [`Driver::on_resize`]
//! and only the latest value is kept.

use crate::config::SceneConfig;
use crate::isometric::IsometricSet;
use crate::particles::ParticleField;
use crate::shade::Rgb;
use crate::state::{FrameContext, Viewport};
use crate::surface::Surface;
use crate::theme;
use druid::kurbo::Point;
use druid::TimerToken;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Entities created on the first viewport and kept across resizes
#[derive(Debug, Clone)]
pub struct Scene {
    pub field: ParticleField,
    pub objects: IsometricSet,
}

/// Counters shown by the debug overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub frames: u64,
    pub particles: usize,
    pub links: usize,
    pub objects: usize,
    pub resets: u64,
}

pub struct Driver {
    config: SceneConfig,
    rng: StdRng,
    viewport: Option<Viewport>,
    pointer: Point,
    scene: Option<Scene>,
    background: Rgb,
    pending_frame: Option<TimerToken>,
    running: bool,
    frames: u64,
}

impl Driver {
    pub fn new(config: SceneConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut driver = Driver {
            rng,
            viewport: None,
            pointer: Point::ZERO,
            scene: None,
            background: theme::DEFAULT_BACKGROUND,
            pending_frame: None,
            running: true,
            frames: 0,
            config,
        };
        let theme = driver.config.theme.clone();
        driver.set_theme(&theme);
        driver
    }

    /// Records the drawable bounds. The first call seeds the scene; later
    /// calls only move the bounds, so entities may sit outside them until
    /// their own update logic brings them back.
    pub fn initialize(&mut self, viewport: Viewport) {
        let backing = viewport.backing_size();
        debug!(
            width = viewport.width,
            height = viewport.height,
            scale = viewport.scale,
            backing_width = backing.width,
            backing_height = backing.height,
            "viewport changed"
        );
        self.viewport = Some(viewport);

        if self.scene.is_none() {
            info!(
                particles = self.config.particles,
                objects = self.config.objects,
                style = ?self.config.style,
                "seeding scene"
            );
            self.scene = Some(Scene {
                field: ParticleField::new(
                    self.config.particles,
                    &viewport,
                    self.config.style,
                    &mut self.rng,
                ),
                objects: IsometricSet::new(self.config.objects, &viewport, &mut self.rng),
            });
        }
    }

    pub fn on_resize(&mut self, viewport: Viewport) {
        if self.running {
            self.initialize(viewport);
        }
    }

    pub fn on_pointer_move(&mut self, pointer: Point) {
        if self.running {
            self.pointer = pointer;
        }
    }

    /// Switches the background to `theme`, keeping an explicit background
    /// override if one was configured.
    pub fn set_theme(&mut self, theme: &str) {
        if theme::lookup(theme).is_none() {
            debug!(theme, "unknown theme, using default background");
        }
        self.background = self
            .config
            .background
            .unwrap_or_else(|| theme::background_color(theme));
    }

    /// Remembers the handle of the next scheduled frame.
    pub fn schedule(&mut self, token: TimerToken) {
        if self.running {
            self.pending_frame = Some(token);
        }
    }

    /// Returns true if `token` is the frame this driver is waiting for.
    /// Stale and cancelled handles are rejected.
    pub fn claim(&mut self, token: TimerToken) -> bool {
        if self.running && self.pending_frame == Some(token) {
            self.pending_frame = None;
            true
        } else {
            false
        }
    }

    /// Advances and draws one frame. Returns false if nothing was drawn
    /// because the driver is stopped or has no viewport yet.
    pub fn tick(&mut self, surface: &mut impl Surface) -> bool {
        if !self.running {
            return false;
        }
        let Some(viewport) = self.viewport else {
            return false;
        };
        let frame = FrameContext {
            viewport,
            pointer: self.pointer,
        };

        surface.fill_rect(viewport.bounds(), &self.background.to_color());
        if let Some(scene) = self.scene.as_mut() {
            scene.field.advance_and_draw(surface, &frame);
            scene.objects.advance_and_draw(surface, &frame, &mut self.rng);
        }
        self.frames += 1;
        true
    }

    /// Draws the current state without advancing it.
    pub fn redraw(&self, surface: &mut impl Surface) {
        let Some(viewport) = self.viewport else {
            return;
        };
        surface.fill_rect(viewport.bounds(), &self.background.to_color());
        if let Some(scene) = &self.scene {
            scene.field.draw(surface);
            scene.objects.draw(surface);
        }
    }

    /// Cancels the pending frame and stops listening for input. Only the
    /// first call has any effect; it returns true.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.pending_frame = None;
        debug!(frames = self.frames, "driver stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn stats(&self) -> Stats {
        let mut stats = Stats {
            frames: self.frames,
            ..Stats::default()
        };
        if let Some(scene) = &self.scene {
            stats.particles = scene.field.particles().len();
            stats.links = scene.field.links().count();
            stats.objects = scene.objects.objects().len();
            stats.resets = scene.objects.resets();
        }
        stats
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.stop();
    }
}
