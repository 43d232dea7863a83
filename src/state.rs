use druid::kurbo::{Point, Rect, Size};
use druid::Data;

/// Application state
#[derive(Clone, Data)]
pub struct AppState {
    /// Name of the active color theme
    pub theme: String,
    /// Enable debug mode
    pub debug: bool,
    /// Simulation paused
    pub paused: bool,
}

/// Drawable bounds of the surface in logical units, plus the device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl Viewport {
    /// Builds a viewport, treating a missing or nonsensical scale as 1.
    pub fn new(size: Size, scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Viewport {
            width: size.width.max(0.0),
            height: size.height.max(0.0),
            scale,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn bounds(&self) -> Rect {
        self.size().to_rect()
    }

    /// Size of the device-pixel backing store
    pub fn backing_size(&self) -> Size {
        Size::new(
            (self.width * self.scale).round(),
            (self.height * self.scale).round(),
        )
    }
}

/// Snapshot of the inputs a pipeline may read during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub viewport: Viewport,
    pub pointer: Point,
}
