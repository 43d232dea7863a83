//! The 2D drawing contract the simulation renders through.
//!
//! [`PietSurface`] maps it onto a piet render context for the live window.
//! Tests use the recording implementation in [`recording`].

use druid::kurbo::{Affine, BezPath, Circle, Line, Point, Rect, Vec2};
use druid::piet::RenderContext;
use druid::Color;
use tracing::warn;

/// A blurred halo painted behind filled paths
#[derive(Debug, Clone)]
pub struct Shadow {
    pub color: Color,
    pub blur: f64,
}

/// Drawing operations required by the particle and isometric pipelines.
///
/// Transform, alpha and shadow state is scoped by `save`/`restore`.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: &Color);
    fn fill_circle(&mut self, center: Point, radius: f64, color: &Color);
    fn stroke_line(&mut self, from: Point, to: Point, color: &Color, width: f64);
    fn fill_path(&mut self, path: &BezPath, color: &Color);
    fn save(&mut self);
    fn restore(&mut self);
    /// Post-multiplies the current transform
    fn transform(&mut self, affine: Affine);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_shadow(&mut self, shadow: Option<Shadow>);

    fn translate(&mut self, offset: Vec2) {
        self.transform(Affine::translate(offset));
    }

    fn rotate(&mut self, radians: f64) {
        self.transform(Affine::rotate(radians));
    }

    fn scale(&mut self, factor: f64) {
        self.transform(Affine::scale(factor));
    }
}

/// Builds a closed polygon from `points` (move, line..., close)
pub fn polygon(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for point in rest {
            path.line_to(*point);
        }
        path.close_path();
    }
    path
}

fn with_alpha(color: &Color, alpha: f64) -> Color {
    let (r, g, b, a) = color.as_rgba();
    Color::rgba(r, g, b, a * alpha)
}

#[derive(Debug, Clone)]
struct PaintState {
    alpha: f64,
    shadow: Option<Shadow>,
}

impl Default for PaintState {
    fn default() -> Self {
        PaintState {
            alpha: 1.0,
            shadow: None,
        }
    }
}

/// [`Surface`] backed by a piet render context
pub struct PietSurface<'a, R: RenderContext> {
    ctx: &'a mut R,
    state: PaintState,
    stack: Vec<PaintState>,
}

impl<'a, R: RenderContext> PietSurface<'a, R> {
    pub fn new(ctx: &'a mut R) -> Self {
        PietSurface {
            ctx,
            state: PaintState::default(),
            stack: Vec::new(),
        }
    }
}

impl<R: RenderContext> Surface for PietSurface<'_, R> {
    fn fill_rect(&mut self, rect: Rect, color: &Color) {
        let color = with_alpha(color, self.state.alpha);
        self.ctx.fill(rect, &color);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: &Color) {
        let color = with_alpha(color, self.state.alpha);
        self.ctx.fill(Circle::new(center, radius), &color);
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: &Color, width: f64) {
        let color = with_alpha(color, self.state.alpha);
        self.ctx.stroke(Line::new(from, to), &color, width);
    }

    fn fill_path(&mut self, path: &BezPath, color: &Color) {
        // piet has no path blur, so the shadow is a wide translucent outline
        if let Some(shadow) = &self.state.shadow {
            let halo = with_alpha(&shadow.color, self.state.alpha);
            self.ctx.stroke(path, &halo, shadow.blur * 2.0);
        }
        let color = with_alpha(color, self.state.alpha);
        self.ctx.fill(path, &color);
    }

    fn save(&mut self) {
        if let Err(e) = self.ctx.save() {
            warn!("failed to save render state: {}", e);
        }
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Err(e) = self.ctx.restore() {
            warn!("failed to restore render state: {}", e);
        }
        self.state = self.stack.pop().unwrap_or_default();
    }

    fn transform(&mut self, affine: Affine) {
        self.ctx.transform(affine);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.state.shadow = shadow;
    }
}
