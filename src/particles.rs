//! The point-mass layer: drifting dots joined by fading proximity lines.
//!
//! Every frame each particle takes one explicit Euler step, bounces off the
//! viewport edges and is pushed away from the pointer when it comes within
//! [`REPULSION_RADIUS`]. The proximity graph compares every pair of particles,
//! which is quadratic in the particle count. That is fine for the hundred or
//! so particles a background needs but is the first thing to revisit before
//! scaling the field up.

use crate::shade::hsla;
use crate::state::{FrameContext, Viewport};
use crate::surface::Surface;
use druid::kurbo::{Point, Vec2};
use druid::Color;
use rand::Rng;

/// Distance from the pointer inside which particles are repelled
pub const REPULSION_RADIUS: f64 = 100.0;
/// Longest distance at which two particles are still linked
pub const LINK_DISTANCE: f64 = 100.0;

const ELECTRO_HUES: [f64; 5] = [200.0, 260.0, 320.0, 20.0, 80.0];
const LIGHTNESS: f64 = 70.0;
const LINE_WIDTH: f64 = 1.0;

/// How the pointer pushes particles away
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Repulsion {
    /// Move the particle directly by this many units
    Displace(f64),
    /// Add this much velocity away from the pointer
    Nudge(f64),
}

/// Look and feel of a particle field, fixed when the field is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FieldStyle {
    /// Five-hue palette, fast particles, positional displacement
    #[default]
    Electro,
    /// Full hue wheel, slow translucent particles, velocity nudges
    Ambient,
}

impl FieldStyle {
    pub fn repulsion(self) -> Repulsion {
        match self {
            FieldStyle::Electro => Repulsion::Displace(8.0),
            FieldStyle::Ambient => Repulsion::Nudge(0.05),
        }
    }

    /// Largest initial speed along either axis
    fn max_speed(self) -> f64 {
        match self {
            FieldStyle::Electro => 1.0,
            FieldStyle::Ambient => 0.25,
        }
    }

    fn saturation(self) -> f64 {
        match self {
            FieldStyle::Electro => 100.0,
            FieldStyle::Ambient => 80.0,
        }
    }

    fn dot_alpha(self) -> f64 {
        match self {
            FieldStyle::Electro => 1.0,
            FieldStyle::Ambient => 0.7,
        }
    }

    fn random_hue<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        match self {
            FieldStyle::Electro => ELECTRO_HUES[rng.gen_range(0..ELECTRO_HUES.len())],
            FieldStyle::Ambient => f64::from(rng.gen_range(0u16..360)),
        }
    }

    pub fn dot_color(self, hue: f64) -> Color {
        hsla(hue, self.saturation(), LIGHTNESS, self.dot_alpha())
    }

    pub fn line_color(self, hue: f64, alpha: f64) -> Color {
        hsla(hue, self.saturation(), LIGHTNESS, alpha)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Vec2,
    pub radius: f64,
    pub hue: f64,
}

impl Particle {
    fn random<R: Rng + ?Sized>(viewport: &Viewport, style: FieldStyle, rng: &mut R) -> Self {
        let speed = style.max_speed();
        Particle {
            position: Point::new(
                rng.gen::<f64>() * viewport.width,
                rng.gen::<f64>() * viewport.height,
            ),
            velocity: Vec2::new(
                (rng.gen::<f64>() - 0.5) * 2.0 * speed,
                (rng.gen::<f64>() - 0.5) * 2.0 * speed,
            ),
            radius: 2.0 + rng.gen::<f64>() * 3.0,
            hue: style.random_hue(rng),
        }
    }

    /// Euler step followed by the edge bounce.
    ///
    /// The position is never clamped. Outside an edge the velocity is pointed
    /// back inside, so a particle that is still out on the next tick keeps
    /// heading home instead of flipping again.
    fn step(&mut self, viewport: &Viewport) {
        self.position += self.velocity;

        if self.position.x < 0.0 {
            self.velocity.x = self.velocity.x.abs();
        } else if self.position.x > viewport.width {
            self.velocity.x = -self.velocity.x.abs();
        }
        if self.position.y < 0.0 {
            self.velocity.y = self.velocity.y.abs();
        } else if self.position.y > viewport.height {
            self.velocity.y = -self.velocity.y.abs();
        }
    }

    fn repel(&mut self, pointer: Point, repulsion: Repulsion) {
        let offset = pointer - self.position;
        let distance = offset.hypot();
        // a pointer sitting exactly on the particle has no direction
        if distance >= REPULSION_RADIUS || distance == 0.0 {
            return;
        }
        let away = -offset / distance;
        match repulsion {
            Repulsion::Displace(step) => self.position += away * step,
            Repulsion::Nudge(step) => self.velocity += away * step,
        }
    }
}

/// An edge of the proximity graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: usize,
    pub to: usize,
    pub distance: f64,
    /// Stroke opacity, `1 - distance / LINK_DISTANCE`
    pub alpha: f64,
}

/// Fixed-size set of particles sharing one [`FieldStyle`]
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    style: FieldStyle,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(
        count: usize,
        viewport: &Viewport,
        style: FieldStyle,
        rng: &mut R,
    ) -> Self {
        let particles = (0..count)
            .map(|_| Particle::random(viewport, style, rng))
            .collect();
        ParticleField { particles, style }
    }

    #[cfg(test)]
    pub fn from_particles(particles: Vec<Particle>, style: FieldStyle) -> Self {
        ParticleField { particles, style }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn style(&self) -> FieldStyle {
        self.style
    }

    pub fn advance(&mut self, frame: &FrameContext) {
        let repulsion = self.style.repulsion();
        for particle in &mut self.particles {
            particle.step(&frame.viewport);
            particle.repel(frame.pointer, repulsion);
        }
    }

    /// Every unordered pair closer than [`LINK_DISTANCE`], lower index first
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        let particles = &self.particles;
        (0..particles.len()).flat_map(move |from| {
            (from + 1..particles.len()).filter_map(move |to| {
                let distance = particles[from].position.distance(particles[to].position);
                (distance < LINK_DISTANCE).then(|| Link {
                    from,
                    to,
                    distance,
                    alpha: 1.0 - distance / LINK_DISTANCE,
                })
            })
        })
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        for particle in &self.particles {
            let color = self.style.dot_color(particle.hue);
            surface.fill_circle(particle.position, particle.radius, &color);
        }

        for link in self.links() {
            let from = &self.particles[link.from];
            let to = &self.particles[link.to];
            let color = self.style.line_color(from.hue, link.alpha);
            surface.stroke_line(from.position, to.position, &color, LINE_WIDTH);
        }
    }

    pub fn advance_and_draw(&mut self, surface: &mut impl Surface, frame: &FrameContext) {
        self.advance(frame);
        self.draw(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::RecordingSurface;
    use druid::kurbo::Size;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn viewport() -> Viewport {
        Viewport::new(Size::new(800.0, 600.0), 1.0)
    }

    fn frame(pointer: Point) -> FrameContext {
        FrameContext {
            viewport: viewport(),
            pointer,
        }
    }

    fn particle(x: f64, y: f64, vx: f64, vy: f64) -> Particle {
        Particle {
            position: Point::new(x, y),
            velocity: Vec2::new(vx, vy),
            radius: 3.0,
            hue: 200.0,
        }
    }

    #[test]
    fn test_linear_motion_outside_repulsion_radius() {
        let start = vec![
            particle(100.0, 100.0, 0.5, -0.25),
            particle(150.0, 120.0, -1.0, 0.75),
            particle(200.0, 200.0, 0.1, 0.2),
        ];
        let mut field = ParticleField::from_particles(start.clone(), FieldStyle::Electro);
        field.advance(&frame(Point::new(700.0, 560.0)));

        for (before, after) in start.iter().zip(field.particles()) {
            assert_eq!(after.position.x, before.position.x + before.velocity.x);
            assert_eq!(after.position.y, before.position.y + before.velocity.y);
            assert_eq!(after.velocity, before.velocity);
        }
    }

    #[test]
    fn test_bounce_flips_when_crossing_edge() {
        let mut field = ParticleField::from_particles(
            vec![particle(799.5, 300.0, 1.0, 0.0)],
            FieldStyle::Electro,
        );
        let far = frame(Point::new(-1000.0, -1000.0));

        field.advance(&far);
        assert_eq!(field.particles()[0].position.x, 800.5);
        assert_eq!(field.particles()[0].velocity.x, -1.0);

        field.advance(&far);
        assert_eq!(field.particles()[0].position.x, 799.5);
        assert_eq!(field.particles()[0].velocity.x, -1.0);
    }

    #[test]
    fn test_bounce_does_not_double_flip() {
        let mut field = ParticleField::from_particles(
            vec![particle(300.0, -5.0, 0.0, -1.0)],
            FieldStyle::Electro,
        );
        let far = frame(Point::new(-1000.0, -1000.0));

        field.advance(&far);
        assert_eq!(field.particles()[0].position.y, -6.0);
        assert_eq!(field.particles()[0].velocity.y, 1.0);

        // still outside, already heading back in
        field.advance(&far);
        assert_eq!(field.particles()[0].position.y, -5.0);
        assert_eq!(field.particles()[0].velocity.y, 1.0);
    }

    #[test]
    fn test_displacement_pushes_away_from_pointer() {
        let mut field = ParticleField::from_particles(
            vec![particle(100.0, 100.0, 0.0, 0.0)],
            FieldStyle::Electro,
        );
        field.advance(&frame(Point::new(110.0, 100.0)));

        let p = &field.particles()[0];
        assert!((p.position.x - 92.0).abs() < 1e-9);
        assert!((p.position.y - 100.0).abs() < 1e-9);
        assert_eq!(p.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_nudge_changes_velocity_only() {
        let mut field = ParticleField::from_particles(
            vec![particle(100.0, 100.0, 0.0, 0.0)],
            FieldStyle::Ambient,
        );
        field.advance(&frame(Point::new(100.0, 130.0)));

        let p = &field.particles()[0];
        assert_eq!(p.position, Point::new(100.0, 100.0));
        assert!(p.velocity.x.abs() < 1e-12);
        assert!((p.velocity.y + 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_pointer_on_particle_applies_no_force() {
        let mut field = ParticleField::from_particles(
            vec![particle(100.0, 100.0, 0.0, 0.0)],
            FieldStyle::Electro,
        );
        field.advance(&frame(Point::new(100.0, 100.0)));

        let p = &field.particles()[0];
        assert_eq!(p.position, Point::new(100.0, 100.0));
        assert!(p.position.x.is_finite() && p.velocity.x.is_finite());
    }

    #[test]
    fn test_links_use_linear_falloff() {
        let field = ParticleField::from_particles(
            vec![
                particle(0.0, 0.0, 0.0, 0.0),
                particle(30.0, 40.0, 0.0, 0.0),
                particle(0.0, 100.0, 0.0, 0.0),
            ],
            FieldStyle::Electro,
        );
        let links: Vec<Link> = field.links().collect();

        // 0-2 sits exactly on the threshold and is not linked
        assert_eq!(links.len(), 2);
        assert_eq!((links[0].from, links[0].to), (0, 1));
        assert!((links[0].alpha - 0.5).abs() < 1e-12);
        assert_eq!((links[1].from, links[1].to), (1, 2));
        let d = (30.0f64 * 30.0 + 60.0 * 60.0).sqrt();
        assert!((links[1].alpha - (1.0 - d / 100.0)).abs() < 1e-12);
    }

    #[test]
    fn test_draw_dots_then_lines_with_first_hue() {
        let mut first = particle(10.0, 10.0, 0.0, 0.0);
        first.hue = 20.0;
        let mut second = particle(10.0, 30.0, 0.0, 0.0);
        second.hue = 260.0;
        let field = ParticleField::from_particles(vec![first, second], FieldStyle::Electro);

        let mut surface = RecordingSurface::default();
        field.draw(&mut surface);

        assert_eq!(surface.circles().len(), 2);
        let lines = surface.lines();
        assert_eq!(lines.len(), 1);
        let (from, to, color) = &lines[0];
        assert_eq!(*from, Point::new(10.0, 10.0));
        assert_eq!(*to, Point::new(10.0, 30.0));

        let (r, g, b, a) = color.as_rgba();
        let (er, eg, eb, _) = hsla(20.0, 100.0, 70.0, 1.0).as_rgba();
        assert!((r - er).abs() < 0.01 && (g - eg).abs() < 0.01 && (b - eb).abs() < 0.01);
        assert!((a - 0.8).abs() < 0.01);
    }

    #[test]
    fn test_new_field_seeds_inside_viewport() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = ParticleField::new(100, &viewport(), FieldStyle::Electro, &mut rng);

        assert_eq!(field.particles().len(), 100);
        for p in field.particles() {
            assert!((0.0..=800.0).contains(&p.position.x));
            assert!((0.0..=600.0).contains(&p.position.y));
            assert!((2.0..5.0).contains(&p.radius));
            assert!(p.velocity.x.abs() <= 1.0 && p.velocity.y.abs() <= 1.0);
            assert!(ELECTRO_HUES.contains(&p.hue));
        }
    }

    #[test]
    fn test_ambient_style_seeds_slow_particles() {
        let mut rng = StdRng::seed_from_u64(11);
        let field = ParticleField::new(50, &viewport(), FieldStyle::Ambient, &mut rng);

        for p in field.particles() {
            assert!(p.velocity.x.abs() <= 0.25 && p.velocity.y.abs() <= 0.25);
            assert!((0.0..360.0).contains(&p.hue));
            assert_eq!(p.hue.fract(), 0.0);
        }
        let (_, _, _, alpha) = field.style().dot_color(10.0).as_rgba();
        assert!((alpha - 0.7).abs() < 0.01);
    }
}
