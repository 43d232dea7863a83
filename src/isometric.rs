//! Drifting pseudo-3D solids painted back to front.
//!
//! Depth is a synthetic z in `[0, 300]` that only shrinks the shape
//! (`1 - z / 1000`) and decides paint order; there is no projection or
//! occlusion test.

use crate::shade::Rgb;
use crate::state::{FrameContext, Viewport};
use crate::surface::{polygon, Shadow, Surface};
use druid::kurbo::{BezPath, Point, Vec2};
use druid::Color;
use rand::Rng;
use std::f64::consts::{FRAC_PI_6, TAU};
use tracing::trace;

/// Base colors an object can be painted with
pub const PALETTE: [Rgb; 4] = [
    Rgb::new(0x6b46c1),
    Rgb::new(0x4299e1),
    Rgb::new(0x38b2ac),
    Rgb::new(0xecc94b),
];

/// How far past the viewport edge an object may drift before it is recycled
pub const MARGIN: f64 = 100.0;
/// Objects deeper than this are recycled
pub const MAX_DEPTH: f64 = 300.0;
/// New objects start in `[0, SPAWN_DEPTH)`
pub const SPAWN_DEPTH: f64 = 200.0;

const PERSPECTIVE: f64 = 1000.0;
const FACE_ALPHA: f64 = 0.8;
const FACE_SHADE: f64 = 20.0;
const MIN_SIZE: f64 = 20.0;
const SIZE_RANGE: f64 = 30.0;
const MAX_DRIFT: f64 = 0.25;
const MAX_SPIN: f64 = 0.01;

/// The shape an object is drawn as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solid {
    /// Three shaded faces of a cube seen from above
    Cube,
    /// A flat square
    Quad,
}

impl Solid {
    /// Face outlines in local coordinates with their fill colors, in paint order
    pub fn faces(self, size: f64, base: Rgb) -> Vec<(BezPath, Rgb)> {
        match self {
            Solid::Cube => {
                let (sin, cos) = FRAC_PI_6.sin_cos();
                let side = size * cos;
                let low = -size * sin;
                let high = -size * (1.0 + sin);
                let apex = -size * (1.0 + 2.0 * sin);

                let front = polygon(&[
                    Point::ORIGIN,
                    Point::new(side, low),
                    Point::new(side, high),
                    Point::new(0.0, -size),
                ]);
                let left = polygon(&[
                    Point::ORIGIN,
                    Point::new(0.0, -size),
                    Point::new(-side, high),
                    Point::new(-side, low),
                ]);
                let top = polygon(&[
                    Point::new(0.0, -size),
                    Point::new(side, high),
                    Point::new(0.0, apex),
                    Point::new(-side, high),
                ]);
                vec![
                    (front, base),
                    (left, base.lighten(FACE_SHADE)),
                    (top, base.darken(FACE_SHADE)),
                ]
            }
            Solid::Quad => {
                let half = size / 2.0;
                let square = polygon(&[
                    Point::new(-half, -half),
                    Point::new(half, -half),
                    Point::new(half, half),
                    Point::new(-half, half),
                ]);
                vec![(square, base)]
            }
        }
    }

    fn draw(self, surface: &mut impl Surface, size: f64, base: Rgb) {
        for (path, color) in self.faces(size, base) {
            surface.fill_path(&path, &color.to_color());
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IsometricObject {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
    pub rotation: f64,
    pub rotation_speed: f64,
    pub size: f64,
    pub color: Rgb,
    pub solid: Solid,
}

impl IsometricObject {
    /// A fresh object placed somewhere inside the viewport
    pub fn spawn<R: Rng + ?Sized>(viewport: &Viewport, rng: &mut R) -> Self {
        IsometricObject {
            x: rng.gen::<f64>() * viewport.width,
            y: rng.gen::<f64>() * viewport.height,
            z: rng.gen::<f64>() * SPAWN_DEPTH,
            ..Self::random(viewport, rng)
        }
    }

    /// A fully randomized object anywhere in the margin-extended viewport
    pub fn random<R: Rng + ?Sized>(viewport: &Viewport, rng: &mut R) -> Self {
        let mut drift = || (rng.gen::<f64>() - 0.5) * 2.0 * MAX_DRIFT;
        let (vx, vy, vz) = (drift(), drift(), drift());
        IsometricObject {
            x: -MARGIN + rng.gen::<f64>() * (viewport.width + 2.0 * MARGIN),
            y: -MARGIN + rng.gen::<f64>() * (viewport.height + 2.0 * MARGIN),
            z: rng.gen::<f64>() * SPAWN_DEPTH,
            vx,
            vy,
            vz,
            rotation: rng.gen::<f64>() * TAU,
            rotation_speed: (rng.gen::<f64>() - 0.5) * 2.0 * MAX_SPIN,
            size: MIN_SIZE + rng.gen::<f64>() * SIZE_RANGE,
            color: PALETTE[rng.gen_range(0..PALETTE.len())],
            solid: if rng.gen_bool(0.5) {
                Solid::Cube
            } else {
                Solid::Quad
            },
        }
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, viewport: &Viewport, rng: &mut R) {
        *self = Self::random(viewport, rng);
    }

    pub fn step(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.z += self.vz;
        self.rotation += self.rotation_speed;
    }

    pub fn is_out_of_bounds(&self, viewport: &Viewport) -> bool {
        self.x < -MARGIN
            || self.x > viewport.width + MARGIN
            || self.y < -MARGIN
            || self.y > viewport.height + MARGIN
            || self.z < 0.0
            || self.z > MAX_DEPTH
    }

    pub fn perspective_scale(&self) -> f64 {
        1.0 - self.z / PERSPECTIVE
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        surface.save();
        surface.translate(Vec2::new(self.x, self.y));
        surface.rotate(self.rotation);
        surface.scale(self.perspective_scale());
        surface.set_shadow(Some(Shadow {
            color: Color::rgba(0.0, 0.0, 0.0, 0.25),
            blur: 4.0,
        }));
        surface.set_global_alpha(FACE_ALPHA);
        self.solid.draw(surface, self.size, self.color);
        surface.restore();
    }
}

/// Fixed arena of isometric objects
#[derive(Debug, Clone)]
pub struct IsometricSet {
    objects: Vec<IsometricObject>,
    resets: u64,
}

impl IsometricSet {
    pub fn new<R: Rng + ?Sized>(count: usize, viewport: &Viewport, rng: &mut R) -> Self {
        let objects = (0..count)
            .map(|_| IsometricObject::spawn(viewport, rng))
            .collect();
        IsometricSet { objects, resets: 0 }
    }

    #[cfg(test)]
    pub fn from_objects(objects: Vec<IsometricObject>) -> Self {
        IsometricSet { objects, resets: 0 }
    }

    pub fn objects(&self) -> &[IsometricObject] {
        &self.objects
    }

    /// Number of objects recycled since the set was created
    pub fn resets(&self) -> u64 {
        self.resets
    }

    /// Orders the arena farthest first. Equal depths keep no particular order.
    pub fn sort_by_depth(&mut self) {
        self.objects.sort_unstable_by(|a, b| b.z.total_cmp(&a.z));
    }

    /// Sorts by depth, then moves every object and recycles the ones that
    /// left the bounding volume.
    pub fn advance<R: Rng + ?Sized>(&mut self, frame: &FrameContext, rng: &mut R) {
        self.sort_by_depth();
        for (slot, object) in self.objects.iter_mut().enumerate() {
            object.step();
            if object.is_out_of_bounds(&frame.viewport) {
                trace!(slot, x = object.x, y = object.y, z = object.z, "recycling object");
                object.reset(&frame.viewport, rng);
                self.resets += 1;
            }
        }
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        for object in &self.objects {
            object.draw(surface);
        }
    }

    pub fn advance_and_draw<R: Rng + ?Sized>(
        &mut self,
        surface: &mut impl Surface,
        frame: &FrameContext,
        rng: &mut R,
    ) {
        self.advance(frame, rng);
        self.draw(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::{DrawOp, RecordingSurface};
    use druid::kurbo::{PathEl, Size};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn viewport() -> Viewport {
        Viewport::new(Size::new(800.0, 600.0), 1.0)
    }

    fn frame() -> FrameContext {
        FrameContext {
            viewport: viewport(),
            pointer: Point::ORIGIN,
        }
    }

    fn object(z: f64) -> IsometricObject {
        IsometricObject {
            x: 400.0,
            y: 300.0,
            z,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            size: 30.0,
            color: PALETTE[0],
            solid: Solid::Cube,
        }
    }

    fn assert_freshly_reset(object: &IsometricObject) {
        assert!((0.0..SPAWN_DEPTH).contains(&object.z));
        assert!((-MARGIN..=800.0 + MARGIN).contains(&object.x));
        assert!((-MARGIN..=600.0 + MARGIN).contains(&object.y));
        assert!((MIN_SIZE..MIN_SIZE + SIZE_RANGE).contains(&object.size));
        assert!(PALETTE.contains(&object.color));
        assert!(object.vx.abs() <= MAX_DRIFT);
        assert!(object.rotation_speed.abs() <= MAX_SPIN);
    }

    #[test]
    fn test_depth_sort_farthest_first() {
        let mut set = IsometricSet::from_objects(vec![object(50.0), object(10.0), object(200.0)]);
        set.sort_by_depth();
        let depths: Vec<f64> = set.objects().iter().map(|o| o.z).collect();
        assert_eq!(depths, vec![200.0, 50.0, 10.0]);
    }

    #[test]
    fn test_step_integrates_position_and_rotation() {
        let mut o = object(100.0);
        o.vx = 1.0;
        o.vy = -2.0;
        o.vz = 0.5;
        o.rotation_speed = 0.01;
        o.step();
        assert_eq!((o.x, o.y, o.z), (401.0, 298.0, 100.5));
        assert!((o.rotation - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_reset_when_leaving_depth_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut deep = object(299.9);
        deep.vz = 0.25;
        let mut set = IsometricSet::from_objects(vec![deep]);

        set.advance(&frame(), &mut rng);

        assert_eq!(set.resets(), 1);
        assert_freshly_reset(&set.objects()[0]);
    }

    #[test]
    fn test_reset_when_leaving_margin() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut drifting = object(100.0);
        drifting.x = 800.0 + MARGIN;
        drifting.vx = 0.25;
        let mut near = object(20.0);
        near.z = 0.1;
        near.vz = -0.2;
        let mut set = IsometricSet::from_objects(vec![drifting, near, object(150.0)]);

        set.advance(&frame(), &mut rng);

        assert_eq!(set.resets(), 2);
        // the object resting at z = 150 was neither moved nor recycled
        assert!(set.objects().iter().any(|o| *o == object(150.0)));
    }

    #[test]
    fn test_object_on_the_boundary_is_kept() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut edge = object(MAX_DEPTH);
        edge.x = -MARGIN;
        let mut set = IsometricSet::from_objects(vec![edge.clone()]);

        set.advance(&frame(), &mut rng);

        assert_eq!(set.resets(), 0);
        assert_eq!(set.objects()[0], edge);
    }

    #[test]
    fn test_spawn_places_objects_inside_viewport() {
        let mut rng = StdRng::seed_from_u64(9);
        let set = IsometricSet::new(22, &viewport(), &mut rng);
        assert_eq!(set.objects().len(), 22);
        for o in set.objects() {
            assert!((0.0..800.0).contains(&o.x));
            assert!((0.0..600.0).contains(&o.y));
            assert_freshly_reset(o);
        }
    }

    #[test]
    fn test_random_objects_use_both_solids() {
        let mut rng = StdRng::seed_from_u64(1);
        let solids: Vec<Solid> = (0..64)
            .map(|_| IsometricObject::random(&viewport(), &mut rng).solid)
            .collect();
        assert!(solids.contains(&Solid::Cube));
        assert!(solids.contains(&Solid::Quad));
    }

    #[test]
    fn test_cube_faces_are_shaded() {
        let faces = Solid::Cube.faces(40.0, PALETTE[0]);
        assert_eq!(faces.len(), 3);
        assert_eq!(faces[0].1, PALETTE[0]);
        assert_eq!(faces[1].1, Rgb::new(0x9e79f4));
        assert_eq!(faces[2].1, Rgb::new(0x38138e));

        let top = faces[2].0.elements();
        assert_eq!(top[0], PathEl::MoveTo(Point::new(0.0, -40.0)));
        match top[2] {
            // 1 + 2 sin 30deg = 2
            PathEl::LineTo(apex) => {
                assert!(apex.x.abs() < 1e-9);
                assert!((apex.y + 80.0).abs() < 1e-9);
            }
            ref other => panic!("unexpected element {:?}", other),
        }
    }

    #[test]
    fn test_quad_is_centered_square() {
        let faces = Solid::Quad.faces(30.0, PALETTE[2]);
        assert_eq!(faces.len(), 1);
        let elements = faces[0].0.elements();
        assert_eq!(elements[0], PathEl::MoveTo(Point::new(-15.0, -15.0)));
        assert_eq!(elements[2], PathEl::LineTo(Point::new(15.0, 15.0)));
    }

    #[test]
    fn test_draw_is_scoped_and_scaled_by_depth() {
        let mut surface = RecordingSurface::default();
        object(250.0).draw(&mut surface);

        assert!(matches!(surface.ops.first(), Some(DrawOp::Save)));
        assert!(matches!(surface.ops.last(), Some(DrawOp::Restore)));
        assert_eq!(surface.paths().len(), 3);

        // translate, rotate, then scale
        let transforms: Vec<[f64; 6]> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Transform(affine) => Some(affine.as_coeffs()),
                _ => None,
            })
            .collect();
        assert_eq!(transforms.len(), 3);
        assert_eq!(transforms[0][4..], [400.0, 300.0]);
        assert_eq!(transforms[2], [0.75, 0.0, 0.0, 0.75, 0.0, 0.0]);
        assert!(surface
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::Alpha(alpha) if *alpha == FACE_ALPHA)));
    }
}
