//! Axis gizmo line segments
//!
//! Three colored axes from the origin, each ending in a two-stroke arrowhead
//! whose strokes are a tenth of the axis length.

use bevy_math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// sRGB line color: red, green, blue for X, Y, Z
    pub fn color(self) -> [u8; 4] {
        match self {
            Axis::X => [255, 0, 0, 255],
            Axis::Y => [0, 255, 0, 255],
            Axis::Z => [0, 0, 255, 255],
        }
    }

    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSegment {
    pub axis: Axis,
    pub start: Vec3,
    pub end: Vec3,
}

impl AxisSegment {
    pub fn vertices(&self) -> [Vec3; 2] {
        [self.start, self.end]
    }
}

/// Segments for an axis gizmo of the given length, three per axis
///
/// The first segment of each axis is the shaft; the other two are the arrowhead.
pub fn axis_segments(scale: f32) -> [AxisSegment; 9] {
    let s = scale;
    let p = scale / 10.0;
    let seg = |axis, start: Vec3, end: Vec3| AxisSegment { axis, start, end };

    let x_tip = Axis::X.unit() * s;
    let y_tip = Axis::Y.unit() * s;
    let z_tip = Axis::Z.unit() * s;

    [
        seg(Axis::X, Vec3::ZERO, x_tip),
        seg(Axis::X, x_tip, Vec3::new(s - p, 0.0, p)),
        seg(Axis::X, x_tip, Vec3::new(s - p, 0.0, -p)),
        seg(Axis::Y, Vec3::ZERO, y_tip),
        seg(Axis::Y, y_tip, Vec3::new(0.0, s - p, p)),
        seg(Axis::Y, y_tip, Vec3::new(0.0, s - p, -p)),
        seg(Axis::Z, Vec3::ZERO, z_tip),
        seg(Axis::Z, z_tip, Vec3::new(p, 0.0, s - p)),
        seg(Axis::Z, z_tip, Vec3::new(-p, 0.0, s - p)),
    ]
}
