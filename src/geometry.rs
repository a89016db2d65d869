//! 2D geometry primitives: vector math, polar transforms, and the
//! segment-circle intersection test the visibility graph builder prunes with.

use std::f64::consts::TAU;

use nalgebra as na;

/// A point in the plane, in board/world coordinates.
pub type Point = na::Point2<f64>;
/// A displacement in the plane.
pub type Vector = na::Vector2<f64>;

/// Euclidean distance between two points.
#[must_use]
pub fn dist(a: Point, b: Point) -> f64 {
    na::distance(&a, &b)
}

/// The angle of the vector `to - from`, measured counter-clockwise from the
/// positive x-axis, in `(-pi, pi]`.
#[must_use]
pub fn v2v_angle(from: Point, to: Point) -> f64 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

/// The point at distance `r` from `origin` in direction `theta`.
#[must_use]
pub fn polar_offset(origin: Point, r: f64, theta: f64) -> Point {
    origin + r * Vector::new(theta.cos(), theta.sin())
}

/// Shifts `theta` into `[0, 2*pi)`.
#[must_use]
pub fn normalize_angle_0_2pi(theta: f64) -> f64 {
    theta.rem_euclid(TAU)
}

/// A closed line segment between `start` and `end`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Returns true iff the closed segment enters the open interior of the disc
/// with the given `center` and `radius`.
///
/// Uses the projection-of-center-onto-segment-line approach: if the
/// projection of `center` onto the line through the segment falls outside
/// the segment, the relevant distance is to the nearer endpoint instead of
/// the perpendicular distance. Touching (distance exactly equal to the
/// radius) is not an intersection: the comparison is strict.
#[must_use]
pub fn segment_circle_intersects(segment: Segment, center: Point, radius: f64) -> bool {
    let edge = segment.end - segment.start;
    let edge_len_sq = edge.norm_squared();

    let distance = if edge_len_sq == 0.0 {
        dist(segment.start, center)
    } else {
        let to_center = center - segment.start;
        let t = to_center.dot(&edge) / edge_len_sq;

        if t < 0.0 {
            dist(segment.start, center)
        } else if t > 1.0 {
            dist(segment.end, center)
        } else {
            // Perpendicular distance: |edge x to_center| / |edge|.
            let cross = edge.x * to_center.y - edge.y * to_center.x;
            cross.abs() / edge_len_sq.sqrt()
        }
    };

    distance < radius
}
