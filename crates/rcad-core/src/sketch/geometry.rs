//! Closed-form sketch geometry
//!
//! Everything here is pure math on meters. No unit conversion, no service
//! calls.

use std::f64::consts::{PI, TAU};

use glam::DVec2;

use crate::error::{CadError, CadResult};
use crate::units::{POINT_TOLERANCE, Point2D};

/// Relative tolerance for "same radius" checks
const RELATIVE_TOLERANCE: f64 = 1e-9;

/// Tolerant float comparison, relative with a tiny absolute floor
pub fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= (RELATIVE_TOLERANCE * a.abs().max(b.abs())).max(1e-12)
}

/// Wrap an angle into `[0, 2π)`
pub fn normalize_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Reflect `point` across the line through `q_i` and `q_j`
pub fn mirror_point(point: Point2D, q_i: Point2D, q_j: Point2D) -> Point2D {
    // Line as a*x + b*y + c = 0 with normal (a, b)
    let normal = DVec2::new(q_i.y - q_j.y, q_j.x - q_i.x);
    let c = -normal.dot(q_i.vec());
    let offset = (normal.dot(point.vec()) + c) / normal.length_squared();
    Point2D::from(point.vec() - 2.0 * offset * normal)
}

/// Rotate `point` about `pivot` by `degrees`, counterclockwise positive
pub fn rotate_point(point: Point2D, pivot: Point2D, degrees: f64) -> Point2D {
    let offset = (point - pivot).vec();
    pivot + Point2D::from(DVec2::from_angle(degrees.to_radians()).rotate(offset))
}

/// Point on a circle at angle `theta`
pub fn point_on_circle(center: Point2D, radius: f64, theta: f64) -> Point2D {
    center + Point2D::from_angle(theta) * radius
}

/// Solve the arc around `center` through two endpoints
///
/// Returns the radius and the `(start, end)` angle interval. When `radius`
/// is given it must agree with the endpoints.
pub fn three_point_with_midpoint(
    center: Point2D,
    radius: Option<f64>,
    endpoint_1: Point2D,
    endpoint_2: Point2D,
    clockwise: bool,
) -> CadResult<(f64, (f64, f64))> {
    let r1 = center.distance(endpoint_1);
    let r2 = center.distance(endpoint_2);
    if !is_close(r1, r2) {
        return Err(CadError::parameter(
            "No valid arc can be created from provided endpoints",
        ));
    }

    let radius = match radius {
        None => r1,
        Some(r) if is_close(r, r1) => r,
        Some(_) => {
            return Err(CadError::parameter(
                "Endpoints do not match the provided radius",
            ));
        }
    };

    let theta_1 = normalize_angle((endpoint_1 - center).angle());
    let theta_2 = normalize_angle((endpoint_2 - center).angle());
    let low = theta_1.min(theta_2);
    let high = theta_1.max(theta_2);

    let interval = if (theta_1 - theta_2).abs() <= PI {
        if clockwise { (high, low) } else { (low, high) }
    } else if clockwise {
        (low, high)
    } else {
        (high, low)
    };

    Ok((radius, interval))
}

/// Geometry of a fillet between two lines sharing a vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilletSolution {
    pub center: Point2D,
    pub radius: f64,
    /// Trimmed `(start, end)` of the first line
    pub line_1: (Point2D, Point2D),
    /// Trimmed `(start, end)` of the second line
    pub line_2: (Point2D, Point2D),
    /// Tangent point on the first line
    pub tangent_1: Point2D,
    /// Tangent point on the second line
    pub tangent_2: Point2D,
}

/// Which end of each line sits on the shared vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SharedEnd {
    Start,
    End,
}

fn shared_vertex(
    line_1: (Point2D, Point2D),
    line_2: (Point2D, Point2D),
) -> Option<(SharedEnd, SharedEnd)> {
    let ends = |line: (Point2D, Point2D)| [(SharedEnd::Start, line.0), (SharedEnd::End, line.1)];
    for (end_1, p1) in ends(line_1) {
        for (end_2, p2) in ends(line_2) {
            if p1.approx_eq(p2) {
                return Some((end_1, end_2));
            }
        }
    }
    None
}

fn far_end(line: (Point2D, Point2D), shared: SharedEnd) -> Point2D {
    match shared {
        SharedEnd::Start => line.1,
        SharedEnd::End => line.0,
    }
}

fn trim(line: (Point2D, Point2D), shared: SharedEnd, tangent: Point2D) -> (Point2D, Point2D) {
    match shared {
        SharedEnd::Start => (tangent, line.1),
        SharedEnd::End => (line.0, tangent),
    }
}

/// Round the corner between two lines with an arc of `radius`
///
/// Lines are `(start, end)` pairs. They must share an endpoint; the shared
/// end of each line is pulled back to its tangent point.
pub fn compute_fillet(
    line_1: (Point2D, Point2D),
    line_2: (Point2D, Point2D),
    radius: f64,
) -> CadResult<FilletSolution> {
    if radius <= 0.0 {
        return Err(CadError::feature("Fillet radius must be positive"));
    }

    let (shared_1, shared_2) = shared_vertex(line_1, line_2)
        .ok_or_else(|| CadError::feature("Line entities need to share a point for a fillet"))?;

    let vertex = match shared_1 {
        SharedEnd::Start => line_1.0,
        SharedEnd::End => line_1.1,
    };
    let far_1 = far_end(line_1, shared_1);
    let far_2 = far_end(line_2, shared_2);

    // Opening angle from the triangle (vertex, far_1, far_2)
    let a = vertex.distance(far_1);
    let b = vertex.distance(far_2);
    let c = far_1.distance(far_2);
    if a < POINT_TOLERANCE || b < POINT_TOLERANCE {
        return Err(CadError::feature("Cannot fillet a zero-length line"));
    }
    let cos_opening = ((a * a + b * b - c * c) / (2.0 * a * b)).clamp(-1.0, 1.0);
    let opening = cos_opening.acos();
    if opening < 1e-9 || PI - opening < 1e-9 {
        return Err(CadError::feature("Cannot fillet collinear lines"));
    }

    let u_1 = (far_1 - vertex).vec() / a;
    let u_2 = (far_2 - vertex).vec() / b;
    let bisector = (u_1 + u_2).normalize();
    let center_offset = radius / (opening / 2.0).sin();

    // Try both sides of the vertex and keep the one that shortens the lines
    let candidate = |sign: f64| {
        let center = vertex.vec() + bisector * (sign * center_offset);
        let to_center = center - vertex.vec();
        let tangent_1 = Point2D::from(vertex.vec() + u_1 * to_center.dot(u_1));
        let tangent_2 = Point2D::from(vertex.vec() + u_2 * to_center.dot(u_2));
        let trimmed = tangent_1.distance(far_1) + tangent_2.distance(far_2);
        (Point2D::from(center), tangent_1, tangent_2, trimmed)
    };
    let positive = candidate(1.0);
    let negative = candidate(-1.0);
    let (center, tangent_1, tangent_2, _) = if positive.3 <= negative.3 {
        positive
    } else {
        negative
    };

    let setback = radius / (opening / 2.0).tan();
    if setback >= a || setback >= b {
        return Err(CadError::feature(format!(
            "Fillet radius {} is too large for the selected lines",
            radius
        )));
    }

    Ok(FilletSolution {
        center,
        radius,
        line_1: trim(line_1, shared_1, tangent_1),
        line_2: trim(line_2, shared_2, tangent_2),
        tangent_1,
        tangent_2,
    })
}
