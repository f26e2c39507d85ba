//! Units and 2D points
//!
//! Sketch geometry is stored in meters. Values cross into and out of the
//! caller's unit system only at public boundaries.

use std::fmt;
use std::ops::{Add, Deref, Div, Mul, Neg, Sub};
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{CadError, CadResult};

/// Meters per inch
pub const METERS_PER_INCH: f64 = 0.0254;

/// Distance under which two points are treated as coincident
pub const POINT_TOLERANCE: f64 = 1e-8;

/// Unit system used by a client session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Inch,
    Metric,
}

impl UnitSystem {
    /// Suffix used in quantity expressions, e.g. `1.5 in`
    pub fn extension(&self) -> &'static str {
        match self {
            UnitSystem::Inch => "in",
            UnitSystem::Metric => "m",
        }
    }

    /// Unit name used inside generated FeatureScript
    pub fn fs_name(&self) -> &'static str {
        match self {
            UnitSystem::Inch => "inch",
            UnitSystem::Metric => "meter",
        }
    }

    /// Meters per unit of this system
    pub fn meters_per_unit(&self) -> f64 {
        match self {
            UnitSystem::Inch => METERS_PER_INCH,
            UnitSystem::Metric => 1.0,
        }
    }

    /// Convert a length in this unit system to meters
    pub fn to_meters(&self, value: f64) -> f64 {
        value * self.meters_per_unit()
    }

    /// Convert a length in meters to this unit system
    pub fn from_meters(&self, meters: f64) -> f64 {
        meters / self.meters_per_unit()
    }

    /// Convert a point in this unit system to meters
    pub fn point_to_meters(&self, point: Point2D) -> Point2D {
        point * self.meters_per_unit()
    }

    /// Convert a point in meters to this unit system
    pub fn point_from_meters(&self, point: Point2D) -> Point2D {
        point / self.meters_per_unit()
    }

    /// Render a quantity expression such as `2 in`
    pub fn expression(&self, value: f64) -> String {
        format!("{} {}", value, self.extension())
    }
}

impl FromStr for UnitSystem {
    type Err = CadError;

    fn from_str(s: &str) -> CadResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "inch" => Ok(UnitSystem::Inch),
            "metric" => Ok(UnitSystem::Metric),
            other => Err(CadError::parameter(format!(
                "'{}' is not a valid unit system. Options are: inch, metric",
                other
            ))),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Inch => write!(f, "inch"),
            UnitSystem::Metric => write!(f, "metric"),
        }
    }
}

/// A point (or vector) in the sketch plane
///
/// Thin wrapper over [`DVec2`]; derefs to it for `x`, `y` and the rest of
/// the glam vector API.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Point2D(DVec2);

impl Point2D {
    pub const ORIGIN: Point2D = Point2D(DVec2::ZERO);

    pub const fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    pub fn from_pair(pair: (f64, f64)) -> Self {
        Self::new(pair.0, pair.1)
    }

    pub fn as_tuple(&self) -> (f64, f64) {
        (self.0.x, self.0.y)
    }

    /// Unit vector at `theta` radians from the +x axis
    pub fn from_angle(theta: f64) -> Self {
        Self(DVec2::from_angle(theta))
    }

    /// Underlying glam vector
    pub fn vec(self) -> DVec2 {
        self.0
    }

    pub fn length(&self) -> f64 {
        self.0.length()
    }

    pub fn distance(&self, other: Point2D) -> f64 {
        self.0.distance(other.0)
    }

    pub fn dot(&self, other: Point2D) -> f64 {
        self.0.dot(other.0)
    }

    /// Angle from the +x axis, in `(-π, π]`
    pub fn angle(&self) -> f64 {
        self.0.to_angle()
    }

    /// Tolerant comparison, see [`POINT_TOLERANCE`]
    pub fn approx_eq(&self, other: Point2D) -> bool {
        self.approx_eq_within(other, POINT_TOLERANCE)
    }

    pub fn approx_eq_within(&self, other: Point2D, error: f64) -> bool {
        self.distance(other) < error
    }
}

impl Deref for Point2D {
    type Target = DVec2;

    fn deref(&self) -> &DVec2 {
        &self.0
    }
}

impl From<DVec2> for Point2D {
    fn from(v: DVec2) -> Self {
        Self(v)
    }
}

impl From<Point2D> for DVec2 {
    fn from(p: Point2D) -> Self {
        p.0
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(pair: (f64, f64)) -> Self {
        Self::from_pair(pair)
    }
}

impl Add for Point2D {
    type Output = Point2D;

    fn add(self, rhs: Point2D) -> Point2D {
        Point2D(self.0 + rhs.0)
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D(self.0 - rhs.0)
    }
}

impl Mul<f64> for Point2D {
    type Output = Point2D;

    fn mul(self, rhs: f64) -> Point2D {
        Point2D(self.0 * rhs)
    }
}

impl Div<f64> for Point2D {
    type Output = Point2D;

    fn div(self, rhs: f64) -> Point2D {
        Point2D(self.0 / rhs)
    }
}

impl Neg for Point2D {
    type Output = Point2D;

    fn neg(self) -> Point2D {
        Point2D(-self.0)
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0.x, self.0.y)
    }
}
