//! Sketch items
//!
//! Items are local, pre-upload geometry. They are immutable values: every
//! transform returns a new item with a fresh id, and the owning sketch
//! swaps it in for the old one. Coordinates are stored in meters.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geometry::{mirror_point, point_on_circle, rotate_point, three_point_with_midpoint};
use crate::error::CadResult;
use crate::service::{CurveGeometry, SketchEntityModel};
use crate::units::Point2D;

/// Identity of a sketch item, also used as its wire entity id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    /// Random id (UUID v4 without hyphens)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Raw id string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn point(&self, suffix: &str) -> String {
        format!("{}.{}", self.0, suffix)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Straight segment
#[derive(Debug, Clone, PartialEq)]
pub struct SketchLine {
    id: ItemId,
    start: Point2D,
    end: Point2D,
}

impl SketchLine {
    /// Line from `start` to `end` with a fresh id
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self {
            id: ItemId::generate(),
            start,
            end,
        }
    }

    /// Item id
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Start point, in meters
    pub fn start(&self) -> Point2D {
        self.start
    }

    /// End point, in meters
    pub fn end(&self) -> Point2D {
        self.end
    }

    /// Vector from start to end
    pub fn delta(&self) -> Point2D {
        self.end - self.start
    }

    /// Horizontal extent
    pub fn dx(&self) -> f64 {
        self.delta().x
    }

    /// Vertical extent
    pub fn dy(&self) -> f64 {
        self.delta().y
    }

    /// Segment length
    pub fn length(&self) -> f64 {
        self.delta().length()
    }

    /// Angle from the +x axis
    pub fn theta(&self) -> f64 {
        self.delta().angle()
    }

    /// Unit vector from start to end
    pub fn direction(&self) -> Point2D {
        Point2D::from_angle(self.theta())
    }

    /// Same line identity with new endpoints
    pub(crate) fn with_endpoints(&self, start: Point2D, end: Point2D) -> Self {
        Self {
            id: self.id.clone(),
            start,
            end,
        }
    }

    /// Copy shifted by `offset`
    pub fn translate(&self, offset: Point2D) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    /// Copy rotated about `pivot`
    pub fn rotate(&self, pivot: Point2D, degrees: f64) -> Self {
        Self::new(
            rotate_point(self.start, pivot, degrees),
            rotate_point(self.end, pivot, degrees),
        )
    }

    /// Copy reflected across the line through two points
    pub fn mirror(&self, line_start: Point2D, line_end: Point2D) -> Self {
        Self::new(
            mirror_point(self.start, line_start, line_end),
            mirror_point(self.end, line_start, line_end),
        )
    }

    /// Wire entity for this line
    pub fn to_model(&self) -> SketchEntityModel {
        let direction = self.direction();
        SketchEntityModel::Segment {
            entity_id: self.id.to_string(),
            start_point_id: self.id.point("start"),
            end_point_id: self.id.point("end"),
            start_param: 0.0,
            end_param: self.length(),
            center_id: None,
            geometry: CurveGeometry::Line {
                pnt_x: self.start.x,
                pnt_y: self.start.y,
                dir_x: direction.x,
                dir_y: direction.y,
            },
        }
    }
}

/// Full circle
#[derive(Debug, Clone, PartialEq)]
pub struct SketchCircle {
    id: ItemId,
    center: Point2D,
    radius: f64,
    direction: Point2D,
    clockwise: bool,
}

impl SketchCircle {
    /// Counterclockwise circle with a fresh id
    pub fn new(center: Point2D, radius: f64) -> Self {
        Self {
            id: ItemId::generate(),
            center,
            radius,
            direction: Point2D::new(1.0, 0.0),
            clockwise: false,
        }
    }

    /// Item id
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Center, in meters
    pub fn center(&self) -> Point2D {
        self.center
    }

    /// Radius, in meters
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Orientation flag sent with the geometry
    pub fn clockwise(&self) -> bool {
        self.clockwise
    }

    fn moved(&self, center: Point2D) -> Self {
        Self {
            id: ItemId::generate(),
            center,
            ..self.clone()
        }
    }

    /// Copy shifted by `offset`
    pub fn translate(&self, offset: Point2D) -> Self {
        self.moved(self.center + offset)
    }

    /// Copy rotated about `pivot`
    pub fn rotate(&self, pivot: Point2D, degrees: f64) -> Self {
        self.moved(rotate_point(self.center, pivot, degrees))
    }

    /// Copy reflected across the line through two points
    pub fn mirror(&self, line_start: Point2D, line_end: Point2D) -> Self {
        self.moved(mirror_point(self.center, line_start, line_end))
    }

    /// Wire entity for this circle
    pub fn to_model(&self) -> SketchEntityModel {
        SketchEntityModel::Curve {
            entity_id: self.id.to_string(),
            center_id: self.id.point("center"),
            geometry: CurveGeometry::Circle {
                radius: self.radius,
                x_center: self.center.x,
                y_center: self.center.y,
                x_dir: self.direction.x,
                y_dir: self.direction.y,
                clockwise: self.clockwise,
            },
        }
    }
}

/// Circular arc over a `(start, end)` angle interval, in radians
#[derive(Debug, Clone, PartialEq)]
pub struct SketchArc {
    id: ItemId,
    center: Point2D,
    radius: f64,
    theta_interval: (f64, f64),
    direction: Point2D,
    clockwise: bool,
}

impl SketchArc {
    /// Counterclockwise arc over `theta_interval` (radians)
    pub fn new(center: Point2D, radius: f64, theta_interval: (f64, f64)) -> Self {
        Self {
            id: ItemId::generate(),
            center,
            radius,
            theta_interval,
            direction: Point2D::new(1.0, 0.0),
            clockwise: false,
        }
    }

    /// Arc around `center` between two endpoints; see
    /// [`three_point_with_midpoint`](super::geometry::three_point_with_midpoint)
    pub fn three_point_with_midpoint(
        center: Point2D,
        radius: Option<f64>,
        endpoint_1: Point2D,
        endpoint_2: Point2D,
        clockwise: bool,
    ) -> CadResult<Self> {
        let (radius, theta_interval) =
            three_point_with_midpoint(center, radius, endpoint_1, endpoint_2, clockwise)?;
        Ok(Self {
            clockwise,
            ..Self::new(center, radius, theta_interval)
        })
    }

    /// Item id
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Center, in meters
    pub fn center(&self) -> Point2D {
        self.center
    }

    /// Radius, in meters
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// `(start, end)` angles in radians
    pub fn theta_interval(&self) -> (f64, f64) {
        self.theta_interval
    }

    /// Orientation flag sent with the geometry
    pub fn clockwise(&self) -> bool {
        self.clockwise
    }

    /// Point at the start angle
    pub fn start_point(&self) -> Point2D {
        point_on_circle(self.center, self.radius, self.theta_interval.0)
    }

    /// Point at the end angle
    pub fn end_point(&self) -> Point2D {
        point_on_circle(self.center, self.radius, self.theta_interval.1)
    }

    fn placed(&self, center: Point2D, theta_interval: (f64, f64)) -> Self {
        Self {
            id: ItemId::generate(),
            center,
            theta_interval,
            ..self.clone()
        }
    }

    /// Copy shifted by `offset`
    pub fn translate(&self, offset: Point2D) -> Self {
        self.placed(self.center + offset, self.theta_interval)
    }

    /// Copy rotated about `pivot`; the interval turns with it
    pub fn rotate(&self, pivot: Point2D, degrees: f64) -> Self {
        let delta = degrees.to_radians();
        self.placed(
            rotate_point(self.center, pivot, degrees),
            (self.theta_interval.0 + delta, self.theta_interval.1 + delta),
        )
    }

    /// Reflection reverses orientation, so the interval bounds swap
    pub fn mirror(&self, line_start: Point2D, line_end: Point2D) -> Self {
        let alpha = (line_end - line_start).angle();
        let (start, end) = self.theta_interval;
        self.placed(
            mirror_point(self.center, line_start, line_end),
            (2.0 * alpha - end, 2.0 * alpha - start),
        )
    }

    /// Wire entity for this arc
    pub fn to_model(&self) -> SketchEntityModel {
        SketchEntityModel::Segment {
            entity_id: self.id.to_string(),
            start_point_id: self.id.point("start"),
            end_point_id: self.id.point("end"),
            start_param: self.theta_interval.0,
            end_param: self.theta_interval.1,
            center_id: Some(self.id.point("center")),
            geometry: CurveGeometry::Circle {
                radius: self.radius,
                x_center: self.center.x,
                y_center: self.center.y,
                x_dir: self.direction.x,
                y_dir: self.direction.y,
                clockwise: self.clockwise,
            },
        }
    }
}

/// Any item a sketch can hold
#[derive(Debug, Clone, PartialEq)]
pub enum SketchItem {
    Line(SketchLine),
    Circle(SketchCircle),
    Arc(SketchArc),
}

impl SketchItem {
    /// Item id
    pub fn id(&self) -> &ItemId {
        match self {
            SketchItem::Line(l) => l.id(),
            SketchItem::Circle(c) => c.id(),
            SketchItem::Arc(a) => a.id(),
        }
    }

    /// Point a pattern steps from: line start, circle or arc center
    pub fn anchor(&self) -> Point2D {
        match self {
            SketchItem::Line(l) => l.start(),
            SketchItem::Circle(c) => c.center(),
            SketchItem::Arc(a) => a.center(),
        }
    }

    /// Copy shifted by `offset`
    pub fn translate(&self, offset: Point2D) -> Self {
        match self {
            SketchItem::Line(l) => SketchItem::Line(l.translate(offset)),
            SketchItem::Circle(c) => SketchItem::Circle(c.translate(offset)),
            SketchItem::Arc(a) => SketchItem::Arc(a.translate(offset)),
        }
    }

    /// Copy rotated about `pivot`
    pub fn rotate(&self, pivot: Point2D, degrees: f64) -> Self {
        match self {
            SketchItem::Line(l) => SketchItem::Line(l.rotate(pivot, degrees)),
            SketchItem::Circle(c) => SketchItem::Circle(c.rotate(pivot, degrees)),
            SketchItem::Arc(a) => SketchItem::Arc(a.rotate(pivot, degrees)),
        }
    }

    /// Copy reflected across the line through two points
    pub fn mirror(&self, line_start: Point2D, line_end: Point2D) -> Self {
        match self {
            SketchItem::Line(l) => SketchItem::Line(l.mirror(line_start, line_end)),
            SketchItem::Circle(c) => SketchItem::Circle(c.mirror(line_start, line_end)),
            SketchItem::Arc(a) => SketchItem::Arc(a.mirror(line_start, line_end)),
        }
    }

    /// Wire entity for this item
    pub fn to_model(&self) -> SketchEntityModel {
        match self {
            SketchItem::Line(l) => l.to_model(),
            SketchItem::Circle(c) => c.to_model(),
            SketchItem::Arc(a) => a.to_model(),
        }
    }

    /// The line, if this is one
    pub fn as_line(&self) -> Option<&SketchLine> {
        match self {
            SketchItem::Line(l) => Some(l),
            _ => None,
        }
    }

    /// The circle, if this is one
    pub fn as_circle(&self) -> Option<&SketchCircle> {
        match self {
            SketchItem::Circle(c) => Some(c),
            _ => None,
        }
    }

    /// The arc, if this is one
    pub fn as_arc(&self) -> Option<&SketchArc> {
        match self {
            SketchItem::Arc(a) => Some(a),
            _ => None,
        }
    }
}

impl From<SketchLine> for SketchItem {
    fn from(line: SketchLine) -> Self {
        SketchItem::Line(line)
    }
}

impl From<SketchCircle> for SketchItem {
    fn from(circle: SketchCircle) -> Self {
        SketchItem::Circle(circle)
    }
}

impl From<SketchArc> for SketchItem {
    fn from(arc: SketchArc) -> Self {
        SketchItem::Arc(arc)
    }
}

impl fmt::Display for SketchItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchItem::Line(l) => write!(f, "Line(start={}, end={})", l.start, l.end),
            SketchItem::Circle(c) => {
                write!(f, "Circle(radius={}, center={})", c.radius, c.center)
            }
            SketchItem::Arc(a) => write!(
                f,
                "Arc(center={}, radius={}, interval={}<θ<{})",
                a.center, a.radius, a.theta_interval.0, a.theta_interval.1
            ),
        }
    }
}

/// Anything that names a sketch item
pub trait ItemRef {
    fn item_id(&self) -> &ItemId;
}

impl ItemRef for ItemId {
    fn item_id(&self) -> &ItemId {
        self
    }
}

impl ItemRef for SketchLine {
    fn item_id(&self) -> &ItemId {
        self.id()
    }
}

impl ItemRef for SketchCircle {
    fn item_id(&self) -> &ItemId {
        self.id()
    }
}

impl ItemRef for SketchArc {
    fn item_id(&self) -> &ItemId {
        self.id()
    }
}

impl ItemRef for SketchItem {
    fn item_id(&self) -> &ItemId {
        self.id()
    }
}
