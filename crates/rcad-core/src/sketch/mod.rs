//! Sketch Feature
//!
//! A sketch is uploaded empty as soon as it is created, then updated after
//! every change to its items. Items are kept in meters; values cross the
//! public API in the studio's unit system.

pub mod geometry;
mod items;

pub use items::{ItemId, ItemRef, SketchArc, SketchCircle, SketchItem, SketchLine};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::{debug, info};

use self::geometry::compute_fillet;
use crate::error::{CadError, CadResult};
use crate::feature::{Feature, FeatureBinding, FeatureKind, update_feature, upload_feature};
use crate::query::script::sketch_region_script;
use crate::query::{EntityFilter, FaceEntity, FaceEntityConvertible, kind, transient_ids};
use crate::service::{FeatureModel, FeatureParameter};
use crate::studio::PartStudio;
use crate::units::{Point2D, UnitSystem};

pub struct Sketch {
    studio: PartStudio,
    binding: FeatureBinding,
    name: String,
    plane: Vec<FaceEntity>,
    items: BTreeMap<ItemId, SketchItem>,
}

impl Sketch {
    /// Create a sketch on `plane` and upload it
    pub(crate) fn create<P: FaceEntityConvertible + ?Sized>(
        studio: &PartStudio,
        plane: &P,
        name: impl Into<String>,
    ) -> CadResult<Self> {
        let mut sketch = Self {
            studio: studio.clone(),
            binding: FeatureBinding::default(),
            name: name.into(),
            plane: plane.face_entities()?,
            items: BTreeMap::new(),
        };

        let id = upload_feature(&sketch)?;
        sketch.binding.bind(id)?;
        Ok(sketch)
    }

    // ============== Items ==============

    /// Every item currently on the sketch, ordered by id
    pub fn items(&self) -> impl Iterator<Item = &SketchItem> {
        self.items.values()
    }

    /// Number of items
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Item by id
    pub fn item(&self, id: &ItemId) -> Option<&SketchItem> {
        self.items.get(id)
    }

    /// Remove an item and push the change
    pub fn remove_item(&mut self, item: &impl ItemRef) -> CadResult<SketchItem> {
        let removed = self.items.remove(item.item_id()).ok_or_else(|| {
            CadError::parameter(format!("Sketch '{}' has no item {}", self.name, item.item_id()))
        })?;
        info!("Removed {} from sketch '{}'", removed, self.name);
        self.sync()?;
        Ok(removed)
    }

    fn insert(&mut self, item: impl Into<SketchItem>) -> SketchItem {
        let item = item.into();
        info!("Added {} to sketch '{}'", item, self.name);
        self.items.insert(item.id().clone(), item.clone());
        item
    }

    fn get(&self, item: &impl ItemRef) -> CadResult<&SketchItem> {
        self.items.get(item.item_id()).ok_or_else(|| {
            CadError::parameter(format!("Sketch '{}' has no item {}", self.name, item.item_id()))
        })
    }

    fn sync(&self) -> CadResult<()> {
        update_feature(self)
    }

    fn units(&self) -> UnitSystem {
        self.studio.units()
    }

    fn to_meters(&self, point: impl Into<Point2D>) -> Point2D {
        self.units().point_to_meters(point.into())
    }

    // ============== Construction ==============

    /// Add a circle; `center` and `radius` are in session units
    pub fn add_circle(&mut self, center: impl Into<Point2D>, radius: f64) -> CadResult<SketchCircle> {
        self.add_circle_with_units(center, radius, self.units())
    }

    /// Add a circle given in `units` rather than the studio's unit system
    pub fn add_circle_with_units(
        &mut self,
        center: impl Into<Point2D>,
        radius: f64,
        units: UnitSystem,
    ) -> CadResult<SketchCircle> {
        if radius <= 0.0 {
            return Err(CadError::parameter("Circle radius must be positive"));
        }
        let circle = SketchCircle::new(units.point_to_meters(center.into()), units.to_meters(radius));
        self.insert(circle.clone());
        self.sync()?;
        Ok(circle)
    }

    /// Add a line; endpoints are in session units
    pub fn add_line(
        &mut self,
        start: impl Into<Point2D>,
        end: impl Into<Point2D>,
    ) -> CadResult<SketchLine> {
        let line = SketchLine::new(self.to_meters(start), self.to_meters(end));
        self.insert(line.clone());
        self.sync()?;
        Ok(line)
    }

    /// Connect consecutive points with lines
    ///
    /// With `end_connect`, one more line closes the loop from the last
    /// point back to the first.
    pub fn trace_points<P: Into<Point2D> + Copy>(
        &mut self,
        points: &[P],
        end_connect: bool,
    ) -> CadResult<Vec<SketchLine>> {
        if points.len() < 2 {
            return Err(CadError::parameter("Tracing needs at least two points"));
        }

        let points: Vec<Point2D> = points.iter().map(|p| self.to_meters(*p)).collect();
        let mut segments: Vec<(Point2D, Point2D)> =
            points.windows(2).map(|w| (w[0], w[1])).collect();
        if end_connect {
            if let (Some(first), Some(last)) = (points.first(), points.last()) {
                segments.push((*last, *first));
            }
        }

        let lines: Vec<SketchLine> = segments
            .into_iter()
            .map(|(start, end)| SketchLine::new(start, end))
            .collect();
        for line in &lines {
            self.insert(line.clone());
        }
        self.sync()?;
        Ok(lines)
    }

    /// Axis-aligned rectangle from two opposite corners
    pub fn add_corner_rectangle(
        &mut self,
        corner_1: impl Into<Point2D>,
        corner_2: impl Into<Point2D>,
    ) -> CadResult<Vec<SketchLine>> {
        let (p1, p2) = (corner_1.into(), corner_2.into());
        self.trace_points(
            &[
                Point2D::new(p1.x, p1.y),
                Point2D::new(p2.x, p1.y),
                Point2D::new(p2.x, p2.y),
                Point2D::new(p1.x, p2.y),
            ],
            true,
        )
    }

    /// Arc around `center` from `start_angle` to `end_angle`, in degrees
    pub fn add_centerpoint_arc(
        &mut self,
        center: impl Into<Point2D>,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> CadResult<SketchArc> {
        if radius <= 0.0 {
            return Err(CadError::parameter("Arc radius must be positive"));
        }
        let arc = SketchArc::new(
            self.to_meters(center),
            self.units().to_meters(radius),
            (start_angle.to_radians(), end_angle.to_radians()),
        );
        self.insert(arc.clone());
        self.sync()?;
        Ok(arc)
    }

    /// Round the shared corner of two lines
    ///
    /// Both lines are trimmed back to the tangent points, keeping their
    /// ids, and the new arc is returned.
    pub fn add_fillet(
        &mut self,
        line_1: &impl ItemRef,
        line_2: &impl ItemRef,
        radius: f64,
    ) -> CadResult<SketchArc> {
        if line_1.item_id() == line_2.item_id() {
            return Err(CadError::feature("Cannot fillet a line with itself"));
        }

        let as_line = |item: &SketchItem| {
            item.as_line().cloned().ok_or_else(|| {
                CadError::parameter(format!("Only lines can be filleted, got {}", item))
            })
        };
        let first = as_line(self.get(line_1)?)?;
        let second = as_line(self.get(line_2)?)?;

        let solution = compute_fillet(
            (first.start(), first.end()),
            (second.start(), second.end()),
            self.units().to_meters(radius),
        )?;
        let arc = SketchArc::three_point_with_midpoint(
            solution.center,
            Some(solution.radius),
            solution.tangent_1,
            solution.tangent_2,
            false,
        )?;

        self.insert(first.with_endpoints(solution.line_1.0, solution.line_1.1));
        self.insert(second.with_endpoints(solution.line_2.0, solution.line_2.1));
        self.insert(arc.clone());
        self.sync()?;
        Ok(arc)
    }

    // ============== Transforms ==============

    /// Apply `transform` to each item; the results replace the originals,
    /// or join them when `copy` is set. One update covers the whole batch.
    fn transform_items<R, T>(&mut self, items: &[R], copy: bool, transform: T) -> CadResult<Vec<SketchItem>>
    where
        R: ItemRef,
        T: Fn(&SketchItem) -> SketchItem,
    {
        // Each item moves once, however often it is listed
        let mut seen = BTreeSet::new();
        let mut originals = Vec::with_capacity(items.len());
        for item in items {
            if seen.insert(item.item_id().clone()) {
                originals.push(self.get(item)?.clone());
            }
        }

        let mut created = Vec::with_capacity(originals.len());
        for original in &originals {
            let moved = transform(original);
            if !copy {
                self.items.remove(original.id());
            }
            created.push(self.insert(moved));
        }
        self.sync()?;
        Ok(created)
    }

    /// Move items by `(dx, dy)`
    pub fn translate<R: ItemRef>(
        &mut self,
        items: &[R],
        dx: f64,
        dy: f64,
        copy: bool,
    ) -> CadResult<Vec<SketchItem>> {
        let offset = self.to_meters((dx, dy));
        self.transform_items(items, copy, |item| item.translate(offset))
    }

    /// Rotate items about `origin` by `degrees`, counterclockwise
    pub fn rotate<R: ItemRef>(
        &mut self,
        items: &[R],
        origin: impl Into<Point2D>,
        degrees: f64,
        copy: bool,
    ) -> CadResult<Vec<SketchItem>> {
        let pivot = self.to_meters(origin);
        self.transform_items(items, copy, |item| item.rotate(pivot, degrees))
    }

    /// Reflect items across the line through `line_start` and `line_end`
    pub fn mirror<R: ItemRef>(
        &mut self,
        items: &[R],
        line_start: impl Into<Point2D>,
        line_end: impl Into<Point2D>,
        copy: bool,
    ) -> CadResult<Vec<SketchItem>> {
        let (q_i, q_j) = (self.to_meters(line_start), self.to_meters(line_end));
        if q_i.approx_eq(q_j) {
            return Err(CadError::parameter("Mirror line needs two distinct points"));
        }
        self.transform_items(items, copy, |item| item.mirror(q_i, q_j))
    }

    /// Step copies of `item`, each from the previous one
    fn pattern<T>(&mut self, item: &impl ItemRef, num_steps: usize, step: T) -> CadResult<Vec<SketchItem>>
    where
        T: Fn(&SketchItem) -> SketchItem,
    {
        let mut pattern = vec![self.get(item)?.clone()];
        for _ in 0..num_steps {
            let next = pattern.last().map(&step);
            if let Some(next) = next {
                pattern.push(self.insert(next));
            }
        }
        debug!("Patterned {} into {} items", item.item_id(), pattern.len());
        self.sync()?;
        Ok(pattern)
    }

    /// `num_steps` copies, each offset `(dx, dy)` from the last
    ///
    /// Returns the original followed by the copies.
    pub fn linear_pattern(
        &mut self,
        item: &impl ItemRef,
        num_steps: usize,
        dx: f64,
        dy: f64,
    ) -> CadResult<Vec<SketchItem>> {
        let offset = self.to_meters((dx, dy));
        self.pattern(item, num_steps, |i| i.translate(offset))
    }

    /// `num_steps` copies, each rotated `degrees` about `origin` from the last
    ///
    /// Returns the original followed by the copies.
    pub fn circular_pattern(
        &mut self,
        item: &impl ItemRef,
        origin: impl Into<Point2D>,
        num_steps: usize,
        degrees: f64,
    ) -> CadResult<Vec<SketchItem>> {
        let pivot = self.to_meters(origin);
        self.pattern(item, num_steps, |i| i.rotate(pivot, degrees))
    }

    // ============== Entities ==============

    /// Sketch vertices, queried fresh
    pub fn vertices(&self) -> CadResult<EntityFilter<kind::Vertex>> {
        self.entities()?.is_type::<kind::Vertex>()
    }

    /// Sketch edges, queried fresh
    pub fn edges(&self) -> CadResult<EntityFilter<kind::Edge>> {
        self.entities()?.is_type::<kind::Edge>()
    }

    /// Sketch faces, queried fresh
    pub fn faces(&self) -> CadResult<EntityFilter<kind::Face>> {
        self.entities()?.is_type::<kind::Face>()
    }

    /// Closed regions bounded by the sketch's curves
    pub fn regions(&self) -> CadResult<EntityFilter<kind::Face>> {
        let id = self.binding.require(&self.name)?;
        let ids = self.studio.eval_transient_ids(&sketch_region_script(id))?;
        Ok(EntityFilter::new(
            self.studio.clone(),
            ids.into_iter().map(|id| FaceEntity::new(id)).collect(),
        ))
    }

    /// Plane the sketch was created on
    pub fn plane(&self) -> &[FaceEntity] {
        &self.plane
    }
}

impl Feature for Sketch {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> Option<&str> {
        self.binding.get()
    }

    fn kind(&self) -> FeatureKind {
        FeatureKind::Sketch
    }

    fn partstudio(&self) -> &PartStudio {
        &self.studio
    }

    fn to_model(&self) -> CadResult<FeatureModel> {
        Ok(FeatureModel::sketch(
            &self.name,
            vec![
                FeatureParameter::query_list("sketchPlane", transient_ids(&self.plane)),
                FeatureParameter::boolean("disableImprinting", true),
            ],
            self.items.values().map(SketchItem::to_model).collect(),
        ))
    }
}

impl FaceEntityConvertible for Sketch {
    fn face_entities(&self) -> CadResult<Vec<FaceEntity>> {
        Ok(self.faces()?.into_entities())
    }
}

impl fmt::Debug for Sketch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sketch(\"{}\")", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    use crate::service::ElementTarget;
    use crate::service::SketchEntityModel;
    use crate::service::mock::MockService;
    use crate::sketch::geometry::rotate_point;
    use crate::units::METERS_PER_INCH;

    fn setup(units: UnitSystem) -> (Arc<MockService>, Sketch) {
        let mock = Arc::new(MockService::new());
        let studio = PartStudio::new(mock.clone(), ElementTarget::new("d", "w", "e"), units);
        let plane = vec![FaceEntity::new("JDC")];
        let sketch = Sketch::create(&studio, &plane, "Base Sketch").unwrap();
        (mock, sketch)
    }

    fn assert_point_eq(a: Point2D, b: Point2D) {
        assert!(a.approx_eq_within(b, 1e-9), "{} != {}", a, b);
    }

    #[test]
    fn test_sketch_uploads_empty() {
        let (mock, sketch) = setup(UnitSystem::Inch);
        assert_eq!(sketch.id(), Some("F1"));

        let model = &mock.added()[0];
        assert_eq!(model.feature_type, "newSketch");
        assert_eq!(model.entities, Some(Vec::new()));
        assert_eq!(model.parameter("sketchPlane").unwrap().query_ids(), vec!["JDC"]);
        assert_eq!(
            model.parameter("disableImprinting"),
            Some(&FeatureParameter::boolean("disableImprinting", true))
        );
    }

    #[test]
    fn test_add_circle_converts_and_updates() {
        let (mock, mut sketch) = setup(UnitSystem::Inch);
        let circle = sketch.add_circle((1.0, 2.0), 0.5).unwrap();

        assert_relative_eq!(circle.radius(), 0.5 * METERS_PER_INCH);
        assert_point_eq(circle.center(), Point2D::new(0.0254, 0.0508));

        let updates = mock.updates();
        assert_eq!(updates.len(), 1);
        let (id, model) = &updates[0];
        assert_eq!(id, "F1");
        assert_eq!(model.feature_id.as_deref(), Some("F1"));
        let entities = model.entities.as_ref().unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].entity_id(), circle.id().as_str());
    }

    #[test]
    fn test_circle_with_explicit_units() {
        let (_mock, mut sketch) = setup(UnitSystem::Inch);
        let circle = sketch
            .add_circle_with_units((0.0, 0.0), 0.1, UnitSystem::Metric)
            .unwrap();
        assert_relative_eq!(circle.radius(), 0.1);
        assert!(sketch.add_circle((0.0, 0.0), 0.0).is_err());
    }

    #[test]
    fn test_corner_rectangle_is_closed_loop() {
        let (mock, mut sketch) = setup(UnitSystem::Metric);
        let lines = sketch.add_corner_rectangle((0.0, 0.0), (2.0, 1.0)).unwrap();

        assert_eq!(lines.len(), 4);
        assert_eq!(sketch.item_count(), 4);
        for pair in lines.windows(2) {
            assert_point_eq(pair[0].end(), pair[1].start());
        }
        assert_point_eq(lines[3].end(), lines[0].start());
        // one update for the whole trace
        assert_eq!(mock.updates().len(), 1);
    }

    #[test]
    fn test_trace_needs_two_points() {
        let (mock, mut sketch) = setup(UnitSystem::Metric);
        assert!(matches!(
            sketch.trace_points(&[(0.0, 0.0)], true),
            Err(CadError::Parameter(_))
        ));
        assert!(mock.updates().is_empty());
    }

    #[test]
    fn test_centerpoint_arc_in_radians() {
        let (_mock, mut sketch) = setup(UnitSystem::Metric);
        let arc = sketch.add_centerpoint_arc((0.0, 0.0), 1.0, 0.0, 90.0).unwrap();
        assert_relative_eq!(arc.theta_interval().1, std::f64::consts::FRAC_PI_2);
        assert_point_eq(arc.end_point(), Point2D::new(0.0, 1.0));
    }

    #[test]
    fn test_translate_replaces_item() {
        let (_mock, mut sketch) = setup(UnitSystem::Metric);
        let circle = sketch.add_circle((0.0, 0.0), 0.5).unwrap();

        let moved = sketch.translate(&[circle.clone()], 1.0, 0.0, false).unwrap();
        assert_eq!(moved.len(), 1);
        assert_eq!(sketch.item_count(), 1);
        assert!(sketch.item(circle.id()).is_none());
        assert_point_eq(moved[0].anchor(), Point2D::new(1.0, 0.0));
    }

    #[test]
    fn test_translate_repeated_item_moves_once() {
        let (mock, mut sketch) = setup(UnitSystem::Metric);
        let circle = sketch.add_circle((0.0, 0.0), 0.5).unwrap();
        let updates_before = mock.updates().len();

        let moved = sketch
            .translate(&[circle.clone(), circle.clone()], 1.0, 0.0, false)
            .unwrap();
        assert_eq!(moved.len(), 1);
        assert_eq!(sketch.item_count(), 1);
        assert_point_eq(moved[0].anchor(), Point2D::new(1.0, 0.0));
        assert_eq!(mock.updates().len(), updates_before + 1);
    }

    #[test]
    fn test_rejected_update_is_feature_error() {
        let (mock, mut sketch) = setup(UnitSystem::Inch);
        mock.push_status("ERROR");

        let result = sketch.add_circle((0.0, 0.0), 0.5);
        assert!(matches!(result, Err(CadError::Feature { .. })));
        assert_eq!(mock.updates().len(), 1);
        assert_eq!(sketch.id(), Some("F1"));
    }

    #[test]
    fn test_mirror_copy_keeps_original() {
        let (_mock, mut sketch) = setup(UnitSystem::Metric);
        let line = sketch.add_line((1.0, 0.0), (2.0, 1.0)).unwrap();

        let mirrored = sketch
            .mirror(&[line.clone()], (0.0, 0.0), (0.0, 1.0), true)
            .unwrap();
        assert_eq!(sketch.item_count(), 2);
        assert!(sketch.item(line.id()).is_some());

        let image = mirrored[0].as_line().unwrap();
        assert_point_eq(image.start(), Point2D::new(-1.0, 0.0));
        assert_point_eq(image.end(), Point2D::new(-2.0, 1.0));
    }

    #[test]
    fn test_degenerate_mirror_line() {
        let (_mock, mut sketch) = setup(UnitSystem::Metric);
        let line = sketch.add_line((1.0, 0.0), (2.0, 1.0)).unwrap();
        assert!(matches!(
            sketch.mirror(&[line], (1.0, 1.0), (1.0, 1.0), true),
            Err(CadError::Parameter(_))
        ));
    }

    #[test]
    fn test_missing_item_is_parameter_error() {
        let (_mock, mut sketch) = setup(UnitSystem::Metric);
        let stray = SketchLine::new(Point2D::ORIGIN, Point2D::new(1.0, 0.0));
        assert!(matches!(
            sketch.rotate(&[stray.clone()], (0.0, 0.0), 45.0, false),
            Err(CadError::Parameter(_))
        ));
        assert!(matches!(sketch.remove_item(&stray), Err(CadError::Parameter(_))));
    }

    #[test]
    fn test_linear_pattern_steps_from_previous() {
        let (mock, mut sketch) = setup(UnitSystem::Inch);
        let circle = sketch.add_circle((0.0, 0.0), 0.25).unwrap();

        let pattern = sketch.linear_pattern(&circle, 3, 1.0, 0.5).unwrap();
        assert_eq!(pattern.len(), 4);
        assert_eq!(sketch.item_count(), 4);
        assert_eq!(pattern[0].id(), circle.id());
        for (k, item) in pattern.iter().enumerate() {
            let expected = Point2D::new(k as f64, k as f64 * 0.5) * METERS_PER_INCH;
            assert_point_eq(item.anchor(), expected);
        }
        // add + pattern
        assert_eq!(mock.updates().len(), 2);
    }

    #[test]
    fn test_circular_pattern() {
        let (_mock, mut sketch) = setup(UnitSystem::Metric);
        let circle = sketch.add_circle((1.0, 0.0), 0.1).unwrap();

        let pattern = sketch.circular_pattern(&circle, (0.0, 0.0), 3, 90.0).unwrap();
        assert_eq!(pattern.len(), 4);
        assert_point_eq(pattern[1].anchor(), Point2D::new(0.0, 1.0));
        assert_point_eq(pattern[2].anchor(), Point2D::new(-1.0, 0.0));
        assert_point_eq(
            pattern[3].anchor(),
            rotate_point(Point2D::new(1.0, 0.0), Point2D::ORIGIN, 270.0),
        );
    }

    #[test]
    fn test_fillet_trims_lines_and_adds_arc() {
        let (_mock, mut sketch) = setup(UnitSystem::Metric);
        let lines = sketch
            .trace_points(&[(0.0, 2.0), (0.0, 0.0), (2.0, 0.0)], false)
            .unwrap();

        let arc = sketch.add_fillet(&lines[0], &lines[1], 0.5).unwrap();
        assert_relative_eq!(arc.radius(), 0.5, epsilon = 1e-9);
        assert_point_eq(arc.center(), Point2D::new(0.5, 0.5));
        assert_eq!(sketch.item_count(), 3);

        let first = sketch.item(lines[0].id()).unwrap().as_line().unwrap();
        let second = sketch.item(lines[1].id()).unwrap().as_line().unwrap();
        assert_relative_eq!(first.length(), 1.5, epsilon = 1e-9);
        assert_relative_eq!(second.length(), 1.5, epsilon = 1e-9);
        assert_point_eq(first.end(), Point2D::new(0.0, 0.5));
        assert_point_eq(second.start(), Point2D::new(0.5, 0.0));
    }

    #[test]
    fn test_fillet_preconditions() {
        let (_mock, mut sketch) = setup(UnitSystem::Metric);
        let line = sketch.add_line((0.0, 0.0), (1.0, 0.0)).unwrap();
        let apart = sketch.add_line((5.0, 5.0), (6.0, 5.0)).unwrap();
        let circle = sketch.add_circle((0.0, 0.0), 1.0).unwrap();

        assert!(matches!(
            sketch.add_fillet(&line, &line, 0.1),
            Err(CadError::Feature { .. })
        ));
        assert!(matches!(
            sketch.add_fillet(&line, &apart, 0.1),
            Err(CadError::Feature { .. })
        ));
        assert!(matches!(
            sketch.add_fillet(&line, &circle, 0.1),
            Err(CadError::Parameter(_))
        ));
    }

    #[test]
    fn test_entities_and_regions() {
        let (mock, sketch) = setup(UnitSystem::Metric);
        mock.rule("qSketchRegion(makeId(\"F1\")", &["JRA", "JRB"]);
        mock.rule("qCreatedBy(makeId(\"F1\"))", &["JA", "JB", "JC"]);

        let entities = sketch.entities().unwrap();
        assert_eq!(entities.len(), 3);

        let regions = sketch.regions().unwrap();
        let ids: Vec<&str> = regions.available().iter().map(|e| e.transient_id()).collect();
        assert_eq!(ids, vec!["JRA", "JRB"]);
    }

    #[test]
    fn test_model_entities_sorted_by_id() {
        let (_mock, mut sketch) = setup(UnitSystem::Metric);
        sketch.add_circle((0.0, 0.0), 1.0).unwrap();
        sketch.add_line((0.0, 0.0), (1.0, 1.0)).unwrap();
        sketch.add_centerpoint_arc((0.0, 0.0), 1.0, 0.0, 45.0).unwrap();

        let model = sketch.to_model().unwrap();
        let ids: Vec<&str> = model
            .entities
            .as_ref()
            .unwrap()
            .iter()
            .map(SketchEntityModel::entity_id)
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
