//! Part Studio
//!
//! The handle every feature, filter and part holds on to. It carries the
//! service connection, the element being edited and the session's unit
//! system, and records the features uploaded during the session.

mod client;

pub use client::Client;

use std::fmt;
use std::sync::Arc;

use glam::DVec3;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CadError, CadResult};
use crate::feature::{
    BooleanUnion, DefaultPlane, Extrude, ExtrudeOptions, FeatureKind, Loft, OffsetPlane,
    PlaneOrientation, Translate,
};
use crate::part::{Part, PartList};
use crate::query::script::{created_by_script, decode_transient_ids};
use crate::query::{
    BodyEntity, BodyEntityConvertible, Entity, EntityFilter, EntityType, FaceEntity,
    FaceEntityConvertible, kind,
};
use crate::service::{CadService, ElementTarget};
use crate::sketch::Sketch;
use crate::units::UnitSystem;

/// Name of the version snapshotted before a wipe
const WIPE_VERSION_NAME: &str = "Before wipe";

// ============== Feature registry ==============

/// A feature recorded in the studio's feature list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureEntry {
    name: String,
    id: Option<String>,
    kind: FeatureKind,
}

impl FeatureEntry {
    /// Entry for a registered feature
    pub fn new(name: impl Into<String>, id: Option<String>, kind: FeatureKind) -> Self {
        Self {
            name: name.into(),
            id,
            kind,
        }
    }

    /// Feature name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remote feature id; `None` for default planes
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Feature kind
    pub fn kind(&self) -> FeatureKind {
        self.kind
    }
}

/// Snapshot of a studio's features, in creation order
#[derive(Debug, Clone)]
pub struct FeatureList {
    studio: PartStudio,
    entries: Vec<FeatureEntry>,
}

impl FeatureList {
    /// Feature by exact name
    ///
    /// Fails when no feature, or more than one, carries the name.
    pub fn get(&self, name: &str) -> CadResult<FeatureHandle> {
        let mut matches = self.entries.iter().filter(|e| e.name == name);
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(FeatureHandle {
                studio: self.studio.clone(),
                entry: entry.clone(),
            }),
            (None, _) => Err(CadError::parameter(format!(
                "No feature named '{}'",
                name
            ))),
            (Some(_), Some(_)) => Err(CadError::parameter(format!(
                "Multiple features named '{}'",
                name
            ))),
        }
    }

    /// The default Top plane
    pub fn top_plane(&self) -> DefaultPlane {
        DefaultPlane::new(self.studio.clone(), PlaneOrientation::Top)
    }

    /// The default Front plane
    pub fn front_plane(&self) -> DefaultPlane {
        DefaultPlane::new(self.studio.clone(), PlaneOrientation::Front)
    }

    /// The default Right plane
    pub fn right_plane(&self) -> DefaultPlane {
        DefaultPlane::new(self.studio.clone(), PlaneOrientation::Right)
    }

    /// Iterate over entries in creation order
    pub fn iter(&self) -> impl Iterator<Item = &FeatureEntry> {
        self.entries.iter()
    }

    /// Number of entries, default planes included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A looked-up feature, usable as input to other features
#[derive(Clone)]
pub struct FeatureHandle {
    studio: PartStudio,
    entry: FeatureEntry,
}

impl FeatureHandle {
    /// Feature name
    pub fn name(&self) -> &str {
        self.entry.name()
    }

    /// Remote feature id; `None` for default planes
    pub fn id(&self) -> Option<&str> {
        self.entry.id()
    }

    /// Feature kind
    pub fn kind(&self) -> FeatureKind {
        self.entry.kind()
    }

    /// Recorded entry behind this handle
    pub fn entry(&self) -> &FeatureEntry {
        &self.entry
    }

    /// Everything this feature created. Resolved freshly on every call.
    pub fn entities(&self) -> CadResult<EntityFilter> {
        match self.id() {
            Some(id) => self.studio.created_by(id),
            None => Ok(EntityFilter::empty(self.studio.clone())),
        }
    }

    /// Parts whose bodies were created by this feature
    pub fn get_created_parts(&self) -> CadResult<Vec<Part>> {
        let id = self.id().ok_or_else(|| {
            CadError::feature(format!("Feature '{}' has not been uploaded", self.name()))
        })?;
        self.studio.created_parts(id)
    }

    fn default_plane(&self) -> Option<DefaultPlane> {
        if self.kind() != FeatureKind::DefaultPlane {
            return None;
        }
        PlaneOrientation::ALL
            .into_iter()
            .find(|o| o.plane_name() == self.name())
            .map(|o| DefaultPlane::new(self.studio.clone(), o))
    }
}

impl FaceEntityConvertible for FeatureHandle {
    fn face_entities(&self) -> CadResult<Vec<FaceEntity>> {
        match self.default_plane() {
            Some(plane) => plane.face_entities(),
            None => Ok(self.entities()?.is_type::<kind::Face>()?.into_entities()),
        }
    }
}

impl BodyEntityConvertible for FeatureHandle {
    fn body_entities(&self) -> CadResult<Vec<BodyEntity>> {
        Ok(self.entities()?.is_type::<kind::Body>()?.into_entities())
    }
}

impl fmt::Debug for FeatureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Feature(\"{}\")", self.name())
    }
}

// ============== PartStudio ==============

struct StudioInner {
    service: Arc<dyn CadService>,
    target: ElementTarget,
    units: UnitSystem,
    features: Mutex<Vec<FeatureEntry>>,
}

/// Cheaply cloneable handle to one part studio element
#[derive(Clone)]
pub struct PartStudio {
    inner: Arc<StudioInner>,
}

impl PartStudio {
    /// Open a part studio
    ///
    /// The three default planes are recorded immediately; nothing is sent
    /// to the service.
    pub fn new(service: Arc<dyn CadService>, target: ElementTarget, units: UnitSystem) -> Self {
        let features = PlaneOrientation::ALL
            .iter()
            .map(|o| FeatureEntry::new(o.plane_name(), None, FeatureKind::DefaultPlane))
            .collect();

        Self {
            inner: Arc::new(StudioInner {
                service,
                target,
                units,
                features: Mutex::new(features),
            }),
        }
    }

    /// Service this studio talks to
    pub fn service(&self) -> &dyn CadService {
        self.inner.service.as_ref()
    }

    /// Document, workspace and element addressed
    pub fn target(&self) -> &ElementTarget {
        &self.inner.target
    }

    /// Session unit system
    pub fn units(&self) -> UnitSystem {
        self.inner.units
    }

    /// Evaluate a generated script against the workspace and decode the
    /// transient ids it returns
    pub fn eval_transient_ids(&self, script: &str) -> CadResult<Vec<String>> {
        debug!("Evaluating featurescript:\n{}", script);
        let target = self.target();
        let response = self
            .service()
            .eval_featurescript(target, &target.workspace(), script)?;
        decode_transient_ids(response.result.as_ref(), script)
    }

    pub(crate) fn register(&self, entry: FeatureEntry) {
        debug!("Registered {:?} feature '{}'", entry.kind, entry.name);
        self.inner.features.lock().push(entry);
    }

    /// Everything created by the feature with `feature_id`
    pub fn created_by(&self, feature_id: &str) -> CadResult<EntityFilter> {
        let ids = self.eval_transient_ids(&created_by_script(feature_id, None))?;
        Ok(EntityFilter::new(
            self.clone(),
            ids.into_iter().map(|id| Entity::new(id)).collect(),
        ))
    }

    /// Parts whose bodies were created by the feature with `feature_id`
    pub fn created_parts(&self, feature_id: &str) -> CadResult<Vec<Part>> {
        let bodies =
            self.eval_transient_ids(&created_by_script(feature_id, Some(EntityType::Body)))?;
        Ok(self
            .list_parts()?
            .into_iter()
            .filter(|p| bodies.iter().any(|b| b == p.id()))
            .collect())
    }

    // ============== Features ==============

    /// Snapshot of the features added so far, default planes first
    pub fn features(&self) -> FeatureList {
        FeatureList {
            studio: self.clone(),
            entries: self.inner.features.lock().clone(),
        }
    }

    /// The default Top plane
    pub fn top_plane(&self) -> DefaultPlane {
        DefaultPlane::new(self.clone(), PlaneOrientation::Top)
    }

    /// The default Front plane
    pub fn front_plane(&self) -> DefaultPlane {
        DefaultPlane::new(self.clone(), PlaneOrientation::Front)
    }

    /// The default Right plane
    pub fn right_plane(&self) -> DefaultPlane {
        DefaultPlane::new(self.clone(), PlaneOrientation::Right)
    }

    /// Create an empty sketch on `plane` and upload it
    pub fn add_sketch<P: FaceEntityConvertible + ?Sized>(
        &self,
        plane: &P,
        name: impl Into<String>,
    ) -> CadResult<Sketch> {
        Sketch::create(self, plane, name)
    }

    /// Blind extrude creating a new body
    pub fn add_extrude<F: FaceEntityConvertible + ?Sized>(
        &self,
        faces: &F,
        distance: f64,
    ) -> CadResult<Extrude> {
        Extrude::create(self, faces, distance, ExtrudeOptions::new())
    }

    /// Upload a preconfigured extrude
    pub fn add_extrude_with<F: FaceEntityConvertible + ?Sized>(
        &self,
        faces: &F,
        distance: f64,
        options: ExtrudeOptions<'_>,
    ) -> CadResult<Extrude> {
        Extrude::create(self, faces, distance, options)
    }

    /// Loft between two profiles
    pub fn add_loft<S, E>(&self, start: &S, end: &E, name: impl Into<String>) -> CadResult<Loft>
    where
        S: FaceEntityConvertible + ?Sized,
        E: FaceEntityConvertible + ?Sized,
    {
        Loft::create(self, start, end, name)
    }

    /// Plane offset from `owner` by a signed `distance`
    pub fn add_offset_plane<F: FaceEntityConvertible + ?Sized>(
        &self,
        owner: &F,
        distance: f64,
        name: impl Into<String>,
    ) -> CadResult<OffsetPlane> {
        OffsetPlane::create(self, owner, distance, name)
    }

    /// Move bodies by `offset`, optionally as a copy
    pub fn add_translate<B: BodyEntityConvertible + ?Sized>(
        &self,
        targets: &B,
        offset: impl Into<DVec3>,
        make_copy: bool,
        name: impl Into<String>,
    ) -> CadResult<Translate> {
        Translate::create(self, targets, offset.into(), make_copy, name)
    }

    /// Union the given bodies
    pub fn add_boolean_union<B: BodyEntityConvertible + ?Sized>(
        &self,
        tools: &B,
        keep_tools: bool,
        name: impl Into<String>,
    ) -> CadResult<BooleanUnion> {
        BooleanUnion::create(self, tools, keep_tools, name)
    }

    // ============== Parts ==============

    /// Parts currently in the studio
    pub fn list_parts(&self) -> CadResult<Vec<Part>> {
        let target = self.target();
        let models = self.service().list_parts(target, &target.workspace())?;
        Ok(models
            .into_iter()
            .map(|m| Part::new(self.clone(), m))
            .collect())
    }

    /// Parts as a lookup list
    pub fn parts(&self) -> CadResult<PartList> {
        Ok(PartList::new(self.list_parts()?))
    }

    // ============== Wipe ==============

    /// Delete every remote feature, newest first, after saving a version
    ///
    /// A failed delete stops the wipe and leaves the remaining features in
    /// place.
    pub fn wipe(&self) -> CadResult<()> {
        let target = self.target();
        let version = self.service().create_version(target, WIPE_VERSION_NAME)?;
        debug!("Saved version {} before wipe", version);

        let mut features = self
            .service()
            .list_features(target, &target.workspace())?
            .features;
        features.reverse();

        info!("Wiping {} features from element {}", features.len(), target.element_id);
        for feature in features {
            debug!("Deleting feature '{}' ({})", feature.name, feature.feature_id);
            self.service().delete_feature(target, &feature.feature_id)?;
            self.inner
                .features
                .lock()
                .retain(|e| e.id() != Some(feature.feature_id.as_str()));
        }
        Ok(())
    }
}

impl fmt::Debug for PartStudio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PartStudio({})", self.inner.target.element_id)
    }
}
