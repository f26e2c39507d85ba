//! Planes
//!
//! Default planes exist in every part studio and are only ever referenced.
//! Offset planes are real features built from an existing plane or face.

use std::fmt;

use tracing::debug;

use super::{Feature, FeatureBinding, FeatureKind, upload_feature};
use crate::error::{CadError, CadResult};
use crate::query::script::created_by_script;
use crate::query::{EntityFilter, EntityType, FaceEntity, FaceEntityConvertible, transient_ids};
use crate::service::{FeatureModel, FeatureParameter};
use crate::studio::PartStudio;

/// A feature that produces a single planar face
pub trait Plane: Feature {
    /// Transient id of the plane's face, resolved on every call
    fn transient_id(&self) -> CadResult<String>;
}

/// Orientation of a default plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneOrientation {
    Top,
    Front,
    Right,
}

impl PlaneOrientation {
    pub const ALL: [PlaneOrientation; 3] = [
        PlaneOrientation::Top,
        PlaneOrientation::Front,
        PlaneOrientation::Right,
    ];

    /// Feature id the service gives the plane
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaneOrientation::Top => "Top",
            PlaneOrientation::Front => "Front",
            PlaneOrientation::Right => "Right",
        }
    }

    /// Display name in the feature list
    pub fn plane_name(&self) -> String {
        format!("{} Plane", self.as_str())
    }
}

fn first_face(studio: &PartStudio, script: &str, what: &str) -> CadResult<String> {
    studio
        .eval_transient_ids(script)?
        .into_iter()
        .next()
        .ok_or_else(|| CadError::script(format!("Failed to load {}", what), script))
}

/// Reference to one of the three planes every part studio starts with
#[derive(Clone)]
pub struct DefaultPlane {
    studio: PartStudio,
    orientation: PlaneOrientation,
    name: String,
}

impl DefaultPlane {
    pub(crate) fn new(studio: PartStudio, orientation: PlaneOrientation) -> Self {
        Self {
            studio,
            orientation,
            name: orientation.plane_name(),
        }
    }

    pub fn orientation(&self) -> PlaneOrientation {
        self.orientation
    }
}

impl Feature for DefaultPlane {
    fn name(&self) -> &str {
        &self.name
    }

    /// Default planes have no feature id of their own; see
    /// [`Plane::transient_id`]
    fn id(&self) -> Option<&str> {
        None
    }

    fn kind(&self) -> FeatureKind {
        FeatureKind::DefaultPlane
    }

    fn partstudio(&self) -> &PartStudio {
        &self.studio
    }

    fn to_model(&self) -> CadResult<FeatureModel> {
        Err(CadError::internal(format!(
            "Default plane '{}' cannot be converted to a feature model",
            self.name
        )))
    }

    fn entities(&self) -> CadResult<EntityFilter> {
        Ok(EntityFilter::empty(self.studio.clone()))
    }
}

impl Plane for DefaultPlane {
    fn transient_id(&self) -> CadResult<String> {
        let script = created_by_script(self.orientation.as_str(), Some(EntityType::Face));
        debug!("Resolving {}", self.name);
        first_face(&self.studio, &script, &self.name)
    }
}

impl FaceEntityConvertible for DefaultPlane {
    fn face_entities(&self) -> CadResult<Vec<FaceEntity>> {
        Ok(vec![FaceEntity::new(self.transient_id()?)])
    }
}

impl fmt::Debug for DefaultPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plane(\"{}\")", self.name)
    }
}

/// A plane offset from a plane or planar face
pub struct OffsetPlane {
    studio: PartStudio,
    binding: FeatureBinding,
    name: String,
    owner: Vec<FaceEntity>,
    distance: f64,
}

impl OffsetPlane {
    pub(crate) fn create<F: FaceEntityConvertible + ?Sized>(
        studio: &PartStudio,
        owner: &F,
        distance: f64,
        name: impl Into<String>,
    ) -> CadResult<Self> {
        let mut plane = Self {
            studio: studio.clone(),
            binding: FeatureBinding::default(),
            name: name.into(),
            owner: owner.face_entities()?,
            distance,
        };

        let id = upload_feature(&plane)?;
        plane.binding.bind(id)?;
        Ok(plane)
    }

    /// Signed offset in session units
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

impl Feature for OffsetPlane {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> Option<&str> {
        self.binding.get()
    }

    fn kind(&self) -> FeatureKind {
        FeatureKind::OffsetPlane
    }

    fn partstudio(&self) -> &PartStudio {
        &self.studio
    }

    fn to_model(&self) -> CadResult<FeatureModel> {
        let units = self.studio.units();
        // Negative offsets are sent as a magnitude plus a flip flag
        Ok(FeatureModel::feature(
            FeatureKind::OffsetPlane.type_name(),
            &self.name,
            vec![
                FeatureParameter::query_list("entities", transient_ids(&self.owner)),
                FeatureParameter::enumeration("cplaneType", "CPlaneType", "OFFSET"),
                FeatureParameter::quantity("offset", units.expression(self.distance.abs())),
                FeatureParameter::boolean("oppositeDirection", self.distance < 0.0),
            ],
        ))
    }

    fn entities(&self) -> CadResult<EntityFilter> {
        Ok(EntityFilter::empty(self.studio.clone()))
    }
}

impl Plane for OffsetPlane {
    fn transient_id(&self) -> CadResult<String> {
        let id = self.binding.require(&self.name)?;
        let script = created_by_script(id, Some(EntityType::Face));
        first_face(&self.studio, &script, &self.name)
    }
}

impl FaceEntityConvertible for OffsetPlane {
    fn face_entities(&self) -> CadResult<Vec<FaceEntity>> {
        Ok(vec![FaceEntity::new(self.transient_id()?)])
    }
}

impl fmt::Debug for OffsetPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plane(\"{}\")", self.name)
    }
}
