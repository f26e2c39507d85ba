//! Feature Graph
//!
//! Features are the parametric operations of a part studio. Each one
//! serializes itself into the wire schema and goes through the same
//! upload/update lifecycle: an unbound feature has no id, a successful
//! upload binds the id returned by the service, and the id never changes
//! afterwards.

mod boolean;
mod extrude;
mod loft;
mod plane;
mod translate;

pub use boolean::BooleanUnion;
pub use extrude::{BooleanOperation, Extrude, ExtrudeOptions};
pub use loft::Loft;
pub use plane::{DefaultPlane, OffsetPlane, Plane, PlaneOrientation};
pub use translate::Translate;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CadError, CadResult};
use crate::part::Part;
use crate::query::EntityFilter;
use crate::service::{FeatureAddResponse, FeatureModel, FeatureState};
use crate::studio::{FeatureEntry, PartStudio};

/// Kind of a feature node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    Sketch,
    Extrude,
    Loft,
    DefaultPlane,
    OffsetPlane,
    Translate,
    BooleanUnion,
}

impl FeatureKind {
    /// `featureType` sent to the service
    pub fn type_name(&self) -> &'static str {
        match self {
            FeatureKind::Sketch => "newSketch",
            FeatureKind::Extrude => "extrude",
            FeatureKind::Loft => "loft",
            FeatureKind::DefaultPlane | FeatureKind::OffsetPlane => "cPlane",
            FeatureKind::Translate => "transform",
            FeatureKind::BooleanUnion => "booleanBodies",
        }
    }
}

/// Remote feature id, bound exactly once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureBinding {
    id: Option<String>,
}

impl FeatureBinding {
    pub fn get(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_bound(&self) -> bool {
        self.id.is_some()
    }

    /// The bound id, or an error naming the unbound feature
    pub fn require(&self, name: &str) -> CadResult<&str> {
        self.get()
            .ok_or_else(|| CadError::feature(format!("Feature '{}' id unbound", name)))
    }

    /// Bind the id returned by a successful upload
    pub fn bind(&mut self, id: impl Into<String>) -> CadResult<()> {
        if let Some(existing) = &self.id {
            return Err(CadError::internal(format!(
                "Feature already bound to '{}'",
                existing
            )));
        }
        self.id = Some(id.into());
        Ok(())
    }
}

/// A node of the part studio's feature list
pub trait Feature {
    fn name(&self) -> &str;

    /// `None` until the feature has been uploaded
    fn id(&self) -> Option<&str>;

    fn kind(&self) -> FeatureKind;

    fn partstudio(&self) -> &PartStudio;

    /// Serialize into the wire schema
    fn to_model(&self) -> CadResult<FeatureModel>;

    /// Everything this feature created. Resolved freshly on every call.
    fn entities(&self) -> CadResult<EntityFilter> {
        match self.id() {
            Some(id) => self.partstudio().created_by(id),
            None => Ok(EntityFilter::empty(self.partstudio().clone())),
        }
    }

    /// Parts whose bodies were created by this feature
    fn get_created_parts(&self) -> CadResult<Vec<Part>> {
        let id = self.id().ok_or_else(|| {
            CadError::feature(format!("Feature '{}' has not been uploaded", self.name()))
        })?;
        self.partstudio().created_parts(id)
    }
}

fn check_status(state: &FeatureState, name: &str, action: &str) -> CadResult<()> {
    match state.feature_status.as_str() {
        "OK" => {
            debug!("Successfully {} feature '{}'", action, name);
            Ok(())
        }
        "WARNING" => {
            warn!("Feature '{}' {} with warning", name, action);
            Ok(())
        }
        other => Err(CadError::feature(format!(
            "Feature '{}' errored on {}: status {}",
            name, action, other
        ))),
    }
}

/// Add `feature` to its part studio and return the bound id
///
/// The feature is registered with the studio only when the service
/// accepts it.
pub(crate) fn upload_feature<F: Feature + ?Sized>(feature: &F) -> CadResult<String> {
    if feature.id().is_some() {
        return Err(CadError::internal(format!(
            "Feature '{}' is already uploaded",
            feature.name()
        )));
    }

    let studio = feature.partstudio();
    let model = feature.to_model()?;
    debug!("Uploading {:?} feature '{}'", feature.kind(), feature.name());

    let target = studio.target();
    let response: FeatureAddResponse =
        studio
            .service()
            .add_feature(target, &target.workspace(), &model)?;
    check_status(&response.feature_state, feature.name(), "uploaded")?;

    let id = response.feature.feature_id;
    studio.register(FeatureEntry::new(
        feature.name(),
        Some(id.clone()),
        feature.kind(),
    ));
    Ok(id)
}

/// Push the current parameters of an already bound feature
pub(crate) fn update_feature<F: Feature + ?Sized>(feature: &F) -> CadResult<()> {
    let id = feature.id().ok_or_else(|| {
        CadError::internal(format!(
            "Feature '{}' updated before upload",
            feature.name()
        ))
    })?;

    let studio = feature.partstudio();
    let model = feature.to_model()?.with_feature_id(id);
    debug!("Updating feature '{}' ({})", feature.name(), id);

    let response = studio.service().update_feature(studio.target(), id, &model)?;
    check_status(&response.feature_state, feature.name(), "updated")
}
