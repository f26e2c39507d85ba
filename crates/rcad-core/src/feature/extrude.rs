//! Blind extrude

use std::fmt;

use super::{Feature, FeatureBinding, FeatureKind, upload_feature};
use crate::error::CadResult;
use crate::query::{
    BodyEntity, BodyEntityConvertible, FaceEntity, FaceEntityConvertible, transient_ids,
};
use crate::service::{FeatureModel, FeatureParameter};
use crate::studio::PartStudio;

/// How the extruded body combines with existing bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BooleanOperation {
    /// Create a new body
    #[default]
    New,
    /// Merge into the scope bodies
    Add,
    /// Cut from the scope bodies
    Remove,
}

impl BooleanOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanOperation::New => "NEW",
            BooleanOperation::Add => "ADD",
            BooleanOperation::Remove => "REMOVE",
        }
    }
}

/// Optional settings for an extrude
#[derive(Default)]
pub struct ExtrudeOptions<'a> {
    pub name: Option<String>,
    pub merge_with: Option<&'a dyn BodyEntityConvertible>,
    pub subtract_from: Option<&'a dyn BodyEntityConvertible>,
}

impl<'a> ExtrudeOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn merge_with(mut self, bodies: &'a dyn BodyEntityConvertible) -> Self {
        self.merge_with = Some(bodies);
        self
    }

    pub fn subtract_from(mut self, bodies: &'a dyn BodyEntityConvertible) -> Self {
        self.subtract_from = Some(bodies);
        self
    }
}

/// A blind extrude of faces by a fixed depth
pub struct Extrude {
    studio: PartStudio,
    binding: FeatureBinding,
    name: String,
    targets: Vec<FaceEntity>,
    distance: f64,
    operation: BooleanOperation,
    scope: Vec<BodyEntity>,
}

impl Extrude {
    pub(crate) fn create<F: FaceEntityConvertible + ?Sized>(
        studio: &PartStudio,
        faces: &F,
        distance: f64,
        options: ExtrudeOptions<'_>,
    ) -> CadResult<Self> {
        // Subtracting wins over merging when both are given
        let (operation, scope) = if let Some(target) = options.subtract_from {
            (BooleanOperation::Remove, target.body_entities()?)
        } else if let Some(target) = options.merge_with {
            (BooleanOperation::Add, target.body_entities()?)
        } else {
            (BooleanOperation::New, Vec::new())
        };

        let mut extrude = Self {
            studio: studio.clone(),
            binding: FeatureBinding::default(),
            name: options.name.unwrap_or_else(|| "New Extrude".to_string()),
            targets: faces.face_entities()?,
            distance,
            operation,
            scope,
        };

        let id = upload_feature(&extrude)?;
        extrude.binding.bind(id)?;
        Ok(extrude)
    }

    /// Depth in session units
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn operation(&self) -> BooleanOperation {
        self.operation
    }

    pub fn targets(&self) -> &[FaceEntity] {
        &self.targets
    }
}

impl Feature for Extrude {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> Option<&str> {
        self.binding.get()
    }

    fn kind(&self) -> FeatureKind {
        FeatureKind::Extrude
    }

    fn partstudio(&self) -> &PartStudio {
        &self.studio
    }

    fn to_model(&self) -> CadResult<FeatureModel> {
        let units = self.studio.units();
        Ok(FeatureModel::feature(
            FeatureKind::Extrude.type_name(),
            &self.name,
            vec![
                FeatureParameter::enumeration("bodyType", "ExtendedToolBodyType", "SOLID"),
                FeatureParameter::enumeration(
                    "operationType",
                    "NewBodyOperationType",
                    self.operation.as_str(),
                ),
                FeatureParameter::query_list("entities", transient_ids(&self.targets)),
                FeatureParameter::enumeration("endBound", "BoundingType", "BLIND"),
                FeatureParameter::quantity("depth", units.expression(self.distance)),
                FeatureParameter::query_list("booleanScope", transient_ids(&self.scope)),
            ],
        ))
    }
}

impl fmt::Debug for Extrude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Extrude(\"{}\")", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::error::CadError;
    use crate::service::ElementTarget;
    use crate::service::mock::MockService;
    use crate::units::UnitSystem;

    fn setup() -> (Arc<MockService>, PartStudio) {
        let mock = Arc::new(MockService::new());
        let studio = PartStudio::new(
            mock.clone(),
            ElementTarget::new("d", "w", "e"),
            UnitSystem::Inch,
        );
        (mock, studio)
    }

    fn enum_value(model: &FeatureModel, id: &str) -> String {
        match model.parameter(id) {
            Some(FeatureParameter::Enum { value, .. }) => value.clone(),
            other => panic!("expected enum parameter {}, got {:?}", id, other),
        }
    }

    #[test]
    fn test_new_extrude_payload() {
        let (mock, studio) = setup();
        let faces = vec![FaceEntity::new("JHD")];
        let extrude = Extrude::create(&studio, &faces, 1.5, ExtrudeOptions::new()).unwrap();

        assert_eq!(extrude.id(), Some("F1"));
        let model = &mock.added()[0];
        assert_eq!(model.feature_type, "extrude");
        assert_eq!(model.name, "New Extrude");
        assert_eq!(enum_value(model, "operationType"), "NEW");
        assert_eq!(enum_value(model, "endBound"), "BLIND");
        assert_eq!(model.parameter("entities").unwrap().query_ids(), vec!["JHD"]);
        assert!(model.parameter("booleanScope").unwrap().query_ids().is_empty());
        match model.parameter("depth") {
            Some(FeatureParameter::Quantity { expression, .. }) => assert_eq!(expression, "1.5 in"),
            other => panic!("unexpected depth {:?}", other),
        }
    }

    #[test]
    fn test_subtract_takes_precedence() {
        let (mock, studio) = setup();
        let faces = vec![FaceEntity::new("JHD")];
        let keep = vec![BodyEntity::new("KEEP")];
        let cut = vec![BodyEntity::new("CUT")];

        Extrude::create(
            &studio,
            &faces,
            1.0,
            ExtrudeOptions::new().merge_with(&keep).subtract_from(&cut),
        )
        .unwrap();

        let model = &mock.added()[0];
        assert_eq!(enum_value(model, "operationType"), "REMOVE");
        assert_eq!(model.parameter("booleanScope").unwrap().query_ids(), vec!["CUT"]);
    }

    #[test]
    fn test_merge_uses_add() {
        let (mock, studio) = setup();
        let faces = vec![FaceEntity::new("JHD")];
        let keep = vec![BodyEntity::new("KEEP")];

        let extrude = Extrude::create(
            &studio,
            &faces,
            2.0,
            ExtrudeOptions::new().named("Boss").merge_with(&keep),
        )
        .unwrap();

        assert_eq!(extrude.operation(), BooleanOperation::Add);
        assert_eq!(mock.added()[0].name, "Boss");
    }

    #[test]
    fn test_error_status_leaves_feature_unregistered() {
        let (mock, studio) = setup();
        mock.push_status("ERROR");
        let faces = vec![FaceEntity::new("JHD")];

        let err = Extrude::create(&studio, &faces, 1.0, ExtrudeOptions::new()).unwrap_err();
        assert!(matches!(err, CadError::Feature { .. }));
        assert!(studio.features().get("New Extrude").is_err());
    }
}
