//! Loft between two profiles

use std::fmt;

use super::{Feature, FeatureBinding, FeatureKind, upload_feature};
use crate::error::CadResult;
use crate::query::{FaceEntity, FaceEntityConvertible, transient_ids};
use crate::service::{ArrayParameterItem, FeatureModel, FeatureParameter};
use crate::studio::PartStudio;

/// A solid lofted from a start profile to an end profile
pub struct Loft {
    studio: PartStudio,
    binding: FeatureBinding,
    name: String,
    start: Vec<FaceEntity>,
    end: Vec<FaceEntity>,
}

impl Loft {
    pub(crate) fn create<S, E>(
        studio: &PartStudio,
        start: &S,
        end: &E,
        name: impl Into<String>,
    ) -> CadResult<Self>
    where
        S: FaceEntityConvertible + ?Sized,
        E: FaceEntityConvertible + ?Sized,
    {
        let mut loft = Self {
            studio: studio.clone(),
            binding: FeatureBinding::default(),
            name: name.into(),
            start: start.face_entities()?,
            end: end.face_entities()?,
        };

        let id = upload_feature(&loft)?;
        loft.binding.bind(id)?;
        Ok(loft)
    }

    pub fn start_faces(&self) -> &[FaceEntity] {
        &self.start
    }

    pub fn end_faces(&self) -> &[FaceEntity] {
        &self.end
    }

    fn profile(faces: &[FaceEntity]) -> ArrayParameterItem {
        ArrayParameterItem {
            parameters: vec![FeatureParameter::query_list(
                "sheetProfileEntities",
                transient_ids(faces),
            )],
        }
    }
}

impl Feature for Loft {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> Option<&str> {
        self.binding.get()
    }

    fn kind(&self) -> FeatureKind {
        FeatureKind::Loft
    }

    fn partstudio(&self) -> &PartStudio {
        &self.studio
    }

    fn to_model(&self) -> CadResult<FeatureModel> {
        Ok(FeatureModel::feature(
            FeatureKind::Loft.type_name(),
            &self.name,
            vec![
                FeatureParameter::enumeration("bodyType", "ExtendedToolBodyType", "SOLID"),
                FeatureParameter::enumeration("operationType", "NewBodyOperationType", "NEW"),
                FeatureParameter::enumeration(
                    "surfaceOperationType",
                    "NewSurfaceOperationType",
                    "NEW",
                ),
                FeatureParameter::array(
                    "sheetProfilesArray",
                    vec![Self::profile(&self.start), Self::profile(&self.end)],
                ),
            ],
        ))
    }
}

impl fmt::Debug for Loft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Loft(\"{}\")", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::service::ElementTarget;
    use crate::service::mock::MockService;
    use crate::units::UnitSystem;

    #[test]
    fn test_loft_profiles_in_order() {
        let mock = Arc::new(MockService::new());
        let studio = PartStudio::new(
            mock.clone(),
            ElementTarget::new("d", "w", "e"),
            UnitSystem::Metric,
        );

        let start = vec![FaceEntity::new("S1"), FaceEntity::new("S2")];
        let end = vec![FaceEntity::new("E1")];
        let loft = Loft::create(&studio, &start, &end, "Loft").unwrap();
        assert_eq!(loft.id(), Some("F1"));

        let model = &mock.added()[0];
        assert_eq!(model.feature_type, "loft");
        match model.parameter("sheetProfilesArray") {
            Some(FeatureParameter::Array { items, .. }) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].parameters[0].query_ids(), vec!["S1", "S2"]);
                assert_eq!(items[1].parameters[0].query_ids(), vec!["E1"]);
            }
            other => panic!("unexpected profiles {:?}", other),
        }
        assert!(model.parameter("surfaceOperationType").is_some());
    }
}
