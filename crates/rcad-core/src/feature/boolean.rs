//! Boolean union of bodies

use std::fmt;

use super::{Feature, FeatureBinding, FeatureKind, upload_feature};
use crate::error::CadResult;
use crate::query::{BodyEntity, BodyEntityConvertible, transient_ids};
use crate::service::{FeatureModel, FeatureParameter};
use crate::studio::PartStudio;

/// Union of tool bodies into one
pub struct BooleanUnion {
    studio: PartStudio,
    binding: FeatureBinding,
    name: String,
    tools: Vec<BodyEntity>,
    keep_tools: bool,
}

impl BooleanUnion {
    pub(crate) fn create<B: BodyEntityConvertible + ?Sized>(
        studio: &PartStudio,
        tools: &B,
        keep_tools: bool,
        name: impl Into<String>,
    ) -> CadResult<Self> {
        let mut union = Self {
            studio: studio.clone(),
            binding: FeatureBinding::default(),
            name: name.into(),
            tools: tools.body_entities()?,
            keep_tools,
        };

        let id = upload_feature(&union)?;
        union.binding.bind(id)?;
        Ok(union)
    }

    pub fn tools(&self) -> &[BodyEntity] {
        &self.tools
    }
}

impl Feature for BooleanUnion {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> Option<&str> {
        self.binding.get()
    }

    fn kind(&self) -> FeatureKind {
        FeatureKind::BooleanUnion
    }

    fn partstudio(&self) -> &PartStudio {
        &self.studio
    }

    fn to_model(&self) -> CadResult<FeatureModel> {
        Ok(FeatureModel::feature(
            FeatureKind::BooleanUnion.type_name(),
            &self.name,
            vec![
                FeatureParameter::enumeration("operationType", "BooleanOperationType", "UNION"),
                FeatureParameter::query_list("tools", transient_ids(&self.tools)),
                FeatureParameter::boolean("keepTools", self.keep_tools),
            ],
        ))
    }
}

impl fmt::Debug for BooleanUnion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BooleanUnion(\"{}\")", self.name)
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
    fn test_union_payload() {
        let mock = Arc::new(MockService::new());
        let studio = PartStudio::new(
            mock.clone(),
            ElementTarget::new("d", "w", "e"),
            UnitSystem::Inch,
        );

        let tools = vec![BodyEntity::new("A"), BodyEntity::new("B")];
        BooleanUnion::create(&studio, &tools, false, "Union").unwrap();

        let model = &mock.added()[0];
        assert_eq!(model.feature_type, "booleanBodies");
        assert_eq!(model.parameter("tools").unwrap().query_ids(), vec!["A", "B"]);
        assert_eq!(
            model.parameter("keepTools"),
            Some(&FeatureParameter::boolean("keepTools", false))
        );
    }
}
