//! Translate bodies by XYZ

use std::fmt;

use glam::DVec3;

use super::{Feature, FeatureBinding, FeatureKind, upload_feature};
use crate::error::CadResult;
use crate::query::{BodyEntity, BodyEntityConvertible, transient_ids};
use crate::service::{FeatureModel, FeatureParameter};
use crate::studio::PartStudio;

/// Rigid translation of one or more bodies
pub struct Translate {
    studio: PartStudio,
    binding: FeatureBinding,
    name: String,
    targets: Vec<BodyEntity>,
    offset: DVec3,
    make_copy: bool,
}

impl Translate {
    pub(crate) fn create<B: BodyEntityConvertible + ?Sized>(
        studio: &PartStudio,
        targets: &B,
        offset: DVec3,
        make_copy: bool,
        name: impl Into<String>,
    ) -> CadResult<Self> {
        let mut translate = Self {
            studio: studio.clone(),
            binding: FeatureBinding::default(),
            name: name.into(),
            targets: targets.body_entities()?,
            offset,
            make_copy,
        };

        let id = upload_feature(&translate)?;
        translate.binding.bind(id)?;
        Ok(translate)
    }

    /// Offset in session units
    pub fn offset(&self) -> DVec3 {
        self.offset
    }

    pub fn makes_copy(&self) -> bool {
        self.make_copy
    }
}

impl Feature for Translate {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> Option<&str> {
        self.binding.get()
    }

    fn kind(&self) -> FeatureKind {
        FeatureKind::Translate
    }

    fn partstudio(&self) -> &PartStudio {
        &self.studio
    }

    fn to_model(&self) -> CadResult<FeatureModel> {
        let units = self.studio.units();
        Ok(FeatureModel::feature(
            FeatureKind::Translate.type_name(),
            &self.name,
            vec![
                FeatureParameter::query_list("entities", transient_ids(&self.targets)),
                FeatureParameter::enumeration("transformType", "TransformType", "TRANSLATION_3D"),
                FeatureParameter::quantity("dx", units.expression(self.offset.x)),
                FeatureParameter::quantity("dy", units.expression(self.offset.y)),
                FeatureParameter::quantity("dz", units.expression(self.offset.z)),
                FeatureParameter::boolean("makeCopy", self.make_copy),
            ],
        ))
    }
}

impl fmt::Debug for Translate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Translate(\"{}\")", self.name)
    }
}
