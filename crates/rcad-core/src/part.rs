//! Parts
//!
//! A part is a body in the part studio. Its vertices, edges and faces are
//! queried from the service on every access.

use std::fmt;

use crate::error::{CadError, CadResult};
use crate::query::script::owned_by_body_script;
use crate::query::{
    BodyEntity, BodyEntityConvertible, EdgeEntity, EdgeEntityConvertible, Entity, EntityFilter,
    FaceEntity, FaceEntityConvertible, VertexEntity, VertexEntityConvertible, kind,
};
use crate::service::PartModel;
use crate::studio::PartStudio;

#[derive(Clone)]
pub struct Part {
    studio: PartStudio,
    model: PartModel,
}

impl Part {
    pub(crate) fn new(studio: PartStudio, model: PartModel) -> Self {
        Self { studio, model }
    }

    /// Display name of the part
    pub fn name(&self) -> &str {
        &self.model.name
    }

    /// Part id, which doubles as the body's transient id
    pub fn id(&self) -> &str {
        &self.model.part_id
    }

    /// Body type reported by the service, e.g. `solid`
    pub fn body_type(&self) -> &str {
        &self.model.body_type
    }

    /// Raw part descriptor
    pub fn model(&self) -> &PartModel {
        &self.model
    }

    /// Owning part studio
    pub fn partstudio(&self) -> &PartStudio {
        &self.studio
    }

    fn owned_by_type<K: kind::TypedKind>(&self) -> CadResult<EntityFilter<K>> {
        let script = owned_by_body_script(self.id(), K::ENTITY_TYPE);
        let ids = self.studio.eval_transient_ids(&script)?;
        Ok(EntityFilter::new(
            self.studio.clone(),
            ids.into_iter().map(|id| Entity::new(id)).collect(),
        ))
    }

    /// Vertices owned by this body, queried fresh
    pub fn vertices(&self) -> CadResult<EntityFilter<kind::Vertex>> {
        self.owned_by_type()
    }

    /// Edges owned by this body, queried fresh
    pub fn edges(&self) -> CadResult<EntityFilter<kind::Edge>> {
        self.owned_by_type()
    }

    /// Faces owned by this body, queried fresh
    pub fn faces(&self) -> CadResult<EntityFilter<kind::Face>> {
        self.owned_by_type()
    }
}

impl VertexEntityConvertible for Part {
    fn vertex_entities(&self) -> CadResult<Vec<VertexEntity>> {
        Ok(self.vertices()?.into_entities())
    }
}

impl EdgeEntityConvertible for Part {
    fn edge_entities(&self) -> CadResult<Vec<EdgeEntity>> {
        Ok(self.edges()?.into_entities())
    }
}

impl FaceEntityConvertible for Part {
    fn face_entities(&self) -> CadResult<Vec<FaceEntity>> {
        Ok(self.faces()?.into_entities())
    }
}

impl BodyEntityConvertible for Part {
    fn body_entities(&self) -> CadResult<Vec<BodyEntity>> {
        Ok(vec![BodyEntity::new(self.id())])
    }
}

impl fmt::Debug for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Part({})", self.id())
    }
}

/// Snapshot of the parts in a part studio
#[derive(Debug, Clone, Default)]
pub struct PartList {
    parts: Vec<Part>,
}

impl PartList {
    pub(crate) fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    /// Part by name, ignoring case
    pub fn get(&self, name: &str) -> CadResult<&Part> {
        self.parts
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| CadError::parameter(format!("No part named '{}'", name)))
    }

    /// Part by id, ignoring case
    pub fn get_id(&self, part_id: &str) -> CadResult<&Part> {
        self.parts
            .iter()
            .find(|p| p.id().eq_ignore_ascii_case(part_id))
            .ok_or_else(|| CadError::parameter(format!("No part with id '{}'", part_id)))
    }

    /// Iterate over the parts
    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// True when the studio has no parts
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Take the parts out of the list
    pub fn into_vec(self) -> Vec<Part> {
        self.parts
    }
}

impl IntoIterator for PartList {
    type Item = Part;
    type IntoIter = std::vec::IntoIter<Part>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.into_iter()
    }
}

impl BodyEntityConvertible for PartList {
    fn body_entities(&self) -> CadResult<Vec<BodyEntity>> {
        Ok(self.parts.iter().map(|p| BodyEntity::new(p.id())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

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

    fn part(studio: &PartStudio, name: &str, id: &str) -> Part {
        Part::new(
            studio.clone(),
            PartModel {
                name: name.to_string(),
                part_id: id.to_string(),
                body_type: "solid".to_string(),
                part_query: String::new(),
            },
        )
    }

    #[test]
    fn test_faces_are_queried_every_call() {
        let (mock, studio) = setup();
        mock.rule("qOwnedByBody(part, EntityType.FACE)", &["JF1", "JF2"]);
        let p = part(&studio, "Part 1", "JHD");

        assert_eq!(p.faces().unwrap().len(), 2);
        assert_eq!(p.face_entities().unwrap().len(), 2);
        assert_eq!(mock.scripts().len(), 2);
        assert!(mock.scripts()[0].contains("\"transientId\" : \"JHD\""));
    }

    #[test]
    fn test_body_is_part_id() {
        let (mock, studio) = setup();
        let p = part(&studio, "Part 1", "JHD");
        assert_eq!(p.body_entities().unwrap(), vec![BodyEntity::new("JHD")]);
        assert!(mock.scripts().is_empty());
    }

    #[test]
    fn test_part_list_lookup() {
        let (_mock, studio) = setup();
        let list = PartList::new(vec![part(&studio, "Base", "JHD"), part(&studio, "Lid", "JHK")]);

        assert_eq!(list.get("base").unwrap().id(), "JHD");
        assert_eq!(list.get_id("JHK").unwrap().name(), "Lid");
        assert!(matches!(list.get("missing"), Err(CadError::Parameter(_))));
        assert!(matches!(list.get_id("nope"), Err(CadError::Parameter(_))));
        assert_eq!(list.body_entities().unwrap().len(), 2);
    }
}
