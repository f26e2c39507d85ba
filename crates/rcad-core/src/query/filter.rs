//! Entity filters
//!
//! A filter is an immutable snapshot of entities plus the part studio they
//! live in. Every narrowing call issues a fresh remote query and returns a
//! new filter.

use std::fmt;

use glam::DVec3;
use tracing::debug;

use super::entity::{
    BodyEntityConvertible, EdgeEntityConvertible, Entity, EntityType, FaceEntityConvertible,
    VertexEntityConvertible, kind,
};
use super::entity::kind::{Any, Kind, TypedKind};
use super::script::{Query, apply_query_script};
use crate::error::CadResult;
use crate::studio::PartStudio;

/// Ordered set of entities available for further narrowing
#[derive(Clone)]
pub struct EntityFilter<K: Kind = Any> {
    studio: PartStudio,
    available: Vec<Entity<K>>,
}

impl<K: Kind> EntityFilter<K> {
    pub fn new(studio: PartStudio, available: Vec<Entity<K>>) -> Self {
        Self { studio, available }
    }

    /// A filter with nothing in it
    pub fn empty(studio: PartStudio) -> Self {
        Self::new(studio, Vec::new())
    }

    pub fn available(&self) -> &[Entity<K>] {
        &self.available
    }

    pub fn into_entities(self) -> Vec<Entity<K>> {
        self.available
    }

    pub fn len(&self) -> usize {
        self.available.len()
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    pub fn partstudio(&self) -> &PartStudio {
        &self.studio
    }

    /// Run `query` remotely over the available entities
    fn apply_query<K2: Kind>(&self, query: &Query) -> CadResult<Vec<Entity<K2>>> {
        if self.available.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = self
            .available
            .iter()
            .map(|e| e.transient_id().to_string())
            .collect();
        let script = apply_query_script(&ids, query, self.studio.units());

        debug!("Applying {:?} to {} entities", query, ids.len());
        let mut matches = self.studio.eval_transient_ids(&script)?;
        if query.picks_one() {
            matches.truncate(1);
        }

        Ok(matches.into_iter().map(|id| Entity::new(id)).collect())
    }

    fn narrowed(&self, query: Query) -> CadResult<Self> {
        Ok(Self::new(self.studio.clone(), self.apply_query(&query)?))
    }

    /// Entities containing `point`, in session units
    pub fn contains_point(&self, point: impl Into<DVec3>) -> CadResult<Self> {
        self.narrowed(Query::ContainsPoint(point.into()))
    }

    /// The single entity closest to `point`
    pub fn closest_to(&self, point: impl Into<DVec3>) -> CadResult<Self> {
        self.narrowed(Query::ClosestTo(point.into()))
    }

    /// The single largest entity
    pub fn largest(&self) -> CadResult<Self> {
        self.narrowed(Query::Largest)
    }

    /// The single smallest entity
    pub fn smallest(&self) -> CadResult<Self> {
        self.narrowed(Query::Smallest)
    }

    /// Entities within `radius` of `point`
    pub fn within_radius(&self, point: impl Into<DVec3>, radius: f64) -> CadResult<Self> {
        self.narrowed(Query::WithinRadius {
            point: point.into(),
            radius,
        })
    }

    /// Entities intersecting the infinite line through `origin`
    pub fn intersects(
        &self,
        origin: impl Into<DVec3>,
        direction: impl Into<DVec3>,
    ) -> CadResult<Self> {
        self.narrowed(Query::IntersectsLine {
            origin: origin.into(),
            direction: direction.into(),
        })
    }

    /// Entities of kind `K2`, retagged accordingly
    pub fn is_type<K2: TypedKind>(&self) -> CadResult<EntityFilter<K2>> {
        let matches = self.apply_query(&Query::EntityType(K2::ENTITY_TYPE))?;
        Ok(EntityFilter::new(self.studio.clone(), matches))
    }

    /// Entities of the named type (`VERTEX`, `EDGE`, `FACE`, `BODY`)
    pub fn is_type_named(&self, name: &str) -> CadResult<EntityFilter<Any>> {
        let entity_type = EntityType::parse(name)?;
        let matches = self.apply_query(&Query::EntityType(entity_type))?;
        Ok(EntityFilter::new(self.studio.clone(), matches))
    }

    /// Drop the kind of the filter
    pub fn erase(self) -> EntityFilter<Any> {
        EntityFilter::new(
            self.studio,
            self.available.into_iter().map(Entity::erase).collect(),
        )
    }
}

impl<K: Kind> fmt::Debug for EntityFilter<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityFilter").field(&self.available).finish()
    }
}

impl VertexEntityConvertible for EntityFilter<kind::Vertex> {
    fn vertex_entities(&self) -> CadResult<Vec<Entity<kind::Vertex>>> {
        Ok(self.available.clone())
    }
}

impl EdgeEntityConvertible for EntityFilter<kind::Edge> {
    fn edge_entities(&self) -> CadResult<Vec<Entity<kind::Edge>>> {
        Ok(self.available.clone())
    }
}

impl FaceEntityConvertible for EntityFilter<kind::Face> {
    fn face_entities(&self) -> CadResult<Vec<Entity<kind::Face>>> {
        Ok(self.available.clone())
    }
}

impl BodyEntityConvertible for EntityFilter<kind::Body> {
    fn body_entities(&self) -> CadResult<Vec<Entity<kind::Body>>> {
        Ok(self.available.clone())
    }
}
