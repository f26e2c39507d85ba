//! Entities and entity capabilities
//!
//! An entity is nothing more than a transient id handed out by the remote
//! service, tagged at the type level with the kind of geometry it names.
//! Anything that can produce entities of a kind (a sketch, a part, a plane,
//! a filter) implements the matching `*EntityConvertible` trait, so feature
//! constructors can accept it without caring where the entities came from.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CadError, CadResult};

/// Topological type of an entity, as understood by FeatureScript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    Vertex,
    Edge,
    Face,
    Body,
}

impl EntityType {
    pub const ALL: [EntityType; 4] = [
        EntityType::Vertex,
        EntityType::Edge,
        EntityType::Face,
        EntityType::Body,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EntityType::Vertex => "VERTEX",
            EntityType::Edge => "EDGE",
            EntityType::Face => "FACE",
            EntityType::Body => "BODY",
        }
    }

    /// FeatureScript enum expression, e.g. `EntityType.FACE`
    pub fn as_featurescript(&self) -> String {
        format!("EntityType.{}", self.name())
    }

    /// Case-insensitive parse of `VERTEX`, `EDGE`, `FACE` or `BODY`
    pub fn parse(name: &str) -> CadResult<Self> {
        let upper = name.trim().to_uppercase();
        EntityType::ALL
            .into_iter()
            .find(|t| t.name() == upper)
            .ok_or_else(|| {
                CadError::parameter(format!(
                    "'{}' is not a valid entity type. Options are: VERTEX, EDGE, FACE, BODY",
                    name
                ))
            })
    }
}

impl FromStr for EntityType {
    type Err = CadError;

    fn from_str(s: &str) -> CadResult<Self> {
        EntityType::parse(s)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type-level entity kinds
pub mod kind {
    use std::fmt::Debug;

    use super::EntityType;

    /// Marker for the kind of geometry an entity names
    pub trait Kind: Debug + Clone + Copy + Default + Send + Sync + 'static {
        /// `None` for entities of unknown type
        const TYPE: Option<EntityType>;
        const LABEL: &'static str;
    }

    /// A kind with a concrete entity type
    pub trait TypedKind: Kind {
        const ENTITY_TYPE: EntityType;
    }

    macro_rules! typed_kind {
        ($name:ident, $variant:ident, $label:literal) => {
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
            pub struct $name;

            impl Kind for $name {
                const TYPE: Option<EntityType> = Some(EntityType::$variant);
                const LABEL: &'static str = $label;
            }

            impl TypedKind for $name {
                const ENTITY_TYPE: EntityType = EntityType::$variant;
            }
        };
    }

    /// Entity of unknown type
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Any;

    impl Kind for Any {
        const TYPE: Option<EntityType> = None;
        const LABEL: &'static str = "Entity";
    }

    typed_kind!(Vertex, Vertex, "VertexEntity");
    typed_kind!(Edge, Edge, "EdgeEntity");
    typed_kind!(Face, Face, "FaceEntity");
    typed_kind!(Body, Body, "BodyEntity");
}

use kind::{Any, Kind};

/// Handle to remote geometry, valid only for the current evaluation
/// context of the part studio
pub struct Entity<K: Kind = Any> {
    transient_id: String,
    _kind: PhantomData<K>,
}

pub type VertexEntity = Entity<kind::Vertex>;
pub type EdgeEntity = Entity<kind::Edge>;
pub type FaceEntity = Entity<kind::Face>;
pub type BodyEntity = Entity<kind::Body>;

impl<K: Kind> Entity<K> {
    pub fn new(transient_id: impl Into<String>) -> Self {
        Self {
            transient_id: transient_id.into(),
            _kind: PhantomData,
        }
    }

    pub fn transient_id(&self) -> &str {
        &self.transient_id
    }

    pub fn entity_type(&self) -> Option<EntityType> {
        K::TYPE
    }

    /// FeatureScript expression that rebuilds a query for this entity
    pub fn as_query(&self) -> String {
        super::script::transient_query(&self.transient_id)
    }

    /// Reinterpret as another kind. Only the query layer knows when this
    /// is sound.
    pub(crate) fn retag<K2: Kind>(self) -> Entity<K2> {
        Entity::new(self.transient_id)
    }

    /// Forget the kind
    pub fn erase(self) -> Entity<Any> {
        self.retag()
    }
}

impl<K: Kind> Clone for Entity<K> {
    fn clone(&self) -> Self {
        Self::new(self.transient_id.clone())
    }
}

impl<K: Kind> PartialEq for Entity<K> {
    fn eq(&self, other: &Self) -> bool {
        self.transient_id == other.transient_id
    }
}

impl<K: Kind> Eq for Entity<K> {}

impl<K: Kind> Hash for Entity<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.transient_id.hash(state);
    }
}

impl<K: Kind> fmt::Debug for Entity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", K::LABEL, self.transient_id)
    }
}

impl<K: Kind> fmt::Display for Entity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ============== Capabilities ==============

/// Something that resolves to a list of vertex entities
pub trait VertexEntityConvertible {
    fn vertex_entities(&self) -> CadResult<Vec<VertexEntity>>;
}

/// Something that resolves to a list of edge entities
pub trait EdgeEntityConvertible {
    fn edge_entities(&self) -> CadResult<Vec<EdgeEntity>>;
}

/// Something that resolves to a list of face entities
pub trait FaceEntityConvertible {
    fn face_entities(&self) -> CadResult<Vec<FaceEntity>>;
}

/// Something that resolves to a list of body entities
pub trait BodyEntityConvertible {
    fn body_entities(&self) -> CadResult<Vec<BodyEntity>>;
}

macro_rules! entity_capability {
    ($trait:ident, $method:ident, $kind:ty) => {
        impl $trait for Entity<$kind> {
            fn $method(&self) -> CadResult<Vec<Entity<$kind>>> {
                Ok(vec![self.clone()])
            }
        }

        impl<T: $trait> $trait for [T] {
            fn $method(&self) -> CadResult<Vec<Entity<$kind>>> {
                let mut out = Vec::new();
                for item in self {
                    out.extend(item.$method()?);
                }
                Ok(out)
            }
        }

        impl<T: $trait> $trait for Vec<T> {
            fn $method(&self) -> CadResult<Vec<Entity<$kind>>> {
                self.as_slice().$method()
            }
        }

        impl<T: $trait + ?Sized> $trait for &T {
            fn $method(&self) -> CadResult<Vec<Entity<$kind>>> {
                (**self).$method()
            }
        }
    };
}

entity_capability!(VertexEntityConvertible, vertex_entities, kind::Vertex);
entity_capability!(EdgeEntityConvertible, edge_entities, kind::Edge);
entity_capability!(FaceEntityConvertible, face_entities, kind::Face);
entity_capability!(BodyEntityConvertible, body_entities, kind::Body);

/// Transient ids of a list of entities
pub fn transient_ids<K: Kind>(entities: &[Entity<K>]) -> Vec<String> {
    entities.iter().map(|e| e.transient_id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_entity_type_parse() {
        assert_eq!(EntityType::parse("face").unwrap(), EntityType::Face);
        assert_eq!(EntityType::parse("Vertex").unwrap(), EntityType::Vertex);
        assert!(matches!(
            EntityType::parse("solid"),
            Err(CadError::Parameter(_))
        ));
        assert_eq!(EntityType::Body.as_featurescript(), "EntityType.BODY");
    }

    #[test]
    fn test_entities_compare_by_transient_id() {
        let a = FaceEntity::new("JHD");
        let b = FaceEntity::new("JHD");
        let c = FaceEntity::new("JHC");
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_entity_is_its_own_capability() {
        let face = FaceEntity::new("JHD");
        assert_eq!(face.face_entities().unwrap(), vec![face.clone()]);

        let faces = vec![FaceEntity::new("A"), FaceEntity::new("B")];
        assert_eq!(transient_ids(&faces.face_entities().unwrap()), vec!["A", "B"]);
    }

    #[test]
    fn test_empty_capability_is_legal() {
        let none: Vec<BodyEntity> = Vec::new();
        assert!(none.body_entities().unwrap().is_empty());
    }

    #[test]
    fn test_entity_debug_names_kind() {
        assert_eq!(format!("{:?}", EdgeEntity::new("X")), "EdgeEntity(X)");
        assert_eq!(format!("{:?}", Entity::<Any>::new("Y")), "Entity(Y)");
    }
}
