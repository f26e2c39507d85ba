//! Remote Query Protocol
//!
//! Geometry selection happens on the service: the client generates a small
//! FeatureScript function, the service evaluates it and hands back transient
//! ids, which are decoded into typed entities.

pub mod entity;
mod filter;
pub mod script;

pub use entity::{
    BodyEntity, BodyEntityConvertible, EdgeEntity, EdgeEntityConvertible, Entity, EntityType,
    FaceEntity, FaceEntityConvertible, VertexEntity, VertexEntityConvertible, kind,
    transient_ids,
};
pub use filter::EntityFilter;
pub use script::Query;
