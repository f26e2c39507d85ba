//! Client library for a remote parametric CAD service
//!
//! Models are built as a feature graph (sketches, extrudes, lofts, planes,
//! transforms and boolean unions) whose nodes serialize themselves into
//! the service's feature schema. Geometry is selected through generated
//! FeatureScript queries evaluated remotely.

pub mod error;
pub mod feature;
pub mod part;
pub mod query;
pub mod service;
pub mod sketch;
pub mod studio;
pub mod units;

pub use error::{CadError, CadResult};
pub use feature::{
    BooleanOperation, BooleanUnion, DefaultPlane, Extrude, ExtrudeOptions, Feature, FeatureKind,
    Loft, OffsetPlane, Plane, PlaneOrientation, Translate,
};
pub use part::{Part, PartList};
pub use query::{
    BodyEntity, BodyEntityConvertible, EdgeEntity, EdgeEntityConvertible, Entity, EntityFilter,
    EntityType, FaceEntity, FaceEntityConvertible, VertexEntity, VertexEntityConvertible,
};
pub use service::{CadService, ElementTarget, VersionTarget};
pub use sketch::{ItemId, Sketch, SketchArc, SketchCircle, SketchItem, SketchLine};
pub use studio::{Client, FeatureEntry, FeatureHandle, FeatureList, PartStudio};
pub use units::{Point2D, UnitSystem};
