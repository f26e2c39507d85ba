//! Remote service seam
//!
//! Provides the `CadService` trait the feature graph is written against,
//! and the typed wire schema exchanged with it.

pub mod schema;
mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use schema::{
    ArrayParameterItem, CurveGeometry, FeatureAddResponse, FeatureListResponse, FeatureModel,
    FeatureParameter, FeatureState, FeatureSummary, FeaturescriptResponse, IndividualQuery,
    PartModel, SketchEntityModel,
};
pub use traits::{CadService, ElementTarget, VersionTarget};
