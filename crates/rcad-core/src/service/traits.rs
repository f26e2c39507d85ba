//! Service trait definitions
//!
//! `CadService` is the seam between the feature graph and whatever talks
//! to the remote CAD service. The REST transport implements it; tests use
//! a scripted in-process fake.

use serde::{Deserialize, Serialize};

use super::schema::{
    FeatureAddResponse, FeatureListResponse, FeatureModel, FeaturescriptResponse, PartModel,
};
use crate::error::CadResult;

/// Address of a part studio element inside a document workspace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementTarget {
    pub document_id: String,
    pub workspace_id: String,
    pub element_id: String,
}

impl ElementTarget {
    pub fn new(
        document_id: impl Into<String>,
        workspace_id: impl Into<String>,
        element_id: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            workspace_id: workspace_id.into(),
            element_id: element_id.into(),
        }
    }

    /// Read address pinned to the live workspace
    pub fn workspace(&self) -> VersionTarget {
        VersionTarget::Workspace(self.workspace_id.clone())
    }
}

/// Which state of a document a read is addressed to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionTarget {
    Workspace(String),
    Version(String),
    Microversion(String),
}

impl VersionTarget {
    /// Path segment naming the addressing mode
    pub fn wvm(&self) -> &'static str {
        match self {
            VersionTarget::Workspace(_) => "w",
            VersionTarget::Version(_) => "v",
            VersionTarget::Microversion(_) => "m",
        }
    }

    /// Id of the workspace, version or microversion
    pub fn wvmid(&self) -> &str {
        match self {
            VersionTarget::Workspace(id)
            | VersionTarget::Version(id)
            | VersionTarget::Microversion(id) => id,
        }
    }
}

/// Operations the feature graph needs from the remote service
///
/// Every call is a blocking round trip. Implementations must not retry.
pub trait CadService: Send + Sync {
    /// Append a feature to the end of the part studio
    fn add_feature(
        &self,
        target: &ElementTarget,
        version: &VersionTarget,
        feature: &FeatureModel,
    ) -> CadResult<FeatureAddResponse>;

    /// Replace the parameters of an existing feature
    fn update_feature(
        &self,
        target: &ElementTarget,
        feature_id: &str,
        feature: &FeatureModel,
    ) -> CadResult<FeatureAddResponse>;

    /// Delete a feature
    fn delete_feature(&self, target: &ElementTarget, feature_id: &str) -> CadResult<()>;

    /// List the features of a part studio in creation order
    fn list_features(
        &self,
        target: &ElementTarget,
        version: &VersionTarget,
    ) -> CadResult<FeatureListResponse>;

    /// Evaluate a FeatureScript function against the part studio
    fn eval_featurescript(
        &self,
        target: &ElementTarget,
        version: &VersionTarget,
        script: &str,
    ) -> CadResult<FeaturescriptResponse>;

    /// List the parts (bodies) of a part studio
    fn list_parts(
        &self,
        target: &ElementTarget,
        version: &VersionTarget,
    ) -> CadResult<Vec<PartModel>>;

    /// Snapshot the document as a named version; returns the version id
    fn create_version(&self, target: &ElementTarget, name: &str) -> CadResult<String>;
}
