//! Wire schema for feature payloads and service responses
//!
//! Field names follow the remote service's camelCase JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Element type of a regular feature
pub const FEATURE_BT_TYPE: &str = "BTMFeature-134";
/// Element type of a sketch feature
pub const SKETCH_BT_TYPE: &str = "BTMSketch-151";

/// A feature as sent to (and echoed back by) the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bt_type: Option<String>,
    pub feature_type: String,
    pub name: String,
    #[serde(default)]
    pub suppressed: bool,
    #[serde(default)]
    pub parameters: Vec<FeatureParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<String>,
    /// Sketch entities; only present on sketches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<SketchEntityModel>>,
    /// Sketch constraints; only present on sketches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<Value>>,
}

impl FeatureModel {
    /// A regular (`BTMFeature-134`) feature
    pub fn feature(
        feature_type: impl Into<String>,
        name: impl Into<String>,
        parameters: Vec<FeatureParameter>,
    ) -> Self {
        Self {
            bt_type: Some(FEATURE_BT_TYPE.to_string()),
            feature_type: feature_type.into(),
            name: name.into(),
            suppressed: false,
            parameters,
            feature_id: None,
            entities: None,
            constraints: None,
        }
    }

    /// A sketch (`BTMSketch-151`) feature
    pub fn sketch(
        name: impl Into<String>,
        parameters: Vec<FeatureParameter>,
        entities: Vec<SketchEntityModel>,
    ) -> Self {
        Self {
            bt_type: Some(SKETCH_BT_TYPE.to_string()),
            feature_type: "newSketch".to_string(),
            name: name.into(),
            suppressed: false,
            parameters,
            feature_id: None,
            entities: Some(entities),
            constraints: Some(Vec::new()),
        }
    }

    /// Attach the bound feature id, for update payloads
    pub fn with_feature_id(mut self, id: impl Into<String>) -> Self {
        self.feature_id = Some(id.into());
        self
    }

    /// Look up a parameter by its id
    pub fn parameter(&self, parameter_id: &str) -> Option<&FeatureParameter> {
        self.parameters
            .iter()
            .find(|p| p.parameter_id() == parameter_id)
    }
}

// ============== Parameters ==============

/// A single feature parameter, discriminated by `btType`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "btType")]
pub enum FeatureParameter {
    #[serde(rename = "BTMParameterQueryList-148", rename_all = "camelCase")]
    QueryList {
        parameter_id: String,
        queries: Vec<IndividualQuery>,
    },

    #[serde(rename = "BTMParameterEnum-145", rename_all = "camelCase")]
    Enum {
        parameter_id: String,
        enum_name: String,
        value: String,
    },

    #[serde(rename = "BTMParameterQuantity-147", rename_all = "camelCase")]
    Quantity {
        parameter_id: String,
        expression: String,
        #[serde(default)]
        is_integer: bool,
    },

    #[serde(rename = "BTMParameterBoolean-144", rename_all = "camelCase")]
    Boolean { parameter_id: String, value: bool },

    #[serde(rename = "BTMParameterArray-2025", rename_all = "camelCase")]
    Array {
        parameter_id: String,
        items: Vec<ArrayParameterItem>,
    },
}

impl FeatureParameter {
    /// Query list holding a single individual query over `ids`
    pub fn query_list(parameter_id: &str, ids: Vec<String>) -> Self {
        FeatureParameter::QueryList {
            parameter_id: parameter_id.to_string(),
            queries: vec![IndividualQuery::new(ids)],
        }
    }

    pub fn enumeration(parameter_id: &str, enum_name: &str, value: &str) -> Self {
        FeatureParameter::Enum {
            parameter_id: parameter_id.to_string(),
            enum_name: enum_name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn quantity(parameter_id: &str, expression: impl Into<String>) -> Self {
        FeatureParameter::Quantity {
            parameter_id: parameter_id.to_string(),
            expression: expression.into(),
            is_integer: false,
        }
    }

    pub fn boolean(parameter_id: &str, value: bool) -> Self {
        FeatureParameter::Boolean {
            parameter_id: parameter_id.to_string(),
            value,
        }
    }

    pub fn array(parameter_id: &str, items: Vec<ArrayParameterItem>) -> Self {
        FeatureParameter::Array {
            parameter_id: parameter_id.to_string(),
            items,
        }
    }

    pub fn parameter_id(&self) -> &str {
        match self {
            FeatureParameter::QueryList { parameter_id, .. }
            | FeatureParameter::Enum { parameter_id, .. }
            | FeatureParameter::Quantity { parameter_id, .. }
            | FeatureParameter::Boolean { parameter_id, .. }
            | FeatureParameter::Array { parameter_id, .. } => parameter_id,
        }
    }

    /// Transient ids referenced by a query list, flattened
    pub fn query_ids(&self) -> Vec<&str> {
        match self {
            FeatureParameter::QueryList { queries, .. } => queries
                .iter()
                .flat_map(|q| q.deterministic_ids.iter().map(String::as_str))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Query selecting entities by transient id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "btType", rename = "BTMIndividualQuery-138")]
#[serde(rename_all = "camelCase")]
pub struct IndividualQuery {
    pub deterministic_ids: Vec<String>,
}

impl IndividualQuery {
    pub fn new(ids: Vec<String>) -> Self {
        Self {
            deterministic_ids: ids,
        }
    }
}

/// One element of an array parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "btType", rename = "BTMArrayParameterItem-1843")]
pub struct ArrayParameterItem {
    pub parameters: Vec<FeatureParameter>,
}

// ============== Sketch entities ==============

/// Serialized sketch geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "btType")]
pub enum SketchEntityModel {
    /// Closed curve (circle)
    #[serde(rename = "BTMSketchCurve-4", rename_all = "camelCase")]
    Curve {
        entity_id: String,
        center_id: String,
        geometry: CurveGeometry,
    },

    /// Bounded segment of a curve (line or arc)
    #[serde(rename = "BTMSketchCurveSegment-155", rename_all = "camelCase")]
    Segment {
        entity_id: String,
        start_point_id: String,
        end_point_id: String,
        start_param: f64,
        end_param: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        center_id: Option<String>,
        geometry: CurveGeometry,
    },
}

impl SketchEntityModel {
    pub fn entity_id(&self) -> &str {
        match self {
            SketchEntityModel::Curve { entity_id, .. }
            | SketchEntityModel::Segment { entity_id, .. } => entity_id,
        }
    }
}

/// Underlying curve of a sketch entity, in meters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "btType")]
pub enum CurveGeometry {
    #[serde(rename = "BTCurveGeometryCircle-115", rename_all = "camelCase")]
    Circle {
        radius: f64,
        x_center: f64,
        y_center: f64,
        x_dir: f64,
        y_dir: f64,
        clockwise: bool,
    },

    #[serde(rename = "BTCurveGeometryLine-117", rename_all = "camelCase")]
    Line {
        pnt_x: f64,
        pnt_y: f64,
        dir_x: f64,
        dir_y: f64,
    },
}

// ============== Responses ==============

/// Feature header echoed back after add/update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSummary {
    pub name: String,
    pub feature_id: String,
    #[serde(default)]
    pub feature_type: String,
}

/// Health of a feature after the service regenerated it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureState {
    pub feature_status: String,
    #[serde(default)]
    pub inactive: bool,
}

/// Response to a feature add or update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureAddResponse {
    pub feature: FeatureSummary,
    pub feature_state: FeatureState,
}

/// Response to listing a part studio's features
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureListResponse {
    #[serde(default)]
    pub features: Vec<FeatureSummary>,
    #[serde(default)]
    pub default_features: Vec<FeatureSummary>,
}

/// Response to a FeatureScript evaluation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeaturescriptResponse {
    #[serde(default)]
    pub result: Option<Value>,
}

/// A part (body) listed in a part studio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartModel {
    pub name: String,
    pub part_id: String,
    #[serde(default)]
    pub body_type: String,
    #[serde(default)]
    pub part_query: String,
}
