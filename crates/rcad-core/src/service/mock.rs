//! Scripted in-process stand-in for the remote service, used by tests

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde_json::{Value, json};

use super::schema::{
    FeatureAddResponse, FeatureListResponse, FeatureModel, FeatureState, FeatureSummary,
    FeaturescriptResponse, PartModel,
};
use super::traits::{CadService, ElementTarget, VersionTarget};
use crate::error::{CadError, CadResult};

/// A recorded service call
#[derive(Debug, Clone)]
pub(crate) enum Call {
    Add(FeatureModel),
    Update(String, FeatureModel),
    Delete(String),
    ListFeatures,
    Eval(String),
    ListParts,
    CreateVersion(String),
}

#[derive(Default)]
struct MockState {
    calls: Vec<Call>,
    next_id: usize,
    statuses: VecDeque<String>,
    results: VecDeque<Option<Value>>,
    rules: Vec<(String, Value)>,
    parts: Vec<PartModel>,
    features: Vec<FeatureSummary>,
    deletes_before_failure: Option<usize>,
}

#[derive(Default)]
pub(crate) struct MockService {
    state: Mutex<MockState>,
}

/// FeatureScript result holding a list of transient id strings
pub(crate) fn ids_result(ids: &[&str]) -> Value {
    json!({
        "btType": "com.belmonttech.serialize.fsvalue.BTFSValueArray",
        "value": ids
            .iter()
            .map(|id| json!({"btType": "com.belmonttech.serialize.fsvalue.BTFSValueString", "value": id}))
            .collect::<Vec<_>>(),
    })
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status reported for the next add/update; defaults to `OK`
    pub fn push_status(&self, status: &str) {
        self.state.lock().statuses.push_back(status.to_string());
    }

    /// Result returned by the next evaluation, ahead of any rule
    pub fn push_result(&self, result: Option<Value>) {
        self.state.lock().results.push_back(result);
    }

    /// Evaluations whose script contains `needle` return `ids`
    pub fn rule(&self, needle: &str, ids: &[&str]) {
        self.state
            .lock()
            .rules
            .push((needle.to_string(), ids_result(ids)));
    }

    pub fn add_part(&self, name: &str, part_id: &str) {
        self.state.lock().parts.push(PartModel {
            name: name.to_string(),
            part_id: part_id.to_string(),
            body_type: "solid".to_string(),
            part_query: format!("query=qTransient(\"{}\");", part_id),
        });
    }

    /// Let `n` deletes succeed, then fail every following one
    pub fn fail_deletes_after(&self, n: usize) {
        self.state.lock().deletes_before_failure = Some(n);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Every feature payload sent through `add_feature`
    pub fn added(&self) -> Vec<FeatureModel> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Add(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    /// Every feature payload sent through `update_feature`
    pub fn updates(&self) -> Vec<(String, FeatureModel)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Update(id, m) => Some((id, m)),
                _ => None,
            })
            .collect()
    }

    /// Every evaluated script
    pub fn scripts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Eval(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn remote_feature_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .features
            .iter()
            .map(|f| f.feature_id.clone())
            .collect()
    }
}

impl CadService for MockService {
    fn add_feature(
        &self,
        _target: &ElementTarget,
        _version: &VersionTarget,
        feature: &FeatureModel,
    ) -> CadResult<FeatureAddResponse> {
        let mut state = self.state.lock();
        state.calls.push(Call::Add(feature.clone()));
        let status = state.statuses.pop_front().unwrap_or_else(|| "OK".to_string());

        state.next_id += 1;
        let summary = FeatureSummary {
            name: feature.name.clone(),
            feature_id: format!("F{}", state.next_id),
            feature_type: feature.feature_type.clone(),
        };
        if status != "ERROR" {
            state.features.push(summary.clone());
        }

        Ok(FeatureAddResponse {
            feature: summary,
            feature_state: FeatureState {
                feature_status: status,
                inactive: false,
            },
        })
    }

    fn update_feature(
        &self,
        _target: &ElementTarget,
        feature_id: &str,
        feature: &FeatureModel,
    ) -> CadResult<FeatureAddResponse> {
        let mut state = self.state.lock();
        state
            .calls
            .push(Call::Update(feature_id.to_string(), feature.clone()));
        let status = state.statuses.pop_front().unwrap_or_else(|| "OK".to_string());

        Ok(FeatureAddResponse {
            feature: FeatureSummary {
                name: feature.name.clone(),
                feature_id: feature_id.to_string(),
                feature_type: feature.feature_type.clone(),
            },
            feature_state: FeatureState {
                feature_status: status,
                inactive: false,
            },
        })
    }

    fn delete_feature(&self, _target: &ElementTarget, feature_id: &str) -> CadResult<()> {
        let mut state = self.state.lock();
        if let Some(remaining) = state.deletes_before_failure {
            if remaining == 0 {
                return Err(CadError::Api {
                    message: "Delete rejected".to_string(),
                    status: Some(500),
                    url: None,
                    body: None,
                });
            }
            state.deletes_before_failure = Some(remaining - 1);
        }
        state.calls.push(Call::Delete(feature_id.to_string()));
        state.features.retain(|f| f.feature_id != feature_id);
        Ok(())
    }

    fn list_features(
        &self,
        _target: &ElementTarget,
        _version: &VersionTarget,
    ) -> CadResult<FeatureListResponse> {
        let mut state = self.state.lock();
        state.calls.push(Call::ListFeatures);
        Ok(FeatureListResponse {
            features: state.features.clone(),
            default_features: Vec::new(),
        })
    }

    fn eval_featurescript(
        &self,
        _target: &ElementTarget,
        _version: &VersionTarget,
        script: &str,
    ) -> CadResult<FeaturescriptResponse> {
        let mut state = self.state.lock();
        state.calls.push(Call::Eval(script.to_string()));

        if let Some(result) = state.results.pop_front() {
            return Ok(FeaturescriptResponse { result });
        }

        let result = state
            .rules
            .iter()
            .find(|(needle, _)| script.contains(needle.as_str()))
            .map(|(_, value)| value.clone())
            .unwrap_or_else(|| ids_result(&[]));

        Ok(FeaturescriptResponse {
            result: Some(result),
        })
    }

    fn list_parts(
        &self,
        _target: &ElementTarget,
        _version: &VersionTarget,
    ) -> CadResult<Vec<PartModel>> {
        let mut state = self.state.lock();
        state.calls.push(Call::ListParts);
        Ok(state.parts.clone())
    }

    fn create_version(&self, _target: &ElementTarget, name: &str) -> CadResult<String> {
        let mut state = self.state.lock();
        state.calls.push(Call::CreateVersion(name.to_string()));
        Ok("V1".to_string())
    }
}
