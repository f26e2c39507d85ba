//! Blocking REST transport
//!
//! Every request goes through [`RestApi::request`], which checks the
//! endpoint, attaches basic auth, and turns non-2xx responses into
//! errors. Bodies are decoded by the typed helpers on top of it.

use std::fmt;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, trace};

use rcad_core::service::{
    FeatureAddResponse, FeatureListResponse, FeatureModel, FeaturescriptResponse, PartModel,
};
use rcad_core::{CadError, CadResult, CadService, ElementTarget, VersionTarget};

use crate::config::{ClientConfig, Credentials};
use crate::models::{DocumentModel, DocumentsResponse, ElementModel, VersionModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        })
    }
}

fn api_error(message: impl Into<String>, status: Option<u16>, url: &str, body: Option<String>) -> CadError {
    CadError::Api {
        message: message.into(),
        status,
        url: Some(url.to_string()),
        body,
    }
}

/// Map a response status onto the error taxonomy
fn check_status(status: u16, url: &str, body: &str) -> CadResult<()> {
    match status {
        200..=299 => Ok(()),
        401 => Err(CadError::Auth(format!(
            "Service rejected the credentials ({})",
            url
        ))),
        _ => Err(api_error(
            format!("Bad response {}", status),
            Some(status),
            url,
            Some(body.to_string()),
        )),
    }
}

/// Decode a JSON object; an empty body decodes as `{}`
fn decode<T: DeserializeOwned>(text: &str, url: &str) -> CadResult<T> {
    let text = if text.trim().is_empty() { "{}" } else { text };
    serde_json::from_str(text).map_err(|e| {
        api_error(
            format!("Response is not valid JSON: {}", e),
            None,
            url,
            Some(text.to_string()),
        )
    })
}

/// Decode a JSON array of `T`
fn decode_list<T: DeserializeOwned>(text: &str, url: &str) -> CadResult<Vec<T>> {
    let value: Value = decode(text, url)?;
    if !value.is_array() {
        return Err(api_error(
            format!("Endpoint {} expected list response", url),
            None,
            url,
            Some(text.to_string()),
        ));
    }
    serde_json::from_value(value).map_err(|e| {
        api_error(
            format!("Unexpected list item: {}", e),
            None,
            url,
            Some(text.to_string()),
        )
    })
}

fn element_path(target: &ElementTarget, version: &VersionTarget) -> String {
    format!(
        "/d/{}/{}/{}/e/{}",
        target.document_id,
        version.wvm(),
        version.wvmid(),
        target.element_id
    )
}

/// HTTP client for the CAD service
pub struct RestApi {
    agent: ureq::Agent,
    base_url: String,
    authorization: String,
}

impl RestApi {
    pub fn new(config: &ClientConfig, credentials: &Credentials) -> CadResult<Self> {
        credentials.validate()?;

        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization: basic_auth(credentials),
        })
    }

    fn url(&self, endpoint: &str) -> CadResult<String> {
        if !endpoint.starts_with('/') {
            return Err(CadError::internal(format!(
                "Endpoint '{}' missing '/' prefix",
                endpoint
            )));
        }
        Ok(format!("{}{}", self.base_url, endpoint))
    }

    /// Send one request and return the raw response text
    fn request(&self, method: Method, endpoint: &str, payload: Option<&Value>) -> CadResult<String> {
        let url = self.url(endpoint)?;
        debug!("{} {}", method, endpoint);
        if let Some(payload) = payload {
            trace!(
                "{} {} with payload:\n{}",
                method,
                endpoint,
                serde_json::to_string_pretty(payload).unwrap_or_default()
            );
        }

        let result = match (method, payload) {
            (Method::Get, _) => self
                .agent
                .get(&url)
                .header("Authorization", &self.authorization)
                .header("Accept", "application/json")
                .call(),
            (Method::Delete, _) => self
                .agent
                .delete(&url)
                .header("Authorization", &self.authorization)
                .header("Accept", "application/json")
                .call(),
            (Method::Post, Some(payload)) => self
                .agent
                .post(&url)
                .header("Authorization", &self.authorization)
                .header("Accept", "application/json")
                .send_json(payload),
            (Method::Post, None) => self
                .agent
                .post(&url)
                .header("Authorization", &self.authorization)
                .header("Accept", "application/json")
                .send_empty(),
        };

        let mut response =
            result.map_err(|e| api_error(format!("Request failed: {}", e), None, &url, None))?;
        let status = response.status().as_u16();
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| api_error(format!("Failed to read body: {}", e), Some(status), &url, None))?;

        trace!("{} {} responded {}:\n{}", method, endpoint, status, text);
        check_status(status, &url, &text)?;
        Ok(text)
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str) -> CadResult<T> {
        let text = self.request(Method::Get, endpoint, None)?;
        decode(&text, endpoint)
    }

    fn get_list<T: DeserializeOwned>(&self, endpoint: &str) -> CadResult<Vec<T>> {
        let text = self.request(Method::Get, endpoint, None)?;
        decode_list(&text, endpoint)
    }

    fn post<T: DeserializeOwned, P: Serialize>(&self, endpoint: &str, payload: &P) -> CadResult<T> {
        let payload = serde_json::to_value(payload)?;
        let text = self.request(Method::Post, endpoint, Some(&payload))?;
        decode(&text, endpoint)
    }

    // ============== Documents ==============

    /// Documents owned by the authenticated user
    pub fn list_documents(&self) -> CadResult<Vec<DocumentModel>> {
        let response: DocumentsResponse = self.get("/documents")?;
        Ok(response.items)
    }

    /// Every element of a document at `version`
    pub fn document_elements(
        &self,
        document_id: &str,
        version: &VersionTarget,
    ) -> CadResult<Vec<ElementModel>> {
        self.get_list(&format!(
            "/documents/d/{}/{}/{}/elements",
            document_id,
            version.wvm(),
            version.wvmid()
        ))
    }
}

fn basic_auth(credentials: &Credentials) -> String {
    let pair = format!("{}:{}", credentials.access_key, credentials.secret_key);
    format!("Basic {}", STANDARD.encode(pair))
}

impl CadService for RestApi {
    fn add_feature(
        &self,
        target: &ElementTarget,
        version: &VersionTarget,
        feature: &FeatureModel,
    ) -> CadResult<FeatureAddResponse> {
        self.post(
            &format!("/partstudios{}/features", element_path(target, version)),
            &json!({ "feature": feature }),
        )
    }

    fn update_feature(
        &self,
        target: &ElementTarget,
        feature_id: &str,
        feature: &FeatureModel,
    ) -> CadResult<FeatureAddResponse> {
        self.post(
            &format!(
                "/partstudios{}/features/featureid/{}",
                element_path(target, &target.workspace()),
                feature_id
            ),
            &json!({ "feature": feature }),
        )
    }

    fn delete_feature(&self, target: &ElementTarget, feature_id: &str) -> CadResult<()> {
        self.request(
            Method::Delete,
            &format!(
                "/partstudios{}/features/featureid/{}",
                element_path(target, &target.workspace()),
                feature_id
            ),
            None,
        )?;
        Ok(())
    }

    fn list_features(
        &self,
        target: &ElementTarget,
        version: &VersionTarget,
    ) -> CadResult<FeatureListResponse> {
        self.get(&format!("/partstudios{}/features", element_path(target, version)))
    }

    fn eval_featurescript(
        &self,
        target: &ElementTarget,
        version: &VersionTarget,
        script: &str,
    ) -> CadResult<FeaturescriptResponse> {
        self.post(
            &format!("/partstudios{}/featurescript", element_path(target, version)),
            &json!({ "script": script }),
        )
    }

    fn list_parts(
        &self,
        target: &ElementTarget,
        version: &VersionTarget,
    ) -> CadResult<Vec<PartModel>> {
        self.get_list(&format!("/parts{}", element_path(target, version)))
    }

    fn create_version(&self, target: &ElementTarget, name: &str) -> CadResult<String> {
        let version: VersionModel = self.post(
            &format!("/documents/d/{}/versions", target.document_id),
            &json!({
                "documentId": target.document_id,
                "workspaceId": target.workspace_id,
                "name": name,
            }),
        )?;
        debug!("Created version '{}' ({})", version.name, version.id);
        Ok(version.id)
    }
}

impl fmt::Debug for RestApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RestApi({})", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> RestApi {
        let credentials = Credentials::new("a".repeat(24), "s".repeat(48)).unwrap();
        let config = ClientConfig {
            base_url: "http://127.0.0.1:9/api/".to_string(),
            ..ClientConfig::default()
        };
        RestApi::new(&config, &credentials).unwrap()
    }

    #[test]
    fn test_endpoint_needs_slash() {
        let api = api();
        assert!(matches!(api.url("documents"), Err(CadError::Internal(_))));
        assert_eq!(api.url("/documents").unwrap(), "http://127.0.0.1:9/api/documents");
        // rejected before any connection attempt
        assert!(matches!(
            api.request(Method::Get, "documents", None),
            Err(CadError::Internal(_))
        ));
    }

    #[test]
    fn test_basic_auth_header() {
        let credentials = Credentials::new("a".repeat(24), "s".repeat(48)).unwrap();
        let header = basic_auth(&credentials);
        let encoded = header.strip_prefix("Basic ").unwrap();
        let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded, format!("{}:{}", "a".repeat(24), "s".repeat(48)));
    }

    #[test]
    fn test_status_mapping() {
        assert!(check_status(200, "u", "").is_ok());
        assert!(matches!(check_status(401, "u", ""), Err(CadError::Auth(_))));

        let err = check_status(404, "u", "missing").unwrap_err();
        assert_eq!(err.status(), Some(404));
        match err {
            CadError::Api { body, url, .. } => {
                assert_eq!(body.as_deref(), Some("missing"));
                assert_eq!(url.as_deref(), Some("u"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_empty_body_decodes_as_object() {
        let response: FeaturescriptResponse = decode("  ", "u").unwrap();
        assert!(response.result.is_none());
        assert!(matches!(
            decode::<FeaturescriptResponse>("<html>", "u"),
            Err(CadError::Api { .. })
        ));
    }

    #[test]
    fn test_list_endpoint_requires_array() {
        let parts: Vec<PartModel> = decode_list(
            r#"[{"name": "Part 1", "partId": "JHD", "bodyType": "solid", "partQuery": "q"}]"#,
            "u",
        )
        .unwrap();
        assert_eq!(parts[0].part_id, "JHD");

        assert!(matches!(
            decode_list::<PartModel>(r#"{"items": []}"#, "u"),
            Err(CadError::Api { .. })
        ));
    }

    #[test]
    fn test_element_paths() {
        let target = ElementTarget::new("d1", "w1", "e1");
        assert_eq!(element_path(&target, &target.workspace()), "/d/d1/w/w1/e/e1");
        assert_eq!(
            element_path(&target, &VersionTarget::Version("v7".into())),
            "/d/d1/v/v7/e/e1"
        );
    }
}
