//! Document-level wire models
//!
//! Only the fields the client reads are modelled; everything else in the
//! service's responses is ignored.

use serde::{Deserialize, Serialize};

use rcad_core::ElementTarget;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceModel {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModel {
    pub id: String,
    pub name: String,
    pub default_workspace: WorkspaceModel,
}

impl DocumentModel {
    /// Address of `element_id` in this document's default workspace
    pub fn element_target(&self, element_id: impl Into<String>) -> ElementTarget {
        ElementTarget::new(&self.id, &self.default_workspace.id, element_id)
    }
}

/// Response of `GET /documents`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentsResponse {
    #[serde(default)]
    pub items: Vec<DocumentModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementModel {
    pub id: String,
    pub name: String,
    pub element_type: String,
}

impl ElementModel {
    pub fn is_partstudio(&self) -> bool {
        self.element_type == "PARTSTUDIO"
    }
}

/// Response of `POST /documents/d/{did}/versions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionModel {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_ignores_unknown_fields() {
        let json = r#"{
            "id": "d1",
            "name": "Bracket",
            "href": "https://example.invalid/d1",
            "defaultWorkspace": {"id": "w1", "name": "Main"}
        }"#;
        let doc: DocumentModel = serde_json::from_str(json).unwrap();
        assert_eq!(doc.default_workspace.id, "w1");

        let target = doc.element_target("e1");
        assert_eq!(target, ElementTarget::new("d1", "w1", "e1"));
    }

    #[test]
    fn test_element_type() {
        let element: ElementModel = serde_json::from_str(
            r#"{"id": "e1", "name": "Part Studio 1", "elementType": "PARTSTUDIO", "lengthUnits": null}"#,
        )
        .unwrap();
        assert!(element.is_partstudio());
    }
}
