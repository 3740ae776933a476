use serde::{Deserialize, Serialize};

use crate::editor::Editor;
use crate::node::Document;

const DEFAULT_SCHEMA: &str = "gpui-mini-editor";
const DEFAULT_VERSION: u32 = 1;

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

fn default_version() -> u32 {
    DEFAULT_VERSION
}

/// The document as the host sees it: the block list plus a small envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorValue {
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_version")]
    pub version: u32,
    pub document: Document,
}

impl EditorValue {
    pub fn from_document(document: Document) -> Self {
        Self {
            schema: default_schema(),
            version: default_version(),
            document,
        }
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl Editor {
    pub fn value(&self) -> EditorValue {
        EditorValue::from_document(self.doc().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_envelope_fields_fall_back_to_defaults() {
        let value = EditorValue::from_json_str(
            r#"{"document":{"children":[{"type":"code","children":[{"text":"x"}]}]}}"#,
        )
        .unwrap();
        assert_eq!(value.schema, DEFAULT_SCHEMA);
        assert_eq!(value.version, DEFAULT_VERSION);
        assert_eq!(value.document.children[0].text(), "x");
    }
}
