//! Resource definitions and read results.

use serde::{Deserialize, Serialize};

use crate::Meta;

/// A readable resource, identified by `uri`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Size of the raw content in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Resource {
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            title: None,
            description: None,
            mime_type: None,
            size: None,
            meta: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_metadata(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// One piece of resource content; exactly one of `text` or `blob` is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceContents {
    pub uri: String,
    #[serde(default, rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Base64-encoded binary content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,
}

/// Result of `resources/read`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContents>,
    #[serde(default, rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl ReadResourceResult {
    pub fn new(contents: Vec<ResourceContents>) -> Self {
        Self {
            contents,
            meta: None,
        }
    }

    pub fn text(
        uri: impl Into<String>,
        mime_type: Option<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::new(vec![ResourceContents {
            uri: uri.into(),
            mime_type,
            text: Some(text.into()),
            blob: None,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_resource_omits_optionals() {
        let resource = Resource::new("readme", "file:///a.txt");
        assert_eq!(
            serde_json::to_value(&resource).unwrap(),
            json!({"name": "readme", "uri": "file:///a.txt"})
        );
    }

    #[test]
    fn test_full_resource_uses_wire_names() {
        let resource = Resource::new("readme", "file:///a.txt")
            .with_title("Read me")
            .with_mime_type("text/plain")
            .with_size(42);
        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["mimeType"], "text/plain");
        assert_eq!(value["size"], 42);
        assert_eq!(value["title"], "Read me");
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_text_read_result() {
        let result = ReadResourceResult::text("file:///a.txt", Some("text/plain".to_string()), "hi");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "contents": [{"uri": "file:///a.txt", "mimeType": "text/plain", "text": "hi"}]
            })
        );
    }
}
