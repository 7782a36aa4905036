//! Tool definitions, their JSON-schema-shaped input/output descriptions, and call results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::ContentBlock;
use crate::Meta;

pub const OBJECT: &str = "object";
pub const STRING: &str = "string";
pub const NUMBER: &str = "number";
pub const BOOLEAN: &str = "boolean";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Object schema used for both tool input and tool output.
///
/// Properties are kept sorted by name so the encoded schema is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSchema {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertySchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self {
            kind: OBJECT.to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }
}

impl ObjectSchema {
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.insert_property(name.into(), kind.into(), description.into(), required);
        self
    }

    /// Insert or replace a property. `required` behaves as a set: a name appears at most once.
    pub fn insert_property(&mut self, name: String, kind: String, description: String, required: bool) {
        self.properties.insert(
            name.clone(),
            PropertySchema {
                kind,
                description: Some(description),
            },
        );
        let position = self.required.iter().position(|n| *n == name);
        match (required, position) {
            (true, None) => self.required.push(name),
            (false, Some(index)) => {
                self.required.remove(index);
            }
            _ => {}
        }
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|n| n == name)
    }
}

/// Flat description of one schema property, used to build output schemas in one go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub required: bool,
}

impl PropertyDefinition {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            description: description.into(),
            required,
        }
    }
}

/// Behavioural hints. Every flag is unset unless explicitly given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_hint: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destructive_hint: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotent_hint: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_world_hint: Option<bool>,
}

/// A callable tool, identified by `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "inputSchema")]
    pub input_schema: ObjectSchema,
    #[serde(default, rename = "outputSchema", skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<ObjectSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<ToolAnnotations>,
    #[serde(default, rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Tool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            description: None,
            input_schema: ObjectSchema::default(),
            output_schema: None,
            annotations: None,
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

    pub fn with_metadata(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_input_property(
        mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.input_schema
            .insert_property(name.into(), kind.into(), description.into(), required);
        self
    }

    pub fn with_output_property(
        mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.output_schema.get_or_insert_with(ObjectSchema::default).insert_property(
            name.into(),
            kind.into(),
            description.into(),
            required,
        );
        self
    }

    /// Replace the output schema with one built from `properties`.
    pub fn with_output_schema(mut self, properties: impl IntoIterator<Item = PropertyDefinition>) -> Self {
        let mut schema = ObjectSchema::default();
        for p in properties {
            schema.insert_property(p.name, p.kind, p.description, p.required);
        }
        self.output_schema = Some(schema);
        self
    }

    pub fn with_annotations(mut self, annotations: ToolAnnotations) -> Self {
        self.annotations = Some(annotations);
        self
    }

    pub fn with_destructive_hint(mut self, destructive: bool) -> Self {
        self.annotations.get_or_insert_with(ToolAnnotations::default).destructive_hint =
            Some(destructive);
        self
    }

    pub fn with_read_only_hint(mut self, read_only: bool) -> Self {
        self.annotations.get_or_insert_with(ToolAnnotations::default).read_only_hint =
            Some(read_only);
        self
    }
}

/// Result of `tools/call`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolResult {
    pub content: Vec<ContentBlock>,
    #[serde(default, rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    #[serde(default, rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
    #[serde(default, rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl CallToolResult {
    pub fn new(content: Vec<ContentBlock>) -> Self {
        Self {
            content,
            structured_content: None,
            is_error: None,
            meta: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![ContentBlock::text(text)])
    }

    /// Pretty-printed JSON text plus the same value as structured content.
    pub fn json(value: &impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(structured) => {
                let text = serde_json::to_string_pretty(&structured)
                    .unwrap_or_else(|e| e.to_string());
                Self::text(text).with_structured_content(structured)
            }
            Err(e) => Self::error(e.to_string()),
        }
    }

    /// A tool-level failure: reported to the caller as a result, not as a protocol error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: Some(true),
            ..Self::text(message)
        }
    }

    pub fn with_structured_content(mut self, value: Value) -> Self {
        self.structured_content = Some(value);
        self
    }
}
