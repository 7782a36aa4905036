//! The closed set of methods the router answers, and the entity categories behind them.

use std::fmt;
use std::str::FromStr;

use super::error::McpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Initialize,
    PromptsList,
    PromptsGet,
    ResourcesList,
    ResourcesRead,
    ToolsList,
    ToolsCall,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::Initialize,
        Method::PromptsList,
        Method::PromptsGet,
        Method::ResourcesList,
        Method::ResourcesRead,
        Method::ToolsList,
        Method::ToolsCall,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Initialize => "initialize",
            Method::PromptsList => "prompts/list",
            Method::PromptsGet => "prompts/get",
            Method::ResourcesList => "resources/list",
            Method::ResourcesRead => "resources/read",
            Method::ToolsList => "tools/list",
            Method::ToolsCall => "tools/call",
        }
    }
}

impl FromStr for Method {
    type Err = McpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| McpError::UnknownMethod(s.to_string()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Prompt,
    Resource,
    Tool,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Prompt => "prompt",
            Category::Resource => "resource",
            Category::Tool => "tool",
        }
    }

    /// Name of the field identifying an entity of this category.
    pub fn key_field(self) -> &'static str {
        match self {
            Category::Resource => "uri",
            Category::Prompt | Category::Tool => "name",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
