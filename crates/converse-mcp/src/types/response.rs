//! List results for the three entity categories.

use serde::{Deserialize, Serialize};

use converse_api::{Prompt, Resource, Tool};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptListResult {
    pub prompts: Vec<Prompt>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceListResult {
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolListResult {
    pub tools: Vec<Tool>,
}
