//! Task (work element) model.
//!
//! A task is an indivisible unit of assembly work with a fixed
//! processing time and an optional tool requirement.
//!
//! # Reference
//! Scholl (1999), "Balancing and Sequencing of Assembly Lines", Ch. 2

use serde::{Deserialize, Serialize};

/// Tool key used for tasks that require no tool.
///
/// Scoring treats "no tool" as a category of its own.
pub const NO_TOOL: &str = "none";

/// A task to be assigned to a workstation.
///
/// # Time Representation
/// Processing times are whole seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Processing time (seconds, positive).
    pub processing_time: i64,
    /// Required tool category. `None` = no tool.
    pub tool_type: Option<String>,
    /// Environmental impact weight. Reserved; not used by scoring.
    #[serde(default)]
    pub env_score: f64,
}

impl Task {
    /// Creates a tool-less task.
    pub fn new(id: impl Into<String>, processing_time: i64) -> Self {
        Self {
            id: id.into(),
            processing_time,
            tool_type: None,
            env_score: 0.0,
        }
    }

    /// Sets the required tool category.
    ///
    /// An empty tag or the literal `"none"` clears the requirement.
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        let tool = tool.into();
        self.tool_type = if tool.is_empty() || tool == NO_TOOL {
            None
        } else {
            Some(tool)
        };
        self
    }

    /// Sets the environmental impact weight.
    pub fn with_env_score(mut self, env_score: f64) -> Self {
        self.env_score = env_score;
        self
    }

    /// Tool key for per-station bookkeeping (`"none"` when tool-less).
    pub fn tool_key(&self) -> &str {
        self.tool_type.as_deref().unwrap_or(NO_TOOL)
    }

    /// Whether the task requires a tool.
    pub fn has_tool(&self) -> bool {
        self.tool_type.is_some()
    }
}
