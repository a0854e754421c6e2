use serde::{Deserialize, Serialize};

/// Styling hint attached to bot messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Critical,
    Resolved,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
            Severity::Resolved => write!(f, "resolved"),
        }
    }
}

/// What the dispatcher produces for one user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub content: String,
    pub severity: Severity,
}

impl Reply {
    pub fn new(content: impl Into<String>, severity: Severity) -> Self {
        Self {
            content: content.into(),
            severity,
        }
    }

    pub fn info(content: impl Into<String>) -> Self {
        Self::new(content, Severity::Info)
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self::new(content, Severity::Warning)
    }

    pub fn critical(content: impl Into<String>) -> Self {
        Self::new(content, Severity::Critical)
    }

    pub fn resolved(content: impl Into<String>) -> Self {
        Self::new(content, Severity::Resolved)
    }
}
