use crate::config::environment::env_string;
use crate::error::{ForgeError, Result};

pub const FALLBACK_TITLE: &str = "AI Issue";
pub const FALLBACK_IDENTIFIER: &str = "0";

/// The issue that triggered this run. Built once, then only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    title: String,
    body: String,
    identifier: String,
}

/// Raw trigger values before defaults and validation are applied.
#[derive(Debug, Clone, Default)]
pub struct TriggerInputs {
    pub title: Option<String>,
    pub body: Option<String>,
    pub identifier: Option<String>,
}

impl TriggerInputs {
    /// Read `ISSUE_TITLE`, `ISSUE_BODY` and `ISSUE_NUMBER` from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            title: env_string("ISSUE_TITLE")?,
            body: env_string("ISSUE_BODY")?,
            identifier: env_string("ISSUE_NUMBER")?,
        })
    }

    /// Values set on `other` take precedence over ours.
    pub fn overlay(self, other: TriggerInputs) -> Self {
        Self {
            title: other.title.or(self.title),
            body: other.body.or(self.body),
            identifier: other.identifier.or(self.identifier),
        }
    }
}

impl GenerationRequest {
    pub fn new(inputs: TriggerInputs) -> Result<Self> {
        let title = non_blank(inputs.title).unwrap_or_else(|| FALLBACK_TITLE.to_string());
        let body = inputs.body.map(|b| b.trim().to_string()).unwrap_or_default();
        let identifier =
            non_blank(inputs.identifier).unwrap_or_else(|| FALLBACK_IDENTIFIER.to_string());

        // The identifier becomes a directory name.
        if !identifier
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        {
            return Err(ForgeError::Configuration(format!(
                "issue identifier '{identifier}' may only contain ASCII letters, digits, '-' or '_'"
            )));
        }

        Ok(Self {
            title,
            body,
            identifier,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
