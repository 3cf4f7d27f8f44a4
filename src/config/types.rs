use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ForgeError;
use crate::prompt::RuleSet;

#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceSettings,
    pub output: OutputSettings,
    pub publish: PublishSettings,
    pub rules: RuleSet,
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_output_tokens: u32,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct OutputSettings {
    /// Directory every relative output path is resolved against.
    pub root: PathBuf,
    pub addons_root: String,
    pub module_prefix: String,
    pub trace_dir: String,
    pub schema_mode: SchemaMode,
    pub encoding: ContentEncoding,
    /// Prefixes accepted in addition to the module root.
    pub extra_prefixes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PublishSettings {
    pub enabled: bool,
    pub on_no_change: NoChangePolicy,
    pub author_name: String,
    pub author_email: String,
}

/// How strictly the service reply is held to the declared JSON shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaMode {
    /// Request schema-constrained output and parse the reply as-is.
    Strict,
    /// Request free text and dig the first balanced JSON object out of it.
    BestEffort,
}

/// How file contents are carried inside the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentEncoding {
    Plain,
    Base64,
}

/// What the publisher does when the written files match what is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoChangePolicy {
    Fail,
    Succeed,
}

impl ContentEncoding {
    /// Name of the reply field holding the file map.
    pub fn files_field(self) -> &'static str {
        match self {
            ContentEncoding::Plain => "files",
            ContentEncoding::Base64 => "files_b64",
        }
    }
}

impl fmt::Display for SchemaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaMode::Strict => write!(f, "strict"),
            SchemaMode::BestEffort => write!(f, "best-effort"),
        }
    }
}

impl std::str::FromStr for SchemaMode {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(SchemaMode::Strict),
            "best-effort" => Ok(SchemaMode::BestEffort),
            other => Err(ForgeError::Configuration(format!(
                "unknown schema mode '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentEncoding::Plain => write!(f, "plain"),
            ContentEncoding::Base64 => write!(f, "base64"),
        }
    }
}

impl std::str::FromStr for ContentEncoding {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(ContentEncoding::Plain),
            "base64" => Ok(ContentEncoding::Base64),
            other => Err(ForgeError::Configuration(format!(
                "unknown content encoding '{other}'"
            ))),
        }
    }
}

impl std::str::FromStr for NoChangePolicy {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(NoChangePolicy::Fail),
            "succeed" => Ok(NoChangePolicy::Succeed),
            other => Err(ForgeError::Configuration(format!(
                "unknown no-change policy '{other}'"
            ))),
        }
    }
}

// File configuration types
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct FileConfig {
    #[serde(default)]
    pub service: Option<FileServiceSettings>,
    #[serde(default)]
    pub output: Option<FileOutputSettings>,
    #[serde(default)]
    pub publish: Option<FilePublishSettings>,
    #[serde(default)]
    pub rules: Option<FileRuleSettings>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FileServiceSettings {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_output_tokens: Option<u32>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FileOutputSettings {
    pub root: Option<PathBuf>,
    pub addons_root: Option<String>,
    pub module_prefix: Option<String>,
    pub trace_dir: Option<String>,
    pub schema_mode: Option<SchemaMode>,
    pub encoding: Option<ContentEncoding>,
    pub extra_prefixes: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FilePublishSettings {
    pub enabled: Option<bool>,
    pub on_no_change: Option<NoChangePolicy>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FileRuleSettings {
    pub target: Option<String>,
    pub files: Option<Vec<String>>,
    pub constraints: Option<Vec<String>>,
}
