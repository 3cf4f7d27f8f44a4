use std::path::PathBuf;

use super::constants::*;
use super::types::{
    ContentEncoding, NoChangePolicy, OutputSettings, PublishSettings, SchemaMode,
    ServiceSettings,
};

pub fn default_user_agent() -> String {
    format!("issue-forge/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            addons_root: DEFAULT_ADDONS_ROOT.to_string(),
            module_prefix: DEFAULT_MODULE_PREFIX.to_string(),
            trace_dir: DEFAULT_TRACE_DIR.to_string(),
            schema_mode: SchemaMode::Strict,
            encoding: ContentEncoding::Base64,
            extra_prefixes: Vec::new(),
        }
    }
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            on_no_change: NoChangePolicy::Fail,
            author_name: DEFAULT_BOT_NAME.to_string(),
            author_email: DEFAULT_BOT_EMAIL.to_string(),
        }
    }
}
