pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini-2024-07-18";
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8000;
pub const DEFAULT_ADDONS_ROOT: &str = "odoo/addons";
pub const DEFAULT_MODULE_PREFIX: &str = "ai_issue";
pub const DEFAULT_TRACE_DIR: &str = "AI_SPECS";
pub const DEFAULT_BOT_NAME: &str = "github-actions[bot]";
pub const DEFAULT_BOT_EMAIL: &str = "41898282+github-actions[bot]@users.noreply.github.com";
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
