use anyhow::Result;
use std::env;

use crate::error::{self, ForgeError};

use super::builder::ConfigBuilder;
use super::constants::API_KEY_ENV_VAR;
use super::types::{ContentEncoding, NoChangePolicy, SchemaMode};

pub fn apply_env_overrides(mut builder: ConfigBuilder) -> Result<ConfigBuilder> {
    if let Some(api_key) = env_string(API_KEY_ENV_VAR)? {
        builder = builder.with_service(|service| service.api_key = api_key.trim().to_string());
    }

    if let Some(base_url) = env_string("FORGE_BASE_URL")? {
        builder = builder.with_service(|service| service.base_url = base_url);
    }

    if let Some(model) = env_string("FORGE_MODEL")? {
        builder = builder.with_service(|service| service.model = model);
    }

    if let Some(timeout) = env_u64("FORGE_TIMEOUT_SECS")? {
        builder = builder.with_service(|service| service.timeout_secs = timeout);
    }

    if let Some(max_tokens) = env_u32("FORGE_MAX_OUTPUT_TOKENS")? {
        builder = builder.with_service(|service| service.max_output_tokens = max_tokens);
    }

    if let Some(mode) = env_string("FORGE_SCHEMA_MODE")? {
        let mode = mode.parse::<SchemaMode>()?;
        builder = builder.with_output(|output| output.schema_mode = mode);
    }

    if let Some(encoding) = env_string("FORGE_ENCODING")? {
        let encoding = encoding.parse::<ContentEncoding>()?;
        builder = builder.with_output(|output| output.encoding = encoding);
    }

    if let Some(addons_root) = env_string("FORGE_ADDONS_ROOT")? {
        builder = builder.with_output(|output| output.addons_root = addons_root);
    }

    if let Some(trace_dir) = env_string("FORGE_TRACE_DIR")? {
        builder = builder.with_output(|output| output.trace_dir = trace_dir);
    }

    if let Some(enabled) = env_bool("FORGE_PUBLISH")? {
        builder = builder.with_publish(|publish| publish.enabled = enabled);
    }

    if let Some(policy) = env_string("FORGE_ON_NO_CHANGE")? {
        let policy = policy.parse::<NoChangePolicy>()?;
        builder = builder.with_publish(|publish| publish.on_no_change = policy);
    }

    Ok(builder)
}

pub fn env_string(key: &str) -> error::Result<Option<String>> {
    match env::var(key) {
        Ok(val) => Ok(Some(val)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ForgeError::Configuration(format!(
            "{key} contains invalid UTF-8"
        ))),
    }
}

pub fn env_u64(key: &str) -> error::Result<Option<u64>> {
    match env_string(key)? {
        Some(value) => value.trim().parse::<u64>().map(Some).map_err(|_| {
            ForgeError::Configuration(format!("failed to parse {key} as u64: '{value}'"))
        }),
        None => Ok(None),
    }
}

pub fn env_u32(key: &str) -> error::Result<Option<u32>> {
    match env_string(key)? {
        Some(value) => value.trim().parse::<u32>().map(Some).map_err(|_| {
            ForgeError::Configuration(format!("failed to parse {key} as u32: '{value}'"))
        }),
        None => Ok(None),
    }
}

pub fn env_bool(key: &str) -> error::Result<Option<bool>> {
    match env_string(key)? {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" | "" => Ok(Some(false)),
            _ => Err(ForgeError::Configuration(format!(
                "failed to parse {key} as a boolean: '{value}'"
            ))),
        },
        None => Ok(None),
    }
}
