use std::path::{Component, Path};

use anyhow::Result;

use crate::error::ForgeError;

use super::constants::API_KEY_ENV_VAR;
use super::types::Config;

pub fn validate(config: &Config) -> Result<()> {
    if config.service.api_key.trim().is_empty() {
        return Err(configuration(format!(
            "{API_KEY_ENV_VAR} is missing; export it from the CI secret store"
        )));
    }
    if config.service.base_url.trim().is_empty() {
        return Err(configuration("service base URL cannot be empty".into()));
    }
    if config.service.timeout_secs == 0 {
        return Err(configuration("timeout must be greater than zero".into()));
    }
    if config.service.max_output_tokens == 0 {
        return Err(configuration("max output tokens must be greater than zero".into()));
    }

    check_relative("addons root", &config.output.addons_root)?;
    check_relative("trace directory", &config.output.trace_dir)?;
    for prefix in &config.output.extra_prefixes {
        check_relative("extra prefix", prefix)?;
    }

    let prefix = &config.output.module_prefix;
    if prefix.is_empty()
        || !prefix
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
    {
        return Err(configuration(format!("invalid module prefix '{prefix}'")));
    }

    if config.rules.files.is_empty() {
        return Err(configuration("rule set must name at least one output file".into()));
    }
    for file in &config.rules.files {
        check_relative("rule file", file)?;
    }

    Ok(())
}

fn check_relative(label: &str, value: &str) -> Result<()> {
    let trimmed = value.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(configuration(format!("{label} cannot be empty")));
    }
    let escapes = Path::new(trimmed)
        .components()
        .any(|component| !matches!(component, Component::Normal(_)));
    if escapes {
        return Err(configuration(format!(
            "{label} '{value}' must be a plain relative path"
        )));
    }
    Ok(())
}

fn configuration(message: String) -> anyhow::Error {
    ForgeError::Configuration(message).into()
}
