use anyhow::{Context, Result};
use dirs::home_dir;
use std::{fs, path::Path, path::PathBuf};

use crate::error::ForgeError;

use super::builder::ConfigBuilder;
use super::environment::apply_env_overrides;
use super::types::FileConfig;
use super::validation::validate;
use super::Config;

impl Config {
    /// User-level config file consulted when no explicit path is given.
    pub fn config_path() -> Result<PathBuf> {
        let mut path = home_dir()
            .ok_or_else(|| ForgeError::Configuration("could not determine home directory".into()))?;
        path.push(".issue-forge/config");
        Ok(path)
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Load defaults, then the config file, then environment overrides, and validate.
    ///
    /// An explicit `path` must exist; the user-level file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = Self::load_unchecked(path)?;
        validate(&config)?;
        Ok(config)
    }

    /// Same layering as [`Config::load`] without validation, for commands that
    /// never reach the service.
    pub fn load_unchecked(path: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigBuilder::new();

        match path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(ForgeError::Configuration(format!(
                        "config file {} does not exist",
                        explicit.display()
                    ))
                    .into());
                }
                builder = Self::apply_file(builder, explicit)?;
            }
            None => {
                let user_path = Self::config_path()?;
                if user_path.exists() {
                    builder = Self::apply_file(builder, &user_path)?;
                }
            }
        }

        builder = apply_env_overrides(builder)?;
        builder.build()
    }

    pub fn validate(&self) -> Result<()> {
        validate(self)
    }

    fn apply_file(builder: ConfigBuilder, path: &Path) -> Result<ConfigBuilder> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed reading config at {}", path.display()))?;

        if contents.trim().is_empty() {
            return Ok(builder);
        }

        let raw: FileConfig = serde_json::from_str(&contents).map_err(|err| {
            ForgeError::Configuration(format!(
                "failed parsing JSON config at {}: {err}",
                path.display()
            ))
        })?;

        Ok(raw.apply(builder))
    }
}

impl FileConfig {
    pub fn apply(self, builder: ConfigBuilder) -> ConfigBuilder {
        let mut builder = builder;

        if let Some(service) = self.service {
            builder = builder.with_service(|settings| {
                if let Some(base_url) = service.base_url {
                    settings.base_url = base_url;
                }
                if let Some(model) = service.model {
                    settings.model = model;
                }
                if let Some(timeout) = service.timeout_secs {
                    settings.timeout_secs = timeout;
                }
                if let Some(max_tokens) = service.max_output_tokens {
                    settings.max_output_tokens = max_tokens;
                }
                if let Some(user_agent) = service.user_agent {
                    settings.user_agent = user_agent;
                }
            });
        }

        if let Some(output) = self.output {
            builder = builder.with_output(|settings| {
                if let Some(root) = output.root {
                    settings.root = root;
                }
                if let Some(addons_root) = output.addons_root {
                    settings.addons_root = addons_root;
                }
                if let Some(prefix) = output.module_prefix {
                    settings.module_prefix = prefix;
                }
                if let Some(trace_dir) = output.trace_dir {
                    settings.trace_dir = trace_dir;
                }
                if let Some(mode) = output.schema_mode {
                    settings.schema_mode = mode;
                }
                if let Some(encoding) = output.encoding {
                    settings.encoding = encoding;
                }
                if let Some(extra) = output.extra_prefixes {
                    settings.extra_prefixes = extra;
                }
            });
        }

        if let Some(publish) = self.publish {
            builder = builder.with_publish(|settings| {
                if let Some(enabled) = publish.enabled {
                    settings.enabled = enabled;
                }
                if let Some(policy) = publish.on_no_change {
                    settings.on_no_change = policy;
                }
                if let Some(name) = publish.author_name {
                    settings.author_name = name;
                }
                if let Some(email) = publish.author_email {
                    settings.author_email = email;
                }
            });
        }

        if let Some(rules) = self.rules {
            builder = builder.with_rules(|settings| {
                if let Some(target) = rules.target {
                    settings.target = target;
                }
                if let Some(files) = rules.files {
                    settings.files = files;
                }
                if let Some(constraints) = rules.constraints {
                    settings.constraints = constraints;
                }
            });
        }

        builder
    }
}
