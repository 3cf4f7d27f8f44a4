use anyhow::Result;

use crate::prompt::RuleSet;

use super::types::{Config, OutputSettings, PublishSettings, ServiceSettings};

#[derive(Debug)]
pub struct ConfigBuilder {
    pub(super) service: ServiceSettings,
    pub(super) output: OutputSettings,
    pub(super) publish: PublishSettings,
    pub(super) rules: RuleSet,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            service: ServiceSettings::default(),
            output: OutputSettings::default(),
            publish: PublishSettings::default(),
            rules: RuleSet::default(),
        }
    }

    pub fn with_service<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut ServiceSettings),
    {
        update(&mut self.service);
        self
    }

    pub fn with_output<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut OutputSettings),
    {
        update(&mut self.output);
        self
    }

    pub fn with_publish<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut PublishSettings),
    {
        update(&mut self.publish);
        self
    }

    pub fn with_rules<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut RuleSet),
    {
        update(&mut self.rules);
        self
    }

    pub fn build(self) -> Result<Config> {
        Ok(Config {
            service: self.service,
            output: self.output,
            publish: self.publish,
            rules: self.rules,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
