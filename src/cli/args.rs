use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, ContentEncoding, SchemaMode};
use crate::request::TriggerInputs;

/// Entry point for the `issue-forge` command-line interface.
#[derive(Debug, Parser)]
#[command(
    name = "issue-forge",
    about = "Generate an addon module from an issue with a hosted language model",
    version,
    long_about = None
)]
pub struct Cli {
    /// What to do (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// JSON config file (defaults to ~/.issue-forge/config when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Issue title (overrides ISSUE_TITLE)
    #[arg(long, global = true)]
    pub title: Option<String>,

    /// Issue body (overrides ISSUE_BODY)
    #[arg(long, global = true)]
    pub body: Option<String>,

    /// Issue number (overrides ISSUE_NUMBER)
    #[arg(long = "issue", global = true)]
    pub issue: Option<String>,

    /// Directory generated paths are resolved against
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Commit the generated files and trace document
    #[arg(long, global = true)]
    pub publish: bool,

    /// Ask for free text and extract the first JSON object from it
    #[arg(long, global = true)]
    pub best_effort: bool,

    /// Expect file contents as plain text instead of base64
    #[arg(long, global = true)]
    pub plain: bool,

    /// Enable debug logging, including bounded request and response previews
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Generate the module, write it and record the trace document.
    Run,
    /// Print the prompt that would be sent, without calling the service.
    Prompt,
    /// Print the JSON schema the reply is constrained to.
    Schema,
}

impl Cli {
    pub(crate) fn trigger_inputs(&self) -> TriggerInputs {
        TriggerInputs {
            title: self.title.clone(),
            body: self.body.clone(),
            identifier: self.issue.clone(),
        }
    }

    pub(crate) fn apply_overrides(&self, config: &mut Config) {
        if let Some(root) = &self.root {
            config.output.root = root.clone();
        }
        if self.publish {
            config.publish.enabled = true;
        }
        if self.best_effort {
            config.output.schema_mode = SchemaMode::BestEffort;
        }
        if self.plain {
            config.output.encoding = ContentEncoding::Plain;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "issue-forge",
            "prompt",
            "--issue",
            "12",
            "--title",
            "Loyalty",
            "--plain",
        ]);
        assert_eq!(cli.command, Some(Command::Prompt));
        let inputs = cli.trigger_inputs();
        assert_eq!(inputs.identifier.as_deref(), Some("12"));
        assert_eq!(inputs.title.as_deref(), Some("Loyalty"));
        assert!(inputs.body.is_none());
    }

    #[test]
    fn overrides_apply_to_config() {
        let cli = Cli::parse_from([
            "issue-forge",
            "--root",
            "/work/repo",
            "--publish",
            "--best-effort",
            "--plain",
        ]);
        assert_eq!(cli.command, None);

        let mut config = Config::builder().build().unwrap();
        cli.apply_overrides(&mut config);
        assert_eq!(config.output.root, PathBuf::from("/work/repo"));
        assert!(config.publish.enabled);
        assert_eq!(config.output.schema_mode, SchemaMode::BestEffort);
        assert_eq!(config.output.encoding, ContentEncoding::Plain);
    }
}
