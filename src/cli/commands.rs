use anyhow::Result;
use colored::*;

use crate::client::ResponsesClient;
use crate::config::Config;
use crate::pipeline::Pipeline;
use crate::prompt::ModuleLayout;
use crate::publish::{GitCli, PublishOutcome};
use crate::request::{GenerationRequest, TriggerInputs};
use crate::schema::output_schema;

use super::args::{Cli, Command};

pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Command::Run) {
        Command::Run => generate(&cli).await,
        Command::Prompt => print_prompt(&cli),
        Command::Schema => print_schema(&cli),
    }
}

fn request_from(cli: &Cli) -> Result<GenerationRequest> {
    let inputs = TriggerInputs::from_env()?.overlay(cli.trigger_inputs());
    Ok(GenerationRequest::new(inputs)?)
}

async fn generate(cli: &Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let request = request_from(cli)?;
    let client = ResponsesClient::new(&config.service)?;
    let git = GitCli::new(&config.output.root);

    let mut pipeline = Pipeline::new(&config, &client);
    if config.publish.enabled {
        pipeline = pipeline.with_vcs(&git);
    }

    let report = pipeline.run(&request).await?;

    println!(
        "{} Generated {} files under {}/",
        "✅".green(),
        report.written.len(),
        report.module_root.bold()
    );
    match &report.trace {
        Some(path) => println!("📝 Trace: {}", path.display()),
        None => println!("{}", "⚠️  Trace document could not be written".yellow()),
    }
    match report.publish {
        Some(PublishOutcome::Committed) => println!("{}", "📦 Changes committed".green()),
        Some(PublishOutcome::NothingToCommit) => {
            println!("{}", "📦 Nothing to commit".yellow())
        }
        None => {}
    }

    Ok(())
}

fn print_prompt(cli: &Cli) -> Result<()> {
    let mut config = Config::load_unchecked(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    let request = request_from(cli)?;
    let layout = ModuleLayout::new(&request, &config.output);
    let prompt = crate::prompt::build_prompt(
        &request,
        &layout,
        &config.rules,
        config.output.encoding,
    );
    println!("{prompt}");
    Ok(())
}

fn print_schema(cli: &Cli) -> Result<()> {
    let mut config = Config::load_unchecked(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    let schema = output_schema(config.output.encoding);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
