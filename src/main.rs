mod anthropic;
mod cli;
mod config;
mod error;
mod logging;
mod model;
mod orchestrator;
mod steps;
mod structured;
mod ui;
mod workflow;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};

use crate::anthropic::AnthropicClient;
use crate::config::EdugenConfig;
use crate::error::EdugenError;
use crate::model::{Content, Review, Schema};
use crate::orchestrator::{ContentWorkflow, ProgressSink};
use crate::structured::{AnthropicGenerator, StructuredGenerator};
use crate::ui::WorkflowProgress;

/// Exit status for a blank topic, matching clap's usage errors.
const EXIT_USAGE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&Content::json_schema())?);
            println!("{}", serde_json::to_string_pretty(&Review::json_schema())?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Generate {
            grade,
            topic,
            inspect,
            output,
            json,
        } => {
            let args = GenerateArgs {
                grade,
                topic,
                inspect,
                output,
                json,
            };
            // Before config, so a missing API key doesn't mask the real problem.
            if let Some(code) = reject_blank_topic(&args.topic, &mut io::stderr())? {
                return Ok(ExitCode::from(code));
            }

            let mut config = match &cli.config {
                Some(path) => EdugenConfig::load_from(path)?,
                None => EdugenConfig::load()?,
            };
            if let Some(model) = cli.model {
                config.model = model;
            }
            config.attach_feedback |= cli.attach_feedback;
            config.validate_answers |= cli.validate_answers;
            config.validate()?;

            let client = AnthropicClient::with_timeouts(
                config.api_key.clone(),
                config.base_url.clone(),
                config.connect_timeout(),
                config.timeout(),
            )
            .context("failed to build HTTP client")?;
            let service = AnthropicGenerator::new(client, config.model_settings());
            tracing::debug!(model = %service.settings().model, "using model");
            let workflow = ContentWorkflow::with_options(service, config.generator_options());

            let progress = WorkflowProgress::start(args.grade, args.topic.trim());
            let code = generate_content(
                &workflow,
                &args,
                &progress,
                &mut io::stdout().lock(),
                &mut io::stderr(),
            )
            .await?;
            Ok(ExitCode::from(code))
        }
    }
}

/// Parsed `generate` arguments.
struct GenerateArgs {
    grade: u8,
    topic: String,
    inspect: bool,
    output: Option<PathBuf>,
    json: bool,
}

fn reject_blank_topic(topic: &str, err: &mut impl Write) -> io::Result<Option<u8>> {
    if topic.trim().is_empty() {
        writeln!(err, "Please enter a topic.")?;
        return Ok(Some(EXIT_USAGE));
    }
    Ok(None)
}

/// Runs one invocation and writes its result.
///
/// Only the payload goes to `out`: rendered content in text mode, the whole
/// [`InvocationReport`](crate::orchestrator::InvocationReport) under `--json`.
/// Status and save notices go to `err`.
async fn generate_content<S: StructuredGenerator>(
    workflow: &ContentWorkflow<S>,
    args: &GenerateArgs,
    progress: &impl ProgressSink,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<u8, EdugenError> {
    if let Some(code) = reject_blank_topic(&args.topic, err)? {
        return Ok(code);
    }

    let report = match workflow.run(args.grade, &args.topic, progress).await {
        Ok(report) => report,
        Err(e) => {
            writeln!(err, "No content generated.")?;
            return Err(e.into());
        }
    };
    let Some(content) = report.state.generator_output.as_ref() else {
        writeln!(err, "No content generated.")?;
        return Ok(1);
    };

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        writeln!(out)?;
        write!(out, "{}", ui::render_content(content))?;
        if args.inspect {
            writeln!(out)?;
            write!(out, "{}", ui::render_inspector(&report))?;
        }
    }

    if let Some(path) = &args.output {
        save_content(path, content)?;
        writeln!(err, "Saved content to {}", path.display())?;
    }

    Ok(0)
}

/// Writes the content as pretty JSON, the same shape the reviewer sees.
fn save_content(path: &Path, content: &Content) -> Result<(), EdugenError> {
    let json = content.to_pretty_json()?;
    std::fs::write(path, json)?;
    Ok(())
}
