mod adapters;
mod config;
mod core;

use adapters::llm::{LLMAdapter, ModelConfig};
use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kindscope")]
#[command(about = "Transform harsh code review comments into empathetic, educational feedback", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(help = "JSON file containing code snippet and review comments")]
    input: PathBuf,

    #[arg(short = 'k', long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(short, long, env = "OPENAI_MODEL")]
    model: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, help = "Sampling temperature for comment transforms")]
    temperature: Option<f32>,

    #[arg(long, help = "Token budget for each comment transform")]
    max_tokens: Option<usize>,

    #[arg(long, default_value = "markdown")]
    output_format: OutputFormat,

    #[arg(
        short,
        long,
        help = "Output file path (prints to stdout if not provided)"
    )]
    output: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

#[tokio::main]
async fn main() {
    // load .env if present; ignore if missing
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::Config::load().unwrap_or_else(|err| {
        warn!("Ignoring unreadable config file: {:#}", err);
        config::Config::default()
    });

    let code = execute(
        cli,
        config,
        adapters::llm::create_adapter,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await;
    std::process::exit(code);
}

/// Top-level boundary. The report goes to `out` only on success; any error
/// becomes an error document on `diag`. Returns the process exit status.
async fn execute<F>(
    cli: Cli,
    config: config::Config,
    create_adapter: F,
    out: &mut impl Write,
    diag: &mut impl Write,
) -> i32
where
    F: FnOnce(&ModelConfig) -> Result<Box<dyn LLMAdapter>>,
{
    let outcome = match run(cli, config, create_adapter).await {
        Ok(Some(document)) => writeln!(out, "{}", document).map_err(anyhow::Error::from),
        Ok(None) => Ok(()),
        Err(err) => Err(err),
    };

    match outcome {
        Ok(()) => 0,
        Err(err) => {
            let _ = writeln!(diag, "{}", error_document(&err));
            1
        }
    }
}

/// Returns the rendered document, or `None` once it has been written to
/// `--output`.
async fn run<F>(cli: Cli, mut config: config::Config, create_adapter: F) -> Result<Option<String>>
where
    F: FnOnce(&ModelConfig) -> Result<Box<dyn LLMAdapter>>,
{
    config.merge_with_cli(config::CliOverrides {
        api_key: cli.api_key,
        model: cli.model,
        base_url: cli.base_url,
        temperature: cli.temperature,
        max_tokens: cli.max_tokens,
    });
    config.require_api_key()?;

    let adapter = create_adapter(&config.model_config())?;
    let document = review_file(
        &cli.input,
        adapter,
        config.pipeline_options(),
        cli.output_format,
    )
    .await?;

    info!("Complete!");
    match cli.output {
        Some(path) => {
            tokio::fs::write(&path, &document).await?;
            info!("Report written to {}", path.display());
            Ok(None)
        }
        None => Ok(Some(document)),
    }
}

/// Loads the input document, runs the pipeline and renders the report.
/// Nothing is rendered unless every comment was transformed.
async fn review_file(
    input_path: &Path,
    adapter: Box<dyn LLMAdapter>,
    options: core::PipelineOptions,
    format: OutputFormat,
) -> Result<String> {
    let input = core::ReviewInput::load(input_path).await?;

    let pipeline = core::ReviewPipeline::new(core::CompletionClient::new(adapter), options);
    let report = pipeline.run(&input).await?;

    match format {
        OutputFormat::Markdown => Ok(core::ReportRenderer::render(&report)),
        OutputFormat::Json => core::ReportRenderer::render_json(&report),
    }
}

fn error_document(err: &anyhow::Error) -> String {
    core::ReportRenderer::render_error(&format!("{:#}", err))
}
