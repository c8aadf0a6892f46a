use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::AsyncReadExt;

use inbox_triage::config::TriageConfig;
use inbox_triage::error::{ConfigError, Error, InputError, Result};
use inbox_triage::llm::{LlmConfig, create_provider};
use inbox_triage::pipeline::{
    ClassificationResult, EmailProcessor, FileKind, ProcessorConfig, Upload,
};

/// Classify an email and draft a suggested reply.
#[derive(Parser)]
#[command(name = "inbox-triage")]
#[command(version, about = "Classify emails as productive or unproductive", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an uploaded .pdf or .txt file
    File {
        /// Path to the file
        path: PathBuf,

        /// Override the kind inferred from the extension
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Classify directly typed text
    Text {
        /// Email body ("-" reads it from stdin)
        #[arg(short, long)]
        body: String,

        /// Email subject
        #[arg(short, long)]
        subject: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Pdf,
    Txt,
}

impl From<KindArg> for FileKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Pdf => FileKind::Pdf,
            KindArg::Txt => FileKind::Txt,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries only the JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: failed to serialize result: {e}");
                ExitCode::from(1)
            }
        },
        Err(e) => {
            report(&e);
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run(command: Commands) -> Result<ClassificationResult> {
    let config = TriageConfig::from_env()?;
    let llm = create_provider(&LlmConfig::from(&config))?;
    let processor = EmailProcessor::new(llm, ProcessorConfig::from(&config));

    let result = match command {
        Commands::File { path, kind } => {
            let upload =
                Upload::from_path(&path, kind.map(Into::into), config.max_upload_bytes).await?;
            processor.process_file(&upload).await?
        }
        Commands::Text { body, subject } => {
            let body = if body == "-" {
                let mut buf = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut buf)
                    .await
                    .map_err(InputError::from)?;
                buf
            } else {
                body
            };
            processor
                .process_direct_text(subject.as_deref(), &body)
                .await?
        }
    };
    Ok(result)
}

/// Client errors are reported as JSON on stdout, everything else on stderr.
fn report(error: &Error) {
    if error.is_client_error() {
        println!("{}", serde_json::json!({ "error": error.to_string() }));
        return;
    }
    eprintln!("Error: {error}");
    if matches!(error, Error::Config(ConfigError::MissingEnvVar(_))) {
        eprintln!("  export HUGGINGFACE_API_KEY=hf_...");
    }
}

fn exit_code(error: &Error) -> u8 {
    if error.is_client_error() { 2 } else { 1 }
}
