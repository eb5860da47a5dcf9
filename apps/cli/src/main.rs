use std::{path::PathBuf, process::ExitCode};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    view::{Field, SessionView},
    ActionError, HttpBackend, LocalFile, SessionController, TranslationInput,
};
use shared::domain::ArtifactKind;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod shell;
mod terminal;

use config::{load_settings, normalize_server_url, Settings, DEFAULT_CONFIG_FILE};
use terminal::TerminalView;

#[derive(Parser, Debug)]
#[command(name = "translator", about = "Client for the spreadsheet translation service")]
struct Args {
    /// Base URL of the translation server.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    api_key: Option<String>,
    /// Directory downloaded workbooks are written to.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up.
    Health,
    /// Validate the API key against the server.
    TestConnection,
    /// Upload a workbook and print its statistics.
    Inspect { file: PathBuf },
    /// Upload, optionally match terminology, translate, optionally download.
    Run {
        file: PathBuf,
        /// Domain hint such as "finance" or "medical".
        #[arg(long)]
        keywords: Option<String>,
        #[arg(long)]
        terminology: bool,
        #[arg(long)]
        download: bool,
    },
    /// Interactive session.
    Shell,
}

fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = load_settings(&args.config)?;
    if let Some(server_url) = &args.server_url {
        settings.server_url = normalize_server_url(server_url);
    }
    if let Some(api_key) = &args.api_key {
        settings.api_key = Some(api_key.clone());
    }
    if let Some(output_dir) = &args.output_dir {
        settings.output_dir = output_dir.clone();
    }
    Ok(settings)
}

fn require_api_key(settings: &Settings) -> Result<&str> {
    match settings.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key),
        _ => bail!("an API key is required (--api-key, TRANSLATOR_API_KEY or the config file)"),
    }
}

async fn execute(
    controller: &mut SessionController<HttpBackend, TerminalView>,
    settings: &Settings,
    command: Command,
) -> Result<()> {
    match command {
        Command::Health => {
            let health = controller.check_health().await?;
            println!("{} ({})", health.status, health.timestamp);
        }
        Command::TestConnection => {
            require_api_key(settings)?;
            controller.validate_connection().await?;
        }
        Command::Inspect { file } => {
            let file = LocalFile::from_path(&file).await?;
            controller.upload_file(file).await?;
        }
        Command::Run {
            file,
            keywords,
            terminology,
            download,
        } => {
            require_api_key(settings)?;
            if let Some(keywords) = keywords {
                controller.view_mut().set_field(Field::Keywords, &keywords);
            }

            let file = LocalFile::from_path(&file).await?;
            controller.upload_file(file).await?;
            if terminology {
                controller.start_terminology_match().await?;
                if download {
                    controller.download_artifact(ArtifactKind::Terminology).await?;
                }
            }
            controller.translate(TranslationInput::Auto).await?;
            if download {
                controller.download_artifact(ArtifactKind::Translation).await?;
            }
        }
        Command::Shell => shell::run_shell(controller).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = resolve_settings(&args)?;
    info!(server_url = %settings.server_url, "using translation server");

    let backend = HttpBackend::new(&settings.server_url)
        .with_context(|| format!("cannot use server url '{}'", settings.server_url))?;
    let mut view = TerminalView::new(settings.output_dir.clone());
    if let Some(api_key) = &settings.api_key {
        view.set_field(Field::ApiKey, api_key);
    }
    view.set_field(Field::Keywords, &settings.keywords);
    let mut controller = SessionController::new(backend, view);

    exit_status(execute(&mut controller, &settings, args.command).await)
}

/// Action failures were already shown as error toasts; only the exit status is left.
fn exit_status(outcome: Result<()>) -> Result<ExitCode> {
    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) if err.is::<ActionError>() => Ok(ExitCode::FAILURE),
        Err(err) => Err(err),
    }
}
