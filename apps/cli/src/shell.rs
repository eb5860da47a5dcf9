//! Interactive session: one line per user action, same semantics as the web page.

use std::{io::Write, path::PathBuf};

use anyhow::Result;
use client_core::{
    view::{Control, Field, SessionView},
    ActionError, LocalFile, SessionController, TranslationInput, TranslatorBackend,
};
use shared::domain::ArtifactKind;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::terminal::TerminalView;

const HELP: &str = "\
commands:
  key <api-key>          set the API key
  mask                   show/hide the API key in status
  test                   test the API connection
  upload <path>          upload a .xlsx/.xls workbook
  keyword <text>         set the domain hint used for translation
  match                  run terminology matching on the upload
  translate [uploaded]   translate (matched workbook if available)
  continue               translate the terminology-matched workbook
  download [terminology] save the translated or matched workbook
  status                 show the session
  health                 check the server
  reset                  start over
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    Key(String),
    Mask,
    Test,
    Upload(PathBuf),
    Keyword(String),
    Match,
    Translate(TranslationInput),
    Continue,
    Download(ArtifactKind),
    Status,
    Health,
    Reset,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match (verb.to_ascii_lowercase().as_str(), rest) {
        ("", _) => ShellCommand::Empty,
        ("key", key) => ShellCommand::Key(key.to_string()),
        ("mask", "") => ShellCommand::Mask,
        ("test", "") => ShellCommand::Test,
        ("upload", "") => return Err("usage: upload <path>".into()),
        ("upload", path) => ShellCommand::Upload(PathBuf::from(path)),
        ("keyword", keyword) => ShellCommand::Keyword(keyword.to_string()),
        ("match", "") => ShellCommand::Match,
        ("translate", "") => ShellCommand::Translate(TranslationInput::Auto),
        ("translate", "uploaded") => ShellCommand::Translate(TranslationInput::Uploaded),
        ("translate", "matched") => ShellCommand::Translate(TranslationInput::TerminologyMatched),
        ("continue", "") => ShellCommand::Continue,
        ("download", "") => ShellCommand::Download(ArtifactKind::Translation),
        ("download", "terminology") => ShellCommand::Download(ArtifactKind::Terminology),
        ("status", "") => ShellCommand::Status,
        ("health", "") => ShellCommand::Health,
        ("reset", "") => ShellCommand::Reset,
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit", "") => ShellCommand::Quit,
        _ => return Err(format!("unknown command: {line} (type `help`)")),
    };
    Ok(command)
}

fn settle<T>(result: Result<T, ActionError>) {
    if let Err(err) = result {
        debug!(error = %err, "shell action did not complete");
    }
}

fn print_status<B: TranslatorBackend>(controller: &SessionController<B, TerminalView>) {
    let session = controller.session();
    let view = controller.view();
    let show = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    println!("API key:            {}", show(Some(view.display_key()).filter(|k| !k.is_empty())));
    println!("Keywords:           {}", show(Some(view.field(Field::Keywords)).filter(|k| !k.is_empty())));
    println!(
        "Uploaded file:      {}",
        show(session.uploaded_file.as_ref().map(|file| file.name.clone()))
    );
    println!("Server file:        {}", show(session.current_filename.as_ref().map(ToString::to_string)));
    println!(
        "Terminology result: {}",
        show(session.terminology_download_filename.as_ref().map(ToString::to_string))
    );
    println!(
        "Matched input:      {}",
        show(session.terminology_matched_filename.as_ref().map(ToString::to_string))
    );
    println!("Translation result: {}", show(session.download_filename.as_ref().map(ToString::to_string)));

    let ready: Vec<&str> = [
        (Control::TerminologyMatch, "match"),
        (Control::StartTranslation, "translate"),
        (Control::TranslateAfterTerminology, "continue"),
        (Control::DownloadResult, "download"),
        (Control::DownloadTerminology, "download terminology"),
    ]
    .into_iter()
    .filter(|(control, _)| view.is_enabled(*control))
    .map(|(_, name)| name)
    .collect();
    println!("Available:          {}", if ready.is_empty() { "-".to_string() } else { ready.join(", ") });
}

pub async fn run_shell<B: TranslatorBackend>(
    controller: &mut SessionController<B, TerminalView>,
) -> Result<()> {
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        match command {
            ShellCommand::Empty => {}
            ShellCommand::Key(key) => {
                controller.view_mut().set_field(Field::ApiKey, &key);
                controller.check_validity();
            }
            ShellCommand::Mask => {
                let visible = controller.toggle_key_visibility();
                println!("API key {}", if visible { "shown" } else { "hidden" });
            }
            ShellCommand::Test => settle(controller.validate_connection().await),
            ShellCommand::Upload(path) => match LocalFile::from_path(&path).await {
                Ok(file) => settle(controller.upload_file(file).await),
                Err(err) => eprintln!("[error] Error: {err:#}"),
            },
            ShellCommand::Keyword(keyword) => controller.select_keyword(&keyword),
            ShellCommand::Match => settle(controller.start_terminology_match().await),
            ShellCommand::Translate(input) => settle(controller.translate(input).await),
            ShellCommand::Continue => settle(controller.continue_after_terminology().await),
            ShellCommand::Download(kind) => settle(controller.download_artifact(kind).await),
            ShellCommand::Status => print_status(controller),
            ShellCommand::Health => settle(controller.check_health().await),
            ShellCommand::Reset => controller.reset_session(),
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => break,
        }
    }

    Ok(())
}
