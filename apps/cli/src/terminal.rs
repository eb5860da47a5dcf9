//! Terminal rendering of the session view.

use std::{collections::HashMap, fs, path::PathBuf};

use anyhow::{Context, Result};
use client_core::{
    format::format_file_size,
    validation::artifact_file_name,
    view::{
        ConnectionStatus, Control, Field, FileDetails, Panel, PanelContent, Progress, SessionView,
        TerminologySummary, Toast, ToastKind, TranslationSummary,
    },
};
use shared::protocol::FileAnalysis;

pub struct TerminalView {
    fields: HashMap<Field, String>,
    enabled: HashMap<Control, bool>,
    output_dir: PathBuf,
    key_masked: bool,
}

impl TerminalView {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            fields: HashMap::new(),
            enabled: HashMap::new(),
            output_dir,
            key_masked: true,
        }
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        self.enabled.get(&control).copied().unwrap_or(false)
    }

    pub fn display_key(&self) -> String {
        let key = self.field(Field::ApiKey);
        if !self.key_masked || key.is_empty() {
            return key;
        }
        let visible: String = key.chars().take(4).collect();
        format!("{visible}{}", "*".repeat(key.chars().count().saturating_sub(4)))
    }
}

fn render_file_details(details: &FileDetails) {
    println!("File name:   {}", details.original_name);
    println!("File size:   {}", format_file_size(details.size));
    match &details.analysis {
        Some(FileAnalysis::Stats {
            total_sheets,
            target_script_cells,
            sheets,
        }) => {
            println!("Sheets:      {total_sheets}");
            println!("Cells to translate: {target_script_cells}");
            if !sheets.is_empty() {
                println!("Sheet names: {}", sheets.join(", "));
            }
        }
        Some(FileAnalysis::Unavailable { error }) => println!("Analysis:    {error}"),
        None => println!("Analysis:    unavailable"),
    }
}

fn render_terminology(summary: &TerminologySummary) {
    println!("Terminology match succeeded");
    println!("Matched file:      {}", summary.download_filename);
    println!("Terms replaced:    {}", summary.replacement_count);
    println!("File size:         {}", format_file_size(summary.file_size));
    println!("Download the matched file or continue to translation.");
}

fn render_translation(summary: &TranslationSummary) {
    println!("Translation complete");
    if let Some(source_name) = &summary.source_name {
        println!("Source file:     {source_name}");
    }
    println!("Translated file: {}", summary.download_filename);
    println!("File size:       {}", format_file_size(summary.output_size));
}

impl SessionView for TerminalView {
    fn field(&self, field: Field) -> String {
        self.fields.get(&field).cloned().unwrap_or_default()
    }

    fn set_field(&mut self, field: Field, value: &str) {
        self.fields.insert(field, value.to_string());
    }

    fn set_enabled(&mut self, control: Control, enabled: bool) {
        self.enabled.insert(control, enabled);
    }

    fn set_busy(&mut self, control: Control, busy: bool) {
        if busy && control == Control::TestConnection {
            println!("Testing connection...");
        }
    }

    fn set_progress(&mut self, progress: Progress, visible: bool) {
        if !visible {
            return;
        }
        match progress {
            Progress::Terminology => println!("Matching terminology..."),
            Progress::Translation => println!("Translating; large workbooks can take several minutes..."),
        }
    }

    fn show(&mut self, content: PanelContent) {
        match &content {
            PanelContent::ConnectionStatus(ConnectionStatus::Connected(message)) => {
                println!("Connection: {message}");
            }
            PanelContent::ConnectionStatus(ConnectionStatus::Failed(message)) => {
                println!("Connection failed: {message}");
            }
            PanelContent::FileInfo(details) => render_file_details(details),
            PanelContent::TerminologyResult(summary) => render_terminology(summary),
            PanelContent::TranslationResult(summary) => render_translation(summary),
        }
    }

    fn hide(&mut self, _panel: Panel) {}

    fn notify(&mut self, toast: Toast) {
        let tag = match toast.kind {
            ToastKind::Success => "ok",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
            ToastKind::Warning => "warn",
        };
        eprintln!("[{tag}] {}: {}", toast.title, toast.message);
    }

    fn set_key_masked(&mut self, masked: bool) {
        self.key_masked = masked;
    }

    fn save_artifact(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let name = artifact_file_name(name)?;
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("failed to create output directory '{}'", self.output_dir.display())
        })?;
        let path = self.output_dir.join(name);
        fs::write(&path, bytes).with_context(|| format!("failed to write '{}'", path.display()))?;
        println!("Saved {}", path.display());
        Ok(())
    }
}
