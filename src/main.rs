// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Modalist CLI entrypoint.
//!
//! Opens one picker in the terminal with demo data and prints whatever it returned once the
//! last dialog closes.

use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use modalist::config::DialogConfig;
use modalist::dialog::{
    ChoiceOption, Command, CommandPalette, Dialog, FilePicker, FormDialog, FormField, ModelChoice,
    ModelPicker, ModelSource, MultiChoice, SessionBrowser, SessionSummary, ThemeChoice,
    ThemePicker, WorkingDirPicker,
};
use modalist::message::DialogResult;
use modalist::store::{DirectoryStore, JsonFileStore, MemoryStore};
use modalist::tui::{self, TuiTheme};
use modalist::validation::{PatternCache, StringRules};

const ENV_LOG: &str = "MODALIST_LOG";
const STORE_FILE: &str = "directories.json";

#[derive(Debug, Parser)]
#[command(name = "modalist", version, about = "Open a picker dialog in the terminal")]
struct Cli {
    /// JSON file with dialog settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs here; logging is off without it.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Starting directory for the file and working-directory pickers.
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    picker: PickerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum PickerKind {
    Models,
    Themes,
    Commands,
    Sessions,
    Files,
    Workdir,
    Choice,
    Form,
}

fn init_file_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create log directory {}: {err}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| format!("failed to open log file {}: {err}", path.display()))?;

    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Configured file, then the platform data dir, then memory only.
fn open_store(config: &DialogConfig) -> Arc<dyn DirectoryStore> {
    let path = config
        .favorites_path
        .clone()
        .or_else(|| dirs::data_dir().map(|dir| dir.join("modalist").join(STORE_FILE)));
    match path.map(JsonFileStore::open) {
        Some(Ok(store)) => Arc::new(store),
        Some(Err(err)) => {
            warn!(error = %err, "directory store unavailable; using memory");
            Arc::new(MemoryStore::default())
        }
        None => Arc::new(MemoryStore::default()),
    }
}

fn demo_models() -> Vec<ModelChoice> {
    vec![
        ModelChoice::new("Claude Sonnet", "anthropic", "claude-sonnet-4-0", ModelSource::Config)
            .current(),
        ModelChoice::new("GPT-4o", "openai", "gpt-4o", ModelSource::Config).default_model(),
        ModelChoice::new("Gemini 2.5 Pro", "google", "gemini-2.5-pro", ModelSource::Catalog),
        ModelChoice::new("Mistral Large", "mistral", "mistral-large-latest", ModelSource::Catalog),
        ModelChoice::new("Grok 3", "xai", "grok-3", ModelSource::Catalog),
        ModelChoice::new("Local Llama", "ollama", "llama3.2", ModelSource::Custom),
    ]
}

fn demo_themes() -> Vec<ThemeChoice> {
    vec![
        ThemeChoice::builtin("default", "Default").default_theme(),
        ThemeChoice::builtin("dracula", "Dracula").current(),
        ThemeChoice::builtin("nord", "Nord"),
        ThemeChoice::builtin("solarized-dark", "Solarized Dark"),
        ThemeChoice::custom("user:midnight", "Midnight"),
    ]
}

fn demo_commands() -> Vec<Command> {
    vec![
        Command::new("session.new", "New session", "Session")
            .with_description("Start a fresh conversation")
            .with_slash("/new"),
        Command::new("session.browse", "Browse sessions", "Session").with_slash("/sessions"),
        Command::new("session.compact", "Compact", "Session")
            .with_description("Summarize the conversation so far"),
        Command::new("settings.model", "Switch model", "Settings").with_slash("/model"),
        Command::new("settings.theme", "Change theme", "Settings").with_slash("/theme"),
        Command::new("help.docs", "Open documentation", "Help")
            .with_url("https://docs.rs/modalist"),
    ]
}

fn demo_sessions() -> Vec<SessionSummary> {
    let now = Utc::now();
    [
        ("a1f3", "Fix flaky scroll test", Duration::minutes(4), 12, true),
        ("b7c2", "Refactor dialog stack", Duration::hours(3), 48, false),
        ("c9d0", "Release notes draft", Duration::days(2), 6, false),
        ("d4e8", "Investigate resize glitch", Duration::days(9), 31, true),
    ]
    .into_iter()
    .map(|(id, title, age, message_count, starred)| SessionSummary {
        id: id.to_owned(),
        title: title.to_owned(),
        created_at: now - age,
        message_count,
        starred,
    })
    .collect()
}

fn demo_choice(config: &DialogConfig) -> MultiChoice {
    let options = vec![
        ChoiceOption::new("unit", "Add unit tests"),
        ChoiceOption::new("docs", "Update the docs"),
        ChoiceOption::new("bench", "Run the benchmarks"),
    ];
    MultiChoice::new("What next?", options, true, config).with_custom_input("Something else…")
}

fn demo_form() -> FormDialog {
    let fields = vec![
        FormField::new(
            "email",
            "Email",
            StringRules { required: true, format: Some("email".into()), ..StringRules::default() },
        ),
        FormField::new(
            "branch",
            "Branch",
            StringRules {
                max_length: Some(40),
                pattern: Some(r"^[A-Za-z0-9._/-]+$".into()),
                ..StringRules::default()
            },
        ),
        FormField::new(
            "due",
            "Due date",
            StringRules { format: Some("date".into()), ..StringRules::default() },
        ),
    ];
    FormDialog::new("Request", "Where should the report go?", fields, Arc::new(PatternCache::new()))
}

fn build_dialog(
    kind: PickerKind,
    cwd: &Path,
    config: &DialogConfig,
    store: &Arc<dyn DirectoryStore>,
) -> Box<dyn Dialog> {
    match kind {
        PickerKind::Models => Box::new(ModelPicker::new(demo_models(), config)),
        PickerKind::Themes => Box::new(ThemePicker::new(demo_themes(), "dracula", config)),
        PickerKind::Commands => Box::new(CommandPalette::new(demo_commands(), config)),
        PickerKind::Sessions => Box::new(SessionBrowser::new(demo_sessions(), config)),
        PickerKind::Files => Box::new(FilePicker::new(cwd, None, config)),
        PickerKind::Workdir => {
            Box::new(WorkingDirPicker::new(Arc::clone(store), cwd.to_path_buf(), config))
        }
        PickerKind::Choice => Box::new(demo_choice(config)),
        PickerKind::Form => Box::new(demo_form()),
    }
}

fn main() {
    let cli = Cli::parse();

    let result = (|| -> Result<(), Box<dyn Error>> {
        if let Some(path) = &cli.log_file {
            init_file_logging(path)?;
        }

        let config = DialogConfig::load(cli.config.as_deref())?;
        let theme = TuiTheme::from_env()?;
        let cwd = match &cli.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        let store = open_store(&config);
        info!(picker = ?cli.picker, dir = %cwd.display(), "starting");

        let dialog = build_dialog(cli.picker, &cwd, &config, &store);
        let recorder = Arc::clone(&store);
        let results = tui::run(dialog, theme, move |result| {
            if let DialogResult::SpawnSession { dir } = result {
                if let Err(err) = recorder.record_recent(dir) {
                    warn!(error = %err, "failed to record recent directory");
                }
            }
            Vec::new()
        })?;

        for result in results {
            println!("{result:?}");
        }
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("modalist: {err}");
        std::process::exit(1);
    }
}
