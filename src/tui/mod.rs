// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal host.
//!
//! Owns the terminal (ratatui + crossterm), feeds input to a [`DialogStack`], paints every
//! layer back to front, and carries out deferred actions.

use std::{
    error::Error,
    ffi::OsString,
    io,
    path::PathBuf,
    process::{Command, Stdio},
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};
use tracing::{debug, info, warn};

use crate::dialog::{chrome, Dialog, DialogStack, Layer};
use crate::event::{Event, KeyInput};
use crate::message::{DeferredAction, DialogResult, Signal};

mod theme;

pub use theme::{ThemeError, TuiTheme, ENV_PALETTE};

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const TOAST_TTL: Duration = Duration::from_secs(3);
const ERROR_MARK: char = '⚠';

#[derive(Debug, Clone, PartialEq, Eq)]
struct Toast {
    message: String,
    expires_at: Instant,
}

/// Everything the event loop needs except the terminal, so it can be driven headless.
#[derive(Debug)]
pub struct App {
    stack: DialogStack,
    theme: TuiTheme,
    toast: Option<Toast>,
    deferred: Vec<DeferredAction>,
    results: Vec<DialogResult>,
    quit: bool,
}

impl App {
    pub fn new(width: u16, height: u16, theme: TuiTheme) -> Self {
        Self {
            stack: DialogStack::new(width, height),
            theme,
            toast: None,
            deferred: Vec::new(),
            results: Vec::new(),
            quit: false,
        }
    }

    pub fn stack(&self) -> &DialogStack {
        &self.stack
    }

    pub fn theme(&self) -> &TuiTheme {
        &self.theme
    }

    pub fn open(&mut self, dialog: Box<dyn Dialog>, now: Instant) {
        self.process([Signal::OpenDialog(dialog)], now);
    }

    /// Quits once the last dialog closes or on ctrl+c.
    pub fn should_quit(&self) -> bool {
        self.quit || self.stack.is_empty()
    }

    pub fn toast(&self, now: Instant) -> Option<&str> {
        self.toast.as_ref().filter(|t| t.expires_at > now).map(|t| t.message.as_str())
    }

    pub fn set_toast(&mut self, message: impl Into<String>, now: Instant) {
        self.toast = Some(Toast { message: message.into(), expires_at: now + TOAST_TTL });
    }

    pub fn take_results(&mut self) -> Vec<DialogResult> {
        std::mem::take(&mut self.results)
    }

    pub fn take_deferred(&mut self) -> Vec<DeferredAction> {
        std::mem::take(&mut self.deferred)
    }

    pub fn handle_event(&mut self, event: Event, now: Instant) {
        if let Event::Key(key) = &event {
            if *key == KeyInput::ctrl('c') {
                info!("interrupted");
                self.quit = true;
                return;
            }
        }
        if let Some(signals) = self.stack.handle_event(&event) {
            self.process(signals, now);
        }
    }

    /// Applies stack operations and sorts the rest into results, deferred actions, and the
    /// toast line.
    pub fn process(&mut self, signals: impl IntoIterator<Item = Signal>, now: Instant) {
        for signal in self.stack.apply(signals) {
            match signal {
                Signal::Result(result) => {
                    debug!(?result, "dialog result");
                    self.results.push(result);
                }
                Signal::Deferred(action) => {
                    debug!(?action, "deferred action queued");
                    self.deferred.push(action);
                }
                Signal::Notify(message) => self.set_toast(message, now),
                Signal::OpenDialog(_) | Signal::CloseDialog | Signal::CloseAllDialogs => {}
            }
        }
    }
}

/// Runs `dialog` until the stack empties. `on_result` sees each result as it arrives and may
/// answer with more signals (e.g. opening a follow-up dialog). Returns every result in order.
pub fn run(
    dialog: Box<dyn Dialog>,
    theme: TuiTheme,
    mut on_result: impl FnMut(&DialogResult) -> Vec<Signal>,
) -> Result<Vec<DialogResult>, Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let size = terminal.size()?;
    let mut app = App::new(size.width, size.height, theme);
    app.open(dialog, Instant::now());
    let mut seen = Vec::new();

    while !app.should_quit() {
        let now = Instant::now();
        terminal.draw(|frame| draw(frame, &app, now))?;

        if event::poll(POLL_INTERVAL)? {
            let now = Instant::now();
            if let Some(event) = Event::from_crossterm(event::read()?, now) {
                app.handle_event(event, now);
            }
        }

        let now = Instant::now();
        for action in app.take_deferred() {
            if let Err(err) = execute_action(&action) {
                warn!(?action, error = %err, "deferred action failed");
                app.set_toast(format!("Action failed: {err}"), now);
            }
        }
        for result in app.take_results() {
            if is_theme_result(&result) {
                app.handle_event(Event::ThemeChanged, now);
            }
            let follow_up = on_result(&result);
            app.process(follow_up, now);
            seen.push(result);
        }
    }

    Ok(seen)
}

fn is_theme_result(result: &DialogResult) -> bool {
    matches!(
        result,
        DialogResult::ThemePreview { .. }
            | DialogResult::ThemeChange { .. }
            | DialogResult::ThemeCancelPreview { .. }
    )
}

fn draw(frame: &mut Frame<'_>, app: &App, now: Instant) {
    let area = frame.size();
    frame.render_widget(Block::default().style(app.theme.base_style()), area);

    let layers = app.stack.layers();
    let top = layers.len().saturating_sub(1);
    for (index, layer) in layers.iter().enumerate() {
        let rect = layer_rect(layer, area);
        if rect.width == 0 || rect.height == 0 {
            continue;
        }
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border_style(index == top))
            .style(app.theme.base_style());
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        let content = Rect {
            x: inner.x + chrome::PADDING_X,
            width: inner.width.saturating_sub(chrome::PADDING_X * 2),
            ..inner
        };
        frame.render_widget(Paragraph::new(layer_text(layer, &app.theme)), content);
    }

    if let Some(message) = app.toast(now) {
        let row = Rect { y: area.bottom().saturating_sub(1), height: 1.min(area.height), ..area };
        let toast = Paragraph::new(format!(" {message} ")).style(app.theme.toast_style());
        frame.render_widget(toast, row);
    }
}

/// Screen rectangle of a layer, clipped to the terminal.
fn layer_rect(layer: &Layer, area: Rect) -> Rect {
    Rect::new(layer.origin.col, layer.origin.row, layer.size.0, layer.size.1).intersection(area)
}

fn layer_text(layer: &Layer, theme: &TuiTheme) -> Text<'static> {
    let help_row = layer.block.lines.len().checked_sub(1);
    let lines: Vec<Line<'static>> = layer
        .block
        .lines
        .iter()
        .enumerate()
        .map(|(row, line)| {
            let style = if Some(row) == layer.block.highlight {
                theme.selection_style()
            } else if line.trim_start().starts_with(ERROR_MARK) {
                theme.error_style()
            } else if Some(row) == help_row {
                theme.muted_style()
            } else {
                theme.base_style()
            };
            Line::from(Span::styled(line.clone(), style))
        })
        .collect();
    Text::from(lines)
}

fn execute_action(action: &DeferredAction) -> Result<(), String> {
    match action {
        DeferredAction::CopyToClipboard(text) => copy_to_clipboard(text),
        DeferredAction::OpenUrl(url) => open_url(url),
    }
}

fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(text))).map_err(|err| err.to_string())
}

fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct UrlOpenCommand {
    program: PathBuf,
    prefix_args: Vec<OsString>,
}

fn url_command_for_os(target_os: &str) -> Option<UrlOpenCommand> {
    let (program, prefix_args) = match target_os {
        "macos" => ("open", Vec::new()),
        "linux" | "freebsd" | "openbsd" | "netbsd" => ("xdg-open", Vec::new()),
        "windows" => ("cmd", vec![OsString::from("/C"), OsString::from("start"), OsString::from("")]),
        _ => return None,
    };
    Some(UrlOpenCommand { program: PathBuf::from(program), prefix_args })
}

/// Spawns the platform opener without waiting for it.
fn open_url(url: &str) -> Result<(), String> {
    let os = std::env::consts::OS;
    let command =
        url_command_for_os(os).ok_or_else(|| format!("opening URLs is unsupported on {os}"))?;
    Command::new(&command.program)
        .args(&command.prefix_args)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|err| format!("{}: {err}", command.program.display()))
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste).map_err(
            |err| {
                teardown_terminal();
                err
            },
        )?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn size(&self) -> io::Result<Rect> {
        self.terminal.size()
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableBracketedPaste, DisableMouseCapture, LeaveAlternateScreen);
}
