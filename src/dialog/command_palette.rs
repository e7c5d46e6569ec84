// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;

use super::chrome::Sizing;
use super::picker::{MouseOutcome, PickerFrame, PickerList, STANDARD_FOOTER_ROWS, STANDARD_HEADER_ROWS};
use super::{Dialog, TextBlock};
use crate::config::DialogConfig;
use crate::event::{Event, Key, KeyInput};
use crate::list::{GroupLayout, Origin, Pickable, SelectionPolicy};
use crate::message::{self, DeferredAction, DialogResult, Signal, Signals};
use crate::text;

const SIZING: Sizing =
    Sizing { width_percent: 80, min_width: 50, max_width: 80, height_percent: 70, max_height: 30 };

const HELP: &[(&str, &str)] = &[("↑/↓", "navigate"), ("enter", "execute"), ("esc", "close")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: String,
    pub label: String,
    pub description: String,
    pub category: String,
    pub slash_command: String,
    /// Link commands open this in the browser instead of reporting `CommandExecute`.
    pub url: Option<String>,
}

impl Command {
    pub fn new(id: impl Into<String>, label: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: String::new(),
            category: category.into(),
            slash_command: String::new(),
            url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_slash(mut self, slash_command: impl Into<String>) -> Self {
        self.slash_command = slash_command.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl Pickable for Command {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }

    fn search_text(&self) -> Cow<'_, str> {
        Cow::Owned(format!(
            "{}\n{}\n{}\n{}",
            self.label, self.description, self.category, self.slash_command
        ))
    }

    fn group(&self) -> &str {
        &self.category
    }
}

/// Stable-sorts commands so each category is contiguous, in first-seen order.
fn group_by_category(commands: Vec<Command>) -> Vec<Command> {
    let mut order: Vec<String> = Vec::new();
    for command in &commands {
        if !order.contains(&command.category) {
            order.push(command.category.clone());
        }
    }
    let mut commands = commands;
    commands.sort_by_key(|c| order.iter().position(|cat| *cat == c.category));
    commands
}

fn render_command(command: &Command, width: usize) -> String {
    let label = format!(" {}", command.label);
    let label_width = text::display_width(&label);
    let room = width.saturating_sub(label_width + 3);
    if command.description.is_empty() || room == 0 {
        return text::truncate(&label, width);
    }
    format!("{label} • {}", text::truncate(&command.description, room))
}

#[derive(Debug)]
pub struct CommandPalette {
    list: PickerList<Command>,
    frame: PickerFrame,
}

impl CommandPalette {
    pub fn new(commands: Vec<Command>, config: &DialogConfig) -> Self {
        let mut list = PickerList::new(
            group_by_category(commands),
            SelectionPolicy::Reset,
            GroupLayout::Headers,
            config,
        );
        list.set_placeholder(Some("No commands found".to_owned()));
        let mut palette =
            Self { list, frame: PickerFrame::new(SIZING, STANDARD_HEADER_ROWS, STANDARD_FOOTER_ROWS) };
        palette.redraw();
        palette
    }

    pub fn selected_command(&self) -> Option<&Command> {
        self.list.current()
    }

    pub fn visible_commands(&self) -> impl Iterator<Item = &Command> + '_ {
        self.list.filter().filtered()
    }

    pub fn list(&self) -> &PickerList<Command> {
        &self.list
    }

    fn redraw(&mut self) {
        self.list.rebuild(render_command, |category, width| text::truncate(category, width));
    }

    fn execute(&self) -> Signals {
        let Some(command) = self.list.current() else {
            return message::none();
        };
        match &command.url {
            Some(url) => {
                let mut out = message::close();
                out.push(Signal::Deferred(DeferredAction::OpenUrl(url.clone())));
                out
            }
            None => message::close_with(DialogResult::CommandExecute { id: command.id.clone() }),
        }
    }

    fn handle_key(&mut self, key: &KeyInput) -> Signals {
        match key.key {
            Key::Esc => message::close(),
            Key::Enter => self.execute(),
            _ => {
                if !self.list.handle_nav(key) && self.list.edit_query(key) {
                    self.redraw();
                }
                message::none()
            }
        }
    }
}

impl Dialog for CommandPalette {
    fn handle_event(&mut self, event: &Event) -> Signals {
        match event {
            Event::Resize { width, height } => {
                self.frame.resize(*width, *height);
                self.list.set_size(self.frame.content_width(), self.frame.list_height());
                self.redraw();
                message::none()
            }
            Event::ThemeChanged => message::none(),
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => {
                if self.list.paste(text) {
                    self.redraw();
                }
                message::none()
            }
            _ => match self.list.handle_mouse(event, &self.frame, 0) {
                MouseOutcome::Confirmed(_) => self.execute(),
                _ => message::none(),
            },
        }
    }

    fn view(&self) -> TextBlock {
        self.list.standard_block(&self.frame, "Commands", "Type to search commands…", None, HELP)
    }

    fn screen_size(&self) -> (u16, u16) {
        self.frame.screen()
    }

    fn size(&self) -> (u16, u16) {
        self.frame.outer_size()
    }

    fn position(&self) -> Origin {
        self.frame.origin()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{render_command, Command, CommandPalette};
    use crate::config::DialogConfig;
    use crate::dialog::Dialog;
    use crate::event::{Event, Key, KeyInput};
    use crate::list::{LineTarget, RenderedLine};
    use crate::message::{results, DeferredAction, DialogResult, Signal};

    fn palette() -> CommandPalette {
        let commands = vec![
            Command::new("new", "New session", "Session").with_slash("/new"),
            Command::new("yolo", "Toggle yolo", "Settings").with_description("Auto-approve tools"),
            Command::new("compact", "Compact", "Session").with_description("Summarize history"),
            Command::new("theme", "Theme", "Settings").with_slash("/theme"),
        ];
        let mut palette = CommandPalette::new(commands, &DialogConfig::default());
        palette.handle_event(&Event::Resize { width: 100, height: 40 });
        palette
    }

    #[test]
    fn categories_get_headers_in_first_seen_order() {
        let palette = palette();
        let ids: Vec<&str> = palette.visible_commands().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["new", "compact", "yolo", "theme"]);

        let lines = palette.list().lines();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines.lines()[0], RenderedLine::Separator("Session".into()));
        assert_eq!(lines.lines()[3], RenderedLine::Spacer);
        assert_eq!(lines.line_to_item_index(4), LineTarget::Separator);
        assert_eq!(lines.item_index_to_line(2), Some(5));
    }

    #[test]
    fn filter_matches_slash_command_and_description() {
        let mut palette = palette();
        palette.handle_event(&Event::Paste("/the".into()));
        let ids: Vec<&str> = palette.visible_commands().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["theme"]);

        let mut palette = self::palette();
        for ch in "history".chars() {
            palette.handle_event(&Event::key(KeyInput::char(ch)));
        }
        assert_eq!(palette.selected_command().map(|c| c.id.as_str()), Some("compact"));
    }

    #[test]
    fn query_change_resets_selection() {
        let mut palette = palette();
        palette.handle_event(&Event::key(Key::End));
        assert_eq!(palette.selected_command().map(|c| c.id.as_str()), Some("theme"));
        palette.handle_event(&Event::key(KeyInput::char('e')));
        palette.handle_event(&Event::key(Key::Backspace));
        assert_eq!(palette.list().selected(), Some(0));
    }

    #[test]
    fn ctrl_j_and_k_navigate() {
        let mut palette = palette();
        palette.handle_event(&Event::key(KeyInput::ctrl('j')));
        palette.handle_event(&Event::key(KeyInput::ctrl('j')));
        palette.handle_event(&Event::key(KeyInput::ctrl('k')));
        assert_eq!(palette.selected_command().map(|c| c.id.as_str()), Some("compact"));
    }

    #[test]
    fn enter_executes_selected_command() {
        let mut palette = palette();
        palette.handle_event(&Event::key(Key::Down));
        let signals = palette.handle_event(&Event::key(Key::Enter));
        assert_eq!(results(&signals), vec![DialogResult::CommandExecute { id: "compact".into() }]);
    }

    #[test]
    fn double_click_executes_and_header_clicks_do_nothing() {
        let mut palette = palette();
        let origin = palette.position();
        let top = origin.row + 5;
        let col = origin.col + 4;
        let t0 = Instant::now();

        assert!(palette.handle_event(&Event::click(col, top, t0)).is_empty());
        palette.handle_event(&Event::click(col, top + 6, t0));
        let signals =
            palette.handle_event(&Event::click(col, top + 6, t0 + Duration::from_millis(50)));
        assert_eq!(results(&signals), vec![DialogResult::CommandExecute { id: "theme".into() }]);
    }

    #[test]
    fn link_commands_open_their_url() {
        let commands = vec![
            Command::new("docs", "Documentation", "Help").with_url("https://example.com/docs"),
            Command::new("new", "New session", "Session"),
        ];
        let mut palette = CommandPalette::new(commands, &DialogConfig::default());
        palette.handle_event(&Event::Resize { width: 100, height: 40 });

        let signals = palette.handle_event(&Event::key(Key::Enter));
        assert!(matches!(signals[0], Signal::CloseDialog));
        assert!(matches!(
            &signals[1],
            Signal::Deferred(DeferredAction::OpenUrl(url)) if url == "https://example.com/docs"
        ));
        assert!(results(&signals).is_empty());
    }

    #[test]
    fn rows_show_label_and_description() {
        let command = Command::new("c", "Compact", "Session").with_description("Summarize history");
        assert_eq!(render_command(&command, 40), " Compact • Summarize history");
        assert_eq!(render_command(&command, 11), " Compact");
    }
}
