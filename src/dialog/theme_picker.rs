// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Theme selection with live preview.

use std::borrow::Cow;

use super::chrome::{self, Sizing};
use super::picker::{MouseOutcome, PickerFrame, PickerList, STANDARD_FOOTER_ROWS, STANDARD_HEADER_ROWS};
use super::{Dialog, TextBlock};
use crate::config::DialogConfig;
use crate::event::{Event, Key, KeyInput};
use crate::list::{GroupLayout, Origin, Pickable, SelectionPolicy};
use crate::message::{self, DialogResult, Signals};
use crate::text;

/// Prefix of references to themes loaded from the user's theme directory.
pub const USER_THEME_PREFIX: &str = "user:";

const SIZING: Sizing =
    Sizing { width_percent: 80, min_width: 50, max_width: 100, height_percent: 70, max_height: 150 };

const HELP: &[(&str, &str)] = &[("↑/↓", "navigate"), ("enter", "select"), ("esc", "cancel")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeChoice {
    pub reference: String,
    pub name: String,
    pub is_current: bool,
    pub is_default: bool,
    pub is_builtin: bool,
}

impl ThemeChoice {
    pub fn builtin(reference: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            name: name.into(),
            is_current: false,
            is_default: false,
            is_builtin: true,
        }
    }

    pub fn custom(reference: impl Into<String>, name: impl Into<String>) -> Self {
        Self { is_builtin: false, ..Self::builtin(reference, name) }
    }

    pub fn current(mut self) -> Self {
        self.is_current = true;
        self
    }

    pub fn default_theme(mut self) -> Self {
        self.is_default = true;
        self
    }
}

impl Pickable for ThemeChoice {
    type Key = String;

    fn key(&self) -> String {
        self.reference.clone()
    }

    fn search_text(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{} {}", self.name, self.reference))
    }

    fn group(&self) -> &str {
        if self.is_builtin {
            "builtin"
        } else {
            "custom"
        }
    }
}

pub fn sort_themes(themes: &mut [ThemeChoice]) {
    themes.sort_by(|a, b| {
        b.is_builtin
            .cmp(&a.is_builtin)
            .then_with(|| b.is_current.cmp(&a.is_current))
            .then_with(|| b.is_default.cmp(&a.is_default))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.reference.cmp(&b.reference))
    });
}

fn render_theme(theme: &ThemeChoice, width: usize) -> String {
    let mut badges = String::new();
    if theme.is_current {
        badges.push_str(" (current)");
    }
    if theme.is_default {
        badges.push_str(" (default)");
    }
    let badge_width = text::display_width(&badges);

    if theme.is_builtin {
        let name = text::truncate(&theme.name, width.saturating_sub(badge_width));
        return format!("{name}{badges}");
    }

    let file = theme.reference.strip_prefix(USER_THEME_PREFIX).unwrap_or(&theme.reference);
    let min_desc = text::display_width(file).min(10);
    let name = text::truncate(&theme.name, width.saturating_sub(badge_width + 3 + min_desc));
    let head = format!("{name}{badges}");
    let room = width.saturating_sub(text::display_width(&head) + 3);
    format!("{head} • {}", text::truncate(file, room))
}

fn separator_label(key: &str, width: usize) -> String {
    match key {
        "custom" => chrome::separator_line("Custom themes", width),
        other => chrome::separator_line(other, width),
    }
}

/// Emits a preview for every new selection; the host applies it immediately and restores
/// `original` on cancel.
#[derive(Debug)]
pub struct ThemePicker {
    list: PickerList<ThemeChoice>,
    frame: PickerFrame,
    original: String,
    last_preview: Option<String>,
}

impl ThemePicker {
    pub fn new(mut themes: Vec<ThemeChoice>, original: impl Into<String>, config: &DialogConfig) -> Self {
        sort_themes(&mut themes);
        let current = themes.iter().find(|t| t.is_current).map(|t| t.reference.clone());
        let mut list =
            PickerList::new(themes, SelectionPolicy::Sticky, GroupLayout::Separators, config);
        list.set_placeholder(Some("No themes found".to_owned()));
        if let Some(reference) = &current {
            list.filter_mut().select_key(reference);
        }
        // the current theme is already applied
        let last_preview = list.current().map(|t| t.reference.clone());
        let mut picker = Self {
            list,
            frame: PickerFrame::new(SIZING, STANDARD_HEADER_ROWS, STANDARD_FOOTER_ROWS),
            original: original.into(),
            last_preview,
        };
        picker.redraw();
        picker
    }

    pub fn selected_theme(&self) -> Option<&ThemeChoice> {
        self.list.current()
    }

    pub fn visible_themes(&self) -> impl Iterator<Item = &ThemeChoice> + '_ {
        self.list.filter().filtered()
    }

    pub fn list(&self) -> &PickerList<ThemeChoice> {
        &self.list
    }

    fn redraw(&mut self) {
        self.list.rebuild(render_theme, separator_label);
    }

    /// One preview per distinct selection.
    fn preview(&mut self) -> Signals {
        let Some(reference) = self.list.current().map(|t| t.reference.clone()) else {
            return message::none();
        };
        if self.last_preview.as_deref() == Some(reference.as_str()) {
            return message::none();
        }
        self.last_preview = Some(reference.clone());
        message::result(DialogResult::ThemePreview { reference })
    }

    fn confirm(&self) -> Signals {
        match self.list.current() {
            Some(theme) => {
                message::close_with(DialogResult::ThemeChange { reference: theme.reference.clone() })
            }
            None => message::none(),
        }
    }

    fn handle_key(&mut self, key: &KeyInput) -> Signals {
        match key.key {
            Key::Esc => {
                return message::close_with(DialogResult::ThemeCancelPreview {
                    original: self.original.clone(),
                })
            }
            Key::Enter => return self.confirm(),
            _ => {}
        }
        if self.list.handle_nav(key) {
            return self.preview();
        }
        if self.list.edit_query(key) {
            self.redraw();
            return self.preview();
        }
        message::none()
    }
}

impl Dialog for ThemePicker {
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
                if !self.list.paste(text) {
                    return message::none();
                }
                self.redraw();
                self.preview()
            }
            _ => match self.list.handle_mouse(event, &self.frame, 0) {
                MouseOutcome::Selected(_) => self.preview(),
                MouseOutcome::Confirmed(_) => self.confirm(),
                _ => message::none(),
            },
        }
    }

    fn view(&self) -> TextBlock {
        self.list.standard_block(&self.frame, "Select Theme", "Type to search themes…", None, HELP)
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
