// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! A short numbered question: pick one of up to ten options, type an answer, or skip.

use super::chrome::{self, ContentBuilder};
use super::{Dialog, TextBlock};
use crate::config::DialogConfig;
use crate::event::{Event, Key, KeyInput, MouseButton};
use crate::list::{digit_index, ClickOutcome, ClickTracker, Origin};
use crate::message::{self, DialogResult, Signals};
use crate::text;

/// Digits `1`..`9` and `0` address at most this many options.
pub const MAX_OPTIONS: usize = 10;

const MIN_WIDTH: u16 = 70;
const MAX_WIDTH: u16 = 85;
const SCREEN_PERCENT: u32 = 90;
/// Title and its rule.
const HEADER_ROWS: u16 = 2;
/// Two blank rows, then help and buttons.
const FOOTER_ROWS: u16 = 3;
const BUTTON_GAP: usize = 2;
const CURSOR: char = '▏';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into() }
    }
}

/// `1`..`9`, then `0` for the tenth option.
fn display_number(index: usize) -> usize {
    if index == 9 {
        0
    } else {
        index + 1
    }
}

fn key_range(count: usize) -> String {
    match count {
        0 => String::new(),
        1 => "1".to_owned(),
        n if n >= MAX_OPTIONS => "0-9".to_owned(),
        n => format!("1-{n}"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Button {
    Skip,
    Primary,
}

#[derive(Debug, Clone, Default)]
struct CustomInput {
    placeholder: String,
    value: String,
}

#[derive(Debug)]
pub struct MultiChoice {
    title: String,
    options: Vec<ChoiceOption>,
    allow_skip: bool,
    primary_label: String,
    skip_label: String,
    /// `Some(options.len())` is the free-text row when enabled.
    selected: Option<usize>,
    custom: Option<CustomInput>,
    /// Tab inverts what Enter does.
    skip_override: bool,
    clicks: ClickTracker,
    screen: (u16, u16),
}

impl MultiChoice {
    /// Options past the tenth are dropped.
    pub fn new(
        title: impl Into<String>,
        mut options: Vec<ChoiceOption>,
        allow_skip: bool,
        config: &DialogConfig,
    ) -> Self {
        options.truncate(MAX_OPTIONS);
        Self {
            title: title.into(),
            options,
            allow_skip,
            primary_label: "Continue".to_owned(),
            skip_label: "Skip".to_owned(),
            selected: None,
            custom: None,
            skip_override: false,
            clicks: ClickTracker::new(config.double_click_threshold()),
            screen: (0, 0),
        }
    }

    pub fn with_labels(mut self, primary: impl Into<String>, skip: impl Into<String>) -> Self {
        self.primary_label = primary.into();
        self.skip_label = skip.into();
        self
    }

    /// Adds a free-text row after the options. Typing anywhere moves the selection there.
    pub fn with_custom_input(mut self, placeholder: impl Into<String>) -> Self {
        self.custom = Some(CustomInput { placeholder: placeholder.into(), value: String::new() });
        self
    }

    pub fn custom_text(&self) -> Option<&str> {
        self.custom.as_ref().map(|c| c.value.as_str())
    }

    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Whether Enter would skip right now.
    pub fn skip_is_default(&self) -> bool {
        self.allow_skip && (!self.has_answer() != self.skip_override)
    }

    fn row_count(&self) -> usize {
        self.options.len() + usize::from(self.custom.is_some())
    }

    fn custom_selected(&self) -> bool {
        self.custom.is_some() && self.selected == Some(self.options.len())
    }

    /// An option, or non-blank free text.
    fn has_answer(&self) -> bool {
        match self.selected {
            Some(i) if i < self.options.len() => true,
            Some(_) => self.custom.as_ref().is_some_and(|c| !c.value.trim().is_empty()),
            None => false,
        }
    }

    fn select_prev(&mut self) {
        self.selected = match self.selected {
            None => self.row_count().checked_sub(1),
            Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    fn select_next(&mut self) {
        self.selected = match self.selected {
            None if self.row_count() == 0 => None,
            None => Some(0),
            Some(i) if i + 1 < self.row_count() => Some(i + 1),
            Some(_) => None,
        };
    }

    /// Selects the free-text row and applies `edit` to it. False without one.
    fn edit_custom(&mut self, edit: impl FnOnce(&mut String)) -> bool {
        let index = self.options.len();
        let Some(custom) = self.custom.as_mut() else {
            return false;
        };
        edit(&mut custom.value);
        self.selected = Some(index);
        true
    }

    fn skip(&self) -> Signals {
        if !self.allow_skip {
            return message::none();
        }
        message::close_with(DialogResult::ChoiceSkipped)
    }

    fn confirm(&self) -> Signals {
        if let Some(option) = self.selected.and_then(|i| self.options.get(i)) {
            return message::close_with(DialogResult::Choice { id: option.id.clone() });
        }
        match self.custom.as_ref().filter(|_| self.custom_selected()) {
            Some(custom) if !custom.value.trim().is_empty() => {
                message::close_with(DialogResult::ChoiceCustom { text: custom.value.trim().to_owned() })
            }
            _ => self.skip(),
        }
    }

    fn submit_default(&self) -> Signals {
        if self.skip_is_default() {
            self.skip()
        } else {
            self.confirm()
        }
    }

    fn handle_key(&mut self, key: &KeyInput) -> Signals {
        // Digits are text while the free-text row has focus.
        if !self.custom_selected() {
            if let Some(index) = key.text().and_then(digit_index) {
                if index < self.row_count() {
                    self.selected = Some(index);
                    return message::none();
                }
            }
        }
        match key.key {
            Key::Esc => return message::close_with(DialogResult::ChoiceCancelled),
            Key::Enter => return self.submit_default(),
            Key::Up => self.select_prev(),
            Key::Down => self.select_next(),
            Key::Tab => {
                if self.allow_skip {
                    self.skip_override = !self.skip_override;
                }
            }
            Key::Backspace | Key::Delete => {
                self.edit_custom(|value| {
                    value.pop();
                });
            }
            _ => {
                if let Some(ch) = key.text() {
                    self.edit_custom(|value| value.push(ch));
                }
            }
        }
        message::none()
    }

    fn outer_size(&self) -> (u16, u16) {
        let content = self
            .options
            .iter()
            .map(|o| 4 + text::display_width(&o.label))
            .chain(self.custom.iter().map(|c| 5 + text::display_width(&c.placeholder)))
            .chain([text::display_width(&self.title), self.footer_min_width()])
            .max()
            .unwrap_or(0);
        let wanted = u16::try_from(content).unwrap_or(u16::MAX).saturating_add(
            2 * (chrome::BORDER + chrome::PADDING_X),
        );
        let mut width = wanted.clamp(MIN_WIDTH, MAX_WIDTH);
        let limit = (u32::from(self.screen.0) * SCREEN_PERCENT / 100) as u16;
        if limit > MIN_WIDTH {
            width = width.min(limit);
        }
        let rows = HEADER_ROWS + self.row_count() as u16 + FOOTER_ROWS + 2 * chrome::BORDER;
        (width.min(self.screen.0), rows.min(self.screen.1))
    }

    fn origin(&self) -> Origin {
        let (w, h) = self.outer_size();
        chrome::center_position(self.screen.0, self.screen.1, w, h)
    }

    fn help(&self) -> String {
        let range = key_range(self.row_count());
        if range.is_empty() {
            "esc cancel".to_owned()
        } else {
            format!("esc cancel  ↑/↓ {range} select")
        }
    }

    fn button_label(&self, button: Button) -> String {
        let (label, default) = match button {
            Button::Skip => (&self.skip_label, self.skip_is_default()),
            Button::Primary => (&self.primary_label, !self.skip_is_default()),
        };
        if default {
            format!("[ {label} ↵ ]")
        } else {
            format!("[ {label} ]")
        }
    }

    fn buttons(&self) -> Vec<Button> {
        if self.allow_skip {
            vec![Button::Skip, Button::Primary]
        } else {
            vec![Button::Primary]
        }
    }

    fn footer_min_width(&self) -> usize {
        let buttons: usize = self
            .buttons()
            .into_iter()
            .map(|b| text::display_width(&self.button_label(b)) + 2 + BUTTON_GAP)
            .sum();
        text::display_width(&self.help()) + BUTTON_GAP + buttons
    }

    /// Help on the left, buttons right-aligned, with each button's column span.
    fn footer(&self, width: usize) -> (String, Vec<(usize, usize, Button)>) {
        let labels: Vec<(Button, String)> =
            self.buttons().into_iter().map(|b| (b, self.button_label(b))).collect();
        let buttons_width = labels.iter().map(|(_, l)| text::display_width(l)).sum::<usize>()
            + BUTTON_GAP * labels.len().saturating_sub(1);
        let mut col = width.saturating_sub(buttons_width);
        let help = text::truncate(&self.help(), col.saturating_sub(BUTTON_GAP));
        let mut line = text::fit(&help, col);
        let mut spans = Vec::with_capacity(labels.len());
        for (i, (button, label)) in labels.iter().enumerate() {
            if i > 0 {
                line.push_str(&" ".repeat(BUTTON_GAP));
                col += BUTTON_GAP;
            }
            let w = text::display_width(label);
            spans.push((col, col + w, *button));
            line.push_str(label);
            col += w;
        }
        (line, spans)
    }

    fn custom_row(&self, custom: &CustomInput, width: usize) -> String {
        let number = format!(" {} ", display_number(self.options.len()));
        let room = width.saturating_sub(number.len() + 1);
        let body = if self.custom_selected() {
            let typed = text::truncate_start(&custom.value, room.saturating_sub(1));
            format!("{typed}{CURSOR}")
        } else if custom.value.is_empty() {
            text::truncate(&custom.placeholder, room)
        } else {
            text::truncate(&custom.value, room)
        };
        format!("{number} {body}")
    }

    fn handle_click(&mut self, col: u16, row: u16, at: std::time::Instant) -> Signals {
        let origin = self.origin();
        let inner = chrome::content_origin();
        let (Some(rel_row), Some(rel_col)) = (
            row.checked_sub(origin.row + inner.row),
            col.checked_sub(origin.col + inner.col),
        ) else {
            return message::none();
        };
        let width = usize::from(chrome::content_width(self.outer_size().0));
        if usize::from(rel_col) >= width {
            return message::none();
        }

        let first_option = HEADER_ROWS;
        let button_row = HEADER_ROWS + self.row_count() as u16 + FOOTER_ROWS - 1;
        if rel_row == button_row {
            let (_, spans) = self.footer(width);
            let hit = spans.into_iter().find(|(s, e, _)| (*s..*e).contains(&usize::from(rel_col)));
            return match hit.map(|(_, _, b)| b) {
                Some(Button::Skip) => self.skip(),
                Some(Button::Primary) => self.confirm(),
                None => message::none(),
            };
        }

        let Some(index) = rel_row
            .checked_sub(first_option)
            .map(usize::from)
            .filter(|&i| i < self.row_count())
        else {
            return message::none();
        };
        match self.clicks.click(index, at) {
            ClickOutcome::Confirm(index) => {
                self.selected = Some(index);
                self.confirm()
            }
            ClickOutcome::Select(index) => {
                self.selected = if self.selected == Some(index) { None } else { Some(index) };
                message::none()
            }
        }
    }
}

impl Dialog for MultiChoice {
    fn handle_event(&mut self, event: &Event) -> Signals {
        match event {
            Event::Resize { width, height } => {
                self.screen = (*width, *height);
                message::none()
            }
            Event::Key(key) => self.handle_key(key),
            Event::Click { col, row, button: MouseButton::Left, at } => {
                self.handle_click(*col, *row, *at)
            }
            Event::Paste(pasted) => {
                let cleaned: String = pasted.chars().filter(|c| !c.is_control()).collect();
                self.edit_custom(|value| value.push_str(&cleaned));
                message::none()
            }
            _ => message::none(),
        }
    }

    fn view(&self) -> TextBlock {
        let width = chrome::content_width(self.outer_size().0);
        let builder = ContentBuilder::new(width).title(&self.title);
        let w = builder.width();
        let mut rows: Vec<String> = self
            .options
            .iter()
            .enumerate()
            .map(|(i, o)| {
                let number = format!(" {} ", display_number(i));
                let room = w.saturating_sub(number.len() + 1);
                format!("{number} {}", text::truncate(&o.label, room))
            })
            .collect();
        if let Some(custom) = &self.custom {
            rows.push(self.custom_row(custom, w));
        }
        let (footer, _) = self.footer(w);
        builder.list(rows, self.selected).blank().blank().line(&footer).build()
    }

    fn screen_size(&self) -> (u16, u16) {
        self.screen
    }

    fn size(&self) -> (u16, u16) {
        self.outer_size()
    }

    fn position(&self) -> Origin {
        self.origin()
    }
}
