// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! A small form of text fields, validated as the user types.
//!
//! Each field shows its own `⚠` message under the input. Messages never stop editing; they
//! only keep Enter from submitting. The pattern cache is passed in so several forms can share
//! compiled patterns.

use std::sync::Arc;

use super::chrome::{self, ContentBuilder};
use super::{Dialog, TextBlock};
use crate::event::{Event, Key, KeyInput};
use crate::list::Origin;
use crate::message::{self, DialogResult, Signals};
use crate::text;
use crate::validation::{can_submit, FieldState, PatternCache, StringRules};

const MIN_WIDTH: u16 = 60;
const MAX_WIDTH: u16 = 90;
const WIDTH_PERCENT: u16 = 70;
const CURSOR: char = '▏';

const HELP: &[(&str, &str)] = &[("↑/↓", "navigate"), ("enter", "submit"), ("esc", "cancel")];

#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    state: FieldState,
}

impl FormField {
    pub fn new(name: impl Into<String>, label: impl Into<String>, rules: StringRules) -> Self {
        Self { name: name.into(), label: label.into(), state: FieldState::new(rules) }
    }

    pub fn value(&self) -> &str {
        self.state.value()
    }

    pub fn message(&self) -> Option<&str> {
        self.state.message()
    }
}

#[derive(Debug)]
pub struct FormDialog {
    title: String,
    prompt: String,
    fields: Vec<FormField>,
    focused: usize,
    cache: Arc<PatternCache>,
    screen: (u16, u16),
}

impl FormDialog {
    pub fn new(
        title: impl Into<String>,
        prompt: impl Into<String>,
        fields: Vec<FormField>,
        cache: Arc<PatternCache>,
    ) -> Self {
        Self {
            title: title.into(),
            prompt: prompt.into(),
            fields,
            focused: 0,
            cache,
            screen: (0, 0),
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    fn move_focus(&mut self, forward: bool) {
        let count = self.fields.len();
        if count == 0 {
            return;
        }
        self.focused =
            if forward { (self.focused + 1) % count } else { (self.focused + count - 1) % count };
    }

    fn edit(&mut self, edit: impl FnOnce(&mut String)) {
        let cache = Arc::clone(&self.cache);
        let Some(field) = self.fields.get_mut(self.focused) else {
            return;
        };
        let mut value = field.state.value().to_owned();
        edit(&mut value);
        field.state.set_value(value, &cache);
    }

    /// Trims and validates every field. On failure focus jumps to the first message and
    /// nothing is emitted.
    fn submit(&mut self) -> Signals {
        for field in &mut self.fields {
            let trimmed = field.state.value().trim().to_owned();
            field.state.set_value(trimmed, &self.cache);
        }
        let states: Vec<FieldState> = self.fields.iter().map(|f| f.state.clone()).collect();
        if !can_submit(&states) {
            if let Some(first) = self.fields.iter().position(|f| f.message().is_some()) {
                self.focused = first;
            }
            return message::none();
        }
        let values = self
            .fields
            .iter()
            .filter(|f| !f.value().is_empty())
            .map(|f| (f.name.clone(), f.value().to_owned()))
            .collect();
        message::close_with(DialogResult::FormSubmit { values })
    }

    fn handle_key(&mut self, key: &KeyInput) -> Signals {
        match key.key {
            Key::Esc => return message::close_with(DialogResult::FormCancelled),
            Key::Enter => return self.submit(),
            Key::Up | Key::BackTab => self.move_focus(false),
            Key::Down | Key::Tab => self.move_focus(true),
            Key::Backspace => self.edit(|value| {
                value.pop();
            }),
            _ => {
                if let Some(ch) = key.text() {
                    self.edit(|value| value.push(ch));
                }
            }
        }
        message::none()
    }

    fn body_rows(&self) -> u16 {
        let per_field: usize =
            self.fields.iter().map(|f| 2 + usize::from(f.message().is_some())).sum();
        // title + rule, prompt, rule, fields with a blank between, blank, help
        let rows = 2 + 1 + 1 + per_field + self.fields.len().saturating_sub(1) + 2;
        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    fn outer_size(&self) -> (u16, u16) {
        let width = chrome::dialog_width(self.screen.0, WIDTH_PERCENT, MIN_WIDTH, MAX_WIDTH);
        let height = self.body_rows().saturating_add(2 * chrome::BORDER);
        (width, height.min(self.screen.1))
    }

    fn input_row(&self, index: usize, field: &FormField, width: usize) -> String {
        let room = width.saturating_sub(3);
        if index == self.focused {
            let typed = text::truncate_start(field.value(), room);
            format!("> {typed}{CURSOR}")
        } else {
            format!("  {}", text::truncate(field.value(), room))
        }
    }
}

impl Dialog for FormDialog {
    fn handle_event(&mut self, event: &Event) -> Signals {
        match event {
            Event::Resize { width, height } => {
                self.screen = (*width, *height);
                message::none()
            }
            Event::Key(key) => self.handle_key(key),
            Event::Paste(pasted) => {
                let cleaned: String = pasted.chars().filter(|c| !c.is_control()).collect();
                self.edit(|value| value.push_str(&cleaned));
                message::none()
            }
            _ => message::none(),
        }
    }

    fn view(&self) -> TextBlock {
        let (width, height) = self.outer_size();
        let mut builder = ContentBuilder::new(chrome::content_width(width)).title(&self.title);
        let w = builder.width();
        builder = builder.line(&self.prompt).rule();
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                builder = builder.blank();
            }
            let marker = if field.state.rules.required { " *" } else { "" };
            builder = builder.line(&format!("{}{marker}", field.label));
            let input = self.input_row(i, field, w);
            builder = builder.list(vec![input], (i == self.focused).then_some(0));
            if let Some(message) = field.message() {
                builder = builder.line(&format!("  ⚠ {message}"));
            }
        }
        builder
            .blank()
            .help(HELP)
            .fit_rows(usize::from(chrome::content_height(height)))
            .build()
    }

    fn screen_size(&self) -> (u16, u16) {
        self.screen
    }

    fn size(&self) -> (u16, u16) {
        self.outer_size()
    }

    fn position(&self) -> Origin {
        let (w, h) = self.outer_size();
        chrome::center_position(self.screen.0, self.screen.1, w, h)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::{fixture, rstest};

    use super::{FormDialog, FormField};
    use crate::dialog::Dialog;
    use crate::event::{Event, Key, KeyInput};
    use crate::message::{results, DialogResult, Signal};
    use crate::validation::{PatternCache, StringRules};

    #[fixture]
    fn cache() -> Arc<PatternCache> {
        Arc::new(PatternCache::new())
    }

    fn form(cache: Arc<PatternCache>) -> FormDialog {
        let fields = vec![
            FormField::new(
                "email",
                "Email",
                StringRules {
                    required: true,
                    format: Some("email".into()),
                    ..StringRules::default()
                },
            ),
            FormField::new(
                "handle",
                "Handle",
                StringRules { pattern: Some("^[a-z]+$".into()), ..StringRules::default() },
            ),
        ];
        let mut form = FormDialog::new("Sign up", "Who are you?", fields, cache);
        form.handle_event(&Event::Resize { width: 100, height: 40 });
        form
    }

    fn type_text(form: &mut FormDialog, text: &str) {
        for ch in text.chars() {
            form.handle_event(&Event::key(KeyInput::char(ch)));
        }
    }

    #[rstest]
    fn messages_show_while_typing_and_clear_when_valid(cache: Arc<PatternCache>) {
        let mut form = form(cache);
        type_text(&mut form, "dev");
        assert_eq!(form.fields()[0].message(), Some("Must be a valid email address"));
        assert!(form.view().text().contains("⚠ Must be a valid email address"));

        type_text(&mut form, "@example.com");
        assert!(form.fields()[0].message().is_none());
        assert!(!form.view().text().contains('⚠'));
    }

    #[rstest]
    fn submit_is_blocked_and_focuses_the_first_invalid_field(cache: Arc<PatternCache>) {
        let mut form = form(cache);
        form.handle_event(&Event::key(Key::Tab));
        type_text(&mut form, "Bob");
        assert_eq!(form.focused(), 1);

        assert!(form.handle_event(&Event::key(Key::Enter)).is_empty());
        assert_eq!(form.focused(), 0);
        assert_eq!(form.fields()[0].message(), Some("This field is required"));
        assert_eq!(form.fields()[1].message(), Some("Invalid format"));
    }

    #[rstest]
    fn valid_form_closes_then_reports_values(cache: Arc<PatternCache>) {
        let mut form = form(Arc::clone(&cache));
        form.handle_event(&Event::Paste(" dev@example.com\n".into()));
        let signals = form.handle_event(&Event::key(Key::Enter));
        assert!(matches!(signals[0], Signal::CloseDialog));
        assert_eq!(
            results(&signals),
            vec![DialogResult::FormSubmit {
                values: vec![("email".into(), "dev@example.com".into())]
            }]
        );
        assert!(!cache.is_empty());
    }

    #[rstest]
    fn esc_cancels_and_arrows_wrap(cache: Arc<PatternCache>) {
        let mut form = form(cache);
        form.handle_event(&Event::key(Key::Up));
        assert_eq!(form.focused(), 1);
        form.handle_event(&Event::key(Key::Down));
        assert_eq!(form.focused(), 0);

        let signals = form.handle_event(&Event::key(Key::Esc));
        assert!(matches!(signals[0], Signal::CloseDialog));
        assert_eq!(results(&signals), vec![DialogResult::FormCancelled]);
    }

    #[rstest]
    fn view_highlights_the_focused_input(cache: Arc<PatternCache>) {
        let mut form = form(cache);
        type_text(&mut form, "a");
        let block = form.view();
        let highlight = block.highlight.expect("focused input");
        assert!(block.lines[highlight].starts_with("> a▏"));
        assert!(block.lines[highlight - 1].starts_with("Email *"));
        assert!(block.lines.last().is_some_and(|l| l.starts_with("↑/↓ navigate")));
    }
}
