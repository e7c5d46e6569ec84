// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model selection with free-form `provider/model` entry.

use std::borrow::Cow;

use thiserror::Error;
use tracing::debug;

use super::chrome::{self, Sizing};
use super::picker::{MouseOutcome, PickerFrame, PickerList, STANDARD_FOOTER_ROWS, STANDARD_HEADER_ROWS};
use super::{Dialog, TextBlock};
use crate::config::DialogConfig;
use crate::event::{Event, Key, KeyInput};
use crate::list::{GroupLayout, Origin, Pickable, SelectionPolicy};
use crate::message::{self, DialogResult, Signals};
use crate::text;

/// Provider names accepted in a custom spec, aliases included.
pub const SUPPORTED_PROVIDERS: &[&str] = &[
    "openai",
    "anthropic",
    "google",
    "dmr",
    "requesty",
    "azure",
    "xai",
    "nebius",
    "mistral",
    "ollama",
];

const SIZING: Sizing =
    Sizing { width_percent: 80, min_width: 50, max_width: 100, height_percent: 70, max_height: 150 };

const PROMPT: &str = "Type to search or enter custom model (provider/model)…";
const HELP: &[(&str, &str)] = &[("↑/↓", "navigate"), ("enter", "select"), ("esc", "cancel")];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("invalid format: expected 'provider/model'")]
    InvalidFormat,
    #[error("provider name cannot be empty (got '/{model}')")]
    EmptyProvider { model: String },
    #[error("model name cannot be empty (got '{provider}/')")]
    EmptyModel { provider: String },
    #[error("unknown provider '{provider}'. Supported: {}", SUPPORTED_PROVIDERS.join(", "))]
    UnknownProvider { provider: String },
}

/// Checks a comma separated list of `provider/model` pairs. Blank input and blank parts
/// are accepted.
pub fn validate_custom_spec(spec: &str) -> Result<(), SpecError> {
    for part in spec.trim().split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (provider, model) = part.split_once('/').ok_or(SpecError::InvalidFormat)?;
        let (provider, model) = (provider.trim(), model.trim());
        if provider.is_empty() {
            return Err(SpecError::EmptyProvider { model: model.to_owned() });
        }
        if model.is_empty() {
            return Err(SpecError::EmptyModel { provider: provider.to_owned() });
        }
        if !SUPPORTED_PROVIDERS.iter().any(|p| p.eq_ignore_ascii_case(provider)) {
            return Err(SpecError::UnknownProvider { provider: provider.to_owned() });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModelSource {
    Config,
    Catalog,
    Custom,
}

impl ModelSource {
    fn group_key(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Catalog => "catalog",
            Self::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelChoice {
    pub name: String,
    pub provider: String,
    pub model: String,
    pub reference: String,
    pub source: ModelSource,
    pub is_current: bool,
    pub is_default: bool,
}

impl ModelChoice {
    /// A choice referenced as `provider/model`.
    pub fn new(
        name: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
        source: ModelSource,
    ) -> Self {
        let (provider, model) = (provider.into(), model.into());
        Self {
            name: name.into(),
            reference: format!("{provider}/{model}"),
            provider,
            model,
            source,
            is_current: false,
            is_default: false,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn current(mut self) -> Self {
        self.is_current = true;
        self
    }

    pub fn default_model(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Stand-in entry for a typed spec that matched nothing.
    fn typed(query: &str) -> Self {
        Self {
            name: format!("Custom: {query}"),
            provider: String::new(),
            model: String::new(),
            reference: query.to_owned(),
            source: ModelSource::Custom,
            is_current: false,
            is_default: false,
        }
    }

    /// Several models combined under one entry.
    fn is_alloy(&self) -> bool {
        self.provider.is_empty() && self.model.contains(',')
    }

    fn description(&self) -> Option<String> {
        match self.source {
            ModelSource::Custom => None,
            ModelSource::Catalog => Some(format!("{}/{}", self.provider, self.model)),
            ModelSource::Config if !self.provider.is_empty() && !self.model.is_empty() => {
                Some(format!("{}/{}", self.provider, self.model))
            }
            ModelSource::Config if self.is_alloy() => Some(self.model.clone()),
            ModelSource::Config
                if !self.reference.is_empty() && !self.name.contains(&self.reference) =>
            {
                Some(self.reference.clone())
            }
            ModelSource::Config => None,
        }
    }
}

impl Pickable for ModelChoice {
    type Key = String;

    fn key(&self) -> String {
        self.reference.clone()
    }

    fn search_text(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{} {} {}", self.name, self.provider, self.model))
    }

    fn group(&self) -> &str {
        self.source.group_key()
    }
}

/// Config before catalog before custom; inside each, current, then default, then by name.
pub fn sort_models(models: &mut [ModelChoice]) {
    models.sort_by(|a, b| {
        a.source
            .cmp(&b.source)
            .then_with(|| b.is_current.cmp(&a.is_current))
            .then_with(|| b.is_default.cmp(&a.is_default))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

fn render_model(model: &ModelChoice, width: usize) -> String {
    let mut badges = String::new();
    if model.is_alloy() {
        badges.push_str(" (alloy)");
    }
    if model.is_current {
        badges.push_str(" (current)");
    } else if model.is_default {
        badges.push_str(" (default)");
    }

    let badge_width = text::display_width(&badges);
    let Some(desc) = model.description() else {
        let name = text::truncate(&model.name, width.saturating_sub(badge_width));
        return format!("{name}{badges}");
    };

    // keep a little room for the description
    let min_desc = desc.chars().count().min(10);
    let name_room = width.saturating_sub(badge_width + 3 + min_desc);
    let head = format!("{}{badges}", text::truncate(&model.name, name_room));
    let desc_room = width.saturating_sub(text::display_width(&head) + 3);
    format!("{head} • {}", text::truncate(&desc, desc_room))
}

fn separator_label(key: &str, width: usize) -> String {
    let label = match key {
        "catalog" => "Other models",
        "custom" => "Custom models",
        other => other,
    };
    chrome::separator_line(label, width)
}

#[derive(Debug)]
pub struct ModelPicker {
    models: Vec<ModelChoice>,
    list: PickerList<ModelChoice>,
    frame: PickerFrame,
    typed_entry: bool,
    error: Option<String>,
}

impl ModelPicker {
    pub fn new(mut models: Vec<ModelChoice>, config: &DialogConfig) -> Self {
        sort_models(&mut models);
        let mut list =
            PickerList::new(models.clone(), SelectionPolicy::Sticky, GroupLayout::Separators, config);
        list.set_placeholder(Some("No models found".to_owned()));
        let mut picker = Self {
            models,
            list,
            frame: PickerFrame::new(SIZING, STANDARD_HEADER_ROWS, STANDARD_FOOTER_ROWS),
            typed_entry: false,
            error: None,
        };
        picker.refresh();
        picker
    }

    pub fn query(&self) -> &str {
        self.list.query()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_model(&self) -> Option<&ModelChoice> {
        self.list.current()
    }

    pub fn visible_models(&self) -> impl Iterator<Item = &ModelChoice> + '_ {
        self.list.filter().filtered()
    }

    pub fn list(&self) -> &PickerList<ModelChoice> {
        &self.list
    }

    /// Adds or drops the typed `Custom:` entry, then redraws the list.
    fn refresh(&mut self) {
        let needle = self.list.query().trim().to_lowercase();
        let matched = needle.is_empty()
            || self.models.iter().any(|m| m.search_text().to_lowercase().contains(&needle));
        let wants_typed = needle.contains('/') && !matched;

        if wants_typed || self.typed_entry {
            let mut items = self.models.clone();
            if wants_typed {
                items.push(ModelChoice::typed(&needle));
            }
            self.list.filter_mut().set_items(items);
            self.typed_entry = wants_typed;
        }
        self.list.rebuild(render_model, separator_label);
    }

    fn confirm(&mut self) -> Signals {
        let query = self.list.query().trim().to_owned();
        if query.contains('/') {
            if let Err(err) = validate_custom_spec(&query) {
                debug!(spec = %query, error = %err, "rejected custom model spec");
                self.error = Some(err.to_string());
                return message::none();
            }
            return message::close_with(DialogResult::ModelChange { reference: query });
        }

        match self.list.current() {
            Some(model) => {
                let reference = if model.is_default { String::new() } else { model.reference.clone() };
                message::close_with(DialogResult::ModelChange { reference })
            }
            None => message::none(),
        }
    }

    fn handle_key(&mut self, key: &KeyInput) -> Signals {
        match key.key {
            Key::Esc => return message::close(),
            Key::Enter => return self.confirm(),
            _ => {}
        }
        if self.list.handle_nav(key) {
            return message::none();
        }
        if self.list.edit_query(key) {
            self.error = None;
            self.refresh();
        }
        message::none()
    }
}

impl Dialog for ModelPicker {
    fn handle_event(&mut self, event: &Event) -> Signals {
        match event {
            Event::Resize { width, height } => {
                self.frame.resize(*width, *height);
                self.list.set_size(self.frame.content_width(), self.frame.list_height());
                self.list.rebuild(render_model, separator_label);
                message::none()
            }
            Event::ThemeChanged => message::none(),
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => {
                if self.list.paste(text) {
                    self.error = None;
                    self.refresh();
                }
                message::none()
            }
            _ => match self.list.handle_mouse(event, &self.frame, 0) {
                MouseOutcome::Confirmed(_) => self.confirm(),
                _ => message::none(),
            },
        }
    }

    fn view(&self) -> TextBlock {
        let status = self.error.as_ref().map(|err| format!("⚠ {err}"));
        self.list.standard_block(&self.frame, "Select Model", PROMPT, status.as_deref(), HELP)
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
