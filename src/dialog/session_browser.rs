// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Browse, star, and reopen past sessions.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::chrome::{self, ContentBuilder, Sizing};
use super::picker::{MouseOutcome, PickerFrame, PickerList, STANDARD_HEADER_ROWS};
use super::{Dialog, TextBlock};
use crate::config::DialogConfig;
use crate::event::{Event, Key, KeyInput};
use crate::list::{GroupLayout, Origin, Pickable, SelectionPolicy};
use crate::message::{self, DeferredAction, DialogResult, Signal, Signals};
use crate::text;

const SIZING: Sizing =
    Sizing { width_percent: 85, min_width: 60, max_width: 96, height_percent: 70, max_height: 30 };

/// Rule, session id, help.
const FOOTER_ROWS: u16 = 3;
const STAR_WIDTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub message_count: usize,
    pub starred: bool,
}

impl Pickable for SessionSummary {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }

    fn search_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.title)
    }
}

/// Which sessions the star filter lets through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StarFilter {
    #[default]
    All,
    Starred,
    Unstarred,
}

impl StarFilter {
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Starred,
            Self::Starred => Self::Unstarred,
            Self::Unstarred => Self::All,
        }
    }

    pub fn admits(self, session: &SessionSummary) -> bool {
        match self {
            Self::All => true,
            Self::Starred => session.starred,
            Self::Unstarred => !session.starred,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::All => "Sessions",
            Self::Starred => "Sessions ★",
            Self::Unstarred => "Sessions ☆",
        }
    }

    fn help(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Starred => "★ only",
            Self::Unstarred => "☆ only",
        }
    }
}

/// `Ns ago` up to a minute, then minutes, hours, days; past a week the calendar date.
pub fn time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at).max(chrono::Duration::zero());
    if elapsed < chrono::Duration::minutes(1) {
        format!("{}s ago", elapsed.num_seconds())
    } else if elapsed < chrono::Duration::hours(1) {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed < chrono::Duration::days(1) {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed < chrono::Duration::weeks(1) {
        format!("{}d ago", elapsed.num_days())
    } else {
        at.format("%b %-d").to_string()
    }
}

fn render_session(session: &SessionSummary, width: usize, now: DateTime<Utc>) -> String {
    let star = if session.starred { "★ " } else { "☆ " };
    let suffix = format!(" • ({} msg) • {}", session.message_count, time_ago(session.created_at, now));
    let room = width.saturating_sub(text::display_width(&suffix) + STAR_WIDTH).max(1);
    format!("{star}{}{suffix}", text::truncate(&session.title, room))
}

#[derive(Debug)]
pub struct SessionBrowser {
    sessions: Vec<SessionSummary>,
    list: PickerList<SessionSummary>,
    frame: PickerFrame,
    star_filter: StarFilter,
    opened_at: DateTime<Utc>,
}

impl SessionBrowser {
    pub fn new(sessions: Vec<SessionSummary>, config: &DialogConfig) -> Self {
        Self::opened_at(sessions, config, Utc::now())
    }

    /// Ages are computed against `now` for the dialog's whole lifetime.
    pub fn opened_at(sessions: Vec<SessionSummary>, config: &DialogConfig, now: DateTime<Utc>) -> Self {
        let sessions: Vec<SessionSummary> =
            sessions.into_iter().filter(|s| !s.title.is_empty()).collect();
        let mut list = PickerList::new(
            sessions.clone(),
            SelectionPolicy::Sticky,
            GroupLayout::Separators,
            config,
        )
        .with_reserved_scrollbar();
        list.set_placeholder(Some("No sessions found".to_owned()));
        let mut browser = Self {
            sessions,
            list,
            frame: PickerFrame::new(SIZING, STANDARD_HEADER_ROWS, FOOTER_ROWS),
            star_filter: StarFilter::All,
            opened_at: now,
        };
        browser.redraw();
        browser
    }

    pub fn star_filter(&self) -> StarFilter {
        self.star_filter
    }

    pub fn selected_session(&self) -> Option<&SessionSummary> {
        self.list.current()
    }

    pub fn visible_sessions(&self) -> impl Iterator<Item = &SessionSummary> + '_ {
        self.list.filter().filtered()
    }

    pub fn list(&self) -> &PickerList<SessionSummary> {
        &self.list
    }

    fn redraw(&mut self) {
        let now = self.opened_at;
        self.list.rebuild(|s, width| render_session(s, width, now), |_, _| String::new());
    }

    fn cycle_filter(&mut self) {
        self.star_filter = self.star_filter.next();
        let filter = self.star_filter;
        let admitted = self.sessions.iter().filter(|s| filter.admits(s)).cloned().collect();
        self.list.filter_mut().set_items(admitted);
        self.redraw();
    }

    /// Flips the star locally; the listing is not re-filtered until the next filter change.
    fn toggle_star(&mut self) -> Signals {
        let Some(selected) = self.list.filter_mut().current_selection_mut() else {
            return message::none();
        };
        selected.starred = !selected.starred;
        let id = selected.id.clone();
        if let Some(source) = self.sessions.iter_mut().find(|s| s.id == id) {
            source.starred = !source.starred;
        }
        self.redraw();
        message::result(DialogResult::ToggleSessionStar { id })
    }

    fn copy_id(&self) -> Signals {
        let Some(session) = self.list.current() else {
            return message::none();
        };
        debug!(id = %session.id, "copying session id");
        let mut out = Signals::new();
        out.push(Signal::Deferred(DeferredAction::CopyToClipboard(session.id.clone())));
        out.push(Signal::Notify("Session ID copied to clipboard.".to_owned()));
        out
    }

    fn load(&self) -> Signals {
        match self.list.current() {
            Some(session) => message::close_with(DialogResult::LoadSession { id: session.id.clone() }),
            None => message::none(),
        }
    }

    fn handle_key(&mut self, key: &KeyInput) -> Signals {
        if key.is_ctrl('s') {
            return self.toggle_star();
        }
        if key.is_ctrl('f') {
            self.cycle_filter();
            return message::none();
        }
        if key.is_ctrl('y') {
            return self.copy_id();
        }
        match key.key {
            Key::Esc => message::close(),
            Key::Enter => self.load(),
            _ => {
                if !self.list.handle_nav(key) && self.list.edit_query(key) {
                    self.redraw();
                }
                message::none()
            }
        }
    }
}

impl Dialog for SessionBrowser {
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
                MouseOutcome::Confirmed(_) => self.load(),
                _ => message::none(),
            },
        }
    }

    fn view(&self) -> TextBlock {
        let builder = ContentBuilder::new(self.frame.content_width()).title(self.star_filter.title());
        let query = chrome::query_line(self.list.query(), "Type to search sessions…", builder.width());
        let id = self.list.current().map(|s| format!("ID: {}", s.id)).unwrap_or_default();
        self.list
            .append_rows(builder.line(&query).rule())
            .rule()
            .line(&id)
            .help(&[
                ("↑/↓", "navigate"),
                ("ctrl+s", "star"),
                ("ctrl+f", self.star_filter.help()),
                ("ctrl+y", "copy id"),
                ("enter", "load"),
                ("esc", "close"),
            ])
            .fit_rows(usize::from(self.frame.content_rows()))
            .build()
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
