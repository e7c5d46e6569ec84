// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Working directory selection for a new session: browse the filesystem, reopen a recent
//! directory, or pick a pinned one.

use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, warn};

use super::chrome::{self, ContentBuilder, Sizing};
use super::picker::{MouseOutcome, PickerFrame, PickerList};
use super::{Dialog, TextBlock};
use crate::config::DialogConfig;
use crate::event::{Event, Key, KeyInput, MouseButton};
use crate::list::{GroupLayout, Origin, Pickable, SelectionPolicy};
use crate::message::{self, DialogResult, Signals};
use crate::store::DirectoryStore;
use crate::text;

const SIZING: Sizing =
    Sizing { width_percent: 80, min_width: 50, max_width: 100, height_percent: 70, max_height: 150 };

const TITLE: &str = "New Session: Select Working Directory";
/// Title, rule, tabs, rule.
const HEADER_ROWS: u16 = 4;
/// Browse adds the query line and its rule.
const BROWSE_HEADER_ROWS: u16 = 6;
const FOOTER_ROWS: u16 = 2;
/// Content row of the section tabs.
const TAB_ROW: u16 = 2;
const TAB_GAP: usize = 4;
/// Star column in front of pinnable rows.
const STAR_WIDTH: u16 = 2;
const USE_THIS_SUFFIX: &str = "  (use this dir)";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WorkingDirSection {
    #[default]
    Browse,
    Recent,
    Pinned,
}

impl WorkingDirSection {
    pub const ALL: [Self; 3] = [Self::Browse, Self::Recent, Self::Pinned];

    pub fn next(self) -> Self {
        match self {
            Self::Browse => Self::Recent,
            Self::Recent => Self::Pinned,
            Self::Pinned => Self::Browse,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Browse => Self::Pinned,
            Self::Recent => Self::Browse,
            Self::Pinned => Self::Recent,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Browse => "Browse",
            Self::Recent => "Recent",
            Self::Pinned => "Pinned",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Browse => 0,
            Self::Recent => 1,
            Self::Pinned => 2,
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Self::Browse => "No directories found",
            Self::Recent => "No recent directories",
            Self::Pinned => "No pinned directories",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirKind {
    /// Spawn in the directory being browsed.
    UseThis,
    Parent,
    Child,
    Recent,
    Pinned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: DirKind,
}

impl DirEntry {
    fn new(kind: DirKind, name: impl Into<String>, path: PathBuf) -> Self {
        Self { name: name.into(), path, kind }
    }

    fn from_path(kind: DirKind, path: &Path) -> Self {
        Self::new(kind, path.to_string_lossy(), path.to_owned())
    }

    fn can_pin(&self) -> bool {
        self.kind != DirKind::Parent
    }

    /// Rows that react to a click on the star column.
    fn has_star(&self) -> bool {
        matches!(self.kind, DirKind::UseThis | DirKind::Child | DirKind::Pinned)
    }
}

impl Pickable for DirEntry {
    type Key = PathBuf;

    fn key(&self) -> PathBuf {
        self.path.clone()
    }

    fn search_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn always_visible(&self) -> bool {
        matches!(self.kind, DirKind::UseThis | DirKind::Parent)
    }
}

/// `dir` itself, its parent unless at the root, then visible subdirectories by name.
pub fn browse_entries(dir: &Path) -> (Vec<DirEntry>, Option<std::io::Error>) {
    let mut entries = vec![DirEntry::from_path(DirKind::UseThis, dir)];
    if let Some(parent) = dir.parent() {
        entries.push(DirEntry::new(DirKind::Parent, "..", parent.to_owned()));
    }

    let listing = match fs::read_dir(dir) {
        Ok(listing) => listing,
        Err(err) => return (entries, Some(err)),
    };
    let mut children: Vec<DirEntry> = listing
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            (!name.starts_with('.')).then(|| DirEntry::new(DirKind::Child, format!("{name}/"), entry.path()))
        })
        .collect();
    children.sort_by(|a, b| a.name.cmp(&b.name));
    entries.extend(children);
    (entries, None)
}

fn star(pinned: bool) -> &'static str {
    if pinned {
        "★ "
    } else {
        "☆ "
    }
}

fn render_entry(entry: &DirEntry, width: usize, favorites: &[PathBuf]) -> String {
    let pinned = favorites.contains(&entry.path);
    let room = width.saturating_sub(usize::from(STAR_WIDTH));
    match entry.kind {
        DirKind::Pinned => format!("★ {}", text::truncate_start(&entry.name, room)),
        DirKind::Recent => format!("  {}", text::truncate_start(&entry.name, room)),
        DirKind::Parent => "  ..".to_owned(),
        DirKind::UseThis => {
            let room = room.saturating_sub(text::display_width(USE_THIS_SUFFIX));
            format!("{}{}{USE_THIS_SUFFIX}", star(pinned), text::truncate_start(&entry.name, room))
        }
        DirKind::Child => {
            format!("{}📁 {}", star(pinned), text::truncate(&entry.name, room.saturating_sub(3)))
        }
    }
}

/// Three sections switched with tab. Pin toggles go straight to the store and are mirrored
/// in the pinned and recent sections.
#[derive(Debug)]
pub struct WorkingDirPicker {
    store: Arc<dyn DirectoryStore>,
    section: WorkingDirSection,
    dir: PathBuf,
    favorites: Vec<PathBuf>,
    recents: Vec<PathBuf>,
    max_recent: usize,
    lists: [PickerList<DirEntry>; 3],
    frame: PickerFrame,
    browse_frame: PickerFrame,
    last_error: Option<String>,
}

impl WorkingDirPicker {
    pub fn new(store: Arc<dyn DirectoryStore>, cwd: PathBuf, config: &DialogConfig) -> Self {
        let favorites = store.favorite_dirs();
        let recents: Vec<PathBuf> = store
            .recent_dirs()
            .into_iter()
            .filter(|p| !p.as_os_str().is_empty() && *p != cwd && !favorites.contains(p))
            .collect();

        let list = |section: WorkingDirSection, policy| {
            let mut list = PickerList::new(Vec::new(), policy, GroupLayout::Separators, config)
                .with_reserved_scrollbar();
            list.set_placeholder(Some(section.placeholder().to_owned()));
            list
        };
        let mut picker = Self {
            store,
            section: WorkingDirSection::Browse,
            dir: cwd,
            favorites,
            recents,
            max_recent: config.max_recent_dirs,
            lists: [
                list(WorkingDirSection::Browse, SelectionPolicy::Reset),
                list(WorkingDirSection::Recent, SelectionPolicy::Sticky),
                list(WorkingDirSection::Pinned, SelectionPolicy::Sticky),
            ],
            frame: PickerFrame::new(SIZING, HEADER_ROWS, FOOTER_ROWS),
            browse_frame: PickerFrame::new(SIZING, BROWSE_HEADER_ROWS, FOOTER_ROWS),
            last_error: None,
        };
        picker.load_browse();
        picker.reload_saved();
        picker
    }

    pub fn section(&self) -> WorkingDirSection {
        self.section
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn favorites(&self) -> &[PathBuf] {
        &self.favorites
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn selected_entry(&self) -> Option<&DirEntry> {
        self.active().current()
    }

    pub fn visible_entries(&self, section: WorkingDirSection) -> impl Iterator<Item = &DirEntry> + '_ {
        self.lists[section.index()].filter().filtered()
    }

    fn active(&self) -> &PickerList<DirEntry> {
        &self.lists[self.section.index()]
    }

    fn active_frame(&self) -> &PickerFrame {
        match self.section {
            WorkingDirSection::Browse => &self.browse_frame,
            _ => &self.frame,
        }
    }

    fn redraw(&mut self, section: WorkingDirSection) {
        let favorites = &self.favorites;
        self.lists[section.index()]
            .rebuild(|entry, width| render_entry(entry, width, favorites), |_, _| String::new());
    }

    fn redraw_all(&mut self) {
        for section in WorkingDirSection::ALL {
            self.redraw(section);
        }
    }

    fn load_browse(&mut self) {
        let (entries, err) = browse_entries(&self.dir);
        self.last_error = err.map(|err| {
            warn!(dir = %self.dir.display(), error = %err, "failed to read directory");
            err.to_string()
        });
        debug!(dir = %self.dir.display(), entries = entries.len(), "listed directories");
        let filter = self.lists[WorkingDirSection::Browse.index()].filter_mut();
        filter.set_query("");
        filter.set_items(entries);
        filter.select_first();
        self.redraw(WorkingDirSection::Browse);
    }

    /// Rebuilds the recent and pinned sections from the local copies.
    fn reload_saved(&mut self) {
        let mut recent: Vec<DirEntry> = self
            .recents
            .iter()
            .take(self.max_recent)
            .filter(|p| **p != self.dir)
            .map(|p| DirEntry::from_path(DirKind::Recent, p))
            .collect();
        recent.sort_by(|a, b| a.path.cmp(&b.path));
        let pinned: Vec<DirEntry> =
            self.favorites.iter().map(|p| DirEntry::from_path(DirKind::Pinned, p)).collect();

        self.lists[WorkingDirSection::Recent.index()].filter_mut().set_items(recent);
        self.lists[WorkingDirSection::Pinned.index()].filter_mut().set_items(pinned);
        self.redraw_all();
    }

    fn switch_to(&mut self, section: WorkingDirSection) {
        self.section = section;
        self.redraw(section);
    }

    fn toggle_pin(&mut self) -> Signals {
        let Some(entry) = self.selected_entry().filter(|e| e.can_pin()).cloned() else {
            return message::none();
        };
        let pinned = match self.store.toggle_favorite(&entry.path) {
            Ok(pinned) => pinned,
            Err(err) => {
                warn!(path = %entry.path.display(), error = %err, "failed to toggle pinned directory");
                return message::none();
            }
        };
        debug!(path = %entry.path.display(), pinned, "toggled pinned directory");
        // The store owns the order.
        self.favorites = self.store.favorite_dirs();
        if pinned {
            self.recents.retain(|p| *p != entry.path);
        }
        self.reload_saved();
        if self.section == WorkingDirSection::Pinned {
            let list = &mut self.lists[WorkingDirSection::Pinned.index()];
            list.filter_mut().select_key(&entry.path);
            list.follow_selection();
        }
        message::none()
    }

    fn activate(&mut self) -> Signals {
        let Some(entry) = self.selected_entry().cloned() else {
            return message::none();
        };
        match entry.kind {
            DirKind::Parent | DirKind::Child => {
                self.dir = entry.path;
                self.load_browse();
                message::none()
            }
            DirKind::UseThis | DirKind::Recent | DirKind::Pinned => {
                message::close_with(DialogResult::SpawnSession { dir: entry.path })
            }
        }
    }

    fn handle_key(&mut self, key: &KeyInput) -> Signals {
        match key.key {
            Key::Esc => return message::close(),
            Key::Enter => return self.activate(),
            Key::Tab => {
                self.switch_to(self.section.next());
                return message::none();
            }
            Key::BackTab => {
                self.switch_to(self.section.prev());
                return message::none();
            }
            _ => {}
        }
        if key.is_ctrl('p') {
            return self.toggle_pin();
        }
        let section = self.section;
        let list = &mut self.lists[section.index()];
        if list.handle_nav(key) {
            return message::none();
        }
        if section == WorkingDirSection::Browse && list.edit_query(key) {
            self.redraw(section);
        }
        message::none()
    }

    fn tab_labels(&self) -> Vec<(WorkingDirSection, String)> {
        WorkingDirSection::ALL
            .into_iter()
            .map(|section| {
                let count = match section {
                    WorkingDirSection::Browse => 0,
                    other => self.lists[other.index()].filter().items().len(),
                };
                let label = if count > 0 {
                    format!("{} ({count})", section.label())
                } else {
                    section.label().to_owned()
                };
                let label = if section == self.section {
                    format!("[{label}]")
                } else {
                    format!(" {label} ")
                };
                (section, label)
            })
            .collect()
    }

    /// The centered tab line plus each tab's column span.
    fn tabs(&self, width: usize) -> (String, Vec<(usize, usize, WorkingDirSection)>) {
        let labels = self.tab_labels();
        let total = labels.iter().map(|(_, l)| text::display_width(l)).sum::<usize>()
            + TAB_GAP * labels.len().saturating_sub(1);
        let mut col = width.saturating_sub(total) / 2;
        let mut line = " ".repeat(col);
        let mut spans = Vec::with_capacity(labels.len());
        for (i, (section, label)) in labels.iter().enumerate() {
            if i > 0 {
                line.push_str(&" ".repeat(TAB_GAP));
                col += TAB_GAP;
            }
            let w = text::display_width(label);
            spans.push((col, col + w, *section));
            line.push_str(label);
            col += w;
        }
        (line, spans)
    }

    fn tab_at(&self, col: u16, row: u16) -> Option<WorkingDirSection> {
        let origin = self.frame.origin();
        let inner = chrome::content_origin();
        if row != origin.row + inner.row + TAB_ROW {
            return None;
        }
        let rel = usize::from(col.checked_sub(origin.col + inner.col)?);
        let (_, spans) = self.tabs(usize::from(self.frame.content_width()));
        spans.into_iter().find(|(start, end, _)| (*start..*end).contains(&rel)).map(|(_, _, s)| s)
    }

    fn handle_mouse(&mut self, event: &Event) -> Signals {
        if let Event::Click { col, row, button: MouseButton::Left, .. } = *event {
            if let Some(section) = self.tab_at(col, row) {
                self.switch_to(section);
                return message::none();
            }
        }
        let prefix = match self.section {
            WorkingDirSection::Recent => 0,
            _ => STAR_WIDTH,
        };
        let frame = *self.active_frame();
        match self.lists[self.section.index()].handle_mouse(event, &frame, prefix) {
            MouseOutcome::Prefix(_) if self.selected_entry().is_some_and(DirEntry::has_star) => {
                self.toggle_pin()
            }
            MouseOutcome::Confirmed(_) => self.activate(),
            _ => message::none(),
        }
    }

    fn help(&self) -> Vec<(&'static str, &'static str)> {
        let mut help = vec![("↑/↓", "navigate"), ("tab/shift+tab", "section"), ("enter", "select")];
        match self.selected_entry() {
            Some(entry) if !entry.can_pin() => {}
            Some(entry) if self.favorites.contains(&entry.path) => help.push(("ctrl+p", "unpin")),
            _ => help.push(("ctrl+p", "pin")),
        }
        help.push(("esc", "cancel"));
        help
    }

    fn status(&self) -> &str {
        match self.section {
            WorkingDirSection::Browse => self.last_error.as_deref().unwrap_or(""),
            WorkingDirSection::Pinned if self.active().filter().items().is_empty() => {
                "Use ctrl+p in Browse to pin directories"
            }
            _ => "",
        }
    }
}

impl Dialog for WorkingDirPicker {
    fn handle_event(&mut self, event: &Event) -> Signals {
        match event {
            Event::Resize { width, height } => {
                self.frame.resize(*width, *height);
                self.browse_frame.resize(*width, *height);
                for section in WorkingDirSection::ALL {
                    let frame = match section {
                        WorkingDirSection::Browse => self.browse_frame,
                        _ => self.frame,
                    };
                    self.lists[section.index()].set_size(frame.content_width(), frame.list_height());
                }
                self.redraw_all();
                message::none()
            }
            Event::ThemeChanged => message::none(),
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => {
                let browse = WorkingDirSection::Browse;
                if self.section == browse && self.lists[browse.index()].paste(text) {
                    self.redraw(browse);
                }
                message::none()
            }
            _ => self.handle_mouse(event),
        }
    }

    fn view(&self) -> TextBlock {
        let frame = self.active_frame();
        let builder = ContentBuilder::new(frame.content_width()).title(TITLE);
        let width = builder.width();
        let (tabs, _) = self.tabs(width);
        let mut builder = builder.line(&tabs).rule();
        if self.section == WorkingDirSection::Browse {
            let query = chrome::query_line(self.active().query(), "Type to filter directories…", width);
            builder = builder.line(&query).rule();
        }
        self.active()
            .append_rows(builder)
            .line(self.status())
            .help(&self.help())
            .fit_rows(usize::from(frame.content_rows()))
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
