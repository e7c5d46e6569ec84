// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Directory browser that attaches a file reference.

use std::{
    borrow::Cow,
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use super::chrome::{self, ContentBuilder, Sizing};
use super::picker::{MouseOutcome, PickerFrame, PickerList};
use super::{Dialog, TextBlock};
use crate::config::DialogConfig;
use crate::event::{Event, Key, KeyInput};
use crate::list::{GroupLayout, Origin, Pickable, SelectionPolicy};
use crate::message::{self, DialogResult, Signals};
use crate::text;

const SIZING: Sizing =
    Sizing { width_percent: 80, min_width: 60, max_width: 80, height_percent: 70, max_height: 30 };

/// Title, rule, directory, query, rule.
const HEADER_ROWS: u16 = 5;
/// Error line, help.
const FOOTER_ROWS: u16 = 2;

const HELP: &[(&str, &str)] = &[("↑/↓", "navigate"), ("enter", "select"), ("esc", "close")];

const SIZE_UNITS: [&str; 9] = ["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Decimal size with four significant digits: `532B`, `1.5kB`, `12.35MB`.
pub fn human_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    let int_digits = if value < 1.0 { 1 } else { value.log10().floor() as usize + 1 };
    let decimals = 4usize.saturating_sub(int_digits);
    let mut number = format!("{value:.decimals$}");
    if number.contains('.') {
        let trimmed = number.trim_end_matches('0').trim_end_matches('.').len();
        number.truncate(trimmed);
    }
    format!("{number}{}", SIZE_UNITS[unit])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Display name; directories end in `/`, the parent link is `..`.
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub size: u64,
}

impl FileEntry {
    fn is_parent_link(&self) -> bool {
        self.name == ".."
    }
}

impl Pickable for FileEntry {
    type Key = PathBuf;

    fn key(&self) -> PathBuf {
        self.path.clone()
    }

    fn search_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn always_visible(&self) -> bool {
        self.is_parent_link()
    }
}

/// Parent link (unless `dir` is a root), then directories, then files, each sorted by name.
pub fn read_entries(dir: &Path, show_hidden: bool) -> (Vec<FileEntry>, Option<io::Error>) {
    let mut entries = Vec::new();
    if let Some(parent) = dir.parent() {
        entries.push(FileEntry {
            name: "..".to_owned(),
            path: parent.to_owned(),
            is_dir: true,
            size: 0,
        });
    }

    let listing = match fs::read_dir(dir) {
        Ok(listing) => listing,
        Err(err) => return (entries, Some(err)),
    };

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in listing.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            dirs.push(FileEntry { name: format!("{name}/"), path: entry.path(), is_dir, size: 0 });
        } else {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.push(FileEntry { name, path: entry.path(), is_dir, size });
        }
    }
    dirs.sort_by(|a, b| a.name.cmp(&b.name));
    files.sort_by(|a, b| a.name.cmp(&b.name));
    entries.extend(dirs);
    entries.extend(files);
    (entries, None)
}

fn render_entry(entry: &FileEntry, width: usize) -> String {
    let icon = if entry.is_dir { "📁 " } else { "📄 " };
    let size = if !entry.is_dir && entry.size > 0 {
        format!(" {}", human_size(entry.size))
    } else {
        String::new()
    };
    let room = width.saturating_sub(text::display_width(icon) + text::display_width(&size));
    format!("{icon}{}{size}", text::truncate(&entry.name, room))
}

#[derive(Debug)]
pub struct FilePicker {
    dir: PathBuf,
    list: PickerList<FileEntry>,
    frame: PickerFrame,
    show_hidden: bool,
    last_error: Option<String>,
}

impl FilePicker {
    /// Opens at `cwd`, or at `initial` when given: a directory opens as is, a file opens its
    /// parent with the file selected, a missing path falls back to its parent when that exists.
    /// Relative paths resolve against `cwd`.
    pub fn new(cwd: &Path, initial: Option<&Path>, config: &DialogConfig) -> Self {
        let mut start = cwd.to_owned();
        let mut select = None;
        if let Some(initial) = initial.filter(|p| !p.as_os_str().is_empty()) {
            let initial = cwd.join(initial);
            match fs::metadata(&initial) {
                Ok(meta) if meta.is_dir() => start = initial,
                Ok(_) => {
                    start = initial.parent().map(Path::to_owned).unwrap_or(start);
                    select = Some(initial);
                }
                Err(_) => {
                    if let Some(parent) = initial.parent().filter(|p| p.is_dir()) {
                        start = parent.to_owned();
                    }
                }
            }
        }

        let mut list =
            PickerList::new(Vec::new(), SelectionPolicy::Reset, GroupLayout::Separators, config);
        list.set_placeholder(Some("No files found".to_owned()));
        let mut picker = Self {
            dir: start,
            list,
            frame: PickerFrame::new(SIZING, HEADER_ROWS, FOOTER_ROWS),
            show_hidden: config.show_hidden_files,
            last_error: None,
        };
        picker.load();
        if let Some(path) = select {
            picker.list.filter_mut().select_key(&path);
            picker.redraw();
        }
        picker
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn selected_entry(&self) -> Option<&FileEntry> {
        self.list.current()
    }

    pub fn visible_entries(&self) -> impl Iterator<Item = &FileEntry> + '_ {
        self.list.filter().filtered()
    }

    fn redraw(&mut self) {
        self.list.rebuild(render_entry, |_, _| String::new());
    }

    fn load(&mut self) {
        let (entries, err) = read_entries(&self.dir, self.show_hidden);
        self.last_error = err.map(|err| {
            warn!(dir = %self.dir.display(), error = %err, "failed to read directory");
            err.to_string()
        });
        debug!(dir = %self.dir.display(), entries = entries.len(), "listed directory");
        let filter = self.list.filter_mut();
        filter.set_query("");
        filter.set_items(entries);
        filter.select_first();
        self.redraw();
    }

    fn activate(&mut self) -> Signals {
        let Some(entry) = self.list.current().cloned() else {
            return message::none();
        };
        if entry.is_dir {
            self.dir = entry.path;
            self.load();
            return message::none();
        }
        message::close_with(DialogResult::InsertFileRef { path: entry.path })
    }

    fn handle_key(&mut self, key: &KeyInput) -> Signals {
        match key.key {
            Key::Esc => message::close(),
            Key::Enter => self.activate(),
            _ => {
                if !self.list.handle_nav(key) && self.list.edit_query(key) {
                    self.redraw();
                }
                message::none()
            }
        }
    }
}

impl Dialog for FilePicker {
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
                MouseOutcome::Confirmed(_) => self.activate(),
                _ => message::none(),
            },
        }
    }

    fn view(&self) -> TextBlock {
        let builder = ContentBuilder::new(self.frame.content_width()).title("Attach File");
        let width = builder.width();
        let dir = format!("📁 {}", text::truncate_start(&self.dir.to_string_lossy(), width.saturating_sub(3)));
        let query = chrome::query_line(self.list.query(), "Type to filter files…", width);
        let status = self.last_error.as_deref().unwrap_or("");
        self.list
            .append_rows(builder.line(&dir).line(&query).rule())
            .line(status)
            .help(HELP)
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
