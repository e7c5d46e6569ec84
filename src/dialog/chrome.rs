// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Sizing, centering, and content helpers shared by dialogs.

use super::TextBlock;
use crate::list::Origin;
use crate::text;

pub const BORDER: u16 = 1;
pub const PADDING_X: u16 = 1;
pub const MIN_CONTENT_WIDTH: u16 = 10;
/// Border, title, rule, query, rule, one list row, status, help, border.
pub const MIN_DIALOG_HEIGHT: u16 = 9;

const RULE: char = '─';

/// Percentage-of-screen sizing bounds for one dialog kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sizing {
    pub width_percent: u16,
    pub min_width: u16,
    pub max_width: u16,
    pub height_percent: u16,
    pub max_height: u16,
}

impl Sizing {
    pub fn outer_size(&self, screen: (u16, u16)) -> (u16, u16) {
        (
            dialog_width(screen.0, self.width_percent, self.min_width, self.max_width),
            dialog_height(screen.1, self.height_percent, self.max_height),
        )
    }
}

/// `percent` of the screen, clamped to `[min, max]`, never wider than the screen.
pub fn dialog_width(screen_width: u16, percent: u16, min: u16, max: u16) -> u16 {
    let scaled = (u32::from(screen_width) * u32::from(percent) / 100) as u16;
    scaled.max(min).min(max).min(screen_width)
}

pub fn dialog_height(screen_height: u16, percent: u16, max: u16) -> u16 {
    let scaled = (u32::from(screen_height) * u32::from(percent) / 100) as u16;
    scaled.min(max).max(MIN_DIALOG_HEIGHT).min(screen_height)
}

/// Centers a `dialog` box on `screen`, pinned inside it.
pub fn center_position(
    screen_width: u16,
    screen_height: u16,
    dialog_width: u16,
    dialog_height: u16,
) -> Origin {
    let col = screen_width.saturating_sub(dialog_width) / 2;
    let row = screen_height.saturating_sub(dialog_height) / 2;
    Origin {
        row: row.min(screen_height.saturating_sub(dialog_height)),
        col: col.min(screen_width.saturating_sub(dialog_width)),
    }
}

/// Text columns inside a dialog of `dialog_width` outer columns.
pub fn content_width(dialog_width: u16) -> u16 {
    dialog_width.saturating_sub(PADDING_X * 2 + BORDER * 2).max(MIN_CONTENT_WIDTH)
}

/// Content rows inside a dialog of `dialog_height` outer rows.
pub fn content_height(dialog_height: u16) -> u16 {
    dialog_height.saturating_sub(BORDER * 2)
}

/// Offset from the dialog origin to the first content cell.
pub fn content_origin() -> Origin {
    Origin { row: BORDER, col: BORDER + PADDING_X }
}

pub fn is_inside(origin: Origin, size: (u16, u16), col: u16, row: u16) -> bool {
    let (col, row) = (u32::from(col), u32::from(row));
    let (left, top) = (u32::from(origin.col), u32::from(origin.row));
    col >= left && col < left + u32::from(size.0) && row >= top && row < top + u32::from(size.1)
}

/// `── Label ─────` filling `width`.
pub fn separator_line(label: &str, width: usize) -> String {
    let head = format!("{RULE}{RULE} {label} ");
    let head = text::truncate(&head, width);
    let used = text::display_width(&head);
    let mut out = head;
    out.extend(std::iter::repeat(RULE).take(width.saturating_sub(used)));
    out
}

pub fn rule_line(width: usize) -> String {
    std::iter::repeat(RULE).take(width).collect()
}

/// Help footer from `(key, action)` pairs.
pub fn help_line(bindings: &[(&str, &str)], width: usize) -> String {
    let joined = bindings
        .iter()
        .map(|(key, action)| format!("{key} {action}"))
        .collect::<Vec<_>>()
        .join("  ");
    text::fit(&joined, width)
}

pub fn query_line(query: &str, placeholder: &str, width: usize) -> String {
    if query.is_empty() {
        text::fit(&format!("> {placeholder}"), width)
    } else {
        text::fit(&format!("> {query}"), width)
    }
}

/// Assembles a [`TextBlock`] row by row, padding every row to the content width.
#[derive(Debug)]
pub struct ContentBuilder {
    width: usize,
    lines: Vec<String>,
    highlight: Option<usize>,
}

impl ContentBuilder {
    pub fn new(width: u16) -> Self {
        Self { width: usize::from(width), lines: Vec::new(), highlight: None }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn row_count(&self) -> usize {
        self.lines.len()
    }

    pub fn title(self, title: &str) -> Self {
        self.line(title).rule()
    }

    pub fn rule(mut self) -> Self {
        self.lines.push(rule_line(self.width));
        self
    }

    pub fn line(mut self, line: &str) -> Self {
        self.lines.push(text::fit(line, self.width));
        self
    }

    pub fn blank(self) -> Self {
        self.line("")
    }

    /// Appends list rows; `selected` is relative to the first of them.
    pub fn list(mut self, rows: Vec<String>, selected: Option<usize>) -> Self {
        if let Some(selected) = selected.filter(|&s| s < rows.len()) {
            self.highlight = Some(self.lines.len() + selected);
        }
        for row in rows {
            self.lines.push(text::fit(&row, self.width));
        }
        self
    }

    pub fn help(self, bindings: &[(&str, &str)]) -> Self {
        let line = help_line(bindings, self.width);
        self.line(&line)
    }

    /// Pads or trims to exactly `rows` lines, keeping the last line (the help footer) when
    /// trimming.
    pub fn fit_rows(mut self, rows: usize) -> Self {
        while self.lines.len() < rows {
            let at = self.lines.len().saturating_sub(1);
            self.lines.insert(at, " ".repeat(self.width));
            self.highlight = self.highlight.map(|h| if h >= at { h + 1 } else { h });
        }
        while self.lines.len() > rows && self.lines.len() > 1 {
            let at = self.lines.len() - 2;
            self.lines.remove(at);
            self.highlight = match self.highlight {
                Some(h) if h == at => None,
                Some(h) if h > at => Some(h - 1),
                other => other,
            };
        }
        self
    }

    pub fn build(self) -> TextBlock {
        TextBlock { width: self.width as u16, lines: self.lines, highlight: self.highlight }
    }
}
