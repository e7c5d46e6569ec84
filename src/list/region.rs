// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scrollable window over a line buffer, with an optional scroll indicator column.
//!
//! All offset arithmetic clamps: out-of-range requests pin to the nearest valid window
//! instead of failing.

use crate::text;

/// Blank column between content and the scroll indicator.
pub const GAP_WIDTH: u16 = 1;
pub const SCROLLBAR_WIDTH: u16 = 1;

const THUMB: char = '█';
const TRACK: char = '│';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Drag {
    start_row: usize,
    start_offset: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ListRegion {
    offset: usize,
    width: u16,
    height: usize,
    total: usize,
    lines: Vec<String>,
    always_reserve: bool,
    drag: Option<Drag>,
}

impl ListRegion {
    pub fn new() -> Self {
        Self { height: 1, ..Self::default() }
    }

    /// Keeps the indicator columns reserved even when everything fits, so content width stays
    /// stable while filtering shrinks and grows the list.
    pub fn with_reserved_scrollbar(mut self) -> Self {
        self.always_reserve = true;
        self
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = usize::from(height.max(1));
        self.clamp_offset();
    }

    /// Replaces the backing buffer. `total` may exceed `lines.len()` when trailing lines are
    /// not materialized; those render blank.
    pub fn set_content(&mut self, lines: Vec<String>, total: usize) {
        self.total = total.max(lines.len());
        self.lines = lines;
        self.clamp_offset();
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn total_lines(&self) -> usize {
        self.total
    }

    pub fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.height)
    }

    pub fn needs_scrollbar(&self) -> bool {
        self.total > self.height
    }

    pub fn reserved_columns(&self) -> u16 {
        if self.always_reserve || self.needs_scrollbar() {
            GAP_WIDTH + SCROLLBAR_WIDTH
        } else {
            0
        }
    }

    /// Columns left for text once the indicator is accounted for, for a buffer of `total`
    /// lines. Callers use this before the buffer is built.
    pub fn content_width_for(&self, total: usize) -> u16 {
        let reserve = self.always_reserve || total > self.height;
        if reserve {
            self.width.saturating_sub(GAP_WIDTH + SCROLLBAR_WIDTH)
        } else {
            self.width
        }
    }

    pub fn content_width(&self) -> u16 {
        self.width.saturating_sub(self.reserved_columns())
    }

    /// Column of the indicator relative to the region's left edge.
    pub fn scrollbar_column(&self) -> Option<u16> {
        self.needs_scrollbar().then(|| self.content_width() + GAP_WIDTH)
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset.min(self.max_offset());
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let next = if delta.is_negative() {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta.unsigned_abs())
        };
        self.set_offset(next);
    }

    pub fn page_by(&mut self, pages: isize) {
        let step = isize::try_from(self.height).unwrap_or(isize::MAX);
        self.scroll_by(pages.saturating_mul(step));
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn ensure_line_visible(&mut self, line: usize) {
        self.ensure_range_visible(line, line);
    }

    /// Moves the window the least amount that shows `start..=end`; `start` wins when the range
    /// is taller than the window.
    pub fn ensure_range_visible(&mut self, start: usize, end: usize) {
        let end = end.max(start);
        if end >= self.offset + self.height {
            self.offset = end + 1 - self.height;
        }
        if start < self.offset {
            self.offset = start;
        }
        self.clamp_offset();
    }

    pub fn is_line_visible(&self, line: usize) -> bool {
        line >= self.offset && line < self.offset + self.height
    }

    /// Thumb `(top, length)` in rows, when scrolling is possible.
    pub fn thumb(&self) -> Option<(usize, usize)> {
        if !self.needs_scrollbar() {
            return None;
        }
        let len = (self.height * self.height / self.total).max(1);
        let track = self.height - len;
        let max_offset = self.max_offset();
        let top = if max_offset == 0 { 0 } else { self.offset * track / max_offset };
        Some((top, len))
    }

    /// Handles a press on the indicator column at `row` (relative to the region top).
    /// The thumb starts a drag; the track above or below it pages.
    pub fn press_scrollbar(&mut self, row: usize) -> bool {
        let Some((top, len)) = self.thumb() else {
            return false;
        };
        if row < top {
            self.page_by(-1);
        } else if row >= top + len {
            self.page_by(1);
        } else {
            self.drag = Some(Drag { start_row: row, start_offset: self.offset });
        }
        true
    }

    pub fn drag_to(&mut self, row: usize) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let Some((_, len)) = self.thumb() else {
            self.drag = None;
            return false;
        };
        let track = self.height.saturating_sub(len);
        if track == 0 {
            return true;
        }
        let max_offset = self.max_offset();
        let next = if row >= drag.start_row {
            drag.start_offset + (row - drag.start_row) * max_offset / track
        } else {
            drag.start_offset.saturating_sub((drag.start_row - row) * max_offset / track)
        };
        self.set_offset(next);
        true
    }

    pub fn release(&mut self) -> bool {
        self.drag.take().is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Exactly `height` lines: the visible slice padded to content width, blank lines past the
    /// end, and the indicator column when scrolling is possible.
    pub fn view(&self) -> Vec<String> {
        let content_width = usize::from(self.content_width());
        let thumb = self.thumb();
        let mut out = Vec::with_capacity(self.height);

        for row in 0..self.height {
            let line = self.lines.get(self.offset + row).map(String::as_str).unwrap_or("");
            let mut rendered = text::fit(line, content_width);
            if let Some((top, len)) = thumb {
                rendered.push(' ');
                rendered.push(if row >= top && row < top + len { THUMB } else { TRACK });
            } else if self.always_reserve {
                rendered.push_str("  ");
            }
            out.push(rendered);
        }

        out
    }

    fn clamp_offset(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }
}
