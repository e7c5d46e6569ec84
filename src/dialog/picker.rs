// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The composite every picker is built from: filter controller, grouped lines, list region,
//! and click tracking, kept in sync after each mutation.

use std::time::Duration;

use super::chrome::{self, ContentBuilder, Sizing};
use super::TextBlock;
use crate::config::DialogConfig;
use crate::event::{Event, Key, KeyInput, MouseButton, WheelDirection};
use crate::list::{
    classify, ClickOutcome, ClickTracker, FilterController, GroupLayout, GroupedLines, HitTarget,
    ListGeometry, ListRegion, Origin, Pickable, RenderedLine, SelectionPolicy,
};

/// Title, rule, query, rule.
pub const STANDARD_HEADER_ROWS: u16 = 4;
/// Status line, help line.
pub const STANDARD_FOOTER_ROWS: u16 = 2;

/// Where a picker sits and how its rows are split, recomputed from the screen size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerFrame {
    screen: (u16, u16),
    sizing: Sizing,
    header_rows: u16,
    footer_rows: u16,
}

impl PickerFrame {
    pub fn new(sizing: Sizing, header_rows: u16, footer_rows: u16) -> Self {
        Self { screen: (0, 0), sizing, header_rows, footer_rows }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen = (width, height);
    }

    pub fn screen(&self) -> (u16, u16) {
        self.screen
    }

    pub fn outer_size(&self) -> (u16, u16) {
        self.sizing.outer_size(self.screen)
    }

    pub fn origin(&self) -> Origin {
        let (w, h) = self.outer_size();
        chrome::center_position(self.screen.0, self.screen.1, w, h)
    }

    pub fn content_width(&self) -> u16 {
        chrome::content_width(self.outer_size().0)
    }

    pub fn content_rows(&self) -> u16 {
        chrome::content_height(self.outer_size().1)
    }

    pub fn header_rows(&self) -> u16 {
        self.header_rows
    }

    pub fn list_height(&self) -> u16 {
        self.content_rows().saturating_sub(self.header_rows + self.footer_rows).max(1)
    }

    /// List placement relative to the dialog origin.
    pub fn list_geometry(&self, prefix_width: u16) -> ListGeometry {
        let inner = chrome::content_origin();
        ListGeometry { top: inner.row + self.header_rows, left: inner.col, prefix_width }
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        chrome::is_inside(self.origin(), self.outer_size(), col, row)
    }
}

/// What a mouse event did to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseOutcome {
    Ignored,
    Scrolled,
    Selected(usize),
    Confirmed(usize),
    Prefix(usize),
}

#[derive(Debug, Clone)]
pub struct PickerList<T> {
    filter: FilterController<T>,
    lines: GroupedLines,
    region: ListRegion,
    layout: GroupLayout,
    clicks: ClickTracker,
    wheel_step: u16,
    placeholder: Option<String>,
}

impl<T: Pickable> PickerList<T> {
    pub fn new(
        items: Vec<T>,
        policy: SelectionPolicy,
        layout: GroupLayout,
        config: &DialogConfig,
    ) -> Self {
        Self {
            filter: FilterController::new(items, policy),
            lines: GroupedLines::default(),
            region: ListRegion::new(),
            layout,
            clicks: ClickTracker::new(config.double_click_threshold()),
            wheel_step: config.wheel_step.max(1),
            placeholder: None,
        }
    }

    pub fn with_reserved_scrollbar(mut self) -> Self {
        self.region = self.region.with_reserved_scrollbar();
        self
    }

    pub fn filter(&self) -> &FilterController<T> {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut FilterController<T> {
        &mut self.filter
    }

    pub fn lines(&self) -> &GroupedLines {
        &self.lines
    }

    pub fn region(&self) -> &ListRegion {
        &self.region
    }

    pub fn double_click_threshold(&self) -> Duration {
        self.clicks.threshold()
    }

    pub fn query(&self) -> &str {
        self.filter.query()
    }

    pub fn selected(&self) -> Option<usize> {
        self.filter.selected()
    }

    pub fn current(&self) -> Option<&T> {
        self.filter.current_selection()
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.region.set_size(width, height);
    }

    /// Shown in place of the list when nothing matches.
    pub fn set_placeholder(&mut self, placeholder: Option<String>) {
        self.placeholder = placeholder;
    }

    /// Re-derives the line mapping and the rendered rows, then keeps the selection in view.
    /// `item` and `separator` receive the usable text width.
    pub fn rebuild(
        &mut self,
        item: impl Fn(&T, usize) -> String,
        separator: impl Fn(&str, usize) -> String,
    ) {
        self.lines = GroupedLines::build(self.filter.filtered().map(|entry| entry.group()), self.layout);

        if self.lines.is_empty() {
            let rows: Vec<String> = self.placeholder.iter().cloned().collect();
            let total = rows.len();
            self.region.set_content(rows, total);
            self.region.scroll_to_top();
            return;
        }

        let width = usize::from(self.region.content_width_for(self.lines.len()));
        let rows: Vec<String> = self
            .lines
            .lines()
            .iter()
            .map(|line| match line {
                RenderedLine::Item(index) => {
                    self.filter.get(*index).map(|value| item(value, width)).unwrap_or_default()
                }
                RenderedLine::Separator(key) => separator(key, width),
                RenderedLine::Spacer => String::new(),
            })
            .collect();
        let total = rows.len();
        self.region.set_content(rows, total);
        self.follow_selection();
    }

    /// Scrolls just enough to show the selected item. With the first item selected the
    /// window snaps to the top so a leading group header stays visible.
    pub fn follow_selection(&mut self) {
        match self.filter.selected() {
            Some(0) => self.region.scroll_to_top(),
            Some(index) => {
                if let Some(line) = self.lines.item_index_to_line(index) {
                    self.region.ensure_line_visible(line);
                }
            }
            None => {}
        }
    }

    /// Row of the selected item within the visible window.
    pub fn selected_row(&self) -> Option<usize> {
        let line = self.lines.item_index_to_line(self.filter.selected()?)?;
        self.region.is_line_visible(line).then(|| line - self.region.offset())
    }

    pub fn view_rows(&self) -> Vec<String> {
        self.region.view()
    }

    /// Appends the visible rows, highlighting the selected one.
    pub fn append_rows(&self, builder: ContentBuilder) -> ContentBuilder {
        builder.list(self.view_rows(), self.selected_row())
    }

    /// The layout most pickers share: title, query, list, status, help.
    pub fn standard_block(
        &self,
        frame: &PickerFrame,
        title: &str,
        prompt: &str,
        status: Option<&str>,
        help: &[(&str, &str)],
    ) -> TextBlock {
        let builder = ContentBuilder::new(frame.content_width()).title(title);
        let query = chrome::query_line(self.query(), prompt, builder.width());
        let builder = self.append_rows(builder.line(&query).rule());
        builder
            .line(status.unwrap_or(""))
            .help(help)
            .fit_rows(usize::from(frame.content_rows()))
            .build()
    }

    /// Up/Down (or ctrl+k/ctrl+j), PageUp/PageDown, Home/End. Returns whether the key was a
    /// navigation key.
    pub fn handle_nav(&mut self, key: &KeyInput) -> bool {
        let page = isize::try_from(self.region.height()).unwrap_or(1).max(1);
        match key.key {
            Key::Up => self.filter.move_selection(-1),
            Key::Down => self.filter.move_selection(1),
            Key::Char('k') if key.modifiers.ctrl => self.filter.move_selection(-1),
            Key::Char('j') if key.modifiers.ctrl => self.filter.move_selection(1),
            Key::PageUp => self.filter.move_selection(-page),
            Key::PageDown => self.filter.move_selection(page),
            Key::Home => self.filter.select_first(),
            Key::End => self.filter.select_last(),
            _ => return false,
        }
        self.follow_selection();
        true
    }

    /// Typing and backspace edit the query. Returns whether the query changed; callers must
    /// [`Self::rebuild`] afterwards.
    pub fn edit_query(&mut self, key: &KeyInput) -> bool {
        let mut query = self.filter.query().to_owned();
        match key.key {
            Key::Backspace if !key.modifiers.ctrl && !key.modifiers.alt => {
                if query.pop().is_none() {
                    return false;
                }
            }
            _ => match key.text() {
                Some(ch) => query.push(ch),
                None => return false,
            },
        }
        self.filter.set_query(&query);
        true
    }

    /// Appends pasted text to the query, newlines dropped.
    pub fn paste(&mut self, text: &str) -> bool {
        let cleaned: String = text.chars().filter(|ch| !ch.is_control()).collect();
        if cleaned.is_empty() {
            return false;
        }
        let query = format!("{}{cleaned}", self.filter.query());
        self.filter.set_query(&query);
        true
    }

    /// Wheel, clicks, indicator drags. `frame` supplies the dialog rectangle.
    pub fn handle_mouse(
        &mut self,
        event: &Event,
        frame: &PickerFrame,
        prefix_width: u16,
    ) -> MouseOutcome {
        let origin = frame.origin();
        let geometry = frame.list_geometry(prefix_width);
        match *event {
            Event::Wheel { col, row, direction } => {
                if !frame.contains(col, row) {
                    return MouseOutcome::Ignored;
                }
                let step = self.wheel_step as isize;
                match direction {
                    WheelDirection::Up => self.region.scroll_by(-step),
                    WheelDirection::Down => self.region.scroll_by(step),
                }
                MouseOutcome::Scrolled
            }
            Event::Click { button, .. } if button != MouseButton::Left => MouseOutcome::Ignored,
            Event::Click { col, row, at, .. } => {
                match classify(col, row, origin, geometry, &self.region, &self.lines) {
                    HitTarget::Scrollbar(bar_row) => {
                        self.clicks.reset();
                        if self.region.press_scrollbar(bar_row) {
                            MouseOutcome::Scrolled
                        } else {
                            MouseOutcome::Ignored
                        }
                    }
                    HitTarget::Prefix(index) => {
                        self.clicks.reset();
                        self.filter.select(index);
                        MouseOutcome::Prefix(index)
                    }
                    HitTarget::Item(index) => {
                        self.filter.select(index);
                        match self.clicks.click(index, at) {
                            ClickOutcome::Select(index) => MouseOutcome::Selected(index),
                            ClickOutcome::Confirm(index) => MouseOutcome::Confirmed(index),
                        }
                    }
                    HitTarget::Outside => MouseOutcome::Ignored,
                }
            }
            Event::Motion { row, .. } if self.region.is_dragging() => {
                let top = origin.row + geometry.top;
                self.region.drag_to(usize::from(row.saturating_sub(top)));
                MouseOutcome::Scrolled
            }
            Event::Release { .. } if self.region.release() => MouseOutcome::Scrolled,
            _ => MouseOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::time::{Duration, Instant};

    use super::{MouseOutcome, PickerFrame, PickerList};
    use crate::config::DialogConfig;
    use crate::dialog::chrome::Sizing;
    use rstest::rstest;

    use crate::event::{Event, Key, KeyInput, MouseButton, WheelDirection};
    use crate::list::{GroupLayout, Pickable, SelectionPolicy};

    #[derive(Debug, Clone)]
    struct Row {
        name: String,
        group: &'static str,
    }

    impl Pickable for Row {
        type Key = String;

        fn key(&self) -> String {
            self.name.clone()
        }

        fn search_text(&self) -> Cow<'_, str> {
            Cow::Borrowed(&self.name)
        }

        fn group(&self) -> &str {
            self.group
        }
    }

    const SIZING: Sizing =
        Sizing { width_percent: 50, min_width: 20, max_width: 40, height_percent: 50, max_height: 16 };

    fn setup(n: usize) -> (PickerList<Row>, PickerFrame) {
        let rows = (0..n)
            .map(|i| Row { name: format!("row{i:02}"), group: if i < 3 { "a" } else { "b" } })
            .collect();
        let mut list =
            PickerList::new(rows, SelectionPolicy::Reset, GroupLayout::Separators, &DialogConfig::default());
        let mut frame = PickerFrame::new(SIZING, 4, 2);
        frame.resize(80, 32);
        list.set_size(frame.content_width(), frame.list_height());
        list.rebuild(|row, _| row.name.clone(), |key, _| format!("-- {key}"));
        (list, frame)
    }

    #[test]
    fn frame_splits_rows() {
        let (_, frame) = setup(1);
        assert_eq!(frame.outer_size(), (40, 16));
        assert_eq!(frame.content_rows(), 14);
        assert_eq!(frame.list_height(), 8);
        assert_eq!(frame.origin().row, 8);
        assert_eq!(frame.list_geometry(0).top, 5);
    }

    #[test]
    fn navigation_keeps_selection_visible() {
        let (mut list, _) = setup(20);
        list.handle_nav(&KeyInput::new(Key::End));
        assert_eq!(list.selected(), Some(19));
        assert!(list.selected_row().is_some());
        list.handle_nav(&KeyInput::new(Key::Home));
        assert_eq!(list.region().offset(), 0);
        assert_eq!(list.selected_row(), Some(0));
    }

    #[test]
    fn typing_filters_and_backspace_restores() {
        let (mut list, _) = setup(20);
        assert!(list.edit_query(&KeyInput::char('1')));
        list.rebuild(|row, _| row.name.clone(), |key, _| key.to_owned());
        // row01 and row10..row19
        assert_eq!(list.filter().filtered_len(), 11);
        assert!(list.edit_query(&KeyInput::new(Key::Backspace)));
        assert!(!list.edit_query(&KeyInput::new(Key::Backspace)));
        assert!(!list.edit_query(&KeyInput::ctrl('x')));
        assert_eq!(list.query(), "");
    }

    #[test]
    fn click_then_quick_click_confirms() {
        let (mut list, frame) = setup(5);
        let origin = frame.origin();
        let top = origin.row + frame.list_geometry(0).top;
        let col = origin.col + 4;
        let t0 = Instant::now();

        // rows: row00 row01 row02 separator row03 row04
        let first = list.handle_mouse(&Event::click(col, top + 4, t0), &frame, 0);
        assert_eq!(first, MouseOutcome::Selected(3));
        let second =
            list.handle_mouse(&Event::click(col, top + 4, t0 + Duration::from_millis(120)), &frame, 0);
        assert_eq!(second, MouseOutcome::Confirmed(3));

        let separator = list.handle_mouse(&Event::click(col, top + 3, t0), &frame, 0);
        assert_eq!(separator, MouseOutcome::Ignored);
        assert_eq!(list.selected(), Some(3));
    }

    #[rstest]
    #[case::right(MouseButton::Right)]
    #[case::middle(MouseButton::Middle)]
    fn non_left_clicks_neither_select_nor_confirm(#[case] button: MouseButton) {
        let (mut list, frame) = setup(5);
        let origin = frame.origin();
        let top = origin.row + frame.list_geometry(2).top;
        let col = origin.col + 4;
        let t0 = Instant::now();

        for at in [t0, t0 + Duration::from_millis(100)] {
            let click = Event::Click { col, row: top + 4, button, at };
            assert_eq!(list.handle_mouse(&click, &frame, 2), MouseOutcome::Ignored);
        }
        let star = Event::Click { col: origin.col + 2, row: top + 1, button, at: t0 };
        assert_eq!(list.handle_mouse(&star, &frame, 2), MouseOutcome::Ignored);
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn wheel_only_scrolls_inside_the_dialog() {
        let (mut list, frame) = setup(30);
        let origin = frame.origin();
        let outside = Event::Wheel { col: 0, row: 0, direction: WheelDirection::Down };
        assert_eq!(list.handle_mouse(&outside, &frame, 0), MouseOutcome::Ignored);

        let inside =
            Event::Wheel { col: origin.col + 2, row: origin.row + 2, direction: WheelDirection::Down };
        assert_eq!(list.handle_mouse(&inside, &frame, 0), MouseOutcome::Scrolled);
        assert_eq!(list.region().offset(), 2);
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn empty_filter_shows_placeholder_row() {
        let (mut list, _) = setup(3);
        list.set_placeholder(Some("Nothing here".into()));
        list.filter_mut().set_query("zzz");
        list.rebuild(|row, _| row.name.clone(), |key, _| key.to_owned());
        assert!(list.lines().is_empty());
        assert!(list.view_rows()[0].starts_with("Nothing here"));
        assert_eq!(list.selected_row(), None);
    }
}
