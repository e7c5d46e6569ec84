// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mapping between logical item indices and visual lines.
//!
//! A filtered item sequence is laid out once into [`RenderedLine`]s; the forward
//! (`line -> item`) and inverse (`item -> line`) lookups are both answered from that
//! single pass so keyboard and mouse paths cannot disagree about where an item is.

use std::collections::HashSet;

use smol_str::SmolStr;

/// How group transitions are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupLayout {
    /// One separator line before the first item of every group except the first one seen.
    #[default]
    Separators,
    /// A header line for every group, with one blank spacer line before every header but the
    /// first.
    Headers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedLine {
    Item(usize),
    /// Opens the group named by the key.
    Separator(SmolStr),
    Spacer,
}

impl RenderedLine {
    pub fn item(&self) -> Option<usize> {
        match self {
            Self::Item(index) => Some(*index),
            Self::Separator(_) | Self::Spacer => None,
        }
    }
}

/// Result of resolving a visual line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTarget {
    Item(usize),
    Separator,
    OutOfRange,
}

impl LineTarget {
    pub fn item(self) -> Option<usize> {
        match self {
            Self::Item(index) => Some(index),
            Self::Separator | Self::OutOfRange => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedLines {
    lines: Vec<RenderedLine>,
    item_lines: Vec<usize>,
    separators: usize,
}

impl GroupedLines {
    /// Lays out one line per group key, in order. `""` is a valid key like any other.
    pub fn build<'a, I>(group_keys: I, layout: GroupLayout) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keys = group_keys.into_iter();
        let (lower, _) = keys.size_hint();
        let mut lines = Vec::with_capacity(lower + 4);
        let mut item_lines = Vec::with_capacity(lower);
        let mut separators = 0usize;

        let mut seen: HashSet<&str> = HashSet::new();
        let mut current: Option<&str> = None;

        for (index, key) in keys.enumerate() {
            if current != Some(key) {
                let first_group = seen.is_empty();
                if seen.insert(key) {
                    match layout {
                        GroupLayout::Separators => {
                            if !first_group {
                                lines.push(RenderedLine::Separator(SmolStr::new(key)));
                                separators += 1;
                            }
                        }
                        GroupLayout::Headers => {
                            if !first_group {
                                lines.push(RenderedLine::Spacer);
                            }
                            lines.push(RenderedLine::Separator(SmolStr::new(key)));
                            separators += 1;
                        }
                    }
                }
                current = Some(key);
            }

            item_lines.push(lines.len());
            lines.push(RenderedLine::Item(index));
        }

        Self { lines, item_lines, separators }
    }

    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.item_lines.len()
    }

    /// Number of group-opening lines (separators or headers). Spacers are not counted.
    pub fn separator_count(&self) -> usize {
        self.separators
    }

    pub fn line_to_item_index(&self, line: usize) -> LineTarget {
        match self.lines.get(line) {
            Some(RenderedLine::Item(index)) => LineTarget::Item(*index),
            Some(RenderedLine::Separator(_) | RenderedLine::Spacer) => LineTarget::Separator,
            None => LineTarget::OutOfRange,
        }
    }

    pub fn item_index_to_line(&self, item: usize) -> Option<usize> {
        self.item_lines.get(item).copied()
    }
}
