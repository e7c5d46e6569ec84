// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Deterministic list fixtures (no RNG).

use std::borrow::Cow;

use modalist::list::Pickable;

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Medium,
    Large,
}

impl Case {
    pub const ALL: [Case; 3] = [Case::Small, Case::Medium, Case::Large];

    /// Stable case id; results stay comparable only while these do.
    pub fn id(self) -> &'static str {
        match self {
            Case::Small => "small",
            Case::Medium => "medium",
            Case::Large => "large",
        }
    }

    fn shape(self) -> (usize, usize) {
        match self {
            Case::Small => (3, 40),
            Case::Medium => (6, 500),
            Case::Large => (12, 4000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub id: usize,
    pub label: String,
    pub group: &'static str,
}

impl Pickable for Entry {
    type Key = usize;

    fn key(&self) -> usize {
        self.id
    }

    fn search_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.label)
    }

    fn group(&self) -> &str {
        self.group
    }
}

const GROUPS: [&str; 12] = [
    "config", "catalog", "custom", "session", "settings", "help", "files", "recent", "pinned",
    "themes", "models", "misc",
];
const WORDS: [&str; 8] = ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel"];

/// Items already sorted by group, spread evenly.
pub fn entries(case: Case) -> Vec<Entry> {
    let (groups, total) = case.shape();
    let per_group = total.div_ceil(groups);
    (0..total)
        .map(|id| Entry {
            id,
            label: format!("{} {} {id:05}", WORDS[id % WORDS.len()], WORDS[(id / 7) % WORDS.len()]),
            group: GROUPS[(id / per_group).min(groups - 1)],
        })
        .collect()
}
