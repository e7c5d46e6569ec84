// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Query filtering and selection over a pickable item list.

use std::borrow::Cow;

/// An entry a picker can list, filter, and select.
pub trait Pickable {
    type Key: PartialEq + Clone;

    /// Stable identity used to keep the selection on the same entry across filter changes.
    fn key(&self) -> Self::Key;

    /// Text matched against the query. Lowercased once per item set.
    fn search_text(&self) -> Cow<'_, str>;

    /// Section the item belongs to; `""` when the list is flat.
    fn group(&self) -> &str {
        ""
    }

    /// Entries that survive every query (e.g. a parent-directory link).
    fn always_visible(&self) -> bool {
        false
    }
}

/// What happens to the selection when the filtered set is re-derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Back to the first entry.
    #[default]
    Reset,
    /// Follow the previously selected entry by key, falling back to a clamped position.
    Sticky,
}

#[derive(Debug, Clone)]
pub struct FilterController<T> {
    items: Vec<T>,
    haystacks: Vec<String>,
    query: String,
    filtered: Vec<usize>,
    selected: Option<usize>,
    policy: SelectionPolicy,
}

impl<T: Pickable> FilterController<T> {
    pub fn new(items: Vec<T>, policy: SelectionPolicy) -> Self {
        let haystacks = haystacks(&items);
        let filtered: Vec<usize> = (0..items.len()).collect();
        let selected = if filtered.is_empty() { None } else { Some(0) };
        Self { items, haystacks, query: String::new(), filtered, selected, policy }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Re-filters with `query`. Repeating the current query changes nothing.
    pub fn set_query(&mut self, query: &str) {
        if self.query == query {
            return;
        }
        self.query = query.to_owned();
        self.refilter();
    }

    /// Replaces the source items and re-applies the current query.
    pub fn set_items(&mut self, items: Vec<T>) {
        let previous = self.current_key();
        self.haystacks = haystacks(&items);
        self.items = items;
        self.apply(previous);
    }

    /// Re-derives the filtered set from the current query and items.
    pub fn refilter(&mut self) {
        let previous = self.current_key();
        self.apply(previous);
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    /// Positions into [`Self::items`] of the filtered entries, in order.
    pub fn filtered_indices(&self) -> &[usize] {
        &self.filtered
    }

    pub fn filtered(&self) -> impl Iterator<Item = &T> + '_ {
        self.filtered.iter().map(|&idx| &self.items[idx])
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.filtered.get(index).map(|&idx| &self.items[idx])
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn current_selection(&self) -> Option<&T> {
        self.selected.and_then(|idx| self.get(idx))
    }

    /// Mutable access to the selected item. Callers that change searchable fields must call
    /// [`Self::set_items`] or [`Self::refilter`] afterwards.
    pub fn current_selection_mut(&mut self) -> Option<&mut T> {
        let source = self.selected.and_then(|idx| self.filtered.get(idx).copied())?;
        self.items.get_mut(source)
    }

    pub fn select(&mut self, index: usize) {
        if self.filtered.is_empty() {
            self.selected = None;
            return;
        }
        self.selected = Some(index.min(self.filtered.len() - 1));
    }

    pub fn select_key(&mut self, key: &T::Key) -> bool {
        match self.position_of(key) {
            Some(pos) => {
                self.selected = Some(pos);
                true
            }
            None => false,
        }
    }

    /// Moves by `delta` entries, clamped to the ends. Never wraps.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.filtered.len();
        if len == 0 {
            self.selected = None;
            return;
        }
        let idx = self.selected.unwrap_or(0).min(len - 1);
        let next = if delta.is_negative() {
            idx.saturating_sub(delta.unsigned_abs())
        } else {
            idx.saturating_add(delta.unsigned_abs()).min(len - 1)
        };
        self.selected = Some(next);
    }

    pub fn select_first(&mut self) {
        self.selected = if self.filtered.is_empty() { None } else { Some(0) };
    }

    pub fn select_last(&mut self) {
        self.selected = self.filtered.len().checked_sub(1);
    }

    /// `1`..`9` pick entries 0..8 and `0` picks entry 9. Returns the index when it exists.
    pub fn select_digit(&mut self, digit: char) -> Option<usize> {
        let index = digit_index(digit)?;
        if index >= self.filtered.len() {
            return None;
        }
        self.selected = Some(index);
        Some(index)
    }

    fn current_key(&self) -> Option<(T::Key, usize)> {
        let idx = self.selected?;
        self.get(idx).map(|item| (item.key(), idx))
    }

    fn position_of(&self, key: &T::Key) -> Option<usize> {
        self.filtered.iter().position(|&idx| self.items[idx].key() == *key)
    }

    fn apply(&mut self, previous: Option<(T::Key, usize)>) {
        let needle = self.query.trim().to_lowercase();
        self.filtered = self
            .items
            .iter()
            .zip(&self.haystacks)
            .enumerate()
            .filter(|(_, (item, hay))| {
                needle.is_empty() || item.always_visible() || hay.contains(needle.as_str())
            })
            .map(|(idx, _)| idx)
            .collect();

        if self.filtered.is_empty() {
            self.selected = None;
            return;
        }

        let next = match (self.policy, previous) {
            (SelectionPolicy::Sticky, Some((key, old_pos))) => {
                self.position_of(&key).unwrap_or(old_pos.min(self.filtered.len() - 1))
            }
            _ => 0,
        };
        self.selected = Some(next);
    }
}

/// Maps a digit key to a list position: `1`..`9` to 0..8, `0` to 9.
pub fn digit_index(digit: char) -> Option<usize> {
    match digit {
        '0' => Some(9),
        '1'..='9' => Some(digit as usize - '1' as usize),
        _ => None,
    }
}

fn haystacks<T: Pickable>(items: &[T]) -> Vec<String> {
    items.iter().map(|item| item.search_text().to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use proptest::prelude::*;
    use rstest::rstest;

    use super::{digit_index, FilterController, Pickable, SelectionPolicy};

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        id: u32,
        label: String,
        provider: String,
    }

    impl Pickable for Entry {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }

        fn search_text(&self) -> Cow<'_, str> {
            Cow::Owned(format!("{} {}", self.label, self.provider))
        }
    }

    fn entries(n: u32) -> Vec<Entry> {
        (0..n)
            .map(|id| Entry {
                id,
                label: format!("Item {id}"),
                provider: if id % 2 == 0 { "Even".into() } else { "Odd".into() },
            })
            .collect()
    }

    #[test]
    fn empty_query_restores_everything_and_resets() {
        let mut filter = FilterController::new(entries(10), SelectionPolicy::Reset);
        filter.set_query("odd");
        assert_eq!(filter.filtered_len(), 5);
        filter.move_selection(3);
        filter.set_query("");
        assert_eq!(filter.filtered_len(), 10);
        assert_eq!(filter.selected(), Some(0));
    }

    #[test]
    fn sticky_selection_follows_the_item() {
        let mut filter = FilterController::new(entries(10), SelectionPolicy::Sticky);
        filter.set_query("odd");
        filter.move_selection(2);
        assert_eq!(filter.current_selection().map(|e| e.id), Some(5));
        filter.set_query("");
        assert_eq!(filter.selected(), Some(5));
        assert_eq!(filter.current_selection().map(|e| e.id), Some(5));
    }

    #[test]
    fn sticky_selection_falls_back_to_clamped_position() {
        let mut filter = FilterController::new(entries(10), SelectionPolicy::Sticky);
        filter.select(8);
        filter.set_query("item 1");
        // only "Item 1" matches; the old position clamps into range
        assert_eq!(filter.filtered_len(), 1);
        assert_eq!(filter.selected(), Some(0));
    }

    #[test]
    fn matching_is_case_insensitive_over_secondary_fields() {
        let mut filter = FilterController::new(entries(4), SelectionPolicy::Reset);
        filter.set_query("  EVEN ");
        let ids: Vec<u32> = filter.filtered().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn no_match_selects_nothing() {
        let mut filter = FilterController::new(entries(3), SelectionPolicy::Reset);
        filter.set_query("zzz");
        assert!(filter.is_empty());
        assert_eq!(filter.selected(), None);
        assert!(filter.current_selection().is_none());
        filter.move_selection(1);
        assert_eq!(filter.selected(), None);
    }

    #[test]
    fn movement_clamps_without_wrapping() {
        let mut filter = FilterController::new(entries(3), SelectionPolicy::Reset);
        filter.move_selection(-1);
        assert_eq!(filter.selected(), Some(0));
        filter.move_selection(10);
        assert_eq!(filter.selected(), Some(2));
        filter.move_selection(1);
        assert_eq!(filter.selected(), Some(2));
        filter.select_first();
        assert_eq!(filter.selected(), Some(0));
        filter.select_last();
        assert_eq!(filter.selected(), Some(2));
    }

    #[rstest]
    #[case('1', Some(0))]
    #[case('9', Some(8))]
    #[case('0', Some(9))]
    #[case('a', None)]
    fn digits_map_to_positions(#[case] digit: char, #[case] expected: Option<usize>) {
        assert_eq!(digit_index(digit), expected);
    }

    #[test]
    fn digits_past_the_end_are_ignored() {
        let mut filter = FilterController::new(entries(3), SelectionPolicy::Reset);
        assert_eq!(filter.select_digit('3'), Some(2));
        assert_eq!(filter.select_digit('4'), None);
        assert_eq!(filter.select_digit('0'), None);
        assert_eq!(filter.selected(), Some(2));
    }

    proptest! {
        #[test]
        fn same_query_twice_is_idempotent(
            n in 0u32..30,
            query in "[a-z0-9 ]{0,6}",
            moves in -5isize..5,
            sticky in any::<bool>(),
        ) {
            let policy = if sticky { SelectionPolicy::Sticky } else { SelectionPolicy::Reset };
            let mut filter = FilterController::new(entries(n), policy);
            filter.set_query(&query);
            filter.move_selection(moves);
            let before: Vec<usize> = filter.filtered_indices().to_vec();
            let selected = filter.selected();
            filter.set_query(&query);
            prop_assert_eq!(filter.filtered_indices(), before.as_slice());
            prop_assert_eq!(filter.selected(), selected);
        }

        #[test]
        fn selection_stays_in_range(
            n in 0u32..30,
            queries in prop::collection::vec("[a-z0-9 ]{0,4}", 1..8),
            start in 0usize..40,
            sticky in any::<bool>(),
        ) {
            let policy = if sticky { SelectionPolicy::Sticky } else { SelectionPolicy::Reset };
            let mut filter = FilterController::new(entries(n), policy);
            filter.select(start);
            for query in queries {
                filter.set_query(&query);
                let len = filter.filtered_len();
                match filter.selected() {
                    Some(idx) => prop_assert!(idx < len),
                    None => prop_assert_eq!(len, 0),
                }
            }
        }
    }
}
