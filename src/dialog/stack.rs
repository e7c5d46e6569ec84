// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The stack of open dialogs. Input reaches only the topmost entry; resizes and palette
//! changes reach all of them.

use std::collections::VecDeque;

use tracing::{debug, trace};

use super::{Dialog, TextBlock};
use crate::event::Event;
use crate::list::Origin;
use crate::message::{self, Signal, Signals};

/// One dialog's render, placed in screen coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub block: TextBlock,
    pub origin: Origin,
    /// Outer size including border.
    pub size: (u16, u16),
}

#[derive(Debug, Default)]
pub struct DialogStack {
    dialogs: Vec<Box<dyn Dialog>>,
    screen: (u16, u16),
}

impl DialogStack {
    pub fn new(width: u16, height: u16) -> Self {
        Self { dialogs: Vec::new(), screen: (width, height) }
    }

    pub fn depth(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }

    pub fn screen(&self) -> (u16, u16) {
        self.screen
    }

    pub fn top(&self) -> Option<&dyn Dialog> {
        self.dialogs.last().map(|d| d.as_ref())
    }

    /// Pushes `dialog`, sizes it to the current screen, then runs its `init`. Returns what
    /// `init` emitted.
    pub fn open(&mut self, mut dialog: Box<dyn Dialog>) -> Signals {
        let (width, height) = self.screen;
        let mut out = dialog.handle_event(&Event::Resize { width, height });
        out.extend(dialog.init());
        self.dialogs.push(dialog);
        debug!(depth = self.dialogs.len(), "dialog opened");
        out
    }

    pub fn close(&mut self) {
        if self.dialogs.pop().is_some() {
            debug!(depth = self.dialogs.len(), "dialog closed");
        }
    }

    pub fn close_all(&mut self) {
        if !self.dialogs.is_empty() {
            debug!(closed = self.dialogs.len(), "all dialogs closed");
            self.dialogs.clear();
        }
    }

    /// `None` when the stack is empty and the event belongs to the host.
    pub fn handle_event(&mut self, event: &Event) -> Option<Signals> {
        if let Event::Resize { width, height } = *event {
            self.screen = (width, height);
            debug!(width, height, depth = self.dialogs.len(), "broadcasting resize");
        }
        if event.is_broadcast() {
            let mut out = message::none();
            for dialog in &mut self.dialogs {
                out.extend(dialog.handle_event(event));
            }
            return (!self.dialogs.is_empty()).then_some(out);
        }
        let top = self.dialogs.last_mut()?;
        trace!(?event, "routing to top dialog");
        Some(top.handle_event(event))
    }

    /// Applies `OpenDialog`, `CloseDialog`, or `CloseAllDialogs`. Returns what still needs
    /// handling: a newly opened dialog's `init` output, or the signal itself when it is not
    /// a stack operation.
    pub fn handle_signal(&mut self, signal: Signal) -> Signals {
        match signal {
            Signal::OpenDialog(dialog) => self.open(dialog),
            Signal::CloseDialog => {
                self.close();
                message::none()
            }
            Signal::CloseAllDialogs => {
                self.close_all();
                message::none()
            }
            other => Signals::from_iter([other]),
        }
    }

    /// Applies every stack operation in order, including ones a newly opened dialog emits
    /// from `init`, and returns the rest in emission order.
    pub fn apply(&mut self, signals: impl IntoIterator<Item = Signal>) -> Vec<Signal> {
        let mut queue: VecDeque<Signal> = signals.into_iter().collect();
        let mut rest = Vec::new();
        while let Some(signal) = queue.pop_front() {
            if !matches!(signal, Signal::OpenDialog(_) | Signal::CloseDialog | Signal::CloseAllDialogs) {
                rest.push(signal);
                continue;
            }
            for (i, emitted) in self.handle_signal(signal).into_iter().enumerate() {
                queue.insert(i, emitted);
            }
        }
        rest
    }

    /// Back to front; later layers paint over earlier ones.
    pub fn layers(&self) -> Vec<Layer> {
        self.dialogs
            .iter()
            .map(|dialog| Layer { block: dialog.view(), origin: dialog.position(), size: dialog.size() })
            .collect()
    }
}
