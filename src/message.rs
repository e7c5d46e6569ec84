// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Signals emitted by dialogs towards the stack and the host.

use std::path::PathBuf;

use smallvec::SmallVec;

use crate::dialog::Dialog;

/// Most handlers emit nothing or a close/result pair.
pub type Signals = SmallVec<[Signal; 2]>;

#[derive(Debug)]
pub enum Signal {
    OpenDialog(Box<dyn Dialog>),
    CloseDialog,
    CloseAllDialogs,
    Result(DialogResult),
    Deferred(DeferredAction),
    /// Short status text for the host to flash.
    Notify(String),
}

impl Signal {
    pub fn as_result(&self) -> Option<&DialogResult> {
        match self {
            Self::Result(result) => Some(result),
            _ => None,
        }
    }
}

/// Plain-data outcome of a dialog. The host routes these; dialogs never act on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult {
    /// Empty reference resets to the default model.
    ModelChange { reference: String },
    ThemePreview { reference: String },
    ThemeCancelPreview { original: String },
    ThemeChange { reference: String },
    CommandExecute { id: String },
    LoadSession { id: String },
    ToggleSessionStar { id: String },
    InsertFileRef { path: PathBuf },
    SpawnSession { dir: PathBuf },
    Choice { id: String },
    /// Free text typed into the multi-choice "other" row.
    ChoiceCustom { text: String },
    ChoiceSkipped,
    ChoiceCancelled,
    /// Trimmed `(name, value)` pairs in field order; blank optional fields are left out.
    FormSubmit { values: Vec<(String, String)> },
    FormCancelled,
}

/// Side effects the host runs outside the event handler. Results, if any, come back as
/// ordinary events; closing the issuing dialog does not retract them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredAction {
    CopyToClipboard(String),
    OpenUrl(String),
}

pub fn none() -> Signals {
    Signals::new()
}

/// `CloseDialog` followed by the result, in that order.
pub fn close_with(result: DialogResult) -> Signals {
    let mut out = Signals::new();
    out.push(Signal::CloseDialog);
    out.push(Signal::Result(result));
    out
}

pub fn close() -> Signals {
    let mut out = Signals::new();
    out.push(Signal::CloseDialog);
    out
}

pub fn result(result: DialogResult) -> Signals {
    let mut out = Signals::new();
    out.push(Signal::Result(result));
    out
}

/// Results carried by `signals`, in order. Handy for hosts and tests.
pub fn results(signals: &[Signal]) -> Vec<DialogResult> {
    signals.iter().filter_map(Signal::as_result).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::{close_with, results, DialogResult, Signal};

    #[test]
    fn close_precedes_result() {
        let signals = close_with(DialogResult::ChoiceSkipped);
        assert!(matches!(signals[0], Signal::CloseDialog));
        assert_eq!(results(&signals), vec![DialogResult::ChoiceSkipped]);
        assert!(!signals.spilled());
    }
}
