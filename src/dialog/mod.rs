// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Modal dialogs and the stack that owns them.
//!
//! Every dialog implements [`Dialog`]; the [`DialogStack`] only ever talks to that trait.
//! Concrete pickers are built from the shared list machinery in [`crate::list`] plus the
//! sizing and content helpers in [`chrome`].

use std::fmt;

use crate::event::Event;
use crate::list::Origin;
use crate::message::{self, Signals};

pub mod chrome;
pub mod command_palette;
pub mod file_picker;
pub mod form;
pub mod model_picker;
pub mod multi_choice;
pub mod picker;
pub mod session_browser;
pub mod stack;
pub mod theme_picker;
pub mod working_dir_picker;

pub use command_palette::{Command, CommandPalette};
pub use file_picker::FilePicker;
pub use form::{FormDialog, FormField};
pub use model_picker::{ModelChoice, ModelPicker, ModelSource};
pub use multi_choice::{ChoiceOption, MultiChoice};
pub use session_browser::{SessionBrowser, SessionSummary, StarFilter};
pub use stack::{DialogStack, Layer};
pub use theme_picker::{ThemeChoice, ThemePicker};
pub use working_dir_picker::{WorkingDirPicker, WorkingDirSection};

/// Inner content of a dialog: fixed-width lines plus the row to draw as selected.
///
/// Borders and colors are left to the host; `lines` never include them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBlock {
    pub width: u16,
    pub lines: Vec<String>,
    pub highlight: Option<usize>,
}

impl TextBlock {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// A modal surface on the stack.
pub trait Dialog: fmt::Debug {
    /// Runs right after the dialog is pushed and sized.
    fn init(&mut self) -> Signals {
        message::none()
    }

    fn handle_event(&mut self, event: &Event) -> Signals;

    fn view(&self) -> TextBlock;

    /// Last screen size the dialog was told about.
    fn screen_size(&self) -> (u16, u16);

    /// Outer `(width, height)` including border and padding.
    fn size(&self) -> (u16, u16);

    /// Top-left corner of the outer box.
    fn position(&self) -> Origin;
}
