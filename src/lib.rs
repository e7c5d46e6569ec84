// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Modalist: stacked modal pickers for terminal apps.
//!
//! The [`list`] module holds the grouped, virtualized, mouse-aware list machinery; [`dialog`]
//! builds the concrete pickers and the dialog stack on top of it; [`tui`] hosts them in a
//! real terminal.

pub mod config;
pub mod dialog;
pub mod event;
pub mod list;
pub mod message;
pub mod store;
pub mod text;
pub mod tui;
pub mod validation;
