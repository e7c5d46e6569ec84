// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! List machinery shared by every picker: grouping, scrolling, hit-testing, filtering.

pub mod filter;
pub mod grouped;
pub mod region;

pub use filter::{digit_index, FilterController, Pickable, SelectionPolicy};
pub use grouped::{GroupLayout, GroupedLines, LineTarget, RenderedLine};
pub use hit_test::{classify, resolve, ClickOutcome, ClickTracker, HitTarget, ListGeometry, Origin};
pub use region::ListRegion;
