// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quantity/pricing normalization and draft rendering.
//!
//! Pure functions only: the dispatcher fetches the assortment from the
//! catalog cache and threads it through; nothing here performs I/O.

pub mod format;
pub mod normalize;
pub mod plural;

pub use format::{payment_label, render_admin, render_customer};
pub use normalize::{normalize_draft, normalize_entry};
pub use plural::{russian_plural, unit_label};
