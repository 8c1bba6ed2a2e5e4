// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Russian plural form selection for unit labels.
//!
//! Labels agree with the count of base units, not the raw count the
//! customer typed: "2 кеги Гауса" is 60 liters and renders as "60 л.".

use brewline_core::types::UnitKind;

/// Grammatical category a count selects in Russian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralCategory {
    /// 1, 21, 31, ... (but not 11)
    One,
    /// 2-4, 22-24, ... (but not 12-14)
    Few,
    /// 0, 5-20, 25-30, ...
    Many,
}

/// Selects the Russian plural category for a count.
pub fn russian_plural(count: u64) -> PluralCategory {
    let tail = count % 100;
    if (11..=14).contains(&tail) {
        return PluralCategory::Many;
    }
    match count % 10 {
        1 => PluralCategory::One,
        2..=4 => PluralCategory::Few,
        _ => PluralCategory::Many,
    }
}

/// Returns the unit label agreeing with `quantity` base units.
///
/// Liters carry the invariant abbreviation; container- and piece-kind
/// units decline. Fractional quantities select on the integer part.
pub fn unit_label(kind: UnitKind, quantity: f64) -> String {
    let count = quantity.trunc().max(0.0) as u64;
    let label = match kind {
        UnitKind::VolumeLiters => "л.",
        UnitKind::ThermoContainer => match russian_plural(count) {
            PluralCategory::One => "термокега",
            PluralCategory::Few => "термокеги",
            PluralCategory::Many => "термокег",
        },
        UnitKind::Piece => match russian_plural(count) {
            PluralCategory::One => "штука",
            PluralCategory::Few => "штуки",
            PluralCategory::Many => "штук",
        },
    };
    label.to_string()
}
