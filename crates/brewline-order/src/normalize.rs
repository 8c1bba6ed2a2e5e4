// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quantity and pricing normalization.
//!
//! Turns a draft's raw `good_id -> count` map into billable line items:
//! quantity in base units (`raw_count * min_size`), payment-mode-selected
//! unit price, and a total over resolved lines. A pair that cannot be
//! priced degrades to an unresolved line instead of disappearing; the
//! human reviewer must always see it.

use brewline_core::types::{
    DraftEntry, LineItem, NormalizedEntry, PaymentMode, Product, UnresolvedReason,
};

use crate::plural::unit_label;

/// Normalizes one draft entry against the product assortment.
pub fn normalize_entry(entry: &DraftEntry, products: &[Product]) -> NormalizedEntry {
    let payment_mode = entry.payment_mode.unwrap_or(PaymentMode::Cashless);

    let mut items = Vec::with_capacity(entry.goods.len());
    let mut total_cost = 0.0;

    for (raw_id, &raw_count) in &entry.goods {
        let item = resolve_line(raw_id, raw_count, payment_mode, products);
        if let LineItem::Resolved { line_cost, .. } = item {
            total_cost += line_cost;
        }
        items.push(item);
    }

    NormalizedEntry {
        entry: entry.clone(),
        items,
        payment_mode,
        total_cost,
    }
}

/// Normalizes every entry of a draft.
pub fn normalize_draft(entries: &[DraftEntry], products: &[Product]) -> Vec<NormalizedEntry> {
    entries
        .iter()
        .map(|entry| normalize_entry(entry, products))
        .collect()
}

fn resolve_line(
    raw_id: &str,
    raw_count: f64,
    payment_mode: PaymentMode,
    products: &[Product],
) -> LineItem {
    let unresolved = |reason| LineItem::Unresolved {
        raw_id: raw_id.to_string(),
        raw_count,
        reason,
    };

    let Ok(good_id) = raw_id.trim().parse::<i64>() else {
        return unresolved(UnresolvedReason::BadId);
    };

    if !raw_count.is_finite() || raw_count <= 0.0 {
        return unresolved(UnresolvedReason::BadCount);
    }

    let Some(product) = products.iter().find(|p| p.good_id == good_id) else {
        return unresolved(UnresolvedReason::UnknownProduct);
    };

    let quantity = raw_count * product.min_size;
    let unit_price = match payment_mode {
        PaymentMode::Cash => product.price_cash,
        PaymentMode::Cashless => product.price_cashless,
    };

    LineItem::Resolved {
        good_id,
        name: product.name.clone(),
        quantity,
        unit_label: unit_label(product.unit_kind, quantity),
        unit_price,
        line_cost: unit_price * quantity,
    }
}
