// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Draft rendering for the customer and the admin.
//!
//! Pure functions over normalized entries; rendering the same draft twice
//! produces identical text.

use std::fmt::Write as _;

use brewline_core::types::{LineItem, NormalizedEntry, PaymentMode, Sender};

/// Shown when the parser yielded nothing at all.
pub const EMPTY_DRAFT_TEXT: &str = "❌ Не удалось обработать заказ. Попробуйте еще раз.";

/// Shown instead of a goods section when nothing resolved to an order line.
pub const NO_GOODS_LINE: &str = "  • Товары не распознаны. Напишите ваш заказ заново";

/// Renders a normalized draft for the ordering customer.
///
/// A single note-only entry renders the note verbatim with no order
/// framing: that is the "could not parse" case and the note already is the
/// whole message.
pub fn render_customer(entries: &[NormalizedEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_DRAFT_TEXT.to_string();
    }

    if entries.len() == 1 && entries[0].entry.is_note_only() {
        return entries[0].entry.note.clone().unwrap_or_default();
    }

    let mut out = String::from("📦 ВАШ ЗАКАЗ:\n");

    for (i, normalized) in entries.iter().enumerate() {
        let entry = &normalized.entry;
        let _ = write!(
            out,
            "\nЗаказ #{n}:\nОрганизация {org}:\n📅 Дата доставки: {date}\n🏠 Адрес: {addr}\n🛒 Товары:\n",
            n = i + 1,
            org = entry.company_name.as_deref().unwrap_or("не распознано"),
            date = entry.delivery_date.as_deref().unwrap_or("Не указана"),
            addr = entry.address.as_deref().unwrap_or("Не указан"),
        );

        if normalized.items.is_empty() {
            out.push_str(NO_GOODS_LINE);
            out.push('\n');
        } else {
            for item in &normalized.items {
                match item {
                    LineItem::Resolved {
                        name,
                        quantity,
                        unit_label,
                        ..
                    } => {
                        let _ = writeln!(
                            out,
                            "  • {name}: {} {unit_label}",
                            fmt_quantity(*quantity)
                        );
                    }
                    LineItem::Unresolved {
                        raw_id, raw_count, ..
                    } => {
                        let _ = writeln!(
                            out,
                            "  • Товар ID {raw_id}: {}",
                            fmt_quantity(*raw_count)
                        );
                    }
                }
            }
        }

        if normalized.total_cost > 0.0 {
            let _ = writeln!(
                out,
                "\n💰 Сумма заказа: {:.2} руб. ({})",
                normalized.total_cost,
                payment_label(normalized.payment_mode)
            );
        }
    }

    out
}

/// Renders a normalized draft for admins, prefixed with the requester's
/// identity and stored organization.
pub fn render_admin(requester: &Sender, organization: &str, entries: &[NormalizedEntry]) -> String {
    let mut out = String::from("📦 НОВЫЙ ЗАКАЗ\n\n");
    let _ = writeln!(
        out,
        "👤 Клиент: @{} (ID: {})",
        requester
            .username
            .as_deref()
            .unwrap_or_else(|| requester.first_name.as_deref().unwrap_or("Неизвестно")),
        requester.user_id
    );
    let _ = writeln!(out, "🏢 Организация: {organization}");
    out.push('\n');
    out.push_str(&render_customer(entries));
    out
}

/// Payment mode label as shown under order totals.
pub fn payment_label(mode: PaymentMode) -> &'static str {
    match mode {
        PaymentMode::Cash => "наличный расчет",
        PaymentMode::Cashless => "безналичный расчет",
    }
}

/// Formats a quantity without a spurious fractional part.
pub fn fmt_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{}", quantity as i64)
    } else {
        format!("{quantity}")
    }
}
