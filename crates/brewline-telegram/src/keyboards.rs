// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inline keyboard construction from channel-agnostic control sets.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use brewline_core::types::ControlSet;

/// Builds the Telegram inline keyboard for a control set.
pub fn to_markup(controls: &ControlSet) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(controls.rows.iter().map(|row| {
        row.iter()
            .map(|control| {
                InlineKeyboardButton::callback(control.label.clone(), control.payload.clone())
            })
            .collect::<Vec<_>>()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use brewline_core::types::Control;

    #[test]
    fn markup_preserves_rows_and_payloads() {
        let controls = ControlSet {
            rows: vec![
                vec![
                    Control::new("✅ Подтвердить", "approve_user:42"),
                    Control::new("❌ Отклонить", "reject_user:42"),
                ],
                vec![Control::new("✅ Подтвердить заказ", "confirm_order")],
            ],
        };

        let markup = to_markup(&controls);
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0].len(), 2);
        assert_eq!(markup.inline_keyboard[1].len(), 1);
        assert_eq!(markup.inline_keyboard[0][0].text, "✅ Подтвердить");
    }
}
