// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt construction for the order parser.
//!
//! The prompt embeds the current assortment as JSON together with the
//! unit-conversion and declension rules the extraction must follow.

use brewline_core::BrewlineError;
use brewline_core::types::Product;

/// Builds the system prompt for a parse call.
pub fn build_system_prompt(products: &[Product]) -> Result<String, BrewlineError> {
    let assortment_json =
        serde_json::to_string(products).map_err(|e| BrewlineError::Internal(format!(
            "failed to serialize assortment: {e}"
        )))?;

    Ok(format!(
        r#"1. Товары (Ассортимент) в формате JSON:
{assortment_json}
End

Твоя задача: прочитать сообщение от клиента и выявить что он хотел заказать. Определить good_id по названию товара (name) и кол-во. Выявить дату доставки и адреса заказов.
Вернуть ответ строго в JSON:
[
{{"delivery_date":"(дата доставки)","address":"(наименование адреса)","goods":{{"(good_id из ассортимента)":(кол-во товара), ...}},"payment_type":"(cash или cashless)","company_name":"(название компании из сообщения, если явно указано, иначе null)"}}
, ...]
Если адресов больше одного, вернуть столько же объектов в списке.
Без переносов строки, без посторонних символов.
Адрес может быть одним словом, с цифрой или дробью "\" или "/" или любым знаком.
    Пример: [наименование адреса] 69/1, [наименование адреса] 12\1, [наименование адреса] 4 или [наименование адреса]

Примечание: цены указаны в рублях. "Нал" - оплата наличными (cash), "Безнал" - безналичный расчет (cashless). min_size - минимальный объем заказа в литрах или минимальное количество штук.
 1 кега - 30 литров. Заказ всегда нужно переводить в ЛИТРЫ (л.): если клиент написал "Гаус 1 кега" или "Гаус 1", это Гаус 30.
 1 термокега - 20 или 25 литров. Если явно не указано, что клиент хочет термокегу, считать что он хочет обычную кегу. Если объем термокеги не указан, считать 25 литров.

Заказ может быть в литрах, кегах, термокегах или штуках - поле unit_kind из ассортимента.
    Минимальный заказ определяется полем min_size.
        Литры / кеги: можно заказать 60 л, 90 л, 120 л и т.д. (кратно min_size).
        Термокеги: можно заказать 20/25 л, 40/50 л и т.д. (кратно min_size). Склонения: 1 термокега, 2 термокеги, 5 термокег.
        Штуки: можно заказать 1, 2, 3 и т.д. (кратно min_size). Склонения: 1 штука, 2 штуки, 5 штук.

Если заказ распознать не удалось, вернуть [{{"note":"(краткое пояснение для клиента)"}}].
"#
    ))
}

/// Builds the user turn: today's date, optional prior messages, the message.
pub fn build_user_content(text: &str, prior_messages: &[String], today: &str) -> String {
    let mut content = format!("Сегодняшняя дата: {today}\n");
    if !prior_messages.is_empty() {
        content.push_str("Предыдущие сообщения: ");
        content.push_str(&prior_messages.join(" | "));
        content.push('\n');
    }
    content.push_str("Сообщение: ");
    content.push_str(text);
    content
}
