// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing message texts.
//!
//! Russian throughout, matching the customer base; a multi-language UI is
//! out of scope.

pub const NOT_REGISTERED: &str =
    "Вы не зарегистрированы. Отправьте /start, чтобы подать заявку на регистрацию.";

pub const REGISTRATION_GREETING: &str =
    "Здравствуйте! Это бот приема заказов на напитки. Напишите название вашей организации, \
     и мы отправим заявку администратору.";

pub const REGISTRATION_SENT: &str =
    "Спасибо! Ваша заявка отправлена администратору на подтверждение.";

pub const REGISTRATION_PENDING: &str =
    "Ваша регистрация ожидает подтверждения администратора.";

pub const REGISTRATION_REJECTED: &str = "❌ Ваша регистрация отклонена администратором.";

pub const READY_FOR_ORDERS: &str =
    "Регистрация подтверждена! Отправьте текст заказа: товары, количество, адрес и дату доставки.";

pub const PROCESSING_ORDER: &str = "🔄 Обрабатываю ваш заказ...";

pub const PROCESSING_CORRECTION: &str = "🔄 Обрабатываю уточненный заказ...";

pub const CONFIRM_HINT: &str = "\n✅ Если все верно - подтвердите заказ кнопкой ниже.\n❌ Если есть ошибки - отправьте исправленный текст заказа.";

pub const CONFIRM_ORDER_BUTTON: &str = "✅ Подтвердить заказ";

pub const APPROVE_USER_BUTTON: &str = "✅ Подтвердить";

pub const REJECT_USER_BUTTON: &str = "❌ Отклонить";

pub const ORDER_SUPERSEDED: &str = "❌ ЗАКАЗ ОТМЕНЕН (отправлен уточненный заказ)";

pub const ORDER_SENT_TO_MANAGER: &str = "✅ Ваш заказ подтвержден и отправлен менеджеру!";

pub const ORDER_CONFIRMED_BY_ADMIN: &str = "🎉 Ваш заказ подтвержден администратором!";

pub const ADMIN_USER_APPROVED_BANNER: &str = "✅ ПОЛЬЗОВАТЕЛЬ ПОДТВЕРЖДЕН";

pub const ADMIN_USER_REJECTED_BANNER: &str = "❌ ПОЛЬЗОВАТЕЛЬ ОТКЛОНЕН";

pub const ADMIN_ORDER_CONFIRMED_BANNER: &str = "✅ ЗАКАЗ ПОДТВЕРЖДЕН АДМИНОМ";

pub const PARSER_TIMED_OUT_NOTE: &str =
    "Обработка заказа заняла слишком много времени. Пожалуйста, отправьте заказ еще раз.";

pub const RETRY_LATER: &str = "❌ Произошла ошибка при обработке заказа. Попробуйте еще раз.";

pub const ACTION_DENIED: &str = "У вас нет прав для этого действия";

pub const USER_NOT_FOUND: &str = "Пользователь не найден!";

pub const ORDER_NOT_FOUND: &str = "Заказ не найден";

pub const ORDER_ALREADY_HANDLED: &str = "Заказ уже обработан";

pub const DRAFT_NOT_FOUND: &str = "❌ Данные заказа не найдены";

pub const USER_APPROVED_ANSWER: &str = "Пользователь подтвержден!";

pub const USER_REJECTED_ANSWER: &str = "Пользователь отклонен!";

pub const ORDER_CONFIRMED_ANSWER: &str = "Заказ подтвержден!";

pub const ORDER_SENT_ANSWER: &str = "Заказ подтвержден и отправлен менеджеру!";
