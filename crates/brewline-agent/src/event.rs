// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The tagged event model and control payload codec.
//!
//! Every inbound channel update is classified into exactly one [`Event`]
//! and routed through a single dispatcher match. Control payloads are the
//! strings bound to inline buttons; the admin-confirm payload carries the
//! order id end-to-end so the coordinator never has to re-derive "the
//! latest pending order".

use brewline_core::types::{ChannelUpdate, ChatRef, PromptRef, Sender};

/// One dispatched unit of work.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// `/start` command: greeting / registration entry.
    StartCommand {
        sender: Sender,
        chat: ChatRef,
    },
    /// Free-form text from a user.
    UserMessage {
        sender: Sender,
        chat: ChatRef,
        text: String,
    },
    /// Customer pressed the order confirmation control.
    UserConfirm {
        sender: Sender,
        chat: ChatRef,
        prompt: PromptRef,
        control_id: String,
    },
    /// Admin approved a registration request.
    AdminApprove {
        sender: Sender,
        chat: ChatRef,
        prompt: PromptRef,
        control_id: String,
        user_id: i64,
    },
    /// Admin rejected a registration request.
    AdminReject {
        sender: Sender,
        chat: ChatRef,
        prompt: PromptRef,
        control_id: String,
        user_id: i64,
    },
    /// Admin confirmed a customer's pending order.
    AdminConfirmOrder {
        sender: Sender,
        chat: ChatRef,
        prompt: PromptRef,
        control_id: String,
        user_id: i64,
        order_id: i64,
    },
}

/// Payload bound to the customer's confirm button.
pub fn confirm_order_payload() -> String {
    "confirm_order".to_string()
}

/// Payload bound to the admin's registration-approve button.
pub fn approve_user_payload(user_id: i64) -> String {
    format!("approve_user:{user_id}")
}

/// Payload bound to the admin's registration-reject button.
pub fn reject_user_payload(user_id: i64) -> String {
    format!("reject_user:{user_id}")
}

/// Payload bound to the admin's order-confirm button.
pub fn admin_confirm_payload(user_id: i64, order_id: i64) -> String {
    format!("admin_confirm:{user_id}:{order_id}")
}

/// Classifies a channel update into an event.
///
/// Returns `None` for control payloads this bot never produced; the
/// dispatcher acknowledges and drops those.
pub fn classify(update: ChannelUpdate) -> Option<Event> {
    match update {
        ChannelUpdate::Message { sender, chat, text } => {
            if text.trim() == "/start" {
                Some(Event::StartCommand { sender, chat })
            } else {
                Some(Event::UserMessage { sender, chat, text })
            }
        }
        ChannelUpdate::Control {
            sender,
            chat,
            prompt,
            control_id,
            payload,
        } => classify_control(sender, chat, prompt, control_id, &payload),
    }
}

fn classify_control(
    sender: Sender,
    chat: ChatRef,
    prompt: PromptRef,
    control_id: String,
    payload: &str,
) -> Option<Event> {
    if payload == "confirm_order" {
        return Some(Event::UserConfirm {
            sender,
            chat,
            prompt,
            control_id,
        });
    }

    if let Some(rest) = payload.strip_prefix("approve_user:") {
        let user_id = rest.parse().ok()?;
        return Some(Event::AdminApprove {
            sender,
            chat,
            prompt,
            control_id,
            user_id,
        });
    }

    if let Some(rest) = payload.strip_prefix("reject_user:") {
        let user_id = rest.parse().ok()?;
        return Some(Event::AdminReject {
            sender,
            chat,
            prompt,
            control_id,
            user_id,
        });
    }

    if let Some(rest) = payload.strip_prefix("admin_confirm:") {
        let (user_part, order_part) = rest.split_once(':')?;
        return Some(Event::AdminConfirmOrder {
            sender,
            chat,
            prompt,
            control_id,
            user_id: user_part.parse().ok()?,
            order_id: order_part.parse().ok()?,
        });
    }

    None
}
