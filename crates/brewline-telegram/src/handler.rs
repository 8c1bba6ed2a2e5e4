// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update filtering and conversion into channel-agnostic updates.
//!
//! Determines whether an incoming Telegram update should be processed
//! (private text messages and control presses only) and extracts it into a
//! [`ChannelUpdate`]. Authorization is NOT decided here: registration means
//! unknown users must reach the dispatcher.

use teloxide::prelude::*;
use teloxide::types::ChatKind;

use brewline_core::types::{ChannelUpdate, ChatRef, PromptRef, Sender};

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

fn to_sender(user: &teloxide::types::User) -> Sender {
    Sender {
        user_id: user.id.0 as i64,
        username: user.username.clone(),
        first_name: Some(user.first_name.clone()),
    }
}

/// Converts a private text message into a [`ChannelUpdate::Message`].
///
/// Returns `None` for non-text messages (stickers, photos, locations) and
/// messages without a sender (channel posts).
pub fn to_message_update(msg: &Message) -> Option<ChannelUpdate> {
    let sender = to_sender(msg.from.as_ref()?);
    let text = msg.text()?.to_string();
    Some(ChannelUpdate::Message {
        sender,
        chat: ChatRef(msg.chat.id.0),
        text,
    })
}

/// Converts a callback query into a [`ChannelUpdate::Control`].
///
/// Returns `None` when the bound message is no longer accessible or the
/// query carries no payload; there is nothing meaningful to dispatch then.
pub fn to_control_update(query: &CallbackQuery) -> Option<ChannelUpdate> {
    let message = query.message.as_ref()?;
    let payload = query.data.clone()?;
    Some(ChannelUpdate::Control {
        sender: to_sender(&query.from),
        chat: ChatRef(message.chat().id.0),
        prompt: PromptRef(message.id().0.to_string()),
        control_id: query.id.0.clone(),
        payload,
    })
}
