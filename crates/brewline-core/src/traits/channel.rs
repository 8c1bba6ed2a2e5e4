// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for the notification/messaging platform.

use async_trait::async_trait;

use crate::error::BrewlineError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChannelUpdate, ChatRef, ControlSet, OutboundMessage, PromptRef};

/// Adapter for the bidirectional messaging channel.
///
/// Send, edit, delete, and control answers are best-effort at call sites:
/// the dispatcher logs failures and keeps going rather than aborting a flow
/// because one recipient was unreachable.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection and starts delivering inbound updates.
    async fn connect(&mut self) -> Result<(), BrewlineError>;

    /// Receives the next inbound update from the channel.
    async fn receive(&self) -> Result<ChannelUpdate, BrewlineError>;

    /// Sends a message, returning a handle usable for later edits.
    async fn send(&self, msg: OutboundMessage) -> Result<PromptRef, BrewlineError>;

    /// Replaces the text (and controls) of a previously sent message.
    async fn edit(
        &self,
        chat: ChatRef,
        prompt: &PromptRef,
        text: &str,
        controls: Option<ControlSet>,
    ) -> Result<(), BrewlineError>;

    /// Deletes a previously sent message.
    async fn delete(&self, chat: ChatRef, prompt: &PromptRef) -> Result<(), BrewlineError>;

    /// Acknowledges a control press back to the channel, optionally as an
    /// alert the user must dismiss.
    async fn answer_control(
        &self,
        control_id: &str,
        text: &str,
        alert: bool,
    ) -> Result<(), BrewlineError>;
}
