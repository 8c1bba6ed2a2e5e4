// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound
//! updates and captured outbound traffic (sends, edits, deletes, control
//! answers) for assertion in tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use brewline_core::BrewlineError;
use brewline_core::traits::{ChannelAdapter, PluginAdapter};
use brewline_core::types::{
    AdapterType, ChannelUpdate, ChatRef, ControlSet, HealthStatus, OutboundMessage, PromptRef,
};

/// One captured `send` call with the handle it returned.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub message: OutboundMessage,
    pub prompt: PromptRef,
}

/// One captured `edit` call.
#[derive(Debug, Clone)]
pub struct EditedMessage {
    pub chat: ChatRef,
    pub prompt: PromptRef,
    pub text: String,
    pub controls: Option<ControlSet>,
}

/// One captured `answer_control` call.
#[derive(Debug, Clone)]
pub struct ControlAnswer {
    pub control_id: String,
    pub text: String,
    pub alert: bool,
}

/// A mock messaging channel for testing.
///
/// Inbound updates injected via `inject` are returned by `receive()`;
/// all outbound traffic is captured for assertions. Individual chats can
/// be made unreachable to exercise partial fan-out failure.
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<ChannelUpdate>>>,
    notify: Arc<Notify>,
    sent: Arc<Mutex<Vec<SentMessage>>>,
    edited: Arc<Mutex<Vec<EditedMessage>>>,
    deleted: Arc<Mutex<Vec<(ChatRef, PromptRef)>>>,
    answers: Arc<Mutex<Vec<ControlAnswer>>>,
    unreachable: Arc<Mutex<HashSet<i64>>>,
    next_prompt: AtomicU64,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            notify: Arc::new(Notify::new()),
            sent: Arc::new(Mutex::new(Vec::new())),
            edited: Arc::new(Mutex::new(Vec::new())),
            deleted: Arc::new(Mutex::new(Vec::new())),
            answers: Arc::new(Mutex::new(Vec::new())),
            unreachable: Arc::new(Mutex::new(HashSet::new())),
            next_prompt: AtomicU64::new(1),
        }
    }

    /// Inject an inbound update into the receive queue.
    pub async fn inject(&self, update: ChannelUpdate) {
        self.inbound.lock().await.push_back(update);
        self.notify.notify_one();
    }

    /// Make sends to a chat fail (edit/delete keep working).
    pub async fn make_unreachable(&self, chat: ChatRef) {
        self.unreachable.lock().await.insert(chat.0);
    }

    /// All captured sends.
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Captured sends addressed to one chat.
    pub async fn sent_to(&self, chat: ChatRef) -> Vec<SentMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|s| s.message.chat == chat)
            .cloned()
            .collect()
    }

    /// All captured edits.
    pub async fn edited(&self) -> Vec<EditedMessage> {
        self.edited.lock().await.clone()
    }

    /// All captured deletes.
    pub async fn deleted(&self) -> Vec<(ChatRef, PromptRef)> {
        self.deleted.lock().await.clone()
    }

    /// All captured control answers.
    pub async fn answers(&self) -> Vec<ControlAnswer> {
        self.answers.lock().await.clone()
    }

    /// Clear captured outbound traffic.
    pub async fn clear(&self) {
        self.sent.lock().await.clear();
        self.edited.lock().await.clear();
        self.deleted.lock().await.clear();
        self.answers.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, BrewlineError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BrewlineError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), BrewlineError> {
        Ok(())
    }

    async fn receive(&self) -> Result<ChannelUpdate, BrewlineError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(update) = queue.pop_front() {
                    return Ok(update);
                }
            }
            self.notify.notified().await;
        }
    }

    async fn send(&self, msg: OutboundMessage) -> Result<PromptRef, BrewlineError> {
        if self.unreachable.lock().await.contains(&msg.chat.0) {
            return Err(BrewlineError::Channel {
                message: format!("chat {} unreachable", msg.chat.0),
                source: None,
            });
        }
        let prompt = PromptRef(self.next_prompt.fetch_add(1, Ordering::SeqCst).to_string());
        self.sent.lock().await.push(SentMessage {
            message: msg,
            prompt: prompt.clone(),
        });
        Ok(prompt)
    }

    async fn edit(
        &self,
        chat: ChatRef,
        prompt: &PromptRef,
        text: &str,
        controls: Option<ControlSet>,
    ) -> Result<(), BrewlineError> {
        self.edited.lock().await.push(EditedMessage {
            chat,
            prompt: prompt.clone(),
            text: text.to_string(),
            controls,
        });
        Ok(())
    }

    async fn delete(&self, chat: ChatRef, prompt: &PromptRef) -> Result<(), BrewlineError> {
        self.deleted.lock().await.push((chat, prompt.clone()));
        Ok(())
    }

    async fn answer_control(
        &self,
        control_id: &str,
        text: &str,
        alert: bool,
    ) -> Result<(), BrewlineError> {
        self.answers.lock().await.push(ControlAnswer {
            control_id: control_id.to_string(),
            text: text.to_string(),
            alert,
        });
        Ok(())
    }
}
