// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory per-user conversation sessions.
//!
//! Sessions hold the order-flow state, the one authoritative active draft,
//! and a version counter. The counter makes draft installation a
//! compare-and-set: a parse started for an older message cannot overwrite
//! the draft produced by a newer one. Nothing here survives a restart;
//! durability begins at the persisted order.

use std::collections::HashMap;

use tokio::sync::Mutex;

use brewline_core::types::{DraftEntry, PromptRef};

/// Registration sub-flow within a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistrationFlow {
    /// No registration exchange in progress.
    #[default]
    None,
    /// `/start` was answered with the greeting; the next message is the
    /// organization name.
    AwaitingOrganization,
}

/// Order-flow state of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderState {
    #[default]
    Idle,
    AwaitingConfirmation,
}

/// Per-user conversation state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub registration: RegistrationFlow,
    pub order: OrderState,
    pub active_draft: Option<Vec<DraftEntry>>,
    pub prompt: Option<PromptRef>,
    pub raw_text: Option<String>,
    /// Bumped when a new message starts a parse; installs must match.
    pub version: u64,
}

/// What `begin_parse` observed when the message arrived.
#[derive(Debug, Clone)]
pub struct ParseTicket {
    /// The version a successful install must still match.
    pub version: u64,
    /// Prompt of the draft being superseded, if any.
    pub previous_prompt: Option<PromptRef>,
    /// Whether this message corrects an unconfirmed draft.
    pub correcting: bool,
}

/// Thread-safe store of all sessions, keyed by user id.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<i64, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a user's session (default when none exists yet).
    pub async fn snapshot(&self, user_id: i64) -> Session {
        self.sessions
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Enters or leaves the awaiting-organization registration step.
    pub async fn set_registration(&self, user_id: i64, flow: RegistrationFlow) {
        let mut sessions = self.sessions.lock().await;
        sessions.entry(user_id).or_default().registration = flow;
    }

    /// Resets the order flow to idle, dropping any draft and prompt.
    pub async fn reset_order_flow(&self, user_id: i64) {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(user_id).or_default();
        session.order = OrderState::Idle;
        session.active_draft = None;
        session.prompt = None;
        session.raw_text = None;
    }

    /// Marks the start of a parse for a new message.
    ///
    /// Bumps the version so that any in-flight parse for an earlier message
    /// becomes stale, and hands back what the caller needs to supersede the
    /// previous prompt.
    pub async fn begin_parse(&self, user_id: i64) -> ParseTicket {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(user_id).or_default();
        session.version += 1;
        ParseTicket {
            version: session.version,
            previous_prompt: session.prompt.take(),
            correcting: session.order == OrderState::AwaitingConfirmation,
        }
    }

    /// Installs a parsed draft if the ticket is still current.
    ///
    /// Returns `false` (and changes nothing) when a newer message has
    /// started a parse since the ticket was issued.
    pub async fn install_draft(
        &self,
        user_id: i64,
        ticket: &ParseTicket,
        draft: Vec<DraftEntry>,
        prompt: PromptRef,
        raw_text: &str,
    ) -> bool {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(user_id).or_default();
        if session.version != ticket.version {
            return false;
        }
        session.order = OrderState::AwaitingConfirmation;
        session.active_draft = Some(draft);
        session.prompt = Some(prompt);
        session.raw_text = Some(raw_text.to_string());
        true
    }

    /// Takes the active draft for confirmation, returning the session to idle.
    ///
    /// Returns `None` when there is nothing awaiting confirmation.
    pub async fn take_draft(&self, user_id: i64) -> Option<Vec<DraftEntry>> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(&user_id)?;
        if session.order != OrderState::AwaitingConfirmation {
            return None;
        }
        let draft = session.active_draft.take()?;
        session.order = OrderState::Idle;
        session.prompt = None;
        session.raw_text = None;
        Some(draft)
    }

    /// Puts a draft back after a failed confirmation, so the customer can
    /// press confirm again.
    pub async fn restore_draft(&self, user_id: i64, draft: Vec<DraftEntry>, prompt: PromptRef) {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(user_id).or_default();
        session.order = OrderState::AwaitingConfirmation;
        session.active_draft = Some(draft);
        session.prompt = Some(prompt);
    }
}
