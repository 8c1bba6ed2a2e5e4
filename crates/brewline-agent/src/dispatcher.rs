// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversation state machine dispatcher.
//!
//! Every inbound update is classified into one [`Event`] and handled by a
//! single match. Handlers never let an error escape: each failure path
//! still answers the triggering user or admin, so the UI never appears to
//! hang. All collaborators are injected at construction; there are no
//! ambient singletons.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use brewline_catalog::CatalogCache;
use brewline_core::BrewlineError;
use brewline_core::traits::{ChannelAdapter, LedgerAdapter, ParserAdapter, StorageAdapter};
use brewline_core::types::{
    ChannelUpdate, ChatRef, Control, ControlSet, DraftEntry, OutboundMessage, PromptRef, Sender,
    User,
};
use brewline_order::{normalize_draft, render_customer};

use crate::event::{self, Event};
use crate::session::{RegistrationFlow, SessionStore};
use crate::texts;

/// Routes events through the state machine and approval coordinator.
pub struct Dispatcher {
    pub(crate) storage: Arc<dyn StorageAdapter>,
    pub(crate) channel: Arc<dyn ChannelAdapter>,
    pub(crate) parser: Arc<dyn ParserAdapter>,
    pub(crate) ledger: Option<Arc<dyn LedgerAdapter>>,
    pub(crate) catalog: Arc<CatalogCache>,
    pub(crate) sessions: SessionStore,
    pub(crate) admin_ids: Vec<i64>,
    pub(crate) parser_timeout: Duration,
}

impl Dispatcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        channel: Arc<dyn ChannelAdapter>,
        parser: Arc<dyn ParserAdapter>,
        ledger: Option<Arc<dyn LedgerAdapter>>,
        catalog: Arc<CatalogCache>,
        admin_ids: Vec<i64>,
        parser_timeout: Duration,
    ) -> Self {
        Self {
            storage,
            channel,
            parser,
            ledger,
            catalog,
            sessions: SessionStore::new(),
            admin_ids,
            parser_timeout,
        }
    }

    /// Read access to the session store.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handles one inbound update to completion.
    ///
    /// Never returns an error: every failure is logged and answered inline.
    pub async fn dispatch(&self, update: ChannelUpdate) {
        let Some(event) = event::classify(update) else {
            debug!("dropping unclassifiable update");
            return;
        };

        match event {
            Event::StartCommand { sender, chat } => self.handle_start(sender, chat).await,
            Event::UserMessage { sender, chat, text } => {
                self.handle_user_message(sender, chat, text).await
            }
            Event::UserConfirm {
                sender,
                chat,
                prompt,
                control_id,
            } => {
                self.handle_user_confirm(sender, chat, prompt, control_id)
                    .await
            }
            Event::AdminApprove {
                sender,
                chat,
                prompt,
                control_id,
                user_id,
            } => {
                if !self.authorize_admin(&sender, &control_id).await {
                    return;
                }
                self.handle_admin_approval(chat, prompt, control_id, user_id, true)
                    .await
            }
            Event::AdminReject {
                sender,
                chat,
                prompt,
                control_id,
                user_id,
            } => {
                if !self.authorize_admin(&sender, &control_id).await {
                    return;
                }
                self.handle_admin_approval(chat, prompt, control_id, user_id, false)
                    .await
            }
            Event::AdminConfirmOrder {
                sender,
                chat,
                prompt,
                control_id,
                user_id,
                order_id,
            } => {
                if !self.authorize_admin(&sender, &control_id).await {
                    return;
                }
                self.handle_admin_confirm_order(chat, prompt, control_id, user_id, order_id)
                    .await
            }
        }
    }

    /// Rejects admin controls pressed by anyone outside the admin set.
    ///
    /// The denial is answered only to the caller; no state is touched.
    async fn authorize_admin(&self, sender: &Sender, control_id: &str) -> bool {
        if self.admin_ids.contains(&sender.user_id) {
            return true;
        }
        warn!(actor = sender.user_id, "admin control pressed by non-admin");
        self.answer(control_id, texts::ACTION_DENIED, true).await;
        false
    }

    /// `/start`: greeting, registration entry, or order-flow reset.
    async fn handle_start(&self, sender: Sender, chat: ChatRef) {
        let user = match self.storage.get_user(sender.user_id).await {
            Ok(user) => user,
            Err(e) => {
                error!(error = %e, user_id = sender.user_id, "get_user failed");
                self.send_text(chat, texts::RETRY_LATER).await;
                return;
            }
        };

        match user {
            Some(user) if user.approved => {
                self.sessions.reset_order_flow(sender.user_id).await;
                self.send_text(chat, texts::READY_FOR_ORDERS).await;
            }
            Some(_) => {
                self.send_text(chat, texts::REGISTRATION_PENDING).await;
            }
            None => {
                info!(user_id = sender.user_id, "registration started");
                self.sessions
                    .set_registration(sender.user_id, RegistrationFlow::AwaitingOrganization)
                    .await;
                self.send_text(chat, texts::REGISTRATION_GREETING).await;
            }
        }
    }

    /// Free-form text: registration capture, guard, or the order flow.
    async fn handle_user_message(&self, sender: Sender, chat: ChatRef, text: String) {
        let user = match self.storage.get_user(sender.user_id).await {
            Ok(user) => user,
            Err(e) => {
                error!(error = %e, user_id = sender.user_id, "get_user failed");
                self.send_text(chat, texts::RETRY_LATER).await;
                return;
            }
        };

        match user {
            Some(user) if user.approved => {
                self.handle_order_message(sender, chat, text, user).await
            }
            Some(_) => {
                // Pending or rejected: never reaches the parser.
                self.send_text(chat, texts::NOT_REGISTERED).await;
            }
            None => {
                let session = self.sessions.snapshot(sender.user_id).await;
                if session.registration == RegistrationFlow::AwaitingOrganization {
                    self.register_user(sender, chat, text).await;
                } else {
                    // Unknown and not mid-registration: fixed notice, no state change.
                    self.send_text(chat, texts::NOT_REGISTERED).await;
                }
            }
        }
    }

    /// Captures the organization text, persists the pending user, and fans
    /// the approval request out to every admin.
    async fn register_user(&self, sender: Sender, chat: ChatRef, organization: String) {
        let user = User {
            user_id: sender.user_id,
            display_name: sender.display_name(),
            username: sender.username.clone(),
            organization: Some(organization.clone()),
            phone: None,
            approved: false,
            registered_at: chrono::Utc::now().to_rfc3339(),
        };

        if let Err(e) = self.storage.save_user(&user).await {
            error!(error = %e, user_id = sender.user_id, "save_user failed");
            self.send_text(chat, texts::RETRY_LATER).await;
            return;
        }

        self.sessions
            .set_registration(sender.user_id, RegistrationFlow::None)
            .await;

        let request_text = format!(
            "🔔 Новый пользователь хочет зарегистрироваться:\nID: {}\nИмя: {}\nUsername: @{}\nОрганизация: {}",
            sender.user_id,
            sender.first_name.as_deref().unwrap_or("Не указано"),
            sender.username.as_deref().unwrap_or("Не указано"),
            organization,
        );
        let controls = ControlSet::row(vec![
            Control::new(
                texts::APPROVE_USER_BUTTON,
                event::approve_user_payload(sender.user_id),
            ),
            Control::new(
                texts::REJECT_USER_BUTTON,
                event::reject_user_payload(sender.user_id),
            ),
        ]);

        let outcomes = crate::broadcast::broadcast(
            self.channel.as_ref(),
            &self.admin_ids,
            &request_text,
            Some(controls),
        )
        .await;
        info!(
            user_id = sender.user_id,
            delivered = crate::broadcast::delivered_count(&outcomes),
            admins = self.admin_ids.len(),
            "registration request fanned out"
        );

        self.send_text(chat, texts::REGISTRATION_SENT).await;
    }

    /// The order flow: parse, normalize, render, store the draft, prompt
    /// for confirmation. A message while a draft awaits confirmation is a
    /// correction that fully replaces it.
    async fn handle_order_message(&self, sender: Sender, chat: ChatRef, text: String, _user: User) {
        let ticket = self.sessions.begin_parse(sender.user_id).await;

        let processing_text = if ticket.correcting {
            texts::PROCESSING_CORRECTION
        } else {
            texts::PROCESSING_ORDER
        };
        let processing = self
            .channel
            .send(OutboundMessage::text(chat, processing_text))
            .await
            .ok();

        // Mark the superseded prompt before the (slow) parse so the user
        // immediately sees which order is dead.
        if let Some(ref previous) = ticket.previous_prompt {
            if let Err(e) = self
                .channel
                .edit(chat, previous, texts::ORDER_SUPERSEDED, None)
                .await
            {
                warn!(error = %e, "failed to mark superseded prompt");
            }
        }

        let entries = self.parse_with_timeout(&text).await;

        let entries = match entries {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, "parse failed before reaching the parser");
                self.cleanup_processing(chat, processing.as_ref()).await;
                self.send_text(chat, texts::RETRY_LATER).await;
                return;
            }
        };

        let products = match self.catalog.assortment().await {
            Ok(products) => products,
            Err(e) => {
                error!(error = %e, "assortment fetch failed");
                self.cleanup_processing(chat, processing.as_ref()).await;
                self.send_text(chat, texts::RETRY_LATER).await;
                return;
            }
        };

        let normalized = normalize_draft(&entries, &products);
        let mut response = render_customer(&normalized);
        response.push('\n');
        response.push_str(texts::CONFIRM_HINT);

        let controls = ControlSet::row(vec![Control::new(
            texts::CONFIRM_ORDER_BUTTON,
            event::confirm_order_payload(),
        )]);

        let prompt = match self
            .channel
            .send(OutboundMessage::with_controls(chat, response, controls))
            .await
        {
            Ok(prompt) => prompt,
            Err(e) => {
                error!(error = %e, "failed to send confirmation prompt");
                self.cleanup_processing(chat, processing.as_ref()).await;
                return;
            }
        };

        self.cleanup_processing(chat, processing.as_ref()).await;

        let installed = self
            .sessions
            .install_draft(sender.user_id, &ticket, entries, prompt.clone(), &text)
            .await;

        if !installed {
            // A newer message superseded this parse while it was in flight;
            // kill the prompt it produced.
            info!(user_id = sender.user_id, "dropping stale parse result");
            if let Err(e) = self
                .channel
                .edit(chat, &prompt, texts::ORDER_SUPERSEDED, None)
                .await
            {
                warn!(error = %e, "failed to mark stale prompt");
            }
        }
    }

    /// Runs the parser under the configured deadline.
    ///
    /// A timeout degrades to a note-only entry so the customer still gets
    /// an answer instead of a hung turn.
    async fn parse_with_timeout(&self, text: &str) -> Result<Vec<DraftEntry>, BrewlineError> {
        match tokio::time::timeout(self.parser_timeout, self.parser.parse(text, &[])).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout = ?self.parser_timeout, "parser call timed out");
                Ok(vec![DraftEntry::note(texts::PARSER_TIMED_OUT_NOTE)])
            }
        }
    }

    /// Deletes the transient processing notice, best-effort.
    async fn cleanup_processing(&self, chat: ChatRef, processing: Option<&PromptRef>) {
        if let Some(prompt) = processing {
            if let Err(e) = self.channel.delete(chat, prompt).await {
                debug!(error = %e, "failed to delete processing notice");
            }
        }
    }

    /// Sends a plain text message, best-effort.
    pub(crate) async fn send_text(&self, chat: ChatRef, text: &str) {
        if let Err(e) = self.channel.send(OutboundMessage::text(chat, text)).await {
            warn!(chat = chat.0, error = %e, "failed to send message");
        }
    }

    /// Answers a control press, best-effort.
    pub(crate) async fn answer(&self, control_id: &str, text: &str, alert: bool) {
        if let Err(e) = self.channel.answer_control(control_id, text, alert).await {
            warn!(error = %e, "failed to answer control press");
        }
    }
}
