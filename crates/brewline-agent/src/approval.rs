// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The approval coordinator: cross-actor confirmation protocols.
//!
//! Customer confirm turns the active draft into a durable `pending_admin`
//! order and fans it out to the admins; admin confirm finalizes the order,
//! records it externally (best-effort), and notifies the customer. Admin
//! approve/reject handles the simpler registration protocol. Callers have
//! already authorized the admin events.

use chrono::Utc;
use tracing::{error, info, warn};

use brewline_core::types::{
    ChatRef, Control, ControlSet, OrderStatus, PromptRef, Sender,
};
use brewline_order::{normalize_draft, render_admin, render_customer};

use crate::broadcast;
use crate::dispatcher::Dispatcher;
use crate::event;
use crate::texts;

impl Dispatcher {
    /// Customer pressed the confirm button on an order prompt.
    pub(crate) async fn handle_user_confirm(
        &self,
        sender: Sender,
        chat: ChatRef,
        prompt: PromptRef,
        control_id: String,
    ) {
        let user = match self.storage.get_user(sender.user_id).await {
            Ok(Some(user)) if user.approved => user,
            Ok(_) => {
                self.answer(&control_id, texts::NOT_REGISTERED, true).await;
                return;
            }
            Err(e) => {
                error!(error = %e, "get_user failed during confirmation");
                self.answer(&control_id, texts::RETRY_LATER, true).await;
                return;
            }
        };

        let Some(draft) = self.sessions.take_draft(sender.user_id).await else {
            self.answer(&control_id, texts::DRAFT_NOT_FOUND, true).await;
            return;
        };

        // One authoritative pending order per user: anything still waiting
        // for an admin is superseded by this confirmation.
        match self.storage.find_latest_pending_order(sender.user_id).await {
            Ok(Some(stale)) => {
                if let Err(e) = self
                    .storage
                    .set_order_status(stale.order_id, OrderStatus::Superseded)
                    .await
                {
                    warn!(error = %e, order_id = stale.order_id, "failed to supersede stale order");
                } else {
                    info!(order_id = stale.order_id, "stale pending order superseded");
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "pending-order sweep failed"),
        }

        let payload = match serde_json::to_string(&draft) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "failed to serialize draft payload");
                self.sessions
                    .restore_draft(sender.user_id, draft, prompt)
                    .await;
                self.answer(&control_id, texts::RETRY_LATER, true).await;
                return;
            }
        };

        let order_id = match self.storage.create_order(sender.user_id, &payload).await {
            Ok(order_id) => order_id,
            Err(e) => {
                error!(error = %e, "create_order failed");
                // The draft stays live so the customer can press confirm again.
                self.sessions
                    .restore_draft(sender.user_id, draft, prompt)
                    .await;
                self.answer(&control_id, texts::RETRY_LATER, true).await;
                self.send_text(chat, texts::RETRY_LATER).await;
                return;
            }
        };

        info!(order_id, user_id = sender.user_id, "order persisted, pending admin");

        let rendered = match self.catalog.assortment().await {
            Ok(products) => {
                let normalized = normalize_draft(&draft, &products);
                Some((
                    render_customer(&normalized),
                    render_admin(
                        &sender,
                        user.organization.as_deref().unwrap_or("Неизвестно"),
                        &normalized,
                    ),
                ))
            }
            Err(e) => {
                warn!(error = %e, "assortment unavailable while notifying admins");
                None
            }
        };
        let (customer_text, admin_text) = match rendered {
            Some(pair) => pair,
            // Degraded fan-out: admins still learn about the order.
            None => (
                String::new(),
                format!("📦 НОВЫЙ ЗАКАЗ\n\n👤 Клиент: (ID: {})", sender.user_id),
            ),
        };

        let controls = ControlSet::row(vec![Control::new(
            texts::CONFIRM_ORDER_BUTTON,
            event::admin_confirm_payload(sender.user_id, order_id),
        )]);
        let outcomes = broadcast::broadcast(
            self.channel.as_ref(),
            &self.admin_ids,
            &admin_text,
            Some(controls),
        )
        .await;
        info!(
            order_id,
            delivered = broadcast::delivered_count(&outcomes),
            admins = self.admin_ids.len(),
            "order fanned out to admins"
        );

        let confirmed_text = if customer_text.is_empty() {
            texts::ORDER_SENT_TO_MANAGER.to_string()
        } else {
            format!("{}\n\n{}", texts::ORDER_SENT_TO_MANAGER, customer_text)
        };
        if let Err(e) = self.channel.edit(chat, &prompt, &confirmed_text, None).await {
            warn!(error = %e, "failed to edit confirmed prompt");
        }

        self.answer(&control_id, texts::ORDER_SENT_ANSWER, false).await;
    }

    /// Admin pressed approve/reject on a registration request.
    pub(crate) async fn handle_admin_approval(
        &self,
        admin_chat: ChatRef,
        prompt: PromptRef,
        control_id: String,
        user_id: i64,
        approve: bool,
    ) {
        let user = match self.storage.get_user(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.answer(&control_id, texts::USER_NOT_FOUND, true).await;
                return;
            }
            Err(e) => {
                error!(error = %e, user_id, "get_user failed during approval");
                self.answer(&control_id, texts::RETRY_LATER, true).await;
                return;
            }
        };

        if let Err(e) = self.storage.set_approval(user_id, approve).await {
            error!(error = %e, user_id, "set_approval failed");
            self.answer(&control_id, texts::RETRY_LATER, true).await;
            return;
        }

        info!(user_id, approve, "registration decision recorded");

        // Notify the user, best-effort.
        let notice = if approve {
            texts::READY_FOR_ORDERS
        } else {
            texts::REGISTRATION_REJECTED
        };
        self.send_text(ChatRef(user_id), notice).await;

        // Rewrite the admin's request message with the outcome.
        let banner = if approve {
            texts::ADMIN_USER_APPROVED_BANNER
        } else {
            texts::ADMIN_USER_REJECTED_BANNER
        };
        let summary = format!(
            "{banner}\n\nID: {}\nИмя: {}\nОрганизация: {}",
            user.user_id,
            user.display_name,
            user.organization.as_deref().unwrap_or("Не указана"),
        );
        if let Err(e) = self.channel.edit(admin_chat, &prompt, &summary, None).await {
            warn!(error = %e, "failed to edit approval request message");
        }

        let answer = if approve {
            texts::USER_APPROVED_ANSWER
        } else {
            texts::USER_REJECTED_ANSWER
        };
        self.answer(&control_id, answer, false).await;
    }

    /// Admin confirmed a customer's pending order.
    ///
    /// The control payload carries the order id, so the order is loaded
    /// directly instead of guessing at "the latest pending one".
    pub(crate) async fn handle_admin_confirm_order(
        &self,
        admin_chat: ChatRef,
        prompt: PromptRef,
        control_id: String,
        user_id: i64,
        order_id: i64,
    ) {
        let user = match self.storage.get_user(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.answer(&control_id, texts::USER_NOT_FOUND, true).await;
                return;
            }
            Err(e) => {
                error!(error = %e, user_id, "get_user failed during order confirmation");
                self.answer(&control_id, texts::RETRY_LATER, true).await;
                return;
            }
        };

        let order = match self.storage.get_order(order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                self.answer(&control_id, texts::ORDER_NOT_FOUND, true).await;
                return;
            }
            Err(e) => {
                error!(error = %e, order_id, "get_order failed");
                self.answer(&control_id, texts::RETRY_LATER, true).await;
                return;
            }
        };

        if order.status != OrderStatus::PendingAdmin {
            // Double press or a superseded order: nothing to mutate.
            self.answer(&control_id, texts::ORDER_ALREADY_HANDLED, true)
                .await;
            return;
        }

        if let Err(e) = self
            .storage
            .set_order_status(order_id, OrderStatus::Confirmed)
            .await
        {
            error!(error = %e, order_id, "set_order_status failed");
            self.answer(&control_id, texts::RETRY_LATER, true).await;
            return;
        }

        info!(order_id, user_id, "order confirmed by admin");

        // External record. Failure is logged only: the order stays
        // confirmed and operators reconcile the ledger manually.
        self.record_in_ledger(&user, &order.payload, order_id).await;

        // Rewrite the admin's message with the outcome.
        let summary = match self.rerender_for_admin(&user, &order.payload).await {
            Some(admin_text) => {
                format!("{}\n\n{}", texts::ADMIN_ORDER_CONFIRMED_BANNER, admin_text)
            }
            None => format!(
                "{}\n\nЗаказ #{order_id} клиента {user_id}",
                texts::ADMIN_ORDER_CONFIRMED_BANNER
            ),
        };
        if let Err(e) = self.channel.edit(admin_chat, &prompt, &summary, None).await {
            warn!(error = %e, "failed to edit admin order message");
        }

        // Notify the customer, best-effort.
        self.send_text(ChatRef(user_id), texts::ORDER_CONFIRMED_BY_ADMIN)
            .await;

        self.answer(&control_id, texts::ORDER_CONFIRMED_ANSWER, false)
            .await;
    }

    /// Appends the confirmed order to the external ledger, logging failures.
    async fn record_in_ledger(
        &self,
        user: &brewline_core::types::User,
        payload: &str,
        order_id: i64,
    ) {
        let Some(ref ledger) = self.ledger else {
            info!(order_id, "ledger disabled, skipping external record");
            return;
        };

        let entries: Vec<brewline_core::types::DraftEntry> = match serde_json::from_str(payload) {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, order_id, "order payload undecodable for ledger");
                return;
            }
        };

        let products = match self.catalog.assortment().await {
            Ok(products) => products,
            Err(e) => {
                error!(error = %e, order_id, "assortment unavailable for ledger write");
                return;
            }
        };

        let normalized = normalize_draft(&entries, &products);
        let recorded_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        match ledger.append_order(user, &normalized, &recorded_at).await {
            Ok(()) => info!(order_id, "order recorded in ledger"),
            Err(e) => error!(error = %e, order_id, "ledger write failed"),
        }
    }

    /// Re-renders the stored payload for the admin's edited message.
    async fn rerender_for_admin(
        &self,
        user: &brewline_core::types::User,
        payload: &str,
    ) -> Option<String> {
        let entries: Vec<brewline_core::types::DraftEntry> = serde_json::from_str(payload).ok()?;
        let products = self.catalog.assortment().await.ok()?;
        let normalized = normalize_draft(&entries, &products);
        let requester = Sender {
            user_id: user.user_id,
            username: user.username.clone(),
            first_name: Some(user.display_name.clone()),
        };
        Some(render_admin(
            &requester,
            user.organization.as_deref().unwrap_or("Неизвестно"),
            &normalized,
        ))
    }
}
