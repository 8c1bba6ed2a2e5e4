// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort notification fan-out to the admin set.
//!
//! Attempts every recipient, collects per-recipient outcomes, and never
//! fails the overall operation on partial delivery failure.

use tracing::warn;

use brewline_core::BrewlineError;
use brewline_core::traits::ChannelAdapter;
use brewline_core::types::{ChatRef, ControlSet, OutboundMessage, PromptRef};

/// Outcome of one fan-out delivery attempt.
pub struct FanoutOutcome {
    pub recipient: ChatRef,
    pub result: Result<PromptRef, BrewlineError>,
}

/// Sends the same message to every admin, one attempt each.
///
/// Failures are logged and recorded; remaining recipients still get their
/// attempt. There is no retry.
pub async fn broadcast(
    channel: &dyn ChannelAdapter,
    admin_ids: &[i64],
    text: &str,
    controls: Option<ControlSet>,
) -> Vec<FanoutOutcome> {
    let mut outcomes = Vec::with_capacity(admin_ids.len());

    for &admin_id in admin_ids {
        let recipient = ChatRef(admin_id);
        let message = OutboundMessage {
            chat: recipient,
            text: text.to_string(),
            controls: controls.clone(),
        };
        let result = channel.send(message).await;
        if let Err(ref e) = result {
            warn!(admin_id, error = %e, "failed to notify admin");
        }
        outcomes.push(FanoutOutcome { recipient, result });
    }

    outcomes
}

/// Number of successful deliveries in a fan-out.
pub fn delivered_count(outcomes: &[FanoutOutcome]) -> usize {
    outcomes.iter().filter(|o| o.result.is_ok()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    use brewline_test_utils::MockChannel;

    #[tokio::test]
    async fn all_admins_receive_the_message() {
        let channel = MockChannel::new();
        let outcomes = broadcast(&channel, &[100, 200, 300], "новый заказ", None).await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(delivered_count(&outcomes), 3);
        assert_eq!(channel.sent().await.len(), 3);
    }

    #[tokio::test]
    async fn one_unreachable_admin_does_not_block_the_rest() {
        let channel = MockChannel::new();
        channel.make_unreachable(ChatRef(200)).await;

        let outcomes = broadcast(&channel, &[100, 200, 300], "новый заказ", None).await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(delivered_count(&outcomes), 2);
        assert_eq!(channel.sent_to(ChatRef(100)).await.len(), 1);
        assert!(channel.sent_to(ChatRef(200)).await.is_empty());
        assert_eq!(channel.sent_to(ChatRef(300)).await.len(), 1);
    }

    #[tokio::test]
    async fn empty_admin_set_is_a_no_op() {
        let channel = MockChannel::new();
        let outcomes = broadcast(&channel, &[], "текст", None).await;
        assert!(outcomes.is_empty());
        assert!(channel.sent().await.is_empty());
    }
}
