// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Brewline order bot.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide,
//! providing long polling for messages and control presses, inline
//! keyboards, and message edits/deletes.

pub mod handler;
pub mod keyboards;

use async_trait::async_trait;
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use brewline_config::model::TelegramConfig;
use brewline_core::BrewlineError;
use brewline_core::traits::{ChannelAdapter, PluginAdapter};
use brewline_core::types::{
    AdapterType, ChannelUpdate, ChatRef, ControlSet, HealthStatus, OutboundMessage, PromptRef,
};

/// Telegram channel adapter implementing [`ChannelAdapter`].
///
/// Connects via long polling, filters to private-chat text messages and
/// control presses, and delivers everything else to `/dev/null`.
pub struct TelegramChannel {
    bot: Bot,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<ChannelUpdate>>,
    inbound_tx: mpsc::Sender<ChannelUpdate>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig) -> Result<Self, BrewlineError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            BrewlineError::Config("telegram.bot_token is required for the Telegram adapter".into())
        })?;

        if token.is_empty() {
            return Err(BrewlineError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, BrewlineError> {
        // Check if the bot token is valid by calling getMe.
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), BrewlineError> {
        debug!("Telegram channel shutting down");
        // The polling handle is dropped when TelegramChannel is dropped,
        // which aborts the task. For graceful shutdown, the serve loop stops
        // calling receive() first.
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), BrewlineError> {
        if self.polling_handle.is_some() {
            return Ok(()); // Already connected
        }

        let bot = self.bot.clone();
        let tx = self.inbound_tx.clone();

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let message_tx = tx.clone();
            let control_tx = tx;

            let handler = dptree::entry()
                .branch(Update::filter_message().endpoint(move |msg: Message| {
                    let tx = message_tx.clone();
                    async move {
                        // Filter: DMs only
                        if !handler::is_dm(&msg) {
                            debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
                            return respond(());
                        }

                        match handler::to_message_update(&msg) {
                            Some(update) => {
                                if tx.send(update).await.is_err() {
                                    warn!("inbound channel closed, dropping message");
                                }
                            }
                            None => {
                                debug!(msg_id = msg.id.0, "ignoring unsupported message type");
                            }
                        }

                        respond(())
                    }
                }))
                .branch(
                    Update::filter_callback_query().endpoint(move |query: CallbackQuery| {
                        let tx = control_tx.clone();
                        async move {
                            match handler::to_control_update(&query) {
                                Some(update) => {
                                    if tx.send(update).await.is_err() {
                                        warn!("inbound channel closed, dropping control press");
                                    }
                                }
                                None => {
                                    debug!("ignoring callback query without message or data");
                                }
                            }
                            respond(())
                        }
                    }),
                );

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {}) // Silently ignore other update kinds
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn receive(&self) -> Result<ChannelUpdate, BrewlineError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| BrewlineError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }

    async fn send(&self, msg: OutboundMessage) -> Result<PromptRef, BrewlineError> {
        let chat = ChatId(msg.chat.0);
        let sent = match &msg.controls {
            Some(controls) => {
                self.bot
                    .send_message(chat, &msg.text)
                    .reply_markup(keyboards::to_markup(controls))
                    .await
            }
            None => self.bot.send_message(chat, &msg.text).await,
        }
        .map_err(|e| BrewlineError::Channel {
            message: format!("failed to send message: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(PromptRef(sent.id.0.to_string()))
    }

    async fn edit(
        &self,
        chat: ChatRef,
        prompt: &PromptRef,
        text: &str,
        controls: Option<ControlSet>,
    ) -> Result<(), BrewlineError> {
        let message_id = parse_prompt(prompt)?;
        let chat = ChatId(chat.0);

        let result = match controls {
            Some(ref controls) => {
                self.bot
                    .edit_message_text(chat, message_id, text)
                    .reply_markup(keyboards::to_markup(controls))
                    .await
            }
            // An edit without reply_markup drops the previous keyboard,
            // which is exactly what superseding a prompt needs.
            None => self.bot.edit_message_text(chat, message_id, text).await,
        };

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.to_string().contains("message is not modified") => Ok(()),
            Err(e) => Err(BrewlineError::Channel {
                message: format!("failed to edit message: {e}"),
                source: Some(Box::new(e)),
            }),
        }
    }

    async fn delete(&self, chat: ChatRef, prompt: &PromptRef) -> Result<(), BrewlineError> {
        let message_id = parse_prompt(prompt)?;
        self.bot
            .delete_message(ChatId(chat.0), message_id)
            .await
            .map_err(|e| BrewlineError::Channel {
                message: format!("failed to delete message: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }

    async fn answer_control(
        &self,
        control_id: &str,
        text: &str,
        alert: bool,
    ) -> Result<(), BrewlineError> {
        self.bot
            .answer_callback_query(teloxide::types::CallbackQueryId(control_id.to_string()))
            .text(text)
            .show_alert(alert)
            .await
            .map_err(|e| BrewlineError::Channel {
                message: format!("failed to answer control press: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }
}

/// Parses an opaque prompt handle back into a Telegram message id.
fn parse_prompt(prompt: &PromptRef) -> Result<teloxide::types::MessageId, BrewlineError> {
    prompt
        .0
        .parse::<i32>()
        .map(teloxide::types::MessageId)
        .map_err(|e| BrewlineError::Channel {
            message: format!("invalid message handle `{}`: {e}", prompt.0),
            source: None,
        })
}
