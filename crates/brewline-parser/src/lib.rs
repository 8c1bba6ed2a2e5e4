// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM order parser adapter for the Brewline order bot.
//!
//! Implements [`ParserAdapter`] over the Anthropic Messages API: builds a
//! system prompt embedding the current assortment, sends the customer's
//! message, and extracts draft entries from the completion. The boundary
//! fails closed: an unusable completion or an API error becomes a single
//! note-only entry carrying a fixed apology, never an exception the
//! dispatcher has to translate.

pub mod client;
pub mod extract;
pub mod prompt;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info};

use brewline_catalog::CatalogCache;
use brewline_config::model::ParserConfig;
use brewline_core::BrewlineError;
use brewline_core::traits::{ParserAdapter, PluginAdapter};
use brewline_core::types::{AdapterType, DraftEntry, HealthStatus};

use crate::client::ParserClient;
use crate::types::{ApiMessage, MessageRequest};

/// Apology returned when the completion held no parseable order.
pub const PARSE_FAILED_NOTE: &str =
    "Не удалось распознать заказ. Пожалуйста, попробуйте еще раз или уточните детали заказа.";

/// Apology returned when the upstream API call failed.
pub const API_ERROR_NOTE: &str = "Ошибка при обработке заказа. Попробуйте позже.";

/// Order parser backed by the Anthropic Messages API.
pub struct LlmOrderParser {
    client: ParserClient,
    catalog: Arc<CatalogCache>,
    model: String,
    max_tokens: u32,
}

impl LlmOrderParser {
    /// Creates a parser from configuration.
    ///
    /// Requires `config.api_key` to be set.
    pub fn new(config: &ParserConfig, catalog: Arc<CatalogCache>) -> Result<Self, BrewlineError> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| BrewlineError::Config("parser.api_key is required".into()))?;

        Ok(Self {
            client: ParserClient::new(api_key, &config.api_version)?,
            catalog,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// Points the underlying client at a different base URL (tests).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }
}

#[async_trait]
impl PluginAdapter for LlmOrderParser {
    fn name(&self) -> &str {
        "llm-parser"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Parser
    }

    async fn health_check(&self) -> Result<HealthStatus, BrewlineError> {
        // No cheap ping exists for the Messages API; the catalog dependency
        // is the part that can actually go stale.
        match self.catalog.assortment().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Degraded(format!("assortment unavailable: {e}"))),
        }
    }

    async fn shutdown(&self) -> Result<(), BrewlineError> {
        Ok(())
    }
}

#[async_trait]
impl ParserAdapter for LlmOrderParser {
    async fn parse(
        &self,
        text: &str,
        prior_messages: &[String],
    ) -> Result<Vec<DraftEntry>, BrewlineError> {
        // Assortment failure is a storage problem, not a parse problem;
        // let the caller surface it as such.
        let products = self.catalog.assortment().await?;

        let system = prompt::build_system_prompt(&products)?;
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let user_content = prompt::build_user_content(text, prior_messages, &today);

        let request = MessageRequest {
            model: self.model.clone(),
            messages: vec![ApiMessage::user(user_content)],
            system: Some(system),
            max_tokens: self.max_tokens,
        };

        let completion = match self.client.complete(&request).await {
            Ok(response) => response.text(),
            Err(e) => {
                error!(error = %e, "order parse API call failed");
                return Ok(vec![DraftEntry::note(API_ERROR_NOTE)]);
            }
        };

        match extract::extract_entries(&completion) {
            Some(entries) => {
                info!(count = entries.len(), "order parsed");
                Ok(entries)
            }
            None => {
                error!(completion = %completion, "completion held no parseable order");
                Ok(vec![DraftEntry::note(PARSE_FAILED_NOTE)])
            }
        }
    }
}
