// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock order parser with scripted responses.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use brewline_core::BrewlineError;
use brewline_core::traits::{ParserAdapter, PluginAdapter};
use brewline_core::types::{AdapterType, DraftEntry, HealthStatus};

/// One scripted parse result, optionally delivered after a delay.
#[derive(Debug, Clone)]
pub struct ScriptedParse {
    pub entries: Vec<DraftEntry>,
    pub delay: Option<Duration>,
}

impl ScriptedParse {
    pub fn immediate(entries: Vec<DraftEntry>) -> Self {
        Self {
            entries,
            delay: None,
        }
    }

    pub fn delayed(entries: Vec<DraftEntry>, delay: Duration) -> Self {
        Self {
            entries,
            delay: Some(delay),
        }
    }
}

/// A mock parser returning scripted drafts in order.
///
/// When the script runs out, falls back to a note-only apology, matching
/// the fail-closed contract of the real parser.
pub struct MockParser {
    script: Arc<Mutex<VecDeque<ScriptedParse>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockParser {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue the next parse result.
    pub async fn script(&self, parse: ScriptedParse) {
        self.script.lock().await.push_back(parse);
    }

    /// Texts passed to `parse`, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

impl Default for MockParser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockParser {
    fn name(&self) -> &str {
        "mock-parser"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Parser
    }

    async fn health_check(&self) -> Result<HealthStatus, BrewlineError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BrewlineError> {
        Ok(())
    }
}

#[async_trait]
impl ParserAdapter for MockParser {
    async fn parse(
        &self,
        text: &str,
        _prior_messages: &[String],
    ) -> Result<Vec<DraftEntry>, BrewlineError> {
        self.calls.lock().await.push(text.to_string());

        let scripted = self.script.lock().await.pop_front();
        match scripted {
            Some(parse) => {
                if let Some(delay) = parse.delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(parse.entries)
            }
            None => Ok(vec![DraftEntry::note(
                "Не удалось распознать заказ. Пожалуйста, попробуйте еще раз.",
            )]),
        }
    }
}
