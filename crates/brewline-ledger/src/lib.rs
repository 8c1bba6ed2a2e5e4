// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Sheets order ledger adapter.
//!
//! Appends one row per deliverable entry of a confirmed order via the
//! `values:append` endpoint. Callers treat append failures as log-only:
//! the order stays confirmed in storage and operators reconcile manually.

use async_trait::async_trait;
use tracing::{debug, info};

use brewline_config::model::LedgerConfig;
use brewline_core::BrewlineError;
use brewline_core::traits::{LedgerAdapter, PluginAdapter};
use brewline_core::types::{
    AdapterType, HealthStatus, LineItem, NormalizedEntry, PaymentMode, User,
};
use brewline_order::format::fmt_quantity;

/// Base URL for the Google Sheets API.
const API_BASE_URL: &str = "https://sheets.googleapis.com";

/// Ledger adapter writing confirmed orders into a Google Sheets worksheet.
pub struct SheetsLedger {
    client: reqwest::Client,
    spreadsheet_id: String,
    worksheet_name: String,
    api_token: String,
    base_url: String,
}

impl SheetsLedger {
    /// Creates a ledger from configuration.
    ///
    /// Requires `spreadsheet_id` and `api_token` to be set.
    pub fn new(config: &LedgerConfig) -> Result<Self, BrewlineError> {
        let spreadsheet_id = config
            .spreadsheet_id
            .clone()
            .ok_or_else(|| BrewlineError::Config("ledger.spreadsheet_id is required".into()))?;
        let api_token = config
            .api_token
            .clone()
            .ok_or_else(|| BrewlineError::Config("ledger.api_token is required".into()))?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| BrewlineError::Ledger {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            spreadsheet_id,
            worksheet_name: config.worksheet_name.clone(),
            api_token,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

#[async_trait]
impl PluginAdapter for SheetsLedger {
    fn name(&self) -> &str {
        "sheets-ledger"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Ledger
    }

    async fn health_check(&self) -> Result<HealthStatus, BrewlineError> {
        // Appends are rare and best-effort; there is no cheap authenticated
        // ping worth spending quota on.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BrewlineError> {
        Ok(())
    }
}

#[async_trait]
impl LedgerAdapter for SheetsLedger {
    async fn append_order(
        &self,
        user: &User,
        entries: &[NormalizedEntry],
        recorded_at: &str,
    ) -> Result<(), BrewlineError> {
        let rows: Vec<Vec<String>> = entries
            .iter()
            .filter(|normalized| !normalized.entry.is_note_only())
            .map(|normalized| build_row(user, normalized, recorded_at))
            .collect();

        if rows.is_empty() {
            debug!(user_id = user.user_id, "no deliverable entries, skipping ledger append");
            return Ok(());
        }

        let row_count = rows.len();
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}:append",
            self.base_url, self.spreadsheet_id, self.worksheet_name
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&serde_json::json!({ "values": rows }))
            .send()
            .await
            .map_err(|e| BrewlineError::Ledger {
                message: format!("append request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BrewlineError::Ledger {
                message: format!("append returned {status}: {body}"),
                source: None,
            });
        }

        info!(
            user_id = user.user_id,
            rows = row_count,
            "order appended to ledger"
        );
        Ok(())
    }
}

/// Builds the worksheet row for one deliverable entry.
///
/// Column layout matches the existing sheet: organization, delivery
/// address, goods, total, record date, payment form, delivery date,
/// customer id, customer handle, phone.
fn build_row(user: &User, normalized: &NormalizedEntry, recorded_at: &str) -> Vec<String> {
    let entry = &normalized.entry;

    let mut goods_text = String::new();
    for item in &normalized.items {
        match item {
            LineItem::Resolved {
                name,
                quantity,
                unit_label,
                line_cost,
                ..
            } => {
                goods_text.push_str(&format!(
                    "{name} - {} {unit_label} {line_cost:.2} р.\n",
                    fmt_quantity(*quantity)
                ));
            }
            LineItem::Unresolved {
                raw_id, raw_count, ..
            } => {
                goods_text.push_str(&format!(
                    "{raw_id} - {} (не распознано)\n",
                    fmt_quantity(*raw_count)
                ));
            }
        }
    }

    let payment_form = match normalized.payment_mode {
        PaymentMode::Cash => "НАЛИЧНЫЙ",
        PaymentMode::Cashless => "БЕЗНАЛИЧНЫЙ",
    };

    vec![
        entry
            .company_name
            .clone()
            .unwrap_or_else(|| "Не распознано".to_string()),
        entry.address.clone().unwrap_or_default(),
        goods_text.trim_end().to_string(),
        format!("{:.2}", normalized.total_cost),
        recorded_at.to_string(),
        payment_form.to_string(),
        entry.delivery_date.clone().unwrap_or_default(),
        user.user_id.to_string(),
        user.username.clone().map(|u| format!("@{u}")).unwrap_or_default(),
        user.phone.clone().unwrap_or_default(),
    ]
}
