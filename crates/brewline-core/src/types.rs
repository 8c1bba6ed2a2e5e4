// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain and transport types shared across adapter traits and the Brewline crates.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// Opaque reference to a chat on the notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatRef(pub i64);

/// Opaque handle to a previously sent message, usable for later edits and deletes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromptRef(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter behind a [`crate::traits::PluginAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum AdapterType {
    Channel,
    Parser,
    Storage,
    Ledger,
}

// --- Catalog types ---

/// The unit semantics of a product. Determines both the base unit a raw
/// count is multiplied into and which plural forms its label takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Sold by the liter; the unit label has no plural variants.
    VolumeLiters,
    /// Thermo containers, priced per liter of container volume.
    ThermoContainer,
    /// Sold by the piece.
    Piece,
}

/// One product of the assortment.
///
/// `min_size` is the smallest orderable increment in the product's natural
/// unit (liters or pieces); every valid quantity is an integer multiple of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub good_id: i64,
    pub name: String,
    pub unit_kind: UnitKind,
    pub price_cash: f64,
    pub price_cashless: f64,
    pub min_size: f64,
}

// --- Draft order types ---

/// Payment mode selector for a draft. Wire values follow the original
/// assortment column names (`price_c` = cash, `price_amt` = cashless).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    #[serde(rename = "price_c", alias = "cash")]
    Cash,
    #[serde(rename = "price_amt", alias = "cashless")]
    Cashless,
}

impl PaymentMode {
    /// Maps a wire string to a payment mode. Unknown values map to `None`,
    /// which downstream pricing treats as cashless.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "price_c" | "cash" => Some(PaymentMode::Cash),
            "price_amt" | "cashless" => Some(PaymentMode::Cashless),
            _ => None,
        }
    }
}

fn de_payment_mode<'de, D>(deserializer: D) -> Result<Option<PaymentMode>, D::Error>
where
    D: Deserializer<'de>,
{
    // Tolerate absent, null, and unrecognized selector strings alike.
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => PaymentMode::from_wire(&s),
        _ => None,
    })
}

/// One parsed candidate order for one delivery address.
///
/// A single customer message may yield several entries (one per address).
/// An entry carrying only `note` and no `address` signals the parser could
/// not find an order and holds a user-facing explanation instead of goods.
///
/// Serde accepts the original parser service's field names as aliases so
/// previously persisted payloads keep deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftEntry {
    #[serde(default, alias = "date_delivery")]
    pub delivery_date: Option<String>,
    #[serde(default, alias = "adress")]
    pub address: Option<String>,
    /// Raw counts keyed by the good id as the parser produced it. Keys stay
    /// strings: a non-numeric id must survive to the degraded line item.
    #[serde(default)]
    pub goods: BTreeMap<String, f64>,
    #[serde(
        default,
        alias = "payment_type",
        deserialize_with = "de_payment_mode"
    )]
    pub payment_mode: Option<PaymentMode>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default, alias = "message")]
    pub note: Option<String>,
}

impl DraftEntry {
    /// A note-only entry carries the parser's explanation and no deliverable order.
    pub fn is_note_only(&self) -> bool {
        self.note.is_some() && self.address.is_none()
    }

    /// Builds the fail-closed entry the parser boundary returns when it
    /// cannot produce anything usable.
    pub fn note(text: impl Into<String>) -> Self {
        Self {
            note: Some(text.into()),
            ..Self::default()
        }
    }
}

// --- Normalized line items ---

/// A priced line derived from one `(good_id, raw_count)` pair, or its
/// degraded form when the pair could not be resolved against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum LineItem {
    Resolved {
        good_id: i64,
        name: String,
        /// Quantity in base units: `raw_count * min_size`.
        quantity: f64,
        /// Grammatically correct unit label for `quantity`.
        unit_label: String,
        unit_price: f64,
        line_cost: f64,
    },
    Unresolved {
        raw_id: String,
        raw_count: f64,
        reason: UnresolvedReason,
    },
}

/// Why a goods pair could not be priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum UnresolvedReason {
    /// The good id did not parse as a number.
    BadId,
    /// The id parsed but no such product exists in the catalog.
    UnknownProduct,
    /// The raw count was zero or negative.
    BadCount,
}

/// A draft entry with its priced line items attached.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEntry {
    pub entry: DraftEntry,
    pub items: Vec<LineItem>,
    /// Effective mode after defaulting (`None` on the draft means cashless).
    pub payment_mode: PaymentMode,
    /// Sum over resolved items only; unresolved items contribute zero.
    pub total_cost: f64,
}

// --- Persisted entities ---

/// A registered (or registering) customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub display_name: String,
    pub username: Option<String>,
    pub organization: Option<String>,
    pub phone: Option<String>,
    pub approved: bool,
    pub registered_at: String,
}

/// Lifecycle of a persisted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Customer confirmed, waiting for an admin.
    PendingAdmin,
    /// An admin confirmed; externally recorded (best-effort).
    Confirmed,
    /// Replaced by a newer confirmation from the same customer before any
    /// admin acted on it.
    Superseded,
}

/// A customer-confirmed order as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: i64,
    pub user_id: i64,
    /// JSON-serialized `Vec<DraftEntry>`.
    pub payload: String,
    pub status: OrderStatus,
    pub created_at: String,
}

impl Order {
    /// Decodes the draft payload back into entries.
    pub fn entries(&self) -> Result<Vec<DraftEntry>, serde_json::Error> {
        serde_json::from_str(&self.payload)
    }
}

// --- Channel transport types ---

/// Identity of the actor behind an inbound update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl Sender {
    /// Best display name available: first name, then username, then the id.
    pub fn display_name(&self) -> String {
        self.first_name
            .clone()
            .or_else(|| self.username.clone())
            .unwrap_or_else(|| self.user_id.to_string())
    }
}

/// An inbound update received from the notification channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelUpdate {
    /// A plain text message.
    Message {
        sender: Sender,
        chat: ChatRef,
        text: String,
    },
    /// An inline control press. `control_id` acknowledges the press back to
    /// the channel; `payload` is the data bound to the pressed control.
    Control {
        sender: Sender,
        chat: ChatRef,
        prompt: PromptRef,
        control_id: String,
        payload: String,
    },
}

/// One pressable inline control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub label: String,
    pub payload: String,
}

impl Control {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// Rows of inline controls attached to an outbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlSet {
    pub rows: Vec<Vec<Control>>,
}

impl ControlSet {
    /// A single row of controls.
    pub fn row(controls: Vec<Control>) -> Self {
        Self {
            rows: vec![controls],
        }
    }
}

/// An outbound message to be sent via the notification channel.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub chat: ChatRef,
    pub text: String,
    pub controls: Option<ControlSet>,
}

impl OutboundMessage {
    pub fn text(chat: ChatRef, text: impl Into<String>) -> Self {
        Self {
            chat,
            text: text.into(),
            controls: None,
        }
    }

    pub fn with_controls(chat: ChatRef, text: impl Into<String>, controls: ControlSet) -> Self {
        Self {
            chat,
            text: text.into(),
            controls: Some(controls),
        }
    }
}
