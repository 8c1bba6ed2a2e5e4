// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state machine and approval coordinator.
//!
//! The crate owns the per-user order-intake workflow: registration with
//! admin approval, free-text drafting with parser-backed normalization,
//! correction handling that supersedes the previous draft, customer
//! confirmation, and the admin confirmation protocol with external
//! recording.

pub mod broadcast;
pub mod dispatcher;
pub mod event;
pub mod session;
pub mod texts;

mod approval;

pub use dispatcher::Dispatcher;
pub use event::Event;
pub use session::{OrderState, RegistrationFlow, Session, SessionStore};
