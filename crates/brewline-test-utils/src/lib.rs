// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Brewline integration tests.
//!
//! Mock implementations of every adapter trait, with captured traffic and
//! scriptable failures for exercising degradation paths.

pub mod memory_storage;
pub mod mock_channel;
pub mod mock_ledger;
pub mod mock_parser;

pub use memory_storage::MemoryStorage;
pub use mock_channel::{ControlAnswer, EditedMessage, MockChannel, SentMessage};
pub use mock_ledger::{AppendedOrder, MockLedger};
pub use mock_parser::{MockParser, ScriptedParse};
