// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Parley integration tests.
//!
//! [`TestHarness`] spins up an isolated router actor over temp SQLite;
//! [`TestConnection`] scripts a client or operator against it.

pub mod harness;

pub use harness::{TestConnection, TestHarness};
