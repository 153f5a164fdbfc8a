// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! JSON encoding module.
//!
//! Provides the textual PubSub encoding.

pub mod codec;

pub use codec::{JsonCodec, UA_DATA};
