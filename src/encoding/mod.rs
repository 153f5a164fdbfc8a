// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Message encoding/decoding implementations.
//!
//! This module provides the two PubSub wire encodings:
//! - [`uadp`] - UADP binary encoding
//! - [`json`] - JSON encoding
//! - [`codec`] - Unified codec interface
//! - [`registry`] - Variant registry shared by both encodings

pub mod codec;
pub mod json;
pub mod registry;
pub mod uadp;

pub use codec::{CodecFactory, MessageCodec};
pub use json::JsonCodec;
pub use registry::{JsonShape, TypeInfo, VariantRegistry, WireWidth};
pub use uadp::{FieldEncoding, UadpCodec, UadpConfig, WriterIdWidth};
