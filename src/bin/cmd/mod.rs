// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI command implementations.

mod config;
mod inspect;
mod publish;
mod sample;
mod transcode;

pub use config::ConfigCmd;
pub use inspect::InspectCmd;
pub use publish::PublishCmd;
pub use sample::SampleCmd;
pub use transcode::TranscodeCmd;
