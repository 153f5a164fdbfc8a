// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Publishing glue: assemble, encode, hand to a transport.
//!
//! A [`Publisher`] owns the per-writer [`SequenceTracker`], the configured
//! codec and a [`Transport`]. Every `publish` call runs to completion on the
//! caller's thread. The writer's sequence number advances only when the
//! transport accepted the frame, so a failed publish is repeated with the
//! same number.

pub mod sequence;
pub mod transport;

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{ConfigError, PublisherConfig};
use crate::core::{
    CodecError, DataSetClassId, DataSetMessage, Encoding, Field, NetworkMessage, PublisherId,
};
use crate::encoding::MessageCodec;

pub use sequence::SequenceTracker;
pub use transport::{MemoryTransport, PublishedFrame, Transport, TransportError};

/// Publish failures.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The message could not be assembled or encoded.
    #[error("encode failed: {0}")]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl PublishError {
    /// Whether publishing the same fields again may succeed.
    ///
    /// Codec errors are problems with the caller's data or schema and never
    /// go away on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            PublishError::Codec(_) => false,
            PublishError::Transport(e) => e.is_retryable(),
        }
    }

    /// Whether the transport is unusable until re-established.
    pub fn is_fatal(&self) -> bool {
        match self {
            PublishError::Codec(_) => false,
            PublishError::Transport(e) => e.is_fatal(),
        }
    }
}

/// Counters of one publisher.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PublishStats {
    pub messages_sent: u64,
    pub bytes_sent: u64,
    pub failures: u64,
}

impl PublishStats {
    /// Mean encoded size of sent messages, 0 before the first one.
    pub fn average_message_size(&self) -> f64 {
        if self.messages_sent == 0 {
            0.0
        } else {
            self.bytes_sent as f64 / self.messages_sent as f64
        }
    }
}

/// Receipt of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub sequence_number: u32,
    pub topic: String,
    pub bytes: usize,
}

/// Publishes DataSetMessages for any number of writers over one transport.
pub struct Publisher<T: Transport> {
    publisher_id: PublisherId,
    topic: String,
    class_ids: HashMap<u32, DataSetClassId>,
    codec: Box<dyn MessageCodec>,
    transport: T,
    sequences: SequenceTracker,
    stats: PublishStats,
}

impl<T: Transport> Publisher<T> {
    /// Build a publisher from a validated configuration.
    pub fn new(config: &PublisherConfig, transport: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut class_ids = HashMap::new();
        for writer in &config.writers {
            if let Some(class_id) = config.class_id(writer.writer_id)? {
                class_ids.insert(writer.writer_id, class_id);
            }
        }
        Ok(Self {
            publisher_id: config.publisher_id(),
            topic: config.topic().to_string(),
            class_ids,
            codec: config.codec_factory()?.create(config.encoding()),
            transport,
            sequences: config.sequence_tracker()?,
            stats: PublishStats::default(),
        })
    }

    /// Publish `fields` for a writer on the base topic.
    pub fn publish(
        &mut self,
        writer_id: u32,
        fields: Vec<Field>,
    ) -> Result<PublishReceipt, PublishError> {
        let topic = self.topic.clone();
        self.publish_on(writer_id, fields, topic)
    }

    /// Publish `fields` for a writer on `<topic>/<suffix>`.
    pub fn publish_to(
        &mut self,
        writer_id: u32,
        fields: Vec<Field>,
        suffix: &str,
    ) -> Result<PublishReceipt, PublishError> {
        let topic = if suffix.is_empty() {
            self.topic.clone()
        } else {
            format!("{}/{}", self.topic, suffix)
        };
        self.publish_on(writer_id, fields, topic)
    }

    fn publish_on(
        &mut self,
        writer_id: u32,
        fields: Vec<Field>,
        topic: String,
    ) -> Result<PublishReceipt, PublishError> {
        let sequence_number = self.sequences.peek_next(writer_id);
        let result = if self.transport.is_connected() {
            self.assemble(writer_id, sequence_number, fields)
                .and_then(|message| self.codec.encode(&message))
                .map_err(PublishError::from)
                .and_then(|payload| {
                    self.transport
                        .publish(&topic, &payload)
                        .map(|()| payload.len())
                        .map_err(PublishError::from)
                })
        } else {
            Err(TransportError::Disconnected.into())
        };

        match result {
            Ok(bytes) => {
                self.sequences.commit(writer_id, sequence_number);
                self.stats.messages_sent += 1;
                self.stats.bytes_sent += bytes as u64;
                debug!(
                    writer_id,
                    sequence_number,
                    bytes,
                    topic = %topic,
                    "published"
                );
                Ok(PublishReceipt {
                    sequence_number,
                    topic,
                    bytes,
                })
            }
            Err(err) => {
                self.stats.failures += 1;
                warn!(
                    writer_id,
                    sequence_number,
                    topic = %topic,
                    retryable = err.is_retryable(),
                    fatal = err.is_fatal(),
                    error = %err,
                    "publish failed"
                );
                Err(err)
            }
        }
    }

    fn assemble(
        &self,
        writer_id: u32,
        sequence_number: u32,
        fields: Vec<Field>,
    ) -> Result<NetworkMessage, CodecError> {
        let dsm = DataSetMessage::new(writer_id, sequence_number, fields)?;
        let mut message = NetworkMessage::new(self.publisher_id.clone(), vec![dsm])?
            .with_message_id(Uuid::new_v4().to_string());
        if let Some(class_id) = self.class_ids.get(&writer_id) {
            message = message.with_class_id(*class_id);
        }
        Ok(message)
    }

    pub fn stats(&self) -> PublishStats {
        self.stats
    }

    pub fn sequences(&self) -> &SequenceTracker {
        &self.sequences
    }

    pub fn encoding(&self) -> Encoding {
        self.codec.encoding_type()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Tear down and return the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }
}
