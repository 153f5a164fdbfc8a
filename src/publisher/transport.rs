// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Transport adapter contract.
//!
//! A transport accepts an encoded buffer and a topic and delivers it. Retries,
//! timeouts and reconnection are the transport's business; the publisher only
//! reports what the transport says.

use thiserror::Error;

/// Transport failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection is gone; the caller must reconnect or restart.
    #[error("transport disconnected")]
    Disconnected,

    /// The broker or link refused this publish.
    #[error("publish to '{topic}' rejected: {reason}")]
    Rejected {
        topic: String,
        reason: String,
        /// Whether publishing the same payload again may succeed.
        retryable: bool,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Whether the same publish may succeed later.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Disconnected => false,
            TransportError::Rejected { retryable, .. } => *retryable,
            TransportError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::Interrupted
            ),
        }
    }

    /// Whether the link is unusable until re-established.
    pub fn is_fatal(&self) -> bool {
        match self {
            TransportError::Disconnected => true,
            TransportError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::NotConnected
            ),
            TransportError::Rejected { .. } => false,
        }
    }
}

/// Delivers encoded NetworkMessages.
pub trait Transport {
    /// Deliver one encoded message on `topic`.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError>;

    fn is_connected(&self) -> bool {
        true
    }
}

/// One frame recorded by [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedFrame {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Transport that records frames in memory.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    frames: Vec<PublishedFrame>,
    connected: bool,
    reject_next: usize,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            connected: true,
            reject_next: 0,
        }
    }

    /// Frames published so far, oldest first.
    pub fn frames(&self) -> &[PublishedFrame] {
        &self.frames
    }

    pub fn take_frames(&mut self) -> Vec<PublishedFrame> {
        std::mem::take(&mut self.frames)
    }

    /// Reject the next `count` publishes with a retryable error.
    pub fn reject_next(&mut self, count: usize) {
        self.reject_next = count;
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    pub fn reconnect(&mut self) {
        self.connected = true;
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MemoryTransport {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::Disconnected);
        }
        if self.reject_next > 0 {
            self.reject_next -= 1;
            return Err(TransportError::Rejected {
                topic: topic.to_string(),
                reason: "injected rejection".to_string(),
                retryable: true,
            });
        }
        self.frames.push(PublishedFrame {
            topic: topic.to_string(),
            payload: payload.to_vec(),
        });
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_transport_records() {
        let mut transport = MemoryTransport::new();
        transport.publish("a/b", &[1, 2]).unwrap();
        assert_eq!(transport.frames().len(), 1);
        assert_eq!(transport.frames()[0].topic, "a/b");
        assert_eq!(transport.take_frames()[0].payload, vec![1, 2]);
        assert!(transport.frames().is_empty());
    }

    #[test]
    fn test_memory_transport_failures() {
        let mut transport = MemoryTransport::new();
        transport.reject_next(1);
        let err = transport.publish("t", &[0]).unwrap_err();
        assert!(err.is_retryable());
        assert!(!err.is_fatal());
        assert!(transport.publish("t", &[0]).is_ok());

        transport.disconnect();
        let err = transport.publish("t", &[0]).unwrap_err();
        assert!(err.is_fatal());
        assert!(!err.is_retryable());
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_io_error_classification() {
        let timeout = TransportError::from(std::io::Error::from(std::io::ErrorKind::TimedOut));
        assert!(timeout.is_retryable());
        let reset = TransportError::from(std::io::Error::from(std::io::ErrorKind::ConnectionReset));
        assert!(reset.is_fatal());
    }
}
