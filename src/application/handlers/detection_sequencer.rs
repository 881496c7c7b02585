//! DetectionSequencer - Orders detection requests so stale results lose.
//!
//! A user may submit a second photo before the first finishes. Each request
//! takes a token; a finished result is applied only if no newer request has
//! been issued since and nothing newer was already applied.
//!
//! Ordering only applies within one subject: photos of different people are
//! independent and never supersede each other.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::foundation::DetectionToken;

/// Issues monotonically increasing detection tokens.
#[derive(Debug, Default)]
pub struct DetectionSequencer {
    issued: AtomicU64,
    accepted: AtomicU64,
}

impl DetectionSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the token for a new request. Tokens start at 1.
    pub fn next_token(&self) -> DetectionToken {
        DetectionToken::from_raw(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns true if no request was issued after `token`.
    pub fn is_latest(&self, token: DetectionToken) -> bool {
        self.issued.load(Ordering::SeqCst) == token.value()
    }

    /// Claims the right to apply the result for `token`.
    ///
    /// Returns false when the result is superseded: a newer request exists
    /// or a newer result was already accepted.
    pub fn accept(&self, token: DetectionToken) -> bool {
        if !self.is_latest(token) {
            return false;
        }
        self.accepted.fetch_max(token.value(), Ordering::SeqCst) < token.value()
    }

    /// The most recently issued token, if any.
    pub fn latest(&self) -> Option<DetectionToken> {
        match self.issued.load(Ordering::SeqCst) {
            0 => None,
            raw => Some(DetectionToken::from_raw(raw)),
        }
    }
}

/// Subject used when a request does not name one.
pub const DEFAULT_SUBJECT: &str = "default";

/// One sequencer per subject, created on first use.
#[derive(Debug, Default)]
pub struct SubjectSequencers {
    lanes: RwLock<HashMap<String, Arc<DetectionSequencer>>>,
}

impl SubjectSequencers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sequencer for `subject`, creating it if needed.
    pub async fn for_subject(&self, subject: &str) -> Arc<DetectionSequencer> {
        if let Some(sequencer) = self.lanes.read().await.get(subject) {
            return Arc::clone(sequencer);
        }
        let mut lanes = self.lanes.write().await;
        Arc::clone(lanes.entry(subject.to_string()).or_default())
    }

    /// Drops the sequencer for `subject`; its next request starts at token 1.
    pub async fn forget(&self, subject: &str) -> bool {
        self.lanes.write().await.remove(subject).is_some()
    }

    /// Number of subjects with a sequencer.
    pub async fn len(&self) -> usize {
        self.lanes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.lanes.read().await.is_empty()
    }
}
