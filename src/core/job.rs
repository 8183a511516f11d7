//! The unit of work accepted by the dispatcher.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::util::clock::now_nanos;

/// Opaque key/value payload decoded from an inbound request. The dispatch core
/// never looks inside it.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Correlation identifier of a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

/// Last nanosecond stamp handed out, so ids stay distinct within a nanosecond.
static LAST_STAMP: AtomicU64 = AtomicU64::new(0);

impl JobId {
    /// Generate an id from the current wall-clock time in nanoseconds.
    ///
    /// Successive ids within this process are strictly increasing even when
    /// the clock has not advanced between calls.
    #[must_use]
    pub fn generate() -> Self {
        let now = now_nanos();
        let prev = LAST_STAMP
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
                Some(now.max(prev.saturating_add(1)))
            })
            .unwrap_or_else(|prev| prev);
        Self(now.max(prev.saturating_add(1)).to_string())
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An immutable unit of work: identifier plus opaque payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    id: JobId,
    payload: Payload,
}

impl Job {
    /// Create a job with a freshly generated id.
    #[must_use]
    pub fn new(payload: Payload) -> Self {
        Self::with_id(JobId::generate(), payload)
    }

    /// Create a job with a caller-chosen id.
    #[must_use]
    pub const fn with_id(id: JobId, payload: Payload) -> Self {
        Self { id, payload }
    }

    /// Job identifier.
    #[must_use]
    pub const fn id(&self) -> &JobId {
        &self.id
    }

    /// Job payload.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Split the job into its parts.
    #[must_use]
    pub fn into_parts(self) -> (JobId, Payload) {
        (self.id, self.payload)
    }
}
