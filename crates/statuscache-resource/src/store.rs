// Resource status store
//
// One reader-writer lock guards the {value, expiry, entity tag} triple of a
// resource. `set` holds the write lock while all three change; `get` holds the
// read lock across serialization, tag read and expiry read, so a snapshot never
// pairs a body from one status version with a tag from another.

use std::sync::Arc;

use parking_lot::RwLock;
use statuscache_core::{ClockSource, SystemClock};
use statuscache_crypto::EntityTag;
use statuscache_error::UnsupportedFormat;
use tracing::{debug, trace};

use crate::content_format::ContentFormat;
use crate::snapshot::StatusSnapshot;

/// Per-resource rendering of a status value
///
/// `derive_tag` is called by [`ResourceStatusStore::set`] while the write lock
/// is held and must be deterministic in `value`.
pub trait StatusCodec<T>: Send + Sync {
    /// Render `value` in `format`, or report that the format is not offered.
    fn serialize(&self, value: &T, format: ContentFormat) -> Result<Vec<u8>, UnsupportedFormat>;

    /// Entity tag of `value`
    fn derive_tag(&self, value: &T) -> EntityTag;
}

/// Remaining freshness in whole seconds, clamped at zero.
pub fn remaining_seconds(expiry_ms: u64, now_ms: u64) -> u64 {
    expiry_ms.saturating_sub(now_ms) / 1_000
}

struct ResourceStatus<T> {
    value: Arc<T>,
    expiry_ms: u64,
    tag: EntityTag,
}

/// Holds one resource's current status under a consistent update/read protocol.
pub struct ResourceStatusStore<T, C> {
    path: String,
    codec: C,
    clock: Arc<dyn ClockSource>,
    status: RwLock<ResourceStatus<T>>,
}

impl<T, C> ResourceStatusStore<T, C>
where
    T: Send + Sync,
    C: StatusCodec<T>,
{
    /// Create a store timed by the system clock
    pub fn new(path: impl Into<String>, initial: T, lifetime_seconds: u64, codec: C) -> Self {
        Self::with_clock(path, initial, lifetime_seconds, codec, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(
        path: impl Into<String>,
        initial: T,
        lifetime_seconds: u64,
        codec: C,
        clock: Arc<dyn ClockSource>,
    ) -> Self {
        let path = path.into();
        let tag = codec.derive_tag(&initial);
        let expiry_ms = expiry_after(clock.now_millis(), lifetime_seconds);

        debug!(path = %path, lifetime_seconds, "Initial status set");

        Self {
            path,
            codec,
            clock,
            status: RwLock::new(ResourceStatus {
                value: Arc::new(initial),
                expiry_ms,
                tag,
            }),
        }
    }

    /// Replace the status, restarting its freshness lifetime from now.
    ///
    /// Blocks until no reader or writer holds the lock; no `get` observes the
    /// new value before its tag and expiry are in place. If the codec panics
    /// while tagging, the previous status is left untouched.
    pub fn set(&self, value: T, lifetime_seconds: u64) {
        let mut status = self.status.write();

        let tag = self.codec.derive_tag(&value);
        let expiry_ms = expiry_after(self.clock.now_millis(), lifetime_seconds);

        *status = ResourceStatus {
            value: Arc::new(value),
            expiry_ms,
            tag,
        };

        debug!(
            path = %self.path,
            lifetime_seconds,
            etag = %status.tag,
            "New status set"
        );
    }

    /// Serialize the current status together with its tag and freshness.
    ///
    /// Concurrent calls proceed in parallel; they only wait for a `set` in flight.
    pub fn get(&self, format: ContentFormat) -> Result<StatusSnapshot, UnsupportedFormat> {
        let status = self.status.read();

        let body = match self.codec.serialize(&status.value, format) {
            Ok(body) => body,
            Err(unsupported) => {
                trace!(path = %self.path, content_format = %format, "Content format not supported");
                return Err(unsupported);
            }
        };
        let max_age = remaining_seconds(status.expiry_ms, self.clock.now_millis());

        Ok(StatusSnapshot::new(body, format, status.tag.clone(), max_age))
    }

    /// Current value for inspection.
    ///
    /// The lock is only held long enough to clone the `Arc`; use [`get`](Self::get)
    /// when the body must match a tag.
    pub fn current_value(&self) -> Arc<T> {
        Arc::clone(&self.status.read().value)
    }

    /// Serialize the current status without tag or freshness
    pub fn serialize(&self, format: ContentFormat) -> Result<Vec<u8>, UnsupportedFormat> {
        let status = self.status.read();
        self.codec.serialize(&status.value, format)
    }

    pub fn entity_tag(&self) -> EntityTag {
        self.status.read().tag.clone()
    }

    /// Seconds the current status may still be considered fresh
    pub fn max_age(&self) -> u64 {
        let expiry_ms = self.status.read().expiry_ms;
        remaining_seconds(expiry_ms, self.clock.now_millis())
    }

    pub fn expiry_millis(&self) -> u64 {
        self.status.read().expiry_ms
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }
}

fn expiry_after(now_ms: u64, lifetime_seconds: u64) -> u64 {
    now_ms.saturating_add(lifetime_seconds.saturating_mul(1_000))
}
