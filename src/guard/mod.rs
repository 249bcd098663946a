//! Enrichment guard for shared cached entities.
//!
//! Installs a computed property on a [`Shared`] entity at most once per key,
//! no matter how many requests race on the same instance:
//!
//! 1. If the key is present, return without computing. The check takes the
//!    entity's shared read lock for the duration of one lookup, never the
//!    exclusive one, so it only waits on an in-progress step 3 write.
//! 2. Compute the value with no lock held. This may suspend on I/O.
//! 3. Take the entity's exclusive lock, re-check the key, and set it only if
//!    it is still absent.
//!
//! Computation is not deduplicated. Two racing callers may both compute;
//! only the first to reach step 3 writes, the other's value is dropped.
//! A failed computation writes nothing and a later call may retry.

use std::future::Future;

use tracing::{debug, info};

use crate::model::{Extensible, PropertyValue, Shared};

/// What the guard did for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichOutcome {
    /// The key was present on entry; nothing was computed.
    AlreadyPresent,
    /// This call computed and installed the value.
    Installed,
    /// This call computed a value but another caller installed first.
    Superseded,
}

/// Compute `key` for `entity` once and install it.
///
/// The returned outcome tells the caller which branch ran. Errors from
/// `compute` propagate unchanged.
pub async fn enrich_once<T, F, Fut, E>(
    entity: &Shared<T>,
    key: &str,
    compute: F,
) -> Result<EnrichOutcome, E>
where
    T: Extensible,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<PropertyValue, E>>,
{
    if entity.contains(key) {
        debug!(key = %key, "Property already present, skipping enrichment");
        return Ok(EnrichOutcome::AlreadyPresent);
    }

    let value = compute().await?;

    let outcome = {
        let mut guard = entity.write();
        if guard.properties().contains(key) {
            EnrichOutcome::Superseded
        } else {
            guard.properties_mut().set(key, value);
            EnrichOutcome::Installed
        }
    };

    match outcome {
        EnrichOutcome::Installed => {
            info!(entity = %entity.identity(), key = %key, "Installed extension property")
        }
        _ => debug!(
            entity = %entity.identity(),
            key = %key,
            "Concurrent enrichment won, discarding computed value"
        ),
    }

    Ok(outcome)
}
