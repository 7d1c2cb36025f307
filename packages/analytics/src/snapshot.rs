//! Shared state for long-lived hosts of the pipeline.
//!
//! [`SnapshotStore`] holds the incident snapshot reports are computed from
//! and lets a refresher swap in a new one atomically. [`FocusedRegion`]
//! publishes the region a viewer is currently looking at.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;
use wildfire_impact_incident_models::IncidentSet;

/// The current incident snapshot.
///
/// Readers get an [`Arc`] to a complete, immutable set; an install replaces
/// the whole set at once, so no reader ever sees a partial refresh.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Arc<IncidentSet>>,
}

impl SnapshotStore {
    /// Creates a store holding `initial`.
    #[must_use]
    pub fn new(initial: IncidentSet) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Replaces the snapshot and returns the previous one.
    pub fn install(&self, next: IncidentSet) -> Arc<IncidentSet> {
        let next = Arc::new(next);
        log::debug!(
            "Installing incident snapshot with {} records ({} excluded)",
            next.len(),
            next.excluded_count()
        );

        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// The snapshot installed most recently.
    #[must_use]
    pub fn current(&self) -> Arc<IncidentSet> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Publish/subscribe cell for the focused region id.
#[derive(Debug)]
pub struct FocusedRegion {
    sender: watch::Sender<Option<String>>,
}

impl Default for FocusedRegion {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusedRegion {
    /// Creates a cell with no region focused.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    /// Focuses `region_id`, or clears the focus with `None`.
    ///
    /// Subscribers are only notified when the value actually changes.
    pub fn focus(&self, region_id: Option<String>) {
        self.sender.send_if_modified(|current| {
            if *current == region_id {
                false
            } else {
                log::debug!("Focused region changed: {current:?} -> {region_id:?}");
                *current = region_id;
                true
            }
        });
    }

    /// The currently focused region id.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.sender.borrow().clone()
    }

    /// A receiver notified on every focus change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.sender.subscribe()
    }
}
