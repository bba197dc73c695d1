//! Background render jobs and per-day render status.
//!
//! The plot action must return promptly while rendering can take a while,
//! so the drawing runs on a background task and the page re-polls the image.
//! A per-day status map backs the "render pending/failed" notice; at most
//! one render per day is in flight, re-triggering while pending is a no-op.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info};

use notam_common::DayKey;

use crate::state::AppState;

/// User-visible render state for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderStatus {
    /// No render running; the image on disk (if any) is current.
    Idle,
    /// A render is in flight; the image will refresh when it lands.
    Pending,
    /// The last render failed; any previous image is untouched.
    Failed(String),
}

/// Tracks in-flight and failed renders per day.
#[derive(Debug, Default)]
pub struct RenderTracker {
    inner: Mutex<HashMap<DayKey, RenderStatus>>,
}

impl RenderTracker {
    /// Mark a render as started. Returns `false` if one is already pending
    /// for this day.
    pub fn try_begin(&self, day: DayKey) -> bool {
        let mut inner = self.inner.lock().expect("render tracker poisoned");
        if inner.get(&day) == Some(&RenderStatus::Pending) {
            return false;
        }
        inner.insert(day, RenderStatus::Pending);
        true
    }

    pub fn finish_ok(&self, day: DayKey) {
        let mut inner = self.inner.lock().expect("render tracker poisoned");
        inner.remove(&day);
    }

    pub fn finish_failed(&self, day: DayKey, message: impl Into<String>) {
        let mut inner = self.inner.lock().expect("render tracker poisoned");
        inner.insert(day, RenderStatus::Failed(message.into()));
    }

    pub fn status(&self, day: DayKey) -> RenderStatus {
        let inner = self.inner.lock().expect("render tracker poisoned");
        inner.get(&day).cloned().unwrap_or(RenderStatus::Idle)
    }
}

/// Kick off a background render of the day's plot.
///
/// Returns immediately; the drawing itself runs on the blocking pool. If a
/// render for this day is already pending this is a no-op.
pub fn spawn_render(state: Arc<AppState>, day: DayKey) {
    if !state.renders.try_begin(day) {
        debug!(day = %day, "Render already pending, ignoring trigger");
        return;
    }
    info!(day = %day, "Starting background render");

    tokio::spawn(async move {
        let notams = match state.store.get_day(day).await {
            Ok(list) => list,
            Err(e) => {
                error!(day = %day, error = %e, "Failed to load NOTAMs for render");
                state.renders.finish_failed(day, e.to_string());
                return;
            }
        };

        let renderer = state.renderer.clone();
        let result =
            tokio::task::spawn_blocking(move || renderer.render_day(day, &notams)).await;

        match result {
            Ok(Ok(path)) => {
                debug!(day = %day, path = %path.display(), "Render finished");
                state.renders.finish_ok(day);
            }
            Ok(Err(e)) => {
                error!(day = %day, error = %e, "Render failed");
                state.renders.finish_failed(day, e.to_string());
            }
            Err(e) => {
                error!(day = %day, error = %e, "Render task panicked");
                state.renders.finish_failed(day, "render task failed");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_single_pending_per_day() {
        let tracker = RenderTracker::default();
        let day: DayKey = "2024-03-01".parse().unwrap();

        assert_eq!(tracker.status(day), RenderStatus::Idle);
        assert!(tracker.try_begin(day));
        assert!(!tracker.try_begin(day));
        assert_eq!(tracker.status(day), RenderStatus::Pending);

        tracker.finish_ok(day);
        assert_eq!(tracker.status(day), RenderStatus::Idle);
        assert!(tracker.try_begin(day));
    }

    #[test]
    fn test_tracker_failure_is_retriable() {
        let tracker = RenderTracker::default();
        let day: DayKey = "2024-03-01".parse().unwrap();

        assert!(tracker.try_begin(day));
        tracker.finish_failed(day, "boom");
        assert_eq!(tracker.status(day), RenderStatus::Failed("boom".into()));

        // A failed day can be re-triggered.
        assert!(tracker.try_begin(day));
        assert_eq!(tracker.status(day), RenderStatus::Pending);
    }

    #[test]
    fn test_tracker_days_independent() {
        let tracker = RenderTracker::default();
        let d1: DayKey = "2024-03-01".parse().unwrap();
        let d2: DayKey = "2024-03-02".parse().unwrap();

        assert!(tracker.try_begin(d1));
        assert!(tracker.try_begin(d2));
        assert!(!tracker.try_begin(d1));
    }
}
