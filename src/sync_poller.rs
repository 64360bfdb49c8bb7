/*!
 * Polling-driven subtitle synchronization.
 *
 * A single periodic task samples the external playback clock and resolves
 * the active entry for both tracks, republishing the newest pair to a
 * single latest-sample cell. There is no back-pressure: a slow consumer
 * simply observes the most recent sample, intermediate samples are dropped.
 */

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::errors::PlayerError;
use crate::resolver::find_active;
use crate::subtitle_processor::SubtitleEntry;

/// Reference sampling cadence
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Interface to the external player's clock.
///
/// The player is an external collaborator: it owns the real timeline, may
/// not be initialized yet when polling starts, and accepts a single seek
/// at session start to restore prior progress.
#[async_trait]
pub trait PlaybackClock: Send + Sync {
    /// Current playback time in seconds.
    ///
    /// An error means the clock source is not available right now; the
    /// poller treats it as a skipped tick, never as a failure.
    async fn current_time(&self) -> Result<f64, PlayerError>;

    /// Seek playback to the given position in seconds
    async fn seek(&self, seconds: f64) -> Result<(), PlayerError>;
}

/// One resolved sample: the active entry pair and the time it was taken at
#[derive(Debug, Clone, Default)]
pub struct SyncSample {
    /// Active primary entry, if any
    pub primary: Option<SubtitleEntry>,

    /// Active secondary entry, if any
    pub secondary: Option<SubtitleEntry>,

    /// Playback time the sample was resolved at, in seconds
    pub time: f64,
}

/// Periodic poller owning the resolution loop for one session.
///
/// The track sequences are read-only after construction, so the resolver
/// reads them on every tick without synchronization. Dropping the poller
/// aborts its task; replacing a session can never leave two pollers live.
pub struct SyncPoller {
    latest: Arc<RwLock<Option<SyncSample>>>,
    handle: JoinHandle<()>,
}

impl SyncPoller {
    /// Spawn the polling task for the given tracks
    pub fn start(
        clock: Arc<dyn PlaybackClock>,
        primary: Vec<SubtitleEntry>,
        secondary: Vec<SubtitleEntry>,
        interval: Duration,
    ) -> Self {
        debug!(
            "Starting sync poller: {} primary / {} secondary slots, every {:?}",
            primary.len(),
            secondary.len(),
            interval
        );

        let latest: Arc<RwLock<Option<SyncSample>>> = Arc::new(RwLock::new(None));
        let cell = Arc::clone(&latest);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                let t = match clock.current_time().await {
                    Ok(t) => t,
                    Err(_) => {
                        trace!("Playback clock unavailable, skipping sample");
                        continue;
                    }
                };

                let sample = SyncSample {
                    primary: find_active(&primary, t).cloned(),
                    secondary: find_active(&secondary, t).cloned(),
                    time: t,
                };

                *cell.write() = Some(sample);
            }
        });

        SyncPoller { latest, handle }
    }

    /// Clone of the newest published sample, or None before the first tick
    pub fn latest(&self) -> Option<SyncSample> {
        self.latest.read().clone()
    }

    /// Stop the polling task
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for SyncPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
