//! Background maintenance timers
//!
//! Three periodic tasks, each driven by its own tokio task: full rescan,
//! podcast cache cleanup and index sweep. A period of `0` minutes disables
//! the matching timer.

use crate::config_ext::MediaConfigExt;
use crate::error::Result;
use crate::manager::MediaManager;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Runs `task` every `period_minutes`, the first time after one full period
pub fn spawn_periodic<F, Fut>(name: &'static str, period_minutes: u64, mut task: F) -> Option<JoinHandle<()>>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    if period_minutes == 0 {
        tracing::info!(timer = name, "Timer disabled");
        return None;
    }

    let period = Duration::from_secs(period_minutes * 60);
    tracing::info!(timer = name, period_minutes, "Timer started");

    Some(tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            tracing::debug!(timer = name, "Timer fired");
            task().await;
        }
    }))
}

/// Handles of the running maintenance timers
#[derive(Debug, Default)]
pub struct MediaSchedulers {
    handles: Vec<JoinHandle<()>>,
}

impl MediaSchedulers {
    /// Starts the timers configured for `manager`
    pub fn start(manager: &MediaManager) -> Result<Self> {
        let config = manager.config();
        let rescan = config.get_scan_all_delay_minutes()?;
        let podcast_clean = config.get_podcast_cache_clean_delay_minutes()?;
        let index_clean = config.get_index_clean_delay_minutes()?;

        let mut handles = Vec::new();

        let m = manager.clone();
        handles.extend(spawn_periodic("media-rescan", rescan, move || {
            let m = m.clone();
            async move {
                m.scan_all().await;
            }
        }));

        let m = manager.clone();
        handles.extend(spawn_periodic("podcast-cache-clean", podcast_clean, move || {
            let m = m.clone();
            async move {
                let removed = m.clean_podcast_cache().await;
                let remaining = m.podcasts().len().await;
                tracing::info!(removed, remaining, "Podcast cache cleaned");
            }
        }));

        let m = manager.clone();
        handles.extend(spawn_periodic("media-index-clean", index_clean, move || {
            let m = m.clone();
            async move {
                m.clean_index().await;
            }
        }));

        Ok(Self { handles })
    }

    /// Number of running timers
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Stops every timer
    pub fn shutdown(self) {
        for handle in self.handles {
            handle.abort();
        }
        tracing::info!("Media timers stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_zero_period_disables_timer() {
        assert!(spawn_periodic("never", 0, || async {}).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let handle = spawn_periodic("count", 1, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        })
        .unwrap();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);

        handle.abort();
    }
}
