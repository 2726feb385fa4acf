use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{Days, NaiveDate};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::generator::{generate, section_by_day};
use crate::models::{Booking, FeedSnapshot, LoadOutcome};
use crate::settings::Settings;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedConfig {
    pub anchor_date: NaiveDate,
    pub initial_days: u32,
    pub more_days: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            anchor_date: NaiveDate::from_ymd_opt(2024, 12, 16).unwrap_or_default(),
            initial_days: 10,
            more_days: 25,
        }
    }
}

impl From<&Settings> for FeedConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            anchor_date: settings.anchor_date,
            initial_days: settings.initial_days,
            more_days: settings.more_days,
        }
    }
}

/// The held booking sequence of one feed, plus the flag that keeps a second
/// load from starting while one is in flight.
pub struct FeedSession {
    config: FeedConfig,
    bookings: RwLock<Vec<Booking>>,
    loading: AtomicBool,
}

/// Marks a load as in flight until dropped.
pub struct LoadGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl FeedSession {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            config,
            bookings: RwLock::new(Vec::new()),
            loading: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Returns `None` when another load already holds the flag.
    pub fn try_begin_load(&self) -> Option<LoadGuard<'_>> {
        self.loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadGuard {
                flag: &self.loading,
            })
    }

    pub async fn load_initial(&self) -> LoadOutcome {
        let Some(_guard) = self.try_begin_load() else {
            debug!("initial load ignored, another load is in flight");
            return LoadOutcome::Ignored;
        };
        self.replace_with_initial().await
    }

    /// Discards everything held and reloads from the anchor date.
    pub async fn refresh(&self) -> LoadOutcome {
        let Some(_guard) = self.try_begin_load() else {
            debug!("refresh ignored, another load is in flight");
            return LoadOutcome::Ignored;
        };
        info!("refreshing booking feed");
        self.replace_with_initial().await
    }

    async fn replace_with_initial(&self) -> LoadOutcome {
        let batch = generate(self.config.anchor_date, self.config.initial_days.into());
        let added = batch.len();

        let mut bookings = self.bookings.write().await;
        *bookings = batch;

        info!(
            anchor = %self.config.anchor_date,
            days = self.config.initial_days,
            added,
            "loaded initial bookings"
        );
        LoadOutcome::Loaded {
            added,
            total: added,
        }
    }

    /// Appends the next page, starting the day after the latest held booking.
    pub async fn load_more(&self) -> LoadOutcome {
        let Some(_guard) = self.try_begin_load() else {
            debug!("load more ignored, another load is in flight");
            return LoadOutcome::Ignored;
        };

        let mut bookings = self.bookings.write().await;
        let Some(latest) = bookings.iter().map(|b| b.start_date_time).max() else {
            debug!("load more skipped, feed is empty");
            return LoadOutcome::Empty;
        };
        let Some(next_day) = latest.date().checked_add_days(Days::new(1)) else {
            return LoadOutcome::Loaded {
                added: 0,
                total: bookings.len(),
            };
        };

        let batch = generate(next_day, self.config.more_days.into());
        let added = batch.len();
        bookings.extend(batch);

        info!(
            from = %next_day,
            days = self.config.more_days,
            added,
            total = bookings.len(),
            "loaded more bookings"
        );
        LoadOutcome::Loaded {
            added,
            total: bookings.len(),
        }
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.bookings.read().await.clone()
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        let bookings = self.bookings.read().await;
        FeedSnapshot {
            total: bookings.len(),
            loading: self.is_loading(),
            sections: section_by_day(&bookings),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::generator::section_title;

    fn session() -> FeedSession {
        FeedSession::new(FeedConfig::default())
    }

    #[tokio::test]
    async fn test_initial_load_covers_ten_days() {
        let feed = session();
        let outcome = feed.load_initial().await;
        let snapshot = feed.snapshot().await;

        assert!(matches!(outcome, LoadOutcome::Loaded { added, total } if added == total));
        assert_eq!(snapshot.sections.len(), 10);
        assert_eq!(snapshot.sections[0].title, "16/12/2024");
        assert_eq!(snapshot.sections[9].title, "25/12/2024");
        assert!((10..=30).contains(&snapshot.total));
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_load_more_on_empty_feed_is_noop() {
        let feed = session();
        assert_eq!(feed.load_more().await, LoadOutcome::Empty);
        assert!(feed.bookings().await.is_empty());
        assert!(!feed.is_loading());
    }

    #[tokio::test]
    async fn test_load_more_appends_from_next_day() {
        let feed = session();
        feed.load_initial().await;
        let before = feed.bookings().await;

        let outcome = feed.load_more().await;
        let after = feed.bookings().await;

        let LoadOutcome::Loaded { added, total } = outcome else {
            panic!("expected a load, got {outcome:?}");
        };
        assert!((25..=75).contains(&added));
        assert_eq!(total, after.len());
        assert_eq!(&after[..before.len()], &before[..]);
        assert_eq!(after[before.len()].date(), NaiveDate::from_ymd_opt(2024, 12, 26).unwrap());

        let sections = feed.snapshot().await.sections;
        assert_eq!(sections.len(), 35);
        let last_day = NaiveDate::from_ymd_opt(2025, 1, 19).unwrap();
        assert_eq!(sections[34].title, section_title(last_day));

        let ids: HashSet<_> = after.iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids.len(), after.len());
    }

    #[tokio::test]
    async fn test_load_more_ignored_while_loading() {
        let feed = session();
        feed.load_initial().await;
        let held = feed.bookings().await.len();

        let guard = feed.try_begin_load().expect("flag is free");
        assert!(feed.is_loading());
        assert_eq!(feed.load_more().await, LoadOutcome::Ignored);
        assert_eq!(feed.refresh().await, LoadOutcome::Ignored);
        assert_eq!(feed.bookings().await.len(), held);
        assert!(feed.snapshot().await.loading);

        drop(guard);
        assert!(!feed.is_loading());
        assert!(matches!(feed.load_more().await, LoadOutcome::Loaded { .. }));
    }

    #[tokio::test]
    async fn test_refresh_discards_loaded_pages() {
        let feed = session();
        feed.load_initial().await;
        feed.load_more().await;
        let old_ids: HashSet<_> = feed.bookings().await.into_iter().map(|b| b.id).collect();

        let outcome = feed.refresh().await;
        let snapshot = feed.snapshot().await;

        assert!(matches!(outcome, LoadOutcome::Loaded { .. }));
        assert_eq!(snapshot.sections.len(), 10);
        assert_eq!(snapshot.sections[0].title, "16/12/2024");
        for section in &snapshot.sections {
            for booking in &section.bookings {
                assert!(!old_ids.contains(&booking.id));
            }
        }
    }

    #[tokio::test]
    async fn test_custom_config_is_used() {
        let feed = FeedSession::new(FeedConfig {
            anchor_date: NaiveDate::from_ymd_opt(2025, 2, 27).unwrap(),
            initial_days: 3,
            more_days: 1,
        });
        feed.load_initial().await;
        feed.load_more().await;
        let titles: Vec<_> = feed
            .snapshot()
            .await
            .sections
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, ["27/02/2025", "28/02/2025", "01/03/2025", "02/03/2025"]);
    }
}
