//! Stateful banner engine: wires a campaign, a persistence backend, and a
//! clock around the pure visibility rules.

use banner_core::{BannerConfig, BannerPhase, Campaign, DismissalRecord};
use banner_store::StateStore;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::visibility::{self, Evaluation};

/// Dismissal/visibility state machine for one campaign banner.
///
/// The persisted record is read once at construction and held as a working
/// copy; every mutation writes the full record back. Expiry of both the
/// dismissal window and the campaign deadline is evaluated lazily on each
/// query, never by a background timer.
pub struct BannerMachine<S, C> {
    campaign: Campaign,
    config: BannerConfig,
    store: S,
    clock: C,
    record: DismissalRecord,
    retired: bool,
}

impl<S: StateStore, C: Clock> BannerMachine<S, C> {
    /// Build a machine, reading the persisted record once.
    ///
    /// A deadline that has already passed purges the stored record instead
    /// of loading it. Read failures and malformed blobs degrade to the
    /// default record with a warning; the banner never hides just because
    /// storage broke.
    pub fn new(campaign: Campaign, config: BannerConfig, store: S, clock: C) -> Self {
        let now = clock.now();
        let mut machine = Self {
            campaign,
            config,
            store,
            clock,
            record: DismissalRecord::default(),
            retired: false,
        };

        if now > machine.campaign.deadline {
            machine.retire();
        } else {
            machine.record = machine.load();
        }
        machine
    }

    /// Evaluate visibility at the current instant.
    ///
    /// The first query past the deadline purges storage; a query past the
    /// dismissal window writes the cleared record back so persisted state
    /// reflects reality.
    pub fn status(&mut self) -> Evaluation {
        let now = self.clock.now();
        let eval = visibility::evaluate(self.campaign.deadline, Some(&self.record), now);

        if eval.phase == BannerPhase::ExpiredPermanent {
            if !self.retired {
                self.retire();
            }
        } else if eval.record != self.record {
            self.record = eval.record.clone();
            self.persist();
            debug!(
                campaign = %self.campaign.name,
                show_count = self.record.show_count,
                "elapsed dismissal window cleared"
            );
        }

        eval
    }

    pub fn should_show(&mut self) -> bool {
        self.status().should_show
    }

    pub fn is_dismissed(&mut self) -> bool {
        self.status().is_dismissed
    }

    /// User dismissal: hide for the configured window and bump the counter.
    /// Ignored once the campaign is past its deadline.
    pub fn dismiss(&mut self) {
        let now = self.clock.now();
        if now > self.campaign.deadline {
            if !self.retired {
                self.retire();
            }
            debug!(campaign = %self.campaign.name, "dismiss ignored, campaign retired");
            return;
        }

        self.record = visibility::dismiss(&self.record, now, self.config.dismiss_window());
        self.persist();
        info!(
            campaign = %self.campaign.name,
            show_count = self.record.show_count,
            until = ?self.record.dismiss_until,
            "banner dismissed"
        );
    }

    /// Clear all dismissal state back to defaults, regardless of prior
    /// state. Does not resurrect a banner past its deadline.
    pub fn reset(&mut self) {
        let now = self.clock.now();
        self.record = visibility::reset();
        if now > self.campaign.deadline {
            if !self.retired {
                self.retire();
            }
            return;
        }

        self.persist();
        info!(campaign = %self.campaign.name, "banner state reset");
    }

    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    /// The in-memory working copy of the persisted record.
    pub fn record(&self) -> &DismissalRecord {
        &self.record
    }

    fn load(&self) -> DismissalRecord {
        match self.store.get(&self.config.storage_key) {
            Ok(Some(raw)) => match DismissalRecord::from_json(&raw) {
                Ok(record) => record,
                Err(e) => {
                    warn!(
                        error = %e,
                        key = %self.config.storage_key,
                        "stored banner state malformed, using defaults"
                    );
                    DismissalRecord::default()
                }
            },
            Ok(None) => DismissalRecord::default(),
            Err(e) => {
                warn!(
                    error = %e,
                    key = %self.config.storage_key,
                    "banner state read failed, using defaults"
                );
                DismissalRecord::default()
            }
        }
    }

    fn persist(&self) {
        match self.record.to_json() {
            Ok(raw) => {
                if let Err(e) = self.store.set(&self.config.storage_key, &raw) {
                    warn!(
                        error = %e,
                        key = %self.config.storage_key,
                        "banner state write failed"
                    );
                }
            }
            Err(e) => warn!(error = %e, "banner state serialization failed"),
        }
    }

    /// Drop the persisted record and clear the working copy. Runs at most
    /// once per machine, on the first observation past the deadline.
    fn retire(&mut self) {
        if let Err(e) = self.store.delete(&self.config.storage_key) {
            warn!(
                error = %e,
                key = %self.config.storage_key,
                "banner state delete failed"
            );
        }
        self.record = DismissalRecord::default();
        self.retired = true;
        info!(campaign = %self.campaign.name, "campaign deadline passed, banner retired");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use banner_store::{MemoryStore, NoopStore, StoreError};
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn start() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
    }

    fn config() -> BannerConfig {
        BannerConfig::default()
    }

    /// Store whose every operation fails, for exercising degraded paths.
    struct FaultyStore;

    impl StateStore for FaultyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Corrupt("backend offline".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Corrupt("backend offline".to_string()))
        }

        fn delete(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Corrupt("backend offline".to_string()))
        }
    }

    #[test]
    fn test_read_failure_degrades_to_visible_default() {
        let clock = ManualClock::new(start());
        let campaign = Campaign::new("promo", start() + Duration::days(7));
        let mut machine = BannerMachine::new(campaign, config(), FaultyStore, clock);

        let eval = machine.status();
        assert!(eval.should_show);
        assert!(!eval.is_dismissed);
        assert_eq!(machine.record().show_count, 0);
    }

    #[test]
    fn test_write_failure_keeps_working_copy() {
        let clock = ManualClock::new(start());
        let campaign = Campaign::new("promo", start() + Duration::days(7));
        let mut machine = BannerMachine::new(campaign, config(), FaultyStore, clock);

        machine.dismiss();
        assert!(!machine.should_show());
        assert_eq!(machine.record().show_count, 1);
    }

    #[test]
    fn test_malformed_stored_blob_degrades_to_default() {
        let store = Arc::new(MemoryStore::new());
        store.set(&config().storage_key, "][ garbage").unwrap();

        let clock = ManualClock::new(start());
        let campaign = Campaign::new("promo", start() + Duration::days(7));
        let mut machine = BannerMachine::new(campaign, config(), store, clock);

        assert!(machine.should_show());
        assert_eq!(machine.record().show_count, 0);
    }

    #[test]
    fn test_init_past_deadline_purges_store() {
        let store = Arc::new(MemoryStore::new());
        let stored = DismissalRecord {
            is_dismissed: false,
            dismiss_until: None,
            show_count: 3,
        };
        store
            .set(&config().storage_key, &stored.to_json().unwrap())
            .unwrap();

        let clock = ManualClock::new(start());
        let campaign = Campaign::new("promo", start() - Duration::days(1));
        let mut machine = BannerMachine::new(campaign, config(), store.clone(), clock);

        assert_eq!(store.get(&config().storage_key).unwrap(), None);
        let eval = machine.status();
        assert!(!eval.should_show);
        assert!(eval.is_dismissed);
    }

    #[test]
    fn test_deadline_crossing_mid_session_purges_once() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(start()));
        let campaign = Campaign::new("promo", start() + Duration::hours(1));
        let mut machine =
            BannerMachine::new(campaign, config(), store.clone(), clock.clone());

        machine.dismiss();
        assert!(store.get(&config().storage_key).unwrap().is_some());

        clock.advance(Duration::hours(2));
        assert!(!machine.should_show());
        assert_eq!(store.get(&config().storage_key).unwrap(), None);

        // Still retired on later queries.
        clock.advance(Duration::days(10));
        assert!(!machine.should_show());
    }

    #[test]
    fn test_dismiss_after_deadline_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        let clock = ManualClock::new(start());
        let campaign = Campaign::new("promo", start() - Duration::days(1));
        let mut machine = BannerMachine::new(campaign, config(), store.clone(), clock);

        machine.dismiss();
        assert_eq!(machine.record().show_count, 0);
        assert_eq!(store.get(&config().storage_key).unwrap(), None);
    }

    #[test]
    fn test_reset_after_deadline_does_not_rewrite_store() {
        let store = Arc::new(MemoryStore::new());
        let clock = ManualClock::new(start());
        let campaign = Campaign::new("promo", start() - Duration::days(1));
        let mut machine = BannerMachine::new(campaign, config(), store.clone(), clock);

        machine.reset();
        assert_eq!(store.get(&config().storage_key).unwrap(), None);
        assert!(!machine.should_show());
    }

    #[test]
    fn test_headless_store_still_drives_visibility() {
        let clock = Arc::new(ManualClock::new(start()));
        let campaign = Campaign::new("promo", start() + Duration::days(30));
        let mut machine = BannerMachine::new(campaign, config(), NoopStore, clock.clone());

        assert!(machine.should_show());
        machine.dismiss();
        assert!(!machine.should_show());

        clock.advance(Duration::hours(25));
        assert!(machine.should_show());
    }
}
