//! Pure visibility rules for a dismissible campaign banner.
//!
//! The evaluation order is fixed: a passed deadline retires the banner
//! permanently, an unexpired dismissal window hides it temporarily, and
//! everything else shows it.

use banner_core::{BannerPhase, DismissalRecord};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Outcome of evaluating the visibility rules at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub phase: BannerPhase,
    pub should_show: bool,
    pub is_dismissed: bool,
    /// The record after lazy normalization. When this differs from the
    /// stored record (an elapsed dismissal was cleared), callers should
    /// persist it.
    pub record: DismissalRecord,
}

/// Evaluate banner visibility at `now` against a fixed campaign `deadline`
/// and the stored record, if any. Pure function of its inputs.
pub fn evaluate(
    deadline: DateTime<Utc>,
    stored: Option<&DismissalRecord>,
    now: DateTime<Utc>,
) -> Evaluation {
    // A passed deadline retires the banner for good. Reported as dismissed
    // so hosts collapse the slot.
    if now > deadline {
        return Evaluation {
            phase: BannerPhase::ExpiredPermanent,
            should_show: false,
            is_dismissed: true,
            record: DismissalRecord::default(),
        };
    }

    let mut record = stored.cloned().unwrap_or_default();

    // An active dismissal window keeps the banner hidden.
    if record.is_dismissed {
        if let Some(until) = record.dismiss_until {
            if now < until {
                return Evaluation {
                    phase: BannerPhase::DismissedTemporary,
                    should_show: false,
                    is_dismissed: true,
                    record,
                };
            }
        }
        // Window elapsed (or the until marker was lost): lift the
        // suppression, keeping the dismissal counter.
        record.is_dismissed = false;
        record.dismiss_until = None;
    }

    Evaluation {
        phase: BannerPhase::Visible,
        should_show: true,
        is_dismissed: false,
        record,
    }
}

/// Apply a user dismissal at `now`: hides the banner for `window` and bumps
/// the dismissal counter.
pub fn dismiss(
    current: &DismissalRecord,
    now: DateTime<Utc>,
    window: Duration,
) -> DismissalRecord {
    DismissalRecord {
        is_dismissed: true,
        dismiss_until: Some(now + window),
        show_count: current.show_count.saturating_add(1),
    }
}

/// The zero record: visible, no window, counter cleared.
pub fn reset() -> DismissalRecord {
    DismissalRecord::default()
}
