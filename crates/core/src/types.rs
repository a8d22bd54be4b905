//! Domain types for promotional campaigns and their persisted dismissal state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BannerResult;

/// A promotional campaign with a fixed retirement deadline.
///
/// The deadline is supplied by the host and held constant for the process
/// lifetime. It is never persisted alongside the dismissal record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub deadline: DateTime<Utc>,
}

impl Campaign {
    pub fn new(name: impl Into<String>, deadline: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            deadline,
        }
    }
}

/// Where the banner currently sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerPhase {
    Visible,
    DismissedTemporary,
    ExpiredPermanent,
}

/// Persisted dismissal state, stored as one JSON blob under a fixed key.
///
/// The wire layout is camelCase with RFC 3339 timestamps so records written
/// by earlier hosts keep parsing:
///
/// ```json
/// {"isDismissed":true,"dismissUntil":"2026-08-05T12:00:00Z","showCount":2}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DismissalRecord {
    /// Whether the banner is currently suppressed.
    #[serde(default)]
    pub is_dismissed: bool,
    /// Absolute time after which suppression lifts; `None` when not dismissed.
    #[serde(default)]
    pub dismiss_until: Option<DateTime<Utc>>,
    /// Cumulative dismissal count since the last reset.
    #[serde(default)]
    pub show_count: u32,
}

impl DismissalRecord {
    /// Serialize to the persisted JSON layout.
    pub fn to_json(&self) -> BannerResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a persisted JSON blob.
    pub fn from_json(raw: &str) -> BannerResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
