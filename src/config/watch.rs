// src/config/watch.rs
use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::DateRange;

/// Fallback label when a hotel has no configured location.
pub const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: String,
    #[serde(default)]
    pub location: String,
}

impl Hotel {
    pub fn new(id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
        }
    }

    pub fn location_or_unknown(&self) -> &str {
        let loc = self.location.trim();
        if loc.is_empty() {
            UNKNOWN_LOCATION
        } else {
            loc
        }
    }
}

/// Party size sent with every availability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupancy {
    pub adult: u8,
    pub child: u8,
}

impl Default for Occupancy {
    fn default() -> Self {
        Self { adult: 2, child: 0 }
    }
}

/// What to watch: hotels (in query order), check-in range and the dates that alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub hotels: Vec<Hotel>,
    pub checkin: DateRange,
    pub watch_dates: BTreeSet<NaiveDate>,
    pub occupancy: Occupancy,
}

impl WatchConfig {
    pub fn new(
        hotels: Vec<Hotel>,
        checkin: DateRange,
        watch_dates: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        Self {
            hotels,
            checkin,
            watch_dates: watch_dates.into_iter().collect(),
            occupancy: Occupancy::default(),
        }
    }

    pub fn is_watched(&self, d: NaiveDate) -> bool {
        self.watch_dates.contains(&d)
    }

    /// Watched dates that the check-in range never reaches. Worth a warning at startup.
    pub fn unreachable_watch_dates(&self) -> Vec<NaiveDate> {
        self.watch_dates
            .iter()
            .copied()
            .filter(|d| !self.checkin.contains(*d))
            .collect()
    }
}

impl Default for WatchConfig {
    /// The Satkosia / Konark / Sonapur Christmas-week watch.
    fn default() -> Self {
        let ymd = |m: u32, d: u32| {
            NaiveDate::from_ymd_opt(2025, m, d).unwrap_or(NaiveDate::MIN)
        };
        Self::new(
            vec![
                Hotel::new("41", "Satkosia"),
                Hotel::new("37", "Konark"),
                Hotel::new("43", "Sonapur"),
            ],
            DateRange::new(ymd(12, 19), ymd(12, 24)),
            [ymd(12, 20), ymd(12, 21), ymd(12, 22), ymd(12, 23)],
        )
    }
}
