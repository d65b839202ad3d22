//! Reading and status record types.
//!
//! A [`Reading`] is one parsed observation from the scale log. A
//! [`StatusRecord`] pairs the latest reading with the scale identifier and is
//! the unit that gets published to every renderer. Both are immutable once
//! built; updates always construct a new value.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::{palette, Color};

/// Scale identifier used when no settings file provides one
pub const DEFAULT_SCALE_ID: &str = "scale-001";

/// Unit assumed when a log line carries only a value
pub const DEFAULT_UNIT: &str = "lb";

/// Value shown before the first reading arrives
pub const PLACEHOLDER_VALUE: &str = "----.--";

/// Status of a reading as shown on the badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadingStatus {
    Stable,
    Motion,
    Error,
    NoData,
}

impl ReadingStatus {
    /// Badge text for this status
    pub fn label(&self) -> &'static str {
        match self {
            ReadingStatus::Stable => "STABLE",
            ReadingStatus::Motion => "MOTION",
            ReadingStatus::Error => "ERROR",
            ReadingStatus::NoData => "NO DATA",
        }
    }

    /// Parse a badge label (case-insensitive). Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "STABLE" => Some(ReadingStatus::Stable),
            "MOTION" => Some(ReadingStatus::Motion),
            "ERROR" => Some(ReadingStatus::Error),
            "NO DATA" | "NO_DATA" => Some(ReadingStatus::NoData),
            _ => None,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            ReadingStatus::Stable => palette::STATUS_STABLE,
            ReadingStatus::Motion => palette::STATUS_MOTION,
            ReadingStatus::Error => palette::STATUS_ERROR,
            ReadingStatus::NoData => palette::STATUS_NO_DATA,
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Badge color for an arbitrary status label.
///
/// Total over all strings: anything unrecognized gets the NO DATA gray.
pub fn status_color(label: &str) -> Color {
    ReadingStatus::from_label(label)
        .map(|status| status.color())
        .unwrap_or(palette::STATUS_NO_DATA)
}

/// One observation of the scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Value exactly as it appeared in the source (not necessarily numeric)
    value: String,
    unit: String,
    status: ReadingStatus,
    observed_at: DateTime<Local>,
}

impl Reading {
    pub fn new(
        value: impl Into<String>,
        unit: impl Into<String>,
        status: ReadingStatus,
        observed_at: DateTime<Local>,
    ) -> Self {
        Self {
            value: value.into(),
            unit: unit.into(),
            status,
            observed_at,
        }
    }

    /// The "no reading yet" value shown at startup
    pub fn no_data(observed_at: DateTime<Local>) -> Self {
        Self::new(
            PLACEHOLDER_VALUE,
            DEFAULT_UNIT,
            ReadingStatus::NoData,
            observed_at,
        )
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn status(&self) -> ReadingStatus {
        self.status
    }

    pub fn observed_at(&self) -> DateTime<Local> {
        self.observed_at
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] @ {}",
            self.value,
            self.unit,
            self.status,
            self.observed_at.format("%H:%M:%S%.3f")
        )
    }
}

/// Complete snapshot published to renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    reading: Reading,
    scale_id: String,
}

impl StatusRecord {
    pub fn new(reading: Reading, scale_id: impl Into<String>) -> Self {
        Self {
            reading,
            scale_id: scale_id.into(),
        }
    }

    /// Startup record: no data yet, stamped with the current time
    pub fn initial(scale_id: impl Into<String>) -> Self {
        Self::new(Reading::no_data(Local::now()), scale_id)
    }

    /// New record carrying `reading` and this record's scale id
    pub fn with_reading(&self, reading: Reading) -> Self {
        Self::new(reading, self.scale_id.clone())
    }

    pub fn reading(&self) -> &Reading {
        &self.reading
    }

    pub fn scale_id(&self) -> &str {
        &self.scale_id
    }
}
