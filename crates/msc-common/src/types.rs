//! Proposal records, lifecycle stages and calendar months.

use crate::error::MscError;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of a proposal, read from its latest snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Proposed and open, not yet in review
    New,
    /// In final comment period
    Fcp,
    /// Accepted and merged into the spec
    Merged,
    /// Review finished with a disposition to postpone
    Postponed,
    /// Rejected, abandoned or otherwise closed without merging
    Closed,
}

impl Stage {
    /// Every stage, in chart display order.
    pub const ALL: [Stage; 5] = [
        Stage::New,
        Stage::Merged,
        Stage::Closed,
        Stage::Fcp,
        Stage::Postponed,
    ];

    /// Human readable name used in legends and pie labels
    pub fn display_name(self) -> &'static str {
        match self {
            Stage::New => "New",
            Stage::Fcp => "FCP",
            Stage::Merged => "Merged",
            Stage::Postponed => "Postponed",
            Stage::Closed => "Closed",
        }
    }

    /// Default hex colour for this stage
    pub fn default_color(self) -> &'static str {
        match self {
            Stage::New => "#28a745",
            Stage::Fcp => "#ffd700",
            Stage::Merged => "#6f42c1",
            Stage::Postponed => "#808080",
            Stage::Closed => "#ce303d",
        }
    }

    /// Position in [`Stage::ALL`]
    pub fn display_index(self) -> usize {
        match self {
            Stage::New => 0,
            Stage::Merged => 1,
            Stage::Closed => 2,
            Stage::Fcp => 3,
            Stage::Postponed => 4,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Snapshot of a single proposal as fetched from the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRecord {
    /// Issue or pull request number
    pub number: u64,
    /// Proposal title
    pub title: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Stage at fetch time
    pub stage: Stage,
}

impl ProposalRecord {
    /// Creates a record.
    pub fn new(number: u64, title: impl Into<String>, created_at: DateTime<Utc>, stage: Stage) -> Self {
        Self {
            number,
            title: title.into(),
            created_at,
            stage,
        }
    }

    /// Calendar month the proposal was created in (UTC)
    pub fn creation_month(&self) -> Month {
        Month::from_datetime(&self.created_at)
    }
}

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Creates a month, returning `None` unless `month` is 1-12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Month containing the given timestamp
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
        }
    }

    /// Calendar year
    pub fn year(self) -> i32 {
        self.year
    }

    /// Month of the year, 1-12
    pub fn month(self) -> u32 {
        self.month
    }

    /// The following month
    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// First day of the month
    pub fn first_day(self) -> NaiveDate {
        // year/month are validated on construction and day 1 always exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Short axis label, e.g. `Jan 2021`
    pub fn short_label(self) -> String {
        self.first_day().format("%b %Y").to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = MscError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MscError::validation(format!("Invalid month '{s}', expected YYYY-MM"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        crate::ensure!(
            year.len() == 4 && month.len() == 2,
            "Invalid month '{}', expected YYYY-MM",
            s
        );
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Month::new(year, month).ok_or_else(invalid)
    }
}
