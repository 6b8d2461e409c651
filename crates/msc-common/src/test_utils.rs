//! Test utilities and shared fixtures for the msc-chart workspace.

use crate::{ProposalRecord, Stage};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call multiple times.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Test fixture for creating a mock timestamp.
pub fn mock_timestamp(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}

/// A record created at noon on the given day.
pub fn record(number: u64, (year, month, day): (i32, u32, u32), stage: Stage) -> ProposalRecord {
    ProposalRecord::new(
        number,
        format!("MSC{number}: test proposal"),
        mock_timestamp(year, month, day, 12, 0, 0),
        stage,
    )
}

/// A small mixed history spanning a year boundary with an empty month.
pub fn sample_records() -> Vec<ProposalRecord> {
    vec![
        record(1, (2020, 11, 3), Stage::Merged),
        record(2, (2020, 11, 20), Stage::New),
        record(3, (2021, 1, 7), Stage::Closed),
        record(4, (2021, 1, 8), Stage::Fcp),
        record(5, (2021, 2, 1), Stage::New),
        record(6, (2021, 2, 28), Stage::Postponed),
    ]
}

/// Property-based testing strategies.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for any lifecycle stage.
    pub fn stage_strategy() -> impl Strategy<Value = Stage> {
        prop::sample::select(Stage::ALL.to_vec())
    }

    /// Strategy for a record created between 2014 and 2025.
    pub fn record_strategy() -> impl Strategy<Value = ProposalRecord> {
        (1u64..10_000, 2014i32..2026, 1u32..=12, 1u32..=28, stage_strategy()).prop_map(
            |(number, year, month, day, stage)| record(number, (year, month, day), stage),
        )
    }

    /// Strategy for record sets of up to `max` records.
    pub fn records_strategy(max: usize) -> impl Strategy<Value = Vec<ProposalRecord>> {
        prop::collection::vec(record_strategy(), 0..=max)
    }
}
