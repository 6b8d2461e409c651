//! Aggregation of proposal records into per-stage chart series

use crate::{ChartType, MonthlyCount, Series};
use msc_common::{Month, ProposalRecord, Stage};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Trait for aggregating proposal records into chart series
pub trait DataAggregator {
    /// Turn a full record set into the series for one chart.
    ///
    /// An empty record set yields an empty collection.
    fn aggregate(&self, records: &[ProposalRecord]) -> Vec<Series>;
}

/// Cumulative monthly counts per stage, for stacked-area charts.
///
/// Each record counts under its current stage from its creation month
/// onwards. Months between the first and last creation month are all
/// present, carrying the running totals forward.
#[derive(Debug, Clone, Default)]
pub struct StackedAreaAggregator {
    /// Months before this one are dropped from the output but still count
    pub history_start: Option<Month>,
}

impl StackedAreaAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_start(history_start: Month) -> Self {
        Self {
            history_start: Some(history_start),
        }
    }
}

impl DataAggregator for StackedAreaAggregator {
    #[instrument(skip_all, fields(records = records.len()))]
    fn aggregate(&self, records: &[ProposalRecord]) -> Vec<Series> {
        // New records per creation month, indexed by display position
        let mut created: BTreeMap<Month, [u64; Stage::ALL.len()]> = BTreeMap::new();
        for record in records {
            created.entry(record.creation_month()).or_default()[record.stage.display_index()] += 1;
        }

        let (Some(&first), Some(&last)) = (created.keys().next(), created.keys().next_back()) else {
            return Vec::new();
        };

        let mut points: Vec<Vec<MonthlyCount>> = vec![Vec::new(); Stage::ALL.len()];
        let mut running = [0u64; Stage::ALL.len()];
        let mut month = first;
        loop {
            if let Some(new) = created.get(&month) {
                for (total, added) in running.iter_mut().zip(new) {
                    *total += added;
                }
            }

            if self.history_start.map_or(true, |start| month >= start) {
                for (series, &count) in points.iter_mut().zip(&running) {
                    series.push(MonthlyCount { month, count });
                }
            }

            if month == last {
                break;
            }
            month = month.succ();
        }

        if points[0].is_empty() {
            debug!(history_start = ?self.history_start, "No months left after history start");
            return Vec::new();
        }

        debug!(months = points[0].len(), %first, %last, "Aggregated stacked area series");
        Stage::ALL
            .into_iter()
            .zip(points)
            .map(|(stage, points)| Series::monthly(stage, points))
            .collect()
    }
}

/// Current totals per stage, for pie charts. Stages without records are omitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieAggregator;

impl DataAggregator for PieAggregator {
    #[instrument(skip_all, fields(records = records.len()))]
    fn aggregate(&self, records: &[ProposalRecord]) -> Vec<Series> {
        let mut totals = [0u64; Stage::ALL.len()];
        for record in records {
            totals[record.stage.display_index()] += 1;
        }

        Stage::ALL
            .into_iter()
            .zip(totals)
            .filter(|&(_, count)| count > 0)
            .map(|(stage, count)| Series::total(stage, count))
            .collect()
    }
}

/// Picks the aggregation for a chart type
#[derive(Debug, Clone, Default)]
pub struct ChartAggregator {
    stacked_area: StackedAreaAggregator,
}

impl ChartAggregator {
    pub fn new(history_start: Option<Month>) -> Self {
        Self {
            stacked_area: StackedAreaAggregator { history_start },
        }
    }

    /// Aggregate `records` for `chart_type`
    pub fn aggregate(&self, chart_type: ChartType, records: &[ProposalRecord]) -> Vec<Series> {
        match chart_type {
            ChartType::StackedArea => self.stacked_area.aggregate(records),
            ChartType::Pie => PieAggregator.aggregate(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SeriesValues;
    use msc_common::test_utils::{record, sample_records};

    fn month(year: i32, month: u32) -> Month {
        Month::new(year, month).unwrap()
    }

    fn counts(series: &Series) -> Vec<u64> {
        series.points().iter().map(|p| p.count).collect()
    }

    #[test]
    fn test_stacked_area_fills_gaps_and_accumulates() {
        let series = StackedAreaAggregator::new().aggregate(&sample_records());

        let stages: Vec<Stage> = series.iter().map(|s| s.stage).collect();
        assert_eq!(stages, Stage::ALL.to_vec());

        let months: Vec<Month> = series[0].points().iter().map(|p| p.month).collect();
        assert_eq!(
            months,
            vec![month(2020, 11), month(2020, 12), month(2021, 1), month(2021, 2)]
        );

        let by_stage = |stage: Stage| counts(&series[stage.display_index()]);
        assert_eq!(by_stage(Stage::New), vec![1, 1, 1, 2]);
        assert_eq!(by_stage(Stage::Merged), vec![1, 1, 1, 1]);
        assert_eq!(by_stage(Stage::Closed), vec![0, 0, 1, 1]);
        assert_eq!(by_stage(Stage::Fcp), vec![0, 0, 1, 1]);
        assert_eq!(by_stage(Stage::Postponed), vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_stacked_area_keeps_all_zero_stages() {
        let records = vec![record(1, (2019, 6, 1), Stage::New), record(2, (2019, 7, 1), Stage::New)];
        let series = StackedAreaAggregator::new().aggregate(&records);

        assert_eq!(series.len(), Stage::ALL.len());
        assert_eq!(counts(&series[Stage::New.display_index()]), vec![1, 2]);
        assert_eq!(counts(&series[Stage::Merged.display_index()]), vec![0, 0]);
    }

    #[test]
    fn test_stacked_area_uses_utc_month() {
        let mut late = record(1, (2021, 1, 31), Stage::New);
        late.created_at = msc_common::test_utils::mock_timestamp(2021, 1, 31, 23, 59, 59);
        let series = StackedAreaAggregator::new().aggregate(&[late]);

        assert_eq!(series[0].points()[0].month, month(2021, 1));
        assert_eq!(series[0].points().len(), 1);
    }

    #[test]
    fn test_history_start_drops_months_but_keeps_counts() {
        let aggregator = StackedAreaAggregator::with_history_start(month(2021, 1));
        let series = aggregator.aggregate(&sample_records());

        let months: Vec<Month> = series[0].points().iter().map(|p| p.month).collect();
        assert_eq!(months, vec![month(2021, 1), month(2021, 2)]);

        // Records from 2020 are still part of the running totals
        assert_eq!(counts(&series[Stage::New.display_index()]), vec![1, 2]);
        assert_eq!(counts(&series[Stage::Merged.display_index()]), vec![1, 1]);
    }

    #[test]
    fn test_history_start_after_all_records() {
        let aggregator = StackedAreaAggregator::with_history_start(month(2030, 1));
        assert!(aggregator.aggregate(&sample_records()).is_empty());
    }

    #[test]
    fn test_pie_totals_in_display_order() {
        let mut records = sample_records();
        records.push(record(7, (2021, 3, 1), Stage::Merged));
        let series = PieAggregator.aggregate(&records);

        let totals: Vec<(Stage, u64)> = series.iter().map(|s| (s.stage, s.latest())).collect();
        assert_eq!(
            totals,
            vec![
                (Stage::New, 2),
                (Stage::Merged, 2),
                (Stage::Closed, 1),
                (Stage::Fcp, 1),
                (Stage::Postponed, 1),
            ]
        );
        assert!(series.iter().all(|s| matches!(s.values, SeriesValues::Total(_))));
    }

    #[test]
    fn test_pie_omits_empty_stages() {
        let records = vec![record(1, (2020, 1, 1), Stage::Merged), record(2, (2020, 2, 1), Stage::Merged)];
        let series = PieAggregator.aggregate(&records);

        assert_eq!(series, vec![Series::total(Stage::Merged, 2)]);
    }

    #[test]
    fn test_empty_records() {
        assert!(StackedAreaAggregator::new().aggregate(&[]).is_empty());
        assert!(PieAggregator.aggregate(&[]).is_empty());
    }

    #[test]
    fn test_chart_aggregator_dispatch() {
        let aggregator = ChartAggregator::new(None);
        let records = sample_records();

        assert!(aggregator
            .aggregate(ChartType::Pie, &records)
            .iter()
            .all(|s| s.points().is_empty()));
        assert!(aggregator
            .aggregate(ChartType::StackedArea, &records)
            .iter()
            .all(|s| s.points().len() == 4));
    }

    mod properties {
        use super::*;
        use msc_common::test_utils::property_testing::records_strategy;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn pie_total_equals_record_count(records in records_strategy(60)) {
                let total: u64 = PieAggregator.aggregate(&records).iter().map(Series::latest).sum();
                prop_assert_eq!(total, records.len() as u64);
            }

            #[test]
            fn final_stacked_counts_match_pie(records in records_strategy(60)) {
                let stacked = StackedAreaAggregator::new().aggregate(&records);
                let pie = PieAggregator.aggregate(&records);

                for slice in &pie {
                    let band = stacked.iter().find(|s| s.stage == slice.stage).unwrap();
                    prop_assert_eq!(band.latest(), slice.latest());
                }
                for band in &stacked {
                    if band.latest() == 0 {
                        prop_assert!(pie.iter().all(|s| s.stage != band.stage));
                    }
                }
            }

            #[test]
            fn stacked_months_contiguous_and_counts_monotonic(records in records_strategy(60)) {
                for series in StackedAreaAggregator::new().aggregate(&records) {
                    for pair in series.points().windows(2) {
                        prop_assert_eq!(pair[0].month.succ(), pair[1].month);
                        prop_assert!(pair[0].count <= pair[1].count);
                    }
                }
            }
        }
    }
}
