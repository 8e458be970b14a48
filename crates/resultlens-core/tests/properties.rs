use proptest::prelude::*;

use resultlens_core::correlation::{correlation_matrix, NumericRecord};
use resultlens_core::distribution::{box_plot, histogram};
use resultlens_core::model::LearnerResult;
use resultlens_core::quality::{score_data_quality, QualityChecks};
use resultlens_core::statistics::calculate_statistics;

fn arb_sample() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1_000.0f64..1_000.0, 1..200)
}

fn arb_records() -> impl Strategy<Value = Vec<NumericRecord>> {
    prop::collection::vec((0.0f64..100.0, 0.0f64..10.0, 0.0f64..100.0), 1..60).prop_map(|rows| {
        rows.into_iter()
            .map(|(pct, cgpa, att)| {
                NumericRecord::from([
                    ("percentage".to_string(), pct),
                    ("cgpa".to_string(), cgpa),
                    ("attendance".to_string(), att),
                ])
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn bin_counts_sum_to_sample_size(values in arb_sample(), bins in 0usize..30) {
        let summary = histogram(&values, bins);
        let total: usize = summary.bins.iter().map(|b| b.count).sum();
        prop_assert_eq!(total, values.len());
        prop_assert_eq!(summary.count, values.len());
    }

    #[test]
    fn cumulative_percentage_is_monotone_and_ends_at_100(values in arb_sample(), bins in 1usize..30) {
        let summary = histogram(&values, bins);
        let mut previous = 0.0;
        for bin in &summary.bins {
            prop_assert!(bin.cumulative_percentage >= previous);
            previous = bin.cumulative_percentage;
        }
        prop_assert!((previous - 100.0).abs() < 1e-6);
    }

    #[test]
    fn percentiles_are_ordered(values in arb_sample()) {
        let m = calculate_statistics(&values);
        let p = m.percentiles;
        prop_assert!(p.p10 <= p.p25);
        prop_assert!(p.p25 <= p.p50);
        prop_assert!(p.p50 <= p.p75);
        prop_assert!(p.p75 <= p.p90);
        prop_assert!(m.range.min <= m.interquartile_range.q1);
        prop_assert!(m.interquartile_range.q1 <= m.median);
        prop_assert!(m.median <= m.interquartile_range.q3);
        prop_assert!(m.interquartile_range.q3 <= m.range.max);
    }

    #[test]
    fn constant_sample_has_no_spread(value in -1_000.0f64..1_000.0, n in 1usize..100) {
        let m = calculate_statistics(&vec![value; n]);
        prop_assert_eq!(m.standard_deviation, 0.0);
        prop_assert_eq!(m.variance, 0.0);
        prop_assert_eq!(m.skewness, 0.0);
        prop_assert_eq!(m.kurtosis, 0.0);
        prop_assert_eq!(m.coefficient_of_variation, 0.0);
    }

    #[test]
    fn box_plot_whiskers_stay_inside_fences(values in arb_sample()) {
        let b = box_plot(&values);
        prop_assert!(b.min >= b.lower_fence() - 1e-9);
        prop_assert!(b.max <= b.upper_fence() + 1e-9);
        for o in &b.outliers {
            prop_assert!(*o < b.lower_fence() || *o > b.upper_fence());
        }
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal(records in arb_records()) {
        let vars = ["percentage", "cgpa", "attendance"];
        let m = correlation_matrix(&records, &vars);
        prop_assert_eq!(m.matrix.len(), 3);
        for i in 0..3 {
            prop_assert_eq!(m.matrix[i][i], 1.0);
            for j in 0..3 {
                prop_assert_eq!(m.matrix[i][j], m.matrix[j][i]);
                prop_assert!((-1.0..=1.0).contains(&m.matrix[i][j]));
            }
        }
    }

    #[test]
    fn quality_scores_are_bounded(pcts in prop::collection::vec(prop::option::of(-20.0f64..120.0), 0..80)) {
        let records: Vec<LearnerResult> = pcts
            .into_iter()
            .enumerate()
            .map(|(i, pct)| LearnerResult {
                student_id: Some(format!("S{}", i % 7)),
                percentage: pct,
                ..Default::default()
            })
            .collect();
        let q = score_data_quality(&records, &QualityChecks::default());
        prop_assert!(q.data_completeness <= 100);
        prop_assert!(q.data_accuracy <= 100);
        prop_assert!(q.data_consistency <= 100);
        for m in &q.missing_values {
            prop_assert!(m.count <= records.len());
        }
    }
}

#[test]
fn empty_batch_scores_perfect() {
    let records: Vec<LearnerResult> = Vec::new();
    let q = score_data_quality(&records, &QualityChecks::default());
    assert_eq!(
        (q.data_completeness, q.data_accuracy, q.data_consistency),
        (100, 100, 100)
    );
    assert!(q.missing_values.is_empty());
}
