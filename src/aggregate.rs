use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::EstimationConfig;
use crate::report::NormalizedReport;
use crate::schema::BackendReview;

/// Batch-level dashboard metrics over the whole review corpus. Fractional
/// fields are pre-formatted strings, matching what the dashboard renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusMetrics {
    pub prs_analyzed: usize,
    pub avg_analysis_time_minutes: String,
    pub auto_approved_pct: String,
    pub engineering_hours_saved: String,
}

/// Compute metrics over all successfully parsed reviews. An empty corpus
/// yields `None`, the "no data" sentinel rather than an error.
pub fn corpus_metrics(
    reviews: &[&BackendReview],
    estimation: &EstimationConfig,
) -> Option<CorpusMetrics> {
    if reviews.is_empty() {
        return None;
    }

    let count = reviews.len();
    let total_ms: u64 = reviews.iter().map(|r| r.metadata.took_ms).sum();
    let avg_minutes = total_ms as f64 / count as f64 / 1000.0 / 60.0;

    let approved = reviews
        .iter()
        .filter(|r| r.overall_recommendation == "APPROVE")
        .count();
    let approved_pct = approved as f64 / count as f64 * 100.0;

    let hours_saved = count as f64 * estimation.hours_saved_per_review();

    Some(CorpusMetrics {
        prs_analyzed: count,
        avg_analysis_time_minutes: format!("{avg_minutes:.1}"),
        auto_approved_pct: format!("{approved_pct:.0}"),
        engineering_hours_saved: format!("{hours_saved:.0}"),
    })
}

/// Order assembled reports most-recently-generated first. The sort is
/// stable, so reports with equal instants keep their encounter order.
pub fn sort_reports(
    mut reports: Vec<(NormalizedReport, DateTime<Utc>)>,
) -> Vec<NormalizedReport> {
    reports.sort_by(|a, b| b.1.cmp(&a.1));
    reports.into_iter().map(|(report, _)| report).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::assemble_report;
    use crate::schema::BackendMetadata;
    use chrono::TimeZone;

    fn review(recommendation: &str, took_ms: u64) -> BackendReview {
        BackendReview {
            overall_recommendation: recommendation.to_string(),
            metadata: BackendMetadata {
                took_ms,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn metrics_for(reviews: &[BackendReview]) -> Option<CorpusMetrics> {
        let refs: Vec<&BackendReview> = reviews.iter().collect();
        corpus_metrics(&refs, &EstimationConfig::default())
    }

    #[test]
    fn test_empty_corpus_is_sentinel() {
        assert_eq!(metrics_for(&[]), None);
    }

    #[test]
    fn test_count() {
        let reviews = vec![review("APPROVE", 0), review("BLOCK", 0)];
        assert_eq!(metrics_for(&reviews).unwrap().prs_analyzed, 2);
    }

    #[test]
    fn test_avg_duration_one_decimal() {
        // (500 + 1500) / 2 / 1000 / 60 = 0.0166… → "0.0"
        let reviews = vec![review("APPROVE", 500), review("APPROVE", 1500)];
        assert_eq!(
            metrics_for(&reviews).unwrap().avg_analysis_time_minutes,
            "0.0"
        );
    }

    #[test]
    fn test_avg_duration_minutes_scale() {
        // 3 minutes and 6 minutes average to 4.5
        let reviews = vec![review("APPROVE", 180_000), review("APPROVE", 360_000)];
        assert_eq!(
            metrics_for(&reviews).unwrap().avg_analysis_time_minutes,
            "4.5"
        );
    }

    #[test]
    fn test_missing_took_ms_counts_as_zero() {
        let reviews = vec![review("APPROVE", 120_000), BackendReview::default()];
        assert_eq!(
            metrics_for(&reviews).unwrap().avg_analysis_time_minutes,
            "1.0"
        );
    }

    #[test]
    fn test_approved_percentage() {
        let reviews = vec![
            review("APPROVE", 0),
            review("REQUEST_CHANGES", 0),
            review("BLOCK", 0),
            review("BLOCK", 0),
        ];
        assert_eq!(metrics_for(&reviews).unwrap().auto_approved_pct, "25");
    }

    #[test]
    fn test_approved_matches_raw_value_exactly() {
        // Collapsed-to-BLOCK values and casing variants do not count
        let reviews = vec![review("approve", 0), review("APPROVED", 0)];
        assert_eq!(metrics_for(&reviews).unwrap().auto_approved_pct, "0");
    }

    #[test]
    fn test_hours_saved_uses_estimation_constant() {
        let reviews: Vec<BackendReview> = (0..20).map(|_| review("APPROVE", 0)).collect();
        // 20 reviews × 0.45 h
        let metrics = metrics_for(&reviews).unwrap();
        assert_eq!(metrics.engineering_hours_saved, "9");

        let reviews: Vec<BackendReview> = (0..100).map(|_| review("APPROVE", 0)).collect();
        assert_eq!(metrics_for(&reviews).unwrap().engineering_hours_saved, "45");
    }

    #[test]
    fn test_hours_saved_respects_config_override() {
        let reviews = vec![review("APPROVE", 0); 4];
        let refs: Vec<&BackendReview> = reviews.iter().collect();
        let estimation = EstimationConfig {
            manual_review_minutes: 63.0,
            automated_review_minutes: 3.0,
        };
        let metrics = corpus_metrics(&refs, &estimation).unwrap();
        assert_eq!(metrics.engineering_hours_saved, "4");
    }

    #[test]
    fn test_metrics_serialize_dashboard_field_names() {
        let reviews = vec![review("APPROVE", 60_000)];
        let json = serde_json::to_value(metrics_for(&reviews).unwrap()).unwrap();
        assert_eq!(json["prsAnalyzed"], 1);
        assert_eq!(json["avgAnalysisTimeMinutes"], "1.0");
        assert_eq!(json["autoApprovedPct"], "100");
        assert_eq!(json["engineeringHoursSaved"], "0");
    }

    // --- ordering ---

    fn dated_report(filename: &str, ts: &str) -> (NormalizedReport, DateTime<Utc>) {
        let review = BackendReview {
            metadata: BackendMetadata {
                generated_at: ts.to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let instant = crate::report::resolve_generated_at(&review).unwrap_or(DateTime::UNIX_EPOCH);
        (assemble_report(&review, filename, now), instant)
    }

    #[test]
    fn test_sort_most_recent_first() {
        let sorted = sort_reports(vec![
            dated_report("t1.json", "2024-01-01T00:00:00Z"),
            dated_report("t3.json", "2024-03-01T00:00:00Z"),
            dated_report("t2.json", "2024-02-01T00:00:00Z"),
        ]);
        let ids: Vec<&str> = sorted
            .iter()
            .map(|r| r.id.split('-').next().unwrap())
            .collect();
        assert_eq!(ids, ["t3", "t2", "t1"]);
    }

    #[test]
    fn test_sort_missing_timestamp_goes_last() {
        let sorted = sort_reports(vec![
            dated_report("undated.json", ""),
            dated_report("dated.json", "2024-01-01T00:00:00Z"),
        ]);
        assert!(sorted[0].id.starts_with("dated-"));
        assert!(sorted[1].id.starts_with("undated-"));
    }

    #[test]
    fn test_sort_ties_keep_encounter_order() {
        let sorted = sort_reports(vec![
            dated_report("first.json", "2024-01-01T00:00:00Z"),
            dated_report("second.json", "2024-01-01T00:00:00Z"),
            dated_report("third.json", "2024-01-01T00:00:00Z"),
        ]);
        assert!(sorted[0].id.starts_with("first-"));
        assert!(sorted[1].id.starts_with("second-"));
        assert!(sorted[2].id.starts_with("third-"));
    }
}
