use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::mapping::{Recommendation, RiskLevel, Severity, confidence_for};
use crate::schema::BackendReview;

/// One flattened finding, categorized by the agent that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub category: String,
    pub severity: Severity,
    pub message: String,
}

/// Per-report code metrics. The backend does not supply these yet, so they
/// are always zero-filled, never fabricated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetrics {
    pub coverage: u32,
    pub tests_added: u32,
    pub tests_modified: u32,
    pub files_changed: u32,
}

/// A backend review normalized into the dashboard's report shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReport {
    pub id: String,
    pub pr_number: u64,
    pub pr_title: String,
    pub author: String,
    pub recommendation: Recommendation,
    pub confidence: u8,
    pub timestamp: String,
    pub metrics: ReportMetrics,
    pub findings: Vec<Finding>,
}

/// Expand per-agent finding lists into a flat list, preserving
/// (agent order, within-agent order). Categories are agent names verbatim;
/// severity comes from the agent's risk level.
pub fn flatten_findings(review: &BackendReview) -> Vec<Finding> {
    let mut findings = Vec::new();
    for agent in &review.agents {
        let severity = RiskLevel::from_backend(&agent.risk_level).severity();
        for message in &agent.findings {
            findings.push(Finding {
                category: agent.agent_name.clone(),
                severity,
                message: message.clone(),
            });
        }
    }
    findings
}

/// Parse a `generatedAt` value. Accepts RFC 3339 and bare calendar dates
/// (`"2024-01-01"`, midnight UTC); anything else is `None`.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    raw.parse::<NaiveDate>()
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// The generation instant embedded in a review, if it carries a usable one.
pub fn resolve_generated_at(review: &BackendReview) -> Option<DateTime<Utc>> {
    parse_instant(&review.metadata.generated_at)
}

/// Assemble the normalized report for one document. `now` anchors both the
/// relative timestamp display and the fallback generation instant.
pub fn assemble_report(
    review: &BackendReview,
    filename: &str,
    now: DateTime<Utc>,
) -> NormalizedReport {
    let generated = resolve_generated_at(review).unwrap_or(now);
    let (pr_number, pr_title, author) = resolve_pr_metadata(review, filename);
    let risk_levels: Vec<RiskLevel> = review
        .agents
        .iter()
        .map(|agent| RiskLevel::from_backend(&agent.risk_level))
        .collect();

    NormalizedReport {
        id: report_id(filename, generated),
        pr_number,
        pr_title,
        author,
        recommendation: Recommendation::from_backend(&review.overall_recommendation),
        confidence: confidence_for(&risk_levels),
        timestamp: format_relative(generated, now),
        metrics: ReportMetrics::default(),
        findings: flatten_findings(review),
    }
}

/// Stable identifier: filename stem plus the epoch-millis of the resolved
/// generation instant. Same (filename, generatedAt) pair, same id.
fn report_id(filename: &str, generated: DateTime<Utc>) -> String {
    let stem = filename.strip_suffix(".json").unwrap_or(filename);
    format!("{stem}-{}", generated.timestamp_millis())
}

/// Resolve (prNumber, prTitle, author). Embedded metadata wins when both
/// number and title are actually supplied; otherwise the first digit run in
/// the filename becomes the PR number and the title is synthesized.
fn resolve_pr_metadata(review: &BackendReview, filename: &str) -> (u64, String, String) {
    let author = review
        .author
        .clone()
        .unwrap_or_else(|| "unknown".to_string());

    let embedded = review
        .pr_number
        .filter(|&n| n > 0)
        .zip(review.pr_title.as_deref().filter(|t| !t.is_empty()));
    if let Some((number, title)) = embedded {
        return (number, title.to_string(), author);
    }

    let number = Regex::new(r"\d+")
        .unwrap()
        .find(filename)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .unwrap_or(0);
    let title = if number == 0 {
        "PR #Review".to_string()
    } else {
        format!("PR #{number}")
    };
    (number, title, author)
}

/// Human-relative display for a past instant. Boundaries are half-open on
/// the lower unit: exactly 60 elapsed minutes renders as hours.
pub fn format_relative(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(instant);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} minute{} ago", plural(minutes));
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{hours} hour{} ago", plural(hours));
    }
    let days = elapsed.num_days();
    if days < 7 {
        return format!("{days} day{} ago", plural(days));
    }
    instant.format("%-m/%-d/%Y").to_string()
}

fn plural(n: i64) -> &'static str {
    if n == 1 { "" } else { "s" }
}
