//! Rule-based insights over pre-aggregated dashboard summaries.
//!
//! Each rule looks at [`InsightSources`] and yields at most one [`Insight`].
//! Rules run in a fixed order and the result is stably sorted by priority,
//! so insights of equal priority keep rule order.

use serde::{Deserialize, Serialize};

use crate::model::InsightSources;

/// Default number of insights shown on a dashboard.
pub const DEFAULT_MAX_INSIGHTS: usize = 6;

/// Most course codes named in the difficult-subjects insight.
const MAX_LISTED_SUBJECTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Success,
    Warning,
    Danger,
    Info,
    Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Performance,
    Pattern,
    Anomaly,
    Recommendation,
    Trend,
}

/// Insight priority. Orders `High < Medium < Low` so an ascending sort puts
/// the most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Increase,
    Decrease,
    Stable,
}

/// The headline number behind an insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightMetric {
    pub label: String,
    /// Display value, already formatted to one decimal.
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<ChangeType>,
}

impl InsightMetric {
    fn percent(label: &str, value: f64) -> Self {
        Self {
            label: label.to_string(),
            value: format!("{value:.1}"),
            unit: Some("%".into()),
            change: None,
            change_type: None,
        }
    }

    fn with_change(mut self, change: f64, change_type: ChangeType) -> Self {
        self.change = Some(change);
        self.change_type = Some(change_type);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Program,
    Subject,
    Batch,
    Student,
    Institution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedEntity {
    #[serde(rename = "type")]
    pub kind: EntityType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A human-readable finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub category: InsightCategory,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<InsightMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_entity: Option<AffectedEntity>,
    pub priority: Priority,
    pub actionable: bool,
}

/// Cut-offs used by the rules. All values are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightThresholds {
    /// Pass rate at or above which the college is doing well.
    pub excellent_pass_rate: f64,
    /// Pass rate below which intervention is flagged.
    pub target_pass_rate: f64,
    pub distinction_rate: f64,
    /// Backlog share above which an anomaly is raised.
    pub backlog_rate: f64,
    /// Session-over-session change in pass rate that counts as a trend.
    pub trend_change: f64,
    /// Failure rate the upstream subject filter applies. Only quoted in text.
    pub difficult_subject_fail_rate: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            excellent_pass_rate: 90.0,
            target_pass_rate: 70.0,
            distinction_rate: 20.0,
            backlog_rate: 15.0,
            trend_change: 5.0,
            difficult_subject_fail_rate: 30.0,
        }
    }
}

type Rule = fn(&InsightSources, &InsightThresholds) -> Option<Insight>;

const RULES: &[Rule] = &[
    pass_rate_rule,
    distinction_rule,
    backlog_rule,
    weak_program_rule,
    difficult_subjects_rule,
    trend_rule,
];

/// Run every rule over `sources` and return the findings, most urgent first.
pub fn generate_insights(sources: &InsightSources, thresholds: &InsightThresholds) -> Vec<Insight> {
    let mut insights: Vec<Insight> = RULES
        .iter()
        .filter_map(|rule| rule(sources, thresholds))
        .collect();
    insights.sort_by_key(|i| i.priority);
    tracing::debug!(
        count = insights.len(),
        high = insights.iter().filter(|i| i.priority == Priority::High).count(),
        "insights generated"
    );
    insights
}

/// Keep at most `max` insights. Input is expected in priority order.
pub fn truncate_insights(mut insights: Vec<Insight>, max: usize) -> Vec<Insight> {
    insights.truncate(max);
    insights
}

fn pass_rate_rule(sources: &InsightSources, t: &InsightThresholds) -> Option<Insight> {
    let summary = sources.college.as_ref()?.summary.as_ref()?;
    let pass = summary.pass_percentage?;
    if pass >= t.excellent_pass_rate {
        Some(Insight {
            id: "high-pass-rate".into(),
            kind: InsightType::Success,
            category: InsightCategory::Performance,
            title: "Excellent Pass Rate".into(),
            description: format!(
                "Overall pass rate of {pass:.1}% exceeds benchmark. This indicates effective teaching and learning outcomes."
            ),
            metric: Some(InsightMetric::percent("Pass Rate", pass)),
            recommendation: None,
            affected_entity: None,
            priority: Priority::Low,
            actionable: false,
        })
    } else if pass < t.target_pass_rate {
        let target = t.target_pass_rate;
        Some(Insight {
            id: "low-pass-rate".into(),
            kind: InsightType::Danger,
            category: InsightCategory::Performance,
            title: "Pass Rate Below Target".into(),
            description: format!(
                "Overall pass rate of {pass:.1}% is below the {target:.0}% target. Immediate intervention may be required."
            ),
            metric: Some(
                InsightMetric::percent("Pass Rate", pass)
                    .with_change(pass - target, ChangeType::Decrease),
            ),
            recommendation: Some(
                "Analyze subject-wise performance to identify specific areas needing improvement. Consider remedial classes for at-risk students.".into(),
            ),
            affected_entity: None,
            priority: Priority::High,
            actionable: true,
        })
    } else {
        None
    }
}

fn distinction_rule(sources: &InsightSources, t: &InsightThresholds) -> Option<Insight> {
    let summary = sources.college.as_ref()?.summary.as_ref()?;
    if summary.total_students_appeared == 0 {
        return None;
    }
    let rate = summary.distinction_count as f64 / summary.total_students_appeared as f64 * 100.0;
    (rate >= t.distinction_rate).then(|| Insight {
        id: "high-distinction".into(),
        kind: InsightType::Success,
        category: InsightCategory::Performance,
        title: "High Distinction Achievement".into(),
        description: format!(
            "{rate:.1}% students achieved distinction. This is an indicator of academic excellence."
        ),
        metric: Some(InsightMetric::percent("Distinction Rate", rate)),
        recommendation: None,
        affected_entity: None,
        priority: Priority::Low,
        actionable: false,
    })
}

fn backlog_rule(sources: &InsightSources, t: &InsightThresholds) -> Option<Insight> {
    let summary = sources.college.as_ref()?.summary.as_ref()?;
    let backlog = summary.backlog_percentage?;
    (backlog > t.backlog_rate).then(|| Insight {
        id: "high-backlogs".into(),
        kind: InsightType::Warning,
        category: InsightCategory::Anomaly,
        title: "High Backlog Rate Detected".into(),
        description: format!(
            "{backlog:.1}% of students have backlogs, affecting timely graduation."
        ),
        metric: Some(InsightMetric::percent("Backlog Rate", backlog)),
        recommendation: Some(
            "Schedule supplementary examinations and provide additional support for students with backlogs.".into(),
        ),
        affected_entity: None,
        priority: Priority::Medium,
        actionable: true,
    })
}

fn weak_program_rule(sources: &InsightSources, _: &InsightThresholds) -> Option<Insight> {
    let program = sources.programs.as_ref()?.weak_programs.first()?;
    let gap = program.variance.abs();
    Some(Insight {
        id: "weak-program".into(),
        kind: InsightType::Danger,
        category: InsightCategory::Performance,
        title: "Program Performance Alert".into(),
        description: format!(
            "{} is performing {gap:.1}% below college average.",
            program.program_name
        ),
        metric: Some(
            InsightMetric::percent("Pass Rate", program.pass_percentage)
                .with_change(-program.variance, ChangeType::Decrease),
        ),
        recommendation: Some(
            program
                .recommendation
                .clone()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| {
                    "Review curriculum and teaching methodology for this program.".into()
                }),
        ),
        affected_entity: Some(AffectedEntity {
            kind: EntityType::Program,
            name: program.program_code.clone(),
            id: Some(program.program_id.clone()),
        }),
        priority: Priority::High,
        actionable: true,
    })
}

fn difficult_subjects_rule(sources: &InsightSources, t: &InsightThresholds) -> Option<Insight> {
    let subjects = &sources.subjects.as_ref()?.difficult_subjects;
    if subjects.is_empty() {
        return None;
    }
    let listed = &subjects[..subjects.len().min(MAX_LISTED_SUBJECTS)];
    let codes: Vec<&str> = listed.iter().map(|s| s.course_code.as_str()).collect();
    Some(Insight {
        id: "difficult-subjects".into(),
        kind: InsightType::Warning,
        category: InsightCategory::Pattern,
        title: "High-Difficulty Subjects Identified".into(),
        description: format!(
            "{} subjects have failure rates above {:.0}%: {}",
            listed.len(),
            t.difficult_subject_fail_rate,
            codes.join(", ")
        ),
        metric: None,
        recommendation: Some(
            "Consider additional tutorials, bridge courses, or revision of question paper difficulty for these subjects.".into(),
        ),
        affected_entity: None,
        priority: Priority::Medium,
        actionable: true,
    })
}

fn trend_rule(sources: &InsightSources, t: &InsightThresholds) -> Option<Insight> {
    let trends = &sources.college.as_ref()?.trends;
    let [.., previous, latest] = trends.as_slice() else {
        return None;
    };
    let change = latest.pass_percentage? - previous.pass_percentage?;
    if change.abs() <= t.trend_change {
        return None;
    }
    let improved = change > 0.0;
    let metric = InsightMetric::percent("Change", change.abs()).with_change(
        change,
        if improved {
            ChangeType::Increase
        } else {
            ChangeType::Decrease
        },
    );
    Some(Insight {
        id: "trend-change".into(),
        kind: if improved {
            InsightType::Success
        } else {
            InsightType::Warning
        },
        category: InsightCategory::Trend,
        title: if improved {
            "Positive Performance Trend"
        } else {
            "Declining Performance Trend"
        }
        .into(),
        description: format!(
            "Pass percentage {} by {:.1}% compared to previous session.",
            if improved { "improved" } else { "decreased" },
            change.abs()
        ),
        metric: Some(metric),
        recommendation: (!improved).then(|| {
            "Investigate factors contributing to the decline and implement corrective measures."
                .to_string()
        }),
        affected_entity: None,
        priority: if improved { Priority::Low } else { Priority::High },
        actionable: !improved,
    })
}
