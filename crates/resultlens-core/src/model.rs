//! Input data model for resultlens.
//!
//! These types mirror the JSON returned by the results API: per-learner
//! result records and the pre-aggregated dashboard summaries at college,
//! program and subject level. Field names stay snake_case as served.

use serde::{Deserialize, Serialize};

/// A learner's published result for one examination session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearnerResult {
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub register_number: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub program_id: Option<String>,
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default)]
    pub semester: Option<u32>,
    #[serde(default)]
    pub cgpa: Option<f64>,
    /// Aggregate percentage across all courses, 0–100.
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// Headline figures for the whole college.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollegeSummary {
    #[serde(default)]
    pub total_students_appeared: u64,
    #[serde(default)]
    pub total_students_passed: u64,
    #[serde(default)]
    pub pass_percentage: Option<f64>,
    #[serde(default)]
    pub distinction_count: u64,
    #[serde(default)]
    pub first_class_count: u64,
    /// Share of learners carrying at least one backlog.
    #[serde(default)]
    pub backlog_percentage: Option<f64>,
    #[serde(default)]
    pub average_cgpa: Option<f64>,
}

/// Pass rate for one examination session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionTrend {
    #[serde(default)]
    pub academic_year: String,
    #[serde(default)]
    pub examination_session: String,
    #[serde(default)]
    pub pass_percentage: Option<f64>,
}

/// College-level dashboard payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollegeDashboard {
    #[serde(default)]
    pub summary: Option<CollegeSummary>,
    /// Sessions in chronological order, oldest first.
    #[serde(default)]
    pub trends: Vec<SessionTrend>,
}

/// A program performing below the college average.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeakProgram {
    pub program_id: String,
    pub program_code: String,
    pub program_name: String,
    #[serde(default)]
    pub pass_percentage: f64,
    #[serde(default)]
    pub college_average: f64,
    /// Percentage points below the college average.
    #[serde(default)]
    pub variance: f64,
    #[serde(default)]
    pub total_backlogs: u64,
    #[serde(default)]
    pub critical_subjects: Vec<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
}

/// Program-level dashboard payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramDashboard {
    /// Weakest first.
    #[serde(default)]
    pub weak_programs: Vec<WeakProgram>,
}

/// Per-course outcome summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub course_id: String,
    pub course_code: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub total_appeared: u64,
    #[serde(default)]
    pub pass_percentage: f64,
    #[serde(default)]
    pub fail_percentage: f64,
}

/// Subject-level dashboard payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectDashboard {
    /// Courses already filtered upstream by failure rate.
    #[serde(default)]
    pub difficult_subjects: Vec<SubjectSummary>,
}

/// Everything the insight rules may read. Each level is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightSources {
    pub college: Option<CollegeDashboard>,
    pub programs: Option<ProgramDashboard>,
    pub subjects: Option<SubjectDashboard>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learner_result_tolerates_sparse_records() {
        let r: LearnerResult =
            serde_json::from_str(r#"{"student_id": "S1", "percentage": 71.5}"#).unwrap();
        assert_eq!(r.student_id.as_deref(), Some("S1"));
        assert_eq!(r.percentage, Some(71.5));
        assert!(r.gender.is_none());
        assert!(r.cgpa.is_none());
    }

    #[test]
    fn college_dashboard_from_api_json() {
        let json = r#"{
            "summary": {
                "total_students_appeared": 420,
                "pass_percentage": 82.4,
                "distinction_count": 61,
                "backlog_percentage": 9.1
            },
            "trends": [
                {"academic_year": "2023-24", "examination_session": "Nov", "pass_percentage": 78.0},
                {"academic_year": "2024-25", "examination_session": "Apr", "pass_percentage": 82.4}
            ]
        }"#;
        let d: CollegeDashboard = serde_json::from_str(json).unwrap();
        let s = d.summary.unwrap();
        assert_eq!(s.total_students_appeared, 420);
        assert_eq!(s.total_students_passed, 0);
        assert_eq!(s.pass_percentage, Some(82.4));
        assert_eq!(d.trends.len(), 2);
        assert_eq!(d.trends[1].academic_year, "2024-25");
    }

    #[test]
    fn absent_rates_stay_absent() {
        let d: CollegeDashboard = serde_json::from_str(
            r#"{"summary": {"total_students_appeared": 100}, "trends": [{"academic_year": "2024-25"}]}"#,
        )
        .unwrap();
        let s = d.summary.unwrap();
        assert!(s.pass_percentage.is_none());
        assert!(s.backlog_percentage.is_none());
        assert!(d.trends[0].pass_percentage.is_none());
    }

    #[test]
    fn empty_dashboards_default() {
        let p: ProgramDashboard = serde_json::from_str("{}").unwrap();
        assert!(p.weak_programs.is_empty());
        let s: SubjectDashboard = serde_json::from_str("{}").unwrap();
        assert!(s.difficult_subjects.is_empty());
    }
}
