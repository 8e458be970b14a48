//! End-to-end report pipeline: records and dashboards in, report files out.

use std::path::Path;

use assert_cmd::Command;
use resultlens_core::report::AnalyticsReport;

fn resultlens() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("resultlens").unwrap();
    cmd.env_remove("RESULTLENS_BINS")
        .env_remove("RESULTLENS_MAX_INSIGHTS");
    cmd
}

fn write_fixtures(dir: &Path) {
    let records: Vec<serde_json::Value> = (0..40)
        .map(|i| {
            let pct = 30.0 + (i * 17 % 70) as f64;
            serde_json::json!({
                "student_id": format!("S{i:03}"),
                "percentage": pct,
                "cgpa": pct / 10.0,
                "program_id": if i % 2 == 0 { "BSC" } else { "BA" },
                "semester": 5,
                "gender": if i % 5 == 0 { serde_json::Value::Null } else { "F".into() },
            })
        })
        .collect();
    std::fs::write(
        dir.join("results.json"),
        serde_json::to_string(&serde_json::json!({ "records": records })).unwrap(),
    )
    .unwrap();

    std::fs::write(
        dir.join("college.json"),
        r#"{"summary": {"total_students_appeared": 40, "pass_percentage": 93.0, "distinction_count": 12, "backlog_percentage": 3.0},
            "trends": [{"academic_year": "2023-24", "examination_session": "Nov", "pass_percentage": 95.0},
                       {"academic_year": "2024-25", "examination_session": "Nov", "pass_percentage": 86.0}]}"#,
    )
    .unwrap();

    std::fs::write(
        dir.join("programs.json"),
        r#"{"weak_programs": [{"program_id": "p-ba", "program_code": "BA", "program_name": "B.A. English",
            "pass_percentage": 71.0, "college_average": 86.0, "variance": 15.0,
            "recommendation": "Pair first-years with peer mentors."}]}"#,
    )
    .unwrap();
}

fn files_with_extension(dir: &Path, ext: &str) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|e| e == ext))
        .collect()
}

#[test]
fn report_writes_every_format() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let out = dir.path().join("out");

    resultlens()
        .current_dir(dir.path())
        .args([
            "report",
            "--input",
            "results.json",
            "--college",
            "college.json",
            "--programs",
            "programs.json",
            "--title",
            "Semester 5",
            "--format",
            "all",
            "--output",
        ])
        .arg(&out)
        .assert()
        .success();

    let json_files = files_with_extension(&out, "json");
    assert_eq!(json_files.len(), 1);
    assert_eq!(files_with_extension(&out, "html").len(), 1);
    assert_eq!(files_with_extension(&out, "md").len(), 1);

    let report = AnalyticsReport::load_json(&json_files[0]).unwrap();
    assert_eq!(report.title, "Semester 5");
    assert_eq!(report.statistics.as_ref().unwrap().count, 40);
    assert_eq!(report.distribution.as_ref().unwrap().histogram.bins.len(), 10);
    assert!(report.correlation.as_ref().unwrap().get("percentage", "cgpa").unwrap() > 0.99);

    let quality = report.quality.as_ref().unwrap();
    assert_eq!(quality.missing_values[0].field, "Gender");
    assert_eq!(quality.missing_values[0].count, 8);

    let ids: Vec<&str> = report.insights.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["weak-program", "trend-change", "high-pass-rate", "high-distinction"]
    );
    assert_eq!(
        report.insights[0].recommendation.as_deref(),
        Some("Pair first-years with peer mentors.")
    );
}

#[test]
fn report_default_title_and_json_only() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let out = dir.path().join("json-only");

    resultlens()
        .current_dir(dir.path())
        .args(["report", "--input", "results.json", "--output"])
        .arg(&out)
        .assert()
        .success();

    let json_files = files_with_extension(&out, "json");
    assert_eq!(json_files.len(), 1);
    assert!(files_with_extension(&out, "html").is_empty());

    let report = AnalyticsReport::load_json(&json_files[0]).unwrap();
    assert_eq!(report.title, "Result analytics: results");
    assert!(report.insights.is_empty());
}
