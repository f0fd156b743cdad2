use engagecam_core::feedback::domain::feedback_report::FeedbackReport;

const RULE_WIDTH: usize = 60;

/// Formats a report for the terminal.
pub fn report(report: &FeedbackReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let metrics = &report.metrics;

    let mut lines = vec![
        rule.clone(),
        "FACIAL EXPRESSION ANALYSIS".to_string(),
        rule.clone(),
        format!("Duration: {:.1} seconds", report.duration_seconds),
        String::new(),
        "Facial metrics:".to_string(),
        format!("  - Face visibility:  {:.1}%", metrics.face_visibility_pct),
        format!("  - Eye contact:      {:.1}%", metrics.eye_contact_rate_pct),
        format!("  - Facial stability: {:.1}%", metrics.facial_stability_score),
        String::new(),
        "Feedback:".to_string(),
        format!("  {}", report.feedback_text),
        String::new(),
        "Suggestions:".to_string(),
    ];
    lines.extend(report.suggestions.iter().map(|s| format!("  - {s}")));
    lines.push(rule);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
