//! Rendering of the aggregate batch report.

use std::fmt::Write;

use crate::domain::{
    AppError, BatchReport, PermissionsOutcome, RepoStatus, RunResult, WorkflowOutcome,
};

/// Human-readable summary printed after the batch.
pub fn render_text(report: &BatchReport) -> String {
    let mut out = String::new();
    let rule = "=".repeat(60);
    let summary = &report.summary;

    let _ = writeln!(out, "\n{}", rule);
    let _ = writeln!(out, "📊 AUTOMATION SUMMARY");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "✅ Fully successful: {}/{}  ⚠️  Partial: {}  ❌ Failed: {}",
        summary.succeeded, summary.total, summary.partial, summary.failed
    );

    for result in &report.results {
        render_result(&mut out, result);
    }

    if !summary.secrets.is_empty() {
        let _ = writeln!(out, "\n🔐 Secrets");
        for ratio in &summary.secrets {
            let _ = writeln!(out, "   {}: {}/{}", ratio.name, ratio.succeeded, ratio.attempted);
        }
    }

    out
}

fn render_result(out: &mut String, result: &RunResult) {
    let marker = match result.status() {
        RepoStatus::Success => "✅",
        RepoStatus::Partial => "⚠️ ",
        RepoStatus::Failed => "❌",
    };
    let _ = writeln!(out, "\n{} {}", marker, result.short_name());

    let workflow = match &result.workflow {
        WorkflowOutcome::Pushed { branch, files } => {
            format!("pushed {} file(s) to {}", files.len(), branch)
        }
        WorkflowOutcome::Unchanged => "unchanged".to_string(),
        WorkflowOutcome::Failed(failure) => format!("failed ({})", failure.message),
    };
    let _ = writeln!(out, "   Workflows: {}", workflow);

    match &result.permissions {
        PermissionsOutcome::Updated => {
            let _ = writeln!(out, "   Workflow permissions: ✅");
        }
        PermissionsOutcome::Failed(failure) => {
            let _ = writeln!(out, "   Workflow permissions: ❌ ({})", failure.message);
        }
        PermissionsOutcome::NotAttempted => {}
    }

    if result.status() != RepoStatus::Failed || !result.secrets.is_empty() {
        let ok = result.secrets.iter().filter(|s| s.status.is_ok()).count();
        let _ = writeln!(out, "   Secrets: {}/{} set", ok, result.secrets.len());
    }
}

/// Pretty-printed JSON for machine consumers.
pub fn render_json(report: &BatchReport) -> Result<String, AppError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| AppError::Api(format!("Failed to serialize report: {}", e)))
}
