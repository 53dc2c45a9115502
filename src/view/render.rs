//! Plain-text rendering of both views.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::dashboard::{DashboardSnapshot, ListStatus};
use crate::form::{FormPhase, FormState};
use crate::models::{Submission, SubmitStatus, MAX_RATING};
use crate::settings::Density;

pub const DASHBOARD_TITLE: &str = "Evaluation Results";
pub const EMPTY_STATE: &str = "No submissions yet.";
pub const PROCESSING_PLACEHOLDER: &str = "Processing...";
pub const NO_ACTIONS_PLACEHOLDER: &str = "No actions";

const COMPACT_TEXT_WIDTH: usize = 40;

pub fn render_dashboard(snapshot: &DashboardSnapshot, density: Density) -> String {
    let mut out = String::new();
    let stats = &snapshot.stats;

    let _ = writeln!(out, "{DASHBOARD_TITLE}");
    let _ = writeln!(
        out,
        "Submissions: {}   Average rating: {:.1}",
        stats.total_submissions, stats.average_rating
    );
    if density == Density::Comfortable && stats.total_submissions > 0 {
        let distribution = stats
            .rating_distribution
            .iter()
            .enumerate()
            .map(|(i, count)| format!("{}★ {count}", i + 1))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "Distribution: {distribution}");
    }
    if let Some(line) = status_line(&snapshot.status, snapshot.last_updated) {
        let _ = writeln!(out, "{line}");
    }
    out.push('\n');

    if snapshot.submissions.is_empty() {
        // Only a successful fetch can say the list is empty.
        if snapshot.last_updated.is_some() {
            let _ = writeln!(out, "{EMPTY_STATE}");
        }
        return out;
    }

    for submission in &snapshot.submissions {
        match density {
            Density::Comfortable => render_block(&mut out, submission),
            Density::Compact => render_row(&mut out, submission),
        }
    }
    out
}

fn status_line(status: &ListStatus, last_updated: Option<DateTime<Utc>>) -> Option<String> {
    match status {
        ListStatus::Loading => Some("Loading...".to_string()),
        ListStatus::Live => last_updated.map(|at| format!("Updated {}", at.format("%H:%M:%S"))),
        ListStatus::Stale { error, since } => {
            let mut line = format!(
                "! Backend unreachable since {} ({error})",
                since.format("%H:%M:%S")
            );
            if last_updated.is_some() {
                line.push_str("; showing last good data");
            }
            Some(line)
        }
    }
}

fn render_block(out: &mut String, submission: &Submission) {
    let _ = write!(out, "#{}  {}", submission.id, rating_badge(submission.rating));
    if let Some(created_at) = submission.created_at {
        let _ = write!(out, "  {}", created_at.format("%Y-%m-%d %H:%M"));
    }
    out.push('\n');
    let _ = writeln!(out, "  Review:  {}", submission.review_text);
    let _ = writeln!(
        out,
        "  Summary: {}",
        submission.summary().unwrap_or(PROCESSING_PLACEHOLDER)
    );

    let actions = submission.actions();
    if actions.is_empty() {
        let _ = writeln!(out, "  Actions: {NO_ACTIONS_PLACEHOLDER}");
    } else {
        let _ = writeln!(out, "  Actions:");
        for action in actions {
            let _ = writeln!(out, "    - {action}");
        }
    }
    out.push('\n');
}

fn render_row(out: &mut String, submission: &Submission) {
    let actions = submission.actions();
    let actions = if actions.is_empty() {
        NO_ACTIONS_PLACEHOLDER.to_string()
    } else {
        actions.join("; ")
    };
    let _ = writeln!(
        out,
        "#{} {}/{} | {} | {} | {}",
        submission.id,
        submission.rating,
        MAX_RATING,
        truncate(&submission.review_text, COMPACT_TEXT_WIDTH),
        truncate(
            submission.summary().unwrap_or(PROCESSING_PLACEHOLDER),
            COMPACT_TEXT_WIDTH
        ),
        actions
    );
}

/// `★★★★☆ 4/5`
pub fn rating_badge(rating: u8) -> String {
    let filled = rating.min(MAX_RATING) as usize;
    format!(
        "{}{} {rating}/{MAX_RATING}",
        "★".repeat(filled),
        "☆".repeat(MAX_RATING as usize - filled)
    )
}

fn truncate(text: &str, width: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

pub fn render_form(state: &FormState) -> String {
    match state.phase {
        FormPhase::Idle => format!(
            "Rating: {}\nReview: {}\n",
            if state.rating == 0 {
                "(none selected)".to_string()
            } else {
                rating_badge(state.rating)
            },
            state.review_text
        ),
        FormPhase::Submitting => "Analyzing...\n".to_string(),
        FormPhase::Succeeded => {
            let mut out = format!(
                "AI Assistant Says:\n  \"{}\"\n",
                state.acknowledgment.as_deref().unwrap_or_default()
            );
            if state.submit_status == Some(SubmitStatus::PartialSuccess) {
                out.push_str("(Your feedback was saved; detailed analysis is unavailable.)\n");
            }
            out
        }
        FormPhase::Failed => format!(
            "{}\n",
            state.error_message.as_deref().unwrap_or_default()
        ),
    }
}
