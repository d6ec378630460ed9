use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{MetricsSnapshot, Outcome, Table};

pub fn percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// Share of all records that fall in each category, in category order.
pub fn category_shares(snapshot: &MetricsSnapshot) -> Vec<(&str, usize, f64)> {
    snapshot
        .per_category
        .iter()
        .map(|(category, metrics)| {
            let share = if snapshot.total == 0 {
                0.0
            } else {
                metrics.total_count as f64 / snapshot.total as f64
            };
            (category.as_str(), metrics.total_count, share)
        })
        .collect()
}

pub fn build_report(
    table: &Table,
    snapshot: &MetricsSnapshot,
    generated_at: DateTime<Utc>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Jailbreak Verification Report");
    let _ = writeln!(
        output,
        "Generated {} from {} ({})",
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        table.source.display(),
        table.fingerprint
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");

    if snapshot.is_empty() {
        let _ = writeln!(output, "No data available to display.");
        return output;
    }

    let _ = writeln!(output, "- Total prompts: {}", snapshot.total);
    let _ = writeln!(output, "- Successful jailbreaks: {}", snapshot.success_count);
    let _ = writeln!(output, "- Failed jailbreaks: {}", snapshot.fail_count);
    if snapshot.unrecognized_count > 0 {
        let _ = writeln!(
            output,
            "- Unrecognized outcomes: {}",
            snapshot.unrecognized_count
        );
    }
    let _ = writeln!(output, "- Success rate: {}", percent(snapshot.success_rate));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Category Mix");
    let _ = writeln!(output, "| Type | Prompts | Share | Successes | Success rate |");
    let _ = writeln!(output, "|---|---:|---:|---:|---:|");
    for (category, count, share) in category_shares(snapshot) {
        let metrics = &snapshot.per_category[category];
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} |",
            category,
            count,
            percent(share),
            metrics.success_count,
            percent(metrics.success_rate)
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Successful Prompts");

    let successes: Vec<_> = table
        .records
        .iter()
        .filter(|r| r.outcome == Outcome::Success)
        .collect();
    if successes.is_empty() {
        let _ = writeln!(output, "No prompt bypassed the model.");
    } else {
        for record in successes.iter().take(5) {
            let _ = writeln!(
                output,
                "- [{}] {}: {}",
                record.id,
                record.category,
                excerpt(&record.prompt_text, 80)
            );
        }
        if successes.len() > 5 {
            let _ = writeln!(output, "- ...and {} more", successes.len() - 5);
        }
    }

    output
}

/// First `max_chars` characters on a single line.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics;
    use crate::models::{Fingerprint, Record};

    fn table(rows: &[(&str, &str, &str)]) -> Table {
        Table {
            source: "results.csv".into(),
            fingerprint: Fingerprint::Content {
                sha256: "deadbeef".to_string(),
            },
            loaded_at: Utc::now(),
            records: rows
                .iter()
                .map(|(id, outcome, category)| Record {
                    id: id.to_string(),
                    prompt_text: format!("prompt number {id}"),
                    response_text: String::new(),
                    category: category.to_string(),
                    outcome: Outcome::from_token(outcome),
                })
                .collect(),
        }
    }

    #[test]
    fn report_lists_overview_and_categories() {
        let t = table(&[("1", "success", "A"), ("2", "fail", "A"), ("3", "success", "B")]);
        let snapshot = metrics::compute(&t);
        let report = build_report(&t, &snapshot, Utc::now());

        assert!(report.contains("- Total prompts: 3"));
        assert!(report.contains("- Success rate: 66.67%"));
        assert!(report.contains("| A | 2 | 66.67% | 1 | 50.00% |"));
        assert!(report.contains("| B | 1 | 33.33% | 1 | 100.00% |"));
        assert!(report.contains("- [1] A: prompt number 1"));
        assert!(!report.contains("Unrecognized"));
    }

    #[test]
    fn empty_table_reports_no_data() {
        let t = table(&[]);
        let snapshot = metrics::compute(&t);
        let report = build_report(&t, &snapshot, Utc::now());
        assert!(report.contains("No data available to display."));
        assert!(!report.contains("## Category Mix"));
    }

    #[test]
    fn excerpt_flattens_and_truncates_by_chars() {
        assert_eq!(excerpt("a\n b  c", 10), "a b c");
        assert_eq!(excerpt("가나다라마", 3), "가나다…");
    }
}
