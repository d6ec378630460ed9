//! Plain-text renderers for the terminal host.

use std::fmt::Write;

use crate::catalog::Reference;
use crate::error::DashboardError;
use crate::metrics;
use crate::models::Outcome;
use crate::navigator::{Navigator, ViewHandler, ViewInput, ViewKind};
use crate::progress::{self, ProgressReport};
use crate::report::{category_shares, excerpt, percent};

const NO_DATA: &str = "No data available to display.";
const BAR_WIDTH: u64 = 40;

pub struct HomeView;

impl ViewHandler for HomeView {
    fn kind(&self) -> ViewKind {
        ViewKind::Home
    }

    fn render(&self, input: ViewInput<'_>) -> Result<String, DashboardError> {
        let mut out = String::new();
        let _ = writeln!(out, "Jailbreak Verification Dashboard");
        let _ = writeln!(out);

        let ViewInput::Data { snapshot, .. } = input else {
            let _ = writeln!(out, "{NO_DATA}");
            return Ok(out);
        };

        let _ = writeln!(out, "Total prompts:          {}", snapshot.total);
        let _ = writeln!(out, "Successful jailbreaks:  {}", snapshot.success_count);
        let _ = writeln!(out, "Failed jailbreaks:      {}", snapshot.fail_count);
        let _ = writeln!(
            out,
            "Jailbreak success rate: {}",
            percent(snapshot.success_rate)
        );
        if snapshot.unrecognized_count > 0 {
            let _ = writeln!(
                out,
                "({} records with an unrecognized outcome were not counted)",
                snapshot.unrecognized_count
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Share by type:");
        for (category, count, share) in category_shares(snapshot) {
            let _ = writeln!(out, "  {category:<20} {count:>6}  {}", percent(share));
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Success rate by type:");
        for (category, m) in &snapshot.per_category {
            let _ = writeln!(
                out,
                "  {category:<20} {:>8}  ({}/{})",
                format!("{:.1}%", m.success_rate * 100.0),
                m.success_count,
                m.total_count
            );
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    pub limit: usize,
    pub category: Option<String>,
    pub outcome: Option<Outcome>,
}

impl ViewHandler for HistoryView {
    fn kind(&self) -> ViewKind {
        ViewKind::History
    }

    fn render(&self, input: ViewInput<'_>) -> Result<String, DashboardError> {
        let mut out = String::new();
        let _ = writeln!(out, "Jailbreak prompt history");
        let _ = writeln!(out);

        let ViewInput::Data { table, .. } = input else {
            let _ = writeln!(out, "{NO_DATA}");
            return Ok(out);
        };

        let matching: Vec<_> =
            metrics::filter(table, self.category.as_deref(), self.outcome.as_ref()).collect();
        if matching.is_empty() {
            let _ = writeln!(out, "No prompts match the current filter.");
            return Ok(out);
        }

        for record in matching.iter().take(self.limit) {
            let _ = writeln!(
                out,
                "#{} [{}] {}",
                record.id, record.category, record.outcome
            );
            let _ = writeln!(out, "  prompt:   {}", excerpt(&record.prompt_text, 100));
            let _ = writeln!(out, "  response: {}", excerpt(&record.response_text, 100));
        }
        if matching.len() > self.limit {
            let _ = writeln!(
                out,
                "showing {} of {} prompts",
                self.limit,
                matching.len()
            );
        }
        Ok(out)
    }
}

pub struct ReferencesView {
    pub references: &'static [Reference],
}

impl ViewHandler for ReferencesView {
    fn kind(&self) -> ViewKind {
        ViewKind::References
    }

    fn render(&self, _input: ViewInput<'_>) -> Result<String, DashboardError> {
        let mut out = String::new();
        let _ = writeln!(out, "References");
        let _ = writeln!(out);
        for reference in self.references {
            let _ = writeln!(out, "* {}", reference.title);
            let _ = writeln!(out, "  {}", reference.description);
            let _ = writeln!(out, "  {}: {}", reference.kind_label(), reference.file);
            let _ = writeln!(out, "  image: {}", reference.image);
        }
        Ok(out)
    }
}

pub struct ProgressView {
    pub target: u64,
}

impl ViewHandler for ProgressView {
    fn kind(&self) -> ViewKind {
        ViewKind::Progress
    }

    fn render(&self, input: ViewInput<'_>) -> Result<String, DashboardError> {
        let current = match input {
            ViewInput::Data { snapshot, .. } => snapshot.total as u64,
            ViewInput::NoData => 0,
        };
        let report = progress::track(current, self.target)?;
        Ok(format!("{}\n", progress_line(&report, report.percent)))
    }
}

/// One animation frame: a bar filled to `step` percent.
pub fn progress_line(report: &ProgressReport, step: u64) -> String {
    if report.is_complete() {
        return format!(
            "[{}] complete ({} of {} prompts verified)",
            "#".repeat(BAR_WIDTH as usize),
            report.current,
            report.target
        );
    }
    let filled = (step.min(100) * BAR_WIDTH / 100) as usize;
    format!(
        "[{}{}] {:>3}% ({} of {} prompts verified)",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH as usize - filled),
        step,
        report.current,
        report.target
    )
}

pub fn default_navigator(
    history: HistoryView,
    references: &'static [Reference],
    progress_target: u64,
) -> Navigator {
    Navigator::new(Box::new(HomeView))
        .register(Box::new(history))
        .register(Box::new(ReferencesView { references }))
        .register(Box::new(ProgressView {
            target: progress_target,
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::models::{Fingerprint, MetricsSnapshot, Record, Table};
    use chrono::Utc;

    fn table(rows: &[(&str, &str, &str)]) -> Table {
        Table {
            source: "results.csv".into(),
            fingerprint: Fingerprint::Content {
                sha256: String::new(),
            },
            loaded_at: Utc::now(),
            records: rows
                .iter()
                .map(|(id, outcome, category)| Record {
                    id: id.to_string(),
                    prompt_text: format!("prompt {id}"),
                    response_text: format!("response {id}"),
                    category: category.to_string(),
                    outcome: Outcome::from_token(outcome),
                })
                .collect(),
        }
    }

    fn data(t: &Table) -> (MetricsSnapshot, &Table) {
        (metrics::compute(t), t)
    }

    #[test]
    fn home_shows_headline_figures() -> anyhow::Result<()> {
        let t = table(&[("1", "success", "A"), ("2", "fail", "A"), ("3", "success", "B")]);
        let (snapshot, t) = data(&t);
        let out = HomeView.render(ViewInput::new(t, &snapshot))?;

        assert!(out.contains("Total prompts:          3"));
        assert!(out.contains("Jailbreak success rate: 66.67%"));
        assert!(out.contains("50.0%"));
        assert!(!out.contains("unrecognized"));
        Ok(())
    }

    #[test]
    fn views_show_no_data_message() -> anyhow::Result<()> {
        assert!(HomeView.render(ViewInput::NoData)?.contains(NO_DATA));
        assert!(HistoryView::default()
            .render(ViewInput::NoData)?
            .contains(NO_DATA));
        Ok(())
    }

    #[test]
    fn history_filters_and_limits() -> anyhow::Result<()> {
        let t = table(&[
            ("1", "success", "A"),
            ("2", "fail", "A"),
            ("3", "success", "A"),
            ("4", "success", "B"),
        ]);
        let (snapshot, t) = data(&t);
        let view = HistoryView {
            limit: 1,
            category: Some("A".to_string()),
            outcome: Some(Outcome::Success),
        };
        let out = view.render(ViewInput::new(t, &snapshot))?;

        assert!(out.contains("#1 [A] success"));
        assert!(!out.contains("#3"));
        assert!(!out.contains("#4"));
        assert!(out.contains("showing 1 of 2 prompts"));
        Ok(())
    }

    #[test]
    fn progress_view_uses_record_count() -> anyhow::Result<()> {
        let t = table(&[("1", "success", "A"), ("2", "fail", "A")]);
        let (snapshot, t) = data(&t);
        let out = ProgressView { target: 4 }.render(ViewInput::new(t, &snapshot))?;
        assert!(out.contains(" 50% (2 of 4 prompts verified)"));

        let err = ProgressView { target: 0 }
            .render(ViewInput::NoData)
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidTarget(0)));
        Ok(())
    }

    #[test]
    fn complete_progress_renders_full_bar() -> anyhow::Result<()> {
        let report = progress::track(4000, 3000)?;
        let line = progress_line(&report, report.percent);
        assert!(line.contains("complete (4000 of 3000 prompts verified)"));
        assert!(!line.contains("133"));
        assert!(!line.contains('.'));
        Ok(())
    }

    #[test]
    fn default_navigator_registers_every_view() {
        let nav = default_navigator(HistoryView::default(), catalog::references(), 3000);
        assert_eq!(nav.registered().collect::<Vec<_>>(), ViewKind::ALL.to_vec());
        assert_eq!(nav.active_view(), ViewKind::Home);
    }

    #[test]
    fn session_renders_final_progress_frame() -> anyhow::Result<()> {
        use crate::config::FingerprintMode;
        use crate::loader::DataLoader;
        use crate::session::Session;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("results.csv");
        std::fs::write(
            &path,
            "id,prompt_text,response_text,category,outcome\n\
             1,p1,r1,A,success\n\
             2,p2,r2,A,fail\n\
             3,p3,r3,B,success\n",
        )?;

        let navigator = default_navigator(HistoryView::default(), catalog::references(), 8);
        let mut session = Session::new(DataLoader::new(FingerprintMode::Content), navigator);
        session.refresh(&path)?;
        session.select(ViewKind::Progress.name())?;

        let report = progress::track(3, 8)?;
        assert_eq!(report.percent, 38);
        assert_eq!(
            session.render()?,
            format!("{}\n", progress_line(&report, report.percent))
        );
        Ok(())
    }
}
