use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod catalog;
mod config;
mod error;
mod loader;
mod metrics;
mod models;
mod navigator;
mod progress;
mod report;
mod session;
mod views;

use crate::error::DashboardError;
use crate::loader::DataLoader;
use crate::models::{Outcome, Record};
use crate::navigator::{ViewHandler, ViewInput, ViewKind};
use crate::progress::ProgressReport;
use crate::session::Session;
use crate::views::HistoryView;

#[derive(Parser)]
#[command(name = "jailbreak-dashboard")]
#[command(about = "Jailbreak verification results dashboard", long_about = None)]
struct Cli {
    /// Settings file (defaults to ./dashboard.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show headline metrics and per-type breakdown
    Summary {
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Print the metrics snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// List verified prompts
    History {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_enum)]
        outcome: Option<OutcomeArg>,
        #[arg(long)]
        limit: Option<usize>,
        /// Print the matching records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Animate progress toward the verification target
    Progress {
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Verified prompt count; defaults to the number of records in the table
        #[arg(long)]
        current: Option<u64>,
        #[arg(long)]
        target: Option<u64>,
        /// Delay between animation frames; 0 prints only the final frame
        #[arg(long, default_value_t = 20)]
        frame_ms: u64,
    },
    /// List reference documents
    References,
    /// Interactive session: type a view name to switch views
    Browse {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long, default_value_t = 20)]
        frame_ms: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutcomeArg {
    Success,
    Fail,
}

impl From<OutcomeArg> for Outcome {
    fn from(value: OutcomeArg) -> Self {
        match value {
            OutcomeArg::Success => Outcome::Success,
            OutcomeArg::Fail => Outcome::Fail,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = config::load_settings(cli.config.as_deref())?;
    let source = |csv: Option<PathBuf>| csv.unwrap_or_else(|| settings.source.clone());
    let history = HistoryView {
        limit: settings.history_limit,
        category: None,
        outcome: None,
    };

    match cli.command {
        Commands::Summary { csv, json } => {
            let mut session = new_session(&settings, history);
            let loaded = load(&mut session, &source(csv))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&*loaded.snapshot)?);
            } else {
                print!("{}", session.render()?);
            }
        }
        Commands::History {
            csv,
            category,
            outcome,
            limit,
            json,
        } => {
            let view = HistoryView {
                limit: limit.unwrap_or(settings.history_limit),
                category,
                outcome: outcome.map(Outcome::from),
            };
            if json {
                let mut session = new_session(&settings, history);
                let loaded = load(&mut session, &source(csv))?;
                let records: Vec<&Record> = metrics::filter(
                    &loaded.table,
                    view.category.as_deref(),
                    view.outcome.as_ref(),
                )
                .take(view.limit)
                .collect();
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                let mut session = new_session(&settings, view);
                load(&mut session, &source(csv))?;
                session.select(ViewKind::History.name())?;
                print!("{}", session.render()?);
            }
        }
        Commands::Report { csv, out } => {
            let mut session = new_session(&settings, history);
            let loaded = load(&mut session, &source(csv))?;
            let report =
                report::build_report(&loaded.table, &loaded.snapshot, chrono::Utc::now());
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Progress {
            csv,
            current,
            target,
            frame_ms,
        } => {
            let target = target.unwrap_or(settings.progress_target);
            match current {
                Some(current) => {
                    let report = progress::track(current, target)?;
                    animate(&report, frame_ms)?;
                    println!("{}", views::progress_line(&report, report.percent));
                }
                None => {
                    let settings = config::Settings {
                        progress_target: target,
                        ..settings.clone()
                    };
                    let mut session = new_session(&settings, history);
                    let loaded = load(&mut session, &source(csv))?;
                    let report = progress::track(loaded.snapshot.total as u64, target)?;
                    session.select(ViewKind::Progress.name())?;
                    animate(&report, frame_ms)?;
                    print!("{}", session.render()?);
                }
            }
        }
        Commands::References => {
            let view = views::ReferencesView {
                references: catalog::references(),
            };
            print!("{}", view.render(ViewInput::NoData)?);
        }
        Commands::Browse { csv, frame_ms } => {
            let mut session = new_session(&settings, history);
            browse(&mut session, &source(csv), settings.progress_target, frame_ms)?;
        }
    }

    Ok(())
}

fn new_session(settings: &config::Settings, history: HistoryView) -> Session {
    let navigator =
        views::default_navigator(history, catalog::references(), settings.progress_target);
    let session = Session::new(DataLoader::new(settings.fingerprint), navigator);
    info!(session = %session.id(), "session started");
    session
}

fn load(session: &mut Session, source: &Path) -> anyhow::Result<session::Loaded> {
    let loaded = session
        .refresh(source)
        .with_context(|| format!("failed to load results from {}", source.display()))?;
    Ok(loaded.clone())
}

/// Prints the intermediate frames of the progress sequence, pausing
/// `frame_ms` between them. The caller prints the final frame.
fn animate(report: &ProgressReport, frame_ms: u64) -> anyhow::Result<()> {
    if frame_ms == 0 || report.is_complete() {
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    for step in report.steps().take_while(|step| *step < report.percent) {
        write!(stdout, "\r{}", views::progress_line(report, step))?;
        stdout.flush()?;
        thread::sleep(Duration::from_millis(frame_ms));
    }
    write!(stdout, "\r")?;
    stdout.flush()?;
    Ok(())
}

fn browse(
    session: &mut Session,
    source: &Path,
    progress_target: u64,
    frame_ms: u64,
) -> anyhow::Result<()> {
    if let Err(err) = session.refresh(source) {
        eprintln!("{err}");
    }
    print!("{}", session.render()?);

    let views = session
        .views()
        .iter()
        .map(|v| v.name())
        .collect::<Vec<_>>()
        .join(", ");
    println!();
    println!("Views: {views}. Commands: reload, refresh, quit.");

    let mut lines = io::stdin().lock().lines();
    loop {
        print!("[{}]> ", session.active_view());
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            command @ ("reload" | "refresh") => {
                if command == "refresh" {
                    session.invalidate(source);
                }
                match session.refresh(source) {
                    Ok(loaded) => println!("Loaded {} records.", loaded.table.len()),
                    Err(err) => eprintln!("{err}"),
                }
            }
            name => match session.select(name) {
                Ok(ViewKind::Progress) => {
                    let current = session
                        .current()
                        .map(|loaded| loaded.snapshot.total as u64)
                        .unwrap_or(0);
                    if let Ok(report) = progress::track(current, progress_target) {
                        animate(&report, frame_ms)?;
                    }
                    match session.render() {
                        Ok(out) => print!("{out}"),
                        Err(err) => eprintln!("{err}"),
                    }
                }
                Ok(_) => print!("{}", session.render()?),
                Err(err @ DashboardError::UnknownView(_)) => {
                    eprintln!("{err}; available views: {views}");
                }
                Err(err) => return Err(err.into()),
            },
        }
    }
    Ok(())
}
