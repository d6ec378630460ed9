use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::DashboardError;
use crate::loader::DataLoader;
use crate::metrics;
use crate::models::{MetricsSnapshot, Table};
use crate::navigator::{Navigator, ViewInput, ViewKind};

#[derive(Debug, Clone)]
pub struct Loaded {
    pub table: Arc<Table>,
    pub snapshot: Arc<MetricsSnapshot>,
}

/// Everything one user interacts with: loader cache, view state and the
/// latest table with its metrics. Sessions never share any of it.
pub struct Session {
    id: Uuid,
    loader: DataLoader,
    navigator: Navigator,
    current: Option<Loaded>,
}

impl Session {
    pub fn new(loader: DataLoader, navigator: Navigator) -> Self {
        Self {
            id: Uuid::new_v4(),
            loader,
            navigator,
            current: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn current(&self) -> Option<&Loaded> {
        self.current.as_ref()
    }

    pub fn active_view(&self) -> ViewKind {
        self.navigator.active_view()
    }

    pub fn views(&self) -> Vec<ViewKind> {
        self.navigator.registered().collect()
    }

    /// Loads `source` and swaps in the new table and metrics together.
    /// On failure the previous pair stays in place.
    pub fn refresh(&mut self, source: &Path) -> Result<&Loaded, DashboardError> {
        let table = self.loader.load(source).map_err(|err| {
            warn!(session = %self.id, error = %err, "load failed; keeping previous snapshot");
            err
        })?;

        let loaded = match self.current.take() {
            Some(loaded) if Arc::ptr_eq(&loaded.table, &table) => loaded,
            _ => {
                let snapshot = Arc::new(metrics::compute(&table));
                info!(
                    session = %self.id,
                    total = snapshot.total,
                    success = snapshot.success_count,
                    categories = snapshot.per_category.len(),
                    loaded_at = %table.loaded_at,
                    "metrics snapshot replaced"
                );
                Loaded { table, snapshot }
            }
        };

        Ok(self.current.insert(loaded))
    }

    /// Forgets the cached table for `source` so the next refresh re-parses it.
    /// The current snapshot stays until that refresh succeeds.
    pub fn invalidate(&mut self, source: &Path) {
        if self.loader.invalidate(source) {
            info!(session = %self.id, source = %source.display(), "cache entry dropped");
        }
    }

    pub fn select(&mut self, name: &str) -> Result<ViewKind, DashboardError> {
        self.navigator.select(name)
    }

    pub fn render(&self) -> Result<String, DashboardError> {
        let input = match &self.current {
            Some(loaded) => ViewInput::new(&loaded.table, &loaded.snapshot),
            None => ViewInput::NoData,
        };
        self.navigator.render(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FingerprintMode;
    use crate::navigator::ViewHandler;
    use std::fs;

    struct Totals(ViewKind);

    impl ViewHandler for Totals {
        fn kind(&self) -> ViewKind {
            self.0
        }

        fn render(&self, input: ViewInput<'_>) -> Result<String, DashboardError> {
            Ok(match input {
                ViewInput::NoData => "no data".to_string(),
                ViewInput::Data { snapshot, .. } => {
                    format!("{}/{}", snapshot.success_count, snapshot.total)
                }
            })
        }
    }

    fn session() -> Session {
        let navigator = Navigator::new(Box::new(Totals(ViewKind::Home)))
            .register(Box::new(Totals(ViewKind::History)));
        Session::new(DataLoader::new(FingerprintMode::Content), navigator)
    }

    const RESULTS: &str = "id,prompt_text,response_text,category,outcome\n\
        1,p1,r1,A,success\n\
        2,p2,r2,A,fail\n\
        3,p3,r3,B,success\n";

    #[test]
    fn renders_no_data_before_first_load() -> anyhow::Result<()> {
        let session = session();
        assert!(session.current().is_none());
        assert_eq!(session.render()?, "no data");
        Ok(())
    }

    #[test]
    fn refresh_computes_snapshot() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("results.csv");
        fs::write(&path, RESULTS)?;

        let mut session = session();
        let loaded = session.refresh(&path)?;
        assert_eq!(loaded.snapshot.total, 3);
        assert_eq!(session.render()?, "2/3");
        Ok(())
    }

    #[test]
    fn failed_loads_keep_previous_snapshot() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("results.csv");
        fs::write(&path, RESULTS)?;

        let mut session = session();
        let before = Arc::clone(&session.refresh(&path)?.snapshot);

        fs::write(&path, "id,prompt_text\n1,short\n")?;
        assert!(matches!(
            session.refresh(&path),
            Err(DashboardError::ParseError { .. })
        ));
        assert!(Arc::ptr_eq(&session.current().unwrap().snapshot, &before));

        let missing = dir.path().join("missing.csv");
        assert!(matches!(
            session.refresh(&missing),
            Err(DashboardError::SourceNotFound { .. })
        ));
        assert!(Arc::ptr_eq(&session.current().unwrap().snapshot, &before));
        assert_eq!(session.render()?, "2/3");
        Ok(())
    }

    #[test]
    fn unchanged_source_reuses_snapshot() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("results.csv");
        fs::write(&path, RESULTS)?;

        let mut session = session();
        let first = Arc::clone(&session.refresh(&path)?.snapshot);
        let second = Arc::clone(&session.refresh(&path)?.snapshot);
        assert!(Arc::ptr_eq(&first, &second));

        session.invalidate(&path);
        let third = Arc::clone(&session.refresh(&path)?.snapshot);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
        Ok(())
    }

    #[test]
    fn sessions_are_isolated() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("results.csv");
        fs::write(&path, RESULTS)?;

        let mut first = session();
        let mut second = session();
        assert_ne!(first.id(), second.id());

        first.refresh(&path)?;
        first.select("History")?;
        assert!(second.current().is_none());
        assert_eq!(second.active_view(), ViewKind::Home);

        assert!(second.select("Bogus").is_err());
        assert_eq!(first.active_view(), ViewKind::History);
        Ok(())
    }
}
