use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use crate::error::DashboardError;
use crate::models::{MetricsSnapshot, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewKind {
    Home,
    History,
    References,
    Progress,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::Home,
        ViewKind::History,
        ViewKind::References,
        ViewKind::Progress,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ViewKind::Home => "Home",
            ViewKind::History => "History",
            ViewKind::References => "References",
            ViewKind::Progress => "Progress",
        }
    }

    pub fn from_name(name: &str) -> Option<ViewKind> {
        let name = name.trim();
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a view is handed to render. An empty table is `NoData`, never `Data`.
#[derive(Debug, Clone, Copy)]
pub enum ViewInput<'a> {
    NoData,
    Data {
        table: &'a Table,
        snapshot: &'a MetricsSnapshot,
    },
}

impl<'a> ViewInput<'a> {
    pub fn new(table: &'a Table, snapshot: &'a MetricsSnapshot) -> Self {
        if table.is_empty() {
            ViewInput::NoData
        } else {
            ViewInput::Data { table, snapshot }
        }
    }
}

pub trait ViewHandler {
    fn kind(&self) -> ViewKind;
    fn render(&self, input: ViewInput<'_>) -> Result<String, DashboardError>;
}

pub struct Navigator {
    handlers: BTreeMap<ViewKind, Box<dyn ViewHandler>>,
    active: ViewKind,
}

impl Navigator {
    /// The first handler is the initially active view.
    pub fn new(initial: Box<dyn ViewHandler>) -> Self {
        let active = initial.kind();
        let mut handlers = BTreeMap::new();
        handlers.insert(active, initial);
        Self { handlers, active }
    }

    pub fn register(mut self, handler: Box<dyn ViewHandler>) -> Self {
        self.handlers.insert(handler.kind(), handler);
        self
    }

    pub fn active_view(&self) -> ViewKind {
        self.active
    }

    pub fn registered(&self) -> impl Iterator<Item = ViewKind> + '_ {
        self.handlers.keys().copied()
    }

    pub fn select(&mut self, name: &str) -> Result<ViewKind, DashboardError> {
        let found = ViewKind::from_name(name).filter(|kind| self.handlers.contains_key(kind));

        match found {
            Some(kind) => {
                debug!(from = %self.active, to = %kind, "view selected");
                self.active = kind;
                Ok(kind)
            }
            None => {
                warn!(view = name, active = %self.active, "unknown view requested");
                Err(DashboardError::UnknownView(name.to_string()))
            }
        }
    }

    pub fn render(&self, input: ViewInput<'_>) -> Result<String, DashboardError> {
        match self.handlers.get(&self.active) {
            Some(handler) => handler.render(input),
            None => Err(DashboardError::UnknownView(self.active.name().to_string())),
        }
    }
}
