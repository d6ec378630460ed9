use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::FingerprintMode;
use crate::error::DashboardError;
use crate::models::{Fingerprint, Outcome, Record, Table, UNSPECIFIED_CATEGORY};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Deserialize)]
struct CsvRow {
    id: String,
    #[serde(alias = "prompt")]
    prompt_text: String,
    #[serde(alias = "response")]
    response_text: String,
    #[serde(default, alias = "type")]
    category: Option<String>,
    #[serde(alias = "탈옥성공여부")]
    outcome: String,
}

impl From<CsvRow> for Record {
    fn from(row: CsvRow) -> Self {
        let category = row
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNSPECIFIED_CATEGORY.to_string());

        Record {
            id: row.id,
            prompt_text: row.prompt_text,
            response_text: row.response_text,
            category,
            outcome: Outcome::from_token(&row.outcome),
        }
    }
}

struct CacheEntry {
    fingerprint: Fingerprint,
    table: Arc<Table>,
}

/// Reads result tables from disk, keeping the last good table per source.
pub struct DataLoader {
    mode: FingerprintMode,
    cache: HashMap<PathBuf, CacheEntry>,
}

impl DataLoader {
    pub fn new(mode: FingerprintMode) -> Self {
        Self {
            mode,
            cache: HashMap::new(),
        }
    }

    pub fn load(&mut self, source: &Path) -> Result<Arc<Table>, DashboardError> {
        let (fingerprint, bytes) = match self.read_fingerprint(source) {
            Ok(read) => read,
            Err(err) => {
                if matches!(err, DashboardError::SourceNotFound { .. })
                    && self.cache.remove(source).is_some()
                {
                    warn!(source = %source.display(), "source disappeared; dropped cached table");
                }
                return Err(err);
            }
        };

        if let Some(entry) = self.cache.get(source) {
            if entry.fingerprint == fingerprint {
                debug!(source = %source.display(), %fingerprint, "cache hit");
                return Ok(Arc::clone(&entry.table));
            }
        }

        let bytes = match bytes {
            Some(bytes) => bytes,
            None => read_bytes(source)?,
        };
        let records = parse_records(source, &bytes)?;
        let table = Arc::new(Table {
            source: source.to_path_buf(),
            fingerprint: fingerprint.clone(),
            loaded_at: Utc::now(),
            records,
        });

        info!(
            source = %source.display(),
            %fingerprint,
            records = table.len(),
            "loaded result table"
        );
        self.cache.insert(
            source.to_path_buf(),
            CacheEntry {
                fingerprint,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    pub fn invalidate(&mut self, source: &Path) -> bool {
        self.cache.remove(source).is_some()
    }

    #[cfg(test)]
    pub fn is_cached(&self, source: &Path) -> bool {
        self.cache.contains_key(source)
    }

    /// Computes the fingerprint for `source`, returning the bytes when they had
    /// to be read to do so.
    fn read_fingerprint(
        &self,
        source: &Path,
    ) -> Result<(Fingerprint, Option<Vec<u8>>), DashboardError> {
        match self.mode {
            FingerprintMode::Content => {
                let bytes = read_bytes(source)?;
                Ok((content_fingerprint(&bytes), Some(bytes)))
            }
            FingerprintMode::Metadata => {
                let meta = fs::metadata(source).map_err(|e| io_error(source, e))?;
                if !meta.is_file() {
                    return Err(DashboardError::SourceNotFound {
                        path: source.to_path_buf(),
                    });
                }
                let modified = meta.modified().map_err(|e| io_error(source, e))?;
                Ok((
                    Fingerprint::Metadata {
                        len: meta.len(),
                        modified: DateTime::<Utc>::from(modified),
                    },
                    None,
                ))
            }
        }
    }
}

pub fn content_fingerprint(bytes: &[u8]) -> Fingerprint {
    let mut h = Sha256::new();
    h.update(bytes);
    Fingerprint::Content {
        sha256: hex::encode(h.finalize()),
    }
}

fn read_bytes(source: &Path) -> Result<Vec<u8>, DashboardError> {
    fs::read(source).map_err(|e| io_error(source, e))
}

fn io_error(source: &Path, err: io::Error) -> DashboardError {
    match err.kind() {
        io::ErrorKind::NotFound => DashboardError::SourceNotFound {
            path: source.to_path_buf(),
        },
        _ => DashboardError::Io {
            path: source.to_path_buf(),
            source: err,
        },
    }
}

/// Parses every row or none: a single bad row rejects the whole table.
pub fn parse_records(source: &Path, bytes: &[u8]) -> Result<Vec<Record>, DashboardError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let mut records = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        let row = result.map_err(|e| DashboardError::parse(source, describe_csv_error(&e)))?;
        records.push(Record::from(row));
    }
    Ok(records)
}

fn describe_csv_error(err: &csv::Error) -> String {
    match err.position() {
        Some(pos) => format!("line {}: {}", pos.line(), err),
        None => err.to_string(),
    }
}
