use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Bucket for records whose category column is absent or blank.
pub const UNSPECIFIED_CATEGORY: &str = "unspecified";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Fail,
    /// Any token other than `success`/`fail`, kept verbatim.
    Unrecognized(String),
}

impl Outcome {
    pub fn from_token(raw: &str) -> Self {
        match raw.trim() {
            "success" => Outcome::Success,
            "fail" => Outcome::Fail,
            other => Outcome::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Success => "success",
            Outcome::Fail => "fail",
            Outcome::Unrecognized(raw) => raw,
        }
    }
}

/// Serialized as the raw token, so unrecognized values round-trip verbatim.
impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: String,
    pub prompt_text: String,
    pub response_text: String,
    pub category: String,
    pub outcome: Outcome,
}

/// Identity of the bytes a table was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fingerprint {
    Content { sha256: String },
    Metadata { len: u64, modified: DateTime<Utc> },
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fingerprint::Content { sha256 } => {
                write!(f, "sha256:{}", &sha256[..sha256.len().min(12)])
            }
            Fingerprint::Metadata { len, modified } => {
                write!(f, "len:{len} mtime:{}", modified.to_rfc3339())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    pub source: PathBuf,
    pub fingerprint: Fingerprint,
    pub loaded_at: DateTime<Utc>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMetrics {
    pub success_count: usize,
    pub fail_count: usize,
    pub total_count: usize,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub total: usize,
    pub success_count: usize,
    pub fail_count: usize,
    pub unrecognized_count: usize,
    pub success_rate: f64,
    pub per_category: BTreeMap<String, CategoryMetrics>,
}

impl MetricsSnapshot {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
