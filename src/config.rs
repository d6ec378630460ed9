use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintMode {
    /// SHA-256 of the file contents.
    Content,
    /// File length and modification time.
    Metadata,
}

impl FromStr for FingerprintMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "content" => Ok(Self::Content),
            "metadata" => Ok(Self::Metadata),
            other => {
                anyhow::bail!("unknown fingerprint mode {other:?} (expected content or metadata)")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub source: PathBuf,
    pub progress_target: u64,
    pub fingerprint: FingerprintMode,
    pub history_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: PathBuf::from("Downloadfile/final_result_test.csv"),
            progress_target: 3000,
            fingerprint: FingerprintMode::Content,
            history_limit: 20,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    source: Option<PathBuf>,
    progress_target: Option<u64>,
    fingerprint: Option<FingerprintMode>,
    history_limit: Option<usize>,
}

/// Defaults, then the TOML file, then `DASHBOARD_*` environment variables.
///
/// An explicit `path` must exist; the default file is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let file = match path {
        Some(path) => Some(read_file_settings(path)?),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                Some(read_file_settings(default)?)
            } else {
                None
            }
        }
    };

    if let Some(file) = file {
        if let Some(v) = file.source {
            settings.source = v;
        }
        if let Some(v) = file.progress_target {
            settings.progress_target = v;
        }
        if let Some(v) = file.fingerprint {
            settings.fingerprint = v;
        }
        if let Some(v) = file.history_limit {
            settings.history_limit = v;
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn read_file_settings(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
}

fn apply_env(
    settings: &mut Settings,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = var("DASHBOARD_SOURCE") {
        settings.source = PathBuf::from(v);
    }
    if let Some(v) = var("DASHBOARD_PROGRESS_TARGET") {
        settings.progress_target = v
            .trim()
            .parse()
            .context("DASHBOARD_PROGRESS_TARGET must be a non-negative integer")?;
    }
    if let Some(v) = var("DASHBOARD_FINGERPRINT") {
        settings.fingerprint = v.parse()?;
    }
    if let Some(v) = var("DASHBOARD_HISTORY_LIMIT") {
        settings.history_limit = v
            .trim()
            .parse()
            .context("DASHBOARD_HISTORY_LIMIT must be a non-negative integer")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn file_values_override_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("dashboard.toml");
        fs::write(
            &path,
            "source = \"data/results.csv\"\nprogress_target = 500\nfingerprint = \"metadata\"\n",
        )?;

        let settings = load_settings(Some(&path))?;
        assert_eq!(settings.source, PathBuf::from("data/results.csv"));
        assert_eq!(settings.progress_target, 500);
        assert_eq!(settings.fingerprint, FingerprintMode::Metadata);
        assert_eq!(settings.history_limit, 20);
        Ok(())
    }

    #[test]
    fn unknown_keys_are_rejected() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("dashboard.toml");
        fs::write(&path, "sauce = \"x.csv\"\n")?;
        assert!(load_settings(Some(&path)).is_err());
        Ok(())
    }

    #[test]
    fn env_overrides_apply_last() -> anyhow::Result<()> {
        let env: HashMap<&str, &str> = [
            ("DASHBOARD_SOURCE", "other.csv"),
            ("DASHBOARD_FINGERPRINT", "Metadata"),
            ("DASHBOARD_HISTORY_LIMIT", " 5 "),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string()))?;
        assert_eq!(settings.source, PathBuf::from("other.csv"));
        assert_eq!(settings.fingerprint, FingerprintMode::Metadata);
        assert_eq!(settings.history_limit, 5);
        assert_eq!(settings.progress_target, 3000);
        Ok(())
    }

    #[test]
    fn bad_env_value_is_an_error() {
        let mut settings = Settings::default();
        let result = apply_env(&mut settings, |key| {
            (key == "DASHBOARD_PROGRESS_TARGET").then(|| "lots".to_string())
        });
        assert!(result.is_err());
    }
}
