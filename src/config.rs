// ⚙️ Configuration - Environment-driven settings for the binary

use crate::storage::{FileStorage, SqliteStorage, StoragePort};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub const ENV_DATA_DIR: &str = "WASTE_WISE_DATA_DIR";
pub const ENV_BACKEND: &str = "WASTE_WISE_BACKEND";
pub const ENV_SEED: &str = "WASTE_WISE_SEED";
pub const ENV_IDENTIFY_DELAY_MS: &str = "WASTE_WISE_IDENTIFY_DELAY_MS";
pub const ENV_MAX_IMAGE_BYTES: &str = "WASTE_WISE_MAX_IMAGE_BYTES";

pub const DEFAULT_LOG_FILTER: &str = "warn";
pub const DEFAULT_IDENTIFY_DELAY_MS: u64 = 1500;
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Log filter from `RUST_LOG`, falling back to warnings and above
pub fn log_filter() -> EnvFilter {
    log_filter_from(env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

pub fn log_filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub backend: StorageBackend,
    pub rng_seed: Option<u64>,
    pub identify_delay_ms: u64,
    pub max_image_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: default_data_dir(env::var("HOME").ok()),
            backend: StorageBackend::File,
            rng_seed: None,
            identify_delay_ms: DEFAULT_IDENTIFY_DELAY_MS,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

fn default_data_dir(home: Option<String>) -> PathBuf {
    match home {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(".waste-wise"),
        _ => PathBuf::from(".waste-wise"),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig {
            data_dir: default_data_dir(lookup("HOME")),
            ..AppConfig::default()
        };

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|d| !d.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(backend) = lookup(ENV_BACKEND) {
            config.backend = match backend.trim().to_lowercase().as_str() {
                "file" => StorageBackend::File,
                "sqlite" => StorageBackend::Sqlite,
                other => bail!("{} must be 'file' or 'sqlite', got '{}'", ENV_BACKEND, other),
            };
        }

        if let Some(seed) = lookup(ENV_SEED) {
            config.rng_seed = Some(
                seed.trim()
                    .parse()
                    .with_context(|| format!("{} is not a valid u64: '{}'", ENV_SEED, seed))?,
            );
        }

        if let Some(delay) = lookup(ENV_IDENTIFY_DELAY_MS) {
            config.identify_delay_ms = delay.trim().parse().with_context(|| {
                format!("{} is not a valid millisecond count: '{}'", ENV_IDENTIFY_DELAY_MS, delay)
            })?;
        }

        if let Some(max) = lookup(ENV_MAX_IMAGE_BYTES) {
            config.max_image_bytes = max.trim().parse().with_context(|| {
                format!("{} is not a valid byte count: '{}'", ENV_MAX_IMAGE_BYTES, max)
            })?;
        }

        Ok(config)
    }

    pub fn identify_delay(&self) -> Duration {
        Duration::from_millis(self.identify_delay_ms)
    }

    /// Open the configured storage backend under `data_dir`
    pub fn open_storage(&self) -> Result<Box<dyn StoragePort>> {
        let storage: Box<dyn StoragePort> = match self.backend {
            StorageBackend::File => Box::new(FileStorage::open(&self.data_dir)?),
            StorageBackend::Sqlite => {
                std::fs::create_dir_all(&self.data_dir).with_context(|| {
                    format!("Failed to create data directory: {:?}", self.data_dir)
                })?;
                Box::new(SqliteStorage::open(self.data_dir.join("waste.db"))?)
            }
        };
        Ok(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tracing_subscriber::filter::LevelFilter;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[("HOME", "/home/sam")])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/home/sam/.waste-wise"));
        assert_eq!(config.backend, StorageBackend::File);
        assert_eq!(config.rng_seed, None);
        assert_eq!(config.identify_delay(), Duration::from_millis(1500));
        assert_eq!(config.max_image_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_no_home_uses_relative_dir() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".waste-wise"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_DATA_DIR, "/tmp/ww"),
            (ENV_BACKEND, "SQLite"),
            (ENV_SEED, "42"),
            (ENV_IDENTIFY_DELAY_MS, "0"),
            (ENV_MAX_IMAGE_BYTES, "1024"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/ww"));
        assert_eq!(config.backend, StorageBackend::Sqlite);
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.identify_delay_ms, 0);
        assert_eq!(config.max_image_bytes, 1024);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(AppConfig::from_lookup(lookup_from(&[(ENV_BACKEND, "redis")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[(ENV_SEED, "abc")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[(ENV_IDENTIFY_DELAY_MS, "-1")])).is_err());
    }

    #[test]
    fn test_log_filter_honours_rust_log() {
        assert_eq!(log_filter_from(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            log_filter_from(Some("waste_wise=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter_from(None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter_from(Some("  ")).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_open_storage_backends() {
        let dir = tempfile::tempdir().unwrap();

        for backend in [StorageBackend::File, StorageBackend::Sqlite] {
            let config = AppConfig {
                data_dir: dir.path().join(format!("{:?}", backend)),
                backend,
                ..AppConfig::default()
            };
            let storage = config.open_storage().unwrap();
            storage.write("probe", "ok").unwrap();
            assert_eq!(storage.read("probe").unwrap(), Some("ok".to_string()));
        }
    }
}
