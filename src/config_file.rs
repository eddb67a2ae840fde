//! On-disk configuration file support (spec §4.10).
//!
//! Every section is optional; a field or whole section left out of the
//! file falls back to [`crate::config::AppConfig`]'s defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{AbortConfig, AppConfig, CacheConfig, ChunkConfig, RateLimitConfig, RetryConfig};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub cache: Option<CacheSettings>,
    pub chunk: Option<ChunkSettings>,
    pub retry: Option<RetrySettings>,
    pub abort: Option<AbortSettings>,
    pub rate_limit: Option<RateLimitSettings>,
    pub logging: Option<LoggingSettings>,
    pub backends: Option<BackendSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    pub root_dir: Option<String>,
    pub ttl_secs: Option<u64>,
    pub max_entries: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSettings {
    pub batch_size: Option<usize>,
    pub pacing_ms: Option<u64>,
    pub concurrency: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    pub max_retries: Option<u32>,
    pub base_backoff_secs: Option<f64>,
    pub jitter_fraction: Option<f64>,
    pub max_backoff_secs: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbortSettings {
    pub consecutive_failures: Option<u32>,
    pub min_success_rate: Option<f64>,
    pub max_unchanged_fraction: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    pub capacity: Option<f64>,
    pub requests_per_sec: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error).
    pub level: Option<String>,
    /// Output format (json, pretty).
    pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Ordered fallback chain, e.g. `["deepl", "libretranslate"]`.
    pub chain: Option<Vec<String>>,
    pub journal_capacity: Option<usize>,
}

impl ConfigFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            crate::error::LitesubError::Config(format!("failed to serialize config file: {e}"))
        })?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    pub fn into_app_config(self) -> AppConfig {
        let defaults = AppConfig::default();

        let cache = self.cache.map(|c| CacheConfig {
            root_dir: c.root_dir.unwrap_or(defaults.cache.root_dir.clone()),
            ttl_secs: c.ttl_secs.unwrap_or(defaults.cache.ttl_secs),
            max_entries: c.max_entries.unwrap_or(defaults.cache.max_entries),
        });

        let chunk = self.chunk.map(|c| ChunkConfig {
            batch_size: c.batch_size.unwrap_or(defaults.chunk.batch_size),
            pacing_ms: c.pacing_ms.unwrap_or(defaults.chunk.pacing_ms),
            concurrency: c.concurrency.unwrap_or(defaults.chunk.concurrency),
        });

        let retry = self.retry.map(|r| RetryConfig {
            max_retries: r.max_retries.unwrap_or(defaults.retry.max_retries),
            base_backoff_secs: r.base_backoff_secs.unwrap_or(defaults.retry.base_backoff_secs),
            jitter_fraction: r.jitter_fraction.unwrap_or(defaults.retry.jitter_fraction),
            max_backoff_secs: r.max_backoff_secs.unwrap_or(defaults.retry.max_backoff_secs),
        });

        let abort = self.abort.map(|a| AbortConfig {
            consecutive_failures: a.consecutive_failures.unwrap_or(defaults.abort.consecutive_failures),
            min_success_rate: a.min_success_rate.unwrap_or(defaults.abort.min_success_rate),
            max_unchanged_fraction: a.max_unchanged_fraction.unwrap_or(defaults.abort.max_unchanged_fraction),
        });

        let rate_limit = self.rate_limit.map(|r| RateLimitConfig {
            capacity: r.capacity.unwrap_or(defaults.rate_limit.capacity),
            requests_per_sec: r.requests_per_sec.or(defaults.rate_limit.requests_per_sec),
        });

        let log_level = self.logging.and_then(|l| l.level).unwrap_or(defaults.log_level.clone());
        let backend_chain = self.backends.as_ref().and_then(|b| b.chain.clone()).unwrap_or(defaults.backend_chain.clone());
        let journal_capacity = self.backends.and_then(|b| b.journal_capacity).unwrap_or(defaults.journal_capacity);

        AppConfig {
            cache: cache.unwrap_or(defaults.cache),
            chunk: chunk.unwrap_or(defaults.chunk),
            retry: retry.unwrap_or(defaults.retry),
            abort: abort.unwrap_or(defaults.abort),
            rate_limit: rate_limit.unwrap_or(defaults.rate_limit),
            log_level,
            backend_chain,
            journal_capacity,
        }
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            cache: Some(CacheSettings {
                root_dir: Some(config.cache.root_dir.clone()),
                ttl_secs: Some(config.cache.ttl_secs),
                max_entries: Some(config.cache.max_entries),
            }),
            chunk: Some(ChunkSettings {
                batch_size: Some(config.chunk.batch_size),
                pacing_ms: Some(config.chunk.pacing_ms),
                concurrency: Some(config.chunk.concurrency),
            }),
            retry: Some(RetrySettings {
                max_retries: Some(config.retry.max_retries),
                base_backoff_secs: Some(config.retry.base_backoff_secs),
                jitter_fraction: Some(config.retry.jitter_fraction),
                max_backoff_secs: Some(config.retry.max_backoff_secs),
            }),
            abort: Some(AbortSettings {
                consecutive_failures: Some(config.abort.consecutive_failures),
                min_success_rate: Some(config.abort.min_success_rate),
                max_unchanged_fraction: Some(config.abort.max_unchanged_fraction),
            }),
            rate_limit: Some(RateLimitSettings {
                capacity: Some(config.rate_limit.capacity),
                requests_per_sec: config.rate_limit.requests_per_sec,
            }),
            logging: Some(LoggingSettings { level: Some(config.log_level.clone()), format: None }),
            backends: Some(BackendSettings {
                chain: Some(config.backend_chain.clone()),
                journal_capacity: Some(config.journal_capacity),
            }),
        }
    }
}

/// Write a fully-populated default configuration file to `path`.
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> crate::error::Result<()> {
    ConfigFile::from_app_config(&AppConfig::default()).to_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_falls_back_to_defaults_everywhere() {
        let file = ConfigFile::default();
        let app = file.into_app_config();
        let defaults = AppConfig::default();
        assert_eq!(app.chunk.batch_size, defaults.chunk.batch_size);
        assert_eq!(app.abort.max_unchanged_fraction, defaults.abort.max_unchanged_fraction);
    }

    #[test]
    fn partial_section_overrides_only_the_given_fields() {
        let mut file = ConfigFile::default();
        file.chunk = Some(ChunkSettings { batch_size: Some(42), pacing_ms: None, concurrency: None });
        let app = file.into_app_config();
        assert_eq!(app.chunk.batch_size, 42);
        assert_eq!(app.chunk.pacing_ms, AppConfig::default().chunk.pacing_ms);
    }

    #[test]
    fn round_trips_through_a_file() {
        let app = AppConfig::default();
        let file = ConfigFile::from_app_config(&app);
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(toml::to_string_pretty(&file).unwrap().as_bytes()).unwrap();
        let loaded = ConfigFile::from_file(temp.path()).unwrap();
        let reloaded_app = loaded.into_app_config();
        assert_eq!(reloaded_app.chunk.batch_size, app.chunk.batch_size);
    }

    #[test]
    fn generate_default_config_writes_a_loadable_file() {
        let temp = NamedTempFile::new().unwrap();
        generate_default_config(temp.path()).unwrap();
        let loaded = ConfigFile::from_file(temp.path()).unwrap();
        assert!(loaded.chunk.is_some());
    }
}
