//! Orchestrator and ambient runtime configuration (spec §4.10).

use serde::{Deserialize, Serialize};

/// Cache store configuration (spec §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory cached subtitle documents and sidecars are written under.
    pub root_dir: String,

    /// Default time-to-live for a cache entry, in seconds.
    pub ttl_secs: u64,

    /// Maximum number of cache entries kept after eviction.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root_dir: "litesub-cache".to_string(),
            ttl_secs: 30 * 24 * 3600,
            max_entries: 1000,
        }
    }
}

/// Batch chunking configuration (spec §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Entries per translation batch.
    pub batch_size: usize,

    /// Minimum delay between consecutive batch dispatches, in
    /// milliseconds (spec §4.7 "inter-batch pacing").
    pub pacing_ms: u64,

    /// Number of batches dispatched concurrently (spec §5, default 1).
    pub concurrency: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self { batch_size: 15, pacing_ms: 500, concurrency: 1 }
    }
}

/// Per-batch retry/backoff configuration (spec §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum same-backend retries before moving to the fallback chain.
    pub max_retries: u32,

    /// Base backoff in seconds: `base * 2^attempt`, jittered.
    pub base_backoff_secs: f64,

    /// Backoff jitter as a fraction of the computed delay (±20% default).
    pub jitter_fraction: f64,

    /// Backoff cap in seconds.
    pub max_backoff_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: 3, base_backoff_secs: 0.5, jitter_fraction: 0.2, max_backoff_secs: 32.0 }
    }
}

/// Abort-condition thresholds (spec §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbortConfig {
    /// Consecutive batch failures (across the whole fallback chain) that
    /// abort the job.
    pub consecutive_failures: u32,

    /// Minimum fraction of batches that must succeed by the end of the
    /// job, else it's reported as failed.
    pub min_success_rate: f64,

    /// Fraction of translated entries that may come back unchanged from
    /// the input before the job is judged a silent no-op and aborted.
    pub max_unchanged_fraction: f64,
}

impl Default for AbortConfig {
    fn default() -> Self {
        Self { consecutive_failures: 3, min_success_rate: 0.5, max_unchanged_fraction: 0.95 }
    }
}

/// Rate limiter configuration (spec §5), one bucket per backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Bucket capacity (burst size).
    pub capacity: f64,

    /// Sustained refill rate, requests/sec. `None` disables limiting.
    pub requests_per_sec: Option<f64>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { capacity: 5.0, requests_per_sec: Some(2.0) }
    }
}

/// Top-level application configuration, the union of everything the
/// orchestrator and its collaborators need (spec §4.10).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub cache: CacheConfig,
    pub chunk: ChunkConfig,
    pub retry: RetryConfig,
    pub abort: AbortConfig,
    pub rate_limit: RateLimitConfig,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Ordered list of provider names to try, e.g.
    /// `["deepl", "libretranslate"]` (spec §4.7 "fallback chain").
    pub backend_chain: Vec<String>,

    /// Error journal capacity (spec §4.9).
    pub journal_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            chunk: ChunkConfig::default(),
            retry: RetryConfig::default(),
            abort: AbortConfig::default(),
            rate_limit: RateLimitConfig::default(),
            log_level: "info".to_string(),
            backend_chain: vec!["libretranslate".to_string()],
            journal_capacity: crate::journal::DEFAULT_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// any section the file omits (spec §4.10).
    pub fn from_file(path: &str) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: crate::config_file::ConfigFile = toml::from_str(&content)?;
        Ok(file.into_app_config())
    }

    pub fn to_file(&self, path: &str) -> crate::error::Result<()> {
        let file = crate::config_file::ConfigFile::from_app_config(self);
        let content = toml::to_string_pretty(&file).map_err(|e| {
            crate::error::LitesubError::Config(format!("failed to serialize config: {e}"))
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = AppConfig::default();
        assert_eq!(config.chunk.batch_size, 15);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.abort.max_unchanged_fraction, 0.95);
    }
}
