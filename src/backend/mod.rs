//! Translation backend interface (spec §4.6): a single `translate_batch`
//! operation, typed failures, and a handful of concrete HTTP-backed
//! providers (spec's §4.6 host-service list, grounded in
//! `original_source/lib/translators.py`).

pub mod config;
pub mod providers;

use crate::error::BackendFailure;
use async_trait::async_trait;

pub use config::ProviderConfig;
pub use providers::{DeepLBackend, GoogleBackend, LibreTranslateBackend, LingvaBackend, MicrosoftBackend, MyMemoryBackend};

/// A translation service capable of translating a batch of strings while
/// preserving order (spec §4.6). Implementors must distinguish permanent
/// failures (auth, unsupported language pair) from transient ones (rate
/// limit, network) so the orchestrator's retry/fallback logic can react
/// correctly.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Stable identifier used in logs, the error journal, and cache
    /// fingerprints are NOT derived from this (fingerprints are
    /// source-uri/track/target-lang only, spec §4.5).
    fn name(&self) -> &str;

    /// Translate `texts` from `source_lang` to `target_lang`, returning a
    /// vector the same length and order as the input. A length mismatch
    /// should be reported as [`BackendFailure::ShapeMismatch`] rather than
    /// silently truncated or padded.
    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, BackendFailure>;
}

/// Build the concrete backend named by `provider`, one of `"deepl"`,
/// `"deepl_free"`, `"libretranslate"`, `"mymemory"`, `"google"`,
/// `"microsoft"`, or `"lingva"`. Unknown names fall back to
/// LibreTranslate, matching `get_translator`'s default in the original
/// service.
pub fn build_backend(provider: &str, config: ProviderConfig) -> Box<dyn TranslationBackend> {
    match provider {
        "deepl" => Box::new(DeepLBackend::new(config, false)),
        "deepl_free" => Box::new(DeepLBackend::new(config, true)),
        "mymemory" => Box::new(MyMemoryBackend::new(config)),
        "google" => Box::new(GoogleBackend::new(config)),
        "microsoft" => Box::new(MicrosoftBackend::new(config)),
        "lingva" => Box::new(LingvaBackend::new(config)),
        _ => Box::new(LibreTranslateBackend::new(config)),
    }
}

fn shape_check(texts: &[String], result: &[String]) -> Result<(), BackendFailure> {
    if texts.len() != result.len() {
        return Err(BackendFailure::ShapeMismatch {
            expected: texts.len(),
            got: result.len(),
        });
    }
    Ok(())
}

fn map_status(status: reqwest::StatusCode, retry_after: Option<f64>, body_hint: impl Into<String>) -> BackendFailure {
    match status.as_u16() {
        401 | 403 => BackendFailure::AuthMissing,
        429 => BackendFailure::RateLimited { retry_after },
        400..=499 => BackendFailure::Invalid(body_hint.into()),
        _ => BackendFailure::Transient(format!("http {status}: {}", body_hint.into())),
    }
}

/// Parse the `Retry-After` response header as a delay in seconds (spec
/// §4.6 "honor h if given"). Only the delay-seconds form is handled; an
/// HTTP-date value is ignored and treated as no hint, matching every
/// provider in the corpus, which sends delay-seconds.
fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> Option<f64> {
    headers.get(reqwest::header::RETRY_AFTER)?.to_str().ok()?.trim().parse::<f64>().ok()
}

fn map_reqwest_err(e: reqwest::Error) -> BackendFailure {
    if e.is_timeout() || e.is_connect() {
        BackendFailure::Transient(e.to_string())
    } else {
        BackendFailure::Transient(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_is_detected() {
        let texts = vec!["a".to_string(), "b".to_string()];
        let result = vec!["x".to_string()];
        let err = shape_check(&texts, &result).unwrap_err();
        assert!(matches!(err, BackendFailure::ShapeMismatch { expected: 2, got: 1 }));
    }

    #[test]
    fn unknown_provider_falls_back_to_libretranslate() {
        let backend = build_backend("nonexistent", ProviderConfig::default());
        assert_eq!(backend.name(), "libretranslate");
    }

    #[test]
    fn map_status_429_carries_the_retry_after_hint() {
        let status = reqwest::StatusCode::from_u16(429).unwrap();
        let err = map_status(status, Some(2.5), "slow down");
        assert!(matches!(err, BackendFailure::RateLimited { retry_after: Some(s) } if s == 2.5));
    }

    #[test]
    fn retry_after_secs_parses_a_delay_seconds_header() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::RETRY_AFTER, "7".parse().unwrap());
        assert_eq!(retry_after_secs(&headers), Some(7.0));
    }

    #[test]
    fn retry_after_secs_is_none_without_the_header() {
        let headers = reqwest::header::HeaderMap::new();
        assert_eq!(retry_after_secs(&headers), None);
    }
}
