//! The translate-and-publish orchestrator (spec §4.7): drives one job
//! through `Init -> Selecting -> CacheLookup -> (Hit -> Publish) | (Miss ->
//! Extract -> Parse -> Translate -> Generate -> Publish) -> Done | Failed |
//! Cancelled`.

pub mod chunk;
pub mod retry;

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use parking_lot::Mutex;

use crate::backend::TranslationBackend;
use crate::cache::{CacheStore, Fingerprint};
use crate::config::AppConfig;
use crate::error::{BackendFailure, LitesubError, Result};
use crate::extractor::MatroskaExtractor;
use crate::host::HostCollaborator;
use crate::journal::ErrorJournal;
use crate::progress::{ProgressTracker, Stage};
use crate::ratelimit::RateLimiter;
use crate::subtitle::{self, SubtitleEntry, SubtitleFormat};

/// One translation job request (spec §6 "External Interfaces").
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub source_path: PathBuf,
    /// Stable identifier for the source used in the cache fingerprint;
    /// usually the source path, but may be a URI for remote sources.
    pub source_uri: String,
    pub track_index: usize,
    pub source_lang: String,
    pub target_lang: String,
    /// Output format to generate; defaults to the source track's own
    /// format when `None`.
    pub output_format: Option<SubtitleFormat>,
}

/// The job's terminal state.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    Done { document: String, format: SubtitleFormat, from_cache: bool },
    Cancelled,
}

pub struct Orchestrator {
    config: AppConfig,
    cache: CacheStore,
    backends: Vec<Box<dyn TranslationBackend>>,
    rate_limiters: Vec<RateLimiter>,
    journal: Mutex<ErrorJournal>,
}

impl Orchestrator {
    pub fn new(config: AppConfig, backends: Vec<Box<dyn TranslationBackend>>) -> Result<Self> {
        let cache = CacheStore::new(&config.cache.root_dir, config.cache.ttl_secs, config.cache.max_entries)?;
        let rate_limiters = backends
            .iter()
            .map(|_| match config.rate_limit.requests_per_sec {
                Some(rps) => RateLimiter::new(config.rate_limit.capacity, rps),
                None => RateLimiter::unlimited(),
            })
            .collect();
        let journal = Mutex::new(ErrorJournal::new(config.journal_capacity));
        Ok(Self { config, cache, backends, rate_limiters, journal })
    }

    pub fn journal(&self) -> &Mutex<ErrorJournal> {
        &self.journal
    }

    /// Run one job to completion.
    pub async fn run(&self, request: JobRequest, host: &dyn HostCollaborator) -> Result<JobOutcome> {
        let mut tracker = ProgressTracker::new(1);
        host.on_progress(&tracker.set_stage(Stage::Init));

        let fingerprint = Fingerprint::compute(&request.source_uri, request.track_index, &request.target_lang);

        host.on_progress(&tracker.set_stage(Stage::Extract));
        if let Some((document, extension)) = self.cache.lookup_with_extension(&fingerprint)? {
            let format = extension_to_format(&extension);
            host.on_progress(&tracker.set_stage(Stage::Complete));
            return Ok(JobOutcome::Done { document, format, from_cache: true });
        }

        if host.is_cancelled() {
            return Ok(JobOutcome::Cancelled);
        }

        let host_streams = host.list_embedded_subtitle_streams(&request.source_uri)?;
        let (source_entries, source_format, codec_private) = if host_streams.is_empty() {
            let mut extractor = MatroskaExtractor::open(&request.source_path)?;
            let extracted = extractor.extract(request.track_index)?;
            let codec_private = String::from_utf8_lossy(&extracted.codec_private).into_owned();
            (extracted.entries, extracted.format, codec_private)
        } else {
            let stream = host_streams.get(request.track_index).ok_or(LitesubError::TrackIndexOutOfRange {
                requested: request.track_index,
                available: host_streams.len(),
            })?;
            let bytes = host.extract_subtitle_stream(&request.source_uri, stream.index)?;
            let text = String::from_utf8_lossy(&bytes).into_owned();
            let (entries, format) = subtitle::parse_by_extension(&text, &stream.codec)?;
            (entries, format, String::new())
        };

        host.on_progress(&tracker.set_stage(Stage::Parse));
        let output_format = request.output_format.unwrap_or(source_format);

        if host.is_cancelled() {
            return Ok(JobOutcome::Cancelled);
        }

        host.on_progress(&tracker.set_stage(Stage::Translate));
        tracker = ProgressTracker::new(source_entries.len().max(1));
        let translate_outcome = self
            .translate_all(&source_entries, &request.source_lang, &request.target_lang, host, &mut tracker)
            .await?;

        let TranslateOutcome::Completed(translated_texts) = translate_outcome else {
            return Ok(JobOutcome::Cancelled);
        };

        let translated_entries: Vec<SubtitleEntry> = source_entries
            .iter()
            .zip(translated_texts.into_iter())
            .map(|(entry, text)| SubtitleEntry { text, ..entry.clone() })
            .collect();

        host.on_progress(&tracker.set_stage(Stage::Format));
        let document = subtitle::generate(
            &translated_entries,
            output_format,
            if codec_private.is_empty() { None } else { Some(codec_private.as_str()) },
        )?;

        host.on_progress(&tracker.set_stage(Stage::Save));
        self.cache.put(&fingerprint, output_format.extension(), &document, None)?;

        host.on_progress(&tracker.set_stage(Stage::Complete));
        Ok(JobOutcome::Done { document, format: output_format, from_cache: false })
    }

    async fn translate_all(
        &self,
        entries: &[SubtitleEntry],
        source_lang: &str,
        target_lang: &str,
        host: &dyn HostCollaborator,
        tracker: &mut ProgressTracker,
    ) -> Result<TranslateOutcome> {
        let texts: Vec<String> = entries.iter().map(|e| e.text.clone()).collect();
        let ranges = chunk::chunk_ranges(texts.len(), self.config.chunk.batch_size);
        if ranges.is_empty() {
            return Ok(TranslateOutcome::Completed(Vec::new()));
        }

        let mut results: Vec<Option<String>> = vec![None; texts.len()];
        let disqualified: Vec<std::sync::atomic::AtomicBool> =
            (0..self.backends.len()).map(|_| std::sync::atomic::AtomicBool::new(false)).collect();
        let mut consecutive_failures = 0u32;
        let mut batches_total = 0usize;
        let mut batches_succeeded = 0usize;

        let concurrency = self.config.chunk.concurrency.max(1);
        let groups: Vec<&[(usize, usize)]> = ranges.chunks(concurrency).collect();
        let last_group = groups.len().saturating_sub(1);
        let mut done_so_far = 0usize;

        for (group_idx, group) in groups.into_iter().enumerate() {
            if host.is_cancelled() {
                return Ok(TranslateOutcome::Cancelled);
            }

            let group_results: Vec<std::result::Result<Vec<Option<String>>, ()>> = futures::future::join_all(
                group
                    .iter()
                    .map(|&range| self.translate_range(&texts, range, source_lang, target_lang, &disqualified, host)),
            )
            .await;

            if group_results.iter().any(|r| r.is_err()) {
                return Ok(TranslateOutcome::Cancelled);
            }
            let group_results: Vec<Vec<Option<String>>> = group_results.into_iter().map(|r| r.unwrap()).collect();

            for (range, range_result) in group.iter().zip(group_results.iter()) {
                batches_total += 1;
                let all_failed = range_result.iter().all(Option::is_none);
                if all_failed {
                    consecutive_failures += 1;
                    self.journal.lock().record(
                        "batch_failed",
                        format!("batch {}..{} exhausted every backend", range.0, range.1),
                        Some(batches_total),
                    );
                } else {
                    consecutive_failures = 0;
                    batches_succeeded += 1;
                }
                if consecutive_failures >= self.config.abort.consecutive_failures {
                    return Err(LitesubError::TranslationAborted { consecutive_failures });
                }
                for (i, value) in range_result.iter().enumerate() {
                    results[range.0 + i] = value.clone();
                }
            }

            let done = group.last().map(|r| r.1).unwrap_or(done_so_far);
            let delta = done.saturating_sub(done_so_far);
            done_so_far = done;
            host.on_progress(&tracker.record_progress(delta, None));

            if group_idx != last_group {
                if host.is_cancelled() {
                    return Ok(TranslateOutcome::Cancelled);
                }
                tokio::time::sleep(std::time::Duration::from_millis(self.config.chunk.pacing_ms)).await;
            }
        }

        if batches_total > 0 {
            let success_rate = batches_succeeded as f64 / batches_total as f64;
            if success_rate < self.config.abort.min_success_rate {
                return Err(LitesubError::SuccessRateTooLow { succeeded: batches_succeeded, total: batches_total });
            }
        }

        let mut unchanged = 0usize;
        let mut attempted = 0usize;
        for (original, translated) in texts.iter().zip(results.iter()) {
            if let Some(t) = translated {
                attempted += 1;
                if t.trim() == original.trim() {
                    unchanged += 1;
                }
            }
        }
        if attempted > 0 {
            let fraction = unchanged as f64 / attempted as f64;
            if fraction >= self.config.abort.max_unchanged_fraction {
                return Err(LitesubError::NoProgress { unchanged, total: attempted });
            }
        }

        let final_texts: Vec<String> = results
            .into_iter()
            .zip(texts.into_iter())
            .map(|(translated, original)| translated.unwrap_or(original))
            .collect();
        Ok(TranslateOutcome::Completed(final_texts))
    }

    /// Translate one batch, bisecting on [`BackendFailure::ShapeMismatch`]
    /// and falling back to the original text for any entry that could not
    /// be translated by any backend (spec §4.7 "partial tolerance").
    ///
    /// `Err(())` means the job was cancelled mid-backoff; callers must
    /// propagate it as [`TranslateOutcome::Cancelled`] rather than treating
    /// it as a batch failure.
    fn translate_range<'a>(
        &'a self,
        texts: &'a [String],
        range: (usize, usize),
        source_lang: &'a str,
        target_lang: &'a str,
        disqualified: &'a [std::sync::atomic::AtomicBool],
        host: &'a dyn HostCollaborator,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<Vec<Option<String>>, ()>> + Send + 'a>> {
        Box::pin(async move {
            let (start, end) = range;
            let slice = &texts[start..end];
            match self.try_backend_chain(slice, source_lang, target_lang, disqualified, range, host).await {
                Ok(result) => Ok(result.into_iter().map(Some).collect()),
                Err(ChainError::Cancelled) => Err(()),
                Err(ChainError::Backend(BackendFailure::ShapeMismatch { .. })) => {
                    if let Some((a, b)) = chunk::bisect(range) {
                        let mut left =
                            self.translate_range(texts, a, source_lang, target_lang, disqualified, host).await?;
                        let right =
                            self.translate_range(texts, b, source_lang, target_lang, disqualified, host).await?;
                        left.extend(right);
                        Ok(left)
                    } else {
                        Ok(vec![None; end - start])
                    }
                }
                Err(ChainError::Backend(_)) => Ok(vec![None; end - start]),
            }
        })
    }

    async fn try_backend_chain(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
        disqualified: &[std::sync::atomic::AtomicBool],
        range: (usize, usize),
        host: &dyn HostCollaborator,
    ) -> std::result::Result<Vec<String>, ChainError> {
        use std::sync::atomic::Ordering;

        let mut last_err = BackendFailure::Transient("no backends configured".into());
        for (idx, backend) in self.backends.iter().enumerate() {
            if disqualified.get(idx).map(|d| d.load(Ordering::Relaxed)).unwrap_or(false) {
                continue;
            }
            let limiter = &self.rate_limiters[idx];
            let mut attempt = 0u32;
            loop {
                limiter.acquire().await;
                let result = backend.translate_batch(texts, source_lang, target_lang).await;
                // A single-entry batch can never be bisected further, so a
                // shape mismatch on one is treated as transient and retried
                // rather than immediately surfaced (spec §4.7).
                let result = match result {
                    Err(BackendFailure::ShapeMismatch { expected, got }) if texts.len() == 1 => Err(
                        BackendFailure::Transient(format!("shape mismatch on single-entry batch (expected {expected}, got {got})")),
                    ),
                    other => other,
                };
                match result {
                    Ok(result) => return Ok(result),
                    Err(e @ BackendFailure::ShapeMismatch { .. }) => return Err(ChainError::Backend(e)),
                    Err(e) if e.is_permanent() => {
                        if let Some(flag) = disqualified.get(idx) {
                            flag.store(true, Ordering::Relaxed);
                        }
                        self.journal.lock().record(
                            "permanent",
                            format!("{} batch {}..{}: {e}", backend.name(), range.0, range.1),
                            None,
                        );
                        last_err = e;
                        break;
                    }
                    Err(e) if e.is_retryable() && attempt < self.config.retry.max_retries => {
                        self.journal.lock().record(
                            "retryable",
                            format!("{} batch {}..{} attempt {attempt}: {e}", backend.name(), range.0, range.1),
                            None,
                        );
                        let delay = retry_delay_for(&self.config.retry, &e, attempt);
                        if cancellable_sleep(delay, host).await {
                            return Err(ChainError::Cancelled);
                        }
                        attempt += 1;
                        last_err = e;
                        continue;
                    }
                    Err(e) => {
                        self.journal.lock().record(
                            "batch_failed",
                            format!("{} batch {}..{}: {e}", backend.name(), range.0, range.1),
                            None,
                        );
                        last_err = e;
                        break;
                    }
                }
            }
        }
        Err(ChainError::Backend(last_err))
    }
}

/// A [`try_backend_chain`] failure: either every usable backend failed, or
/// the job was cancelled while waiting out a retry backoff.
enum ChainError {
    Backend(BackendFailure),
    Cancelled,
}

/// Delay before the next retry attempt: a `RateLimited` hint is honored
/// verbatim, else the usual jittered backoff applies (spec §4.6 "on
/// RateLimited(h), honor h if given else backoff as above").
fn retry_delay_for(config: &crate::config::RetryConfig, failure: &BackendFailure, attempt: u32) -> std::time::Duration {
    match failure {
        BackendFailure::RateLimited { retry_after: Some(secs) } => std::time::Duration::from_secs_f64(secs.max(0.0)),
        _ => retry::backoff_delay(config, attempt),
    }
}

/// Sleep for `delay`, racing it against a poll of `host.is_cancelled()` so a
/// cancellation request interrupts the wait instead of being delayed until
/// the backoff completes (spec §4.7/§5: "cancellation interrupts the
/// sleep"). Returns `true` if cancelled before the delay elapsed.
async fn cancellable_sleep(delay: std::time::Duration, host: &dyn HostCollaborator) -> bool {
    const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);

    async fn wait_for_cancellation(host: &dyn HostCollaborator) {
        loop {
            if host.is_cancelled() {
                return;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    tokio::select! {
        _ = tokio::time::sleep(delay) => false,
        _ = wait_for_cancellation(host) => true,
    }
}

enum TranslateOutcome {
    Completed(Vec<String>),
    Cancelled,
}

fn extension_to_format(extension: &str) -> SubtitleFormat {
    match extension {
        "ass" => SubtitleFormat::Ass,
        "ssa" => SubtitleFormat::Ssa,
        "vtt" | "webvtt" => SubtitleFormat::WebVtt,
        _ => SubtitleFormat::Srt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::TranslationBackend;
    use crate::config::RetryConfig;
    use crate::host::NullHost;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoBackend;

    #[async_trait]
    impl TranslationBackend for EchoBackend {
        fn name(&self) -> &str {
            "echo"
        }
        async fn translate_batch(
            &self,
            texts: &[String],
            _source_lang: &str,
            _target_lang: &str,
        ) -> std::result::Result<Vec<String>, BackendFailure> {
            Ok(texts.iter().map(|t| format!("[{t}]")).collect())
        }
    }

    struct AlwaysFailsBackend;

    #[async_trait]
    impl TranslationBackend for AlwaysFailsBackend {
        fn name(&self) -> &str {
            "always-fails"
        }
        async fn translate_batch(
            &self,
            _texts: &[String],
            _source_lang: &str,
            _target_lang: &str,
        ) -> std::result::Result<Vec<String>, BackendFailure> {
            Err(BackendFailure::Transient("down".into()))
        }
    }

    fn entries(n: usize) -> Vec<SubtitleEntry> {
        (0..n)
            .map(|i| SubtitleEntry {
                index: i + 1,
                start_ms: i as i64 * 1000,
                end_ms: i as i64 * 1000 + 900,
                text: format!("line {i}"),
                style: None,
            })
            .collect()
    }

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.chunk.batch_size = 5;
        config.chunk.pacing_ms = 0;
        config.retry.max_retries = 1;
        config.retry.base_backoff_secs = 0.0;
        config.retry.jitter_fraction = 0.0;
        config
    }

    #[tokio::test]
    async fn translate_all_applies_backend_to_every_entry() {
        let config = test_config();
        let orchestrator = Orchestrator::new(config, vec![Box::new(EchoBackend)]).unwrap();
        let es = entries(12);
        let mut tracker = ProgressTracker::new(es.len());
        let outcome = orchestrator.translate_all(&es, "en", "fr", &NullHost, &mut tracker).await.unwrap();
        let TranslateOutcome::Completed(texts) = outcome else { panic!("expected completion") };
        assert_eq!(texts.len(), 12);
        assert!(texts.iter().all(|t| t.starts_with('[') && t.ends_with(']')));
    }

    #[tokio::test]
    async fn translate_all_aborts_after_consecutive_failures() {
        let mut config = test_config();
        config.abort.consecutive_failures = 2;
        config.chunk.batch_size = 2;
        let orchestrator = Orchestrator::new(config, vec![Box::new(AlwaysFailsBackend)]).unwrap();
        let es = entries(10);
        let mut tracker = ProgressTracker::new(es.len());
        let result = orchestrator.translate_all(&es, "en", "fr", &NullHost, &mut tracker).await;
        assert!(matches!(result, Err(LitesubError::TranslationAborted { .. })));
    }

    #[tokio::test]
    async fn fallback_chain_moves_past_permanently_disqualified_backend() {
        struct NoAuthBackend;
        #[async_trait]
        impl TranslationBackend for NoAuthBackend {
            fn name(&self) -> &str {
                "no-auth"
            }
            async fn translate_batch(
                &self,
                _texts: &[String],
                _s: &str,
                _t: &str,
            ) -> std::result::Result<Vec<String>, BackendFailure> {
                Err(BackendFailure::AuthMissing)
            }
        }

        let config = test_config();
        let orchestrator =
            Orchestrator::new(config, vec![Box::new(NoAuthBackend), Box::new(EchoBackend)]).unwrap();
        let es = entries(3);
        let mut tracker = ProgressTracker::new(es.len());
        let outcome = orchestrator.translate_all(&es, "en", "fr", &NullHost, &mut tracker).await.unwrap();
        let TranslateOutcome::Completed(texts) = outcome else { panic!("expected completion") };
        assert!(texts.iter().all(|t| t.starts_with('[')));
    }

    #[tokio::test]
    async fn no_progress_is_detected_when_backend_echoes_input() {
        struct SilentBackend;
        #[async_trait]
        impl TranslationBackend for SilentBackend {
            fn name(&self) -> &str {
                "silent"
            }
            async fn translate_batch(
                &self,
                texts: &[String],
                _s: &str,
                _t: &str,
            ) -> std::result::Result<Vec<String>, BackendFailure> {
                Ok(texts.to_vec())
            }
        }

        let config = test_config();
        let orchestrator = Orchestrator::new(config, vec![Box::new(SilentBackend)]).unwrap();
        let es = entries(10);
        let mut tracker = ProgressTracker::new(es.len());
        let result = orchestrator.translate_all(&es, "en", "fr", &NullHost, &mut tracker).await;
        assert!(matches!(result, Err(LitesubError::NoProgress { .. })));
    }

    #[tokio::test]
    async fn cancellation_between_batches_stops_without_error() {
        struct CancelAfterFirst {
            calls: AtomicUsize,
        }
        impl HostCollaborator for CancelAfterFirst {
            fn on_progress(&self, _u: &crate::progress::ProgressUpdate) {}
            fn on_warning(&self, _m: &str) {}
            fn is_cancelled(&self) -> bool {
                self.calls.fetch_add(1, Ordering::SeqCst) >= 1
            }
        }

        let mut config = test_config();
        config.chunk.batch_size = 2;
        let orchestrator = Orchestrator::new(config, vec![Box::new(EchoBackend)]).unwrap();
        let es = entries(10);
        let host = CancelAfterFirst { calls: AtomicUsize::new(0) };
        let mut tracker = ProgressTracker::new(es.len());
        let outcome = orchestrator.translate_all(&es, "en", "fr", &host, &mut tracker).await.unwrap();
        assert!(matches!(outcome, TranslateOutcome::Cancelled));
    }

    #[test]
    fn retry_delay_honors_rate_limited_hint_over_backoff() {
        let config = RetryConfig { max_retries: 3, base_backoff_secs: 0.5, jitter_fraction: 0.0, max_backoff_secs: 32.0 };
        let failure = BackendFailure::RateLimited { retry_after: Some(9.5) };
        assert_eq!(retry_delay_for(&config, &failure, 0), std::time::Duration::from_secs_f64(9.5));
    }

    #[test]
    fn retry_delay_falls_back_to_backoff_without_a_hint() {
        let config = RetryConfig { max_retries: 3, base_backoff_secs: 0.5, jitter_fraction: 0.0, max_backoff_secs: 32.0 };
        let failure = BackendFailure::RateLimited { retry_after: None };
        assert_eq!(retry_delay_for(&config, &failure, 1), std::time::Duration::from_secs_f64(1.0));
    }

    struct MismatchThenOkBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TranslationBackend for MismatchThenOkBackend {
        fn name(&self) -> &str {
            "mismatch-then-ok"
        }
        async fn translate_batch(
            &self,
            texts: &[String],
            _s: &str,
            _t: &str,
        ) -> std::result::Result<Vec<String>, BackendFailure> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(BackendFailure::ShapeMismatch { expected: 1, got: 2 })
            } else {
                Ok(texts.iter().map(|t| format!("[{t}]")).collect())
            }
        }
    }

    #[tokio::test]
    async fn single_entry_shape_mismatch_is_retried_instead_of_dropped() {
        let mut config = test_config();
        config.chunk.batch_size = 1;
        let orchestrator =
            Orchestrator::new(config, vec![Box::new(MismatchThenOkBackend { calls: AtomicUsize::new(0) })]).unwrap();
        let es = entries(1);
        let mut tracker = ProgressTracker::new(es.len());
        let outcome = orchestrator.translate_all(&es, "en", "fr", &NullHost, &mut tracker).await.unwrap();
        let TranslateOutcome::Completed(texts) = outcome else { panic!("expected completion") };
        assert_eq!(texts, vec!["[line 0]".to_string()]);
    }

    #[tokio::test]
    async fn cancellation_interrupts_backoff_sleep() {
        // Cancels on the third `is_cancelled` poll: the first is
        // `translate_all`'s pre-dispatch check (not yet cancelled), the
        // rest are the backoff poll loop. If the sleep were not
        // interruptible this test would have to wait out the full 5s
        // backoff; instead it resolves after one 100ms poll tick.
        struct CancelAfterTwoPolls {
            calls: AtomicUsize,
        }
        impl HostCollaborator for CancelAfterTwoPolls {
            fn on_progress(&self, _u: &crate::progress::ProgressUpdate) {}
            fn on_warning(&self, _m: &str) {}
            fn is_cancelled(&self) -> bool {
                self.calls.fetch_add(1, Ordering::SeqCst) >= 2
            }
        }

        let mut config = test_config();
        config.retry.base_backoff_secs = 5.0;
        config.retry.max_retries = 2;
        let orchestrator = Orchestrator::new(config, vec![Box::new(AlwaysFailsBackend)]).unwrap();
        let es = entries(3);
        let host = CancelAfterTwoPolls { calls: AtomicUsize::new(0) };
        let mut tracker = ProgressTracker::new(es.len());
        let outcome = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            orchestrator.translate_all(&es, "en", "fr", &host, &mut tracker),
        )
        .await
        .expect("backoff sleep should have been interrupted well before the 2s test timeout")
        .unwrap();
        assert!(matches!(outcome, TranslateOutcome::Cancelled));
    }
}
