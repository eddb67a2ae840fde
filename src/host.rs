//! Host collaborator interface (spec §4.12, §6): the orchestrator reports
//! progress and surfaces prompts through this trait rather than assuming
//! any particular UI. Grounded in the same "injected collaborator" shape
//! as the teacher's `AppState` being passed into request handlers.

use std::path::Path;

use crate::error::{LitesubError, Result};
use crate::progress::ProgressUpdate;

/// One subtitle stream as enumerated by a host that already knows how to
/// demux its own media (spec §6 `list_embedded_subtitle_streams`).
#[derive(Debug, Clone)]
pub struct StreamInfo {
    pub index: usize,
    /// A recognized subtitle extension (`"srt"`, `"ass"`, `"ssa"`, `"vtt"`),
    /// not a raw Matroska codec ID.
    pub codec: String,
    pub language: String,
    pub forced: bool,
    pub default: bool,
    pub title: Option<String>,
}

/// Host-side integration point. A CLI driver, a GUI, or a test harness
/// each implement this differently; the orchestrator only depends on the
/// trait.
pub trait HostCollaborator: Send + Sync {
    /// Called whenever the orchestrator's progress state changes.
    fn on_progress(&self, update: &ProgressUpdate);

    /// Called when a non-fatal warning occurs (e.g. a batch retried, a
    /// block was discarded as empty).
    fn on_warning(&self, message: &str);

    /// Whether the job should stop at the next cancellation checkpoint
    /// (spec §4.7: "cooperative one-shot cancellation at batch/sleep/stage
    /// boundaries").
    fn is_cancelled(&self) -> bool {
        false
    }

    /// Enumerate subtitle streams the host already knows about for
    /// `video_uri` (spec §6). An empty result tells the orchestrator to
    /// fall back to its own Matroska extractor, which is the only path
    /// this crate exercises directly; hosts fronting other containers
    /// override this.
    fn list_embedded_subtitle_streams(&self, _video_uri: &str) -> Result<Vec<StreamInfo>> {
        Ok(Vec::new())
    }

    /// Fetch the raw subtitle bytes for one stream a prior
    /// `list_embedded_subtitle_streams` call reported (spec §6, "reserved
    /// for non-Matroska inputs"). The default errs since the default
    /// listing is always empty.
    fn extract_subtitle_stream(&self, _video_uri: &str, _relative_index: usize) -> Result<Vec<u8>> {
        Err(LitesubError::UnsupportedCodec(
            "host does not provide out-of-band subtitle stream extraction".into(),
        ))
    }

    /// Notify the host that a generated subtitle document was published
    /// to `file_path` (spec §6 "publishes the result"). A no-op by
    /// default; a GUI host might use this to enable the track.
    fn show_subtitle(&self, _file_path: &Path) {}
}

/// A [`HostCollaborator`] that discards everything; used in tests and as
/// the default for headless invocations.
#[derive(Default)]
pub struct NullHost;

impl HostCollaborator for NullHost {
    fn on_progress(&self, _update: &ProgressUpdate) {}
    fn on_warning(&self, _message: &str) {}
}

/// A [`HostCollaborator`] that records everything it receives, for tests
/// that need to assert on the sequence of progress updates.
#[derive(Default)]
pub struct RecordingHost {
    pub updates: parking_lot::Mutex<Vec<ProgressUpdate>>,
    pub warnings: parking_lot::Mutex<Vec<String>>,
    pub cancel_after: Option<usize>,
    pub progress_count: std::sync::atomic::AtomicUsize,
}

impl HostCollaborator for RecordingHost {
    fn on_progress(&self, update: &ProgressUpdate) {
        self.updates.lock().push(update.clone());
    }

    fn on_warning(&self, message: &str) {
        self.warnings.lock().push(message.to_string());
    }

    fn is_cancelled(&self) -> bool {
        match self.cancel_after {
            Some(n) => {
                let count = self.progress_count.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                count >= n
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Stage;

    #[test]
    fn null_host_accepts_updates_without_panicking() {
        let host = NullHost;
        host.on_progress(&ProgressUpdate { stage: Stage::Init, percent: 0.0, eta_secs: None, message: None });
        host.on_warning("test");
        assert!(!host.is_cancelled());
    }

    #[test]
    fn recording_host_collects_updates() {
        let host = RecordingHost::default();
        host.on_progress(&ProgressUpdate { stage: Stage::Translate, percent: 50.0, eta_secs: None, message: None });
        assert_eq!(host.updates.lock().len(), 1);
    }
}
