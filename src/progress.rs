//! Progress / event sink (spec §4.8): pipeline stage, completion percent,
//! and an ETA smoothed over recent throughput.

use std::time::Instant;

/// A pipeline stage, in the order the orchestrator moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Extract,
    Parse,
    Translate,
    Format,
    Save,
    Complete,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::Extract => "extract",
            Stage::Parse => "parse",
            Stage::Translate => "translate",
            Stage::Format => "format",
            Stage::Save => "save",
            Stage::Complete => "complete",
        }
    }
}

/// A single progress update delivered to a [`crate::host::HostCollaborator`].
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub stage: Stage,
    pub percent: f32,
    pub eta_secs: Option<f32>,
    pub message: Option<String>,
}

/// Smooths throughput (entries/sec) with an exponential moving average so
/// a slow first batch doesn't produce a wildly pessimistic ETA.
pub struct ProgressTracker {
    stage: Stage,
    total_units: usize,
    completed_units: usize,
    smoothed_rate: Option<f32>,
    last_tick: Option<Instant>,
    alpha: f32,
}

impl ProgressTracker {
    pub fn new(total_units: usize) -> Self {
        Self {
            stage: Stage::Init,
            total_units,
            completed_units: 0,
            smoothed_rate: None,
            last_tick: None,
            alpha: 0.3,
        }
    }

    pub fn set_stage(&mut self, stage: Stage) -> ProgressUpdate {
        self.stage = stage;
        self.snapshot(None)
    }

    /// Record that `units` more of work completed, updating the smoothed
    /// throughput estimate.
    pub fn record_progress(&mut self, units: usize, message: Option<String>) -> ProgressUpdate {
        let now = Instant::now();
        if let Some(last) = self.last_tick {
            let elapsed = now.duration_since(last).as_secs_f32();
            if elapsed > 0.0 && units > 0 {
                let instantaneous = units as f32 / elapsed;
                self.smoothed_rate = Some(match self.smoothed_rate {
                    Some(prev) => self.alpha * instantaneous + (1.0 - self.alpha) * prev,
                    None => instantaneous,
                });
            }
        }
        self.last_tick = Some(now);
        self.completed_units = (self.completed_units + units).min(self.total_units);
        self.snapshot(message)
    }

    fn snapshot(&self, message: Option<String>) -> ProgressUpdate {
        let percent = if self.total_units == 0 {
            100.0
        } else {
            (self.completed_units as f32 / self.total_units as f32) * 100.0
        };
        let remaining = self.total_units.saturating_sub(self.completed_units);
        let eta_secs = self.smoothed_rate.filter(|r| *r > 0.0).map(|rate| remaining as f32 / rate);
        ProgressUpdate { stage: self.stage, percent, eta_secs, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn percent_tracks_completed_units() {
        let mut tracker = ProgressTracker::new(10);
        let update = tracker.record_progress(5, None);
        assert_eq!(update.percent, 50.0);
    }

    #[test]
    fn zero_total_units_is_always_complete() {
        let tracker = ProgressTracker::new(0);
        assert_eq!(tracker.snapshot(None).percent, 100.0);
    }

    #[test]
    fn eta_shrinks_as_throughput_is_observed() {
        let mut tracker = ProgressTracker::new(100);
        tracker.record_progress(1, None);
        sleep(Duration::from_millis(20));
        let update = tracker.record_progress(10, None);
        assert!(update.eta_secs.is_some());
    }
}
