//! Drift monitor — rolling window of recent final scores.
//!
//! One instance per process, created at startup and shared by handle. `log`
//! holds the lock only for a push/pop; `check` copies the window under the lock
//! and computes statistics outside it, so a report may lag concurrent writers.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_WINDOW: usize = 1000;
/// Mean final score below which the window is flagged.
pub const ALERT_MEAN_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriftStatus {
    #[serde(rename = "Waiting for data")]
    WaitingForData,
    #[serde(rename = "Healthy")]
    Healthy,
    #[serde(rename = "Warning: Low Match Rates (Possible Data Drift)")]
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSample {
    pub score: f64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub status: DriftStatus,
    pub sample_size: usize,
    pub mean_score: f64,
    /// Sample standard deviation; 0 for fewer than two samples.
    pub std_dev: f64,
    /// Timestamp of the newest sample.
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct DriftMonitor {
    capacity: usize,
    window: Mutex<VecDeque<ScoreSample>>,
}

impl DriftMonitor {
    /// A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            window: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends `score`, evicting the oldest samples beyond capacity.
    pub fn log(&self, score: f64) {
        self.log_at(score, Utc::now());
    }

    pub fn log_at(&self, score: f64, recorded_at: DateTime<Utc>) {
        if !score.is_finite() {
            warn!(score, "ignoring non-finite score in drift window");
            return;
        }
        let mut window = self.window.lock();
        window.push_back(ScoreSample { score, recorded_at });
        while window.len() > self.capacity {
            window.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.window.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.lock().is_empty()
    }

    pub fn check(&self) -> DriftReport {
        let snapshot: Vec<ScoreSample> = self.window.lock().iter().copied().collect();

        let n = snapshot.len();
        if n == 0 {
            return DriftReport {
                status: DriftStatus::WaitingForData,
                sample_size: 0,
                mean_score: 0.0,
                std_dev: 0.0,
                last_updated: None,
            };
        }

        let mean = snapshot.iter().map(|s| s.score).sum::<f64>() / n as f64;
        let std_dev = if n > 1 {
            let variance = snapshot
                .iter()
                .map(|s| (s.score - mean).powi(2))
                .sum::<f64>()
                / (n - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        let status = if mean < ALERT_MEAN_THRESHOLD {
            DriftStatus::Warning
        } else {
            DriftStatus::Healthy
        };

        DriftReport {
            status,
            sample_size: n,
            mean_score: mean,
            std_dev,
            last_updated: snapshot.iter().map(|s| s.recorded_at).max(),
        }
    }
}

impl Default for DriftMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_empty_window_is_waiting_for_data() {
        let report = DriftMonitor::default().check();
        assert_eq!(report.status, DriftStatus::WaitingForData);
        assert_eq!(report.sample_size, 0);
        assert!(report.last_updated.is_none());
    }

    #[test]
    fn test_window_evicts_oldest() {
        let monitor = DriftMonitor::new(DEFAULT_WINDOW);
        for i in 0..1001 {
            monitor.log(i as f64 / 10.0);
        }
        assert_eq!(monitor.len(), 1000);
        let report = monitor.check();
        assert_eq!(report.sample_size, 1000);
        // the first score (0.0) was evicted; 0.1..=100.0 remain
        assert!((report.mean_score - 50.05).abs() < 1e-9);
    }

    #[test]
    fn test_low_mean_is_warning() {
        let monitor = DriftMonitor::new(10);
        monitor.log(30.0);
        monitor.log(40.0);
        let report = monitor.check();
        assert_eq!(report.status, DriftStatus::Warning);
        assert!((report.mean_score - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_at_threshold_is_healthy() {
        let monitor = DriftMonitor::new(10);
        monitor.log(50.0);
        assert_eq!(monitor.check().status, DriftStatus::Healthy);
    }

    #[test]
    fn test_sample_std_dev() {
        let monitor = DriftMonitor::new(10);
        for score in [60.0, 70.0, 80.0] {
            monitor.log(score);
        }
        let report = monitor.check();
        assert!((report.std_dev - 10.0).abs() < 1e-9);

        let single = DriftMonitor::new(10);
        single.log(90.0);
        assert_eq!(single.check().std_dev, 0.0);
    }

    #[test]
    fn test_non_finite_scores_are_ignored() {
        let monitor = DriftMonitor::new(10);
        monitor.log(f64::NAN);
        assert!(monitor.is_empty());
    }

    #[test]
    fn test_status_serializes_to_labels() {
        assert_eq!(
            serde_json::to_string(&DriftStatus::WaitingForData).unwrap(),
            "\"Waiting for data\""
        );
        assert_eq!(
            serde_json::to_string(&DriftStatus::Warning).unwrap(),
            "\"Warning: Low Match Rates (Possible Data Drift)\""
        );
    }

    #[test]
    fn test_concurrent_logging_respects_capacity() {
        let monitor = Arc::new(DriftMonitor::new(100));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let monitor = Arc::clone(&monitor);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        monitor.log(75.0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(monitor.len(), 100);
        assert_eq!(monitor.check().status, DriftStatus::Healthy);
    }
}
