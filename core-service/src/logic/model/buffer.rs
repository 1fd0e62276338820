//! Latency Buffer - rolling inference timings
//!
//! Keeps the most recent durations for reporting an average.
//! Oldest entries are evicted once capacity is reached.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Default number of timings kept
pub const DEFAULT_CAPACITY: usize = 100;

/// Bounded ring of inference durations in milliseconds
#[derive(Debug)]
pub struct LatencyBuffer {
    samples: Mutex<VecDeque<f64>>,
    capacity: usize,
    lifetime: AtomicU64,
}

impl LatencyBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            lifetime: AtomicU64::new(0),
        }
    }

    /// Record one duration
    pub fn push(&self, duration_ms: f64) {
        let mut samples = self.samples.lock();
        if samples.len() == self.capacity {
            samples.pop_front();
        }
        samples.push_back(duration_ms);
        drop(samples);

        self.lifetime.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of timings currently held
    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Average over held timings, 0 when empty
    pub fn average_ms(&self) -> f64 {
        let samples = self.samples.lock();
        if samples.is_empty() {
            0.0
        } else {
            samples.iter().sum::<f64>() / samples.len() as f64
        }
    }

    /// Snapshot, oldest first
    pub fn snapshot(&self) -> Vec<f64> {
        self.samples.lock().iter().copied().collect()
    }

    pub fn clear(&self) {
        self.samples.lock().clear();
    }

    pub fn status(&self) -> LatencyStatus {
        let samples = self.samples.lock();
        let average_ms = if samples.is_empty() {
            0.0
        } else {
            samples.iter().sum::<f64>() / samples.len() as f64
        };

        LatencyStatus {
            average_ms: (average_ms * 100.0).round() / 100.0,
            total_predictions: samples.len(),
            lifetime_predictions: self.lifetime.load(Ordering::Relaxed),
        }
    }
}

impl Default for LatencyBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Latency summary for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyStatus {
    pub average_ms: f64,
    pub total_predictions: usize,
    pub lifetime_predictions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_evicts_oldest() {
        let buffer = LatencyBuffer::default();

        for i in 0..101 {
            buffer.push(i as f64);
        }

        assert_eq!(buffer.len(), 100);
        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.first(), Some(&1.0));
        assert_eq!(snapshot.last(), Some(&100.0));
    }

    #[test]
    fn test_buffer_never_exceeds_capacity() {
        let buffer = LatencyBuffer::new(5);
        for i in 0..50 {
            buffer.push(i as f64);
            assert!(buffer.len() <= 5);
        }
        assert_eq!(buffer.status().lifetime_predictions, 50);
        assert_eq!(buffer.status().total_predictions, 5);
    }

    #[test]
    fn test_average() {
        let buffer = LatencyBuffer::default();
        assert_eq!(buffer.average_ms(), 0.0);
        assert!(buffer.is_empty());

        buffer.push(1.0);
        buffer.push(2.0);
        buffer.push(4.5);
        assert!((buffer.average_ms() - 2.5).abs() < 1e-9);
        assert_eq!(buffer.status().average_ms, 2.5);

        buffer.clear();
        assert_eq!(buffer.len(), 0);
    }
}
