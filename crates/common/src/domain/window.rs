use crate::domain::sample::TelemetrySample;
use std::collections::VecDeque;

pub const DEFAULT_WINDOW_CAPACITY: usize = 20;

/// Bounded FIFO history of the most recent samples.
///
/// Display-only: owned by the presentation path, never read by the engine.
/// Oldest sample is evicted first once the bound is reached.
#[derive(Debug)]
pub struct SampleWindow {
    samples: VecDeque<TelemetrySample>,
    capacity: usize,
}

impl SampleWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: TelemetrySample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples in arrival order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TelemetrySample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&TelemetrySample> {
        self.samples.back()
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(temp: f64) -> TelemetrySample {
        TelemetrySample {
            temp,
            humidity: 50.0,
            flow: 10.0,
            received_at: Utc::now(),
        }
    }

    #[test]
    fn test_window_holds_samples_in_arrival_order() {
        let mut window = SampleWindow::default();
        window.push(sample(1.0));
        window.push(sample(2.0));
        window.push(sample(3.0));

        let temps: Vec<f64> = window.iter().map(|s| s.temp).collect();
        assert_eq!(temps, vec![1.0, 2.0, 3.0]);
        assert_eq!(window.latest().map(|s| s.temp), Some(3.0));
    }

    #[test]
    fn test_window_bound_holds_after_overflow() {
        let mut window = SampleWindow::default();
        for i in 0..25 {
            window.push(sample(i as f64));
        }

        // Exactly the 20 most recent, oldest dropped first.
        assert_eq!(window.len(), 20);
        let temps: Vec<f64> = window.iter().map(|s| s.temp).collect();
        assert_eq!(temps.first(), Some(&5.0));
        assert_eq!(temps.last(), Some(&24.0));
    }

    #[test]
    fn test_window_custom_capacity() {
        let mut window = SampleWindow::new(3);
        for i in 0..5 {
            window.push(sample(i as f64));
        }

        assert_eq!(window.len(), 3);
        let temps: Vec<f64> = window.iter().map(|s| s.temp).collect();
        assert_eq!(temps, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_window_zero_capacity_clamped() {
        let window = SampleWindow::new(0);
        assert_eq!(window.capacity(), 1);
    }
}
