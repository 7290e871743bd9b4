use std::time::Duration;

/// Accumulates latency samples and computes percentile statistics over
/// the batch. Used by the benchmark binary, which records one sample per
/// timed operation and reports at the end of each run.
#[derive(Debug, Default)]
pub struct LatencyCollector {
    samples: Vec<Duration>,
}

impl LatencyCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Add a latency sample
    pub fn record(&mut self, latency: Duration) {
        self.samples.push(latency);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Compute statistics over the recorded samples. Sorts in place.
    pub fn stats(&mut self) -> LatencyStatistics {
        if self.samples.is_empty() {
            return LatencyStatistics::default();
        }

        self.samples.sort();

        let len = self.samples.len();
        let min = self.samples[0];
        let max = self.samples[len - 1];
        let p50 = self.samples[len / 2];
        let p95 = self.samples[(len as f64 * 0.95) as usize];
        let p99 = self.samples[(len as f64 * 0.99) as usize];

        let total: Duration = self.samples.iter().sum();
        let mean = total / len as u32;

        LatencyStatistics {
            count: len as u64,
            min,
            max,
            mean,
            p50,
            p95,
            p99,
        }
    }
}

/// Aggregated latency statistics
#[derive(Debug, Clone, Default)]
pub struct LatencyStatistics {
    pub count: u64,
    pub min: Duration,
    pub max: Duration,
    pub mean: Duration,
    pub p50: Duration,
    pub p95: Duration,
    pub p99: Duration,
}

impl LatencyStatistics {
    /// Convert to microseconds for easier reading
    pub fn to_micros(&self) -> LatencyMicros {
        LatencyMicros {
            count: self.count,
            min: self.min.as_micros() as f64,
            max: self.max.as_micros() as f64,
            mean: self.mean.as_micros() as f64,
            p50: self.p50.as_micros() as f64,
            p95: self.p95.as_micros() as f64,
            p99: self.p99.as_micros() as f64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LatencyMicros {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}
