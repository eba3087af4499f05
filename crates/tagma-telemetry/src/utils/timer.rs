// Copyright 2025 tagma contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides RAII-based timers for automatically recording metrics. (RAII = Resource Acquisition Is Initialization)

use crate::metrics::registry::HistogramHandle;
use tagma_core::utils::timer::Stopwatch;

/// Times a scope and records the elapsed milliseconds into a
/// `Histogram` when dropped.
///
/// The RAII pattern guarantees the measurement lands even on early
/// returns, which matters for inference paths that bail out when a
/// model is still loading.
pub struct ScopedMetricTimer<'a> {
    stopwatch: Stopwatch,
    histogram: &'a HistogramHandle,
}

impl<'a> ScopedMetricTimer<'a> {
    /// Creates a new timer for the given histogram and starts it immediately.
    pub fn new(histogram: &'a HistogramHandle) -> Self {
        Self {
            stopwatch: Stopwatch::new(),
            histogram,
        }
    }
}

impl<'a> Drop for ScopedMetricTimer<'a> {
    fn drop(&mut self) {
        if let Some(elapsed_secs) = self.stopwatch.elapsed_secs_f64() {
            let elapsed_ms = elapsed_secs * 1000.0;
            if let Err(e) = self.histogram.observe(elapsed_ms) {
                log::warn!("[ScopedMetricTimer] Failed to record metric: {:?}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::registry::MetricsRegistry;
    use tagma_core::telemetry::metrics::MetricValue;

    #[test]
    fn test_timer_records_on_drop() {
        let registry = MetricsRegistry::new();
        let histogram = registry
            .register_histogram("vision", "inference_ms", "Inference time", "ms", vec![100.0])
            .unwrap();

        {
            let _timer = ScopedMetricTimer::new(&histogram);
        }

        let metric = histogram.get_metric().unwrap();
        if let MetricValue::Histogram { samples, .. } = metric.value {
            assert_eq!(samples.len(), 1);
            assert!(samples[0] >= 0.0);
        } else {
            panic!("Expected histogram metric");
        }
    }
}
