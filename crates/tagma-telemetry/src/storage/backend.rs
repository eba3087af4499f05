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

//! Trait defining the interface for metrics storage backends.

use std::fmt::Debug;
use tagma_core::telemetry::metrics::{
    Metric, MetricId, MetricType, MetricValue, MetricsError, MetricsResult,
};

/// Interface every metrics storage backend must implement.
///
/// The registry hands out handles that write through this trait, so a
/// backend only has to provide get/put semantics; the counter, gauge,
/// and histogram update paths are derived from those.
pub trait MetricsBackend: Send + Sync + Debug + 'static {
    /// Get a reference to this object as `Any` for downcasting.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Store or update a metric.
    fn put_metric(&self, metric: Metric) -> MetricsResult<()>;

    /// Retrieve a metric by ID.
    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric>;

    /// Check if a metric exists.
    fn contains_metric(&self, id: &MetricId) -> bool;

    /// Get all metrics (potentially expensive operation).
    fn list_all_metrics(&self) -> Vec<Metric>;

    /// Clear all metrics.
    fn clear_all(&self) -> MetricsResult<()>;

    /// Get the number of metrics stored.
    fn metric_count(&self) -> usize;

    /// Increment a counter by the given amount.
    fn increment_counter(&self, id: &MetricId, delta: u64) -> MetricsResult<u64> {
        let mut metric = self.get_metric(id)?;

        match metric.value {
            MetricValue::Counter(ref mut value) => {
                *value = value.saturating_add(delta);
                metric.metadata.update_timestamp();
                let result = *value;
                self.put_metric(metric)?;
                Ok(result)
            }
            _ => Err(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: metric.value.metric_type(),
            }),
        }
    }

    /// Set a gauge value.
    fn set_gauge(&self, id: &MetricId, value: f64) -> MetricsResult<()> {
        let mut metric = self.get_metric(id)?;

        match metric.value {
            MetricValue::Gauge(ref mut gauge_value) => {
                *gauge_value = value;
                metric.metadata.update_timestamp();
                self.put_metric(metric)?;
                Ok(())
            }
            _ => Err(MetricsError::TypeMismatch {
                expected: MetricType::Gauge,
                found: metric.value.metric_type(),
            }),
        }
    }

    /// Add a sample to a histogram.
    fn record_histogram_sample(&self, id: &MetricId, sample: f64) -> MetricsResult<()> {
        let mut metric = self.get_metric(id)?;

        match metric.value {
            MetricValue::Histogram {
                ref mut samples,
                ref bucket_bounds,
                ref mut bucket_counts,
            } => {
                samples.push(sample);

                // Buckets are cumulative: every bound >= sample counts it.
                for (i, &bound) in bucket_bounds.iter().enumerate() {
                    if sample <= bound {
                        bucket_counts[i] += 1;
                    }
                }

                metric.metadata.update_timestamp();
                self.put_metric(metric)?;
                Ok(())
            }
            _ => Err(MetricsError::TypeMismatch {
                expected: MetricType::Histogram,
                found: metric.value.metric_type(),
            }),
        }
    }
}

/// Statistics about the metrics backend.
#[derive(Debug, Clone)]
pub struct BackendStats {
    /// Total number of metrics stored.
    pub total_metrics: usize,
    /// Number of counters.
    pub counter_count: usize,
    /// Number of gauges.
    pub gauge_count: usize,
    /// Number of histograms.
    pub histogram_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal backend for exercising the trait's default methods.
    #[derive(Debug)]
    struct EmptyBackend;

    impl MetricsBackend for EmptyBackend {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn put_metric(&self, _metric: Metric) -> MetricsResult<()> {
            Ok(())
        }

        fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
            Err(MetricsError::MetricNotFound(id.clone()))
        }

        fn contains_metric(&self, _id: &MetricId) -> bool {
            false
        }

        fn list_all_metrics(&self) -> Vec<Metric> {
            Vec::new()
        }

        fn clear_all(&self) -> MetricsResult<()> {
            Ok(())
        }

        fn metric_count(&self) -> usize {
            0
        }
    }

    #[test]
    fn test_default_methods_surface_missing_metrics() {
        let backend = EmptyBackend;
        let id = MetricId::new("vision", "frames");

        assert_eq!(backend.metric_count(), 0);
        assert!(!backend.contains_metric(&id));
        assert!(matches!(
            backend.increment_counter(&id, 1),
            Err(MetricsError::MetricNotFound(_))
        ));
    }
}
