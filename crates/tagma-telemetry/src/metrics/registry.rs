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

//! Registry for managing pipeline metrics.

use crate::storage::{backend::MetricsBackend, memory_backend::InMemoryBackend};
use std::sync::Arc;
use tagma_core::telemetry::metrics::{
    Metric, MetricId, MetricType, MetricValue, MetricsError, MetricsResult,
};

/// Central registry for perception pipeline metrics.
///
/// Agents register their counters, gauges, and histograms here and keep
/// the returned handles for the hot path. The registry owns the storage
/// backend and is the single point the runtime queries when it prints
/// the end-of-session summary.
#[derive(Debug)]
pub struct MetricsRegistry {
    backend: Arc<dyn MetricsBackend>,
}

impl MetricsRegistry {
    /// Create a new metrics registry with the default in-memory backend.
    pub fn new() -> Self {
        Self {
            backend: Arc::new(InMemoryBackend::new()),
        }
    }

    /// Create a new metrics registry with a custom backend.
    pub fn with_backend(backend: Arc<dyn MetricsBackend>) -> Self {
        Self { backend }
    }

    /// Register a new counter metric.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> MetricsResult<CounterHandle> {
        let id = MetricId::new(namespace, name);
        let metric = Metric::new_counter(id.clone(), description, 0);
        self.backend.put_metric(metric)?;
        Ok(CounterHandle::new(id, self.backend.clone()))
    }

    /// Register a new counter metric with labels.
    pub fn register_counter_with_labels(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        labels: Vec<(String, String)>,
    ) -> MetricsResult<CounterHandle> {
        let mut id = MetricId::new(namespace, name);
        for (key, value) in labels {
            id = id.with_label(key, value);
        }
        let metric = Metric::new_counter(id.clone(), description, 0);
        self.backend.put_metric(metric)?;
        Ok(CounterHandle::new(id, self.backend.clone()))
    }

    /// Register a new gauge metric.
    pub fn register_gauge(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
    ) -> MetricsResult<GaugeHandle> {
        let id = MetricId::new(namespace, name);
        let metric = Metric::new_gauge(id.clone(), description, unit, 0.0);
        self.backend.put_metric(metric)?;
        Ok(GaugeHandle::new(id, self.backend.clone()))
    }

    /// Register a new histogram metric.
    pub fn register_histogram(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
        buckets: Vec<f64>,
    ) -> MetricsResult<HistogramHandle> {
        let id = MetricId::new(namespace, name);
        let metric = Metric::new_histogram(id.clone(), description, unit, buckets);
        self.backend.put_metric(metric)?;
        Ok(HistogramHandle::new(id, self.backend.clone()))
    }

    /// Get a metric by ID.
    pub fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        self.backend.get_metric(id)
    }

    /// Check if a metric exists.
    pub fn contains_metric(&self, id: &MetricId) -> bool {
        self.backend.contains_metric(id)
    }

    /// Get all metrics in a namespace.
    pub fn get_namespace_metrics(&self, namespace: &str) -> Vec<Metric> {
        // The in-memory backend can filter without cloning the full set.
        if let Some(memory_backend) = self
            .backend
            .as_ref()
            .as_any()
            .downcast_ref::<InMemoryBackend>()
        {
            memory_backend.get_metrics_by_namespace(namespace)
        } else {
            self.backend
                .list_all_metrics()
                .into_iter()
                .filter(|m| m.metadata.id.namespace == namespace)
                .collect()
        }
    }

    /// Get the total number of metrics.
    pub fn metric_count(&self) -> usize {
        self.backend.metric_count()
    }

    /// All metrics, sorted by formatted ID for stable summary output.
    pub fn snapshot(&self) -> Vec<Metric> {
        let mut metrics = self.backend.list_all_metrics();
        metrics.sort_by_key(|m| m.metadata.id.to_string_formatted());
        metrics
    }

    /// Render the current snapshot as a JSON value.
    ///
    /// Histograms are summarised as sample count, min, max, and mean
    /// rather than dumping every sample.
    pub fn snapshot_json(&self) -> serde_json::Value {
        let entries: Vec<serde_json::Value> = self
            .snapshot()
            .into_iter()
            .map(|metric| {
                let value = match &metric.value {
                    MetricValue::Counter(v) => serde_json::json!(v),
                    MetricValue::Gauge(v) => serde_json::json!(v),
                    MetricValue::Histogram { samples, .. } => {
                        let count = samples.len();
                        let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
                        let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                        let mean = if count == 0 {
                            0.0
                        } else {
                            samples.iter().sum::<f64>() / count as f64
                        };
                        serde_json::json!({
                            "count": count,
                            "min": if count == 0 { 0.0 } else { min },
                            "max": if count == 0 { 0.0 } else { max },
                            "mean": mean,
                        })
                    }
                };
                serde_json::json!({
                    "id": metric.metadata.id.to_string_formatted(),
                    "type": format!("{:?}", metric.value.metric_type()),
                    "unit": metric.metadata.unit,
                    "value": value,
                })
            })
            .collect();
        serde_json::Value::Array(entries)
    }

    /// Clear all metrics.
    pub fn clear_all(&self) -> MetricsResult<()> {
        self.backend.clear_all()
    }

    /// Get direct access to the backend (for advanced operations).
    pub fn backend(&self) -> &Arc<dyn MetricsBackend> {
        &self.backend
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for efficient counter operations.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl CounterHandle {
    fn new(id: MetricId, backend: Arc<dyn MetricsBackend>) -> Self {
        Self { id, backend }
    }

    /// Increment the counter by 1.
    pub fn increment(&self) -> MetricsResult<u64> {
        self.backend.increment_counter(&self.id, 1)
    }

    /// Increment the counter by a specific amount.
    pub fn add(&self, amount: u64) -> MetricsResult<u64> {
        self.backend.increment_counter(&self.id, amount)
    }

    /// Get the current counter value.
    pub fn get(&self) -> MetricsResult<u64> {
        let metric = self.backend.get_metric(&self.id)?;
        metric
            .value
            .as_counter()
            .ok_or_else(|| MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: metric.value.metric_type(),
            })
    }

    /// Get the metric ID.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle for efficient gauge operations.
#[derive(Debug, Clone)]
pub struct GaugeHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl GaugeHandle {
    fn new(id: MetricId, backend: Arc<dyn MetricsBackend>) -> Self {
        Self { id, backend }
    }

    /// Set the gauge to a specific value.
    pub fn set(&self, value: f64) -> MetricsResult<()> {
        self.backend.set_gauge(&self.id, value)
    }

    /// Get the current gauge value.
    pub fn get(&self) -> MetricsResult<f64> {
        let metric = self.backend.get_metric(&self.id)?;
        metric
            .value
            .as_gauge()
            .ok_or_else(|| MetricsError::TypeMismatch {
                expected: MetricType::Gauge,
                found: metric.value.metric_type(),
            })
    }

    /// Get the metric ID.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle for efficient histogram operations.
#[derive(Debug, Clone)]
pub struct HistogramHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl HistogramHandle {
    fn new(id: MetricId, backend: Arc<dyn MetricsBackend>) -> Self {
        Self { id, backend }
    }

    /// Record a sample in the histogram.
    pub fn observe(&self, value: f64) -> MetricsResult<()> {
        self.backend.record_histogram_sample(&self.id, value)
    }

    /// Get the metric ID.
    pub fn id(&self) -> &MetricId {
        &self.id
    }

    /// Get the full histogram metric (for analysis).
    pub fn get_metric(&self) -> MetricsResult<Metric> {
        self.backend.get_metric(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new();
        assert_eq!(registry.metric_count(), 0);
    }

    #[test]
    fn test_counter_registration_and_operations() {
        let registry = MetricsRegistry::new();

        let counter = registry
            .register_counter("session", "frames_processed", "Frames pushed through the pipeline")
            .unwrap();

        assert_eq!(counter.increment().unwrap(), 1);
        assert_eq!(counter.add(5).unwrap(), 6);
        assert_eq!(counter.get().unwrap(), 6);

        assert!(registry.contains_metric(counter.id()));
        assert_eq!(registry.metric_count(), 1);
    }

    #[test]
    fn test_gauge_registration_and_operations() {
        let registry = MetricsRegistry::new();

        let gauge = registry
            .register_gauge("compiler", "pending_votes", "Votes held before readiness", "votes")
            .unwrap();

        gauge.set(3.0).unwrap();
        assert_eq!(gauge.get().unwrap(), 3.0);

        assert!(registry.contains_metric(gauge.id()));
    }

    #[test]
    fn test_histogram_registration_and_operations() {
        let registry = MetricsRegistry::new();

        let histogram = registry
            .register_histogram(
                "vision",
                "inference_ms",
                "Object model inference time distribution",
                "ms",
                vec![1.0, 5.0, 10.0, 50.0, 100.0],
            )
            .unwrap();

        histogram.observe(2.5).unwrap();
        histogram.observe(15.0).unwrap();
        histogram.observe(75.0).unwrap();

        assert!(registry.contains_metric(histogram.id()));

        let metric = histogram.get_metric().unwrap();
        if let MetricValue::Histogram { samples, .. } = metric.value {
            assert_eq!(samples.len(), 3);
            assert!(samples.contains(&2.5));
            assert!(samples.contains(&15.0));
            assert!(samples.contains(&75.0));
        } else {
            panic!("Expected histogram metric");
        }
    }

    #[test]
    fn test_metrics_with_labels() {
        let registry = MetricsRegistry::new();

        let counter = registry
            .register_counter_with_labels(
                "vision",
                "detections",
                "Detections above the confidence floor",
                vec![("lane".to_string(), "quadrant".to_string())],
            )
            .unwrap();

        counter.add(12).unwrap();

        let id_str = counter.id().to_string_formatted();
        assert!(id_str.contains("lane=quadrant"));
    }

    #[test]
    fn test_namespace_filtering() {
        let registry = MetricsRegistry::new();

        registry
            .register_counter("vision", "frames", "Frames inspected")
            .unwrap();
        registry
            .register_counter("vision", "detections", "Detections emitted")
            .unwrap();
        registry
            .register_counter("speech", "commands", "Commands recognised")
            .unwrap();

        assert_eq!(registry.get_namespace_metrics("vision").len(), 2);
        assert_eq!(registry.get_namespace_metrics("speech").len(), 1);
        assert!(registry.get_namespace_metrics("compiler").is_empty());
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let registry = MetricsRegistry::new();

        registry
            .register_counter("vision", "frames", "Frames inspected")
            .unwrap();
        registry
            .register_counter("compiler", "compilations", "Result sets compiled")
            .unwrap();
        registry
            .register_counter("speech", "commands", "Commands recognised")
            .unwrap();

        let snapshot = registry.snapshot();
        let ids: Vec<String> = snapshot
            .iter()
            .map(|m| m.metadata.id.to_string_formatted())
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_snapshot_json_summarises_histograms() {
        let registry = MetricsRegistry::new();

        let histogram = registry
            .register_histogram("vision", "inference_ms", "Inference time", "ms", vec![10.0])
            .unwrap();
        histogram.observe(4.0).unwrap();
        histogram.observe(8.0).unwrap();

        let json = registry.snapshot_json();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["value"]["count"], 2);
        assert_eq!(entries[0]["value"]["mean"], 6.0);
    }

    #[test]
    fn test_clear_all() {
        let registry = MetricsRegistry::new();

        registry
            .register_counter("session", "frames_processed", "Frames processed")
            .unwrap();
        registry
            .register_gauge("compiler", "pending_votes", "Pending votes", "votes")
            .unwrap();

        assert_eq!(registry.metric_count(), 2);

        registry.clear_all().unwrap();
        assert_eq!(registry.metric_count(), 0);
    }
}
