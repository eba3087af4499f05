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

//! In-memory metrics backend.

use crate::storage::backend::{BackendStats, MetricsBackend};
use std::collections::HashMap;
use std::sync::RwLock;
use tagma_core::telemetry::metrics::{Metric, MetricId, MetricType, MetricsError, MetricsResult};

/// In-memory metrics backend using `RwLock<HashMap>`.
///
/// Concurrent reads, single writer. This is the default backend for
/// live sessions; the metric volume of one perception pipeline is small
/// enough that cloning on read is not a concern.
#[derive(Debug)]
pub struct InMemoryBackend {
    storage: RwLock<HashMap<MetricId, Metric>>,
}

impl InMemoryBackend {
    /// Create a new in-memory backend.
    pub fn new() -> Self {
        Self {
            storage: RwLock::new(HashMap::new()),
        }
    }

    /// Get statistics about this backend.
    pub fn get_stats(&self) -> BackendStats {
        let storage = self.storage.read().unwrap();

        let mut counter_count = 0;
        let mut gauge_count = 0;
        let mut histogram_count = 0;

        for metric in storage.values() {
            match metric.value.metric_type() {
                MetricType::Counter => counter_count += 1,
                MetricType::Gauge => gauge_count += 1,
                MetricType::Histogram => histogram_count += 1,
            }
        }

        BackendStats {
            total_metrics: storage.len(),
            counter_count,
            gauge_count,
            histogram_count,
        }
    }

    /// Get metrics by namespace.
    pub fn get_metrics_by_namespace(&self, namespace: &str) -> Vec<Metric> {
        let storage = self.storage.read().unwrap();
        storage
            .values()
            .filter(|metric| metric.metadata.id.namespace == namespace)
            .cloned()
            .collect()
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsBackend for InMemoryBackend {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn put_metric(&self, metric: Metric) -> MetricsResult<()> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| MetricsError::StorageError("Failed to acquire write lock".to_string()))?;

        storage.insert(metric.metadata.id.clone(), metric);
        Ok(())
    }

    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        let storage = self
            .storage
            .read()
            .map_err(|_| MetricsError::StorageError("Failed to acquire read lock".to_string()))?;

        storage
            .get(id)
            .cloned()
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))
    }

    fn contains_metric(&self, id: &MetricId) -> bool {
        if let Ok(storage) = self.storage.read() {
            storage.contains_key(id)
        } else {
            false
        }
    }

    fn list_all_metrics(&self) -> Vec<Metric> {
        if let Ok(storage) = self.storage.read() {
            storage.values().cloned().collect()
        } else {
            Vec::new()
        }
    }

    fn clear_all(&self) -> MetricsResult<()> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| MetricsError::StorageError("Failed to acquire write lock".to_string()))?;

        storage.clear();
        Ok(())
    }

    fn metric_count(&self) -> usize {
        if let Ok(storage) = self.storage.read() {
            storage.len()
        } else {
            0
        }
    }
}
