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

//! Metrics collection for the perception pipeline.
//!
//! This crate provides the [`MetricsRegistry`], the storage backends it
//! writes through, and RAII helpers for timing pipeline stages. Metric
//! types themselves live in `tagma-core` so that agents can report
//! without depending on a concrete storage implementation.

#![warn(missing_docs)]

pub mod metrics;
pub mod storage;
pub mod utils;

pub use metrics::registry::{CounterHandle, GaugeHandle, HistogramHandle, MetricsRegistry};
pub use storage::backend::MetricsBackend;
pub use storage::memory_backend::InMemoryBackend;
pub use utils::timer::ScopedMetricTimer;
