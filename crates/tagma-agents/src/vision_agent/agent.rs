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

//! Defines the VisionAgent, the orchestrator for the object detection stream.

use tagma_core::detection::{ImageFrame, ModelError, TagmaDetectionOutcome, TagmaModel};
use tagma_telemetry::metrics::registry::{CounterHandle, HistogramHandle, MetricsRegistry};
use tagma_telemetry::utils::timer::ScopedMetricTimer;

use super::lane::{DetectionLane, FullFrameLane, QuadrantLane};

/// Range of accepted prediction intervals, in frames.
pub const PREDICTION_INTERVAL_RANGE: std::ops::RangeInclusive<u64> = 1..=60;

/// Strategies for object detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionStrategy {
    /// One inference call over the whole frame.
    #[default]
    FullFrame,
    /// Four inference calls over quadrant crops.
    Quadrant,
}

/// Holds telemetry handles for the vision subsystem.
struct VisionMetrics {
    frames_inspected: CounterHandle,
    detections: CounterHandle,
    frames_dropped: CounterHandle,
    inference_ms: HistogramHandle,
}

/// The agent responsible for the object detection stream.
///
/// It decides which lane to deploy, samples frames at the configured
/// prediction interval, and shields the caller from model failures: a
/// failed frame is logged and dropped, and prediction is simply retried
/// on the next sampled frame.
pub struct VisionAgent {
    /// The concrete model provider.
    model: Box<dyn TagmaModel>,
    /// Available detection lanes (strategies).
    lanes: Vec<Box<dyn DetectionLane>>,
    /// Current selected strategy.
    strategy: DetectionStrategy,
    /// Run detection every Nth frame.
    interval: u64,
    /// Telemetry metrics.
    metrics: Option<VisionMetrics>,
}

impl VisionAgent {
    /// Creates a new `VisionAgent` with a given model provider.
    pub fn new(model: Box<dyn TagmaModel>) -> Self {
        let lanes: Vec<Box<dyn DetectionLane>> =
            vec![Box::new(FullFrameLane::new()), Box::new(QuadrantLane::new())];

        Self {
            model,
            lanes,
            strategy: DetectionStrategy::FullFrame,
            interval: 1,
            metrics: None,
        }
    }

    /// Selects the detection strategy, builder style.
    pub fn with_strategy(mut self, strategy: DetectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the prediction interval, clamped to the accepted range.
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.clamp(
            *PREDICTION_INTERVAL_RANGE.start(),
            *PREDICTION_INTERVAL_RANGE.end(),
        );
        self
    }

    /// Attaches a metrics registry to the agent for observability.
    pub fn with_telemetry(mut self, registry: &MetricsRegistry) -> Self {
        let metrics = VisionMetrics {
            frames_inspected: registry
                .register_counter("vision", "frames_inspected", "Frames run through a lane")
                .unwrap(),
            detections: registry
                .register_counter("vision", "detections", "Detections returned by the model")
                .unwrap(),
            frames_dropped: registry
                .register_counter("vision", "frames_dropped", "Frames dropped on model failure")
                .unwrap(),
            inference_ms: registry
                .register_histogram(
                    "vision",
                    "inference_ms",
                    "Object model inference time",
                    "ms",
                    vec![1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0],
                )
                .unwrap(),
        };
        self.metrics = Some(metrics);
        self
    }

    /// The active strategy.
    pub fn strategy(&self) -> DetectionStrategy {
        self.strategy
    }

    /// Switches the active strategy.
    pub fn set_strategy(&mut self, strategy: DetectionStrategy) {
        self.strategy = strategy;
    }

    /// The configured prediction interval.
    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Runs detection on a frame if it falls on the prediction interval.
    ///
    /// Returns `None` both for skipped frames and for dropped ones; the
    /// distinction only matters to telemetry.
    pub fn process_frame(&mut self, frame: &ImageFrame) -> Option<TagmaDetectionOutcome> {
        if frame.id % self.interval != 0 {
            return None;
        }

        // Indexing borrows only self.lanes, leaving self.model free for
        // a simultaneous mutable borrow.
        let lane_index = match self.strategy {
            DetectionStrategy::FullFrame => 0,
            DetectionStrategy::Quadrant => 1,
        };

        let result = {
            let _timer = self
                .metrics
                .as_ref()
                .map(|m| ScopedMetricTimer::new(&m.inference_ms));
            self.lanes[lane_index].detect(self.model.as_mut(), frame)
        };

        match result {
            Ok(outcome) => {
                if let Some(metrics) = &self.metrics {
                    let _ = metrics.frames_inspected.increment();
                    let _ = metrics.detections.add(outcome.detections.len() as u64);
                }
                Some(outcome)
            }
            Err(ModelError::NotLoaded) => {
                log::warn!(
                    "[VisionAgent] model '{}' not loaded; dropping frame {} and retrying",
                    self.model.label(),
                    frame.id
                );
                if let Some(metrics) = &self.metrics {
                    let _ = metrics.frames_dropped.increment();
                }
                None
            }
            Err(error) => {
                log::error!(
                    "[VisionAgent] inference failed on frame {}: {}",
                    frame.id,
                    error
                );
                if let Some(metrics) = &self.metrics {
                    let _ = metrics.frames_dropped.increment();
                }
                None
            }
        }
    }
}
