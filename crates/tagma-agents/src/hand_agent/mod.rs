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

//! Defines the HandAgent, the orchestrator for the hand pose stream.

use tagma_core::detection::{HandDetectionOutcome, HandModel, ImageFrame, ModelError};
use tagma_telemetry::metrics::registry::{CounterHandle, MetricsRegistry};

/// Holds telemetry handles for the hand subsystem.
struct HandMetrics {
    frames_inspected: CounterHandle,
    hands_detected: CounterHandle,
}

/// The agent responsible for the hand pose stream.
///
/// Hand pose runs on every ingested frame and the agent keeps the
/// latest outcome around, because the compiler joins object outcomes
/// against whatever hand evidence is most recent rather than waiting
/// for frame-synchronized pairs.
pub struct HandAgent {
    model: Box<dyn HandModel>,
    latest: HandDetectionOutcome,
    metrics: Option<HandMetrics>,
}

impl HandAgent {
    /// Creates a new `HandAgent` with a given model provider.
    pub fn new(model: Box<dyn HandModel>) -> Self {
        Self {
            model,
            latest: HandDetectionOutcome::default(),
            metrics: None,
        }
    }

    /// Attaches a metrics registry to the agent for observability.
    pub fn with_telemetry(mut self, registry: &MetricsRegistry) -> Self {
        let metrics = HandMetrics {
            frames_inspected: registry
                .register_counter("hand", "frames_inspected", "Frames run through the model")
                .unwrap(),
            hands_detected: registry
                .register_counter("hand", "hands_detected", "Hand detections returned")
                .unwrap(),
        };
        self.metrics = Some(metrics);
        self
    }

    /// Runs hand pose on a frame, updating the latest outcome.
    ///
    /// A failed frame keeps the previous outcome; hands drift slowly
    /// enough between frames that stale evidence beats none.
    pub fn process_frame(&mut self, frame: &ImageFrame) -> &HandDetectionOutcome {
        match self.model.predict(frame) {
            Ok(hands) => {
                if let Some(metrics) = &self.metrics {
                    let _ = metrics.frames_inspected.increment();
                    let _ = metrics.hands_detected.add(hands.len() as u64);
                }
                self.latest = HandDetectionOutcome::new(frame.id, hands);
            }
            Err(ModelError::NotLoaded) => {
                log::warn!(
                    "[HandAgent] model not loaded; keeping outcome of frame {}",
                    self.latest.frame_id
                );
            }
            Err(error) => {
                log::error!("[HandAgent] inference failed on frame {}: {}", frame.id, error);
            }
        }
        &self.latest
    }

    /// The most recent hand outcome (default empty before the first frame).
    pub fn latest(&self) -> &HandDetectionOutcome {
        &self.latest
    }

    /// Forgets accumulated hand evidence.
    pub fn reset(&mut self) {
        self.latest = HandDetectionOutcome::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagma_core::detection::{HandDetection, HandJoint, Handedness, JointPosition};
    use tagma_core::math::{Extent2D, Vec2};

    struct ScriptedHands {
        fail: bool,
    }

    impl HandModel for ScriptedHands {
        fn predict(&mut self, _frame: &ImageFrame) -> Result<Vec<HandDetection>, ModelError> {
            if self.fail {
                return Err(ModelError::NotLoaded);
            }
            Ok(vec![HandDetection::new(Handedness::Left).with_joint(
                JointPosition::new(HandJoint::Wrist, Vec2::new(0.5, 0.5), 0.8),
            )])
        }
    }

    #[test]
    fn latest_outcome_tracks_frames() {
        let mut agent = HandAgent::new(Box::new(ScriptedHands { fail: false }));
        assert!(agent.latest().is_empty());

        let frame = ImageFrame::new(7, 0.0, Extent2D::new(640, 480));
        let outcome = agent.process_frame(&frame);
        assert_eq!(outcome.frame_id, 7);
        assert_eq!(outcome.hands.len(), 1);
    }

    #[test]
    fn failure_keeps_previous_outcome() {
        let mut agent = HandAgent::new(Box::new(ScriptedHands { fail: false }));
        agent.process_frame(&ImageFrame::new(1, 0.0, Extent2D::new(64, 64)));

        // Swap in a failing model by rebuilding; the latest outcome must
        // survive a failed prediction.
        let mut failing = HandAgent::new(Box::new(ScriptedHands { fail: true }));
        failing.latest = agent.latest().clone();
        failing.process_frame(&ImageFrame::new(2, 0.0, Extent2D::new(64, 64)));
        assert_eq!(failing.latest().frame_id, 1);
    }

    #[test]
    fn reset_clears_evidence() {
        let mut agent = HandAgent::new(Box::new(ScriptedHands { fail: false }));
        agent.process_frame(&ImageFrame::new(1, 0.0, Extent2D::new(64, 64)));
        agent.reset();
        assert!(agent.latest().is_empty());
    }
}
