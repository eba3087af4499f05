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

//! The `DetectionCompiler` and its configuration.

use std::collections::HashMap;

use tagma_core::detection::{HandDetectionOutcome, Tagma, TagmaDetectionOutcome};
use tagma_telemetry::metrics::registry::{CounterHandle, GaugeHandle, MetricsRegistry};

use super::proximity;

/// Tuning knobs for the detection compiler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompilerConfig {
    /// Votes a tagma must accumulate before results are ready.
    pub votes_required: u32,
    /// Detections below this confidence are ignored by the join.
    pub min_confidence: f32,
    /// Normalized expansion of the bounding box for the proximity join.
    pub proximity_margin: f32,
    /// Compiled frames a tally may age before it is discarded. Keeps
    /// stale evidence from accruing across separate grasps.
    pub max_window: u32,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            votes_required: 5,
            min_confidence: 0.2,
            proximity_margin: 0.05,
            max_window: 60,
        }
    }
}

/// Vote statistics for one tagma.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagmaTally {
    /// The tagma the votes are for.
    pub tagma: Tagma,
    /// Frames in which the tagma was judged held.
    pub votes: u32,
    /// Mean confidence across those frames.
    pub mean_confidence: f32,
}

/// A stabilized conclusion retrieved from the compiler.
///
/// `Default` is the empty, nothing-held result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledResults {
    /// Tagmata that reached the vote threshold, ordered by votes then
    /// mean confidence, best first.
    pub held_tagmata: Vec<Tagma>,
    /// Per-tagma vote statistics for everything tallied, winners first.
    pub tallies: Vec<TagmaTally>,
}

impl CompiledResults {
    /// The highest-voted held tagma, if any.
    pub fn best(&self) -> Option<Tagma> {
        self.held_tagmata.first().copied()
    }

    /// `true` when nothing reached the vote threshold.
    pub fn is_empty(&self) -> bool {
        self.held_tagmata.is_empty()
    }
}

struct Tally {
    votes: u32,
    confidence_sum: f32,
}

/// Telemetry handles for the compiler.
struct CompilerMetrics {
    votes_recorded: CounterHandle,
    compilations: CounterHandle,
    pending_votes: GaugeHandle,
}

/// Aggregates noisy per-frame outcomes into stabilized conclusions.
///
/// One vote per tagma per compiled frame; a result becomes ready once
/// any tagma reaches the configured vote count, and stays ready until
/// retrieved. All calls are expected to come from a single thread.
pub struct DetectionCompiler {
    config: CompilerConfig,
    tallies: HashMap<Tagma, Tally>,
    /// Compiled frames since the oldest surviving vote.
    window_age: u32,
    ready: bool,
    metrics: Option<CompilerMetrics>,
}

impl DetectionCompiler {
    /// Creates a compiler with the given configuration.
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            tallies: HashMap::new(),
            window_age: 0,
            ready: false,
            metrics: None,
        }
    }

    /// Attaches a metrics registry for observability.
    pub fn with_telemetry(mut self, registry: &MetricsRegistry) -> Self {
        let metrics = CompilerMetrics {
            votes_recorded: registry
                .register_counter("compiler", "votes_recorded", "Held votes tallied")
                .unwrap(),
            compilations: registry
                .register_counter("compiler", "compilations", "Result sets compiled")
                .unwrap(),
            pending_votes: registry
                .register_gauge(
                    "compiler",
                    "pending_votes",
                    "Best tally short of readiness",
                    "votes",
                )
                .unwrap(),
        };
        self.metrics = Some(metrics);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Feeds one object outcome joined against the latest hand outcome.
    ///
    /// The streams are not frame-synchronized; the caller passes
    /// whatever hand outcome is most recent. An empty object outcome is
    /// a no-op, and votes are ignored while a result is already ready.
    pub fn add_outcome(&mut self, objects: &TagmaDetectionOutcome, hands: &HandDetectionOutcome) {
        if self.ready || objects.is_empty() {
            return;
        }

        let held = proximity::held_tagmata(objects, hands, &self.config);
        for h in &held {
            let tally = self.tallies.entry(h.tagma).or_insert(Tally {
                votes: 0,
                confidence_sum: 0.0,
            });
            tally.votes += 1;
            tally.confidence_sum += h.confidence;
        }

        if let Some(metrics) = &self.metrics {
            let _ = metrics.votes_recorded.add(held.len() as u64);
        }

        if self.tallies.is_empty() {
            return;
        }

        if self
            .tallies
            .values()
            .any(|t| t.votes >= self.config.votes_required)
        {
            log::debug!(
                "[DetectionCompiler] results ready after frame {} ({} tagmata tallied)",
                objects.frame_id,
                self.tallies.len()
            );
            self.ready = true;
        } else {
            self.window_age += 1;
            if self.window_age >= self.config.max_window {
                log::debug!(
                    "[DetectionCompiler] window expired after {} frames, discarding tallies",
                    self.window_age
                );
                self.tallies.clear();
                self.window_age = 0;
            }
        }

        if let Some(metrics) = &self.metrics {
            let best = self.tallies.values().map(|t| t.votes).max().unwrap_or(0);
            let _ = metrics.pending_votes.set(best as f64);
        }
    }

    /// `true` while a compiled result is waiting to be retrieved.
    pub fn results_ready(&self) -> bool {
        self.ready
    }

    /// Snapshots the current conclusion and resets all voting state.
    ///
    /// When called before readiness the snapshot has no held tagmata,
    /// only partial tallies.
    pub fn retrieve_results(&mut self) -> CompiledResults {
        let mut tallies: Vec<TagmaTally> = self
            .tallies
            .iter()
            .map(|(tagma, t)| TagmaTally {
                tagma: *tagma,
                votes: t.votes,
                mean_confidence: if t.votes == 0 {
                    0.0
                } else {
                    t.confidence_sum / t.votes as f32
                },
            })
            .collect();
        tallies.sort_by(|a, b| {
            b.votes
                .cmp(&a.votes)
                .then(b.mean_confidence.total_cmp(&a.mean_confidence))
        });

        let held_tagmata = tallies
            .iter()
            .filter(|t| t.votes >= self.config.votes_required)
            .map(|t| t.tagma)
            .collect();

        self.clear_outcomes();

        if let Some(metrics) = &self.metrics {
            let _ = metrics.compilations.increment();
        }

        CompiledResults {
            held_tagmata,
            tallies,
        }
    }

    /// Discards all accumulated evidence and readiness.
    pub fn clear_outcomes(&mut self) {
        self.tallies.clear();
        self.window_age = 0;
        self.ready = false;
        if let Some(metrics) = &self.metrics {
            let _ = metrics.pending_votes.set(0.0);
        }
    }
}

impl Default for DetectionCompiler {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagma_core::detection::{
        HandDetection, HandJoint, Handedness, JointPosition, TagmaDetection,
    };
    use tagma_core::math::{Rect, Vec2};

    fn grasped_outcomes(frame_id: u64) -> (TagmaDetectionOutcome, HandDetectionOutcome) {
        let rect = Rect::from_min_max(Vec2::new(0.4, 0.4), Vec2::new(0.6, 0.6));
        let objects = TagmaDetectionOutcome::new(
            frame_id,
            vec![TagmaDetection::new(Tagma::Thorax, 0.8, rect)],
        );
        let hand = HandDetection::new(Handedness::Right).with_joint(JointPosition::new(
            HandJoint::IndexTip,
            Vec2::new(0.5, 0.5),
            0.9,
        ));
        let hands = HandDetectionOutcome::new(frame_id, vec![hand]);
        (objects, hands)
    }

    #[test]
    fn empty_outcome_is_a_no_op() {
        let mut compiler = DetectionCompiler::default();
        compiler.add_outcome(
            &TagmaDetectionOutcome::default(),
            &HandDetectionOutcome::default(),
        );
        assert!(!compiler.results_ready());
        assert!(compiler.retrieve_results().is_empty());
    }

    #[test]
    fn becomes_ready_after_required_votes() {
        let mut compiler = DetectionCompiler::default();
        for frame in 0..5 {
            assert!(!compiler.results_ready());
            let (objects, hands) = grasped_outcomes(frame);
            compiler.add_outcome(&objects, &hands);
        }
        assert!(compiler.results_ready());

        let results = compiler.retrieve_results();
        assert_eq!(results.best(), Some(Tagma::Thorax));
        assert_eq!(results.tallies[0].votes, 5);
        assert!((results.tallies[0].mean_confidence - 0.8).abs() < 1e-5);
    }

    #[test]
    fn retrieve_resets_voting_state() {
        let mut compiler = DetectionCompiler::default();
        for frame in 0..5 {
            let (objects, hands) = grasped_outcomes(frame);
            compiler.add_outcome(&objects, &hands);
        }
        assert!(compiler.results_ready());

        let _ = compiler.retrieve_results();
        assert!(!compiler.results_ready());
        assert!(compiler.retrieve_results().is_empty());
    }

    #[test]
    fn votes_are_ignored_while_ready() {
        let mut compiler = DetectionCompiler::default();
        for frame in 0..8 {
            let (objects, hands) = grasped_outcomes(frame);
            compiler.add_outcome(&objects, &hands);
        }
        let results = compiler.retrieve_results();
        assert_eq!(results.tallies[0].votes, 5);
    }

    #[test]
    fn clear_discards_partial_evidence() {
        let mut compiler = DetectionCompiler::default();
        for frame in 0..3 {
            let (objects, hands) = grasped_outcomes(frame);
            compiler.add_outcome(&objects, &hands);
        }
        compiler.clear_outcomes();

        let results = compiler.retrieve_results();
        assert_eq!(results, CompiledResults::default());
    }

    #[test]
    fn stale_tallies_age_out() {
        let mut compiler = DetectionCompiler::new(CompilerConfig {
            max_window: 10,
            ..Default::default()
        });

        // Three held votes, then the hand moves away while detections keep coming.
        for frame in 0..3 {
            let (objects, hands) = grasped_outcomes(frame);
            compiler.add_outcome(&objects, &hands);
        }
        let rect = Rect::from_min_max(Vec2::new(0.4, 0.4), Vec2::new(0.6, 0.6));
        let far_hand = HandDetectionOutcome::new(
            0,
            vec![HandDetection::new(Handedness::Right).with_joint(JointPosition::new(
                HandJoint::IndexTip,
                Vec2::new(0.95, 0.95),
                0.9,
            ))],
        );
        for frame in 3..20 {
            let objects = TagmaDetectionOutcome::new(
                frame,
                vec![TagmaDetection::new(Tagma::Thorax, 0.8, rect)],
            );
            compiler.add_outcome(&objects, &far_hand);
        }

        assert!(!compiler.results_ready());
        let results = compiler.retrieve_results();
        assert!(results.tallies.is_empty());
    }

    #[test]
    fn never_ready_without_proximate_pairs() {
        let mut compiler = DetectionCompiler::default();
        let rect = Rect::from_min_max(Vec2::new(0.1, 0.1), Vec2::new(0.2, 0.2));
        for frame in 0..200 {
            let objects = TagmaDetectionOutcome::new(
                frame,
                vec![TagmaDetection::new(Tagma::Abdomen, 0.9, rect)],
            );
            compiler.add_outcome(&objects, &HandDetectionOutcome::default());
            assert!(!compiler.results_ready());
        }
    }

    #[test]
    fn winners_are_ordered_by_votes_then_confidence() {
        let mut compiler = DetectionCompiler::new(CompilerConfig {
            votes_required: 3,
            ..Default::default()
        });
        let head_rect = Rect::from_min_max(Vec2::new(0.1, 0.1), Vec2::new(0.3, 0.3));
        let thorax_rect = Rect::from_min_max(Vec2::new(0.5, 0.5), Vec2::new(0.7, 0.7));
        let hand = HandDetectionOutcome::new(
            0,
            vec![HandDetection::new(Handedness::Right)
                .with_joint(JointPosition::new(HandJoint::IndexTip, Vec2::new(0.2, 0.2), 0.9))
                .with_joint(JointPosition::new(HandJoint::ThumbTip, Vec2::new(0.6, 0.6), 0.9))],
        );

        for frame in 0..3 {
            let mut detections = vec![TagmaDetection::new(Tagma::Head, 0.6, head_rect)];
            if frame < 2 {
                detections.push(TagmaDetection::new(Tagma::Thorax, 0.9, thorax_rect));
            }
            compiler.add_outcome(&TagmaDetectionOutcome::new(frame, detections), &hand);
        }

        assert!(compiler.results_ready());
        let results = compiler.retrieve_results();
        assert_eq!(results.held_tagmata, vec![Tagma::Head]);
        assert_eq!(results.tallies[0].tagma, Tagma::Head);
        assert_eq!(results.tallies[1].tagma, Tagma::Thorax);
        assert_eq!(results.tallies[1].votes, 2);
    }
}
