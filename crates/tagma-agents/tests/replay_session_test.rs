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

use tagma_agents::replay::{FrameRecord, ObservationLog, ReplaySource};
use tagma_agents::session::{PerceptionSession, SessionConfig, SessionEvent};
use tagma_core::detection::{
    HandDetection, HandJoint, Handedness, ImageFrame, JointPosition, Tagma, TagmaDetection,
};
use tagma_core::math::{Extent2D, Rect, Vec2};

/// A recorded grasp: six frames of a thorax with an index tip on it,
/// with "name" spoken at the start.
fn grasp_log() -> ObservationLog {
    let mut log = ObservationLog::new();
    for frame_id in 0..6 {
        log.push(FrameRecord {
            frame_id,
            objects: vec![TagmaDetection::new(
                Tagma::Thorax,
                0.85,
                Rect::from_center_half_extents(Vec2::new(0.5, 0.5), Vec2::new(0.1, 0.1)),
            )],
            hands: vec![HandDetection::new(Handedness::Right).with_joint(
                JointPosition::new(HandJoint::IndexTip, Vec2::new(0.52, 0.48), 0.9),
            )],
            transcript: (frame_id == 0).then(|| "the name".to_owned()),
        });
    }
    log
}

#[test]
fn a_recorded_session_replays_to_the_same_answer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grasp.jsonl");
    grasp_log().write_to(&path).unwrap();

    let source = ReplaySource::from_path(&path).unwrap();
    let frame_count = source.frame_count();
    let mut session = PerceptionSession::new(
        SessionConfig {
            prediction_interval: 1,
            live: true,
            ..Default::default()
        },
        source.tagma_model(),
        source.hand_model(),
        source.transcriber(),
    );

    let frame = ImageFrame::new(0, 0.0, Extent2D::new(640, 480));
    for _ in 0..frame_count {
        session.poll_speech();
        session.ingest_frame(&frame);
    }

    let events = session.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::Speak(text) if text.as_str() == "thorax")));
}

#[test]
fn replaying_twice_is_deterministic() {
    let log = grasp_log();
    let run = |log: &ObservationLog| {
        let source = ReplaySource::new(log.clone());
        let mut session = PerceptionSession::new(
            SessionConfig {
                prediction_interval: 1,
                live: true,
                ..Default::default()
            },
            source.tagma_model(),
            source.hand_model(),
            source.transcriber(),
        );
        let frame = ImageFrame::new(0, 0.0, Extent2D::new(640, 480));
        for _ in 0..log.len() {
            session.poll_speech();
            session.ingest_frame(&frame);
        }
        session.drain_events()
    };

    assert_eq!(run(&log), run(&log));
}
