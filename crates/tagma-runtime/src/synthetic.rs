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

//! A scripted scenario that exercises the full fusion path.
//!
//! No hardware involved: the object model always sees a head and an
//! abdomen, the hand model moves an index tip toward the head over the
//! first two seconds, and the transcriber speaks "test" and then asks
//! for the name and the information.

use tagma_core::detection::{
    HandDetection, HandJoint, HandModel, Handedness, ImageFrame, JointPosition, ModelError, Tagma,
    TagmaDetection, TagmaModel,
};
use tagma_core::math::{Rect, Vec2};
use tagma_core::speech::Transcriber;

/// Where the scripted head sits, in normalized coordinates.
const HEAD_CENTER: Vec2 = Vec2 { x: 0.35, y: 0.6 };

/// Frames the hand takes to reach the head.
const REACH_FRAMES: u64 = 60;

/// Builds the three scripted providers for one scenario run.
pub fn providers() -> (Box<dyn TagmaModel>, Box<dyn HandModel>, Box<dyn Transcriber>) {
    (
        Box::new(SyntheticTagmaModel),
        Box::new(SyntheticHandModel),
        Box::new(SyntheticTranscriber { polls: 0 }),
    )
}

/// Total frames the scenario is designed to run for.
pub fn frame_count() -> u64 {
    REACH_FRAMES * 4
}

struct SyntheticTagmaModel;

impl TagmaModel for SyntheticTagmaModel {
    fn label(&self) -> &str {
        "synthetic"
    }

    fn predict(&mut self, _frame: &ImageFrame) -> Result<Vec<TagmaDetection>, ModelError> {
        Ok(vec![
            TagmaDetection::new(
                Tagma::Head,
                0.85,
                Rect::from_center_half_extents(HEAD_CENTER, Vec2::new(0.08, 0.08)),
            ),
            TagmaDetection::new(
                Tagma::Abdomen,
                0.7,
                Rect::from_center_half_extents(Vec2::new(0.75, 0.4), Vec2::new(0.1, 0.12)),
            ),
        ])
    }
}

struct SyntheticHandModel;

impl HandModel for SyntheticHandModel {
    fn predict(&mut self, frame: &ImageFrame) -> Result<Vec<HandDetection>, ModelError> {
        // Glide from the bottom-right corner onto the head, then hold.
        let start = Vec2::new(0.9, 0.1);
        let t = (frame.id.min(REACH_FRAMES) as f32) / REACH_FRAMES as f32;
        let tip = Vec2::lerp(start, HEAD_CENTER, t);

        Ok(vec![HandDetection::new(Handedness::Right)
            .with_joint(JointPosition::new(HandJoint::IndexTip, tip, 0.9))
            .with_joint(JointPosition::missing(HandJoint::Wrist))])
    }
}

struct SyntheticTranscriber {
    polls: u64,
}

impl Transcriber for SyntheticTranscriber {
    fn poll_transcription(&mut self) -> Option<String> {
        self.polls += 1;
        // Cumulative snapshots, the way live speech backends report.
        match self.polls {
            5 => Some("test".to_owned()),
            20 => Some("test what is the name".to_owned()),
            160 => Some("test what is the name give me the information".to_owned()),
            _ => None,
        }
    }

    fn reset(&mut self) {}
}
