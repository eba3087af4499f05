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

//! Per-frame hand pose detection results.
//!
//! Hand pose models report a sparse skeleton: a set of named joints, each
//! with an optional position (a joint the model could not localize has no
//! position) and a confidence. The hand stream runs independently of the
//! object stream and at a different rate; consumers always take the *latest*
//! hand outcome rather than pairing outcomes by frame id.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Which hand a detection belongs to, as classified by the pose model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Handedness {
    /// The model classified the hand as a left hand.
    Left,
    /// The model classified the hand as a right hand.
    Right,
    /// The model could not determine chirality.
    #[default]
    Unknown,
}

impl Handedness {
    /// Parses a model chirality label ("left"/"right", any casing).
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "left" => Handedness::Left,
            "right" => Handedness::Right,
            _ => Handedness::Unknown,
        }
    }
}

/// The named joints of the hand skeleton the pipeline tracks.
///
/// A reduced set of the full pose-model skeleton: the wrist plus the knuckle
/// (MCP) and tip of each finger. Tips are what the proximity join cares
/// about; the knuckles support future grip diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandJoint {
    /// The wrist joint at the base of the hand.
    Wrist,
    /// The thumb knuckle.
    ThumbMcp,
    /// The thumb tip.
    ThumbTip,
    /// The index finger knuckle.
    IndexMcp,
    /// The index finger tip.
    IndexTip,
    /// The middle finger knuckle.
    MiddleMcp,
    /// The middle finger tip.
    MiddleTip,
    /// The ring finger knuckle.
    RingMcp,
    /// The ring finger tip.
    RingTip,
    /// The little finger knuckle.
    LittleMcp,
    /// The little finger tip.
    LittleTip,
}

impl HandJoint {
    /// Every tracked joint.
    pub const ALL: [HandJoint; 11] = [
        HandJoint::Wrist,
        HandJoint::ThumbMcp,
        HandJoint::ThumbTip,
        HandJoint::IndexMcp,
        HandJoint::IndexTip,
        HandJoint::MiddleMcp,
        HandJoint::MiddleTip,
        HandJoint::RingMcp,
        HandJoint::RingTip,
        HandJoint::LittleMcp,
        HandJoint::LittleTip,
    ];

    /// Returns `true` for fingertip joints.
    pub fn is_tip(&self) -> bool {
        matches!(
            self,
            HandJoint::ThumbTip
                | HandJoint::IndexTip
                | HandJoint::MiddleTip
                | HandJoint::RingTip
                | HandJoint::LittleTip
        )
    }
}

/// One joint observation within a hand detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointPosition {
    /// Which joint this observation describes.
    pub joint: HandJoint,
    /// The joint's position in normalized image coordinates, or `None` when
    /// the model failed to localize it this frame.
    pub position: Option<Vec2>,
    /// The model's confidence in the localization, in `[0.0, 1.0]`.
    pub confidence: f32,
}

impl JointPosition {
    /// Creates a localized joint observation.
    pub fn new(joint: HandJoint, position: Vec2, confidence: f32) -> Self {
        Self {
            joint,
            position: Some(position),
            confidence,
        }
    }

    /// Creates an observation for a joint the model could not localize.
    pub fn missing(joint: HandJoint) -> Self {
        Self {
            joint,
            position: None,
            confidence: 0.0,
        }
    }
}

/// One detected hand: its joints and chirality classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandDetection {
    /// The joint observations for this hand.
    pub joints: Vec<JointPosition>,
    /// Which hand this is.
    pub handedness: Handedness,
}

impl HandDetection {
    /// Creates an empty hand detection with the given chirality.
    pub fn new(handedness: Handedness) -> Self {
        Self {
            joints: Vec::new(),
            handedness,
        }
    }

    /// Adds a joint observation, builder style.
    pub fn with_joint(mut self, joint: JointPosition) -> Self {
        self.joints.push(joint);
        self
    }

    /// Iterates over the positions of every localized joint.
    pub fn positioned_joints(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.joints.iter().filter_map(|j| j.position)
    }

    /// Iterates over the positions of every localized fingertip.
    pub fn tip_positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.joints
            .iter()
            .filter(|j| j.joint.is_tip())
            .filter_map(|j| j.position)
    }
}

/// The full set of hand detections produced for one frame.
///
/// The default value (no hands) stands in whenever the hand stream has not
/// produced anything yet, so downstream consumers never need to special-case
/// a missing outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandDetectionOutcome {
    /// The id of the frame the detections belong to.
    pub frame_id: u64,
    /// The detected hands, unordered.
    pub hands: Vec<HandDetection>,
}

impl HandDetectionOutcome {
    /// Creates an outcome for the given frame.
    pub fn new(frame_id: u64, hands: Vec<HandDetection>) -> Self {
        Self { frame_id, hands }
    }

    /// Returns `true` when the frame produced no hands.
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    /// Iterates over the positions of every localized joint across all hands.
    pub fn all_joint_positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.hands.iter().flat_map(|h| h.positioned_joints())
    }
}
