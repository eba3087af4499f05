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

//! The hand-to-object proximity join.
//!
//! A detection counts as held when any localized hand joint lands inside
//! its bounding box expanded by a normalized margin. The raw distance to
//! the nearest joint is kept alongside for diagnostics overlays.

use tagma_core::detection::{HandDetectionOutcome, Tagma, TagmaDetectionOutcome};
use tagma_core::math::Rect;

use super::CompilerConfig;

/// One detection judged held this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeldTagma {
    /// The held object class.
    pub tagma: Tagma,
    /// Confidence of the underlying detection.
    pub confidence: f32,
    /// Distance from the unexpanded box to the nearest joint. Zero when
    /// a joint is inside the box itself.
    pub joint_distance: f32,
}

/// Distance from a bounding box to the nearest localized hand joint.
///
/// `None` when no joint in the outcome carries a position.
pub fn closest_joint_distance(bounding_box: &Rect, hands: &HandDetectionOutcome) -> Option<f32> {
    hands
        .all_joint_positions()
        .map(|p| bounding_box.distance_to_point(p))
        .min_by(f32::total_cmp)
}

/// Joins one object outcome against one hand outcome.
///
/// Detections below `config.min_confidence` are skipped. The result is
/// de-duplicated per tagma, keeping the highest-confidence detection,
/// and is empty whenever either stream has nothing to contribute.
pub fn held_tagmata(
    objects: &TagmaDetectionOutcome,
    hands: &HandDetectionOutcome,
    config: &CompilerConfig,
) -> Vec<HeldTagma> {
    let mut held: Vec<HeldTagma> = Vec::new();

    for detection in &objects.detections {
        if detection.confidence < config.min_confidence {
            continue;
        }

        let reach = detection.bounding_box.expanded_by(config.proximity_margin);
        if !hands.all_joint_positions().any(|p| reach.contains_point(p)) {
            continue;
        }

        // contains_point above guarantees at least one localized joint
        let distance = closest_joint_distance(&detection.bounding_box, hands).unwrap_or(f32::MAX);

        match held.iter_mut().find(|h| h.tagma == detection.tagma) {
            Some(existing) if existing.confidence < detection.confidence => {
                existing.confidence = detection.confidence;
                existing.joint_distance = distance;
            }
            Some(_) => {}
            None => held.push(HeldTagma {
                tagma: detection.tagma,
                confidence: detection.confidence,
                joint_distance: distance,
            }),
        }
    }

    held
}
