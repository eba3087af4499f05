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

//! Per-frame object detection results.

use serde::{Deserialize, Serialize};

use crate::math::Rect;

use super::Tagma;

/// A single recognized object within one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TagmaDetection {
    /// The recognized class.
    pub tagma: Tagma,
    /// The model's confidence in the classification, in `[0.0, 1.0]`.
    pub confidence: f32,
    /// The location of the object in normalized image coordinates.
    pub bounding_box: Rect,
}

impl TagmaDetection {
    /// Creates a new detection.
    pub fn new(tagma: Tagma, confidence: f32, bounding_box: Rect) -> Self {
        Self {
            tagma,
            confidence,
            bounding_box,
        }
    }
}

/// The full set of object detections produced for one frame.
///
/// Ephemeral: each new frame replaces the previous outcome entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagmaDetectionOutcome {
    /// The id of the frame the detections belong to.
    pub frame_id: u64,
    /// The recognized objects, unordered.
    pub detections: Vec<TagmaDetection>,
}

impl TagmaDetectionOutcome {
    /// Creates an outcome for the given frame.
    pub fn new(frame_id: u64, detections: Vec<TagmaDetection>) -> Self {
        Self {
            frame_id,
            detections,
        }
    }

    /// Returns `true` when the frame produced no detections.
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Returns the highest-confidence detection of the given class, if any.
    pub fn best_of(&self, tagma: Tagma) -> Option<&TagmaDetection> {
        self.detections
            .iter()
            .filter(|d| d.tagma == tagma)
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}
