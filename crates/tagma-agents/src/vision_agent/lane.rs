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

//! Detection lanes: interchangeable strategies for running the object model.

use tagma_core::detection::{ImageFrame, ModelError, TagmaDetection, TagmaDetectionOutcome, TagmaModel};
use tagma_core::math::{Extent2D, Origin2D, Rect, Vec2};

/// Strategy seam for object detection.
///
/// A lane decides how a frame is presented to the model; the agent
/// decides which lane runs. Detections come back in full-frame
/// normalized coordinates regardless of lane.
pub trait DetectionLane {
    /// A short strategy label for logs and telemetry.
    fn label(&self) -> &str;

    /// Runs the model over one frame.
    fn detect(
        &self,
        model: &mut dyn TagmaModel,
        frame: &ImageFrame,
    ) -> Result<TagmaDetectionOutcome, ModelError>;
}

/// Passes the whole frame to the model in one inference call.
#[derive(Debug, Default)]
pub struct FullFrameLane;

impl FullFrameLane {
    /// Creates the lane.
    pub fn new() -> Self {
        Self
    }
}

impl DetectionLane for FullFrameLane {
    fn label(&self) -> &str {
        "full_frame"
    }

    fn detect(
        &self,
        model: &mut dyn TagmaModel,
        frame: &ImageFrame,
    ) -> Result<TagmaDetectionOutcome, ModelError> {
        let detections = model.predict(frame)?;
        Ok(TagmaDetectionOutcome::new(frame.id, detections))
    }
}

/// Runs the model over four quadrant crops and merges the outcomes.
///
/// Small objects that vanish at full-frame resolution survive a
/// quadrant crop, at the cost of four inference calls per frame.
/// Detections are remapped from crop-normalized coordinates back into
/// the full frame before merging.
#[derive(Debug, Default)]
pub struct QuadrantLane;

impl QuadrantLane {
    /// Creates the lane.
    pub fn new() -> Self {
        Self
    }

    /// The four crop regions of a frame, as top-left pixel origin plus size.
    fn quadrants(size: Extent2D) -> [(Origin2D, Extent2D); 4] {
        let left_w = size.width / 2;
        let right_w = size.width - left_w;
        let top_h = size.height / 2;
        let bottom_h = size.height - top_h;
        [
            (Origin2D::new(0, 0), Extent2D::new(left_w, top_h)),
            (Origin2D::new(left_w, 0), Extent2D::new(right_w, top_h)),
            (Origin2D::new(0, top_h), Extent2D::new(left_w, bottom_h)),
            (
                Origin2D::new(left_w, top_h),
                Extent2D::new(right_w, bottom_h),
            ),
        ]
    }

    /// Maps a crop-normalized point into full-frame normalized coordinates.
    ///
    /// Pixel origins count rows from the top of the image while the
    /// normalized Y axis grows from the bottom, so the crop's vertical
    /// placement flips when converting.
    fn remap_point(point: Vec2, origin: Origin2D, crop: Extent2D, full: Extent2D) -> Vec2 {
        let full_w = full.width as f32;
        let full_h = full.height as f32;
        let x = (origin.x as f32 + point.x * crop.width as f32) / full_w;
        let y = (full_h - (origin.y + crop.height) as f32 + point.y * crop.height as f32) / full_h;
        Vec2::new(x, y)
    }

    fn remap_rect(rect: &Rect, origin: Origin2D, crop: Extent2D, full: Extent2D) -> Rect {
        Rect::from_min_max(
            Self::remap_point(rect.min, origin, crop, full),
            Self::remap_point(rect.max, origin, crop, full),
        )
    }
}

impl DetectionLane for QuadrantLane {
    fn label(&self) -> &str {
        "quadrant"
    }

    fn detect(
        &self,
        model: &mut dyn TagmaModel,
        frame: &ImageFrame,
    ) -> Result<TagmaDetectionOutcome, ModelError> {
        if frame.size.is_empty() {
            return Ok(TagmaDetectionOutcome::new(frame.id, Vec::new()));
        }

        let mut merged: Vec<TagmaDetection> = Vec::new();
        for (origin, size) in Self::quadrants(frame.size) {
            if size.is_empty() {
                continue;
            }
            let crop = frame.crop(origin, size);
            let detections = model.predict(&crop)?;
            merged.extend(detections.into_iter().map(|d| TagmaDetection {
                bounding_box: Self::remap_rect(&d.bounding_box, origin, size, frame.size),
                ..d
            }));
        }

        Ok(TagmaDetectionOutcome::new(frame.id, merged))
    }
}
