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

//! Provider seams for the inference backends.
//!
//! Real deployments plug hardware-accelerated models in behind these traits;
//! tests and the headless runtime plug in scripted or replayed providers.
//! The pipeline never touches an inference framework directly.

use std::fmt::Display;

use super::{HandDetection, ImageFrame, TagmaDetection};

/// An error reported by a model provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The model is not (or no longer) loaded. The owning lane retries
    /// setup on the next frame and drops the current one.
    NotLoaded,
    /// Inference ran but failed.
    Inference(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::NotLoaded => write!(f, "Model not loaded"),
            ModelError::Inference(msg) => write!(f, "Inference failed: {msg}"),
        }
    }
}

impl std::error::Error for ModelError {}

/// A provider of object detections for the tagmata classes.
///
/// Implementations run inference on a frame and return raw detections in the
/// frame's own normalized coordinate space; lanes are responsible for any
/// remapping (see the quadrant lane).
pub trait TagmaModel: Send {
    /// A short human-readable label for logs and telemetry.
    fn label(&self) -> &str;

    /// Runs inference on one frame.
    fn predict(&mut self, frame: &ImageFrame) -> Result<Vec<TagmaDetection>, ModelError>;
}

/// A provider of hand pose detections.
pub trait HandModel: Send {
    /// Runs inference on one frame.
    fn predict(&mut self, frame: &ImageFrame) -> Result<Vec<HandDetection>, ModelError>;
}
