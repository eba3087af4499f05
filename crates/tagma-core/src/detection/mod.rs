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

//! The per-frame detection data model and the model-provider seams.
//!
//! Everything in this module is ephemeral: detection outcomes describe a
//! single frame and are replaced wholesale by the next one. Temporal
//! aggregation over these outcomes is the job of the detection compiler in
//! `tagma-agents`.

pub mod frame;
pub mod hand;
pub mod model;
pub mod object;
pub mod tagma;

pub use self::frame::ImageFrame;
pub use self::hand::{HandDetection, HandDetectionOutcome, HandJoint, Handedness, JointPosition};
pub use self::model::{HandModel, ModelError, TagmaModel};
pub use self::object::{TagmaDetection, TagmaDetectionOutcome};
pub use self::tagma::Tagma;
