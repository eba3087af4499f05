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

//! Subsystem orchestrators for the perception pipeline.
//!
//! Each agent owns one stream: the vision agent runs object detection
//! through interchangeable lanes, the hand agent tracks hand pose, and
//! the speech agent turns transcript updates into voice commands. The
//! detection compiler fuses the vision and hand streams into stabilized
//! conclusions, and the perception session wires all of it together.

#![warn(missing_docs)]

pub mod compiler;
pub mod error;
pub mod hand_agent;
pub mod replay;
pub mod session;
pub mod speech_agent;
pub mod vision_agent;
