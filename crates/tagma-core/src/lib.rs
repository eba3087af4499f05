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

//! # Tagma Core
//!
//! Foundational crate containing traits, core types, and interface contracts
//! that define the perception pipeline's architecture: math primitives for
//! detection geometry, the per-frame detection data model, speech text
//! snapshots, the event bus, and the seams behind which platform concerns
//! (camera capture, model inference, speech synthesis) live.

#![warn(missing_docs)]

pub mod detection;
pub mod event;
pub mod math;
pub mod speech;
pub mod telemetry;
pub mod utils;

pub use utils::counter::WrappingCounter;
pub use utils::timer::Stopwatch;
