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

//! The detection compiler: temporal voting over fused detection streams.
//!
//! Per-frame detections are noisy. The compiler joins each object
//! outcome with the latest hand outcome, tallies a vote for every tagma
//! judged held, and only declares a result once a tagma has accumulated
//! enough votes. Callers poll [`DetectionCompiler::results_ready`] and
//! collect the stabilized conclusion with
//! [`DetectionCompiler::retrieve_results`].

mod agent;
pub mod proximity;

pub use agent::{CompiledResults, CompilerConfig, DetectionCompiler, TagmaTally};
