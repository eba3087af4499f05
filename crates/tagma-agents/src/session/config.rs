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

//! Session configuration and output events.

use tagma_core::utils::counter::WrappingCounter;

use crate::compiler::{CompiledResults, CompilerConfig};
use crate::vision_agent::DetectionStrategy;

/// Tuning knobs for a perception session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Run object detection every Nth frame (clamped to 1..=60).
    pub prediction_interval: u64,
    /// Frame ids wrap back to zero at this threshold.
    pub frame_wrap: u64,
    /// Start the session in live (command-reactive) mode.
    pub live: bool,
    /// Which detection lane the vision agent deploys.
    pub strategy: DetectionStrategy,
    /// Compiler tuning.
    pub compiler: CompilerConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prediction_interval: 10,
            frame_wrap: WrappingCounter::DEFAULT_THRESHOLD,
            live: false,
            strategy: DetectionStrategy::FullFrame,
            compiler: CompilerConfig::default(),
        }
    }
}

/// Events a session publishes for the embedding application.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Speak this text aloud.
    Speak(String),
    /// Interrupt any utterance in progress.
    StopSpeaking,
    /// The cumulative transcript changed.
    TranscriptionChanged(String),
    /// The compiler produced a stabilized conclusion.
    ResultsCompiled(CompiledResults),
}
