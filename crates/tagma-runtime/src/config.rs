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

//! Runtime configuration, loaded from a JSON file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tagma_agents::compiler::CompilerConfig;
use tagma_agents::session::SessionConfig;
use tagma_agents::vision_agent::DetectionStrategy;
use tagma_core::utils::counter::WrappingCounter;

/// Everything the runtime binary can be tuned with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Run object detection every Nth frame.
    pub prediction_interval: u64,
    /// Frame ids wrap to zero at this threshold.
    pub frame_wrap: u64,
    /// Detection strategy: "full_frame" or "quadrant".
    pub strategy: String,
    /// Compiler: votes a tagma needs before results are ready.
    pub votes_required: u32,
    /// Compiler: confidence floor for the proximity join.
    pub min_confidence: f32,
    /// Compiler: normalized bounding-box expansion for the join.
    pub proximity_margin: f32,
    /// Compiler: compiled frames before a stale tally is discarded.
    pub max_window: u32,
    /// Replay this observation log instead of the synthetic scenario.
    pub replay_path: Option<PathBuf>,
    /// Pacing for the synthetic scenario, in frames per second.
    /// Zero runs as fast as possible (replay always does).
    pub frame_rate: f64,
    /// Synthetic frame width in pixels.
    pub frame_width: u32,
    /// Synthetic frame height in pixels.
    pub frame_height: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let compiler = CompilerConfig::default();
        Self {
            prediction_interval: 10,
            frame_wrap: WrappingCounter::DEFAULT_THRESHOLD,
            strategy: "full_frame".to_owned(),
            votes_required: compiler.votes_required,
            min_confidence: compiler.min_confidence,
            proximity_margin: compiler.proximity_margin,
            max_window: compiler.max_window,
            replay_path: None,
            frame_rate: 30.0,
            frame_width: 640,
            frame_height: 480,
        }
    }
}

impl RuntimeConfig {
    /// Loads a config file, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            log::info!("No config file given; using defaults");
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// The detection strategy named by the config.
    pub fn detection_strategy(&self) -> DetectionStrategy {
        match self.strategy.as_str() {
            "quadrant" => DetectionStrategy::Quadrant,
            "full_frame" => DetectionStrategy::FullFrame,
            other => {
                log::warn!("Unknown strategy '{other}', falling back to full_frame");
                DetectionStrategy::FullFrame
            }
        }
    }

    /// Builds the session configuration. Runtime sessions are always live.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            prediction_interval: self.prediction_interval,
            frame_wrap: self.frame_wrap,
            live: true,
            strategy: self.detection_strategy(),
            compiler: CompilerConfig {
                votes_required: self.votes_required,
                min_confidence: self.min_confidence,
                proximity_margin: self.proximity_margin,
                max_window: self.max_window,
            },
        }
    }
}
