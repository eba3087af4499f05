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

//! Headless perception runtime.
//!
//! Drives a [`PerceptionSession`] from either a recorded observation
//! log or the built-in synthetic scenario, logs everything the session
//! says, and prints a metrics summary on exit.
//!
//! Usage: `tagma-runtime [config.json]`

mod config;
mod synthesizer;
mod synthetic;

use std::path::PathBuf;
use std::time::Duration;

use tagma_agents::replay::ReplaySource;
use tagma_agents::session::{PerceptionSession, SessionEvent};
use tagma_core::detection::ImageFrame;
use tagma_core::math::Extent2D;
use tagma_core::speech::SpeechSynthesizer;
use tagma_telemetry::metrics::registry::MetricsRegistry;

use config::RuntimeConfig;
use synthesizer::LogSynthesizer;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config_path: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);
    let config = RuntimeConfig::load(config_path.as_deref())?;
    log::info!("Runtime config: {config:?}");

    let registry = MetricsRegistry::new();

    let (tagma_model, hand_model, transcriber, frame_count, paced) = match &config.replay_path {
        Some(path) => {
            let source = ReplaySource::from_path(path)?;
            log::info!("Replaying {} frames from {}", source.frame_count(), path.display());
            let frames = source.frame_count() as u64;
            (
                source.tagma_model(),
                source.hand_model(),
                source.transcriber(),
                frames,
                false,
            )
        }
        None => {
            log::info!("No replay log configured; running the synthetic scenario");
            let (tagma_model, hand_model, transcriber) = synthetic::providers();
            (
                tagma_model,
                hand_model,
                transcriber,
                synthetic::frame_count(),
                config.frame_rate > 0.0,
            )
        }
    };

    let mut session = PerceptionSession::new(
        config.session_config(),
        tagma_model,
        hand_model,
        transcriber,
    )
    .with_telemetry(&registry);

    let mut tts = LogSynthesizer::new();
    let frame_size = Extent2D::new(config.frame_width, config.frame_height);
    let frame_interval = if paced {
        Some(Duration::from_secs_f64(1.0 / config.frame_rate))
    } else {
        None
    };

    for tick in 0..frame_count {
        session.poll_speech();
        // The session assigns its own wrapping frame ids.
        session.ingest_frame(&ImageFrame::new(0, tick as f64 / config.frame_rate.max(1.0), frame_size));

        for event in session.drain_events() {
            match event {
                SessionEvent::Speak(text) => tts.speak(&text),
                SessionEvent::StopSpeaking => tts.stop(),
                SessionEvent::TranscriptionChanged(text) => {
                    log::info!("Transcript: {text}");
                }
                SessionEvent::ResultsCompiled(results) => {
                    log::info!("Compiled: {:?}", results.held_tagmata);
                }
            }
        }

        if let Some(interval) = frame_interval {
            std::thread::sleep(interval);
        }
    }

    let summary = serde_json::to_string_pretty(&registry.snapshot_json())?;
    println!("{summary}");
    Ok(())
}
