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

//! Persistence and replay of observation streams.
//!
//! A captured session can be written out as JSON lines, one
//! [`FrameRecord`] per line, and replayed deterministically through the
//! pipeline by plugging a [`ReplaySource`] in where the live models
//! would sit.

use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tagma_core::detection::{
    HandDetection, HandModel, ImageFrame, ModelError, TagmaDetection, TagmaModel,
};
use tagma_core::speech::Transcriber;

use crate::error::AgentError;

/// Everything observed for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// The (wrapping) frame id the observations belong to.
    pub frame_id: u64,
    /// Object detections for the frame.
    #[serde(default)]
    pub objects: Vec<TagmaDetection>,
    /// Hand detections for the frame.
    #[serde(default)]
    pub hands: Vec<HandDetection>,
    /// Cumulative transcript snapshot, if one arrived on this frame.
    #[serde(default)]
    pub transcript: Option<String>,
}

/// An ordered log of frame records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationLog {
    records: Vec<FrameRecord>,
}

impl ObservationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn push(&mut self, record: FrameRecord) {
        self.records.push(record);
    }

    /// The recorded frames, in capture order.
    pub fn records(&self) -> &[FrameRecord] {
        &self.records
    }

    /// Number of recorded frames.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes the log as JSON lines.
    pub fn write(&self, mut writer: impl Write) -> Result<(), AgentError> {
        for record in &self.records {
            let line = serde_json::to_string(record)?;
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the log to a file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), AgentError> {
        self.write(BufWriter::new(File::create(path)?))
    }

    /// Reads a log from JSON lines, skipping blank lines.
    pub fn read(reader: impl BufRead) -> Result<Self, AgentError> {
        let mut log = Self::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|source| AgentError::LogFormat {
                line: index + 1,
                source,
            })?;
            log.push(record);
        }
        Ok(log)
    }

    /// Reads a log from a file.
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, AgentError> {
        Self::read(BufReader::new(File::open(path)?))
    }
}

/// Replays an observation log through the pipeline's provider seams.
///
/// The source hands out one provider per stream; all of them read the
/// same shared log. Detections are keyed by frame id, so the replayed
/// session must number frames the way the recording did (same wrap
/// threshold, frames ingested from the start).
pub struct ReplaySource {
    log: Arc<ObservationLog>,
}

impl ReplaySource {
    /// Wraps a loaded log.
    pub fn new(log: ObservationLog) -> Self {
        Self { log: Arc::new(log) }
    }

    /// Loads a log file and wraps it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AgentError> {
        Ok(Self::new(ObservationLog::read_from(path)?))
    }

    /// Number of recorded frames.
    pub fn frame_count(&self) -> usize {
        self.log.len()
    }

    fn index(&self) -> HashMap<u64, usize> {
        self.log
            .records()
            .iter()
            .enumerate()
            .map(|(i, r)| (r.frame_id, i))
            .collect()
    }

    /// An object model that answers from the log.
    pub fn tagma_model(&self) -> Box<dyn TagmaModel> {
        Box::new(ReplayTagmaModel {
            log: self.log.clone(),
            index: self.index(),
        })
    }

    /// A hand model that answers from the log.
    pub fn hand_model(&self) -> Box<dyn HandModel> {
        Box::new(ReplayHandModel {
            log: self.log.clone(),
            index: self.index(),
        })
    }

    /// A transcriber that yields the recorded snapshots in order.
    pub fn transcriber(&self) -> Box<dyn Transcriber> {
        let snapshots = self
            .log
            .records()
            .iter()
            .filter_map(|r| r.transcript.clone())
            .collect();
        Box::new(ReplayTranscriber { snapshots })
    }
}

struct ReplayTagmaModel {
    log: Arc<ObservationLog>,
    index: HashMap<u64, usize>,
}

impl TagmaModel for ReplayTagmaModel {
    fn label(&self) -> &str {
        "replay"
    }

    fn predict(&mut self, frame: &ImageFrame) -> Result<Vec<TagmaDetection>, ModelError> {
        Ok(self
            .index
            .get(&frame.id)
            .map(|&i| self.log.records()[i].objects.clone())
            .unwrap_or_default())
    }
}

struct ReplayHandModel {
    log: Arc<ObservationLog>,
    index: HashMap<u64, usize>,
}

impl HandModel for ReplayHandModel {
    fn predict(&mut self, frame: &ImageFrame) -> Result<Vec<HandDetection>, ModelError> {
        Ok(self
            .index
            .get(&frame.id)
            .map(|&i| self.log.records()[i].hands.clone())
            .unwrap_or_default())
    }
}

struct ReplayTranscriber {
    snapshots: VecDeque<String>,
}

impl Transcriber for ReplayTranscriber {
    fn poll_transcription(&mut self) -> Option<String> {
        self.snapshots.pop_front()
    }

    // A replayed recording is already a fresh transcript stream, so a
    // backend restart has nothing to discard.
    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagma_core::detection::{Handedness, Tagma};
    use tagma_core::math::{Extent2D, Rect, Vec2};

    fn sample_log() -> ObservationLog {
        let mut log = ObservationLog::new();
        log.push(FrameRecord {
            frame_id: 0,
            objects: vec![TagmaDetection::new(
                Tagma::Head,
                0.7,
                Rect::from_min_max(Vec2::new(0.1, 0.1), Vec2::new(0.3, 0.3)),
            )],
            hands: vec![HandDetection::new(Handedness::Left)],
            transcript: Some("the name".to_owned()),
        });
        log.push(FrameRecord {
            frame_id: 1,
            ..Default::default()
        });
        log
    }

    #[test]
    fn round_trips_through_json_lines() {
        let log = sample_log();
        let mut buffer = Vec::new();
        log.write(&mut buffer).unwrap();

        let restored = ObservationLog::read(buffer.as_slice()).unwrap();
        assert_eq!(restored, log);
    }

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");

        let log = sample_log();
        log.write_to(&path).unwrap();
        let restored = ObservationLog::read_from(&path).unwrap();
        assert_eq!(restored.len(), 2);
    }

    #[test]
    fn malformed_lines_report_their_position() {
        let input = b"{\"frame_id\":0}\nnot json\n" as &[u8];
        match ObservationLog::read(input) {
            Err(AgentError::LogFormat { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected a format error, got {other:?}"),
        }
    }

    #[test]
    fn replay_models_answer_by_frame_id() {
        let source = ReplaySource::new(sample_log());
        let mut model = source.tagma_model();

        let frame = ImageFrame::new(0, 0.0, Extent2D::new(640, 480));
        assert_eq!(model.predict(&frame).unwrap().len(), 1);

        let unknown = ImageFrame::new(42, 0.0, Extent2D::new(640, 480));
        assert!(model.predict(&unknown).unwrap().is_empty());
    }

    #[test]
    fn replay_transcriber_yields_snapshots_in_order() {
        let source = ReplaySource::new(sample_log());
        let mut transcriber = source.transcriber();

        assert_eq!(transcriber.poll_transcription().as_deref(), Some("the name"));
        assert_eq!(transcriber.poll_transcription(), None);
    }
}
