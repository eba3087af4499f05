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

//! Error types shared across the agents.

use tagma_core::detection::ModelError;

/// Errors surfaced by the agents crate.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A model provider failed.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// An observation log could not be read or written.
    #[error("observation log I/O: {0}")]
    LogIo(#[from] std::io::Error),

    /// A frame record could not be serialized.
    #[error("observation log encode: {0}")]
    LogEncode(#[from] serde_json::Error),

    /// An observation log line could not be parsed.
    #[error("observation log line {line}: {source}")]
    LogFormat {
        /// 1-based line number in the log file.
        line: usize,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}
