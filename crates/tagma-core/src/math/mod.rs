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

//! Provides the 2D mathematics primitives used by the detection pipeline.
//!
//! Detection and hand-pose models deliver their results in a normalized image
//! space: both axes span `[0.0, 1.0]` with the origin at the bottom-left of
//! the frame. All geometry in this module operates in that space unless a
//! pixel-based type ([`Extent2D`], [`Origin2D`]) is explicitly involved.

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

// --- Declare Sub-Modules ---

pub mod dimension;
pub mod geometry;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::dimension::{Extent2D, Origin2D};
pub use self::geometry::Rect;
pub use self::vector::Vec2;

// --- Utility Functions ---

/// Compares two `f32` values for approximate equality using [`EPSILON`].
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON
}
