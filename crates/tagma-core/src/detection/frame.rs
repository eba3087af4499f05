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

//! The captured camera frame handed to the detection models.

use crate::math::{Extent2D, Origin2D};

/// One captured video frame.
///
/// The pixel buffer is optional: replayed or synthetic observation streams
/// carry detections without pixels, and models backed by recorded outcomes
/// never look at the buffer. When present, the buffer is tightly packed RGBA,
/// row-major from the top of the image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageFrame {
    /// Monotonic frame id assigned by the capture source (wraps, see
    /// [`crate::utils::counter::WrappingCounter`]).
    pub id: u64,
    /// Capture timestamp in seconds since the session started.
    pub timestamp_secs: f64,
    /// Frame dimensions in pixels.
    pub size: Extent2D,
    /// The RGBA pixel buffer, `size.area() * 4` bytes when present.
    pub rgba: Option<Vec<u8>>,
}

impl ImageFrame {
    /// Creates a frame without pixel data.
    pub fn new(id: u64, timestamp_secs: f64, size: Extent2D) -> Self {
        Self {
            id,
            timestamp_secs,
            size,
            rgba: None,
        }
    }

    /// Attaches an RGBA pixel buffer, builder style.
    ///
    /// The buffer length must be `size.area() * 4`; mismatched buffers are
    /// discarded with a warning rather than propagated.
    pub fn with_rgba(mut self, rgba: Vec<u8>) -> Self {
        let expected = self.size.area() as usize * 4;
        if rgba.len() == expected {
            self.rgba = Some(rgba);
        } else {
            log::warn!(
                "Discarding RGBA buffer for frame {}: expected {} bytes, got {}",
                self.id,
                expected,
                rgba.len()
            );
        }
        self
    }

    /// Extracts a rectangular pixel region as a new frame.
    ///
    /// The region is clamped to the frame bounds; an empty clamped region
    /// yields a zero-sized frame. The crop keeps the source frame's id and
    /// timestamp so downstream outcomes still correlate with the capture.
    pub fn crop(&self, origin: Origin2D, size: Extent2D) -> ImageFrame {
        let x0 = origin.x.min(self.size.width);
        let y0 = origin.y.min(self.size.height);
        let width = size.width.min(self.size.width - x0);
        let height = size.height.min(self.size.height - y0);
        let cropped_size = Extent2D::new(width, height);

        let rgba = match &self.rgba {
            Some(buffer) if !cropped_size.is_empty() => {
                let mut out = Vec::with_capacity(cropped_size.area() as usize * 4);
                let stride = self.size.width as usize * 4;
                for row in 0..height as usize {
                    let src_row = (y0 as usize + row) * stride + x0 as usize * 4;
                    out.extend_from_slice(&buffer[src_row..src_row + width as usize * 4]);
                }
                Some(out)
            }
            _ => None,
        };

        ImageFrame {
            id: self.id,
            timestamp_secs: self.timestamp_secs,
            size: cropped_size,
            rgba,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a 4x4 frame whose pixel (x, y) has R = y * 4 + x.
    fn checker_frame() -> ImageFrame {
        let size = Extent2D::new(4, 4);
        let mut rgba = Vec::with_capacity(size.area() as usize * 4);
        for i in 0..size.area() as u8 {
            rgba.extend_from_slice(&[i, 0, 0, 255]);
        }
        ImageFrame::new(1, 0.0, size).with_rgba(rgba)
    }

    #[test]
    fn test_with_rgba_rejects_wrong_length() {
        let frame = ImageFrame::new(1, 0.0, Extent2D::new(2, 2)).with_rgba(vec![0u8; 3]);
        assert!(frame.rgba.is_none());
    }

    #[test]
    fn test_crop_extracts_expected_pixels() {
        let frame = checker_frame();
        let crop = frame.crop(Origin2D::new(2, 1), Extent2D::new(2, 2));

        assert_eq!(crop.size, Extent2D::new(2, 2));
        assert_eq!(crop.id, frame.id);

        let rgba = crop.rgba.expect("crop should carry pixels");
        // Row 1 of the source starts at pixel 4; columns 2..4 are pixels 6, 7.
        assert_eq!(rgba[0], 6);
        assert_eq!(rgba[4], 7);
        // Row 2, columns 2..4 are pixels 10, 11.
        assert_eq!(rgba[8], 10);
        assert_eq!(rgba[12], 11);
    }

    #[test]
    fn test_crop_clamps_to_bounds() {
        let frame = checker_frame();
        let crop = frame.crop(Origin2D::new(3, 3), Extent2D::new(10, 10));
        assert_eq!(crop.size, Extent2D::new(1, 1));
        assert_eq!(crop.rgba.unwrap()[0], 15);

        let empty = frame.crop(Origin2D::new(4, 4), Extent2D::new(1, 1));
        assert!(empty.size.is_empty());
        assert!(empty.rgba.is_none());
    }

    #[test]
    fn test_crop_without_pixels_keeps_metadata() {
        let frame = ImageFrame::new(9, 1.5, Extent2D::new(8, 8));
        let crop = frame.crop(Origin2D::new(0, 0), Extent2D::new(4, 4));
        assert_eq!(crop.id, 9);
        assert_eq!(crop.timestamp_secs, 1.5);
        assert!(crop.rgba.is_none());
    }
}
