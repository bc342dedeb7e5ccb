//! Camera frame as produced upstream.

use serde::{Deserialize, Serialize};

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 3;

/// H×W×3 image, row-major with interleaved channels.
///
/// Channel order and resolution are whatever the simulator produced.
/// The recorder never reinterprets pixel data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Rows
    pub height: u32,
    /// Columns
    pub width: u32,
    /// Pixel bytes, `height * width * 3` long
    pub data: Vec<u8>,
}

impl Frame {
    /// Wrap raw pixel data.
    ///
    /// No validation happens here; a frame whose buffer does not match its
    /// dimensions is refused when the episode is written.
    pub fn new(height: u32, width: u32, data: Vec<u8>) -> Self {
        Self {
            height,
            width,
            data,
        }
    }

    /// Frame filled with a single colour.
    pub fn filled(height: u32, width: u32, pixel: [u8; CHANNELS]) -> Self {
        let count = height as usize * width as usize;
        let mut data = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            data.extend_from_slice(&pixel);
        }
        Self::new(height, width, data)
    }

    /// Buffer length implied by the dimensions.
    #[inline]
    pub fn expected_len(&self) -> usize {
        self.height as usize * self.width as usize * CHANNELS
    }

    /// Whether the buffer length matches the dimensions.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.expected_len()
    }

    /// Pixel at (row, col), or `None` outside the frame.
    pub fn pixel(&self, row: u32, col: u32) -> Option<[u8; CHANNELS]> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let idx = (row as usize * self.width as usize + col as usize) * CHANNELS;
        let px = self.data.get(idx..idx + CHANNELS)?;
        Some([px[0], px[1], px[2]])
    }
}
