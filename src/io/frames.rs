//! PNG dumps of rendered frames.

use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb};

use crate::core::types::Frame;
use crate::error::{Error, Result};

/// Writes frames as numbered PNG files into a directory.
///
/// Bytes are written in the order they are stored; a BGR frame will look
/// colour-swapped in a viewer, which is acceptable for inspection.
pub struct FrameDumper {
    dir: PathBuf,
    written: u64,
}

impl FrameDumper {
    /// Create the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, written: 0 })
    }

    /// Save a frame as `ep{episode:04}_{step:05}.png`.
    pub fn save(&mut self, frame: &Frame, episode: usize, step: usize) -> Result<PathBuf> {
        let path = self
            .dir
            .join(format!("ep{:04}_{:05}.png", episode, step));
        let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_raw(frame.width, frame.height, frame.data.clone()).ok_or_else(
                || {
                    Error::Export(format!(
                        "frame {}x{} holds {} bytes",
                        frame.height,
                        frame.width,
                        frame.data.len()
                    ))
                },
            )?;
        buffer.save(&path)?;
        self.written += 1;
        Ok(path)
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_png() {
        let temp_dir = TempDir::new().unwrap();
        let mut dumper = FrameDumper::new(temp_dir.path().join("frames")).unwrap();

        let path = dumper.save(&Frame::filled(3, 5, [10, 20, 30]), 1, 2).unwrap();
        assert!(path.ends_with("ep0001_00002.png"));
        assert!(path.exists());
        assert_eq!(dumper.written(), 1);
    }

    #[test]
    fn test_inconsistent_frame_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut dumper = FrameDumper::new(temp_dir.path()).unwrap();

        let result = dumper.save(&Frame::new(3, 5, vec![0; 7]), 0, 0);
        assert!(matches!(result, Err(Error::Export(_))));
    }
}
