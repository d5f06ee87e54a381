use std::path::Path;

use crate::shared::constants::{IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;
use crate::video::infrastructure::ffmpeg_reader::FfmpegReader;
use crate::video::infrastructure::image_file_reader::ImageFileReader;

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn is_image(path: &Path) -> bool {
    has_extension(path, IMAGE_EXTENSIONS)
}

pub fn is_video(path: &Path) -> bool {
    has_extension(path, VIDEO_EXTENSIONS)
}

/// Still images get [`ImageFileReader`]; anything else goes to ffmpeg.
pub fn create_reader(path: &Path) -> Box<dyn VideoReader> {
    if is_image(path) {
        Box::new(ImageFileReader::new())
    } else {
        Box::new(FfmpegReader::new())
    }
}

/// Reader that picks the concrete decoder per `open` call.
///
/// Lets one pipeline instance serve a mix of videos and still images.
#[derive(Default)]
pub struct AnySourceReader {
    active: Option<Box<dyn VideoReader>>,
}

impl AnySourceReader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VideoReader for AnySourceReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        self.close();
        let mut reader = create_reader(path);
        let metadata = reader.open(path)?;
        self.active = Some(reader);
        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        match self.active.as_mut() {
            Some(reader) => reader.frames(),
            None => Box::new(std::iter::once(Err("AnySourceReader: not opened".into()))),
        }
    }

    fn close(&mut self) {
        if let Some(mut reader) = self.active.take() {
            reader.close();
        }
    }
}
