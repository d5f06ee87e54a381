pub mod ffmpeg_reader;
pub mod image_file_reader;
pub mod reader_factory;
