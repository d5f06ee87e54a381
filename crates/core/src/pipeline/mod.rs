pub mod cached_label_classifier;
pub mod classify_by_label_use_case;
pub mod classify_video_use_case;
pub mod pipeline_logger;
pub mod sampling_options;
