pub mod feature_scorer;
pub mod frame_classifier;
pub mod majority_vote;
pub mod persona;
