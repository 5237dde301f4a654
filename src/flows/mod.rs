pub mod images;
pub mod puzzle;
pub mod quiz;

pub use images::*;
pub use puzzle::*;
pub use quiz::*;

use crate::models::{ModuleType, MoodLabel, RecommendationRequest};

/// A mood-eliciting mini experience
pub trait MoodGame {
    fn module_type(&self) -> ModuleType;

    /// Begin a fresh run, discarding anything collected before
    fn start(&mut self);

    /// Return to the not-started state
    fn reset(&mut self);

    /// Mood the run finished with, `None` while it is still going
    fn on_complete(&self) -> Option<MoodLabel>;

    /// Request body describing the finished run
    fn recommendation_request(&self) -> Option<RecommendationRequest>;
}
