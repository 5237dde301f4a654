use super::aggregator::{AggregationResult, MoodAggregator};
use crate::models::{ModuleType, MoodLabel};
use tracing::debug;

/// Moods collected by each module during one full run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoodSession {
    pub quiz: Option<MoodLabel>,
    pub images: Option<MoodLabel>,
    pub puzzle: Option<MoodLabel>,
}

impl MoodSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the mood a module finished with, replacing any earlier value
    pub fn record(&mut self, module: ModuleType, mood: MoodLabel) {
        debug!(module = module.as_str(), %mood, "Recording module mood");
        match module {
            ModuleType::Quiz => self.quiz = Some(mood),
            ModuleType::Images => self.images = Some(mood),
            ModuleType::Puzzle => self.puzzle = Some(mood),
            ModuleType::Combined => {}
        }
    }

    pub fn get(&self, module: ModuleType) -> Option<MoodLabel> {
        match module {
            ModuleType::Quiz => self.quiz,
            ModuleType::Images => self.images,
            ModuleType::Puzzle => self.puzzle,
            ModuleType::Combined => self.combined().map(|r| r.dominant_mood),
        }
    }

    /// Dominant mood across the modules that finished, in quiz, images, puzzle order
    pub fn combined(&self) -> Option<AggregationResult> {
        if self.quiz.is_none() && self.images.is_none() && self.puzzle.is_none() {
            return None;
        }
        Some(MoodAggregator::aggregate([self.quiz, self.images, self.puzzle]))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
