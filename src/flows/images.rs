use super::MoodGame;
use crate::error::FlowError;
use crate::models::{ModuleType, MoodLabel, RecommendationRequest};
use crate::mood::{AggregationResult, AnswerSet};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// An image card offered in a round
#[derive(Debug, Clone, Copy)]
pub struct ImageChoice {
    pub mood: MoodLabel,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ImageRound {
    pub number: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub images: [ImageChoice; 4],
}

const fn image(mood: MoodLabel, title: &'static str, description: &'static str) -> ImageChoice {
    ImageChoice {
        mood,
        title,
        description,
    }
}

pub static IMAGE_ROUNDS: [ImageRound; 4] = [
    ImageRound {
        number: 1,
        title: "Basic Mood Indicators",
        description: "Choose the image that best represents your primary emotional state",
        images: [
            image(MoodLabel::Happy, "Bright Sunshine", "Energetic and positive"),
            image(MoodLabel::Sad, "Rainy Day", "Melancholic and reflective"),
            image(MoodLabel::Angry, "Storm Lightning", "Intense and powerful"),
            image(MoodLabel::Calm, "Calm Ocean", "Peaceful and serene"),
        ],
    },
    ImageRound {
        number: 2,
        title: "Energy Levels",
        description: "Select the image that matches your current energy level",
        images: [
            image(MoodLabel::Happy, "Burning Fire", "High energy and passion"),
            image(MoodLabel::Sad, "Falling Leaves", "Low energy and quiet"),
            image(MoodLabel::Angry, "Volcanic Eruption", "Explosive energy"),
            image(MoodLabel::Calm, "Mountain Peak", "Steady and grounded"),
        ],
    },
    ImageRound {
        number: 3,
        title: "Social Context",
        description: "Choose the image that reflects your social emotional state",
        images: [
            image(MoodLabel::Happy, "Group Celebration", "Social and connected"),
            image(MoodLabel::Sad, "Lonely Figure", "Isolated and alone"),
            image(MoodLabel::Angry, "Conflict Zone", "Tense and confrontational"),
            image(MoodLabel::Calm, "Peaceful Home", "Comfortable and safe"),
        ],
    },
    ImageRound {
        number: 4,
        title: "Overall Emotional State",
        description: "Select the image that best captures your complete emotional state",
        images: [
            image(MoodLabel::Happy, "Shining Star", "Radiant and joyful"),
            image(MoodLabel::Sad, "Gray Cloud", "Heavy and burdened"),
            image(MoodLabel::Angry, "Explosion", "Volatile and intense"),
            image(MoodLabel::Calm, "Peaceful Dove", "Tranquil and balanced"),
        ],
    },
];

/// Where the selection is after moving forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStep {
    Round(u8),
    Finished(AggregationResult),
}

/// Four rounds of picking the image closest to how you feel
#[derive(Debug, Clone)]
pub struct ImageSelection {
    current_round: u8,
    selections: AnswerSet,
    result: Option<AggregationResult>,
}

impl Default for ImageSelection {
    fn default() -> Self {
        Self {
            current_round: 1,
            selections: AnswerSet::new(),
            result: None,
        }
    }
}

impl ImageSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_rounds(&self) -> u8 {
        IMAGE_ROUNDS.len() as u8
    }

    pub fn current_round(&self) -> &'static ImageRound {
        &IMAGE_ROUNDS[usize::from(self.current_round - 1)]
    }

    pub fn result(&self) -> Option<AggregationResult> {
        self.result
    }

    pub fn progress_percent(&self) -> u8 {
        self.current_round * 100 / self.total_rounds()
    }

    pub fn selection(&self, round: u8) -> Option<MoodLabel> {
        self.selections.get(&round.to_string())
    }

    /// Pick an image in the current round, replacing an earlier pick
    pub fn select(&mut self, image_index: usize) -> Result<MoodLabel, FlowError> {
        let round = self.current_round();
        let choice = round.images.get(image_index).ok_or_else(|| FlowError::NoSuchOption {
            step: format!("round {}", round.number),
            option: image_index,
        })?;

        debug!(round = round.number, mood = %choice.mood, "Image selected");
        self.selections.set(round.number.to_string(), Some(choice.mood));
        Ok(choice.mood)
    }

    pub fn can_go_back(&self) -> bool {
        self.current_round > 1
    }

    pub fn can_advance(&self) -> bool {
        self.selection(self.current_round).is_some()
    }

    pub fn previous(&mut self) -> u8 {
        if self.can_go_back() {
            self.current_round -= 1;
        }
        self.current_round
    }

    pub fn next(&mut self) -> Result<RoundStep, FlowError> {
        if !self.can_advance() {
            return Err(FlowError::Unanswered(format!("round {}", self.current_round)));
        }
        if self.current_round < self.total_rounds() {
            self.current_round += 1;
            return Ok(RoundStep::Round(self.current_round));
        }
        self.finish().map(RoundStep::Finished)
    }

    pub fn finish(&mut self) -> Result<AggregationResult, FlowError> {
        if let Some(missing) = IMAGE_ROUNDS
            .iter()
            .find(|round| self.selection(round.number).is_none())
        {
            return Err(FlowError::Unanswered(format!("round {}", missing.number)));
        }

        let result = self.selections.aggregate();
        info!(
            mood = %result.dominant_mood,
            confidence = result.confidence_percent,
            "Image rounds scored"
        );
        self.result = Some(result);
        Ok(result)
    }

    /// Round number to picked mood, as sent to the backend
    pub fn selections(&self) -> BTreeMap<String, MoodLabel> {
        self.selections
            .iter()
            .filter_map(|(round, mood)| mood.map(|m| (round.to_string(), m)))
            .collect()
    }

    /// Per-round breakdown shown with the result
    pub fn breakdown(&self) -> Vec<(&'static ImageRound, Option<MoodLabel>)> {
        IMAGE_ROUNDS
            .iter()
            .map(|round| (round, self.selection(round.number)))
            .collect()
    }
}

impl MoodGame for ImageSelection {
    fn module_type(&self) -> ModuleType {
        ModuleType::Images
    }

    fn start(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn on_complete(&self) -> Option<MoodLabel> {
        self.result.map(|r| r.dominant_mood)
    }

    fn recommendation_request(&self) -> Option<RecommendationRequest> {
        let result = self.result?;
        let mut request = RecommendationRequest::new(result.dominant_mood, ModuleType::Images);
        request.confidence = Some(result.confidence_percent);
        request.selections = Some(self.selections());
        Some(request)
    }
}
