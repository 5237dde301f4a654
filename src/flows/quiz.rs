use super::MoodGame;
use crate::error::FlowError;
use crate::models::{ModuleType, MoodLabel, RecommendationRequest};
use crate::mood::{AggregationResult, AnswerSet};
use tracing::{debug, info};

/// One answer choice and the mood it signals
#[derive(Debug, Clone, Copy)]
pub struct QuizOption {
    pub text: &'static str,
    pub mood: MoodLabel,
}

#[derive(Debug, Clone, Copy)]
pub struct QuizQuestion {
    pub id: &'static str,
    pub prompt: &'static str,
    pub options: [QuizOption; 4],
}

const fn option(text: &'static str, mood: MoodLabel) -> QuizOption {
    QuizOption { text, mood }
}

pub static QUIZ_QUESTIONS: [QuizQuestion; 5] = [
    QuizQuestion {
        id: "question1",
        prompt: "How would you describe your energy right now?",
        options: [
            option("Buzzing, ready for anything", MoodLabel::Happy),
            option("Drained and heavy", MoodLabel::Sad),
            option("Restless and tense", MoodLabel::Angry),
            option("Steady and relaxed", MoodLabel::Calm),
        ],
    },
    QuizQuestion {
        id: "question2",
        prompt: "Which weather matches your day so far?",
        options: [
            option("Clear skies and sunshine", MoodLabel::Happy),
            option("Grey drizzle", MoodLabel::Sad),
            option("A thunderstorm", MoodLabel::Angry),
            option("A still, mild evening", MoodLabel::Calm),
        ],
    },
    QuizQuestion {
        id: "question3",
        prompt: "A friend cancels plans at the last minute. You feel...",
        options: [
            option("Fine, more time for something fun", MoodLabel::Happy),
            option("Let down and a bit lonely", MoodLabel::Sad),
            option("Annoyed, they always do this", MoodLabel::Angry),
            option("Unbothered, a quiet night sounds good", MoodLabel::Calm),
        ],
    },
    QuizQuestion {
        id: "question4",
        prompt: "What would you most like to do in the next hour?",
        options: [
            option("Dance or sing along to something loud", MoodLabel::Happy),
            option("Curl up and be left alone", MoodLabel::Sad),
            option("Hit the gym and burn off steam", MoodLabel::Angry),
            option("Read, stretch or take a slow walk", MoodLabel::Calm),
        ],
    },
    QuizQuestion {
        id: "question5",
        prompt: "Pick the phrase closest to your thoughts today.",
        options: [
            option("Things are going my way", MoodLabel::Happy),
            option("I miss how things used to be", MoodLabel::Sad),
            option("Nothing is going right", MoodLabel::Angry),
            option("Whatever happens, I'll be okay", MoodLabel::Calm),
        ],
    },
];

/// Where the quiz is after moving forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    Question(usize),
    Finished(AggregationResult),
}

/// Multiple-choice quiz, one question shown at a time
#[derive(Debug, Clone, Default)]
pub struct QuizGame {
    current: usize,
    answers: AnswerSet,
    result: Option<AggregationResult>,
}

impl QuizGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn questions(&self) -> &'static [QuizQuestion] {
        &QUIZ_QUESTIONS
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &'static QuizQuestion {
        &QUIZ_QUESTIONS[self.current]
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn result(&self) -> Option<AggregationResult> {
        self.result
    }

    /// Percent of the way through the questions, counting the one shown
    pub fn progress_percent(&self) -> u8 {
        ((self.current + 1) * 100 / QUIZ_QUESTIONS.len()) as u8
    }

    /// Pick an option on the question currently shown
    pub fn select(&mut self, option_index: usize) -> Result<MoodLabel, FlowError> {
        self.select_for(self.current, option_index)
    }

    pub fn select_for(&mut self, question_index: usize, option_index: usize) -> Result<MoodLabel, FlowError> {
        let question = QUIZ_QUESTIONS
            .get(question_index)
            .ok_or_else(|| FlowError::NoSuchOption {
                step: "quiz".to_string(),
                option: question_index,
            })?;
        let choice = question.options.get(option_index).ok_or_else(|| FlowError::NoSuchOption {
            step: question.id.to_string(),
            option: option_index,
        })?;

        debug!(question = question.id, mood = %choice.mood, "Quiz answer selected");
        self.answers.set(question.id, Some(choice.mood));
        Ok(choice.mood)
    }

    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    pub fn can_advance(&self) -> bool {
        self.answers.get(self.current_question().id).is_some()
    }

    pub fn previous(&mut self) -> usize {
        self.current = self.current.saturating_sub(1);
        self.current
    }

    /// Move on; past the last question the answers are scored
    pub fn next(&mut self) -> Result<QuizStep, FlowError> {
        if !self.can_advance() {
            return Err(FlowError::Unanswered(self.current_question().id.to_string()));
        }
        if self.current + 1 < QUIZ_QUESTIONS.len() {
            self.current += 1;
            return Ok(QuizStep::Question(self.current));
        }
        self.finish().map(QuizStep::Finished)
    }

    /// Score the quiz once every question is answered
    pub fn finish(&mut self) -> Result<AggregationResult, FlowError> {
        if let Some(missing) = QUIZ_QUESTIONS
            .iter()
            .find(|q| self.answers.get(q.id).is_none())
        {
            return Err(FlowError::Unanswered(missing.id.to_string()));
        }

        let result = self.answers.aggregate();
        info!(
            mood = %result.dominant_mood,
            confidence = result.confidence_percent,
            "Quiz scored"
        );
        self.result = Some(result);
        Ok(result)
    }
}

impl MoodGame for QuizGame {
    fn module_type(&self) -> ModuleType {
        ModuleType::Quiz
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
        let mut request = RecommendationRequest::new(result.dominant_mood, ModuleType::Quiz);
        request.confidence = Some(result.confidence_percent);
        Some(request)
    }
}
