use crate::models::MoodLabel;

/// Number of tiles on the puzzle board
pub const BOARD_TILES: u32 = 16;

/// Telemetry of one puzzle game
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PuzzleRun {
    pub elapsed_seconds: u32,
    pub mistakes: u32,
    pub per_tile_ms: Vec<u64>, // ms since start, one entry per correct click
}

impl PuzzleRun {
    pub fn new(elapsed_seconds: u32, mistakes: u32) -> Self {
        Self {
            elapsed_seconds,
            mistakes,
            per_tile_ms: Vec::new(),
        }
    }

    pub fn mistake_rate(&self) -> f64 {
        self.mistakes as f64 / BOARD_TILES as f64
    }

    pub fn time_per_tile(&self) -> f64 {
        self.elapsed_seconds as f64 / BOARD_TILES as f64
    }

    /// Mean of the per-tile timestamps in seconds, 0 when nothing was cleared
    pub fn average_seconds_per_tile(&self) -> f64 {
        if self.per_tile_ms.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.per_tile_ms.iter().sum();
        sum as f64 / self.per_tile_ms.len() as f64 / 1000.0
    }

    /// Average rounded to one decimal for display
    pub fn display_average_seconds(&self) -> f64 {
        (self.average_seconds_per_tile() * 10.0).round() / 10.0
    }
}

/// Thresholds of the performance rules, all relative to a 16-tile board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierThresholds {
    pub frustrated_mistake_rate: f64,
    pub slow_seconds_per_tile: f64,
    pub fast_seconds_per_tile: f64,
    pub accurate_mistake_rate: f64,
    pub irritated_mistake_rate: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            frustrated_mistake_rate: 0.3,
            slow_seconds_per_tile: 3.0,
            fast_seconds_per_tile: 1.5,
            accurate_mistake_rate: 0.1,
            irritated_mistake_rate: 0.2,
        }
    }
}

/// Maps puzzle performance to a mood with ordered threshold rules
pub struct PerformanceClassifier;

impl PerformanceClassifier {
    pub fn classify(run: &PuzzleRun) -> MoodLabel {
        Self::classify_with(run, &ClassifierThresholds::default())
    }

    /// First matching rule wins
    pub fn classify_with(run: &PuzzleRun, thresholds: &ClassifierThresholds) -> MoodLabel {
        let mistake_rate = run.mistake_rate();
        let time_per_tile = run.time_per_tile();

        if mistake_rate > thresholds.frustrated_mistake_rate {
            MoodLabel::Angry
        } else if time_per_tile > thresholds.slow_seconds_per_tile {
            MoodLabel::Depressed
        } else if time_per_tile < thresholds.fast_seconds_per_tile
            && mistake_rate < thresholds.accurate_mistake_rate
        {
            MoodLabel::Happy
        } else if mistake_rate > thresholds.irritated_mistake_rate {
            // only rates in (0.2, 0.3] get here
            MoodLabel::Angry
        } else {
            MoodLabel::Sad
        }
    }

    /// Outcome of skipping the puzzle, whatever was played so far
    pub fn skipped() -> MoodLabel {
        MoodLabel::Neutral
    }

    pub fn completion_message(mood: MoodLabel) -> &'static str {
        match mood {
            MoodLabel::Happy => {
                "Excellent performance! Your quick and accurate responses suggest you're in a positive, energetic mood."
            }
            MoodLabel::Sad => {
                "You took your time with the puzzle. Your measured approach suggests a contemplative, perhaps melancholic state."
            }
            MoodLabel::Angry => {
                "Your responses showed some frustration. This might indicate you're feeling stressed or irritated."
            }
            MoodLabel::Depressed => {
                "You completed the puzzle at a slower pace. This could reflect low energy or motivation levels."
            }
            _ => "Your behavioral patterns have been analyzed.",
        }
    }
}
