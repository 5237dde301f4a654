use super::MoodGame;
use crate::error::FlowError;
use crate::models::{ModuleType, MoodLabel, PerformancePayload, RecommendationRequest};
use crate::mood::{PerformanceClassifier, PuzzleRun, BOARD_TILES};
use rand::Rng;
use rand::seq::SliceRandom;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const BOARD_SIZE: usize = 16;
pub const BOARD_WIDTH: usize = 4;

/// How long a wrongly clicked tile stays flagged
pub const WRONG_FLASH: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleState {
    NotStarted,
    InProgress,
    Completed,
}

/// What a tile click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Correct { value: u8, progress_percent: u8 },
    Wrong { value: u8, expected: u8 },
    Completed(MoodLabel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub value: u8,
    pub cleared: bool,
}

/// 4x4 board where the numbers 1 to 16 are clicked in order
#[derive(Debug, Clone)]
pub struct PuzzleBoard {
    state: PuzzleState,
    tiles: Vec<Tile>,
    next_expected: u8,
    run: PuzzleRun,
    started_at: Option<Instant>,
    wrong_flash: Option<(usize, Instant)>, // tile index and when the flag clears
    mood: Option<MoodLabel>,
    skipped: bool,
}

impl Default for PuzzleBoard {
    fn default() -> Self {
        Self {
            state: PuzzleState::NotStarted,
            tiles: Vec::new(),
            next_expected: 1,
            run: PuzzleRun::default(),
            started_at: None,
            wrong_flash: None,
            mood: None,
            skipped: false,
        }
    }
}

impl PuzzleBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniform permutation of 1..=16
    pub fn shuffled_values<R: Rng + ?Sized>(rng: &mut R) -> Vec<u8> {
        let mut values: Vec<u8> = (1..=BOARD_SIZE as u8).collect();
        values.shuffle(rng);
        values
    }

    pub fn start_at<R: Rng + ?Sized>(&mut self, rng: &mut R, now: Instant) {
        *self = Self::default();
        self.tiles = Self::shuffled_values(rng)
            .into_iter()
            .map(|value| Tile { value, cleared: false })
            .collect();
        self.state = PuzzleState::InProgress;
        self.started_at = Some(now);
        debug!(tiles = ?self.values(), "Puzzle started");
    }

    pub fn state(&self) -> PuzzleState {
        self.state
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn values(&self) -> Vec<u8> {
        self.tiles.iter().map(|t| t.value).collect()
    }

    pub fn next_expected(&self) -> u8 {
        self.next_expected
    }

    pub fn run(&self) -> &PuzzleRun {
        &self.run
    }

    pub fn was_skipped(&self) -> bool {
        self.skipped
    }

    pub fn progress_percent(&self) -> u8 {
        let cleared = u32::from(self.next_expected - 1);
        ((cleared * 200 + BOARD_TILES) / (2 * BOARD_TILES)) as u8
    }

    /// Add one elapsed second while the game runs
    pub fn tick(&mut self) {
        if self.state == PuzzleState::InProgress {
            self.run.elapsed_seconds += 1;
        }
    }

    /// Catch the second counter up with the wall clock
    pub fn sync(&mut self, now: Instant) {
        let Some(started) = self.started_at else {
            return;
        };
        let whole_seconds = now.saturating_duration_since(started).as_secs() as u32;
        while self.state == PuzzleState::InProgress && self.run.elapsed_seconds < whole_seconds {
            self.tick();
        }
    }

    pub fn click(&mut self, index: usize, now: Instant) -> Result<ClickOutcome, FlowError> {
        if index >= self.tiles.len() && self.state == PuzzleState::InProgress {
            return Err(FlowError::NoSuchTile(index));
        }
        if self.state != PuzzleState::InProgress || self.tiles[index].cleared {
            return Ok(ClickOutcome::Ignored);
        }

        self.clear_expired_flash(now);
        let value = self.tiles[index].value;

        if value != self.next_expected {
            self.run.mistakes += 1;
            self.wrong_flash = Some((index, now + WRONG_FLASH));
            debug!(value, expected = self.next_expected, "Wrong tile");
            return Ok(ClickOutcome::Wrong {
                value,
                expected: self.next_expected,
            });
        }

        let since_start = self
            .started_at
            .map(|started| now.saturating_duration_since(started).as_millis() as u64)
            .unwrap_or_default();
        self.run.per_tile_ms.push(since_start);
        self.tiles[index].cleared = true;
        self.next_expected += 1;

        if usize::from(self.next_expected) > BOARD_SIZE {
            return Ok(ClickOutcome::Completed(self.complete()));
        }
        Ok(ClickOutcome::Correct {
            value,
            progress_percent: self.progress_percent(),
        })
    }

    /// Click whichever uncleared tile shows `value`
    #[cfg(test)]
    pub fn click_value(&mut self, value: u8, now: Instant) -> Result<ClickOutcome, FlowError> {
        match self.tiles.iter().position(|t| t.value == value && !t.cleared) {
            Some(index) => self.click(index, now),
            None => Ok(ClickOutcome::Ignored),
        }
    }

    /// Tile currently flagged as a wrong click
    pub fn flashing_tile(&self, now: Instant) -> Option<usize> {
        self.wrong_flash
            .filter(|(_, until)| now < *until)
            .map(|(index, _)| index)
    }

    pub fn clear_expired_flash(&mut self, now: Instant) {
        if matches!(self.wrong_flash, Some((_, until)) if now >= until) {
            self.wrong_flash = None;
        }
    }

    fn complete(&mut self) -> MoodLabel {
        let mood = PerformanceClassifier::classify(&self.run);
        self.finish_with(mood);
        info!(
            %mood,
            time = self.run.elapsed_seconds,
            mistakes = self.run.mistakes,
            "Puzzle completed"
        );
        mood
    }

    fn finish_with(&mut self, mood: MoodLabel) {
        self.state = PuzzleState::Completed;
        self.wrong_flash = None;
        self.mood = Some(mood);
    }

    /// Give up on the puzzle; the mood becomes Neutral whatever was played.
    /// A board that already finished keeps its mood.
    pub fn skip(&mut self) -> MoodLabel {
        if let (PuzzleState::Completed, Some(mood)) = (self.state, self.mood) {
            return mood;
        }
        let mood = PerformanceClassifier::skipped();
        self.skipped = true;
        self.finish_with(mood);
        info!("Puzzle skipped");
        mood
    }

    pub fn completion_message(&self) -> Option<&'static str> {
        self.mood.map(PerformanceClassifier::completion_message)
    }

    pub fn performance(&self) -> PerformancePayload {
        PerformancePayload {
            time: self.run.elapsed_seconds,
            mistakes: self.run.mistakes,
            avg_time_per_tile: self.run.average_seconds_per_tile(),
        }
    }

    /// Reset and immediately start a new game
    pub fn play_again_at<R: Rng + ?Sized>(&mut self, rng: &mut R, now: Instant) {
        self.reset();
        self.start_at(rng, now);
    }
}

impl MoodGame for PuzzleBoard {
    fn module_type(&self) -> ModuleType {
        ModuleType::Puzzle
    }

    fn start(&mut self) {
        self.start_at(&mut rand::thread_rng(), Instant::now());
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn on_complete(&self) -> Option<MoodLabel> {
        match self.state {
            PuzzleState::Completed => self.mood,
            _ => None,
        }
    }

    fn recommendation_request(&self) -> Option<RecommendationRequest> {
        let mood = self.on_complete()?;
        let mut request = RecommendationRequest::new(mood, ModuleType::Puzzle);
        request.performance = Some(self.performance());
        Some(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn started_board(seed: u64) -> (PuzzleBoard, Instant) {
        let mut board = PuzzleBoard::new();
        let now = Instant::now();
        board.start_at(&mut StdRng::seed_from_u64(seed), now);
        (board, now)
    }

    /// Clear every tile in order, one per `step`, after `mistakes` wrong clicks
    fn solve(board: &mut PuzzleBoard, start: Instant, step: Duration, mistakes: u32) -> ClickOutcome {
        let mut now = start;
        for _ in 0..mistakes {
            let wrong = board.values().iter().position(|&v| v != board.next_expected()).unwrap();
            board.click(wrong, now).unwrap();
        }
        let mut outcome = ClickOutcome::Ignored;
        for value in 1..=16u8 {
            now += step;
            board.sync(now);
            outcome = board.click_value(value, now).unwrap();
        }
        outcome
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        for seed in 0..50 {
            let mut values = PuzzleBoard::shuffled_values(&mut StdRng::seed_from_u64(seed));
            values.sort_unstable();
            assert_eq!(values, (1..=16).collect::<Vec<u8>>());
        }
    }

    #[test]
    fn test_clicks_before_start_are_ignored() {
        let mut board = PuzzleBoard::new();

        assert_eq!(board.state(), PuzzleState::NotStarted);
        assert_eq!(board.click(0, Instant::now()), Ok(ClickOutcome::Ignored));
        assert_eq!(board.run().mistakes, 0);
    }

    #[test]
    fn test_correct_click_clears_tile_and_records_time() {
        let (mut board, start) = started_board(7);
        let index = board.values().iter().position(|&v| v == 1).unwrap();

        let outcome = board.click(index, start + Duration::from_millis(1200)).unwrap();

        assert_eq!(outcome, ClickOutcome::Correct { value: 1, progress_percent: 6 });
        assert!(board.tiles()[index].cleared);
        assert_eq!(board.next_expected(), 2);
        assert_eq!(board.run().per_tile_ms, vec![1200]);
        // a cleared tile can't be clicked again
        assert_eq!(board.click(index, start).unwrap(), ClickOutcome::Ignored);
    }

    #[test]
    fn test_wrong_click_counts_and_flashes() {
        let (mut board, start) = started_board(3);
        let index = board.values().iter().position(|&v| v == 9).unwrap();

        let outcome = board.click(index, start).unwrap();

        assert_eq!(outcome, ClickOutcome::Wrong { value: 9, expected: 1 });
        assert_eq!(board.run().mistakes, 1);
        assert_eq!(board.flashing_tile(start + Duration::from_millis(100)), Some(index));
        assert_eq!(board.flashing_tile(start + WRONG_FLASH), None);

        board.clear_expired_flash(start + Duration::from_secs(1));
        assert_eq!(board.flashing_tile(start), None);
    }

    #[test]
    fn test_fast_clean_game_completes_happy() {
        let (mut board, start) = started_board(11);

        let outcome = solve(&mut board, start, Duration::from_secs(1), 1);

        assert_eq!(outcome, ClickOutcome::Completed(MoodLabel::Happy));
        assert_eq!(board.state(), PuzzleState::Completed);
        assert_eq!(board.run().elapsed_seconds, 16);
        assert_eq!(board.run().per_tile_ms.len(), 16);
        assert_eq!(board.on_complete(), Some(MoodLabel::Happy));
    }

    #[test]
    fn test_slow_game_completes_depressed() {
        let (mut board, start) = started_board(5);

        let outcome = solve(&mut board, start, Duration::from_millis(3750), 0);

        assert_eq!(outcome, ClickOutcome::Completed(MoodLabel::Depressed));
        assert_eq!(board.run().elapsed_seconds, 60);
    }

    #[test]
    fn test_timer_stops_after_completion() {
        let (mut board, start) = started_board(2);
        solve(&mut board, start, Duration::from_secs(2), 2);
        let elapsed = board.run().elapsed_seconds;

        board.tick();
        board.sync(start + Duration::from_secs(600));

        assert_eq!(board.run().elapsed_seconds, elapsed);
        assert_eq!(board.on_complete(), Some(MoodLabel::Sad));
    }

    #[test]
    fn test_skip_is_neutral_even_mid_game() {
        let (mut board, start) = started_board(9);
        board.click_value(1, start).unwrap();
        board.click_value(5, start).unwrap();

        assert_eq!(board.skip(), MoodLabel::Neutral);
        assert_eq!(board.state(), PuzzleState::Completed);
        assert_eq!(board.on_complete(), Some(MoodLabel::Neutral));
        assert!(board.was_skipped());
        assert_eq!(board.click_value(2, start).unwrap(), ClickOutcome::Ignored);
    }

    #[test]
    fn test_reset_returns_to_not_started() {
        let (mut board, start) = started_board(1);
        board.click_value(4, start).unwrap();
        board.reset();

        assert_eq!(board.state(), PuzzleState::NotStarted);
        assert_eq!(board.run().mistakes, 0);
        assert_eq!(board.next_expected(), 1);
        assert!(board.on_complete().is_none());
    }

    #[test]
    fn test_out_of_range_tile_is_an_error() {
        let (mut board, start) = started_board(4);

        assert_eq!(board.click(16, start), Err(FlowError::NoSuchTile(16)));
    }

    #[test]
    fn test_cleared_value_is_ignored() {
        let (mut board, start) = started_board(4);

        board.click_value(1, start).unwrap();
        assert_eq!(board.click_value(1, start), Ok(ClickOutcome::Ignored));
        assert_eq!(board.run().mistakes, 0);
    }

    #[test]
    fn test_skip_after_completion_keeps_mood() {
        let (mut board, start) = started_board(13);
        solve(&mut board, start, Duration::from_secs(4), 0);
        assert_eq!(board.on_complete(), Some(MoodLabel::Depressed));

        assert_eq!(board.skip(), MoodLabel::Depressed);
        assert_eq!(board.on_complete(), Some(MoodLabel::Depressed));
        assert!(!board.was_skipped());
    }

    #[test]
    fn test_request_carries_performance() {
        let (mut board, start) = started_board(8);
        solve(&mut board, start, Duration::from_secs(1), 0);

        let request = board.recommendation_request().unwrap();
        assert_eq!(request.module_type, ModuleType::Puzzle);
        let performance = request.performance.unwrap();
        assert_eq!(performance.time, 16);
        assert_eq!(performance.mistakes, 0);
        // clicks land at 1s, 2s, ... 16s
        assert!((performance.avg_time_per_tile - 8.5).abs() < 1e-9);
    }

    #[test]
    fn test_tiles_mark_cleared_values() {
        let (mut board, start) = started_board(6);
        board.click_value(1, start).unwrap();

        let cleared: Vec<u8> = board.tiles().iter().filter(|t| t.cleared).map(|t| t.value).collect();
        assert_eq!(cleared, vec![1]);
    }

    #[test]
    fn test_play_again_starts_fresh_game() {
        let (mut board, start) = started_board(10);
        board.skip();
        board.play_again_at(&mut StdRng::seed_from_u64(12), start);

        assert_eq!(board.state(), PuzzleState::InProgress);
        assert!(!board.was_skipped());
    }
}
