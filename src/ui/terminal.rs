use crate::flows::{
    ClickOutcome, ImageSelection, MoodGame, PuzzleBoard, PuzzleState, QuizGame, QuizStep, RoundStep,
    BOARD_WIDTH,
};
use crate::models::ModuleType;
use crate::mood::{AggregationResult, MoodSession};
use anyhow::{bail, Result};
use rand::Rng;
use std::io::{BufRead, Write};
use std::time::Instant;

/// Reads one trimmed line; `None` once input is exhausted
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn expect_line<R: BufRead>(input: &mut R) -> Result<String> {
    match read_line(input)? {
        Some(line) => Ok(line),
        None => bail!("Input ended before the activity was finished"),
    }
}

/// 1-based menu pick to index
fn parse_choice(line: &str, count: usize) -> Option<usize> {
    line.parse::<usize>()
        .ok()
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1)
}

/// `y` to accept; anything else, including end of input, declines
fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> Result<bool> {
    write!(out, "{question} [y/N]: ")?;
    out.flush()?;
    Ok(read_line(input)?.is_some_and(|line| line.eq_ignore_ascii_case("y")))
}

/// "row col" on the 4x4 board, both 1-based, to a tile index
fn parse_position(line: &str) -> Option<usize> {
    let mut parts = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty());
    let row = parse_choice(parts.next()?, BOARD_WIDTH)?;
    let col = parse_choice(parts.next()?, BOARD_WIDTH)?;
    if parts.next().is_some() {
        return None;
    }
    Some(row * BOARD_WIDTH + col)
}

/// Ask every quiz question; `b` goes back one question
pub fn run_quiz<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<QuizGame> {
    let mut quiz = QuizGame::new();
    quiz.start();

    loop {
        let question = quiz.current_question();
        writeln!(
            out,
            "\nQuestion {} of {} ({}%)",
            quiz.current_index() + 1,
            quiz.questions().len(),
            quiz.progress_percent()
        )?;
        writeln!(out, "{}", question.prompt)?;
        let picked = quiz.answers().get(question.id);
        for (i, option) in question.options.iter().enumerate() {
            let marker = if picked == Some(option.mood) { "*" } else { " " };
            writeln!(out, " {marker}{}. {}", i + 1, option.text)?;
        }
        write!(
            out,
            "Choose 1-4{}, r to restart: ",
            if quiz.can_go_back() { ", b to go back" } else { "" }
        )?;
        out.flush()?;

        let line = expect_line(input)?;
        if line.eq_ignore_ascii_case("b") {
            quiz.previous();
            continue;
        }
        if line.eq_ignore_ascii_case("r") {
            quiz.reset();
            quiz.start();
            continue;
        }
        let Some(index) = parse_choice(&line, question.options.len()) else {
            writeln!(out, "Please choose an option between 1 and 4")?;
            continue;
        };
        quiz.select(index)?;

        match quiz.next()? {
            QuizStep::Question(_) => {}
            QuizStep::Finished(result) => {
                print_result(out, &result)?;
                return Ok(quiz);
            }
        }
    }
}

/// Walk the four image rounds
pub fn run_images<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<ImageSelection> {
    let mut selection = ImageSelection::new();
    selection.start();

    loop {
        let round = selection.current_round();
        writeln!(
            out,
            "\nRound {} of {}: {} ({}%)",
            round.number,
            selection.total_rounds(),
            round.title,
            selection.progress_percent()
        )?;
        writeln!(out, "{}", round.description)?;
        let picked = selection.selection(round.number);
        for (i, image) in round.images.iter().enumerate() {
            let marker = if picked == Some(image.mood) { "*" } else { " " };
            writeln!(out, " {marker}{}. {} - {}", i + 1, image.title, image.description)?;
        }
        write!(
            out,
            "Choose 1-4{}, r to restart: ",
            if selection.can_go_back() { ", b to go back" } else { "" }
        )?;
        out.flush()?;

        let line = expect_line(input)?;
        if line.eq_ignore_ascii_case("b") {
            selection.previous();
            continue;
        }
        if line.eq_ignore_ascii_case("r") {
            selection.reset();
            selection.start();
            continue;
        }
        let Some(index) = parse_choice(&line, round.images.len()) else {
            writeln!(out, "Please choose an image between 1 and 4")?;
            continue;
        };
        let mood = selection.select(index)?;
        writeln!(out, "Round {}: {}", round.number, mood)?;

        match selection.next()? {
            RoundStep::Round(_) => {}
            RoundStep::Finished(result) => {
                for (round, mood) in selection.breakdown() {
                    if let Some(mood) = mood {
                        writeln!(out, "  Round {}: {} -> {}", round.number, round.title, mood)?;
                    }
                }
                print_result(out, &result)?;
                return Ok(selection);
            }
        }
    }
}

/// Board with row and column numbers; a wrongly clicked tile shows in brackets
fn print_board<W: Write>(out: &mut W, board: &PuzzleBoard, now: Instant) -> Result<()> {
    let flashing = board.flashing_tile(now);
    write!(out, "   ")?;
    for col in 1..=BOARD_WIDTH {
        write!(out, " {col:>2} ")?;
    }
    writeln!(out)?;

    for (row, tiles) in board.tiles().chunks(BOARD_WIDTH).enumerate() {
        write!(out, "{:>2} ", row + 1)?;
        for (col, tile) in tiles.iter().enumerate() {
            let cell = if tile.cleared {
                "  . ".to_string()
            } else if flashing == Some(row * BOARD_WIDTH + col) {
                format!("[{:>2}]", tile.value)
            } else {
                format!(" {:>2} ", tile.value)
            };
            write!(out, "{cell}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Play the number puzzle against the wall clock, offering another game at the end
pub fn run_puzzle<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<PuzzleBoard> {
    run_puzzle_with(input, out, &mut rand::thread_rng())
}

pub fn run_puzzle_with<R, W, G>(input: &mut R, out: &mut W, rng: &mut G) -> Result<PuzzleBoard>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let mut board = PuzzleBoard::new();
    board.start_at(rng, Instant::now());

    loop {
        play_puzzle(input, out, &mut board)?;
        if !confirm(input, out, "Play again?")? {
            return Ok(board);
        }
        board.play_again_at(rng, Instant::now());
    }
}

/// One game on a started board; `s` skips
fn play_puzzle<R: BufRead, W: Write>(input: &mut R, out: &mut W, board: &mut PuzzleBoard) -> Result<()> {
    writeln!(out, "\nClick the numbers 1 to 16 in order as fast as you can.")?;
    writeln!(out, "Pick a tile by its row and column, e.g. 2 3.")?;

    while board.state() == PuzzleState::InProgress {
        let now = Instant::now();
        board.sync(now);
        board.clear_expired_flash(now);

        writeln!(out)?;
        print_board(out, board, now)?;
        write!(
            out,
            "Time: {}s  Mistakes: {}  Next: {} (row col, s to skip): ",
            board.run().elapsed_seconds,
            board.run().mistakes,
            board.next_expected()
        )?;
        out.flush()?;

        let line = expect_line(input)?;
        if line.eq_ignore_ascii_case("s") {
            board.skip();
            break;
        }
        let Some(index) = parse_position(&line) else {
            writeln!(out, "Type a row and a column between 1 and {BOARD_WIDTH}")?;
            continue;
        };

        let now = Instant::now();
        board.sync(now);
        match board.click(index, now)? {
            ClickOutcome::Wrong { expected, .. } => {
                writeln!(out, "Wrong tile! Look for {expected}.")?;
            }
            ClickOutcome::Completed(mood) => {
                writeln!(out, "\nPuzzle complete! Mood: {mood}")?;
            }
            ClickOutcome::Ignored => writeln!(out, "That tile is already cleared")?,
            ClickOutcome::Correct { .. } => {}
        }
    }

    if board.was_skipped() {
        writeln!(out, "Puzzle skipped.")?;
    } else if let Some(message) = board.completion_message() {
        writeln!(out, "{message}")?;
    }
    let run = board.run();
    writeln!(
        out,
        "Time: {}s | Mistakes: {} | Avg per tile: {:.1}s",
        run.elapsed_seconds,
        run.mistakes,
        run.display_average_seconds()
    )?;
    Ok(())
}

/// Quiz, image rounds and puzzle back to back, each mood kept in the session
pub fn run_combined<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<MoodSession> {
    run_combined_with(input, out, &mut rand::thread_rng())
}

pub fn run_combined_with<R, W, G>(input: &mut R, out: &mut W, rng: &mut G) -> Result<MoodSession>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let mut session = MoodSession::new();
    loop {
        let games: [Box<dyn MoodGame>; 3] = [
            Box::new(run_quiz(input, out)?),
            Box::new(run_images(input, out)?),
            Box::new(run_puzzle_with(input, out, rng)?),
        ];
        for game in &games {
            if let Some(mood) = game.on_complete() {
                session.record(game.module_type(), mood);
            }
        }
        print_session(out, &session)?;

        if !confirm(input, out, "Run all three again?")? {
            return Ok(session);
        }
        session.reset();
    }
}

/// Mood of every activity, `N/A` for those that did not finish
pub fn print_session<W: Write>(out: &mut W, session: &MoodSession) -> Result<()> {
    writeln!(out, "\nYour moods:")?;
    for (name, module) in [
        ("Quiz", ModuleType::Quiz),
        ("Images", ModuleType::Images),
        ("Puzzle", ModuleType::Puzzle),
    ] {
        match session.get(module) {
            Some(mood) => writeln!(out, "  {name}: {mood}")?,
            None => writeln!(out, "  {name}: N/A")?,
        }
    }
    Ok(())
}

fn print_result<W: Write>(out: &mut W, result: &AggregationResult) -> Result<()> {
    writeln!(
        out,
        "\nYour mood: {} ({}% confidence)",
        result.dominant_mood, result.confidence_percent
    )?;
    Ok(())
}
