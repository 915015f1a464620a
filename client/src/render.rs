use std::fmt::Write;

use common::games::candy::{CellValue, GameEvent, GameSnapshot, LevelTable, Outcome, Selection};

const CANDY_GLYPHS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];

fn cell_glyph(cell: CellValue) -> char {
    match cell {
        CellValue::Empty => '.',
        CellValue::Candy(kind) => CANDY_GLYPHS.get(kind as usize).copied().unwrap_or('?'),
        CellValue::BonusRow => '=',
        CellValue::BonusColumn => '|',
    }
}

pub fn render_snapshot(snapshot: &GameSnapshot) -> String {
    let mut out = String::new();
    let size = snapshot.grid_size;

    let _ = writeln!(
        out,
        "Level {}  Score {}/{}  Time {}s",
        snapshot.level_id, snapshot.score, snapshot.target_score, snapshot.time_left
    );

    out.push_str("   ");
    for col in 0..size {
        let _ = write!(out, "{:>3}", col);
    }
    out.push('\n');

    let selected = snapshot.selection.selected_index();
    for row in 0..size {
        let _ = write!(out, "{:>3}", row);
        for col in 0..size {
            let index = row * size + col;
            let glyph = snapshot.cells.get(index).copied().map(cell_glyph).unwrap_or(' ');
            if selected == Some(index) {
                let _ = write!(out, "[{}]", glyph);
            } else {
                let _ = write!(out, " {} ", glyph);
            }
        }
        out.push('\n');
    }

    if let Some(line) = outcome_line(snapshot) {
        out.push_str(&line);
        out.push('\n');
    }

    out
}

fn outcome_line(snapshot: &GameSnapshot) -> Option<String> {
    let final_score = snapshot.final_score.unwrap_or(snapshot.score);
    match snapshot.outcome {
        Outcome::InProgress => None,
        Outcome::LevelComplete => Some(format!(
            "Level complete! Final score: {}. Type 'next' or 'retry'.",
            final_score
        )),
        Outcome::GameOver => Some(format!(
            "Game over! Final score: {}. Type 'retry'.",
            final_score
        )),
    }
}

/// One short line per event worth telling the player about.
pub fn describe_events(events: &[GameEvent]) -> Vec<String> {
    let mut chain = 0;
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::Swapped {
                first,
                second,
                reverted: true,
            } => Some(format!("No match, swap {} <-> {} undone", first, second)),
            GameEvent::MatchesCleared { cleared, runs, score } => {
                chain += 1;
                let prefix = if chain > 1 {
                    format!("Chain x{}: ", chain)
                } else {
                    String::new()
                };
                Some(format!(
                    "{}{} run(s), {} candies cleared, +{}",
                    prefix,
                    runs,
                    cleared.len(),
                    score
                ))
            }
            GameEvent::BonusResolved { bonus, score, .. } => {
                let line = if *bonus == CellValue::BonusColumn {
                    "column"
                } else {
                    "row"
                };
                Some(format!("Bonus! Whole {} cleared, +{}", line, score))
            }
            _ => None,
        })
        .collect()
}

pub fn should_announce_time(time_left: u32) -> bool {
    time_left > 0 && (time_left <= 5 || time_left % 10 == 0)
}

pub fn render_level_table(levels: &LevelTable) -> String {
    let mut out = String::from("Level  Target  Time  Candies\n");
    for level in levels.iter() {
        let _ = writeln!(
            out,
            "{:>5}  {:>6}  {:>3}s  {:>7}",
            level.id,
            level.target_score,
            level.starting_time_left(),
            level.candy_types
        );
    }
    out
}

pub fn render_selection_hint(selection: Selection) -> Option<String> {
    selection
        .selected_index()
        .map(|index| format!("Selected {}; tap a neighbour to swap", index))
}
