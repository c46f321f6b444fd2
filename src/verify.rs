// src/verify.rs
// Card verification: mark a 25-cell card against the draw log and ask the
// pattern engine for a verdict.

use serde::Serialize;

use crate::defs::{FREE_SPACE_INDEX, GRID_CELLS, GRID_COLS, Letter, Number};
use crate::drawlog::DrawLog;
use crate::pattern::{self, PatternDef};

/// Result of verifying one card: which cells matched a drawn ball, and
/// whether the game's pattern is satisfied.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub marked: [bool; GRID_CELLS],
    pub is_winner: bool,
}

/// Verify a player's card. Cells are the 25 row-major entered numbers,
/// `None` for unfilled cells. The expected letter comes from the cell's
/// column; a cell is marked when its letter+number label has been drawn.
/// Out-of-range values form labels no ball carries and simply stay
/// unmarked rather than erroring; range enforcement belongs to card entry.
pub fn verify_card(
    card: &[Option<Number>; GRID_CELLS],
    log: &DrawLog,
    def: &PatternDef,
) -> Verification {
    let mut marked = [false; GRID_CELLS];
    marked[FREE_SPACE_INDEX] = true;

    for (index, cell) in card.iter().enumerate() {
        if index == FREE_SPACE_INDEX {
            continue;
        }
        if let Some(number) = cell {
            let letter = Letter::for_column(index % GRID_COLS);
            if log.contains_label(&format!("{letter}{number}")) {
                marked[index] = true;
            }
        }
    }

    Verification {
        is_winner: pattern::evaluate(&marked, def),
        marked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternKind;

    fn log_of(labels: &[&str]) -> DrawLog {
        let mut log = DrawLog::new();
        for label in labels {
            log.push(label.parse().unwrap()).unwrap();
        }
        log
    }

    fn empty_card() -> [Option<Number>; GRID_CELLS] {
        [None; GRID_CELLS]
    }

    #[test]
    fn test_marks_cells_matching_drawn_balls() {
        let log = log_of(&["B7", "N31", "O61"]);

        let mut card = empty_card();
        card[0] = Some(7); // column B -> B7, drawn
        card[1] = Some(16); // column I -> I16, not drawn
        card[2] = Some(31); // column N -> N31, drawn
        card[4] = Some(61); // column O -> O61, drawn

        let result = verify_card(&card, &log, &PatternDef::Named(PatternKind::Blackout));
        assert!(result.marked[0]);
        assert!(!result.marked[1]);
        assert!(result.marked[2]);
        assert!(result.marked[4]);
        assert!(result.marked[FREE_SPACE_INDEX]);
        assert!(!result.is_winner);
    }

    #[test]
    fn test_empty_cells_stay_unmarked() {
        let log = log_of(&["B1", "B2"]);
        let result = verify_card(&empty_card(), &log, &PatternDef::Named(PatternKind::Horizontal));

        for (index, &m) in result.marked.iter().enumerate() {
            assert_eq!(m, index == FREE_SPACE_INDEX);
        }
    }

    #[test]
    fn test_winning_row() {
        // Row 3 is indices 15-19, columns B I N G O.
        let log = log_of(&["B12", "I27", "N40", "G55", "O70"]);

        let mut card = empty_card();
        card[15] = Some(12);
        card[16] = Some(27);
        card[17] = Some(40);
        card[18] = Some(55);
        card[19] = Some(70);

        let result = verify_card(&card, &log, &PatternDef::Named(PatternKind::Horizontal));
        assert!(result.is_winner);
    }

    #[test]
    fn test_center_row_wins_through_free_space() {
        let log = log_of(&["B5", "I20", "G50", "O65"]);

        let mut card = empty_card();
        card[10] = Some(5);
        card[11] = Some(20);
        // index 12 is the free space, left empty
        card[13] = Some(50);
        card[14] = Some(65);

        let result = verify_card(&card, &log, &PatternDef::Named(PatternKind::Horizontal));
        assert!(result.is_winner);
    }

    #[test]
    fn test_out_of_range_value_is_tolerated() {
        let log = log_of(&["B7"]);

        let mut card = empty_card();
        card[0] = Some(20); // "B20" is not a real ball

        let result = verify_card(&card, &log, &PatternDef::Named(PatternKind::Corners));
        assert!(!result.marked[0]);
        assert!(!result.is_winner);
    }

    #[test]
    fn test_corners_verdict() {
        let log = log_of(&["B1", "O61", "B15", "O75"]);

        let mut card = empty_card();
        card[0] = Some(1);
        card[4] = Some(61);
        card[20] = Some(15);
        card[24] = Some(75);

        let result = verify_card(&card, &log, &PatternDef::Named(PatternKind::Corners));
        assert!(result.is_winner);

        // Remove one corner from the card and the verdict flips.
        card[24] = None;
        let result = verify_card(&card, &log, &PatternDef::Named(PatternKind::Corners));
        assert!(!result.is_winner);
    }
}
