// src/pattern.rs
// Winning-pattern definitions and the evaluation engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defs::{FREE_SPACE_INDEX, GRID_CELLS, GRID_COLS};

/// The built-in pattern set every game can pick from without a stored
/// pattern document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Horizontal,
    Vertical,
    Diagonal,
    Corners,
    Blackout,
    XPattern,
}

impl PatternKind {
    pub const ALL: [PatternKind; 6] = [
        PatternKind::Horizontal,
        PatternKind::Vertical,
        PatternKind::Diagonal,
        PatternKind::Corners,
        PatternKind::XPattern,
        PatternKind::Blackout,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "horizontal" => Some(PatternKind::Horizontal),
            "vertical" => Some(PatternKind::Vertical),
            "diagonal" => Some(PatternKind::Diagonal),
            "corners" => Some(PatternKind::Corners),
            "blackout" => Some(PatternKind::Blackout),
            "x_pattern" => Some(PatternKind::XPattern),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            PatternKind::Horizontal => "horizontal",
            PatternKind::Vertical => "vertical",
            PatternKind::Diagonal => "diagonal",
            PatternKind::Corners => "corners",
            PatternKind::Blackout => "blackout",
            PatternKind::XPattern => "x_pattern",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PatternKind::Horizontal => "Horizontal Line",
            PatternKind::Vertical => "Vertical Line",
            PatternKind::Diagonal => "Diagonal Line",
            PatternKind::Corners => "Four Corners",
            PatternKind::Blackout => "Blackout",
            PatternKind::XPattern => "X Pattern",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PatternKind::Horizontal => "Any complete horizontal line",
            PatternKind::Vertical => "Any complete vertical line",
            PatternKind::Diagonal => "Any complete diagonal line",
            PatternKind::Corners => "All four corners marked",
            PatternKind::Blackout => "All squares marked",
            PatternKind::XPattern => "Both diagonals marked",
        }
    }

    /// Difficulty on the 1-10 scale used by the event planner to weight
    /// prize-pool allocation.
    pub fn difficulty(self) -> u8 {
        match self {
            PatternKind::Horizontal | PatternKind::Vertical => 3,
            PatternKind::Diagonal => 4,
            PatternKind::Corners => 5,
            PatternKind::XPattern => 7,
            PatternKind::Blackout => 10,
        }
    }
}

/// Default difficulty for user-authored patterns that never set one.
pub const CUSTOM_PATTERN_DIFFICULTY: u8 = 5;

/// Persisted user-authored pattern document (patterns/{id}).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternDoc {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
    /// Flat 25-boolean grid, row-major.
    pub grid: Vec<bool>,
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub created_by: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl PatternDoc {
    pub fn difficulty(&self) -> u8 {
        self.difficulty.unwrap_or(CUSTOM_PATTERN_DIFFICULTY)
    }
}

/// What the engine evaluates: a built-in geometric rule or a user grid.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternDef {
    Named(PatternKind),
    Custom([bool; GRID_CELLS]),
}

impl PatternDef {
    /// Resolve a pattern id against the built-in set. Unrecognized ids fall
    /// back to the horizontal rule; the original behaves this way and
    /// downstream flows rely on it, so it is kept rather than made an error.
    pub fn from_id(id: &str) -> Self {
        PatternDef::Named(PatternKind::from_id(id).unwrap_or(PatternKind::Horizontal))
    }

    pub fn from_grid(grid: &[bool]) -> Self {
        let mut cells = [false; GRID_CELLS];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = grid.get(i).copied().unwrap_or(false);
        }
        PatternDef::Custom(cells)
    }
}

const DIAGONAL_MAIN: [usize; 5] = [0, 6, 12, 18, 24];
const DIAGONAL_ANTI: [usize; 5] = [4, 8, 12, 16, 20];
const CORNERS: [usize; 4] = [0, 4, 20, 24];

/// Evaluate a marked grid against a pattern. Pure and deterministic; the
/// free space (index 12) is treated as marked regardless of the caller's
/// value, and only here, never re-derived by presentation code.
pub fn evaluate(marked: &[bool; GRID_CELLS], pattern: &PatternDef) -> bool {
    let mut grid = *marked;
    grid[FREE_SPACE_INDEX] = true;

    match pattern {
        PatternDef::Named(kind) => match kind {
            PatternKind::Horizontal => any_row(&grid),
            PatternKind::Vertical => any_column(&grid),
            PatternKind::Diagonal => all_of(&grid, &DIAGONAL_MAIN) || all_of(&grid, &DIAGONAL_ANTI),
            PatternKind::Corners => all_of(&grid, &CORNERS),
            PatternKind::Blackout => grid.iter().all(|&m| m),
            PatternKind::XPattern => all_of(&grid, &DIAGONAL_MAIN) && all_of(&grid, &DIAGONAL_ANTI),
        },
        // A custom pattern wins when every required cell is marked: the
        // pattern grid is a subset of the marked grid. The free space counts
        // as satisfied even when the stored grid requires it.
        PatternDef::Custom(required) => required
            .iter()
            .enumerate()
            .all(|(i, &need)| !need || grid[i]),
    }
}

fn any_row(grid: &[bool; GRID_CELLS]) -> bool {
    (0..GRID_COLS).any(|row| grid[row * GRID_COLS..(row + 1) * GRID_COLS].iter().all(|&m| m))
}

fn any_column(grid: &[bool; GRID_CELLS]) -> bool {
    (0..GRID_COLS).any(|col| (0..GRID_COLS).all(|row| grid[row * GRID_COLS + col]))
}

fn all_of(grid: &[bool; GRID_CELLS], indices: &[usize]) -> bool {
    indices.iter().all(|&i| grid[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(indices: &[usize]) -> [bool; GRID_CELLS] {
        let mut grid = [false; GRID_CELLS];
        for &i in indices {
            grid[i] = true;
        }
        grid
    }

    #[test]
    fn test_horizontal_rows() {
        // Row 3 (indices 15-19) fully marked.
        let grid = marked(&[15, 16, 17, 18, 19]);
        assert!(evaluate(&grid, &PatternDef::Named(PatternKind::Horizontal)));

        // Four of five marked is not a line.
        let grid = marked(&[15, 16, 17, 18]);
        assert!(!evaluate(&grid, &PatternDef::Named(PatternKind::Horizontal)));
    }

    #[test]
    fn test_horizontal_center_row_uses_free_space() {
        // Row 2 needs only four real marks because index 12 is free.
        let grid = marked(&[10, 11, 13, 14]);
        assert!(evaluate(&grid, &PatternDef::Named(PatternKind::Horizontal)));
    }

    #[test]
    fn test_vertical_columns() {
        let grid = marked(&[1, 6, 11, 16, 21]);
        assert!(evaluate(&grid, &PatternDef::Named(PatternKind::Vertical)));

        // Center column leans on the free space.
        let grid = marked(&[2, 7, 17, 22]);
        assert!(evaluate(&grid, &PatternDef::Named(PatternKind::Vertical)));

        let grid = marked(&[1, 6, 11, 16]);
        assert!(!evaluate(&grid, &PatternDef::Named(PatternKind::Vertical)));
    }

    #[test]
    fn test_diagonals() {
        let grid = marked(&[0, 6, 18, 24]); // center free
        assert!(evaluate(&grid, &PatternDef::Named(PatternKind::Diagonal)));

        let grid = marked(&[4, 8, 16, 20]);
        assert!(evaluate(&grid, &PatternDef::Named(PatternKind::Diagonal)));

        let grid = marked(&[0, 6, 18]);
        assert!(!evaluate(&grid, &PatternDef::Named(PatternKind::Diagonal)));
    }

    #[test]
    fn test_corners() {
        let grid = marked(&[0, 4, 20, 24]);
        assert!(evaluate(&grid, &PatternDef::Named(PatternKind::Corners)));

        let grid = marked(&[0, 4, 20]);
        assert!(!evaluate(&grid, &PatternDef::Named(PatternKind::Corners)));
    }

    #[test]
    fn test_x_pattern_requires_both_diagonals() {
        let both: Vec<usize> = DIAGONAL_MAIN.iter().chain(DIAGONAL_ANTI.iter()).copied().collect();
        let grid = marked(&both);
        assert!(evaluate(&grid, &PatternDef::Named(PatternKind::XPattern)));

        let grid = marked(&DIAGONAL_MAIN);
        assert!(!evaluate(&grid, &PatternDef::Named(PatternKind::XPattern)));
    }

    #[test]
    fn test_blackout() {
        let grid = [true; GRID_CELLS];
        assert!(evaluate(&grid, &PatternDef::Named(PatternKind::Blackout)));

        // Everything but the free space still wins.
        let mut grid = [true; GRID_CELLS];
        grid[FREE_SPACE_INDEX] = false;
        assert!(evaluate(&grid, &PatternDef::Named(PatternKind::Blackout)));

        grid[3] = false;
        assert!(!evaluate(&grid, &PatternDef::Named(PatternKind::Blackout)));
    }

    #[test]
    fn test_custom_pattern_subset_rule() {
        // Postage stamp: top-left 2x2 block.
        let mut required = [false; GRID_CELLS];
        for &i in &[0, 1, 5, 6] {
            required[i] = true;
        }

        let grid = marked(&[0, 1, 5, 6, 14, 22]);
        assert!(evaluate(&grid, &PatternDef::Custom(required)));

        let grid = marked(&[0, 1, 5]);
        assert!(!evaluate(&grid, &PatternDef::Custom(required)));
    }

    #[test]
    fn test_custom_pattern_free_space_always_satisfied() {
        let mut required = [false; GRID_CELLS];
        required[FREE_SPACE_INDEX] = true;

        let grid = [false; GRID_CELLS];
        assert!(evaluate(&grid, &PatternDef::Custom(required)));
    }

    #[test]
    fn test_unknown_pattern_id_falls_back_to_horizontal() {
        let def = PatternDef::from_id("zigzag");
        assert_eq!(def, PatternDef::Named(PatternKind::Horizontal));

        let grid = marked(&[0, 1, 2, 3, 4]);
        assert!(evaluate(&grid, &def));
    }

    #[test]
    fn test_evaluate_is_pure() {
        let grid = marked(&[0, 4, 20, 24]);
        let def = PatternDef::Named(PatternKind::Corners);
        let first = evaluate(&grid, &def);
        for _ in 0..10 {
            assert_eq!(evaluate(&grid, &def), first);
        }
        // Caller's grid is untouched, free space included.
        assert!(!grid[FREE_SPACE_INDEX]);
    }

    #[test]
    fn test_difficulty_table() {
        assert_eq!(PatternKind::Horizontal.difficulty(), 3);
        assert_eq!(PatternKind::Vertical.difficulty(), 3);
        assert_eq!(PatternKind::Diagonal.difficulty(), 4);
        assert_eq!(PatternKind::Corners.difficulty(), 5);
        assert_eq!(PatternKind::XPattern.difficulty(), 7);
        assert_eq!(PatternKind::Blackout.difficulty(), 10);
    }

    #[test]
    fn test_pattern_ids_round_trip() {
        for kind in PatternKind::ALL {
            assert_eq!(PatternKind::from_id(kind.id()), Some(kind));
        }
    }
}
