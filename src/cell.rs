use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Wall,
    Goal,
    Box,
    BoxOnGoal,
    /// Only produced by worker-overlay lookups, never stored in a grid.
    Worker,
    Empty,
}

/// Result of reading one character of a raw level row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Symbol {
    pub cell: Cell,
    pub worker: bool,
    pub recognized: bool,
}

impl Cell {
    /// Map a level character to the cell stored for it.
    ///
    /// Characters:
    /// - `#` = Wall
    /// - ` `, `-`, `_` = Empty
    /// - `.` = Goal
    /// - `$` = Box
    /// - `*` = Box on goal
    /// - `@` = Worker (stored as Empty)
    /// - `+` = Worker on goal (stored as Goal)
    ///
    /// Anything else is stored as Empty and flagged as unrecognized.
    pub(crate) fn parse(ch: char) -> Symbol {
        let (cell, worker, recognized) = match ch {
            '#' => (Cell::Wall, false, true),
            ' ' | '-' | '_' => (Cell::Empty, false, true),
            '.' => (Cell::Goal, false, true),
            '$' => (Cell::Box, false, true),
            '*' => (Cell::BoxOnGoal, false, true),
            '@' => (Cell::Empty, true, true),
            '+' => (Cell::Goal, true, true),
            _ => (Cell::Empty, false, false),
        };
        Symbol {
            cell,
            worker,
            recognized,
        }
    }

    pub fn is_box(self) -> bool {
        matches!(self, Cell::Box | Cell::BoxOnGoal)
    }

    pub fn is_goal(self) -> bool {
        matches!(self, Cell::Goal | Cell::BoxOnGoal)
    }

    /// Cells a worker may step onto.
    pub fn is_walkable(self) -> bool {
        matches!(self, Cell::Empty | Cell::Goal)
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Goal => '.',
            Cell::Box => '$',
            Cell::BoxOnGoal => '*',
            Cell::Worker => '@',
            Cell::Empty => ' ',
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
