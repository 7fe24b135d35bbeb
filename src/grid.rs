use crate::cell::Cell;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Size { width, height }
    }

    /// Whether `other` fits inside this bounding box.
    pub fn contains(&self, other: Size) -> bool {
        other.width <= self.width && other.height <= self.height
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Cell coordinates: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Offset by a unit delta. Returns None when the result would be negative.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Position> {
        let x = self.x.checked_add_signed(dx as isize)?;
        let y = self.y.checked_add_signed(dy as isize)?;
        Some(Position { x, y })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Fixed-size, row-major cell buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(size: Size) -> Self {
        Grid {
            width: size.width,
            height: size.height,
            cells: vec![Cell::Empty; size.width * size.height],
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < self.width && pos.y < self.height {
            Some(pos.y * self.width + pos.x)
        } else {
            None
        }
    }

    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Returns false (and writes nothing) when `pos` is outside the grid.
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y < self.height {
            Some(&self.cells[y * self.width..(y + 1) * self.width])
        } else {
            None
        }
    }

    /// Build a `maximal`-sized grid with `rows` centered inside it.
    ///
    /// The leading padding is `floor((maximal - content) / 2)` on each axis; the
    /// odd row or column goes to the bottom/right. Short rows keep the common
    /// left margin, computed from the widest row, and are filled with Empty on
    /// the right. Returns the grid and the offset applied to content
    /// coordinates, or None if the content does not fit.
    pub fn centered(rows: &[Vec<Cell>], maximal: Size) -> Option<(Grid, Position)> {
        let content = Size::new(
            rows.iter().map(|row| row.len()).max().unwrap_or(0),
            rows.len(),
        );
        if !maximal.contains(content) {
            return None;
        }

        let leading_rows = (maximal.height - content.height) / 2;
        let leading_cols = (maximal.width - content.width) / 2;

        let mut grid = Grid::new(maximal);
        for (y, row) in rows.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                grid.set(Position::new(x + leading_cols, y + leading_rows), cell);
            }
        }

        Some((grid, Position::new(leading_cols, leading_rows)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(text: &str) -> Vec<Vec<Cell>> {
        text.lines()
            .map(|line| line.chars().map(|ch| Cell::parse(ch).cell).collect())
            .collect()
    }

    #[test]
    fn test_get_out_of_bounds() {
        let grid = Grid::new(Size::new(3, 2));
        assert_eq!(grid.get(Position::new(2, 1)), Some(Cell::Empty));
        assert_eq!(grid.get(Position::new(3, 0)), None);
        assert_eq!(grid.get(Position::new(0, 2)), None);
    }

    #[test]
    fn test_set_out_of_bounds_is_rejected() {
        let mut grid = Grid::new(Size::new(2, 2));
        assert!(grid.set(Position::new(1, 1), Cell::Wall));
        assert!(!grid.set(Position::new(2, 1), Cell::Wall));
        assert_eq!(grid.get(Position::new(1, 1)), Some(Cell::Wall));
    }

    #[test]
    fn test_centered_exact_fit() {
        let content = rows("###\n#.#\n###");
        let (grid, offset) = Grid::centered(&content, Size::new(3, 3)).unwrap();
        assert_eq!(offset, Position::new(0, 0));
        assert_eq!(grid.get(Position::new(1, 1)), Some(Cell::Goal));
    }

    #[test]
    fn test_centered_odd_padding_goes_trailing() {
        // 3x1 content in 6x4: leading cols 1 (trailing 2), leading rows 1 (trailing 2)
        let content = rows("#.#");
        let (grid, offset) = Grid::centered(&content, Size::new(6, 4)).unwrap();
        assert_eq!(offset, Position::new(1, 1));
        assert_eq!(grid.size(), Size::new(6, 4));
        assert_eq!(
            grid.row(1).unwrap(),
            &[
                Cell::Empty,
                Cell::Wall,
                Cell::Goal,
                Cell::Wall,
                Cell::Empty,
                Cell::Empty
            ]
        );
        assert!(grid.row(0).unwrap().iter().all(|&c| c == Cell::Empty));
        assert!(grid.row(2).unwrap().iter().all(|&c| c == Cell::Empty));
        assert!(grid.row(3).unwrap().iter().all(|&c| c == Cell::Empty));
    }

    #[test]
    fn test_centered_ragged_rows_share_left_margin() {
        let content = rows("####\n#.#\n####");
        let (grid, offset) = Grid::centered(&content, Size::new(8, 3)).unwrap();
        assert_eq!(offset, Position::new(2, 0));
        assert_eq!(grid.get(Position::new(2, 1)), Some(Cell::Wall));
        assert_eq!(grid.get(Position::new(3, 1)), Some(Cell::Goal));
        assert_eq!(grid.get(Position::new(4, 1)), Some(Cell::Wall));
        assert_eq!(grid.get(Position::new(5, 1)), Some(Cell::Empty));
    }

    #[test]
    fn test_centered_rejects_oversized_content() {
        let content = rows("#####");
        assert!(Grid::centered(&content, Size::new(4, 4)).is_none());
        let content = rows("#\n#\n#");
        assert!(Grid::centered(&content, Size::new(4, 2)).is_none());
    }

    #[test]
    fn test_position_offset() {
        let pos = Position::new(0, 3);
        assert_eq!(pos.offset(1, -1), Some(Position::new(1, 2)));
        assert_eq!(pos.offset(-1, 0), None);
    }
}
