use crate::error::InvalidMoveRequest;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Right,
    Direction::Down,
    Direction::Left,
];

impl Direction {
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// Resolve a raw `(dx, dy)` request.
    ///
    /// `(0, 0)` is a valid request for no movement and yields None. Diagonal
    /// deltas and components outside `-1..=1` are rejected.
    pub fn from_delta(dx: i32, dy: i32) -> Result<Option<Direction>, InvalidMoveRequest> {
        match (dx, dy) {
            (0, 0) => Ok(None),
            (-1, 0) => Ok(Some(Direction::Left)),
            (1, 0) => Ok(Some(Direction::Right)),
            (0, -1) => Ok(Some(Direction::Up)),
            (0, 1) => Ok(Some(Direction::Down)),
            _ => Err(InvalidMoveRequest { dx, dy }),
        }
    }

    /// Parse one LURD character; case only distinguishes moves from pushes.
    pub fn from_lurd(ch: char) -> Option<Direction> {
        match ch.to_ascii_lowercase() {
            'u' => Some(Direction::Up),
            'r' => Some(Direction::Right),
            'd' => Some(Direction::Down),
            'l' => Some(Direction::Left),
            _ => None,
        }
    }

    fn lurd(self) -> char {
        match self {
            Direction::Up => 'u',
            Direction::Right => 'r',
            Direction::Down => 'd',
            Direction::Left => 'l',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "Up"),
            Direction::Right => write!(f, "Right"),
            Direction::Down => write!(f, "Down"),
            Direction::Left => write!(f, "Left"),
        }
    }
}

/// Movement intent sampled once per input tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveIntent {
    Left,
    Right,
    Up,
    Down,
    Stop,
}

impl MoveIntent {
    pub fn delta(self) -> (i32, i32) {
        match self {
            MoveIntent::Left => (-1, 0),
            MoveIntent::Right => (1, 0),
            MoveIntent::Up => (0, -1),
            MoveIntent::Down => (0, 1),
            MoveIntent::Stop => (0, 0),
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            MoveIntent::Left => Some(Direction::Left),
            MoveIntent::Right => Some(Direction::Right),
            MoveIntent::Up => Some(Direction::Up),
            MoveIntent::Down => Some(Direction::Down),
            MoveIntent::Stop => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveType {
    Nothing,
    Worker,
    WorkerAndBox,
}

/// Outcome of one move request. `Nothing` carries no direction, so a
/// rejected move can never be mistaken for a real one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveInformation {
    Nothing,
    Worker(Direction),
    WorkerAndBox(Direction),
}

impl MoveInformation {
    pub fn move_type(&self) -> MoveType {
        match self {
            MoveInformation::Nothing => MoveType::Nothing,
            MoveInformation::Worker(_) => MoveType::Worker,
            MoveInformation::WorkerAndBox(_) => MoveType::WorkerAndBox,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            MoveInformation::Nothing => None,
            MoveInformation::Worker(dir) | MoveInformation::WorkerAndBox(dir) => Some(*dir),
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, MoveInformation::Nothing)
    }

    pub fn is_push(&self) -> bool {
        matches!(self, MoveInformation::WorkerAndBox(_))
    }

    /// LURD character: lowercase for a move, uppercase for a push.
    pub fn lurd(&self) -> Option<char> {
        match self {
            MoveInformation::Nothing => None,
            MoveInformation::Worker(dir) => Some(dir.lurd()),
            MoveInformation::WorkerAndBox(dir) => Some(dir.lurd().to_ascii_uppercase()),
        }
    }
}

impl fmt::Display for MoveInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveInformation::Nothing => write!(f, "Nothing"),
            MoveInformation::Worker(dir) => write!(f, "Worker {}", dir),
            MoveInformation::WorkerAndBox(dir) => write!(f, "WorkerAndBox {}", dir),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Presentation-only facing of the worker: the last axis actually moved
/// along, plus the remembered value of the other axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerDirection {
    horizontal: Horizontal,
    vertical: Vertical,
    axis: Axis,
}

impl Default for WorkerDirection {
    fn default() -> Self {
        WorkerDirection {
            horizontal: Horizontal::Right,
            vertical: Vertical::Down,
            axis: Axis::Horizontal,
        }
    }
}

impl WorkerDirection {
    pub fn horizontal(&self) -> Horizontal {
        self.horizontal
    }

    pub fn vertical(&self) -> Vertical {
        self.vertical
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The direction the worker faces along its real axis.
    pub fn facing(&self) -> Direction {
        match self.axis {
            Axis::Horizontal => match self.horizontal {
                Horizontal::Left => Direction::Left,
                Horizontal::Right => Direction::Right,
            },
            Axis::Vertical => match self.vertical {
                Vertical::Up => Direction::Up,
                Vertical::Down => Direction::Down,
            },
        }
    }

    pub fn turn(&mut self, dir: Direction) {
        match dir {
            Direction::Left => {
                self.horizontal = Horizontal::Left;
                self.axis = Axis::Horizontal;
            }
            Direction::Right => {
                self.horizontal = Horizontal::Right;
                self.axis = Axis::Horizontal;
            }
            Direction::Up => {
                self.vertical = Vertical::Up;
                self.axis = Axis::Vertical;
            }
            Direction::Down => {
                self.vertical = Vertical::Down;
                self.axis = Axis::Vertical;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_delta() {
        assert_eq!(Direction::from_delta(0, 0), Ok(None));
        assert_eq!(Direction::from_delta(1, 0), Ok(Some(Direction::Right)));
        assert_eq!(Direction::from_delta(-1, 0), Ok(Some(Direction::Left)));
        assert_eq!(Direction::from_delta(0, -1), Ok(Some(Direction::Up)));
        assert_eq!(Direction::from_delta(0, 1), Ok(Some(Direction::Down)));
    }

    #[test]
    fn test_from_delta_rejects_diagonal_and_long_moves() {
        assert_eq!(
            Direction::from_delta(1, 1),
            Err(InvalidMoveRequest { dx: 1, dy: 1 })
        );
        assert!(Direction::from_delta(-1, 1).is_err());
        assert!(Direction::from_delta(2, 0).is_err());
        assert!(Direction::from_delta(0, -3).is_err());
    }

    #[test]
    fn test_intent_matches_delta() {
        for intent in [
            MoveIntent::Left,
            MoveIntent::Right,
            MoveIntent::Up,
            MoveIntent::Down,
            MoveIntent::Stop,
        ] {
            let (dx, dy) = intent.delta();
            assert_eq!(Direction::from_delta(dx, dy), Ok(intent.direction()));
        }
    }

    #[test]
    fn test_reverse_cancels_delta() {
        for dir in ALL_DIRECTIONS {
            let (dx, dy) = dir.delta();
            let (rx, ry) = dir.reverse().delta();
            assert_eq!((dx + rx, dy + ry), (0, 0), "Failed for {:?}", dir);
        }
    }

    #[test]
    fn test_lurd_notation() {
        assert_eq!(MoveInformation::Worker(Direction::Left).lurd(), Some('l'));
        assert_eq!(
            MoveInformation::WorkerAndBox(Direction::Up).lurd(),
            Some('U')
        );
        assert_eq!(MoveInformation::Nothing.lurd(), None);
        assert_eq!(Direction::from_lurd('R'), Some(Direction::Right));
        assert_eq!(Direction::from_lurd('d'), Some(Direction::Down));
        assert_eq!(Direction::from_lurd('x'), None);
    }

    #[test]
    fn test_move_information_accessors() {
        let push = MoveInformation::WorkerAndBox(Direction::Right);
        assert_eq!(push.move_type(), MoveType::WorkerAndBox);
        assert_eq!(push.direction(), Some(Direction::Right));
        assert!(push.is_push());
        assert_eq!(MoveInformation::Nothing.direction(), None);
        assert_eq!(MoveInformation::Nothing.move_type(), MoveType::Nothing);
    }

    #[test]
    fn test_worker_direction_remembers_cross_axis() {
        let mut facing = WorkerDirection::default();
        assert_eq!(facing.facing(), Direction::Right);

        facing.turn(Direction::Up);
        assert_eq!(facing.axis(), Axis::Vertical);
        assert_eq!(facing.facing(), Direction::Up);
        assert_eq!(facing.horizontal(), Horizontal::Right);

        facing.turn(Direction::Left);
        assert_eq!(facing.axis(), Axis::Horizontal);
        assert_eq!(facing.facing(), Direction::Left);
        assert_eq!(facing.vertical(), Vertical::Up);
    }
}
