use crate::cell::Cell;
use crate::error::{HistoryRangeError, InitializeError, InvalidMoveRequest};
use crate::grid::{Grid, Position, Size};
use crate::moves::{Direction, MoveInformation, MoveIntent, WorkerDirection};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelState {
    /// Parsed but never initialized.
    Empty,
    OutOfBounds,
    Corrupted,
    Playable,
}

impl fmt::Display for LevelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelState::Empty => write!(f, "Empty"),
            LevelState::OutOfBounds => write!(f, "OutOfBounds"),
            LevelState::Corrupted => write!(f, "Corrupted"),
            LevelState::Playable => write!(f, "Playable"),
        }
    }
}

impl InitializeError {
    pub fn state(&self) -> LevelState {
        match self {
            InitializeError::EmptyLevel | InitializeError::OutOfBounds { .. } => {
                LevelState::OutOfBounds
            }
            InitializeError::BoxesGoalsMismatch { .. } | InitializeError::WorkerCount(_) => {
                LevelState::Corrupted
            }
            InitializeError::NeverInitialized => LevelState::Empty,
        }
    }
}

/// Level content as parsed from its raw lines. Workers are not stored in
/// the rows: `@` becomes Empty and `+` becomes Goal, and their positions are
/// kept in `workers`.
#[derive(Debug, Clone)]
struct Source {
    rows: Vec<Vec<Cell>>,
    workers: Vec<Position>,
    degraded: usize,
}

impl Source {
    fn parse<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut rows = Vec::with_capacity(lines.len());
        let mut workers = Vec::new();
        let mut degraded = 0;

        for (y, line) in lines.iter().enumerate() {
            let mut row = Vec::new();
            for (x, ch) in line.as_ref().chars().enumerate() {
                let symbol = Cell::parse(ch);
                if symbol.worker {
                    workers.push(Position::new(x, y));
                }
                if !symbol.recognized {
                    degraded += 1;
                }
                row.push(symbol.cell);
            }
            rows.push(row);
        }

        Source {
            rows,
            workers,
            degraded,
        }
    }
}

/// Live state of a level. Everything here is guarded by the level lock.
#[derive(Debug, Clone)]
struct Board {
    state: LevelState,
    maximal_size: Option<Size>,
    size: Size,
    offset: Position,
    grid: Grid,
    goals: usize,
    boxes: usize,
    boxes_on_goals: usize,
    worker: Position,
    worker_direction: WorkerDirection,
    moves_count: usize,
    pushes_count: usize,
    history: Vec<MoveInformation>,
}

impl Board {
    fn new() -> Self {
        Board {
            state: LevelState::Empty,
            maximal_size: None,
            size: Size::new(0, 0),
            offset: Position::default(),
            grid: Grid::new(Size::new(0, 0)),
            goals: 0,
            boxes: 0,
            boxes_on_goals: 0,
            worker: Position::default(),
            worker_direction: WorkerDirection::default(),
            moves_count: 0,
            pushes_count: 0,
            history: Vec::new(),
        }
    }

    fn initialize(&mut self, source: &Source, maximal: Size) -> Result<(), InitializeError> {
        *self = Board::new();
        self.maximal_size = Some(maximal);

        let result = self.validate_and_normalize(source, maximal);
        self.state = match &result {
            Ok(()) => LevelState::Playable,
            Err(err) => err.state(),
        };
        result
    }

    fn validate_and_normalize(
        &mut self,
        source: &Source,
        maximal: Size,
    ) -> Result<(), InitializeError> {
        let rows = &source.rows;
        if rows.is_empty() {
            return Err(InitializeError::EmptyLevel);
        }

        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        self.size = Size::new(width, rows.len());
        if rows.len() > maximal.height {
            return Err(InitializeError::OutOfBounds {
                content: self.size,
                maximal,
            });
        }

        for &cell in rows.iter().flatten() {
            if cell.is_goal() {
                self.goals += 1;
            }
            if cell.is_box() {
                self.boxes += 1;
            }
            if cell == Cell::BoxOnGoal {
                self.boxes_on_goals += 1;
            }
        }

        if width > maximal.width {
            return Err(InitializeError::OutOfBounds {
                content: self.size,
                maximal,
            });
        }
        if self.boxes != self.goals {
            return Err(InitializeError::BoxesGoalsMismatch {
                boxes: self.boxes,
                goals: self.goals,
            });
        }
        let worker = match source.workers.as_slice() {
            [worker] => *worker,
            workers => return Err(InitializeError::WorkerCount(workers.len())),
        };

        let (grid, offset) =
            Grid::centered(rows, maximal).ok_or(InitializeError::OutOfBounds {
                content: self.size,
                maximal,
            })?;
        self.grid = grid;
        self.offset = offset;
        self.worker = Position::new(worker.x + offset.x, worker.y + offset.y);
        Ok(())
    }

    fn is_playable(&self) -> bool {
        self.state == LevelState::Playable
    }

    /// Cell at `pos`, with anything outside the grid reading as Wall.
    fn cell(&self, pos: Option<Position>) -> Cell {
        pos.and_then(|pos| self.grid.get(pos)).unwrap_or(Cell::Wall)
    }

    fn neighbor(pos: Position, dir: Direction) -> Option<Position> {
        let (dx, dy) = dir.delta();
        pos.offset(dx, dy)
    }

    fn take_box(&mut self, pos: Position) {
        match self.cell(Some(pos)) {
            Cell::BoxOnGoal => {
                self.grid.set(pos, Cell::Goal);
                self.boxes_on_goals -= 1;
            }
            Cell::Box => {
                self.grid.set(pos, Cell::Empty);
            }
            _ => {}
        }
    }

    fn place_box(&mut self, pos: Position) {
        if self.cell(Some(pos)) == Cell::Goal {
            self.grid.set(pos, Cell::BoxOnGoal);
            self.boxes_on_goals += 1;
        } else {
            self.grid.set(pos, Cell::Box);
        }
    }

    /// Execute one step. All checks happen before the grid is written, so a
    /// rejected move leaves the board untouched.
    fn execute(&mut self, dir: Direction, replay: bool) -> MoveInformation {
        if !self.is_playable() {
            return MoveInformation::Nothing;
        }

        let target = Self::neighbor(self.worker, dir);
        let info = match (target, self.cell(target)) {
            (Some(target), cell) if cell.is_box() => {
                let beyond = Self::neighbor(target, dir);
                match (beyond, self.cell(beyond)) {
                    (Some(beyond), cell) if cell.is_walkable() => {
                        self.take_box(target);
                        self.place_box(beyond);
                        self.worker = target;
                        MoveInformation::WorkerAndBox(dir)
                    }
                    _ => MoveInformation::Nothing,
                }
            }
            (Some(target), cell) if cell.is_walkable() => {
                self.worker = target;
                MoveInformation::Worker(dir)
            }
            _ => MoveInformation::Nothing,
        };

        if !info.is_nothing() {
            self.worker_direction.turn(dir);
            self.add_move_to_history(info, replay);
        }
        info
    }

    /// A new move drops any taken-back moves beyond the cursor; a replayed
    /// move only advances the cursor over the entry it came from.
    fn add_move_to_history(&mut self, info: MoveInformation, replay: bool) {
        if !replay {
            self.history.truncate(self.moves_count);
            self.history.push(info);
        }
        self.moves_count += 1;
        if info.is_push() {
            self.pushes_count += 1;
        }
    }

    /// Works on a copy of the board so a history that no longer fits leaves
    /// the level as it was.
    fn take_back(&mut self, count: usize) -> Result<usize, HistoryRangeError> {
        if !self.is_playable() {
            return Err(HistoryRangeError::NotPlayable);
        }
        if count == 0 || count > self.moves_count {
            return Err(HistoryRangeError::OutOfRange {
                requested: count,
                available: self.moves_count,
            });
        }

        let mut board = self.clone();
        for _ in 0..count {
            board.take_back_step()?;
        }
        *self = board;
        Ok(self.moves_count)
    }

    fn take_back_step(&mut self) -> Result<(), HistoryRangeError> {
        let inconsistent = HistoryRangeError::Inconsistent {
            reached: self.moves_count,
        };
        let info = self.history[self.moves_count - 1];
        let Some(dir) = info.direction() else {
            error!(moves = self.moves_count, "empty move stored in history");
            return Err(inconsistent);
        };
        let Some(previous) = Self::neighbor(self.worker, dir.reverse())
            .filter(|&pos| self.cell(Some(pos)).is_walkable())
        else {
            error!(worker = %self.worker, %dir, "take-back target is blocked");
            return Err(inconsistent);
        };

        if info.is_push() {
            let Some(box_pos) =
                Self::neighbor(self.worker, dir).filter(|&pos| self.cell(Some(pos)).is_box())
            else {
                error!(worker = %self.worker, %dir, "pushed box is missing");
                return Err(inconsistent);
            };
            self.take_box(box_pos);
            self.place_box(self.worker);
            self.pushes_count -= 1;
        }
        self.worker = previous;
        self.moves_count -= 1;

        self.worker_direction = WorkerDirection::default();
        if let Some(dir) = self
            .moves_count
            .checked_sub(1)
            .and_then(|i| self.history[i].direction())
        {
            self.worker_direction.turn(dir);
        }
        Ok(())
    }

    fn repeat_moves(&mut self, count: usize) -> Result<usize, HistoryRangeError> {
        if !self.is_playable() {
            return Err(HistoryRangeError::NotPlayable);
        }
        let available = self.history.len() - self.moves_count;
        if count == 0 || count > available {
            return Err(HistoryRangeError::OutOfRange {
                requested: count,
                available,
            });
        }

        let mut board = self.clone();
        for _ in 0..count {
            let stored = board.history[board.moves_count];
            let replayed = stored.direction().map(|dir| board.execute(dir, true));
            if replayed != Some(stored) {
                warn!(
                    moves = board.moves_count,
                    %stored,
                    "stored move could not be repeated"
                );
                return Err(HistoryRangeError::Inconsistent {
                    reached: board.moves_count,
                });
            }
        }
        *self = board;
        Ok(self.moves_count)
    }

    fn get_item_at(&self, row: usize, col: usize) -> Option<Cell> {
        if !self.is_playable() {
            return None;
        }
        Some(self.cell(Some(Position::new(col, row))))
    }

    /// Overwrite one cell. Writes that would leave boxes and goals unequal are
    /// refused; an accepted write starts a fresh history.
    fn set_item_at(&mut self, row: usize, col: usize, cell: Cell) -> bool {
        let pos = Position::new(col, row);
        if !self.is_playable() || cell == Cell::Worker {
            return false;
        }
        let Some(old) = self.grid.get(pos) else {
            return false;
        };
        if pos == self.worker && !cell.is_walkable() {
            return false;
        }
        let balance = |cell: Cell| cell.is_box() as isize - cell.is_goal() as isize;
        if balance(old) != balance(cell) {
            return false;
        }

        self.grid.set(pos, cell);
        self.recount();
        self.history.clear();
        self.moves_count = 0;
        self.pushes_count = 0;
        true
    }

    fn recount(&mut self) {
        let size = self.grid.size();
        let (mut goals, mut boxes, mut on_goals) = (0, 0, 0);
        for y in 0..size.height {
            for &cell in self.grid.row(y).unwrap_or_default() {
                goals += cell.is_goal() as usize;
                boxes += cell.is_box() as usize;
                on_goals += (cell == Cell::BoxOnGoal) as usize;
            }
        }
        self.goals = goals;
        self.boxes = boxes;
        self.boxes_on_goals = on_goals;
    }

    fn is_completed(&self) -> bool {
        self.is_playable() && self.boxes == self.boxes_on_goals
    }

    fn history_lurd(&self) -> String {
        self.history[..self.moves_count]
            .iter()
            .filter_map(|info| info.lurd())
            .collect()
    }
}

/// A Sokoban level: immutable parsed content plus a lock-protected live
/// board. Every accessor takes the lock, so a reader never sees a move half
/// applied.
#[derive(Debug)]
pub struct Level {
    id: usize,
    name: String,
    source: Source,
    board: Mutex<Board>,
}

impl Level {
    /// Parse a level from its raw rows. The level starts in the Empty state
    /// until `initialize` is called.
    pub fn new<S: AsRef<str>>(id: usize, name: impl Into<String>, lines: &[S]) -> Self {
        let source = Source::parse(lines);
        let name = name.into();
        if source.degraded > 0 {
            debug!(
                level = id,
                name = %name,
                cells = source.degraded,
                "unrecognized characters read as empty cells"
            );
        }
        Level {
            id,
            name,
            source,
            board: Mutex::new(Board::new()),
        }
    }

    pub fn from_text(id: usize, name: impl Into<String>, text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        Self::new(id, name, &lines)
    }

    fn lock(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hold the level lock for a whole render pass.
    pub fn read(&self) -> LevelView<'_> {
        LevelView { board: self.lock() }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of input characters that were not level symbols.
    pub fn degraded_cells(&self) -> usize {
        self.source.degraded
    }

    /// Validate the content against `maximal` and rebuild the live grid,
    /// discarding counters and history.
    pub fn initialize(&self, maximal: Size) -> Result<(), InitializeError> {
        let result = self.lock().initialize(&self.source, maximal);
        match &result {
            Ok(()) => debug!(level = self.id, %maximal, "level playable"),
            Err(err) => debug!(level = self.id, %maximal, error = %err, "level not playable"),
        }
        result
    }

    /// Initialize again with the last maximal size.
    pub fn restart(&self) -> Result<(), InitializeError> {
        let mut board = self.lock();
        let maximal = board.maximal_size.ok_or(InitializeError::NeverInitialized)?;
        board.initialize(&self.source, maximal)
    }

    pub fn state(&self) -> LevelState {
        self.lock().state
    }

    pub fn is_playable(&self) -> bool {
        self.state() == LevelState::Playable
    }

    /// Real content size, before padding.
    pub fn size(&self) -> Size {
        self.lock().size
    }

    pub fn maximal_size(&self) -> Option<Size> {
        self.lock().maximal_size
    }

    pub fn get_item_at(&self, row: usize, col: usize) -> Option<Cell> {
        self.read().get_item_at(row, col)
    }

    pub fn get_item_with_worker_at(&self, row: usize, col: usize) -> Option<Cell> {
        self.read().get_item_with_worker_at(row, col)
    }

    /// Overwrite one grid cell of a playable level. The worker cell only
    /// accepts walkable cells, and a write must keep boxes and goals equal.
    /// Counters are recomputed and the move history is cleared.
    pub fn set_item_at(&self, row: usize, col: usize, cell: Cell) -> bool {
        self.lock().set_item_at(row, col, cell)
    }

    /// Move the worker one cell, pushing a box if one is in the way.
    pub fn move_worker(&self, dir: Direction) -> MoveInformation {
        self.lock().execute(dir, false)
    }

    /// Move by a raw delta. `(0, 0)` is a no-op returning `Nothing`; diagonal
    /// or longer deltas are rejected before the level is touched.
    pub fn move_by(&self, dx: i32, dy: i32) -> Result<MoveInformation, InvalidMoveRequest> {
        Ok(match Direction::from_delta(dx, dy)? {
            Some(dir) => self.move_worker(dir),
            None => MoveInformation::Nothing,
        })
    }

    pub fn apply_intent(&self, intent: MoveIntent) -> MoveInformation {
        match intent.direction() {
            Some(dir) => self.move_worker(dir),
            None => MoveInformation::Nothing,
        }
    }

    /// Undo the last `count` moves, keeping them in history for `repeat_moves`.
    /// Returns the new moves count.
    pub fn take_back(&self, count: usize) -> Result<usize, HistoryRangeError> {
        let result = self.lock().take_back(count);
        if let Err(err) = &result {
            debug!(level = self.id, error = %err, "take back rejected");
        }
        result
    }

    /// Redo `count` taken-back moves. Returns the new moves count.
    pub fn repeat_moves(&self, count: usize) -> Result<usize, HistoryRangeError> {
        let result = self.lock().repeat_moves(count);
        if let Err(err) = &result {
            debug!(level = self.id, error = %err, "repeat rejected");
        }
        result
    }

    pub fn is_completed(&self) -> bool {
        self.lock().is_completed()
    }

    pub fn worker_location(&self) -> Option<Position> {
        self.read().worker_location()
    }

    pub fn worker_direction(&self) -> WorkerDirection {
        self.lock().worker_direction
    }

    pub fn moves_count(&self) -> usize {
        self.lock().moves_count
    }

    pub fn pushes_count(&self) -> usize {
        self.lock().pushes_count
    }

    /// Length of the stored history, including taken-back moves.
    pub fn moves_history_count(&self) -> usize {
        self.lock().history.len()
    }

    pub fn goals_count(&self) -> usize {
        self.lock().goals
    }

    pub fn boxes_count(&self) -> usize {
        self.lock().boxes
    }

    pub fn boxes_on_goals_count(&self) -> usize {
        self.lock().boxes_on_goals
    }

    /// Moves up to the current position in LURD notation.
    pub fn history_lurd(&self) -> String {
        self.lock().history_lurd()
    }
}

/// Read access to a level while holding its lock.
pub struct LevelView<'a> {
    board: MutexGuard<'a, Board>,
}

impl LevelView<'_> {
    pub fn state(&self) -> LevelState {
        self.board.state
    }

    /// Grid cell at `(row, col)`. Outside the grid reads as Wall; None means
    /// the level is not playable.
    pub fn get_item_at(&self, row: usize, col: usize) -> Option<Cell> {
        self.board.get_item_at(row, col)
    }

    pub fn get_item_with_worker_at(&self, row: usize, col: usize) -> Option<Cell> {
        let cell = self.board.get_item_at(row, col)?;
        if self.board.worker == Position::new(col, row) {
            Some(Cell::Worker)
        } else {
            Some(cell)
        }
    }

    /// Size of the padded grid.
    pub fn grid_size(&self) -> Size {
        self.board.grid.size()
    }

    pub fn worker_location(&self) -> Option<Position> {
        self.board.is_playable().then_some(self.board.worker)
    }

    pub fn worker_direction(&self) -> WorkerDirection {
        self.board.worker_direction
    }

    pub fn moves_count(&self) -> usize {
        self.board.moves_count
    }

    pub fn pushes_count(&self) -> usize {
        self.board.pushes_count
    }

    pub fn is_completed(&self) -> bool {
        self.board.is_completed()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.lock();
        if !board.is_playable() {
            return writeln!(f, "<{}>", board.state);
        }
        for y in board.offset.y..board.offset.y + board.size.height {
            let mut line = String::new();
            for x in board.offset.x..board.offset.x + board.size.width {
                let pos = Position::new(x, y);
                let cell = board.cell(Some(pos));
                let ch = if pos == board.worker {
                    if cell == Cell::Goal { '+' } else { '@' }
                } else {
                    cell.to_char()
                };
                line.push(ch);
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
