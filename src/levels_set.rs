use crate::error::{LoadError, NavigationError};
use crate::grid::Size;
use crate::level::{Level, LevelState};
use crate::loader::{self, LevelDefinition};
use std::path::Path;
use tracing::{debug, info};

/// An ordered collection of levels with a "current" cursor.
#[derive(Debug, Default)]
pub struct LevelsSet {
    name: String,
    levels: Vec<Level>,
    current: Option<usize>,
}

impl LevelsSet {
    pub fn new(name: impl Into<String>) -> Self {
        LevelsSet {
            name: name.into(),
            levels: Vec::new(),
            current: None,
        }
    }

    pub fn from_definitions(name: impl Into<String>, definitions: Vec<LevelDefinition>) -> Self {
        let mut set = LevelsSet::new(name);
        for def in definitions {
            set.add_level(Level::new(def.id, def.name, &def.lines));
        }
        set
    }

    /// Build a set from XSB text. Levels are parsed but not initialized.
    pub fn from_text(name: impl Into<String>, contents: &str) -> Self {
        Self::from_definitions(name, loader::parse_levels(contents))
    }

    /// Load an XSB file; the set is named after the file stem.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let definitions = loader::read_levels(path)?;
        let name = path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        info!(set = %name, levels = definitions.len(), "levels loaded");
        Ok(Self::from_definitions(name, definitions))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a level. The first level added becomes current.
    pub fn add_level(&mut self, level: Level) -> usize {
        self.levels.push(level);
        if self.current.is_none() && self.levels.len() == 1 {
            self.current = Some(0);
        }
        self.levels.len() - 1
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn levels(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_level(&self) -> Option<&Level> {
        self.current.and_then(|index| self.levels.get(index))
    }

    /// Initialize every level against a new maximal size. Returns the number
    /// of playable levels.
    pub fn initialize_all(&self, maximal: Size) -> usize {
        for level in &self.levels {
            // Failures are recorded in the level state
            let _ = level.initialize(maximal);
        }
        let playable = self.playable_levels_count();
        info!(
            set = %self.name,
            %maximal,
            playable,
            total = self.levels.len(),
            "levels initialized"
        );
        playable
    }

    pub fn levels_count_by_state(&self, state: LevelState) -> usize {
        self.levels
            .iter()
            .filter(|level| level.state() == state)
            .count()
    }

    pub fn playable_levels_count(&self) -> usize {
        self.levels_count_by_state(LevelState::Playable)
    }

    fn check_navigable(&self, playable_only: bool) -> Result<(), NavigationError> {
        if self.levels.is_empty() {
            return Err(NavigationError::EmptySet);
        }
        if playable_only && self.playable_levels_count() == 0 {
            return Err(NavigationError::NoPlayableLevels);
        }
        Ok(())
    }

    fn fail(&mut self, err: NavigationError) -> NavigationError {
        debug!(set = %self.name, error = %err, "navigation failed");
        self.current = None;
        err
    }

    /// Select level `index`.
    ///
    /// With `playable_only`, this only requires the set to contain some
    /// playable level; the selected level itself is not checked.
    pub fn set_current_by_index(
        &mut self,
        index: usize,
        playable_only: bool,
    ) -> Result<usize, NavigationError> {
        if index >= self.levels.len() {
            let len = self.levels.len();
            return Err(self.fail(NavigationError::IndexOutOfRange { index, len }));
        }
        if let Err(err) = self.check_navigable(playable_only) {
            return Err(self.fail(err));
        }
        self.current = Some(index);
        Ok(index)
    }

    pub fn go_to_previous(&mut self, playable_only: bool) -> Result<usize, NavigationError> {
        self.step(-1, playable_only)
    }

    pub fn go_to_next(&mut self, playable_only: bool) -> Result<usize, NavigationError> {
        self.step(1, playable_only)
    }

    /// Move the cursor by `delta` with wraparound, skipping unplayable levels
    /// if requested. Scans at most one full lap.
    fn step(&mut self, delta: isize, playable_only: bool) -> Result<usize, NavigationError> {
        if let Err(err) = self.check_navigable(playable_only) {
            return Err(self.fail(err));
        }

        let len = self.levels.len() as isize;
        let mut index = self.current.map_or(-1, |index| index as isize);
        for _ in 0..len {
            index += delta;
            if index < 0 {
                index = len - 1;
            } else if index >= len {
                index = 0;
            }
            let candidate = index as usize;
            if !playable_only || self.levels[candidate].is_playable() {
                self.current = Some(candidate);
                return Ok(candidate);
            }
        }

        Err(self.fail(NavigationError::NoPlayableLevels))
    }
}
