//! Dungeon layout generation
//!
//! A four-exit start room is placed away from the border and the layout grows
//! depth-first along every open exit. Each new room is rejection-sampled from
//! the catalog until it keeps the required exit, stays inside the grid and
//! agrees with every populated neighbor. Whole layouts with too many clear
//! cells are thrown away and rebuilt from scratch.

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rng::DungeonRng;

use super::config::{ConfigError, GenerationConfig, MAX_EMPTY_PERCENT};
use super::grid::{Grid, Position, Violation};
use super::room::{Direction, Exits, NONEMPTY_VARIANTS, RoomVariant};

/// Generation errors (only produced by [`try_generate`])
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("no acceptable layout after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },
}

/// Reasons a stored layout cannot be an accepted one
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("invalid layout size: {0}")]
    Size(#[from] ConfigError),

    #[error("start {start} is not an interior cell of a {height}x{width} grid")]
    StartOutside {
        start: Position,
        height: usize,
        width: usize,
    },

    #[error("start room at {start} is {room}, expected {expected}", expected = RoomVariant::Nesw)]
    StartRoom { start: Position, room: RoomVariant },

    #[error("inconsistent layout: {0}")]
    Inconsistent(Violation),

    #[error("{empty} clear rooms exceeds limit {limit}")]
    TooManyEmpty { empty: usize, limit: usize },
}

/// An accepted layout
///
/// Two results are equal when their grids and start cells match; the attempt
/// count is not compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub grid: Grid,
    /// Cell holding the four-exit start room
    pub start: Position,
    /// Attempts consumed, including the accepted one
    pub attempts: u32,
}

impl PartialEq for GenerationResult {
    fn eq(&self, other: &Self) -> bool {
        self.grid == other.grid && self.start == other.start
    }
}

impl Eq for GenerationResult {}

impl GenerationResult {
    /// Human-readable start line, 1-based
    pub fn start_location_text(&self) -> String {
        format!(
            "Starting row is {} and col is {}",
            self.start.row + 1,
            self.start.col + 1
        )
    }

    pub fn empty_count(&self) -> usize {
        self.grid.count_empty()
    }

    /// Check a layout read from outside the generator
    ///
    /// The grid size must be in range, the start must be an interior cell
    /// holding the four-exit room, every exit must be reciprocated and stay on
    /// the grid, and the clear rooms must fit the most lenient tolerance
    /// ([`MAX_EMPTY_PERCENT`]), since the tolerance used is not stored.
    pub fn check(&self) -> Result<(), LayoutError> {
        let (height, width) = (self.grid.height(), self.grid.width());
        let config = GenerationConfig::new(height, width).with_empty_percent(MAX_EMPTY_PERCENT);
        config.validate()?;

        let start = self.start;
        if !(1..=height - 2).contains(&start.row) || !(1..=width - 2).contains(&start.col) {
            return Err(LayoutError::StartOutside {
                start,
                height,
                width,
            });
        }
        let room = self.grid[start];
        if room != RoomVariant::Nesw {
            return Err(LayoutError::StartRoom { start, room });
        }

        if let Some(violation) = self.grid.violations().into_iter().next() {
            return Err(LayoutError::Inconsistent(violation));
        }

        let empty = self.empty_count();
        let limit = config.max_empty_cells();
        if empty > limit {
            return Err(LayoutError::TooManyEmpty { empty, limit });
        }
        Ok(())
    }
}

/// Exit rules for one cell, fixed while its room is being sampled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraints {
    /// Exits the room must have
    pub required: Exits,
    /// Exits the room must not have
    pub forbidden: Exits,
}

impl Constraints {
    /// Rules for `pos` given the grid edges and its populated neighbors
    pub fn at(grid: &Grid, pos: Position, required: Direction) -> Self {
        let mut constraints = Self {
            required: required.exit(),
            forbidden: Exits::empty(),
        };

        for dir in Direction::ALL {
            match grid.neighbor(pos, dir) {
                None => constraints.forbidden |= dir.exit(),
                Some(next) => {
                    let other = grid[next];
                    if other.is_empty() {
                        continue;
                    }
                    if other.contains_exit(dir.opposite()) {
                        constraints.required |= dir.exit();
                    } else {
                        constraints.forbidden |= dir.exit();
                    }
                }
            }
        }

        constraints
    }

    pub fn allows(&self, room: RoomVariant) -> bool {
        let exits = room.exits();
        exits.contains(self.required) && !exits.intersects(self.forbidden)
    }

    /// At least one catalog room passes
    pub fn satisfiable(&self) -> bool {
        NONEMPTY_VARIANTS.iter().any(|room| self.allows(*room))
    }
}

/// Generate a layout, retrying until the empty-cell tolerance is met
///
/// There is no attempt cap here; see [`try_generate`] for a bounded variant.
///
/// # Panics
///
/// Panics if `config` does not pass [`GenerationConfig::validate`].
pub fn generate(config: &GenerationConfig, rng: &mut DungeonRng) -> GenerationResult {
    if let Err(err) = config.validate() {
        panic!("invalid generation config: {err}");
    }

    let mut attempts: u32 = 0;
    loop {
        attempts = attempts.saturating_add(1);
        if let Some(result) = attempt(config, rng, attempts) {
            return result;
        }
    }
}

/// Like [`generate`], but stops after `config.max_attempts` rejected layouts
pub fn try_generate(
    config: &GenerationConfig,
    rng: &mut DungeonRng,
) -> Result<GenerationResult, GenerationError> {
    config.validate()?;

    let mut attempts: u32 = 0;
    loop {
        if config.max_attempts.is_some_and(|cap| attempts >= cap) {
            return Err(GenerationError::AttemptsExhausted { attempts });
        }
        attempts = attempts.saturating_add(1);
        if let Some(result) = attempt(config, rng, attempts) {
            return Ok(result);
        }
    }
}

fn attempt(
    config: &GenerationConfig,
    rng: &mut DungeonRng,
    number: u32,
) -> Option<GenerationResult> {
    let mut result = build_layout(config, rng);
    let empty = result.empty_count();
    let limit = config.max_empty_cells();

    if empty > limit {
        debug!("attempt {number}: {empty} clear rooms exceeds limit {limit}, regenerating");
        return None;
    }

    result.attempts = number;
    info!(
        "generated {}x{} dungeon in {number} attempt(s), start {}, {empty} clear rooms",
        config.height, config.width, result.start
    );
    Some(result)
}

/// One generation attempt without the tolerance check
pub fn build_layout(config: &GenerationConfig, rng: &mut DungeonRng) -> GenerationResult {
    let mut grid = Grid::new(config.height, config.width);
    let start = choose_start(config.height, config.width, rng);
    grow_from_start(&mut grid, start, rng);

    GenerationResult {
        grid,
        start,
        attempts: 1,
    }
}

/// Random cell at least one step away from every edge
///
/// # Panics
///
/// Panics if `height` or `width` is below 3, since such a grid has no
/// interior cell.
pub fn choose_start(height: usize, width: usize, rng: &mut DungeonRng) -> Position {
    assert!(height >= 3 && width >= 3, "grid {height}x{width} has no interior cell");
    let row = rng.range(1, height - 2);
    let col = rng.range(1, width - 2);
    Position::new(row, col)
}

/// Put the four-exit room at `start` and grow the layout from it
pub fn grow_from_start(grid: &mut Grid, start: Position, rng: &mut DungeonRng) {
    grid[start] = RoomVariant::Nesw;
    trace!("start room at {start}");

    let mut pending = Vec::new();
    push_exits(grid, start, RoomVariant::Nesw, &mut pending);
    expand(grid, pending, rng);
}

/// Place a room at `pos` that opens toward `required`, then grow from it
///
/// Does nothing if `pos` is outside the grid or already holds a room.
pub fn place_room(grid: &mut Grid, required: Direction, pos: Position, rng: &mut DungeonRng) {
    expand(grid, vec![(required, pos)], rng);
}

/// Depth-first growth over an explicit stack
///
/// Exits are pushed in reverse so they pop in N, E, S, W order, and a cell
/// is only checked for emptiness when popped. This visits cells in exactly
/// the order the recursive formulation would.
fn expand(grid: &mut Grid, mut pending: Vec<(Direction, Position)>, rng: &mut DungeonRng) {
    while let Some((required, pos)) = pending.pop() {
        if grid.get(pos) != Some(RoomVariant::Empty) {
            continue;
        }

        let room = pick_room(grid, pos, required, rng);
        grid[pos] = room;
        trace!("placed {room} at {pos}");

        push_exits(grid, pos, room, &mut pending);
    }
}

fn push_exits(
    grid: &Grid,
    pos: Position,
    room: RoomVariant,
    pending: &mut Vec<(Direction, Position)>,
) {
    for dir in Direction::ALL.into_iter().rev() {
        if !room.contains_exit(dir) {
            continue;
        }
        if let Some(next) = grid.neighbor(pos, dir) {
            pending.push((dir.opposite(), next));
        }
    }
}

/// Rejection-sample the catalog until a room fits
fn pick_room(
    grid: &Grid,
    pos: Position,
    required: Direction,
    rng: &mut DungeonRng,
) -> RoomVariant {
    let constraints = Constraints::at(grid, pos, required);
    debug_assert!(
        constraints.satisfiable(),
        "no room fits at {pos}: {constraints:?}"
    );

    loop {
        let candidate = NONEMPTY_VARIANTS[rng.rn2(NONEMPTY_VARIANTS.len() as u32) as usize];
        if constraints.allows(candidate) {
            return candidate;
        }
    }
}
