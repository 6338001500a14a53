//! Dungeon system
//!
//! Contains the room catalog, the room grid, and layout generation.

mod config;
mod generation;
mod grid;
mod room;

pub use config::{
    ConfigError, DEFAULT_EMPTY_PERCENT, GenerationConfig, MAX_DIMENSION, MAX_EMPTY_PERCENT,
    MIN_DIMENSION, MIN_EMPTY_PERCENT,
};
pub use generation::{
    Constraints, GenerationError, GenerationResult, LayoutError, build_layout, choose_start,
    generate, grow_from_start, place_room, try_generate,
};
pub use grid::{Grid, GridShapeError, Position, Violation};
pub use room::{Direction, Exits, NONEMPTY_VARIANTS, RoomVariant};
