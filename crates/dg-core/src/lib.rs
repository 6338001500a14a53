//! dg-core: Grid dungeon layout generation
//!
//! This crate contains the room catalog and the generator with no I/O
//! dependencies. Every random decision goes through a caller-supplied
//! [`DungeonRng`], so a seed fully determines a layout.

pub mod dungeon;

mod rng;

pub use dungeon::{GenerationConfig, GenerationResult, generate, try_generate};
pub use rng::DungeonRng;
