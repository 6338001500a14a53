//! Room grid storage and layout checks

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::room::{Direction, Exits, RoomVariant};

/// Cell coordinate, row-major from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rows handed to [`Grid::try_from`] did not form a rectangle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridShapeError {
    #[error("grid has no rows")]
    NoRows,

    #[error("grid has no columns")]
    NoColumns,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// A rule broken by a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Exit leads off the grid
    Boundary { pos: Position, dir: Direction },
    /// Exit toward a populated neighbor that does not open back
    Unreciprocated { pos: Position, dir: Direction },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Boundary { pos, dir } => {
                write!(f, "room at {pos} has exit {dir} off the grid")
            }
            Violation::Unreciprocated { pos, dir } => {
                write!(f, "room at {pos} has exit {dir} not matched by its neighbor")
            }
        }
    }
}

/// Height × width array of room variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<Vec<RoomVariant>>",
    into = "Vec<Vec<RoomVariant>>"
)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<RoomVariant>,
}

impl Grid {
    /// Allocate a grid with every cell `Empty`
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![RoomVariant::Empty; height * width],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    pub fn get(&self, pos: Position) -> Option<RoomVariant> {
        if self.contains(pos) {
            Some(self.cells[pos.row * self.width + pos.col])
        } else {
            None
        }
    }

    /// Neighbor on side `dir`, or `None` past the edge
    pub fn neighbor(&self, pos: Position, dir: Direction) -> Option<Position> {
        let (dr, dc) = dir.offset();
        let row = pos.row.checked_add_signed(dr)?;
        let col = pos.col.checked_add_signed(dc)?;
        let next = Position::new(row, col);
        self.contains(next).then_some(next)
    }

    /// Sides of `pos` that face off the grid
    pub fn edge_exits(&self, pos: Position) -> Exits {
        Direction::ALL
            .into_iter()
            .filter(|dir| self.neighbor(pos, *dir).is_none())
            .map(Direction::exit)
            .collect()
    }

    /// Number of cells still `Empty`
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_empty()).count()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[RoomVariant]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Every cell with its position, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Position, RoomVariant)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (Position::new(i / self.width, i % self.width), *cell))
    }

    /// Boundary and reciprocity violations, row-major then N, E, S, W
    pub fn violations(&self) -> Vec<Violation> {
        let mut found = Vec::new();
        for (pos, room) in self.iter() {
            for dir in room.exits().directions() {
                match self.neighbor(pos, dir) {
                    None => found.push(Violation::Boundary { pos, dir }),
                    Some(next) => {
                        let other = self[next];
                        if !other.is_empty() && !other.contains_exit(dir.opposite()) {
                            found.push(Violation::Unreciprocated { pos, dir });
                        }
                    }
                }
            }
        }
        found
    }

    /// Fixed-width text table, one line per row
    pub fn render_text(&self) -> String {
        let cell_width = RoomVariant::NAME_WIDTH + 1;
        let mut out = String::with_capacity(self.len() * cell_width + self.height);
        for row in self.rows() {
            for room in row {
                out.push_str(&format!("{:<width$} ", room.name(), width = RoomVariant::NAME_WIDTH));
            }
            out.push('\n');
        }
        out
    }
}

impl Index<Position> for Grid {
    type Output = RoomVariant;

    fn index(&self, pos: Position) -> &RoomVariant {
        assert!(self.contains(pos), "position {pos} outside {}x{} grid", self.height, self.width);
        &self.cells[pos.row * self.width + pos.col]
    }
}

impl IndexMut<Position> for Grid {
    fn index_mut(&mut self, pos: Position) -> &mut RoomVariant {
        assert!(self.contains(pos), "position {pos} outside {}x{} grid", self.height, self.width);
        &mut self.cells[pos.row * self.width + pos.col]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_text())
    }
}

impl TryFrom<Vec<Vec<RoomVariant>>> for Grid {
    type Error = GridShapeError;

    fn try_from(rows: Vec<Vec<RoomVariant>>) -> Result<Self, Self::Error> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).ok_or(GridShapeError::NoRows)?;
        if width == 0 {
            return Err(GridShapeError::NoColumns);
        }

        let mut cells = Vec::with_capacity(height * width);
        for (row, cols) in rows.into_iter().enumerate() {
            if cols.len() != width {
                return Err(GridShapeError::Ragged {
                    row,
                    expected: width,
                    found: cols.len(),
                });
            }
            cells.extend(cols);
        }

        Ok(Self {
            height,
            width,
            cells,
        })
    }
}

impl From<Grid> for Vec<Vec<RoomVariant>> {
    fn from(grid: Grid) -> Self {
        grid.rows().map(<[RoomVariant]>::to_vec).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_clear() {
        let grid = Grid::new(10, 12);
        assert_eq!(grid.len(), 120);
        assert_eq!(grid.count_empty(), 120);
        assert_eq!(grid.rows().count(), 10);
        assert!(grid.violations().is_empty());
    }

    #[test]
    fn test_neighbor_stops_at_edges() {
        let grid = Grid::new(10, 10);
        let corner = Position::new(0, 0);
        assert_eq!(grid.neighbor(corner, Direction::North), None);
        assert_eq!(grid.neighbor(corner, Direction::West), None);
        assert_eq!(grid.neighbor(corner, Direction::East), Some(Position::new(0, 1)));
        assert_eq!(grid.neighbor(corner, Direction::South), Some(Position::new(1, 0)));

        let far = Position::new(9, 9);
        assert_eq!(grid.neighbor(far, Direction::South), None);
        assert_eq!(grid.neighbor(far, Direction::East), None);
    }

    #[test]
    fn test_edge_exits() {
        let grid = Grid::new(10, 10);
        assert_eq!(grid.edge_exits(Position::new(0, 0)), Exits::NORTH | Exits::WEST);
        assert_eq!(grid.edge_exits(Position::new(9, 4)), Exits::SOUTH);
        assert_eq!(grid.edge_exits(Position::new(5, 5)), Exits::empty());
    }

    #[test]
    fn test_get_out_of_bounds() {
        let grid = Grid::new(10, 10);
        assert_eq!(grid.get(Position::new(10, 0)), None);
        assert_eq!(grid.get(Position::new(3, 3)), Some(RoomVariant::Empty));
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds_panics() {
        let grid = Grid::new(10, 10);
        let _ = grid[Position::new(0, 10)];
    }

    #[test]
    fn test_violations() {
        let mut grid = Grid::new(10, 10);
        grid[Position::new(0, 0)] = RoomVariant::N;
        grid[Position::new(5, 5)] = RoomVariant::E;
        grid[Position::new(5, 6)] = RoomVariant::S;

        let found = grid.violations();
        assert!(found.contains(&Violation::Boundary {
            pos: Position::new(0, 0),
            dir: Direction::North
        }));
        assert!(found.contains(&Violation::Unreciprocated {
            pos: Position::new(5, 5),
            dir: Direction::East
        }));
        assert_eq!(found.len(), 2);

        grid[Position::new(5, 6)] = RoomVariant::Sw;
        grid[Position::new(0, 0)] = RoomVariant::E;
        grid[Position::new(0, 1)] = RoomVariant::W;
        assert!(grid.violations().is_empty());
    }

    #[test]
    fn test_render_pads_columns() {
        let mut grid = Grid::new(10, 10);
        grid[Position::new(0, 0)] = RoomVariant::Es;
        let text = grid.render_text();
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("ES   CLR  CLR  "));
        assert_eq!(first.len(), 10 * (RoomVariant::NAME_WIDTH + 1));
        assert_eq!(text.lines().count(), 10);
    }

    #[test]
    fn test_rows_round_trip_through_serde() {
        let mut grid = Grid::new(10, 11);
        grid[Position::new(2, 3)] = RoomVariant::Nesw;
        let json = serde_json::to_string(&grid).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![RoomVariant::Empty; 3], vec![RoomVariant::Empty; 2]];
        assert_eq!(
            Grid::try_from(rows),
            Err(GridShapeError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(Grid::try_from(Vec::<Vec<RoomVariant>>::new()), Err(GridShapeError::NoRows));
        assert_eq!(Grid::try_from(vec![Vec::<RoomVariant>::new()]), Err(GridShapeError::NoColumns));
    }
}
