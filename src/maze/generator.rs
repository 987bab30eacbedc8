//! Maze generation using a randomized recursive backtracker.
//!
//! The grid is an odd-sized square whose odd-coordinate cells are "rooms". The
//! builder walks the room lattice depth-first with an explicit stack, carving the
//! neighbour room and the corridor cell between them as it advances and popping the
//! stack when it gets stuck. The result is a perfect maze: every open cell is
//! reachable from the start and there is exactly one simple path between any two.
//!
//! # Examples
//!
//! ```rust
//! use delve::maze::generator::{MazeBuilder, generate_maze_with_rng};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! // One-shot generation
//! let mut rng = StdRng::seed_from_u64(7);
//! let generated = generate_maze_with_rng(15, &mut rng);
//! assert_eq!(generated.start.x, 1);
//!
//! // Step-by-step generation
//! let mut builder = MazeBuilder::new(9, StdRng::seed_from_u64(7));
//! while !builder.is_complete() {
//!     builder.step();
//! }
//! let generated = builder.finish();
//! assert_eq!(generated.maze.size(), 9);
//! ```

use rand::prelude::*;
use tracing::debug;

/// Default side length of a generated maze.
pub const MAZE_SIZE: usize = 15;

/// Offsets to the four neighbouring rooms, two cells away.
const ROOM_STEPS: [(isize, isize); 4] = [(0, -2), (2, 0), (0, 2), (-2, 0)];

/// A grid coordinate. `x` is the column, `y` the row.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Column index
    pub x: usize,
    /// Row index
    pub y: usize,
}

impl Position {
    /// Creates a new Position with the given coordinates
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the position shifted by `(dx, dy)`, or `None` if it would leave
    /// the non-negative quadrant.
    pub fn offset(self, dx: isize, dy: isize) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }

    /// Manhattan distance between two positions.
    pub fn manhattan(self, other: Self) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// What occupies a grid cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    /// Solid rock.
    #[default]
    Wall,
    /// Carved floor.
    Path,
    /// Where the player begins.
    Start,
    /// Leaving through here wins.
    Exit,
}

impl CellType {
    /// Whether the player may stand on this cell.
    pub fn is_open(self) -> bool {
        !matches!(self, CellType::Wall)
    }

    /// Whether a cast ray stops at this cell.
    pub fn blocks_ray(self) -> bool {
        matches!(self, CellType::Wall | CellType::Exit)
    }
}

/// A single grid cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
    /// What occupies the cell.
    pub cell_type: CellType,
    /// Only meaningful while the maze is being carved.
    pub visited: bool,
}

/// A square grid of cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    size: usize,
    cells: Vec<Cell>,
}

impl Maze {
    /// Creates a maze of the given side length with every cell a wall.
    pub fn new(size: usize) -> Self {
        let cells = (0..size * size)
            .map(|i| Cell {
                x: i % size,
                y: i / size,
                cell_type: CellType::Wall,
                visited: false,
            })
            .collect();
        Self { size, cells }
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether `pos` lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x < self.size && pos.y < self.size
    }

    /// Returns the cell at `pos`.
    ///
    /// # Panics
    /// If `pos` is outside the grid.
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[pos.y * self.size + pos.x]
    }

    fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        &mut self.cells[pos.y * self.size + pos.x]
    }

    /// Returns the cell at `pos`, or `None` outside the grid.
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.in_bounds(pos).then(|| self.cell(pos))
    }

    /// Returns the type of the cell at `pos`.
    ///
    /// # Panics
    /// If `pos` is outside the grid.
    pub fn cell_type(&self, pos: Position) -> CellType {
        self.cell(pos).cell_type
    }

    /// Overwrites the type of the cell at `pos`.
    pub fn set_cell_type(&mut self, pos: Position, cell_type: CellType) {
        self.cell_mut(pos).cell_type = cell_type;
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Iterates over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size)
    }

    /// Positions of all cells of the given type, in row-major order.
    pub fn positions_of(&self, cell_type: CellType) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|c| c.cell_type == cell_type)
            .map(|c| Position::new(c.x, c.y))
            .collect()
    }

    /// Open orthogonal neighbours of `pos`.
    pub fn open_neighbours(&self, pos: Position) -> Vec<Position> {
        [(0, -1), (1, 0), (0, 1), (-1, 0)]
            .into_iter()
            .filter_map(|(dx, dy)| pos.offset(dx, dy))
            .filter(|&n| self.get(n).is_some_and(|c| c.cell_type.is_open()))
            .collect()
    }

    /// Builds a maze from a grid of cell types. Rows must all have `size` entries.
    pub(crate) fn from_types(types: Vec<Vec<CellType>>) -> Self {
        let size = types.len();
        let mut maze = Self::new(size);
        for (y, row) in types.into_iter().enumerate() {
            for (x, cell_type) in row.into_iter().enumerate() {
                maze.set_cell_type(Position::new(x, y), cell_type);
            }
        }
        maze
    }
}

/// The output of a completed generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMaze {
    /// The carved grid.
    pub maze: Maze,
    /// The room the player starts in.
    pub start: Position,
    /// The exit cell.
    pub exit: Position,
    /// Number of corridor cells carved between rooms.
    pub corridors: usize,
}

/// Step-wise recursive backtracker.
///
/// Call [`MazeBuilder::step`] until [`MazeBuilder::is_complete`] returns true, or
/// use [`MazeBuilder::build`] to run the whole generation in one go.
pub struct MazeBuilder<R: Rng> {
    maze: Maze,
    stack: Vec<Position>,
    rng: R,
    start: Position,
    rooms_total: usize,
    rooms_carved: usize,
    corridors: usize,
}

impl<R: Rng> MazeBuilder<R> {
    /// Creates a builder for a `size`×`size` maze.
    ///
    /// `size` must be odd and at least 5. This is not validated in release builds;
    /// the configuration layer rejects bad sizes before they reach here.
    pub fn new(size: usize, rng: R) -> Self {
        debug_assert!(size >= 5, "maze size must be at least 5, got {size}");
        debug_assert!(size % 2 == 1, "maze size must be odd, got {size}");

        let mut maze = Maze::new(size);
        let start = Position::new(1, 1);
        let cell = maze.cell_mut(start);
        cell.cell_type = CellType::Path;
        cell.visited = true;

        let rooms_per_side = (size.saturating_sub(1)) / 2;
        Self {
            maze,
            stack: vec![start],
            rng,
            start,
            rooms_total: rooms_per_side * rooms_per_side,
            rooms_carved: 1,
            corridors: 0,
        }
    }

    /// Performs one step of generation.
    ///
    /// Returns true if a new room was carved, false if the step backtracked or the
    /// maze is already complete.
    pub fn step(&mut self) -> bool {
        let Some(&current) = self.stack.last() else {
            return false;
        };

        let mut steps = ROOM_STEPS;
        steps.shuffle(&mut self.rng);

        let size = self.maze.size;
        for (dx, dy) in steps {
            let Some(next) = current.offset(dx, dy) else {
                continue;
            };
            if next.x == 0 || next.y == 0 || next.x >= size - 1 || next.y >= size - 1 {
                continue;
            }
            if self.maze.cell(next).visited {
                continue;
            }

            let between = Position::new((current.x + next.x) / 2, (current.y + next.y) / 2);
            for pos in [next, between] {
                let cell = self.maze.cell_mut(pos);
                cell.cell_type = CellType::Path;
                cell.visited = true;
            }
            self.stack.push(next);
            self.rooms_carved += 1;
            self.corridors += 1;
            return true;
        }

        self.stack.pop();
        false
    }

    /// Checks if maze generation is complete
    pub fn is_complete(&self) -> bool {
        self.stack.is_empty()
    }

    /// Returns (rooms carved, total rooms)
    pub fn progress(&self) -> (usize, usize) {
        (self.rooms_carved, self.rooms_total)
    }

    /// Returns the generation progress as a ratio (0.0 to 1.0)
    pub fn progress_ratio(&self) -> f32 {
        if self.rooms_total == 0 {
            1.0
        } else {
            self.rooms_carved as f32 / self.rooms_total as f32
        }
    }

    /// Read-only view of the partially carved maze.
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Runs generation to completion.
    pub fn build(mut self) -> GeneratedMaze {
        while !self.is_complete() {
            self.step();
        }
        self.finish()
    }

    /// Marks start and exit and returns the maze. Any remaining steps are run first.
    pub fn finish(mut self) -> GeneratedMaze {
        while !self.is_complete() {
            self.step();
        }

        // Carving bookkeeping only; the finished maze compares by layout.
        for cell in &mut self.maze.cells {
            cell.visited = false;
        }

        self.maze.set_cell_type(self.start, CellType::Start);
        let exit = farthest_path_cell(&self.maze, self.start);
        self.maze.set_cell_type(exit, CellType::Exit);

        debug!(
            size = self.maze.size,
            rooms = self.rooms_carved,
            corridors = self.corridors,
            exit_x = exit.x,
            exit_y = exit.y,
            "maze generated"
        );

        GeneratedMaze {
            maze: self.maze,
            start: self.start,
            exit,
            corridors: self.corridors,
        }
    }
}

/// Picks the `Path` cell with the greatest Manhattan distance from `start`.
///
/// Interior cells are scanned row by row; the first strict maximum wins. This is a
/// cheap stand-in for the farthest room, not a shortest-path search. Falls back to
/// `(1, 1)` when there is no other path cell.
pub fn farthest_path_cell(maze: &Maze, start: Position) -> Position {
    let size = maze.size();
    let mut best_distance = 0;
    let mut best = Position::new(1, 1);

    for y in 1..size.saturating_sub(1) {
        for x in 1..size - 1 {
            let pos = Position::new(x, y);
            if maze.cell_type(pos) != CellType::Path {
                continue;
            }
            let distance = pos.manhattan(start);
            if distance > best_distance {
                best_distance = distance;
                best = pos;
            }
        }
    }

    best
}

/// Generates a maze of the given size using the thread RNG.
pub fn generate_maze(size: usize) -> GeneratedMaze {
    generate_maze_with_rng(size, &mut thread_rng())
}

/// Generates a maze with a caller-provided RNG, for reproducible output.
pub fn generate_maze_with_rng<R: Rng + ?Sized>(size: usize, rng: &mut R) -> GeneratedMaze {
    MazeBuilder::new(size, rng).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use std::collections::{HashSet, VecDeque};

    fn reachable_from(maze: &Maze, start: Position) -> HashSet<Position> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(pos) = queue.pop_front() {
            for n in maze.open_neighbours(pos) {
                if seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen
    }

    fn open_cells(maze: &Maze) -> Vec<Position> {
        maze.cells()
            .filter(|c| c.cell_type.is_open())
            .map(|c| Position::new(c.x, c.y))
            .collect()
    }

    /// Every open cell must be reachable from the start.
    #[test]
    fn test_connectivity() {
        for size in [5, 7, 9, 15, 21] {
            for seed in 0..10 {
                let generated = generate_maze_with_rng(size, &mut StdRng::seed_from_u64(seed));
                let reachable = reachable_from(&generated.maze, generated.start);
                for pos in open_cells(&generated.maze) {
                    assert!(
                        reachable.contains(&pos),
                        "size {size} seed {seed}: {pos:?} unreachable"
                    );
                }
            }
        }
    }

    /// Exactly one start and one exit are placed.
    #[test]
    fn test_single_start_and_exit() {
        for seed in 0..20 {
            let generated = generate_maze_with_rng(15, &mut StdRng::seed_from_u64(seed));
            let starts = generated.maze.positions_of(CellType::Start);
            let exits = generated.maze.positions_of(CellType::Exit);
            assert_eq!(starts, vec![Position::new(1, 1)]);
            assert_eq!(exits, vec![generated.exit]);
            assert_ne!(generated.exit, generated.start);
        }
    }

    /// Open cells form a tree under 4-adjacency.
    #[test]
    fn test_spanning_tree() {
        for seed in 0..10 {
            let generated = generate_maze_with_rng(11, &mut StdRng::seed_from_u64(seed));
            let maze = &generated.maze;
            let open = open_cells(maze);

            // Count each undirected adjacency once (right and down neighbours).
            let edges: usize = open
                .iter()
                .map(|&p| {
                    [(1, 0), (0, 1)]
                        .into_iter()
                        .filter_map(|(dx, dy)| p.offset(dx, dy))
                        .filter(|&n| maze.get(n).is_some_and(|c| c.cell_type.is_open()))
                        .count()
                })
                .sum();
            assert_eq!(edges, open.len() - 1);

            // Rooms connected by carved corridors: rooms - 1 == corridors.
            let rooms = open.iter().filter(|p| p.x % 2 == 1 && p.y % 2 == 1).count();
            assert_eq!(rooms, 25);
            assert_eq!(generated.corridors, rooms - 1);
        }
    }

    /// Every room of the odd lattice gets visited.
    #[test]
    fn test_all_rooms_carved() {
        let mut builder = MazeBuilder::new(13, StdRng::seed_from_u64(3));
        while !builder.is_complete() {
            builder.step();
        }
        assert_eq!(builder.progress(), (36, 36));
        assert_eq!(builder.progress_ratio(), 1.0);
    }

    /// Carving marks are cleared, so a finished maze equals its own reload.
    #[test]
    fn test_finished_maze_has_no_visited_cells() {
        let mut builder = MazeBuilder::new(11, StdRng::seed_from_u64(8));
        builder.step();
        assert!(builder.maze().cells().any(|c| c.visited));

        let generated = builder.finish();
        assert!(generated.maze.cells().all(|c| !c.visited));
    }

    /// Borders stay walls.
    #[test]
    fn test_border_is_wall() {
        let generated = generate_maze_with_rng(15, &mut StdRng::seed_from_u64(99));
        for cell in generated.maze.cells() {
            if cell.x == 0 || cell.y == 0 || cell.x == 14 || cell.y == 14 {
                assert_eq!(cell.cell_type, CellType::Wall, "{cell:?}");
            }
        }
    }

    /// The exit is the first path cell at maximum Manhattan distance.
    #[test]
    fn test_exit_is_first_manhattan_maximum() {
        for seed in 0..20 {
            let generated = generate_maze_with_rng(15, &mut StdRng::seed_from_u64(seed));
            let maze = &generated.maze;
            let best = maze
                .cells()
                .filter(|c| c.cell_type.is_open() && c.cell_type != CellType::Start)
                .map(|c| Position::new(c.x, c.y).manhattan(generated.start))
                .max()
                .unwrap();
            assert_eq!(generated.exit.manhattan(generated.start), best);

            let first = maze
                .cells()
                .find(|c| {
                    c.cell_type.is_open()
                        && c.cell_type != CellType::Start
                        && Position::new(c.x, c.y).manhattan(generated.start) == best
                })
                .unwrap();
            assert_eq!(generated.exit, Position::new(first.x, first.y));
        }
    }

    /// The same seed yields the same maze.
    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_maze_with_rng(21, &mut StdRng::seed_from_u64(1234));
        let b = generate_maze_with_rng(21, &mut StdRng::seed_from_u64(1234));
        assert_eq!(a, b);
    }

    /// In a 5x5 maze all four rooms are carved, so the exit is the far corner room.
    #[test]
    fn test_five_by_five() {
        for seed in 0..30 {
            let generated = generate_maze_with_rng(5, &mut StdRng::seed_from_u64(seed));
            let open = open_cells(&generated.maze);
            assert!(open.len() <= 9);
            // 4 rooms + 3 corridors
            assert_eq!(open.len(), 7);
            assert_eq!(generated.exit, Position::new(3, 3));
        }
    }

    #[test]
    fn test_farthest_path_cell_falls_back_to_start() {
        let mut maze = Maze::new(5);
        maze.set_cell_type(Position::new(1, 1), CellType::Start);
        assert_eq!(
            farthest_path_cell(&maze, Position::new(1, 1)),
            Position::new(1, 1)
        );
    }

    #[test]
    fn test_position_offset() {
        let p = Position::new(0, 3);
        assert_eq!(p.offset(-1, 0), None);
        assert_eq!(p.offset(2, -1), Some(Position::new(2, 2)));
    }
}
