//! First-person view by grid raycasting.
//!
//! One ray is cast per screen column from the centre of the player's cell. Rays
//! walk the grid with a DDA (digital differential analyzer), stepping to whichever
//! of the next vertical or horizontal grid line is closer, until they enter a
//! wall or exit cell. The wall strip drawn for the column is inversely
//! proportional to the perpendicular distance to the hit, which keeps straight
//! walls straight (no fisheye).
//!
//! # Coordinate System
//! - x grows east, y grows south, one unit per cell
//! - the player stands at `(x + 0.5, y + 0.5)`
//! - the camera plane points to the viewer's right and is 0.66 long, about 66°
//!   of horizontal field of view

use super::framebuffer::Framebuffer;
use super::primitives::{Color, vertical_gradient, vertical_line};
use crate::error::Result;
use crate::game::GameState;
use crate::maze::generator::{CellType, Maze, Position};

/// Grid steps a ray may take before it is treated as hitting a distant wall.
pub const MAX_RAY_STEPS: usize = 25;

/// Default view width.
pub const DEFAULT_WIDTH: u32 = 640;
/// Default view height.
pub const DEFAULT_HEIGHT: u32 = 360;

const CEILING_TOP: Color = Color::hex(0x020617);
const CEILING_HORIZON: Color = Color::hex(0x0f172a);
const FLOOR_HORIZON: Color = Color::hex(0x1e293b);
const FLOOR_NEAR: Color = Color::hex(0x334155);

const WALL_LIGHT: Color = Color::hex(0x475569);
const WALL_SHADOW: Color = Color::hex(0x334155);
const EXIT_LIGHT: Color = Color::hex(0xef4444);
const EXIT_SHADOW: Color = Color::hex(0xb91c1c);

/// Which kind of grid line a ray crossed last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// A vertical grid line (the ray moved along x).
    Vertical = 0,
    /// A horizontal grid line (the ray moved along y).
    Horizontal = 1,
}

/// Where and what a ray hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// `Wall` for walls, out-of-bounds cells, and exhausted rays; `Exit` for the exit.
    pub cell_type: CellType,
    /// Which kind of grid line was crossed last.
    pub side: Side,
    /// Distance along the camera's forward axis.
    pub perp_distance: f64,
    /// Grid cell where the ray stopped. May lie outside the maze.
    pub map: (i64, i64),
}

impl RayHit {
    /// Flat shade for the face that was hit.
    pub fn color(&self) -> Color {
        match (self.cell_type, self.side) {
            (CellType::Exit, Side::Vertical) => EXIT_LIGHT,
            (CellType::Exit, Side::Horizontal) => EXIT_SHADOW,
            (_, Side::Vertical) => WALL_LIGHT,
            (_, Side::Horizontal) => WALL_SHADOW,
        }
    }
}

/// Walks a ray from `origin` along `dir` through `maze`.
///
/// Leaving the grid counts as hitting a wall. If no blocking cell is found within
/// [`MAX_RAY_STEPS`], the ray reports a wall at the last cell it reached.
pub fn cast_ray(maze: &Maze, origin: (f64, f64), dir: (f64, f64)) -> RayHit {
    let (pos_x, pos_y) = origin;
    let (ray_x, ray_y) = dir;
    let mut map_x = pos_x.floor() as i64;
    let mut map_y = pos_y.floor() as i64;

    let delta_x = if ray_x == 0.0 { 1e30 } else { (1.0 / ray_x).abs() };
    let delta_y = if ray_y == 0.0 { 1e30 } else { (1.0 / ray_y).abs() };

    let (step_x, mut side_x) = if ray_x < 0.0 {
        (-1, (pos_x - map_x as f64) * delta_x)
    } else {
        (1, (map_x as f64 + 1.0 - pos_x) * delta_x)
    };
    let (step_y, mut side_y) = if ray_y < 0.0 {
        (-1, (pos_y - map_y as f64) * delta_y)
    } else {
        (1, (map_y as f64 + 1.0 - pos_y) * delta_y)
    };

    let size = maze.size() as i64;
    let mut side = Side::Vertical;
    let mut cell_type = CellType::Wall;

    for _ in 0..MAX_RAY_STEPS {
        if side_x < side_y {
            side_x += delta_x;
            map_x += step_x;
            side = Side::Vertical;
        } else {
            side_y += delta_y;
            map_y += step_y;
            side = Side::Horizontal;
        }

        if map_x < 0 || map_y < 0 || map_x >= size || map_y >= size {
            cell_type = CellType::Wall;
            break;
        }
        let here = maze.cell_type(Position::new(map_x as usize, map_y as usize));
        if here.blocks_ray() {
            cell_type = here;
            break;
        }
    }

    let perp_distance = match side {
        Side::Vertical => side_x - delta_x,
        Side::Horizontal => side_y - delta_y,
    };

    RayHit {
        cell_type,
        side,
        perp_distance,
        map: (map_x, map_y),
    }
}

/// Height in pixels of the wall strip for a hit at `perp_distance`:
/// `floor(frame_height / perp_distance)`.
pub fn strip_height(frame_height: u32, perp_distance: f64) -> i64 {
    let line = (frame_height as f64 / perp_distance.max(f64::MIN_POSITIVE)).floor();
    line.min(i64::MAX as f64 / 4.0) as i64
}

/// Vertical extent `[top, bottom)` of a centred strip, clamped to the frame.
pub fn strip_bounds(frame_height: u32, line_height: i64) -> (i64, i64) {
    let h = frame_height as i64;
    let top = (h - line_height).div_euclid(2);
    let bottom = top + line_height;
    (top.max(0), bottom.min(h))
}

/// Renders first-person frames of a fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaycastRenderer {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl Default for RaycastRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl RaycastRenderer {
    /// A renderer producing `width` x `height` frames.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Renders the view from the player's cell and facing.
    pub fn render(&self, state: &GameState) -> Framebuffer {
        let mut fb = Framebuffer::new(self.width, self.height);
        self.render_into(&mut fb, state);
        fb
    }

    /// Renders into an existing buffer, using the buffer's own size.
    pub fn render_into(&self, fb: &mut Framebuffer, state: &GameState) {
        let (width, height) = (fb.width(), fb.height());
        let half = height / 2;
        vertical_gradient(fb, 0, half, CEILING_TOP, CEILING_HORIZON);
        vertical_gradient(fb, half, height, FLOOR_HORIZON, FLOOR_NEAR);

        let origin = (
            state.player_pos.x as f64 + 0.5,
            state.player_pos.y as f64 + 0.5,
        );
        let (dir_x, dir_y) = state.player_dir.vector();
        let (plane_x, plane_y) = state.player_dir.camera_plane();

        for x in 0..width {
            let camera_x = 2.0 * x as f64 / width as f64 - 1.0;
            let ray = (dir_x + plane_x * camera_x, dir_y + plane_y * camera_x);
            let hit = cast_ray(&state.maze, origin, ray);

            let line = strip_height(height, hit.perp_distance);
            let (top, bottom) = strip_bounds(height, line);
            vertical_line(fb, x as i64, top, bottom, hit.color());
        }
    }

    /// Renders and encodes as PNG.
    pub fn render_png(&self, state: &GameState) -> Result<Vec<u8>> {
        self.render(state).encode_png()
    }
}

/// Renders a frame of the given size. See [`RaycastRenderer`].
pub fn render_raycast_frame(state: &GameState, width: u32, height: u32) -> Framebuffer {
    RaycastRenderer::new(width, height).render(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::direction::Direction;
    use crate::maze::generator::generate_maze_with_rng;
    use rand::{SeedableRng, rngs::StdRng};

    fn corridor(row: &str) -> Maze {
        let size = row.len();
        let wall = "#".repeat(size);
        let mut text = String::new();
        for y in 0..size {
            text.push_str(if y == 1 { row } else { &wall });
            text.push('\n');
        }
        Maze::from_text(&text).unwrap().maze
    }

    fn state_in(maze: Maze, x: usize, y: usize, dir: Direction) -> GameState {
        GameState::at(maze, Position::new(x, y), dir)
    }

    #[test]
    fn test_cast_ray_down_corridor() {
        let maze = corridor("#S  ###");
        let hit = cast_ray(&maze, (1.5, 1.5), (1.0, 0.0));
        assert_eq!(hit.cell_type, CellType::Wall);
        assert_eq!(hit.side, Side::Vertical);
        assert_eq!(hit.map, (4, 1));
        assert_eq!(hit.perp_distance, 2.5);
    }

    #[test]
    fn test_cast_ray_horizontal_face() {
        let maze = corridor("#S  ###");
        let hit = cast_ray(&maze, (1.5, 1.5), (0.0, -1.0));
        assert_eq!(hit.side, Side::Horizontal);
        assert_eq!(hit.map, (1, 0));
        assert_eq!(hit.perp_distance, 0.5);
    }

    #[test]
    fn test_cast_ray_stops_at_exit() {
        let maze = corridor("#S  *##");
        let hit = cast_ray(&maze, (1.5, 1.5), (1.0, 0.0));
        assert_eq!(hit.cell_type, CellType::Exit);
        assert_eq!(hit.color(), EXIT_LIGHT);
    }

    #[test]
    fn test_step_budget_reports_distant_wall() {
        let row = format!("#S{}#", " ".repeat(29));
        let maze = corridor(&row);
        let hit = cast_ray(&maze, (1.5, 1.5), (1.0, 0.0));
        assert_eq!(hit.cell_type, CellType::Wall);
        assert_eq!(hit.map, (1 + MAX_RAY_STEPS as i64, 1));
        assert_eq!(hit.perp_distance, MAX_RAY_STEPS as f64 - 0.5);
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        // Open border cell: the ray leaves the grid.
        let maze = corridor("#S     ");
        let hit = cast_ray(&maze, (1.5, 1.5), (1.0, 0.0));
        assert_eq!(hit.cell_type, CellType::Wall);
        assert_eq!(hit.map, (7, 1));
    }

    /// Centre column strip height is floor(height / distance).
    #[test]
    fn test_center_column_strip_height() {
        let state = state_in(corridor("#S  ###"), 1, 1, Direction::East);
        let fb = RaycastRenderer::default().render(&state);

        let expected = (360.0_f64 / 2.5).floor() as u32;
        assert_eq!(expected, 144);
        let column: Vec<Color> = (0..360).map(|y| fb.pixel(320, y)).collect();
        let wall_rows = column.iter().filter(|&&c| c == WALL_LIGHT).count() as u32;
        assert_eq!(wall_rows, expected);
        assert_eq!(column[107], CEILING_TOP.lerp(CEILING_HORIZON, 107.0 / 180.0));
        assert_eq!(column[108], WALL_LIGHT);
        assert_eq!(column[251], WALL_LIGHT);
        assert_ne!(column[252], WALL_LIGHT);
    }

    #[test]
    fn test_adjacent_wall_fills_column_with_shadow_shade() {
        let state = state_in(corridor("#S  ###"), 1, 1, Direction::North);
        let fb = RaycastRenderer::default().render(&state);
        assert!((0..360).all(|y| fb.pixel(320, y) == WALL_SHADOW));
    }

    #[test]
    fn test_background_gradients() {
        // Past the ray budget the strip is a few pixels tall, leaving sky and floor visible.
        let row = format!("#S{}#", " ".repeat(29));
        let state = state_in(corridor(&row), 1, 1, Direction::East);
        let fb = RaycastRenderer::new(64, 100).render(&state);
        assert_eq!(fb.pixel(32, 0), CEILING_TOP);
        assert_eq!(fb.pixel(32, 48), WALL_LIGHT);
        assert_eq!(fb.pixel(32, 51), WALL_LIGHT);
        assert_eq!(fb.pixel(32, 52), FLOOR_HORIZON.lerp(FLOOR_NEAR, 2.0 / 50.0));
        assert_eq!(fb.pixel(32, 99), FLOOR_HORIZON.lerp(FLOOR_NEAR, 49.0 / 50.0));
    }

    #[test]
    fn test_render_is_deterministic() {
        let generated = generate_maze_with_rng(15, &mut StdRng::seed_from_u64(11));
        let state = GameState::new(generated, 3);
        let renderer = RaycastRenderer::default();
        let a = renderer.render(&state);
        let b = renderer.render(&state);
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(renderer.render_png(&state).unwrap(), renderer.render_png(&state).unwrap());
    }

    #[test]
    fn test_strip_bounds_clamp() {
        assert_eq!(strip_bounds(360, 720), (0, 360));
        assert_eq!(strip_bounds(360, 144), (108, 252));
        assert_eq!(strip_bounds(360, 0), (180, 180));
        assert_eq!(strip_height(360, 1.5), 240);
    }
}
