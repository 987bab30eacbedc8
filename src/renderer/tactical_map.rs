//! Top-down overview of the whole maze, shown when the player spends a peek.

use super::framebuffer::Framebuffer;
use super::primitives::{Color, fill_polygon, fill_rect, stroke_rect};
use crate::game::GameState;
use crate::maze::generator::CellType;
use tiny_skia::Transform;

const WALL: Color = Color::hex(0x0f172a);
const EXIT: Color = Color::hex(0xef4444);
const FLOOR: Color = Color::hex(0xcbd5e1);
const GRID_LINE: Color = Color::BLACK;
const PLAYER: Color = Color::hex(0x3b82f6);

/// Draws the full maze into `target`, scaled so the grid spans the target's width,
/// with a triangle marking the player's cell and facing.
///
/// The target is cleared first.
pub fn render_tactical_map(target: &mut Framebuffer, state: &GameState) {
    target.clear(Color::TRANSPARENT);

    let maze = &state.maze;
    let cell_size = target.width() as f64 / maze.size() as f64;

    for cell in maze.cells() {
        let color = match cell.cell_type {
            CellType::Wall => WALL,
            CellType::Exit => EXIT,
            CellType::Path | CellType::Start => FLOOR,
        };
        let (x, y) = (cell.x as f64 * cell_size, cell.y as f64 * cell_size);
        fill_rect(target, x, y, cell_size, cell_size, color);
        stroke_rect(target, x, y, cell_size, cell_size, GRID_LINE);
    }

    let cx = (state.player_pos.x as f64 * cell_size + cell_size / 2.0) as f32;
    let cy = (state.player_pos.y as f64 * cell_size + cell_size / 2.0) as f32;
    let r = (cell_size / 3.0) as f32;
    let marker = [(0.0, -r), (r, r), (-r, r)];
    let transform = Transform::from_rotate(state.player_dir.degrees()).post_translate(cx, cy);
    fill_polygon(target, &marker, transform, PLAYER);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::direction::Direction;
    use crate::maze::generator::{Position, generate_maze_with_rng};
    use rand::{SeedableRng, rngs::StdRng};

    fn state(dir: Direction) -> GameState {
        let generated = generate_maze_with_rng(15, &mut StdRng::seed_from_u64(21));
        let mut state = GameState::new(generated, 3);
        state.player_dir = dir;
        state
    }

    #[test]
    fn test_cells_are_colored() {
        let state = state(Direction::East);
        let mut target = Framebuffer::new(300, 300);
        render_tactical_map(&mut target, &state);

        // 20px cells; sample cell centres away from the player marker.
        assert_eq!(target.pixel(10, 10), WALL);
        assert_eq!(target.pixel(0, 0), GRID_LINE);
        let exit = state.exit;
        assert_eq!(target.pixel(exit.x as u32 * 20 + 10, exit.y as u32 * 20 + 10), EXIT);
    }

    #[test]
    fn test_marker_follows_facing() {
        // Player at (1,1): cell centre (30, 30), marker radius 20/3.
        // A pixel just above centre lies inside the north-pointing marker only.
        let (ahead_x, ahead_y) = (30, 26);

        let mut north = Framebuffer::new(300, 300);
        render_tactical_map(&mut north, &state(Direction::North));
        assert_eq!(north.pixel(ahead_x, ahead_y), PLAYER);

        let mut east = Framebuffer::new(300, 300);
        render_tactical_map(&mut east, &state(Direction::East));
        assert_eq!(east.pixel(ahead_x, ahead_y), FLOOR);

        // Both cover the cell centre.
        assert_eq!(north.pixel(30, 30), PLAYER);
        assert_eq!(east.pixel(30, 30), PLAYER);
    }

    #[test]
    fn test_marker_tracks_position() {
        let mut state = state(Direction::South);
        let open = state.maze.open_neighbours(state.player_pos);
        state.player_pos = open[0];
        let Position { x, y } = state.player_pos;

        let mut target = Framebuffer::new(300, 300);
        render_tactical_map(&mut target, &state);
        assert_eq!(target.pixel(x as u32 * 20 + 10, y as u32 * 20 + 10), PLAYER);
        assert_eq!(target.pixel(30, 30), FLOOR);
    }
}
