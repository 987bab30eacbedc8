//! Egocentric top-down crop around the player.
//!
//! The crop is rotated so the player always faces up, with a translucent view
//! cone drawn ahead of the centre. It gives an external image generator a
//! consistent picture of the surroundings.

use super::framebuffer::Framebuffer;
use super::primitives::{Color, fill_polygon, fill_rect};
use crate::game::GameState;
use crate::maze::generator::CellType;
use tiny_skia::Transform;

/// Side of one cell in the schematic, in pixels.
pub const SCHEMATIC_CELL_PX: u32 = 20;
/// Default number of cells shown on each side of the player.
pub const DEFAULT_VIEW_RADIUS: usize = 3;
/// Largest radius drawn; larger requests are clamped to it.
pub const MAX_VIEW_RADIUS: usize = 32;

const BACKGROUND: Color = Color::BLACK;
const WALL: Color = Color::hex(0x1e293b);
const FLOOR: Color = Color::hex(0x94a3b8);
const EXIT: Color = Color::hex(0xef4444);
const VIEW_CONE: Color = Color::rgba(255, 255, 0, 128);

/// Rotates a grid offset a quarter turn counter-clockwise on screen, `turns` times.
fn rotate_offset(mut offset: (i64, i64), turns: u8) -> (i64, i64) {
    for _ in 0..turns {
        offset = (offset.1, -offset.0);
    }
    offset
}

/// Renders the cells within `view_radius` of the player, facing up.
///
/// The image is `(2 * view_radius + 1) * 20` pixels square, with the radius
/// clamped to [`MAX_VIEW_RADIUS`].
pub fn render_local_schematic(state: &GameState, view_radius: usize) -> Framebuffer {
    let view_radius = view_radius.min(MAX_VIEW_RADIUS);
    let side = (view_radius as u32 * 2 + 1) * SCHEMATIC_CELL_PX;
    let mut fb = Framebuffer::new(side, side);
    fb.clear(BACKGROUND);

    let centre = side as f64 / 2.0;
    let cell_px = SCHEMATIC_CELL_PX as f64;
    let reach = view_radius as i64 + 1;
    let (px, py) = (state.player_pos.x as i64, state.player_pos.y as i64);
    let turns = state.player_dir.index();

    for cell in state.maze.cells() {
        let offset = (cell.x as i64 - px, cell.y as i64 - py);
        if offset.0.abs() > reach || offset.1.abs() > reach {
            continue;
        }
        let color = match cell.cell_type {
            CellType::Wall => WALL,
            CellType::Path | CellType::Start => FLOOR,
            CellType::Exit => EXIT,
        };
        let (rx, ry) = rotate_offset(offset, turns);
        let x = centre + rx as f64 * cell_px - cell_px / 2.0;
        let y = centre + ry as f64 * cell_px - cell_px / 2.0;
        fill_rect(&mut fb, x, y, cell_px, cell_px, color);
    }

    let cone = [(0.0, 0.0), (-15.0, -30.0), (15.0, -30.0)];
    let origin = centre as f32;
    fill_polygon(&mut fb, &cone, Transform::from_translate(origin, origin), VIEW_CONE);
    fb
}
