//! Software renderers.
//!
//! Every renderer draws into a [`Framebuffer`], an RGBA raster that can be read
//! back as raw bytes or encoded as PNG. Rendering only reads game state, so any
//! number of frames can be produced from one state concurrently.

/// RGBA raster and PNG encoding.
pub mod framebuffer;
/// Colors and basic shapes.
pub mod primitives;
/// First-person raycast view.
pub mod raycast;
/// Egocentric top-down crop around the player.
pub mod schematic;
/// Whole-maze overview map.
pub mod tactical_map;

pub use framebuffer::Framebuffer;
pub use primitives::Color;
pub use raycast::{RaycastRenderer, render_raycast_frame};
pub use schematic::render_local_schematic;
pub use tactical_map::render_tactical_map;
