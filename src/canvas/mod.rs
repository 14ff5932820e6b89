//! Admin-only category canvas editor.
//!
//! Categories are drawn as fixed-size boxes on a pannable, zoomable canvas,
//! with a curved connector from each parent to each child. Pointer input is
//! interpreted by [`CanvasState`] into [`CanvasAction`]s, which
//! [`CanvasEditor`] sends to a [`CategoryBackend`].

mod backend;
mod editor;
mod geometry;
mod scene;
mod state;

pub use backend::*;
pub use editor::*;
pub use geometry::*;
pub use scene::*;
pub use state::*;

/// Size of a category box in world units.
pub const NODE_SIZE: Vec2 = Vec2::new(180.0, 60.0);

pub const MIN_ZOOM: f64 = 0.3;
pub const MAX_ZOOM: f64 = 2.0;
pub const ZOOM_STEP: f64 = 0.1;

/// Vertical distance of the connector's control points from its ends.
pub const CURVE_OFFSET: f64 = 40.0;
pub const ARROW_HALF_WIDTH: f64 = 6.0;
pub const ARROW_LENGTH: f64 = 10.0;

// Placement for nodes without stored coordinates
pub const GRID_ORIGIN: Vec2 = Vec2::new(100.0, 100.0);
pub const GRID_COLUMNS: usize = 4;
pub const GRID_SPACING: Vec2 = Vec2::new(220.0, 100.0);

/// World position of the toolbar's "Add node" prompt.
pub const DEFAULT_CREATE_POSITION: Vec2 = Vec2::new(200.0, 200.0);
