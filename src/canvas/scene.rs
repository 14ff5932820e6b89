//! Derived canvas geometry: node placement, hit-testing and connectors.

use serde::Serialize;

use super::geometry::{Rect, Vec2};
use super::state::CanvasState;
use super::{
    ARROW_HALF_WIDTH, ARROW_LENGTH, CURVE_OFFSET, GRID_COLUMNS, GRID_ORIGIN, GRID_SPACING,
    NODE_SIZE,
};
use crate::models::Category;

/// A category placed in world space.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedNode {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    /// Top-left corner in world coordinates
    pub position: Vec2,
}

impl PlacedNode {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, NODE_SIZE)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Grid slot for the `index`-th node when it has no stored coordinate.
pub fn fallback_position(index: usize) -> Vec2 {
    let column = (index % GRID_COLUMNS) as f64;
    let row = (index / GRID_COLUMNS) as f64;
    Vec2::new(
        GRID_ORIGIN.x + column * GRID_SPACING.x,
        GRID_ORIGIN.y + row * GRID_SPACING.y,
    )
}

/// Place every category, in list order. A missing `x` or `y` falls back to
/// the grid slot of the node's index.
pub fn layout(categories: &[Category]) -> Vec<PlacedNode> {
    categories
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let fallback = fallback_position(index);
            PlacedNode {
                id: category.id.clone(),
                name: category.name.clone(),
                parent_id: category.parent_id.clone(),
                position: Vec2::new(
                    category.x.unwrap_or(fallback.x),
                    category.y.unwrap_or(fallback.y),
                ),
            }
        })
        .collect()
}

/// Topmost node under a world point. Later nodes render above earlier ones.
pub fn hit_test(nodes: &[PlacedNode], world: Vec2) -> Option<&PlacedNode> {
    nodes.iter().rev().find(|n| n.bounds().contains(world))
}

/// Parent→child connector: a cubic curve plus an arrowhead at the child.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub parent_id: String,
    pub child_id: String,
    pub start: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub end: Vec2,
    /// Tip first, then the two base corners
    pub arrow: [Vec2; 3],
}

impl Edge {
    fn between(parent: &PlacedNode, child: &PlacedNode) -> Self {
        let start = parent.bounds().bottom_center();
        let end = child.bounds().top_center();
        Edge {
            parent_id: parent.id.clone(),
            child_id: child.id.clone(),
            start,
            control1: Vec2::new(start.x, start.y + CURVE_OFFSET),
            control2: Vec2::new(end.x, end.y - CURVE_OFFSET),
            end,
            arrow: [
                end,
                Vec2::new(end.x - ARROW_HALF_WIDTH, end.y - ARROW_LENGTH),
                Vec2::new(end.x + ARROW_HALF_WIDTH, end.y - ARROW_LENGTH),
            ],
        }
    }

    /// SVG path data for the curve.
    pub fn svg_path(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        )
    }

    /// SVG polygon points for the arrowhead.
    pub fn svg_arrow(&self) -> String {
        self.arrow
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One connector per node whose parent is present on the canvas.
pub fn edges(nodes: &[PlacedNode]) -> Vec<Edge> {
    nodes
        .iter()
        .filter_map(|child| {
            let parent_id = child.parent_id.as_ref()?;
            let parent = nodes.iter().find(|n| &n.id == parent_id)?;
            Some(Edge::between(parent, child))
        })
        .collect()
}

/// A node as the view draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    pub name: String,
    pub world: Rect,
    pub screen: Rect,
    pub is_root: bool,
    pub selected: bool,
    pub connecting: bool,
    pub editing: bool,
}

/// Everything needed to draw one frame. Edges are in world space; the view
/// applies the viewport transform to the whole edge layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub pan: Vec2,
    pub zoom: f64,
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<Edge>,
}

pub fn scene(state: &CanvasState, categories: &[Category]) -> Scene {
    let placed = layout(categories);
    let viewport = state.viewport();

    let nodes = placed
        .iter()
        .map(|node| RenderNode {
            id: node.id.clone(),
            name: node.name.clone(),
            world: node.bounds(),
            screen: viewport.rect_to_screen(node.bounds()),
            is_root: node.is_root(),
            selected: state.selected() == Some(node.id.as_str()),
            connecting: state.connecting_from() == Some(node.id.as_str()),
            editing: state.renaming().map(|r| r.id.as_str()) == Some(node.id.as_str()),
        })
        .collect();

    Scene {
        pan: viewport.pan,
        zoom: viewport.zoom,
        nodes,
        edges: edges(&placed),
    }
}
