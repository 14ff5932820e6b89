//! Interaction state of one canvas editor.
//!
//! Pure and synchronous: input methods mutate the state and return the
//! [`CanvasAction`] (if any) the editor must send to the backend.

use super::geometry::{Vec2, Viewport};
use super::scene::{hit_test, PlacedNode};
use super::DEFAULT_CREATE_POSITION;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A write the editor issues against the category backend.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasAction {
    MoveNode { id: String, position: Vec2 },
    SetParent { child: String, parent: String },
    ClearParent { id: String },
    Rename { id: String, name: String },
    Create { name: String, position: Vec2 },
    Delete { id: String },
}

#[derive(Debug, Clone, PartialEq)]
struct Drag {
    id: String,
    grab_offset: Vec2,
}

/// Inline rename in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct RenameBuffer {
    pub id: String,
    pub text: String,
}

/// Open "new category" prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePrompt {
    pub position: Vec2,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct CanvasState {
    viewport: Viewport,
    /// Pointer position minus pan at the press that started panning.
    pan_anchor: Option<Vec2>,
    drag: Option<Drag>,
    selected: Option<String>,
    rename: Option<RenameBuffer>,
    connect_from: Option<String>,
    create_prompt: Option<CreatePrompt>,
    error: Option<String>,
}

impl CanvasState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn connecting_from(&self) -> Option<&str> {
        self.connect_from.as_deref()
    }

    pub fn renaming(&self) -> Option<&RenameBuffer> {
        self.rename.as_ref()
    }

    pub fn create_prompt(&self) -> Option<&CreatePrompt> {
        self.create_prompt.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    pub fn dragging(&self) -> Option<&str> {
        self.drag.as_ref().map(|d| d.id.as_str())
    }

    // ==================== POINTER ====================

    /// Button press at a canvas-local screen point.
    pub fn pointer_down(
        &mut self,
        screen: Vec2,
        button: PointerButton,
        nodes: &[PlacedNode],
    ) -> Option<CanvasAction> {
        let world = self.viewport.to_world(screen);

        let Some(node) = hit_test(nodes, world) else {
            self.selected = None;
            self.connect_from = None;
            if button == PointerButton::Primary {
                self.pan_anchor = Some(screen - self.viewport.pan);
            }
            return None;
        };

        self.selected = Some(node.id.clone());

        if let Some(source) = self.connect_from.take() {
            if source != node.id {
                return Some(CanvasAction::SetParent {
                    child: node.id.clone(),
                    parent: source,
                });
            }
        }

        self.drag = Some(Drag {
            id: node.id.clone(),
            grab_offset: world - node.position,
        });
        None
    }

    /// Pointer motion. Pans while the background is held; while a node is
    /// held every call yields a position write.
    pub fn pointer_move(&mut self, screen: Vec2) -> Option<CanvasAction> {
        if let Some(anchor) = self.pan_anchor {
            self.viewport.pan = screen - anchor;
        }

        let drag = self.drag.as_ref()?;
        let world = self.viewport.to_world(screen);
        Some(CanvasAction::MoveNode {
            id: drag.id.clone(),
            position: world - drag.grab_offset,
        })
    }

    pub fn pointer_up(&mut self) {
        self.pan_anchor = None;
        self.drag = None;
    }

    /// Double-click: rename a node, or open the create prompt on background.
    pub fn double_click(&mut self, screen: Vec2, nodes: &[PlacedNode]) {
        let world = self.viewport.to_world(screen);
        match hit_test(nodes, world) {
            Some(node) => self.begin_rename(node),
            None => self.open_create_prompt(world),
        }
    }

    // ==================== RENAME ====================

    pub fn begin_rename(&mut self, node: &PlacedNode) {
        self.rename = Some(RenameBuffer {
            id: node.id.clone(),
            text: node.name.clone(),
        });
    }

    pub fn set_rename_text(&mut self, text: impl Into<String>) {
        if let Some(rename) = self.rename.as_mut() {
            rename.text = text.into();
        }
    }

    /// Enter or blur. Blank text is a no-op and leaves the edit open.
    pub fn commit_rename(&self) -> Option<CanvasAction> {
        let rename = self.rename.as_ref()?;
        let name = rename.text.trim();
        if name.is_empty() {
            return None;
        }
        Some(CanvasAction::Rename {
            id: rename.id.clone(),
            name: name.to_string(),
        })
    }

    /// Escape.
    pub fn cancel_rename(&mut self) {
        self.rename = None;
    }

    // ==================== CREATE ====================

    pub fn open_create_prompt(&mut self, position: Vec2) {
        self.create_prompt = Some(CreatePrompt {
            position,
            name: String::new(),
        });
    }

    /// Toolbar "Add node".
    pub fn open_add_node(&mut self) {
        self.open_create_prompt(DEFAULT_CREATE_POSITION);
    }

    pub fn set_create_name(&mut self, name: impl Into<String>) {
        if let Some(prompt) = self.create_prompt.as_mut() {
            prompt.name = name.into();
        }
    }

    /// Blank names are a no-op and leave the prompt open.
    pub fn confirm_create(&self) -> Option<CanvasAction> {
        let prompt = self.create_prompt.as_ref()?;
        let name = prompt.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(CanvasAction::Create {
            name: name.to_string(),
            position: prompt.position,
        })
    }

    pub fn cancel_create(&mut self) {
        self.create_prompt = None;
    }

    // ==================== SELECTION TOOLBAR ====================

    /// Arm the selected node as the parent for the next node press.
    pub fn arm_connect(&mut self) -> bool {
        match &self.selected {
            Some(id) => {
                self.connect_from = Some(id.clone());
                true
            }
            None => false,
        }
    }

    pub fn cancel_connect(&mut self) {
        self.connect_from = None;
    }

    pub fn disconnect_selected(&self) -> Option<CanvasAction> {
        let id = self.selected.clone()?;
        Some(CanvasAction::ClearParent { id })
    }

    pub fn delete_selected(&self) -> Option<CanvasAction> {
        let id = self.selected.clone()?;
        Some(CanvasAction::Delete { id })
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    // ==================== BACKEND RESULTS ====================

    /// Bookkeeping after `action` succeeded.
    pub fn action_succeeded(&mut self, action: &CanvasAction) {
        match action {
            CanvasAction::Rename { id, .. } => {
                if self.rename.as_ref().is_some_and(|r| &r.id == id) {
                    self.rename = None;
                }
            }
            CanvasAction::Create { .. } => self.create_prompt = None,
            CanvasAction::Delete { id } => {
                if self.selected.as_deref() == Some(id.as_str()) {
                    self.selected = None;
                }
            }
            CanvasAction::MoveNode { .. }
            | CanvasAction::SetParent { .. }
            | CanvasAction::ClearParent { .. } => {}
        }
    }

    /// Replace the banner message.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, x: f64, y: f64) -> PlacedNode {
        PlacedNode {
            id: id.to_string(),
            name: format!("Node {}", id),
            parent_id: None,
            position: Vec2::new(x, y),
        }
    }

    fn nodes() -> Vec<PlacedNode> {
        vec![node("a", 0.0, 0.0), node("b", 300.0, 0.0)]
    }

    #[test]
    fn test_background_press_pans() {
        let mut state = CanvasState::new();
        state.selected = Some("a".to_string());
        state.connect_from = Some("a".to_string());

        let action = state.pointer_down(Vec2::new(500.0, 500.0), PointerButton::Primary, &nodes());
        assert!(action.is_none());
        assert!(state.selected().is_none());
        assert!(state.connecting_from().is_none());
        assert!(state.is_panning());

        assert!(state.pointer_move(Vec2::new(530.0, 480.0)).is_none());
        assert_eq!(state.viewport().pan, Vec2::new(30.0, -20.0));

        state.pointer_up();
        state.pointer_move(Vec2::new(900.0, 900.0));
        assert_eq!(state.viewport().pan, Vec2::new(30.0, -20.0));
    }

    #[test]
    fn test_secondary_press_on_background_does_not_pan() {
        let mut state = CanvasState::new();
        state.pointer_down(Vec2::new(500.0, 500.0), PointerButton::Secondary, &nodes());
        assert!(!state.is_panning());
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let mut state = CanvasState::new();
        state.viewport_mut().pan = Vec2::new(10.0, 10.0);
        state.viewport_mut().set_zoom(2.0);

        // world (20, 15) is inside node "a"
        let press = state.viewport().to_screen(Vec2::new(20.0, 15.0));
        assert!(state.pointer_down(press, PointerButton::Primary, &nodes()).is_none());
        assert_eq!(state.selected(), Some("a"));
        assert_eq!(state.dragging(), Some("a"));

        let to = state.viewport().to_screen(Vec2::new(70.0, 115.0));
        let action = state.pointer_move(to).unwrap();
        match action {
            CanvasAction::MoveNode { id, position } => {
                assert_eq!(id, "a");
                assert!((position.x - 50.0).abs() < 1e-9);
                assert!((position.y - 100.0).abs() < 1e-9);
            }
            other => panic!("unexpected action {:?}", other),
        }

        state.pointer_up();
        assert!(state.pointer_move(to).is_none());
    }

    #[test]
    fn test_connect_sets_parent_without_dragging() {
        let mut state = CanvasState::new();
        state.pointer_down(Vec2::new(10.0, 10.0), PointerButton::Primary, &nodes());
        state.pointer_up();
        assert!(state.arm_connect());
        assert_eq!(state.connecting_from(), Some("a"));

        let action = state.pointer_down(Vec2::new(310.0, 10.0), PointerButton::Primary, &nodes());
        assert_eq!(
            action,
            Some(CanvasAction::SetParent {
                child: "b".to_string(),
                parent: "a".to_string(),
            })
        );
        assert!(state.connecting_from().is_none());
        assert!(state.dragging().is_none());
        assert_eq!(state.selected(), Some("b"));
    }

    #[test]
    fn test_connect_to_self_cancels() {
        let mut state = CanvasState::new();
        state.pointer_down(Vec2::new(10.0, 10.0), PointerButton::Primary, &nodes());
        state.pointer_up();
        state.arm_connect();

        let action = state.pointer_down(Vec2::new(20.0, 20.0), PointerButton::Primary, &nodes());
        assert!(action.is_none());
        assert!(state.connecting_from().is_none());
    }

    #[test]
    fn test_arm_connect_needs_selection() {
        let mut state = CanvasState::new();
        assert!(!state.arm_connect());
        assert!(state.disconnect_selected().is_none());
        assert!(state.delete_selected().is_none());

        state.pointer_down(Vec2::new(10.0, 10.0), PointerButton::Primary, &nodes());
        assert!(state.arm_connect());
        state.cancel_connect();
        assert!(state.connecting_from().is_none());
    }

    #[test]
    fn test_rename_flow() {
        let mut state = CanvasState::new();
        state.double_click(Vec2::new(310.0, 10.0), &nodes());
        assert_eq!(state.renaming().unwrap().text, "Node b");

        state.set_rename_text("   ");
        assert!(state.commit_rename().is_none());
        assert!(state.renaming().is_some());

        state.set_rename_text("  Vision  ");
        let action = state.commit_rename().unwrap();
        assert_eq!(
            action,
            CanvasAction::Rename {
                id: "b".to_string(),
                name: "Vision".to_string(),
            }
        );
        state.action_succeeded(&action);
        assert!(state.renaming().is_none());

        state.double_click(Vec2::new(10.0, 10.0), &nodes());
        state.cancel_rename();
        assert!(state.renaming().is_none());
    }

    #[test]
    fn test_create_prompt_at_world_point() {
        let mut state = CanvasState::new();
        state.viewport_mut().pan = Vec2::new(100.0, 0.0);
        state.viewport_mut().set_zoom(0.5);

        state.double_click(Vec2::new(600.0, 400.0), &nodes());
        let prompt = state.create_prompt().unwrap();
        assert_eq!(prompt.position, Vec2::new(1000.0, 800.0));

        assert!(state.confirm_create().is_none());
        state.set_create_name(" Audio ");
        let action = state.confirm_create().unwrap();
        assert_eq!(
            action,
            CanvasAction::Create {
                name: "Audio".to_string(),
                position: Vec2::new(1000.0, 800.0),
            }
        );
        state.action_succeeded(&action);
        assert!(state.create_prompt().is_none());

        state.open_add_node();
        assert_eq!(state.create_prompt().unwrap().position, DEFAULT_CREATE_POSITION);
        state.cancel_create();
        assert!(state.create_prompt().is_none());
    }

    #[test]
    fn test_delete_success_clears_selection() {
        let mut state = CanvasState::new();
        state.pointer_down(Vec2::new(10.0, 10.0), PointerButton::Primary, &nodes());
        let action = state.delete_selected().unwrap();
        assert_eq!(action, CanvasAction::Delete { id: "a".to_string() });
        state.action_succeeded(&action);
        assert!(state.selected().is_none());
    }

    #[test]
    fn test_error_banner_replaces_and_dismisses() {
        let mut state = CanvasState::new();
        state.set_error("first");
        state.set_error("second");
        assert_eq!(state.error(), Some("second"));
        state.dismiss_error();
        assert!(state.error().is_none());
    }
}
