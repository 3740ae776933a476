use gpui::{App, Entity, IntoElement, RenderOnce, Window};

use crate::MiniEditorState;

/// A mini editor element bound to a [`MiniEditorState`].
#[derive(IntoElement)]
pub struct MiniEditor {
    state: Entity<MiniEditorState>,
}

impl MiniEditor {
    pub fn new(state: &Entity<MiniEditorState>) -> Self {
        Self {
            state: state.clone(),
        }
    }
}

impl RenderOnce for MiniEditor {
    fn render(self, _window: &mut Window, _cx: &mut App) -> impl IntoElement {
        self.state
    }
}
