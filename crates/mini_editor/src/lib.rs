mod commands;
mod editor;
mod element;
mod keys;
mod render;
mod state;
mod theme;

pub use commands::*;
pub use editor::*;
pub use keys::*;
pub use render::*;
pub use state::{
    Backspace, Delete, Enter, MiniEditorEvent, MiniEditorState, MoveLeft, MoveRight, SelectLeft,
    SelectRight,
};
pub use theme::EditorTheme;

use gpui::App;

pub fn init(cx: &mut App) {
    state::init(cx);
}
