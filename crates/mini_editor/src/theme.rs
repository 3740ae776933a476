use gpui::{Hsla, Pixels, hsla, px};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorTheme {
    pub background: Hsla,
    pub border: Hsla,
    pub radius: Pixels,
    pub foreground: Hsla,
    pub selection: Hsla,
    pub caret: Hsla,
    pub code_background: Hsla,
}

impl Default for EditorTheme {
    fn default() -> Self {
        Self {
            background: hsla(0., 0., 1., 1.),
            border: hsla(0., 0., 0.88, 1.),
            radius: px(8.),
            foreground: hsla(0., 0., 0.12, 1.),
            selection: hsla(0.58, 1.0, 0.5, 0.25),
            caret: hsla(0., 0., 0.12, 1.),
            code_background: hsla(0., 0., 0.94, 1.),
        }
    }
}

impl From<&gpui_component::Theme> for EditorTheme {
    fn from(theme: &gpui_component::Theme) -> Self {
        Self {
            background: theme.background,
            border: theme.border,
            radius: theme.radius,
            foreground: theme.foreground,
            selection: theme.selection,
            caret: theme.foreground,
            code_background: theme.muted,
        }
    }
}
