use gpui::*;
use gpui_component::{
    ActiveTheme as _, Selectable as _, Sizable as _, TitleBar,
    button::{Button, ButtonVariants as _},
};
use gpui_mini_editor::{EditorTheme, MiniEditor, MiniEditorEvent, MiniEditorState};
use gpui_mini_editor_core::{Document, EditorValue};
use tracing::{debug, warn};

fn sample_value() -> anyhow::Result<EditorValue> {
    let value = serde_json::json!({
        "schema": "gpui-mini-editor",
        "version": 1,
        "document": {
            "children": [
                {
                    "type": "paragraph",
                    "children": [
                        { "text": "Select some text and press " },
                        { "text": "Ctrl+B", "type": "strong" },
                        { "text": "." }
                    ]
                },
                {
                    "type": "code",
                    "children": [{ "text": "Ctrl+` toggles this block" }]
                }
            ]
        }
    });
    Ok(serde_json::from_value(value)?)
}

pub struct MiniEditorStory {
    editor: Entity<MiniEditorState>,
    json: SharedString,
    _subscriptions: Vec<Subscription>,
}

impl MiniEditorStory {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let editor = cx.new(|cx| {
            let theme = EditorTheme::from(cx.theme());
            MiniEditorState::new(window, cx).theme(theme)
        });
        let json = Self::value_json(&editor.read(cx).editor_value());

        let _subscriptions = vec![cx.subscribe(
            &editor,
            |this, _, event: &MiniEditorEvent, cx| match event {
                MiniEditorEvent::Change(blocks) => {
                    debug!(blocks = blocks.len(), "editor changed");
                    let value = EditorValue::from_document(Document::new(blocks.clone()));
                    this.json = Self::value_json(&value);
                    cx.notify();
                }
            },
        )];

        Self {
            editor,
            json,
            _subscriptions,
        }
    }

    pub fn view(window: &mut Window, cx: &mut App) -> Entity<Self> {
        cx.new(|cx| Self::new(window, cx))
    }

    fn value_json(value: &EditorValue) -> SharedString {
        match value.to_json_pretty() {
            Ok(json) => json.into(),
            Err(err) => {
                warn!("failed to serialize editor value: {err}");
                SharedString::default()
            }
        }
    }

    fn load_sample(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        match sample_value() {
            Ok(value) => self
                .editor
                .update(cx, |editor, cx| editor.load_value(value, cx)),
            Err(err) => warn!("failed to load sample: {err}"),
        }
        self.refocus(window, cx);
    }

    fn refocus(&self, window: &mut Window, cx: &mut Context<Self>) {
        let handle = self.editor.read(cx).focus_handle();
        window.focus(&handle);
    }
}

impl Render for MiniEditorStory {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme().clone();
        let (code_active, strong_active) = {
            let editor = self.editor.read(cx);
            (editor.is_code_block_active(), editor.is_strong_mark_active())
        };

        div()
            .size_full()
            .flex()
            .flex_col()
            .bg(theme.muted)
            .child(TitleBar::new().child(div().text_sm().child("Mini Editor")))
            .child(
                div()
                    .flex()
                    .flex_row()
                    .items_center()
                    .gap(px(6.))
                    .p(px(8.))
                    .bg(theme.background)
                    .border_b_1()
                    .border_color(theme.border)
                    .on_mouse_down(MouseButton::Left, |_, _, cx| cx.stop_propagation())
                    .child(
                        Button::new("toggle-code-block")
                            .label("Code block")
                            .ghost()
                            .small()
                            .selected(code_active)
                            .tooltip("Ctrl+`")
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.editor.update(cx, |ed, cx| ed.toggle_code_block(cx));
                                this.refocus(window, cx);
                            })),
                    )
                    .child(
                        Button::new("toggle-strong")
                            .label("Bold")
                            .ghost()
                            .small()
                            .selected(strong_active)
                            .tooltip("Ctrl+B")
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.editor.update(cx, |ed, cx| ed.toggle_strong_mark(cx));
                                this.refocus(window, cx);
                            })),
                    )
                    .child(
                        Button::new("load-sample")
                            .label("Load sample")
                            .ghost()
                            .small()
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.load_sample(window, cx);
                            })),
                    ),
            )
            .child(
                div()
                    .flex()
                    .flex_row()
                    .flex_1()
                    .gap(px(12.))
                    .p(px(16.))
                    .min_h(px(0.))
                    .child(
                        div()
                            .flex_1()
                            .flex()
                            .flex_col()
                            .gap(px(8.))
                            .child(MiniEditor::new(&self.editor))
                            .child(
                                div()
                                    .text_xs()
                                    .text_color(theme.muted_foreground)
                                    .child("Ctrl+` toggles a code block. Ctrl+B toggles bold."),
                            ),
                    )
                    .child(
                        div()
                            .id("value-preview")
                            .flex_1()
                            .min_w(px(0.))
                            .overflow_y_scroll()
                            .p(px(8.))
                            .rounded(theme.radius)
                            .bg(theme.background)
                            .border_1()
                            .border_color(theme.border)
                            .text_xs()
                            .font_family("monospace")
                            .child(self.json.clone()),
                    ),
            )
    }
}
