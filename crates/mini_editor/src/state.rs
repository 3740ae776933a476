use std::ops::Range;

use gpui::{
    App, Bounds, Context, EntityInputHandler, EventEmitter, FocusHandle, KeyBinding,
    KeyDownEvent, Pixels, Point, SharedString, UTF16Selection, Window, actions, point, px,
};
use gpui_mini_editor_core::{
    Direction, Editor, EditorValue, Element, Point as EditorPoint, Selection,
};
use tracing::warn;

use crate::EditorTheme;
use crate::commands;
use crate::keys::{KeyPress, dispatch_key_down};

pub(crate) const CONTEXT: &str = "MiniEditor";

actions!(
    mini_editor,
    [
        Backspace,
        Delete,
        Enter,
        MoveLeft,
        MoveRight,
        SelectLeft,
        SelectRight,
    ]
);

// Ctrl chords stay unbound: they reach `on_key_down` and the shortcut table.
pub(crate) fn init(cx: &mut App) {
    cx.bind_keys([
        KeyBinding::new("backspace", Backspace, Some(CONTEXT)),
        KeyBinding::new("delete", Delete, Some(CONTEXT)),
        KeyBinding::new("enter", Enter, Some(CONTEXT)),
        KeyBinding::new("left", MoveLeft, Some(CONTEXT)),
        KeyBinding::new("right", MoveRight, Some(CONTEXT)),
        KeyBinding::new("shift-left", SelectLeft, Some(CONTEXT)),
        KeyBinding::new("shift-right", SelectRight, Some(CONTEXT)),
    ]);
}

#[derive(Clone)]
pub(crate) struct LineLayoutCache {
    pub(crate) bounds: Bounds<Pixels>,
    pub(crate) text_layout: gpui::TextLayout,
    pub(crate) text: SharedString,
}

#[derive(Debug, Clone)]
pub enum MiniEditorEvent {
    /// The engine moved; carries the new block list.
    Change(Vec<Element>),
}

pub struct MiniEditorState {
    pub(crate) focus_handle: FocusHandle,
    pub(crate) theme: EditorTheme,
    pub(crate) editor: Editor,

    /// Local copy of the document, replaced wholesale on every change.
    value: Vec<Element>,
    synced_revision: u64,

    pub(crate) layout_cache: Vec<Option<LineLayoutCache>>,
    /// Byte range inside the focused block.
    pub(crate) ime_marked_range: Option<Range<usize>>,
    pub(crate) selecting: bool,
    did_auto_focus: bool,
}

impl EventEmitter<MiniEditorEvent> for MiniEditorState {}

impl MiniEditorState {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let focus_handle = cx.focus_handle().tab_stop(true);
        cx.on_focus(&focus_handle, window, |this, _, cx| {
            this.update_editor(cx, |editor| {
                if editor.selection().is_none()
                    && let Some(start) = editor.doc().start()
                {
                    editor.select(Selection::collapsed(start));
                }
            });
        })
        .detach();

        let editor = Editor::with_default_value();
        Self {
            focus_handle,
            theme: EditorTheme::default(),
            value: editor.children().to_vec(),
            synced_revision: editor.revision(),
            editor,
            layout_cache: Vec::new(),
            ime_marked_range: None,
            selecting: false,
            did_auto_focus: false,
        }
    }

    pub fn theme(mut self, theme: EditorTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn default_value(mut self, value: EditorValue) -> Self {
        self.editor = Editor::new(value.into_document());
        self.value = self.editor.children().to_vec();
        self.synced_revision = self.editor.revision();
        self
    }

    pub fn focus_handle(&self) -> FocusHandle {
        self.focus_handle.clone()
    }

    pub fn value(&self) -> &[Element] {
        &self.value
    }

    pub fn editor_value(&self) -> EditorValue {
        self.editor.value()
    }

    pub fn load_value(&mut self, value: EditorValue, cx: &mut Context<Self>) {
        self.editor = Editor::new(value.into_document());
        self.ime_marked_range = None;
        self.selecting = false;
        self.layout_cache.clear();
        self.value = self.editor.children().to_vec();
        self.synced_revision = self.editor.revision();
        cx.emit(MiniEditorEvent::Change(self.value.clone()));
        cx.notify();
    }

    pub fn is_code_block_active(&self) -> bool {
        commands::is_code_block_active(&self.editor)
    }

    pub fn is_strong_mark_active(&self) -> bool {
        commands::is_strong_mark_active(&self.editor)
    }

    pub fn toggle_code_block(&mut self, cx: &mut Context<Self>) {
        self.update_editor(cx, commands::toggle_code_block);
    }

    pub fn toggle_strong_mark(&mut self, cx: &mut Context<Self>) {
        self.update_editor(cx, commands::toggle_strong_mark);
    }

    /// Runs `f` against the engine, then mirrors any change into `value`.
    fn update_editor(&mut self, cx: &mut Context<Self>, f: impl FnOnce(&mut Editor)) {
        f(&mut self.editor);
        self.sync(cx);
    }

    fn sync(&mut self, cx: &mut Context<Self>) {
        if self.editor.revision() == self.synced_revision {
            return;
        }
        self.synced_revision = self.editor.revision();
        self.value = self.editor.children().to_vec();
        cx.emit(MiniEditorEvent::Change(self.value.clone()));
        cx.notify();
    }

    pub(crate) fn on_key_down(
        &mut self,
        event: &KeyDownEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let key = KeyPress::from_keystroke(&event.keystroke);
        let disposition = dispatch_key_down(&mut self.editor, &key);
        if disposition.is_suppressed() {
            window.prevent_default();
            cx.stop_propagation();
        }
        self.sync(cx);
    }

    fn focus_block(&self) -> usize {
        self.editor
            .selection()
            .and_then(|selection| selection.focus.path.first().copied())
            .unwrap_or(0)
    }

    fn block_text(&self, block: usize) -> String {
        self.editor
            .doc()
            .element(block)
            .map(Element::text)
            .unwrap_or_default()
    }

    /// Selection edges as `(block, byte offset)` pairs in document order.
    pub(crate) fn selection_block_offsets(&self) -> Option<((usize, usize), (usize, usize))> {
        let selection = self.editor.selection()?;
        let (start, end) = selection.edges();
        let doc = self.editor.doc();
        Some((doc.block_offset(start)?, doc.block_offset(end)?))
    }

    /// Selection inside the focused block; collapses to the focus when the
    /// selection spans blocks.
    fn focus_block_range(&self) -> Range<usize> {
        let Some(((start_block, start), (end_block, end))) = self.selection_block_offsets() else {
            return 0..0;
        };
        if start_block == end_block {
            return start..end;
        }
        let focus = self
            .editor
            .selection()
            .and_then(|selection| self.editor.doc().block_offset(&selection.focus))
            .map(|(_, offset)| offset)
            .unwrap_or(0);
        focus..focus
    }

    fn select_in_block(&mut self, block: usize, anchor: usize, focus: usize) {
        let doc = self.editor.doc();
        let (Some(anchor), Some(focus)) = (
            doc.point_at_block_offset(block, anchor),
            doc.point_at_block_offset(block, focus),
        ) else {
            return;
        };
        self.editor.select(Selection::new(anchor, focus));
    }

    pub(crate) fn select_points(
        &mut self,
        anchor: EditorPoint,
        focus: EditorPoint,
        cx: &mut Context<Self>,
    ) {
        self.ime_marked_range = None;
        self.update_editor(cx, |editor| editor.select(Selection::new(anchor, focus)));
    }

    pub(crate) fn row_for_position(&self, position: Point<Pixels>) -> Option<usize> {
        let mut first: Option<usize> = None;
        let mut last: Option<usize> = None;

        for (row, cache) in self.layout_cache.iter().enumerate() {
            let Some(cache) = cache.as_ref() else {
                continue;
            };
            first.get_or_insert(row);
            last = Some(row);
            if position.y >= cache.bounds.top() && position.y <= cache.bounds.bottom() {
                return Some(row);
            }
        }

        let (first, last) = (first?, last?);
        if let Some(first_cache) = self.layout_cache.get(first).and_then(|c| c.as_ref())
            && position.y < first_cache.bounds.top()
        {
            return Some(first);
        }
        Some(last)
    }

    fn offset_in_row(&self, row: usize, position: Point<Pixels>) -> Option<usize> {
        let cache = self.layout_cache.get(row).and_then(|c| c.as_ref())?;
        let local = match cache.text_layout.index_for_position(position) {
            Ok(ix) | Err(ix) => ix,
        };
        Some(local.min(cache.text.len()))
    }

    pub(crate) fn point_for_position(&self, position: Point<Pixels>) -> Option<EditorPoint> {
        let row = self.row_for_position(position)?;
        let offset = self.offset_in_row(row, position)?;
        self.editor.doc().point_at_block_offset(row, offset)
    }

    fn log_failure(action: &str, result: Result<(), gpui_mini_editor_core::ApplyError>) {
        if let Err(err) = result {
            warn!("{action} failed: {err}");
        }
    }

    /// Inserts text, turning each line break into a block split.
    fn insert_lines(editor: &mut Editor, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        for (ix, line) in text.split('\n').enumerate() {
            if ix > 0 {
                Self::log_failure("insert break", editor.insert_break());
            }
            Self::log_failure("insert text", editor.insert_text(line));
        }
    }

    // --- Action handlers ---

    pub(crate) fn backspace(&mut self, _: &Backspace, _: &mut Window, cx: &mut Context<Self>) {
        self.update_editor(cx, |editor| {
            Self::log_failure("delete backward", editor.delete_backward())
        });
    }

    pub(crate) fn delete(&mut self, _: &Delete, _: &mut Window, cx: &mut Context<Self>) {
        self.update_editor(cx, |editor| {
            Self::log_failure("delete forward", editor.delete_forward())
        });
    }

    pub(crate) fn enter(&mut self, _: &Enter, _: &mut Window, cx: &mut Context<Self>) {
        self.update_editor(cx, |editor| {
            Self::log_failure("insert break", editor.insert_break())
        });
    }

    pub(crate) fn left(&mut self, _: &MoveLeft, _: &mut Window, cx: &mut Context<Self>) {
        self.update_editor(cx, |editor| {
            editor.move_selection(Direction::Backward, false)
        });
    }

    pub(crate) fn right(&mut self, _: &MoveRight, _: &mut Window, cx: &mut Context<Self>) {
        self.update_editor(cx, |editor| {
            editor.move_selection(Direction::Forward, false)
        });
    }

    pub(crate) fn select_left(&mut self, _: &SelectLeft, _: &mut Window, cx: &mut Context<Self>) {
        self.update_editor(cx, |editor| {
            editor.move_selection(Direction::Backward, true)
        });
    }

    pub(crate) fn select_right(
        &mut self,
        _: &SelectRight,
        _: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.update_editor(cx, |editor| {
            editor.move_selection(Direction::Forward, true)
        });
    }

    pub(crate) fn take_auto_focus(&mut self) -> bool {
        !std::mem::replace(&mut self.did_auto_focus, true)
    }

    /// Selects `range` (block bytes) in the focused block, or the marked text,
    /// or keeps the current selection.
    fn select_replacement_range(&mut self, range_utf16: Option<Range<usize>>) {
        let block = self.focus_block();
        let text = self.block_text(block);
        let range = range_utf16
            .map(|r| utf16_to_byte(&text, r.start)..utf16_to_byte(&text, r.end))
            .or_else(|| self.ime_marked_range.clone());
        if let Some(range) = range {
            self.select_in_block(block, range.start, range.end);
        }
    }
}

impl EntityInputHandler for MiniEditorState {
    fn text_for_range(
        &mut self,
        range_utf16: Range<usize>,
        adjusted_range: &mut Option<Range<usize>>,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<String> {
        let text = self.block_text(self.focus_block());
        let start = utf16_to_byte(&text, range_utf16.start);
        let end = utf16_to_byte(&text, range_utf16.end);
        adjusted_range.replace(byte_to_utf16_range(&text, start..end));
        Some(text.get(start..end).unwrap_or("").to_string())
    }

    fn selected_text_range(
        &mut self,
        _ignore_disabled_input: bool,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<UTF16Selection> {
        let selection = self.editor.selection()?;
        let text = self.block_text(self.focus_block());
        Some(UTF16Selection {
            range: byte_to_utf16_range(&text, self.focus_block_range()),
            reversed: selection.is_backward(),
        })
    }

    fn marked_text_range(
        &self,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<Range<usize>> {
        let text = self.block_text(self.focus_block());
        self.ime_marked_range
            .as_ref()
            .map(|range| byte_to_utf16_range(&text, range.clone()))
    }

    fn unmark_text(&mut self, _window: &mut Window, _cx: &mut Context<Self>) {
        self.ime_marked_range = None;
    }

    fn replace_text_in_range(
        &mut self,
        range_utf16: Option<Range<usize>>,
        new_text: &str,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.select_replacement_range(range_utf16);
        self.ime_marked_range = None;
        self.update_editor(cx, |editor| {
            if new_text.is_empty() {
                Self::log_failure("delete fragment", editor.delete_fragment());
            } else {
                Self::insert_lines(editor, new_text);
            }
        });
    }

    fn replace_and_mark_text_in_range(
        &mut self,
        range_utf16: Option<Range<usize>>,
        new_text: &str,
        new_selected_range_utf16: Option<Range<usize>>,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.select_replacement_range(range_utf16);

        // Preedit text stays on one line.
        let inserted = new_text.replace(['\r', '\n'], "");
        let mut marked = None;
        self.update_editor(cx, |editor| {
            marked = compose_marked_text(editor, &inserted);
        });
        self.ime_marked_range = marked.as_ref().map(|(_, range)| range.clone());

        if let Some((block, range)) = marked
            && let Some(selected) = new_selected_range_utf16
        {
            let anchor = range.start + utf16_to_byte(&inserted, selected.start);
            let focus = range.start + utf16_to_byte(&inserted, selected.end);
            self.select_in_block(block, anchor, focus);
            self.sync(cx);
        }
    }

    fn bounds_for_range(
        &mut self,
        range_utf16: Range<usize>,
        _bounds: Bounds<Pixels>,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<Bounds<Pixels>> {
        let row = self.focus_block();
        let cache = self.layout_cache.get(row).and_then(|c| c.as_ref())?;
        let start = utf16_to_byte(cache.text.as_str(), range_utf16.start);
        let pos = cache.text_layout.position_for_index(start)?;
        let line_height = cache.text_layout.line_height();
        Some(Bounds::from_corners(
            pos,
            point(pos.x + px(1.0), pos.y + line_height),
        ))
    }

    fn character_index_for_point(
        &mut self,
        point: Point<Pixels>,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<usize> {
        let row = self.focus_block();
        let offset = self.offset_in_row(row, point)?;
        Some(byte_to_utf16(&self.block_text(row), offset))
    }
}

impl gpui::Focusable for MiniEditorState {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

/// Replaces the selection with preedit text and returns the block and byte
/// range it landed in. The range is read back from the caret, since a
/// selection spanning blocks collapses into its first block first.
fn compose_marked_text(editor: &mut Editor, text: &str) -> Option<(usize, Range<usize>)> {
    if text.is_empty() {
        if let Err(err) = editor.delete_fragment() {
            warn!("delete fragment failed: {err}");
        }
        return None;
    }
    if let Err(err) = editor.insert_text(text) {
        warn!("insert text failed: {err}");
        return None;
    }

    let caret = editor.selection()?.focus.clone();
    let (block, end) = editor.doc().block_offset(&caret)?;
    let start = end.checked_sub(text.len())?;
    Some((block, start..end))
}

fn utf16_to_byte(s: &str, utf16_ix: usize) -> usize {
    let mut utf16_count = 0usize;
    for (byte_ix, ch) in s.char_indices() {
        if utf16_count >= utf16_ix {
            return byte_ix;
        }
        utf16_count += ch.len_utf16();
    }
    s.len()
}

fn byte_to_utf16(s: &str, byte_ix: usize) -> usize {
    let byte_ix = byte_ix.min(s.len());
    s.char_indices()
        .take_while(|(ix, _)| *ix < byte_ix)
        .map(|(_, ch)| ch.len_utf16())
        .sum()
}

fn byte_to_utf16_range(s: &str, range: Range<usize>) -> Range<usize> {
    byte_to_utf16(s, range.start)..byte_to_utf16(s, range.end)
}
