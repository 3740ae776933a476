use std::ops::Range;

use gpui::{
    AnyElement, App, Bounds, Context, CursorStyle, Element, ElementId, ElementInputHandler,
    Entity, FontWeight, GlobalElementId, Hsla, Hitbox, HitboxBehavior, InspectorElementId,
    InteractiveElement as _, IntoElement, LayoutId, MouseButton, MouseDownEvent, MouseMoveEvent,
    MouseUpEvent, ParentElement as _, Pixels, Point, Render, SharedString,
    StatefulInteractiveElement as _, Styled as _, StyledText, UnderlineStyle, Window, div, point,
    prelude::FluentBuilder as _, px, size,
};

use crate::render::{Visual, VisualRun, render_block};
use crate::state::{CONTEXT, LineLayoutCache, MiniEditorState};

fn monospace_font_family() -> SharedString {
    #[cfg(target_os = "macos")]
    {
        "Menlo".into()
    }
    #[cfg(target_os = "windows")]
    {
        "Consolas".into()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        "monospace".into()
    }
}

/// One block of the document laid out as a single styled line.
pub(crate) struct BlockLineElement {
    state: Entity<MiniEditorState>,
    row: usize,
    runs: Vec<VisualRun>,
    code: bool,
    text: SharedString,
    styled_text: StyledText,
}

impl BlockLineElement {
    pub(crate) fn new(state: Entity<MiniEditorState>, row: usize, visual: &Visual) -> Self {
        let runs = visual.runs();
        let text: String = runs.iter().map(|run| run.text.as_str()).collect();
        Self {
            state,
            row,
            runs,
            code: visual.is_preformatted(),
            text: text.into(),
            styled_text: StyledText::new(SharedString::default()),
        }
    }

    /// The part of the selection that falls on this row, in row bytes.
    fn selection_in_row(&self, state: &MiniEditorState) -> Option<Range<usize>> {
        let ((start_block, start), (end_block, end)) = state.selection_block_offsets()?;
        if self.row < start_block || self.row > end_block {
            return None;
        }
        let local_start = if self.row == start_block { start } else { 0 };
        let local_end = if self.row == end_block {
            end
        } else {
            self.text.len()
        };
        (local_start < local_end).then_some(local_start..local_end)
    }

    fn caret_in_row(&self, state: &MiniEditorState, window: &Window) -> Option<usize> {
        if !state.focus_handle.is_focused(window) {
            return None;
        }
        let selection = state.editor.selection()?;
        if !selection.is_collapsed() {
            return None;
        }
        let (block, offset) = state.editor.doc().block_offset(&selection.focus)?;
        (block == self.row).then_some(offset)
    }
}

/// Rectangles covering `start..end` on a line that may have wrapped.
fn selection_bounds(
    start: Point<Pixels>,
    end: Point<Pixels>,
    line: Bounds<Pixels>,
    line_height: Pixels,
) -> Vec<Bounds<Pixels>> {
    if start.y == end.y {
        return vec![Bounds::from_corners(start, point(end.x, end.y + line_height))];
    }

    let mut rects = vec![Bounds::from_corners(
        start,
        point(line.right(), start.y + line_height),
    )];
    if end.y > start.y + line_height {
        rects.push(Bounds::from_corners(
            point(line.left(), start.y + line_height),
            point(line.right(), end.y),
        ));
    }
    rects.push(Bounds::from_corners(
        point(line.left(), end.y),
        point(end.x, end.y + line_height),
    ));
    rects
}

fn fill(window: &mut Window, bounds: Bounds<Pixels>, color: Hsla) {
    window.paint_quad(gpui::fill(bounds, color));
}

impl IntoElement for BlockLineElement {
    type Element = Self;

    fn into_element(self) -> Self::Element {
        self
    }
}

impl Element for BlockLineElement {
    type RequestLayoutState = ();
    type PrepaintState = Hitbox;

    fn id(&self) -> Option<ElementId> {
        None
    }

    fn source_location(&self) -> Option<&'static std::panic::Location<'static>> {
        None
    }

    fn request_layout(
        &mut self,
        global_element_id: Option<&GlobalElementId>,
        inspector_id: Option<&InspectorElementId>,
        window: &mut Window,
        cx: &mut App,
    ) -> (LayoutId, Self::RequestLayoutState) {
        let marked = {
            let state = self.state.read(cx);
            state
                .editor
                .selection()
                .and_then(|selection| state.editor.doc().block_offset(&selection.focus))
                .filter(|(block, _)| *block == self.row)
                .and_then(|_| state.ime_marked_range.clone())
                .map(|r| r.start.min(self.text.len())..r.end.min(self.text.len()))
                .filter(|r| r.start < r.end)
        };

        let base_text_style = window.text_style();
        let base_color = base_text_style.color;

        // Empty blocks still need a line box for hit-testing and the caret.
        let render_text: SharedString = if self.text.is_empty() {
            " ".into()
        } else {
            self.text.clone()
        };

        let mut runs = Vec::new();
        let mut cursor = 0usize;
        for run in &self.runs {
            let mut style = base_text_style.clone();
            if run.style.strong {
                style.font_weight = FontWeight::BOLD;
            }
            if run.style.code {
                style.font_family = monospace_font_family();
            }

            let seg_start = cursor;
            let seg_end = cursor + run.text.len();
            cursor = seg_end;

            let Some(marked) = marked.clone() else {
                runs.push(style.to_run(run.text.len()));
                continue;
            };
            if seg_end <= marked.start || seg_start >= marked.end {
                runs.push(style.to_run(run.text.len()));
                continue;
            }

            let before_len = marked.start.saturating_sub(seg_start);
            let mark_len = seg_end
                .min(marked.end)
                .saturating_sub(marked.start.max(seg_start));
            let after_len = seg_end.saturating_sub(marked.end.max(seg_start));

            if before_len > 0 {
                runs.push(style.clone().to_run(before_len));
            }
            if mark_len > 0 {
                let mut marked_style = style.clone();
                marked_style.underline = Some(UnderlineStyle {
                    thickness: px(1.),
                    color: Some(base_color),
                    wavy: false,
                });
                runs.push(marked_style.to_run(mark_len));
            }
            if after_len > 0 {
                runs.push(style.to_run(after_len));
            }
        }

        if runs.is_empty() {
            let mut style = base_text_style;
            if self.code {
                style.font_family = monospace_font_family();
            }
            runs.push(style.to_run(render_text.len()));
        }

        self.styled_text = StyledText::new(render_text).with_runs(runs);
        let (layout_id, _) =
            self.styled_text
                .request_layout(global_element_id, inspector_id, window, cx);
        (layout_id, ())
    }

    fn prepaint(
        &mut self,
        id: Option<&GlobalElementId>,
        inspector_id: Option<&InspectorElementId>,
        bounds: Bounds<Pixels>,
        _: &mut Self::RequestLayoutState,
        window: &mut Window,
        cx: &mut App,
    ) -> Self::PrepaintState {
        self.styled_text
            .prepaint(id, inspector_id, bounds, &mut (), window, cx);

        let text_layout = self.styled_text.layout().clone();
        let row = self.row;
        let text = self.text.clone();
        self.state.update(cx, |state, _| {
            if state.layout_cache.len() <= row {
                state.layout_cache.resize_with(row + 1, || None);
            }
            state.layout_cache[row] = Some(LineLayoutCache {
                bounds,
                text_layout,
                text,
            });
        });

        window.insert_hitbox(bounds, HitboxBehavior::Normal)
    }

    fn paint(
        &mut self,
        global_id: Option<&GlobalElementId>,
        _: Option<&InspectorElementId>,
        bounds: Bounds<Pixels>,
        _: &mut Self::RequestLayoutState,
        prepaint: &mut Self::PrepaintState,
        window: &mut Window,
        cx: &mut App,
    ) {
        let hitbox = prepaint;
        window.set_cursor_style(CursorStyle::IBeam, hitbox);

        self.styled_text
            .paint(global_id, None, bounds, &mut (), &mut (), window, cx);

        let (selection, caret, theme) = {
            let state = self.state.read(cx);
            (
                self.selection_in_row(state),
                self.caret_in_row(state, window),
                state.theme,
            )
        };

        let layout = self.styled_text.layout().clone();
        let line_height = layout.line_height();
        let position = |ix: usize| {
            layout
                .position_for_index(ix)
                .or_else(|| layout.position_for_index(layout.len()))
        };

        if let Some(selection) = selection
            && let (Some(start), Some(end)) = (position(selection.start), position(selection.end))
        {
            for rect in selection_bounds(start, end, bounds, line_height) {
                fill(window, rect, theme.selection);
            }
        }

        if let Some(caret) = caret
            && let Some(pos) = position(caret)
        {
            fill(
                window,
                Bounds::new(pos, size(px(1.5), line_height)),
                theme.caret,
            );
        }
    }
}

pub(crate) struct InputHandlerElement {
    state: Entity<MiniEditorState>,
}

impl InputHandlerElement {
    pub(crate) fn new(state: Entity<MiniEditorState>) -> Self {
        Self { state }
    }
}

impl IntoElement for InputHandlerElement {
    type Element = Self;

    fn into_element(self) -> Self::Element {
        self
    }
}

impl Element for InputHandlerElement {
    type RequestLayoutState = ();
    type PrepaintState = Hitbox;

    fn id(&self) -> Option<ElementId> {
        None
    }

    fn source_location(&self) -> Option<&'static std::panic::Location<'static>> {
        None
    }

    fn request_layout(
        &mut self,
        _global_id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        window: &mut Window,
        cx: &mut App,
    ) -> (LayoutId, Self::RequestLayoutState) {
        let mut style = gpui::Style::default();
        style.size.width = gpui::relative(1.).into();
        style.size.height = gpui::relative(1.).into();
        (window.request_layout(style, [], cx), ())
    }

    fn prepaint(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        bounds: Bounds<Pixels>,
        _state: &mut Self::RequestLayoutState,
        window: &mut Window,
        _cx: &mut App,
    ) -> Self::PrepaintState {
        window.insert_hitbox(bounds, HitboxBehavior::BlockMouseExceptScroll)
    }

    fn paint(
        &mut self,
        _global_id: Option<&GlobalElementId>,
        _inspector_id: Option<&InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request: &mut Self::RequestLayoutState,
        prepaint: &mut Self::PrepaintState,
        window: &mut Window,
        cx: &mut App,
    ) {
        let focus_handle = self.state.read(cx).focus_handle.clone();
        window.handle_input(
            &focus_handle,
            ElementInputHandler::new(bounds, self.state.clone()),
            cx,
        );

        window.set_cursor_style(CursorStyle::IBeam, prepaint);

        window.on_mouse_event({
            let state = self.state.clone();
            let hitbox = prepaint.clone();
            move |event: &MouseDownEvent, phase, window, cx| {
                if !phase.bubble() || event.button != MouseButton::Left {
                    return;
                }
                if !hitbox.is_hovered(window) {
                    return;
                }

                let focus_handle = { state.read(cx).focus_handle.clone() };
                window.focus(&focus_handle);

                state.update(cx, |this, cx| {
                    let Some(focus) = this.point_for_position(event.position) else {
                        return;
                    };
                    let anchor = event
                        .modifiers
                        .shift
                        .then(|| this.editor.selection().map(|s| s.anchor.clone()))
                        .flatten()
                        .unwrap_or_else(|| focus.clone());
                    this.select_points(anchor, focus, cx);
                    this.selecting = true;
                });
            }
        });

        window.on_mouse_event({
            let state = self.state.clone();
            move |event: &MouseMoveEvent, _phase, _window, cx| {
                if event.pressed_button != Some(MouseButton::Left) {
                    return;
                }
                state.update(cx, |this, cx| {
                    if !this.selecting {
                        return;
                    }
                    let Some(focus) = this.point_for_position(event.position) else {
                        return;
                    };
                    let anchor = this
                        .editor
                        .selection()
                        .map(|s| s.anchor.clone())
                        .unwrap_or_else(|| focus.clone());
                    this.select_points(anchor, focus, cx);
                });
            }
        });

        window.on_mouse_event({
            let state = self.state.clone();
            move |event: &MouseUpEvent, _phase, _window, cx| {
                if event.button != MouseButton::Left {
                    return;
                }
                state.update(cx, |this, cx| {
                    this.selecting = false;
                    cx.notify();
                });
            }
        });
    }
}

impl Render for MiniEditorState {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let state = cx.entity().clone();
        let theme = self.theme;

        if !window.is_inspector_picking(cx) && self.take_auto_focus() {
            window.focus(&self.focus_handle);
        }

        let block_count = self.editor.children().len();
        if self.layout_cache.len() != block_count {
            self.layout_cache.resize_with(block_count, || None);
        }
        for cache in &mut self.layout_cache {
            *cache = None;
        }

        let blocks: Vec<AnyElement> = self
            .editor
            .children()
            .iter()
            .enumerate()
            .map(|(row, element)| {
                let visual = render_block(element);
                let line = BlockLineElement::new(state.clone(), row, &visual);
                if visual.is_preformatted() {
                    div()
                        .w_full()
                        .px(px(8.))
                        .py(px(6.))
                        .rounded(px(4.))
                        .bg(theme.code_background)
                        .child(line)
                        .into_any_element()
                } else {
                    div().w_full().child(line).into_any_element()
                }
            })
            .collect();

        div()
            .id(("mini-editor", cx.entity_id()))
            .key_context(CONTEXT)
            .track_focus(&self.focus_handle)
            .tab_index(0)
            .w_full()
            .relative()
            .bg(theme.background)
            .text_color(theme.foreground)
            .border_1()
            .border_color(theme.border)
            .rounded(theme.radius)
            .p(px(12.))
            .on_key_down(cx.listener(Self::on_key_down))
            .when(!window.is_inspector_picking(cx), |this| {
                this.on_action(window.listener_for(&state, Self::backspace))
                    .on_action(window.listener_for(&state, Self::delete))
                    .on_action(window.listener_for(&state, Self::enter))
                    .on_action(window.listener_for(&state, Self::left))
                    .on_action(window.listener_for(&state, Self::right))
                    .on_action(window.listener_for(&state, Self::select_left))
                    .on_action(window.listener_for(&state, Self::select_right))
            })
            .child(div().flex_col().gap(px(6.)).children(blocks))
            .child(
                div()
                    .absolute()
                    .top_0()
                    .left_0()
                    .right_0()
                    .bottom_0()
                    .child(InputHandlerElement::new(state.clone())),
            )
    }
}
