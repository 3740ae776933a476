use gpui_mini_editor::{
    is_code_block_active, is_strong_mark_active, toggle_code_block, toggle_strong_mark,
};
use gpui_mini_editor_core::{BlockKind, Document, Editor, Element, Point, Selection, Text};

fn select(editor: &mut Editor, anchor: (Vec<usize>, usize), focus: (Vec<usize>, usize)) {
    editor.select(Selection::new(
        Point::new(anchor.0, anchor.1),
        Point::new(focus.0, focus.1),
    ));
}

fn kinds(editor: &Editor) -> Vec<BlockKind> {
    editor.children().iter().map(|el| el.kind).collect()
}

#[test]
fn code_block_is_active_when_any_selected_block_is_code() {
    let mut editor = Editor::new(Document::new(vec![
        Element::paragraph("one"),
        Element::code("two"),
    ]));
    select(&mut editor, (vec![0, 0], 1), (vec![0, 0], 1));
    assert!(!is_code_block_active(&editor));

    select(&mut editor, (vec![0, 0], 1), (vec![1, 0], 1));
    assert!(is_code_block_active(&editor));

    // Mixed selection counts as active, so the toggle turns everything back.
    toggle_code_block(&mut editor);
    assert_eq!(kinds(&editor), vec![BlockKind::Paragraph, BlockKind::Paragraph]);
}

#[test]
fn toggle_code_block_round_trips() {
    let mut editor = Editor::with_default_value();
    select(&mut editor, (vec![0, 0], 4), (vec![0, 0], 4));

    toggle_code_block(&mut editor);
    assert_eq!(kinds(&editor), vec![BlockKind::Code]);
    assert!(is_code_block_active(&editor));

    toggle_code_block(&mut editor);
    assert_eq!(kinds(&editor), vec![BlockKind::Paragraph]);
    assert_eq!(editor.children()[0].text(), "This is a paragraph");
}

#[test]
fn strong_is_active_only_when_every_selected_leaf_is_strong() {
    let mut editor = Editor::new(Document::new(vec![Element::new(
        BlockKind::Paragraph,
        vec![Text::strong("ab"), Text::plain("cd")],
    )]));
    select(&mut editor, (vec![0, 0], 0), (vec![0, 0], 2));
    assert!(is_strong_mark_active(&editor));

    select(&mut editor, (vec![0, 0], 0), (vec![0, 1], 2));
    assert!(!is_strong_mark_active(&editor));

    toggle_strong_mark(&mut editor);
    let leaves = &editor.children()[0].children;
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].text, "abcd");
    assert!(leaves[0].is_strong());
    assert!(is_strong_mark_active(&editor));
}

#[test]
fn toggle_strong_round_trips_a_partial_selection() {
    let mut editor = Editor::with_default_value();
    select(&mut editor, (vec![0, 0], 5), (vec![0, 0], 7));

    toggle_strong_mark(&mut editor);
    let leaves: Vec<_> = editor.children()[0]
        .children
        .iter()
        .map(|leaf| (leaf.text.as_str(), leaf.is_strong()))
        .collect();
    assert_eq!(
        leaves,
        vec![("This ", false), ("is", true), (" a paragraph", false)]
    );

    toggle_strong_mark(&mut editor);
    let leaves = &editor.children()[0].children;
    assert_eq!(leaves.len(), 1);
    assert!(!leaves[0].is_strong());
}

#[test]
fn toggle_strong_with_a_collapsed_caret_leaves_text_alone() {
    let mut editor = Editor::with_default_value();
    select(&mut editor, (vec![0, 0], 3), (vec![0, 0], 3));
    let before = editor.children().to_vec();

    toggle_strong_mark(&mut editor);
    assert_eq!(editor.children(), before.as_slice());
}

#[test]
fn commands_without_selection_are_no_ops() {
    let mut editor = Editor::with_default_value();
    let revision = editor.revision();

    assert!(!is_code_block_active(&editor));
    assert!(!is_strong_mark_active(&editor));
    toggle_code_block(&mut editor);
    toggle_strong_mark(&mut editor);
    assert_eq!(editor.revision(), revision);
}
