use gpui_mini_editor_core::{
    ApplyError, BlockKind, Direction, Document, Editor, Element, Op, Point, Selection, Text,
    Transaction,
};

fn texts(editor: &Editor) -> Vec<String> {
    editor.children().iter().map(Element::text).collect()
}

fn caret(editor: &Editor) -> Point {
    let selection = editor.selection().expect("selection");
    assert!(selection.is_collapsed());
    selection.focus.clone()
}

#[test]
fn insert_text_at_caret() {
    let mut editor = Editor::with_default_value();
    editor.select(Selection::collapsed(Point::new(vec![0, 0], 4)));
    let before = editor.revision();

    editor.insert_text("!").unwrap();
    assert_eq!(texts(&editor), vec!["This! is a paragraph"]);
    assert_eq!(caret(&editor), Point::new(vec![0, 0], 5));
    assert!(editor.revision() > before);
}

#[test]
fn insert_text_replaces_an_expanded_selection() {
    let mut editor = Editor::new(Document::new(vec![Element::paragraph("hello world")]));
    editor.select(Selection::new(
        Point::new(vec![0, 0], 6),
        Point::new(vec![0, 0], 11),
    ));

    editor.insert_text("there").unwrap();
    assert_eq!(texts(&editor), vec!["hello there"]);
    assert_eq!(caret(&editor), Point::new(vec![0, 0], 11));
}

#[test]
fn insert_break_splits_block_and_keeps_its_type() {
    let mut editor = Editor::new(Document::new(vec![Element::code("let x = 1;")]));
    editor.select(Selection::collapsed(Point::new(vec![0, 0], 5)));

    editor.insert_break().unwrap();
    assert_eq!(texts(&editor), vec!["let x", " = 1;"]);
    assert_eq!(editor.children()[1].kind, BlockKind::Code);
    assert_eq!(caret(&editor), Point::new(vec![1, 0], 0));
}

#[test]
fn insert_break_inside_formatted_text() {
    let mut editor = Editor::new(Document::new(vec![Element::new(
        BlockKind::Paragraph,
        vec![Text::plain("ab"), Text::strong("cd"), Text::plain("ef")],
    )]));
    editor.select(Selection::collapsed(Point::new(vec![0, 1], 1)));

    editor.insert_break().unwrap();
    assert_eq!(texts(&editor), vec!["abc", "def"]);
    assert_eq!(
        editor.children()[1].children,
        vec![Text::strong("d"), Text::plain("ef")]
    );
    assert_eq!(caret(&editor), Point::new(vec![1, 0], 0));
}

#[test]
fn delete_backward_removes_one_char() {
    let mut editor = Editor::new(Document::new(vec![Element::paragraph("héllo")]));
    editor.select(Selection::collapsed(Point::new(vec![0, 0], 3)));

    editor.delete_backward().unwrap();
    assert_eq!(texts(&editor), vec!["hllo"]);
    assert_eq!(caret(&editor), Point::new(vec![0, 0], 1));
}

#[test]
fn delete_backward_at_block_start_merges_into_previous() {
    let mut editor = Editor::new(Document::new(vec![
        Element::paragraph("ab"),
        Element::code("cd"),
    ]));
    editor.select(Selection::collapsed(Point::new(vec![1, 0], 0)));

    editor.delete_backward().unwrap();
    assert_eq!(texts(&editor), vec!["abcd"]);
    assert_eq!(editor.children()[0].kind, BlockKind::Paragraph);
    assert_eq!(caret(&editor), Point::new(vec![0, 0], 2));
}

#[test]
fn delete_backward_drops_an_empty_previous_block() {
    let mut editor = Editor::new(Document::new(vec![
        Element::paragraph(""),
        Element::code("cd"),
    ]));
    editor.select(Selection::collapsed(Point::new(vec![1, 0], 0)));

    editor.delete_backward().unwrap();
    assert_eq!(texts(&editor), vec!["cd"]);
    assert_eq!(editor.children()[0].kind, BlockKind::Code);
    assert_eq!(caret(&editor), Point::new(vec![0, 0], 0));
}

#[test]
fn delete_backward_at_document_start_is_a_noop() {
    let mut editor = Editor::with_default_value();
    editor.select(Selection::collapsed(Point::new(vec![0, 0], 0)));
    let before = editor.revision();

    editor.delete_backward().unwrap();
    assert_eq!(texts(&editor), vec!["This is a paragraph"]);
    assert_eq!(editor.revision(), before);
}

#[test]
fn delete_forward_joins_the_next_block() {
    let mut editor = Editor::new(Document::new(vec![
        Element::paragraph("ab"),
        Element::paragraph("cd"),
    ]));
    editor.select(Selection::collapsed(Point::new(vec![0, 0], 2)));

    editor.delete_forward().unwrap();
    assert_eq!(texts(&editor), vec!["abcd"]);
    assert_eq!(caret(&editor), Point::new(vec![0, 0], 2));

    editor.delete_forward().unwrap();
    assert_eq!(texts(&editor), vec!["abd"]);
}

#[test]
fn delete_fragment_across_blocks() {
    let mut editor = Editor::new(Document::new(vec![
        Element::paragraph("one"),
        Element::code("two"),
        Element::new(
            BlockKind::Paragraph,
            vec![Text::strong("thr"), Text::plain("ee")],
        ),
    ]));
    editor.select(Selection::new(
        Point::new(vec![2, 1], 1),
        Point::new(vec![0, 0], 1),
    ));

    editor.delete_fragment().unwrap();
    assert_eq!(texts(&editor), vec!["oe"]);
    assert_eq!(editor.children()[0].kind, BlockKind::Paragraph);
    assert_eq!(caret(&editor), Point::new(vec![0, 0], 1));
}

#[test]
fn deleting_a_whole_formatted_leaf_keeps_the_caret_in_place() {
    let mut editor = Editor::new(Document::new(vec![Element::new(
        BlockKind::Paragraph,
        vec![Text::plain("a"), Text::strong("bc"), Text::plain("de")],
    )]));
    editor.select(Selection::new(
        Point::new(vec![0, 1], 0),
        Point::new(vec![0, 1], 2),
    ));

    editor.delete_fragment().unwrap();
    assert_eq!(editor.children()[0].children, vec![Text::plain("ade")]);
    assert_eq!(caret(&editor), Point::new(vec![0, 0], 1));
}

#[test]
fn move_selection_walks_across_blocks() {
    let mut editor = Editor::new(Document::new(vec![
        Element::paragraph("a"),
        Element::paragraph("b"),
    ]));
    editor.select(Selection::collapsed(Point::new(vec![0, 0], 1)));

    editor.move_selection(Direction::Forward, false);
    assert_eq!(caret(&editor), Point::new(vec![1, 0], 0));

    editor.move_selection(Direction::Backward, false);
    assert_eq!(caret(&editor), Point::new(vec![0, 0], 1));

    editor.move_selection(Direction::Backward, true);
    let selection = editor.selection().unwrap();
    assert_eq!(selection.anchor, Point::new(vec![0, 0], 1));
    assert_eq!(selection.focus, Point::new(vec![0, 0], 0));

    editor.move_selection(Direction::Forward, false);
    assert_eq!(caret(&editor), Point::new(vec![0, 0], 1));
}

#[test]
fn removing_every_block_leaves_an_empty_paragraph_and_no_selection() {
    let mut editor = Editor::with_default_value();
    editor.select(Selection::collapsed(Point::new(vec![0, 0], 3)));

    editor
        .apply(Transaction::new(vec![Op::RemoveNode { path: vec![0] }]).source("test"))
        .unwrap();
    assert_eq!(editor.children(), &[Element::paragraph("")]);
    assert!(editor.selection().is_none());
}

#[test]
fn deselect_clears_the_selection() {
    let mut editor = Editor::with_default_value();
    editor.select(Selection::collapsed(Point::new(vec![0, 0], 0)));
    let before = editor.revision();

    editor.deselect();
    assert!(editor.selection().is_none());
    assert_eq!(editor.revision(), before + 1);

    editor.deselect();
    assert_eq!(editor.revision(), before + 1);
}

#[test]
fn select_clamps_out_of_range_points() {
    let mut editor = Editor::with_default_value();
    editor.select(Selection::collapsed(Point::new(vec![4, 2], 99)));
    assert_eq!(caret(&editor), Point::new(vec![0, 0], 19));
}

#[test]
fn failed_transaction_leaves_document_and_selection_untouched() {
    let mut editor = Editor::new(Document::new(vec![Element::paragraph("abc")]));
    editor.select(Selection::collapsed(Point::new(vec![0, 0], 2)));
    let revision = editor.revision();

    let result = editor.apply(
        Transaction::new(vec![
            Op::InsertText {
                path: vec![0, 0],
                offset: 0,
                text: "X".to_string(),
            },
            Op::RemoveNode { path: vec![5] },
        ])
        .selection_after(Selection::collapsed(Point::new(vec![0, 0], 0)))
        .source("test"),
    );

    assert!(matches!(result, Err(ApplyError::InvalidPath { .. })));
    assert_eq!(texts(&editor), vec!["abc"]);
    assert_eq!(caret(&editor), Point::new(vec![0, 0], 2));
    assert_eq!(editor.revision(), revision);
}
