use gpui_mini_editor_core::{
    BlockKind, Document, Editor, Element, LeafFormat, NodePatch, NodeRef, Point, Selection,
    SetNodesOptions, Text,
};

fn leaves(editor: &Editor, block: usize) -> Vec<(String, bool)> {
    editor.children()[block]
        .children
        .iter()
        .map(|leaf| (leaf.text.clone(), leaf.is_strong()))
        .collect()
}

fn selected_block_range(editor: &Editor) -> (usize, usize) {
    let selection = editor.selection().expect("selection");
    let (start, end) = selection.edges();
    let (_, start) = editor.doc().block_offset(start).unwrap();
    let (_, end) = editor.doc().block_offset(end).unwrap();
    (start, end)
}

fn set_strong(editor: &mut Editor, format: Option<LeafFormat>) {
    editor
        .set_nodes(
            NodePatch::Format(format),
            |node: &NodeRef<'_>| node.is_text(),
            SetNodesOptions {
                split: true,
                ..Default::default()
            },
        )
        .unwrap();
}

#[test]
fn split_only_formats_the_selected_part() {
    let mut editor = Editor::new(Document::new(vec![Element::paragraph("abcde")]));
    editor.select(Selection::new(
        Point::new(vec![0, 0], 1),
        Point::new(vec![0, 0], 3),
    ));

    set_strong(&mut editor, Some(LeafFormat::Strong));
    assert_eq!(
        leaves(&editor, 0),
        vec![
            ("a".to_string(), false),
            ("bc".to_string(), true),
            ("de".to_string(), false),
        ]
    );
    assert_eq!(selected_block_range(&editor), (1, 3));

    set_strong(&mut editor, None);
    assert_eq!(leaves(&editor, 0), vec![("abcde".to_string(), false)]);
    assert_eq!(selected_block_range(&editor), (1, 3));
}

#[test]
fn split_handles_a_backward_selection_across_blocks() {
    let mut editor = Editor::new(Document::new(vec![
        Element::paragraph("one"),
        Element::paragraph("two"),
    ]));
    editor.select(Selection::new(
        Point::new(vec![1, 0], 1),
        Point::new(vec![0, 0], 2),
    ));

    set_strong(&mut editor, Some(LeafFormat::Strong));
    assert_eq!(
        leaves(&editor, 0),
        vec![("on".to_string(), false), ("e".to_string(), true)]
    );
    assert_eq!(
        leaves(&editor, 1),
        vec![("t".to_string(), true), ("wo".to_string(), false)]
    );

    let selection = editor.selection().unwrap();
    assert!(selection.is_backward());
    assert_eq!(selection.focus, Point::new(vec![0, 1], 0));
    assert_eq!(selection.anchor, Point::new(vec![1, 0], 1));
}

#[test]
fn split_with_a_collapsed_caret_in_text_is_a_noop() {
    let mut editor = Editor::new(Document::new(vec![Element::paragraph("abc")]));
    editor.select(Selection::collapsed(Point::new(vec![0, 0], 1)));
    let before = editor.revision();

    set_strong(&mut editor, Some(LeafFormat::Strong));
    assert_eq!(leaves(&editor, 0), vec![("abc".to_string(), false)]);
    assert_eq!(editor.revision(), before);
}

#[test]
fn split_with_a_collapsed_caret_in_an_empty_leaf_formats_it() {
    let mut editor = Editor::new(Document::new(vec![Element::paragraph("")]));
    editor.select(Selection::collapsed(Point::new(vec![0, 0], 0)));

    set_strong(&mut editor, Some(LeafFormat::Strong));
    assert_eq!(leaves(&editor, 0), vec![(String::new(), true)]);
}

#[test]
fn set_nodes_without_selection_does_nothing() {
    let mut editor = Editor::with_default_value();
    editor
        .set_nodes(
            NodePatch::Kind(BlockKind::Code),
            |node: &NodeRef<'_>| node.is_block(),
            SetNodesOptions::default(),
        )
        .unwrap();
    assert_eq!(editor.children()[0].kind, BlockKind::Paragraph);
    assert_eq!(editor.revision(), 0);
}

#[test]
fn block_patch_changes_every_selected_block() {
    let mut editor = Editor::new(Document::new(vec![
        Element::paragraph("a"),
        Element::code("b"),
        Element::paragraph("c"),
        Element::paragraph("d"),
    ]));
    editor.select(Selection::new(
        Point::new(vec![0, 0], 0),
        Point::new(vec![2, 0], 1),
    ));

    editor
        .set_nodes(
            NodePatch::Kind(BlockKind::Code),
            |node: &NodeRef<'_>| node.is_block(),
            SetNodesOptions::default(),
        )
        .unwrap();

    let kinds: Vec<_> = editor.children().iter().map(|el| el.kind).collect();
    assert_eq!(
        kinds,
        vec![
            BlockKind::Code,
            BlockKind::Code,
            BlockKind::Code,
            BlockKind::Paragraph
        ]
    );
}

#[test]
fn unchanged_nodes_are_skipped() {
    let mut editor = Editor::new(Document::new(vec![Element::new(
        BlockKind::Paragraph,
        vec![Text::strong("abc")],
    )]));
    editor.select(Selection::new(
        Point::new(vec![0, 0], 0),
        Point::new(vec![0, 0], 3),
    ));
    let before = editor.revision();

    set_strong(&mut editor, Some(LeafFormat::Strong));
    assert_eq!(editor.revision(), before);
}

#[test]
fn selection_ending_at_a_leaf_start_leaves_that_leaf_alone() {
    let mut editor = Editor::new(Document::new(vec![Element::new(
        BlockKind::Paragraph,
        vec![Text::plain("ab"), Text::strong("cd")],
    )]));
    editor.select(Selection::new(
        Point::new(vec![0, 0], 0),
        Point::new(vec![0, 1], 0),
    ));

    set_strong(&mut editor, Some(LeafFormat::Strong));
    assert_eq!(leaves(&editor, 0), vec![("abcd".to_string(), true)]);

    set_strong(&mut editor, None);
    assert_eq!(
        leaves(&editor, 0),
        vec![("ab".to_string(), false), ("cd".to_string(), true)]
    );
}
