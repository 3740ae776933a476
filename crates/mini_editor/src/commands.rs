use gpui_mini_editor_core::{
    BlockKind, Editor, LeafFormat, NodePatch, NodeRef, NodesOptions, SetNodesOptions,
};
use tracing::warn;

fn is_code_block(node: &NodeRef<'_>) -> bool {
    node.block_kind() == Some(BlockKind::Code)
}

fn is_strong_leaf(node: &NodeRef<'_>) -> bool {
    node.leaf_format() == Some(LeafFormat::Strong)
}

/// True when any block touched by the selection is a code block.
pub fn is_code_block_active(editor: &Editor) -> bool {
    !editor
        .nodes(is_code_block, NodesOptions::default())
        .is_empty()
}

/// True only when every leaf touched by the selection is strong.
pub fn is_strong_mark_active(editor: &Editor) -> bool {
    !editor
        .nodes(
            is_strong_leaf,
            NodesOptions {
                universal: true,
                ..Default::default()
            },
        )
        .is_empty()
}

pub fn toggle_code_block(editor: &mut Editor) {
    let kind = if is_code_block_active(editor) {
        BlockKind::Paragraph
    } else {
        BlockKind::Code
    };

    if let Err(err) = editor.set_nodes(
        NodePatch::Kind(kind),
        |node: &NodeRef<'_>| node.is_block(),
        SetNodesOptions::default(),
    ) {
        warn!("toggle code block failed: {err}");
    }
}

pub fn toggle_strong_mark(editor: &mut Editor) {
    let format = if is_strong_mark_active(editor) {
        None
    } else {
        Some(LeafFormat::Strong)
    };

    if let Err(err) = editor.set_nodes(
        NodePatch::Format(format),
        |node: &NodeRef<'_>| node.is_text(),
        SetNodesOptions {
            split: true,
            ..Default::default()
        },
    ) {
        warn!("toggle strong mark failed: {err}");
    }
}
