use crate::node::{Document, Element, Node, Text};
use crate::ops::Op;

/// A single normalisation rule. Passes are run repeatedly until none of them
/// returns an operation.
pub trait NormalizePass: Send + Sync {
    fn id(&self) -> &'static str;
    fn run(&self, doc: &Document) -> Vec<Op>;
}

pub fn default_passes() -> Vec<Box<dyn NormalizePass>> {
    vec![
        Box::new(EnsureNonEmptyDocument),
        Box::new(EnsureBlockHasTextLeaf),
        Box::new(MergeAdjacentTextLeaves),
    ]
}

struct EnsureNonEmptyDocument;

impl NormalizePass for EnsureNonEmptyDocument {
    fn id(&self) -> &'static str {
        "core.ensure_non_empty_document"
    }

    fn run(&self, doc: &Document) -> Vec<Op> {
        if doc.children.is_empty() {
            return vec![Op::InsertNode {
                path: vec![0],
                node: Node::Element(Element::paragraph("")),
            }];
        }
        Vec::new()
    }
}

struct EnsureBlockHasTextLeaf;

impl NormalizePass for EnsureBlockHasTextLeaf {
    fn id(&self) -> &'static str {
        "core.ensure_block_has_text_leaf"
    }

    fn run(&self, doc: &Document) -> Vec<Op> {
        doc.children
            .iter()
            .enumerate()
            .filter(|(_, el)| el.children.is_empty())
            .map(|(block, _)| Op::InsertNode {
                path: vec![block, 0],
                node: Node::Text(Text::default()),
            })
            .collect()
    }
}

/// Merges neighbouring leaves with the same format and drops empty leaves
/// that have a sibling. Emits at most one op per block; the fixed-point loop
/// picks up the rest.
struct MergeAdjacentTextLeaves;

impl NormalizePass for MergeAdjacentTextLeaves {
    fn id(&self) -> &'static str {
        "core.merge_adjacent_text_leaves"
    }

    fn run(&self, doc: &Document) -> Vec<Op> {
        let mut ops = Vec::new();

        for (block, el) in doc.children.iter().enumerate() {
            for leaf in 1..el.children.len() {
                let prev = &el.children[leaf - 1];
                let current = &el.children[leaf];

                if prev.format == current.format {
                    ops.push(Op::MergeNode {
                        path: vec![block, leaf],
                        position: prev.text.len(),
                    });
                    break;
                }
                if prev.text.is_empty() {
                    ops.push(Op::RemoveNode {
                        path: vec![block, leaf - 1],
                    });
                    break;
                }
                if current.text.is_empty() {
                    ops.push(Op::RemoveNode {
                        path: vec![block, leaf],
                    });
                    break;
                }
            }
        }

        ops
    }
}
