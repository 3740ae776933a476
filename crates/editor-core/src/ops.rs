use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::location::{Path, Selection};
use crate::node::{BlockKind, LeafFormat, Node, NodeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "set", content = "value", rename_all = "snake_case")]
pub enum NodePatch {
    /// Sets an element's block type.
    Kind(BlockKind),
    /// Sets or clears a leaf's format flag.
    Format(Option<LeafFormat>),
}

impl NodePatch {
    /// Whether applying the patch to `node` would change it.
    pub fn changes(&self, node: &NodeRef<'_>) -> bool {
        match (self, node) {
            (NodePatch::Kind(kind), NodeRef::Element(el)) => el.kind != *kind,
            (NodePatch::Format(format), NodeRef::Text(t)) => t.format != *format,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    InsertText {
        path: Path,
        offset: usize,
        text: String,
    },
    RemoveText {
        path: Path,
        range: Range<usize>,
    },
    InsertNode {
        path: Path,
        node: Node,
    },
    RemoveNode {
        path: Path,
    },
    /// Splits the node at `path`; the right half (text from byte `position`,
    /// or children from index `position`) becomes the next sibling.
    SplitNode {
        path: Path,
        position: usize,
    },
    /// Merges the node at `path` into its previous sibling, whose length
    /// (text bytes or child count) before the merge is `position`.
    MergeNode {
        path: Path,
        position: usize,
    },
    SetNode {
        path: Path,
        patch: NodePatch,
    },
}

impl Op {
    pub fn path(&self) -> &[usize] {
        match self {
            Op::InsertText { path, .. }
            | Op::RemoveText { path, .. }
            | Op::InsertNode { path, .. }
            | Op::RemoveNode { path }
            | Op::SplitNode { path, .. }
            | Op::MergeNode { path, .. }
            | Op::SetNode { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub ops: Vec<Op>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_after: Option<Selection>,
    #[serde(default)]
    pub meta: TransactionMeta,
}

impl Transaction {
    pub fn new(ops: Vec<Op>) -> Self {
        Self {
            ops,
            selection_after: None,
            meta: TransactionMeta::default(),
        }
    }

    pub fn selection_after(mut self, selection_after: Selection) -> Self {
        self.selection_after = Some(selection_after);
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.meta.source = Some(source.into());
        self
    }
}
