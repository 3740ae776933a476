use std::cmp::Ordering;

use tracing::{trace, warn};

use crate::location::{Path, Point, Selection, compare_paths};
use crate::node::{
    Document, Element, Node, NodeEntry, NodeRef, Text, clamp_to_char_boundary,
    next_char_boundary, prev_char_boundary,
};
use crate::normalize::{NormalizePass, default_passes};
use crate::ops::{NodePatch, Op, Transaction};

pub const DEFAULT_TEXT: &str = "This is a paragraph";

#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: Path, reason: String },
    #[error("{op} does not apply to the node at {path:?}")]
    NodeMismatch { op: &'static str, path: Path },
    #[error("normalization did not converge after {0} iterations")]
    NormalizeDidNotConverge(usize),
}

impl ApplyError {
    fn invalid_path(path: &[usize], reason: impl Into<String>) -> Self {
        ApplyError::InvalidPath {
            path: path.to_vec(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditorConfig {
    pub max_normalize_iterations: usize,
}

impl EditorConfig {
    fn with_defaults(mut self) -> Self {
        if self.max_normalize_iterations == 0 {
            self.max_normalize_iterations = 100;
        }
        self
    }
}

/// How [`Editor::nodes`] reports matches that are nested inside each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    All,
    /// Only the outermost match of each branch.
    Highest,
    /// Only the innermost match of each branch.
    Lowest,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NodesOptions {
    pub mode: MatchMode,
    /// Report nothing unless every leaf in range is matched, by itself or by
    /// an ancestor.
    pub universal: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SetNodesOptions {
    pub mode: MatchMode,
    /// Split leaves at the selection edges first so only the selected part
    /// changes.
    pub split: bool,
}

impl Default for SetNodesOptions {
    fn default() -> Self {
        Self {
            mode: MatchMode::Lowest,
            split: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

pub struct Editor {
    doc: Document,
    selection: Option<Selection>,
    config: EditorConfig,
    passes: Vec<Box<dyn NormalizePass>>,
    revision: u64,
}

impl Editor {
    pub fn new(doc: Document) -> Self {
        Self::with_config(doc, EditorConfig::default())
    }

    pub fn with_config(doc: Document, config: EditorConfig) -> Self {
        let mut editor = Self {
            doc,
            selection: None,
            config: config.with_defaults(),
            passes: default_passes(),
            revision: 0,
        };
        if let Err(err) = editor.normalize() {
            warn!("initial document did not normalize: {err}");
        }
        editor.revision = 0;
        editor
    }

    /// A single paragraph reading "This is a paragraph".
    pub fn with_default_value() -> Self {
        Self::new(Document::new(vec![Element::paragraph(DEFAULT_TEXT)]))
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn children(&self) -> &[Element] {
        &self.doc.children
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Bumped by every applied operation and selection change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn select(&mut self, selection: Selection) {
        let (Some(anchor), Some(focus)) = (
            clamp_point(&self.doc, &selection.anchor),
            clamp_point(&self.doc, &selection.focus),
        ) else {
            return;
        };
        let selection = Selection::new(anchor, focus);
        if self.selection.as_ref() != Some(&selection) {
            self.selection = Some(selection);
            self.revision += 1;
        }
    }

    pub fn deselect(&mut self) {
        if self.selection.take().is_some() {
            self.revision += 1;
        }
    }

    /// Applies every op of `tx`, then normalizes. On error the document,
    /// selection and revision are left exactly as they were.
    pub fn apply(&mut self, tx: Transaction) -> Result<(), ApplyError> {
        trace!(
            source = tx.meta.source.as_deref().unwrap_or("unknown"),
            ops = tx.ops.len(),
            "apply transaction"
        );

        self.atomically(|editor| {
            for op in tx.ops {
                editor.apply_op(op)?;
            }

            if let Some(selection) = tx.selection_after {
                editor.selection = Some(selection);
                editor.revision += 1;
            }

            editor.normalize()
        })
    }

    fn atomically(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<(), ApplyError>,
    ) -> Result<(), ApplyError> {
        let doc = self.doc.clone();
        let selection = self.selection.clone();
        let revision = self.revision;

        let result = f(self);
        if let Err(err) = &result {
            warn!("rolling back failed transaction: {err}");
            self.doc = doc;
            self.selection = selection;
            self.revision = revision;
        }
        result
    }

    /// Every node between the selection edges, in document order, for which
    /// `matcher` returns true. Empty without a selection.
    pub fn nodes<F>(&self, matcher: F, opts: NodesOptions) -> Vec<NodeEntry<'_>>
    where
        F: Fn(&NodeRef<'_>) -> bool,
    {
        let Some(selection) = &self.selection else {
            return Vec::new();
        };
        let (start, end) = selection.edges();
        let lowest = opts.mode == MatchMode::Lowest;

        let mut matches = Vec::new();
        let mut hit: Option<NodeEntry<'_>> = None;

        for entry in self.entries_between(&start.path, &end.path) {
            let is_lower = hit
                .as_ref()
                .is_some_and(|hit| compare_paths(&entry.path, &hit.path) == Ordering::Equal);

            if opts.mode == MatchMode::Highest && is_lower {
                continue;
            }

            if !matcher(&entry.node) {
                // A leaf outside every match breaks universality.
                if opts.universal && !is_lower && entry.node.is_text() {
                    return Vec::new();
                }
                continue;
            }

            if lowest && is_lower {
                hit = Some(entry);
                continue;
            }

            let emit = if lowest { hit.take() } else { Some(entry.clone()) };
            matches.extend(emit);
            hit = Some(entry);
        }

        if lowest {
            matches.extend(hit);
        }
        matches
    }

    /// Applies `patch` to every matching node in the selection.
    pub fn set_nodes<F>(
        &mut self,
        patch: NodePatch,
        matcher: F,
        opts: SetNodesOptions,
    ) -> Result<(), ApplyError>
    where
        F: Fn(&NodeRef<'_>) -> bool,
    {
        let Some(selection) = self.selection.clone() else {
            return Ok(());
        };
        self.atomically(|editor| editor.set_nodes_in(patch, &matcher, opts, &selection))
    }

    fn set_nodes_in<F>(
        &mut self,
        patch: NodePatch,
        matcher: &F,
        opts: SetNodesOptions,
        selection: &Selection,
    ) -> Result<(), ApplyError>
    where
        F: Fn(&NodeRef<'_>) -> bool,
    {
        if opts.split {
            if selection.is_collapsed() {
                // Anything set here would be undone by the next merge.
                if self
                    .doc
                    .text(&selection.anchor.path)
                    .is_some_and(|leaf| !leaf.text.is_empty())
                {
                    return Ok(());
                }
            } else {
                self.split_at_selection_edges(selection, matcher)?;
            }
        }

        let targets: Vec<Path> = self
            .nodes(
                matcher,
                NodesOptions {
                    mode: opts.mode,
                    universal: false,
                },
            )
            .into_iter()
            .filter(|entry| patch.changes(&entry.node))
            .map(|entry| entry.path)
            .collect();

        trace!(?patch, targets = targets.len(), "set nodes");
        for path in targets {
            self.apply_op(Op::SetNode { path, patch })?;
        }

        self.normalize()
    }

    /// Splits matched leaves at the selection edges, end first so the start
    /// point stays valid. The selection follows the splits inward.
    fn split_at_selection_edges<F>(
        &mut self,
        selection: &Selection,
        matcher: &F,
    ) -> Result<(), ApplyError>
    where
        F: Fn(&NodeRef<'_>) -> bool,
    {
        let (start, end) = selection.edges();
        let (start, end) = (start.clone(), end.clone());

        if let Some(leaf) = self.doc.text(&end.path)
            && end.offset < leaf.text.len()
            && matcher(&NodeRef::Text(leaf))
        {
            self.apply_op(Op::SplitNode {
                path: end.path.clone(),
                position: end.offset,
            })?;
        }

        if let Some(leaf) = self.doc.text(&start.path)
            && start.offset > 0
            && matcher(&NodeRef::Text(leaf))
        {
            self.apply_op(Op::SplitNode {
                path: start.path.clone(),
                position: start.offset,
            })?;
        }

        Ok(())
    }

    pub fn insert_text(&mut self, text: &str) -> Result<(), ApplyError> {
        if text.is_empty() {
            return Ok(());
        }
        if self.selection.as_ref().is_some_and(|s| !s.is_collapsed()) {
            self.delete_fragment()?;
        }
        let Some(point) = self.selection.as_ref().map(|s| s.focus.clone()) else {
            return Ok(());
        };

        let after = Point::new(point.path.clone(), point.offset + text.len());
        let tx = Transaction::new(vec![Op::InsertText {
            path: point.path,
            offset: point.offset,
            text: text.to_string(),
        }])
        .selection_after(Selection::collapsed(after))
        .source("insert_text");
        self.apply(tx)
    }

    /// Removes the selected content, leaving a collapsed selection at its
    /// start. No-op for a collapsed selection.
    pub fn delete_fragment(&mut self) -> Result<(), ApplyError> {
        let Some(selection) = self.selection.clone() else {
            return Ok(());
        };
        if selection.is_collapsed() {
            return Ok(());
        }
        let (start, end) = selection.edges();
        let ops = self.delete_range_ops(start, end)?;
        let tx = Transaction::new(ops)
            .selection_after(Selection::collapsed(start.clone()))
            .source("delete_fragment");
        self.apply(tx)
    }

    pub fn delete_backward(&mut self) -> Result<(), ApplyError> {
        let Some(selection) = self.selection.clone() else {
            return Ok(());
        };
        if !selection.is_collapsed() {
            return self.delete_fragment();
        }

        let point = selection.focus;
        let Some((block, offset)) = self.doc.block_offset(&point) else {
            return Ok(());
        };

        if offset == 0 {
            if block == 0 {
                return Ok(());
            }
            let prev = &self.doc.children[block - 1];
            // An empty previous block is dropped so this block keeps its type.
            let op = if prev.text_len() == 0 {
                Op::RemoveNode {
                    path: vec![block - 1],
                }
            } else {
                Op::MergeNode {
                    path: vec![block],
                    position: prev.children.len(),
                }
            };
            return self.apply(Transaction::new(vec![op]).source("delete_backward"));
        }

        let text = self.doc.children[block].text();
        let Some(start) = self
            .doc
            .point_at_block_offset(block, prev_char_boundary(&text, offset))
        else {
            return Ok(());
        };
        let ops = self.delete_range_ops(&start, &point)?;
        let tx = Transaction::new(ops)
            .selection_after(Selection::collapsed(start))
            .source("delete_backward");
        self.apply(tx)
    }

    pub fn delete_forward(&mut self) -> Result<(), ApplyError> {
        let Some(selection) = self.selection.clone() else {
            return Ok(());
        };
        if !selection.is_collapsed() {
            return self.delete_fragment();
        }

        let point = selection.focus;
        let Some((block, offset)) = self.doc.block_offset(&point) else {
            return Ok(());
        };
        let el = &self.doc.children[block];
        let text = el.text();

        if offset >= text.len() {
            if block + 1 >= self.doc.children.len() {
                return Ok(());
            }
            let tx = if text.is_empty() {
                Transaction::new(vec![Op::RemoveNode { path: vec![block] }])
                    .selection_after(Selection::collapsed(Point::new(vec![block, 0], 0)))
            } else {
                Transaction::new(vec![Op::MergeNode {
                    path: vec![block + 1],
                    position: el.children.len(),
                }])
            };
            return self.apply(tx.source("delete_forward"));
        }

        let Some(end) = self
            .doc
            .point_at_block_offset(block, next_char_boundary(&text, offset))
        else {
            return Ok(());
        };
        let ops = self.delete_range_ops(&point, &end)?;
        let tx = Transaction::new(ops)
            .selection_after(Selection::collapsed(point))
            .source("delete_forward");
        self.apply(tx)
    }

    /// Splits the current block at the caret. Both halves keep the block type.
    pub fn insert_break(&mut self) -> Result<(), ApplyError> {
        if self.selection.as_ref().is_some_and(|s| !s.is_collapsed()) {
            self.delete_fragment()?;
        }
        let Some(point) = self.selection.as_ref().map(|s| s.focus.clone()) else {
            return Ok(());
        };
        let [block, leaf] = point.path[..] else {
            return Err(ApplyError::invalid_path(&point.path, "not a leaf path"));
        };

        let tx = Transaction::new(vec![
            Op::SplitNode {
                path: point.path.clone(),
                position: point.offset,
            },
            Op::SplitNode {
                path: vec![block],
                position: leaf + 1,
            },
        ])
        .selection_after(Selection::collapsed(Point::new(vec![block + 1, 0], 0)))
        .source("insert_break");
        self.apply(tx)
    }

    /// Moves the focus one character. Without `extend`, an expanded selection
    /// collapses to the edge in `direction` instead.
    pub fn move_selection(&mut self, direction: Direction, extend: bool) {
        let Some(selection) = self.selection.clone() else {
            return;
        };

        if !extend && !selection.is_collapsed() {
            let (start, end) = selection.edges();
            let target = match direction {
                Direction::Backward => start,
                Direction::Forward => end,
            };
            self.select(Selection::collapsed(target.clone()));
            return;
        }

        let Some(next) = self.step(&selection.focus, direction) else {
            return;
        };
        if extend {
            self.select(Selection::new(selection.anchor, next));
        } else {
            self.select(Selection::collapsed(next));
        }
    }

    fn step(&self, point: &Point, direction: Direction) -> Option<Point> {
        let (block, offset) = self.doc.block_offset(point)?;
        let text = self.doc.element(block)?.text();

        match direction {
            Direction::Forward if offset < text.len() => self
                .doc
                .point_at_block_offset(block, next_char_boundary(&text, offset)),
            Direction::Forward => self.doc.point_at_block_offset(block + 1, 0),
            Direction::Backward if offset > 0 => self
                .doc
                .point_at_block_offset(block, prev_char_boundary(&text, offset)),
            Direction::Backward => {
                let prev = block.checked_sub(1)?;
                let len = self.doc.element(prev)?.text_len();
                self.doc.point_at_block_offset(prev, len)
            }
        }
    }

    /// Ops removing everything between two leaf points, `start <= end`. When
    /// the points sit in different blocks the end block is merged into the
    /// start block.
    fn delete_range_ops(&self, start: &Point, end: &Point) -> Result<Vec<Op>, ApplyError> {
        let [sb, sl] = start.path[..] else {
            return Err(ApplyError::invalid_path(&start.path, "not a leaf path"));
        };
        let [eb, el] = end.path[..] else {
            return Err(ApplyError::invalid_path(&end.path, "not a leaf path"));
        };
        let start_len = self
            .doc
            .text(&start.path)
            .map(|leaf| leaf.text.len())
            .ok_or_else(|| ApplyError::invalid_path(&start.path, "no leaf"))?;
        let start_block_len = self.doc.children[sb].children.len();

        let mut ops = Vec::new();

        if start.path == end.path {
            if start.offset < end.offset {
                ops.push(Op::RemoveText {
                    path: start.path.clone(),
                    range: start.offset..end.offset,
                });
            }
            return Ok(ops);
        }

        if end.offset > 0 {
            ops.push(Op::RemoveText {
                path: end.path.clone(),
                range: 0..end.offset,
            });
        }

        if sb == eb {
            for leaf in (sl + 1..el).rev() {
                ops.push(Op::RemoveNode {
                    path: vec![sb, leaf],
                });
            }
        } else {
            for leaf in (0..el).rev() {
                ops.push(Op::RemoveNode {
                    path: vec![eb, leaf],
                });
            }
            for block in (sb + 1..eb).rev() {
                ops.push(Op::RemoveNode { path: vec![block] });
            }
            for leaf in (sl + 1..start_block_len).rev() {
                ops.push(Op::RemoveNode {
                    path: vec![sb, leaf],
                });
            }
        }

        if start.offset < start_len {
            ops.push(Op::RemoveText {
                path: start.path.clone(),
                range: start.offset..start_len,
            });
        }

        if sb != eb {
            ops.push(Op::MergeNode {
                path: vec![sb + 1],
                position: sl + 1,
            });
        }

        Ok(ops)
    }

    /// Document, blocks and leaves between two leaf paths in document order.
    fn entries_between(&self, start: &[usize], end: &[usize]) -> Vec<NodeEntry<'_>> {
        let mut entries = vec![NodeEntry {
            node: NodeRef::Document(&self.doc),
            path: Vec::new(),
        }];

        let first_block = start.first().copied().unwrap_or(0);
        let last_block = end.first().copied().unwrap_or(usize::MAX);

        for (block, el) in self.doc.children.iter().enumerate() {
            if block < first_block {
                continue;
            }
            if block > last_block {
                break;
            }
            entries.push(NodeEntry {
                node: NodeRef::Element(el),
                path: vec![block],
            });

            let first_leaf = match start {
                [b, leaf] if *b == block => *leaf,
                _ => 0,
            };
            let last_leaf = match end {
                [b, leaf] if *b == block => *leaf,
                _ => usize::MAX,
            };
            for (leaf, text) in el.children.iter().enumerate() {
                if leaf < first_leaf {
                    continue;
                }
                if leaf > last_leaf {
                    break;
                }
                entries.push(NodeEntry {
                    node: NodeRef::Text(text),
                    path: vec![block, leaf],
                });
            }
        }

        entries
    }

    fn normalize(&mut self) -> Result<(), ApplyError> {
        for _ in 0..self.config.max_normalize_iterations {
            let pending = self
                .passes
                .iter()
                .map(|pass| (pass.id(), pass.run(&self.doc)))
                .find(|(_, ops)| !ops.is_empty());

            let Some((id, ops)) = pending else {
                self.clamp_selection();
                return Ok(());
            };

            trace!(pass = id, ops = ops.len(), "normalize");
            for op in ops {
                self.apply_op(op)?;
            }
        }

        Err(ApplyError::NormalizeDidNotConverge(
            self.config.max_normalize_iterations,
        ))
    }

    fn clamp_selection(&mut self) {
        let Some(selection) = &self.selection else {
            return;
        };
        let clamped = match (
            clamp_point(&self.doc, &selection.anchor),
            clamp_point(&self.doc, &selection.focus),
        ) {
            (Some(anchor), Some(focus)) => Some(Selection::new(anchor, focus)),
            _ => None,
        };
        if clamped.as_ref() != Some(selection) {
            self.selection = clamped;
            self.revision += 1;
        }
    }

    fn apply_op(&mut self, op: Op) -> Result<(), ApplyError> {
        apply_op_to(&mut self.doc, &op)?;

        if let Some(selection) = self.selection.take() {
            let (anchor, focus) = selection.transform(&op);
            let anchor = anchor.or_else(|| point_near_removed(&self.doc, op.path()));
            let focus = focus.or_else(|| point_near_removed(&self.doc, op.path()));
            self.selection = match (anchor, focus) {
                (Some(anchor), Some(focus)) => Some(Selection::new(anchor, focus)),
                _ => None,
            };
        }

        self.revision += 1;
        Ok(())
    }
}

fn apply_op_to(doc: &mut Document, op: &Op) -> Result<(), ApplyError> {
    match op {
        Op::InsertText { path, offset, text } => {
            let leaf = text_mut(doc, path)?;
            let offset = clamp_to_char_boundary(&leaf.text, *offset);
            leaf.text.insert_str(offset, text);
        }
        Op::RemoveText { path, range } => {
            let leaf = text_mut(doc, path)?;
            let start = clamp_to_char_boundary(&leaf.text, range.start);
            let end = clamp_to_char_boundary(&leaf.text, range.end);
            if start < end {
                leaf.text.replace_range(start..end, "");
            }
        }
        Op::InsertNode { path, node } => match (path.as_slice(), node) {
            ([block], Node::Element(el)) if *block <= doc.children.len() => {
                doc.children.insert(*block, el.clone());
            }
            ([block, leaf], Node::Text(text)) => {
                let el = element_mut(doc, path, *block)?;
                if *leaf > el.children.len() {
                    return Err(ApplyError::invalid_path(path, "leaf index out of bounds"));
                }
                el.children.insert(*leaf, text.clone());
            }
            _ => {
                return Err(ApplyError::NodeMismatch {
                    op: "insert_node",
                    path: path.clone(),
                });
            }
        },
        Op::RemoveNode { path } => match path.as_slice() {
            [block] if *block < doc.children.len() => {
                doc.children.remove(*block);
            }
            [block, leaf] => {
                let el = element_mut(doc, path, *block)?;
                if *leaf >= el.children.len() {
                    return Err(ApplyError::invalid_path(path, "leaf index out of bounds"));
                }
                el.children.remove(*leaf);
            }
            _ => return Err(ApplyError::invalid_path(path, "no node to remove")),
        },
        Op::SplitNode { path, position } => match path.as_slice() {
            [block] => {
                let el = element_mut(doc, path, *block)?;
                if *position > el.children.len() {
                    return Err(ApplyError::invalid_path(path, "split past the last leaf"));
                }
                let right = Element::new(el.kind, el.children.split_off(*position));
                doc.children.insert(block + 1, right);
            }
            [block, leaf] => {
                let el = element_mut(doc, path, *block)?;
                let text = el
                    .children
                    .get_mut(*leaf)
                    .ok_or_else(|| ApplyError::invalid_path(path, "no leaf"))?;
                let position = clamp_to_char_boundary(&text.text, *position);
                let right = Text {
                    text: text.text.split_off(position),
                    format: text.format,
                };
                el.children.insert(leaf + 1, right);
            }
            _ => return Err(ApplyError::invalid_path(path, "nothing to split")),
        },
        Op::MergeNode { path, .. } => match path.as_slice() {
            [block] if *block > 0 && *block < doc.children.len() => {
                let merged = doc.children.remove(*block);
                doc.children[block - 1].children.extend(merged.children);
            }
            [block, leaf] if *leaf > 0 => {
                let el = element_mut(doc, path, *block)?;
                if *leaf >= el.children.len() {
                    return Err(ApplyError::invalid_path(path, "leaf index out of bounds"));
                }
                let merged = el.children.remove(*leaf);
                el.children[leaf - 1].text.push_str(&merged.text);
            }
            _ => return Err(ApplyError::invalid_path(path, "no previous sibling")),
        },
        Op::SetNode { path, patch } => match (path.as_slice(), patch) {
            ([block], NodePatch::Kind(kind)) => {
                element_mut(doc, path, *block)?.kind = *kind;
            }
            ([_, _], NodePatch::Format(format)) => {
                text_mut(doc, path)?.format = *format;
            }
            _ => {
                return Err(ApplyError::NodeMismatch {
                    op: "set_node",
                    path: path.clone(),
                });
            }
        },
    }
    Ok(())
}

fn element_mut<'a>(
    doc: &'a mut Document,
    path: &[usize],
    block: usize,
) -> Result<&'a mut Element, ApplyError> {
    doc.children
        .get_mut(block)
        .ok_or_else(|| ApplyError::invalid_path(path, "block index out of bounds"))
}

fn text_mut<'a>(doc: &'a mut Document, path: &[usize]) -> Result<&'a mut Text, ApplyError> {
    let [block, leaf] = path[..] else {
        return Err(ApplyError::invalid_path(path, "not a leaf path"));
    };
    element_mut(doc, path, block)?
        .children
        .get_mut(leaf)
        .ok_or_else(|| ApplyError::invalid_path(path, "leaf index out of bounds"))
}

/// Where a point inside a removed node ends up: the end of the previous leaf,
/// unless the next leaf is the closer relative.
fn point_near_removed(doc: &Document, removed: &[usize]) -> Option<Point> {
    let mut prev: Option<Path> = None;
    let mut next: Option<Path> = None;
    for path in doc.text_paths() {
        if compare_paths(&path, removed) == Ordering::Less {
            prev = Some(path);
        } else {
            next = Some(path);
            break;
        }
    }

    let prefer_next = match (&prev, &next) {
        (Some(prev), Some(next)) => {
            if next.as_slice() == removed {
                next.last().is_some_and(|ix| *ix == 0)
            } else {
                common_len(prev, removed) < common_len(next, removed)
            }
        }
        _ => false,
    };

    match (prev, next) {
        (Some(prev), _) if !prefer_next => {
            let offset = doc.text(&prev).map(|leaf| leaf.text.len()).unwrap_or(0);
            Some(Point::new(prev, offset))
        }
        (_, Some(next)) => Some(Point::new(next, 0)),
        _ => None,
    }
}

fn common_len(a: &[usize], b: &[usize]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Snaps a point onto the nearest existing leaf and char boundary.
fn clamp_point(doc: &Document, point: &Point) -> Option<Point> {
    let last_block = doc.children.len().checked_sub(1)?;
    let block = point.path.first().copied().unwrap_or(0).min(last_block);
    let el = &doc.children[block];
    let last_leaf = el.children.len().checked_sub(1)?;
    let leaf = point.path.get(1).copied().unwrap_or(0).min(last_leaf);
    let text = &el.children[leaf].text;
    Some(Point::new(
        vec![block, leaf],
        clamp_to_char_boundary(text, point.offset),
    ))
}
