use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::ops::Op;

pub type Path = Vec<usize>;

/// Compares two paths in document order. An ancestor compares equal to its
/// descendants.
pub fn compare_paths(a: &[usize], b: &[usize]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

pub fn is_ancestor(path: &[usize], of: &[usize]) -> bool {
    path.len() < of.len() && of.starts_with(path)
}

/// Whether `path` is an earlier sibling of `other` or of one of its ancestors.
pub fn ends_before(path: &[usize], other: &[usize]) -> bool {
    let Some((&last, parent)) = path.split_last() else {
        return false;
    };
    let depth = parent.len();
    other.len() > depth && other[..depth] == *parent && last < other[depth]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: Path, offset: usize) -> Self {
        Self { path, offset }
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path
            .cmp(&other.path)
            .then(self.offset.cmp(&other.offset))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn is_backward(&self) -> bool {
        self.focus < self.anchor
    }

    /// `(start, end)` in document order.
    pub fn edges(&self) -> (&Point, &Point) {
        if self.is_backward() {
            (&self.focus, &self.anchor)
        } else {
            (&self.anchor, &self.focus)
        }
    }

    /// Points keep the selected content inside the selection: the start leans
    /// forward and the end leans backward.
    fn inward_affinities(&self) -> (Affinity, Affinity) {
        if self.is_collapsed() {
            (Affinity::Forward, Affinity::Forward)
        } else if self.is_backward() {
            (Affinity::Backward, Affinity::Forward)
        } else {
            (Affinity::Forward, Affinity::Backward)
        }
    }

    /// Returns `None` for each side whose point was removed by `op`.
    pub(crate) fn transform(&self, op: &Op) -> (Option<Point>, Option<Point>) {
        let (anchor_affinity, focus_affinity) = self.inward_affinities();
        (
            transform_point(&self.anchor, op, anchor_affinity),
            transform_point(&self.focus, op, focus_affinity),
        )
    }
}

pub(crate) fn transform_path(path: &[usize], op: &Op, affinity: Affinity) -> Option<Path> {
    let mut p = path.to_vec();
    match op {
        Op::InsertText { .. } | Op::RemoveText { .. } | Op::SetNode { .. } => {}
        Op::InsertNode { path: at, .. } => {
            if at.as_slice() == path || ends_before(at, path) || is_ancestor(at, path) {
                p[at.len() - 1] += 1;
            }
        }
        Op::RemoveNode { path: at } => {
            if at.as_slice() == path || is_ancestor(at, path) {
                return None;
            }
            if ends_before(at, path) {
                p[at.len() - 1] -= 1;
            }
        }
        Op::SplitNode { path: at, position } => {
            if at.as_slice() == path {
                if affinity == Affinity::Forward {
                    *p.last_mut()? += 1;
                }
            } else if ends_before(at, path) {
                p[at.len() - 1] += 1;
            } else if is_ancestor(at, path) && path[at.len()] >= *position {
                p[at.len() - 1] += 1;
                p[at.len()] -= *position;
            }
        }
        Op::MergeNode { path: at, position } => {
            if at.as_slice() == path || ends_before(at, path) {
                p[at.len() - 1] -= 1;
            } else if is_ancestor(at, path) {
                p[at.len() - 1] -= 1;
                p[at.len()] += *position;
            }
        }
    }
    Some(p)
}

pub(crate) fn transform_point(point: &Point, op: &Op, affinity: Affinity) -> Option<Point> {
    let mut next = point.clone();
    match op {
        Op::InsertText { path, offset, text } => {
            if *path == point.path
                && (*offset < point.offset
                    || (*offset == point.offset && affinity == Affinity::Forward))
            {
                next.offset += text.len();
            }
        }
        Op::RemoveText { path, range } => {
            if *path == point.path && range.start <= point.offset {
                next.offset -= (point.offset - range.start).min(range.len());
            }
        }
        Op::SplitNode { path, position } if *path == point.path => {
            if *position < point.offset
                || (*position == point.offset && affinity == Affinity::Forward)
            {
                next.offset -= position;
                *next.path.last_mut()? += 1;
            }
        }
        Op::MergeNode { path, position } if *path == point.path => {
            next.offset += position;
            next.path = transform_path(&point.path, op, affinity)?;
        }
        _ => {
            next.path = transform_path(&point.path, op, affinity)?;
        }
    }
    Some(next)
}
