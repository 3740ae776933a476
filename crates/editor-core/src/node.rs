use serde::{Deserialize, Serialize};

use crate::location::{Path, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    #[default]
    Paragraph,
    Code,
    /// Any block type this editor does not know. Rendered like a paragraph.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafFormat {
    Strong,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub children: Vec<Text>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub format: Option<LeafFormat>,
}

/// An owned node, as carried by insert operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Element(Element),
    Text(Text),
}

/// A borrowed node handed to match predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Document(&'a Document),
    Element(&'a Element),
    Text(&'a Text),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEntry<'a> {
    pub node: NodeRef<'a>,
    pub path: Path,
}

impl Element {
    pub fn new(kind: BlockKind, children: Vec<Text>) -> Self {
        Self { kind, children }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, vec![Text::plain(text)])
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Code, vec![Text::plain(text)])
    }

    /// Concatenated text of all leaves.
    pub fn text(&self) -> String {
        self.children.iter().map(|leaf| leaf.text.as_str()).collect()
    }

    pub fn text_len(&self) -> usize {
        self.children.iter().map(|leaf| leaf.text.len()).sum()
    }
}

impl Text {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: None,
        }
    }

    pub fn strong(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: Some(LeafFormat::Strong),
        }
    }

    pub fn is_strong(&self) -> bool {
        self.format == Some(LeafFormat::Strong)
    }
}

impl NodeRef<'_> {
    pub fn is_block(&self) -> bool {
        matches!(self, NodeRef::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeRef::Text(_))
    }

    pub fn block_kind(&self) -> Option<BlockKind> {
        match self {
            NodeRef::Element(el) => Some(el.kind),
            NodeRef::Document(_) | NodeRef::Text(_) => None,
        }
    }

    pub fn leaf_format(&self) -> Option<LeafFormat> {
        match self {
            NodeRef::Text(t) => t.format,
            NodeRef::Document(_) | NodeRef::Element(_) => None,
        }
    }
}

impl Document {
    pub fn new(children: Vec<Element>) -> Self {
        Self { children }
    }

    pub fn element(&self, block: usize) -> Option<&Element> {
        self.children.get(block)
    }

    pub fn text(&self, path: &[usize]) -> Option<&Text> {
        match path {
            [block, leaf] => self.children.get(*block)?.children.get(*leaf),
            _ => None,
        }
    }

    pub fn node(&self, path: &[usize]) -> Option<NodeRef<'_>> {
        match path {
            [] => Some(NodeRef::Document(self)),
            [block] => self.children.get(*block).map(NodeRef::Element),
            [_, _] => self.text(path).map(NodeRef::Text),
            _ => None,
        }
    }

    /// Paths of every leaf, in document order.
    pub fn text_paths(&self) -> impl Iterator<Item = Path> + '_ {
        self.children.iter().enumerate().flat_map(|(block, el)| {
            (0..el.children.len()).map(move |leaf| vec![block, leaf])
        })
    }

    pub fn start(&self) -> Option<Point> {
        self.text_paths().next().map(|path| Point::new(path, 0))
    }

    pub fn end(&self) -> Option<Point> {
        let path = self.text_paths().last()?;
        let offset = self.text(&path).map(|t| t.text.len()).unwrap_or(0);
        Some(Point::new(path, offset))
    }

    /// Maps a leaf point to `(block, byte offset into the block's text)`.
    pub fn block_offset(&self, point: &Point) -> Option<(usize, usize)> {
        let [block, leaf] = point.path[..] else {
            return None;
        };
        let el = self.children.get(block)?;
        let mut offset = 0usize;
        for (ix, text) in el.children.iter().enumerate() {
            if ix < leaf {
                offset += text.text.len();
                continue;
            }
            if ix == leaf {
                offset += clamp_to_char_boundary(&text.text, point.offset);
            }
            break;
        }
        Some((block, offset))
    }

    /// Inverse of [`Document::block_offset`]. A boundary between two leaves
    /// resolves to the end of the left one.
    pub fn point_at_block_offset(&self, block: usize, offset: usize) -> Option<Point> {
        let el = self.children.get(block)?;
        let mut remaining = offset;
        for (leaf, text) in el.children.iter().enumerate() {
            if remaining <= text.text.len() {
                return Some(Point::new(
                    vec![block, leaf],
                    clamp_to_char_boundary(&text.text, remaining),
                ));
            }
            remaining -= text.text.len();
        }

        let leaf = el.children.len().checked_sub(1)?;
        Some(Point::new(vec![block, leaf], el.children[leaf].text.len()))
    }
}

pub(crate) fn clamp_to_char_boundary(s: &str, mut ix: usize) -> usize {
    ix = ix.min(s.len());
    while ix > 0 && !s.is_char_boundary(ix) {
        ix -= 1;
    }
    ix
}

pub(crate) fn prev_char_boundary(s: &str, offset: usize) -> usize {
    if offset == 0 {
        return 0;
    }
    clamp_to_char_boundary(s, offset - 1)
}

pub(crate) fn next_char_boundary(s: &str, offset: usize) -> usize {
    if offset >= s.len() {
        return s.len();
    }
    let mut ix = offset + 1;
    while ix < s.len() && !s.is_char_boundary(ix) {
        ix += 1;
    }
    ix
}
