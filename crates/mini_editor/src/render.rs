use gpui::SharedString;
use gpui_mini_editor_core::{BlockKind, Element, LeafFormat, Text};

/// What a node renders to. Container variants own their already-rendered
/// children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visual {
    Paragraph(Vec<Visual>),
    Preformatted(Vec<Visual>),
    Code(Vec<Visual>),
    Strong(Vec<Visual>),
    Span(Vec<Visual>),
    Text(SharedString),
}

/// `Code` blocks become a preformatted container around a code container;
/// every other block kind renders as a paragraph.
pub fn render_element(element: &Element, children: Vec<Visual>) -> Visual {
    match element.kind {
        BlockKind::Code => Visual::Preformatted(vec![Visual::Code(children)]),
        BlockKind::Paragraph | BlockKind::Unknown => Visual::Paragraph(children),
    }
}

pub fn render_leaf(leaf: &Text, children: Vec<Visual>) -> Visual {
    match leaf.format {
        Some(LeafFormat::Strong) => Visual::Strong(children),
        Some(LeafFormat::Unknown) | None => Visual::Span(children),
    }
}

pub fn render_block(element: &Element) -> Visual {
    let leaves = element
        .children
        .iter()
        .map(|leaf| render_leaf(leaf, vec![Visual::Text(leaf.text.clone().into())]))
        .collect();
    render_element(element, leaves)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStyle {
    pub strong: bool,
    pub code: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualRun {
    pub text: SharedString,
    pub style: RunStyle,
}

impl Visual {
    pub fn children(&self) -> &[Visual] {
        match self {
            Visual::Paragraph(children)
            | Visual::Preformatted(children)
            | Visual::Code(children)
            | Visual::Strong(children)
            | Visual::Span(children) => children,
            Visual::Text(_) => &[],
        }
    }

    pub fn is_preformatted(&self) -> bool {
        matches!(self, Visual::Preformatted(_))
    }

    pub fn text(&self) -> String {
        self.runs().iter().map(|run| run.text.as_str()).collect()
    }

    /// Text pieces in order with the styling of every enclosing container.
    pub fn runs(&self) -> Vec<VisualRun> {
        let mut runs = Vec::new();
        self.collect_runs(RunStyle::default(), &mut runs);
        runs
    }

    fn collect_runs(&self, mut style: RunStyle, runs: &mut Vec<VisualRun>) {
        match self {
            Visual::Text(text) => {
                if !text.is_empty() {
                    runs.push(VisualRun {
                        text: text.clone(),
                        style,
                    });
                }
                return;
            }
            Visual::Strong(_) => style.strong = true,
            Visual::Code(_) => style.code = true,
            Visual::Paragraph(_) | Visual::Preformatted(_) | Visual::Span(_) => {}
        }
        for child in self.children() {
            child.collect_runs(style, runs);
        }
    }
}
