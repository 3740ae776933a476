use gpui_mini_editor::{RunStyle, Visual, render_block, render_element, render_leaf};
use gpui_mini_editor_core::{BlockKind, Element, LeafFormat, Text};

fn text(s: &str) -> Visual {
    Visual::Text(s.to_string().into())
}

#[test]
fn code_block_renders_preformatted_code() {
    let element = Element::code("let x = 1;");
    let visual = render_block(&element);

    assert_eq!(
        visual,
        Visual::Preformatted(vec![Visual::Code(vec![Visual::Span(vec![text(
            "let x = 1;"
        )])])])
    );
    assert!(visual.is_preformatted());
}

#[test]
fn paragraph_and_unknown_kinds_render_as_paragraph() {
    let children = vec![text("a")];
    let paragraph = Element::paragraph("a");
    let unknown = Element::new(BlockKind::Unknown, vec![Text::plain("a")]);

    assert_eq!(
        render_element(&paragraph, children.clone()),
        Visual::Paragraph(children.clone())
    );
    assert_eq!(
        render_element(&unknown, children.clone()),
        Visual::Paragraph(children)
    );
}

#[test]
fn strong_leaf_renders_as_strong_and_others_as_span() {
    let children = vec![text("x")];
    let mut unknown = Text::plain("x");
    unknown.format = Some(LeafFormat::Unknown);

    assert_eq!(
        render_leaf(&Text::strong("x"), children.clone()),
        Visual::Strong(children.clone())
    );
    assert_eq!(
        render_leaf(&Text::plain("x"), children.clone()),
        Visual::Span(children.clone())
    );
    assert_eq!(render_leaf(&unknown, children.clone()), Visual::Span(children));
}

#[test]
fn runs_carry_enclosing_styles() {
    let element = Element::new(
        BlockKind::Code,
        vec![Text::plain("fn "), Text::strong("main"), Text::plain("")],
    );
    let runs = render_block(&element).runs();

    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].text.as_str(), "fn ");
    assert_eq!(
        runs[0].style,
        RunStyle {
            strong: false,
            code: true
        }
    );
    assert_eq!(runs[1].text.as_str(), "main");
    assert_eq!(
        runs[1].style,
        RunStyle {
            strong: true,
            code: true
        }
    );
    assert_eq!(render_block(&element).text(), "fn main");
}
