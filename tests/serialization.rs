use htmlgrove::{parse, Node};
use pretty_assertions::assert_eq;

#[test]
fn text_extraction_collapses_whitespace() {
    assert_eq!(parse("<p>hi</p>").at(0).to_text(false), "hi");
    assert_eq!(parse("<p>a\n\n  b</p>").at(0).to_text(false), "a b");
    assert_eq!(parse("<p>  a  </p>").at(0).to_text(false), "a");
    assert_eq!(parse("<p>a<b>c</b>d</p>").at(0).to_text(false), "acd");
}

#[test]
fn raw_text_extraction_is_verbatim() {
    let doc = parse("<script>if(a<b){}</script>");
    assert_eq!(doc.at(0).to_text(true), "if(a<b){}");
    // raw-text element content stays verbatim even in collapsing mode
    assert_eq!(
        parse("<script>a  b</script>").at(0).to_text(false),
        "a  b"
    );
    // while outside raw-text elements the flag decides
    assert_eq!(parse("<p>a  b</p>").at(0).to_text(true), "a  b");
}

#[test]
fn inline_tag_round_trips_exactly() {
    let doc = parse("<a href=\"/x\">t</a>");
    assert_eq!(doc.at(0).to_html(), "<a href=\"/x\">t</a>");
}

#[test]
fn attribute_values_are_quoted_and_escaped() {
    let a = parse("<a title='say \"hi\"'>x</a>").at(0);
    assert_eq!(a.to_html(), "<a title=\"say &quot;hi&quot;\">x</a>");
    // and the escaped form reads back as the same value
    let again = parse(a.to_html()).at(0);
    assert_eq!(again.get_attr("title").unwrap(), "say \"hi\"");
}

#[test]
fn void_and_self_closing_render_with_slash() {
    assert_eq!(parse("<img src=x>").at(0).to_html(), "<img src=\"x\"/>");
    assert_eq!(parse("<foo/>").at(0).to_html(), "<foo/>");
}

#[test]
fn comment_and_doctype_render() {
    assert_eq!(parse("<!--c-->").at(0).to_html(), "<!--c-->");
    assert_eq!(parse("<!DOCTYPE html>").at(0).to_html(), "<!DOCTYPE html>");
}

#[test]
fn element_children_are_indented() {
    let doc = parse("<div><p>x</p><p>y</p></div>");
    assert_eq!(doc.to_html(), "<div>\n\t<p>x</p>\n\t<p>y</p>\n</div>");
    assert_eq!(
        doc.to_html_with_indent(' '),
        "<div>\n <p>x</p>\n <p>y</p>\n</div>"
    );
}

#[test]
fn mixed_content_stays_inline() {
    let doc = parse("<p>a<b>c</b></p>");
    assert_eq!(doc.to_html(), "<p>a<b>c</b></p>");
}

#[test]
fn multiple_top_level_nodes() {
    let doc = parse("<p>a</p><p>b</p>");
    assert_eq!(doc.to_html(), "<p>a</p>\n<p>b</p>");
}

#[test]
fn sentinel_renders_empty() {
    let doc = parse("<p>x</p>");
    assert_eq!(doc.select("table").to_html(), "");
    assert_eq!(doc.select("table").to_text(false), "");
}

#[test]
fn serialization_round_trips_structurally() {
    for input in [
        "<p>hi</p>",
        "<div><p>a</p><p>b</p></div>",
        "<img src=x>",
        "<ul><li>1</li><li>2</li><li>3</li></ul>",
        "<!DOCTYPE html><html><head><title>t</title></head><body><p>hi</p></body></html>",
        "<p>a<b>c</b>d</p>",
        "<!--note--><div><a href=\"/x\" class='k'>t</a><hr></div>",
        "<script>if(a<b){}</script>",
        // a literal quote in the value must survive the escape/decode cycle
        "<a title='say \"hi\"'>x</a>",
        "<table><tr><td>1</td><td a=\"q&quot;b\">2</td></tr></table>",
    ] {
        let first = parse(input);
        let second = parse(first.to_html());
        assert_eq!(first, second, "round trip for {:?}", input);
    }
}

#[test]
fn built_trees_serialize_like_parsed_ones() {
    let div = Node::new_tag("div", &[("id", "box")]);
    let a = Node::new_tag("a", &[("href", "/x")]);
    a.append(&Node::new_text("t"));
    div.append(&a);
    assert_eq!(div.to_html(), "<div id=\"box\">\n\t<a href=\"/x\">t</a>\n</div>");

    let parsed = parse("<div id=box><a href='/x'>t</a></div>").at(0);
    assert_eq!(parsed, div);
}
