use htmlgrove::{parse, Error, Node, NodeKind, Parser};
use pretty_assertions::assert_eq;

#[test]
fn simple_document() {
    let doc = parse("<p>hi</p>");
    assert_eq!(doc.len(), 1);

    let p = doc.at(0);
    assert_eq!(p.kind(), NodeKind::Tag);
    assert_eq!(p.tag_name(), "p");
    assert_eq!(p.len(), 1);
    assert_eq!(p.at(0).kind(), NodeKind::Text);
    assert_eq!(p.at(0).content(), "hi");
    assert_eq!(p.to_text(false), "hi");
}

#[test]
fn void_elements_are_leaves() {
    let img = parse("<img src=x>").at(0);
    assert!(img.self_closing());
    assert_eq!(img.get_attr("src").unwrap(), "x");
    assert_eq!(img.len(), 0);

    // the cursor must not descend into the void element
    let p = parse("<p>a<br>b</p>").at(0);
    assert_eq!(p.len(), 3);
    assert_eq!(p.at(1).tag_name(), "br");
    assert!(p.at(1).self_closing());
    assert_eq!(p.at(2).content(), "b");
}

#[test]
fn every_void_element_stays_childless() {
    for name in [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ] {
        let doc = parse(format!("<{}>x", name));
        let node = doc.at(0);
        assert_eq!(node.tag_name(), name);
        assert!(node.self_closing(), "{} must be self-closing", name);
        assert!(node.is_empty(), "{} must stay a leaf", name);
        assert_eq!(doc.at(1).content(), "x");
    }
}

#[test]
fn parent_links_are_consistent() {
    let doc = parse("<div><p>x</p><img src=y><!--c--></div><b>tail</b>");
    assert!(doc.parent().is_none());
    doc.walk(&mut |node: &Node| {
        if !node.ptr_eq(&doc) {
            let parent = node.parent().expect("every non-root node is linked");
            assert!(parent.children().iter().any(|c| c.ptr_eq(node)));
        }
        true
    });
}

#[test]
fn names_are_normalized() {
    let doc = parse("<DiV CLaSS=Mixed ID=Y><SPAN></SPAN></dIv>");
    let div = doc.at(0);
    assert_eq!(div.tag_name(), "div");
    // attribute names fold, values are kept as received
    assert_eq!(div.get_attr("class").unwrap(), "Mixed");
    assert_eq!(div.get_attr("id").unwrap(), "Y");
    for (key, _) in div.attributes() {
        assert!(key.iter().all(|b| !b.is_ascii_uppercase()));
    }
    assert_eq!(div.at(0).tag_name(), "span");
    // the mixed-case close tag still matched: span has no children
    assert!(div.at(0).is_empty());
}

#[test]
fn close_tag_pops_to_matching_ancestor() {
    let mut skipped = Vec::new();
    let mut parser = Parser::new();
    parser.on_error(|error, node| {
        assert_eq!(error, Error::TagNotClosed);
        skipped.push(node.tag_name());
    });
    let doc = parser.parse("<div><b><i>x</div>y");
    drop(parser);

    // </div> closed the div; b and i were reported innermost-first
    assert_eq!(skipped, vec!["i", "b"]);
    assert_eq!(doc.len(), 2);
    let div = doc.at(0);
    assert_eq!(div.tag_name(), "div");
    assert_eq!(div.at(0).tag_name(), "b");
    assert_eq!(div.at(0).at(0).tag_name(), "i");
    assert_eq!(div.at(0).at(0).at(0).content(), "x");
    assert_eq!(doc.at(1).content(), "y");
}

#[test]
fn unmatched_close_tag_is_ignored() {
    let doc = parse("a</b>c");
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.at(0).content(), "a");
    assert_eq!(doc.at(1).content(), "c");
    assert_eq!(doc.to_text(false), "ac");
}

#[test]
fn bogus_comment_recovery() {
    let doc = parse("<!foo bar><?xml version='1'?>");
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.at(0).kind(), NodeKind::Comment);
    assert_eq!(doc.at(0).content(), "foo bar");
    assert_eq!(doc.at(1).kind(), NodeKind::Comment);
    assert_eq!(doc.at(1).content(), "?xml version='1'?");
}

#[test]
fn comment_termination() {
    assert_eq!(parse("<!--a-b-->").at(0).content(), "a-b");
    assert_eq!(parse("<!---->").at(0).content(), "");
    assert_eq!(parse("<!--a--b-->").at(0).content(), "a--b");
    // unterminated comments keep what was gathered
    let doc = parse("<!--dangling");
    assert_eq!(doc.at(0).kind(), NodeKind::Comment);
    assert_eq!(doc.at(0).content(), "dangling");
}

#[test]
fn doctype_keeps_the_name_portion() {
    let doc = parse("<!DOCTYPE html>");
    assert_eq!(doc.at(0).kind(), NodeKind::Doctype);
    assert_eq!(doc.at(0).content(), "html");

    let doc = parse("<!doctype HTML PUBLIC \"-//W3C//DTD HTML 4.01//EN\">");
    assert_eq!(doc.at(0).content(), "HTML");
}

#[test]
fn rawtext_content_is_lossless() {
    let src = "if(a<b){ return '</div>'; }";
    let doc = parse(format!("<script>{}</script>", src));
    let script = doc.at(0);
    assert_eq!(script.tag_name(), "script");
    assert_eq!(script.len(), 1);
    assert_eq!(script.to_text(true), src);
}

#[test]
fn rawtext_end_tag_needs_matching_name() {
    let doc = parse("<style>a { color: red }</style>");
    assert_eq!(doc.at(0).to_text(true), "a { color: red }");

    // case-insensitive close, whitespace before `>`
    let doc = parse("<TITLE>x</tItLe >");
    assert_eq!(doc.at(0).tag_name(), "title");
    assert_eq!(doc.at(0).to_text(true), "x");
    assert_eq!(doc.len(), 1);
}

#[test]
fn unterminated_rawtext_is_kept() {
    let mut unclosed = Vec::new();
    let mut parser = Parser::new();
    parser.on_error(|_, node| unclosed.push(node.tag_name()));
    let doc = parser.parse("<script>var x = 1;");
    drop(parser);
    assert_eq!(doc.at(0).to_text(true), "var x = 1;");
    assert_eq!(unclosed, vec!["script"]);
}

#[test]
fn unclosed_tag_reported_at_end_of_input() {
    let mut errors = Vec::new();
    let mut parser = Parser::new();
    parser.on_error(|error, node| errors.push((error, node.tag_name())));
    let doc = parser.parse("<!--c--><b>");
    drop(parser);

    assert!(!doc.select("b").is_null());
    assert_eq!(errors, vec![(Error::TagNotClosed, "b".into())]);
}

#[test]
fn callbacks_fire_in_emission_order() {
    let mut seen = Vec::new();
    let mut parser = Parser::new();
    parser.on_node(|node| seen.push((node.kind(), node.tag_name())));
    parser.parse("<div><p>x</p></div>");
    drop(parser);

    assert_eq!(
        seen,
        vec![
            (NodeKind::Tag, "div".into()),
            (NodeKind::Tag, "p".into()),
            // the text run is flushed when the close tag arrives
            (NodeKind::Text, "".into()),
        ]
    );
}

#[test]
fn selector_filtered_callback_sees_ancestors() {
    let mut hits = Vec::new();
    let mut parser = Parser::new();
    parser.on_match("div a", |node| {
        hits.push(node.get_attr("n").unwrap());
    });
    parser.parse("<div><a n=1>x</a></div><a n=2>y</a>");
    drop(parser);
    assert_eq!(hits, vec!["1"]);
}

#[test]
fn callbacks_persist_until_cleared() {
    let mut count = 0usize;
    let mut parser = Parser::new();
    parser.on_node(|_| count += 1);
    parser.parse("<p></p>");
    parser.parse("<p></p>");
    parser.clear_callbacks();
    parser.parse("<p></p>");
    drop(parser);
    assert_eq!(count, 2);
}

#[test]
fn whitespace_only_text_runs_are_dropped() {
    let div = parse("<div> <p>x</p>\n\t</div>").at(0);
    assert_eq!(div.len(), 1);
    assert_eq!(div.at(0).tag_name(), "p");

    // but raw-text content keeps every byte
    let textarea = parse("<textarea> </textarea>").at(0);
    assert_eq!(textarea.len(), 1);
    assert_eq!(textarea.at(0).content(), " ");
}

#[test]
fn attribute_parsing_modes() {
    let a = parse("<a one=1 two='2 x' three=\"3\" four five = 5>").at(0);
    assert_eq!(a.get_attr("one").unwrap(), "1");
    assert_eq!(a.get_attr("two").unwrap(), "2 x");
    assert_eq!(a.get_attr("three").unwrap(), "3");
    assert_eq!(a.get_attr("four").unwrap(), "");
    // whitespace around `=` is permitted
    assert_eq!(a.get_attr("five").unwrap(), "5");
}

#[test]
fn quot_entity_decodes_in_attribute_values_only() {
    let a = parse("<a t=\"x&quot;y\" u='p&quot;q' v=r&quot;s>").at(0);
    assert_eq!(a.get_attr("t").unwrap(), "x\"y");
    assert_eq!(a.get_attr("u").unwrap(), "p\"q");
    assert_eq!(a.get_attr("v").unwrap(), "r\"s");

    // no other entity is touched, and text content is left alone
    let p = parse("<p a='&amp;&quot'>&quot;</p>").at(0);
    assert_eq!(p.get_attr("a").unwrap(), "&amp;&quot");
    assert_eq!(p.to_text(false), "&quot;");
}

#[test]
fn duplicate_attributes_keep_the_first() {
    let a = parse("<a x=1 X=2>").at(0);
    assert_eq!(a.get_attr("x").unwrap(), "1");
    assert_eq!(a.attributes().len(), 1);
}

#[test]
fn self_closing_non_void_does_not_descend() {
    let doc = parse("<foo/>bar");
    assert!(doc.at(0).self_closing());
    assert!(doc.at(0).is_empty());
    assert_eq!(doc.at(1).content(), "bar");
}

#[test]
fn stray_angle_bracket_is_text() {
    let doc = parse("a < b");
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.at(0).content(), "a < b");
}

#[test]
fn end_tag_attributes_are_dropped() {
    let doc = parse("<div></div class=x>");
    assert_eq!(doc.len(), 1);
    assert!(doc.at(0).attributes().is_empty());
    assert!(doc.at(0).is_empty());
}

#[test]
fn parse_never_fails_on_garbage() {
    for input in [
        "", "<", "</", "<!", "<!-", "<!--", "<a", "<a ", "<a x", "<a x=", "<a x='", "<a x=\"y",
        "<a/", "</>", "<><><>", "\0\0", "<!doctype", "<script>", "<script><", "<script></scr",
    ] {
        let doc = parse(input);
        assert!(doc.parent().is_none(), "root for {:?}", input);
    }
}
