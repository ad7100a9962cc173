use crate::utils::{is_ascii_whitespace_byte, is_raw_text_element};
use crate::{HtmlString, Node, NodeKind};

impl Node {
    /// Render this subtree back to markup, indenting with tabs.
    ///
    /// ```
    /// use htmlgrove::parse;
    ///
    /// let doc = parse("<a href=\"/x\">t</a>");
    /// assert_eq!(doc.at(0).to_html(), "<a href=\"/x\">t</a>");
    /// ```
    #[must_use]
    pub fn to_html(&self) -> HtmlString {
        self.to_html_with_indent('\t')
    }

    /// Render this subtree back to markup with a custom indent character.
    ///
    /// Attribute values are double-quoted with embedded `"` escaped as
    /// `&quot;`; the tokenizer decodes that same sequence when reading
    /// attribute values, so serializing and re-parsing preserves the value.
    /// A tag whose children are all text renders inline; a tag with element
    /// children puts each child on its own line, one `indent` deeper. Mixed
    /// text/element content renders inline so that no whitespace is
    /// invented next to text.
    #[must_use]
    pub fn to_html_with_indent(&self, indent: char) -> HtmlString {
        let mut encoded = [0u8; 4];
        let indent = indent.encode_utf8(&mut encoded).as_bytes();
        let mut out = Vec::new();
        render(self, &mut out, indent, 0);
        HtmlString(out)
    }

    /// Concatenate the text content of this subtree in document order.
    ///
    /// With `raw` false, whitespace runs inside text nodes collapse to a
    /// single space and the result is trimmed; with `raw` true text is
    /// concatenated verbatim. Content of raw-text elements (`script`,
    /// `style`, …) is always verbatim, whatever `raw` says.
    #[must_use]
    pub fn to_text(&self, raw: bool) -> HtmlString {
        let mut out = Vec::new();
        collect_text(self, raw, false, &mut out);
        if !raw {
            trim_in_place(&mut out);
        }
        HtmlString(out)
    }
}

fn render(node: &Node, out: &mut Vec<u8>, indent: &[u8], depth: usize) {
    match node.kind() {
        NodeKind::None => (),
        NodeKind::Text => out.extend(&*node.content()),
        NodeKind::Comment => {
            out.extend(b"<!--");
            out.extend(&*node.content());
            out.extend(b"-->");
        }
        NodeKind::Doctype => {
            out.extend(b"<!DOCTYPE ");
            out.extend(&*node.content());
            out.push(b'>');
        }
        NodeKind::Tag => {
            let name = node.tag_name();
            if name.is_empty() {
                render_root(node, out, indent);
                return;
            }
            out.push(b'<');
            out.extend(&*name);
            for (key, value) in node.attributes() {
                out.push(b' ');
                out.extend(&*key);
                out.extend(b"=\"");
                for &b in value.iter() {
                    if b == b'"' {
                        out.extend(b"&quot;");
                    } else {
                        out.push(b);
                    }
                }
                out.push(b'"');
            }

            let children = node.children();
            if node.self_closing() && children.is_empty() {
                out.extend(b"/>");
                return;
            }
            out.push(b'>');

            if layout_as_block(&children) {
                for child in &children {
                    out.push(b'\n');
                    push_indent(out, indent, depth + 1);
                    render(child, out, indent, depth + 1);
                }
                out.push(b'\n');
                push_indent(out, indent, depth);
            } else {
                for child in &children {
                    render(child, out, indent, depth);
                }
            }

            out.extend(b"</");
            out.extend(&*name);
            out.push(b'>');
        }
    }
}

/// The synthetic root renders its children only, at depth zero.
fn render_root(node: &Node, out: &mut Vec<u8>, indent: &[u8]) {
    let children = node.children();
    if layout_as_block(&children) {
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                out.push(b'\n');
            }
            render(child, out, indent, 0);
        }
    } else {
        for child in &children {
            render(child, out, indent, 0);
        }
    }
}

/// Children go on separate lines only when none of them is text: inventing
/// whitespace next to a text node would change the document.
fn layout_as_block(children: &[Node]) -> bool {
    !children.is_empty() && children.iter().all(|c| c.kind() != NodeKind::Text)
}

fn push_indent(out: &mut Vec<u8>, indent: &[u8], depth: usize) {
    for _ in 0..depth {
        out.extend(indent);
    }
}

fn collect_text(node: &Node, raw: bool, verbatim: bool, out: &mut Vec<u8>) {
    match node.kind() {
        NodeKind::Text => {
            let content = node.content();
            if raw || verbatim {
                out.extend(&*content);
            } else {
                collapse_whitespace(&content, out);
            }
        }
        NodeKind::Tag => {
            let verbatim = is_raw_text_element(&node.tag_name());
            for child in node.children() {
                collect_text(&child, raw, verbatim, out);
            }
        }
        _ => (),
    }
}

fn collapse_whitespace(content: &[u8], out: &mut Vec<u8>) {
    let mut in_whitespace = false;
    for &b in content {
        if is_ascii_whitespace_byte(b) {
            if !in_whitespace {
                out.push(b' ');
                in_whitespace = true;
            }
        } else {
            out.push(b);
            in_whitespace = false;
        }
    }
}

fn trim_in_place(out: &mut Vec<u8>) {
    while out.last().is_some_and(|&b| is_ascii_whitespace_byte(b)) {
        out.pop();
    }
    let leading = out
        .iter()
        .take_while(|&&b| is_ascii_whitespace_byte(b))
        .count();
    out.drain(..leading);
}
