//! Tolerant markup reader/writer for the host document. It understands the
//! fragments the widget produces plus the usual host-page basics: nested
//! elements, quoted or bare attributes, void and self-closed tags, comments.
//! Text and attribute values are kept exactly as written.

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
        children: Vec<ParsedNode>,
    },
    Text(String),
}

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

struct Open {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<ParsedNode>,
}

impl Open {
    fn close(self) -> ParsedNode {
        ParsedNode::Element {
            tag: self.tag,
            attrs: self.attrs,
            self_closing: false,
            children: self.children,
        }
    }
}

/// Parse a fragment into top-level nodes. Never fails: unclosed elements are
/// closed at the end, stray closing tags are ignored, and a `<` that doesn't
/// start a tag is kept as text.
pub fn parse(input: &str) -> Vec<ParsedNode> {
    let mut roots: Vec<ParsedNode> = Vec::new();
    let mut stack: Vec<Open> = Vec::new();
    let mut text = String::new();
    let mut rest = input;

    fn push(node: ParsedNode, stack: &mut [Open], roots: &mut Vec<ParsedNode>) {
        match stack.last_mut() {
            Some(open) => open.children.push(node),
            None => roots.push(node),
        }
    }

    fn flush(text: &mut String, stack: &mut [Open], roots: &mut Vec<ParsedNode>) {
        if !text.is_empty() {
            push(ParsedNode::Text(std::mem::take(text)), stack, roots);
        }
    }

    while let Some(lt) = rest.find('<') {
        text.push_str(&rest[..lt]);
        let tail = &rest[lt..];

        if let Some(comment) = tail.strip_prefix("<!--") {
            rest = match comment.find("-->") {
                Some(end) => &comment[end + 3..],
                None => "",
            };
            continue;
        }

        if let Some(close) = tail.strip_prefix("</") {
            let Some(end) = close.find('>') else {
                text.push_str(tail);
                rest = "";
                break;
            };
            let name = close[..end].trim().to_ascii_lowercase();
            flush(&mut text, &mut stack, &mut roots);
            if let Some(pos) = stack.iter().rposition(|o| o.tag == name) {
                while stack.len() > pos {
                    if let Some(open) = stack.pop() {
                        push(open.close(), &mut stack, &mut roots);
                    }
                }
            }
            rest = &close[end + 1..];
            continue;
        }

        match parse_open_tag(&tail[1..]) {
            Some((tag, attrs, self_closing, consumed)) => {
                flush(&mut text, &mut stack, &mut roots);
                rest = &tail[1 + consumed..];
                if self_closing || is_void(&tag) {
                    let node = ParsedNode::Element {
                        tag,
                        attrs,
                        self_closing,
                        children: Vec::new(),
                    };
                    push(node, &mut stack, &mut roots);
                } else {
                    stack.push(Open {
                        tag,
                        attrs,
                        children: Vec::new(),
                    });
                }
            }
            None => {
                text.push('<');
                rest = &tail[1..];
            }
        }
    }
    text.push_str(rest);
    flush(&mut text, &mut stack, &mut roots);

    while let Some(open) = stack.pop() {
        push(open.close(), &mut stack, &mut roots);
    }
    roots
}

type OpenTag = (String, Vec<(String, String)>, bool, usize);

/// Parse `tag attr="v" ...>` (input starts right after `<`). Returns the tag,
/// attributes, whether it ended in `/>`, and the bytes consumed.
fn parse_open_tag(input: &str) -> Option<OpenTag> {
    let bytes = input.as_bytes();
    if !bytes.first()?.is_ascii_alphabetic() {
        return None;
    }

    let mut i = 0;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = input[..i].to_ascii_lowercase();
    let mut attrs = Vec::new();

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i)? {
            b'>' => return Some((tag, attrs, false, i + 1)),
            b'/' => {
                if bytes.get(i + 1) == Some(&b'>') {
                    return Some((tag, attrs, true, i + 2));
                }
                i += 1;
                continue;
            }
            _ => {}
        }

        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        let name = input[name_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let mut value = String::new();
        if bytes.get(i) == Some(&b'=') {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i)? {
                quote @ (b'"' | b'\'') => {
                    let start = i + 1;
                    let len = input[start..].find(*quote as char)?;
                    value = input[start..start + len].to_string();
                    i = start + len + 1;
                }
                _ => {
                    let start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    value = input[start..i].to_string();
                }
            }
        }
        if !name.is_empty() {
            attrs.push((name, value));
        }
    }
}

fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-'
}

pub fn write_open_tag(out: &mut String, tag: &str, attrs: &[(String, String)], self_closing: bool) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
    out.push_str(if self_closing { " />" } else { ">" });
}

/// Minimal escaping for text content.
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Decode named entities for the characters the widget escapes, plus any
/// decimal or hex numeric reference. Unknown entities are left as written.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').and_then(|semi| {
            let entity = &tail[1..semi];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity.strip_prefix('#').and_then(|num| {
                    let code = match num.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                        None => num.parse().ok()?,
                    };
                    char::from_u32(code)
                }),
            }?;
            Some((c, semi + 1))
        });
        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &tail[len..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
